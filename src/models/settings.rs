//! Store-wide settings edited by administrators.

use serde::{Deserialize, Serialize};

/// Social media profile links.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SocialMedia {
    /// Facebook page URL.
    pub facebook: String,
    /// Twitter profile URL.
    pub twitter: String,
    /// Instagram profile URL.
    pub instagram: String,
    /// LinkedIn page URL.
    pub linkedin: String,
}

/// Blog moderation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct BlogSettings {
    /// Posts per page.
    pub posts_per_page: u32,
    /// Whether readers may comment.
    pub allow_comments: bool,
    /// Whether new posts need approval before publishing.
    pub require_approval: bool,
    /// Whether signed-out readers may comment.
    pub allow_guest_comments: bool,
}

impl Default for BlogSettings {
    fn default() -> Self {
        Self {
            posts_per_page: 10,
            allow_comments: true,
            require_approval: true,
            allow_guest_comments: false,
        }
    }
}

/// Email notification settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct EmailSettings {
    /// Master switch for notifications.
    pub send_notifications: bool,
    /// Notify on new comments.
    pub notify_on_new_comment: bool,
    /// Notify on new posts.
    pub notify_on_new_blog: bool,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            send_notifications: true,
            notify_on_new_comment: true,
            notify_on_new_blog: true,
        }
    }
}

/// The store settings document.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct AdminSettings {
    /// Store name.
    pub site_name: String,
    /// Store tagline.
    pub site_description: String,
    /// Public contact address.
    pub contact_email: String,
    /// Social links.
    pub social_media: SocialMedia,
    /// Blog moderation.
    pub blog_settings: BlogSettings,
    /// Email notifications.
    pub email_settings: EmailSettings,
    /// Whether the storefront shows a maintenance page.
    pub maintenance_mode: bool,
}
