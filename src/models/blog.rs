//! Blog posts and comments.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Number of posts per page in the public blog list.
pub const DEFAULT_PAGE_SIZE: u32 = 9;

/// Publication state of a post.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlogStatus {
    /// Work in progress, visible to its author.
    Draft,
    /// Submitted and waiting for approval.
    Pending,
    /// Public.
    #[default]
    Published,
}

impl BlogStatus {
    /// Returns the wire value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Published => "published",
        }
    }
}

impl fmt::Display for BlogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A post or comment author.
///
/// Unpopulated references arrive as a bare id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum AuthorRef {
    /// Only the user id.
    Id(String),
    /// The populated author.
    Profile {
        /// User id.
        #[serde(alias = "_id", default)]
        id: String,
        /// Display name.
        #[serde(default)]
        name: Option<String>,
        /// Email address.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<String>,
    },
}

impl AuthorRef {
    /// Returns the author's display name, or `"Anonymous"`.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Profile {
                name: Some(name), ..
            } if !name.is_empty() => name,
            _ => "Anonymous",
        }
    }
}

/// A comment on a post.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Comment id.
    #[serde(alias = "_id", default)]
    pub id: String,
    /// Comment text.
    #[serde(default)]
    pub content: String,
    /// Who wrote it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorRef>,
    /// When it was written.
    #[serde(default, skip_serializing)]
    pub created_at: Option<DateTime<Utc>>,
}

fn tags_from_list_or_csv<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Tags {
        List(Vec<String>),
        Csv(String),
    }

    let tags = match Option::<Tags>::deserialize(deserializer)? {
        Some(Tags::List(list)) => list,
        Some(Tags::Csv(csv)) => csv.split(',').map(String::from).collect(),
        None => Vec::new(),
    };

    Ok(tags
        .into_iter()
        .map(|tag| tag.trim().to_string())
        .filter(|tag| !tag.is_empty())
        .collect())
}

/// A blog post.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    /// Post id.
    #[serde(alias = "_id", default)]
    pub id: String,
    /// Title.
    #[serde(default)]
    pub title: String,
    /// URL slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Body text.
    #[serde(default)]
    pub content: String,
    /// Header image URL or path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
    /// Author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorRef>,
    /// Tags. The backend sends a list or a comma-separated string.
    #[serde(default, deserialize_with = "tags_from_list_or_csv")]
    pub tags: Vec<String>,
    /// Publication state.
    #[serde(default)]
    pub status: BlogStatus,
    /// Like count.
    #[serde(default)]
    pub likes: u32,
    /// Ids of users who liked the post.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub liked_by: Vec<String>,
    /// Comments, oldest first.
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// When the post was created.
    #[serde(default, skip_serializing)]
    pub created_at: Option<DateTime<Utc>>,
    /// When the post was last edited.
    #[serde(default, skip_serializing)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Blog {
    /// Returns up to `len` characters of the content followed by `...`.
    #[must_use]
    pub fn excerpt(&self, len: usize) -> String {
        let mut excerpt: String = self.content.chars().take(len).collect();
        if self.content.chars().count() > len {
            excerpt.push_str("...");
        }
        excerpt
    }

    /// Returns `true` if `user_id` has liked this post.
    #[must_use]
    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.liked_by.iter().any(|id| id == user_id)
    }
}

/// Collects the distinct tags of `blogs`, sorted.
#[must_use]
pub fn unique_tags(blogs: &[Blog]) -> Vec<String> {
    blogs
        .iter()
        .flat_map(|blog| blog.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// One page of the blog list.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BlogPage {
    /// Posts on this page.
    #[serde(default)]
    pub blogs: Vec<Blog>,
    /// Total number of pages.
    #[serde(default = "one")]
    pub total_pages: u32,
}

const fn one() -> u32 {
    1
}

/// Filters for the blog list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogQuery {
    /// 1-based page number.
    pub page: u32,
    /// Posts per page.
    pub limit: u32,
    /// Free-text search.
    pub search: Option<String>,
    /// Tag filter.
    pub tag: Option<String>,
    /// `None` lists every status (admins only).
    pub status: Option<BlogStatus>,
}

impl Default for BlogQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            search: None,
            tag: None,
            status: Some(BlogStatus::Published),
        }
    }
}

impl BlogQuery {
    /// The default query for an admin, which includes drafts.
    #[must_use]
    pub fn for_admin() -> Self {
        Self {
            status: None,
            ..Self::default()
        }
    }

    /// Returns the query parameters in wire order.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.max(1).to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            params.push(("search", search.to_string()));
        }
        if let Some(tag) = self.tag.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            params.push(("tag", tag.to_string()));
        }
        params.push((
            "status",
            self.status.map_or_else(|| "all".to_string(), |s| s.to_string()),
        ));
        params
    }
}

/// Result of toggling a like.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LikeState {
    /// New like count.
    pub likes: u32,
    /// Whether the current user now likes the post.
    #[serde(default)]
    pub has_liked: bool,
}

/// Fields sent to create or edit a post.
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BlogInput {
    /// Title.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Tags.
    pub tags: Vec<String>,
    /// Publication state.
    pub status: BlogStatus,
    /// Header image URL or path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,
}
