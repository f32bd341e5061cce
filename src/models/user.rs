//! Customer and administrator profiles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::order::ShippingAddress;

/// A storefront customer.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Account id.
    #[serde(alias = "_id", default)]
    pub id: String,
    /// Full name.
    #[serde(default)]
    pub name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Saved address. Older accounts store free text here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<serde_json::Value>,
    /// Account role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// When the account was created.
    #[serde(default, skip_serializing)]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    /// Returns the saved address when it is structured.
    #[must_use]
    pub fn shipping_address(&self) -> Option<ShippingAddress> {
        self.address
            .as_ref()
            .filter(|value| value.is_object())
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Splits the name into first name and the rest.
    #[must_use]
    pub fn first_and_last_name(&self) -> (String, String) {
        let name = self.name.trim();
        name.split_once(' ').map_or_else(
            || (name.to_string(), String::new()),
            |(first, last)| (first.to_string(), last.trim().to_string()),
        )
    }
}

/// A back-office administrator.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    /// Account id.
    #[serde(alias = "_id", default)]
    pub id: String,
    /// Full name.
    #[serde(default)]
    pub name: String,
    /// Email address.
    #[serde(default)]
    pub email: String,
    /// Admin role, e.g. `superadmin`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Sign-up form.
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// Full name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Password, at least six characters.
    pub password: String,
    /// Phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Partial profile update. Unset fields are left unchanged.
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// New address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<ShippingAddress>,
    /// New password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Partial administrator profile update. Unset fields are left unchanged.
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfileUpdate {
    /// New name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structured_address_is_used() {
        let user: User = serde_json::from_value(json!({
            "_id": "u1",
            "name": "Jane Q Doe",
            "email": "jane@example.com",
            "address": {"street": "1 Main St", "city": "Springfield", "zipCode": "62701"}
        }))
        .unwrap();

        let address = user.shipping_address().unwrap();
        assert_eq!(address.postal_code, "62701");
        assert_eq!(
            user.first_and_last_name(),
            ("Jane".to_string(), "Q Doe".to_string())
        );
    }

    #[test]
    fn test_free_text_address_is_ignored() {
        let user: User =
            serde_json::from_value(json!({"name": "Cher", "address": "somewhere"})).unwrap();
        assert!(user.shipping_address().is_none());
        assert_eq!(user.first_and_last_name(), ("Cher".to_string(), String::new()));
    }

    #[test]
    fn test_profile_update_skips_unset_fields() {
        let update = ProfileUpdate {
            phone: Some("555".into()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&update).unwrap(), json!({"phone": "555"}));
    }

    #[test]
    fn test_admin_update_skips_unset_fields() {
        let update = AdminProfileUpdate {
            email: Some("ops@example.com".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"email": "ops@example.com"})
        );
    }
}
