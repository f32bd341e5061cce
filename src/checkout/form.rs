//! The shipping details form.

use std::collections::BTreeMap;

use crate::config::Email;
use crate::models::{ShippingAddress, User};

/// Field-level validation messages, keyed by form field.
pub type FieldErrors = BTreeMap<&'static str, String>;

/// Contact and address details collected in the first checkout stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShippingForm {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Street and number.
    pub street: String,
    /// City.
    pub city: String,
    /// State or region.
    pub state: String,
    /// Postal code.
    pub postal_code: String,
    /// Country.
    pub country: String,
}

impl ShippingForm {
    /// Pre-fills the form from a customer profile and its saved address.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        let (first_name, last_name) = user.first_and_last_name();
        let address = user.shipping_address().unwrap_or_default();
        Self {
            first_name,
            last_name,
            email: user.email.clone(),
            phone: user.phone.clone().unwrap_or_default(),
            street: address.street,
            city: address.city,
            state: address.state,
            postal_code: address.postal_code,
            country: address.country,
        }
    }

    /// Checks that every field is filled in and the email is well formed.
    ///
    /// # Errors
    ///
    /// Returns one message per invalid field.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        for (field, label, value) in self.fields() {
            if value.trim().is_empty() {
                errors.insert(field, format!("{label} is required"));
            }
        }
        if !errors.contains_key("email") && !Email::is_valid(self.email.trim()) {
            errors.insert("email", "Please enter a valid email address".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Returns the full name as entered.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// Returns the address part of the form.
    #[must_use]
    pub fn address(&self) -> ShippingAddress {
        ShippingAddress {
            street: self.street.trim().to_string(),
            city: self.city.trim().to_string(),
            state: self.state.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            country: self.country.trim().to_string(),
        }
    }

    fn fields(&self) -> [(&'static str, &'static str, &str); 9] {
        [
            ("firstName", "First name", self.first_name.as_str()),
            ("lastName", "Last name", self.last_name.as_str()),
            ("email", "Email", self.email.as_str()),
            ("phone", "Phone", self.phone.as_str()),
            ("street", "Street address", self.street.as_str()),
            ("city", "City", self.city.as_str()),
            ("state", "State", self.state.as_str()),
            ("postalCode", "Postal code", self.postal_code.as_str()),
            ("country", "Country", self.country.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn filled() -> ShippingForm {
        ShippingForm {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@example.com".into(),
            phone: "555-0100".into(),
            street: "1 Main St".into(),
            city: "Springfield".into(),
            state: "IL".into(),
            postal_code: "62701".into(),
            country: "US".into(),
        }
    }

    #[test]
    fn test_complete_form_is_valid() {
        assert!(filled().validate().is_ok());
    }

    #[test]
    fn test_reports_each_missing_field() {
        let form = ShippingForm {
            city: "  ".into(),
            country: String::new(),
            ..filled()
        };
        let errors = form.validate().unwrap_err();

        assert_eq!(errors.len(), 2);
        assert_eq!(errors["city"], "City is required");
        assert_eq!(errors["country"], "Country is required");
    }

    #[test]
    fn test_rejects_malformed_email() {
        let form = ShippingForm {
            email: "jane.example.com".into(),
            ..filled()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors["email"], "Please enter a valid email address");
    }

    #[test]
    fn test_prefills_from_profile() {
        let user: User = serde_json::from_value(json!({
            "_id": "u1",
            "name": "Jane Q Doe",
            "email": "jane@example.com",
            "phone": "555-0100",
            "address": {"street": "1 Main St", "city": "Springfield", "zipCode": "62701"}
        }))
        .unwrap();

        let form = ShippingForm::from_user(&user);
        assert_eq!(form.first_name, "Jane");
        assert_eq!(form.last_name, "Q Doe");
        assert_eq!(form.postal_code, "62701");
        assert_eq!(form.full_name(), "Jane Q Doe");
        assert!(form.state.is_empty());
    }
}
