//! Authentication realms.

use std::fmt;

use crate::storage::{ADMIN_TOKEN_KEY, USER_TOKEN_KEY};

/// Which of the two independent sessions a request belongs to.
///
/// Customers and administrators sign in separately and hold separate bearer
/// tokens. The API client picks the realm for each request with
/// [`AuthRealm::for_request`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthRealm {
    /// A storefront customer.
    User,
    /// A back-office administrator.
    Admin,
}

impl AuthRealm {
    /// Returns the storage key holding this realm's bearer token.
    #[must_use]
    pub const fn token_key(self) -> &'static str {
        match self {
            Self::User => USER_TOKEN_KEY,
            Self::Admin => ADMIN_TOKEN_KEY,
        }
    }

    /// Chooses the realm for a request.
    ///
    /// A request is admin-scoped when its path starts with `/admin` or
    /// `/api/admin`, or when the caller is currently on an `/admin` route.
    ///
    /// # Example
    ///
    /// ```rust
    /// use storefront_sdk::AuthRealm;
    ///
    /// assert_eq!(AuthRealm::for_request("/api/admin/verify", "/"), AuthRealm::Admin);
    /// assert_eq!(AuthRealm::for_request("/api/orders", "/admin/orders"), AuthRealm::Admin);
    /// assert_eq!(AuthRealm::for_request("/api/orders", "/orders"), AuthRealm::User);
    /// ```
    #[must_use]
    pub fn for_request(path: &str, current_route: &str) -> Self {
        let admin_path = path.starts_with("/admin") || path.starts_with("/api/admin");
        if admin_path || current_route.starts_with("/admin") {
            Self::Admin
        } else {
            Self::User
        }
    }
}

impl fmt::Display for AuthRealm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Admin => f.write_str("admin"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_keys() {
        assert_eq!(AuthRealm::User.token_key(), "token");
        assert_eq!(AuthRealm::Admin.token_key(), "adminToken");
    }

    #[test]
    fn test_admin_paths_select_admin_realm() {
        assert_eq!(AuthRealm::for_request("/admin/stats", "/"), AuthRealm::Admin);
        assert_eq!(
            AuthRealm::for_request("/api/admin/shipping-methods", "/checkout"),
            AuthRealm::Admin
        );
    }

    #[test]
    fn test_admin_route_selects_admin_realm() {
        assert_eq!(
            AuthRealm::for_request("/api/products", "/admin/products"),
            AuthRealm::Admin
        );
    }

    #[test]
    fn test_customer_requests_select_user_realm() {
        assert_eq!(AuthRealm::for_request("/api/cart", "/cart"), AuthRealm::User);
        assert_eq!(AuthRealm::for_request("/api/blogs", "/"), AuthRealm::User);
    }
}
