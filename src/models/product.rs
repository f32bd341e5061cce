//! Catalog products.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::ApiBaseUrl;

/// Image shown when a product has no usable image reference.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.png";

/// An image reference as the backend sends it.
///
/// Older products carry a plain string, newer uploads an object with `url`
/// and/or `path`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ImageRef {
    /// A URL or path string.
    Url(String),
    /// An uploaded file descriptor.
    File {
        /// Public URL of the upload.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        /// Server-side path of the upload.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
}

impl ImageRef {
    /// Resolves this reference to a displayable URL.
    ///
    /// - `http...` strings are kept as they are
    /// - strings starting with `/` are resolved against `asset_host`
    /// - bare file names resolve to `<asset_host>/uploads/<name>`
    /// - file descriptors use `url`, then `path`
    ///
    /// Results shorter than five characters become [`PLACEHOLDER_IMAGE`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use storefront_sdk::ApiBaseUrl;
    /// use storefront_sdk::models::ImageRef;
    ///
    /// let host = ApiBaseUrl::new("http://localhost:5000").unwrap();
    /// let image = ImageRef::Url("shirt.jpg".to_string());
    /// assert_eq!(image.resolve(&host), "http://localhost:5000/uploads/shirt.jpg");
    /// ```
    #[must_use]
    pub fn resolve(&self, asset_host: &ApiBaseUrl) -> String {
        let resolved = match self {
            Self::Url(raw) => {
                let raw = raw.trim();
                if raw.starts_with("http") {
                    raw.to_string()
                } else if raw.starts_with('/') {
                    asset_host.join(raw)
                } else if raw.is_empty() {
                    String::new()
                } else {
                    asset_host.join(&format!("/uploads/{raw}"))
                }
            }
            Self::File { url, path } => url
                .as_deref()
                .filter(|s| !s.is_empty())
                .or(path.as_deref())
                .unwrap_or_default()
                .to_string(),
        };

        if resolved.len() < 5 {
            PLACEHOLDER_IMAGE.to_string()
        } else {
            resolved
        }
    }
}

/// A product in the catalog.
///
/// Products are owned by the backend and read-only to customers. Admins
/// write them through [`ProductInput`].
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// The unique identifier of the product.
    #[serde(alias = "_id", default)]
    pub id: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Unit price.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Primary image. Normalized to a URL by [`Product::normalize_image`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,

    /// Additional image URLs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,

    /// Units in stock.
    #[serde(default, alias = "countInStock", skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,

    /// Catalog category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Brand name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    /// Available size labels.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sizes: Vec<String>,

    /// Marketing bullet points.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,

    /// Free-form specification table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specifications: Option<serde_json::Value>,

    /// Whether the product is featured on the home page.
    #[serde(default)]
    pub featured: bool,

    /// When the product was created.
    #[serde(default, skip_serializing)]
    pub created_at: Option<DateTime<Utc>>,

    /// When the product was last updated.
    #[serde(default, skip_serializing)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Replaces the raw image reference with a resolved URL.
    ///
    /// Falls back to the first entry of `images`, then to
    /// [`PLACEHOLDER_IMAGE`].
    pub fn normalize_image(&mut self, asset_host: &ApiBaseUrl) {
        let source = self
            .image
            .clone()
            .or_else(|| self.images.first().cloned().map(ImageRef::Url));

        let url = source.map_or_else(
            || {
                tracing::debug!(product = %self.name, "No valid image URL found for product");
                PLACEHOLDER_IMAGE.to_string()
            },
            |image| image.resolve(asset_host),
        );

        self.image = Some(ImageRef::Url(url));
    }

    /// Returns the image URL, if the image is a plain string.
    #[must_use]
    pub fn image_url(&self) -> Option<&str> {
        match &self.image {
            Some(ImageRef::Url(url)) => Some(url),
            _ => None,
        }
    }

    /// Returns `true` if `term` occurs in the name or description,
    /// ignoring case.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return false;
        }
        self.name.to_lowercase().contains(&term)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&term))
    }
}

/// Fields an admin sends to create or update a product.
#[derive(Debug, Clone, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    /// Display name.
    pub name: String,
    /// Long description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unit price.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Catalog category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Brand name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Units in stock.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    /// Primary image URL or upload path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Available size labels.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sizes: Vec<String>,
    /// Marketing bullet points.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    /// Whether the product is featured.
    pub featured: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn host() -> ApiBaseUrl {
        ApiBaseUrl::new("http://localhost:5000").unwrap()
    }

    #[test]
    fn test_deserializes_backend_product() {
        let product: Product = serde_json::from_value(json!({
            "_id": "p1",
            "name": "Linen Shirt",
            "price": 29.99,
            "image": "shirt.jpg",
            "countInStock": 4,
            "category": "Men",
            "createdAt": "2024-03-01T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(product.id, "p1");
        assert_eq!(product.price, Decimal::new(2999, 2));
        assert_eq!(product.stock, Some(4));
        assert!(product.created_at.is_some());
    }

    #[test]
    fn test_image_resolution_rules() {
        let host = host();
        assert_eq!(
            ImageRef::Url("https://cdn.example.com/a.jpg".into()).resolve(&host),
            "https://cdn.example.com/a.jpg"
        );
        assert_eq!(
            ImageRef::Url("/uploads/a.jpg".into()).resolve(&host),
            "http://localhost:5000/uploads/a.jpg"
        );
        assert_eq!(
            ImageRef::Url("a.jpg".into()).resolve(&host),
            "http://localhost:5000/uploads/a.jpg"
        );
        assert_eq!(
            ImageRef::File {
                url: None,
                path: Some("/srv/uploads/a.jpg".into())
            }
            .resolve(&host),
            "/srv/uploads/a.jpg"
        );
        assert_eq!(
            ImageRef::File { url: None, path: None }.resolve(&host),
            PLACEHOLDER_IMAGE
        );
        assert_eq!(ImageRef::Url(String::new()).resolve(&host), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_normalize_image_falls_back_to_images_then_placeholder() {
        let mut product = Product {
            images: vec!["b.jpg".into()],
            ..Default::default()
        };
        product.normalize_image(&host());
        assert_eq!(product.image_url(), Some("http://localhost:5000/uploads/b.jpg"));

        let mut bare = Product::default();
        bare.normalize_image(&host());
        assert_eq!(bare.image_url(), Some(PLACEHOLDER_IMAGE));
    }

    #[test]
    fn test_matches_name_or_description_case_insensitively() {
        let product = Product {
            name: "Linen Shirt".into(),
            description: Some("Breathable summer wear".into()),
            ..Default::default()
        };
        assert!(product.matches("linen"));
        assert!(product.matches("SUMMER"));
        assert!(!product.matches("wool"));
        assert!(!product.matches("   "));
    }

    #[test]
    fn test_product_input_serializes_camel_case_price_as_number() {
        let input = ProductInput {
            name: "Cap".into(),
            price: Decimal::new(1500, 2),
            ..Default::default()
        };
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(value["price"], json!(15.0));
        assert_eq!(value["featured"], json!(false));
        assert!(value.get("description").is_none());
    }
}
