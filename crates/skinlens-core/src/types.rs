//! Backend data types
//!
//! Field names follow the backend's JSON (snake_case), so these types go over
//! the wire unchanged.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{Error, Result};

/// Access/refresh token pair issued by `POST /token/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Email/password login payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Registration form as filled in by the user
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    pub age: Option<u32>,
    pub sex: Option<String>,
    pub country: Option<String>,
    pub skin_type: Vec<String>,
    pub skin_concerns: Vec<String>,
}

impl Registration {
    /// Build the `POST /users/` body
    ///
    /// The username is the part of the email before `@`; the confirmation
    /// field never leaves the client.
    pub fn to_payload(&self) -> RegistrationPayload {
        let username = self
            .email
            .split('@')
            .next()
            .unwrap_or_default()
            .to_string();

        RegistrationPayload {
            email: self.email.clone(),
            password: self.password.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            username,
            age: self.age,
            sex: self.sex.clone().filter(|s| !s.is_empty()),
            country: self.country.clone().filter(|c| !c.is_empty()),
            skin_type: self.skin_type.clone(),
            skin_concerns: self.skin_concerns.clone(),
        }
    }
}

/// Wire form of a registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationPayload {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub age: Option<u32>,
    pub sex: Option<String>,
    pub country: Option<String>,
    pub skin_type: Vec<String>,
    pub skin_concerns: Vec<String>,
}

/// Response of `POST /users/`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationResponse {
    #[serde(default)]
    pub tokens: Option<TokenPair>,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub last_skin_condition: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Partial user update for `PATCH /users/{id}/`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    /// Image URL; null until one is uploaded
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub suitable_for: String,
    #[serde(default)]
    pub targets: String,
    #[serde(default)]
    pub when_to_apply: String,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Product form used for both create and update
///
/// The image is uploaded separately through
/// `POST /products/{id}/update_image/`, so it is not part of this body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub brand: String,
    pub category: String,
    pub description: String,
    pub price: f64,
    pub stock: i64,
    #[serde(default)]
    pub suitable_for: String,
    #[serde(default)]
    pub targets: String,
    #[serde(default)]
    pub when_to_apply: String,
}

/// An image read from disk or captured by the user
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl ImageFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Load an image, inferring its content type from the extension
    ///
    /// # Errors
    /// - `Error::InvalidImage` for unknown extensions or empty files
    /// - `Error::Io` if the file can't be read
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content_type = content_type_for(path).ok_or_else(|| {
            Error::InvalidImage(format!("Unsupported image type: {}", path.display()))
        })?;

        let bytes = tokio::fs::read(path).await?;
        if bytes.is_empty() {
            return Err(Error::InvalidImage(format!(
                "Image file is empty: {}",
                path.display()
            )));
        }

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("image")
            .to_string();

        Ok(Self::new(file_name, content_type, bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

/// Response of `POST /analysis/upload/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUpload {
    pub id: i64,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Body of `POST /analysis-results/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub image_id: i64,
    pub condition: String,
    pub confidence: f64,
    pub recommendation_type: Option<String>,
    pub message: Option<String>,
}

/// Body of `POST /consultations/create/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsultationRequest {
    /// `YYYY-MM-DD`
    pub date: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Consultation {
    #[serde(default)]
    pub id: Option<i64>,
    pub date: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_registration_payload_derives_username() {
        let registration = Registration {
            email: "jane.doe@example.com".to_string(),
            password: "secret".to_string(),
            confirm_password: "secret".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            sex: Some(String::new()),
            skin_type: vec!["oily".to_string()],
            ..Default::default()
        };

        let payload = registration.to_payload();
        assert_eq!(payload.username, "jane.doe");
        assert_eq!(payload.sex, None);
        assert_eq!(payload.skin_type, vec!["oily".to_string()]);

        let json = serde_json::to_value(&payload).unwrap();
        assert!(json.get("confirm_password").is_none());
    }

    #[test]
    fn test_product_defaults_missing_fields() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "Gentle Cleanser",
            "price": 12.5,
            "stock": 0
        }))
        .unwrap();

        assert_eq!(product.brand, "");
        assert!(!product.in_stock());
    }

    #[test]
    fn test_user_update_skips_unset_fields() {
        let update = UserUpdate {
            is_active: Some(false),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"is_active": false})
        );
    }

    #[tokio::test]
    async fn test_image_from_path_infers_content_type() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("face.JPG");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(&[0xFF, 0xD8, 0xFF])
            .unwrap();

        let image = ImageFile::from_path(&path).await.unwrap();
        assert_eq!(image.file_name, "face.JPG");
        assert_eq!(image.content_type, "image/jpeg");
        assert_eq!(image.len(), 3);
    }

    #[tokio::test]
    async fn test_image_from_path_rejects_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blank.png");
        std::fs::File::create(&path).unwrap();

        let result = ImageFile::from_path(&path).await;
        assert!(matches!(result, Err(Error::InvalidImage(_))));
    }

    #[tokio::test]
    async fn test_image_from_path_rejects_unknown_extension() {
        let result = ImageFile::from_path("notes.txt").await;
        assert!(matches!(result, Err(Error::InvalidImage(_))));
    }
}
