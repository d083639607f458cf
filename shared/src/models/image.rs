//! Uploaded image record

use serde::{Deserialize, Serialize};

/// Extension used when the uploaded file name has none
pub const DEFAULT_EXTENSION: &str = "jpg";

/// One uploaded image (metadata only, bytes live in object storage)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub id: String,
    /// Original upload name
    pub file_name: String,
    /// Absolute public URL of the stored object
    pub uri: String,
    pub title: Option<String>,
    pub prompts: Option<String>,
    pub description: Option<String>,
    pub ai_model: Option<String>,
    pub tags: Vec<String>,
    /// Unix millis
    pub created_at: i64,
    pub likes: i64,
    /// Soft-delete flag; read paths filter on it, nothing sets it
    pub is_deleted: bool,
}

impl Image {
    /// Title when present, otherwise the file name without its extension
    pub fn display_name(&self) -> &str {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title,
            _ => file_stem(&self.file_name),
        }
    }

    /// Lowercase extension of the original file name
    pub fn extension(&self) -> String {
        file_extension(&self.file_name)
    }
}

/// Fields needed to insert a new record; id, timestamps and counters are
/// assigned by the repository.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageCreate {
    pub file_name: String,
    pub uri: String,
    pub title: Option<String>,
    pub prompts: Option<String>,
    pub description: Option<String>,
    pub ai_model: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// `"sunset.final.PNG"` → `"sunset.final"`
pub fn file_stem(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(0) | None => file_name,
        Some(idx) => &file_name[..idx],
    }
}

/// `"sunset.PNG"` → `"png"`, falls back to [`DEFAULT_EXTENSION`]
pub fn file_extension(file_name: &str) -> String {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < file_name.len() => {
            file_name[idx + 1..].to_ascii_lowercase()
        }
        _ => DEFAULT_EXTENSION.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(title: Option<&str>, file_name: &str) -> Image {
        Image {
            id: "a".into(),
            file_name: file_name.into(),
            uri: format!("https://cdn.example.com/images/{file_name}"),
            title: title.map(Into::into),
            prompts: None,
            description: None,
            ai_model: None,
            tags: vec![],
            created_at: 0,
            likes: 0,
            is_deleted: false,
        }
    }

    #[test]
    fn test_display_name_prefers_title() {
        assert_eq!(sample(Some("Sunset"), "img_001.png").display_name(), "Sunset");
        assert_eq!(sample(Some("   "), "img_001.png").display_name(), "img_001");
        assert_eq!(sample(None, "archive.tar.gz").display_name(), "archive.tar");
        assert_eq!(sample(None, ".hidden").display_name(), ".hidden");
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("photo.JPEG"), "jpeg");
        assert_eq!(file_extension("photo"), "jpg");
        assert_eq!(file_extension("photo."), "jpg");
        assert_eq!(file_extension(".bashrc"), "jpg");
        assert_eq!(sample(None, "a.webp").extension(), "webp");
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(sample(Some("Sunset"), "a.png")).unwrap();
        assert_eq!(json["fileName"], "a.png");
        assert_eq!(json["isDeleted"], false);
        assert_eq!(json["aiModel"], serde_json::Value::Null);
        assert!(json.get("file_name").is_none());
    }
}
