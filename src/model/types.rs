//! Normalized entity structs.

use serde::{Deserialize, Serialize};

/// One indexed PDF document from the flat JSON file index.
///
/// `norm_name` is computed once by the offline index builder (display name
/// without its extension, run through the normalizer) and is never recomputed
/// per query. Older index files may lack the field entirely; it then defaults
/// to an empty string and scoring degrades gracefully.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentRecord {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub norm_name: String,
}

/// A curated "go look in this folder" link.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FolderLink {
    pub name: String,
    pub folder_link: String,
}

impl FolderLink {
    pub fn new(name: impl Into<String>, folder_link: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            folder_link: folder_link.into(),
        }
    }
}

/// One element of a hybrid-search result list.
///
/// A result list is homogeneous: either scored documents, or one/two folder
/// links. Callers must match on the variant before treating `path` as a real
/// file; the `kind` tag carries that distinction through JSON output.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchResult {
    Document {
        #[serde(flatten)]
        record: DocumentRecord,
        relevance: f64,
    },
    FolderLink {
        #[serde(flatten)]
        link: FolderLink,
        is_folder_link: bool,
    },
}

impl SearchResult {
    pub fn document(record: DocumentRecord, relevance: f64) -> Self {
        Self::Document { record, relevance }
    }

    pub fn folder_link(link: FolderLink) -> Self {
        Self::FolderLink {
            link,
            is_folder_link: true,
        }
    }

    pub fn is_folder_link(&self) -> bool {
        matches!(self, Self::FolderLink { .. })
    }

    /// Display name of the result, whichever variant it is.
    pub fn name(&self) -> &str {
        match self {
            Self::Document { record, .. } => &record.name,
            Self::FolderLink { link, .. } => &link.name,
        }
    }

    pub fn relevance(&self) -> Option<f64> {
        match self {
            Self::Document { relevance, .. } => Some(*relevance),
            Self::FolderLink { .. } => None,
        }
    }
}

/// A human-support request collected by the two-step form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportTicket {
    pub full_name: String,
    /// Always stored in `+7XXXXXXXXXX` form.
    pub phone: String,
    pub user_id: i64,
    pub username: Option<String>,
    pub original_query: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl SupportTicket {
    /// Render the staff-group notification text.
    pub fn render(&self) -> String {
        format!(
            "📩 Новая заявка:\n\n👤 ФИО: {}\n📱 Телефон: {}\n🆔 ID: {}\n🔗 @ {}\n\n❓ Вопрос: {}",
            self.full_name,
            self.phone,
            self.user_id,
            self.username.as_deref().unwrap_or("—"),
            self.original_query.as_deref().unwrap_or("Запрос не указан"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_record_tolerates_missing_norm_name() {
        let rec: DocumentRecord =
            serde_json::from_str(r#"{"name": "a.pdf", "path": "/docs/a.pdf"}"#).unwrap();
        assert_eq!(rec.norm_name, "");
    }

    #[test]
    fn search_result_json_carries_kind_and_flag() {
        let link = SearchResult::folder_link(FolderLink::new("Кабель", "https://example/folder"));
        let v = serde_json::to_value(&link).unwrap();
        assert_eq!(v["kind"], "folder_link");
        assert_eq!(v["is_folder_link"], true);

        let doc = SearchResult::document(
            DocumentRecord {
                name: "a.pdf".into(),
                path: "/docs/a.pdf".into(),
                norm_name: "a".into(),
            },
            4.5,
        );
        let v = serde_json::to_value(&doc).unwrap();
        assert_eq!(v["kind"], "document");
        assert_eq!(v["relevance"], 4.5);
    }
}
