use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};

/// Hosted auth provider account object.
///
/// The backend returns this under the `user` field. We keep it flexible to
/// avoid breaking when provider fields evolve.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub(crate) struct AccountInfo {
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

/// Fixed category set shared by the sidebar and the editor dropdown.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Display, EnumIter, EnumString,
)]
pub(crate) enum Category {
    Work,
    Personal,
    Ideas,
    Research,
    Meeting,
}

/// Server-owned note record, cached client-side.
///
/// `id` and `created_at` are assigned by the backend and never change.
/// `pinned` is the only field the client mutates in place (optimistically);
/// everything else is replaced wholesale by reloads.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct Note {
    #[serde(rename = "_id")]
    pub id: String,

    pub title: String,

    pub content: String,

    /// Absent or unrecognized category strings mean "uncategorized".
    #[serde(default, deserialize_with = "lenient_category")]
    pub category: Option<Category>,

    #[serde(rename = "createdAt", default)]
    pub created_at: String,

    /// Older records predate pinning and omit the field entirely.
    #[serde(default)]
    pub pinned: bool,

    /// AI-generated synopsis, set at creation or update time.
    #[serde(default)]
    pub summary: Option<String>,
}

fn lenient_category<'de, D>(de: D) -> Result<Option<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(de)?;
    Ok(raw.and_then(|s| Category::from_str(s.trim()).ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_note_contract_deserialize() {
        // Contract based on the notes backend: GET /api/notes items.
        let json = r#"{
            "_id": "665f1c2ab8d4",
            "title": "Launch checklist",
            "content": "ship it",
            "category": "Work",
            "createdAt": "2024-01-15T09:30:00.000Z",
            "pinned": true,
            "summary": "A checklist."
        }"#;
        let n: Note = serde_json::from_str(json).expect("note should parse");
        assert_eq!(n.id, "665f1c2ab8d4");
        assert_eq!(n.category, Some(Category::Work));
        assert!(n.pinned);
        assert_eq!(n.summary.as_deref(), Some("A checklist."));
    }

    #[test]
    fn test_note_missing_pinned_defaults_false() {
        let json = r#"{
            "_id": "a1",
            "title": "Trip",
            "content": "beach",
            "category": "Personal",
            "createdAt": "2024-02-01T00:00:00.000Z"
        }"#;
        let n: Note = serde_json::from_str(json).expect("note should parse");
        assert!(!n.pinned);
        assert!(n.summary.is_none());
    }

    #[test]
    fn test_note_unknown_category_is_uncategorized() {
        let json = r#"{
            "_id": "a2",
            "title": "t",
            "content": "c",
            "category": "Groceries",
            "createdAt": ""
        }"#;
        let n: Note = serde_json::from_str(json).expect("note should parse");
        assert_eq!(n.category, None);
    }

    #[test]
    fn test_note_null_category_is_uncategorized() {
        let json = r#"{"_id": "a3", "title": "t", "content": "c", "category": null}"#;
        let n: Note = serde_json::from_str(json).expect("note should parse");
        assert_eq!(n.category, None);
        assert_eq!(n.created_at, "");
    }

    #[test]
    fn test_category_display_and_parse_round_trip() {
        for c in Category::iter() {
            let parsed = Category::from_str(&c.to_string()).expect("should parse own display");
            assert_eq!(parsed, c);
        }
    }

    #[test]
    fn test_category_set_is_fixed() {
        assert_eq!(Category::iter().count(), 5);
    }
}
