use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored student record: store-assigned identity and timestamps around
/// the free-form document fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: StudentFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The document fields of a student. Every field is optional and the store
/// accepts any subset; fields left out stay out of the stored document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mark: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_done_pr: Option<bool>,
}

/// Partial update for a student. Each field is tri-state: an omitted key
/// leaves the stored value alone, an explicit null clears it, and anything
/// else replaces it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPatch {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub name: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub group: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub photo: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub mark: Option<Option<i32>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub is_done_pr: Option<Option<bool>>,
}

impl StudentPatch {
    /// Folds the patch into a set of stored fields.
    pub fn apply(&self, fields: &mut StudentFields) {
        if let Some(name) = &self.name {
            fields.name = name.clone();
        }
        if let Some(group) = &self.group {
            fields.group = group.clone();
        }
        if let Some(photo) = &self.photo {
            fields.photo = photo.clone();
        }
        if let Some(mark) = self.mark {
            fields.mark = mark;
        }
        if let Some(is_done_pr) = self.is_done_pr {
            fields.is_done_pr = is_done_pr;
        }
    }
}

/// Outcome of a single-record delete.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResult {
    /// Whether the request reached the store.
    pub acknowledged: bool,
    pub deleted_count: u64,
}

/// Outcome of the bulk cleanup; callers are told the count only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupResult {
    pub deleted_count: u64,
}
