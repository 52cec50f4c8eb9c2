use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Entity, ItemId, Owned, UserId};

/// Catalog item owned by the user who created it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id: ItemId,
    owner_id: UserId,
    title: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Input for creating an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub title: String,
    pub description: Option<String>,
}

/// Full replacement of an item's editable fields.
///
/// `description: None` keeps the current description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemChanges {
    pub title: String,
    pub description: Option<String>,
}

fn validate_title(title: &str) -> DomainResult<()> {
    if title.trim().is_empty() {
        return Err(DomainError::invalid_argument("title is required"));
    }
    Ok(())
}

impl Item {
    pub fn create(
        id: ItemId,
        owner_id: UserId,
        draft: ItemDraft,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        validate_title(&draft.title)?;
        Ok(Self {
            id,
            owner_id,
            title: draft.title,
            description: draft.description.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply an edit. Validation happens before any field is touched.
    pub fn apply_changes(&mut self, changes: ItemChanges, now: DateTime<Utc>) -> DomainResult<()> {
        validate_title(&changes.title)?;
        self.title = changes.title;
        if let Some(description) = changes.description {
            self.description = description;
        }
        self.updated_at = now;
        Ok(())
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Entity for Item {
    type Id = ItemId;
    const KIND: &'static str = "item";

    fn id(&self) -> ItemId {
        self.id
    }
}

impl Owned for Item {
    fn owner_id(&self) -> UserId {
        self.owner_id
    }
}
