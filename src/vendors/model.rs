//! Vendor records and query filters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A business partner record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vendor {
    pub fn new(input: VendorInput, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: input.name,
            email: input.email,
            tags: input.tags,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the editable fields, keeping identity and creation time.
    pub fn apply(&mut self, input: VendorInput, now: DateTime<Utc>) {
        self.name = input.name;
        self.email = input.email;
        self.tags = input.tags;
        self.updated_at = now;
    }
}

/// Validated create/update payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorInput {
    pub name: String,
    pub email: String,
    pub tags: Vec<String>,
}

/// List filter from `?search=&tag=`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VendorFilter {
    pub search: Option<String>,
    pub tag: Option<String>,
}

impl VendorFilter {
    /// Name or email contains `search` (case-insensitive) and tags contain
    /// `tag` exactly. Blank criteria are ignored.
    pub fn matches(&self, vendor: &Vendor) -> bool {
        let search_ok = match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                vendor.name.to_lowercase().contains(&term)
                    || vendor.email.to_lowercase().contains(&term)
            }
            _ => true,
        };

        let tag_ok = match self.tag.as_deref().map(str::trim) {
            Some(tag) if !tag.is_empty() => vendor.tags.iter().any(|t| t == tag),
            _ => true,
        };

        search_ok && tag_ok
    }
}
