//! Member and label value records.
//!
//! Both are embedded by value inside boards and tasks. A copy never follows
//! later changes to the canonical record it was taken from.

use crate::model::ids::MemberId;
use serde::{Deserialize, Serialize};

/// Person snapshot referenced by boards (`members`) and tasks (`assignees`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub role: String,
}

impl Member {
    pub fn new(id: impl Into<MemberId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar: None,
            role: "member".to_string(),
        }
    }
}

/// Task label snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: String,
    pub name: String,
    pub color: String,
}
