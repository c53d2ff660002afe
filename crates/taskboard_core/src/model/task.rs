//! Task record and its owned sub-entities.
//!
//! # Responsibility
//! - Define the persisted task, comment, attachment and checklist shapes.
//! - Centralize construction so defaults are declared once.
//!
//! # Invariants
//! - A task lives in exactly one column; moving it never copies it.
//! - Sub-entity ids are unique within their owning task.
//! - Comment authors are snapshots, not live member references.

use crate::model::ids::{
    generate_id, AttachmentId, ChecklistItemId, CommentId, MemberId, TaskId, Timestamp,
    ATTACHMENT_ID_PREFIX, CHECKLIST_ITEM_ID_PREFIX, COMMENT_ID_PREFIX, TASK_ID_PREFIX,
};
use crate::model::member::{Label, Member};
use crate::model::validation::{normalize_name, require_text, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Task urgency. Serialized lowercase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    None,
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub assignees: Vec<Member>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Author snapshot captured when the comment is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentAuthor {
    pub id: MemberId,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub text: String,
    pub author: CommentAuthor,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: AttachmentId,
    pub name: String,
    /// Remote URL or inline `data:` URI.
    pub url: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Size in bytes.
    pub size: u64,
    pub uploaded_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: ChecklistItemId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

/// Create payload for a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub labels: Vec<Label>,
    pub assignees: Vec<Member>,
    pub due_date: Option<NaiveDate>,
    /// Text of checklist items seeded unchecked.
    pub checklist: Vec<String>,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Shallow-merge payload for a task. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub labels: Option<Vec<Label>>,
    pub assignees: Option<Vec<Member>>,
    /// `Some(None)` clears the due date.
    pub due_date: Option<Option<NaiveDate>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub text: String,
    pub author: CommentAuthor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttachment {
    pub name: String,
    pub url: String,
    pub mime_type: String,
    pub size: u64,
}

impl Task {
    pub fn create(data: NewTask, at: Timestamp) -> Result<Self, ValidationError> {
        let title = normalize_name("task", &data.title)?;
        let checklist = data
            .checklist
            .iter()
            .map(|text| ChecklistItem::create(text))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            id: generate_id(TASK_ID_PREFIX),
            title,
            description: data.description.unwrap_or_default(),
            priority: data.priority.unwrap_or_default(),
            labels: data.labels,
            assignees: data.assignees,
            due_date: data.due_date,
            attachments: Vec::new(),
            comments: Vec::new(),
            checklist,
            created_at: at,
            updated_at: at,
        })
    }

    /// Overlays the supplied fields and stamps `updated_at`.
    pub fn apply(&mut self, update: TaskUpdate, at: Timestamp) -> Result<(), ValidationError> {
        let title = update
            .title
            .map(|title| normalize_name("task", &title))
            .transpose()?;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(priority) = update.priority {
            self.priority = priority;
        }
        if let Some(labels) = update.labels {
            self.labels = labels;
        }
        if let Some(assignees) = update.assignees {
            self.assignees = assignees;
        }
        if let Some(due_date) = update.due_date {
            self.due_date = due_date;
        }
        self.updated_at = at;
        Ok(())
    }

    pub fn checklist_item_mut(&mut self, item_id: &str) -> Option<&mut ChecklistItem> {
        self.checklist.iter_mut().find(|item| item.id == item_id)
    }

    /// `(completed, total)` checklist counts.
    pub fn checklist_progress(&self) -> (usize, usize) {
        let done = self.checklist.iter().filter(|item| item.completed).count();
        (done, self.checklist.len())
    }
}

impl Comment {
    pub fn create(data: NewComment, at: Timestamp) -> Result<Self, ValidationError> {
        require_text("comment", &data.text)?;
        Ok(Self {
            id: generate_id(COMMENT_ID_PREFIX),
            text: data.text,
            author: data.author,
            created_at: at,
        })
    }
}

impl Attachment {
    pub fn create(data: NewAttachment, at: Timestamp) -> Result<Self, ValidationError> {
        let name = normalize_name("attachment", &data.name)?;
        Ok(Self {
            id: generate_id(ATTACHMENT_ID_PREFIX),
            name,
            url: data.url,
            mime_type: data.mime_type,
            size: data.size,
            uploaded_at: at,
        })
    }
}

impl ChecklistItem {
    pub fn create(text: &str) -> Result<Self, ValidationError> {
        require_text("checklist item", text)?;
        Ok(Self {
            id: generate_id(CHECKLIST_ITEM_ID_PREFIX),
            text: text.to_string(),
            completed: false,
        })
    }
}

impl From<&Member> for CommentAuthor {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id.clone(),
            name: member.name.clone(),
            avatar: member.avatar.clone(),
        }
    }
}
