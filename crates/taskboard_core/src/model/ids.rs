//! Identity and timestamp helpers shared by every entity factory.
//!
//! # Responsibility
//! - Generate prefixed, practically unique string ids.
//! - Provide the single clock used for `createdAt`/`updatedAt` stamps.
//!
//! # Invariants
//! - Generated ids have the shape `<prefix>_<base36 millis><9 hex chars>`.
//! - Ids are unique within a session in practice, not guaranteed globally.

use chrono::{DateTime, Utc};
use uuid::Uuid;

pub type BoardId = String;
pub type ColumnId = String;
pub type TaskId = String;
pub type CommentId = String;
pub type AttachmentId = String;
pub type ChecklistItemId = String;
pub type MemberId = String;

/// UTC instant serialized as RFC 3339.
pub type Timestamp = DateTime<Utc>;

pub const BOARD_ID_PREFIX: &str = "board";
pub const COLUMN_ID_PREFIX: &str = "col";
pub const TASK_ID_PREFIX: &str = "task";
pub const COMMENT_ID_PREFIX: &str = "comment";
pub const ATTACHMENT_ID_PREFIX: &str = "attachment";
pub const CHECKLIST_ITEM_ID_PREFIX: &str = "item";

const ENTROPY_CHARS: usize = 9;

/// Returns the current instant.
pub fn now() -> Timestamp {
    Utc::now()
}

/// Generates a new id from wall-clock millis plus random entropy.
pub fn generate_id(prefix: &str) -> String {
    let millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
    let entropy = Uuid::new_v4().simple().to_string();
    format!(
        "{prefix}_{}{}",
        to_base36(millis),
        &entropy[..ENTROPY_CHARS]
    )
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::{generate_id, to_base36, TASK_ID_PREFIX};
    use std::collections::HashSet;

    #[test]
    fn base36_encodes_known_values() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn generated_ids_carry_prefix() {
        let id = generate_id(TASK_ID_PREFIX);
        assert!(id.starts_with("task_"));
        assert!(id.len() > "task_".len() + 9);
    }

    #[test]
    fn generated_ids_do_not_repeat_in_a_burst() {
        let ids: HashSet<_> = (0..1000).map(|_| generate_id("col")).collect();
        assert_eq!(ids.len(), 1000);
    }
}
