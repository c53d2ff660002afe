//! Board aggregate domain model.
//!
//! # Responsibility
//! - Define the board → column → task → sub-entity record graph.
//! - Own entity factories, update payloads and input validation.
//!
//! # Invariants
//! - Every entity is identified by a generated, immutable string id.
//! - Deletion is a hard delete of the owned subtree; there are no tombstones.

pub mod board;
pub mod ids;
pub mod member;
pub mod task;
pub mod validation;
