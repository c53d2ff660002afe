//! Repository layer over the JSON key-value store.
//!
//! # Responsibility
//! - Define use-case oriented access to the board aggregate.
//! - Keep read-modify-write and persistence details inside one boundary.
//!
//! # Invariants
//! - The whole board collection is the unit of durability.
//! - Repository APIs return semantic errors (`*NotFound`, `Validation`) in
//!   addition to storage failures, and never write on error.

pub mod board_repo;
pub mod task_repo;
