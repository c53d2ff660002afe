//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep UI-level event sources (drag gestures) decoupled from storage.

pub mod board_service;
