//! Labeldesk: release submission and moderation for a music label.
//!
//! This crate provides the core lifecycle for music releases: authoring
//! drafts with a cover and an ordered track list, submitting them for
//! moderation, recording review decisions, resubmitting fixable rejections,
//! and pitching approved releases for promotion.
//!
//! # Architecture
//!
//! Labeldesk follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for storage, uploads, and
//!   notifications
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`release`]: Release lifecycle, track ordering, and the pitching gate

pub mod release;
