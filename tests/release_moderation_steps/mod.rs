//! Step definitions for release moderation behaviour tests.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
