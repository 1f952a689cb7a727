//! Release submission and moderation lifecycle.
//!
//! Artists author releases (metadata, a cover, and an ordered track list),
//! submit them for moderation, and fix and resubmit them after a fixable
//! rejection. Managers and directors review pending releases. Approved
//! releases may be pitched for playlist promotion. The module follows
//! hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
