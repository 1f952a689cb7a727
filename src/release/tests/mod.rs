//! Unit tests for the release lifecycle module.
