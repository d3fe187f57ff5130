//! Shared service test infrastructure.

pub mod helpers;

pub use context::TestContext;
