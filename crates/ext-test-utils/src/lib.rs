//! Shared test utilities for the extension-manager workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`doap`] - [`Doap`] builder for graph description documents
//! - [`tree`] - [`TestExtensions`] builder for an extension root on disk

pub mod doap;
pub mod tree;

pub use doap::Doap;
pub use tree::TestExtensions;
