//! Prelude module for datelist_widget crate.
//!
//! Re-exports commonly used derive macros from derive_more.

pub use derive_more::{Deref, Display};
