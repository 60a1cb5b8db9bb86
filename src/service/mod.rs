//! Entity services pairing the store with the search index.

mod project;

pub use project::{ProjectService, CODE};
