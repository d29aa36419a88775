//! Crossbuild sync library — the crossover namespace mirror.
//!
//! Copies the files realizing selected origin-runtime namespaces into a
//! destination tree, applying the in-source sentinel rewrite rules, with
//! content-idempotent writes so repeated passes are cheap no-ops.

pub mod error;
pub mod mirror;
pub mod resolver;
pub mod rewrite;
pub mod writer;

pub use error::SyncError;
pub use mirror::{copy_pinned, sync, NamespaceFile, SyncIssue, SyncReport};
pub use resolver::NamespaceSource;
pub use writer::WriteOutcome;
