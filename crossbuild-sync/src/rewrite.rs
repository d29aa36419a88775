//! In-source sentinel markers and the mirroring-time rewrite rules.
//!
//! Both sentinels are comment-shaped literals with no meaning to either
//! runtime on their own:
//!
//! - [`MACRO_FILE_SENTINEL`] anywhere in a file body means the file exists
//!   for the origin runtime only and must never be mirrored.
//! - [`STRIP_SENTINEL`] is deleted verbatim from the mirrored copy, letting
//!   one line be lexically valid in both runtimes, e.g.
//!   `(:require;*crossbuild-remove*;-macros [x])` mirrors as
//!   `(:require-macros [x])`.

/// Marks a file as origin-runtime-only; such files are never mirrored.
pub const MACRO_FILE_SENTINEL: &str = ";*crossbuild-macro-file*;";

/// Deleted verbatim from mirrored copies; the origin file is untouched.
pub const STRIP_SENTINEL: &str = ";*crossbuild-remove*;";

/// Whether a file body opts out of mirroring entirely.
pub fn is_macro_only(content: &str) -> bool {
    content.contains(MACRO_FILE_SENTINEL)
}

/// Delete every occurrence of the strip sentinel, byte-for-byte.
///
/// No surrounding-whitespace normalization: everything other than the
/// sentinel token itself passes through unchanged.
pub fn strip_removals(content: &str) -> String {
    content.replace(STRIP_SENTINEL, "")
}
