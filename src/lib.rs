pub mod attachments;
pub mod class_model;
pub mod classifier;
pub mod file_handler;
pub mod organizer;
pub mod parser;
pub mod policy;
pub mod ranker;
pub mod selection;

use anyhow::{Context, Result};

pub use crate::organizer::{OrganizeResult, Organizer, Outcome};
pub use crate::policy::SortPolicy;
pub use crate::selection::Selection;

/// Reorder the members of the first class in `source` with the default
/// policy.
///
/// This is the main entry point for programmatic use of classort. The input
/// is never mutated; the returned source is the complete rewritten file (or
/// the input unchanged when the outcome is informational).
pub fn organize_java(source: &str) -> Result<OrganizeResult> {
    organize_java_with(source, &SortPolicy::default(), None)
}

/// Reorder members with an explicit policy, optionally restricted to the
/// members fully contained in `selection`.
pub fn organize_java_with(
    source: &str,
    policy: &SortPolicy,
    selection: Option<Selection>,
) -> Result<OrganizeResult> {
    Organizer::with_policy(policy.clone())
        .organize(source, selection)
        .context("Failed to reorganize class members")
}
