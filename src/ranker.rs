use std::cmp::Ordering;

use crate::class_model::{Member, MemberKind};
use crate::policy::SortPolicy;

/// Container names that mark a field as list-typed for the demotion policy.
const LIST_TYPES: [&str; 5] = ["List", "ArrayList", "LinkedList", "Vector", "Stack"];

/// Total, stable comparator over class members.
///
/// Keys, each consulted only when the previous one ties: kind (fields before
/// methods), optional list-type demotion, static before non-static,
/// visibility, then case-insensitive name. Ties beyond that are left to the
/// caller's stable sort, so equal members keep their input order.
pub struct MemberRanker {
    policy: SortPolicy,
}

impl MemberRanker {
    pub fn new(policy: SortPolicy) -> Self {
        Self { policy }
    }

    pub fn compare(&self, a: &Member, b: &Member) -> Ordering {
        compare_by_kind(a, b)
            .then_with(|| {
                if self.policy.demote_list_fields {
                    compare_by_list_demotion(a, b)
                } else {
                    Ordering::Equal
                }
            })
            .then_with(|| compare_by_static(a, b))
            .then_with(|| compare_by_visibility(a, b))
            .then_with(|| compare_by_name(a, b))
    }
}

fn compare_by_kind(a: &Member, b: &Member) -> Ordering {
    let rank = |m: &Member| match m.kind {
        MemberKind::Field => 0,
        MemberKind::Method => 1,
    };
    rank(a).cmp(&rank(b))
}

fn compare_by_list_demotion(a: &Member, b: &Member) -> Ordering {
    is_list_member(a).cmp(&is_list_member(b))
}

fn compare_by_static(a: &Member, b: &Member) -> Ordering {
    // Static members first.
    let rank = |m: &Member| if m.is_static { 0 } else { 1 };
    rank(a).cmp(&rank(b))
}

fn compare_by_visibility(a: &Member, b: &Member) -> Ordering {
    a.visibility.rank().cmp(&b.visibility.rank())
}

fn compare_by_name(a: &Member, b: &Member) -> Ordering {
    a.name.to_lowercase().cmp(&b.name.to_lowercase())
}

fn is_list_member(member: &Member) -> bool {
    member
        .type_text
        .as_deref()
        .map(is_list_type)
        .unwrap_or(false)
}

/// Textual list-type detection: a known container name, optionally
/// `java.util.`-qualified, or a `List<` segment inside a generic type.
pub fn is_list_type(type_text: &str) -> bool {
    let trimmed = type_text.trim();
    let base = trimmed.strip_prefix("java.util.").unwrap_or(trimmed);
    LIST_TYPES
        .iter()
        .any(|t| base == *t || base.starts_with(&format!("{t}<")))
        || trimmed.contains("List<")
}
