use crate::class_model::{Member, MemberKind};
use crate::policy::SortPolicy;

/// The five ordering buckets, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberGroup {
    StaticFields,
    PlainInstanceFields,
    AnnotatedInstanceFields,
    Methods,
    NestedClasses,
}

/// Fixed order in which non-empty groups are re-emitted.
pub const EMISSION_ORDER: [MemberGroup; 5] = [
    MemberGroup::StaticFields,
    MemberGroup::PlainInstanceFields,
    MemberGroup::AnnotatedInstanceFields,
    MemberGroup::Methods,
    MemberGroup::NestedClasses,
];

impl MemberGroup {
    pub fn index(self) -> usize {
        match self {
            MemberGroup::StaticFields => 0,
            MemberGroup::PlainInstanceFields => 1,
            MemberGroup::AnnotatedInstanceFields => 2,
            MemberGroup::Methods => 3,
            MemberGroup::NestedClasses => 4,
        }
    }

    /// Groups whose contents are ordered by the ranker. Nested classes keep
    /// their original relative order.
    pub fn is_sorted(self) -> bool {
        self != MemberGroup::NestedClasses
    }
}

/// Assign a member to its group. Rules are evaluated in order, so a static
/// annotated field lands in the static group when the policy says static
/// precedes the annotation split.
pub fn classify(member: &Member, policy: &SortPolicy) -> MemberGroup {
    match member.kind {
        MemberKind::Field => {
            if member.is_static && policy.static_precedes_annotated {
                MemberGroup::StaticFields
            } else if !member.has_annotation {
                MemberGroup::PlainInstanceFields
            } else {
                MemberGroup::AnnotatedInstanceFields
            }
        }
        MemberKind::Method => MemberGroup::Methods,
    }
}
