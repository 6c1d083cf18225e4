use crate::class_model::ChildNode;

/// The run of leading comments glued to a member.
///
/// Indices point into the class body's child list, in document order, and the
/// run ends exactly at the member it belongs to. Only whitespace separates
/// the run's comments from each other and from the member, which holds by
/// construction: consecutive body children have nothing but whitespace
/// between their spans.
#[derive(Debug, Clone, Default)]
pub struct AttachmentRun {
    pub indices: Vec<usize>,
}

impl AttachmentRun {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn first(&self) -> Option<usize> {
        self.indices.first().copied()
    }
}

/// Walk backward from the child at `idx`, collecting every consecutive
/// comment sibling. The walk stops at the first non-comment child or the
/// start of the body.
pub fn resolve(children: &[ChildNode], idx: usize) -> AttachmentRun {
    let mut indices = Vec::new();
    let mut i = idx;
    while i > 0 && children[i - 1].is_comment() {
        i -= 1;
        indices.push(i);
    }
    indices.reverse();
    AttachmentRun { indices }
}

/// True when the comment nearest to the member is a `/** ... */`
/// documentation comment.
pub fn run_has_documentation(children: &[ChildNode], run: &AttachmentRun, source: &str) -> bool {
    run.indices
        .last()
        .map(|&i| children[i].span.text(source).starts_with("/**"))
        .unwrap_or(false)
}
