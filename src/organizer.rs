use anyhow::Result;

use crate::attachments;
use crate::class_model::{extend_to_line_start, ChildKind, ClassModel, Member, MemberKind};
use crate::classifier::{self, MemberGroup, EMISSION_ORDER};
use crate::parser::JavaParser;
use crate::policy::SortPolicy;
use crate::ranker::MemberRanker;
use crate::selection::{self, Selection, SelectionMode};

/// Nested type bodies are sorted this many levels below the target class.
pub const MAX_NESTED_SORT_DEPTH: usize = 2;

/// What an invocation did, phrased for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Organized { fields: usize, methods: usize },
    SortedSelection { count: usize },
    NoClass,
    NoSortableElements,
    NoSelectionElements,
}

impl Outcome {
    pub fn message(&self) -> String {
        match self {
            Outcome::Organized { fields, methods } => format!(
                "Sorted {} elements: {} fields, {} methods",
                fields + methods,
                fields,
                methods
            ),
            Outcome::SortedSelection { count } => format!("Sorted {count} selected elements"),
            Outcome::NoClass => "No classes found in file".to_string(),
            Outcome::NoSortableElements => "No sortable elements found".to_string(),
            Outcome::NoSelectionElements => "No sortable elements in selection".to_string(),
        }
    }

    /// Precondition misses are reported, not raised as errors.
    pub fn is_informational(&self) -> bool {
        !matches!(
            self,
            Outcome::Organized { .. } | Outcome::SortedSelection { .. }
        )
    }
}

#[derive(Debug, Clone)]
pub struct OrganizeResult {
    pub source: String,
    pub outcome: Outcome,
}

/// A relocatable copy of one operand: its text chunk (leading attachments
/// plus the member itself, captured from the start of the first line) and
/// the ordering attributes needed after the original is gone.
struct Operand {
    child_idx: usize,
    chunk_start: usize,
    chunk: String,
    member: Option<Member>,
    trailing_blank: bool,
}

/// Reorders the members of the first class in a source file.
///
/// The pipeline is a pure text transformation: snapshot every movable chunk,
/// tombstone the originals, and emit the copies in canonical group order.
/// Nothing is written anywhere until the whole rewrite has succeeded, which
/// is what makes the operation all-or-nothing.
pub struct Organizer {
    policy: SortPolicy,
}

impl Default for Organizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Organizer {
    pub fn new() -> Self {
        Self {
            policy: SortPolicy::default(),
        }
    }

    pub fn with_policy(policy: SortPolicy) -> Self {
        Self { policy }
    }

    pub fn organize(&self, source: &str, selection: Option<Selection>) -> Result<OrganizeResult> {
        self.organize_at_depth(source, selection, 0)
    }

    fn organize_at_depth(
        &self,
        source: &str,
        selection: Option<Selection>,
        depth: usize,
    ) -> Result<OrganizeResult> {
        let mut parser = JavaParser::new()?;
        let tree = parser.parse(source)?;
        let Some(model) = ClassModel::from_tree(&tree, source) else {
            return Ok(OrganizeResult {
                source: source.to_string(),
                outcome: Outcome::NoClass,
            });
        };

        match selection::validate(selection, &model) {
            SelectionMode::WholeClass => self.organize_whole_class(source, &model, depth),
            SelectionMode::Subset(indices) => self.organize_selection(source, &model, &indices),
            SelectionMode::Empty => Ok(OrganizeResult {
                source: source.to_string(),
                outcome: Outcome::NoSelectionElements,
            }),
        }
    }

    /// Whole-class path: partition into groups, sort within each, and rebuild
    /// the class body with canonical spacing. Non-operand children
    /// (constructors, initializer blocks, unattached comments) are preserved
    /// around the sorted block.
    fn organize_whole_class(
        &self,
        source: &str,
        model: &ClassModel,
        depth: usize,
    ) -> Result<OrganizeResult> {
        let children = &model.children;

        let field_count = children
            .iter()
            .filter(|c| matches!(c.member(), Some(m) if m.kind == MemberKind::Field))
            .count();
        let method_count = children
            .iter()
            .filter(|c| matches!(c.member(), Some(m) if m.kind == MemberKind::Method))
            .count();
        if field_count + method_count == 0 {
            return Ok(OrganizeResult {
                source: source.to_string(),
                outcome: Outcome::NoSortableElements,
            });
        }

        // Snapshot every chunk before anything is considered removed. The
        // copies are plain strings; tombstoned originals are never read again.
        let mut attached = vec![false; children.len()];
        let mut is_operand = vec![false; children.len()];
        let mut operands: Vec<Operand> = Vec::new();
        for (idx, child) in children.iter().enumerate() {
            let (member, is_nested) = match &child.kind {
                ChildKind::Member(m) => (Some(m.clone()), false),
                ChildKind::NestedType => (None, true),
                _ => continue,
            };
            is_operand[idx] = true;

            let run = attachments::resolve(children, idx);
            for &comment_idx in &run.indices {
                attached[comment_idx] = true;
            }
            let first_start = run
                .first()
                .map(|i| children[i].span.start)
                .unwrap_or(child.span.start);
            let chunk_start = extend_to_line_start(source, first_start);

            let chunk = if is_nested && depth < MAX_NESTED_SORT_DEPTH {
                // Sort the nested body independently before capturing it.
                let prefix = &source[chunk_start..child.span.start];
                let nested = self.organize_at_depth(child.span.text(source), None, depth + 1)?;
                format!("{prefix}{}", nested.source)
            } else {
                source[chunk_start..child.span.end].to_string()
            };

            let has_doc = attachments::run_has_documentation(children, &run, source);
            let trailing_blank = self.policy.blank_line_after_doc_or_annotation
                && match &member {
                    Some(m) => {
                        m.has_documentation
                            || (m.kind == MemberKind::Field && m.has_annotation)
                    }
                    None => has_doc,
                };

            operands.push(Operand {
                child_idx: idx,
                chunk_start,
                chunk,
                member,
                trailing_blank,
            });
        }

        let mut groups: [Vec<usize>; 5] = Default::default();
        for (oi, operand) in operands.iter().enumerate() {
            let group = match &operand.member {
                Some(member) => classifier::classify(member, &self.policy),
                None => MemberGroup::NestedClasses,
            };
            groups[group.index()].push(oi);
        }

        let ranker = MemberRanker::new(self.policy.clone());
        for group in EMISSION_ORDER {
            if !group.is_sorted() {
                continue;
            }
            groups[group.index()].sort_by(|&a, &b| {
                match (&operands[a].member, &operands[b].member) {
                    (Some(x), Some(y)) => ranker.compare(x, y),
                    _ => std::cmp::Ordering::Equal,
                }
            });
        }

        // Everything before the first operand's chunk is untouched preserved
        // text; the sorted block is inserted where that chunk began.
        let anchor_idx = operands[0].child_idx;
        let anchor_chunk_start = operands[0].chunk_start;
        let open_end = model.body_span.start + 1;

        let mut body = String::new();
        let pre = source[open_end..anchor_chunk_start].trim_end();
        let has_pre = !pre.trim_start().is_empty();
        if has_pre {
            body.push_str(pre);
        }

        let mut first_item = true;
        let mut prev_group: Option<usize> = None;
        let mut pending_blank = false;
        for group in EMISSION_ORDER {
            for &oi in &groups[group.index()] {
                let separator = if first_item {
                    if has_pre {
                        "\n\n"
                    } else {
                        "\n"
                    }
                } else if prev_group != Some(group.index()) || pending_blank {
                    "\n\n"
                } else {
                    "\n"
                };
                body.push_str(separator);
                body.push_str(&operands[oi].chunk);
                pending_blank = operands[oi].trailing_blank;
                prev_group = Some(group.index());
                first_item = false;
            }
        }

        // Preserved children after the anchor follow the block, keeping their
        // relative order; original blank-line separation survives collapsed
        // to at most one blank line.
        for (idx, child) in children.iter().enumerate() {
            if idx < anchor_idx || is_operand[idx] || attached[idx] {
                continue;
            }
            let kept_start = extend_to_line_start(source, child.span.start);
            let prev_end = if idx == 0 {
                open_end
            } else {
                children[idx - 1].span.end
            };
            let had_blank = source[prev_end.min(kept_start)..kept_start]
                .matches('\n')
                .count()
                >= 2;
            let separator = if pending_blank || had_blank { "\n\n" } else { "\n" };
            body.push_str(separator);
            body.push_str(&source[kept_start..child.span.end]);
            pending_blank = false;
        }

        if pending_blank {
            body.push('\n');
        }

        let close_start = model.body_span.end - 1;
        let close_line_start = source[..close_start].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let close_prefix = &source[close_line_start..close_start];
        let close_indent = if close_prefix.chars().all(|c| c == ' ' || c == '\t') {
            close_prefix
        } else {
            ""
        };

        let mut out = String::with_capacity(source.len() + 16);
        out.push_str(&source[..open_end]);
        out.push_str(&body);
        out.push('\n');
        out.push_str(close_indent);
        out.push('}');
        out.push_str(&source[model.body_span.end..]);

        Ok(OrganizeResult {
            source: out,
            outcome: Outcome::Organized {
                fields: field_count,
                methods: method_count,
            },
        })
    }

    /// Selection path: sort only the contained members, with no group
    /// partitioning, and splice them back over the first removed position.
    /// Text outside the affected lines is byte-identical afterwards.
    fn organize_selection(
        &self,
        source: &str,
        model: &ClassModel,
        indices: &[usize],
    ) -> Result<OrganizeResult> {
        let children = &model.children;

        struct SelectedChunk {
            chunk_start: usize,
            delete_end: usize,
            chunk: String,
            member: Member,
        }

        let mut selected: Vec<SelectedChunk> = Vec::new();
        for &idx in indices {
            let Some(member) = children[idx].member() else {
                continue;
            };
            let run = attachments::resolve(children, idx);
            let first_start = run
                .first()
                .map(|i| children[i].span.start)
                .unwrap_or(children[idx].span.start);
            let chunk_start = extend_to_line_start(source, first_start);
            let delete_end = consume_line_end(source, children[idx].span.end);
            selected.push(SelectedChunk {
                chunk_start,
                delete_end,
                chunk: source[chunk_start..children[idx].span.end].to_string(),
                member: member.clone(),
            });
        }

        let ranker = MemberRanker::new(self.policy.clone());
        let mut order: Vec<usize> = (0..selected.len()).collect();
        order.sort_by(|&a, &b| ranker.compare(&selected[a].member, &selected[b].member));

        // Delete in descending start order so earlier offsets stay valid.
        let mut out = source.to_string();
        for chunk in selected.iter().rev() {
            out.replace_range(chunk.chunk_start..chunk.delete_end, "");
        }

        let anchor = selected[0].chunk_start;
        let mut block = order
            .iter()
            .map(|&i| selected[i].chunk.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        if selected[0].delete_end > selected[0].chunk_start
            && source[..selected[0].delete_end].ends_with('\n')
        {
            block.push('\n');
        }
        out.insert_str(anchor, &block);

        Ok(OrganizeResult {
            source: out,
            outcome: Outcome::SortedSelection {
                count: selected.len(),
            },
        })
    }
}

/// Extend a member's end past trailing spaces and its line break, so removing
/// the member removes the whole line. Lines that still carry other content
/// are left alone.
fn consume_line_end(source: &str, end: usize) -> usize {
    let bytes = source.as_bytes();
    let mut i = end;
    while i < bytes.len() && (bytes[i] == b' ' || bytes[i] == b'\t') {
        i += 1;
    }
    if i + 1 < bytes.len() && bytes[i] == b'\r' && bytes[i + 1] == b'\n' {
        return i + 2;
    }
    if i < bytes.len() && bytes[i] == b'\n' {
        return i + 1;
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn organize(source: &str) -> OrganizeResult {
        Organizer::new().organize(source, None).unwrap()
    }

    #[test]
    fn test_empty_class_is_untouched() {
        let source = "class Empty {\n}\n";
        let result = organize(source);
        assert_eq!(result.outcome, Outcome::NoSortableElements);
        assert_eq!(result.source, source);
    }

    #[test]
    fn test_no_class_is_untouched() {
        let source = "package com.example;\n";
        let result = organize(source);
        assert_eq!(result.outcome, Outcome::NoClass);
        assert_eq!(result.source, source);
    }

    #[test]
    fn test_fields_sort_by_visibility_then_name() {
        let source = "class C {\n    private int b;\n    public String a;\n}\n";
        let result = organize(source);
        assert_eq!(
            result.source,
            "class C {\n    public String a;\n    private int b;\n}\n"
        );
        assert_eq!(
            result.outcome,
            Outcome::Organized {
                fields: 2,
                methods: 0
            }
        );
    }

    #[test]
    fn test_static_fields_form_leading_group() {
        let source =
            "class C {\n    private int b;\n    public String a;\n    public static int C;\n}\n";
        let result = organize(source);
        assert_eq!(
            result.source,
            "class C {\n    public static int C;\n\n    public String a;\n    private int b;\n}\n"
        );
    }

    #[test]
    fn test_plain_fields_precede_annotated_fields() {
        let source =
            "class C {\n    @Deprecated\n    public String note;\n    public int count;\n}\n";
        let result = organize(source);
        assert_eq!(
            result.source,
            "class C {\n    public int count;\n\n    @Deprecated\n    public String note;\n\n}\n"
        );
    }

    #[test]
    fn test_attached_comment_travels_with_member() {
        let source = "class C {\n    int b;\n    /** About a. */\n    int a;\n}\n";
        let result = organize(source);
        assert_eq!(
            result.source,
            "class C {\n    /** About a. */\n    int a;\n\n    int b;\n}\n"
        );
    }

    #[test]
    fn test_constructor_is_not_moved() {
        let source = "class C {\n    C() {}\n    int b;\n    int a;\n}\n";
        let result = organize(source);
        assert_eq!(
            result.source,
            "class C {\n    C() {}\n\n    int a;\n    int b;\n}\n"
        );
    }

    #[test]
    fn test_idempotent_on_sorted_input() {
        let source = "class C {\n    public static int A;\n\n    public int b;\n    private int c;\n\n    void m() {}\n}\n";
        let first = organize(source);
        let second = organize(&first.source);
        assert_eq!(first.source, second.source);
    }

    #[test]
    fn test_selection_sorts_only_contained_members() {
        let source = "class C {\n    int z;\n    int b;\n    int a;\n}\n";
        let start = source.find("int b").unwrap();
        let end = source.find("int a").unwrap() + "int a;".len();
        let result = Organizer::new()
            .organize(source, Some(Selection::new(start, end)))
            .unwrap();
        assert_eq!(result.outcome, Outcome::SortedSelection { count: 2 });
        assert_eq!(
            result.source,
            "class C {\n    int z;\n    int a;\n    int b;\n}\n"
        );
    }

    #[test]
    fn test_selection_without_members_reports_and_keeps_source() {
        let source = "class C {\n    int z;\n}\n";
        let result = Organizer::new()
            .organize(source, Some(Selection::new(0, 8)))
            .unwrap();
        assert_eq!(result.outcome, Outcome::NoSelectionElements);
        assert_eq!(result.source, source);
    }

    #[test]
    fn test_outcome_messages() {
        assert_eq!(
            Outcome::Organized {
                fields: 3,
                methods: 2
            }
            .message(),
            "Sorted 5 elements: 3 fields, 2 methods"
        );
        assert_eq!(
            Outcome::SortedSelection { count: 2 }.message(),
            "Sorted 2 selected elements"
        );
        assert!(Outcome::NoClass.is_informational());
        assert!(Outcome::NoSortableElements.is_informational());
        assert!(!Outcome::Organized {
            fields: 1,
            methods: 0
        }
        .is_informational());
    }

    #[test]
    fn test_consume_line_end() {
        let source = "int x;  \nint y;";
        assert_eq!(consume_line_end(source, 6), 9);
        // Content after the member on the same line blocks consumption.
        let inline = "int x; }";
        assert_eq!(consume_line_end(inline, 6), 6);
    }
}
