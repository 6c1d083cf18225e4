use anyhow::{bail, Context, Result};

use crate::class_model::ClassModel;

/// Half-open byte range of the user's selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Parse the CLI form `START:END`.
    pub fn parse(text: &str) -> Result<Self> {
        let (start, end) = text
            .split_once(':')
            .context("Selection must have the form START:END")?;
        let start: usize = start
            .trim()
            .parse()
            .context("Selection start is not a byte offset")?;
        let end: usize = end
            .trim()
            .parse()
            .context("Selection end is not a byte offset")?;
        if start > end {
            bail!("Selection start {start} is past its end {end}");
        }
        Ok(Self { start, end })
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    fn contains(&self, start: usize, end: usize) -> bool {
        self.start <= start && end <= self.end
    }
}

/// How an invocation operates on the class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionMode {
    WholeClass,
    /// Child indices of the fully contained members, in document order.
    Subset(Vec<usize>),
    /// A real selection that contains no complete member.
    Empty,
}

/// Decide the operating mode for an optional selection.
///
/// Members partially overlapping the range are silently excluded rather than
/// truncated; if nothing is fully contained the operation reports and does
/// nothing. A collapsed selection behaves like no selection at all.
pub fn validate(selection: Option<Selection>, model: &ClassModel) -> SelectionMode {
    let selection = match selection {
        Some(s) if !s.is_collapsed() => s,
        _ => return SelectionMode::WholeClass,
    };

    let contained: Vec<usize> = model
        .children
        .iter()
        .enumerate()
        .filter(|(_, child)| child.is_member())
        .filter(|(_, child)| selection.contains(child.span.start, child.span.end))
        .map(|(i, _)| i)
        .collect();

    if contained.is_empty() {
        SelectionMode::Empty
    } else {
        SelectionMode::Subset(contained)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::JavaParser;

    fn model_for(source: &str) -> ClassModel {
        let mut parser = JavaParser::new().unwrap();
        let tree = parser.parse(source).unwrap();
        ClassModel::from_tree(&tree, source).unwrap()
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(Selection::parse("10:20").unwrap(), Selection::new(10, 20));
        assert_eq!(Selection::parse(" 0 : 5 ").unwrap(), Selection::new(0, 5));
        assert!(Selection::parse("20:10").is_err());
        assert!(Selection::parse("10").is_err());
        assert!(Selection::parse("a:b").is_err());
    }

    #[test]
    fn test_no_selection_is_whole_class() {
        let model = model_for("class C { int x; }");
        assert_eq!(validate(None, &model), SelectionMode::WholeClass);
    }

    #[test]
    fn test_collapsed_selection_is_whole_class() {
        let model = model_for("class C { int x; }");
        let caret = Some(Selection::new(12, 12));
        assert_eq!(validate(caret, &model), SelectionMode::WholeClass);
    }

    #[test]
    fn test_fully_contained_members_are_selected() {
        let source = "class C {\n    int b;\n    int a;\n    int z;\n}";
        let model = model_for(source);
        let start = source.find("int b").unwrap();
        let end = source.find("int a").unwrap() + "int a;".len();
        let mode = validate(Some(Selection::new(start, end)), &model);
        assert_eq!(mode, SelectionMode::Subset(vec![0, 1]));
    }

    #[test]
    fn test_partially_overlapping_member_is_excluded() {
        let source = "class C {\n    int b;\n    int a;\n}";
        let model = model_for(source);
        let start = source.find("int b").unwrap();
        // Range ends in the middle of `int a;`.
        let end = source.find("int a").unwrap() + 3;
        let mode = validate(Some(Selection::new(start, end)), &model);
        assert_eq!(mode, SelectionMode::Subset(vec![0]));
    }

    #[test]
    fn test_selection_without_members_is_empty() {
        let source = "class C {\n    int b;\n}";
        let model = model_for(source);
        // Only the opening brace region is selected.
        let mode = validate(Some(Selection::new(0, 9)), &model);
        assert_eq!(mode, SelectionMode::Empty);
    }

    #[test]
    fn test_nested_types_are_not_selectable() {
        let source = "class C {\n    class Inner {}\n    int a;\n}";
        let model = model_for(source);
        let mode = validate(Some(Selection::new(0, source.len())), &model);
        assert_eq!(mode, SelectionMode::Subset(vec![1]));
    }
}
