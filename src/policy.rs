/// Configuration for the ordering and spacing behavior.
///
/// The historical revisions of this tool disagreed on three points: whether
/// list-typed fields rank below other fields, whether static fields form
/// their own group ahead of the annotation split, and whether documented or
/// annotated members get a trailing blank line. All three survive here as
/// explicit switches instead of separate code paths.
#[derive(Debug, Clone)]
pub struct SortPolicy {
    /// Rank list-typed fields below non-list fields of the same kind.
    pub demote_list_fields: bool,
    /// Pull static fields into their own leading group, even when annotated.
    /// When false, fields group by annotation presence alone.
    pub static_precedes_annotated: bool,
    /// Insert a blank line after members carrying leading documentation or
    /// (for fields) annotations.
    pub blank_line_after_doc_or_annotation: bool,
}

impl Default for SortPolicy {
    fn default() -> Self {
        Self {
            demote_list_fields: false,
            static_precedes_annotated: true,
            blank_line_after_doc_or_annotation: true,
        }
    }
}
