use tree_sitter::{Node, Tree};

use crate::attachments;

/// Half-open byte range into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Method,
}

/// Visibility in ranking order. The placement of `Protected` after
/// `PackagePrivate` is long-standing policy and must not be "corrected" to
/// the conventional public/protected/package-private/private sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    PackagePrivate,
    Protected,
    Private,
}

impl Visibility {
    pub fn rank(self) -> u8 {
        match self {
            Visibility::Public => 0,
            Visibility::PackagePrivate => 1,
            Visibility::Protected => 2,
            Visibility::Private => 3,
        }
    }
}

/// A sortable class member: one field or one non-constructor method.
#[derive(Debug, Clone)]
pub struct Member {
    pub kind: MemberKind,
    /// Declared name; empty when the declaration is too broken to carry one.
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub has_annotation: bool,
    /// True when the nearest attached leading comment is a `/** ... */`
    /// documentation comment. Filled in from the attachment resolver.
    pub has_documentation: bool,
    /// Declared type text, fields only. Drives the list-demotion policy.
    pub type_text: Option<String>,
}

/// One direct child of the class body.
#[derive(Debug, Clone)]
pub enum ChildKind {
    Member(Member),
    /// Nested class/interface/enum/record/annotation declaration. Moved as a
    /// unit into the nested-classes group; its own body is sorted by the
    /// recursive pass.
    NestedType,
    Comment,
    /// Anything preserved in place: constructors, initializer blocks, stray
    /// semicolons.
    Other,
}

#[derive(Debug, Clone)]
pub struct ChildNode {
    pub kind: ChildKind,
    pub span: Span,
}

impl ChildNode {
    pub fn is_member(&self) -> bool {
        matches!(self.kind, ChildKind::Member(_))
    }

    pub fn member(&self) -> Option<&Member> {
        match &self.kind {
            ChildKind::Member(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind, ChildKind::Comment)
    }
}

/// Snapshot of the first class declaration in a file: its body span and the
/// ordered arena of body children. All reads happen against this snapshot
/// before any output text is produced; nothing here refers back into the
/// parse tree.
#[derive(Debug, Clone)]
pub struct ClassModel {
    pub name: String,
    pub class_span: Span,
    /// Span of the class body including both braces.
    pub body_span: Span,
    pub children: Vec<ChildNode>,
}

impl ClassModel {
    /// Build the model for the first top-level class declaration, or `None`
    /// when the file has no class.
    pub fn from_tree(tree: &Tree, source: &str) -> Option<ClassModel> {
        let root = tree.root_node();
        let mut cursor = root.walk();
        let class = root
            .children(&mut cursor)
            .find(|n| n.kind() == "class_declaration")?;
        let body = class.child_by_field_name("body")?;

        let name = class
            .child_by_field_name("name")
            .and_then(|n| n.utf8_text(source.as_bytes()).ok())
            .unwrap_or("")
            .to_string();

        let mut children = Vec::new();
        let mut body_cursor = body.walk();
        for child in body.children(&mut body_cursor) {
            let kind = match child.kind() {
                "{" | "}" => continue,
                "field_declaration" => ChildKind::Member(extract_field(child, source)),
                "method_declaration" => ChildKind::Member(extract_method(child, source)),
                "class_declaration"
                | "interface_declaration"
                | "enum_declaration"
                | "record_declaration"
                | "annotation_type_declaration" => ChildKind::NestedType,
                "line_comment" | "block_comment" => ChildKind::Comment,
                _ => ChildKind::Other,
            };
            children.push(ChildNode {
                kind,
                span: Span::new(child.start_byte(), child.end_byte()),
            });
        }

        let mut model = ClassModel {
            name,
            class_span: Span::new(class.start_byte(), class.end_byte()),
            body_span: Span::new(body.start_byte(), body.end_byte()),
            children,
        };

        let docs: Vec<bool> = (0..model.children.len())
            .map(|i| {
                if model.children[i].is_member() {
                    let run = attachments::resolve(&model.children, i);
                    attachments::run_has_documentation(&model.children, &run, source)
                } else {
                    false
                }
            })
            .collect();
        for (child, has_doc) in model.children.iter_mut().zip(docs) {
            if let ChildKind::Member(member) = &mut child.kind {
                member.has_documentation = has_doc;
            }
        }

        Some(model)
    }
}

/// Extend `offset` left to the start of its line when everything before it on
/// that line is indentation. Used to capture a member together with the
/// whitespace column it sits in.
pub fn extend_to_line_start(source: &str, offset: usize) -> usize {
    let line_start = source[..offset].rfind('\n').map(|i| i + 1).unwrap_or(0);
    if source[line_start..offset]
        .chars()
        .all(|c| c == ' ' || c == '\t')
    {
        line_start
    } else {
        offset
    }
}

fn node_text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

struct Modifiers {
    visibility: Visibility,
    is_static: bool,
    has_annotation: bool,
}

/// Walk the `modifiers` child of a declaration. A declaration with no
/// modifier list at all is package-private.
fn extract_modifiers(node: Node<'_>) -> Modifiers {
    let mut modifiers = Modifiers {
        visibility: Visibility::PackagePrivate,
        is_static: false,
        has_annotation: false,
    };

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.kind() != "modifiers" {
            continue;
        }
        let mut mod_cursor = child.walk();
        for modifier in child.children(&mut mod_cursor) {
            match modifier.kind() {
                "public" => modifiers.visibility = Visibility::Public,
                "protected" => modifiers.visibility = Visibility::Protected,
                "private" => modifiers.visibility = Visibility::Private,
                "static" => modifiers.is_static = true,
                "marker_annotation" | "annotation" => modifiers.has_annotation = true,
                _ => {}
            }
        }
    }

    modifiers
}

fn extract_field(node: Node<'_>, source: &str) -> Member {
    let modifiers = extract_modifiers(node);

    // A declaration can introduce several variables (`int x, y;`); the first
    // declarator names the member.
    let name = node
        .child_by_field_name("declarator")
        .and_then(|d| d.child_by_field_name("name"))
        .map(|n| node_text(n, source).to_string())
        .unwrap_or_default();

    let type_text = node
        .child_by_field_name("type")
        .map(|t| node_text(t, source).to_string());

    Member {
        kind: MemberKind::Field,
        name,
        visibility: modifiers.visibility,
        is_static: modifiers.is_static,
        has_annotation: modifiers.has_annotation,
        has_documentation: false,
        type_text,
    }
}

fn extract_method(node: Node<'_>, source: &str) -> Member {
    let modifiers = extract_modifiers(node);

    let name = node
        .child_by_field_name("name")
        .map(|n| node_text(n, source).to_string())
        .unwrap_or_default();

    Member {
        kind: MemberKind::Method,
        name,
        visibility: modifiers.visibility,
        is_static: modifiers.is_static,
        has_annotation: modifiers.has_annotation,
        has_documentation: false,
        type_text: None,
    }
}
