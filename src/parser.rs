use anyhow::{Context, Result};
use tree_sitter::{Parser, Tree};

/// Thin wrapper around a tree-sitter parser configured for Java.
///
/// The parse tree is read-only input to the source model; all rewriting
/// happens as text manipulation keyed off node byte spans.
pub struct JavaParser {
    parser: Parser,
}

impl JavaParser {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_java::LANGUAGE.into())
            .context("Failed to load the Java grammar")?;
        Ok(Self { parser })
    }

    pub fn parse(&mut self, source: &str) -> Result<Tree> {
        self.parser
            .parse(source, None)
            .context("Failed to parse Java source")
    }
}
