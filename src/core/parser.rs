//! Declaration-level Go parsing.
//!
//! Extracts file-scope declarations only: functions, methods, types, vars,
//! consts. Declarations nested inside function bodies are not indexed. A
//! file whose tree contains syntax errors contributes zero symbols and the
//! scan continues with its siblings.

use super::types::{Symbol, SymbolKind};
use std::path::Path;
use tree_sitter::{Node, Parser};

/// Reusable Go parser. One instance per scan; not shared across threads.
pub struct SourceParser {
    parser: Parser,
}

impl SourceParser {
    pub fn new() -> Result<Self, String> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .map_err(|e| format!("go grammar unavailable: {}", e))?;
        Ok(SourceParser { parser })
    }

    /// Parse a file from disk. None means the file is unreadable or
    /// malformed and contributes no symbols.
    pub fn parse_file(&mut self, path: &Path) -> Option<Vec<Symbol>> {
        let source = std::fs::read_to_string(path).ok()?;
        self.parse_source(path, &source)
    }

    /// Extract file-scope declarations from source text.
    pub fn parse_source(&mut self, path: &Path, source: &str) -> Option<Vec<Symbol>> {
        let tree = self.parser.parse(source, None)?;
        let root = tree.root_node();
        if root.has_error() {
            return None;
        }

        let mut symbols = Vec::new();
        let mut cursor = root.walk();
        for decl in root.named_children(&mut cursor) {
            match decl.kind() {
                "function_declaration" => {
                    if let Some(name) = decl.child_by_field_name("name") {
                        symbols.push(symbol_at(path, source, name, SymbolKind::Function));
                    }
                }
                "method_declaration" => {
                    if let Some(name) = decl.child_by_field_name("name") {
                        symbols.push(symbol_at(path, source, name, SymbolKind::Method));
                    }
                }
                "type_declaration" => {
                    // type_spec and type_alias both carry a name field.
                    let mut specs = decl.walk();
                    for spec in decl.named_children(&mut specs) {
                        if let Some(name) = spec.child_by_field_name("name") {
                            symbols.push(symbol_at(path, source, name, SymbolKind::Struct));
                        }
                    }
                }
                "var_declaration" => {
                    collect_value_specs(path, source, decl, SymbolKind::Variable, &mut symbols);
                }
                "const_declaration" => {
                    collect_value_specs(path, source, decl, SymbolKind::Constant, &mut symbols);
                }
                _ => {}
            }
        }

        Some(symbols)
    }
}

/// Collect every declared name from a var/const declaration, covering both
/// the single-spec and the parenthesized-group forms.
fn collect_value_specs(
    path: &Path,
    source: &str,
    decl: Node<'_>,
    kind: SymbolKind,
    out: &mut Vec<Symbol>,
) {
    let mut cursor = decl.walk();
    for child in decl.named_children(&mut cursor) {
        match child.kind() {
            "var_spec" | "const_spec" => push_spec_names(path, source, child, kind, out),
            "var_spec_list" => {
                let mut inner = child.walk();
                for spec in child.named_children(&mut inner) {
                    if spec.kind() == "var_spec" {
                        push_spec_names(path, source, spec, kind, out);
                    }
                }
            }
            _ => {}
        }
    }
}

/// A single spec can declare several names: `var a, b = 1, 2`.
fn push_spec_names(
    path: &Path,
    source: &str,
    spec: Node<'_>,
    kind: SymbolKind,
    out: &mut Vec<Symbol>,
) {
    let mut cursor = spec.walk();
    for name in spec.children_by_field_name("name", &mut cursor) {
        out.push(symbol_at(path, source, name, kind));
    }
}

fn symbol_at(path: &Path, source: &str, name: Node<'_>, kind: SymbolKind) -> Symbol {
    let pos = name.start_position();
    Symbol {
        name: name.utf8_text(source.as_bytes()).unwrap_or_default().to_string(),
        kind,
        path: path.to_path_buf(),
        // tree-sitter positions are 0-based; the index reports 1-based.
        line: pos.row + 1,
        column: pos.column + 1,
    }
}
