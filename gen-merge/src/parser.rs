//! Go source parser for extracting struct declarations.
//!
//! This module parses Go files with tree-sitter and collects the package
//! clause, aliased imports and top-level `type T struct { ... }` declarations
//! of a single file. Policy decisions (exported names, unsupported shapes,
//! multi-name fields) are left to the [`crate::extractor`].

use crate::error::AnalysisError;
use crate::model::{ImportSpec, TypeShape};
use crate::scanner::SourceFile;
use std::path::{Path, PathBuf};
use tree_sitter::{Language, Node, Parser};

/// Declarations found in one Go file.
#[derive(Debug, Clone, Default)]
pub struct ParsedFile {
    /// Source path.
    pub path: PathBuf,

    /// Name from the `package` clause.
    pub package: Option<String>,

    /// Imports that carry an explicit alias.
    pub imports: Vec<ImportSpec>,

    /// Top-level struct type declarations, exported or not.
    pub structs: Vec<StructDecl>,
}

/// A top-level `type Name struct { ... }` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDecl {
    /// Type name.
    pub name: String,

    /// Whether the declaration has type parameters.
    pub generic: bool,

    /// Field declarations in source order.
    pub fields: Vec<FieldDecl>,

    /// Line number (1-indexed).
    pub line: usize,
}

/// One field declaration line, possibly naming several fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    /// Declared names; empty for an embedded field.
    pub names: Vec<String>,

    /// Declared type as written.
    pub type_text: String,

    /// Classified type shape.
    pub shape: TypeShape,

    /// Line number (1-indexed).
    pub line: usize,
}

impl FieldDecl {
    /// Check if this is an embedded (anonymous) field.
    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }
}

/// Parser for Go source files.
pub struct GoParser {
    parser: Parser,
}

impl GoParser {
    /// Create a parser with the Go grammar loaded.
    pub fn new() -> Result<Self, AnalysisError> {
        let language: Language = tree_sitter_go::LANGUAGE.into();
        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .map_err(|e| AnalysisError::Grammar(e.to_string()))?;
        Ok(Self { parser })
    }

    /// Parse a scanned source file.
    pub fn parse_file(&mut self, source: &SourceFile) -> Result<ParsedFile, AnalysisError> {
        self.parse_source(&source.content, &source.path)
    }

    /// Parse Go source code.
    ///
    /// Any syntax error fails the whole file, reporting the first error
    /// position tree-sitter recovered from.
    pub fn parse_source(
        &mut self,
        content: &str,
        file_path: &Path,
    ) -> Result<ParsedFile, AnalysisError> {
        let tree = self.parser.parse(content, None).ok_or_else(|| {
            AnalysisError::parse(file_path.to_path_buf(), 1, 1, "parser produced no tree")
        })?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(syntax_error(root, content, file_path));
        }

        let ctx = ExtractContext::new(content);
        let mut parsed = ParsedFile {
            path: file_path.to_path_buf(),
            ..Default::default()
        };

        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            match child.kind() {
                "package_clause" => {
                    parsed.package = ctx.package_name(child);
                }
                "import_declaration" => {
                    ctx.collect_imports(child, &mut parsed.imports);
                }
                "type_declaration" => {
                    ctx.collect_structs(child, &mut parsed.structs);
                }
                _ => {}
            }
        }

        Ok(parsed)
    }
}

/// Build a parse error from the first error or missing node under `root`.
fn syntax_error(root: Node, source: &str, file_path: &Path) -> AnalysisError {
    let node = first_error(root).unwrap_or(root);
    let position = node.start_position();

    let message = if node.is_missing() {
        format!("missing `{}`", node.kind())
    } else {
        let text = node.utf8_text(source.as_bytes()).unwrap_or("");
        let snippet: String = text.lines().next().unwrap_or("").chars().take(40).collect();
        if snippet.trim().is_empty() {
            "unexpected input".to_string()
        } else {
            format!("unexpected `{}`", snippet.trim())
        }
    };

    AnalysisError::parse(
        file_path.to_path_buf(),
        position.row + 1,
        position.column + 1,
        message,
    )
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }

    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(first_error)
}

struct ExtractContext<'a> {
    source: &'a str,
}

impl<'a> ExtractContext<'a> {
    fn new(source: &'a str) -> Self {
        Self { source }
    }

    fn node_text(&self, node: Node) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn package_name(&self, clause: Node) -> Option<String> {
        let mut cursor = clause.walk();
        let name = clause
            .named_children(&mut cursor)
            .find(|child| child.kind() == "package_identifier")
            .map(|child| self.node_text(child).to_string());
        name
    }

    fn collect_imports(&self, decl: Node, imports: &mut Vec<ImportSpec>) {
        let mut cursor = decl.walk();
        for child in decl.named_children(&mut cursor) {
            match child.kind() {
                "import_spec" => self.collect_import_spec(child, imports),
                "import_spec_list" => {
                    let mut list_cursor = child.walk();
                    for spec in child.named_children(&mut list_cursor) {
                        if spec.kind() == "import_spec" {
                            self.collect_import_spec(spec, imports);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn collect_import_spec(&self, spec: Node, imports: &mut Vec<ImportSpec>) {
        let (Some(alias), Some(path)) = (
            spec.child_by_field_name("name"),
            spec.child_by_field_name("path"),
        ) else {
            return;
        };

        imports.push(ImportSpec::new(self.node_text(alias), self.node_text(path)));
    }

    fn collect_structs(&self, decl: Node, structs: &mut Vec<StructDecl>) {
        // `type T struct{}` and the grouped `type ( ... )` form both hold
        // type_spec children directly.
        let mut cursor = decl.walk();
        for spec in decl.named_children(&mut cursor) {
            if spec.kind() != "type_spec" {
                continue;
            }
            if let Some(decl) = self.extract_struct(spec) {
                structs.push(decl);
            }
        }
    }

    fn extract_struct(&self, spec: Node) -> Option<StructDecl> {
        let name = spec.child_by_field_name("name")?;
        let ty = spec.child_by_field_name("type")?;
        if ty.kind() != "struct_type" {
            return None;
        }

        let mut fields = Vec::new();
        let mut cursor = ty.walk();
        for list in ty.named_children(&mut cursor) {
            if list.kind() != "field_declaration_list" {
                continue;
            }
            let mut list_cursor = list.walk();
            for field in list.named_children(&mut list_cursor) {
                if field.kind() == "field_declaration" {
                    if let Some(decl) = self.extract_field(field) {
                        fields.push(decl);
                    }
                }
            }
        }

        Some(StructDecl {
            name: self.node_text(name).to_string(),
            generic: spec.child_by_field_name("type_parameters").is_some(),
            fields,
            line: spec.start_position().row + 1,
        })
    }

    fn extract_field(&self, field: Node) -> Option<FieldDecl> {
        let ty = field.child_by_field_name("type")?;

        let mut cursor = field.walk();
        let names: Vec<String> = field
            .children_by_field_name("name", &mut cursor)
            .map(|name| self.node_text(name).to_string())
            .collect();

        let shape = if names.is_empty() {
            TypeShape::Unsupported {
                shape: "embedded".to_string(),
            }
        } else {
            self.classify(ty)
        };

        Some(FieldDecl {
            names,
            type_text: collapse_whitespace(self.node_text(ty)),
            shape,
            line: field.start_position().row + 1,
        })
    }

    /// Classify a type node by its syntactic shape.
    fn classify(&self, ty: Node) -> TypeShape {
        match ty.kind() {
            "type_identifier" => TypeShape::Simple(self.node_text(ty).to_string()),

            // `[N]T` cannot be compared with nil, so it keeps a typed zero.
            "array_type" => TypeShape::Simple(collapse_whitespace(self.node_text(ty))),

            "pointer_type" => TypeShape::Optional {
                pointee: self.inner_text(ty),
            },

            "slice_type" => TypeShape::Sequence {
                element: ty
                    .child_by_field_name("element")
                    .map(|element| collapse_whitespace(self.node_text(element)))
                    .unwrap_or_default(),
            },

            "qualified_type" => {
                match (
                    ty.child_by_field_name("package"),
                    ty.child_by_field_name("name"),
                ) {
                    (Some(package), Some(name)) => TypeShape::Qualified {
                        package: self.node_text(package).to_string(),
                        name: self.node_text(name).to_string(),
                    },
                    _ => unsupported("qualified"),
                }
            }

            "parenthesized_type" => {
                let mut cursor = ty.walk();
                let inner = ty.named_children(&mut cursor).next();
                match inner {
                    Some(inner) => self.classify(inner),
                    None => unsupported("parenthesized"),
                }
            }

            "map_type" => unsupported("map"),
            "channel_type" => unsupported("channel"),
            "function_type" => unsupported("function"),
            "interface_type" => unsupported("interface"),
            "struct_type" => unsupported("anonymous struct"),
            "generic_type" => unsupported("generic instantiation"),
            other => unsupported(other),
        }
    }

    fn inner_text(&self, ty: Node) -> String {
        let mut cursor = ty.walk();
        let inner = ty.named_children(&mut cursor).next();
        inner
            .map(|inner| collapse_whitespace(self.node_text(inner)))
            .unwrap_or_default()
    }
}

fn unsupported(shape: &str) -> TypeShape {
    TypeShape::Unsupported {
        shape: shape.to_string(),
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
