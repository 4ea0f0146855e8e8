//! Package extraction.
//!
//! Turns the Go files of one directory into a [`PackageModel`]: checks that
//! they agree on a package name, unions their aliased imports and keeps the
//! exported structs with a zero-value expression for every field.

use crate::config::{ExtractConfig, UnsupportedFieldPolicy};
use crate::error::AnalysisError;
use crate::model::{FieldDescriptor, PackageModel, StructDescriptor, TypeShape};
use crate::parser::{GoParser, ParsedFile, StructDecl};
use crate::renderer::GENERATED_HEADER;
use crate::scanner::{SourceFile, SourceScanner};
use std::path::Path;

/// Builds a [`PackageModel`] from Go sources.
#[derive(Debug, Default, Clone)]
pub struct Extractor {
    config: ExtractConfig,
}

impl Extractor {
    /// Create an extractor with the given settings.
    pub fn new(config: ExtractConfig) -> Self {
        Self { config }
    }

    /// Scan a package directory and extract its model.
    pub fn extract_dir(&self, dir: &Path) -> Result<PackageModel, AnalysisError> {
        let mut scanner =
            SourceScanner::new(dir).with_test_marker(self.config.test_file_marker.clone());
        for pattern in &self.config.exclude {
            scanner = scanner.with_exclude(pattern)?;
        }

        let files = scanner.scan()?;
        tracing::info!(
            dir = %dir.display(),
            files = files.len(),
            "scanned package directory"
        );

        self.extract_files(&files)
    }

    /// Extract a model from already-read source files.
    ///
    /// Fails on the first file that does not parse, has no package clause
    /// or names a different package than the files before it.
    pub fn extract_files(&self, files: &[SourceFile]) -> Result<PackageModel, AnalysisError> {
        let mut parser = GoParser::new()?;
        let mut model = PackageModel::default();
        let mut package: Option<String> = None;

        for file in files {
            // Our own previous output would feed stale imports back in.
            if file.content.starts_with(GENERATED_HEADER) {
                tracing::debug!(file = %file.path.display(), "skipping generated file");
                continue;
            }

            let parsed = parser.parse_file(file)?;
            let name = parsed
                .package
                .clone()
                .ok_or_else(|| AnalysisError::MissingPackageClause {
                    file: file.path.clone(),
                })?;

            match &package {
                Some(first) if *first != name => {
                    return Err(AnalysisError::MultiplePackages {
                        first: first.clone(),
                        second: name,
                        file: file.path.clone(),
                    });
                }
                Some(_) => {}
                None => package = Some(name),
            }

            self.merge_file(parsed, &mut model)?;
        }

        let Some(package) = package else {
            let dir = files
                .first()
                .and_then(|f| f.path.parent())
                .map(Path::to_path_buf)
                .unwrap_or_default();
            return Err(AnalysisError::no_source_files(dir));
        };
        model.package_name = package;

        tracing::info!(
            package = %model.package_name,
            structs = model.structs.len(),
            imports = model.imports.len(),
            "extracted package model"
        );

        Ok(model)
    }

    fn merge_file(&self, parsed: ParsedFile, model: &mut PackageModel) -> Result<(), AnalysisError> {
        model.imports.extend(parsed.imports);

        for decl in parsed.structs {
            if !is_exported(&decl.name) {
                tracing::debug!(name = %decl.name, "skipping unexported struct");
                continue;
            }

            if decl.generic {
                tracing::warn!(
                    name = %decl.name,
                    file = %parsed.path.display(),
                    "skipping generic struct"
                );
                continue;
            }

            let descriptor = self.describe_struct(&decl, &parsed.path)?;
            model.structs.push(descriptor);
        }

        Ok(())
    }

    fn describe_struct(
        &self,
        decl: &StructDecl,
        file: &Path,
    ) -> Result<StructDescriptor, AnalysisError> {
        let mut fields = Vec::new();

        for field in &decl.fields {
            let Some(zero_value) = field.shape.zero_value() else {
                let field_name = field
                    .names
                    .first()
                    .cloned()
                    .unwrap_or_else(|| field.type_text.clone());
                let shape = match &field.shape {
                    TypeShape::Unsupported { shape } => shape.clone(),
                    _ => "unknown".to_string(),
                };

                match self.config.unsupported_fields {
                    UnsupportedFieldPolicy::Error => {
                        return Err(AnalysisError::unsupported_field(
                            file.to_path_buf(),
                            field.line,
                            &decl.name,
                            field_name,
                            shape,
                        ));
                    }
                    UnsupportedFieldPolicy::Skip => {
                        tracing::warn!(
                            struct_name = %decl.name,
                            field = %field_name,
                            shape = %shape,
                            "skipping field with unsupported type"
                        );
                        continue;
                    }
                }
            };

            let names = if self.config.first_name_only {
                &field.names[..field.names.len().min(1)]
            } else {
                &field.names[..]
            };

            for name in names {
                if name == "_" {
                    continue;
                }
                fields.push(FieldDescriptor::new(name, zero_value.clone()));
            }
        }

        Ok(StructDescriptor::new(&decl.name, fields))
    }
}

/// Go's export rule: the name starts with an upper-case letter.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}
