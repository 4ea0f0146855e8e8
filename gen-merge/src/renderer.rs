//! Renderer for the generated Go merge file.
//!
//! The output layout is fixed:
//!
//! ```text
//! // This file is generated by the gen-merge package. Please avoid editing this manually.
//!
//! package <name>
//!
//! import (
//! 	<alias> "<path>"
//! )
//!
//! // Merge ...
//! func (s1 T) Merge(s2 T) T { ... }
//!
//! // MergeOverride ...
//! func (s1 T) MergeOverride(s2 T) T { ... }
//! ```
//!
//! Structs without fields are dropped and the rest are sorted by name, so the
//! same model always renders to the same bytes.

use crate::error::RenderError;
use crate::model::{PackageModel, StructDescriptor};
use std::fmt::Write as _;

/// First line of every generated file.
pub const GENERATED_HEADER: &str =
    "// This file is generated by the gen-merge package. Please avoid editing this manually.";

/// Expands a [`PackageModel`] into Go source.
#[derive(Debug, Default, Clone, Copy)]
pub struct MergeRenderer;

impl MergeRenderer {
    /// Create a renderer.
    pub fn new() -> Self {
        Self
    }

    /// Render the complete merge file into a string.
    pub fn render(&self, model: &PackageModel) -> Result<String, RenderError> {
        if model.package_name.trim().is_empty() {
            return Err(RenderError::MissingPackage);
        }

        let structs = Self::prepare(model);
        for descriptor in &structs {
            Self::validate(descriptor)?;
        }

        let mut out = String::new();
        writeln!(out, "{}", GENERATED_HEADER)?;
        writeln!(out)?;
        writeln!(out, "package {}", model.package_name)?;

        if !model.imports.is_empty() {
            writeln!(out)?;
            writeln!(out, "import (")?;
            for import in &model.imports {
                writeln!(out, "\t{}", import)?;
            }
            writeln!(out, ")")?;
        }

        for descriptor in &structs {
            Self::render_struct(&mut out, descriptor)?;
        }

        tracing::debug!(
            structs = structs.len(),
            bytes = out.len(),
            "rendered merge file"
        );

        Ok(out)
    }

    /// Copy the non-empty structs and sort them by name.
    fn prepare(model: &PackageModel) -> Vec<&StructDescriptor> {
        let mut structs: Vec<&StructDescriptor> = model
            .structs
            .iter()
            .filter(|s| !s.fields.is_empty())
            .collect();
        structs.sort_by(|a, b| a.name.cmp(&b.name));
        structs
    }

    fn validate(descriptor: &StructDescriptor) -> Result<(), RenderError> {
        if descriptor.name.trim().is_empty() {
            return Err(RenderError::EmptyStructName);
        }

        for field in &descriptor.fields {
            let reason = if field.name.trim().is_empty() {
                Some("has an empty name")
            } else if field.zero_value.trim().is_empty() {
                Some("has no zero-value expression")
            } else {
                None
            };

            if let Some(reason) = reason {
                return Err(RenderError::InvalidField {
                    struct_name: descriptor.name.clone(),
                    field: field.name.clone(),
                    reason,
                });
            }
        }

        Ok(())
    }

    fn render_struct(out: &mut String, descriptor: &StructDescriptor) -> Result<(), RenderError> {
        let name = &descriptor.name;

        writeln!(out)?;
        writeln!(
            out,
            "// Merge returns s1 with every zero-valued field taken from s2."
        )?;
        writeln!(out, "func (s1 {name}) Merge(s2 {name}) {name} {{")?;
        for field in &descriptor.fields {
            writeln!(out, "\tif s1.{} == {} {{", field.name, field.zero_value)?;
            writeln!(out, "\t\ts1.{0} = s2.{0}", field.name)?;
            writeln!(out, "\t}}")?;
        }
        writeln!(out, "\treturn s1")?;
        writeln!(out, "}}")?;

        writeln!(out)?;
        writeln!(
            out,
            "// MergeOverride returns s1 with every non-zero field of s2 copied over it."
        )?;
        writeln!(out, "func (s1 {name}) MergeOverride(s2 {name}) {name} {{")?;
        for field in &descriptor.fields {
            writeln!(out, "\tif s2.{} != {} {{", field.name, field.zero_value)?;
            writeln!(out, "\t\ts1.{0} = s2.{0}", field.name)?;
            writeln!(out, "\t}}")?;
        }
        writeln!(out, "\treturn s1")?;
        writeln!(out, "}}")?;

        Ok(())
    }
}
