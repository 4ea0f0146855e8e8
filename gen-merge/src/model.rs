//! Package model shared by the extractor and the renderer.
//!
//! The extractor builds a [`PackageModel`] once per run; the renderer reads it
//! and never mutates it.

use std::collections::BTreeSet;
use std::fmt;

/// Syntactic shape of a declared field type.
///
/// Classification looks at syntax only. No type resolution happens, so
/// `type Celsius float64` and `float64` are both [`TypeShape::Simple`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeShape {
    /// A named or primitive type (`string`, `NullFloat`) or a fixed-length
    /// array (`[4]byte`), spelled as declared.
    Simple(String),

    /// A pointer type `*T`.
    Optional { pointee: String },

    /// A slice type `[]T`.
    Sequence { element: String },

    /// A type from another package, `pkg.T`.
    Qualified { package: String, name: String },

    /// Maps, channels, functions, interfaces, anonymous structs, generic
    /// instantiations and embedded fields.
    Unsupported { shape: String },
}

impl TypeShape {
    /// The Go expression for this shape's zero value, or `None` when the shape
    /// has no supported classification.
    ///
    /// Pointers and slices compare against `nil`; an empty but non-nil slice is
    /// not zero.
    pub fn zero_value(&self) -> Option<String> {
        match self {
            Self::Simple(spelling) => Some(format!("*(new({}))", spelling)),
            Self::Optional { .. } | Self::Sequence { .. } => Some("nil".to_string()),
            Self::Qualified { package, name } => Some(format!("*(new({}.{}))", package, name)),
            Self::Unsupported { .. } => None,
        }
    }

    /// Check if this shape can be classified.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported { .. })
    }
}

/// A struct field ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field identifier.
    pub name: String,

    /// Go expression spliced into `s1.F == zero` and `s2.F != zero`.
    pub zero_value: String,
}

impl FieldDescriptor {
    /// Create a field descriptor.
    pub fn new(name: impl Into<String>, zero_value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            zero_value: zero_value.into(),
        }
    }
}

/// An exported struct and its fields in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDescriptor {
    /// Struct name.
    pub name: String,

    /// Fields in declaration order.
    pub fields: Vec<FieldDescriptor>,
}

impl StructDescriptor {
    /// Create a struct descriptor.
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

/// An aliased import, rendered as `alias "path"`.
///
/// Ordered by path, then alias, matching how gofmt sorts an import block.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImportSpec {
    /// Import path literal including its quotes.
    pub path: String,

    /// Local alias (`sqlx`, `_` or `.`).
    pub alias: String,
}

impl ImportSpec {
    /// Create an import spec from an alias and a quoted path literal.
    pub fn new(alias: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            alias: alias.into(),
        }
    }
}

impl fmt::Display for ImportSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.alias, self.path)
    }
}

/// Everything the renderer needs for one package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageModel {
    /// The package clause shared by every scanned file.
    pub package_name: String,

    /// Aliased imports collected across all files.
    pub imports: BTreeSet<ImportSpec>,

    /// Extracted structs, in extraction order.
    pub structs: Vec<StructDescriptor>,
}

impl PackageModel {
    /// Create an empty model for a package.
    pub fn new(package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            ..Default::default()
        }
    }

    /// Look up a struct by name.
    pub fn get_struct(&self, name: &str) -> Option<&StructDescriptor> {
        self.structs.iter().find(|s| s.name == name)
    }
}
