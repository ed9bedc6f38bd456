//! Symbol model of a compiled description file.
//!
//! The external compiler front-end reports every type it compiled for the
//! description file (and everything the file depends on) as JSON. This
//! module parses that report and resolves it into a [`SymbolModel`]: a
//! read-only, name-indexed declaration list with the root project type
//! identified.
//!
//! # Naming
//!
//! Type names are binary names: packages are separated by `.`, nested
//! types by `$` (`org.demo.Proj$Pack`). [`TypeDecl::qualified_name`] gives
//! the source form with dots only.
//!
//! # Structure
//!
//! - [`TypeDecl`]: one type with its kind, super-type, capabilities,
//!   annotations and fields
//! - [`FieldDecl`]: one field with its value-type descriptor and modifiers
//! - [`ValueType`]: parsed value-type descriptor

use crate::{CourierError, CourierResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Namespace of the schema language's own meta types; never validated or merged
pub const META_NAMESPACE: &str = "org.unirail.AdHoc";

/// Kind of a declared type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// Concrete declaration
    #[serde(alias = "concrete")]
    Class,
    /// Interface
    Interface,
    /// Enumeration
    #[serde(alias = "enumeration")]
    Enum,
}

/// A declared type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDecl {
    /// Binary name.
    pub name: String,

    /// Declaration kind.
    pub kind: TypeKind,

    /// Binary name of the super-type, if any.
    #[serde(default)]
    pub super_type: Option<String>,

    /// Implemented capabilities (interfaces).
    #[serde(default)]
    pub interfaces: Vec<String>,

    /// Annotation type names in declaration order.
    #[serde(default)]
    pub annotations: Vec<String>,

    /// Declared fields in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
}

/// A declared field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDecl {
    /// Field name.
    pub name: String,

    /// Value-type descriptor (`int`, `String`, `long[]`, `org.demo.Proj$Pack`).
    #[serde(rename = "type")]
    pub ty: String,

    /// `static` modifier.
    #[serde(default, rename = "static")]
    pub is_static: bool,

    /// `final` modifier.
    #[serde(default, rename = "final")]
    pub is_final: bool,

    /// Compiler-generated field.
    #[serde(default)]
    pub synthetic: bool,

    /// The value type is a member (nested) type.
    #[serde(default)]
    pub member_type: bool,

    /// Compile-time value of a `static final` field.
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

/// Primitive value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveKind {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "boolean" => PrimitiveKind::Boolean,
            "byte" => PrimitiveKind::Byte,
            "char" => PrimitiveKind::Char,
            "short" => PrimitiveKind::Short,
            "int" => PrimitiveKind::Int,
            "long" => PrimitiveKind::Long,
            "float" => PrimitiveKind::Float,
            "double" => PrimitiveKind::Double,
            _ => return None,
        })
    }
}

/// Parsed value-type descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    /// Primitive scalar.
    Primitive(PrimitiveKind),
    /// Character string.
    Str,
    /// Array of `element`, with `dimensions` levels of nesting.
    Array {
        element: Box<ValueType>,
        dimensions: usize,
    },
    /// Any other named type.
    Reference(String),
}

impl ValueType {
    /// Parse a descriptor such as `int`, `String[]` or `java.lang.String`.
    pub fn parse(descriptor: &str) -> ValueType {
        let descriptor = descriptor.trim();

        let mut base = descriptor;
        let mut dimensions = 0;
        while let Some(stripped) = base.strip_suffix("[]") {
            base = stripped.trim_end();
            dimensions += 1;
        }

        let element = if let Some(primitive) = PrimitiveKind::from_name(base) {
            ValueType::Primitive(primitive)
        } else if base == "String" || base == "java.lang.String" {
            ValueType::Str
        } else {
            ValueType::Reference(base.to_string())
        };

        if dimensions == 0 {
            element
        } else {
            ValueType::Array {
                element: Box::new(element),
                dimensions,
            }
        }
    }
}

impl TypeDecl {
    /// Name without package or enclosing types.
    pub fn simple_name(&self) -> &str {
        simple_name_of(&self.name)
    }

    /// Source-form name with dots only.
    pub fn qualified_name(&self) -> String {
        self.name.replace('$', ".")
    }

    /// Every package and type segment of the name.
    pub fn name_segments(&self) -> impl Iterator<Item = &str> {
        self.name.split(['.', '$']).filter(|s| !s.is_empty())
    }

    /// Simple name of the super-type, if any.
    pub fn super_simple_name(&self) -> Option<&str> {
        self.super_type.as_deref().map(simple_name_of)
    }
}

impl FieldDecl {
    /// Parsed value-type descriptor.
    pub fn value_type(&self) -> ValueType {
        ValueType::parse(&self.ty)
    }
}

fn simple_name_of(name: &str) -> &str {
    name.rsplit(['.', '$']).next().unwrap_or(name)
}

#[derive(Debug, Deserialize)]
struct RawModel {
    #[serde(default)]
    types: Vec<TypeDecl>,
}

/// Resolved, read-only model of one validation pass.
#[derive(Debug, Clone)]
pub struct SymbolModel {
    types: Vec<TypeDecl>,
    index: HashMap<String, usize>,
    root: String,
}

impl SymbolModel {
    /// Parse a front-end report and resolve it for the description file
    /// whose name without extension is `description_stem`.
    pub fn from_json(data: &[u8], description_stem: &str) -> CourierResult<Self> {
        let raw: RawModel = serde_json::from_slice(data)?;
        Self::resolve(raw.types, description_stem)
    }

    /// Build the model from a declaration list.
    ///
    /// Meta-namespace types are dropped; the root project is the
    /// shortest-named type whose simple name equals `description_stem`.
    pub fn resolve(declarations: Vec<TypeDecl>, description_stem: &str) -> CourierResult<Self> {
        let meta_prefix = format!("{META_NAMESPACE}.");
        let mut types = Vec::with_capacity(declarations.len());
        let mut index = HashMap::new();

        for decl in declarations {
            if decl.name.starts_with(&meta_prefix) {
                continue;
            }
            if index.insert(decl.name.clone(), types.len()).is_some() {
                return Err(CourierError::Frontend(format!(
                    "type {} reported twice",
                    decl.name
                )));
            }
            types.push(decl);
        }

        let root = types
            .iter()
            .filter(|t| {
                t.name == description_stem || t.name.ends_with(&format!(".{description_stem}"))
            })
            .min_by_key(|t| t.name.len())
            .map(|t| t.name.clone())
            .ok_or_else(|| {
                CourierError::Frontend(format!(
                    "description type {description_stem} is not among the compiled types"
                ))
            })?;

        tracing::debug!(types = types.len(), root = %root, "symbol model resolved");

        Ok(Self { types, index, root })
    }

    /// Binary name of the root project type.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// All types in report order.
    pub fn types(&self) -> &[TypeDecl] {
        &self.types
    }

    /// Look a type up by binary name.
    pub fn get(&self, name: &str) -> Option<&TypeDecl> {
        self.index.get(name).map(|&i| &self.types[i])
    }

    /// Whether a type with this binary name was compiled.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Whether a type belongs to the project's own namespace.
    pub fn in_project(&self, name: &str) -> bool {
        name == self.root
            || name
                .strip_prefix(self.root.as_str())
                .is_some_and(|rest| rest.starts_with('$'))
    }
}

#[cfg(test)]
#[path = "symbols/symbols_tests.rs"]
mod symbols_tests;
