//! Pre-submission validation of a compiled description.
//!
//! Every rule runs over the whole [`SymbolModel`] and every issue is
//! reported, so one pass shows the user everything that needs fixing.
//! Constant harvesting piggybacks on the field scan.

use crate::{
    ConstantHarvester, CourierError, CourierResult, FieldDecl, SymbolModel, TypeDecl, TypeKind,
};
use std::collections::HashSet;
use tracing::warn;

/// Annotation that pins a stable identifier on imported declarations
pub const STABLE_ID_ANNOTATION: &str = "org.unirail.AdHoc.id";

/// Simple names of the protocol base types that mark a channel
pub const CHANNEL_BASE_NAMES: [&str; 2] = ["StdProtocol", "AdvProtocol"];

/// Identifiers rejected because some target language reserves them.
///
/// Sorted by byte value so lookups can binary search.
pub const RESERVED_WORDS: &[&str] = &[
    "Error", "Self", "actual", "alignas", "annotation", "arguments", "array", "as", "asm",
    "async", "auto", "await", "become", "bool", "box", "by", "cast", "char16_t", "char32_t",
    "checked", "companion", "const_cast", "constexpr", "constructor", "crate", "crossinline",
    "data", "debugger", "decimal", "declare", "decltype", "delegate", "delete", "deprecated",
    "dllexport", "dllimport", "dst", "dyn", "dynamic", "dynamic_cast", "each", "eval", "event",
    "expect", "explicit", "export", "extern", "external", "field", "file", "fixed", "fn",
    "foreach", "friend", "from", "fun", "function", "gcnew", "generic", "get", "i128", "i16",
    "i32", "i64", "i8", "impl", "implicit", "in", "infix", "init", "inline", "inner", "int16_t",
    "int32_t", "int64_t", "int8_t", "interior", "internal", "is", "lateinit", "let", "literal",
    "lock", "loop", "macro", "match", "mod", "module", "move", "mut", "mutable", "naked",
    "namespace", "noexcept", "noinline", "noreturn", "nothrow", "novtable", "null", "nullptr",
    "number", "object", "only", "open", "operator", "out", "override", "pack", "param", "params",
    "priv", "property", "ptr", "pub", "readonly", "receiver", "ref", "register", "reified",
    "reinterpret_", "reinterpret_cast", "require", "safecast", "sbyte", "sealed", "selectany",
    "set", "setparam", "signed", "sizeof", "src", "stackalloc", "static_assert", "static_cast",
    "str", "string", "struct", "suspend", "symbol", "tailrec", "template", "thread", "trait",
    "type", "typealias", "typedef", "typeid", "typename", "typeof", "u128", "u16", "u32", "u64",
    "u8", "uint", "uint16_t", "uint32_t", "uint64_t", "ulong", "unchecked", "union", "unsafe",
    "unsigned", "unsized", "use", "ushort", "using", "uuid", "val", "value", "vararg", "virtual",
    "wchar_t", "where", "with", "yield",
];

/// Whether an identifier cannot be used in a description.
///
/// Names starting or ending with `_` are reserved for generated code.
/// The word list is matched case-sensitively.
pub fn is_reserved_identifier(name: &str) -> bool {
    name.starts_with('_') || name.ends_with('_') || RESERVED_WORDS.binary_search(&name).is_ok()
}

/// Rule a [`ValidationIssue`] was raised by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    ReservedIdentifier,
    DuplicateDeclaration,
    MissingStableId,
    ChannelShape,
    StaticNotFinal,
    FinalNotStatic,
}

/// One structural problem in the description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    /// Binary name of the offending type
    pub type_name: String,
    /// Offending field, for field-level rules
    pub field: Option<String>,
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome of a validation pass that found at least one channel
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
    /// Number of channel-shaped types in the project
    pub channels: usize,
    /// Harvested constants block, empty when there is nothing to append
    pub constants: String,
}

impl ValidationReport {
    /// Whether the description may be submitted
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Convert into an error when issues were found
    pub fn into_result(self) -> CourierResult<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(CourierError::InvalidDescription {
                count: self.issues.len(),
            })
        }
    }
}

/// Runs every rule over a symbol model.
#[derive(Debug, Default)]
pub struct Validator {
    issues: Vec<ValidationIssue>,
    simple_names: HashSet<String>,
    harvester: ConstantHarvester,
    channels: usize,
}

impl Validator {
    /// Validate a model.
    ///
    /// Returns [`CourierError::NoChannels`] when the project declares no
    /// channel, even if other issues were found; those are still logged.
    pub fn validate(model: &SymbolModel) -> CourierResult<ValidationReport> {
        let mut validator = Validator::default();

        for decl in model.types() {
            validator.check_type(model, decl);
        }

        if validator.channels == 0 {
            return Err(CourierError::NoChannels);
        }

        tracing::debug!(
            issues = validator.issues.len(),
            channels = validator.channels,
            constants = validator.harvester.lines().len(),
            "validation finished"
        );

        Ok(ValidationReport {
            constants: validator.harvester.block(),
            issues: validator.issues,
            channels: validator.channels,
        })
    }

    fn check_type(&mut self, model: &SymbolModel, decl: &TypeDecl) {
        for segment in decl.name_segments() {
            if is_reserved_identifier(segment) {
                self.report(
                    IssueKind::ReservedIdentifier,
                    decl,
                    None,
                    format!(
                        "type {} uses the reserved name part {segment}",
                        decl.qualified_name()
                    ),
                );
            }
        }

        if decl.kind == TypeKind::Interface {
            return;
        }

        let in_project = model.in_project(&decl.name);

        if decl.kind != TypeKind::Enum && decl.interfaces.is_empty() {
            if in_project {
                if decl.name.contains('$') && !self.simple_names.insert(decl.simple_name().into())
                {
                    self.report(
                        IssueKind::DuplicateDeclaration,
                        decl,
                        None,
                        format!(
                            "declaration {} reuses the name {} already declared in the project",
                            decl.qualified_name(),
                            decl.simple_name()
                        ),
                    );
                }
            } else if decl.annotations.first().map(String::as_str) != Some(STABLE_ID_ANNOTATION) {
                self.report(
                    IssueKind::MissingStableId,
                    decl,
                    None,
                    format!(
                        "imported declaration {} must carry @{STABLE_ID_ANNOTATION} as its first annotation",
                        decl.qualified_name()
                    ),
                );
            }
        }

        if in_project
            && decl
                .super_simple_name()
                .is_some_and(|name| CHANNEL_BASE_NAMES.contains(&name))
        {
            self.channels += 1;
            if decl.interfaces.len() != 2 {
                self.report(
                    IssueKind::ChannelShape,
                    decl,
                    None,
                    format!(
                        "channel {} must join exactly two interfaces, found {}",
                        decl.qualified_name(),
                        decl.interfaces.len()
                    ),
                );
            }
        }

        for field in decl.fields.iter().filter(|f| !f.synthetic) {
            self.check_field(decl, field);
        }
    }

    fn check_field(&mut self, owner: &TypeDecl, field: &FieldDecl) {
        if is_reserved_identifier(&field.name) {
            self.report(
                IssueKind::ReservedIdentifier,
                owner,
                Some(field),
                format!(
                    "field {} of {} uses a reserved name",
                    field.name,
                    owner.qualified_name()
                ),
            );
        }

        if field.member_type {
            return;
        }

        match (field.is_static, field.is_final) {
            (true, true) => {
                self.harvester.record(owner, field);
            }
            (true, false) => self.report(
                IssueKind::StaticNotFinal,
                owner,
                Some(field),
                format!(
                    "static field {} of {} must also be final",
                    field.name,
                    owner.qualified_name()
                ),
            ),
            (false, true) => self.report(
                IssueKind::FinalNotStatic,
                owner,
                Some(field),
                format!(
                    "final field {} of {} must also be static",
                    field.name,
                    owner.qualified_name()
                ),
            ),
            (false, false) => {}
        }
    }

    fn report(
        &mut self,
        kind: IssueKind,
        decl: &TypeDecl,
        field: Option<&FieldDecl>,
        message: String,
    ) {
        warn!("{message}");
        self.issues.push(ValidationIssue {
            kind,
            type_name: decl.name.clone(),
            field: field.map(|f| f.name.clone()),
            message,
        });
    }
}


#[cfg(test)]
#[path = "validate/validate_parameterized_tests.rs"]
mod validate_parameterized_tests;
