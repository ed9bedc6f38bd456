//! Light textual scans of description sources
//!
//! Only two things are needed from the raw text: the import list, to know
//! whether dependency sources must be merged, and the offset of the
//! top-level declaration, which splits the header (package line, imports,
//! comments) from the body.

use courier_core::META_NAMESPACE;
use once_cell::sync::Lazy;
use regex::Regex;

#[allow(clippy::expect_used)] // Safe: constant pattern
static IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"import\s+(?:static\s+)?([\p{L}_$][\p{L}\p{N}_$]*(?:\s*\.\s*(?:[\p{L}_$][\p{L}\p{N}_$]*|\*))+)\s*;",
    )
    .expect("import pattern")
});

#[allow(clippy::expect_used)] // Safe: constant pattern
static DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:public|private)\s+interface\s+[\p{L}_$][\p{L}\p{N}_$]*\s*(?:(?:extends|implements)\s+[\w.$]+(?:\s*,\s*[\w.$]+)*)?\s*\{",
    )
    .expect("declaration pattern")
});

/// Imported paths in source order, with whitespace removed.
pub fn import_paths(source: &str) -> Vec<String> {
    IMPORT
        .captures_iter(source)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().chars().filter(|c| !c.is_whitespace()).collect())
        .collect()
}

/// Whether the source imports anything outside the schema language's own namespace.
pub fn has_external_imports(source: &str) -> bool {
    let meta_prefix = format!("{META_NAMESPACE}.");
    import_paths(source)
        .iter()
        .any(|path| !path.starts_with(&meta_prefix))
}

/// Byte offset of the first top-level `public`/`private interface` declaration.
pub fn declaration_offset(source: &str) -> Option<usize> {
    DECLARATION.find(source).map(|m| m.start())
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    const SOURCE: &str = "package org.demo;\n\
        \n\
        import org.unirail.AdHoc.*;\n\
        import static org.unirail.AdHoc.Pack.Meta;\n\
        import org.demo.lib . Shared;\n\
        \n\
        /** Demo project */\n\
        public interface Proj extends Shared {\n\
            interface Server {}\n\
        }\n";

    #[test]
    fn import_paths___strips_whitespace_and_keeps_order() {
        assert_eq!(
            import_paths(SOURCE),
            [
                "org.unirail.AdHoc.*",
                "org.unirail.AdHoc.Pack.Meta",
                "org.demo.lib.Shared"
            ]
        );
    }

    #[test]
    fn has_external_imports___detects_foreign_import() {
        assert!(has_external_imports(SOURCE));
    }

    #[test]
    fn has_external_imports___meta_namespace_only___is_false() {
        let source = "import org.unirail.AdHoc.*;\npublic interface Proj {}";

        assert!(!has_external_imports(source));
    }

    #[test]
    fn has_external_imports___no_imports___is_false() {
        assert!(!has_external_imports("public interface Proj {}"));
    }

    #[test]
    fn declaration_offset___points_at_modifier() {
        let offset = declaration_offset(SOURCE).unwrap();

        assert!(SOURCE[offset..].starts_with("public interface Proj extends Shared {"));
        assert!(SOURCE[..offset].ends_with("/** Demo project */\n"));
    }

    #[test]
    fn declaration_offset___nested_interfaces_without_modifier___are_ignored() {
        let source = "interface Inner {}\nprivate interface Proj{}";

        assert_eq!(declaration_offset(source), Some(19));
    }

    #[test]
    fn declaration_offset___missing___returns_none() {
        assert_eq!(declaration_offset("class Proj {}"), None);
    }
}
