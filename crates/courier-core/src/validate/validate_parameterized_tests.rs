#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

#[test_case("_hidden" ; "leading underscore")]
#[test_case("hidden_" ; "trailing underscore")]
#[test_case("_" ; "lone underscore")]
#[test_case("match" ; "rust keyword")]
#[test_case("nullptr" ; "cpp keyword")]
#[test_case("typealias" ; "kotlin keyword")]
#[test_case("stackalloc" ; "csharp keyword")]
#[test_case("Self" ; "capitalized entry")]
#[test_case("reinterpret_" ; "entry ending in underscore")]
fn is_reserved_identifier___rejects(name: &str) {
    assert!(is_reserved_identifier(name));
}

#[test_case("Match" ; "capitalized keyword")]
#[test_case("MATCH" ; "upper case keyword")]
#[test_case("self" ; "lower case of capitalized entry")]
#[test_case("error" ; "lower case error")]
#[test_case("mid_dle" ; "inner underscore")]
#[test_case("Point" ; "plain name")]
fn is_reserved_identifier___accepts(name: &str) {
    assert!(!is_reserved_identifier(name));
}

#[test_case(false, false, None ; "instance field")]
#[test_case(true, true, None ; "constant")]
#[test_case(true, false, Some(IssueKind::StaticNotFinal) ; "static only")]
#[test_case(false, true, Some(IssueKind::FinalNotStatic) ; "final only")]
fn Validator___field_modifiers(is_static: bool, is_final: bool, expected: Option<IssueKind>) {
    let field = FieldDecl {
        name: "value_of".into(),
        ty: "int".into(),
        is_static,
        is_final,
        synthetic: false,
        member_type: false,
        value: Some(serde_json::json!(1)),
    };
    let decls = vec![
        decl("p.Proj", TypeKind::Interface),
        decl("p.Proj$A", TypeKind::Interface),
        decl("p.Proj$B", TypeKind::Interface),
        TypeDecl {
            super_type: Some("org.unirail.AdHoc.AdvProtocol".into()),
            interfaces: vec!["p.Proj$A".into(), "p.Proj$B".into()],
            ..decl("p.Proj$Link", TypeKind::Class)
        },
        TypeDecl {
            fields: vec![field],
            ..decl("p.Proj$Pack", TypeKind::Class)
        },
    ];
    let model = SymbolModel::resolve(decls, "Proj").unwrap();

    let report = Validator::validate(&model).unwrap();

    let kinds: Vec<IssueKind> = report.issues.iter().map(|i| i.kind).collect();
    assert_eq!(kinds, expected.into_iter().collect::<Vec<_>>());
}

fn decl(name: &str, kind: TypeKind) -> TypeDecl {
    TypeDecl {
        name: name.into(),
        kind,
        super_type: None,
        interfaces: vec![],
        annotations: vec![],
        fields: vec![],
    }
}
