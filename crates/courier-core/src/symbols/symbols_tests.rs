#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

const REPORT: &str = r#"{
  "types": [
    { "name": "org.unirail.AdHoc.StdProtocol", "kind": "class" },
    { "name": "org.demo.Proj", "kind": "interface" },
    { "name": "org.demo.Proj$Pack", "kind": "class",
      "fields": [ { "name": "id", "type": "int" },
                  { "name": "NAME", "type": "String", "static": true, "final": true, "value": "x" } ] },
    { "name": "org.demo.Proj$Chan", "kind": "class",
      "super_type": "org.unirail.AdHoc.StdProtocol",
      "interfaces": ["org.demo.Proj$Client", "org.demo.Proj$Server"] },
    { "name": "org.demo.lib.Proj", "kind": "interface" },
    { "name": "org.demo.ProjExtra$Thing", "kind": "class" }
  ]
}"#;

fn model() -> SymbolModel {
    SymbolModel::from_json(REPORT.as_bytes(), "Proj").unwrap()
}

#[test]
fn SymbolModel___from_json___drops_meta_namespace() {
    let model = model();

    assert!(!model.contains("org.unirail.AdHoc.StdProtocol"));
    assert_eq!(model.types().len(), 5);
}

#[test]
fn SymbolModel___from_json___picks_shortest_matching_root() {
    let model = model();

    assert_eq!(model.root(), "org.demo.Proj");
}

#[test]
fn SymbolModel___from_json___missing_root_is_frontend_error() {
    let result = SymbolModel::from_json(REPORT.as_bytes(), "Other");

    assert!(matches!(result, Err(CourierError::Frontend(_))));
}

#[test]
fn SymbolModel___from_json___malformed_report_is_serialization_error() {
    let result = SymbolModel::from_json(b"{ \"types\": [ { \"name\": 1 } ] }", "Proj");

    assert!(matches!(result, Err(CourierError::Serialization(_))));
}

#[test]
fn SymbolModel___resolve___duplicate_binary_name_is_rejected() {
    let decl = TypeDecl {
        name: "p.Proj".into(),
        kind: TypeKind::Interface,
        super_type: None,
        interfaces: vec![],
        annotations: vec![],
        fields: vec![],
    };

    let result = SymbolModel::resolve(vec![decl.clone(), decl], "Proj");

    assert!(matches!(result, Err(CourierError::Frontend(_))));
}

#[test]
fn SymbolModel___in_project___only_root_and_nested_types() {
    let model = model();

    assert!(model.in_project("org.demo.Proj"));
    assert!(model.in_project("org.demo.Proj$Pack"));
    assert!(!model.in_project("org.demo.ProjExtra$Thing"));
    assert!(!model.in_project("org.demo.lib.Proj"));
}

#[test]
fn SymbolModel___get___returns_fields_in_order() {
    let model = model();

    let pack = model.get("org.demo.Proj$Pack").unwrap();

    let names: Vec<&str> = pack.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["id", "NAME"]);
    assert!(pack.fields[1].is_static && pack.fields[1].is_final);
}

#[test]
fn TypeDecl___names___derived_from_binary_name() {
    let model = model();
    let chan = model.get("org.demo.Proj$Chan").unwrap();

    assert_eq!(chan.simple_name(), "Chan");
    assert_eq!(chan.qualified_name(), "org.demo.Proj.Chan");
    assert_eq!(chan.super_simple_name(), Some("StdProtocol"));
    assert_eq!(
        chan.name_segments().collect::<Vec<_>>(),
        ["org", "demo", "Proj", "Chan"]
    );
}

#[test]
fn TypeKind___aliases___accept_long_names() {
    let kind: TypeKind = serde_json::from_str("\"enumeration\"").unwrap();
    let concrete: TypeKind = serde_json::from_str("\"concrete\"").unwrap();

    assert_eq!(kind, TypeKind::Enum);
    assert_eq!(concrete, TypeKind::Class);
}

#[test_case("int", ValueType::Primitive(PrimitiveKind::Int))]
#[test_case("boolean", ValueType::Primitive(PrimitiveKind::Boolean))]
#[test_case("String", ValueType::Str)]
#[test_case("java.lang.String", ValueType::Str)]
#[test_case("org.demo.Proj$Pack", ValueType::Reference("org.demo.Proj$Pack".into()))]
fn ValueType___parse___scalars(descriptor: &str, expected: ValueType) {
    assert_eq!(ValueType::parse(descriptor), expected);
}

#[test_case("long[]", PrimitiveKind::Long, 1)]
#[test_case("byte[][]", PrimitiveKind::Byte, 2)]
#[test_case("char [] []", PrimitiveKind::Char, 2)]
fn ValueType___parse___arrays_count_dimensions(
    descriptor: &str,
    primitive: PrimitiveKind,
    expected_dimensions: usize,
) {
    let parsed = ValueType::parse(descriptor);

    assert_eq!(
        parsed,
        ValueType::Array {
            element: Box::new(ValueType::Primitive(primitive)),
            dimensions: expected_dimensions,
        }
    );
}
