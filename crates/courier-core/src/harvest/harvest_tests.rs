#![allow(non_snake_case)]

use super::*;
use crate::TypeKind;
use serde_json::json;
use test_case::test_case;

fn owner(name: &str) -> TypeDecl {
    TypeDecl {
        name: name.into(),
        kind: TypeKind::Class,
        super_type: None,
        interfaces: vec![],
        annotations: vec![],
        fields: vec![],
    }
}

fn constant(name: &str, ty: &str, value: Value) -> FieldDecl {
    FieldDecl {
        name: name.into(),
        ty: ty.into(),
        is_static: true,
        is_final: true,
        synthetic: false,
        member_type: false,
        value: Some(value),
    }
}

#[test]
fn ConstantHarvester___string_constant___renders_quoted_line() {
    let mut harvester = ConstantHarvester::new();

    let recorded = harvester.record(&owner("pkg.Foo"), &constant("NAME", "String", json!("x")));

    assert!(recorded);
    assert_eq!(harvester.lines(), ["//NAME\t\"x\"\tpkg.Foo"]);
}

#[test]
fn ConstantHarvester___nested_owner___uses_dotted_name() {
    let mut harvester = ConstantHarvester::new();

    harvester.record(&owner("pkg.Proj$Pack"), &constant("MAX", "int", json!(7)));

    assert_eq!(harvester.lines(), ["//MAX\t7\tpkg.Proj.Pack"]);
}

#[test_case("String", Value::Null, "null")]
#[test_case("int", json!(42), "42")]
#[test_case("long", json!(-9000000000i64), "-9000000000")]
#[test_case("double", json!(1.5), "1.5")]
#[test_case("boolean", json!(true), "true")]
#[test_case("char", json!("c"), "c")]
#[test_case("String[]", json!(["a", null, "b"]), "{\"a\", null, \"b\"}")]
#[test_case("int[]", json!([1, 2, 3]), "{1, 2, 3}")]
#[test_case("int[]", json!([]), "{}")]
fn ConstantHarvester___render_line___formats_value(ty: &str, value: Value, expected: &str) {
    let line =
        ConstantHarvester::render_line("F", &ValueType::parse(ty), Some(&value), "p.T").unwrap();

    assert_eq!(line, format!("//F\t{expected}\tp.T"));
}

#[test_case("int[][]", json!([[1], [2]]))]
#[test_case("p.Proj$Pack", json!({}))]
#[test_case("p.Proj$Pack[]", json!([]))]
fn ConstantHarvester___render_line___skips_out_of_scope_types(ty: &str, value: Value) {
    let line = ConstantHarvester::render_line("F", &ValueType::parse(ty), Some(&value), "p.T");

    assert!(line.is_none());
}

#[test]
fn ConstantHarvester___member_type_field___is_skipped() {
    let mut harvester = ConstantHarvester::new();
    let mut field = constant("INNER", "String", json!("v"));
    field.member_type = true;

    let recorded = harvester.record(&owner("p.T"), &field);

    assert!(!recorded);
    assert!(harvester.is_empty());
}

#[test]
fn ConstantHarvester___block___empty_when_nothing_harvested() {
    let harvester = ConstantHarvester::new();

    assert_eq!(harvester.block(), "");
}

#[test]
fn ConstantHarvester___block___sentinel_then_lines_in_order() {
    let mut harvester = ConstantHarvester::new();
    harvester.record(&owner("p.A"), &constant("FIRST", "int", json!(1)));
    harvester.record(&owner("p.B"), &constant("SECOND", "String", json!("two")));

    let block = harvester.block();

    assert_eq!(
        block,
        "//@#$%^&*\n//FIRST\t1\tp.A\n//SECOND\t\"two\"\tp.B\n"
    );
}
