// tests/parser_tests.rs

use quova::ast::*;
use quova::parse_file;
use quova::ErrorType;

use pretty_assertions::assert_eq;

fn first_type(source: &str) -> TypeDeclaration {
    let file = parse_file(source, "parser.qv").unwrap();
    match file.declarations.into_iter().next() {
        Some(Declaration::Type(declaration)) => declaration,
        other => panic!("expected a type declaration, got {:?}", other),
    }
}

#[test]
fn synthetic_imports_close_the_import_list() {
    let file = parse_file(
        "package demo.app;\nimport a.b.C as D;\nimport x.y.*;\nimport p.{Q, R};\n",
        "imports.qv",
    )
    .unwrap();
    assert_eq!(file.package.as_deref(), Some("demo.app"));
    assert_eq!(file.imports.len(), 5);
    assert_eq!(file.imports[3], Import::standard_library());
    assert_eq!(file.imports[4], Import::integer_alias());
}

#[test]
fn empty_unit_still_gets_the_synthetic_imports() {
    let file = parse_file("", "empty.qv").unwrap();
    assert_eq!(
        file.imports,
        vec![Import::standard_library(), Import::integer_alias()]
    );
    assert!(file.declarations.is_empty());
}

#[test]
fn members_land_in_exactly_one_bucket_in_order() {
    let declaration = first_type(
        "class Foo(int x) { int a = 1; static int b = 2; int c = 3; static void d() {} }",
    );
    let TypeDeclarationKind::Class(class) = declaration.kind else {
        panic!("expected a class");
    };
    assert_eq!(class.members.instance.len(), 2);
    assert_eq!(class.members.statics.len(), 2);
    let names: Vec<String> = class
        .members
        .instance
        .iter()
        .filter_map(|member| match member {
            ClassMember::Declaration(Declaration::Property(property)) => {
                Some(property.properties[0].name.clone())
            }
            _ => None,
        })
        .collect();
    assert_eq!(names, vec!["a", "c"]);
}

#[test]
fn enum_entries_keep_their_explicit_values() {
    let declaration = first_type("enum Color : int { A, B, C = 10, D }");
    let TypeDeclarationKind::PrimitiveEnum(enumeration) = declaration.kind else {
        panic!("expected a primitive enum");
    };
    assert_eq!(enumeration.entries.len(), 4);
    let values: Vec<String> = quova::render::enum_values(&enumeration)
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(values, vec!["0", "1", "10", "10 + 1"]);
}

#[test]
fn syntax_errors_carry_a_labelled_span() {
    use miette::Diagnostic;

    let err = parse_file("class Foo {\n  int x = ;\n}", "broken.qv").unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Parse);
    let labels: Vec<_> = err.labels().map(|l| l.collect()).unwrap_or_default();
    assert_eq!(labels.len(), 1);
    assert!(err.source_code().is_some());
}

#[test]
fn dictionary_constructor_arguments_are_rejected() {
    let err = parse_file("var m = new Foo{1: 2};", "dict.qv").unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Unsupported);
}

#[test]
fn ast_serializes_to_json() {
    let file = parse_file("record Point(int x, int y);", "point.qv").unwrap();
    let json = serde_json::to_value(&file).unwrap();
    assert!(json["declarations"].is_array());
    assert_eq!(json["declarations"].as_array().map(Vec::len), Some(1));
}
