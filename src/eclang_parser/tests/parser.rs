use std::collections::HashMap;

use eclang_parser::parse_source;
use syntax::document::SourceFile;
use syntax::vectors::Vec3;
use syntax::{
    AttributeDef, Class, Document, ImportError, ImportKind, ImportedTree, Importer, Language,
    Type, Value,
};

fn test_language() -> Language {
    Language::with_classes(
        "test",
        "elt",
        "eltc",
        vec![b'E', b'C', b'L', b'T', b'1'],
        vec![
            Class::new("Container"),
            Class::with_attributes(
                "StringTests",
                vec![
                    AttributeDef::new("string", Type::String),
                    AttributeDef::new("markdown", Type::StrMd),
                ],
            )
            .unwrap(),
            Class::with_attributes(
                "NumberTests",
                vec![
                    AttributeDef::new("int8", Type::Int8),
                    AttributeDef::new("uint8", Type::Uint8),
                    AttributeDef::new("int64", Type::Int64),
                    AttributeDef::new("float", Type::Float),
                    AttributeDef::new("double", Type::Double),
                ],
            )
            .unwrap(),
            Class::with_attributes(
                "VectorTests",
                vec![
                    AttributeDef::new("vec2i", Type::Vec2i),
                    AttributeDef::new("vec3f", Type::Vec3f),
                    AttributeDef::new("vec3d", Type::Vec3d),
                    AttributeDef::new("vec4l", Type::Vec4l),
                ],
            )
            .unwrap(),
        ],
    )
    .unwrap()
}

/// Importer for tests that do not exercise directives.
struct NoImports;

impl Importer for NoImports {
    fn import(
        &mut self,
        path: &str,
        _kind: ImportKind,
        _file_id: u8,
    ) -> Result<ImportedTree, ImportError> {
        Err(ImportError {
            path: path.to_string(),
            message: "imports are not available in this test".to_string(),
        })
    }

    fn register_path(&mut self, _alias: &str, _path: &str) {}
}

/// Importer backed by in-memory source bodies (text after the
/// `#language` line), compiled recursively like the real coordinator.
struct SourceImporter {
    files: HashMap<String, String>,
    language: Language,
    registered: Vec<(String, String)>,
}

impl SourceImporter {
    fn new(files: &[(&str, &str)]) -> Self {
        Self {
            files: files
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            language: test_language(),
            registered: Vec::new(),
        }
    }
}

impl Importer for SourceImporter {
    fn import(
        &mut self,
        path: &str,
        _kind: ImportKind,
        file_id: u8,
    ) -> Result<ImportedTree, ImportError> {
        let resolved = self
            .registered
            .iter()
            .rev()
            .find(|(alias, _)| alias == path)
            .map(|(_, target)| target.clone())
            .unwrap_or_else(|| path.to_string());
        let source = self
            .files
            .get(&resolved)
            .cloned()
            .ok_or_else(|| ImportError {
                path: path.to_string(),
                message: "no such file".to_string(),
            })?;
        let language = self.language.clone();
        let doc = parse_source(&source, &resolved, &language, file_id, true, self).map_err(|d| {
            ImportError {
                path: path.to_string(),
                message: d.to_string(),
            }
        })?;
        Ok(ImportedTree {
            nodes: doc.roots,
            template_path: doc.template_path,
        })
    }

    fn register_path(&mut self, alias: &str, path: &str) {
        self.registered.push((alias.to_string(), path.to_string()));
    }
}

fn parse(source: &str) -> Document {
    parse_source(source, "test", &test_language(), 0, false, &mut NoImports).unwrap()
}

fn parse_err(source: &str) -> String {
    parse_source(source, "test", &test_language(), 0, false, &mut NoImports)
        .unwrap_err()
        .to_string()
}

#[test]
fn minimal_source() {
    let doc = parse("StringTests demo { string = \"hi\"; }");
    assert_eq!(doc.roots.len(), 1);
    let node = &doc.roots[0];
    assert_eq!(node.class_name, "StringTests");
    assert_eq!(node.class_id, Some(1));
    assert_eq!(node.name, "demo");
    assert_eq!(node.file_id, 0);
    assert_eq!(node.attribute("string"), Some(&Value::String("hi".into())));
}

#[test]
fn nested_scopes_and_leaf_declarations() {
    let doc = parse("Container a { Container b { Container c; } Container d; }");
    let b = doc.object("a/b").unwrap();
    assert_eq!(b.children.len(), 1);
    assert!(doc.object("a/b/c").is_some());
    assert!(doc.object("a/d").is_some());
    assert!(doc.object("a/e").is_none());
}

#[test]
fn markdown_and_string_literals_are_kept_distinct() {
    let doc = parse("StringTests s { markdown = ```# hello```; string = \"plain\"; }");
    let node = &doc.roots[0];
    assert_eq!(node.attribute("markdown"), Some(&Value::StrMd("# hello".into())));
    assert_eq!(node.attribute("string"), Some(&Value::String("plain".into())));
}

#[test]
fn numeric_widths_are_exact() {
    let doc = parse(
        "NumberTests n { int8 = -128; uint8 = 255; int64 = -9000000000; float = 1.5; double = 2.25; }",
    );
    let node = &doc.roots[0];
    assert_eq!(node.attribute("int8"), Some(&Value::Int8(-128)));
    assert_eq!(node.attribute("uint8"), Some(&Value::Uint8(255)));
    assert_eq!(node.attribute("int64"), Some(&Value::Int64(-9_000_000_000)));
    assert_eq!(node.attribute("float"), Some(&Value::Float(1.5)));
    assert_eq!(node.attribute("double"), Some(&Value::Double(2.25)));
}

#[test]
fn out_of_range_numbers_are_rejected_in_place() {
    let err = parse_err("NumberTests n { uint8 = 256; }");
    assert!(err.contains("not a valid uint8"));
    let err = parse_err("NumberTests n { int8 = 1.5; }");
    assert!(err.contains("not a valid int8"));
}

#[test]
fn vector_parsing() {
    let doc = parse("VectorTests v { vec3f = vec3(1, 2, 3); }");
    assert_eq!(
        doc.roots[0].attribute("vec3f"),
        Some(&Value::Vec3f(Vec3::new(1.0, 2.0, 3.0)))
    );

    let doc = parse("VectorTests v { vec3f = vec3f(1, 2, 3); }");
    assert_eq!(
        doc.roots[0].attribute("vec3f"),
        Some(&Value::Vec3f(Vec3::new(1.0, 2.0, 3.0)))
    );
}

#[test]
fn vector_arity_must_match() {
    let err = parse_err("VectorTests v { vec3f = vec3(1, 2); }");
    assert!(err.contains("expects 3 components"));
}

#[test]
fn vector_constructor_must_agree_with_the_declared_type() {
    let err = parse_err("VectorTests v { vec3d = vec3(1, 2, 3); }");
    assert!(err.contains("cannot produce a vec3d"));
}

#[test]
fn unknown_attributes_are_rejected() {
    let err = parse_err("StringTests s { nope = \"x\"; }");
    assert!(err.contains("has no attribute `nope`"));
}

#[test]
fn type_mismatch_in_assignment() {
    let err = parse_err("StringTests s { string = 42; }");
    assert!(err.contains("expected a \"...\" literal"));
    let err = parse_err("StringTests s { markdown = \"plain\"; }");
    assert!(err.contains("expected a ```...``` literal"));
}

#[test]
fn scope_underflow_is_reported_with_location() {
    let err = parse_source(
        "Container a;\n}",
        "test",
        &test_language(),
        0,
        false,
        &mut NoImports,
    )
    .unwrap_err();
    let diag = err.iter().next().unwrap();
    assert!(diag.message.contains("unexpected `}`"));
    assert_eq!(diag.line, 3); // offset by the consumed #language line
}

#[test]
fn errors_accumulate_past_recovery_points() {
    let err = parse_source(
        "StringTests s { nope = \"x\"; string = 42; }\n}",
        "test",
        &test_language(),
        0,
        false,
        &mut NoImports,
    )
    .unwrap_err();
    assert_eq!(err.len(), 3);
}

#[test]
fn assignment_outside_any_node() {
    let err = parse_err("string = \"x\";");
    assert!(err.contains("outside of any node"));
}

#[test]
fn static_include_grafts_invisible_nodes() {
    let mut importer = SourceImporter::new(&[("A.elt", "Container a;")]);
    let doc = parse_source(
        "#include \"A.elt\"\nContainer b;",
        "B",
        &test_language(),
        0,
        false,
        &mut importer,
    )
    .unwrap();
    assert_eq!(doc.roots.len(), 2);
    assert_eq!(doc.roots[0].name, "a");
    assert_eq!(doc.roots[0].file_id, 0);
    assert_eq!(doc.files.len(), 1); // only the file's own entry
}

#[test]
fn dynamic_include_tags_the_subtree() {
    let mut importer = SourceImporter::new(&[("A.elt", "Container a;")]);
    let doc = parse_source(
        "#include-dyn \"A.elt\"\nContainer b;",
        "B",
        &test_language(),
        0,
        false,
        &mut importer,
    )
    .unwrap();
    assert_eq!(doc.roots[0].name, "a");
    assert_eq!(doc.roots[0].file_id, 1);
    assert_eq!(doc.roots[1].file_id, 0);
    assert_eq!(doc.files[1], SourceFile::Include("A.elt".into()));
}

#[test]
fn dynamic_include_degrades_to_static_inside_an_included_file() {
    let mut importer = SourceImporter::new(&[("A.elt", "Container a;")]);
    let doc = parse_source(
        "#include-dyn \"A.elt\"",
        "B",
        &test_language(),
        3,
        true,
        &mut importer,
    )
    .unwrap();
    assert_eq!(doc.roots[0].file_id, 3);
    assert_eq!(doc.files.len(), 1);
}

#[test]
fn template_import_nests_following_content() {
    let mut importer = SourceImporter::new(&[("T.elt", "Container root { #template }")]);
    let doc = parse_source(
        "#template \"T.elt\"\nContainer child;",
        "U",
        &test_language(),
        0,
        false,
        &mut importer,
    )
    .unwrap();
    assert_eq!(doc.roots.len(), 1);
    let root = &doc.roots[0];
    assert_eq!(root.name, "root");
    assert_eq!(root.children.len(), 1);
    assert_eq!(root.children[0].name, "child");
    assert_eq!(doc.external_template_path, Some(vec![0]));
}

#[test]
fn at_most_one_template_per_file() {
    let mut importer = SourceImporter::new(&[("T.elt", "Container root { #template }")]);
    let err = parse_source(
        "#template \"T.elt\"\n#template-dyn \"T.elt\"",
        "U",
        &test_language(),
        0,
        false,
        &mut importer,
    )
    .unwrap_err();
    assert!(err.to_string().contains("already been imported"));
}

#[test]
fn template_file_must_mark_a_node() {
    let mut importer = SourceImporter::new(&[("T.elt", "Container root;")]);
    let err = parse_source(
        "#template \"T.elt\"",
        "U",
        &test_language(),
        0,
        false,
        &mut importer,
    )
    .unwrap_err();
    assert!(err.to_string().contains("does not mark a template node"));
}

#[test]
fn bare_template_marks_the_open_node() {
    let doc = parse("Container root { Container inner { #template } }");
    assert_eq!(doc.template_path, Some(vec![0, 0]));
    let err = parse_err("#template\nContainer a;");
    assert!(err.contains("outside of any node"));
}

#[test]
fn register_directive_reaches_the_importer() {
    let mut importer = SourceImporter::new(&[("real/path.elt", "Container aliased;")]);
    let doc = parse_source(
        "#register \"lib\" \"real/path.elt\"\n#include \"lib\"",
        "B",
        &test_language(),
        0,
        false,
        &mut importer,
    )
    .unwrap();
    assert_eq!(importer.registered, vec![("lib".into(), "real/path.elt".into())]);
    assert_eq!(doc.roots[0].name, "aliased");
}

#[test]
fn import_failures_abort_the_parse() {
    let err = parse_source(
        "#include \"missing.elt\"\nContainer never;",
        "B",
        &test_language(),
        0,
        false,
        &mut SourceImporter::new(&[]),
    )
    .unwrap_err();
    assert!(err.to_string().contains("no such file"));
}

#[test]
fn misplaced_language_directive() {
    let err = parse_err("#language test\nContainer a;");
    assert!(err.contains("first line"));
}
