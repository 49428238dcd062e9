//! Language descriptor files: defining a new language in EcLang itself
//! and compiling files of that language afterwards.

use eclang::{descriptor, EcLang, Env, MemorySource, Type, Value};

fn env_with(files: &[(&str, &str)]) -> Env {
    let mut source = MemorySource::new();
    for (path, text) in files {
        source.insert(*path, text.as_bytes());
    }
    Env::new(Box::new(source))
}

const SCENE_ELD: &str = "#language eclang-descriptor\n\
    Language scene {\n\
        sourceExtension = \"scn\";\n\
        binaryExtension = \"scnc\";\n\
        identifierBytes = \"'S', 'C', 'N', 0x31\";\n\
        Class Node {\n\
            Attribute position { type = \"vec3f\"; }\n\
            Attribute label { type = \"string\"; }\n\
        }\n\
        Class Camera {\n\
            Attribute fov { type = \"float\"; }\n\
        }\n\
    }";

#[test]
fn descriptor_files_define_new_languages() {
    let mut env = env_with(&[("scene.eld", SCENE_ELD)]);
    let file = EcLang::from_file("scene.eld", &mut env).unwrap();
    assert_eq!(file.language().name(), "eclang-descriptor");

    let registered = descriptor::register_languages(&mut env, &file).unwrap();
    assert_eq!(registered, 1);

    let scene = env.registry.by_name("scene").unwrap();
    assert_eq!(scene.identifier(), b"SCN1");
    assert_eq!(scene.source_extension(), "scn");
    assert_eq!(scene.class_id("Node"), Some(0));
    assert_eq!(scene.class_id("Camera"), Some(1));
    assert_eq!(scene.attribute(0, "label"), Some((1, Type::String)));
    assert_eq!(scene.attribute(1, "fov"), Some((0, Type::Float)));
}

#[test]
fn files_of_a_descriptor_defined_language_compile() {
    let mut env = env_with(&[("scene.eld", SCENE_ELD)]);
    let descriptor_file = EcLang::from_file("scene.eld", &mut env).unwrap();
    descriptor::register_languages(&mut env, &descriptor_file).unwrap();

    let source = "#language scene\n\
        Node player { position = vec3(0, 1, 0); label = \"spawn\"; }\n\
        Camera main { fov = 70.0; }";
    let file = EcLang::from_bytes("level", source.as_bytes(), &mut env).unwrap();
    assert_eq!(file.all_objects().len(), 2);
    assert_eq!(
        file.object("player").unwrap().attribute("label"),
        Some(&Value::String("spawn".into()))
    );

    // The compiled form identifies itself as the new language.
    let compiled = file.save_compiled().unwrap();
    assert!(compiled.starts_with(b"SCN1\x00"));
    let reloaded = EcLang::from_bytes("level", &compiled, &mut env).unwrap();
    assert_eq!(reloaded.language().name(), "scene");
    assert_eq!(reloaded.all_objects(), file.all_objects());
}

#[test]
fn bad_descriptor_entries_are_reported() {
    let bad = "#language eclang-descriptor\n\
        Language broken {\n\
            sourceExtension = \"b\";\n\
            binaryExtension = \"bc\";\n\
            identifierBytes = \"0, 'B'\";\n\
        }";
    let mut env = env_with(&[]);
    let file = EcLang::from_bytes("broken", bad.as_bytes(), &mut env).unwrap();
    let err = descriptor::register_languages(&mut env, &file).unwrap_err();
    assert!(err.to_string().contains("identifier byte"));

    let unknown_type = "#language eclang-descriptor\n\
        Language broken {\n\
            sourceExtension = \"b\";\n\
            binaryExtension = \"bc\";\n\
            identifierBytes = \"'B'\";\n\
            Class C {\n\
                Attribute a { type = \"quaternion\"; }\n\
            }\n\
        }";
    let file = EcLang::from_bytes("broken", unknown_type.as_bytes(), &mut env).unwrap();
    let err = descriptor::register_languages(&mut env, &file).unwrap_err();
    assert!(err.to_string().contains("quaternion"));
}
