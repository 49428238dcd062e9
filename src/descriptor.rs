//! The built-in `eclang-descriptor` language and its interpreter.
//!
//! A descriptor file declares new language bindings in EcLang itself:
//! root `Language` nodes carry the extensions and identifier bytes,
//! their `Class` children declare node types, and `Attribute`
//! grandchildren declare typed attributes. Interpreting such a file
//! yields `Language` values that can be registered into an environment.

use log::info;
use thiserror::Error;

use eclang_syntax::{AttributeDef, Class, Language, LanguageError, Node, Type};

use crate::document::EcLang;
use crate::env::Env;

#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("`{node}` is missing the `{attribute}` attribute")]
    MissingAttribute { node: String, attribute: String },
    #[error("attribute `{attribute}` declares unknown type `{ty}`")]
    UnknownType { attribute: String, ty: String },
    #[error("invalid identifier byte entry `{entry}` (expected 'X', a decimal or a 0x.. hex in 1..=255)")]
    IdentifierByte { entry: String },
    #[error(transparent)]
    Language(#[from] LanguageError),
}

/// The built-in binding for `.eld`/`.eldc` descriptor files.
pub fn descriptor_language() -> Language {
    Language::with_classes(
        "eclang-descriptor",
        "eld",
        "eldc",
        vec![b'E', b'C', b'L', b'D', 0x31],
        vec![
            // The language name is not an attribute; it comes from the
            // node's own name (`Language myLanguage { ... }`).
            Class::with_attributes(
                "Language",
                vec![
                    AttributeDef::new("sourceExtension", Type::String),
                    AttributeDef::new("binaryExtension", Type::String),
                    AttributeDef::new("identifierBytes", Type::String),
                ],
            )
            .expect("descriptor Language class is well-formed"),
            // Class has no attributes of its own, only Attribute children.
            Class::new("Class"),
            Class::with_attributes("Attribute", vec![AttributeDef::new("type", Type::String)])
                .expect("descriptor Attribute class is well-formed"),
        ],
    )
    .expect("built-in descriptor language is well-formed")
}

/// Interprets a compiled descriptor file into language bindings. Root
/// nodes of classes other than `Language` are ignored.
pub fn languages_from_file(file: &EcLang) -> Result<Vec<Language>, DescriptorError> {
    file.all_objects()
        .iter()
        .filter(|node| node.class_name == "Language")
        .map(language_from_node)
        .collect()
}

/// Interprets a descriptor file and registers every language it declares.
/// Returns how many were registered.
pub fn register_languages(env: &mut Env, file: &EcLang) -> Result<usize, DescriptorError> {
    let languages = languages_from_file(file)?;
    let count = languages.len();
    for language in languages {
        info!("registering language `{}` from `{}`", language.name(), file.name());
        env.register_language(language);
    }
    Ok(count)
}

fn string_attribute(node: &Node, attribute: &str) -> Result<String, DescriptorError> {
    node.attribute(attribute)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| DescriptorError::MissingAttribute {
            node: node.name.clone(),
            attribute: attribute.to_string(),
        })
}

fn language_from_node(node: &Node) -> Result<Language, DescriptorError> {
    let source_extension = string_attribute(node, "sourceExtension")?;
    let binary_extension = string_attribute(node, "binaryExtension")?;
    let identifier = parse_identifier_bytes(&string_attribute(node, "identifierBytes")?)?;

    let mut language = Language::new(
        node.name.clone(),
        source_extension,
        binary_extension,
        identifier,
    )?;
    for class_node in node.children_by_class("Class") {
        let mut class = Class::new(class_node.name.clone());
        for attribute_node in class_node.children_by_class("Attribute") {
            let ty_name = string_attribute(attribute_node, "type")?;
            let ty = Type::from_descriptor_name(&ty_name).ok_or_else(|| {
                DescriptorError::UnknownType {
                    attribute: attribute_node.name.clone(),
                    ty: ty_name,
                }
            })?;
            class.register_attribute(AttributeDef::new(attribute_node.name.clone(), ty))?;
        }
        language.register_class(class)?;
    }
    Ok(language)
}

/// Comma-separated identifier bytes: char literals (`'X'`) or integers
/// (decimal or `0x..` hex), each in 1..=255.
fn parse_identifier_bytes(text: &str) -> Result<Vec<u8>, DescriptorError> {
    let invalid = |entry: &str| DescriptorError::IdentifierByte {
        entry: entry.to_string(),
    };
    let mut bytes = Vec::new();
    for raw in text.split(',') {
        let entry = raw.trim();
        let byte = if let Some(inner) = entry
            .strip_prefix('\'')
            .and_then(|rest| rest.strip_suffix('\''))
        {
            let mut chars = inner.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => c as u8,
                _ => return Err(invalid(entry)),
            }
        } else if let Some(hex) = entry.strip_prefix("0x").or_else(|| entry.strip_prefix("0X")) {
            u8::from_str_radix(hex, 16).map_err(|_| invalid(entry))?
        } else {
            entry.parse::<u8>().map_err(|_| invalid(entry))?
        };
        if byte == 0 {
            return Err(invalid(entry));
        }
        bytes.push(byte);
    }
    Ok(bytes)
}
