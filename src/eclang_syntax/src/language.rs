use thiserror::Error;

use crate::class::Class;

/// Attribute IDs are encoded in one byte, so a class holds at most 256.
pub const MAX_ATTRIBUTES: usize = 256;
/// Class IDs are encoded in one byte and 255 is the custom-class marker,
/// so a language holds at most 255 classes.
pub const MAX_CLASSES: usize = 255;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LanguageError {
    #[error("language `{language}` has no identifier bytes")]
    EmptyIdentifier { language: String },
    #[error("identifier bytes of language `{language}` contain a zero byte")]
    ZeroIdentifierByte { language: String },
    #[error("language `{language}` already holds {MAX_CLASSES} classes, cannot register `{class}`")]
    TooManyClasses { language: String, class: String },
    #[error("class `{class}` already holds {MAX_ATTRIBUTES} attributes, cannot register `{attribute}`")]
    TooManyAttributes { class: String, attribute: String },
}

/// A binding for one dialect of the EcLang family: a name, the file
/// extensions used when saving, the identifier bytes that open every
/// compiled file, and the ordered classes legal in the dialect.
///
/// Class IDs are ordinal positions in the registration order; attribute
/// IDs are ordinal within their class. Both are stable once registered,
/// which is what makes the binary form self-describing.
#[derive(Debug, Clone)]
pub struct Language {
    name: String,
    source_extension: String,
    compiled_extension: String,
    identifier: Vec<u8>,
    classes: Vec<Class>,
}

impl Language {
    /// A zero byte terminates the identifier in the binary header, so the
    /// identifier itself must be non-empty and zero-free.
    pub fn new(
        name: impl Into<String>,
        source_extension: impl Into<String>,
        compiled_extension: impl Into<String>,
        identifier: Vec<u8>,
    ) -> Result<Self, LanguageError> {
        let name = name.into();
        if identifier.is_empty() {
            return Err(LanguageError::EmptyIdentifier { language: name });
        }
        if identifier.contains(&0) {
            return Err(LanguageError::ZeroIdentifierByte { language: name });
        }
        Ok(Self {
            name,
            source_extension: source_extension.into(),
            compiled_extension: compiled_extension.into(),
            identifier,
            classes: Vec::new(),
        })
    }

    /// Builds the whole binding in one call.
    pub fn with_classes(
        name: impl Into<String>,
        source_extension: impl Into<String>,
        compiled_extension: impl Into<String>,
        identifier: Vec<u8>,
        classes: Vec<Class>,
    ) -> Result<Self, LanguageError> {
        let mut language = Self::new(name, source_extension, compiled_extension, identifier)?;
        for class in classes {
            language.register_class(class)?;
        }
        Ok(language)
    }

    pub fn register_class(&mut self, class: Class) -> Result<(), LanguageError> {
        if self.classes.len() >= MAX_CLASSES {
            return Err(LanguageError::TooManyClasses {
                language: self.name.clone(),
                class: class.name().to_string(),
            });
        }
        self.classes.push(class);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_extension(&self) -> &str {
        &self.source_extension
    }

    pub fn compiled_extension(&self) -> &str {
        &self.compiled_extension
    }

    pub fn identifier(&self) -> &[u8] {
        &self.identifier
    }

    pub fn classes(&self) -> &[Class] {
        &self.classes
    }

    pub fn class(&self, id: u8) -> Option<&Class> {
        self.classes.get(id as usize)
    }

    pub fn class_by_name(&self, name: &str) -> Option<&Class> {
        self.classes.iter().find(|c| c.name() == name)
    }

    pub fn class_id(&self, name: &str) -> Option<u8> {
        self.classes
            .iter()
            .position(|c| c.name() == name)
            .map(|id| id as u8)
    }

    pub fn is_class(&self, name: &str) -> bool {
        self.class_id(name).is_some()
    }

    /// Resolves `(class id, attribute name)` to `(attribute id, type)`.
    pub fn attribute(&self, class_id: u8, attribute: &str) -> Option<(u8, crate::Type)> {
        let class = self.class(class_id)?;
        let id = class.attribute_id(attribute)?;
        let def = class.attribute(id)?;
        Some((id, def.ty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::AttributeDef;
    use crate::types::Type;

    #[test]
    fn rejects_zero_identifier_bytes() {
        let err = Language::new("bad", "b", "bc", vec![b'B', 0, b'1']).unwrap_err();
        assert_eq!(
            err,
            LanguageError::ZeroIdentifierByte {
                language: "bad".into()
            }
        );
        assert!(matches!(
            Language::new("empty", "e", "ec", vec![]),
            Err(LanguageError::EmptyIdentifier { .. })
        ));
    }

    #[test]
    fn class_ids_follow_registration_order() {
        let mut lang = Language::new("demo", "d", "dc", vec![b'D', b'1']).unwrap();
        lang.register_class(Class::new("First")).unwrap();
        lang.register_class(Class::new("Second")).unwrap();
        assert_eq!(lang.class_id("First"), Some(0));
        assert_eq!(lang.class_id("Second"), Some(1));
        assert_eq!(lang.class_id("Third"), None);
        assert!(lang.is_class("Second"));
    }

    #[test]
    fn caps_at_255_classes() {
        let mut lang = Language::new("big", "b", "bc", vec![b'B']).unwrap();
        for i in 0..MAX_CLASSES {
            lang.register_class(Class::new(format!("C{i}"))).unwrap();
        }
        assert!(matches!(
            lang.register_class(Class::new("Overflow")),
            Err(LanguageError::TooManyClasses { .. })
        ));
    }

    #[test]
    fn resolves_attribute_ids_and_types() {
        let class = Class::with_attributes(
            "Thing",
            vec![
                AttributeDef::new("first", Type::Int32),
                AttributeDef::new("second", Type::String),
            ],
        )
        .unwrap();
        let lang =
            Language::with_classes("demo", "d", "dc", vec![b'D'], vec![class]).unwrap();
        assert_eq!(lang.attribute(0, "second"), Some((1, Type::String)));
        assert_eq!(lang.attribute(0, "missing"), None);
        assert_eq!(lang.attribute(9, "first"), None);
    }
}
