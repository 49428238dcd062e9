use crate::attribute::AttributeDef;
use crate::language::{LanguageError, MAX_ATTRIBUTES};
use crate::types::Type;

/// A named node type with an ordered list of attribute declarations.
#[derive(Debug, Clone)]
pub struct Class {
    name: String,
    attributes: Vec<AttributeDef>,
}

impl Class {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attributes(
        name: impl Into<String>,
        attributes: Vec<AttributeDef>,
    ) -> Result<Self, LanguageError> {
        let mut class = Self::new(name);
        for def in attributes {
            class.register_attribute(def)?;
        }
        Ok(class)
    }

    /// Attribute IDs must fit in one byte, so a class caps at 256 entries.
    pub fn register_attribute(&mut self, def: AttributeDef) -> Result<(), LanguageError> {
        if self.attributes.len() >= MAX_ATTRIBUTES {
            return Err(LanguageError::TooManyAttributes {
                class: self.name.clone(),
                attribute: def.name,
            });
        }
        self.attributes.push(def);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attributes(&self) -> &[AttributeDef] {
        &self.attributes
    }

    pub fn attribute(&self, id: u8) -> Option<&AttributeDef> {
        self.attributes.get(id as usize)
    }

    pub fn attribute_id(&self, name: &str) -> Option<u8> {
        self.attributes
            .iter()
            .position(|a| a.name == name)
            .map(|id| id as u8)
    }

    pub fn attribute_type(&self, name: &str) -> Option<Type> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_ids_follow_declaration_order() {
        let class = Class::with_attributes(
            "Widget",
            vec![
                AttributeDef::new("width", Type::Uint32),
                AttributeDef::new("height", Type::Uint32),
                AttributeDef::new("label", Type::String),
            ],
        )
        .unwrap();
        assert_eq!(class.attribute_id("width"), Some(0));
        assert_eq!(class.attribute_id("label"), Some(2));
        assert_eq!(class.attribute_type("height"), Some(Type::Uint32));
        assert_eq!(class.attribute(2).map(|a| a.name.as_str()), Some("label"));
        assert_eq!(class.attribute_id("depth"), None);
    }

    #[test]
    fn caps_at_256_attributes() {
        let defs: Vec<_> = (0..=MAX_ATTRIBUTES)
            .map(|i| AttributeDef::new(format!("a{i}"), Type::Int8))
            .collect();
        assert!(matches!(
            Class::with_attributes("Fat", defs),
            Err(LanguageError::TooManyAttributes { .. })
        ));
    }
}
