use serde::Serialize;

use crate::types::Type;
use crate::value::Value;

/// An attribute as declared by a [`crate::Class`]: a name and a type,
/// no value yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeDef {
    pub name: String,
    pub ty: Type,
}

impl AttributeDef {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// An attribute carried by a [`crate::Node`]. The type is implied by the
/// value variant, which keeps the two from disagreeing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub value: Value,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn ty(&self) -> Type {
        self.value.ty()
    }
}
