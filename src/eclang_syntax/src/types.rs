use serde::Serialize;

/// The closed set of attribute types an EcLang language can declare.
///
/// Numeric widths are exact and vectors are fixed-arity tuples. `String`
/// and `StrMd` share the same payload (UTF-8 text); they stay distinct so
/// decompilation can re-emit the original literal flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Type {
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float,
    Double,
    String,
    StrMd,
    Vec2i,
    Vec3i,
    Vec4i,
    Vec2l,
    Vec3l,
    Vec4l,
    Vec2f,
    Vec3f,
    Vec4f,
    Vec2d,
    Vec3d,
    Vec4d,
}

/// Element type of a vector, named after the source-level suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorElement {
    /// `i`: int32 components
    Int,
    /// `l`: int64 components
    Long,
    /// `f`: float components
    Float,
    /// `d`: double components
    Double,
}

impl VectorElement {
    pub fn suffix(self) -> char {
        match self {
            VectorElement::Int => 'i',
            VectorElement::Long => 'l',
            VectorElement::Float => 'f',
            VectorElement::Double => 'd',
        }
    }
}

impl Type {
    /// True for the ten scalar numeric types.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Type::Int8
                | Type::Int16
                | Type::Int32
                | Type::Int64
                | Type::Uint8
                | Type::Uint16
                | Type::Uint32
                | Type::Uint64
                | Type::Float
                | Type::Double
        )
    }

    /// True for `String` and `StrMd`.
    pub fn is_string(self) -> bool {
        matches!(self, Type::String | Type::StrMd)
    }

    /// Arity and element type for vector types, `None` otherwise.
    pub fn vector_shape(self) -> Option<(usize, VectorElement)> {
        let shape = match self {
            Type::Vec2i => (2, VectorElement::Int),
            Type::Vec3i => (3, VectorElement::Int),
            Type::Vec4i => (4, VectorElement::Int),
            Type::Vec2l => (2, VectorElement::Long),
            Type::Vec3l => (3, VectorElement::Long),
            Type::Vec4l => (4, VectorElement::Long),
            Type::Vec2f => (2, VectorElement::Float),
            Type::Vec3f => (3, VectorElement::Float),
            Type::Vec4f => (4, VectorElement::Float),
            Type::Vec2d => (2, VectorElement::Double),
            Type::Vec3d => (3, VectorElement::Double),
            Type::Vec4d => (4, VectorElement::Double),
            _ => return None,
        };
        Some(shape)
    }

    pub fn is_vector(self) -> bool {
        self.vector_shape().is_some()
    }

    /// The canonical source-level constructor for vector types
    /// (`vec3f`, `vec2i`, ...), `None` for scalars and strings.
    pub fn vector_constructor(self) -> Option<String> {
        self.vector_shape()
            .map(|(arity, elem)| format!("vec{}{}", arity, elem.suffix()))
    }

    /// Name used by language-descriptor files to declare this type.
    pub fn descriptor_name(self) -> &'static str {
        match self {
            Type::Int8 => "int8",
            Type::Int16 => "int16",
            Type::Int32 => "int32",
            Type::Int64 => "int64",
            Type::Uint8 => "uint8",
            Type::Uint16 => "uint16",
            Type::Uint32 => "uint32",
            Type::Uint64 => "uint64",
            Type::Float => "float",
            Type::Double => "double",
            Type::String => "string",
            Type::StrMd => "str-md",
            Type::Vec2i => "vec2i",
            Type::Vec3i => "vec3i",
            Type::Vec4i => "vec4i",
            Type::Vec2l => "vec2l",
            Type::Vec3l => "vec3l",
            Type::Vec4l => "vec4l",
            Type::Vec2f => "vec2f",
            Type::Vec3f => "vec3f",
            Type::Vec4f => "vec4f",
            Type::Vec2d => "vec2d",
            Type::Vec3d => "vec3d",
            Type::Vec4d => "vec4d",
        }
    }

    /// Inverse of [`Type::descriptor_name`].
    pub fn from_descriptor_name(name: &str) -> Option<Type> {
        let ty = match name {
            "int8" => Type::Int8,
            "int16" => Type::Int16,
            "int32" => Type::Int32,
            "int64" => Type::Int64,
            "uint8" => Type::Uint8,
            "uint16" => Type::Uint16,
            "uint32" => Type::Uint32,
            "uint64" => Type::Uint64,
            "float" => Type::Float,
            "double" => Type::Double,
            "string" => Type::String,
            "str-md" => Type::StrMd,
            "vec2i" => Type::Vec2i,
            "vec3i" => Type::Vec3i,
            "vec4i" => Type::Vec4i,
            "vec2l" => Type::Vec2l,
            "vec3l" => Type::Vec3l,
            "vec4l" => Type::Vec4l,
            "vec2f" => Type::Vec2f,
            "vec3f" => Type::Vec3f,
            "vec4f" => Type::Vec4f,
            "vec2d" => Type::Vec2d,
            "vec3d" => Type::Vec3d,
            "vec4d" => Type::Vec4d,
            _ => return None,
        };
        Some(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_names_round_trip() {
        let all = [
            Type::Int8,
            Type::Int16,
            Type::Int32,
            Type::Int64,
            Type::Uint8,
            Type::Uint16,
            Type::Uint32,
            Type::Uint64,
            Type::Float,
            Type::Double,
            Type::String,
            Type::StrMd,
            Type::Vec2i,
            Type::Vec3i,
            Type::Vec4i,
            Type::Vec2l,
            Type::Vec3l,
            Type::Vec4l,
            Type::Vec2f,
            Type::Vec3f,
            Type::Vec4f,
            Type::Vec2d,
            Type::Vec3d,
            Type::Vec4d,
        ];
        for ty in all {
            assert_eq!(Type::from_descriptor_name(ty.descriptor_name()), Some(ty));
        }
        assert_eq!(Type::from_descriptor_name("quaternion"), None);
    }

    #[test]
    fn vector_shapes() {
        assert_eq!(Type::Vec3f.vector_shape(), Some((3, VectorElement::Float)));
        assert_eq!(Type::Vec2l.vector_shape(), Some((2, VectorElement::Long)));
        assert_eq!(Type::Int32.vector_shape(), None);
        assert_eq!(Type::Vec4d.vector_constructor().as_deref(), Some("vec4d"));
    }
}
