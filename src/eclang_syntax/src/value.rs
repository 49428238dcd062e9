use std::fmt;

use serde::Serialize;

use crate::types::Type;
use crate::vectors::{Vec2, Vec3, Vec4};

/// An attribute value. One variant per [`Type`], so a value can never
/// disagree with the type it claims to have.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Uint8(u8),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Float(f32),
    Double(f64),
    String(String),
    StrMd(String),
    Vec2i(Vec2<i32>),
    Vec3i(Vec3<i32>),
    Vec4i(Vec4<i32>),
    Vec2l(Vec2<i64>),
    Vec3l(Vec3<i64>),
    Vec4l(Vec4<i64>),
    Vec2f(Vec2<f32>),
    Vec3f(Vec3<f32>),
    Vec4f(Vec4<f32>),
    Vec2d(Vec2<f64>),
    Vec3d(Vec3<f64>),
    Vec4d(Vec4<f64>),
}

impl Value {
    /// The declared type this value satisfies.
    pub fn ty(&self) -> Type {
        match self {
            Value::Int8(_) => Type::Int8,
            Value::Int16(_) => Type::Int16,
            Value::Int32(_) => Type::Int32,
            Value::Int64(_) => Type::Int64,
            Value::Uint8(_) => Type::Uint8,
            Value::Uint16(_) => Type::Uint16,
            Value::Uint32(_) => Type::Uint32,
            Value::Uint64(_) => Type::Uint64,
            Value::Float(_) => Type::Float,
            Value::Double(_) => Type::Double,
            Value::String(_) => Type::String,
            Value::StrMd(_) => Type::StrMd,
            Value::Vec2i(_) => Type::Vec2i,
            Value::Vec3i(_) => Type::Vec3i,
            Value::Vec4i(_) => Type::Vec4i,
            Value::Vec2l(_) => Type::Vec2l,
            Value::Vec3l(_) => Type::Vec3l,
            Value::Vec4l(_) => Type::Vec4l,
            Value::Vec2f(_) => Type::Vec2f,
            Value::Vec3f(_) => Type::Vec3f,
            Value::Vec4f(_) => Type::Vec4f,
            Value::Vec2d(_) => Type::Vec2d,
            Value::Vec3d(_) => Type::Vec3d,
            Value::Vec4d(_) => Type::Vec4d,
        }
    }

    pub fn as_i8(&self) -> Option<i8> {
        match self {
            Value::Int8(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i16(&self) -> Option<i16> {
        match self {
            Value::Int16(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u8(&self) -> Option<u8> {
        match self {
            Value::Uint8(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u16(&self) -> Option<u16> {
        match self {
            Value::Uint16(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Value::Uint32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Uint64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Text payload of `String` and `StrMd` values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) | Value::StrMd(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_vec2i(&self) -> Option<Vec2<i32>> {
        match self {
            Value::Vec2i(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec3i(&self) -> Option<Vec3<i32>> {
        match self {
            Value::Vec3i(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec4i(&self) -> Option<Vec4<i32>> {
        match self {
            Value::Vec4i(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec2l(&self) -> Option<Vec2<i64>> {
        match self {
            Value::Vec2l(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec3l(&self) -> Option<Vec3<i64>> {
        match self {
            Value::Vec3l(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec4l(&self) -> Option<Vec4<i64>> {
        match self {
            Value::Vec4l(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec2f(&self) -> Option<Vec2<f32>> {
        match self {
            Value::Vec2f(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec3f(&self) -> Option<Vec3<f32>> {
        match self {
            Value::Vec3f(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec4f(&self) -> Option<Vec4<f32>> {
        match self {
            Value::Vec4f(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec2d(&self) -> Option<Vec2<f64>> {
        match self {
            Value::Vec2d(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec3d(&self) -> Option<Vec3<f64>> {
        match self {
            Value::Vec3d(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec4d(&self) -> Option<Vec4<f64>> {
        match self {
            Value::Vec4d(v) => Some(*v),
            _ => None,
        }
    }
}

/// Canonical textual form: decimal integers, shortest round-trip floats,
/// `vecN[ilfd](c1, ..., cN)` for vectors, the raw payload for strings.
///
/// This is the form the decompiler emits for scalar payloads and the
/// fallback used when an attribute has to be serialized as a custom
/// (string-valued) attribute.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int8(v) => write!(f, "{v}"),
            Value::Int16(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Uint8(v) => write!(f, "{v}"),
            Value::Uint16(v) => write!(f, "{v}"),
            Value::Uint32(v) => write!(f, "{v}"),
            Value::Uint64(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::String(s) | Value::StrMd(s) => f.write_str(s),
            Value::Vec2i(v) => write!(f, "vec2i({}, {})", v.x, v.y),
            Value::Vec3i(v) => write!(f, "vec3i({}, {}, {})", v.x, v.y, v.z),
            Value::Vec4i(v) => write!(f, "vec4i({}, {}, {}, {})", v.x, v.y, v.z, v.w),
            Value::Vec2l(v) => write!(f, "vec2l({}, {})", v.x, v.y),
            Value::Vec3l(v) => write!(f, "vec3l({}, {}, {})", v.x, v.y, v.z),
            Value::Vec4l(v) => write!(f, "vec4l({}, {}, {}, {})", v.x, v.y, v.z, v.w),
            Value::Vec2f(v) => write!(f, "vec2f({}, {})", v.x, v.y),
            Value::Vec3f(v) => write!(f, "vec3f({}, {}, {})", v.x, v.y, v.z),
            Value::Vec4f(v) => write!(f, "vec4f({}, {}, {}, {})", v.x, v.y, v.z, v.w),
            Value::Vec2d(v) => write!(f, "vec2d({}, {})", v.x, v.y),
            Value::Vec3d(v) => write!(f, "vec3d({}, {}, {})", v.x, v.y, v.z),
            Value::Vec4d(v) => write!(f, "vec4d({}, {}, {}, {})", v.x, v.y, v.z, v.w),
        }
    }
}
