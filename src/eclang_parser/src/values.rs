//! Typed literal parsing for attribute assignments. Widths are exact:
//! a literal that does not fit the declared type is rejected where it
//! stands.

use syntax::types::VectorElement;
use syntax::vectors::{Vec2, Vec3, Vec4};
use syntax::{Type, Value};

/// Parses a NUMBER lexeme as the declared scalar numeric type.
pub fn parse_number(ty: Type, lexeme: &str) -> Result<Value, String> {
    fn err(lexeme: &str, ty: Type) -> String {
        format!(
            "`{lexeme}` is not a valid {} value",
            ty.descriptor_name()
        )
    }
    match ty {
        Type::Int8 => lexeme.parse().map(Value::Int8).map_err(|_| err(lexeme, ty)),
        Type::Int16 => lexeme.parse().map(Value::Int16).map_err(|_| err(lexeme, ty)),
        Type::Int32 => lexeme.parse().map(Value::Int32).map_err(|_| err(lexeme, ty)),
        Type::Int64 => lexeme.parse().map(Value::Int64).map_err(|_| err(lexeme, ty)),
        Type::Uint8 => lexeme.parse().map(Value::Uint8).map_err(|_| err(lexeme, ty)),
        Type::Uint16 => lexeme.parse().map(Value::Uint16).map_err(|_| err(lexeme, ty)),
        Type::Uint32 => lexeme.parse().map(Value::Uint32).map_err(|_| err(lexeme, ty)),
        Type::Uint64 => lexeme.parse().map(Value::Uint64).map_err(|_| err(lexeme, ty)),
        Type::Float => lexeme.parse().map(Value::Float).map_err(|_| err(lexeme, ty)),
        Type::Double => lexeme.parse().map(Value::Double).map_err(|_| err(lexeme, ty)),
        other => Err(format!(
            "attribute type {} does not take a numeric literal",
            other.descriptor_name()
        )),
    }
}

/// Checks a vector constructor name against the declared type. Float
/// vectors also accept the suffix-less spelling (`vec3` for vec3f).
pub fn constructor_matches(ty: Type, constructor: &str) -> bool {
    let Some((arity, element)) = ty.vector_shape() else {
        return false;
    };
    let canonical = format!("vec{}{}", arity, element.suffix());
    if constructor == canonical {
        return true;
    }
    element == VectorElement::Float && constructor == format!("vec{arity}")
}

fn components<T: std::str::FromStr>(
    lexemes: &[String],
    element: &str,
) -> Result<Vec<T>, String> {
    lexemes
        .iter()
        .map(|lexeme| {
            lexeme
                .parse()
                .map_err(|_| format!("`{lexeme}` is not a valid {element} component"))
        })
        .collect()
}

/// Builds a vector value of the declared type from component lexemes,
/// checking arity and component range.
pub fn build_vector(ty: Type, lexemes: &[String]) -> Result<Value, String> {
    let (arity, _) = ty
        .vector_shape()
        .ok_or_else(|| format!("{} is not a vector type", ty.descriptor_name()))?;
    if lexemes.len() != arity {
        return Err(format!(
            "vector constructor expects {arity} components, got {}",
            lexemes.len()
        ));
    }
    let value = match ty {
        Type::Vec2i => {
            let c: Vec<i32> = components(lexemes, "int32")?;
            Value::Vec2i(Vec2::new(c[0], c[1]))
        }
        Type::Vec3i => {
            let c: Vec<i32> = components(lexemes, "int32")?;
            Value::Vec3i(Vec3::new(c[0], c[1], c[2]))
        }
        Type::Vec4i => {
            let c: Vec<i32> = components(lexemes, "int32")?;
            Value::Vec4i(Vec4::new(c[0], c[1], c[2], c[3]))
        }
        Type::Vec2l => {
            let c: Vec<i64> = components(lexemes, "int64")?;
            Value::Vec2l(Vec2::new(c[0], c[1]))
        }
        Type::Vec3l => {
            let c: Vec<i64> = components(lexemes, "int64")?;
            Value::Vec3l(Vec3::new(c[0], c[1], c[2]))
        }
        Type::Vec4l => {
            let c: Vec<i64> = components(lexemes, "int64")?;
            Value::Vec4l(Vec4::new(c[0], c[1], c[2], c[3]))
        }
        Type::Vec2f => {
            let c: Vec<f32> = components(lexemes, "float")?;
            Value::Vec2f(Vec2::new(c[0], c[1]))
        }
        Type::Vec3f => {
            let c: Vec<f32> = components(lexemes, "float")?;
            Value::Vec3f(Vec3::new(c[0], c[1], c[2]))
        }
        Type::Vec4f => {
            let c: Vec<f32> = components(lexemes, "float")?;
            Value::Vec4f(Vec4::new(c[0], c[1], c[2], c[3]))
        }
        Type::Vec2d => {
            let c: Vec<f64> = components(lexemes, "double")?;
            Value::Vec2d(Vec2::new(c[0], c[1]))
        }
        Type::Vec3d => {
            let c: Vec<f64> = components(lexemes, "double")?;
            Value::Vec3d(Vec3::new(c[0], c[1], c[2]))
        }
        Type::Vec4d => {
            let c: Vec<f64> = components(lexemes, "double")?;
            Value::Vec4d(Vec4::new(c[0], c[1], c[2], c[3]))
        }
        // vector_shape() above already excluded scalars
        other => {
            return Err(format!(
                "{} is not a vector type",
                other.descriptor_name()
            ));
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_widths() {
        assert_eq!(parse_number(Type::Int8, "-128"), Ok(Value::Int8(-128)));
        assert!(parse_number(Type::Int8, "128").is_err());
        assert!(parse_number(Type::Uint8, "-1").is_err());
        assert!(parse_number(Type::Int32, "1.5").is_err());
        assert_eq!(parse_number(Type::Float, "1.5"), Ok(Value::Float(1.5)));
    }

    #[test]
    fn constructor_agreement() {
        assert!(constructor_matches(Type::Vec3f, "vec3f"));
        assert!(constructor_matches(Type::Vec3f, "vec3"));
        assert!(!constructor_matches(Type::Vec3d, "vec3"));
        assert!(!constructor_matches(Type::Vec3i, "vec3"));
        assert!(constructor_matches(Type::Vec3i, "vec3i"));
        assert!(!constructor_matches(Type::Vec2f, "vec3"));
    }

    #[test]
    fn arity_is_checked() {
        let two = vec!["1".to_string(), "2".to_string()];
        assert!(build_vector(Type::Vec3f, &two).is_err());
        let three = vec!["1".to_string(), "2".to_string(), "3".to_string()];
        assert_eq!(
            build_vector(Type::Vec3f, &three),
            Ok(Value::Vec3f(Vec3::new(1.0, 2.0, 3.0)))
        );
    }
}
