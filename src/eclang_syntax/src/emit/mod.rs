//! Text emission for the decompiler.

pub mod source;

use std::fmt::{self, Write};

use thiserror::Error;

use crate::value::Value;

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("formatting failed")]
    Fmt(#[from] fmt::Error),
    #[error("node references unknown file id {id}")]
    UnknownFile { id: u8 },
    #[error("external template path does not resolve to a node")]
    MissingTemplateTarget,
}

#[derive(Default)]
pub struct EmitCtx {
    pub indent: usize,
}

impl EmitCtx {
    pub fn new() -> Self {
        Self { indent: 0 }
    }

    /// Writes the indentation for the current nesting level.
    pub fn pad<W: Write>(&self, w: &mut W) -> Result<(), EmitError> {
        for _ in 0..self.indent {
            w.write_str("    ")?;
        }
        Ok(())
    }

    pub fn nl<W: Write>(&self, w: &mut W) -> Result<(), EmitError> {
        w.write_char('\n')?;
        Ok(())
    }
}

pub trait Emit {
    fn emit<W: Write>(&self, w: &mut W, cx: &mut EmitCtx) -> Result<(), EmitError>;
}

fn write_escaped<W: Write>(w: &mut W, text: &str, delimiter: char) -> Result<(), EmitError> {
    for c in text.chars() {
        if c == '\\' || c == delimiter {
            w.write_char('\\')?;
        }
        w.write_char(c)?;
    }
    Ok(())
}

/// Source-literal form of a value: quoted strings, backticked markdown
/// strings, canonical text for everything else.
impl Emit for Value {
    fn emit<W: Write>(&self, w: &mut W, _cx: &mut EmitCtx) -> Result<(), EmitError> {
        match self {
            Value::String(s) => {
                w.write_char('"')?;
                write_escaped(w, s, '"')?;
                w.write_char('"')?;
            }
            Value::StrMd(s) => {
                w.write_str("```")?;
                write_escaped(w, s, '`')?;
                w.write_str("```")?;
            }
            other => write!(w, "{other}")?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectors::Vec3;

    fn emitted(value: &Value) -> String {
        let mut out = String::new();
        let mut cx = EmitCtx::new();
        value.emit(&mut out, &mut cx).unwrap();
        out
    }

    #[test]
    fn literals() {
        assert_eq!(emitted(&Value::Int16(-4)), "-4");
        assert_eq!(emitted(&Value::String("say \"hi\"".into())), "\"say \\\"hi\\\"\"");
        assert_eq!(emitted(&Value::StrMd("# title".into())), "```# title```");
        assert_eq!(
            emitted(&Value::Vec3i(Vec3::new(1, 2, 3))),
            "vec3i(1, 2, 3)"
        );
    }
}
