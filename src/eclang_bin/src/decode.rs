//! Instruction stream → document.
//!
//! A single pass over the stream, replayed through the same
//! `DocumentBuilder` the source parser uses. Scope instructions are
//! tolerant no-ops when the stack cannot move; everything else that does
//! not add up (truncation, unknown ids, a second template) is fatal for
//! the file.

use byteorder::{LittleEndian, ReadBytesExt};
use log::debug;
use std::io::Cursor;

use syntax::document::SourceFile;
use syntax::vectors::{Vec2, Vec3, Vec4};
use syntax::{
    Attribute, Document, DocumentBuilder, ImportKind, Importer, Language, Node, Type, Value,
};

use crate::errors::DecodeError;
use crate::opcode;

/// Decodes a compiled file. `bytes` is the whole file including the
/// identifier header; `current_file` and `included` follow the same
/// discipline as the parser (0 and false for the user-loaded root).
pub fn decode(
    bytes: &[u8],
    name: &str,
    language: &Language,
    current_file: u8,
    included: bool,
    importer: &mut dyn Importer,
) -> Result<Document, DecodeError> {
    let identifier = language.identifier();
    if !bytes.starts_with(identifier) || bytes.get(identifier.len()) != Some(&0) {
        return Err(DecodeError::BadHeader);
    }
    debug!("decoding `{name}` as compiled {}", language.name());
    let mut reader = Reader::new(&bytes[identifier.len() + 1..]);
    let mut builder = DocumentBuilder::new(name, current_file, included);

    while !reader.is_empty() {
        let offset = reader.offset();
        let op = reader.read_u8()?;
        match op {
            opcode::CREATE => {
                let class_ref = reader.read_u8()?;
                let (class_name, class_id) = if class_ref == opcode::CUSTOM_MARKER {
                    let (text, _) = reader.read_string()?;
                    (text, None)
                } else {
                    let class = language
                        .class(class_ref)
                        .ok_or(DecodeError::UnknownClassId { id: class_ref })?;
                    (class.name().to_string(), Some(class_ref))
                };
                let (node_name, _) = reader.read_string()?;
                builder.append(
                    Node::new(class_name, class_id, node_name, builder.current_file()),
                    false,
                );
            }
            opcode::ATTRIBUTE => {
                let attr_ref = reader.read_u8()?;
                if attr_ref == opcode::CUSTOM_MARKER {
                    let (attr_name, _) = reader.read_string()?;
                    let (text, markdown) = reader.read_string()?;
                    let value = if markdown {
                        Value::StrMd(text)
                    } else {
                        Value::String(text)
                    };
                    let node = builder
                        .last_node_mut()
                        .ok_or(DecodeError::AttributeWithoutNode)?;
                    node.push_attribute(Attribute::new(attr_name, value));
                } else {
                    let (class_id, class_name) = match builder.last_node() {
                        Some(node) => (node.class_id, node.class_name.clone()),
                        None => return Err(DecodeError::AttributeWithoutNode),
                    };
                    let class_id = class_id.ok_or_else(|| DecodeError::AttributeOfCustomClass {
                        class: class_name.clone(),
                        id: attr_ref,
                    })?;
                    let def = language
                        .class(class_id)
                        .and_then(|class| class.attribute(attr_ref))
                        .ok_or(DecodeError::UnknownAttributeId {
                            class: class_name,
                            id: attr_ref,
                        })?;
                    let attr_name = def.name.clone();
                    let value = reader.read_value(def.ty)?;
                    if let Some(node) = builder.last_node_mut() {
                        node.push_attribute(Attribute::new(attr_name, value));
                    }
                }
            }
            opcode::SCOPE_ENTER => {
                builder.enter_last();
            }
            opcode::SCOPE_EXIT => {
                builder.exit_scope();
            }
            opcode::INCLUDE => {
                let (path, _) = reader.read_string()?;
                let file_id = if builder.allows_dynamic() {
                    builder
                        .allocate_file(SourceFile::Include(path.clone()))
                        .map_err(|_| DecodeError::FileTableFull)?
                } else {
                    builder.current_file()
                };
                let tree = importer.import(&path, ImportKind::Include, file_id)?;
                builder.graft(tree.nodes);
            }
            opcode::TEMPLATE => {
                if builder.has_template_import() {
                    return Err(DecodeError::SecondTemplate);
                }
                let (path, _) = reader.read_string()?;
                let file_id = if builder.allows_dynamic() {
                    builder
                        .allocate_file(SourceFile::Template(path.clone()))
                        .map_err(|_| DecodeError::FileTableFull)?
                } else {
                    builder.current_file()
                };
                let tree = importer.import(&path, ImportKind::Template, file_id)?;
                let template_path = match tree.template_path {
                    Some(p) if !p.is_empty() => p,
                    _ => return Err(DecodeError::MissingTemplate { path }),
                };
                let base = builder.graft(tree.nodes);
                builder
                    .import_template(base, &template_path)
                    .map_err(|_| DecodeError::SecondTemplate)?;
            }
            opcode::MARK_TEMPLATE => {
                builder.mark_template();
            }
            other => {
                return Err(DecodeError::UnknownOpcode {
                    opcode: other,
                    offset,
                });
            }
        }
    }
    Ok(builder.finish())
}

struct Reader<'a> {
    cursor: Cursor<&'a [u8]>,
    len: u64,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(bytes),
            len: bytes.len() as u64,
        }
    }

    fn is_empty(&self) -> bool {
        self.cursor.position() >= self.len
    }

    fn offset(&self) -> u64 {
        self.cursor.position()
    }

    fn truncated(&self) -> DecodeError {
        DecodeError::Truncated {
            offset: self.cursor.position(),
        }
    }

    fn read_u8(&mut self) -> Result<u8, DecodeError> {
        self.cursor.read_u8().map_err(|_| self.truncated())
    }

    /// Reads a kind byte plus a zero-terminated UTF-8 payload. Returns
    /// the text and whether the kind byte marked it as markdown.
    fn read_string(&mut self) -> Result<(String, bool), DecodeError> {
        let kind = self.read_u8()?;
        let markdown = match kind {
            opcode::STRING_NORMAL => false,
            opcode::STRING_MARKDOWN => true,
            other => return Err(DecodeError::InvalidStringKind { kind: other }),
        };
        let mut bytes = Vec::new();
        loop {
            let byte = self.read_u8()?;
            if byte == 0 {
                break;
            }
            bytes.push(byte);
        }
        let text = String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)?;
        Ok((text, markdown))
    }

    fn read_value(&mut self, ty: Type) -> Result<Value, DecodeError> {
        let value = match ty {
            Type::Int8 => Value::Int8(self.cursor.read_i8().map_err(|_| self.truncated())?),
            Type::Int16 => Value::Int16(
                self.cursor
                    .read_i16::<LittleEndian>()
                    .map_err(|_| self.truncated())?,
            ),
            Type::Int32 => Value::Int32(
                self.cursor
                    .read_i32::<LittleEndian>()
                    .map_err(|_| self.truncated())?,
            ),
            Type::Int64 => Value::Int64(
                self.cursor
                    .read_i64::<LittleEndian>()
                    .map_err(|_| self.truncated())?,
            ),
            Type::Uint8 => Value::Uint8(self.read_u8()?),
            Type::Uint16 => Value::Uint16(
                self.cursor
                    .read_u16::<LittleEndian>()
                    .map_err(|_| self.truncated())?,
            ),
            Type::Uint32 => Value::Uint32(
                self.cursor
                    .read_u32::<LittleEndian>()
                    .map_err(|_| self.truncated())?,
            ),
            Type::Uint64 => Value::Uint64(
                self.cursor
                    .read_u64::<LittleEndian>()
                    .map_err(|_| self.truncated())?,
            ),
            Type::Float => Value::Float(self.read_f32()?),
            Type::Double => Value::Double(self.read_f64()?),
            Type::String => Value::String(self.read_string()?.0),
            Type::StrMd => Value::StrMd(self.read_string()?.0),
            Type::Vec2i => Value::Vec2i(Vec2::new(self.read_i32()?, self.read_i32()?)),
            Type::Vec3i => Value::Vec3i(Vec3::new(
                self.read_i32()?,
                self.read_i32()?,
                self.read_i32()?,
            )),
            Type::Vec4i => Value::Vec4i(Vec4::new(
                self.read_i32()?,
                self.read_i32()?,
                self.read_i32()?,
                self.read_i32()?,
            )),
            Type::Vec2l => Value::Vec2l(Vec2::new(self.read_i64()?, self.read_i64()?)),
            Type::Vec3l => Value::Vec3l(Vec3::new(
                self.read_i64()?,
                self.read_i64()?,
                self.read_i64()?,
            )),
            Type::Vec4l => Value::Vec4l(Vec4::new(
                self.read_i64()?,
                self.read_i64()?,
                self.read_i64()?,
                self.read_i64()?,
            )),
            Type::Vec2f => Value::Vec2f(Vec2::new(self.read_f32()?, self.read_f32()?)),
            Type::Vec3f => Value::Vec3f(Vec3::new(
                self.read_f32()?,
                self.read_f32()?,
                self.read_f32()?,
            )),
            Type::Vec4f => Value::Vec4f(Vec4::new(
                self.read_f32()?,
                self.read_f32()?,
                self.read_f32()?,
                self.read_f32()?,
            )),
            Type::Vec2d => Value::Vec2d(Vec2::new(self.read_f64()?, self.read_f64()?)),
            Type::Vec3d => Value::Vec3d(Vec3::new(
                self.read_f64()?,
                self.read_f64()?,
                self.read_f64()?,
            )),
            Type::Vec4d => Value::Vec4d(Vec4::new(
                self.read_f64()?,
                self.read_f64()?,
                self.read_f64()?,
                self.read_f64()?,
            )),
        };
        Ok(value)
    }

    fn read_i32(&mut self) -> Result<i32, DecodeError> {
        self.cursor
            .read_i32::<LittleEndian>()
            .map_err(|_| self.truncated())
    }

    fn read_i64(&mut self) -> Result<i64, DecodeError> {
        self.cursor
            .read_i64::<LittleEndian>()
            .map_err(|_| self.truncated())
    }

    fn read_f32(&mut self) -> Result<f32, DecodeError> {
        self.cursor
            .read_f32::<LittleEndian>()
            .map_err(|_| self.truncated())
    }

    fn read_f64(&mut self) -> Result<f64, DecodeError> {
        self.cursor
            .read_f64::<LittleEndian>()
            .map_err(|_| self.truncated())
    }
}
