//! Document → instruction stream.

use byteorder::{LittleEndian, WriteBytesExt};
use log::debug;
use std::io::Write;

use syntax::document::SourceFile;
use syntax::{Attribute, Document, Language, Node, Type, Value};

use crate::errors::EncodeError;
use crate::opcode;

/// Serializes a document against its language binding. Only the document
/// the user loaded directly (file id 0) may be serialized; included files
/// are represented by their `INCLUDE`/`TEMPLATE` instructions instead.
pub fn encode(doc: &Document, language: &Language) -> Result<Vec<u8>, EncodeError> {
    if doc.current_file != 0 {
        return Err(EncodeError::NotRootFile {
            file_id: doc.current_file,
        });
    }
    debug!("encoding `{}` with language `{}`", doc.name, language.name());
    let mut out = Vec::new();
    out.extend_from_slice(language.identifier());
    out.push(0);
    let mut path = Vec::new();
    emit_siblings(&mut out, doc, language, &doc.roots, &mut path, None)?;
    Ok(out)
}

/// Walks one sibling list. A run of nodes sharing a dynamic file id
/// collapses into a single `INCLUDE`; a template import emits `TEMPLATE`
/// and then descends into the template target's children (skipping the
/// template file's own nodes), after which the sibling list is done.
fn emit_siblings(
    out: &mut Vec<u8>,
    doc: &Document,
    language: &Language,
    nodes: &[Node],
    path: &mut Vec<usize>,
    skip_file: Option<u8>,
) -> Result<(), EncodeError> {
    let mut i = 0;
    while i < nodes.len() {
        let node = &nodes[i];
        if skip_file == Some(node.file_id) {
            i += 1;
            continue;
        }
        if node.file_id != 0 {
            match doc.files.get(node.file_id as usize) {
                Some(SourceFile::Include(import)) => {
                    out.write_u8(opcode::INCLUDE)?;
                    write_string(out, import, false)?;
                    let run = node.file_id;
                    while i < nodes.len() && nodes[i].file_id == run {
                        i += 1;
                    }
                    continue;
                }
                Some(SourceFile::Template(import)) => {
                    out.write_u8(opcode::TEMPLATE)?;
                    write_string(out, import, false)?;
                    let target_path = doc
                        .external_template_path
                        .as_deref()
                        .ok_or(EncodeError::MissingTemplateTarget)?;
                    let target = doc
                        .node_at(target_path)
                        .ok_or(EncodeError::MissingTemplateTarget)?;
                    let mut child_path = target_path.to_vec();
                    emit_siblings(
                        out,
                        doc,
                        language,
                        &target.children,
                        &mut child_path,
                        Some(node.file_id),
                    )?;
                    // Anything after a template import already lives
                    // inside the template's target node.
                    return Ok(());
                }
                _ => return Err(EncodeError::UnknownFile { id: node.file_id }),
            }
        }
        path.push(i);
        emit_node(out, doc, language, node, path)?;
        path.pop();
        i += 1;
    }
    Ok(())
}

fn emit_node(
    out: &mut Vec<u8>,
    doc: &Document,
    language: &Language,
    node: &Node,
    path: &mut Vec<usize>,
) -> Result<(), EncodeError> {
    out.write_u8(opcode::CREATE)?;
    let class_id = node.class_id.or_else(|| language.class_id(&node.class_name));
    match class_id {
        Some(id) => out.write_u8(id)?,
        None => {
            out.write_u8(opcode::CUSTOM_MARKER)?;
            write_string(out, &node.class_name, false)?;
        }
    }
    write_string(out, &node.name, false)?;

    let is_template_node = doc.template_path.as_deref() == Some(path.as_slice());
    let needs_scope =
        !node.attributes.is_empty() || !node.children.is_empty() || is_template_node;
    if needs_scope {
        out.write_u8(opcode::SCOPE_ENTER)?;
    }
    if is_template_node {
        out.write_u8(opcode::MARK_TEMPLATE)?;
    }
    for attribute in &node.attributes {
        emit_attribute(out, language, class_id, attribute)?;
    }
    emit_siblings(out, doc, language, &node.children, path, None)?;
    if needs_scope {
        out.write_u8(opcode::SCOPE_EXIT)?;
    }
    Ok(())
}

/// A resolvable attribute is stored as `id + typed payload`; anything the
/// language cannot resolve (unregistered class, unregistered attribute,
/// or a value that disagrees with the declared type) falls back to a
/// custom attribute carrying name and value as strings.
fn emit_attribute(
    out: &mut Vec<u8>,
    language: &Language,
    class_id: Option<u8>,
    attribute: &Attribute,
) -> Result<(), EncodeError> {
    let resolved = class_id
        .and_then(|id| language.attribute(id, &attribute.name))
        .filter(|(_, ty)| *ty == attribute.value.ty());
    out.write_u8(opcode::ATTRIBUTE)?;
    match resolved {
        Some((attr_id, _)) => {
            out.write_u8(attr_id)?;
            write_value(out, &attribute.value)?;
        }
        None => {
            out.write_u8(opcode::CUSTOM_MARKER)?;
            write_string(out, &attribute.name, false)?;
            let markdown = attribute.value.ty() == Type::StrMd;
            write_string(out, &attribute.value.to_string(), markdown)?;
        }
    }
    Ok(())
}

fn write_string(out: &mut Vec<u8>, text: &str, markdown: bool) -> Result<(), EncodeError> {
    if text.bytes().any(|b| b == 0) {
        return Err(EncodeError::InteriorNul { text: text.into() });
    }
    out.write_u8(if markdown {
        opcode::STRING_MARKDOWN
    } else {
        opcode::STRING_NORMAL
    })?;
    out.write_all(text.as_bytes())?;
    out.write_u8(0)?;
    Ok(())
}

fn write_value(out: &mut Vec<u8>, value: &Value) -> Result<(), EncodeError> {
    match value {
        Value::Int8(v) => out.write_i8(*v)?,
        Value::Int16(v) => out.write_i16::<LittleEndian>(*v)?,
        Value::Int32(v) => out.write_i32::<LittleEndian>(*v)?,
        Value::Int64(v) => out.write_i64::<LittleEndian>(*v)?,
        Value::Uint8(v) => out.write_u8(*v)?,
        Value::Uint16(v) => out.write_u16::<LittleEndian>(*v)?,
        Value::Uint32(v) => out.write_u32::<LittleEndian>(*v)?,
        Value::Uint64(v) => out.write_u64::<LittleEndian>(*v)?,
        Value::Float(v) => out.write_f32::<LittleEndian>(*v)?,
        Value::Double(v) => out.write_f64::<LittleEndian>(*v)?,
        Value::String(s) => write_string(out, s, false)?,
        Value::StrMd(s) => write_string(out, s, true)?,
        Value::Vec2i(v) => {
            out.write_i32::<LittleEndian>(v.x)?;
            out.write_i32::<LittleEndian>(v.y)?;
        }
        Value::Vec3i(v) => {
            out.write_i32::<LittleEndian>(v.x)?;
            out.write_i32::<LittleEndian>(v.y)?;
            out.write_i32::<LittleEndian>(v.z)?;
        }
        Value::Vec4i(v) => {
            out.write_i32::<LittleEndian>(v.x)?;
            out.write_i32::<LittleEndian>(v.y)?;
            out.write_i32::<LittleEndian>(v.z)?;
            out.write_i32::<LittleEndian>(v.w)?;
        }
        Value::Vec2l(v) => {
            out.write_i64::<LittleEndian>(v.x)?;
            out.write_i64::<LittleEndian>(v.y)?;
        }
        Value::Vec3l(v) => {
            out.write_i64::<LittleEndian>(v.x)?;
            out.write_i64::<LittleEndian>(v.y)?;
            out.write_i64::<LittleEndian>(v.z)?;
        }
        Value::Vec4l(v) => {
            out.write_i64::<LittleEndian>(v.x)?;
            out.write_i64::<LittleEndian>(v.y)?;
            out.write_i64::<LittleEndian>(v.z)?;
            out.write_i64::<LittleEndian>(v.w)?;
        }
        Value::Vec2f(v) => {
            out.write_f32::<LittleEndian>(v.x)?;
            out.write_f32::<LittleEndian>(v.y)?;
        }
        Value::Vec3f(v) => {
            out.write_f32::<LittleEndian>(v.x)?;
            out.write_f32::<LittleEndian>(v.y)?;
            out.write_f32::<LittleEndian>(v.z)?;
        }
        Value::Vec4f(v) => {
            out.write_f32::<LittleEndian>(v.x)?;
            out.write_f32::<LittleEndian>(v.y)?;
            out.write_f32::<LittleEndian>(v.z)?;
            out.write_f32::<LittleEndian>(v.w)?;
        }
        Value::Vec2d(v) => {
            out.write_f64::<LittleEndian>(v.x)?;
            out.write_f64::<LittleEndian>(v.y)?;
        }
        Value::Vec3d(v) => {
            out.write_f64::<LittleEndian>(v.x)?;
            out.write_f64::<LittleEndian>(v.y)?;
            out.write_f64::<LittleEndian>(v.z)?;
        }
        Value::Vec4d(v) => {
            out.write_f64::<LittleEndian>(v.x)?;
            out.write_f64::<LittleEndian>(v.y)?;
            out.write_f64::<LittleEndian>(v.z)?;
            out.write_f64::<LittleEndian>(v.w)?;
        }
    }
    Ok(())
}
