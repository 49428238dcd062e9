//! Re-emits a [`Document`] as source text.
//!
//! Mirrors the binary encoder's walk: statically included nodes are
//! printed inline, dynamic imports collapse back into `#include-dyn` /
//! `#template-dyn` directives, and the file's own template node gets its
//! `#template` mark back. Comments do not survive compilation, so none
//! are produced.

use std::fmt::Write;

use crate::document::{Document, SourceFile};
use crate::emit::{Emit, EmitCtx, EmitError};
use crate::language::Language;
use crate::node::Node;

pub fn document_to_source(doc: &Document, language: &Language) -> Result<String, EmitError> {
    let mut out = String::new();
    let mut cx = EmitCtx::new();
    writeln!(out, "#language {}", language.name())?;
    let mut path = Vec::new();
    emit_siblings(&mut out, &mut cx, doc, &doc.roots, &mut path, None)?;
    Ok(out)
}

/// Walks one sibling list. `skip_file` suppresses nodes belonging to an
/// imported template file while its target's children are printed.
fn emit_siblings<W: Write>(
    w: &mut W,
    cx: &mut EmitCtx,
    doc: &Document,
    nodes: &[Node],
    path: &mut Vec<usize>,
    skip_file: Option<u8>,
) -> Result<(), EmitError> {
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
                    cx.pad(w)?;
                    writeln!(w, "#include-dyn \"{import}\"")?;
                    let run = node.file_id;
                    while i < nodes.len() && nodes[i].file_id == run {
                        i += 1;
                    }
                    continue;
                }
                Some(SourceFile::Template(import)) => {
                    cx.pad(w)?;
                    writeln!(w, "#template-dyn \"{import}\"")?;
                    let target_path = doc
                        .external_template_path
                        .as_deref()
                        .ok_or(EmitError::MissingTemplateTarget)?;
                    let target = doc
                        .node_at(target_path)
                        .ok_or(EmitError::MissingTemplateTarget)?;
                    let mut child_path = target_path.to_vec();
                    emit_siblings(
                        w,
                        cx,
                        doc,
                        &target.children,
                        &mut child_path,
                        Some(node.file_id),
                    )?;
                    // Everything after a template import lives inside the
                    // template's target node; this sibling list is done.
                    return Ok(());
                }
                _ => return Err(EmitError::UnknownFile { id: node.file_id }),
            }
        }
        path.push(i);
        emit_node(w, cx, doc, node, path)?;
        path.pop();
        i += 1;
    }
    Ok(())
}

fn emit_node<W: Write>(
    w: &mut W,
    cx: &mut EmitCtx,
    doc: &Document,
    node: &Node,
    path: &mut Vec<usize>,
) -> Result<(), EmitError> {
    let is_template_node = doc.template_path.as_deref() == Some(path.as_slice());
    let needs_scope =
        !node.attributes.is_empty() || !node.children.is_empty() || is_template_node;

    cx.pad(w)?;
    write!(w, "{} {}", node.class_name, node.name)?;
    if !needs_scope {
        writeln!(w, ";")?;
        return Ok(());
    }

    writeln!(w, " {{")?;
    cx.indent += 1;
    if is_template_node {
        cx.pad(w)?;
        writeln!(w, "#template")?;
    }
    for attribute in &node.attributes {
        cx.pad(w)?;
        write!(w, "{} = ", attribute.name)?;
        attribute.value.emit(w, cx)?;
        writeln!(w, ";")?;
    }
    emit_siblings(w, cx, doc, &node.children, path, None)?;
    cx.indent -= 1;
    cx.pad(w)?;
    writeln!(w, "}}")?;
    Ok(())
}
