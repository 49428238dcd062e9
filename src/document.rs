//! The coordinator: accepts `(name, bytes)`, figures out whether it got
//! a compiled or a source file and which language it speaks, drives the
//! matching front end, and owns the resulting document.
//!
//! Inclusion is re-entrant: a directive (or binary instruction) suspends
//! the current file, compiles the referenced one through the same
//! machinery, and grafts the finished tree. Ownership of grafted nodes
//! moves with the root vector, so dropping the child coordinator cannot
//! touch them.

use std::sync::Arc;

use log::debug;

use eclang_parser::parse_source;
use eclang_syntax::emit::source::document_to_source;
use eclang_syntax::{
    Document, ImportError, ImportKind, ImportedTree, Importer, Language, Node,
};

use crate::env::Env;
use crate::error::EcLangError;

/// One loaded EcLang file, compiled to its in-memory tree.
#[derive(Debug)]
pub struct EcLang {
    name: String,
    language: Arc<Language>,
    doc: Document,
    was_source: bool,
}

impl EcLang {
    /// Loads and compiles a file through the environment's file source.
    /// `path` may be an alias registered with `#register`.
    pub fn from_file(path: &str, env: &mut Env) -> Result<Self, EcLangError> {
        let (resolved, bytes) = env.load_file(path)?;
        env.enter_include(&resolved)?;
        let result = Self::load(&file_stem(&resolved), &bytes, env, 0, false);
        env.exit_include();
        result
    }

    /// Compiles raw bytes that were already read elsewhere. The name
    /// must not carry an extension; it is reused when saving.
    pub fn from_bytes(name: &str, bytes: &[u8], env: &mut Env) -> Result<Self, EcLangError> {
        Self::load(name, bytes, env, 0, false)
    }

    /// Shared constructor. `included` is true when this file is being
    /// compiled as an import of another file, in which case all nested
    /// inclusion is static and `file_id` is the id its nodes carry.
    fn load(
        name: &str,
        bytes: &[u8],
        env: &mut Env,
        file_id: u8,
        included: bool,
    ) -> Result<Self, EcLangError> {
        // A compiled file opens with a registered language's identifier
        // bytes; first match wins.
        if let Some(language) = env.registry.detect(bytes) {
            debug!("`{name}` detected as compiled `{}`", language.name());
            let doc = {
                let mut importer = EnvImporter { env };
                eclang_bin::decode(bytes, name, &language, file_id, included, &mut importer)
            }
            .map_err(|source| EcLangError::Decode {
                name: name.to_string(),
                source,
            })?;
            return Ok(Self {
                name: name.to_string(),
                language,
                doc,
                was_source: false,
            });
        }

        // Otherwise the first line must read `#language <name>`.
        let (language_name, rest) = split_language_line(name, bytes)?;
        let language =
            env.registry
                .by_name(&language_name)
                .ok_or_else(|| EcLangError::LanguageDetection {
                    name: name.to_string(),
                    reason: format!("no language named `{language_name}` is registered"),
                })?;
        debug!("`{name}` detected as `{language_name}` source");
        let doc = {
            let mut importer = EnvImporter { env };
            parse_source(rest, name, &language, file_id, included, &mut importer)
        }
        .map_err(|diagnostics| EcLangError::Parse {
            name: name.to_string(),
            diagnostics,
        })?;
        Ok(Self {
            name: name.to_string(),
            language,
            doc,
            was_source: true,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    /// True when the loaded bytes were source text.
    pub fn was_source(&self) -> bool {
        self.was_source
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    // Queries
    // -------

    pub fn all_objects(&self) -> &[Node] {
        &self.doc.roots
    }

    /// Root-level nodes of the given class, in insertion order.
    pub fn objects_by_class<'a>(&'a self, class_name: &str) -> Vec<&'a Node> {
        self.doc.objects_by_class(class_name)
    }

    /// `"a/b/c"` descends by node name; `None` when a segment is
    /// unmatched.
    pub fn object(&self, path: &str) -> Option<&Node> {
        self.doc.object(path)
    }

    // Saves
    // -----

    /// Serializes to the compiled form.
    pub fn save_compiled(&self) -> Result<Vec<u8>, EcLangError> {
        Ok(eclang_bin::encode(&self.doc, &self.language)?)
    }

    /// Re-emits source text. Comments are lost in compilation, so a
    /// decompiled file has none.
    pub fn save_source(&self) -> Result<String, EcLangError> {
        Ok(document_to_source(&self.doc, &self.language)?)
    }

    /// The conversion save: compiled output for a source file, source
    /// output for a compiled file.
    pub fn save(&self) -> Result<Vec<u8>, EcLangError> {
        if self.was_source {
            self.save_compiled()
        } else {
            Ok(self.save_source()?.into_bytes())
        }
    }

    /// `<name>.<extension>` for the form [`EcLang::save`] produces.
    pub fn default_file_name(&self) -> String {
        let extension = if self.was_source {
            self.language.compiled_extension()
        } else {
            self.language.source_extension()
        };
        format!("{}.{}", self.name, extension)
    }
}

/// Resolves imports by recursively compiling the referenced file through
/// the environment.
struct EnvImporter<'e> {
    env: &'e mut Env,
}

impl Importer for EnvImporter<'_> {
    fn import(
        &mut self,
        path: &str,
        kind: ImportKind,
        file_id: u8,
    ) -> Result<ImportedTree, ImportError> {
        let import_error = |message: String| ImportError {
            path: path.to_string(),
            message,
        };
        let (resolved, bytes) = self
            .env
            .load_file(path)
            .map_err(|e| import_error(e.to_string()))?;
        self.env
            .enter_include(&resolved)
            .map_err(|e| import_error(e.to_string()))?;
        debug!(
            "importing `{resolved}` as {} (file id {file_id})",
            match kind {
                ImportKind::Include => "include",
                ImportKind::Template => "template",
            }
        );
        let result = EcLang::load(&file_stem(&resolved), &bytes, self.env, file_id, true);
        self.env.exit_include();
        let child = result.map_err(|e| import_error(e.to_string()))?;
        Ok(ImportedTree {
            nodes: child.doc.roots,
            template_path: child.doc.template_path,
        })
    }

    fn register_path(&mut self, alias: &str, path: &str) {
        self.env.aliases.register(alias, path);
    }
}

/// Extracts the language name from a `#language <name>` first line and
/// returns it together with the remainder of the text.
fn split_language_line<'b>(name: &str, bytes: &'b [u8]) -> Result<(String, &'b str), EcLangError> {
    let detection_error = |reason: &str| EcLangError::LanguageDetection {
        name: name.to_string(),
        reason: reason.to_string(),
    };
    let text = std::str::from_utf8(bytes)
        .map_err(|_| detection_error("no identifier bytes matched and the file is not UTF-8 text"))?;
    let (line, rest) = match text.split_once('\n') {
        Some((line, rest)) => (line, rest),
        None => (text, ""),
    };
    let line = line.trim();
    let (tag, language_name) = line
        .split_once(' ')
        .ok_or_else(|| detection_error("the first line contains no space character"))?;
    if tag != "#language" {
        return Err(detection_error(
            "the first line does not start with a #language tag",
        ));
    }
    Ok((language_name.trim().to_string(), rest))
}

/// File name without directories and extension; used as the document
/// name, the way the original derives names from paths.
fn file_stem(path: &str) -> String {
    let base = path.rsplit('/').next().unwrap_or(path);
    match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_stems() {
        assert_eq!(file_stem("scenes/menu.elt"), "menu");
        assert_eq!(file_stem("menu.elt"), "menu");
        assert_eq!(file_stem("menu"), "menu");
        assert_eq!(file_stem(".hidden"), ".hidden");
    }

    #[test]
    fn language_line_extraction() {
        let (lang, rest) = split_language_line("f", b"#language test\nContainer a;\n").unwrap();
        assert_eq!(lang, "test");
        assert_eq!(rest, "Container a;\n");
        assert!(split_language_line("f", b"Container a;\n").is_err());
        assert!(split_language_line("f", b"#languages test\n").is_err());
    }
}
