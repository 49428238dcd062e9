//! The compilation environment: which languages exist, how aliases map
//! to paths, and where bytes come from. Everything here is an explicit
//! value handed to the coordinator, so two compilations with separate
//! environments cannot interfere.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use log::debug;
use thiserror::Error;

use eclang_syntax::Language;

use crate::descriptor;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("couldn't load `{path}`: {source}")]
    NotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{path}` is not present in the in-memory file set")]
    Missing { path: String },
    #[error("include cycle detected: {}", chain.join(" -> "))]
    Cycle { chain: Vec<String> },
}

/// Where the coordinator gets bytes from. The core never touches the
/// file system directly; the default implementation reads from disk and
/// tests substitute an in-memory map.
pub trait FileSource {
    fn load(&self, path: &str) -> Result<Vec<u8>, LoadError>;
}

/// Reads files from disk.
#[derive(Debug, Default)]
pub struct DiskSource;

impl FileSource for DiskSource {
    fn load(&self, path: &str) -> Result<Vec<u8>, LoadError> {
        std::fs::read(Path::new(path)).map_err(|source| LoadError::NotFound {
            path: path.to_string(),
            source,
        })
    }
}

/// In-memory `(path, bytes)` map, used by tests and embedders.
#[derive(Debug, Default)]
pub struct MemorySource {
    files: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), bytes.into());
    }
}

impl FileSource for MemorySource {
    fn load(&self, path: &str) -> Result<Vec<u8>, LoadError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| LoadError::Missing {
                path: path.to_string(),
            })
    }
}

/// The set of known language bindings. Detection walks the set in
/// registration order and the first identifier-prefix match wins.
#[derive(Clone, Default)]
pub struct LanguageRegistry {
    languages: Vec<Arc<Language>>,
}

impl LanguageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the built-in `eclang-descriptor`
    /// language, so `.eld` files work out of the box.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(descriptor::descriptor_language());
        registry
    }

    pub fn register(&mut self, language: Language) -> Arc<Language> {
        let language = Arc::new(language);
        self.languages.push(Arc::clone(&language));
        language
    }

    pub fn by_name(&self, name: &str) -> Option<Arc<Language>> {
        self.languages
            .iter()
            .find(|l| l.name() == name)
            .map(Arc::clone)
    }

    /// First language whose identifier bytes prefix `bytes`.
    pub fn detect(&self, bytes: &[u8]) -> Option<Arc<Language>> {
        self.languages
            .iter()
            .find(|l| bytes.starts_with(l.identifier()))
            .map(Arc::clone)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Language>> {
        self.languages.iter()
    }
}

impl fmt::Debug for LanguageRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.languages.iter().map(|l| l.name()))
            .finish()
    }
}

/// `alias -> path` mapping written by `#register` and consulted on every
/// file load. Unknown names pass through unchanged.
#[derive(Debug, Clone, Default)]
pub struct PathAliasStore {
    aliases: HashMap<String, String>,
}

impl PathAliasStore {
    pub fn register(&mut self, alias: impl Into<String>, path: impl Into<String>) {
        let alias = alias.into();
        let path = path.into();
        debug!("registering path alias `{alias}` -> `{path}`");
        self.aliases.insert(alias, path);
    }

    pub fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        self.aliases.get(name).map(String::as_str).unwrap_or(name)
    }
}

/// One compilation environment. The include stack tracks the resolved
/// paths currently being compiled, which is what catches mutually
/// recursive `#include*` chains.
pub struct Env {
    pub registry: LanguageRegistry,
    pub aliases: PathAliasStore,
    source: Box<dyn FileSource>,
    include_stack: Vec<String>,
}

impl Env {
    pub fn new(source: Box<dyn FileSource>) -> Self {
        Self {
            registry: LanguageRegistry::with_builtin(),
            aliases: PathAliasStore::default(),
            source,
            include_stack: Vec::new(),
        }
    }

    pub fn on_disk() -> Self {
        Self::new(Box::new(DiskSource))
    }

    /// Configuration surface: `register-language`.
    pub fn register_language(&mut self, language: Language) -> Arc<Language> {
        self.registry.register(language)
    }

    /// Configuration surface: `register-filepath`.
    pub fn register_filepath(&mut self, alias: impl Into<String>, path: impl Into<String>) {
        self.aliases.register(alias, path);
    }

    /// Resolves an alias and loads the referenced bytes. Returns the
    /// resolved path alongside so callers can name the file.
    pub fn load_file(&self, name: &str) -> Result<(String, Vec<u8>), LoadError> {
        let resolved = self.aliases.resolve(name).to_string();
        let bytes = self.source.load(&resolved)?;
        Ok((resolved, bytes))
    }

    /// Marks a resolved path as being compiled. Fails with the full
    /// chain when the path is already on the stack.
    pub fn enter_include(&mut self, resolved: &str) -> Result<(), LoadError> {
        if self.include_stack.iter().any(|p| p == resolved) {
            let mut chain = self.include_stack.clone();
            chain.push(resolved.to_string());
            return Err(LoadError::Cycle { chain });
        }
        self.include_stack.push(resolved.to_string());
        Ok(())
    }

    pub fn exit_include(&mut self) {
        self.include_stack.pop();
    }
}
