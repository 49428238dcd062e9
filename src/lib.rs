//! eclang crate
//!
//! Compiler, decompiler and in-memory interpreter for the EcLang family
//! of C-like declarative markup languages. A file is a tree of named,
//! typed nodes; a [`Language`] binding enumerates the legal classes and
//! attributes; the same tree round-trips between human-authored source
//! and a compact instruction-coded binary form.
//!
//! ```no_run
//! use eclang::{EcLang, Env};
//!
//! let mut env = Env::on_disk();
//! let file = EcLang::from_file("scenes/menu.elt", &mut env)?;
//! if let Some(node) = file.object("menu/title") {
//!     println!("{:?}", node.attribute("text"));
//! }
//! std::fs::write("scenes/menu.eltc", file.save_compiled()?)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod cli;
pub mod descriptor;
pub mod document;
pub mod env;
pub mod error;

pub use document::EcLang;
pub use env::{
    DiskSource, Env, FileSource, LanguageRegistry, LoadError, MemorySource, PathAliasStore,
};
pub use error::EcLangError;

// The data model, re-exported so embedders rarely need the member crates.
pub use eclang_syntax::{
    Attribute, AttributeDef, Class, Document, Language, LanguageError, Node, Type, Value,
};
