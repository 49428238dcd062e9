//! eclang_syntax crate
//!
//! The shared data model of the EcLang toolchain: the closed [`Type`]
//! enumeration, the [`Value`] sum type with its fixed-arity vectors, the
//! [`Class`]/[`Language`] bindings that give files their semantics, the
//! [`Node`] tree, and the [`Document`] a compilation produces.
//!
//! The parser and the binary decoder both build trees through
//! [`document::DocumentBuilder`], which owns the scope stack and the
//! include/template bookkeeping, so the two front ends cannot drift apart.

pub mod attribute;
pub mod class;
pub mod document;
pub mod emit;
pub mod language;
pub mod node;
pub mod types;
pub mod value;
pub mod vectors;

pub use attribute::{Attribute, AttributeDef};
pub use class::Class;
pub use document::{
    Document, DocumentBuilder, ImportError, ImportKind, ImportedTree, Importer, NodePath,
    SourceFile,
};
pub use language::{Language, LanguageError};
pub use node::Node;
pub use types::Type;
pub use value::Value;
pub use vectors::{Vec2, Vec3, Vec4};
