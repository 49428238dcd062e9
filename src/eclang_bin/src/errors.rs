use thiserror::Error;

use syntax::ImportError;

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("only the user-loaded root file can be serialized (this document has file id {file_id})")]
    NotRootFile { file_id: u8 },
    #[error("string `{text}` contains an interior zero byte")]
    InteriorNul { text: String },
    #[error("node references unknown file id {id}")]
    UnknownFile { id: u8 },
    #[error("external template path does not resolve to a node")]
    MissingTemplateTarget,
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("stream does not start with the language identifier")]
    BadHeader,
    #[error("unexpected end of stream at offset {offset}")]
    Truncated { offset: u64 },
    #[error("unknown class id {id}")]
    UnknownClassId { id: u8 },
    #[error("class `{class}` has no attribute with id {id}")]
    UnknownAttributeId { class: String, id: u8 },
    #[error("attribute id {id} cannot be resolved against custom class `{class}`")]
    AttributeOfCustomClass { class: String, id: u8 },
    #[error("attribute instruction before any node was created")]
    AttributeWithoutNode,
    #[error("invalid string kind byte {kind:#04x}")]
    InvalidStringKind { kind: u8 },
    #[error("string payload is not valid UTF-8")]
    InvalidUtf8,
    #[error("unknown opcode {opcode:#04x} at offset {offset}")]
    UnknownOpcode { opcode: u8, offset: u64 },
    #[error("a second template was imported into one file")]
    SecondTemplate,
    #[error("`{path}` does not mark a template node")]
    MissingTemplate { path: String },
    #[error("the included-files table is full (at most 255 dynamic imports per file)")]
    FileTableFull,
    #[error(transparent)]
    Import(#[from] ImportError),
}
