//! eclang_bin crate
//!
//! The compiled form: a file starts with the language's identifier bytes
//! and a zero terminator, followed by an instruction stream. The encoder
//! walks a document's tree in source order; the decoder replays the
//! stream through the same `DocumentBuilder` the source parser uses.
//! Numeric payloads are little-endian on every platform.

pub mod decode;
pub mod encode;
pub mod errors;
pub mod opcode;

pub use decode::decode;
pub use encode::encode;
pub use errors::{DecodeError, EncodeError};
