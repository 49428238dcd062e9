use thiserror::Error;

use eclang_bin::{DecodeError, EncodeError};
use eclang_parser::Diagnostics;
use eclang_syntax::LanguageError;
use eclang_syntax::emit::EmitError;

use crate::descriptor::DescriptorError;
use crate::env::LoadError;

/// Everything that can go wrong between handing the coordinator bytes
/// and getting a tree (or a file) back.
#[derive(Debug, Error)]
pub enum EcLangError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("couldn't determine the language of `{name}`: {reason}")]
    LanguageDetection { name: String, reason: String },
    #[error("errors while compiling `{name}`:\n{diagnostics}")]
    Parse {
        name: String,
        diagnostics: Diagnostics,
    },
    #[error("failed to decode `{name}`: {source}")]
    Decode {
        name: String,
        #[source]
        source: DecodeError,
    },
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Emit(#[from] EmitError),
    #[error(transparent)]
    Language(#[from] LanguageError),
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),
}
