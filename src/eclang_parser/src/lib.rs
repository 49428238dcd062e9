//! eclang_parser crate
//!
//! Front end for the source form: a lexer that turns text into a token
//! stream (classifying class names against the selected language) and a
//! parser that drives a `DocumentBuilder` from those tokens, resolving
//! directives through the caller-supplied `Importer`.
//!
//! Both passes accumulate positioned diagnostics and report them all
//! before failing, so one run surfaces every problem it can find.

pub mod diagnostics;
pub mod keywords;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod values;

pub use diagnostics::{Diagnostic, Diagnostics};
pub use keywords::Keyword;
pub use lexer::tokenize;
pub use parser::parse_source;
pub use token::{Token, TokenKind};
