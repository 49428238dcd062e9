use crate::keywords::Keyword;

/// What a lexeme turned out to be. `Class` versus `Identifier` is decided
/// at lex time against the selected language, which is why the language
/// must be known before tokenization starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `{`
    ScopeEnter,
    /// `}`
    ScopeExit,
    /// `=`
    Assign,
    /// `(`
    ParenOpen,
    /// `)`
    ParenClose,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `#include`, `#template-dyn`, ...
    Keyword(Keyword),
    /// Identifier-shaped lexeme registered as a class in the language
    Class,
    /// Any other identifier-shaped lexeme
    Identifier,
    /// Optional sign, digits, optional fraction
    Number,
    /// `"..."`
    Str,
    /// ```` ```...``` ````
    StrMd,
}

impl TokenKind {
    /// Human-readable name for diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::ScopeEnter => "`{`",
            TokenKind::ScopeExit => "`}`",
            TokenKind::Assign => "`=`",
            TokenKind::ParenOpen => "`(`",
            TokenKind::ParenClose => "`)`",
            TokenKind::Comma => "`,`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Keyword(_) => "a directive",
            TokenKind::Class => "a class name",
            TokenKind::Identifier => "an identifier",
            TokenKind::Number => "a number",
            TokenKind::Str => "a string",
            TokenKind::StrMd => "a markdown string",
        }
    }
}

/// One lexed token. String payloads are stored with escapes already
/// resolved; line and column point at the first character of the lexeme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: u32,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, line: u32, column: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
        }
    }
}
