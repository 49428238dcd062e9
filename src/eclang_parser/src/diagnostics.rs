use std::error::Error;
use std::fmt;

/// One positioned problem found while lexing or parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: u32,
    pub column: usize,
    pub lexeme: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        line: u32,
        column: usize,
        lexeme: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            line,
            column,
            lexeme: lexeme.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}: {}", self.line, self.column, self.message)?;
        if !self.lexeme.is_empty() {
            write!(f, " (near `{}`)", self.lexeme)?;
        }
        Ok(())
    }
}

/// Lexing and parsing accumulate diagnostics and keep going, so a single
/// run reports everything it can; the pass fails if any were recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn report(
        &mut self,
        line: u32,
        column: usize,
        lexeme: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.push(Diagnostic::new(line, column, lexeme, message));
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Moves the other set's entries to the end of this one.
    pub fn extend(&mut self, other: Diagnostics) {
        self.diagnostics.extend(other.diagnostics);
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.diagnostics.len() {
            0 => write!(f, "no diagnostics"),
            1 => write!(f, "{}", self.diagnostics[0]),
            n => {
                writeln!(f, "{n} errors:")?;
                for d in &self.diagnostics {
                    writeln!(f, "  {d}")?;
                }
                Ok(())
            }
        }
    }
}

impl Error for Diagnostics {}
