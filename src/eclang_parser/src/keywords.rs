//! The closed directive set. Anything else starting with `#` is a lex
//! error.

use phf::phf_map;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    /// `#language` — only legal as the first line of a file
    Language,
    /// `#include "<path>"` — static inclusion
    Include,
    /// `#include-dyn "<path>"` — dynamic inclusion
    IncludeDyn,
    /// `#template ["<path>"]` — import a template, or mark the template node
    Template,
    /// `#template-dyn "<path>"` — dynamic template import
    TemplateDyn,
    /// `#register "<alias>" "<path>"`
    Register,
}

pub static KEYWORDS: phf::Map<&'static str, Keyword> = phf_map! {
    "#language" => Keyword::Language,
    "#include" => Keyword::Include,
    "#include-dyn" => Keyword::IncludeDyn,
    "#template" => Keyword::Template,
    "#template-dyn" => Keyword::TemplateDyn,
    "#register" => Keyword::Register,
};

pub fn lookup(lexeme: &str) -> Option<Keyword> {
    KEYWORDS.get(lexeme).copied()
}
