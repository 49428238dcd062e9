//! Token stream → document.
//!
//! A single left-to-right pass. Each top-level token dispatches to a
//! directive, a node statement, an attribute assignment or a scope exit;
//! errors are recorded and the parse resynchronizes at the next
//! statement boundary so further diagnostics can surface. Import
//! failures (unreadable files, cycles) abort the pass.

use log::{debug, trace};

use syntax::document::{SourceFile, TreeError};
use syntax::{
    Document, DocumentBuilder, ImportKind, Importer, Language, Node, Type,
};

use crate::diagnostics::Diagnostics;
use crate::keywords::Keyword;
use crate::lexer::tokenize;
use crate::token::{Token, TokenKind};
use crate::values;

/// Compiles source text (everything after the `#language` line) into a
/// document. `current_file` is 0 for a user-loaded file and the
/// includer's file id when this file is being compiled as an import;
/// `included` is true for every imported file, which degrades nested
/// dynamic imports to static inclusion.
pub fn parse_source(
    source: &str,
    name: &str,
    language: &Language,
    current_file: u8,
    included: bool,
    importer: &mut dyn Importer,
) -> Result<Document, Diagnostics> {
    debug!("parsing `{name}` as {} source", language.name());
    let tokens = tokenize(source, language, 1)?;
    Parser::new(&tokens, language, name, current_file, included).run(importer)
}

struct Parser<'t, 'l> {
    tokens: &'t [Token],
    pos: usize,
    language: &'l Language,
    builder: DocumentBuilder,
    diags: Diagnostics,
    /// Set when an import fails; the pass stops instead of cascading.
    fatal: bool,
}

impl<'t, 'l> Parser<'t, 'l> {
    fn new(
        tokens: &'t [Token],
        language: &'l Language,
        name: &str,
        current_file: u8,
        included: bool,
    ) -> Self {
        Self {
            tokens,
            pos: 0,
            language,
            builder: DocumentBuilder::new(name, current_file, included),
            diags: Diagnostics::new(),
            fatal: false,
        }
    }

    fn run(mut self, importer: &mut dyn Importer) -> Result<Document, Diagnostics> {
        while let Some(token) = self.peek().cloned() {
            match token.kind {
                TokenKind::Keyword(keyword) => self.directive(&token, keyword, importer),
                TokenKind::Class => self.node_statement(&token),
                TokenKind::Identifier => self.assignment(&token),
                TokenKind::ScopeExit => {
                    self.advance();
                    if !self.builder.exit_scope() {
                        self.error_at(&token, "unexpected `}` at file root");
                    }
                }
                _ => {
                    self.error_at(
                        &token,
                        format!("unexpected {} at statement start", token.kind.describe()),
                    );
                    self.advance();
                }
            }
            if self.fatal {
                break;
            }
        }
        if self.diags.is_empty() {
            Ok(self.builder.finish())
        } else {
            Err(self.diags)
        }
    }

    // Token plumbing
    // --------------

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn error_at(&mut self, token: &Token, message: impl Into<String>) {
        self.diags
            .report(token.line, token.column, token.text.clone(), message);
    }

    fn error_at_end(&mut self, message: impl Into<String>) {
        let (line, column) = self
            .tokens
            .last()
            .map(|t| (t.line, t.column))
            .unwrap_or((1, 1));
        self.diags.report(line, column, "", message);
    }

    /// Consumes the next token if it has the wanted kind; otherwise
    /// records `message` and leaves the cursor alone.
    fn expect(&mut self, kind: TokenKind, message: &str) -> Option<Token> {
        match self.peek() {
            Some(token) if token.kind == kind => self.advance().cloned(),
            Some(token) => {
                let token = token.clone();
                self.error_at(&token, message);
                None
            }
            None => {
                self.error_at_end(message);
                None
            }
        }
    }

    /// Skips ahead to the next statement boundary after an error.
    fn recover(&mut self) {
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                TokenKind::ScopeEnter
                | TokenKind::ScopeExit
                | TokenKind::Keyword(_)
                | TokenKind::Class => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    // Statements
    // ----------

    /// `CLASS IDENT ;` or `CLASS IDENT {`
    fn node_statement(&mut self, class_token: &Token) {
        self.advance();
        let Some(name) = self.expect(
            TokenKind::Identifier,
            "expected a node name after the class name",
        ) else {
            self.recover();
            return;
        };
        let node = Node::new(
            class_token.text.clone(),
            self.language.class_id(&class_token.text),
            name.text,
            self.builder.current_file(),
        );
        match self.peek().map(|t| t.kind) {
            Some(TokenKind::Semicolon) => {
                self.advance();
                self.builder.append(node, false);
            }
            Some(TokenKind::ScopeEnter) => {
                self.advance();
                self.builder.append(node, true);
            }
            _ => {
                let message = "expected `;` or `{` after the node declaration";
                match self.peek().cloned() {
                    Some(token) => self.error_at(&token, message),
                    None => self.error_at_end(message),
                }
                self.recover();
            }
        }
    }

    /// `IDENT = value ;` inside the current scope's node.
    fn assignment(&mut self, attr_token: &Token) {
        let Some(node) = self.builder.current_node() else {
            self.error_at(attr_token, "attribute assignment outside of any node");
            self.advance();
            self.recover();
            return;
        };
        let class_name = node.class_name.clone();
        let ty = match node
            .class_id
            .and_then(|id| self.language.class(id))
            .and_then(|class| class.attribute_type(&attr_token.text))
        {
            Some(ty) => ty,
            None => {
                self.error_at(
                    attr_token,
                    format!(
                        "class `{class_name}` has no attribute `{}`",
                        attr_token.text
                    ),
                );
                self.advance();
                self.recover();
                return;
            }
        };
        self.advance();
        if self
            .expect(TokenKind::Assign, "expected `=` after the attribute name")
            .is_none()
        {
            self.recover();
            return;
        }

        let value = if ty.is_numeric() {
            self.numeric_value(attr_token, ty)
        } else if ty.is_string() {
            self.string_value(attr_token, ty)
        } else {
            self.vector_value(attr_token, ty)
        };
        let Some(value) = value else {
            self.recover();
            return;
        };
        if self
            .expect(TokenKind::Semicolon, "expected `;` after the assignment")
            .is_none()
        {
            self.recover();
            return;
        }
        trace!("assigned `{}` on `{class_name}`", attr_token.text);
        if let Some(node) = self.builder.current_node_mut() {
            node.push_attribute(syntax::Attribute::new(attr_token.text.clone(), value));
        }
    }

    fn numeric_value(&mut self, attr_token: &Token, ty: Type) -> Option<syntax::Value> {
        let number = self.expect(
            TokenKind::Number,
            &format!(
                "attribute `{}` has type {}, expected a numeric literal",
                attr_token.text,
                ty.descriptor_name()
            ),
        )?;
        match values::parse_number(ty, &number.text) {
            Ok(value) => Some(value),
            Err(message) => {
                self.error_at(&number, message);
                None
            }
        }
    }

    fn string_value(&mut self, attr_token: &Token, ty: Type) -> Option<syntax::Value> {
        match ty {
            Type::String => {
                let token = self.expect(
                    TokenKind::Str,
                    &format!(
                        "attribute `{}` has type string, expected a \"...\" literal",
                        attr_token.text
                    ),
                )?;
                Some(syntax::Value::String(token.text))
            }
            _ => {
                let token = self.expect(
                    TokenKind::StrMd,
                    &format!(
                        "attribute `{}` has type str-md, expected a ```...``` literal",
                        attr_token.text
                    ),
                )?;
                Some(syntax::Value::StrMd(token.text))
            }
        }
    }

    /// `IDENT ( NUMBER , NUMBER ... )` with a constructor that must agree
    /// with the declared type.
    fn vector_value(&mut self, attr_token: &Token, ty: Type) -> Option<syntax::Value> {
        let constructor = self.expect(
            TokenKind::Identifier,
            &format!(
                "attribute `{}` has type {}, expected a vector constructor",
                attr_token.text,
                ty.descriptor_name()
            ),
        )?;
        let constructor_ok = values::constructor_matches(ty, &constructor.text);
        if !constructor_ok {
            self.error_at(
                &constructor,
                format!(
                    "constructor `{}` cannot produce a {} value",
                    constructor.text,
                    ty.descriptor_name()
                ),
            );
        }
        self.expect(TokenKind::ParenOpen, "expected `(` after the vector constructor")?;
        let mut components = Vec::new();
        loop {
            let number = self.expect(
                TokenKind::Number,
                "expected a numeric vector component",
            )?;
            components.push(number.text);
            match self.peek().map(|t| t.kind) {
                Some(TokenKind::Comma) => {
                    self.advance();
                }
                Some(TokenKind::ParenClose) => {
                    self.advance();
                    break;
                }
                _ => {
                    let message = "expected `,` or `)` in the vector constructor";
                    match self.peek().cloned() {
                        Some(token) => self.error_at(&token, message),
                        None => self.error_at_end(message),
                    }
                    return None;
                }
            }
        }
        if !constructor_ok {
            return None;
        }
        match values::build_vector(ty, &components) {
            Ok(value) => Some(value),
            Err(message) => {
                self.error_at(&constructor, message);
                None
            }
        }
    }

    // Directives
    // ----------

    fn directive(&mut self, token: &Token, keyword: Keyword, importer: &mut dyn Importer) {
        match keyword {
            Keyword::Language => {
                self.error_at(token, "#language is only valid as the first line of a file");
                self.advance();
                self.recover();
            }
            Keyword::Include => {
                self.advance();
                let Some(path) = self.expect(TokenKind::Str, "expected a quoted path after #include")
                else {
                    self.recover();
                    return;
                };
                self.import_static(token, &path.text, ImportKind::Include, importer);
            }
            Keyword::IncludeDyn => {
                self.advance();
                let Some(path) =
                    self.expect(TokenKind::Str, "expected a quoted path after #include-dyn")
                else {
                    self.recover();
                    return;
                };
                // Inside an included file only the outer file is being
                // compiled, so nested dynamism degrades to static.
                if !self.builder.allows_dynamic() {
                    self.import_static(token, &path.text, ImportKind::Include, importer);
                    return;
                }
                let id = match self
                    .builder
                    .allocate_file(SourceFile::Include(path.text.clone()))
                {
                    Ok(id) => id,
                    Err(err) => {
                        self.error_at(token, err.to_string());
                        return;
                    }
                };
                if let Some(tree) = self.import(token, &path.text, ImportKind::Include, id, importer)
                {
                    self.builder.graft(tree.nodes);
                }
            }
            Keyword::Template => {
                self.advance();
                if self.peek().map(|t| t.kind) == Some(TokenKind::Str) {
                    let path = match self.advance().cloned() {
                        Some(p) => p,
                        None => return,
                    };
                    self.import_template(token, &path.text, self.builder.current_file(), importer);
                } else if !self.builder.mark_template() {
                    self.error_at(token, "#template marker outside of any node");
                }
            }
            Keyword::TemplateDyn => {
                self.advance();
                let Some(path) =
                    self.expect(TokenKind::Str, "expected a quoted path after #template-dyn")
                else {
                    self.recover();
                    return;
                };
                if !self.builder.allows_dynamic() {
                    self.import_template(token, &path.text, self.builder.current_file(), importer);
                    return;
                }
                if self.builder.has_template_import() {
                    self.error_at(token, TreeError::TemplateAlreadyImported.to_string());
                    return;
                }
                let id = match self
                    .builder
                    .allocate_file(SourceFile::Template(path.text.clone()))
                {
                    Ok(id) => id,
                    Err(err) => {
                        self.error_at(token, err.to_string());
                        return;
                    }
                };
                self.import_template(token, &path.text, id, importer);
            }
            Keyword::Register => {
                self.advance();
                let Some(alias) =
                    self.expect(TokenKind::Str, "expected a quoted alias after #register")
                else {
                    self.recover();
                    return;
                };
                let Some(path) =
                    self.expect(TokenKind::Str, "expected a quoted path after the alias")
                else {
                    self.recover();
                    return;
                };
                importer.register_path(&alias.text, &path.text);
            }
        }
    }

    /// Static inclusion: the child compiles with our file id and its
    /// nodes graft in as if they were authored here.
    fn import_static(
        &mut self,
        token: &Token,
        path: &str,
        kind: ImportKind,
        importer: &mut dyn Importer,
    ) {
        let file_id = self.builder.current_file();
        if let Some(tree) = self.import(token, path, kind, file_id, importer) {
            self.builder.graft(tree.nodes);
        }
    }

    /// Template import, static (`file_id == current_file`) or dynamic.
    /// The imported template node becomes the scope everything after the
    /// directive nests into.
    fn import_template(
        &mut self,
        token: &Token,
        path: &str,
        file_id: u8,
        importer: &mut dyn Importer,
    ) {
        if self.builder.has_template_import() {
            self.error_at(token, TreeError::TemplateAlreadyImported.to_string());
            return;
        }
        let Some(tree) = self.import(token, path, ImportKind::Template, file_id, importer) else {
            return;
        };
        let template_path = match tree.template_path {
            Some(p) if !p.is_empty() => p,
            _ => {
                self.error_at(
                    token,
                    format!("`{path}` does not mark a template node"),
                );
                self.builder.graft(tree.nodes);
                return;
            }
        };
        let base = self.builder.graft(tree.nodes);
        if let Err(err) = self.builder.import_template(base, &template_path) {
            self.error_at(token, err.to_string());
        }
    }

    fn import(
        &mut self,
        token: &Token,
        path: &str,
        kind: ImportKind,
        file_id: u8,
        importer: &mut dyn Importer,
    ) -> Option<syntax::ImportedTree> {
        match importer.import(path, kind, file_id) {
            Ok(tree) => Some(tree),
            Err(err) => {
                self.error_at(token, err.to_string());
                self.fatal = true;
                None
            }
        }
    }
}
