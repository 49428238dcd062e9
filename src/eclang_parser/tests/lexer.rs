use eclang_parser::lexer::tokenize;
use eclang_parser::{Keyword, TokenKind};
use syntax::{Class, Language};

fn test_language() -> Language {
    Language::with_classes(
        "test",
        "elt",
        "eltc",
        vec![b'E', b'C', b'L', b'T', b'1'],
        vec![Class::new("Container"), Class::new("StringTests")],
    )
    .unwrap()
}

#[test]
fn punctuation_and_statement_shapes() {
    let lang = test_language();
    let tokens = tokenize("Container a { } ; = ( ) ,", &lang, 0).unwrap();
    let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Class,
            TokenKind::Identifier,
            TokenKind::ScopeEnter,
            TokenKind::ScopeExit,
            TokenKind::Semicolon,
            TokenKind::Assign,
            TokenKind::ParenOpen,
            TokenKind::ParenClose,
            TokenKind::Comma,
        ]
    );
}

#[test]
fn classes_are_recognized_against_the_language() {
    let lang = test_language();
    let tokens = tokenize("Container container StringTests strings", &lang, 0).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Class);
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[2].kind, TokenKind::Class);
    assert_eq!(tokens[3].kind, TokenKind::Identifier);
}

#[test]
fn keywords_are_a_closed_set() {
    let lang = test_language();
    let tokens = tokenize("#include #template-dyn #register", &lang, 0).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Keyword(Keyword::Include));
    assert_eq!(tokens[1].kind, TokenKind::Keyword(Keyword::TemplateDyn));
    assert_eq!(tokens[2].kind, TokenKind::Keyword(Keyword::Register));

    let err = tokenize("#includ \"x\"", &lang, 0).unwrap_err();
    assert_eq!(err.len(), 1);
    assert!(err.iter().next().unwrap().message.contains("invalid keyword"));
}

#[test]
fn numbers_signed_and_decimal() {
    let lang = test_language();
    let tokens = tokenize("1 -5 +3 1.25 -0.5", &lang, 0).unwrap();
    let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(texts, vec!["1", "-5", "+3", "1.25", "-0.5"]);
    assert!(tokens.iter().all(|t| t.kind == TokenKind::Number));
}

#[test]
fn strings_resolve_escapes_and_span_lines() {
    let lang = test_language();
    let tokens = tokenize("\"say \\\"hi\\\"\" \"two\nlines\"", &lang, 0).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::Str);
    assert_eq!(tokens[0].text, "say \"hi\"");
    assert_eq!(tokens[1].text, "two\nlines");
}

#[test]
fn markdown_strings_use_triple_backticks() {
    let lang = test_language();
    let tokens = tokenize("```# Title\nbody```", &lang, 0).unwrap();
    assert_eq!(tokens[0].kind, TokenKind::StrMd);
    assert_eq!(tokens[0].text, "# Title\nbody");

    // A lone backtick is not a markdown delimiter.
    let err = tokenize("`x`", &lang, 0).unwrap_err();
    assert!(!err.is_empty());
}

#[test]
fn comments_are_discarded_but_tracked() {
    let lang = test_language();
    let tokens = tokenize(
        "// leading\nContainer /* inline\nspanning */ a;",
        &lang,
        0,
    )
    .unwrap();
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0].kind, TokenKind::Class);
    assert_eq!(tokens[0].line, 2);
    // The identifier sits after a block comment that spans a line.
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].line, 3);
}

#[test]
fn line_offset_accounts_for_the_language_line() {
    let lang = test_language();
    let tokens = tokenize("Container a;", &lang, 1).unwrap();
    assert_eq!(tokens[0].line, 2);
    assert_eq!(tokens[0].column, 1);
}

#[test]
fn errors_accumulate_across_the_whole_input() {
    let lang = test_language();
    let err = tokenize("@ Container $ a %", &lang, 0).unwrap_err();
    assert_eq!(err.len(), 3);
    let messages: Vec<_> = err.iter().map(|d| d.message.clone()).collect();
    assert!(messages.iter().all(|m| m.contains("unexpected character")));
}

#[test]
fn unterminated_strings_and_comments_fail() {
    let lang = test_language();
    let err = tokenize("\"no end", &lang, 0).unwrap_err();
    assert!(err.iter().next().unwrap().message.contains("unterminated string"));

    let err = tokenize("/* no end", &lang, 0).unwrap_err();
    assert!(err
        .iter()
        .next()
        .unwrap()
        .message
        .contains("unterminated block comment"));
}

#[test]
fn slash_without_comment_is_diagnosed() {
    let lang = test_language();
    let err = tokenize("Container / a;", &lang, 0).unwrap_err();
    assert!(err.iter().next().unwrap().message.contains("comment"));
}
