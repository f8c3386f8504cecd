/// Spec tests for the Opal lexer.
///
/// Each test checks that source text produces the expected token kinds and
/// literals, or fails to lex. Token literals are always the exact source
/// substring; escape resolution happens later, in the parser.
use opal::lexer::{Lexer, Token, TokenKind};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn lex(src: &str) -> Vec<Token> {
    Lexer::new(src).lex().unwrap()
}

fn literals(src: &str) -> Vec<String> {
    lex(src).into_iter().map(|t| t.literal).collect()
}

fn single(src: &str) -> Token {
    let tokens = lex(src);
    assert_eq!(tokens.len(), 1, "expected one token, got {:?}", tokens);
    tokens.into_iter().next().unwrap()
}

fn lex_err(src: &str) -> bool {
    Lexer::new(src).lex().is_err()
}

// ---------------------------------------------------------------------------
// Identifiers and keywords
// ---------------------------------------------------------------------------

#[test]
fn identifier_simple() {
    let token = single("abc");
    assert_eq!(token.kind, TokenKind::Identifier);
    assert_eq!(token.literal, "abc");
}

#[test]
fn identifier_may_contain_digits_dashes_underscores() {
    let token = single("a1_b-c");
    assert_eq!(token.kind, TokenKind::Identifier);
    assert_eq!(token.literal, "a1_b-c");
}

#[test]
fn identifier_may_start_with_underscore() {
    assert_eq!(single("_x").kind, TokenKind::Identifier);
}

#[test]
fn keywords_are_lexed_as_identifiers() {
    for keyword in ["LET", "DEF", "IF", "RETURN", "OBJECT", "NIL", "TRUE"] {
        let token = single(keyword);
        assert_eq!(token.kind, TokenKind::Identifier, "{}", keyword);
        assert_eq!(token.literal, keyword);
    }
}

#[test]
fn dollar_is_not_an_identifier_start() {
    // '$' falls through to the operator lexer, so $RETURNS can never be
    // spelled in user source as a single identifier.
    let tokens = lex("$RETURNS");
    assert_eq!(tokens[0].kind, TokenKind::Operator);
    assert_eq!(tokens[0].literal, "$");
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
}

// ---------------------------------------------------------------------------
// Numbers
// ---------------------------------------------------------------------------

#[test]
fn integer_basic() {
    let token = single("42");
    assert_eq!(token.kind, TokenKind::Integer);
    assert_eq!(token.literal, "42");
}

#[test]
fn integer_signed() {
    assert_eq!(single("+5").literal, "+5");
    let token = single("-17");
    assert_eq!(token.kind, TokenKind::Integer);
    assert_eq!(token.literal, "-17");
}

#[test]
fn sign_without_digit_is_an_operator() {
    let tokens = lex("+ 1");
    assert_eq!(tokens[0].kind, TokenKind::Operator);
    assert_eq!(tokens[0].literal, "+");
    assert_eq!(tokens[1].kind, TokenKind::Integer);
}

#[test]
fn decimal_basic() {
    let token = single("3.14");
    assert_eq!(token.kind, TokenKind::Decimal);
    assert_eq!(token.literal, "3.14");
}

#[test]
fn trailing_dot_is_not_consumed() {
    // '.' only joins the number when a digit follows.
    let tokens = lex("1.");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].kind, TokenKind::Integer);
    assert_eq!(tokens[0].literal, "1");
    assert_eq!(tokens[1].kind, TokenKind::Operator);
    assert_eq!(tokens[1].literal, ".");
}

#[test]
fn exponent_stays_an_integer() {
    let token = single("1e5");
    assert_eq!(token.kind, TokenKind::Integer);
    assert_eq!(token.literal, "1e5");
}

#[test]
fn decimal_with_exponent() {
    let token = single("2.5e3");
    assert_eq!(token.kind, TokenKind::Decimal);
    assert_eq!(token.literal, "2.5e3");
}

#[test]
fn exponent_without_digit_is_left_behind() {
    let tokens = lex("1e");
    assert_eq!(tokens[0].literal, "1");
    assert_eq!(tokens[1].kind, TokenKind::Identifier);
    assert_eq!(tokens[1].literal, "e");
}

// ---------------------------------------------------------------------------
// Characters and strings
// ---------------------------------------------------------------------------

#[test]
fn character_basic() {
    let token = single("'a'");
    assert_eq!(token.kind, TokenKind::Character);
    assert_eq!(token.literal, "'a'");
}

#[test]
fn character_escape() {
    let token = single("'\\n'");
    assert_eq!(token.kind, TokenKind::Character);
    assert_eq!(token.literal, "'\\n'");
}

#[test]
fn character_with_two_chars_fails() {
    assert!(lex_err("'ab'"));
}

#[test]
fn character_unterminated_fails() {
    assert!(lex_err("'"));
    assert!(lex_err("'a"));
}

#[test]
fn string_basic() {
    let token = single("\"hello\"");
    assert_eq!(token.kind, TokenKind::String);
    assert_eq!(token.literal, "\"hello\"");
}

#[test]
fn string_empty() {
    assert_eq!(single("\"\"").literal, "\"\"");
}

#[test]
fn string_escape_literal_is_untouched() {
    // The literal keeps the raw escape; resolution is the parser's job.
    let token = single("\"ab\\nc\"");
    assert_eq!(token.kind, TokenKind::String);
    assert_eq!(token.literal, "\"ab\\nc\"");
}

#[test]
fn string_unterminated_fails() {
    assert!(lex_err("\"abc"));
}

#[test]
fn string_with_newline_fails() {
    assert!(lex_err("\"ab\ncd\""));
}

#[test]
fn string_invalid_escape_fails() {
    assert!(lex_err("\"\\q\""));
}

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

#[test]
fn comparison_operators_absorb_equals() {
    for op in ["<=", ">=", "==", "!="] {
        let token = single(op);
        assert_eq!(token.kind, TokenKind::Operator);
        assert_eq!(token.literal, op);
    }
}

#[test]
fn single_comparison_operators() {
    for op in ["<", ">", "=", "!"] {
        assert_eq!(single(op).literal, op);
    }
}

#[test]
fn any_other_character_is_a_single_operator() {
    for op in ["+", "*", "/", ";", ":", ",", "(", ")", ".", "&", "$"] {
        let token = single(op);
        assert_eq!(token.kind, TokenKind::Operator);
        assert_eq!(token.literal, op);
    }
}

#[test]
fn double_equals_then_equals() {
    let tokens = lex("===");
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].literal, "==");
    assert_eq!(tokens[1].literal, "=");
}

// ---------------------------------------------------------------------------
// Whitespace and comments
// ---------------------------------------------------------------------------

#[test]
fn whitespace_is_discarded() {
    let tokens = lex(" \t\r\n\u{0008}1");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].literal, "1");
}

#[test]
fn comment_runs_to_end_of_line() {
    assert_eq!(literals("// comment\n1;"), vec!["1", ";"]);
}

#[test]
fn comment_at_end_of_input() {
    assert_eq!(literals("1; // done"), vec!["1", ";"]);
}

#[test]
fn lone_slash_is_an_operator() {
    assert_eq!(single("/").kind, TokenKind::Operator);
}

// ---------------------------------------------------------------------------
// Whole statements
// ---------------------------------------------------------------------------

#[test]
fn let_statement_token_sequence() {
    assert_eq!(
        literals("LET x = 1 + 2;"),
        vec!["LET", "x", "=", "1", "+", "2", ";"]
    );
}

#[test]
fn token_literals_reassemble_the_source() {
    // Concatenating all token literals yields the source minus whitespace
    // and comments, in order.
    let src = "LET x: Integer = 1 + 2; // trailing\nIF x < 3 DO log(\"hi\"); END";
    let rebuilt: String = lex(src).iter().map(|t| t.literal.as_str()).collect();
    assert_eq!(rebuilt, "LETx:Integer=1+2;IFx<3DOlog(\"hi\");END");
}
