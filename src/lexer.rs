use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Integer,
    Decimal,
    Character,
    String,
    Operator,
}

/// A lexical unit: the kind plus the exact source substring it matched.
/// Keywords (`LET`, `DEF`, ...) are ordinary identifiers at this level;
/// the parser tells them apart by literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>) -> Self {
        Token {
            kind,
            literal: literal.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LexError {
    #[error("Lex error: {msg}")]
    Error { msg: String },
}

// ---------------------------------------------------------------------------
// Character classes: each matches exactly one code unit
// ---------------------------------------------------------------------------

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\u{0008}' | '\t' | '\n' | '\r')
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_part(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_sign(c: char) -> bool {
    c == '+' || c == '-'
}

fn is_comparison(c: char) -> bool {
    matches!(c, '<' | '>' | '!' | '=')
}

fn is_escape(c: char) -> bool {
    matches!(c, 'b' | 'n' | 'r' | 't' | '\'' | '"' | '\\')
}

// ---------------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------------

pub struct Lexer {
    chars: CharStream,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            chars: CharStream::new(source),
        }
    }

    fn error(&self, msg: impl Into<String>) -> LexError {
        LexError::Error { msg: msg.into() }
    }

    pub fn lex(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        while self.chars.has(0) {
            if let Some(token) = self.lex_token()? {
                tokens.push(token);
            }
        }
        Ok(tokens)
    }

    fn lex_token(&mut self) -> Result<Option<Token>, LexError> {
        if self.chars.peek(&[is_whitespace]) {
            self.chars.advance(1);
            self.chars.emit();
            return Ok(None);
        }

        if self.chars.peek(&[|c| c == '/', |c| c == '/']) {
            self.lex_comment();
            self.chars.emit();
            return Ok(None);
        }

        let token = if self.chars.peek(&[is_identifier_start]) {
            self.lex_identifier()
        } else if self.chars.peek(&[is_digit]) || self.chars.peek(&[is_sign, is_digit]) {
            self.lex_number()?
        } else if self.chars.peek(&[|c| c == '\'']) {
            self.lex_character()?
        } else if self.chars.peek(&[|c| c == '"']) {
            self.lex_string()?
        } else {
            self.lex_operator()
        };

        Ok(Some(token))
    }

    fn lex_comment(&mut self) {
        self.chars.advance(2);
        while self.chars.has(0) && !self.chars.peek(&[|c| c == '\n' || c == '\r']) {
            self.chars.advance(1);
        }
    }

    // identifier ::= [A-Za-z_] [A-Za-z0-9_-]*
    fn lex_identifier(&mut self) -> Token {
        self.chars.advance(1);
        while self.chars.peek(&[is_identifier_part]) {
            self.chars.advance(1);
        }
        Token::new(TokenKind::Identifier, self.chars.emit())
    }

    // number ::= [+-]? [0-9]+ ('.' [0-9]+)? ('e' [0-9]+)?
    fn lex_number(&mut self) -> Result<Token, LexError> {
        let mut is_decimal = false;

        if self.chars.peek(&[is_sign]) {
            self.chars.advance(1);
        }

        if !self.chars.peek(&[is_digit]) {
            return Err(self.error("Expected a digit in number literal"));
        }
        while self.chars.peek(&[is_digit]) {
            self.chars.advance(1);
        }

        // '.' and 'e' are consumed only when a digit follows; otherwise they
        // are left for the operator lexer.
        if self.chars.peek(&[|c| c == '.', is_digit]) {
            is_decimal = true;
            self.chars.advance(1);
            while self.chars.peek(&[is_digit]) {
                self.chars.advance(1);
            }
        }

        if self.chars.peek(&[|c| c == 'e', is_digit]) {
            self.chars.advance(1);
            while self.chars.peek(&[is_digit]) {
                self.chars.advance(1);
            }
        }

        let kind = if is_decimal {
            TokenKind::Decimal
        } else {
            TokenKind::Integer
        };
        Ok(Token::new(kind, self.chars.emit()))
    }

    // character ::= ['] ([^'\n\r\\] | escape) [']
    fn lex_character(&mut self) -> Result<Token, LexError> {
        self.chars.advance(1);

        if self.chars.peek(&[|c| !matches!(c, '\'' | '\n' | '\r' | '\\')]) {
            self.chars.advance(1);
        } else if self.chars.peek(&[|c| c == '\\']) {
            self.chars.advance(1);
            self.lex_escape()?;
        } else {
            return Err(self.error("Unterminated character literal"));
        }

        if !self.chars.peek(&[|c| c == '\'']) {
            return Err(self.error("Expected ' after character literal"));
        }
        self.chars.advance(1);

        Ok(Token::new(TokenKind::Character, self.chars.emit()))
    }

    // string ::= '"' ([^"\n\r\\] | escape)* '"'
    fn lex_string(&mut self) -> Result<Token, LexError> {
        self.chars.advance(1);

        loop {
            if self.chars.peek(&[|c| !matches!(c, '"' | '\n' | '\r' | '\\')]) {
                self.chars.advance(1);
            } else if self.chars.peek(&[|c| c == '\\']) {
                self.chars.advance(1);
                self.lex_escape()?;
            } else {
                break;
            }
        }

        if !self.chars.peek(&[|c| c == '"']) {
            return Err(self.error("Unterminated string literal"));
        }
        self.chars.advance(1);

        Ok(Token::new(TokenKind::String, self.chars.emit()))
    }

    fn lex_escape(&mut self) -> Result<(), LexError> {
        if self.chars.peek(&[is_escape]) {
            self.chars.advance(1);
            Ok(())
        } else {
            Err(self.error("Invalid escape sequence"))
        }
    }

    // operator ::= [<>!=] '='? | any other single code unit
    fn lex_operator(&mut self) -> Token {
        if self.chars.peek(&[is_comparison]) {
            self.chars.advance(1);
            if self.chars.peek(&[|c| c == '=']) {
                self.chars.advance(1);
            }
        } else {
            self.chars.advance(1);
        }
        Token::new(TokenKind::Operator, self.chars.emit())
    }
}

// ---------------------------------------------------------------------------
// CharStream
// ---------------------------------------------------------------------------

/// Cursor into the source characters. `index` is the read position and
/// `length` counts the characters matched since the last `emit`, so the
/// current token literal is always `chars[index - length .. index]`.
struct CharStream {
    chars: Vec<char>,
    index: usize,
    length: usize,
}

impl CharStream {
    fn new(source: &str) -> Self {
        CharStream {
            chars: source.chars().collect(),
            index: 0,
            length: 0,
        }
    }

    fn has(&self, offset: usize) -> bool {
        self.index + offset < self.chars.len()
    }

    /// True when the next characters match the given single-character
    /// classes, one class per position. Does not advance.
    fn peek(&self, classes: &[fn(char) -> bool]) -> bool {
        if !self.has(classes.len().saturating_sub(1)) {
            return false;
        }
        classes
            .iter()
            .enumerate()
            .all(|(offset, class)| class(self.chars[self.index + offset]))
    }

    fn advance(&mut self, count: usize) {
        self.index += count;
        self.length += count;
    }

    /// The literal built from all characters advanced over since the last
    /// call to `emit`; resets the length for the next token.
    fn emit(&mut self) -> String {
        let literal = self.chars[self.index - self.length..self.index]
            .iter()
            .collect();
        self.length = 0;
        literal
    }
}
