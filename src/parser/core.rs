use super::*;

/// A cursor pattern: a token matches a `TokenKind` pattern by kind and a
/// string pattern by literal. Keywords are identifier tokens, so `"LET"`
/// matches exactly the identifier spelled `LET`.
pub(super) trait TokenPattern: Copy {
    fn matches(self, token: &Token) -> bool;
}

impl TokenPattern for TokenKind {
    fn matches(self, token: &Token) -> bool {
        token.kind == self
    }
}

impl TokenPattern for &str {
    fn matches(self, token: &Token) -> bool {
        token.literal == self
    }
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, index: 0 }
    }

    pub(super) fn error(&self, msg: impl Into<String>) -> ParseError {
        ParseError::Error { msg: msg.into() }
    }

    pub(super) fn has(&self, offset: usize) -> bool {
        self.index + offset < self.tokens.len()
    }

    /// The just-consumed token. Only meaningful directly after a successful
    /// `take`/`expect`.
    pub(super) fn previous(&self) -> &Token {
        &self.tokens[self.index - 1]
    }

    pub(super) fn check(&self, pattern: impl TokenPattern) -> bool {
        self.check_at(0, pattern)
    }

    pub(super) fn check_at(&self, offset: usize, pattern: impl TokenPattern) -> bool {
        self.has(offset) && pattern.matches(&self.tokens[self.index + offset])
    }

    /// Equivalent to `check`, but also advances past the token on a match.
    pub(super) fn take(&mut self, pattern: impl TokenPattern) -> bool {
        if self.check(pattern) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    pub(super) fn expect(
        &mut self,
        pattern: impl TokenPattern,
        msg: &str,
    ) -> Result<Token, ParseError> {
        if self.take(pattern) {
            Ok(self.previous().clone())
        } else {
            Err(self.error(format!("{}, found {}", msg, self.describe_current())))
        }
    }

    fn describe_current(&self) -> String {
        if self.has(0) {
            format!("'{}'", self.tokens[self.index].literal)
        } else {
            "end of input".to_string()
        }
    }

    /// source ::= stmt*
    pub fn parse(&mut self) -> Result<Source, ParseError> {
        let mut statements = Vec::new();
        while self.has(0) {
            statements.push(self.parse_stmt()?);
        }
        Ok(Source { statements })
    }
}
