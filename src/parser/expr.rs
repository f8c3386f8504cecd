use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::BigInt;

use super::*;
use crate::lexer::TokenKind;

impl Parser {
    pub(super) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_logical()
    }

    // logical ::= comparison (('AND' | 'OR') comparison)*
    fn parse_logical(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_comparison()?;
        while self.take("AND") || self.take("OR") {
            let operator = self.previous().literal.clone();
            let right = self.parse_comparison()?;
            left = Expr::Binary {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    // comparison ::= additive (('<' | '<=' | '>' | '>=' | '==' | '!=') additive)*
    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;
        while self.take("<")
            || self.take("<=")
            || self.take(">")
            || self.take(">=")
            || self.take("==")
            || self.take("!=")
        {
            let operator = self.previous().literal.clone();
            let right = self.parse_additive()?;
            left = Expr::Binary {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    // additive ::= multiplicative (('+' | '-') multiplicative)*
    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;
        while self.take("+") || self.take("-") {
            let operator = self.previous().literal.clone();
            let right = self.parse_multiplicative()?;
            left = Expr::Binary {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    // multiplicative ::= secondary (('*' | '/') secondary)*
    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_secondary()?;
        while self.take("*") || self.take("/") {
            let operator = self.previous().literal.clone();
            let right = self.parse_secondary()?;
            left = Expr::Binary {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    // secondary ::= primary ('.' identifier ('(' arguments? ')')?)*
    fn parse_secondary(&mut self) -> Result<Expr, ParseError> {
        let mut expression = self.parse_primary()?;

        while self.take(".") {
            let name = self
                .expect(TokenKind::Identifier, "Expected identifier after '.'")?
                .literal;

            if self.take("(") {
                let arguments = self.parse_arguments()?;
                self.expect(")", "Missing ')' at end of method arguments")?;
                expression = Expr::Method {
                    receiver: Box::new(expression),
                    name,
                    arguments,
                };
            } else {
                expression = Expr::Property {
                    receiver: Box::new(expression),
                    name,
                };
            }
        }
        Ok(expression)
    }

    // primary ::= literal | '(' expr ')' | object_expr
    //           | identifier ('(' arguments? ')')?
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        if self.check(TokenKind::Integer)
            || self.check(TokenKind::Decimal)
            || self.check(TokenKind::Character)
            || self.check(TokenKind::String)
            || self.check("NIL")
            || self.check("TRUE")
            || self.check("FALSE")
        {
            self.parse_literal().map(Expr::Literal)
        } else if self.take("(") {
            let inner = self.parse_expr()?;
            self.expect(")", "Expected ')' after grouped expression")?;
            Ok(Expr::Group(Box::new(inner)))
        } else if self.check("OBJECT") {
            self.parse_object_expr()
        } else if self.check(TokenKind::Identifier) {
            self.parse_variable_or_function_expr()
        } else if self.has(0) {
            Err(self.error(format!(
                "Unexpected token: '{}'",
                self.tokens[self.index].literal
            )))
        } else {
            Err(self.error("Unexpected end of input in expression"))
        }
    }

    fn parse_literal(&mut self) -> Result<Literal, ParseError> {
        if self.take("NIL") {
            return Ok(Literal::Nil);
        }
        if self.take("TRUE") {
            return Ok(Literal::Bool(true));
        }
        if self.take("FALSE") {
            return Ok(Literal::Bool(false));
        }

        if self.take(TokenKind::Integer) {
            let literal = self.previous().literal.clone();
            // An integer literal may carry an exponent ('5e3'); it is read
            // as a decimal and truncated toward zero.
            if literal.contains('e') {
                let decimal = BigDecimal::from_str(&literal)
                    .map_err(|_| self.error(format!("Invalid integer literal: {}", literal)))?;
                let (integer, _) = decimal
                    .with_scale_round(0, RoundingMode::Down)
                    .into_bigint_and_exponent();
                return Ok(Literal::Integer(integer));
            }
            let integer = BigInt::from_str(&literal)
                .map_err(|_| self.error(format!("Invalid integer literal: {}", literal)))?;
            return Ok(Literal::Integer(integer));
        }

        if self.take(TokenKind::Decimal) {
            let literal = self.previous().literal.clone();
            let decimal = BigDecimal::from_str(&literal)
                .map_err(|_| self.error(format!("Invalid decimal literal: {}", literal)))?;
            return Ok(Literal::Decimal(decimal));
        }

        if self.take(TokenKind::Character) {
            let literal = self.previous().literal.clone();
            let content = resolve_escapes(&literal[1..literal.len() - 1]);
            return match content.chars().next() {
                Some(c) => Ok(Literal::Character(c)),
                None => Err(self.error(format!("Empty character literal: {}", literal))),
            };
        }

        if self.take(TokenKind::String) {
            let literal = self.previous().literal.clone();
            let content = resolve_escapes(&literal[1..literal.len() - 1]);
            return Ok(Literal::String(content));
        }

        Err(self.error(format!(
            "Expected a literal, found {}",
            if self.has(0) {
                format!("'{}'", self.tokens[self.index].literal)
            } else {
                "end of input".to_string()
            }
        )))
    }

    // object_expr ::= 'OBJECT' identifier? 'DO' let_stmt* def_stmt* 'END'
    fn parse_object_expr(&mut self) -> Result<Expr, ParseError> {
        self.expect("OBJECT", "Expected OBJECT")?;

        // An identifier directly before DO is the object's name; a bare
        // OBJECT DO ... END is anonymous.
        let mut name = None;
        if self.check(TokenKind::Identifier) && !self.check("DO") {
            name = Some(
                self.expect(TokenKind::Identifier, "Expected object name")?
                    .literal,
            );
        }

        self.expect("DO", "Expected DO")?;

        let mut fields = Vec::new();
        while self.check("LET") {
            fields.push(self.parse_let_stmt()?);
        }

        let mut methods = Vec::new();
        while self.check("DEF") {
            methods.push(self.parse_def_stmt()?);
        }

        self.expect("END", "Expected END")?;
        Ok(Expr::Object {
            name,
            fields,
            methods,
        })
    }

    // variable_or_function_expr ::= identifier ('(' arguments? ')')?
    fn parse_variable_or_function_expr(&mut self) -> Result<Expr, ParseError> {
        let name = self
            .expect(TokenKind::Identifier, "Expected identifier")?
            .literal;

        if self.take("(") {
            let arguments = self.parse_arguments()?;
            self.expect(")", "Expected ')' after arguments")?;
            return Ok(Expr::Function { name, arguments });
        }
        Ok(Expr::Variable(name))
    }

    // arguments ::= expr (',' expr)*
    // The caller has consumed '(' and expects the closing ')'.
    fn parse_arguments(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut arguments = Vec::new();
        if !self.check(")") {
            arguments.push(self.parse_expr()?);
            while self.take(",") {
                if self.check(")") {
                    return Err(self.error("Expected expression after ','"));
                }
                arguments.push(self.parse_expr()?);
            }
        }
        Ok(arguments)
    }
}

/// Resolves the escape sequences of a character/string body in one
/// left-to-right scan; a resolved backslash never starts a second escape.
fn resolve_escapes(content: &str) -> String {
    let mut resolved = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            resolved.push(c);
            continue;
        }
        match chars.next() {
            Some('b') => resolved.push('\u{0008}'),
            Some('n') => resolved.push('\n'),
            Some('r') => resolved.push('\r'),
            Some('t') => resolved.push('\t'),
            // \' \" \\ resolve to the escaped character itself
            Some(other) => resolved.push(other),
            None => resolved.push('\\'),
        }
    }
    resolved
}
