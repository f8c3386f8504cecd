use super::*;
use crate::lexer::TokenKind;

impl Parser {
    // stmt ::= let_stmt | def_stmt | if_stmt | for_stmt | return_stmt
    //        | expression_or_assignment_stmt
    pub(super) fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        if self.check("LET") {
            self.parse_let_stmt().map(Stmt::Let)
        } else if self.check("DEF") {
            self.parse_def_stmt().map(Stmt::Def)
        } else if self.check("IF") {
            self.parse_if_stmt()
        } else if self.check("FOR") {
            self.parse_for_stmt()
        } else if self.check("RETURN") {
            self.parse_return_stmt()
        } else {
            self.parse_expression_or_assignment_stmt()
        }
    }

    // let_stmt ::= 'LET' identifier (':' identifier)? ('=' expr)? ';'
    pub(super) fn parse_let_stmt(&mut self) -> Result<Let, ParseError> {
        self.expect("LET", "Expected LET")?;
        let name = self
            .expect(TokenKind::Identifier, "Expected identifier after 'LET'")?
            .literal;

        let mut type_name = None;
        if self.take(":") {
            type_name = Some(
                self.expect(TokenKind::Identifier, "Expected type name after ':'")?
                    .literal,
            );
        }

        let mut value = None;
        if self.take("=") {
            value = Some(self.parse_expr()?);
        }

        self.expect(";", "Expected ';' at end of let statement")?;
        Ok(Let {
            name,
            type_name,
            value,
        })
    }

    // def_stmt ::= 'DEF' identifier '(' parameters? ')' (':' identifier)?
    //              'DO' stmt* 'END'
    pub(super) fn parse_def_stmt(&mut self) -> Result<Def, ParseError> {
        self.expect("DEF", "Expected DEF")?;
        let name = self
            .expect(TokenKind::Identifier, "Expected identifier after 'DEF'")?
            .literal;
        self.expect("(", "Expected '(' after function name")?;

        let mut parameters = Vec::new();
        let mut parameter_types = Vec::new();
        if !self.check(")") {
            self.parse_parameter(&mut parameters, &mut parameter_types)?;
            while self.take(",") {
                if !self.check(TokenKind::Identifier) {
                    return Err(self.error("Expected parameter after ','"));
                }
                self.parse_parameter(&mut parameters, &mut parameter_types)?;
            }
        }
        self.expect(")", "Expected ')' after parameters")?;

        let mut return_type = None;
        if self.take(":") {
            return_type = Some(
                self.expect(TokenKind::Identifier, "Expected type name after ':'")?
                    .literal,
            );
        }

        self.expect("DO", "Expected DO")?;
        let mut body = Vec::new();
        while !self.check("END") {
            body.push(self.parse_stmt()?);
        }
        self.expect("END", "Expected END")?;

        Ok(Def {
            name,
            parameters,
            parameter_types,
            return_type,
            body,
        })
    }

    // parameter ::= identifier (':' identifier)?
    fn parse_parameter(
        &mut self,
        parameters: &mut Vec<String>,
        parameter_types: &mut Vec<Option<String>>,
    ) -> Result<(), ParseError> {
        let name = self
            .expect(TokenKind::Identifier, "Expected identifier in parameter list")?
            .literal;
        parameters.push(name);

        let mut type_name = None;
        if self.take(":") {
            type_name = Some(
                self.expect(TokenKind::Identifier, "Expected type name after ':'")?
                    .literal,
            );
        }
        parameter_types.push(type_name);
        Ok(())
    }

    // if_stmt ::= 'IF' expr 'DO' stmt* ('ELSE' stmt*)? 'END'
    fn parse_if_stmt(&mut self) -> Result<Stmt, ParseError> {
        self.expect("IF", "Expected IF")?;
        let condition = self.parse_expr()?;
        self.expect("DO", "Expected DO")?;

        let mut then_body = Vec::new();
        while !self.check("END") && !self.check("ELSE") {
            then_body.push(self.parse_stmt()?);
        }

        let mut else_body = Vec::new();
        if self.take("ELSE") {
            while !self.check("END") {
                else_body.push(self.parse_stmt()?);
            }
        }
        self.expect("END", "Expected END")?;

        Ok(Stmt::If {
            condition,
            then_body,
            else_body,
        })
    }

    // for_stmt ::= 'FOR' identifier 'IN' expr 'DO' stmt* 'END'
    fn parse_for_stmt(&mut self) -> Result<Stmt, ParseError> {
        self.expect("FOR", "Expected FOR")?;
        let name = self
            .expect(TokenKind::Identifier, "Expected identifier after 'FOR'")?
            .literal;
        self.expect("IN", "Expected IN")?;
        let iterable = self.parse_expr()?;
        self.expect("DO", "Expected DO")?;

        let mut body = Vec::new();
        while !self.check("END") {
            body.push(self.parse_stmt()?);
        }
        self.expect("END", "Expected END")?;

        Ok(Stmt::For {
            name,
            iterable,
            body,
        })
    }

    // return_stmt ::= 'RETURN' expr? ';'
    fn parse_return_stmt(&mut self) -> Result<Stmt, ParseError> {
        self.expect("RETURN", "Expected RETURN")?;

        let mut value = None;
        if !self.check(";") {
            value = Some(self.parse_expr()?);
        }
        self.expect(";", "Expected ';' at end of return statement")?;

        Ok(Stmt::Return { value })
    }

    // expression_or_assignment_stmt ::= expr ('=' expr)? ';'
    fn parse_expression_or_assignment_stmt(&mut self) -> Result<Stmt, ParseError> {
        let left = self.parse_expr()?;

        if self.take("=") {
            let right = self.parse_expr()?;
            self.expect(";", "Missing semicolon at end of statement")?;
            return Ok(Stmt::Assignment {
                target: left,
                value: right,
            });
        }

        self.expect(";", "Missing semicolon at end of statement")?;
        Ok(Stmt::Expression(left))
    }
}
