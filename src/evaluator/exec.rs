use super::*;

impl Evaluator {
    /// Executes one statement and yields its value for the REPL: a LET or
    /// DEF yields the defined value, blocks yield their last statement's
    /// value, a plain expression yields itself.
    pub(super) fn exec_stmt(&mut self, stmt: &ast::Stmt) -> Result<Value, EvaluateError> {
        match stmt {
            ast::Stmt::Let(let_stmt) => self.exec_let(let_stmt),
            ast::Stmt::Def(def) => self.exec_def(def),
            ast::Stmt::If {
                condition,
                then_body,
                else_body,
            } => self.exec_if(condition, then_body, else_body),
            ast::Stmt::For {
                name,
                iterable,
                body,
            } => self.exec_for(name, iterable, body),
            ast::Stmt::Return { value } => {
                let value = match value {
                    Some(expression) => self.eval_expr(expression)?,
                    None => Value::Nil,
                };
                Err(EvaluateError::Return(value))
            }
            ast::Stmt::Expression(expression) => self.eval_expr(expression),
            ast::Stmt::Assignment { target, value } => self.exec_assignment(target, value),
        }
    }

    fn exec_let(&mut self, ast: &ast::Let) -> Result<Value, EvaluateError> {
        if self.scope().get(&ast.name, true).is_some() {
            return Err(error(format!("Variable already defined: {}", ast.name)));
        }
        let value = match &ast.value {
            Some(expression) => self.eval_expr(expression)?,
            None => Value::Nil,
        };
        self.scope().define(&ast.name, value.clone()).map_err(error)?;
        Ok(value)
    }

    fn exec_def(&mut self, ast: &ast::Def) -> Result<Value, EvaluateError> {
        if self.scope().get(&ast.name, true).is_some() {
            return Err(error(format!(
                "Function is already defined in the current scope: {}",
                ast.name
            )));
        }
        for (i, name) in ast.parameters.iter().enumerate() {
            if ast.parameters[..i].contains(name) {
                return Err(error("Function parameters must be unique"));
            }
        }

        let function = Function::user(
            &ast.name,
            ast.parameters.clone(),
            ast.body.clone(),
            self.scope(),
        );
        let value = Value::Function(function);
        self.scope().define(&ast.name, value.clone()).map_err(error)?;
        Ok(value)
    }

    fn exec_if(
        &mut self,
        condition: &ast::Expr,
        then_body: &[ast::Stmt],
        else_body: &[ast::Stmt],
    ) -> Result<Value, EvaluateError> {
        let Value::Bool(condition) = self.eval_expr(condition)? else {
            return Err(error("Condition of IF statement must be a boolean"));
        };

        // The branch runs in a child scope; restore the original scope even
        // when a body statement fails.
        let original = Rc::clone(self.scope());
        self.scope = Scope::child(&original);

        let body = if condition { then_body } else { else_body };
        let mut result = Ok(Value::Nil);
        for statement in body {
            result = self.exec_stmt(statement);
            if result.is_err() {
                break;
            }
        }

        self.scope = original;
        result
    }

    fn exec_for(
        &mut self,
        name: &str,
        iterable: &ast::Expr,
        body: &[ast::Stmt],
    ) -> Result<Value, EvaluateError> {
        let Value::List(elements) = self.eval_expr(iterable)? else {
            return Err(error("FOR loop expression must be an iterable"));
        };

        for element in elements {
            if !matches!(element, Value::Integer(_)) {
                return Err(error("Iterable elements must be integers"));
            }
            let iteration_scope = Scope::child(self.scope());
            iteration_scope.define(name, element).map_err(error)?;
            let mut evaluator = Evaluator::new(iteration_scope);
            for statement in body {
                evaluator.exec_stmt(statement)?;
            }
        }
        Ok(Value::Nil)
    }

    fn exec_assignment(
        &mut self,
        target: &ast::Expr,
        value: &ast::Expr,
    ) -> Result<Value, EvaluateError> {
        match target {
            ast::Expr::Variable(name) => {
                if self.scope().get(name, false).is_none() {
                    return Err(error(format!("Variable is not defined: {}", name)));
                }
                let value = self.eval_expr(value)?;
                self.scope().set(name, value.clone());
                Ok(value)
            }
            ast::Expr::Property { receiver, name } => {
                let Value::Object(object) = self.eval_expr(receiver)? else {
                    return Err(error("Receiver must be an object"));
                };
                let value = self.eval_expr(value)?;
                if object.scope.get(name, true).is_none() {
                    return Err(error(format!("Property is not defined: {}", name)));
                }
                object.scope.set(name, value.clone());
                Ok(value)
            }
            _ => Err(error("Invalid assignment target")),
        }
    }
}
