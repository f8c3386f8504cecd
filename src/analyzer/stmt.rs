use super::*;

impl Analyzer {
    pub(super) fn analyze_stmt(&mut self, stmt: &ast::Stmt) -> Result<ir::Stmt, AnalyzeError> {
        match stmt {
            ast::Stmt::Let(let_stmt) => self.analyze_let(let_stmt).map(ir::Stmt::Let),
            ast::Stmt::Def(def) => self.analyze_def(def).map(ir::Stmt::Def),
            ast::Stmt::If {
                condition,
                then_body,
                else_body,
            } => self.analyze_if(condition, then_body, else_body),
            ast::Stmt::For {
                name,
                iterable,
                body,
            } => self.analyze_for(name, iterable, body),
            ast::Stmt::Return { value } => self.analyze_return(value),
            ast::Stmt::Expression(expression) => Ok(ir::Stmt::Expression(
                self.analyze_expr(expression)?,
            )),
            ast::Stmt::Assignment { target, value } => self.analyze_assignment(target, value),
        }
    }

    fn analyze_let(&mut self, ast: &ast::Let) -> Result<ir::Let, AnalyzeError> {
        if self.scope().get(&ast.name, true).is_some() {
            return Err(error(format!("Variable {} is already declared", ast.name)));
        }

        let declared = match &ast.type_name {
            Some(name) => Some(
                environment::lookup_type(name)
                    .ok_or_else(|| error(format!("Type {} is not defined", name)))?,
            ),
            None => None,
        };

        let value = match &ast.value {
            Some(expression) => Some(self.analyze_expr(expression)?),
            None => None,
        };

        // Declared type wins, else the initializer's type, else Any.
        let variable_type = declared
            .or_else(|| value.as_ref().map(ir::Expr::ty))
            .unwrap_or(Type::Any);
        if let Some(value) = &value {
            require_subtype(&value.ty(), &variable_type)?;
        }

        self.scope()
            .define(&ast.name, variable_type.clone())
            .map_err(error)?;
        Ok(ir::Let {
            name: ast.name.clone(),
            ty: variable_type,
            value,
        })
    }

    fn analyze_def(&mut self, ast: &ast::Def) -> Result<ir::Def, AnalyzeError> {
        if self.scope().get(&ast.name, true).is_some() {
            return Err(error(format!(
                "Function {} is already defined in the current scope",
                ast.name
            )));
        }
        for (i, name) in ast.parameters.iter().enumerate() {
            if ast.parameters[..i].contains(name) {
                return Err(error(format!("Duplicate parameter: {}", name)));
            }
        }

        let parameter_types = Self::resolve_parameter_types(&ast.parameter_types)?;
        let return_type = Self::resolve_return_type(&ast.return_type);

        self.scope()
            .define(
                &ast.name,
                Type::Function {
                    parameters: parameter_types.clone(),
                    returns: Box::new(return_type.clone()),
                },
            )
            .map_err(error)?;

        let function_scope = Scope::child(self.scope());
        for (name, ty) in ast.parameters.iter().zip(&parameter_types) {
            function_scope.define(name, ty.clone()).map_err(error)?;
        }
        function_scope
            .define(RETURNS, return_type.clone())
            .map_err(error)?;

        let mut analyzer = Analyzer::new(function_scope);
        let mut body = Vec::new();
        for statement in &ast.body {
            body.push(analyzer.analyze_stmt(statement)?);
        }

        let parameters = ast
            .parameters
            .iter()
            .zip(parameter_types)
            .map(|(name, ty)| ir::Parameter {
                name: name.clone(),
                ty,
            })
            .collect();
        Ok(ir::Def {
            name: ast.name.clone(),
            parameters,
            returns: return_type,
            body,
        })
    }

    fn analyze_if(
        &mut self,
        condition: &ast::Expr,
        then_body: &[ast::Stmt],
        else_body: &[ast::Stmt],
    ) -> Result<ir::Stmt, AnalyzeError> {
        let condition = self.analyze_expr(condition)?;
        require_subtype(&condition.ty(), &Type::Boolean)?;

        // Only one branch runs, but both compile: each is analyzed in its
        // own fresh child scope.
        let mut then_analyzer = Analyzer::new(Scope::child(self.scope()));
        let mut then_ir = Vec::new();
        for statement in then_body {
            then_ir.push(then_analyzer.analyze_stmt(statement)?);
        }

        let mut else_analyzer = Analyzer::new(Scope::child(self.scope()));
        let mut else_ir = Vec::new();
        for statement in else_body {
            else_ir.push(else_analyzer.analyze_stmt(statement)?);
        }

        Ok(ir::Stmt::If {
            condition,
            then_body: then_ir,
            else_body: else_ir,
        })
    }

    fn analyze_for(
        &mut self,
        name: &str,
        iterable: &ast::Expr,
        body: &[ast::Stmt],
    ) -> Result<ir::Stmt, AnalyzeError> {
        let iterable = self.analyze_expr(iterable)?;
        require_subtype(&iterable.ty(), &Type::Iterable)?;

        // Iterables yield integers; the loop variable is fixed to Integer.
        let element_type = Type::Integer;
        let loop_scope = Scope::child(self.scope());
        loop_scope.define(name, element_type.clone()).map_err(error)?;

        let mut analyzer = Analyzer::new(loop_scope);
        let mut body_ir = Vec::new();
        for statement in body {
            body_ir.push(analyzer.analyze_stmt(statement)?);
        }

        Ok(ir::Stmt::For {
            name: name.to_string(),
            element_type,
            iterable,
            body: body_ir,
        })
    }

    fn analyze_return(&mut self, value: &Option<ast::Expr>) -> Result<ir::Stmt, AnalyzeError> {
        let expected = self
            .scope()
            .get(RETURNS, false)
            .ok_or_else(|| error("RETURN statement used outside of a function"))?;

        let value = match value {
            Some(expression) => {
                let value = self.analyze_expr(expression)?;
                require_subtype(&value.ty(), &expected)?;
                Some(value)
            }
            None => {
                require_subtype(&Type::Nil, &expected)?;
                None
            }
        };

        Ok(ir::Stmt::Return { value })
    }

    fn analyze_assignment(
        &mut self,
        target: &ast::Expr,
        value: &ast::Expr,
    ) -> Result<ir::Stmt, AnalyzeError> {
        let value = self.analyze_expr(value)?;

        match target {
            ast::Expr::Variable(name) => {
                let variable_type = self
                    .scope()
                    .get(name, false)
                    .ok_or_else(|| error(format!("Variable {} is not defined", name)))?;
                require_subtype(&value.ty(), &variable_type)?;
                Ok(ir::Stmt::AssignVariable {
                    target: ir::Variable {
                        name: name.clone(),
                        ty: variable_type,
                    },
                    value,
                })
            }
            ast::Expr::Property { receiver, name } => {
                let receiver = self.analyze_expr(receiver)?;
                if receiver.ty() == Type::Nil {
                    return Err(error("Cannot assign a property on NIL receiver"));
                }
                let Type::Object(object_scope) = receiver.ty() else {
                    return Err(error(format!(
                        "Receiver of property {} must be an object",
                        name
                    )));
                };
                let property_type = object_scope
                    .get(name, false)
                    .ok_or_else(|| error(format!("Property {} is not defined in object", name)))?;
                require_subtype(&value.ty(), &property_type)?;
                Ok(ir::Stmt::AssignProperty {
                    target: ir::Property {
                        receiver: Box::new(receiver),
                        name: name.clone(),
                        ty: property_type,
                    },
                    value,
                })
            }
            _ => Err(error("Assignment target must be a variable or property")),
        }
    }
}
