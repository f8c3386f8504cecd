use std::rc::Rc;

use super::*;

impl Analyzer {
    pub(super) fn analyze_expr(&mut self, expr: &ast::Expr) -> Result<ir::Expr, AnalyzeError> {
        match expr {
            ast::Expr::Literal(literal) => Ok(analyze_literal(literal)),
            ast::Expr::Group(inner) => Ok(ir::Expr::Group(Box::new(self.analyze_expr(inner)?))),
            ast::Expr::Binary {
                operator,
                left,
                right,
            } => self.analyze_binary(operator, left, right),
            ast::Expr::Variable(name) => self.analyze_variable(name),
            ast::Expr::Property { receiver, name } => self.analyze_property(receiver, name),
            ast::Expr::Function { name, arguments } => self.analyze_function(name, arguments),
            ast::Expr::Method {
                receiver,
                name,
                arguments,
            } => self.analyze_method(receiver, name, arguments),
            ast::Expr::Object {
                name,
                fields,
                methods,
            } => self.analyze_object(name, fields, methods),
        }
    }

    fn analyze_binary(
        &mut self,
        operator: &str,
        left: &ast::Expr,
        right: &ast::Expr,
    ) -> Result<ir::Expr, AnalyzeError> {
        let left = self.analyze_expr(left)?;

        // AND/OR check the left operand before the right is analyzed at
        // all, mirroring evaluation's short circuit.
        if operator == "AND" || operator == "OR" {
            require_subtype(&left.ty(), &Type::Boolean)?;
            let right = self.analyze_expr(right)?;
            require_subtype(&right.ty(), &Type::Boolean)?;
            return Ok(ir::Expr::Binary {
                operator: operator.to_string(),
                left: Box::new(left),
                right: Box::new(right),
                ty: Type::Boolean,
            });
        }

        let right = self.analyze_expr(right)?;
        let ty = match operator {
            "+" => {
                if left.ty() == Type::String || right.ty() == Type::String {
                    Type::String
                } else if (left.ty() == Type::Integer && right.ty() == Type::Integer)
                    || (left.ty() == Type::Decimal && right.ty() == Type::Decimal)
                {
                    left.ty()
                } else {
                    return Err(error(format!(
                        "Invalid operand types for +: {}, {}",
                        left.ty(),
                        right.ty()
                    )));
                }
            }
            "-" | "*" | "/" => {
                if left.ty() == Type::Integer && right.ty() == Type::Integer {
                    Type::Integer
                } else if left.ty() == Type::Decimal && right.ty() == Type::Decimal {
                    Type::Decimal
                } else {
                    return Err(error(format!(
                        "Invalid operand types for {}: {}, {}",
                        operator,
                        left.ty(),
                        right.ty()
                    )));
                }
            }
            "<" | "<=" | ">" | ">=" => {
                require_subtype(&left.ty(), &Type::Comparable)?;
                require_subtype(&right.ty(), &left.ty())?;
                Type::Boolean
            }
            "==" | "!=" => {
                require_subtype(&left.ty(), &Type::Equatable)?;
                require_subtype(&right.ty(), &Type::Equatable)?;
                Type::Boolean
            }
            _ => {
                return Err(error(format!("Unknown binary operator: {}", operator)));
            }
        };

        Ok(ir::Expr::Binary {
            operator: operator.to_string(),
            left: Box::new(left),
            right: Box::new(right),
            ty,
        })
    }

    fn analyze_variable(&mut self, name: &str) -> Result<ir::Expr, AnalyzeError> {
        let ty = self
            .scope()
            .get(name, false)
            .ok_or_else(|| error(format!("Variable {} is not defined", name)))?;
        Ok(ir::Expr::Variable(ir::Variable {
            name: name.to_string(),
            ty,
        }))
    }

    fn analyze_property(
        &mut self,
        receiver: &ast::Expr,
        name: &str,
    ) -> Result<ir::Expr, AnalyzeError> {
        let receiver = self.analyze_expr(receiver)?;
        if receiver.ty() == Type::Nil {
            return Err(error("Cannot access a property on NIL receiver"));
        }
        let Type::Object(object_scope) = receiver.ty() else {
            return Err(error(format!(
                "Receiver must be an object to access property {}",
                name
            )));
        };
        let ty = object_scope
            .get(name, false)
            .ok_or_else(|| error(format!("Property {} is not defined in object", name)))?;
        Ok(ir::Expr::Property(ir::Property {
            receiver: Box::new(receiver),
            name: name.to_string(),
            ty,
        }))
    }

    fn analyze_function(
        &mut self,
        name: &str,
        arguments: &[ast::Expr],
    ) -> Result<ir::Expr, AnalyzeError> {
        let Some(Type::Function {
            parameters,
            returns,
        }) = self.scope().get(name, false)
        else {
            return Err(error(format!(
                "Function {} is not defined or not a function",
                name
            )));
        };

        if arguments.len() != parameters.len() {
            return Err(error(format!(
                "Function {} expects {} arguments but got {}",
                name,
                parameters.len(),
                arguments.len()
            )));
        }

        let mut argument_ir = Vec::new();
        for (argument, parameter) in arguments.iter().zip(&parameters) {
            let argument = self.analyze_expr(argument)?;
            require_subtype(&argument.ty(), parameter)?;
            argument_ir.push(argument);
        }

        Ok(ir::Expr::Function {
            name: name.to_string(),
            arguments: argument_ir,
            ty: *returns,
        })
    }

    fn analyze_method(
        &mut self,
        receiver: &ast::Expr,
        name: &str,
        arguments: &[ast::Expr],
    ) -> Result<ir::Expr, AnalyzeError> {
        let receiver = self.analyze_expr(receiver)?;
        if receiver.ty() == Type::Nil {
            return Err(error("Cannot call a method on NIL receiver"));
        }
        let Type::Object(object_scope) = receiver.ty() else {
            return Err(error(format!(
                "Receiver must be an object to call method {}",
                name
            )));
        };
        let Some(Type::Function {
            parameters,
            returns,
        }) = object_scope.get(name, false)
        else {
            return Err(error(format!(
                "Method {} is not defined or not a function in object",
                name
            )));
        };

        // Method types carry no receiver parameter: arguments and
        // parameters are the same length.
        if arguments.len() != parameters.len() {
            return Err(error(format!(
                "Method {} expects {} arguments but got {}",
                name,
                parameters.len(),
                arguments.len()
            )));
        }

        let mut argument_ir = Vec::new();
        for (argument, parameter) in arguments.iter().zip(&parameters) {
            let argument = self.analyze_expr(argument)?;
            require_subtype(&argument.ty(), parameter)?;
            argument_ir.push(argument);
        }

        Ok(ir::Expr::Method {
            receiver: Box::new(receiver),
            name: name.to_string(),
            arguments: argument_ir,
            ty: *returns,
        })
    }

    fn analyze_object(
        &mut self,
        name: &Option<String>,
        fields: &[ast::Let],
        methods: &[ast::Def],
    ) -> Result<ir::Expr, AnalyzeError> {
        if let Some(name) = name {
            if environment::has_type(name) {
                return Err(error(format!(
                    "Object name cannot be a defined type: {}",
                    name
                )));
            }
        }

        let object_scope = Scope::root();
        let object_type = Type::Object(Rc::clone(&object_scope));

        let mut field_ir = Vec::new();
        for field in fields {
            if object_scope.get(&field.name, true).is_some() {
                return Err(error(format!(
                    "Field {} is already defined in object",
                    field.name
                )));
            }

            // Field initializers see the enclosing scope, not the object's.
            let declared = field
                .type_name
                .as_deref()
                .and_then(environment::lookup_type);
            let value = match &field.value {
                Some(expression) => Some(self.analyze_expr(expression)?),
                None => None,
            };
            let field_type = declared
                .or_else(|| value.as_ref().map(ir::Expr::ty))
                .unwrap_or(Type::Any);
            if let Some(value) = &value {
                require_subtype(&value.ty(), &field_type)?;
            }

            object_scope
                .define(&field.name, field_type.clone())
                .map_err(error)?;
            field_ir.push(ir::Let {
                name: field.name.clone(),
                ty: field_type,
                value,
            });
        }

        let mut method_ir = Vec::new();
        for method in methods {
            if object_scope.get(&method.name, true).is_some() {
                return Err(error(format!(
                    "Method {} is already defined in object",
                    method.name
                )));
            }

            let parameter_types = Self::resolve_parameter_types(&method.parameter_types)?;
            let return_type = Self::resolve_return_type(&method.return_type);
            object_scope
                .define(
                    &method.name,
                    Type::Function {
                        parameters: parameter_types.clone(),
                        returns: Box::new(return_type.clone()),
                    },
                )
                .map_err(error)?;

            let method_scope = Scope::child(&object_scope);
            method_scope
                .define("this", object_type.clone())
                .map_err(error)?;
            for (parameter, ty) in method.parameters.iter().zip(&parameter_types) {
                method_scope.define(parameter, ty.clone()).map_err(error)?;
            }
            method_scope
                .define(RETURNS, return_type.clone())
                .map_err(error)?;

            let mut analyzer = Analyzer::new(method_scope);
            let mut body = Vec::new();
            for statement in &method.body {
                body.push(analyzer.analyze_stmt(statement)?);
            }

            let parameters = method
                .parameters
                .iter()
                .zip(parameter_types)
                .map(|(name, ty)| ir::Parameter {
                    name: name.clone(),
                    ty,
                })
                .collect();
            method_ir.push(ir::Def {
                name: method.name.clone(),
                parameters,
                returns: return_type,
                body,
            });
        }

        Ok(ir::Expr::Object {
            name: name.clone(),
            fields: field_ir,
            methods: method_ir,
            ty: object_type,
        })
    }
}

fn analyze_literal(literal: &ast::Literal) -> ir::Expr {
    let ty = match literal {
        ast::Literal::Nil => Type::Nil,
        ast::Literal::Bool(_) => Type::Boolean,
        ast::Literal::Integer(_) => Type::Integer,
        ast::Literal::Decimal(_) => Type::Decimal,
        ast::Literal::String(_) => Type::String,
        // There is no Character entry in the type table; a character
        // literal reaching analysis is a parser bug, not a user error.
        ast::Literal::Character(_) => {
            panic!("character literal in AST: no corresponding type exists")
        }
    };
    ir::Expr::Literal {
        value: literal.clone(),
        ty,
    }
}
