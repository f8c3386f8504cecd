use super::*;
use crate::value::ObjectValue;

impl Evaluator {
    pub(super) fn eval_expr(&mut self, expr: &ast::Expr) -> Result<Value, EvaluateError> {
        match expr {
            ast::Expr::Literal(literal) => Ok(eval_literal(literal)),
            ast::Expr::Group(inner) => self.eval_expr(inner),
            ast::Expr::Binary {
                operator,
                left,
                right,
            } => self.eval_binary(operator, left, right),
            ast::Expr::Variable(name) => self
                .scope()
                .get(name, false)
                .ok_or_else(|| error(format!("Undefined variable: {}", name))),
            ast::Expr::Property { receiver, name } => self.eval_property(receiver, name),
            ast::Expr::Function { name, arguments } => self.eval_function(name, arguments),
            ast::Expr::Method {
                receiver,
                name,
                arguments,
            } => self.eval_method(receiver, name, arguments),
            ast::Expr::Object {
                name,
                fields,
                methods,
            } => self.eval_object(name, fields, methods),
        }
    }

    fn eval_property(&mut self, receiver: &ast::Expr, name: &str) -> Result<Value, EvaluateError> {
        let Value::Object(object) = self.eval_expr(receiver)? else {
            return Err(error("Receiver must be an object"));
        };
        object
            .scope
            .get(name, false)
            .ok_or_else(|| error(format!("Property not defined: {}", name)))
    }

    fn eval_function(
        &mut self,
        name: &str,
        arguments: &[ast::Expr],
    ) -> Result<Value, EvaluateError> {
        let Some(Value::Function(function)) = self.scope().get(name, false) else {
            return Err(error(format!("Function not defined: {}", name)));
        };

        let mut evaluated = Vec::new();
        for argument in arguments {
            evaluated.push(self.eval_expr(argument)?);
        }
        call_function(&function, evaluated)
    }

    fn eval_method(
        &mut self,
        receiver: &ast::Expr,
        name: &str,
        arguments: &[ast::Expr],
    ) -> Result<Value, EvaluateError> {
        let Value::Object(object) = self.eval_expr(receiver)? else {
            return Err(error("Receiver must be an object"));
        };
        let Some(Value::Function(function)) = object.scope.get(name, false) else {
            return Err(error(format!("Method not found: {}", name)));
        };

        // The receiver travels as an implicit leading `this` argument.
        let mut evaluated = vec![Value::Object(object.clone())];
        for argument in arguments {
            evaluated.push(self.eval_expr(argument)?);
        }
        call_function(&function, evaluated)
    }

    fn eval_object(
        &mut self,
        name: &Option<String>,
        fields: &[ast::Let],
        methods: &[ast::Def],
    ) -> Result<Value, EvaluateError> {
        let object = ObjectValue {
            name: name.clone(),
            scope: Scope::child(self.scope()),
        };

        for field in fields {
            if object.scope.get(&field.name, true).is_some() {
                return Err(error(format!(
                    "Field is already defined in object: {}",
                    field.name
                )));
            }
            let value = match &field.value {
                Some(expression) => self.eval_expr(expression)?,
                None => Value::Nil,
            };
            object.scope.define(&field.name, value).map_err(error)?;
        }

        for method in methods {
            if object.scope.get(&method.name, true).is_some() {
                return Err(error(format!(
                    "Method is already defined in object: {}",
                    method.name
                )));
            }
            // Methods are functions over `this` plus the declared
            // parameters, closing over the object's scope.
            let mut parameters = vec!["this".to_string()];
            parameters.extend(method.parameters.iter().cloned());
            let function =
                Function::user(&method.name, parameters, method.body.clone(), &object.scope);
            object
                .scope
                .define(&method.name, Value::Function(function))
                .map_err(error)?;
        }

        Ok(Value::Object(object))
    }
}

fn eval_literal(literal: &ast::Literal) -> Value {
    match literal {
        ast::Literal::Nil => Value::Nil,
        ast::Literal::Bool(b) => Value::Bool(*b),
        ast::Literal::Integer(i) => Value::Integer(i.clone()),
        ast::Literal::Decimal(d) => Value::Decimal(d.clone()),
        ast::Literal::Character(c) => Value::Character(*c),
        ast::Literal::String(s) => Value::String(s.clone()),
    }
}
