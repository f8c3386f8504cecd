use std::rc::Rc;

use crate::ast;
use crate::scope::Scope;
use crate::value::{Definition, EvaluateError, Function, Value};

pub(crate) fn error(msg: impl Into<String>) -> EvaluateError {
    EvaluateError::Error { msg: msg.into() }
}

/// Tree-walking evaluator over the untyped AST, paralleling the generator's
/// lowering: same scope discipline, same operator semantics, same object
/// model, with `Value`s bound where the analyzer binds `Type`s.
pub struct Evaluator {
    scope: Rc<Scope<Value>>,
}

impl Evaluator {
    pub fn new(scope: Rc<Scope<Value>>) -> Self {
        Evaluator { scope }
    }

    /// Runs every statement in order and yields the last statement's value
    /// (`NIL` for an empty source). A RETURN escaping to this level is a
    /// user error, not control flow.
    pub fn evaluate(&mut self, source: &ast::Source) -> Result<Value, EvaluateError> {
        let mut value = Value::Nil;
        for statement in &source.statements {
            value = match self.exec_stmt(statement) {
                Err(EvaluateError::Return(_)) => {
                    return Err(error("RETURN called outside of a function"))
                }
                other => other?,
            };
        }
        Ok(value)
    }

    fn scope(&self) -> &Rc<Scope<Value>> {
        &self.scope
    }
}

/// Invokes a function value. User bodies run in a fresh child of the
/// function's defining scope; a RETURN unwinds here and becomes the call's
/// value, and a body that never returns yields `NIL`.
pub fn call_function(function: &Function, arguments: Vec<Value>) -> Result<Value, EvaluateError> {
    match &*function.definition {
        Definition::Builtin(builtin) => builtin(arguments),
        Definition::User {
            parameters,
            body,
            scope,
        } => {
            if arguments.len() != parameters.len() {
                return Err(error(format!(
                    "Incorrect number of arguments for function {}",
                    function.name
                )));
            }
            let parent = scope.upgrade().ok_or_else(|| {
                error(format!(
                    "Defining scope of function {} is no longer alive",
                    function.name
                ))
            })?;

            let call_scope = Scope::child(&parent);
            for (parameter, argument) in parameters.iter().zip(arguments) {
                call_scope.define(parameter, argument).map_err(error)?;
            }

            let mut evaluator = Evaluator::new(call_scope);
            for statement in body {
                match evaluator.exec_stmt(statement) {
                    Err(EvaluateError::Return(value)) => return Ok(value),
                    Err(other) => return Err(other),
                    Ok(_) => {}
                }
            }
            Ok(Value::Nil)
        }
    }
}

mod eval;
mod exec;
mod ops;
