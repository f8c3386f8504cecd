use std::fmt;
use std::rc::{Rc, Weak};

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use thiserror::Error;

use crate::ast::Stmt;
use crate::scope::Scope;

#[derive(Debug, Error)]
pub enum EvaluateError {
    #[error("Evaluate error: {msg}")]
    Error { msg: String },
    /// Internal control flow for RETURN: raised by `Stmt::Return`, caught by
    /// function invocation. Escaping to the top level is a user error and is
    /// converted there.
    #[error("Evaluate error: RETURN called outside of a function.")]
    Return(Value),
}

/// A runtime value. Displays render the way the generated Java would print
/// them (`NIL` as `null`, booleans lowercase), so evaluating a program and
/// running its generated form agree on output.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Integer(BigInt),
    Decimal(BigDecimal),
    Character(char),
    String(String),
    List(Vec<Value>),
    Function(Function),
    Object(ObjectValue),
}

#[derive(Clone)]
pub struct Function {
    pub name: String,
    pub definition: Rc<Definition>,
}

pub enum Definition {
    /// A `DEF` in user source. The defining scope is held weakly: the scope
    /// tree stays alive through the evaluator and any live object values,
    /// not through the functions bound inside it.
    User {
        parameters: Vec<String>,
        body: Vec<Stmt>,
        scope: Weak<Scope<Value>>,
    },
    Builtin(fn(Vec<Value>) -> Result<Value, EvaluateError>),
}

#[derive(Clone)]
pub struct ObjectValue {
    pub name: Option<String>,
    pub scope: Rc<Scope<Value>>,
}

impl Function {
    pub fn user(
        name: impl Into<String>,
        parameters: Vec<String>,
        body: Vec<Stmt>,
        scope: &Rc<Scope<Value>>,
    ) -> Self {
        Function {
            name: name.into(),
            definition: Rc::new(Definition::User {
                parameters,
                body,
                scope: Rc::downgrade(scope),
            }),
        }
    }

    pub fn builtin(
        name: impl Into<String>,
        function: fn(Vec<Value>) -> Result<Value, EvaluateError>,
    ) -> Self {
        Function {
            name: name.into(),
            definition: Rc::new(Definition::Builtin(function)),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::Character(a), Value::Character(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(&a.definition, &b.definition),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(&a.scope, &b.scope),
            _ => false,
        }
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function").field("name", &self.name).finish()
    }
}

impl fmt::Debug for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectValue").field("name", &self.name).finish()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Character(c) => write!(f, "{}", c),
            Value::String(s) => write!(f, "{}", s),
            Value::List(elements) => {
                write!(f, "[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, "]")
            }
            Value::Function(function) => write!(f, "<function {}>", function.name),
            Value::Object(object) => match &object.name {
                Some(name) => write!(f, "<object {}>", name),
                None => write!(f, "<object>"),
            },
        }
    }
}
