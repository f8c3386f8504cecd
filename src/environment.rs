use std::collections::HashMap;
use std::rc::Rc;

use num_bigint::BigInt;
use num_traits::One;

use crate::scope::Scope;
use crate::types::Type;
use crate::value::{EvaluateError, Function, Value};

thread_local! {
    /// The type-name table: the only names a type annotation may use.
    /// Initialized once per thread, then read-only.
    static TYPES: HashMap<&'static str, Type> = HashMap::from([
        ("Any", Type::Any),
        ("Nil", Type::Nil),
        ("Comparable", Type::Comparable),
        ("Equatable", Type::Equatable),
        ("Iterable", Type::Iterable),
        ("Boolean", Type::Boolean),
        ("Integer", Type::Integer),
        ("Decimal", Type::Decimal),
        ("String", Type::String),
    ]);
}

pub fn lookup_type(name: &str) -> Option<Type> {
    TYPES.with(|types| types.get(name).cloned())
}

pub fn has_type(name: &str) -> bool {
    TYPES.with(|types| types.contains_key(name))
}

/// A fresh root scope for analysis, pre-binding the built-in signatures.
pub fn root_analysis_scope() -> Rc<Scope<Type>> {
    let scope = Scope::root();
    let _ = scope.define(
        "log",
        Type::Function {
            parameters: vec![Type::Any],
            returns: Box::new(Type::Any),
        },
    );
    let _ = scope.define(
        "range",
        Type::Function {
            parameters: vec![Type::Integer, Type::Integer],
            returns: Box::new(Type::Iterable),
        },
    );
    scope
}

/// A fresh root scope for evaluation, pre-binding the built-in functions.
pub fn root_evaluation_scope() -> Rc<Scope<Value>> {
    let scope = Scope::root();
    let _ = scope.define("log", Value::Function(Function::builtin("log", builtin_log)));
    let _ = scope.define(
        "range",
        Value::Function(Function::builtin("range", builtin_range)),
    );
    scope
}

fn evaluate_error(msg: impl Into<String>) -> EvaluateError {
    EvaluateError::Error { msg: msg.into() }
}

/// `log(value)`: prints the value and passes it through.
fn builtin_log(arguments: Vec<Value>) -> Result<Value, EvaluateError> {
    let [value] = <[Value; 1]>::try_from(arguments)
        .map_err(|_| evaluate_error("log expects 1 argument"))?;
    println!("{}", value);
    Ok(value)
}

/// `range(start, end)`: the integers of `[start, end)`, in order.
fn builtin_range(arguments: Vec<Value>) -> Result<Value, EvaluateError> {
    let [start, end] = <[Value; 2]>::try_from(arguments)
        .map_err(|_| evaluate_error("range expects 2 arguments"))?;
    let (Value::Integer(start), Value::Integer(end)) = (start, end) else {
        return Err(evaluate_error("range expects integer bounds"));
    };

    let mut elements = Vec::new();
    let mut current = start;
    while current < end {
        elements.push(Value::Integer(current.clone()));
        current += BigInt::one();
    }
    Ok(Value::List(elements))
}
