use std::fmt;
use std::rc::Rc;

use crate::scope::Scope;

/// A static type. The atomic types form a fixed lattice (see
/// `analyzer::require_subtype`); `Object` and `Function` are invariant.
///
/// An `Object` type is identified by its scope: two object types are equal
/// only when they share the same scope node, which is how `this` inside a
/// method refers back to the enclosing object expression's type.
#[derive(Debug, Clone)]
pub enum Type {
    Any,
    Nil,
    Comparable,
    Equatable,
    Iterable,
    Boolean,
    Integer,
    Decimal,
    String,
    Object(Rc<Scope<Type>>),
    Function {
        parameters: Vec<Type>,
        returns: Box<Type>,
    },
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Type::Any, Type::Any)
            | (Type::Nil, Type::Nil)
            | (Type::Comparable, Type::Comparable)
            | (Type::Equatable, Type::Equatable)
            | (Type::Iterable, Type::Iterable)
            | (Type::Boolean, Type::Boolean)
            | (Type::Integer, Type::Integer)
            | (Type::Decimal, Type::Decimal)
            | (Type::String, Type::String) => true,
            (Type::Object(a), Type::Object(b)) => Rc::ptr_eq(a, b),
            (
                Type::Function {
                    parameters: p1,
                    returns: r1,
                },
                Type::Function {
                    parameters: p2,
                    returns: r2,
                },
            ) => p1 == p2 && r1 == r2,
            _ => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Any => write!(f, "Any"),
            Type::Nil => write!(f, "Nil"),
            Type::Comparable => write!(f, "Comparable"),
            Type::Equatable => write!(f, "Equatable"),
            Type::Iterable => write!(f, "Iterable"),
            Type::Boolean => write!(f, "Boolean"),
            Type::Integer => write!(f, "Integer"),
            Type::Decimal => write!(f, "Decimal"),
            Type::String => write!(f, "String"),
            Type::Object(_) => write!(f, "Object"),
            Type::Function {
                parameters,
                returns,
            } => {
                write!(f, "Function([")?;
                for (i, parameter) in parameters.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", parameter)?;
                }
                write!(f, "], {})", returns)
            }
        }
    }
}
