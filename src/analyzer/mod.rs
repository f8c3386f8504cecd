use std::rc::Rc;

use thiserror::Error;

use crate::ast;
use crate::environment;
use crate::ir;
use crate::scope::Scope;
use crate::types::Type;

/// Reserved binding threading the expected return type down to RETURN
/// checks. Unspoofable: `$` is not a valid identifier start.
pub const RETURNS: &str = "$RETURNS";

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("Analyze error: {msg}")]
    Error { msg: String },
}

pub(crate) fn error(msg: impl Into<String>) -> AnalyzeError {
    AnalyzeError::Error { msg: msg.into() }
}

/// Lowers the AST to typed IR under a lexical scope chain. Nested regions
/// (function bodies, IF/FOR bodies, object methods) are analyzed by a child
/// analyzer over a child scope.
pub struct Analyzer {
    scope: Rc<Scope<Type>>,
}

impl Analyzer {
    pub fn new(scope: Rc<Scope<Type>>) -> Self {
        Analyzer { scope }
    }

    pub fn analyze(&mut self, source: &ast::Source) -> Result<ir::Source, AnalyzeError> {
        let mut statements = Vec::new();
        for statement in &source.statements {
            statements.push(self.analyze_stmt(statement)?);
        }
        Ok(ir::Source { statements })
    }

    fn scope(&self) -> &Rc<Scope<Type>> {
        &self.scope
    }

    /// Resolves positional parameter annotations; a missing annotation is
    /// `Any`, an unknown name is an error.
    fn resolve_parameter_types(
        parameter_types: &[Option<String>],
    ) -> Result<Vec<Type>, AnalyzeError> {
        parameter_types
            .iter()
            .map(|type_name| match type_name {
                Some(name) => environment::lookup_type(name)
                    .ok_or_else(|| error(format!("Unknown parameter type: {}", name))),
                None => Ok(Type::Any),
            })
            .collect()
    }

    /// Resolves a return-type annotation. Unlike parameter types, an unknown
    /// return-type name falls back to `Any` rather than failing.
    fn resolve_return_type(return_type: &Option<String>) -> Type {
        return_type
            .as_deref()
            .and_then(environment::lookup_type)
            .unwrap_or(Type::Any)
    }
}

/// The subtype relation: `ty <: other` holds when the types are equal, when
/// `other` is `Any`, or for the enumerated `Equatable`/`Comparable` cases.
/// There are no other transitive rules; `Object` and `Function` are
/// invariant.
pub fn require_subtype(ty: &Type, other: &Type) -> Result<(), AnalyzeError> {
    if ty == other || *other == Type::Any {
        return Ok(());
    }
    if *other == Type::Equatable
        && matches!(
            ty,
            Type::Nil
                | Type::Comparable
                | Type::Iterable
                | Type::Boolean
                | Type::Integer
                | Type::Decimal
                | Type::String
        )
    {
        return Ok(());
    }
    if *other == Type::Comparable
        && matches!(
            ty,
            Type::Boolean | Type::Integer | Type::Decimal | Type::String
        )
    {
        return Ok(());
    }
    Err(error(format!(
        "Expected {} to be a subtype of {}",
        ty, other
    )))
}

mod expr;
mod stmt;
