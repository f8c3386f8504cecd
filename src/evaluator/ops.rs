use std::cmp::Ordering;

use bigdecimal::RoundingMode;
use num_traits::Zero;

use super::*;

impl Evaluator {
    pub(super) fn eval_binary(
        &mut self,
        operator: &str,
        left: &ast::Expr,
        right: &ast::Expr,
    ) -> Result<Value, EvaluateError> {
        // AND/OR evaluate the right operand only when the left cannot
        // already decide the result.
        match operator {
            "AND" => {
                let Value::Bool(left) = self.eval_expr(left)? else {
                    return Err(error("AND requires boolean operands"));
                };
                if !left {
                    return Ok(Value::Bool(false));
                }
                let Value::Bool(right) = self.eval_expr(right)? else {
                    return Err(error("AND requires boolean operands"));
                };
                Ok(Value::Bool(right))
            }
            "OR" => {
                let Value::Bool(left) = self.eval_expr(left)? else {
                    return Err(error("OR requires boolean operands"));
                };
                if left {
                    return Ok(Value::Bool(true));
                }
                let Value::Bool(right) = self.eval_expr(right)? else {
                    return Err(error("OR requires boolean operands"));
                };
                Ok(Value::Bool(right))
            }
            _ => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                apply_binary(operator, left, right)
            }
        }
    }
}

fn apply_binary(operator: &str, left: Value, right: Value) -> Result<Value, EvaluateError> {
    match operator {
        "+" => match (left, right) {
            // A string on either side concatenates; the other side renders
            // the way the generated Java would print it.
            (l, r) if matches!(l, Value::String(_)) || matches!(r, Value::String(_)) => {
                Ok(Value::String(format!("{}{}", l, r)))
            }
            (Value::Integer(l), Value::Integer(r)) => Ok(Value::Integer(l + r)),
            (Value::Decimal(l), Value::Decimal(r)) => Ok(Value::Decimal(l + r)),
            _ => Err(error(
                "Addition requires two integers, two decimals, or a string operand",
            )),
        },
        "-" => match (left, right) {
            (Value::Integer(l), Value::Integer(r)) => Ok(Value::Integer(l - r)),
            (Value::Decimal(l), Value::Decimal(r)) => Ok(Value::Decimal(l - r)),
            _ => Err(error("Subtraction requires two integers or two decimals")),
        },
        "*" => match (left, right) {
            (Value::Integer(l), Value::Integer(r)) => Ok(Value::Integer(l * r)),
            (Value::Decimal(l), Value::Decimal(r)) => Ok(Value::Decimal(l * r)),
            _ => Err(error(
                "Multiplication requires two integers or two decimals",
            )),
        },
        "/" => match (left, right) {
            (Value::Integer(l), Value::Integer(r)) => {
                if r.is_zero() {
                    return Err(error("Division by zero"));
                }
                // BigInt division truncates toward zero; exact per the
                // integer lowering.
                Ok(Value::Integer(l / r))
            }
            (Value::Decimal(l), Value::Decimal(r)) => {
                if r.is_zero() {
                    return Err(error("Division by zero"));
                }
                let scale = l.fractional_digit_count();
                Ok(Value::Decimal(
                    (l / r).with_scale_round(scale, RoundingMode::HalfEven),
                ))
            }
            _ => Err(error("Division requires two integers or two decimals")),
        },
        "==" => Ok(Value::Bool(left == right)),
        "!=" => Ok(Value::Bool(left != right)),
        "<" | "<=" | ">" | ">=" => {
            let ordering = compare(&left, &right)?;
            let result = match operator {
                "<" => ordering == Ordering::Less,
                "<=" => ordering != Ordering::Greater,
                ">" => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            };
            Ok(Value::Bool(result))
        }
        _ => Err(error(format!("Invalid operator: {}", operator))),
    }
}

fn compare(left: &Value, right: &Value) -> Result<Ordering, EvaluateError> {
    match (left, right) {
        (Value::Bool(l), Value::Bool(r)) => Ok(l.cmp(r)),
        (Value::Integer(l), Value::Integer(r)) => Ok(l.cmp(r)),
        (Value::Decimal(l), Value::Decimal(r)) => Ok(l.cmp(r)),
        (Value::Character(l), Value::Character(r)) => Ok(l.cmp(r)),
        (Value::String(l), Value::String(r)) => Ok(l.cmp(r)),
        _ => Err(error(
            "Comparison requires two comparable values of the same type",
        )),
    }
}
