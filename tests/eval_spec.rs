/// Spec tests for the Opal evaluator.
///
/// Programs are lexed and parsed, then evaluated directly against a root
/// scope carrying the built-in functions. Analysis is skipped so the
/// evaluator's own runtime checks are exercised too. `evaluate` yields the
/// last statement's value.
use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use opal::environment;
use opal::evaluator::Evaluator;
use opal::lexer::Lexer;
use opal::parser::Parser;
use opal::value::{EvaluateError, Value};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn eval(src: &str) -> Result<Value, EvaluateError> {
    let tokens = Lexer::new(src).lex().expect("lex failed");
    let ast = Parser::new(tokens).parse().expect("parse failed");
    Evaluator::new(environment::root_evaluation_scope()).evaluate(&ast)
}

fn eval_ok(src: &str) -> Value {
    match eval(src) {
        Ok(value) => value,
        Err(e) => panic!("expected success, got: {}", e),
    }
}

fn assert_error_containing(src: &str, snippet: &str) {
    match eval(src) {
        Ok(value) => panic!(
            "expected error containing {:?}, got value {}",
            snippet, value
        ),
        Err(e) => {
            let message = e.to_string();
            assert!(
                message.contains(snippet),
                "expected error containing {:?}, got: {}",
                snippet,
                message
            );
        }
    }
}

fn int(n: i64) -> Value {
    Value::Integer(BigInt::from(n))
}

fn dec(s: &str) -> Value {
    Value::Decimal(BigDecimal::from_str(s).unwrap())
}

fn string(s: &str) -> Value {
    Value::String(s.to_string())
}

// ---------------------------------------------------------------------------
// Literals and statements
// ---------------------------------------------------------------------------

#[test]
fn evaluate_yields_the_last_statement_value() {
    assert_eq!(eval_ok("1; 2; 3;"), int(3));
}

#[test]
fn empty_source_is_nil() {
    assert_eq!(eval_ok(""), Value::Nil);
}

#[test]
fn let_yields_the_bound_value() {
    assert_eq!(eval_ok("LET x = 3;"), int(3));
}

#[test]
fn let_without_initializer_binds_nil() {
    assert_eq!(eval_ok("LET x; x;"), Value::Nil);
}

#[test]
fn let_duplicate_fails_at_runtime() {
    assert_error_containing("LET x = 1; LET x = 2;", "already defined");
}

#[test]
fn character_literal_evaluates() {
    assert_eq!(eval_ok("'a';"), Value::Character('a'));
}

// ---------------------------------------------------------------------------
// Arithmetic
// ---------------------------------------------------------------------------

#[test]
fn integer_arithmetic() {
    assert_eq!(eval_ok("1 + 2;"), int(3));
    assert_eq!(eval_ok("5 - 8;"), int(-3));
    assert_eq!(eval_ok("6 * 7;"), int(42));
}

#[test]
fn integer_division_truncates_toward_zero() {
    assert_eq!(eval_ok("7 / 2;"), int(3));
    assert_eq!(eval_ok("-7 / 2;"), int(-3));
}

#[test]
fn decimal_arithmetic() {
    assert_eq!(eval_ok("1.5 + 2.5;"), dec("4.0"));
    assert_eq!(eval_ok("1.5 * 2.0;"), dec("3.00"));
}

#[test]
fn decimal_division_rounds_half_even_at_left_scale() {
    assert_eq!(eval_ok("1.0 / 3.0;"), dec("0.3"));
    assert_eq!(eval_ok("1.00 / 3.00;"), dec("0.33"));
    assert_eq!(eval_ok("7.0 / 2.0;"), dec("3.5"));
}

#[test]
fn division_by_zero_fails() {
    assert_error_containing("1 / 0;", "Division by zero");
    assert_error_containing("1.0 / 0.0;", "Division by zero");
}

#[test]
fn mixed_numeric_arithmetic_fails() {
    assert_error_containing("1 + 2.0;", "Addition requires");
}

#[test]
fn string_concatenation_renders_either_side() {
    assert_eq!(eval_ok("\"a\" + 1;"), string("a1"));
    assert_eq!(eval_ok("1 + \"a\";"), string("1a"));
    assert_eq!(eval_ok("\"x\" + NIL;"), string("xnull"));
    assert_eq!(eval_ok("\"b\" + TRUE;"), string("btrue"));
}

// ---------------------------------------------------------------------------
// Comparison, equality, logic
// ---------------------------------------------------------------------------

#[test]
fn comparisons() {
    assert_eq!(eval_ok("1 < 2;"), Value::Bool(true));
    assert_eq!(eval_ok("2 <= 1;"), Value::Bool(false));
    assert_eq!(eval_ok("\"a\" < \"b\";"), Value::Bool(true));
    assert_eq!(eval_ok("2.5 > 2.4;"), Value::Bool(true));
}

#[test]
fn comparison_of_mismatched_types_fails() {
    assert_error_containing("1 < \"a\";", "Comparison requires");
}

#[test]
fn equality_is_structural() {
    assert_eq!(eval_ok("1 == 1;"), Value::Bool(true));
    assert_eq!(eval_ok("1 == 2;"), Value::Bool(false));
    assert_eq!(eval_ok("1 == \"1\";"), Value::Bool(false));
    assert_eq!(eval_ok("NIL == NIL;"), Value::Bool(true));
    assert_eq!(eval_ok("\"a\" != \"b\";"), Value::Bool(true));
}

#[test]
fn and_short_circuits_on_false() {
    // The right operand would divide by zero; it must never run.
    assert_eq!(eval_ok("FALSE AND 1 / 0 == 1;"), Value::Bool(false));
}

#[test]
fn or_short_circuits_on_true() {
    assert_eq!(eval_ok("TRUE OR 1 / 0 == 1;"), Value::Bool(true));
}

#[test]
fn logical_operators_combine() {
    assert_eq!(eval_ok("TRUE AND TRUE;"), Value::Bool(true));
    assert_eq!(eval_ok("TRUE AND FALSE;"), Value::Bool(false));
    assert_eq!(eval_ok("FALSE OR TRUE;"), Value::Bool(true));
}

#[test]
fn logical_operators_require_booleans() {
    assert_error_containing("1 AND TRUE;", "boolean");
    assert_error_containing("TRUE AND 1;", "boolean");
}

// ---------------------------------------------------------------------------
// Control flow and scoping
// ---------------------------------------------------------------------------

#[test]
fn if_takes_the_matching_branch() {
    assert_eq!(eval_ok("IF TRUE DO 1; ELSE 2; END"), int(1));
    assert_eq!(eval_ok("IF FALSE DO 1; ELSE 2; END"), int(2));
}

#[test]
fn if_condition_must_be_boolean() {
    assert_error_containing("IF 1 DO END", "boolean");
}

#[test]
fn if_body_runs_in_a_child_scope() {
    assert_eq!(eval_ok("LET x = 1; IF TRUE DO LET x = 2; END x;"), int(1));
}

#[test]
fn if_body_can_mutate_enclosing_bindings() {
    assert_eq!(eval_ok("LET x = 1; IF TRUE DO x = 2; END x;"), int(2));
}

#[test]
fn for_loops_over_range() {
    assert_eq!(
        eval_ok("LET sum = 0; FOR i IN range(1, 4) DO sum = sum + i; END sum;"),
        int(6)
    );
}

#[test]
fn for_over_empty_range_skips_the_body() {
    assert_eq!(
        eval_ok("LET ran = FALSE; FOR i IN range(0, 0) DO ran = TRUE; END ran;"),
        Value::Bool(false)
    );
}

#[test]
fn for_expression_must_be_iterable() {
    assert_error_containing("FOR i IN 1 DO END", "iterable");
}

// ---------------------------------------------------------------------------
// Functions
// ---------------------------------------------------------------------------

#[test]
fn function_call_returns_the_returned_value() {
    assert_eq!(eval_ok("DEF f(x) DO RETURN x; END f(5);"), int(5));
}

#[test]
fn function_without_return_yields_nil() {
    assert_eq!(eval_ok("DEF f() DO 1; END f();"), Value::Nil);
}

#[test]
fn return_stops_the_body() {
    assert_eq!(
        eval_ok("DEF f() DO RETURN 1; RETURN 2; END f();"),
        int(1)
    );
}

#[test]
fn return_outside_function_fails() {
    assert_error_containing("RETURN 1;", "outside of a function");
}

#[test]
fn call_arity_is_checked() {
    assert_error_containing("DEF f(x) DO END f();", "Incorrect number of arguments");
}

#[test]
fn unknown_function_fails() {
    assert_error_containing("nosuch();", "Function not defined");
}

#[test]
fn functions_close_over_their_defining_scope() {
    assert_eq!(
        eval_ok("LET x = 1; DEF bump() DO x = x + 1; END bump(); bump(); x;"),
        int(3)
    );
}

#[test]
fn recursion() {
    assert_eq!(
        eval_ok(
            "DEF fact(n) DO \
               IF n == 0 DO RETURN 1; END \
               RETURN n * fact(n - 1); \
             END \
             fact(5);"
        ),
        int(120)
    );
}

#[test]
fn builtin_log_passes_its_argument_through() {
    assert_eq!(eval_ok("log(5);"), int(5));
}

#[test]
fn builtin_range_yields_integers() {
    assert_eq!(
        eval_ok("range(2, 5);"),
        Value::List(vec![int(2), int(3), int(4)])
    );
}

// ---------------------------------------------------------------------------
// Objects
// ---------------------------------------------------------------------------

#[test]
fn object_fields_are_readable() {
    assert_eq!(eval_ok("LET o = OBJECT DO LET x = 1; END; o.x;"), int(1));
}

#[test]
fn object_field_without_initializer_is_nil() {
    assert_eq!(eval_ok("LET o = OBJECT DO LET x; END; o.x;"), Value::Nil);
}

#[test]
fn property_assignment_mutates_the_object() {
    assert_eq!(
        eval_ok("LET o = OBJECT DO LET x = 1; END; o.x = 42; o.x;"),
        int(42)
    );
}

#[test]
fn methods_see_the_receiver_as_this() {
    assert_eq!(
        eval_ok(
            "LET o = OBJECT DO \
               LET x = 1; \
               DEF get() DO RETURN this.x; END \
               DEF set(v) DO this.x = v; END \
             END; \
             o.set(42); \
             o.get();"
        ),
        int(42)
    );
}

#[test]
fn method_not_found_fails() {
    assert_error_containing("LET o = OBJECT DO END; o.f();", "Method not found");
}

#[test]
fn property_not_defined_fails() {
    assert_error_containing("LET o = OBJECT DO END; o.x;", "Property not defined");
}

#[test]
fn property_on_non_object_fails() {
    assert_error_containing("LET n = 1; n.x;", "must be an object");
}

#[test]
fn assignment_to_undefined_property_fails() {
    assert_error_containing("LET o = OBJECT DO END; o.x = 1;", "Property is not defined");
}

#[test]
fn duplicate_field_fails() {
    assert_error_containing(
        "LET o = OBJECT DO LET x = 1; LET x = 2; END;",
        "already defined in object",
    );
}

#[test]
fn string_escapes_survive_to_runtime() {
    assert_eq!(eval_ok("\"a\\nb\";"), string("a\nb"));
}
