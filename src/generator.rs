use crate::ast::Literal;
use crate::ir;
use crate::types::Type;

/// Renders typed IR as Java source for a fixed `Main` class schema. This is
/// not a general pretty-printer: every statement visitor appends onto one
/// buffer, block layout is driven by an explicit indent counter, and the
/// shapes below are contracts with the tests.
///
/// Generation cannot fail on IR the analyzer produced; a shape it does not
/// know is an internal invariant violation and panics.
pub fn generate(source: &ir::Source) -> String {
    let mut generator = Generator::new();
    generator.generate_source(source);
    generator.output
}

const IMPORTS: &str = "\
import java.math.BigDecimal;
import java.math.BigInteger;
import java.math.RoundingMode;
import java.util.ArrayList;
import java.util.List;
import java.util.Objects;";

/// Java renderings of the built-ins pre-bound in the root scope.
const DEFINITIONS: &str = "\
    static Object log(Object obj) {
        System.out.println(obj);
        return obj;
    }

    static List<BigInteger> range(BigInteger start, BigInteger end) {
        List<BigInteger> list = new ArrayList<>();
        for (BigInteger i = start; i.compareTo(end) < 0; i = i.add(BigInteger.ONE)) {
            list.add(i);
        }
        return list;
    }";

struct Generator {
    output: String,
    indent: usize,
}

impl Generator {
    fn new() -> Self {
        Generator {
            output: String::new(),
            indent: 0,
        }
    }

    fn append(&mut self, text: &str) {
        self.output.push_str(text);
    }

    fn newline(&mut self, indent: usize) {
        self.output.push('\n');
        for _ in 0..indent {
            self.output.push_str("    ");
        }
    }

    /// Leading LET/DEF statements are hoisted as static members; the first
    /// statement of any other form opens a synthesized `main`, and the rest
    /// of the program becomes its body.
    fn generate_source(&mut self, ir: &ir::Source) {
        self.append(IMPORTS);
        self.append("\n\n");
        self.append("public final class Main {");
        self.append("\n\n");
        self.append(DEFINITIONS);
        self.append("\n");

        self.indent = 1;
        let mut main = false;
        for statement in &ir.statements {
            self.newline(self.indent);
            if !main {
                if matches!(statement, ir::Stmt::Let(_) | ir::Stmt::Def(_)) {
                    self.append("static ");
                } else {
                    self.append("public static void main(String[] args) {");
                    main = true;
                    self.indent = 2;
                    self.newline(self.indent);
                }
            }
            self.generate_stmt(statement);
        }
        if main {
            self.append("\n    }");
        }
        self.indent = 0;
        self.append("\n\n}");
    }

    fn generate_stmt(&mut self, ir: &ir::Stmt) {
        match ir {
            ir::Stmt::Let(let_stmt) => self.generate_let(let_stmt),
            ir::Stmt::Def(def) => self.generate_def(def),
            ir::Stmt::If {
                condition,
                then_body,
                else_body,
            } => self.generate_if(condition, then_body, else_body),
            ir::Stmt::For {
                name,
                element_type,
                iterable,
                body,
            } => self.generate_for(name, element_type, iterable, body),
            ir::Stmt::Return { value } => {
                self.append("return ");
                match value {
                    Some(value) => self.generate_expr(value),
                    None => self.append("null"),
                }
                self.append(";");
            }
            ir::Stmt::Expression(expression) => {
                self.generate_expr(expression);
                self.append(";");
            }
            ir::Stmt::AssignVariable { target, value } => {
                self.append(&target.name);
                self.append(" = ");
                self.generate_expr(value);
                self.append(";");
            }
            ir::Stmt::AssignProperty { target, value } => {
                self.generate_property(target);
                self.append(" = ");
                self.generate_expr(value);
                self.append(";");
            }
        }
    }

    // <Type> <name> (= <value>)?;
    // Object-typed variables use `var`, since their type has no Java name.
    fn generate_let(&mut self, ir: &ir::Let) {
        if let Type::Object(_) = ir.ty {
            self.append("var ");
            self.append(&ir.name);
        } else {
            self.append(&jvm_name(&ir.ty));
            self.append(" ");
            self.append(&ir.name);
        }
        if let Some(value) = &ir.value {
            self.append(" = ");
            self.generate_expr(value);
        }
        self.append(";");
    }

    // <ReturnType> <name>(<Type> <param>, ...) { <body> }
    fn generate_def(&mut self, ir: &ir::Def) {
        self.append(&jvm_name(&ir.returns));
        self.append(" ");
        self.append(&ir.name);
        self.append("(");
        for (i, parameter) in ir.parameters.iter().enumerate() {
            if i > 0 {
                self.append(", ");
            }
            self.append(&jvm_name(&parameter.ty));
            self.append(" ");
            self.append(&parameter.name);
        }
        self.append(") {");
        self.indent += 1;
        for statement in &ir.body {
            self.newline(self.indent);
            self.generate_stmt(statement);
        }
        self.indent -= 1;
        self.newline(self.indent);
        self.append("}");
    }

    fn generate_if(&mut self, condition: &ir::Expr, then_body: &[ir::Stmt], else_body: &[ir::Stmt]) {
        self.append("if (");
        self.generate_expr(condition);
        self.append(") {");
        self.generate_block(then_body);
        self.append("}");
        if !else_body.is_empty() {
            self.append(" else {");
            self.generate_block(else_body);
            self.append("}");
        }
    }

    // for (<Type> <name> : <iterable>) { <body> }
    fn generate_for(
        &mut self,
        name: &str,
        element_type: &Type,
        iterable: &ir::Expr,
        body: &[ir::Stmt],
    ) {
        self.append("for (");
        self.append(&jvm_name(element_type));
        self.append(" ");
        self.append(name);
        self.append(" : ");
        self.generate_expr(iterable);
        self.append(") {");
        self.generate_block(body);
        self.append("}");
    }

    fn generate_block(&mut self, body: &[ir::Stmt]) {
        self.indent += 1;
        for (i, statement) in body.iter().enumerate() {
            if i == 0 {
                self.newline(self.indent);
            }
            self.generate_stmt(statement);
            if i < body.len() - 1 {
                self.newline(self.indent);
            }
        }
        self.indent -= 1;
        self.newline(self.indent);
    }

    fn generate_expr(&mut self, ir: &ir::Expr) {
        match ir {
            ir::Expr::Literal { value, .. } => self.generate_literal(value),
            ir::Expr::Group(inner) => {
                self.append("(");
                self.generate_expr(inner);
                self.append(")");
            }
            ir::Expr::Binary {
                operator,
                left,
                right,
                ty,
            } => self.generate_binary(operator, left, right, ty),
            ir::Expr::Variable(variable) => self.append(&variable.name),
            ir::Expr::Property(property) => self.generate_property(property),
            ir::Expr::Function {
                name, arguments, ..
            } => {
                self.append(name);
                self.generate_arguments(arguments);
            }
            ir::Expr::Method {
                receiver,
                name,
                arguments,
                ..
            } => {
                self.generate_expr(receiver);
                self.append(".");
                self.append(name);
                self.generate_arguments(arguments);
            }
            ir::Expr::Object {
                fields, methods, ..
            } => self.generate_object(fields, methods),
        }
    }

    fn generate_literal(&mut self, value: &Literal) {
        let rendered = match value {
            Literal::Nil => "null".to_string(),
            Literal::Bool(b) => b.to_string(),
            Literal::Integer(i) => format!("new BigInteger(\"{}\")", i),
            Literal::Decimal(d) => format!("new BigDecimal(\"{}\")", d),
            Literal::String(s) => format!("\"{}\"", s),
            Literal::Character(_) => {
                panic!("character literal in IR: the analyzer cannot produce one")
            }
        };
        self.append(&rendered);
    }

    fn generate_binary(&mut self, operator: &str, left: &ir::Expr, right: &ir::Expr, ty: &Type) {
        match operator {
            // Arbitrary-precision arithmetic lowers to method calls; string
            // concatenation stays native.
            "+" => {
                if *ty == Type::Integer || *ty == Type::Decimal {
                    self.method_call(left, "add", right);
                } else {
                    self.generate_expr(left);
                    self.append(" + ");
                    self.generate_expr(right);
                }
            }
            "-" => self.method_call(left, "subtract", right),
            "*" => self.method_call(left, "multiply", right),
            "/" => {
                // Integer division is exact; decimal division rounds.
                self.append("(");
                self.generate_expr(left);
                self.append(").divide(");
                self.generate_expr(right);
                if *ty == Type::Integer {
                    self.append(")");
                } else {
                    self.append(", RoundingMode.HALF_EVEN)");
                }
            }
            "<" | "<=" | ">" | ">=" => {
                self.append("(");
                self.generate_expr(left);
                self.append(").compareTo(");
                self.generate_expr(right);
                self.append(") ");
                self.append(operator);
                self.append(" 0");
            }
            "==" | "!=" => {
                if operator == "!=" {
                    self.append("!");
                }
                self.append("Objects.equals(");
                self.generate_expr(left);
                self.append(", ");
                self.generate_expr(right);
                self.append(")");
            }
            "AND" => {
                // An OR directly on the left would bind looser than && in
                // Java; group it to keep the source precedence.
                let left_is_or = matches!(
                    left,
                    ir::Expr::Binary { operator, .. } if operator == "OR"
                );
                if left_is_or {
                    self.append("(");
                }
                self.generate_expr(left);
                if left_is_or {
                    self.append(")");
                }
                self.append(" && ");
                self.generate_expr(right);
            }
            "OR" => {
                self.generate_expr(left);
                self.append(" || ");
                self.generate_expr(right);
            }
            _ => panic!("unknown binary operator in IR: {}", operator),
        }
    }

    fn method_call(&mut self, left: &ir::Expr, method: &str, right: &ir::Expr) {
        self.append("(");
        self.generate_expr(left);
        self.append(").");
        self.append(method);
        self.append("(");
        self.generate_expr(right);
        self.append(")");
    }

    fn generate_property(&mut self, property: &ir::Property) {
        self.generate_expr(&property.receiver);
        self.append(".");
        self.append(&property.name);
    }

    fn generate_arguments(&mut self, arguments: &[ir::Expr]) {
        self.append("(");
        for (i, argument) in arguments.iter().enumerate() {
            if i > 0 {
                self.append(", ");
            }
            self.generate_expr(argument);
        }
        self.append(")");
    }

    // new Object() { <fields> <blank line> <methods> }
    fn generate_object(&mut self, fields: &[ir::Let], methods: &[ir::Def]) {
        self.append("new Object() {");
        self.indent += 1;
        for (i, field) in fields.iter().enumerate() {
            if i == 0 {
                self.newline(self.indent);
            }
            self.generate_let(field);
        }
        if !fields.is_empty() && !methods.is_empty() {
            self.newline(self.indent);
        }
        for (i, method) in methods.iter().enumerate() {
            if i == 0 {
                self.newline(self.indent);
            }
            self.generate_def(method);
        }
        self.indent -= 1;
        self.newline(self.indent);
        self.append("}");
    }
}

/// The Java spelling of a type in declarations. Object-typed bindings never
/// reach this: they are declared with `var`.
fn jvm_name(ty: &Type) -> String {
    match ty {
        Type::Any | Type::Nil | Type::Equatable => "Object".to_string(),
        Type::Comparable => "Comparable".to_string(),
        Type::Iterable => "Iterable<BigInteger>".to_string(),
        Type::Boolean => "Boolean".to_string(),
        Type::Integer => "BigInteger".to_string(),
        Type::Decimal => "BigDecimal".to_string(),
        Type::String => "String".to_string(),
        Type::Object(_) | Type::Function { .. } => "Object".to_string(),
    }
}
