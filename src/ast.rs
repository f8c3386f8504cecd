use bigdecimal::BigDecimal;
use num_bigint::BigInt;

/// A parsed program: the ordered statements of one source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub statements: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Let(Let),
    Def(Def),
    If {
        condition: Expr,
        then_body: Vec<Stmt>,
        else_body: Vec<Stmt>,
    },
    For {
        name: String,
        iterable: Expr,
        body: Vec<Stmt>,
    },
    Return {
        value: Option<Expr>,
    },
    Expression(Expr),
    Assignment {
        target: Expr,
        value: Expr,
    },
}

/// `LET name (: Type)? (= value)? ;`, also the form of an object field.
#[derive(Debug, Clone, PartialEq)]
pub struct Let {
    pub name: String,
    pub type_name: Option<String>,
    pub value: Option<Expr>,
}

/// `DEF name(params) (: Type)? DO body END`, also the form of an object
/// method. Parameter type annotations are positional and each optional.
#[derive(Debug, Clone, PartialEq)]
pub struct Def {
    pub name: String,
    pub parameters: Vec<String>,
    pub parameter_types: Vec<Option<String>>,
    pub return_type: Option<String>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Group(Box<Expr>),
    Binary {
        operator: String,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Variable(String),
    Property {
        receiver: Box<Expr>,
        name: String,
    },
    Function {
        name: String,
        arguments: Vec<Expr>,
    },
    Method {
        receiver: Box<Expr>,
        name: String,
        arguments: Vec<Expr>,
    },
    Object {
        name: Option<String>,
        fields: Vec<Let>,
        methods: Vec<Def>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Nil,
    Bool(bool),
    Integer(BigInt),
    Decimal(BigDecimal),
    Character(char),
    String(String),
}
