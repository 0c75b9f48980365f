//! Abstract syntax tree produced by the parser.
//!
//! The tree is strictly owned: every node holds its children by `Box`/`Vec`
//! and nothing points back up. Once parsed it is never mutated, so one tree
//! can be evaluated from many threads at once.

use core::fmt;

use serde_json::{Number, Value};

use super::Span;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Literal(Literal),
    Assign {
        target: Box<Node>,
        value: Box<Node>,
    },
    Elvis {
        value: Box<Node>,
        fallback: Box<Node>,
    },
    Ternary {
        condition: Box<Node>,
        then_branch: Box<Node>,
        else_branch: Box<Node>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Node>,
    },
    Comparison {
        op: ComparisonOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    Arithmetic {
        op: ArithmeticOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// `#name(args)`
    FunctionCall {
        name: String,
        args: Vec<Node>,
    },
    /// `#name`
    Variable(String),
    /// `name(args)` applied to the active value.
    MethodCall {
        name: String,
        args: Vec<Node>,
        null_safe: bool,
    },
    Property {
        name: String,
        null_safe: bool,
    },
    /// `![expr]`
    Projection {
        expr: Box<Node>,
        null_safe: bool,
    },
    /// `!![expr]`
    Flat {
        expr: Box<Node>,
        null_safe: bool,
    },
    /// `?[expr]`, `^[expr]`, `$[expr]`
    Selection {
        mode: SelectionMode,
        predicate: Box<Node>,
        null_safe: bool,
    },
    /// `[expr]`
    Indexer {
        index: Box<Node>,
    },
    InlineList(Vec<Node>),
    InlineMap(Vec<(Node, Node)>),
    /// A start node followed by at least one navigation suffix.
    Compound(Vec<Node>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Literal {
    pub fn to_value(&self) -> Value {
        match self {
            Literal::Null => Value::Null,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Int(i) => Value::from(*i),
            // Float literals are finite by construction.
            Literal::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
            Literal::Str(s) => Value::String(s.clone()),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ComparisonOp {
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SelectionMode {
    All,
    First,
    Last,
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
        })
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
            UnaryOp::Not => "!",
        })
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
            ComparisonOp::Eq => "==",
            ComparisonOp::Ne => "!=",
        })
    }
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Sub => "-",
            ArithmeticOp::Mul => "*",
            ArithmeticOp::Div => "/",
            ArithmeticOp::Mod => "%",
            ArithmeticOp::Pow => "^",
        })
    }
}
