use std::fmt::{self, Write};

/// The set of supported arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod, // %
}

/// The set of supported comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,    // ==
    NotEq, // !=
    Lt,    // <
    Gt,    // >
    LtE,   // <=
    GtE,   // >=
}

/// The set of supported logical connectives. Both are evaluated eagerly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    And, // &&
    Or,  // ||
}

/// The set of supported unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not, // !
    Neg, // -x
}

/// An expression node. Every child is owned by exactly one parent.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric literal, kept as written.
    Number(String),
    /// `true` or `false`.
    Bool(bool),
    /// A variable reference.
    Identifier(String),
    /// An arithmetic operation.
    BinaryOp {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// A comparison operation.
    Comparison {
        op: CmpOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// A logical `&&` / `||`.
    LogicalOp {
        op: LogicOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// A unary operation.
    UnaryOp { op: UnaryOp, operand: Box<Expr> },
}

/// A statement node.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `name = value`
    Assign { target: String, value: Expr },
    /// `print(expr)`
    Print(Expr),
    /// `{ ... }`
    Block(Vec<Stmt>),
    /// An if/else statement.
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    /// A while loop.
    While { condition: Expr, body: Box<Stmt> },
    /// A C-style for loop; every header part is optional.
    For {
        init: Option<Box<Stmt>>,
        condition: Option<Expr>,
        update: Option<Box<Stmt>>,
        body: Box<Stmt>,
    },
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
        }
    }
}

impl CmpOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::NotEq => "!=",
            CmpOp::Lt => "<",
            CmpOp::Gt => ">",
            CmpOp::LtE => "<=",
            CmpOp::GtE => ">=",
        }
    }
}

impl LogicOp {
    pub fn symbol(self) -> &'static str {
        match self {
            LogicOp::And => "&&",
            LogicOp::Or => "||",
        }
    }
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Neg => "-",
        }
    }
}

// ============================================================================
// Tree dump
// ============================================================================

const INDENT: &str = "  ";

fn line(out: &mut String, depth: usize, text: fmt::Arguments<'_>) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    // Writing into a String cannot fail.
    let _ = out.write_fmt(text);
    out.push('\n');
}

impl Expr {
    fn dump_into(&self, out: &mut String, depth: usize) {
        match self {
            Expr::Number(text) => line(out, depth, format_args!("Number: {}", text)),
            Expr::Bool(value) => line(out, depth, format_args!("Boolean: {}", value)),
            Expr::Identifier(name) => line(out, depth, format_args!("Identifier: {}", name)),
            Expr::BinaryOp { op, left, right } => {
                line(out, depth, format_args!("BinaryOp: {}", op.symbol()));
                left.dump_into(out, depth + 1);
                right.dump_into(out, depth + 1);
            }
            Expr::Comparison { op, left, right } => {
                line(out, depth, format_args!("Comparison: {}", op.symbol()));
                left.dump_into(out, depth + 1);
                right.dump_into(out, depth + 1);
            }
            Expr::LogicalOp { op, left, right } => {
                line(out, depth, format_args!("LogicalOp: {}", op.symbol()));
                left.dump_into(out, depth + 1);
                right.dump_into(out, depth + 1);
            }
            Expr::UnaryOp { op, operand } => {
                line(out, depth, format_args!("UnaryOp: {}", op.symbol()));
                operand.dump_into(out, depth + 1);
            }
        }
    }
}

impl Stmt {
    fn dump_into(&self, out: &mut String, depth: usize) {
        match self {
            Stmt::Assign { target, value } => {
                line(out, depth, format_args!("Assignment: {}", target));
                value.dump_into(out, depth + 1);
            }
            Stmt::Print(expr) => {
                line(out, depth, format_args!("Print"));
                expr.dump_into(out, depth + 1);
            }
            Stmt::Block(stmts) => {
                line(out, depth, format_args!("Block"));
                for stmt in stmts {
                    stmt.dump_into(out, depth + 1);
                }
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                line(out, depth, format_args!("If"));
                line(out, depth + 1, format_args!("Condition"));
                condition.dump_into(out, depth + 2);
                line(out, depth + 1, format_args!("Then"));
                then_branch.dump_into(out, depth + 2);
                if let Some(else_branch) = else_branch {
                    line(out, depth + 1, format_args!("Else"));
                    else_branch.dump_into(out, depth + 2);
                }
            }
            Stmt::While { condition, body } => {
                line(out, depth, format_args!("While"));
                line(out, depth + 1, format_args!("Condition"));
                condition.dump_into(out, depth + 2);
                line(out, depth + 1, format_args!("Body"));
                body.dump_into(out, depth + 2);
            }
            Stmt::For {
                init,
                condition,
                update,
                body,
            } => {
                line(out, depth, format_args!("For"));
                if let Some(init) = init {
                    line(out, depth + 1, format_args!("Init"));
                    init.dump_into(out, depth + 2);
                }
                if let Some(condition) = condition {
                    line(out, depth + 1, format_args!("Condition"));
                    condition.dump_into(out, depth + 2);
                }
                if let Some(update) = update {
                    line(out, depth + 1, format_args!("Update"));
                    update.dump_into(out, depth + 2);
                }
                line(out, depth + 1, format_args!("Body"));
                body.dump_into(out, depth + 2);
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.dump_into(&mut out, 0);
        f.write_str(&out)
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.dump_into(&mut out, 0);
        f.write_str(&out)
    }
}

/// Renders the statement forest, one node per line, children indented one
/// level deeper than their parent.
pub fn dump_ast(stmts: &[Stmt]) -> String {
    let mut out = String::new();
    for stmt in stmts {
        stmt.dump_into(&mut out, 0);
    }
    out
}
