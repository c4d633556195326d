//! Three-address code: a flat list of instructions with at most one operator
//! and two operands each, using temporaries for intermediate values and
//! labels for control flow.

use std::fmt;

/// The closed set of IR operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Opcode {
    // Arithmetic
    Add, // r = a + b
    Sub, // r = a - b
    Mul, // r = a * b
    Div, // r = a / b
    Mod, // r = a % b
    Neg, // r = -a

    // Comparison
    Lt, // r = a < b
    Gt, // r = a > b
    Le, // r = a <= b
    Ge, // r = a >= b
    Eq, // r = a == b
    Ne, // r = a != b

    // Logical
    And, // r = a && b
    Or,  // r = a || b
    Not, // r = !a

    Assign, // r = a

    // Control flow
    Label,   // r:
    Goto,    // goto r
    IfFalse, // if !a goto r

    // I/O
    Print, // print a

    /// Placeholder with no effect. Backends emit a comment for it. Nothing
    /// lowers to it today; it exists for hand-built or rewritten IR.
    Nop,
}

impl Opcode {
    pub const ALL: [Opcode; 21] = [
        Opcode::Add,
        Opcode::Sub,
        Opcode::Mul,
        Opcode::Div,
        Opcode::Mod,
        Opcode::Neg,
        Opcode::Lt,
        Opcode::Gt,
        Opcode::Le,
        Opcode::Ge,
        Opcode::Eq,
        Opcode::Ne,
        Opcode::And,
        Opcode::Or,
        Opcode::Not,
        Opcode::Assign,
        Opcode::Label,
        Opcode::Goto,
        Opcode::IfFalse,
        Opcode::Print,
        Opcode::Nop,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Mul => "MUL",
            Opcode::Div => "DIV",
            Opcode::Mod => "MOD",
            Opcode::Neg => "NEG",
            Opcode::Lt => "LT",
            Opcode::Gt => "GT",
            Opcode::Le => "LE",
            Opcode::Ge => "GE",
            Opcode::Eq => "EQ",
            Opcode::Ne => "NE",
            Opcode::And => "AND",
            Opcode::Or => "OR",
            Opcode::Not => "NOT",
            Opcode::Assign => "ASSIGN",
            Opcode::Label => "LABEL",
            Opcode::Goto => "GOTO",
            Opcode::IfFalse => "IF_FALSE",
            Opcode::Print => "PRINT",
            Opcode::Nop => "NOP",
        }
    }

    /// Infix spelling for two-operand value opcodes.
    pub fn infix(self) -> Option<&'static str> {
        let symbol = match self {
            Opcode::Add => "+",
            Opcode::Sub => "-",
            Opcode::Mul => "*",
            Opcode::Div => "/",
            Opcode::Mod => "%",
            Opcode::Lt => "<",
            Opcode::Gt => ">",
            Opcode::Le => "<=",
            Opcode::Ge => ">=",
            Opcode::Eq => "==",
            Opcode::Ne => "!=",
            Opcode::And => "&&",
            Opcode::Or => "||",
            _ => return None,
        };
        Some(symbol)
    }
}

/// A compiler-generated temporary, rendered `t<N>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Temp(pub u32);

/// A compiler-generated jump target, rendered `L<N>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label(pub u32);

impl fmt::Display for Temp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// One instruction slot. Generated names and user names are distinct
/// variants, so they can never be confused for one another.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operand {
    /// A user variable, by its source spelling.
    Var(String),
    Temp(Temp),
    Label(Label),
    /// Numeric text as written, or `true` / `false`.
    Literal(String),
}

impl From<Temp> for Operand {
    fn from(temp: Temp) -> Self {
        Operand::Temp(temp)
    }
}

impl From<Label> for Operand {
    fn from(label: Label) -> Self {
        Operand::Label(label)
    }
}

/// Prefix given to user variables whose spelling is reserved.
pub const ESCAPE_PREFIX: &str = "u_";

// C keywords (through C23) plus lowercase names the preamble's headers define
// or rely on. Uppercase macros are covered by `is_macro_shape`.
const RESERVED_WORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while", "bool", "true", "false", "alignas",
    "alignof", "constexpr", "nullptr", "static_assert", "thread_local", "typeof",
    "typeof_unqual", "asm", "main", "printf", "fmod", "errno", "stdin", "stdout", "stderr",
    "math_errhandling", "L_tmpnam", "L_ctermid", "P_tmpdir",
];

fn is_generated_shape(name: &str, prefix: char) -> bool {
    let mut chars = name.chars();
    chars.next() == Some(prefix)
        && name.len() > 1
        && chars.all(|c| c.is_ascii_digit())
}

// `_Bool`, `__x`, `EOF`, `M_PI`, `FP_NAN`: implementation-reserved or
// macro-style spellings.
fn is_macro_shape(name: &str) -> bool {
    name.starts_with('_')
        || (name.chars().any(|c| c.is_ascii_uppercase())
            && !name.chars().any(|c| c.is_ascii_lowercase()))
}

/// Spelling of a user variable in dumps and generated code.
///
/// Names that look like temporaries or labels, start with [`ESCAPE_PREFIX`]
/// or `_`, contain no lowercase letters, or clash with C keywords and header
/// names are prefixed. The mapping is injective.
pub fn user_name(name: &str) -> String {
    let reserved = is_generated_shape(name, 't')
        || is_generated_shape(name, 'L')
        || name.starts_with(ESCAPE_PREFIX)
        || RESERVED_WORDS.contains(&name)
        || is_macro_shape(name);
    if reserved {
        format!("{}{}", ESCAPE_PREFIX, name)
    } else {
        name.to_string()
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Var(name) => f.write_str(&user_name(name)),
            Operand::Temp(temp) => write!(f, "{}", temp),
            Operand::Label(label) => write!(f, "{}", label),
            Operand::Literal(text) => f.write_str(text),
        }
    }
}

/// A single three-address instruction.
///
/// Slot usage by opcode:
/// - value opcodes: `result = arg1 op arg2` (`arg2` empty for `NEG`/`NOT`/`ASSIGN`)
/// - `LABEL`, `GOTO`: `result` holds the label
/// - `IF_FALSE`: `result` holds the label, `arg1` the condition
/// - `PRINT`: `arg1`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub result: Option<Operand>,
    pub arg1: Option<Operand>,
    pub arg2: Option<Operand>,
}

impl Instruction {
    pub fn new(
        opcode: Opcode,
        result: Option<Operand>,
        arg1: Option<Operand>,
        arg2: Option<Operand>,
    ) -> Self {
        Self {
            opcode,
            result,
            arg1,
            arg2,
        }
    }

    pub fn binary(opcode: Opcode, result: Temp, left: Operand, right: Operand) -> Self {
        Self::new(opcode, Some(result.into()), Some(left), Some(right))
    }

    pub fn unary(opcode: Opcode, result: Temp, operand: Operand) -> Self {
        Self::new(opcode, Some(result.into()), Some(operand), None)
    }

    pub fn assign(target: &str, value: Operand) -> Self {
        Self::new(
            Opcode::Assign,
            Some(Operand::Var(target.to_string())),
            Some(value),
            None,
        )
    }

    pub fn label(label: Label) -> Self {
        Self::new(Opcode::Label, Some(label.into()), None, None)
    }

    pub fn goto(label: Label) -> Self {
        Self::new(Opcode::Goto, Some(label.into()), None, None)
    }

    pub fn if_false(label: Label, condition: Operand) -> Self {
        Self::new(Opcode::IfFalse, Some(label.into()), Some(condition), None)
    }

    pub fn print(value: Operand) -> Self {
        Self::new(Opcode::Print, None, Some(value), None)
    }

    /// Operands that name storage: every slot except literals and label references.
    pub fn storage_operands(&self) -> impl Iterator<Item = &Operand> {
        [&self.result, &self.arg1, &self.arg2]
            .into_iter()
            .flatten()
            .filter(|operand| !matches!(operand, Operand::Literal(_) | Operand::Label(_)))
    }
}

struct Slot<'a>(&'a Option<Operand>);

impl fmt::Display for Slot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(operand) => write!(f, "{}", operand),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = Slot(&self.result);
        let arg1 = Slot(&self.arg1);
        let arg2 = Slot(&self.arg2);
        match self.opcode {
            Opcode::Neg => write!(f, "{} = -{}", result, arg1),
            Opcode::Not => write!(f, "{} = !{}", result, arg1),
            Opcode::Assign => write!(f, "{} = {}", result, arg1),
            Opcode::Label => write!(f, "{}:", result),
            Opcode::Goto => write!(f, "goto {}", result),
            Opcode::IfFalse => write!(f, "if !{} goto {}", arg1, result),
            Opcode::Print => write!(f, "print {}", arg1),
            Opcode::Nop => f.write_str("nop"),
            op => match op.infix() {
                Some(symbol) => write!(f, "{} = {} {} {}", result, arg1, symbol, arg2),
                None => f.write_str(op.name()),
            },
        }
    }
}

/// Renders the instruction list, one line per instruction, prefixed by its
/// sequential index.
pub fn dump_tac(instructions: &[Instruction]) -> String {
    let mut out = String::new();
    for (index, instruction) in instructions.iter().enumerate() {
        out.push_str(&format!("{}: {}\n", index, instruction));
    }
    out
}
