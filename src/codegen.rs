//! C code generation from three-address code.
//!
//! Generation runs in two passes. The first walks every instruction and
//! collects the user variables and temporaries it touches; the second writes
//! the preamble, one zero-initialized `double` per collected name, and one C
//! statement per instruction in IR order.

use crate::tac::{Instruction, Opcode, Operand, Temp};
use std::collections::BTreeSet;
use std::fmt::Write;
use tracing::debug;

const PREAMBLE: &str = "\
// Generated C code from TACO compiler
#include <stdio.h>
#include <math.h>

int main(void) {
";

const EPILOGUE: &str = "
    return 0;
}
";

/// Two-pass C emitter. The collected name sets belong to one generator and
/// are rebuilt on every [`CCodeGenerator::generate`] call.
#[derive(Debug, Default)]
pub struct CCodeGenerator {
    variables: BTreeSet<String>,
    temporaries: BTreeSet<Temp>,
}

impl CCodeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// User variable spellings collected by the last `generate` call.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(String::as_str)
    }

    /// Temporaries collected by the last `generate` call, in numeric order.
    pub fn temporaries(&self) -> impl Iterator<Item = Temp> + '_ {
        self.temporaries.iter().copied()
    }

    pub fn generate(&mut self, tac: &[Instruction]) -> String {
        self.collect_names(tac);
        debug!(
            variables = self.variables.len(),
            temporaries = self.temporaries.len(),
            "collected declarations"
        );

        let mut out = String::from(PREAMBLE);
        self.write_declarations(&mut out);

        out.push_str("    // Program code\n");
        for instruction in tac {
            out.push_str(&generate_instruction(instruction));
            out.push('\n');
        }

        out.push_str(EPILOGUE);
        out
    }

    fn collect_names(&mut self, tac: &[Instruction]) {
        self.variables.clear();
        self.temporaries.clear();

        for instruction in tac {
            for operand in instruction.storage_operands() {
                match operand {
                    Operand::Temp(temp) => {
                        self.temporaries.insert(*temp);
                    }
                    Operand::Var(_) => {
                        self.variables.insert(operand.to_string());
                    }
                    Operand::Label(_) | Operand::Literal(_) => {}
                }
            }
        }
    }

    fn write_declarations(&self, out: &mut String) {
        if !self.variables.is_empty() {
            out.push_str("    // User variables\n");
            for var in &self.variables {
                let _ = writeln!(out, "    double {} = 0.0;", var);
            }
            out.push('\n');
        }

        if !self.temporaries.is_empty() {
            out.push_str("    // Temporary variables\n");
            for temp in &self.temporaries {
                let _ = writeln!(out, "    double {} = 0.0;", temp);
            }
            out.push('\n');
        }
    }
}

/// Renders an operand as a C expression. Every value is a `double`, so
/// integral literals gain a fractional part and booleans become `1.0`/`0.0`.
fn value(operand: &Option<Operand>) -> String {
    match operand {
        Some(Operand::Literal(text)) => match text.as_str() {
            "true" => "1.0".to_string(),
            "false" => "0.0".to_string(),
            _ if text.contains('.') => text.clone(),
            _ => format!("{}.0", text),
        },
        Some(operand) => operand.to_string(),
        None => "0.0".to_string(),
    }
}

fn generate_instruction(instruction: &Instruction) -> String {
    let result = value(&instruction.result);
    let arg1 = value(&instruction.arg1);
    let arg2 = value(&instruction.arg2);

    let infix = |symbol: &str| format!("    {} = {} {} {};", result, arg1, symbol, arg2);

    match instruction.opcode {
        Opcode::Add => infix("+"),
        Opcode::Sub => infix("-"),
        Opcode::Mul => infix("*"),
        Opcode::Div => infix("/"),
        Opcode::Lt => infix("<"),
        Opcode::Gt => infix(">"),
        Opcode::Le => infix("<="),
        Opcode::Ge => infix(">="),
        Opcode::Eq => infix("=="),
        Opcode::Ne => infix("!="),
        Opcode::And => infix("&&"),
        Opcode::Or => infix("||"),
        Opcode::Mod => format!("    {} = fmod({}, {});", result, arg1, arg2),
        Opcode::Neg => format!("    {} = -{};", result, arg1),
        Opcode::Not => format!("    {} = !{};", result, arg1),
        Opcode::Assign => format!("    {} = {};", result, arg1),
        Opcode::Label => format!("{}: ;", result),
        Opcode::Goto => format!("    goto {};", result),
        Opcode::IfFalse => format!("    if (!{}) goto {};", arg1, result),
        Opcode::Print => format!("    printf(\"%.17g\\n\", {});", arg1),
        Opcode::Nop => "    // nop".to_string(),
    }
}
