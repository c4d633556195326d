//! Lowering from the AST to three-address code. Expressions become chains of
//! temporaries; control flow becomes labels and conditional jumps.

use crate::ast::{BinOp, CmpOp, Expr, LogicOp, Stmt, UnaryOp};
use crate::tac::{Instruction, Label, Opcode, Operand, Temp};
use tracing::debug;

/// Lowers a statement forest to three-address code with a fresh generator.
pub fn lower_program(stmts: &[Stmt]) -> Vec<Instruction> {
    TacGenerator::new().generate(stmts)
}

/// Per-compilation lowering state: the instruction buffer and the temporary
/// and label counters. Counters only grow, so every name handed out within one
/// `generate` call is unique.
#[derive(Debug, Default)]
pub struct TacGenerator {
    instructions: Vec<Instruction>,
    temp_counter: u32,
    label_counter: u32,
}

impl TacGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lowers `stmts` in order. Counters restart at zero on every call.
    pub fn generate(&mut self, stmts: &[Stmt]) -> Vec<Instruction> {
        self.instructions.clear();
        self.temp_counter = 0;
        self.label_counter = 0;

        for stmt in stmts {
            self.lower_statement(stmt);
        }

        debug!(
            instructions = self.instructions.len(),
            temporaries = self.temp_counter,
            labels = self.label_counter,
            "lowered program"
        );
        std::mem::take(&mut self.instructions)
    }

    fn new_temp(&mut self) -> Temp {
        let temp = Temp(self.temp_counter);
        self.temp_counter += 1;
        temp
    }

    fn new_label(&mut self) -> Label {
        let label = Label(self.label_counter);
        self.label_counter += 1;
        label
    }

    fn emit(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    fn lower_statement(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Assign { target, value } => {
                let place = self.lower_expression(value);
                self.emit(Instruction::assign(target, place));
            }
            Stmt::Print(expr) => {
                let place = self.lower_expression(expr);
                self.emit(Instruction::print(place));
            }
            Stmt::Block(stmts) => {
                for stmt in stmts {
                    self.lower_statement(stmt);
                }
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let condition = self.lower_expression(condition);
                let else_label = self.new_label();
                self.emit(Instruction::if_false(else_label, condition));
                self.lower_statement(then_branch);

                match else_branch {
                    Some(else_branch) => {
                        let end_label = self.new_label();
                        self.emit(Instruction::goto(end_label));
                        self.emit(Instruction::label(else_label));
                        self.lower_statement(else_branch);
                        self.emit(Instruction::label(end_label));
                    }
                    None => self.emit(Instruction::label(else_label)),
                }
            }
            Stmt::While { condition, body } => {
                let start_label = self.new_label();
                let end_label = self.new_label();
                self.emit(Instruction::label(start_label));
                let condition = self.lower_expression(condition);
                self.emit(Instruction::if_false(end_label, condition));
                self.lower_statement(body);
                self.emit(Instruction::goto(start_label));
                self.emit(Instruction::label(end_label));
            }
            Stmt::For {
                init,
                condition,
                update,
                body,
            } => {
                if let Some(init) = init {
                    self.lower_statement(init);
                }
                let start_label = self.new_label();
                let end_label = self.new_label();
                self.emit(Instruction::label(start_label));
                // No condition means the body runs unconditionally.
                if let Some(condition) = condition {
                    let condition = self.lower_expression(condition);
                    self.emit(Instruction::if_false(end_label, condition));
                }
                self.lower_statement(body);
                if let Some(update) = update {
                    self.lower_statement(update);
                }
                self.emit(Instruction::goto(start_label));
                self.emit(Instruction::label(end_label));
            }
        }
    }

    /// Lowers an expression and returns the place holding its value. The left
    /// operand is always fully lowered before the right one.
    fn lower_expression(&mut self, expr: &Expr) -> Operand {
        match expr {
            Expr::Number(text) => Operand::Literal(text.clone()),
            Expr::Bool(value) => Operand::Literal(value.to_string()),
            Expr::Identifier(name) => Operand::Var(name.clone()),
            Expr::BinaryOp { op, left, right } => {
                let opcode = match op {
                    BinOp::Add => Opcode::Add,
                    BinOp::Sub => Opcode::Sub,
                    BinOp::Mul => Opcode::Mul,
                    BinOp::Div => Opcode::Div,
                    BinOp::Mod => Opcode::Mod,
                };
                self.lower_binary(opcode, left, right)
            }
            Expr::Comparison { op, left, right } => {
                let opcode = match op {
                    CmpOp::Lt => Opcode::Lt,
                    CmpOp::Gt => Opcode::Gt,
                    CmpOp::LtE => Opcode::Le,
                    CmpOp::GtE => Opcode::Ge,
                    CmpOp::Eq => Opcode::Eq,
                    CmpOp::NotEq => Opcode::Ne,
                };
                self.lower_binary(opcode, left, right)
            }
            // Both sides are evaluated; there is no short-circuit jump.
            Expr::LogicalOp { op, left, right } => {
                let opcode = match op {
                    LogicOp::And => Opcode::And,
                    LogicOp::Or => Opcode::Or,
                };
                self.lower_binary(opcode, left, right)
            }
            Expr::UnaryOp { op, operand } => {
                let opcode = match op {
                    UnaryOp::Not => Opcode::Not,
                    UnaryOp::Neg => Opcode::Neg,
                };
                let operand = self.lower_expression(operand);
                let temp = self.new_temp();
                self.emit(Instruction::unary(opcode, temp, operand));
                Operand::Temp(temp)
            }
        }
    }

    fn lower_binary(&mut self, opcode: Opcode, left: &Expr, right: &Expr) -> Operand {
        let left = self.lower_expression(left);
        let right = self.lower_expression(right);
        let temp = self.new_temp();
        self.emit(Instruction::binary(opcode, temp, left, right));
        Operand::Temp(temp)
    }
}
