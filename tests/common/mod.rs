//! Reference evaluators shared by the integration tests.
//!
//! `interpret` walks the AST directly; `execute` runs lowered three-address
//! code. Agreement between the two checks lowering without needing a C
//! compiler. Both stop after a fixed step budget so a broken loop cannot hang
//! the test suite.

#![allow(dead_code)]

use std::collections::HashMap;
use taco_compiler::ast::{BinOp, CmpOp, Expr, LogicOp, Stmt, UnaryOp};
use taco_compiler::compiler::compile_source;
use taco_compiler::tac::{Instruction, Opcode, Operand};

const STEP_LIMIT: usize = 100_000;

fn truth(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

fn literal(text: &str) -> f64 {
    match text {
        "true" => 1.0,
        "false" => 0.0,
        _ => text.parse().expect("numeric literal"),
    }
}

fn arithmetic(op: BinOp, a: f64, b: f64) -> f64 {
    match op {
        BinOp::Add => a + b,
        BinOp::Sub => a - b,
        BinOp::Mul => a * b,
        BinOp::Div => a / b,
        BinOp::Mod => a % b,
    }
}

fn compare(op: CmpOp, a: f64, b: f64) -> f64 {
    truth(match op {
        CmpOp::Lt => a < b,
        CmpOp::Gt => a > b,
        CmpOp::LtE => a <= b,
        CmpOp::GtE => a >= b,
        CmpOp::Eq => a == b,
        CmpOp::NotEq => a != b,
    })
}

struct Interpreter {
    vars: HashMap<String, f64>,
    output: Vec<f64>,
    steps: usize,
}

impl Interpreter {
    fn tick(&mut self) {
        self.steps += 1;
        assert!(self.steps < STEP_LIMIT, "interpreter step limit exceeded");
    }

    fn eval(&self, expr: &Expr) -> f64 {
        match expr {
            Expr::Number(text) => literal(text),
            Expr::Bool(value) => truth(*value),
            Expr::Identifier(name) => self.vars.get(name).copied().unwrap_or(0.0),
            Expr::BinaryOp { op, left, right } => {
                arithmetic(*op, self.eval(left), self.eval(right))
            }
            Expr::Comparison { op, left, right } => {
                compare(*op, self.eval(left), self.eval(right))
            }
            Expr::LogicalOp { op, left, right } => {
                let (a, b) = (self.eval(left) != 0.0, self.eval(right) != 0.0);
                truth(match op {
                    LogicOp::And => a && b,
                    LogicOp::Or => a || b,
                })
            }
            Expr::UnaryOp { op, operand } => {
                let value = self.eval(operand);
                match op {
                    UnaryOp::Not => truth(value == 0.0),
                    UnaryOp::Neg => -value,
                }
            }
        }
    }

    fn run(&mut self, stmt: &Stmt) {
        self.tick();
        match stmt {
            Stmt::Assign { target, value } => {
                let value = self.eval(value);
                self.vars.insert(target.clone(), value);
            }
            Stmt::Print(expr) => {
                let value = self.eval(expr);
                self.output.push(value);
            }
            Stmt::Block(stmts) => stmts.iter().for_each(|s| self.run(s)),
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.eval(condition) != 0.0 {
                    self.run(then_branch);
                } else if let Some(else_branch) = else_branch {
                    self.run(else_branch);
                }
            }
            Stmt::While { condition, body } => {
                while self.eval(condition) != 0.0 {
                    self.tick();
                    self.run(body);
                }
            }
            Stmt::For {
                init,
                condition,
                update,
                body,
            } => {
                if let Some(init) = init {
                    self.run(init);
                }
                while condition.as_ref().map_or(true, |c| self.eval(c) != 0.0) {
                    self.tick();
                    self.run(body);
                    if let Some(update) = update {
                        self.run(update);
                    }
                }
            }
        }
    }
}

/// Values printed by running `stmts` directly.
pub fn interpret(stmts: &[Stmt]) -> Vec<f64> {
    let mut interpreter = Interpreter {
        vars: HashMap::new(),
        output: Vec::new(),
        steps: 0,
    };
    for stmt in stmts {
        interpreter.run(stmt);
    }
    interpreter.output
}

/// Values printed by executing lowered three-address code.
pub fn execute(tac: &[Instruction]) -> Vec<f64> {
    let labels: HashMap<&Operand, usize> = tac
        .iter()
        .enumerate()
        .filter(|(_, i)| i.opcode == Opcode::Label)
        .map(|(index, i)| (i.result.as_ref().expect("label operand"), index))
        .collect();

    let mut slots: HashMap<Operand, f64> = HashMap::new();
    let read = |slots: &HashMap<Operand, f64>, operand: &Option<Operand>| -> f64 {
        match operand.as_ref().expect("operand") {
            Operand::Literal(text) => literal(text),
            other => slots.get(other).copied().unwrap_or(0.0),
        }
    };

    let mut output = Vec::new();
    let mut pc = 0;
    let mut steps = 0;
    while pc < tac.len() {
        steps += 1;
        assert!(steps < STEP_LIMIT, "TAC step limit exceeded");

        let instruction = &tac[pc];
        pc += 1;
        let a = || read(&slots, &instruction.arg1);
        let b = || read(&slots, &instruction.arg2);
        let value = match instruction.opcode {
            Opcode::Add => a() + b(),
            Opcode::Sub => a() - b(),
            Opcode::Mul => a() * b(),
            Opcode::Div => a() / b(),
            Opcode::Mod => a() % b(),
            Opcode::Neg => -a(),
            Opcode::Lt => truth(a() < b()),
            Opcode::Gt => truth(a() > b()),
            Opcode::Le => truth(a() <= b()),
            Opcode::Ge => truth(a() >= b()),
            Opcode::Eq => truth(a() == b()),
            Opcode::Ne => truth(a() != b()),
            Opcode::And => truth(a() != 0.0 && b() != 0.0),
            Opcode::Or => truth(a() != 0.0 || b() != 0.0),
            Opcode::Not => truth(a() == 0.0),
            Opcode::Assign => a(),
            Opcode::Label | Opcode::Nop => continue,
            Opcode::Goto => {
                pc = labels[instruction.result.as_ref().expect("label")];
                continue;
            }
            Opcode::IfFalse => {
                if a() == 0.0 {
                    pc = labels[instruction.result.as_ref().expect("label")];
                }
                continue;
            }
            Opcode::Print => {
                output.push(a());
                continue;
            }
        };
        let target = instruction.result.clone().expect("result operand");
        slots.insert(target, value);
    }
    output
}

/// Compiles `source` and checks that the lowered program prints exactly what
/// the AST interpreter prints. Returns the printed values.
pub fn assert_lowering_agrees(source: &str) -> Vec<f64> {
    let artifacts = compile_source(source);
    assert!(
        artifacts.parse_errors.is_empty(),
        "unexpected parse errors: {:?}",
        artifacts.parse_errors
    );
    let expected = interpret(&artifacts.statements);
    let actual = execute(&artifacts.tac);
    assert_eq!(actual, expected, "TAC output differs from AST evaluation");
    expected
}
