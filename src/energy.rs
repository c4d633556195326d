//! Static energy estimate over IR opcodes.
//!
//! Costs are arbitrary units loosely modelled on relative CPU instruction
//! latencies: a base cost for the operation plus a surcharge for touching
//! memory.

use crate::tac::{Instruction, Opcode};
use std::collections::BTreeMap;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyCost {
    pub base: f64,
    pub memory: f64,
    pub description: &'static str,
}

impl EnergyCost {
    fn new(base: f64, memory: f64, description: &'static str) -> Self {
        Self {
            base,
            memory,
            description,
        }
    }

    pub fn total(&self) -> f64 {
        self.base + self.memory
    }
}

/// Lookup table from opcode to cost.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnergyModel;

impl EnergyModel {
    pub fn new() -> Self {
        Self
    }

    pub fn cost(&self, opcode: Opcode) -> EnergyCost {
        match opcode {
            Opcode::Add => EnergyCost::new(1.0, 0.5, "Addition"),
            Opcode::Sub => EnergyCost::new(1.0, 0.5, "Subtraction"),
            Opcode::Mul => EnergyCost::new(3.0, 0.5, "Multiplication"),
            Opcode::Div => EnergyCost::new(20.0, 0.5, "Division"),
            Opcode::Mod => EnergyCost::new(20.0, 0.5, "Modulo"),
            Opcode::Neg => EnergyCost::new(1.0, 0.5, "Negation"),
            Opcode::Lt => EnergyCost::new(1.0, 0.5, "Less than"),
            Opcode::Gt => EnergyCost::new(1.0, 0.5, "Greater than"),
            Opcode::Le => EnergyCost::new(1.0, 0.5, "Less or equal"),
            Opcode::Ge => EnergyCost::new(1.0, 0.5, "Greater or equal"),
            Opcode::Eq => EnergyCost::new(1.0, 0.5, "Equality"),
            Opcode::Ne => EnergyCost::new(1.0, 0.5, "Inequality"),
            Opcode::And => EnergyCost::new(1.0, 0.5, "Logical AND"),
            Opcode::Or => EnergyCost::new(1.0, 0.5, "Logical OR"),
            Opcode::Not => EnergyCost::new(1.0, 0.5, "Logical NOT"),
            Opcode::Assign => EnergyCost::new(0.5, 0.5, "Assignment"),
            Opcode::Label => EnergyCost::new(0.0, 0.0, "Label"),
            Opcode::Goto => EnergyCost::new(5.0, 0.0, "Unconditional jump"),
            Opcode::IfFalse => EnergyCost::new(3.0, 0.5, "Conditional branch"),
            Opcode::Print => EnergyCost::new(10.0, 2.0, "Formatted output"),
            Opcode::Nop => EnergyCost::new(0.1, 0.0, "No operation"),
        }
    }

    pub fn instruction_cost(&self, instruction: &Instruction) -> f64 {
        self.cost(instruction.opcode).total()
    }

    pub fn program_energy(&self, tac: &[Instruction]) -> f64 {
        tac.iter().map(|i| self.instruction_cost(i)).sum()
    }

    /// Per-opcode breakdown of `tac`, followed by totals.
    pub fn report(&self, tac: &[Instruction]) -> String {
        let mut counts: BTreeMap<Opcode, usize> = BTreeMap::new();
        for instruction in tac {
            *counts.entry(instruction.opcode).or_default() += 1;
        }
        let total = self.program_energy(tac);

        let mut out = String::new();
        let _ = writeln!(out, "=== ENERGY CONSUMPTION REPORT ===");
        let _ = writeln!(out, "{}", "-".repeat(80));
        let _ = writeln!(
            out,
            "{:<25}{:<10}{:<15}{:<15}{:<15}",
            "Instruction Type", "Count", "Unit Cost", "Total Cost", "% of Total"
        );
        let _ = writeln!(out, "{}", "-".repeat(80));
        for (opcode, count) in &counts {
            let cost = self.cost(*opcode);
            let type_total = cost.total() * *count as f64;
            let share = if total > 0.0 {
                type_total / total * 100.0
            } else {
                0.0
            };
            let _ = writeln!(
                out,
                "{:<25}{:<10}{:<15.2}{:<15.2}{:<15.2}",
                cost.description,
                count,
                cost.total(),
                type_total,
                share
            );
        }
        let _ = writeln!(out, "{}", "-".repeat(80));

        let average = if tac.is_empty() {
            0.0
        } else {
            total / tac.len() as f64
        };
        let _ = writeln!(out, "Total instructions: {}", tac.len());
        let _ = writeln!(out, "Total energy cost: {:.2} units", total);
        let _ = writeln!(out, "Average cost per instruction: {:.2} units", average);
        out
    }

    /// The full cost table, one row per opcode.
    pub fn table(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== ENERGY COST TABLE ===");
        let _ = writeln!(
            out,
            "{:<10}{:<22}{:<12}{:<12}{:<12}",
            "Opcode", "Operation", "Base Cost", "Mem Cost", "Total"
        );
        let _ = writeln!(out, "{}", "-".repeat(68));
        for opcode in Opcode::ALL {
            let cost = self.cost(opcode);
            let _ = writeln!(
                out,
                "{:<10}{:<22}{:<12.2}{:<12.2}{:<12.2}",
                opcode.name(),
                cost.description,
                cost.base,
                cost.memory,
                cost.total()
            );
        }
        out
    }
}
