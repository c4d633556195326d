//! Compiler Module
//!
//! Drives one compilation through the pipeline and keeps what each stage
//! produced.
//!
//! ## Architecture
//! - `Session`: owns the lowering and code generation state for one program
//! - `timing`: per-stage wall-clock measurements and their report

pub mod timing;

use crate::ast::Stmt;
use crate::codegen::CCodeGenerator;
use crate::error::CompileError;
use crate::lexer::lex;
use crate::lowering::TacGenerator;
use crate::parser::{parse_program, ParseError};
use crate::tac::Instruction;
use crate::token::Token;
use std::fs;
use std::path::Path;
use std::time::Instant;
use timing::StageTiming;
use tracing::{debug, info};

/// Source file extension accepted by the command line driver.
pub const SOURCE_EXTENSION: &str = "taco";

/// Everything a compilation produced, stage by stage.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub tokens: Vec<Token>,
    pub statements: Vec<Stmt>,
    pub parse_errors: Vec<ParseError>,
    pub tac: Vec<Instruction>,
    pub c_code: String,
}

/// One compilation context. Counters and collected names live in the
/// generators owned here, so independent sessions never share state.
#[derive(Debug, Default)]
pub struct Session {
    lowering: TacGenerator,
    codegen: CCodeGenerator,
    timings: Vec<StageTiming>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs lexing, parsing, lowering and C generation over `source`.
    ///
    /// Parse diagnostics do not stop the pipeline; whatever parsed is lowered
    /// and emitted, and the diagnostics are returned alongside.
    pub fn compile(&mut self, source: &str) -> Artifacts {
        self.timings.clear();

        let start = Instant::now();
        let tokens = lex(source);
        self.record("Lexical analysis", start);

        let start = Instant::now();
        let parsed = parse_program(&tokens);
        self.record("Syntax analysis", start);

        let start = Instant::now();
        let tac = self.lowering.generate(&parsed.statements);
        self.record("TAC generation", start);

        let start = Instant::now();
        let c_code = self.codegen.generate(&tac);
        self.record("C code generation", start);

        info!(
            tokens = tokens.len(),
            statements = parsed.statements.len(),
            parse_errors = parsed.errors.len(),
            instructions = tac.len(),
            "compilation finished"
        );

        Artifacts {
            tokens,
            statements: parsed.statements,
            parse_errors: parsed.errors,
            tac,
            c_code,
        }
    }

    pub fn timings(&self) -> &[StageTiming] {
        &self.timings
    }

    pub fn timing_report(&self) -> String {
        timing::report(&self.timings)
    }

    fn record(&mut self, stage: &'static str, start: Instant) {
        let timing = StageTiming::new(stage, start.elapsed());
        debug!(stage, elapsed_ms = timing.millis(), "stage finished");
        self.timings.push(timing);
    }
}

/// Compiles `source` with a fresh [`Session`].
pub fn compile_source(source: &str) -> Artifacts {
    Session::new().compile(source)
}

/// Reads a source file, insisting on the `.taco` extension.
pub fn read_source(path: &Path) -> Result<String, CompileError> {
    if path.extension().and_then(|ext| ext.to_str()) != Some(SOURCE_EXTENSION) {
        return Err(CompileError::InvalidExtension {
            path: path.to_path_buf(),
            expected: SOURCE_EXTENSION,
        });
    }
    fs::read_to_string(path).map_err(|source| CompileError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes generated C to `path`.
pub fn write_output(path: &Path, c_code: &str) -> Result<(), CompileError> {
    fs::write(path, c_code).map_err(|source| CompileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = c_code.len(), "wrote C output");
    Ok(())
}
