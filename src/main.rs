//! `tacoc`: compiles a `.taco` program to C and optionally to a native binary.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use taco_compiler::compiler::{read_source, write_output, Session};
use taco_compiler::energy::EnergyModel;
use taco_compiler::error::display_parse_error;
use taco_compiler::toolchain::Toolchain;
use taco_compiler::{ast, tac, token};
use tracing::{warn, Level};

#[derive(Parser)]
#[command(name = "tacoc")]
#[command(version)]
#[command(about = "TACO Compiler - Three-Address Code Compiler", long_about = None)]
struct Cli {
    /// Source file to compile
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output C file
    #[arg(short, long, value_name = "FILE", default_value = "output.c")]
    output: PathBuf,

    /// Show token stream
    #[arg(long)]
    tokens: bool,

    /// Show abstract syntax tree
    #[arg(long)]
    ast: bool,

    /// Show three-address code
    #[arg(long)]
    tac: bool,

    /// Show energy consumption report
    #[arg(long)]
    energy: bool,

    /// Show energy cost table
    #[arg(long)]
    energy_table: bool,

    /// Show time spent in each stage
    #[arg(long)]
    timings: bool,

    /// Also build a native executable with the C compiler
    #[arg(long, value_name = "EXE")]
    native: Option<PathBuf>,

    /// C compiler to use for --native
    #[arg(long, value_name = "PATH", env = "TACO_CC")]
    cc: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Write logs to a file instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<()> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level);

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let source = read_source(&cli.input)?;
    let filename = cli.input.display().to_string();
    println!("Compiling: {}\n", filename);

    let mut session = Session::new();
    let artifacts = session.compile(&source);

    for error in &artifacts.parse_errors {
        if let Err(e) = display_parse_error(&source, &filename, error) {
            warn!("could not render diagnostic: {}", e);
            eprintln!("{}", error);
        }
    }

    if cli.tokens {
        println!("=== TOKENS ===");
        print!("{}", token::dump_tokens(&artifacts.tokens));
        println!();
    }

    if cli.ast {
        println!("=== ABSTRACT SYNTAX TREE ===");
        print!("{}", ast::dump_ast(&artifacts.statements));
        println!();
    }

    if cli.tac {
        println!("=== THREE-ADDRESS CODE ===");
        print!("{}", tac::dump_tac(&artifacts.tac));
        println!();
    }

    let energy = EnergyModel::new();
    if cli.energy_table {
        println!("{}", energy.table());
    }
    if cli.energy {
        println!("{}", energy.report(&artifacts.tac));
    }

    write_output(&cli.output, &artifacts.c_code)?;
    println!("C code written to: {}", cli.output.display());

    if let Some(exe) = &cli.native {
        let toolchain = match &cli.cc {
            Some(cc) => Toolchain::with_compiler(cc)?,
            None => Toolchain::detect()?,
        };
        let output = toolchain
            .build(&cli.output, exe)
            .with_context(|| format!("building {}", exe.display()))?;
        if !output.warnings.is_empty() {
            eprintln!("{}", output.warnings);
        }
        println!("Executable written to: {}", exe.display());
    }

    println!("\n=== COMPILATION SUMMARY ===");
    println!("Tokens: {}", artifacts.tokens.len());
    println!("AST nodes: {}", artifacts.statements.len());
    println!("TAC instructions: {}", artifacts.tac.len());
    println!("Parse errors: {}", artifacts.parse_errors.len());
    println!(
        "Estimated energy cost: {:.2} units",
        energy.program_energy(&artifacts.tac)
    );

    if cli.timings {
        println!();
        print!("{}", session.timing_report());
    }

    Ok(())
}
