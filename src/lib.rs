pub mod ast;
pub mod codegen;
pub mod compiler;
pub mod energy;
pub mod error;
pub mod lexer;
pub mod lowering;
pub mod parser;
pub mod tac;
pub mod token;
pub mod toolchain;
