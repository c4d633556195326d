use std::path::Path;
use taco_compiler::compiler::{compile_source, read_source};
use taco_compiler::error::{write_parse_error, CompileError};

#[test]
fn test_parse_error_report_points_at_token() {
    let source = "x = 1;\nprint(x;\n";
    let artifacts = compile_source(source);
    assert_eq!(artifacts.parse_errors.len(), 1);

    let mut out = Vec::new();
    write_parse_error(source, "demo.taco", &artifacts.parse_errors[0], &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Parse error: Expected ')' after print argument, found ';'"));
    assert!(text.contains("demo.taco"));
    assert!(text.contains("2:8"));
}

#[test]
fn test_parse_error_at_end_of_input() {
    let source = "while (x";
    let artifacts = compile_source(source);
    assert_eq!(artifacts.parse_errors.len(), 1);

    let mut out = Vec::new();
    write_parse_error(source, "eof.taco", &artifacts.parse_errors[0], &mut out).unwrap();
    assert!(String::from_utf8(out).unwrap().contains("end of input"));
}

#[test]
fn test_source_extension_is_checked() {
    let result = read_source(Path::new("program.txt"));
    assert!(matches!(result, Err(CompileError::InvalidExtension { .. })));
}

#[test]
fn test_missing_source_is_an_io_error() {
    let result = read_source(Path::new("definitely/not/here.taco"));
    assert!(matches!(result, Err(CompileError::Io { .. })));
}

#[test]
fn test_statements_after_errors_still_compile() {
    let artifacts = compile_source("x = ; ) y = 2; print(y);");
    assert_eq!(artifacts.statements.len(), 2);
    assert!(artifacts.c_code.contains("printf(\"%.17g\\n\", y);"));
}
