//! Compiler driver: wires the lexer, parser, and code generator into the
//! `faxc` command-line tool.
//!
//! Single source file in, NASM assembly text out. Diagnostics from every
//! stage land on a single shared [`Handler`]; the driver only decides what
//! to do once the pipeline finishes — write assembly if nothing went wrong,
//! render diagnostics and fail otherwise.

pub mod error;
pub mod render;

use std::fs;
use std::io::{IsTerminal, Write};
use std::path::PathBuf;

use clap::Parser as ClapParser;
use tracing::debug;

use faxc_gen::CodeGenerator;
use faxc_lex::Lexer;
use faxc_par::Parser;
use faxc_util::span::SourceMap;
use faxc_util::Handler;

pub use error::{DriverError, Result};

/// Compiles a C-subset source file straight to x86-64 NASM assembly.
#[derive(ClapParser, Debug)]
#[command(name = "faxc")]
#[command(author, version, about = "Compiles a C subset to x86-64 NASM assembly", long_about = None)]
pub struct Cli {
    /// Source file to compile.
    pub source: PathBuf,

    /// Write assembly here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Enable debug-level logging on stderr.
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable ANSI colour in diagnostics and logs.
    #[arg(long)]
    pub no_color: bool,

    /// Print the lexed token stream to stderr and stop before parsing.
    #[arg(long)]
    pub emit_tokens: bool,

    /// Print a textual AST dump to stderr and stop before code generation.
    #[arg(long)]
    pub emit_ast: bool,
}

impl Cli {
    fn color_enabled(&self) -> bool {
        !self.no_color && std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal()
    }
}

/// Installs a `tracing-subscriber` writer on stderr. Idempotent — safe to
/// call from both `main` and tests that construct their own `Cli`.
/// `RUST_LOG` always wins when set; otherwise the filter is `info`, raised
/// to `debug` by `-v`/`--verbose`.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}

/// Runs the full pipeline for `cli`. Assembly is only written once lexing,
/// parsing, *and* code generation all finished without a diagnostic — a
/// non-zero exit never leaves a partial assembly file behind.
pub fn run(cli: &Cli) -> Result<()> {
    let source_text = fs::read_to_string(&cli.source).map_err(|source| DriverError::ReadSource {
        path: cli.source.clone(),
        source,
    })?;

    let display_name = cli.source.display().to_string();
    let mut source_map = SourceMap::new();
    let file_id = source_map.add_file(display_name.clone(), source_text.clone());
    let file = source_map.get(file_id).expect("file was just inserted above");

    let handler = Handler::new();

    debug!(file = %display_name, bytes = source_text.len(), "lexing");
    let tokens = Lexer::new(&source_text, &handler).tokenize();

    if cli.emit_tokens {
        for token in &tokens {
            eprintln!("{token:?}");
        }
        return report_and_exit(&handler, &file, cli.color_enabled());
    }

    debug!(tokens = tokens.len(), "parsing");
    let program = Parser::new(tokens, &handler).parse_program();

    if cli.emit_ast {
        for stmt in &program {
            eprintln!("{stmt:#?}");
        }
        return report_and_exit(&handler, &file, cli.color_enabled());
    }

    let assembly = if handler.has_errors() {
        None
    } else {
        debug!(statements = program.len(), "generating code");
        Some(CodeGenerator::new(&handler).generate(&program)?)
    };

    let use_color = cli.color_enabled();
    for diagnostic in handler.diagnostics() {
        eprint!("{}", render::render(&diagnostic, &file, use_color));
    }

    match assembly {
        Some(text) if !handler.has_errors() => {
            write_output(cli.output.as_deref(), &text)?;
            Ok(())
        }
        _ => Err(DriverError::CompilationFailed { error_count: handler.error_count() }),
    }
}

/// Shared tail for the `--emit-tokens`/`--emit-ast` debug dumps: these exit
/// right after their stage instead of reaching code generation, but still
/// surface whatever diagnostics that stage collected.
fn report_and_exit(handler: &Handler, file: &faxc_util::span::SourceFile, use_color: bool) -> Result<()> {
    for diagnostic in handler.diagnostics() {
        eprint!("{}", render::render(&diagnostic, file, use_color));
    }
    if handler.has_errors() {
        Err(DriverError::CompilationFailed { error_count: handler.error_count() })
    } else {
        Ok(())
    }
}

fn write_output(path: Option<&std::path::Path>, text: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, text).map_err(|source| DriverError::WriteOutput {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(text.as_bytes()).map_err(|source| DriverError::WriteOutput {
                path: PathBuf::from("<stdout>"),
                source,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_source(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".c").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn base_cli(source: PathBuf, output: Option<PathBuf>) -> Cli {
        Cli {
            source,
            output,
            verbose: false,
            no_color: true,
            emit_tokens: false,
            emit_ast: false,
        }
    }

    #[test]
    fn literal_return_compiles_clean() {
        let source = write_source("return 42;\n");
        let output = tempfile::NamedTempFile::new().unwrap();
        let cli = base_cli(source.path().to_path_buf(), Some(output.path().to_path_buf()));
        run(&cli).unwrap();
        let asm = fs::read_to_string(output.path()).unwrap();
        assert!(asm.contains("section .text"));
        assert!(asm.contains("global _start"));
        assert!(asm.contains("mov rax, 42"));
    }

    #[test]
    fn undeclared_variable_fails_and_reports() {
        let source = write_source("int a = b;\n");
        let output = tempfile::NamedTempFile::new().unwrap();
        let cli = base_cli(source.path().to_path_buf(), Some(output.path().to_path_buf()));
        let err = run(&cli).unwrap_err();
        assert!(matches!(err, DriverError::CompilationFailed { error_count: 1 }));
        assert_eq!(fs::read_to_string(output.path()).unwrap(), "");
    }

    #[test]
    fn missing_source_file_is_a_read_error() {
        let cli = base_cli(PathBuf::from("/no/such/file.c"), None);
        assert!(matches!(run(&cli), Err(DriverError::ReadSource { .. })));
    }

    #[test]
    fn emit_tokens_stops_before_parsing_and_succeeds_on_clean_input() {
        let source = write_source("return 42;\n");
        let mut cli = base_cli(source.path().to_path_buf(), None);
        cli.emit_tokens = true;
        run(&cli).unwrap();
    }

    #[test]
    fn emit_ast_reports_undeclared_variable_without_reaching_codegen() {
        let source = write_source("int a = b;\n");
        let mut cli = base_cli(source.path().to_path_buf(), None);
        cli.emit_ast = true;
        let err = run(&cli).unwrap_err();
        assert!(matches!(err, DriverError::CompilationFailed { error_count: 1 }));
    }
}
