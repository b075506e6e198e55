//! ferritec-drv - Compiler Driver
//!
//! ============================================================================
//! COMPILER DRIVER OVERVIEW
//! ============================================================================
//!
//! The driver is the entry point and orchestrator for the front end
//! pipeline. It is responsible for:
//!
//! 1. COMMAND LINE PARSING
//!    - Parse the positional source argument and phase-toggle flags
//!    - Validate options
//!    - Build a `Config`
//!
//! 2. FILE MANAGEMENT
//!    - Read the source file, or stdin when none is given
//!
//! 3. PIPELINE ORCHESTRATION
//!    - Run lexing, parsing, and (optionally) semantic analysis in order
//!    - Stop early when a phase toggle asks for it
//!
//! 4. ERROR REPORTING
//!    - Collect every diagnostic through one `Handler`
//!    - Format and print them
//!    - Exit with the appropriate code
//!
//! ============================================================================
//! PIPELINE
//! ============================================================================
//!
//! ```text
//! Source (file or stdin)
//!        |
//!        v
//!   [Lexer]   --> Token stream      (--emit-tokens stops here)
//!        |
//!        v
//!   [Parser]  --> AST               (--emit-ast stops here)
//!        |
//!        v
//!   [Semantic Analyzer] --> Symbol table   (skipped by --no-sem)
//! ```
//!
//! ============================================================================
//! COMMAND LINE INTERFACE
//! ============================================================================
//!
//! USAGE:
//!
//! Compile a file:
//!   ferritec main.fe
//!
//! Read from stdin:
//!   ferritec
//!   ferritec -
//!
//! Stop after a phase:
//!   ferritec --emit-tokens main.fe     # lexer output only
//!   ferritec --emit-ast main.fe        # parser output only
//!   ferritec --no-sem main.fe          # parse, skip semantic analysis
//!
//! Diagnostics:
//!   ferritec --warnings-as-errors main.fe
//!   ferritec --verbose main.fe
//!
//! ============================================================================
//! ERROR HANDLING
//! ============================================================================
//!
//! Severities: Critical, Error, Warning, Note, Help (`ferritec_util::Level`).
//! Every phase keeps reporting into the same `Handler` instead of aborting,
//! so one run surfaces every diagnostic it can find.
//!
//! Exit codes:
//! - 0: success
//! - 1: compilation error (including warnings promoted by `--warnings-as-errors`)
//! - 2: internal error (I/O failure, bad arguments)

use std::io::Read as _;
use std::path::PathBuf;

use ferritec_util::{FileId, Handler, SourceMap};

/// Compiler configuration, built from command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Source file path. `None` (or `-`) means "read stdin".
    pub input_file: Option<PathBuf>,
    /// Dump the token stream and stop.
    pub emit_tokens: bool,
    /// Dump the parsed AST (canonical string form) and stop.
    pub emit_ast: bool,
    /// Skip semantic analysis.
    pub no_sem: bool,
    /// Promote warnings to failures.
    pub warnings_as_errors: bool,
    /// Echo per-phase diagnostic counts.
    pub verbose: bool,
}

impl Config {
    /// Parse arguments the way `faxc-drv` does: by hand, no `clap`.
    pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Config, DriverError> {
        let mut config = Config::default();
        for arg in args {
            match arg.as_str() {
                "--emit-tokens" => config.emit_tokens = true,
                "--emit-ast" => config.emit_ast = true,
                "--no-sem" => config.no_sem = true,
                "--warnings-as-errors" => config.warnings_as_errors = true,
                "--verbose" => config.verbose = true,
                "-" => {}
                other if other.starts_with("--") => {
                    return Err(DriverError::UnknownFlag(other.to_string()));
                }
                other => {
                    if config.input_file.is_some() {
                        return Err(DriverError::MultipleSourceFiles);
                    }
                    config.input_file = Some(PathBuf::from(other));
                }
            }
        }
        Ok(config)
    }
}

/// Driver-level error: I/O and argument failures, not diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("unknown flag: {0}")]
    UnknownFlag(String),
    #[error("at most one source file may be given")]
    MultipleSourceFiles,
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A compilation session: configuration, loaded source, and the shared
/// diagnostic handler every phase reports into.
pub struct Session {
    pub config: Config,
    pub sources: SourceMap,
    pub handler: Handler,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            sources: SourceMap::new(),
            handler: Handler::new(),
        }
    }

    /// Read the configured source (file, or stdin when none was given)
    /// and register it in the session's source map.
    fn read_source(&mut self) -> Result<(String, FileId), DriverError> {
        let (name, content) = match &self.config.input_file {
            Some(path) => {
                let content =
                    std::fs::read_to_string(path).map_err(|source| DriverError::Io {
                        path: path.display().to_string(),
                        source,
                    })?;
                (path.display().to_string(), content)
            }
            None => {
                let mut content = String::new();
                std::io::stdin()
                    .read_to_string(&mut content)
                    .map_err(|source| DriverError::Io {
                        path: "<stdin>".to_string(),
                        source,
                    })?;
                ("<stdin>".to_string(), content)
            }
        };
        let file_id = self.sources.add_file(name, content.clone());
        Ok((content, file_id))
    }

    /// Run the pipeline to completion and return the process exit code.
    pub fn run(&mut self) -> Result<i32, DriverError> {
        let (source, _file_id) = self.read_source()?;

        if self.config.verbose {
            eprintln!("lexing...");
        }

        if self.config.emit_tokens {
            self.emit_tokens(&source);
            return Ok(self.exit_code());
        }

        if self.config.verbose {
            eprintln!("parsing...");
        }

        let file = ferritec_par::parse(&source, &self.handler);

        if self.config.emit_ast {
            for stmt in &file.body {
                println!("{}", stmt.to_canonical_string());
            }
            return Ok(self.exit_code());
        }

        if !self.config.no_sem {
            if self.config.verbose {
                eprintln!("semantic analysis...");
            }
            let _ = ferritec_sem::analyze(&file, &self.handler);
        }

        if self.config.verbose {
            eprintln!(
                "{} error(s), {} warning(s)",
                self.handler.error_count(),
                self.handler.warning_count()
            );
        }

        self.report_diagnostics();
        Ok(self.exit_code())
    }

    fn emit_tokens(&self, source: &str) {
        let mut lexer = ferritec_lex::Lexer::new(source, &self.handler);
        while !lexer.done() {
            let token = lexer.consume();
            println!("{:?} {:?} {}:{}", token.kind, token.lexeme, token.line, token.column);
        }
        self.report_diagnostics();
    }

    fn report_diagnostics(&self) {
        for diag in self.handler.diagnostics() {
            self.report_diagnostic(&diag);
        }
    }

    fn report_diagnostic(&self, diag: &ferritec_util::Diagnostic) {
        let location = self
            .sources
            .format_span(diag.span)
            .unwrap_or_else(|| format!("{}:{}", diag.span.line, diag.span.column));
        eprintln!("{}: {}\n{}", diag.level, diag.message, location);
        for note in &diag.notes {
            eprintln!("  note: {note}");
        }
        for help in &diag.helps {
            eprintln!("  help: {help}");
        }
    }

    /// 0 success, 1 compilation error (including promoted warnings), 2
    /// reserved for internal/argument failures surfaced before `run`.
    fn exit_code(&self) -> i32 {
        if self.handler.had_critical_error() {
            return 2;
        }
        let fails = self.handler.has_errors()
            || (self.config.warnings_as_errors && self.handler.has_warnings());
        if fails {
            1
        } else {
            0
        }
    }
}

/// Entry point shared by `main.rs` and integration tests: parse
/// arguments, run the session, return the process exit code.
pub fn run(args: impl IntoIterator<Item = String>) -> i32 {
    let config = match Config::parse_args(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return 2;
        }
    };
    let mut session = Session::new(config);
    match session.run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {e}");
            2
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_phase_toggle_flags() {
        let config = Config::parse_args(
            ["--emit-tokens", "--verbose", "main.fe"].map(String::from),
        )
        .unwrap();
        assert!(config.emit_tokens);
        assert!(config.verbose);
        assert_eq!(config.input_file, Some(PathBuf::from("main.fe")));
    }

    #[test]
    fn rejects_unknown_flags() {
        let err = Config::parse_args(["--bogus"].map(String::from)).unwrap_err();
        assert!(matches!(err, DriverError::UnknownFlag(_)));
    }

    #[test]
    fn rejects_multiple_source_files() {
        let err = Config::parse_args(["a.fe", "b.fe"].map(String::from)).unwrap_err();
        assert!(matches!(err, DriverError::MultipleSourceFiles));
    }

    #[test]
    fn no_input_file_means_stdin() {
        let config = Config::parse_args(std::iter::empty()).unwrap();
        assert!(config.input_file.is_none());
    }

    #[test]
    fn exit_code_zero_on_clean_program() {
        let config = Config::default();
        let mut session = Session::new(config);
        session.sources.add_file("<test>", "let x: int32 = 1;".to_string());
        let file = ferritec_par::parse("let x: int32 = 1;", &session.handler);
        let _ = ferritec_sem::analyze(&file, &session.handler);
        assert_eq!(session.exit_code(), 0);
    }

    #[test]
    fn exit_code_one_on_semantic_error() {
        let config = Config::default();
        let session = Session::new(config);
        let file = ferritec_par::parse("let x: bool = 1;", &session.handler);
        let _ = ferritec_sem::analyze(&file, &session.handler);
        assert_eq!(session.exit_code(), 1);
    }

    #[test]
    fn warnings_as_errors_promotes_exit_code() {
        let config = Config {
            warnings_as_errors: true,
            ..Config::default()
        };
        let session = Session::new(config);
        let file = ferritec_par::parse(
            "let x: int32 = 1; func f() { let x: int32 = 2; }",
            &session.handler,
        );
        let _ = ferritec_sem::analyze(&file, &session.handler);
        assert!(session.handler.has_warnings());
        assert!(!session.handler.has_errors());
        assert_eq!(session.exit_code(), 1);
    }

}
