// cfront: scan and parse a C source file, reporting diagnostics

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser as ClapParser;
use tracing_subscriber::EnvFilter;

use cfront::{parse, ScanOptions, Scanner};

#[derive(ClapParser, Debug)]
#[command(name = "cfront")]
#[command(about = "Scan and parse a C source file and report diagnostics")]
struct Args {
    /// Path to the C source file
    file: PathBuf,

    /// Emit whitespace tokens while scanning
    #[arg(long)]
    keep_whitespace: bool,

    /// Do not print the summary line
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let args = Args::parse();

    let source = match fs::read_to_string(&args.file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: cannot read '{}': {}", args.file.display(), e);
            process::exit(1);
        }
    };

    let options = ScanOptions {
        keep_whitespace: args.keep_whitespace,
    };
    let (tokens, lex_errors) = Scanner::with_options(&source, options).scan();
    let (program, parse_errors) = parse(&tokens);

    for error in &lex_errors {
        eprintln!("{}", error);
    }
    for error in &parse_errors {
        eprintln!("{}", error);
    }

    if !args.quiet {
        eprintln!(
            "{}: {} tokens, {} declarations, {} lexical errors, {} syntax errors",
            args.file.display(),
            tokens.len(),
            program.declaration_count(),
            lex_errors.len(),
            parse_errors.len()
        );
    }

    if !lex_errors.is_empty() || !parse_errors.is_empty() {
        process::exit(1);
    }
}
