//! Evo command-line interface.
//!
//! ```text
//! evo                    line-oriented session on stdin
//! evo run <file>         execute every form in a file, print the last value
//! evo eval <expr>        evaluate one expression
//! evo parse <expr>       print the AST as JSON
//! ```
//!
//! `--nlu` or `EVO_NLU=1` enables the extended grammar. Set `RUST_LOG`
//! (e.g. `RUST_LOG=evo_eval=trace`) for diagnostic output on stderr.

mod commands;

use std::io;
use std::process::ExitCode;
use std::sync::Once;

use commands::{config_from, eval_expr, parse_expr, repl, run_file, NLU_ENV_VAR};

static TRACING_INIT: Once = Once::new();

/// Install a subscriber, only if `RUST_LOG` is set.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}

fn print_usage() {
    eprintln!("Evo expression engine {}", env!("CARGO_PKG_VERSION"));
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  evo                  Read expressions from stdin, one per line");
    eprintln!("  evo run <file>       Execute every form in <file>");
    eprintln!("  evo eval <expr>      Evaluate a single expression");
    eprintln!("  evo parse <expr>     Print the AST of <expr> as JSON");
    eprintln!("  evo version          Print the version");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --nlu                Enable the extended grammar (also {NLU_ENV_VAR}=1)");
}

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let nlu_flag = args.iter().any(|a| a == "--nlu");
    let positional: Vec<&str> = args
        .iter()
        .filter(|a| !a.starts_with("--"))
        .map(String::as_str)
        .collect();
    let config = config_from(std::env::var(NLU_ENV_VAR).ok().as_deref(), nlu_flag);
    tracing::debug!(?config, "starting");

    let result = match positional.as_slice() {
        [] => {
            let stdin = io::stdin();
            repl(stdin.lock(), io::stdout(), io::stderr(), config)
                .map_err(|e| format!("error: {e}"))
        }
        ["run", path] => run_file(path, config),
        ["eval", expr] => eval_expr(expr, config).map(|out| println!("{out}")),
        ["parse", expr] => parse_expr(expr, config.parser).map(|out| println!("{out}")),
        ["version"] => {
            println!("evo {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        ["help"] => {
            print_usage();
            Ok(())
        }
        _ => {
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}
