//! Subcommand implementations.

use std::io::{self, BufRead, Write};
use std::path::Path;

use evo_eval::{Interpreter, InterpreterConfig};
use evo_parser::{Parser, ParserConfig};
use evo_types::{EvoError, SourceFile};

/// Environment variable that turns on the extended grammar.
pub const NLU_ENV_VAR: &str = "EVO_NLU";

/// Build a config from the value of [`NLU_ENV_VAR`] and the `--nlu` flag.
pub fn config_from(nlu_env: Option<&str>, nlu_flag: bool) -> InterpreterConfig {
    let env_enabled = matches!(nlu_env.map(str::trim), Some("1" | "true" | "yes" | "on"));
    InterpreterConfig {
        parser: ParserConfig {
            enable_nlu: nlu_flag || env_enabled,
        },
    }
}

/// Render an error with the offending line and a caret marker.
pub fn render_error(err: &EvoError, source: &SourceFile) -> String {
    let mut out = format!("error[{}]: {}", err.code, err.message);
    if let Some(span) = err.span {
        out.push_str(&format!("\n  --> {}:{}", source.name, span));
        if let Some(marked) = source.underline(span) {
            for line in marked.lines() {
                out.push_str("\n   | ");
                out.push_str(line);
            }
        }
    }
    out
}

/// `evo run <file>`: execute every top-level form, print the last value.
pub fn run_file(path: &str, config: InterpreterConfig) -> Result<(), String> {
    let text = std::fs::read_to_string(Path::new(path))
        .map_err(|e| format!("error: cannot read '{path}': {e}"))?;
    let source = SourceFile::new(path, text);
    let mut interp = Interpreter::with_config(config);
    match interp.run(&source.source) {
        Ok(Some(value)) => {
            println!("{value}");
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(err) => Err(render_error(&err, &source)),
    }
}

/// `evo eval <expr>`: evaluate one expression in a fresh environment.
pub fn eval_expr(expr: &str, config: InterpreterConfig) -> Result<String, String> {
    let source = SourceFile::new("<expr>", expr);
    Interpreter::with_config(config)
        .execute(expr)
        .map_err(|err| render_error(&err, &source))
}

/// `evo parse <expr>`: print the AST as JSON without evaluating.
pub fn parse_expr(expr: &str, config: ParserConfig) -> Result<String, String> {
    let source = SourceFile::new("<expr>", expr);
    let ast = Parser::new(config)
        .parse(expr)
        .map_err(|err| render_error(&err, &source))?;
    serde_json::to_string_pretty(&ast).map_err(|e| format!("error: {e}"))
}

/// Line-oriented session: each non-blank line is one `execute` call on a
/// single interpreter. Results go to `output`, errors to `errors`.
pub fn repl(
    input: impl BufRead,
    mut output: impl Write,
    mut errors: impl Write,
    config: InterpreterConfig,
) -> io::Result<()> {
    let mut interp = Interpreter::with_config(config);
    for (index, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match interp.execute(&line) {
            Ok(rendered) => writeln!(output, "{rendered}")?,
            Err(err) => {
                let source = SourceFile::new(format!("<stdin:{}>", index + 1), line.as_str());
                writeln!(errors, "{}", render_error(&err, &source))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn repl_output(input: &str) -> (String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        repl(input.as_bytes(), &mut out, &mut err, InterpreterConfig::default()).unwrap();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_repl_keeps_definitions() {
        let (out, err) = repl_output("(def add (x y) (+ x y))\n\n(add 3 4)\n");
        assert_eq!(out, "#<function add/2>\n7\n");
        assert_eq!(err, "");
    }

    #[test]
    fn test_repl_reports_errors_and_continues() {
        let (out, err) = repl_output("(/ 1 0)\n(+ 1 1)\n");
        assert_eq!(out, "2\n");
        assert!(err.starts_with("error[E303]: division by zero"), "{err}");
        assert!(err.contains("<stdin:1>:1:1"), "{err}");
    }

    #[test]
    fn test_render_error_underlines() {
        let source = SourceFile::new("t.evo", "(+ 1 foo)");
        let err = Interpreter::new().execute("(+ 1 foo)").unwrap_err();
        assert_eq!(
            render_error(&err, &source),
            "error[E300]: unbound symbol 'foo'\n  --> t.evo:1:6\n   | (+ 1 foo)\n   |      ^^^"
        );
    }

    #[test]
    fn test_config_from_env_and_flag() {
        assert!(!config_from(None, false).parser.enable_nlu);
        assert!(config_from(Some("1"), false).parser.enable_nlu);
        assert!(!config_from(Some("0"), false).parser.enable_nlu);
        assert!(config_from(None, true).parser.enable_nlu);
    }

    #[test]
    fn test_eval_and_parse_commands() {
        assert_eq!(eval_expr("(* 6 7)", InterpreterConfig::default()), Ok("42".to_string()));
        let json = parse_expr("+ 1 2", ParserConfig { enable_nlu: true }).unwrap();
        assert!(json.contains("\"call\""), "{json}");
    }
}
