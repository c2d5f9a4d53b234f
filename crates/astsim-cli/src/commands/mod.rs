pub mod compare;
pub mod tokens;

use std::process;

use astsim_core::error::GrammarError;
use astsim_core::Grammar;
use colored::Colorize;

/// Explicit `--lang` wins, then the file extension, then Python.
pub fn resolve_grammar(lang: Option<&str>, file_path: &str) -> Result<Grammar, GrammarError> {
    match lang {
        Some(lang) => lang.parse(),
        None => Ok(Grammar::from_path(file_path).unwrap_or(Grammar::Python)),
    }
}

pub fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{}", format!("Error: {message}").red());
    process::exit(1);
}

pub fn read_source(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => fail(format_args!("cannot read {path}: {e}")),
    }
}
