use astsim_core::tokenizer::try_extract_leaf_tokens;
use colored::Colorize;

use super::{fail, read_source, resolve_grammar};

pub struct TokensOptions {
    pub file: String,
    pub lang: Option<String>,
}

pub fn tokens_command(opts: TokensOptions) {
    let grammar = match resolve_grammar(opts.lang.as_deref(), &opts.file) {
        Ok(g) => g,
        Err(e) => fail(e),
    };

    let source = read_source(&opts.file);
    let tokens = match try_extract_leaf_tokens(&source, grammar) {
        Ok(tokens) => tokens,
        Err(e) => fail(format_args!("{}: {e}", opts.file)),
    };

    if tokens.is_empty() {
        eprintln!("{}", "No leaf tokens.".dimmed());
        return;
    }
    for token in tokens {
        println!("{token}");
    }
}
