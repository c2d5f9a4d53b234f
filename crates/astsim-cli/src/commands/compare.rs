use astsim_core::compare;

use super::{fail, read_source, resolve_grammar};
use crate::formatters::{json::format_json, terminal::format_terminal};

pub struct CompareOptions {
    pub file1: String,
    pub file2: String,
    pub lang: Option<String>,
    pub format: OutputFormat,
    pub show_blocks: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal,
    Json,
}

pub fn compare_command(opts: CompareOptions) {
    let grammar = match resolve_grammar(opts.lang.as_deref(), &opts.file1) {
        Ok(g) => g,
        Err(e) => fail(e),
    };

    let code1 = read_source(&opts.file1);
    let code2 = read_source(&opts.file2);
    let report = compare(&code1, &code2, grammar);

    match opts.format {
        OutputFormat::Json => println!("{}", format_json(&opts.file1, &opts.file2, &report)),
        OutputFormat::Terminal => println!(
            "{}",
            format_terminal(&opts.file1, &opts.file2, &report, opts.show_blocks)
        ),
    }
}
