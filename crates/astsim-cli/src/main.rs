mod commands;
mod formatters;

use clap::{Parser, Subcommand};
use commands::compare::{compare_command, CompareOptions, OutputFormat};
use commands::tokens::{tokens_command, TokensOptions};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "astsim", version, about = "Structural code similarity")]
struct Cli {
    /// Log tokenizer diagnostics to stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score how structurally similar two files are
    Compare {
        file1: String,
        file2: String,

        /// Grammar to parse with (default: from the first file's extension, else python)
        #[arg(long)]
        lang: Option<String>,

        /// Output format: terminal or json
        #[arg(long, default_value = "terminal")]
        format: String,

        /// List the matched token runs
        #[arg(long)]
        blocks: bool,
    },
    /// Print the leaf-token kinds of a file, one per line
    Tokens {
        file: String,

        /// Grammar to parse with (default: from the file extension, else python)
        #[arg(long)]
        lang: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("debug"))
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Compare {
            file1,
            file2,
            lang,
            format,
            blocks,
        } => {
            let output_format = match format.as_str() {
                "json" => OutputFormat::Json,
                _ => OutputFormat::Terminal,
            };

            compare_command(CompareOptions {
                file1,
                file2,
                lang,
                format: output_format,
                show_blocks: blocks,
            });
        }
        Commands::Tokens { file, lang } => {
            tokens_command(TokensOptions { file, lang });
        }
    }
}
