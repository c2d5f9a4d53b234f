use thiserror::Error;

use crate::grammar::Grammar;

#[derive(Debug, Error)]
pub enum TokenizeError {
    #[error("tree-sitter language for {grammar} is unavailable")]
    LanguageUnavailable { grammar: Grammar },
    #[error("{grammar} parser produced no tree")]
    ParseFailed { grammar: Grammar },
    #[error("{grammar} parser panicked")]
    ParserPanicked { grammar: Grammar },
}

#[derive(Debug, Error)]
pub enum GrammarError {
    #[error("unknown grammar: {0}")]
    Unknown(String),
}
