pub mod error;
pub mod grammar;
pub mod matcher;
pub mod similarity;
pub mod tokenizer;

pub use grammar::Grammar;
pub use similarity::{compare, robust_similarity, SimilarityReport};
pub use tokenizer::{extract_leaf_tokens, TokenSequence};
