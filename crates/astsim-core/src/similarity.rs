use serde::Serialize;

use crate::grammar::Grammar;
use crate::matcher::{self, MatchingBlock, SequenceMatcher};
use crate::tokenizer::{extract_leaf_tokens, TokenSequence};

/// Outcome of comparing two snippets, with the counts behind the score.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityReport {
    pub grammar: Grammar,
    pub similarity: f64,
    pub tokens_a: usize,
    pub tokens_b: usize,
    pub matched: usize,
    pub blocks: Vec<MatchingBlock>,
}

/// Structural similarity of two snippets under one grammar, rounded to 4
/// decimals. `0.0` when either snippet yields no leaf tokens.
pub fn robust_similarity(code1: &str, code2: &str, grammar: Grammar) -> f64 {
    let (tokens1, tokens2) = tokenize_pair(code1, code2, grammar);
    matcher::score(&tokens1, &tokens2)
}

/// Like [`robust_similarity`] but keeps the token counts and matching blocks.
pub fn compare(code1: &str, code2: &str, grammar: Grammar) -> SimilarityReport {
    let (tokens1, tokens2) = tokenize_pair(code1, code2, grammar);

    let blocks: Vec<MatchingBlock> = if tokens1.is_empty() || tokens2.is_empty() {
        Vec::new()
    } else {
        SequenceMatcher::new(&tokens1, &tokens2)
            .matching_blocks()
            .into_iter()
            .filter(|m| m.size > 0)
            .collect()
    };
    let matched = blocks.iter().map(|m| m.size).sum();
    let similarity = if blocks.is_empty() {
        0.0
    } else {
        matcher::round_ratio(matched, tokens1.len() + tokens2.len())
    };

    SimilarityReport {
        grammar,
        similarity,
        tokens_a: tokens1.len(),
        tokens_b: tokens2.len(),
        matched,
        blocks,
    }
}

fn tokenize_pair(code1: &str, code2: &str, grammar: Grammar) -> (TokenSequence, TokenSequence) {
    rayon::join(
        || extract_leaf_tokens(code1, grammar),
        || extract_leaf_tokens(code2, grammar),
    )
}
