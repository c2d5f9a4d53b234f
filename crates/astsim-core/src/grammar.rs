use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;
use tree_sitter::Language;

use crate::error::GrammarError;

/// A tree-sitter grammar the tokenizer can parse with.
///
/// Grammars are plain values: selecting one is a match on the enum, there is
/// no global parser table to look up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Grammar {
    Python,
    Java,
    JavaScript,
    TypeScript,
    Go,
    Rust,
    C,
}

struct GrammarConfig {
    id: &'static str,
    aliases: &'static [&'static str],
    extensions: &'static [&'static str],
    get_language: fn() -> Option<Language>,
}

fn get_python() -> Option<Language> {
    Some(tree_sitter_python::LANGUAGE.into())
}

fn get_java() -> Option<Language> {
    Some(tree_sitter_java::LANGUAGE.into())
}

fn get_javascript() -> Option<Language> {
    Some(tree_sitter_javascript::LANGUAGE.into())
}

fn get_typescript() -> Option<Language> {
    Some(tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into())
}

fn get_go() -> Option<Language> {
    Some(tree_sitter_go::LANGUAGE.into())
}

fn get_rust() -> Option<Language> {
    Some(tree_sitter_rust::LANGUAGE.into())
}

fn get_c() -> Option<Language> {
    Some(tree_sitter_c::LANGUAGE.into())
}

static PYTHON_CONFIG: GrammarConfig = GrammarConfig {
    id: "python",
    aliases: &["py"],
    extensions: &[".py", ".pyi"],
    get_language: get_python,
};

static JAVA_CONFIG: GrammarConfig = GrammarConfig {
    id: "java",
    aliases: &[],
    extensions: &[".java"],
    get_language: get_java,
};

static JAVASCRIPT_CONFIG: GrammarConfig = GrammarConfig {
    id: "javascript",
    aliases: &["js"],
    extensions: &[".js", ".jsx", ".mjs", ".cjs"],
    get_language: get_javascript,
};

static TYPESCRIPT_CONFIG: GrammarConfig = GrammarConfig {
    id: "typescript",
    aliases: &["ts"],
    extensions: &[".ts", ".mts", ".cts"],
    get_language: get_typescript,
};

static GO_CONFIG: GrammarConfig = GrammarConfig {
    id: "go",
    aliases: &["golang"],
    extensions: &[".go"],
    get_language: get_go,
};

static RUST_CONFIG: GrammarConfig = GrammarConfig {
    id: "rust",
    aliases: &["rs"],
    extensions: &[".rs"],
    get_language: get_rust,
};

static C_CONFIG: GrammarConfig = GrammarConfig {
    id: "c",
    aliases: &[],
    extensions: &[".c", ".h"],
    get_language: get_c,
};

impl Grammar {
    pub const ALL: [Grammar; 7] = [
        Grammar::Python,
        Grammar::Java,
        Grammar::JavaScript,
        Grammar::TypeScript,
        Grammar::Go,
        Grammar::Rust,
        Grammar::C,
    ];

    fn config(self) -> &'static GrammarConfig {
        match self {
            Grammar::Python => &PYTHON_CONFIG,
            Grammar::Java => &JAVA_CONFIG,
            Grammar::JavaScript => &JAVASCRIPT_CONFIG,
            Grammar::TypeScript => &TYPESCRIPT_CONFIG,
            Grammar::Go => &GO_CONFIG,
            Grammar::Rust => &RUST_CONFIG,
            Grammar::C => &C_CONFIG,
        }
    }

    pub fn id(self) -> &'static str {
        self.config().id
    }

    pub fn extensions(self) -> &'static [&'static str] {
        self.config().extensions
    }

    /// The tree-sitter language for this grammar, `None` if it cannot be loaded.
    pub fn language(self) -> Option<Language> {
        (self.config().get_language)()
    }

    /// Lenient selection used at the HTTP boundary: `"java"` in any case picks
    /// Java, every other tag falls back to Python.
    pub fn from_lang_tag(tag: &str) -> Grammar {
        if tag.to_lowercase() == "java" {
            Grammar::Java
        } else {
            Grammar::Python
        }
    }

    /// Pick a grammar from a file path's extension.
    pub fn from_path(file_path: &str) -> Option<Grammar> {
        let ext = Path::new(file_path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_lowercase()))?;

        Grammar::ALL
            .iter()
            .find(|g| g.extensions().contains(&ext.as_str()))
            .copied()
    }
}

impl FromStr for Grammar {
    type Err = GrammarError;

    /// Strict lookup by id or alias, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Grammar::ALL
            .iter()
            .find(|g| {
                let config = g.config();
                config.id == needle || config.aliases.contains(&needle.as_str())
            })
            .copied()
            .ok_or_else(|| GrammarError::Unknown(s.to_string()))
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lang_tag_selects_java_case_insensitively() {
        assert_eq!(Grammar::from_lang_tag("java"), Grammar::Java);
        assert_eq!(Grammar::from_lang_tag("Java"), Grammar::Java);
        assert_eq!(Grammar::from_lang_tag("JAVA"), Grammar::Java);
    }

    #[test]
    fn test_lang_tag_defaults_to_python() {
        assert_eq!(Grammar::from_lang_tag("Python"), Grammar::Python);
        assert_eq!(Grammar::from_lang_tag(""), Grammar::Python);
        assert_eq!(Grammar::from_lang_tag("rust"), Grammar::Python);
        assert_eq!(Grammar::from_lang_tag(" java"), Grammar::Python);
    }

    #[test]
    fn test_from_str_accepts_ids_and_aliases() {
        assert_eq!("python".parse::<Grammar>().unwrap(), Grammar::Python);
        assert_eq!("PY".parse::<Grammar>().unwrap(), Grammar::Python);
        assert_eq!("ts".parse::<Grammar>().unwrap(), Grammar::TypeScript);
        assert_eq!("golang".parse::<Grammar>().unwrap(), Grammar::Go);
        for grammar in Grammar::ALL {
            assert_eq!(grammar.id().parse::<Grammar>().unwrap(), grammar);
        }
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let err = "cobol".parse::<Grammar>().unwrap_err();
        assert_eq!(err.to_string(), "unknown grammar: cobol");
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Grammar::from_path("src/app.py"), Some(Grammar::Python));
        assert_eq!(Grammar::from_path("Main.JAVA"), Some(Grammar::Java));
        assert_eq!(Grammar::from_path("lib.rs"), Some(Grammar::Rust));
        assert_eq!(Grammar::from_path("README"), None);
        assert_eq!(Grammar::from_path("notes.txt"), None);
    }

    #[test]
    fn test_every_grammar_loads() {
        for grammar in Grammar::ALL {
            assert!(grammar.language().is_some(), "{grammar} failed to load");
        }
    }
}
