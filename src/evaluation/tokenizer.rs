//! Word tokenization and light stemming for metric computation

use regex::Regex;

use crate::core::errors::{BenchmarkError, Result};
use crate::providers::primary_subtag;

/// Decimal numbers, CJK characters one at a time, words with inner
/// apostrophes or hyphens, then any other non-space character on its own.
const TOKEN_PATTERN: &str = r"\p{N}+(?:[.,]\p{N}+)+|[\p{Han}\p{Hiragana}\p{Katakana}]|[[\p{L}\p{M}\p{N}_]&&[^\p{Han}\p{Hiragana}\p{Katakana}]]+(?:['’\-][[\p{L}\p{M}\p{N}_]&&[^\p{Han}\p{Hiragana}\p{Katakana}]]+)*|\S";

/// Unicode-aware word tokenizer
#[derive(Debug, Clone)]
pub struct Tokenizer {
    pattern: Regex,
}

impl Tokenizer {
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(TOKEN_PATTERN)
            .map_err(|e| BenchmarkError::config(format!("invalid token pattern: {}", e)))?;
        Ok(Self { pattern })
    }

    /// Split `text` into word and punctuation tokens, original casing kept
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.pattern
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Inflectional suffixes stripped per language, longest first
fn suffixes(language: &str) -> &'static [&'static str] {
    match language {
        "es" => &[
            "amientos", "imientos", "aciones", "amiento", "imiento", "idades", "ación", "mente",
            "iendo", "ando", "idad", "ados", "idos", "adas", "idas", "ado", "ido", "ada", "ida",
            "es", "as", "os", "a", "o", "e", "s",
        ],
        "en" => &[
            "ational", "ations", "ation", "ness", "ment", "ings", "edly", "ing", "ies", "ied",
            "ly", "ed", "es", "s",
        ],
        "de" => &["ungen", "ung", "heit", "keit", "ern", "en", "er", "es", "em", "e", "s", "n"],
        "fr" => &[
            "ements", "ement", "ations", "ation", "euses", "euse", "ées", "ée", "és", "es", "é",
            "e", "s",
        ],
        "it" | "pt" => &[
            "amente", "mente", "zioni", "zione", "ções", "ção", "ando", "endo", "ato", "ata",
            "ati", "ate", "ado", "ada", "os", "as", "i", "e", "o", "a", "s",
        ],
        _ => &["s"],
    }
}

/// Suffix-stripping stemmer keyed by the target language
#[derive(Debug, Clone)]
pub struct Stemmer {
    suffixes: &'static [&'static str],
}

/// Stems shorter than this are left alone
const MIN_STEM_CHARS: usize = 3;

impl Stemmer {
    pub fn for_language(code: &str) -> Self {
        Self {
            suffixes: suffixes(&primary_subtag(code)),
        }
    }

    /// Stem an already lowercased token
    pub fn stem(&self, token: &str) -> String {
        for suffix in self.suffixes {
            if let Some(stem) = token.strip_suffix(suffix) {
                if stem.chars().count() >= MIN_STEM_CHARS {
                    return stem.to_string();
                }
            }
        }
        token.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_punctuation() {
        let tokenizer = Tokenizer::new().unwrap();
        assert_eq!(
            tokenizer.tokenize("¿Dónde está la estación, por favor?"),
            vec!["¿", "Dónde", "está", "la", "estación", ",", "por", "favor", "?"]
        );
    }

    #[test]
    fn test_keeps_inner_apostrophes_hyphens_and_decimals() {
        let tokenizer = Tokenizer::new().unwrap();
        assert_eq!(
            tokenizer.tokenize("It's a well-known fact: 3.5 million (approx.)"),
            vec!["It's", "a", "well-known", "fact", ":", "3.5", "million", "(", "approx", ".", ")"]
        );
    }

    #[test]
    fn test_cjk_characters_are_separate_tokens() {
        let tokenizer = Tokenizer::new().unwrap();
        assert_eq!(tokenizer.tokenize("我爱你 ok"), vec!["我", "爱", "你", "ok"]);
    }

    #[test]
    fn test_blank_text_has_no_tokens() {
        let tokenizer = Tokenizer::new().unwrap();
        assert!(tokenizer.tokenize(" \t\n").is_empty());
    }

    #[test]
    fn test_spanish_stems() {
        let stemmer = Stemmer::for_language("ES");
        assert_eq!(stemmer.stem("casas"), "cas");
        assert_eq!(stemmer.stem("casa"), "cas");
        assert_eq!(stemmer.stem("rápidamente"), "rápida");
        // too short to strip
        assert_eq!(stemmer.stem("las"), "las");
    }

    #[test]
    fn test_unknown_language_only_strips_plural() {
        let stemmer = Stemmer::for_language("fi");
        assert_eq!(stemmer.stem("talot"), "talot");
        assert_eq!(stemmer.stem("items"), "item");
    }
}
