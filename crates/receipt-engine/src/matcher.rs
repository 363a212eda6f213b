//! Whole-word keyword matching over normalized text.

use std::collections::BTreeMap;

use regex::Regex;
use thiserror::Error;

use crate::taxonomy::KeywordTaxonomy;

/// Error raised when a taxonomy keyword cannot be compiled into a pattern.
#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("invalid keyword variant '{variant}': {source}")]
    InvalidVariant {
        variant: String,
        #[source]
        source: regex::Error,
    },
}

struct VariantPattern {
    keyword: String,
    pattern: Regex,
}

struct CategoryPatterns {
    name: String,
    variants: Vec<VariantPattern>,
}

/// Keyword patterns compiled once from a taxonomy.
pub struct KeywordMatcher {
    categories: Vec<CategoryPatterns>,
    secondary: Vec<VariantPattern>,
}

/// Outcome of one matching pass. All orderings follow the taxonomy, so the
/// same input always produces the same result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordMatches {
    /// Primary category names with at least one matching variant.
    pub categories: Vec<String>,
    /// Every matching variant, keyed by category name.
    pub variants: BTreeMap<String, Vec<String>>,
    /// Matching secondary keywords.
    pub secondary: Vec<String>,
}

impl KeywordMatches {
    pub fn empty() -> Self {
        Self {
            categories: Vec::new(),
            variants: BTreeMap::new(),
            secondary: Vec::new(),
        }
    }

    pub fn primary_count(&self) -> usize {
        self.categories.len()
    }

    pub fn secondary_count(&self) -> usize {
        self.secondary.len()
    }

    pub fn total(&self) -> usize {
        self.primary_count() + self.secondary_count()
    }
}

impl KeywordMatcher {
    /// Compile every taxonomy keyword into a whole-word pattern.
    pub fn new(taxonomy: &KeywordTaxonomy) -> Result<Self, TaxonomyError> {
        let mut categories = Vec::with_capacity(taxonomy.primary.len());
        for category in &taxonomy.primary {
            let mut variants = Vec::with_capacity(category.variants.len());
            for keyword in &category.variants {
                variants.push(VariantPattern {
                    keyword: keyword.clone(),
                    pattern: compile_variant(keyword)?,
                });
            }
            categories.push(CategoryPatterns {
                name: category.name.clone(),
                variants,
            });
        }

        let mut secondary = Vec::with_capacity(taxonomy.secondary.len());
        for keyword in &taxonomy.secondary {
            secondary.push(VariantPattern {
                keyword: keyword.clone(),
                pattern: compile_variant(keyword)?,
            });
        }

        Ok(Self {
            categories,
            secondary,
        })
    }

    /// Scan normalized text. A category counts once no matter how many of
    /// its variants hit, but every hitting variant is recorded.
    pub fn match_text(&self, text: &str) -> KeywordMatches {
        let mut matches = KeywordMatches::empty();

        for category in &self.categories {
            let hits: Vec<String> = category
                .variants
                .iter()
                .filter(|v| v.pattern.is_match(text))
                .map(|v| v.keyword.clone())
                .collect();
            if !hits.is_empty() {
                matches.categories.push(category.name.clone());
                matches.variants.insert(category.name.clone(), hits);
            }
        }

        for keyword in &self.secondary {
            if keyword.pattern.is_match(text) {
                matches.secondary.push(keyword.keyword.clone());
            }
        }

        matches
    }
}

/// Build the anchored pattern for one keyword. `\b` only means something
/// next to a word character, so it is added only on the sides where the
/// keyword's edge is one. Symbol and punctuation edges (`€`, the trailing
/// dot of `t.v.a.`) stay bare and match literally.
fn compile_variant(keyword: &str) -> Result<Regex, TaxonomyError> {
    let escaped = regex::escape(keyword);
    let word_lead = keyword.chars().next().map_or(false, is_word_char);
    let word_trail = keyword.chars().last().map_or(false, is_word_char);

    let pattern = match (word_lead, word_trail) {
        (true, true) => format!(r"\b{escaped}\b"),
        (true, false) => format!(r"\b{escaped}"),
        (false, true) => format!(r"{escaped}\b"),
        (false, false) => escaped,
    };

    Regex::new(&pattern).map_err(|source| TaxonomyError::InvalidVariant {
        variant: keyword.to_string(),
        source,
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
