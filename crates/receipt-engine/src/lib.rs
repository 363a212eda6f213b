//! Receipt classification over OCR text.
//!
//! The pipeline is deliberately simple and fully deterministic: normalize
//! the text, match it against a keyword taxonomy with whole-word patterns,
//! then blend the match counts into a confidence score. No model, no I/O,
//! no global state; behavior is a pure function of (taxonomy, input text).

pub mod matcher;
pub mod normalize;
pub mod scorer;
pub mod taxonomy;

use std::collections::BTreeMap;

use serde::Serialize;

pub use matcher::{KeywordMatcher, KeywordMatches, TaxonomyError};
pub use normalize::normalize;
pub use scorer::{score, ScoreResult};
pub use taxonomy::{KeywordCategory, KeywordTaxonomy};

/// Normalized texts shorter than this are classified without any matching.
pub const MIN_TEXT_CHARS: usize = 5;

/// Char length of the text preview carried in decision details.
const PREVIEW_CHARS: usize = 300;

/// Keyword evidence backing a decision.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecognitionDetails {
    pub main_keywords_found: Vec<String>,
    pub secondary_keywords_found: Vec<String>,
    pub keyword_details: BTreeMap<String, Vec<String>>,
    pub text_preview: String,
}

/// Classification outcome for one text.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReceiptDecision {
    pub is_receipt: bool,
    pub confidence: f64,
    pub message: String,
    pub recognition_details: RecognitionDetails,
}

/// Receipt classifier: owns a taxonomy and its compiled patterns.
pub struct ReceiptClassifier {
    taxonomy: KeywordTaxonomy,
    matcher: KeywordMatcher,
}

impl ReceiptClassifier {
    /// Build a classifier for the given taxonomy, compiling its patterns.
    pub fn new(taxonomy: KeywordTaxonomy) -> Result<Self, TaxonomyError> {
        let matcher = KeywordMatcher::new(&taxonomy)?;
        Ok(Self { taxonomy, matcher })
    }

    /// The taxonomy this classifier was built from.
    pub fn taxonomy(&self) -> &KeywordTaxonomy {
        &self.taxonomy
    }

    /// Classify raw OCR text. Inputs whose normalized form is shorter than
    /// [`MIN_TEXT_CHARS`] short-circuit to a negative decision before any
    /// matching runs.
    pub fn classify(&self, text: &str) -> ReceiptDecision {
        let normalized = normalize(text);
        let text_len = normalized.chars().count();

        if text_len < MIN_TEXT_CHARS {
            return ReceiptDecision {
                is_receipt: false,
                confidence: 0.0,
                message: "no text detected".to_string(),
                recognition_details: RecognitionDetails {
                    main_keywords_found: Vec::new(),
                    secondary_keywords_found: Vec::new(),
                    keyword_details: BTreeMap::new(),
                    text_preview: preview(&normalized),
                },
            };
        }

        let matches = self.matcher.match_text(&normalized);
        let result = score(matches.primary_count(), matches.secondary_count(), text_len);

        let message = if result.is_receipt {
            format!(
                "receipt detected ({} primary / {} secondary keyword matches)",
                result.primary_count, result.secondary_count
            )
        } else {
            "no receipt detected (no primary keywords matched)".to_string()
        };

        ReceiptDecision {
            is_receipt: result.is_receipt,
            confidence: result.confidence,
            message,
            recognition_details: RecognitionDetails {
                main_keywords_found: matches.categories,
                secondary_keywords_found: matches.secondary,
                keyword_details: matches.variants,
                text_preview: preview(&normalized),
            },
        }
    }
}

impl Default for ReceiptClassifier {
    fn default() -> Self {
        Self::new(KeywordTaxonomy::french_retail()).expect("built-in taxonomy compiles")
    }
}

/// First [`PREVIEW_CHARS`] chars of the normalized text. Char-counted so
/// multibyte input is never split mid-character.
fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(PREVIEW_CHARS).collect();
    truncated.push_str("...");
    truncated
}
