//! Keyword taxonomy: the immutable configuration a classifier is built from.
//!
//! Two tiers. Primary categories gate the receipt decision: one hit in any
//! category makes the document a receipt. Secondary keywords are supporting
//! signals that only feed the confidence score.

/// A named group of equivalent keyword spellings.
#[derive(Debug, Clone)]
pub struct KeywordCategory {
    pub name: String,
    pub variants: Vec<String>,
}

impl KeywordCategory {
    pub fn new(name: &str, variants: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            variants: variants.iter().map(|v| v.to_lowercase()).collect(),
        }
    }
}

/// Ordered keyword configuration. Category and keyword order is preserved so
/// match output is deterministic.
#[derive(Debug, Clone)]
pub struct KeywordTaxonomy {
    pub primary: Vec<KeywordCategory>,
    pub secondary: Vec<String>,
}

impl KeywordTaxonomy {
    pub fn new(primary: Vec<KeywordCategory>, secondary: &[&str]) -> Self {
        Self {
            primary,
            secondary: secondary.iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    /// Built-in taxonomy for French retail receipts. Accentless variants are
    /// included because OCR frequently drops diacritics.
    pub fn french_retail() -> Self {
        Self::new(
            vec![
                KeywordCategory::new(
                    "ticket",
                    &["ticket", "ticket de caisse", "reçu", "recu", "receipt"],
                ),
                KeywordCategory::new("facture", &["facture", "invoice", "note de frais"]),
                KeywordCategory::new("tva", &["tva", "t.v.a.", "vat", "taxe", "taxes"]),
                KeywordCategory::new(
                    "total_du",
                    &[
                        "total à payer",
                        "total a payer",
                        "net à payer",
                        "net a payer",
                        "montant dû",
                        "montant du",
                        "total ttc",
                        "amount due",
                    ],
                ),
            ],
            &[
                "total",
                "sous-total",
                "montant",
                "prix",
                "caisse",
                "article",
                "articles",
                "quantité",
                "quantite",
                "€",
                "eur",
                "euro",
                "euros",
                "carte bancaire",
                "cb",
                "espèces",
                "especes",
                "merci",
                "magasin",
                "siret",
                "ttc",
                "ht",
            ],
        )
    }
}
