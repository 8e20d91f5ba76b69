//! Presentation deck request types.

use serde::{Deserialize, Serialize};

const DEFAULT_DECK_FILENAME: &str = "Product_Presentation.pptx";

/// Body of the presentation generator request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckRequest {
    #[serde(default)]
    pub title: String,
    pub products: Vec<DeckProduct>,
}

/// One slide's worth of product copy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckProduct {
    pub product_name: String,
    #[serde(default)]
    pub product_description: String,
    #[serde(default)]
    pub pricing_text: String,
}

impl DeckRequest {
    /// Filename the generated deck is saved under.
    ///
    /// Derived from the title with anything outside `[A-Za-z0-9 _-]`
    /// dropped and spaces turned into underscores. Blank titles fall back
    /// to `Product_Presentation.pptx`.
    #[must_use]
    pub fn filename(&self) -> String {
        let stem: String = self
            .title
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-'))
            .map(|c| if c == ' ' { '_' } else { c })
            .collect();

        if stem.trim_matches('_').is_empty() {
            DEFAULT_DECK_FILENAME.to_string()
        } else {
            format!("{stem}.pptx")
        }
    }
}

/// A generated presentation, ready to be written to disk.
#[derive(Debug, Clone)]
pub struct Deck {
    pub filename: String,
    pub bytes: Vec<u8>,
}
