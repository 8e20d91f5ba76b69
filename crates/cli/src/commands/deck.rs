//! Presentation deck generation.
//!
//! # Usage
//!
//! ```bash
//! bz deck generate ./deck.json --out-dir ./decks
//! ```
//!
//! `deck.json` holds `{"title": "...", "products": [{"productName": "...",
//! "productDescription": "...", "pricingText": "..."}]}`.

use std::path::PathBuf;

use bazaar_admin::api::DeckRequest;
use bazaar_admin::forms::validate_deck;
use clap::Subcommand;

use super::{CliError, Session, read_input, write_output};

#[derive(Subcommand)]
pub enum DeckAction {
    /// Send a deck request and save the returned presentation
    Generate {
        /// JSON request file
        request: PathBuf,

        /// Directory to write into
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

pub async fn run(session: &Session, action: DeckAction) -> Result<(), CliError> {
    match action {
        DeckAction::Generate { request, out_dir } => {
            let raw = read_input(&request)?;
            let request: DeckRequest = serde_json::from_slice(&raw)?;
            let request = validate_deck(request)?;

            println!("Generating presentation for {} products...", request.products.len());
            let deck = session.store.api().generate_deck(&request).await?;
            let path = write_output(&out_dir, &deck.filename, &deck.bytes)?;
            println!("Presentation downloaded: {}", path.display());
        }
    }
    Ok(())
}
