//! Brand management commands.
//!
//! # Usage
//!
//! ```bash
//! bz brands list
//! bz brands show <ID>
//! bz brands create --name Apple --logo ./apple.png
//! bz brands update <ID> --name "Apple Inc"
//! bz brands delete <ID>
//! ```

use std::path::PathBuf;

use bazaar_admin::api::Brand;
use bazaar_admin::forms::{BrandDraft, BrandPatch, LogoImage};
use bazaar_admin::store::{BrandCreate, BrandDelete, BrandDetails, BrandUpdate, Brands, Slice};
use bazaar_core::BrandId;
use clap::Subcommand;

use super::{CliError, Session, settled};

#[derive(Subcommand)]
pub enum BrandAction {
    /// List all brands
    List,
    /// Show one brand
    Show {
        /// Brand ID
        id: String,
    },
    /// Create a brand
    Create {
        /// Brand name
        #[arg(short, long)]
        name: String,

        /// Logo image (png, jpg, jpeg, gif, webp, svg)
        #[arg(short, long)]
        logo: Option<PathBuf>,
    },
    /// Update a brand's name and/or logo
    Update {
        /// Brand ID
        id: String,

        /// New brand name
        #[arg(short, long)]
        name: Option<String>,

        /// New logo image
        #[arg(short, long)]
        logo: Option<PathBuf>,
    },
    /// Delete a brand
    Delete {
        /// Brand ID
        id: String,
    },
}

pub async fn run(session: &Session, action: BrandAction) -> Result<(), CliError> {
    let store = &session.store;

    match action {
        BrandAction::List => list(session).await?,
        BrandAction::Show { id } => {
            let outcome = store.fetch_brand_details(&BrandId::new(id)).await?;
            settled(store, BrandDetails::NAME, outcome)?;
            if let Some(brand) = store.snapshot().brand_details.data() {
                print_brand(brand);
            }
            store.remove_brand_details();
        }
        BrandAction::Create { name, logo } => {
            let logo = logo.as_deref().map(LogoImage::from_path).transpose()?;
            let brand = BrandDraft { name, logo }.validate()?;

            let outcome = store.create_brand(&brand).await?;
            settled(store, BrandCreate::NAME, outcome)?;
            if store.snapshot().brand_create.flag() {
                println!("Brand created");
            }
            store.reset::<BrandCreate>();
            list(session).await?;
        }
        BrandAction::Update { id, name, logo } => {
            let logo = logo.as_deref().map(LogoImage::from_path).transpose()?;
            let patch = BrandPatch::new(name, logo)?;

            let outcome = store.update_brand(&BrandId::new(id), &patch).await?;
            settled(store, BrandUpdate::NAME, outcome)?;
            if store.snapshot().brand_update.flag() {
                println!("Brand updated");
            }
            store.reset::<BrandUpdate>();
            list(session).await?;
        }
        BrandAction::Delete { id } => {
            let outcome = store.delete_brand(&BrandId::new(id)).await?;
            settled(store, BrandDelete::NAME, outcome)?;
            if store.snapshot().brand_delete.flag() {
                println!("Brand deleted");
            }
            store.reset::<BrandDelete>();
            list(session).await?;
        }
    }
    Ok(())
}

async fn list(session: &Session) -> Result<(), CliError> {
    let store = &session.store;
    let outcome = store.fetch_brands().await?;
    settled(store, Brands::NAME, outcome)?;

    let state = store.snapshot();
    let brands = state.brands.data().map_or(&[][..], Vec::as_slice);
    if brands.is_empty() {
        println!("No brands");
        return Ok(());
    }
    for brand in brands {
        print_brand(brand);
    }
    Ok(())
}

fn print_brand(brand: &Brand) {
    let logo = brand
        .logo
        .as_ref()
        .and_then(|logo| logo.url.as_deref())
        .unwrap_or("-");
    println!("{}  {}  {logo}", brand.id, brand.name);
}
