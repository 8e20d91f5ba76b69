//! Client-side validation of operator input.
//!
//! Every check here runs before a request is built; a [`FormError`] never
//! reaches the network or the store.

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

use crate::api::DeckRequest;
use crate::spreadsheet::ProductUploadRow;

/// Input rejected before any request was sent.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("Enter Brand")]
    MissingBrandName,

    #[error("Upload Brand Logo")]
    MissingLogo,

    #[error("Nothing to update")]
    EmptyPatch,

    #[error("No data to upload. Please preview the Excel file first.")]
    NoRows,

    #[error("Add at least one product")]
    NoDeckProducts,

    #[error("Unsupported logo format: {0}")]
    UnsupportedLogo(String),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Brand logo encoded as a `data:` URL, the form the server stores.
#[derive(Clone, PartialEq, Eq)]
pub struct LogoImage {
    data_url: String,
}

impl std::fmt::Debug for LogoImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mime = self
            .data_url
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(';'))
            .map_or("unknown", |(mime, _)| mime);
        f.debug_struct("LogoImage")
            .field("mime", &mime)
            .field("len", &self.data_url.len())
            .finish()
    }
}

impl LogoImage {
    /// Encode raw image bytes.
    #[must_use]
    pub fn from_bytes(mime: &str, bytes: &[u8]) -> Self {
        Self {
            data_url: format!("data:{mime};base64,{}", STANDARD.encode(bytes)),
        }
    }

    /// Read and encode an image file, picking the MIME type from its extension.
    ///
    /// # Errors
    ///
    /// Returns `FormError::UnsupportedLogo` for unknown extensions and
    /// `FormError::Read` if the file cannot be read.
    pub fn from_path(path: &Path) -> Result<Self, FormError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let mime = match extension.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            "svg" => "image/svg+xml",
            _ => return Err(FormError::UnsupportedLogo(path.display().to_string())),
        };

        let bytes = std::fs::read(path).map_err(|source| FormError::Read {
            path: path.display().to_string(),
            source,
        })?;

        Ok(Self::from_bytes(mime, &bytes))
    }

    /// The encoded `data:<mime>;base64,...` string.
    #[must_use]
    pub fn as_data_url(&self) -> &str {
        &self.data_url
    }
}

/// Unvalidated input of the "add brand" form.
#[derive(Debug, Clone, Default)]
pub struct BrandDraft {
    pub name: String,
    pub logo: Option<LogoImage>,
}

impl BrandDraft {
    /// Check the draft, yielding a brand ready to submit.
    ///
    /// # Errors
    ///
    /// `FormError::MissingBrandName` when the name is blank,
    /// `FormError::MissingLogo` when no logo was chosen.
    pub fn validate(self) -> Result<NewBrand, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::MissingBrandName);
        }
        let logo = self.logo.ok_or(FormError::MissingLogo)?;

        Ok(NewBrand {
            name: name.to_string(),
            logo,
        })
    }
}

/// A brand that passed validation.
#[derive(Debug, Clone)]
pub struct NewBrand {
    name: String,
    logo: LogoImage,
}

impl NewBrand {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn logo(&self) -> &LogoImage {
        &self.logo
    }
}

/// Partial brand update; absent fields are left unchanged on the server.
#[derive(Debug, Clone, Default)]
pub struct BrandPatch {
    name: Option<String>,
    logo: Option<LogoImage>,
}

impl BrandPatch {
    /// Build a patch from optional fields.
    ///
    /// # Errors
    ///
    /// `FormError::MissingBrandName` when a name is given but blank,
    /// `FormError::EmptyPatch` when nothing would change.
    pub fn new(name: Option<String>, logo: Option<LogoImage>) -> Result<Self, FormError> {
        let name = match name {
            Some(name) if name.trim().is_empty() => return Err(FormError::MissingBrandName),
            Some(name) => Some(name.trim().to_string()),
            None => None,
        };
        if name.is_none() && logo.is_none() {
            return Err(FormError::EmptyPatch);
        }
        Ok(Self { name, logo })
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub const fn logo(&self) -> Option<&LogoImage> {
        self.logo.as_ref()
    }
}

/// Non-empty batch of parsed spreadsheet rows.
#[derive(Debug, Clone)]
pub struct UploadBatch {
    rows: Vec<ProductUploadRow>,
}

impl UploadBatch {
    /// # Errors
    ///
    /// `FormError::NoRows` when `rows` is empty.
    pub fn new(rows: Vec<ProductUploadRow>) -> Result<Self, FormError> {
        if rows.is_empty() {
            return Err(FormError::NoRows);
        }
        Ok(Self { rows })
    }

    #[must_use]
    pub fn rows(&self) -> &[ProductUploadRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Check a presentation request before sending it.
///
/// # Errors
///
/// `FormError::NoDeckProducts` when the request lists no products.
pub fn validate_deck(request: DeckRequest) -> Result<DeckRequest, FormError> {
    if request.products.is_empty() {
        return Err(FormError::NoDeckProducts);
    }
    Ok(request)
}
