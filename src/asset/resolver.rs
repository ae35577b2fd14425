use log::debug;
use std::str::FromStr;

use crate::store::{ProductListing, ProductUrl, StoreBackend};

use super::{ClassicAsset, ResolutionResult, UNKNOWN_LOCALE, UwpAsset};

/// Why a product URL could not be resolved into assets.
///
/// None of these are retried; a single failed attempt surfaces to the
/// caller immediately.
#[derive(Debug)]
pub enum ResolutionError {
    /// The input is not a recognizable store product page URL.
    UnrecognizedUrl(String),
    /// The store backend was unreachable, rejected the query, or returned
    /// an undecodable payload.
    Backend(String),
    /// The product exposes no downloadable packages.
    NoPackages(String),
}

impl std::fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionError::UnrecognizedUrl(msg) => {
                write!(f, "Unrecognized product URL: {}", msg)
            }
            ResolutionError::Backend(msg) => {
                write!(f, "Store backend query failed: {}", msg)
            }
            ResolutionError::NoPackages(product_id) => {
                write!(f, "Product {} has no downloadable packages", product_id)
            }
        }
    }
}

impl std::error::Error for ResolutionError {}

/// Turns a store product page URL into an ordered asset list plus its
/// packaging family. Queries the network only; never touches the
/// filesystem.
pub struct AssetResolver<B: StoreBackend> {
    backend: B,
}

impl<B: StoreBackend> AssetResolver<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Resolve `url` into assets. The backend's listing order is preserved
    /// verbatim; callers treat index 0 as the default choice.
    #[tracing::instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<ResolutionResult, ResolutionError> {
        let product =
            ProductUrl::from_str(url).map_err(|e| ResolutionError::UnrecognizedUrl(e.to_string()))?;

        debug!("Resolving assets for product {}", product.product_id);

        let listing = self
            .backend
            .packages(&product.product_id)
            .await
            .map_err(|e| ResolutionError::Backend(format!("{:#}", e)))?;

        normalize(listing).ok_or(ResolutionError::NoPackages(product.product_id))
    }
}

/// Collapse the two wire shapes into one family-tagged asset list. A bundle
/// manifest with packages wins over any installer entries; a listing with
/// neither yields `None`.
fn normalize(listing: ProductListing) -> Option<ResolutionResult> {
    if let Some(bundle) = listing.bundle {
        if !bundle.packages.is_empty() {
            let assets = bundle
                .packages
                .into_iter()
                .map(|p| {
                    let extension = extension_of(&p.file_name);
                    UwpAsset {
                        name: p.file_name,
                        arch: p.architecture,
                        extension,
                        download_url: p.download_url,
                        modified: p.modified,
                    }
                })
                .collect();
            return Some(ResolutionResult::Uwp(assets));
        }
    }

    if !listing.installers.is_empty() {
        let assets = listing
            .installers
            .into_iter()
            .map(|i| {
                let extension = extension_of(&i.file_name);
                ClassicAsset {
                    name: i.file_name,
                    arch: i.architecture,
                    extension,
                    download_url: i.download_url,
                    locale: i.locale.unwrap_or_else(|| UNKNOWN_LOCALE.to_string()),
                }
            })
            .collect();
        return Some(ResolutionResult::Classic(assets));
    }

    None
}

/// Lowercased file extension without the leading dot; empty when absent.
fn extension_of(name: &str) -> String {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default()
}
