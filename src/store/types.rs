use serde::{Deserialize, Serialize};

/// Packaging listing for one product, as returned by the store backend.
///
/// The backend describes UWP products through a bundle manifest and classic
/// products through a flat installer list; at most one of the two sections
/// carries data for a given product.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ProductListing {
    pub product_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub bundle: Option<Bundle>,
    #[serde(default)]
    pub installers: Vec<InstallerEntry>,
}

/// App bundle manifest: one sub-package per architecture.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Bundle {
    pub packages: Vec<BundlePackage>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct BundlePackage {
    pub file_name: String,
    pub architecture: String,
    /// Manifest modification timestamp.
    pub modified: String,
    pub download_url: String,
}

/// One classic installer, possibly a locale variant.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct InstallerEntry {
    pub file_name: String,
    pub architecture: String,
    #[serde(default)]
    pub locale: Option<String>,
    pub download_url: String,
}
