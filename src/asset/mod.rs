//! Normalized asset model and the resolver that produces it.
//!
//! A product resolves to exactly one packaging family. The two families
//! carry different metadata (bundle manifest timestamps vs. installer
//! locales), so the result is a sum type over two homogeneous lists rather
//! than one list of records with optional fields.

mod resolver;

pub use resolver::{AssetResolver, ResolutionError};

/// Packaging model of a resolved product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageFamily {
    Uwp,
    Classic,
}

impl std::fmt::Display for PackageFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackageFamily::Uwp => write!(f, "UWP"),
            PackageFamily::Classic => write!(f, "Classic"),
        }
    }
}

/// Locale value used when classic installer data carries none.
pub const UNKNOWN_LOCALE: &str = "unknown";

/// One architecture-specific sub-package of an app bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct UwpAsset {
    pub name: String,
    pub arch: String,
    /// Lowercase, without the leading dot.
    pub extension: String,
    pub download_url: String,
    /// Bundle manifest modification timestamp.
    pub modified: String,
}

/// One classic installer, possibly a locale variant.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassicAsset {
    pub name: String,
    pub arch: String,
    /// Lowercase, without the leading dot.
    pub extension: String,
    pub download_url: String,
    /// [`UNKNOWN_LOCALE`] when the source data lacked one.
    pub locale: String,
}

/// What a product resolved to: one family, one ordered asset list.
///
/// The order is the backend's own listing order; index 0 is the default
/// choice in automated flows. A result never mixes families.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionResult {
    Uwp(Vec<UwpAsset>),
    Classic(Vec<ClassicAsset>),
}

/// Borrowed name + URL pair, all a download needs from an asset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DownloadTarget<'a> {
    pub name: &'a str,
    pub url: &'a str,
}

impl ResolutionResult {
    pub fn family(&self) -> PackageFamily {
        match self {
            ResolutionResult::Uwp(_) => PackageFamily::Uwp,
            ResolutionResult::Classic(_) => PackageFamily::Classic,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ResolutionResult::Uwp(assets) => assets.len(),
            ResolutionResult::Classic(assets) => assets.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The download view of the asset at `index`, in listing order.
    pub fn target(&self, index: usize) -> Option<DownloadTarget<'_>> {
        match self {
            ResolutionResult::Uwp(assets) => assets.get(index).map(|a| DownloadTarget {
                name: &a.name,
                url: &a.download_url,
            }),
            ResolutionResult::Classic(assets) => assets.get(index).map(|a| DownloadTarget {
                name: &a.name,
                url: &a.download_url,
            }),
        }
    }

    /// Asset names in listing order.
    pub fn names(&self) -> Vec<&str> {
        match self {
            ResolutionResult::Uwp(assets) => assets.iter().map(|a| a.name.as_str()).collect(),
            ResolutionResult::Classic(assets) => assets.iter().map(|a| a.name.as_str()).collect(),
        }
    }
}
