//! Store backend access: product page URL recognition and the packaging
//! listing query.

mod client;
mod types;
mod url;

#[cfg(test)]
pub use client::MockStoreBackend;
pub use client::{DEFAULT_API_URL, StoreBackend, StoreClient};
pub use types::{Bundle, BundlePackage, InstallerEntry, ProductListing};
pub use url::ProductUrl;
