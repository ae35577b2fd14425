use anyhow::{Result, anyhow};
use std::str::FromStr;
use url::Url;

/// Hosts that serve store product pages.
const PRODUCT_HOSTS: &[&str] = &["apps.microsoft.com", "www.microsoft.com"];

/// A recognized store product page URL, reduced to the product id.
///
/// Accepted path shapes (the id is always the last segment):
/// - `/detail/<id>`
/// - `/detail/<slug>/<id>`
/// - `/store/detail/<slug>/<id>`
/// - `/<lang>/p/<slug>/<id>`
#[derive(Debug, PartialEq, Clone)]
pub struct ProductUrl {
    pub product_id: String,
}

impl std::fmt::Display for ProductUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.product_id)
    }
}

impl FromStr for ProductUrl {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = Url::parse(s).map_err(|e| anyhow!("Invalid URL '{}': {}", s, e))?;

        let host = parsed
            .host_str()
            .ok_or_else(|| anyhow!("URL '{}' has no host", s))?;
        if !PRODUCT_HOSTS.contains(&host) {
            return Err(anyhow!("'{}' is not a recognized store host", host));
        }

        let segments: Vec<&str> = parsed
            .path_segments()
            .map(|p| p.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        // Product pages mark the id section with a "detail" or "p" segment.
        let marked = segments
            .iter()
            .any(|seg| seg.eq_ignore_ascii_case("detail") || seg.eq_ignore_ascii_case("p"));

        let id = segments.last().copied().unwrap_or_default();
        if !marked || !is_product_id(id) {
            return Err(anyhow!("'{}' is not a store product page URL", s));
        }

        Ok(ProductUrl {
            product_id: id.to_string(),
        })
    }
}

/// Product ids are short alphanumeric tokens (e.g. "9pdxgncfsczv").
fn is_product_id(s: &str) -> bool {
    (10..=14).contains(&s.len()) && s.chars().all(|c| c.is_ascii_alphanumeric())
}
