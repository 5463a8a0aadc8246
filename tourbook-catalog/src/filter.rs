use serde::{de, Deserialize, Deserializer};
use crate::package::TourPackage;

/// Browse filter: free-text search over title/description plus an
/// inclusive price range. Unset parts match everything.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageFilter {
    #[serde(default, rename = "q")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub min_price: Option<i32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub max_price: Option<i32>,
}

/// Browsers submit untouched price inputs as `min_price=`; treat that as unset.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid price: {}", raw))),
    }
}

impl PackageFilter {
    pub fn matches(&self, pkg: &TourPackage) -> bool {
        if let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            let hit = pkg.title.to_lowercase().contains(&term)
                || pkg.description.to_lowercase().contains(&term);
            if !hit {
                return false;
            }
        }

        if let Some(min) = self.min_price {
            if pkg.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if pkg.price > max {
                return false;
            }
        }

        true
    }

    /// Keep matching packages, preserving order
    pub fn apply(&self, packages: Vec<TourPackage>) -> Vec<TourPackage> {
        packages.into_iter().filter(|p| self.matches(p)).collect()
    }
}
