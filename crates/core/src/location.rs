//! Resolved geolocation for a single request.

use serde::{Deserialize, Serialize};

/// Location fields resolved from one geo lookup.
///
/// Populated only from a single successful lookup; any failure during
/// resolution yields the empty location. Mixing fields from different
/// lookup generations would corrupt match quality downstream, so partial
/// locations never exist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoLocation {
    /// Lowercased ISO country code.
    pub country: Option<String>,
    /// Lowercased ISO code of the most specific subdivision.
    pub state: Option<String>,
    /// ASCII-normalized city name: diacritics folded, non-letters removed.
    pub city: Option<String>,
    pub postal_code: Option<String>,
}

impl GeoLocation {
    /// The all-`None` location every failure path collapses to.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.country.is_none()
            && self.state.is_none()
            && self.city.is_none()
            && self.postal_code.is_none()
    }
}
