//! Per-tenant Conversions API credentials.
//!
//! The map is loaded once at startup and never mutated afterwards. A
//! resolved config is threaded by value through the call chain into
//! dispatch; credentials are never written to shared state, so concurrent
//! requests for different tenants cannot cross-contaminate.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Credential triple for one storefront/domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantConfig {
    pub pixel_id: String,
    pub access_token: String,
    #[serde(default)]
    pub test_code: Option<String>,
}

/// Read-only mapping from content/domain identifier to credentials.
#[derive(Debug, Clone, Default)]
pub struct TenantMap {
    domains: HashMap<String, TenantConfig>,
}

impl TenantMap {
    pub fn new(domains: HashMap<String, TenantConfig>) -> Self {
        Self { domains }
    }

    /// Look up a tenant by content id. `None` means "use the ambient
    /// default credentials"; callers must tolerate the miss.
    pub fn resolve(&self, content_id: &str) -> Option<&TenantConfig> {
        self.domains.get(content_id)
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

impl FromIterator<(String, TenantConfig)> for TenantMap {
    fn from_iter<I: IntoIterator<Item = (String, TenantConfig)>>(iter: I) -> Self {
        Self {
            domains: iter.into_iter().collect(),
        }
    }
}
