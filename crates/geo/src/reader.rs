//! GeoLite2 City lookups with fail-null semantics.

use std::net::IpAddr;
use std::path::Path;

use maxminddb::{geoip2, Reader};
use relay_core::{Error, GeoLocation};
use tracing::{info, warn};

use crate::city::normalize_city;

/// Smallest plausible database. Anything under this is a placeholder
/// left behind by a failed download and is treated as unavailable.
const MIN_DB_BYTES: u64 = 100;

/// Resolves client IPs against a local GeoLite2 City database.
///
/// Construction never fails: a missing, truncated, or corrupt database
/// yields an enricher that answers every lookup with the empty location.
pub struct GeoEnricher {
    reader: Option<Reader<Vec<u8>>>,
}

impl GeoEnricher {
    /// Open the database at `path`, degrading to unavailable on any
    /// problem with the file.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();

        let reader = match std::fs::metadata(path) {
            Ok(meta) if meta.len() >= MIN_DB_BYTES => match Reader::open_readfile(path) {
                Ok(reader) => {
                    info!(path = %path.display(), "geo database loaded");
                    Some(reader)
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to open geo database");
                    None
                }
            },
            Ok(meta) => {
                warn!(path = %path.display(), bytes = meta.len(), "geo database too small, treating as unavailable");
                None
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "geo database not found");
                None
            }
        };

        Self { reader }
    }

    /// An enricher with no database; every lookup yields the empty
    /// location.
    pub fn unavailable() -> Self {
        Self { reader: None }
    }

    pub fn is_available(&self) -> bool {
        self.reader.is_some()
    }

    /// Resolve an IP to a location.
    ///
    /// Every failure path (no database, unparseable IP, address not
    /// found, record extraction) collapses to the empty location.
    /// Partial geo data is worse than none for downstream matching, so
    /// no code path returns a partially populated result.
    pub fn resolve(&self, ip: &str) -> GeoLocation {
        match self.lookup(ip) {
            Ok(location) => location,
            Err(e) => {
                warn!(ip, error = %e, "geo lookup failed");
                GeoLocation::empty()
            }
        }
    }

    fn lookup(&self, ip: &str) -> Result<GeoLocation, Error> {
        let reader = self
            .reader
            .as_ref()
            .ok_or_else(|| Error::geo("database unavailable"))?;

        let addr: IpAddr = ip
            .parse()
            .map_err(|_| Error::geo(format!("unparseable ip: {ip}")))?;

        let record: geoip2::City = reader
            .lookup(addr)
            .map_err(|e| Error::geo(e.to_string()))?;

        let country = record
            .country
            .as_ref()
            .and_then(|c| c.iso_code)
            .map(str::to_lowercase);

        // Most specific subdivision: the last entry in the chain.
        let state = record
            .subdivisions
            .as_ref()
            .and_then(|s| s.last())
            .and_then(|s| s.iso_code)
            .map(str::to_lowercase);

        let city = record
            .city
            .as_ref()
            .and_then(|c| c.names.as_ref())
            .and_then(|names| names.get("en").copied())
            .map(normalize_city);

        let postal_code = record
            .postal
            .as_ref()
            .and_then(|p| p.code)
            .map(str::to_string);

        Ok(GeoLocation {
            country,
            state,
            city,
            postal_code,
        })
    }
}
