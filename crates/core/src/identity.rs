//! Request-scoped identity: the resolved client address plus normalized
//! personal data.

use tracing::debug;

use crate::request::InboundEventRequest;

/// Phone numbers outside this digit range are dropped rather than
/// forwarded; they only degrade match quality at the Conversions API.
const PHONE_MIN_DIGITS: usize = 8;
const PHONE_MAX_DIGITS: usize = 15;

/// Identity fragments resolved once per request and folded into the
/// outbound event. Never persisted on its own.
#[derive(Debug, Clone, Default)]
pub struct ResolvedIdentity {
    /// Best-effort real client IP; may be empty on total failure.
    pub client_ip: String,
    pub user_agent: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    /// Digits only.
    pub phone: Option<String>,
}

impl ResolvedIdentity {
    /// Build the identity for one request, normalizing whatever personal
    /// data the payload carried.
    pub fn resolve(
        client_ip: impl Into<String>,
        user_agent: impl Into<String>,
        request: &InboundEventRequest,
    ) -> Self {
        Self {
            client_ip: client_ip.into(),
            user_agent: user_agent.into(),
            first_name: normalize_name(request.first_name.as_deref()),
            last_name: normalize_name(request.last_name.as_deref()),
            email: normalize_email(request.email.as_deref()),
            phone: normalize_phone(request.phone.as_deref()),
        }
    }
}

/// Trim and lowercase; empty results collapse to `None`.
fn normalize_name(raw: Option<&str>) -> Option<String> {
    let name = raw?.trim().to_lowercase();
    (!name.is_empty()).then_some(name)
}

/// Trim and lowercase. Values without an `@` are dropped.
fn normalize_email(raw: Option<&str>) -> Option<String> {
    let email = raw?.trim().to_lowercase();
    if email.is_empty() {
        return None;
    }
    if !email.contains('@') {
        debug!(email = %email, "dropping malformed email");
        return None;
    }
    Some(email)
}

/// Strip everything but digits. Values outside the national digit-length
/// range are dropped.
fn normalize_phone(raw: Option<&str>) -> Option<String> {
    let digits: String = raw?.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    if digits.len() < PHONE_MIN_DIGITS || digits.len() > PHONE_MAX_DIGITS {
        debug!(digits = digits.len(), "dropping phone with implausible length");
        return None;
    }
    Some(digits)
}
