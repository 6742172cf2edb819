//! Core types, normalization, and validation for the conversion relay.

pub mod canonical;
pub mod error;
pub mod event;
pub mod identity;
pub mod location;
pub mod request;
pub mod tenant;

pub use canonical::{normalize, CanonicalEvent, CustomData, UserData};
pub use error::{Error, Result};
pub use event::{EventType, StandardEvent};
pub use identity::ResolvedIdentity;
pub use location::GeoLocation;
pub use request::InboundEventRequest;
pub use tenant::{TenantConfig, TenantMap};
