//! Event taxonomy and the custom-to-standard remap table.
//!
//! Inbound events come from the site's own instrumentation, which is finer
//! grained than the Conversions API taxonomy (scroll depth markers, video
//! progress markers, a one-minute timer). The remap table decides which
//! standard event is submitted server-side, while the original type is kept
//! as the `original_event` custom property and echoed back for pixel parity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Inbound event types accepted by the relay. Closed set; anything else is
/// rejected before any enrichment work happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// Bootstrap probe: identity/geo resolution only, never dispatched.
    Init,
    PageView,
    ViewHome,
    ViewList,
    ViewContent,
    AddToCart,
    ViewCart,
    Search,
    Lead,
    AddToWishlist,
    InitiateCheckout,
    Purchase,
    #[serde(rename = "Scroll_25")]
    Scroll25,
    #[serde(rename = "Scroll_50")]
    Scroll50,
    #[serde(rename = "Scroll_75")]
    Scroll75,
    #[serde(rename = "Scroll_90")]
    Scroll90,
    #[serde(rename = "Timer_1min")]
    Timer1Min,
    PlayVideo,
    #[serde(rename = "ViewVideo_25")]
    ViewVideo25,
    #[serde(rename = "ViewVideo_50")]
    ViewVideo50,
    #[serde(rename = "ViewVideo_75")]
    ViewVideo75,
    #[serde(rename = "ViewVideo_90")]
    ViewVideo90,
}

/// Every accepted inbound type, in declaration order.
pub const ALL_EVENT_TYPES: [EventType; 22] = [
    EventType::Init,
    EventType::PageView,
    EventType::ViewHome,
    EventType::ViewList,
    EventType::ViewContent,
    EventType::AddToCart,
    EventType::ViewCart,
    EventType::Search,
    EventType::Lead,
    EventType::AddToWishlist,
    EventType::InitiateCheckout,
    EventType::Purchase,
    EventType::Scroll25,
    EventType::Scroll50,
    EventType::Scroll75,
    EventType::Scroll90,
    EventType::Timer1Min,
    EventType::PlayVideo,
    EventType::ViewVideo25,
    EventType::ViewVideo50,
    EventType::ViewVideo75,
    EventType::ViewVideo90,
];

impl EventType {
    /// Returns the wire name, exactly as clients send it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "Init",
            Self::PageView => "PageView",
            Self::ViewHome => "ViewHome",
            Self::ViewList => "ViewList",
            Self::ViewContent => "ViewContent",
            Self::AddToCart => "AddToCart",
            Self::ViewCart => "ViewCart",
            Self::Search => "Search",
            Self::Lead => "Lead",
            Self::AddToWishlist => "AddToWishlist",
            Self::InitiateCheckout => "InitiateCheckout",
            Self::Purchase => "Purchase",
            Self::Scroll25 => "Scroll_25",
            Self::Scroll50 => "Scroll_50",
            Self::Scroll75 => "Scroll_75",
            Self::Scroll90 => "Scroll_90",
            Self::Timer1Min => "Timer_1min",
            Self::PlayVideo => "PlayVideo",
            Self::ViewVideo25 => "ViewVideo_25",
            Self::ViewVideo50 => "ViewVideo_50",
            Self::ViewVideo75 => "ViewVideo_75",
            Self::ViewVideo90 => "ViewVideo_90",
        }
    }

    /// The standard event submitted for this type, or `None` for `Init`,
    /// which never reaches the Conversions API.
    pub fn standard(&self) -> Option<StandardEvent> {
        use StandardEvent as S;
        Some(match self {
            Self::Init => return None,
            Self::PageView | Self::ViewHome => S::PageView,
            Self::ViewContent
            | Self::ViewList
            | Self::Scroll25
            | Self::Scroll50
            | Self::Scroll75
            | Self::Scroll90
            | Self::Timer1Min
            | Self::PlayVideo
            | Self::ViewVideo25
            | Self::ViewVideo50
            | Self::ViewVideo75
            | Self::ViewVideo90 => S::ViewContent,
            Self::AddToCart => S::AddToCart,
            Self::ViewCart => S::ViewCart,
            Self::Search => S::Search,
            Self::Lead => S::Lead,
            Self::AddToWishlist => S::AddToWishlist,
            Self::InitiateCheckout => S::InitiateCheckout,
            Self::Purchase => S::Purchase,
        })
    }

    /// True when the remap table changed the submitted name, i.e. when the
    /// outbound event must carry `original_event`.
    pub fn is_remapped(&self) -> bool {
        self.standard()
            .map(|s| s.as_str() != self.as_str())
            .unwrap_or(false)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_EVENT_TYPES
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::InvalidEventType(s.to_string()))
    }
}

/// The taxonomy the Conversions API receives. Coarser than the inbound
/// set; produced only through [`EventType::standard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardEvent {
    PageView,
    ViewContent,
    AddToCart,
    ViewCart,
    Search,
    Lead,
    AddToWishlist,
    InitiateCheckout,
    Purchase,
}

impl StandardEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PageView => "PageView",
            Self::ViewContent => "ViewContent",
            Self::AddToCart => "AddToCart",
            Self::ViewCart => "ViewCart",
            Self::Search => "Search",
            Self::Lead => "Lead",
            Self::AddToWishlist => "AddToWishlist",
            Self::InitiateCheckout => "InitiateCheckout",
            Self::Purchase => "Purchase",
        }
    }
}

impl fmt::Display for StandardEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
