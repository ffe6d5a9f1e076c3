//! Provider selection

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Supported geocoding backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeocodingProviderKind {
    /// OpenStreetMap via a Nominatim-compatible API (default)
    #[default]
    OpenStreetMap,
    /// Google Maps Geocoding and Places APIs
    Google,
}

impl GeocodingProviderKind {
    /// Canonical configuration name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OpenStreetMap => "openstreetmap",
            Self::Google => "google",
        }
    }
}

impl fmt::Display for GeocodingProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeocodingProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openstreetmap" | "osm" | "nominatim" => Ok(Self::OpenStreetMap),
            "google" | "google_maps" | "googlemaps" => Ok(Self::Google),
            _ => Err(format!(
                "Unknown geocoding provider: {s}. Use 'openstreetmap' or 'google'"
            )),
        }
    }
}

/// Outcome of resolving the configured provider name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSelection {
    kind: GeocodingProviderKind,
    requested: String,
    fell_back: bool,
}

impl ProviderSelection {
    /// Resolve a provider name; unknown names select the default provider
    #[must_use]
    pub fn resolve(requested: &str) -> Self {
        match requested.parse::<GeocodingProviderKind>() {
            Ok(kind) => Self {
                kind,
                requested: requested.to_string(),
                fell_back: false,
            },
            Err(_) => Self {
                kind: GeocodingProviderKind::default(),
                requested: requested.to_string(),
                fell_back: true,
            },
        }
    }

    /// The provider that will actually be used
    #[must_use]
    pub const fn kind(&self) -> GeocodingProviderKind {
        self.kind
    }

    /// The provider name as configured
    #[must_use]
    pub fn requested(&self) -> &str {
        &self.requested
    }

    /// True when the configured name was not recognized and the default was substituted
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        self.fell_back
    }
}
