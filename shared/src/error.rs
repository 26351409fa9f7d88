use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::capabilities::TransportError;

/// Why a venue search produced no result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum FetchErrorKind {
    /// The request could not be built (bad endpoint configuration).
    #[error("venue search request could not be built")]
    Client,
    /// The request failed in transit, or the response could not be read.
    #[error("venue search failed or returned an unreadable response")]
    Network,
}

impl FetchErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Client => "CLIENT_ERROR",
            Self::Network => "NETWORK_ERROR",
        }
    }

    #[must_use]
    pub const fn user_facing_message(self) -> &'static str {
        match self {
            Self::Client => {
                "Something went wrong while preparing the search. Please try again later."
            }
            Self::Network => {
                "Unable to load coffee shops. Please check your internet connection and try again."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("location unavailable")]
    Unavailable,
    #[error("location services failed: {message}")]
    Other { message: String },
}

impl LocationError {
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "LOCATION_PERMISSION_DENIED",
            Self::Unavailable | Self::Other { .. } => "LOCATION_ERROR",
        }
    }

    #[must_use]
    pub const fn user_facing_message(&self) -> &'static str {
        match self {
            Self::PermissionDenied => {
                "Location access is required. Please enable location permissions in Settings."
            }
            Self::Unavailable | Self::Other { .. } => {
                "Unable to determine your location. Please check your GPS settings."
            }
        }
    }
}

/// Detailed failure of a single venue search. Collapses to a
/// [`FetchErrorKind`] before it reaches the model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    #[error("invalid search endpoint '{endpoint}': {reason}")]
    InvalidUrl { endpoint: String, reason: String },

    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),

    #[error("search responded with HTTP {status}")]
    Status { status: u16 },

    #[error("could not decode search response: {reason}")]
    Decode { reason: String },
}

impl SearchError {
    #[must_use]
    pub const fn kind(&self) -> FetchErrorKind {
        match self {
            Self::InvalidUrl { .. } => FetchErrorKind::Client,
            Self::Transport(_) | Self::Status { .. } | Self::Decode { .. } => {
                FetchErrorKind::Network
            }
        }
    }
}

impl From<SearchError> for FetchErrorKind {
    fn from(e: SearchError) -> Self {
        e.kind()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ValidationError {
    #[error("invalid coordinate: lat={0}, lng={1}")]
    InvalidCoordinate(f64, f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_endpoint_is_a_client_error() {
        let err = SearchError::InvalidUrl {
            endpoint: "::".into(),
            reason: "relative URL without a base".into(),
        };
        assert_eq!(err.kind(), FetchErrorKind::Client);
    }

    #[test]
    fn transport_status_and_decode_failures_are_network_errors() {
        let transport = SearchError::from(TransportError::Connection {
            message: "offline".into(),
        });
        assert_eq!(transport.kind(), FetchErrorKind::Network);
        assert_eq!(SearchError::Status { status: 500 }.kind(), FetchErrorKind::Network);
        assert_eq!(
            FetchErrorKind::from(SearchError::Decode { reason: "eof".into() }),
            FetchErrorKind::Network
        );
    }

    #[test]
    fn permission_denied_has_its_own_message() {
        assert_ne!(
            LocationError::PermissionDenied.user_facing_message(),
            LocationError::Unavailable.user_facing_message()
        );
        assert_eq!(LocationError::PermissionDenied.code(), "LOCATION_PERMISSION_DENIED");
    }
}
