//! Venue search contract: request construction and response decoding.
//!
//! The shell only moves bytes. Building the explore URL and turning the
//! nested response envelope into [`VenueGroup`]s both happen here so every
//! platform behaves the same way.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::capabilities::{HttpResult, MAX_RESPONSE_BODY_SIZE};
use crate::error::SearchError;
use crate::model::{Address, Coordinate, Venue, VenueGroup, VenueId};

pub const DEFAULT_ENDPOINT: &str = "https://api.foursquare.com/v2/venues/explore";
pub const DEFAULT_SECTION: &str = "coffee";
/// Format of the `v` (API version) query parameter.
pub const VERSION_DATE_FORMAT: &str = "%Y%m%d";

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub endpoint: String,
    pub client_id: String,
    pub client_secret: String,
    pub section: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            client_id: option_env!("FOURSQUARE_CLIENT_ID").unwrap_or_default().to_string(),
            client_secret: option_env!("FOURSQUARE_CLIENT_SECRET")
                .unwrap_or_default()
                .to_string(),
            section: DEFAULT_SECTION.to_string(),
        }
    }
}

// Keep the client secret out of logs.
impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("endpoint", &self.endpoint)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("section", &self.section)
            .finish()
    }
}

/// Builds the explore request for `at`.
///
/// `ll` is sent as `longitude,latitude`. Existing deployments of the API
/// key were set up against this order, so it is kept as is.
pub fn search_url(
    config: &SearchConfig,
    at: Coordinate,
    date: NaiveDate,
) -> Result<Url, SearchError> {
    let invalid = |reason: String| SearchError::InvalidUrl {
        endpoint: config.endpoint.clone(),
        reason,
    };

    let mut url = Url::parse(&config.endpoint).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }

    url.query_pairs_mut()
        .append_pair("client_id", &config.client_id)
        .append_pair("client_secret", &config.client_secret)
        .append_pair("section", &config.section)
        .append_pair("v", &date.format(VERSION_DATE_FORMAT).to_string())
        .append_pair("ll", &format!("{},{}", at.longitude(), at.latitude()));

    Ok(url)
}

#[derive(Deserialize)]
struct Envelope {
    response: ExploreResponse,
}

#[derive(Deserialize)]
struct ExploreResponse {
    groups: Vec<GroupDto>,
}

#[derive(Deserialize)]
struct GroupDto {
    name: String,
    #[serde(default)]
    items: Vec<ItemDto>,
}

#[derive(Deserialize)]
struct ItemDto {
    venue: VenueDto,
}

#[derive(Deserialize)]
struct VenueDto {
    id: String,
    name: String,
    location: LocationDto,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocationDto {
    lat: f64,
    lng: f64,
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    postal_code: Option<String>,
}

impl TryFrom<VenueDto> for Venue {
    type Error = SearchError;

    fn try_from(dto: VenueDto) -> Result<Self, Self::Error> {
        let LocationDto {
            lat,
            lng,
            address,
            city,
            state,
            postal_code,
        } = dto.location;
        let coordinate = Coordinate::new(lat, lng).map_err(|e| SearchError::Decode {
            reason: format!("venue {}: {e}", dto.id),
        })?;

        Ok(Self {
            id: VenueId(dto.id),
            name: dto.name,
            coordinate,
            address: Address {
                street: address,
                city,
                state,
                postal_code,
            },
        })
    }
}

/// Decodes an explore response body, keeping server order for groups and venues.
pub fn decode_groups(body: &[u8]) -> Result<Vec<VenueGroup>, SearchError> {
    let envelope: Envelope = serde_json::from_slice(body).map_err(|e| SearchError::Decode {
        reason: e.to_string(),
    })?;

    envelope
        .response
        .groups
        .into_iter()
        .map(|group| -> Result<VenueGroup, SearchError> {
            let venues = group
                .items
                .into_iter()
                .map(|item| Venue::try_from(item.venue))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(VenueGroup {
                name: group.name,
                venues,
            })
        })
        .collect()
}

/// Turns what the shell handed back into venue groups.
#[instrument(level = "debug", skip(outcome))]
pub fn interpret(outcome: HttpResult) -> Result<Vec<VenueGroup>, SearchError> {
    let response = outcome?;
    if !response.is_success() {
        warn!(status = response.status, "venue search returned an error status");
        return Err(SearchError::Status {
            status: response.status,
        });
    }
    if response.body.len() > MAX_RESPONSE_BODY_SIZE {
        return Err(SearchError::Decode {
            reason: format!(
                "response body of {} bytes exceeds {MAX_RESPONSE_BODY_SIZE}",
                response.body.len()
            ),
        });
    }

    let groups = decode_groups(&response.body)?;
    debug!(groups = groups.len(), "decoded venue search response");
    Ok(groups)
}
