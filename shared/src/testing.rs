//! Scripted stand-ins for the shell's collaborators.
//!
//! Each test builds its own instances, so any number of scenarios can run
//! side by side.

use std::collections::VecDeque;

use serde_json::json;

use crate::capabilities::{
    AuthorizationStatus, HttpResponse, HttpResult, LocationEvent, TransportError,
};
use crate::model::{Address, Coordinate, Venue, VenueGroup, VenueId};
use crate::search::SearchConfig;

/// Outcomes a venue search can be scripted to produce.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchStub {
    Success(Vec<VenueGroup>),
    Empty,
    ClientError,
    NetworkError,
}

impl SearchStub {
    /// Configuration to install before the search runs. A client error is
    /// produced by an endpoint that cannot be turned into a URL.
    pub fn config(&self) -> SearchConfig {
        let endpoint = match self {
            Self::ClientError => "not a url".to_string(),
            _ => crate::search::DEFAULT_ENDPOINT.to_string(),
        };
        SearchConfig {
            endpoint,
            client_id: "test-client-id".to_string(),
            client_secret: "test-client-secret".to_string(),
            ..SearchConfig::default()
        }
    }

    /// What the shell hands back for the GET.
    pub fn response(&self) -> HttpResult {
        match self {
            Self::Success(groups) => Ok(HttpResponse::ok(envelope(groups))),
            Self::Empty | Self::ClientError => Ok(HttpResponse::ok(envelope(&[]))),
            Self::NetworkError => Err(TransportError::Connection {
                message: "The Internet connection appears to be offline.".to_string(),
            }),
        }
    }
}

/// Replays a fixed sequence of location events.
#[derive(Debug, Clone, Default)]
pub struct ScriptedLocation {
    events: VecDeque<LocationEvent>,
}

impl ScriptedLocation {
    pub fn new(events: impl IntoIterator<Item = LocationEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    /// Permission granted, then a single fix at `at`.
    pub fn authorized_at(at: Coordinate) -> Self {
        Self::new([
            LocationEvent::AuthorizationChanged(AuthorizationStatus::AuthorizedWhenInUse),
            LocationEvent::LocationsUpdated(vec![at]),
        ])
    }
}

impl Iterator for ScriptedLocation {
    type Item = LocationEvent;

    fn next(&mut self) -> Option<Self::Item> {
        self.events.pop_front()
    }
}

/// Serializes groups into the explore response envelope.
pub fn envelope(groups: &[VenueGroup]) -> Vec<u8> {
    let groups: Vec<_> = groups
        .iter()
        .map(|group| {
            let items: Vec<_> = group
                .venues
                .iter()
                .map(|venue| {
                    json!({
                        "venue": {
                            "id": venue.id.as_str(),
                            "name": venue.name,
                            "location": {
                                "lat": venue.coordinate.latitude(),
                                "lng": venue.coordinate.longitude(),
                                "address": venue.address.street,
                                "city": venue.address.city,
                                "state": venue.address.state,
                                "postalCode": venue.address.postal_code,
                            }
                        }
                    })
                })
                .collect();
            json!({ "name": group.name, "items": items })
        })
        .collect();

    json!({ "meta": { "code": 200 }, "response": { "groups": groups } })
        .to_string()
        .into_bytes()
}

pub fn venue(id: &str, name: &str, latitude: f64, longitude: f64) -> Venue {
    Venue {
        id: VenueId::new(id),
        name: name.to_string(),
        coordinate: Coordinate::new(latitude, longitude)
            .unwrap_or_else(|e| panic!("test venue {id}: {e}")),
        address: Address::default(),
    }
}

pub fn group(name: &str, venues: Vec<Venue>) -> VenueGroup {
    VenueGroup {
        name: name.to_string(),
        venues,
    }
}
