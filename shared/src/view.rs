use geojson::{feature::Id, Feature, FeatureCollection, Geometry, JsonObject, JsonValue, Value};
use serde::{Deserialize, Serialize};

use crate::model::{Coordinate, Model, ProcessStatus, Venue, VenueGroup, ViewMode};

pub const NO_VENUES_MESSAGE: &str = "No coffee shops found nearby.";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ViewModel {
    pub view_mode: ViewMode,
    pub status: StatusView,
    pub current_location: Option<Coordinate>,
    pub selected_venue: Option<VenueDetails>,
    /// Loaded venues as GeoJSON points, for map shells.
    pub map_features: FeatureCollection,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum StatusView {
    Loading,
    Venues(Vec<VenueGroupView>),
    NoVenues { message: String },
    Error { message: String },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VenueGroupView {
    pub name: String,
    pub venues: Vec<VenueRow>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VenueRow {
    pub id: String,
    pub name: String,
    pub address_line: Option<String>,
    pub distance_text: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VenueDetails {
    pub id: String,
    pub name: String,
    pub coordinate: Coordinate,
    pub address_lines: Vec<String>,
}

impl ViewModel {
    pub fn new(model: &Model) -> Self {
        Self {
            view_mode: model.view_mode,
            status: status_view(&model.status, model.current_location.as_ref()),
            current_location: model.current_location,
            selected_venue: model.selected_venue.as_ref().map(VenueDetails::from),
            map_features: map_features(model.status.venue_groups().unwrap_or_default()),
        }
    }
}

fn status_view(status: &ProcessStatus, here: Option<&Coordinate>) -> StatusView {
    match status {
        ProcessStatus::Loading => StatusView::Loading,
        ProcessStatus::Loaded(groups) if groups.iter().all(VenueGroup::is_empty) => {
            StatusView::NoVenues {
                message: NO_VENUES_MESSAGE.to_string(),
            }
        }
        ProcessStatus::Loaded(groups) => StatusView::Venues(
            groups
                .iter()
                .map(|group| VenueGroupView {
                    name: group.name.clone(),
                    venues: group.venues.iter().map(|v| VenueRow::new(v, here)).collect(),
                })
                .collect(),
        ),
        ProcessStatus::FetchError(kind) => StatusView::Error {
            message: kind.user_facing_message().to_string(),
        },
        ProcessStatus::LocationError(error) => StatusView::Error {
            message: error.user_facing_message().to_string(),
        },
    }
}

impl VenueRow {
    fn new(venue: &Venue, here: Option<&Coordinate>) -> Self {
        Self {
            id: venue.id.to_string(),
            name: venue.name.clone(),
            address_line: venue.address.lines().into_iter().next(),
            distance_text: here.map(|h| format_distance(h.distance_to(&venue.coordinate))),
        }
    }
}

impl From<&Venue> for VenueDetails {
    fn from(venue: &Venue) -> Self {
        Self {
            id: venue.id.to_string(),
            name: venue.name.clone(),
            coordinate: venue.coordinate,
            address_lines: venue.address.lines(),
        }
    }
}

pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{} m", meters.round())
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}

pub fn map_features(groups: &[VenueGroup]) -> FeatureCollection {
    let features = groups
        .iter()
        .flat_map(|group| group.venues.iter().map(move |venue| venue_feature(group, venue)))
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

fn venue_feature(group: &VenueGroup, venue: &Venue) -> Feature {
    // GeoJSON positions are [longitude, latitude].
    let position = vec![venue.coordinate.longitude(), venue.coordinate.latitude()];

    let mut properties = JsonObject::new();
    properties.insert("name".to_string(), JsonValue::from(venue.name.clone()));
    properties.insert("group".to_string(), JsonValue::from(group.name.clone()));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(position))),
        id: Some(Id::String(venue.id.to_string())),
        properties: Some(properties),
        foreign_members: None,
    }
}
