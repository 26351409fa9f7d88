use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::coordinator::EffectCoordinator;
use crate::error::{FetchErrorKind, LocationError, ValidationError};
use crate::search::SearchConfig;
use crate::EARTH_RADIUS_M;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VenueId(pub String);

impl VenueId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VenueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

/// Validated latitude/longitude pair; deserialization rejects NaN and out-of-range values.
#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        if !latitude.is_finite()
            || !longitude.is_finite()
            || !(-90.0..=90.0).contains(&latitude)
            || !(-180.0..=180.0).contains(&longitude)
        {
            return Err(ValidationError::InvalidCoordinate(latitude, longitude));
        }
        Ok(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance in meters.
    pub fn distance_to(&self, other: &Self) -> f64 {
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lng = (other.longitude - self.longitude).to_radians();
        let a = (d_lat / 2.0).sin().powi(2)
            + self.latitude.to_radians().cos()
                * other.latitude.to_radians().cos()
                * (d_lng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
    }
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = ValidationError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        self.latitude.to_bits() == other.latitude.to_bits()
            && self.longitude.to_bits() == other.longitude.to_bits()
    }
}

impl Eq for Coordinate {}

#[derive(Default, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewMode {
    Map,
    #[default]
    List,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        self.street.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.postal_code.is_none()
    }

    /// Street on the first line, locality on the second. Missing parts are skipped.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(2);
        if let Some(street) = &self.street {
            lines.push(street.clone());
        }

        let region = [self.state.as_deref(), self.postal_code.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        let locality = match (self.city.as_deref(), region.is_empty()) {
            (Some(city), false) => format!("{city}, {region}"),
            (Some(city), true) => city.to_string(),
            (None, _) => region,
        };
        if !locality.is_empty() {
            lines.push(locality);
        }
        lines
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    pub id: VenueId,
    pub name: String,
    pub coordinate: Coordinate,
    pub address: Address,
}

/// A named bucket of venues in server order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VenueGroup {
    pub name: String,
    pub venues: Vec<Venue>,
}

impl VenueGroup {
    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }

    pub fn find(&self, id: &VenueId) -> Option<&Venue> {
        self.venues.iter().find(|v| &v.id == id)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum ProcessStatus {
    #[default]
    Loading,
    Loaded(Vec<VenueGroup>),
    FetchError(FetchErrorKind),
    LocationError(LocationError),
}

impl ProcessStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Loaded(_) => "loaded",
            Self::FetchError(_) => "fetch_error",
            Self::LocationError(_) => "location_error",
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn venue_groups(&self) -> Option<&[VenueGroup]> {
        match self {
            Self::Loaded(groups) => Some(groups),
            _ => None,
        }
    }
}

/// Where the reducer reads today's date from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Clock {
    #[default]
    System,
    Fixed(NaiveDate),
}

impl Clock {
    pub fn today(self) -> NaiveDate {
        match self {
            Self::System => chrono::Local::now().date_naive(),
            Self::Fixed(date) => date,
        }
    }
}

/// Screen state. Owned by the core; mutated only from `App::update`.
#[derive(Clone, Debug, Default)]
pub struct Model {
    pub view_mode: ViewMode,
    pub current_location: Option<Coordinate>,
    pub selected_venue: Option<Venue>,
    pub status: ProcessStatus,
    pub search: SearchConfig,
    pub effects: EffectCoordinator,
    pub clock: Clock,
}

impl Model {
    pub fn venue_count(&self) -> usize {
        self.status
            .venue_groups()
            .map_or(0, |groups| groups.iter().map(VenueGroup::len).sum())
    }

    /// Keeps the selection only if the new result set still contains it,
    /// swapping in the fresh copy.
    pub(crate) fn reconcile_selection(&mut self, groups: &[VenueGroup]) {
        let Some(selected) = &self.selected_venue else {
            return;
        };
        self.selected_venue = groups.iter().find_map(|g| g.find(&selected.id)).cloned();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venue(id: &str) -> Venue {
        Venue {
            id: VenueId::new(id),
            name: format!("Cafe {id}"),
            coordinate: Coordinate::new(50.82, -0.14).unwrap(),
            address: Address::default(),
        }
    }

    #[test]
    fn coordinate_rejects_nan_and_out_of_range() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
        assert!(Coordinate::new(91.0, 0.0).is_err());
        assert!(Coordinate::new(0.0, -181.0).is_err());
        assert!(Coordinate::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn coordinate_deserialization_validates() {
        let ok: Coordinate =
            serde_json::from_str(r#"{"latitude":50.831,"longitude":-0.129}"#).unwrap();
        assert_eq!(ok, Coordinate::new(50.831, -0.129).unwrap());

        let bad = serde_json::from_str::<Coordinate>(r#"{"latitude":123.0,"longitude":0.0}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn distance_between_brighton_and_london_is_about_75km() {
        let brighton = Coordinate::new(50.8225, -0.1372).unwrap();
        let london = Coordinate::new(51.5074, -0.1278).unwrap();
        let d = brighton.distance_to(&london);
        assert!((75_000.0..78_000.0).contains(&d), "distance was {d}");
    }

    #[test]
    fn default_view_mode_is_list() {
        assert_eq!(Model::default().view_mode, ViewMode::List);
    }

    #[test]
    fn address_lines_skip_missing_parts() {
        let full = Address {
            street: Some("12 Bond St".into()),
            city: Some("Brighton".into()),
            state: Some("East Sussex".into()),
            postal_code: Some("BN1 1RD".into()),
        };
        assert_eq!(full.lines(), vec!["12 Bond St", "Brighton, East Sussex BN1 1RD"]);

        let city_only = Address {
            city: Some("Brighton".into()),
            ..Address::default()
        };
        assert_eq!(city_only.lines(), vec!["Brighton"]);
        assert!(Address::default().lines().is_empty());
        assert!(Address::default().is_empty());
    }

    #[test]
    fn selection_survives_reload_when_venue_is_still_present() {
        let mut model = Model {
            selected_venue: Some(venue("a")),
            ..Model::default()
        };
        let mut refreshed = venue("a");
        refreshed.name = "Cafe A (renamed)".into();
        let groups = vec![VenueGroup {
            name: "Coffee".into(),
            venues: vec![refreshed.clone(), venue("b")],
        }];

        model.reconcile_selection(&groups);
        assert_eq!(model.selected_venue, Some(refreshed));
    }

    #[test]
    fn selection_is_cleared_when_venue_disappears() {
        let mut model = Model {
            selected_venue: Some(venue("gone")),
            ..Model::default()
        };
        let groups = vec![VenueGroup {
            name: "Coffee".into(),
            venues: vec![venue("b")],
        }];

        model.reconcile_selection(&groups);
        assert_eq!(model.selected_venue, None);
    }

    #[test]
    fn fixed_clock_reports_its_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(Clock::Fixed(date).today(), date);
    }

    #[test]
    fn venue_count_sums_all_groups() {
        let model = Model {
            status: ProcessStatus::Loaded(vec![
                VenueGroup {
                    name: "One".into(),
                    venues: vec![venue("a"), venue("b")],
                },
                VenueGroup {
                    name: "Two".into(),
                    venues: vec![venue("c")],
                },
            ]),
            ..Model::default()
        };
        assert_eq!(model.venue_count(), 3);
        assert_eq!(Model::default().venue_count(), 0);
    }
}
