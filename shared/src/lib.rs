#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod app;
pub mod capabilities;
pub mod coordinator;
pub mod error;
pub mod event;
pub mod model;
pub mod search;
pub mod view;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use app::App;
pub use capabilities::{
    AuthorizationStatus, Capabilities, Effect, LocationEvent, LocationOperation,
    VenueSearchOperation,
};
pub use coordinator::{EffectCoordinator, EffectId, Ticket};
pub use error::{FetchErrorKind, LocationError, SearchError, ValidationError};
pub use event::Event;
pub use model::{
    Address, Clock, Coordinate, Model, ProcessStatus, Venue, VenueGroup, VenueId, ViewMode,
};
pub use search::SearchConfig;
pub use view::{StatusView, ViewModel};

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;
