mod http;
mod location;

pub use self::http::{
    HttpRequest, HttpResponse, HttpResult, TransportError, VenueSearch, VenueSearchOperation,
    DEFAULT_TIMEOUT_MS, MAX_RESPONSE_BODY_SIZE,
};
pub use self::location::{AuthorizationStatus, Location, LocationEvent, LocationOperation};

// We use Crux's built-in Render capability directly because it provides
// all necessary functionality for triggering view updates.
pub use crux_core::render::Render;

use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
#[effect(app = "App")]
pub struct Capabilities {
    pub location: Location<Event>,
    pub venue_search: VenueSearch<Event>,
    pub render: Render<Event>,
}
