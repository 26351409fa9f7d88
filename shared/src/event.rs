use serde::{Deserialize, Serialize};

use crate::capabilities::LocationEvent;
use crate::coordinator::Ticket;
use crate::error::FetchErrorKind;
use crate::model::{Venue, VenueGroup, ViewMode};
use crate::search::SearchConfig;

// Large variants are boxed to keep the enum small.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    // Screen lifecycle
    ScreenAppeared,
    ScreenDisappeared,
    ScreenTornDown,

    // User interaction
    ViewModeChanged(ViewMode),
    ShowVenueDetails(Box<Venue>),
    DismissVenueDetails,

    Configure(Box<SearchConfig>),

    // Capability responses, stamped with the ticket of the run that produced them
    #[serde(skip)]
    Location { ticket: Ticket, event: LocationEvent },
    #[serde(skip)]
    VenueSearchCompleted {
        ticket: Ticket,
        result: Result<Vec<VenueGroup>, FetchErrorKind>,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ScreenAppeared => "screen_appeared",
            Self::ScreenDisappeared => "screen_disappeared",
            Self::ScreenTornDown => "screen_torn_down",
            Self::ViewModeChanged(_) => "view_mode_changed",
            Self::ShowVenueDetails(_) => "show_venue_details",
            Self::DismissVenueDetails => "dismiss_venue_details",
            Self::Configure(_) => "configure",
            Self::Location { .. } => "location",
            Self::VenueSearchCompleted { .. } => "venue_search_completed",
        }
    }

    pub fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::ViewModeChanged(_) | Self::ShowVenueDetails(_) | Self::DismissVenueDetails
        )
    }
}
