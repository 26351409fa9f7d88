use crux_core::App as _;
use tracing::{debug, info, warn};

use crate::capabilities::{Capabilities, LocationEvent};
use crate::coordinator::{EffectId, Ticket};
use crate::error::FetchErrorKind;
use crate::event::Event;
use crate::model::{Coordinate, Model, ProcessStatus, VenueGroup};
use crate::search;
use crate::view::ViewModel;

#[derive(Default)]
pub struct App;

impl App {
    fn start_location_updates(model: &mut Model, caps: &Capabilities) {
        if model.effects.is_running(EffectId::Location) {
            caps.location.stop_updates();
        }
        let ticket = model.effects.run(EffectId::Location);
        caps.location
            .start_updates(move |event| Event::Location { ticket, event });
        caps.location.request_permission();
    }

    fn stop_location_updates(model: &mut Model, caps: &Capabilities) {
        if model.effects.cancel(EffectId::Location).is_some() {
            caps.location.stop_updates();
        }
    }

    fn handle_location(&self, event: LocationEvent, model: &mut Model, caps: &Capabilities) {
        match event {
            LocationEvent::AuthorizationChanged(status) => {
                if !model.status.is_loading() {
                    debug!(?status, "authorization changed outside of a load cycle");
                    return;
                }
                debug!(
                    ?status,
                    authorized = status.is_authorized(),
                    "authorization changed, requesting a fix"
                );
                caps.location.request_fix();
            }

            LocationEvent::LocationsUpdated(locations) => {
                if !model.status.is_loading() {
                    debug!(
                        count = locations.len(),
                        "ignoring location update outside of a load cycle"
                    );
                    return;
                }
                // The first fix in a batch is authoritative.
                let Some(&first) = locations.first() else {
                    debug!("ignoring empty location batch");
                    return;
                };
                if locations.len() > 1 {
                    debug!(batch = locations.len(), "using first fix of batch");
                }

                model.current_location = Some(first);
                self.search_venues(first, model, caps);
                caps.render.render();
            }

            LocationEvent::Failed(error) => {
                warn!(%error, code = error.code(), "location services failed");
                model.status = ProcessStatus::LocationError(error);
                caps.render.render();
            }
        }
    }

    fn search_venues(&self, at: Coordinate, model: &mut Model, caps: &Capabilities) {
        let ticket = model.effects.run(EffectId::Search);
        let today = model.clock.today();

        match search::search_url(&model.search, at, today) {
            Ok(url) => {
                debug!(%ticket, "starting venue search");
                caps.venue_search.get(&url, move |outcome| {
                    let result = search::interpret(outcome).map_err(|error| {
                        warn!(%error, "venue search failed");
                        error.kind()
                    });
                    Event::VenueSearchCompleted { ticket, result }
                });
            }
            Err(error) => {
                warn!(%error, "could not build venue search request");
                self.update(
                    Event::VenueSearchCompleted {
                        ticket,
                        result: Err(error.kind()),
                    },
                    model,
                    caps,
                );
            }
        }
    }

    fn complete_search(
        ticket: Ticket,
        result: Result<Vec<VenueGroup>, FetchErrorKind>,
        model: &mut Model,
        caps: &Capabilities,
    ) {
        match result {
            Ok(groups) => {
                let group_count = groups.len();
                model.reconcile_selection(&groups);
                model.status = ProcessStatus::Loaded(groups);
                info!(
                    %ticket,
                    groups = group_count,
                    venues = model.venue_count(),
                    "venue search completed"
                );
            }
            Err(kind) => {
                warn!(%ticket, code = kind.code(), "venue search completed with an error");
                model.status = ProcessStatus::FetchError(kind);
            }
        }
        caps.render.render();
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        debug!(
            event = event.name(),
            user_initiated = event.is_user_initiated(),
            status = model.status.name(),
            "update"
        );

        match event {
            Event::ScreenAppeared => {
                model.current_location = None;
                model.status = ProcessStatus::Loading;
                model.effects.cancel(EffectId::Search);
                Self::start_location_updates(model, caps);
                caps.render.render();
            }

            Event::ScreenDisappeared => {
                Self::stop_location_updates(model, caps);
            }

            Event::ScreenTornDown => {
                Self::stop_location_updates(model, caps);
                let cancelled = model.effects.cancel_all();
                if !cancelled.is_empty() {
                    debug!(?cancelled, "cancelled outstanding effects on teardown");
                }
            }

            Event::ViewModeChanged(mode) => {
                model.view_mode = mode;
                caps.render.render();
            }

            Event::ShowVenueDetails(venue) => {
                model.selected_venue = Some(*venue);
                caps.render.render();
            }

            Event::DismissVenueDetails => {
                model.selected_venue = None;
                caps.render.render();
            }

            Event::Configure(config) => {
                info!(endpoint = %config.endpoint, "search configuration updated");
                model.search = *config;
            }

            Event::Location { ticket, event } => {
                if model.effects.admit(EffectId::Location, ticket) {
                    self.handle_location(event, model, caps);
                }
            }

            Event::VenueSearchCompleted { ticket, result } => {
                if model.effects.admit(EffectId::Search, ticket) {
                    Self::complete_search(ticket, result, model, caps);
                }
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        ViewModel::new(model)
    }
}
