use assert_matches::assert_matches;
use coffee_shared::testing::{group, venue};
use coffee_shared::{
    App, AuthorizationStatus, Coordinate, Effect, EffectId, Event, FetchErrorKind, LocationError,
    LocationEvent, Model, ProcessStatus, ViewMode,
};
use crux_core::testing::AppTester;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Step {
    Appear,
    Disappear,
    TearDown,
    Authorize,
    Fix(Vec<(f64, f64)>),
    LocationFails,
    SearchSucceeds(usize),
    SearchFails(bool),
    ChangeMode(bool),
    Show,
    Dismiss,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::Appear),
        Just(Step::Disappear),
        Just(Step::TearDown),
        Just(Step::Authorize),
        prop::collection::vec((-90.0..90.0f64, -180.0..180.0f64), 0..3).prop_map(Step::Fix),
        Just(Step::LocationFails),
        (0usize..3).prop_map(Step::SearchSucceeds),
        any::<bool>().prop_map(Step::SearchFails),
        any::<bool>().prop_map(Step::ChangeMode),
        Just(Step::Show),
        Just(Step::Dismiss),
    ]
}

/// Builds the event for `step`, or `None` when no running effect could have produced it.
fn event_for(step: &Step, model: &Model) -> Option<Event> {
    let location = |event| {
        model
            .effects
            .active(EffectId::Location)
            .map(|ticket| Event::Location { ticket, event })
    };
    let search = |result| {
        model
            .effects
            .active(EffectId::Search)
            .map(|ticket| Event::VenueSearchCompleted { ticket, result })
    };

    match step {
        Step::Appear => Some(Event::ScreenAppeared),
        Step::Disappear => Some(Event::ScreenDisappeared),
        Step::TearDown => Some(Event::ScreenTornDown),
        Step::Authorize => location(LocationEvent::AuthorizationChanged(
            AuthorizationStatus::AuthorizedWhenInUse,
        )),
        Step::Fix(points) => location(LocationEvent::LocationsUpdated(
            points
                .iter()
                .map(|&(lat, lng)| Coordinate::new(lat, lng).unwrap())
                .collect(),
        )),
        Step::LocationFails => location(LocationEvent::Failed(LocationError::Unavailable)),
        Step::SearchSucceeds(n) => search(Ok((0..*n)
            .map(|i| {
                group(
                    &format!("group-{i}"),
                    vec![venue(&format!("v{i}"), "Cafe", 50.0, 0.0)],
                )
            })
            .collect())),
        Step::SearchFails(client) => search(Err(if *client {
            FetchErrorKind::Client
        } else {
            FetchErrorKind::Network
        })),
        Step::ChangeMode(map) => Some(Event::ViewModeChanged(if *map {
            ViewMode::Map
        } else {
            ViewMode::List
        })),
        Step::Show => Some(Event::ShowVenueDetails(Box::new(venue(
            "picked", "Picked", 50.0, 0.0,
        )))),
        Step::Dismiss => Some(Event::DismissVenueDetails),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn every_action_sequence_keeps_the_state_machine_consistent(
        steps in prop::collection::vec(step(), 1..40)
    ) {
        let app = AppTester::<App, Effect>::default();
        let mut model = Model::default();

        for step in &steps {
            let Some(event) = event_for(step, &model) else { continue };
            let was_loading = model.status.is_loading();
            app.update(event, &mut model);

            assert_matches!(
                model.status,
                ProcessStatus::Loading
                    | ProcessStatus::Loaded(_)
                    | ProcessStatus::FetchError(_)
                    | ProcessStatus::LocationError(_)
            );
            prop_assert!(model.effects.in_flight() <= 2);

            match step {
                Step::Appear => {
                    prop_assert_eq!(&model.status, &ProcessStatus::Loading);
                    prop_assert_eq!(model.current_location, None);
                    prop_assert!(model.effects.is_running(EffectId::Location));
                    prop_assert!(!model.effects.is_running(EffectId::Search));
                }
                Step::Disappear | Step::TearDown => {
                    prop_assert!(!model.effects.is_running(EffectId::Location));
                }
                Step::Fix(points) if was_loading && !points.is_empty() => {
                    let (lat, lng) = points[0];
                    prop_assert_eq!(
                        model.current_location,
                        Some(Coordinate::new(lat, lng).unwrap())
                    );
                    prop_assert!(model.effects.is_running(EffectId::Search));
                }
                _ => {}
            }

            if matches!(model.status, ProcessStatus::Loaded(_) | ProcessStatus::FetchError(_)) {
                prop_assert!(!model.effects.is_running(EffectId::Search));
            }
        }
    }
}
