use crux_core::capability::{CapabilityContext, Operation};
use futures_util::StreamExt;
use serde::{Deserialize, Serialize};

use crate::error::LocationError;
use crate::model::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorizationStatus {
    NotDetermined,
    Restricted,
    Denied,
    AuthorizedWhenInUse,
    AuthorizedAlways,
}

impl AuthorizationStatus {
    pub fn is_authorized(self) -> bool {
        matches!(self, Self::AuthorizedWhenInUse | Self::AuthorizedAlways)
    }
}

/// What the device location services report on the update stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LocationEvent {
    AuthorizationChanged(AuthorizationStatus),
    /// Most relevant fix first.
    LocationsUpdated(Vec<Coordinate>),
    Failed(LocationError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationOperation {
    RequestPermission,
    RequestFix,
    /// Opens the event stream. The shell keeps resolving it until `StopUpdates`.
    StartUpdates,
    StopUpdates,
}

impl Operation for LocationOperation {
    type Output = LocationEvent;
}

#[derive(crux_core::macros::Capability)]
pub struct Location<Ev> {
    context: CapabilityContext<LocationOperation, Ev>,
}

impl<Ev> Location<Ev> {
    pub fn new(context: CapabilityContext<LocationOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> Location<Ev>
where
    Ev: Send + 'static,
{
    pub fn request_permission(&self) {
        self.notify(LocationOperation::RequestPermission);
    }

    pub fn request_fix(&self) {
        self.notify(LocationOperation::RequestFix);
    }

    pub fn stop_updates(&self) {
        self.notify(LocationOperation::StopUpdates);
    }

    /// Subscribes to location events; each one is mapped through `make_event`.
    pub fn start_updates<F>(&self, make_event: F)
    where
        F: Fn(LocationEvent) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let mut events = ctx.stream_from_shell(LocationOperation::StartUpdates);
            while let Some(event) = events.next().await {
                ctx.update_app(make_event(event));
            }
        });
    }

    fn notify(&self, operation: LocationOperation) {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            ctx.notify_shell(operation).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_granted_statuses_count_as_authorized() {
        assert!(AuthorizationStatus::AuthorizedWhenInUse.is_authorized());
        assert!(AuthorizationStatus::AuthorizedAlways.is_authorized());
        assert!(!AuthorizationStatus::Denied.is_authorized());
        assert!(!AuthorizationStatus::Restricted.is_authorized());
        assert!(!AuthorizationStatus::NotDetermined.is_authorized());
    }

    #[test]
    fn location_events_round_trip_through_the_shell_format() {
        let event = LocationEvent::LocationsUpdated(vec![Coordinate::new(50.831, -0.129).unwrap()]);
        let json = serde_json::to_string(&event).unwrap();
        let back: LocationEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
