//! Route adapter - turns (user, vehicles) into a drawable route overlay.
//!
//! Every input change discards the previous overlay and recomputes from
//! scratch. In-flight requests are not aborted; each captures a generation
//! and its result is only applied if no newer update has started since.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use super::client::{Route, RoutingClient};
use crate::coord::Coordinate;
use crate::vehicle::Vehicle;

/// Distance and duration summary of a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteInfo {
    pub distance_km: f64,
    pub duration_min: f64,
}

/// What the map draws for the current route.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RouteOverlay {
    pub polyline: Vec<Coordinate>,
    pub info: Option<RouteInfo>,
}

impl RouteOverlay {
    pub fn is_empty(&self) -> bool {
        self.polyline.is_empty() && self.info.is_none()
    }
}

impl From<Route> for RouteOverlay {
    fn from(route: Route) -> Self {
        Self {
            polyline: route.polyline,
            info: Some(RouteInfo {
                distance_km: route.distance_m / 1000.0,
                duration_min: route.duration_s / 60.0,
            }),
        }
    }
}

/// Route destination: the first vehicle's garage coordinate.
///
/// Later candidates are never consulted, even when the first has no
/// usable coordinate.
pub fn select_destination(vehicles: &[Vehicle]) -> Option<Coordinate> {
    vehicles.first()?.garage_coordinate()
}

/// Route computation with stale-response protection.
pub struct RouteAdapter<R: RoutingClient> {
    client: Arc<R>,

    /// Current generation. Held while publishing so a check and the send
    /// that follows cannot interleave with a newer update.
    generation: Arc<Mutex<u64>>,

    overlay_tx: Arc<watch::Sender<RouteOverlay>>,
}

impl<R: RoutingClient> RouteAdapter<R> {
    pub fn new(client: Arc<R>) -> Self {
        let (overlay_tx, _) = watch::channel(RouteOverlay::default());
        Self {
            client,
            generation: Arc::new(Mutex::new(0)),
            overlay_tx: Arc::new(overlay_tx),
        }
    }

    /// Compute the overlay for one input, without publishing it.
    pub async fn compute(&self, user: Option<Coordinate>, vehicles: &[Vehicle]) -> RouteOverlay {
        compute_overlay(self.client.as_ref(), user, select_destination(vehicles)).await
    }

    /// Start recomputing for new inputs.
    ///
    /// The published overlay is reset to empty immediately; the result is
    /// published when the request finishes, unless a newer update or a
    /// [`clear`](Self::clear) has happened in the meantime.
    pub fn update(&self, user: Option<Coordinate>, vehicles: &[Vehicle]) -> JoinHandle<()> {
        let destination = select_destination(vehicles);
        let generation = {
            let mut current = self.generation.lock();
            *current += 1;
            self.overlay_tx.send_replace(RouteOverlay::default());
            *current
        };

        let client = Arc::clone(&self.client);
        let current = Arc::clone(&self.generation);
        let overlay_tx = Arc::clone(&self.overlay_tx);

        tokio::spawn(async move {
            let overlay = compute_overlay(client.as_ref(), user, destination).await;

            let latest = current.lock();
            if *latest != generation {
                debug!(
                    generation,
                    latest = *latest,
                    "Discarding superseded route response"
                );
                return;
            }
            overlay_tx.send_replace(overlay);
        })
    }

    /// Drop the current overlay and ignore any in-flight result.
    pub fn clear(&self) {
        let mut current = self.generation.lock();
        *current += 1;
        self.overlay_tx.send_replace(RouteOverlay::default());
    }

    /// The most recently published overlay.
    pub fn current(&self) -> RouteOverlay {
        self.overlay_tx.borrow().clone()
    }

    /// Subscribe to overlay changes.
    pub fn subscribe(&self) -> watch::Receiver<RouteOverlay> {
        self.overlay_tx.subscribe()
    }
}

async fn compute_overlay<R: RoutingClient>(
    client: &R,
    user: Option<Coordinate>,
    destination: Option<Coordinate>,
) -> RouteOverlay {
    let (Some(origin), Some(destination)) = (user, destination) else {
        return RouteOverlay::default();
    };

    match client.fetch_route(origin, destination).await {
        Ok(route) => RouteOverlay::from(route),
        Err(e) => {
            debug!(
                origin = %origin,
                destination = %destination,
                error = %e,
                "Route computation failed, showing no route"
            );
            RouteOverlay::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::RoutingError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Mock routing client returning a fixed two-point route after a
    /// per-call delay.
    struct MockRouter {
        calls: AtomicUsize,
        fail: bool,
        delays_ms: Mutex<Vec<u64>>,
    }

    impl MockRouter {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
                delays_ms: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::ok()
            }
        }

        fn with_delays(delays_ms: Vec<u64>) -> Self {
            Self {
                delays_ms: Mutex::new(delays_ms),
                ..Self::ok()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl RoutingClient for MockRouter {
        async fn fetch_route(
            &self,
            origin: Coordinate,
            destination: Coordinate,
        ) -> Result<Route, RoutingError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let delay = self.delays_ms.lock().get(call).copied().unwrap_or(0);
            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            if self.fail {
                return Err(RoutingError::Status(503));
            }
            Ok(Route {
                polyline: vec![origin, destination],
                distance_m: 2500.0,
                duration_s: 300.0,
            })
        }
    }

    fn user() -> Coordinate {
        Coordinate::new(14.5547, 121.0244).unwrap()
    }

    #[tokio::test]
    async fn test_no_user_no_call() {
        let router = Arc::new(MockRouter::ok());
        let adapter = RouteAdapter::new(Arc::clone(&router));

        let overlay = adapter
            .compute(None, &[Vehicle::new("v1", 14.6, 121.0)])
            .await;

        assert!(overlay.is_empty());
        assert_eq!(router.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_vehicle_list_no_call() {
        let router = Arc::new(MockRouter::ok());
        let adapter = RouteAdapter::new(Arc::clone(&router));

        let overlay = adapter.compute(Some(user()), &[]).await;

        assert!(overlay.is_empty());
        assert_eq!(router.calls(), 0);
    }

    #[tokio::test]
    async fn test_only_first_vehicle_considered() {
        let router = Arc::new(MockRouter::ok());
        let adapter = RouteAdapter::new(Arc::clone(&router));
        let vehicles = vec![
            Vehicle::without_garage("v1"),
            Vehicle::new("v2", 14.6, 121.0),
        ];

        let overlay = adapter.compute(Some(user()), &vehicles).await;

        assert!(overlay.is_empty());
        assert_eq!(router.calls(), 0);
    }

    #[tokio::test]
    async fn test_route_to_first_vehicle() {
        let router = Arc::new(MockRouter::ok());
        let adapter = RouteAdapter::new(Arc::clone(&router));
        let vehicles = vec![
            Vehicle::new("v1", 14.6, 121.0),
            Vehicle::new("v2", 10.0, 120.0),
        ];

        let overlay = adapter.compute(Some(user()), &vehicles).await;

        assert_eq!(router.calls(), 1);
        assert_eq!(overlay.polyline.len(), 2);
        assert_eq!(overlay.polyline[1], Coordinate::new(14.6, 121.0).unwrap());
        let info = overlay.info.unwrap();
        assert_eq!(info.distance_km, 2.5);
        assert_eq!(info.duration_min, 5.0);
    }

    #[tokio::test]
    async fn test_failure_is_swallowed() {
        let router = Arc::new(MockRouter::failing());
        let adapter = RouteAdapter::new(Arc::clone(&router));

        let overlay = adapter
            .compute(Some(user()), &[Vehicle::new("v1", 14.6, 121.0)])
            .await;

        assert_eq!(router.calls(), 1);
        assert!(overlay.polyline.is_empty());
        assert!(overlay.info.is_none());
    }

    #[tokio::test]
    async fn test_update_publishes() {
        let router = Arc::new(MockRouter::ok());
        let adapter = RouteAdapter::new(Arc::clone(&router));
        let rx = adapter.subscribe();

        adapter
            .update(Some(user()), &[Vehicle::new("v1", 14.6, 121.0)])
            .await
            .unwrap();

        assert!(rx.borrow().info.is_some());
        assert_eq!(adapter.current().polyline.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_resets_before_recompute() {
        let router = Arc::new(MockRouter::with_delays(vec![0, 1_000]));
        let adapter = RouteAdapter::new(Arc::clone(&router));
        let vehicles = vec![Vehicle::new("v1", 14.6, 121.0)];

        adapter.update(Some(user()), &vehicles).await.unwrap();
        assert!(!adapter.current().is_empty());

        let pending = adapter.update(Some(user()), &vehicles);
        assert!(adapter.current().is_empty());

        pending.await.unwrap();
        assert!(!adapter.current().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_response_discarded() {
        // First request is slow, second is fast
        let router = Arc::new(MockRouter::with_delays(vec![5_000, 100]));
        let adapter = RouteAdapter::new(Arc::clone(&router));

        let far = vec![Vehicle::new("far", 10.0, 120.0)];
        let near = vec![Vehicle::new("near", 14.6, 121.0)];

        let slow = adapter.update(Some(user()), &far);
        tokio::task::yield_now().await;
        let fast = adapter.update(Some(user()), &near);

        fast.await.unwrap();
        slow.await.unwrap();

        let overlay = adapter.current();
        assert_eq!(
            overlay.polyline.last(),
            Some(&Coordinate::new(14.6, 121.0).unwrap())
        );
        assert_eq!(router.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_discards_in_flight() {
        let router = Arc::new(MockRouter::with_delays(vec![1_000]));
        let adapter = RouteAdapter::new(Arc::clone(&router));

        let pending = adapter.update(Some(user()), &[Vehicle::new("v1", 14.6, 121.0)]);
        adapter.clear();
        pending.await.unwrap();

        assert!(adapter.current().is_empty());
    }

    #[test]
    fn test_select_destination() {
        assert!(select_destination(&[]).is_none());
        assert_eq!(
            select_destination(&[Vehicle::new("v1", 1.0, 2.0)]),
            Some(Coordinate::new(1.0, 2.0).unwrap())
        );
    }
}
