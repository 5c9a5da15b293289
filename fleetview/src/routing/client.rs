//! Routing client trait and OSRM implementation.
//!
//! The [`RoutingClient`] trait abstracts over routing providers so the
//! adapter can be driven by a mock in tests. [`OsrmClient`] talks to the
//! OSRM HTTP route service via `reqwest`.

use std::future::Future;

use serde::Deserialize;
use tracing::{debug, trace};

use super::config::RoutingConfig;
use super::error::RoutingError;
use crate::coord::Coordinate;

const USER_AGENT: &str = concat!("fleetview/", env!("CARGO_PKG_VERSION"));

/// A computed route.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Path from origin to destination in latitude/longitude order.
    pub polyline: Vec<Coordinate>,

    /// Total length in meters.
    pub distance_m: f64,

    /// Expected travel time in seconds.
    pub duration_s: f64,
}

/// Trait for fetching a route between two points.
pub trait RoutingClient: Send + Sync + 'static {
    fn fetch_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> impl Future<Output = Result<Route, RoutingError>> + Send;
}

/// OSRM `route/v1` response. Only the fields we draw are deserialized.
#[derive(Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
    distance: f64,
    duration: f64,
}

/// GeoJSON LineString; pairs are `[lon, lat]`.
#[derive(Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

/// Parse an OSRM route response body.
///
/// Geometry pairs are flipped from `[lon, lat]`; pairs that do not form a
/// valid coordinate are dropped.
pub fn parse_osrm_response(bytes: &[u8]) -> Result<Route, RoutingError> {
    let response: OsrmResponse =
        serde_json::from_slice(bytes).map_err(|e| RoutingError::Json(e.to_string()))?;

    if response.code != "Ok" {
        let detail = match response.message {
            Some(message) => format!("{}: {}", response.code, message),
            None => response.code,
        };
        return Err(RoutingError::NoRoute(detail));
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| RoutingError::NoRoute("empty route list".to_string()))?;

    let total = route.geometry.coordinates.len();
    let polyline: Vec<Coordinate> = route
        .geometry
        .coordinates
        .into_iter()
        .filter_map(|pair| Coordinate::from_lon_lat(pair).ok())
        .collect();

    if polyline.len() < total {
        trace!(
            dropped = total - polyline.len(),
            "Dropped invalid route geometry points"
        );
    }
    if polyline.is_empty() {
        return Err(RoutingError::InvalidGeometry);
    }

    Ok(Route {
        polyline,
        distance_m: route.distance,
        duration_s: route.duration,
    })
}

/// OSRM client using direct HTTP requests.
///
/// Uses a reusable `reqwest::Client` with connection pooling and the
/// configured timeout.
pub struct OsrmClient {
    http: reqwest::Client,
    config: RoutingConfig,
}

impl OsrmClient {
    pub fn new(config: RoutingConfig) -> Result<Self, RoutingError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RoutingError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Request URL for a route between two points.
    pub fn route_url(&self, origin: &Coordinate, destination: &Coordinate) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}?overview=full&geometries=geojson",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            origin.longitude(),
            origin.latitude(),
            destination.longitude(),
            destination.latitude(),
        )
    }
}

impl RoutingClient for OsrmClient {
    async fn fetch_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Route, RoutingError> {
        let url = self.route_url(&origin, &destination);
        trace!(url = %url, "Route request starting");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| RoutingError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RoutingError::Status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| RoutingError::Http(e.to_string()))?;

        let route = parse_osrm_response(&bytes)?;
        debug!(
            points = route.polyline.len(),
            distance_m = route.distance_m,
            duration_s = route.duration_s,
            "Route fetched"
        );
        Ok(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OK_BODY: &str = r#"{
        "code": "Ok",
        "routes": [{
            "geometry": {
                "type": "LineString",
                "coordinates": [[121.0244, 14.5547], [121.0300, 14.5600], [121.0400, 14.5700]]
            },
            "legs": [],
            "weight_name": "routability",
            "weight": 812.3,
            "distance": 3250.0,
            "duration": 540.0
        }],
        "waypoints": []
    }"#;

    #[test]
    fn test_parse_flips_lon_lat() {
        let route = parse_osrm_response(OK_BODY.as_bytes()).unwrap();
        assert_eq!(route.polyline.len(), 3);
        assert_eq!(route.polyline[0].latitude(), 14.5547);
        assert_eq!(route.polyline[0].longitude(), 121.0244);
        assert_eq!(route.distance_m, 3250.0);
        assert_eq!(route.duration_s, 540.0);
    }

    #[test]
    fn test_parse_drops_invalid_points() {
        let body = r#"{
            "code": "Ok",
            "routes": [{
                "geometry": {"coordinates": [[121.0, 14.5], [500.0, 14.5], [121.1, 95.0], [121.2, 14.7]]},
                "distance": 100.0,
                "duration": 60.0
            }]
        }"#;
        let route = parse_osrm_response(body.as_bytes()).unwrap();
        assert_eq!(route.polyline.len(), 2);
        assert_eq!(route.polyline[1].longitude(), 121.2);
    }

    #[test]
    fn test_parse_no_route_code() {
        let body = r#"{"code": "NoRoute", "message": "Impossible route between points"}"#;
        let err = parse_osrm_response(body.as_bytes()).unwrap_err();
        assert!(matches!(err, RoutingError::NoRoute(ref m) if m.contains("Impossible")));
    }

    #[test]
    fn test_parse_empty_routes() {
        let body = r#"{"code": "Ok", "routes": []}"#;
        assert!(matches!(
            parse_osrm_response(body.as_bytes()),
            Err(RoutingError::NoRoute(_))
        ));
    }

    #[test]
    fn test_parse_all_points_invalid() {
        let body = r#"{
            "code": "Ok",
            "routes": [{"geometry": {"coordinates": [[500.0, 500.0]]}, "distance": 1.0, "duration": 1.0}]
        }"#;
        assert!(matches!(
            parse_osrm_response(body.as_bytes()),
            Err(RoutingError::InvalidGeometry)
        ));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(
            parse_osrm_response(b"<html>502</html>"),
            Err(RoutingError::Json(_))
        ));
    }

    #[test]
    fn test_route_url_lon_lat_order() {
        let client = OsrmClient::new(RoutingConfig {
            base_url: "http://localhost:5000/".to_string(),
            ..RoutingConfig::default()
        })
        .unwrap();

        let origin = Coordinate::new(14.5547, 121.0244).unwrap();
        let dest = Coordinate::new(14.57, 121.04).unwrap();
        assert_eq!(
            client.route_url(&origin, &dest),
            "http://localhost:5000/route/v1/driving/121.0244,14.5547;121.04,14.57?overview=full&geometries=geojson"
        );
    }
}
