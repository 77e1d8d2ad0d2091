//! Output types for the GeoJSON document.

use serde::Serialize;
use serde_json::{Map, Value};

/// Connector reduced to the fields the map front-end displays.
///
/// `max_power_at_socket` keeps the source text, not the parsed number.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectorRecord {
    pub connector_type: Value,
    pub max_power_at_socket: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefillPointRecord {
    pub name: String,
    pub connector_count: usize,
    pub connectors: Vec<ConnectorRecord>,
}

/// Trimmed `energyInfrastructureStation`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub authentication_and_identification_methods: Value,
    pub refill_point: Vec<RefillPointRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
}

impl Geometry {
    pub fn point(lat: f64, lon: f64) -> Self {
        Geometry {
            kind: "Point",
            coordinates: [lon, lat],
        }
    }
}

/// One site on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub geometry: Geometry,
    pub properties: Map<String, Value>,
    #[serde(skip)]
    pub score: f64,
}

impl Feature {
    pub fn percentile(&self) -> Option<f64> {
        self.properties.get("percentile").and_then(Value::as_f64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        FeatureCollection {
            kind: "FeatureCollection",
            features,
        }
    }
}
