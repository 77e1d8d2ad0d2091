//! Refill-point trimming and capacity scoring.
//!
//! A site's score is the sum over its refill points of the strongest
//! connector at each point. Bad power values count as zero.

use serde_json::Value;

use crate::node::{Node, to_json, to_sequence};
use crate::transform::site::flatten_name;
use crate::transform::types::{ConnectorRecord, RefillPointRecord, Station};
use crate::transform::utility::parse_non_negative_float;

/// Trims a raw `energyInfrastructureStation` and computes the site score.
///
/// A missing station (`Null`) yields an empty station and a score of 0.0.
pub fn score_station(station: &Node) -> (Station, f64) {
    let mut refill_points = Vec::new();
    let mut total = 0.0;
    for raw in to_sequence(station.field("refillPoint")) {
        let (record, power) = trim_refill_point(raw);
        total += power;
        refill_points.push(record);
    }

    let auth = station
        .get("authenticationAndIdentificationMethods")
        .map(to_json)
        .unwrap_or_else(|| Value::Array(Vec::new()));

    (
        Station {
            authentication_and_identification_methods: auth,
            refill_point: refill_points,
        },
        total,
    )
}

/// Returns the thin record for one refill point and its strongest
/// connector's power (0.0 without connectors).
fn trim_refill_point(raw: &Node) -> (RefillPointRecord, f64) {
    let mut max_power: f64 = 0.0;
    let mut connectors = Vec::new();

    for connector in to_sequence(raw.field("connector")) {
        let power = connector
            .get("maxPowerAtSocket")
            .and_then(Node::as_str)
            .map(parse_non_negative_float)
            .unwrap_or(0.0);
        max_power = max_power.max(power);

        connectors.push(ConnectorRecord {
            connector_type: field_json(connector, "connectorType"),
            max_power_at_socket: field_json(connector, "maxPowerAtSocket"),
        });
    }

    let record = RefillPointRecord {
        name: flatten_name(raw),
        connector_count: connectors.len(),
        connectors,
    };
    (record, max_power)
}

fn field_json(node: &Node, key: &str) -> Value {
    node.get(key).map(to_json).unwrap_or(Value::Null)
}
