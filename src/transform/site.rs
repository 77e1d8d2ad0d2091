//! Per-site normalization: names, operator, coordinates.

use serde_json::{Map, Value};
use tracing::debug;

use crate::node::{Node, to_json};
use crate::transform::address::resolve_address;
use crate::transform::refill::score_station;

/// A site that passed coordinate extraction, ready to become a feature.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSite {
    pub latitude: f64,
    pub longitude: f64,
    pub score: f64,
    pub properties: Map<String, Value>,
}

/// Text at `name → values → value → #text`, or an empty string when any
/// link is missing or is not a mapping.
///
/// Shared by sites, operators and refill points.
pub fn flatten_name(record: &Node) -> String {
    record
        .path(&["name", "values", "value"])
        .and_then(Node::text)
        .unwrap_or_default()
        .to_string()
}

/// Reads `locationReference → coordinatesForDisplay` as `(latitude, longitude)`.
///
/// `None` when either value is missing or not a finite decimal number.
pub fn coordinates(site: &Node) -> Option<(f64, f64)> {
    let display = site.path(&["locationReference", "coordinatesForDisplay"])?;
    let latitude = parse_decimal(display.get("latitude")?)?;
    let longitude = parse_decimal(display.get("longitude")?)?;
    Some((latitude, longitude))
}

fn parse_decimal(node: &Node) -> Option<f64> {
    node.as_str()?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Runs one namespace-stripped site through every per-site stage.
///
/// Returns `None` for sites without usable coordinates; those never reach
/// the output.
pub fn normalize_site(mut site: Node) -> Option<NormalizedSite> {
    let Some((latitude, longitude)) = coordinates(&site) else {
        debug!(
            site_id = site.get("@id").and_then(Node::as_str).unwrap_or("<none>"),
            "Dropping site without valid coordinates"
        );
        return None;
    };

    let operator = flatten_name(site.field("operator"));
    let name = flatten_name(&site);
    let (station, score) = score_station(site.field("energyInfrastructureStation"));
    let address = resolve_address(&site);
    site.remove("locationReference");

    let mut properties = match to_json(&site) {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    properties.insert("operator".into(), Value::String(operator));
    properties.insert("name".into(), Value::String(name));
    properties.insert(
        "energyInfrastructureStation".into(),
        serde_json::to_value(station).unwrap_or(Value::Null),
    );
    properties.insert("town".into(), Value::String(address.town));
    properties.insert("address".into(), Value::String(address.address));
    properties.insert("score".into(), Value::from(score));

    Some(NormalizedSite {
        latitude,
        longitude,
        score,
        properties,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(s: &str) -> Node {
        Node::Scalar(s.to_string())
    }

    fn mapping(entries: Vec<(&str, Node)>) -> Node {
        Node::Mapping(entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
    }

    fn named(text: Node) -> Node {
        mapping(vec![(
            "name",
            mapping(vec![("values", mapping(vec![("value", text)]))]),
        )])
    }

    fn located(lat: &str, lon: &str) -> Node {
        mapping(vec![(
            "locationReference",
            mapping(vec![(
                "coordinatesForDisplay",
                mapping(vec![("latitude", scalar(lat)), ("longitude", scalar(lon))]),
            )]),
        )])
    }

    #[test]
    fn test_flatten_name_reads_text() {
        let record = named(mapping(vec![("@lang", scalar("de")), ("#text", scalar("Ladepark"))]));
        assert_eq!(flatten_name(&record), "Ladepark");
    }

    #[test]
    fn test_flatten_name_missing_links_give_empty() {
        assert_eq!(flatten_name(&mapping(vec![])), "");
        assert_eq!(flatten_name(&Node::Null), "");
        // a bare scalar value has no #text field
        assert_eq!(flatten_name(&named(scalar("Ladepark"))), "");
        // multiple language values are a sequence, not a mapping
        assert_eq!(
            flatten_name(&named(Node::Sequence(vec![scalar("a"), scalar("b")]))),
            ""
        );
    }

    #[test]
    fn test_coordinates_valid() {
        assert_eq!(coordinates(&located("48.2", " 16.3 ")), Some((48.2, 16.3)));
    }

    #[test]
    fn test_coordinates_invalid() {
        assert_eq!(coordinates(&located("48.2", "east")), None);
        assert_eq!(coordinates(&located("nan", "16.3")), None);
        assert_eq!(coordinates(&mapping(vec![])), None);

        let lat_only = mapping(vec![(
            "locationReference",
            mapping(vec![(
                "coordinatesForDisplay",
                mapping(vec![("latitude", scalar("48.2"))]),
            )]),
        )]);
        assert_eq!(coordinates(&lat_only), None);
    }

    #[test]
    fn test_normalize_site_drops_invalid_coordinates() {
        assert!(normalize_site(located("", "16.3")).is_none());
    }

    #[test]
    fn test_normalize_site_property_order() {
        let location = located("48.2", "16.3").remove("locationReference").unwrap();
        let site = mapping(vec![
            ("@id", scalar("site-1")),
            ("name", Node::Null),
            ("lastUpdated", scalar("2024-01-01T00:00:00Z")),
            ("locationReference", location),
        ]);

        let normalized = normalize_site(site).unwrap();
        let keys: Vec<&str> = normalized.properties.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "@id",
                "name",
                "lastUpdated",
                "operator",
                "energyInfrastructureStation",
                "town",
                "address",
                "score",
            ]
        );
        assert_eq!(normalized.latitude, 48.2);
        assert_eq!(normalized.longitude, 16.3);
        assert_eq!(normalized.score, 0.0);
    }
}
