//! DatexII energy-infrastructure sites to GeoJSON.
//!
//! The stages run strictly in order over one fully loaded document:
//! namespace stripping, per-site normalization (names, coordinates, refill
//! point scoring, address), feature assembly, and percentile ranking over
//! the retained features.

pub mod address;
pub mod feature;
pub mod rank;
pub mod refill;
pub mod site;
pub mod types;
pub mod utility;

use tracing::{debug, info};

use crate::error::DatexError;
use crate::node::{Node, into_sequence, strip_namespaces};
use feature::build_feature;
use rank::assign_percentiles;
use site::normalize_site;
use types::FeatureCollection;

const TABLE_PATH: &[&str] = &["payload", "energyInfrastructureTable"];

/// Result of one conversion run.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub collection: FeatureCollection,
    pub sites_seen: usize,
    pub sites_dropped: usize,
}

/// Converts a loaded document into a ranked feature collection.
///
/// Every `energyInfrastructureTable` under `payload` contributes its sites.
/// Sites without usable coordinates are skipped and excluded from ranking.
///
/// # Errors
///
/// Returns [`DatexError::MissingPath`] if the document has no
/// `payload → energyInfrastructureTable` element.
pub fn convert_document(document: Node) -> Result<Conversion, DatexError> {
    let mut document = strip_namespaces(document);
    let tables = document
        .remove(TABLE_PATH[0])
        .and_then(|mut payload| payload.remove(TABLE_PATH[1]))
        .ok_or_else(|| DatexError::missing(TABLE_PATH))?;

    let sites: Vec<Node> = into_sequence(tables)
        .into_iter()
        .flat_map(|mut table| {
            into_sequence(table.remove("energyInfrastructureSite").unwrap_or_default())
        })
        .collect();
    let sites_seen = sites.len();
    debug!(sites_seen, "Collected energy infrastructure sites");

    let mut features: Vec<_> = sites
        .into_iter()
        .filter_map(normalize_site)
        .map(build_feature)
        .collect();
    let sites_dropped = sites_seen - features.len();

    assign_percentiles(&mut features);

    info!(
        sites_seen,
        sites_dropped,
        features = features.len(),
        "Converted sites to features"
    );

    Ok(Conversion {
        collection: FeatureCollection::new(features),
        sites_seen,
        sites_dropped,
    })
}
