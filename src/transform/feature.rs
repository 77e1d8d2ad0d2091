use crate::transform::site::NormalizedSite;
use crate::transform::types::{Feature, Geometry};

/// Wraps a normalized site as a GeoJSON point feature (`[lon, lat]`).
pub fn build_feature(site: NormalizedSite) -> Feature {
    Feature {
        kind: "Feature",
        geometry: Geometry::point(site.latitude, site.longitude),
        properties: site.properties,
        score: site.score,
    }
}
