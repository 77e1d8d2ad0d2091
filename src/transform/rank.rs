use serde_json::Value;

use crate::transform::types::Feature;
use crate::transform::utility::round_to_tenth;

/// Writes a `percentile` property on every feature: the share of features
/// with a strictly lower score, in percent, rounded to one decimal.
///
/// Tied scores share the percentile of the lowest rank in the tie. An empty
/// slice is left alone.
pub fn assign_percentiles(features: &mut [Feature]) {
    if features.is_empty() {
        return;
    }

    let mut sorted: Vec<f64> = features.iter().map(|f| f.score).collect();
    sorted.sort_by(f64::total_cmp);
    let n = sorted.len() as f64;

    for feature in features.iter_mut() {
        let rank = sorted.partition_point(|s| *s < feature.score);
        let percentile = round_to_tenth(rank as f64 / n * 100.0);
        feature
            .properties
            .insert("percentile".into(), Value::from(percentile));
    }
}
