use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::transform::Conversion;
use crate::transform::utility::mean;

/// Summary of one conversion run, logged and optionally appended to a CSV.
#[derive(Debug, Default, Serialize)]
pub struct ConversionStats {
    pub timestamp: DateTime<Utc>,
    pub source: Option<String>,

    // sites
    pub sites_seen: usize,
    pub sites_dropped: usize,
    pub features: usize,

    // stations
    pub refill_points: usize,
    pub connectors: usize,

    // scores
    pub total_score: f64,
    pub min_score: f64,
    pub max_score: f64,
    pub mean_score: f64,

    pub output_bytes: Option<u64>,
}

impl ConversionStats {
    pub fn from_conversion(conversion: &Conversion) -> Self {
        let features = &conversion.collection.features;
        let scores: Vec<f64> = features.iter().map(|f| f.score).collect();

        let mut s = ConversionStats {
            timestamp: Utc::now(),
            sites_seen: conversion.sites_seen,
            sites_dropped: conversion.sites_dropped,
            features: features.len(),
            total_score: scores.iter().sum(),
            mean_score: mean(&scores),
            ..Default::default()
        };

        if !scores.is_empty() {
            s.min_score = scores.iter().copied().fold(f64::INFINITY, f64::min);
            s.max_score = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        }

        for feature in features {
            let refill_points = feature
                .properties
                .get("energyInfrastructureStation")
                .and_then(|station| station.get("refillPoint"))
                .and_then(|points| points.as_array());
            for point in refill_points.into_iter().flatten() {
                s.refill_points += 1;
                s.connectors += point
                    .get("connectorCount")
                    .and_then(|c| c.as_u64())
                    .unwrap_or(0) as usize;
            }
        }

        s
    }

    /// Share of sites that made it into the output, in percent.
    pub fn retention_pct(&self) -> f64 {
        if self.sites_seen == 0 {
            0.0
        } else {
            (self.features as f64 / self.sites_seen as f64) * 100.0
        }
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }

    pub fn with_output_bytes(mut self, bytes: u64) -> Self {
        self.output_bytes = Some(bytes);
        self
    }
}
