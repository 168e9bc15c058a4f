//! Tunable distances and thresholds, grouped by pipeline stage. All
//! distances are in the units of the (metric) input CRS.

use std::{f64::consts::FRAC_PI_4, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Decimal places accepted for coordinate rounding keys.
const PRECISION: std::ops::RangeInclusive<i32> = 0..=9;

/// Sidewalk redrawing: offset tagging, drawing, trimming and sanitizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedrawConfig {
    /// Minimum sidewalk offset, also the street buffer when no offset is known.
    pub buffer_min: f64,
    /// Sidewalks with every vertex this close to their street are duplicates.
    pub colinear_tolerance: f64,
    /// Douglas-Peucker tolerance applied to streets before offsetting.
    pub simplify_tolerance: f64,
    /// Terminal street segments shorter than this are dropped before offsetting.
    pub short_end_cutoff: f64,
    /// Street buffers are this fraction of the smallest offset.
    pub buffer_downscale: f64,
    /// Parts of a split sidewalk must exceed this length to be kept.
    pub multipart_min_length: f64,
    /// Sidewalks this short or shorter are dropped outright.
    pub min_length: f64,
}

impl Default for RedrawConfig {
    fn default() -> Self {
        Self {
            buffer_min: 6.0,
            colinear_tolerance: 0.1,
            simplify_tolerance: 0.05,
            short_end_cutoff: 0.5,
            buffer_downscale: 0.95,
            multipart_min_length: 10.0,
            min_length: 3.0,
        }
    }
}

/// Endpoint snapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Endpoints farther apart than this are never joined.
    pub threshold: f64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self { threshold: 14.0 }
    }
}

/// Crossing synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossingConfig {
    /// Two sidewalks meeting within this angle of head-on form a through
    /// line, not a corner. Default: π/4, i.e. (3π/4, 5π/4).
    pub parallel_tolerance: f64,
    /// Longest crossing considered.
    pub max_length: f64,
    /// Candidates this short or shorter are degenerate.
    pub min_length: f64,
    /// Landing points this close to a corner are moved onto it.
    pub corner_snap_distance: f64,
    /// Scale applied to a crossing before testing it against sidewalks.
    pub shrink: f64,
    /// Decimal places used to group coincident endpoints into corners.
    pub corner_precision: i32,
    /// Also reject a dead end snapped to a multi-sidewalk corner holding the
    /// same street's opposite side.
    pub transitive_dead_end: bool,
}

impl Default for CrossingConfig {
    fn default() -> Self {
        Self {
            parallel_tolerance: FRAC_PI_4,
            max_length: 30.0,
            min_length: 1e-5,
            corner_snap_distance: 3.0,
            shrink: 0.99,
            corner_precision: 6,
            transitive_dead_end: false,
        }
    }
}

/// Network splitting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Path endpoints within this distance of a sidewalk split it.
    pub tolerance: f64,
    /// Decimal places path endpoints are rounded to.
    pub precision: i32,
    /// Projections this close to a sidewalk's own ends are ignored.
    pub endpoint_tolerance: f64,
    /// Segments shorter than this get a flat (0) incline.
    pub flat_length: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self { tolerance: 0.1, precision: 3, endpoint_tolerance: 0.01, flat_length: 8.0 }
    }
}

/// Incline and point annotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotateConfig {
    /// Lines longer than this are cut into equal pieces before measuring incline.
    pub max_segment_length: f64,
    /// Points farther than this from every crossing annotate nothing.
    pub point_threshold: f64,
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        Self { max_segment_length: 20.0, point_threshold: 3.5 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub redraw: RedrawConfig,
    pub snap: SnapConfig,
    pub crossings: CrossingConfig,
    pub network: NetworkConfig,
    pub annotate: AnnotateConfig,
}

impl Config {
    /// Read a (partial) configuration from a JSON file; missing keys keep
    /// their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no stage can work with.
    pub fn validate(&self) -> crate::Result<()> {
        let positive = [
            ("redraw.buffer_min", self.redraw.buffer_min),
            ("redraw.short_end_cutoff", self.redraw.short_end_cutoff),
            ("snap.threshold", self.snap.threshold),
            ("crossings.max_length", self.crossings.max_length),
            ("crossings.corner_snap_distance", self.crossings.corner_snap_distance),
            ("network.tolerance", self.network.tolerance),
            ("annotate.max_segment_length", self.annotate.max_segment_length),
        ];
        if let Some((name, value)) = positive.iter().find(|(_, v)| !(*v > 0.0)) {
            return Err(Error::InvalidConfig(format!("{name} must be positive, got {value}")));
        }

        let fractions = [
            ("redraw.buffer_downscale", self.redraw.buffer_downscale),
            ("crossings.shrink", self.crossings.shrink),
        ];
        if let Some((name, value)) = fractions.iter().find(|(_, v)| !(*v > 0.0 && *v <= 1.0)) {
            return Err(Error::InvalidConfig(format!("{name} must be in (0, 1], got {value}")));
        }

        let precisions = [
            ("crossings.corner_precision", self.crossings.corner_precision),
            ("network.precision", self.network.precision),
        ];
        if let Some((name, value)) = precisions.iter().find(|(_, v)| !PRECISION.contains(v)) {
            return Err(Error::InvalidConfig(format!(
                "{name} must be in {}..={}, got {value}", PRECISION.start(), PRECISION.end()
            )));
        }

        if self.crossings.min_length >= self.crossings.max_length {
            return Err(Error::InvalidConfig("crossings.min_length must be below crossings.max_length".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.redraw.buffer_min, 6.0);
        assert_eq!(config.snap.threshold, 14.0);
        assert_eq!(config.crossings.max_length, 30.0);
        assert_eq!(config.network.flat_length, 8.0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "snap": {{ "threshold": 10.0 }}, "crossings": {{ "max_length": 25 }} }}"#).unwrap();

        let config = Config::from_json_file(file.path()).unwrap();
        assert_eq!(config.snap.threshold, 10.0);
        assert_eq!(config.crossings.max_length, 25.0);
        assert_eq!(config.crossings.corner_snap_distance, 3.0);
        assert_eq!(config.redraw.min_length, 3.0);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let mut config = Config::default();
        config.snap.threshold = 0.0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = Config::default();
        config.crossings.shrink = 1.5;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));

        let mut config = Config::default();
        config.network.tolerance = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rounding_precision_is_bounded() {
        // Past 9 decimals, projected coordinates scaled to integers overflow.
        let mut config = Config::default();
        config.crossings.corner_precision = 12;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(msg)) if msg.contains("corner_precision")));

        let mut config = Config::default();
        config.network.precision = -1;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(msg)) if msg.contains("network.precision")));

        let mut config = Config::default();
        config.crossings.corner_precision = 9;
        config.network.precision = 0;
        assert!(config.validate().is_ok());
    }
}
