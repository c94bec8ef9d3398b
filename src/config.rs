use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tolerances and thresholds for one export run.
///
/// Passed by reference into every pipeline call; nothing here is global.
/// Lengths are in model units (metres for typical documents).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Segments shorter than this are discarded.
    pub min_segment_length: f64,
    /// Grid pitch that endpoints are snapped to.
    pub snap_pitch: f64,
    /// Decimal places kept in emitted coordinates.
    pub output_precision: u32,
    /// Distance tolerance used by the planarizer and face extractor.
    pub planarize_eps: f64,
    /// Longest bridge synthesized between a dangling boundary end and glazing.
    pub max_bridge_length: f64,
    /// Bridges shorter than this are skipped (the ends already touch).
    pub bridge_eps: f64,
    /// Half-window along the opening tangent sampled for glazing panel lines.
    pub glazing_sample_along: f64,
    /// Largest normal offset from the opening center for a sampled panel line.
    pub glazing_sample_max_normal: f64,
    /// Minimum absolute cosine for two directions to count as parallel.
    pub parallel_threshold: f64,
    /// Sampled panel faces closer together than this are rejected.
    pub min_panel_thickness: f64,
    /// Distance within which a glazing segment touches the room boundary.
    pub boundary_glazing_tolerance: f64,
    /// Boundary segments drawn over glazing within this distance are removed.
    pub redraw_tolerance: f64,
    /// Endpoint tolerance for removing short step artifacts along glazing.
    pub step_tolerance: f64,
    /// Outward shift of the outer closing line for glazing openings.
    pub opening_outer_shift: f64,
    /// Radius around an opening within which the local ray search runs.
    pub opening_search_radius: f64,
    /// Margin around a room's bounding box for collecting nearby glazing.
    pub room_glazing_margin: f64,
    /// Minimum `|n.z|` for a solid face to count as near-horizontal.
    pub horizontal_normal_threshold: f64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            min_segment_length: 1e-3,
            snap_pitch: 1e-4,
            output_precision: 4,
            planarize_eps: 1e-6,
            max_bridge_length: 0.6,
            bridge_eps: 1e-4,
            glazing_sample_along: 0.6,
            glazing_sample_max_normal: 0.3,
            parallel_threshold: 0.85,
            min_panel_thickness: 0.01,
            boundary_glazing_tolerance: 0.35,
            redraw_tolerance: 0.45,
            step_tolerance: 0.05,
            opening_outer_shift: 0.0,
            opening_search_radius: 2.0,
            room_glazing_margin: 1.0,
            horizontal_normal_threshold: 0.95,
        }
    }
}

impl ExportConfig {
    /// Creates a configuration with default tolerances.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the snapping grid pitch.
    #[must_use]
    pub fn with_snap_pitch(mut self, pitch: f64) -> Self {
        self.snap_pitch = pitch;
        self
    }

    /// Sets the minimum kept segment length.
    #[must_use]
    pub fn with_min_segment_length(mut self, length: f64) -> Self {
        self.min_segment_length = length;
        self
    }

    /// Sets the longest bridge the room reconciler may synthesize.
    #[must_use]
    pub fn with_max_bridge_length(mut self, length: f64) -> Self {
        self.max_bridge_length = length;
        self
    }

    /// Sets the boundary/glazing touching and redraw tolerances.
    #[must_use]
    pub fn with_glazing_tolerances(mut self, touching: f64, redraw: f64) -> Self {
        self.boundary_glazing_tolerance = touching;
        self.redraw_tolerance = redraw;
        self
    }

    /// Sets the outward shift applied to the outer glazing closing line.
    #[must_use]
    pub fn with_opening_outer_shift(mut self, shift: f64) -> Self {
        self.opening_outer_shift = shift;
        self
    }

    /// Sets the number of decimals kept in emitted coordinates.
    #[must_use]
    pub fn with_output_precision(mut self, decimals: u32) -> Self {
        self.output_precision = decimals;
        self
    }

    /// Checks that every tolerance is usable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NonPositive` for a non-positive pitch, length or
    /// tolerance, and `ConfigError::OutOfRange` for thresholds outside
    /// their valid interval.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("min_segment_length", self.min_segment_length),
            ("snap_pitch", self.snap_pitch),
            ("planarize_eps", self.planarize_eps),
            ("max_bridge_length", self.max_bridge_length),
            ("bridge_eps", self.bridge_eps),
            ("glazing_sample_along", self.glazing_sample_along),
            ("glazing_sample_max_normal", self.glazing_sample_max_normal),
            ("min_panel_thickness", self.min_panel_thickness),
            ("boundary_glazing_tolerance", self.boundary_glazing_tolerance),
            ("redraw_tolerance", self.redraw_tolerance),
            ("step_tolerance", self.step_tolerance),
            ("opening_search_radius", self.opening_search_radius),
        ];
        for (name, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        let unit = [
            ("parallel_threshold", self.parallel_threshold),
            ("horizontal_normal_threshold", self.horizontal_normal_threshold),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::OutOfRange {
                    name,
                    value,
                    min: 0.0,
                    max: 1.0,
                });
            }
        }

        if self.room_glazing_margin < 0.0 {
            return Err(ConfigError::OutOfRange {
                name: "room_glazing_margin",
                value: self.room_glazing_margin,
                min: 0.0,
                max: f64::INFINITY,
            });
        }

        if self.output_precision > 12 {
            return Err(ConfigError::OutOfRange {
                name: "output_precision",
                value: f64::from(self.output_precision),
                min: 0.0,
                max: 12.0,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(ExportConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_pitch_is_rejected() {
        let err = ExportConfig::new().with_snap_pitch(0.0).validate().unwrap_err();
        assert!(matches!(err, ConfigError::NonPositive { name: "snap_pitch", .. }));
    }

    #[test]
    fn nan_tolerance_is_rejected() {
        let cfg = ExportConfig::new().with_max_bridge_length(f64::NAN);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn threshold_above_one_is_rejected() {
        let cfg = ExportConfig {
            parallel_threshold: 1.5,
            ..ExportConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, ConfigError::OutOfRange { name: "parallel_threshold", .. }));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let json = r#"{ "max_bridge_length": 1.25, "output_precision": 3 }"#;
        let cfg: ExportConfig = serde_json::from_str(json).unwrap();
        assert!((cfg.max_bridge_length - 1.25).abs() < 1e-12);
        assert_eq!(cfg.output_precision, 3);
        assert!((cfg.parallel_threshold - 0.85).abs() < 1e-12);
        assert!(cfg.validate().is_ok());
    }
}
