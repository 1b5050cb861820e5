use serde::{Deserialize, Serialize};

/// Parameters of one render. The JSON field names (`Q`, `K`,
/// `outerIterations`, ...) are the share-blob format and must stay stable.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSettings {
    pub seed: u64,
    pub outer_iterations: u32,
    pub inner_iterations: u32,
    #[serde(rename = "K")]
    pub coupling_constant: f64,
    #[serde(rename = "Q")]
    pub periodicity: u32,
    pub pi_factor: f64,
    pub scale: f64,
    pub offset_min: f64,
    pub offset_max: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            seed: 1337,
            outer_iterations: 1000,
            inner_iterations: 1000,
            coupling_constant: 1.0 - (1.0 + 5.0_f64.sqrt()) / 2.0,
            periodicity: 4,
            pi_factor: 2.0,
            scale: 10.0,
            offset_min: 0.0,
            offset_max: 30.0,
        }
    }
}

impl SimulationSettings {
    /// Clamps degenerate values at the mutation boundary so the rasterizer
    /// never sees a zero trajectory count, zero periodicity, or a
    /// non-positive/non-finite scale. `offset_min > offset_max` is left
    /// as-is: the draw range is treated as reversed downstream.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        self.outer_iterations = self.outer_iterations.max(1);
        self.periodicity = self.periodicity.max(1);

        if !self.scale.is_finite() || self.scale <= 0.0 {
            self.scale = defaults.scale;
        }
        if !self.coupling_constant.is_finite() {
            self.coupling_constant = defaults.coupling_constant;
        }
        if !self.pi_factor.is_finite() {
            self.pi_factor = defaults.pi_factor;
        }
        if !self.offset_min.is_finite() {
            self.offset_min = defaults.offset_min;
        }
        if !self.offset_max.is_finite() {
            self.offset_max = defaults.offset_max;
        }

        self
    }
}

/// Pan vector in simulation units. Lives independently of the settings:
/// parameter edits, resets, and randomizes leave it untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraOffset {
    pub x: f64,
    pub y: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_coupling_constant_is_one_minus_golden_ratio() {
        let settings = SimulationSettings::default();
        assert!((settings.coupling_constant - (1.0 - 1.618_033_988_749_895)).abs() < 1e-12);
        assert_eq!(settings.seed, 1337);
        assert_eq!(settings.outer_iterations, 1000);
        assert_eq!(settings.inner_iterations, 1000);
        assert_eq!(settings.periodicity, 4);
        assert_eq!(settings.pi_factor, 2.0);
        assert_eq!(settings.scale, 10.0);
        assert_eq!(settings.offset_min, 0.0);
        assert_eq!(settings.offset_max, 30.0);
    }

    #[test]
    fn sanitized_clamps_degenerate_values() {
        let settings = SimulationSettings {
            outer_iterations: 0,
            periodicity: 0,
            scale: 0.0,
            coupling_constant: f64::NAN,
            ..SimulationSettings::default()
        }
        .sanitized();

        assert_eq!(settings.outer_iterations, 1);
        assert_eq!(settings.periodicity, 1);
        assert_eq!(settings.scale, 10.0);
        assert!(settings.coupling_constant.is_finite());
    }

    #[test]
    fn sanitized_keeps_reversed_offset_range() {
        let settings = SimulationSettings {
            offset_min: 20.0,
            offset_max: -20.0,
            ..SimulationSettings::default()
        }
        .sanitized();

        assert_eq!(settings.offset_min, 20.0);
        assert_eq!(settings.offset_max, -20.0);
    }
}
