//! Keyframed transform curves
//!
//! A curve is an ordered list of (position, look, up, time-in-ms) keys.
//! Evaluation interpolates position linearly and re-normalizes the
//! interpolated direction vectors; the loop policy decides what happens
//! outside the keyed time range. Evaluation is pure: the same timestamp
//! always yields the same sample.

use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Behavior when the evaluation time leaves the keyed range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveLoop {
    /// Clamp at both ends, no repeat
    #[default]
    Linear,
    /// Ping-pong: time reflects off the last key back toward the first
    Oscillate,
    /// Hold the first key once time runs past the range
    Constant,
}

/// A single keyframe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    pub position: Vec3,
    pub look: Vec3,
    pub up: Vec3,
    pub time_ms: f32,
}

/// One evaluated point on a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSample {
    pub position: Vec3,
    pub look: Vec3,
    pub up: Vec3,
}

impl Default for CurveSample {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            look: Vec3::NEG_Z,
            up: Vec3::Y,
        }
    }
}

impl From<&CurveKey> for CurveSample {
    fn from(key: &CurveKey) -> Self {
        Self {
            position: key.position,
            look: key.look,
            up: key.up,
        }
    }
}

/// A keyframed path of (position, orientation, time).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformCurve {
    loop_mode: CurveLoop,
    /// Keys sorted ascending by `time_ms`
    keys: Vec<CurveKey>,
}

impl TransformCurve {
    #[must_use]
    pub fn new(loop_mode: CurveLoop) -> Self {
        Self {
            loop_mode,
            keys: Vec::new(),
        }
    }

    #[must_use]
    pub fn loop_mode(&self) -> CurveLoop {
        self.loop_mode
    }

    #[must_use]
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Last keyed timestamp, or zero for an empty curve.
    #[must_use]
    pub fn duration_ms(&self) -> f32 {
        self.keys.last().map_or(0.0, |key| key.time_ms)
    }

    /// Add a keyframe, keeping keys sorted by time.
    pub fn add_key(&mut self, position: Vec3, look: Vec3, up: Vec3, time_ms: f32) {
        let key = CurveKey {
            position,
            look: look.normalize_or(Vec3::NEG_Z),
            up: up.normalize_or(Vec3::Y),
            time_ms,
        };
        let index = self
            .keys
            .partition_point(|existing| existing.time_ms <= time_ms);
        self.keys.insert(index, key);
    }

    /// Evaluate the curve at an elapsed time in milliseconds.
    ///
    /// An empty curve yields the default sample; a single key is held
    /// regardless of time.
    #[must_use]
    pub fn evaluate(&self, time_ms: f32) -> CurveSample {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return CurveSample::default();
        };
        if self.keys.len() == 1 {
            return first.into();
        }

        let span = last.time_ms - first.time_ms;
        let t = match self.loop_mode {
            CurveLoop::Linear => time_ms.clamp(first.time_ms, last.time_ms),
            CurveLoop::Oscillate => {
                if span <= 0.0 {
                    first.time_ms
                } else {
                    let phase = (time_ms - first.time_ms).rem_euclid(2.0 * span);
                    first.time_ms + if phase <= span { phase } else { 2.0 * span - phase }
                }
            }
            CurveLoop::Constant => {
                if time_ms > last.time_ms {
                    return first.into();
                }
                time_ms.max(first.time_ms)
            }
        };

        // Find the bracketing pair
        for pair in self.keys.windows(2) {
            let (k0, k1) = (&pair[0], &pair[1]);
            if t >= k0.time_ms && t <= k1.time_ms {
                let segment = k1.time_ms - k0.time_ms;
                if segment <= 0.0 {
                    return k1.into();
                }
                let s = (t - k0.time_ms) / segment;
                return CurveSample {
                    position: k0.position.lerp(k1.position, s),
                    look: k0.look.lerp(k1.look, s).normalize_or(Vec3::NEG_Z),
                    up: k0.up.lerp(k1.up, s).normalize_or(Vec3::Y),
                };
            }
        }

        last.into()
    }

    /// Save the curve to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), CurveError> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| CurveError::Serialize(e.to_string()))?;
        fs::write(path, ron_string).map_err(|e| CurveError::Io(e.to_string()))?;
        Ok(())
    }

    /// Load a curve from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, CurveError> {
        let content = fs::read_to_string(path).map_err(|e| CurveError::Io(e.to_string()))?;
        let curve: TransformCurve =
            ron::from_str(&content).map_err(|e| CurveError::Deserialize(e.to_string()))?;
        Ok(curve)
    }

    /// Save the curve to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), CurveError> {
        let json_string =
            serde_json::to_string_pretty(self).map_err(|e| CurveError::Serialize(e.to_string()))?;
        fs::write(path, json_string).map_err(|e| CurveError::Io(e.to_string()))?;
        Ok(())
    }

    /// Load a curve from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, CurveError> {
        let content = fs::read_to_string(path).map_err(|e| CurveError::Io(e.to_string()))?;
        let curve: TransformCurve = serde_json::from_str(&content)
            .map_err(|e| CurveError::Deserialize(e.to_string()))?;
        Ok(curve)
    }
}

/// Errors that can occur loading or saving curve descriptors
#[derive(Debug, Clone)]
pub enum CurveError {
    Io(String),
    Serialize(String),
    Deserialize(String),
}

impl std::fmt::Display for CurveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Serialize(e) => write!(f, "Serialization error: {e}"),
            Self::Deserialize(e) => write!(f, "Deserialization error: {e}"),
        }
    }
}

impl std::error::Error for CurveError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(loop_mode: CurveLoop) -> TransformCurve {
        let mut curve = TransformCurve::new(loop_mode);
        curve.add_key(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y, 0.0);
        curve.add_key(Vec3::new(10.0, 0.0, 0.0), Vec3::NEG_Z, Vec3::Y, 1000.0);
        curve
    }

    #[test]
    fn test_midpoint_interpolation() {
        let curve = ramp(CurveLoop::Linear);
        let sample = curve.evaluate(500.0);
        assert!((sample.position.x - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let curve = ramp(CurveLoop::Oscillate);
        let a = curve.evaluate(730.0);
        let b = curve.evaluate(730.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_linear_clamps_past_the_end() {
        let curve = ramp(CurveLoop::Linear);
        let at_end = curve.evaluate(1000.0);
        assert_eq!(curve.evaluate(1500.0), at_end);
        assert_eq!(curve.evaluate(1_000_000.0), at_end);
    }

    #[test]
    fn test_oscillate_reflection() {
        let curve = ramp(CurveLoop::Oscillate);
        for t in [100.0, 400.0, 900.0] {
            let forward = curve.evaluate(t);
            let reflected = curve.evaluate(2.0 * 1000.0 - t);
            assert!((forward.position - reflected.position).length() < 1e-3);
        }
    }

    #[test]
    fn test_constant_holds_first_key_past_the_range() {
        let curve = ramp(CurveLoop::Constant);
        let sample = curve.evaluate(2500.0);
        assert_eq!(sample.position, Vec3::ZERO);

        // Within range it still interpolates
        assert!((curve.evaluate(500.0).position.x - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_keys_sort_by_time_on_insert() {
        let mut curve = TransformCurve::new(CurveLoop::Linear);
        curve.add_key(Vec3::new(10.0, 0.0, 0.0), Vec3::NEG_Z, Vec3::Y, 1000.0);
        curve.add_key(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y, 0.0);
        curve.add_key(Vec3::new(5.0, 0.0, 0.0), Vec3::NEG_Z, Vec3::Y, 500.0);

        assert!((curve.evaluate(250.0).position.x - 2.5).abs() < 1e-4);
        assert_eq!(curve.duration_ms(), 1000.0);
    }

    #[test]
    fn test_directions_renormalized() {
        let mut curve = TransformCurve::new(CurveLoop::Linear);
        curve.add_key(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y, 0.0);
        curve.add_key(Vec3::ZERO, Vec3::X, Vec3::Y, 1000.0);

        let sample = curve.evaluate(500.0);
        assert!((sample.look.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_and_single_key_curves() {
        let empty = TransformCurve::new(CurveLoop::Oscillate);
        assert_eq!(empty.evaluate(123.0), CurveSample::default());

        let mut single = TransformCurve::new(CurveLoop::Linear);
        single.add_key(Vec3::splat(3.0), Vec3::NEG_Z, Vec3::Y, 100.0);
        assert_eq!(single.evaluate(0.0).position, Vec3::splat(3.0));
        assert_eq!(single.evaluate(5000.0).position, Vec3::splat(3.0));
    }

    #[test]
    fn test_json_round_trip_preserves_evaluation() {
        let curve = ramp(CurveLoop::Constant);
        let json_str = serde_json::to_string(&curve).unwrap();
        let loaded: TransformCurve = serde_json::from_str(&json_str).unwrap();
        assert_eq!(loaded.loop_mode(), CurveLoop::Constant);
        assert_eq!(curve.evaluate(640.0), loaded.evaluate(640.0));
    }

    #[test]
    fn test_ron_round_trip_preserves_evaluation() {
        let curve = ramp(CurveLoop::Oscillate);
        let ron_str =
            ron::ser::to_string_pretty(&curve, ron::ser::PrettyConfig::default()).unwrap();
        let loaded: TransformCurve = ron::from_str(&ron_str).unwrap();

        for t in [0.0, 250.0, 990.0, 1700.0] {
            assert_eq!(curve.evaluate(t), loaded.evaluate(t));
        }
    }
}
