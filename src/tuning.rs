//! Data-driven game balance
//!
//! Every gameplay number that shapes difficulty lives here so it can be
//! overridden from JSON without touching the simulation. Missing fields fall
//! back to the classic arcade values.

use serde::{Deserialize, Serialize};

/// Balance knobs for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Horizontal distance the paddle moves per key press
    pub paddle_step: f32,
    /// Ball speed (units per unit of step time) at launch and after a split
    pub launch_speed: f32,
    /// Points awarded per destroyed block
    pub score_per_block: u64,
    /// Pause between clearing a stage and the next one starting (ms)
    pub stage_clear_pause_ms: f32,
    /// Step time at stage 0 (`dt = base * (1 + growth * stage)`)
    pub step_time_base: f32,
    /// Per-stage growth of the step time
    pub step_time_growth: f32,
    /// Real-time step interval at stage 0 (ms); each stage shaves 1 ms off
    pub step_interval_base_ms: f32,
    /// Floor for the real-time step interval (ms)
    pub min_step_interval_ms: f32,
    /// Stage after which speed stops increasing
    pub max_speed_stage: u32,
    /// Stage after which the block grid stops getting denser
    pub max_grid_stage: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            paddle_step: 30.0,
            launch_speed: 150.0,
            score_per_block: 10,
            stage_clear_pause_ms: 1000.0,
            step_time_base: 0.030,
            step_time_growth: 0.3,
            step_interval_base_ms: 15.0,
            min_step_interval_ms: 4.0,
            max_speed_stage: 10,
            max_grid_stage: 10,
        }
    }
}

impl Tuning {
    /// Parse tuning overrides from JSON (missing fields keep their defaults)
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    fn speed_stage(&self, stage: u32) -> u32 {
        stage.min(self.max_speed_stage)
    }

    /// Simulation time advanced by one step at `stage`
    pub fn step_time(&self, stage: u32) -> f32 {
        self.step_time_base * (1.0 + self.speed_stage(stage) as f32 * self.step_time_growth)
    }

    /// Real-time milliseconds between play steps at `stage`
    pub fn step_interval_ms(&self, stage: u32) -> f32 {
        (self.step_interval_base_ms - self.speed_stage(stage) as f32).max(self.min_step_interval_ms)
    }

    /// Stage used for block grid density
    pub fn grid_stage(&self, stage: u32) -> u32 {
        stage.clamp(1, self.max_grid_stage.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_classic_timing() {
        let t = Tuning::default();
        assert!((t.step_time(1) - 0.039).abs() < 1e-6);
        assert!((t.step_interval_ms(1) - 14.0).abs() < 1e-6);
        assert!((t.step_interval_ms(3) - 12.0).abs() < 1e-6);
    }

    #[test]
    fn test_difficulty_caps() {
        let t = Tuning::default();
        assert_eq!(t.step_time(50), t.step_time(t.max_speed_stage));
        assert!(t.step_interval_ms(50) >= t.min_step_interval_ms);
        assert_eq!(t.grid_stage(50), t.max_grid_stage);
        assert_eq!(t.grid_stage(0), 1);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let t = Tuning::from_json(r#"{ "paddle_step": 45.0, "max_grid_stage": 4 }"#).unwrap();
        assert_eq!(t.paddle_step, 45.0);
        assert_eq!(t.max_grid_stage, 4);
        assert_eq!(t.score_per_block, Tuning::default().score_per_block);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Tuning::from_json("{ paddle_step: }").is_err());
    }
}
