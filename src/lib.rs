//! Block Breaker - A single-screen arcade block breaker
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, stage flow)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Browser/native storage abstraction
//! - `tuning`: Data-driven game balance

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (origin top-left, y grows downward)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 800.0;

    /// Thickness of the top/left/right walls
    pub const WALL_THICKNESS: f32 = 20.0;

    /// Paddle defaults
    pub const PADDLE_START_X: f32 = 335.0;
    pub const PADDLE_Y: f32 = 700.0;
    pub const PADDLE_WIDTH: f32 = 130.0;
    pub const PADDLE_HEIGHT: f32 = 25.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 5.0;
    pub const BALL_SPAWN_X: f32 = 400.0;
    pub const BALL_SPAWN_Y: f32 = 700.0;

    /// Steepest paddle deflection from vertical (75 degrees)
    pub const MAX_BOUNCE_ANGLE: f32 = 5.0 * std::f32::consts::PI / 12.0;

    /// Block grid area (top-left corner, usable extent, spacing)
    pub const BLOCK_ORIGIN: f32 = 25.0;
    pub const BLOCK_AREA_WIDTH: i32 = 753;
    pub const BLOCK_AREA_HEIGHT: i32 = 390;
    pub const BLOCK_GAP: i32 = 5;

    /// Step interval on the title and game-over screens (prompt blink rate)
    pub const MENU_STEP_MS: f32 = 100.0;

    /// Maximum simulation steps per rendered frame to prevent spiral of death
    pub const MAX_STEPS_PER_FRAME: u32 = 16;
}
