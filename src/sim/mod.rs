//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step at a time, length chosen by the driver
//! - Seeded RNG only
//! - Stable iteration order (balls by entity ID, blocks in grid order)
//! - No rendering, audio or platform dependencies

pub mod clock;
pub mod collision;
pub mod rect;
pub mod stage;
pub mod state;
pub mod tick;

pub use clock::StepClock;
pub use collision::{CollisionResult, HitAxis, ball_block_collision, paddle_bounce_angle};
pub use rect::Rect;
pub use stage::{GridLayout, generate_stage};
pub use state::{Ball, Block, GameEvent, GameState, Paddle, Screen, Wall, WallSide};
pub use tick::{PaddleMove, TickInput, start_run, tick};
