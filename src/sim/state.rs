//! Game state and core simulation types
//!
//! Everything the update loop reads or writes lives here. Rendering and audio
//! only ever look at this state and the events it emits.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::stage;
use crate::consts::*;
use crate::tuning::Tuning;

/// Which screen the game is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    /// Title card, waiting for space
    Title,
    /// Active gameplay
    Play,
    /// Field cleared, short pause before the next stage
    StageClear,
    /// Run ended, showing scores
    GameOver,
}

/// Something noteworthy that happened during a step (drained by the driver)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Ball bounced off the paddle
    PaddleHit,
    /// A block was destroyed
    BlockDestroyed { yellow: bool },
    /// A yellow block split a ball into two extra balls
    BallSplit,
    /// A ball left the field
    BallLost,
    /// Every block of `stage` is gone
    StageClear { stage: u32 },
    /// The run ended
    GameOver { score: u64, stage: u32 },
    /// The screen changed
    ScreenChanged(Screen),
}

/// A ball entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    /// Center position
    pub pos: Vec2,
    /// Velocity in field units per unit of step time
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, vel: Vec2) -> Self {
        Self {
            id,
            pos,
            vel,
            radius: BALL_RADIUS,
        }
    }

    /// Axis-aligned bounding box used for every collision test
    pub fn bounds(&self) -> Rect {
        Rect::around_circle(self.pos, self.radius)
    }

    /// True once the center has left the playfield
    pub fn is_out_of_field(&self) -> bool {
        self.pos.x < 0.0
            || self.pos.x > FIELD_WIDTH
            || self.pos.y < 0.0
            || self.pos.y > FIELD_HEIGHT
    }
}

/// Velocity for a launch angle in `[0, π)`: zero points right, π/2 straight up
pub fn launch_velocity(angle: f32, speed: f32) -> Vec2 {
    Vec2::new(angle.cos() * speed, -angle.sin() * speed)
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub rect: Rect,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            rect: Rect::new(PADDLE_START_X, PADDLE_Y, PADDLE_WIDTH, PADDLE_HEIGHT),
        }
    }
}

impl Paddle {
    /// Leftmost x the paddle may occupy
    pub fn min_x() -> f32 {
        WALL_THICKNESS
    }

    /// Rightmost x the paddle may occupy
    pub fn max_x(&self) -> f32 {
        FIELD_WIDTH - WALL_THICKNESS - self.rect.w
    }

    pub fn center_x(&self) -> f32 {
        self.rect.x + self.rect.w / 2.0
    }

    /// Shift horizontally, staying between the side walls
    pub fn shift(&mut self, dx: f32) {
        self.rect.x = (self.rect.x + dx).clamp(Self::min_x(), self.max_x());
    }
}

/// A breakable block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: u32,
    pub rect: Rect,
    /// Yellow blocks split the ball that breaks them
    pub yellow: bool,
}

/// Which border a wall guards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallSide {
    Top,
    Left,
    Right,
}

/// A solid border wall
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub side: WallSide,
    pub rect: Rect,
}

impl Wall {
    /// The three walls enclosing the field (the bottom stays open)
    pub fn field_walls() -> Vec<Wall> {
        vec![
            Wall {
                side: WallSide::Top,
                rect: Rect::new(0.0, 0.0, FIELD_WIDTH, WALL_THICKNESS),
            },
            Wall {
                side: WallSide::Left,
                rect: Rect::new(0.0, WALL_THICKNESS, WALL_THICKNESS, FIELD_HEIGHT - WALL_THICKNESS),
            },
            Wall {
                side: WallSide::Right,
                rect: Rect::new(
                    FIELD_WIDTH - WALL_THICKNESS,
                    WALL_THICKNESS,
                    WALL_THICKNESS,
                    FIELD_HEIGHT - WALL_THICKNESS,
                ),
            },
        ]
    }
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub screen: Screen,
    /// Steps spent on the current screen
    pub screen_steps: u32,
    /// Current stage (1-based)
    pub stage: u32,
    pub score: u64,
    /// Best score seen this session (seeded from the leaderboard by the driver)
    pub high_score: u64,
    /// Simulation step counter
    pub time_steps: u64,
    /// Blinking "press space" prompt
    pub prompt_visible: bool,
    /// Remaining stage-clear pause (ms)
    pub stage_clear_ms: f32,
    pub paddle: Paddle,
    /// Active balls (sorted by id)
    pub balls: Vec<Ball>,
    /// Remaining blocks in grid order
    pub blocks: Vec<Block>,
    pub walls: Vec<Wall>,
    /// Events since the driver last drained them
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game on the title screen
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            screen: Screen::Title,
            screen_steps: 0,
            stage: 1,
            score: 0,
            high_score: 0,
            time_steps: 0,
            prompt_visible: true,
            stage_clear_ms: 0.0,
            paddle: Paddle::default(),
            balls: Vec::new(),
            blocks: Vec::new(),
            walls: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        };
        state.init_field();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Random launch angle in `[0, π)`
    pub fn random_launch_angle(&mut self) -> f32 {
        self.rng.random_range(0.0..std::f32::consts::PI)
    }

    /// Spawn a ball at `pos` heading in a random upward direction
    pub fn spawn_ball(&mut self, pos: Vec2) {
        let id = self.next_entity_id();
        let angle = self.random_launch_angle();
        let vel = launch_velocity(angle, self.tuning.launch_speed);
        self.balls.push(Ball::new(id, pos, vel));
    }

    /// Reset the field for the current stage: one fresh ball, paddle, walls and blocks
    pub fn init_field(&mut self) {
        self.balls.clear();
        self.blocks.clear();
        self.walls.clear();

        self.spawn_ball(Vec2::new(BALL_SPAWN_X, BALL_SPAWN_Y));
        self.paddle = Paddle::default();
        self.walls = Wall::field_walls();
        stage::generate_stage(self);
    }

    /// Switch screens, announcing the change once
    pub fn set_screen(&mut self, screen: Screen) {
        if self.screen != screen {
            self.screen = screen;
            self.screen_steps = 0;
            self.events.push(GameEvent::ScreenChanged(screen));
        }
    }

    /// Real-time length of one step on the current screen (ms)
    pub fn step_interval_ms(&self) -> f32 {
        match self.screen {
            Screen::Title | Screen::GameOver => MENU_STEP_MS,
            Screen::Play | Screen::StageClear => self.tuning.step_interval_ms(self.stage),
        }
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure balls are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.balls.sort_by_key(|b| b.id);
    }
}
