//! Fixed-step simulation tick
//!
//! Core game loop that advances the simulation one step at a time. The
//! driver decides how often to call it (see `GameState::step_interval_ms`).

use glam::Vec2;

use super::collision::{apply_block_hit, ball_block_collision, resolve_paddle, resolve_walls};
use super::state::{GameEvent, GameState, Screen};

/// One paddle key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddleMove {
    Left,
    Right,
}

impl PaddleMove {
    fn sign(self) -> f32 {
        match self {
            PaddleMove::Left => -1.0,
            PaddleMove::Right => 1.0,
        }
    }
}

/// Input commands for a single step (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Space bar: start a run, end a run, or return to the title
    pub confirm: bool,
    /// Paddle key presses since the last step, in order
    pub paddle_moves: Vec<PaddleMove>,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

/// Upper bound on collision substeps per ball per step
const MAX_SUBSTEPS: u32 = 32;

/// Steps the autopilot lingers on a menu screen before pressing space
const AUTOPILOT_MENU_DELAY: u32 = 10;

/// Advance the game state by one step
pub fn tick(state: &mut GameState, input: &TickInput) {
    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }
    let input = &input;

    if input.confirm {
        match state.screen {
            Screen::Title => start_run(state),
            Screen::Play | Screen::StageClear => end_run(state),
            Screen::GameOver => state.set_screen(Screen::Title),
        }
    }

    if state.screen == Screen::Play {
        // Each press is clamped on its own
        for press in &input.paddle_moves {
            state.paddle.shift(press.sign() * state.tuning.paddle_step);
        }
    }

    state.time_steps += 1;
    state.screen_steps = state.screen_steps.saturating_add(1);

    match state.screen {
        Screen::Title | Screen::GameOver => {
            state.prompt_visible = !state.prompt_visible;
        }
        Screen::Play => step_play(state),
        Screen::StageClear => step_stage_clear(state),
    }

    // Ensure deterministic ordering
    state.normalize_order();
}

/// Begin a fresh run at stage 1
pub fn start_run(state: &mut GameState) {
    state.score = 0;
    state.stage = 1;
    state.init_field();
    state.set_screen(Screen::Play);
    log::info!("Run started (seed {})", state.seed);
}

/// Finish the current run and show the scores
fn end_run(state: &mut GameState) {
    let score = state.score;
    let stage = state.stage;
    state.high_score = state.high_score.max(score);
    state.events.push(GameEvent::GameOver { score, stage });
    state.set_screen(Screen::GameOver);
    state.prompt_visible = true;
    state.init_field();
    log::info!("Game over at stage {stage} with score {score}");
}

fn step_play(state: &mut GameState) {
    let dt = state.tuning.step_time(state.stage);
    let score_per_block = state.tuning.score_per_block;
    let mut split_points: Vec<Vec2> = Vec::new();

    for ball in &mut state.balls {
        // Never move more than one radius between collision checks
        let travel = ball.vel.length() * dt;
        let substeps = ((travel / ball.radius).ceil() as u32).clamp(1, MAX_SUBSTEPS);
        let sub_dt = dt / substeps as f32;

        for _ in 0..substeps {
            ball.pos += ball.vel * sub_dt;

            resolve_walls(ball, &state.walls);

            if resolve_paddle(ball, &state.paddle) {
                state.events.push(GameEvent::PaddleHit);
            }

            // Newest blocks first, at most one block per substep
            let hit = state
                .blocks
                .iter()
                .enumerate()
                .rev()
                .find_map(|(i, block)| {
                    ball_block_collision(ball.pos, ball.radius, &block.rect).map(|hit| (i, hit))
                });

            if let Some((index, hit)) = hit {
                apply_block_hit(ball, &hit);
                let block = state.blocks.remove(index);
                state.score += score_per_block;
                state.events.push(GameEvent::BlockDestroyed {
                    yellow: block.yellow,
                });
                if block.yellow {
                    split_points.push(ball.pos);
                }
            }
        }
    }

    // Drop balls that fell out of the field
    let before = state.balls.len();
    state.balls.retain(|b| !b.is_out_of_field());
    for _ in 0..before - state.balls.len() {
        state.events.push(GameEvent::BallLost);
    }

    // Each yellow hit adds two balls where the ball was
    for pos in split_points {
        state.spawn_ball(pos);
        state.spawn_ball(pos);
        state.events.push(GameEvent::BallSplit);
    }

    if state.blocks.is_empty() {
        log::info!("Stage {} cleared (score {})", state.stage, state.score);
        state.events.push(GameEvent::StageClear { stage: state.stage });
        state.stage_clear_ms = state.tuning.stage_clear_pause_ms;
        state.set_screen(Screen::StageClear);
    } else if state.balls.is_empty() {
        end_run(state);
    }
}

fn step_stage_clear(state: &mut GameState) {
    state.stage_clear_ms -= state.step_interval_ms();
    if state.stage_clear_ms <= 0.0 {
        state.stage_clear_ms = 0.0;
        state.stage += 1;
        state.init_field();
        state.set_screen(Screen::Play);
        log::info!("Stage {} begins", state.stage);
    }
}

/// Fill in input for idle/demo mode
fn autopilot(state: &GameState, input: &mut TickInput) {
    match state.screen {
        Screen::Title | Screen::GameOver => {
            if state.screen_steps >= AUTOPILOT_MENU_DELAY {
                input.confirm = true;
            }
        }
        Screen::Play => {
            // Most dangerous ball: the lowest one falling, else the lowest one
            let lowest_falling = state
                .balls
                .iter()
                .filter(|b| b.vel.y > 0.0)
                .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));
            let target = lowest_falling.or_else(|| {
                state
                    .balls
                    .iter()
                    .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            });

            if let Some(ball) = target {
                // Oscillating aim offset so the ball doesn't loop straight up and down
                let time_factor = state.time_steps as f32 * 0.01;
                let offset = time_factor.sin() * state.paddle.rect.w * 0.3;
                let delta = ball.pos.x + offset - state.paddle.center_x();
                let half_step = state.tuning.paddle_step / 2.0;
                input.paddle_moves.clear();
                if delta > half_step {
                    input.paddle_moves.push(PaddleMove::Right);
                } else if delta < -half_step {
                    input.paddle_moves.push(PaddleMove::Left);
                }
            }
        }
        Screen::StageClear => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rect::Rect;
    use crate::consts::WALL_THICKNESS;
    use crate::sim::state::{Ball, Block};
    use crate::tuning::Tuning;

    fn confirm() -> TickInput {
        TickInput {
            confirm: true,
            ..Default::default()
        }
    }

    /// A state in play with a hand-built field: one ball and the given blocks
    fn playing_with(ball: Ball, blocks: Vec<Block>) -> GameState {
        let mut state = GameState::new(12345, Tuning::default());
        tick(&mut state, &confirm());
        state.balls = vec![ball];
        state.blocks = blocks;
        state.drain_events();
        state
    }

    fn block(id: u32, rect: Rect, yellow: bool) -> Block {
        Block { id, rect, yellow }
    }

    fn far_block() -> Block {
        block(900, Rect::new(25.0, 25.0, 40.0, 20.0), false)
    }

    #[test]
    fn test_title_to_play() {
        let mut state = GameState::new(12345, Tuning::default());
        state.score = 70;
        state.stage = 4;

        tick(&mut state, &TickInput::default());
        assert_eq!(state.screen, Screen::Title);

        tick(&mut state, &confirm());
        assert_eq!(state.screen, Screen::Play);
        assert_eq!(state.score, 0);
        assert_eq!(state.stage, 1);
        assert_eq!(state.blocks.len(), 9);
        assert!(state.events.contains(&GameEvent::ScreenChanged(Screen::Play)));
    }

    #[test]
    fn test_prompt_blinks_on_menus() {
        let mut state = GameState::new(1, Tuning::default());
        let first = state.prompt_visible;
        tick(&mut state, &TickInput::default());
        assert_ne!(state.prompt_visible, first);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.prompt_visible, first);
        assert_eq!(state.step_interval_ms(), crate::consts::MENU_STEP_MS);
    }

    #[test]
    fn test_space_during_play_ends_run_then_returns_to_title() {
        let mut state = GameState::new(5, Tuning::default());
        tick(&mut state, &confirm());
        state.score = 120;
        state.drain_events();

        tick(&mut state, &confirm());
        assert_eq!(state.screen, Screen::GameOver);
        assert_eq!(state.high_score, 120);
        assert!(
            state
                .events
                .contains(&GameEvent::GameOver { score: 120, stage: 1 })
        );

        tick(&mut state, &confirm());
        assert_eq!(state.screen, Screen::Title);
    }

    #[test]
    fn test_high_score_keeps_best() {
        let mut state = GameState::new(5, Tuning::default());
        state.high_score = 500;
        tick(&mut state, &confirm());
        state.score = 200;
        tick(&mut state, &confirm());
        assert_eq!(state.high_score, 500);
    }

    #[test]
    fn test_paddle_moves_only_in_play() {
        let mut state = GameState::new(5, Tuning::default());
        let start = state.paddle.rect.x;
        let left = TickInput {
            paddle_moves: vec![PaddleMove::Left],
            ..Default::default()
        };
        tick(&mut state, &left);
        assert_eq!(state.paddle.rect.x, start);

        tick(&mut state, &confirm());
        tick(&mut state, &left);
        assert_eq!(state.paddle.rect.x, start - 30.0);
    }

    #[test]
    fn test_each_paddle_press_clamps_separately() {
        let mut state = GameState::new(5, Tuning::default());
        tick(&mut state, &confirm());
        state.paddle.rect.x = WALL_THICKNESS;

        // Left is swallowed by the wall, then Right moves a full step
        let presses = TickInput {
            paddle_moves: vec![PaddleMove::Left, PaddleMove::Right],
            ..Default::default()
        };
        tick(&mut state, &presses);
        assert_eq!(state.paddle.rect.x, WALL_THICKNESS + 30.0);
    }

    #[test]
    fn test_serve_bounces_off_paddle() {
        // The fresh ball spawns on the paddle and is kicked upward on the first step
        let mut state = GameState::new(77, Tuning::default());
        tick(&mut state, &confirm());
        assert!(state.drain_events().contains(&GameEvent::PaddleHit));
        assert!(state.balls[0].vel.y < 0.0);
    }

    #[test]
    fn test_lost_last_ball_ends_run() {
        let ball = Ball::new(1, Vec2::new(100.0, 797.0), Vec2::new(0.0, 150.0));
        let mut state = playing_with(ball, vec![far_block()]);

        tick(&mut state, &TickInput::default());
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::BallLost));
        assert!(events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));
        assert_eq!(state.screen, Screen::GameOver);
    }

    #[test]
    fn test_block_destroyed_scores_and_reflects() {
        let ball = Ball::new(1, Vec2::new(350.0, 325.0), Vec2::new(0.0, -150.0));
        let target = block(500, Rect::new(300.0, 300.0, 100.0, 20.0), false);
        let mut state = playing_with(ball, vec![far_block(), target]);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 10);
        assert_eq!(state.blocks.len(), 1);
        assert!(state.balls[0].vel.y > 0.0);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::BlockDestroyed { yellow: false })
        );
    }

    #[test]
    fn test_yellow_block_splits_ball() {
        let ball = Ball::new(1, Vec2::new(350.0, 325.0), Vec2::new(0.0, -150.0));
        let target = block(500, Rect::new(300.0, 300.0, 100.0, 20.0), true);
        let mut state = playing_with(ball, vec![far_block(), target]);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.balls.len(), 3);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::BlockDestroyed { yellow: true }));
        assert!(events.contains(&GameEvent::BallSplit));

        // Split balls appear where the yellow block was struck
        for spawned in &state.balls[1..] {
            assert_eq!(spawned.pos, Vec2::new(350.0, 325.0));
            assert!(spawned.vel.y <= 0.0);
        }
    }

    #[test]
    fn test_only_one_block_per_substep() {
        // Two overlapping blocks at the same spot: only the newer one breaks
        let ball = Ball::new(1, Vec2::new(350.0, 323.0), Vec2::new(0.0, -1.0));
        let older = block(500, Rect::new(300.0, 300.0, 100.0, 20.0), false);
        let newer = block(501, Rect::new(300.0, 300.0, 100.0, 20.0), false);
        let mut state = playing_with(ball, vec![far_block(), older, newer]);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 10);
        assert!(state.blocks.iter().any(|b| b.id == 500));
        assert!(!state.blocks.iter().any(|b| b.id == 501));
    }

    #[test]
    fn test_stage_clear_pauses_then_advances() {
        let ball = Ball::new(1, Vec2::new(350.0, 325.0), Vec2::new(0.0, -150.0));
        let last = block(500, Rect::new(300.0, 300.0, 100.0, 20.0), false);
        let mut state = playing_with(ball, vec![last]);

        tick(&mut state, &TickInput::default());
        assert_eq!(state.screen, Screen::StageClear);
        assert!(state.drain_events().contains(&GameEvent::StageClear { stage: 1 }));

        let mut steps = 0;
        while state.screen == Screen::StageClear && steps < 1000 {
            tick(&mut state, &TickInput::default());
            steps += 1;
        }
        let interval = state.tuning.step_interval_ms(1);
        let expected = (state.tuning.stage_clear_pause_ms / interval).ceil() as i32;
        assert!((steps - expected).abs() <= 1, "took {steps} steps, expected ~{expected}");

        assert_eq!(state.screen, Screen::Play);
        assert_eq!(state.stage, 2);
        assert_eq!(state.blocks.len(), 36);
        assert_eq!(state.balls.len(), 1);
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_stage_clear_wins_over_empty_balls() {
        // The last block knocks the last ball out of the field in the same step
        let ball = Ball::new(1, Vec2::new(-3.0, 410.0), Vec2::new(1.0, 0.0));
        let last = block(500, Rect::new(0.0, 400.0, 50.0, 20.0), false);
        let mut state = playing_with(ball, vec![last]);
        state.walls.clear();

        tick(&mut state, &TickInput::default());
        assert_eq!(state.screen, Screen::StageClear);
        assert!(state.balls.is_empty());
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::BallLost));
        assert!(!events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999, Tuning::default());
        let mut state2 = GameState::new(99999, Tuning::default());

        let inputs = [
            confirm(),
            TickInput {
                paddle_moves: vec![PaddleMove::Right, PaddleMove::Right],
                ..Default::default()
            },
            TickInput::default(),
            TickInput {
                paddle_moves: vec![PaddleMove::Left],
                ..Default::default()
            },
        ];

        for _ in 0..50 {
            for input in &inputs {
                tick(&mut state1, input);
                tick(&mut state2, input);
            }
        }

        assert_eq!(state1.time_steps, state2.time_steps);
        assert_eq!(state1.balls.len(), state2.balls.len());
        assert_eq!(state1.score, state2.score);
        for (a, b) in state1.balls.iter().zip(&state2.balls) {
            assert_eq!(a.pos, b.pos);
        }
    }

    #[test]
    fn test_autopilot_starts_and_scores() {
        let mut state = GameState::new(2024, Tuning::default());
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut state, &idle);
        }
        assert!(state.score > 0);
    }

    #[test]
    fn test_balls_stay_sorted() {
        let ball = Ball::new(1, Vec2::new(350.0, 325.0), Vec2::new(0.0, -150.0));
        let target = block(500, Rect::new(300.0, 300.0, 100.0, 20.0), true);
        let mut state = playing_with(ball, vec![far_block(), target]);
        tick(&mut state, &TickInput::default());
        assert!(state.balls.windows(2).all(|w| w[0].id < w[1].id));
    }
}
