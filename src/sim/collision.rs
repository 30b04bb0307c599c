//! Collision detection and response for the ball
//!
//! Everything is an axis-aligned box test against the ball's bounding box.
//! Walls push the ball back inside, the paddle re-aims it by where it landed,
//! and blocks reflect it along the axis of least overlap.

use glam::Vec2;

use super::rect::Rect;
use super::state::{Ball, Paddle, Wall, WallSide};
use crate::consts::MAX_BOUNCE_ANGLE;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Surface normal at collision (pointing toward ball center, for reflection)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Check the ball against the inner face of a wall
pub fn ball_wall_collision(ball_pos: Vec2, ball_radius: f32, wall: &Wall) -> CollisionResult {
    let (depth, normal) = match wall.side {
        WallSide::Top => (wall.rect.bottom() - (ball_pos.y - ball_radius), Vec2::Y),
        WallSide::Left => (wall.rect.right() - (ball_pos.x - ball_radius), Vec2::X),
        WallSide::Right => ((ball_pos.x + ball_radius) - wall.rect.x, Vec2::NEG_X),
    };

    if depth > 0.0 {
        CollisionResult {
            hit: true,
            normal,
            penetration: depth,
        }
    } else {
        CollisionResult::miss()
    }
}

/// Push the ball out of every wall it overlaps and bounce it back inside
///
/// Returns true if any wall was hit.
pub fn resolve_walls(ball: &mut Ball, walls: &[Wall]) -> bool {
    let mut bounced = false;
    for wall in walls {
        let result = ball_wall_collision(ball.pos, ball.radius, wall);
        if !result.hit {
            continue;
        }
        ball.pos += result.normal * result.penetration;
        if ball.vel.dot(result.normal) < 0.0 {
            ball.vel = reflect_velocity(ball.vel, result.normal);
        }
        bounced = true;
    }
    bounced
}

/// Deflection angle from vertical for a ball landing at `ball_x` on the paddle
///
/// Center gives 0, the left edge +75° (ball goes left), the right edge -75°.
pub fn paddle_bounce_angle(paddle: &Paddle, ball_x: f32) -> f32 {
    let half_width = paddle.rect.w / 2.0;
    let relative = (paddle.center_x() - ball_x) / half_width;
    relative.clamp(-1.0, 1.0) * MAX_BOUNCE_ANGLE
}

/// Bounce the ball off the paddle if they overlap
///
/// The outgoing speed is preserved; the direction depends only on where the
/// ball struck, and the ball is set down on top of the paddle.
pub fn resolve_paddle(ball: &mut Ball, paddle: &Paddle) -> bool {
    if !ball.bounds().intersects(&paddle.rect) {
        return false;
    }

    let angle = paddle_bounce_angle(paddle, ball.pos.x);
    let speed = ball.vel.length();
    ball.vel = Vec2::new(speed * -angle.sin(), speed * -angle.cos());
    ball.pos.y = paddle.rect.y - ball.radius;
    true
}

/// Which velocity component a block hit flips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitAxis {
    /// Top or bottom face: vertical velocity flips
    Vertical,
    /// Left or right face: horizontal velocity flips
    Horizontal,
}

/// A ball/block contact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockHit {
    pub axis: HitAxis,
    /// Ball center moved just outside the struck face
    pub resolved_pos: Vec2,
}

/// Check the ball against a block
///
/// A flat overlap (shorter than wide) means the ball came through the top or
/// bottom face; anything else is a side hit.
pub fn ball_block_collision(ball_pos: Vec2, ball_radius: f32, block: &Rect) -> Option<BlockHit> {
    let overlap = Rect::around_circle(ball_pos, ball_radius).intersection(block)?;

    let hit = if overlap.h < overlap.w {
        let y = if ball_pos.y < block.y {
            block.y - ball_radius
        } else {
            block.bottom() + ball_radius
        };
        BlockHit {
            axis: HitAxis::Vertical,
            resolved_pos: Vec2::new(ball_pos.x, y),
        }
    } else {
        let x = if ball_pos.x < block.x {
            block.x - ball_radius
        } else {
            block.right() + ball_radius
        };
        BlockHit {
            axis: HitAxis::Horizontal,
            resolved_pos: Vec2::new(x, ball_pos.y),
        }
    };
    Some(hit)
}

/// Apply a block hit to the ball
pub fn apply_block_hit(ball: &mut Ball, hit: &BlockHit) {
    ball.pos = hit.resolved_pos;
    match hit.axis {
        HitAxis::Vertical => ball.vel.y = -ball.vel.y,
        HitAxis::Horizontal => ball.vel.x = -ball.vel.x,
    }
}
