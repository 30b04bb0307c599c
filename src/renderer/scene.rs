//! Scene assembly: turns a `GameState` into a triangle list

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::sim::{GameState, Rect, Screen};

const PADDLE_CORNER_RADIUS: f32 = 10.0;
const CORNER_SEGMENTS: u32 = 6;
const BALL_SEGMENTS: u32 = 16;
const OUTLINE_THICKNESS: f32 = 1.0;

/// Build every vertex for one frame, back to front
///
/// Menus (title and game over) show only the background; their text lives
/// in the DOM overlay.
pub fn build_scene(state: &GameState) -> Vec<Vertex> {
    let field = Rect::new(0.0, 0.0, FIELD_WIDTH, FIELD_HEIGHT);
    let mut vertices =
        shapes::gradient_rect(&field, colors::BACKGROUND_TOP, colors::BACKGROUND_BOTTOM);

    if !matches!(state.screen, Screen::Play | Screen::StageClear) {
        return vertices;
    }

    vertices.extend(shapes::rounded_rect(
        &state.paddle.rect,
        PADDLE_CORNER_RADIUS,
        colors::PADDLE,
        CORNER_SEGMENTS,
    ));

    for block in &state.blocks {
        let fill = if block.yellow {
            colors::BLOCK_YELLOW
        } else {
            colors::BLOCK_PLAIN
        };
        vertices.extend(shapes::rect(&block.rect, fill));
        vertices.extend(shapes::outline(
            &block.rect,
            OUTLINE_THICKNESS,
            colors::BLOCK_OUTLINE_TOP,
            fill,
        ));
    }

    for ball in &state.balls {
        vertices.extend(shapes::circle(
            ball.pos,
            ball.radius,
            colors::BALL,
            BALL_SEGMENTS,
        ));
    }

    for wall in &state.walls {
        vertices.extend(shapes::gradient_rect(
            &wall.rect,
            colors::WALL_TOP,
            colors::WALL_BOTTOM,
        ));
        vertices.extend(shapes::outline(
            &wall.rect,
            OUTLINE_THICKNESS,
            colors::WALL_OUTLINE,
            colors::WALL_OUTLINE,
        ));
    }

    vertices
}
