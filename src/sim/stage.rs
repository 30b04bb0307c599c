//! Stage layout generation
//!
//! Stage `s` lays out a square grid of `3s x 3s` blocks in the area under the
//! top wall. Blocks shrink as the grid grows, and each row may hold at most
//! half its blocks as yellow.

use rand::Rng;

use super::rect::Rect;
use super::state::{Block, GameState};
use crate::consts::*;

/// Grid dimensions and block size for a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    /// Rows and columns (the grid is square)
    pub size: u32,
    pub block_w: i32,
    pub block_h: i32,
}

impl GridLayout {
    pub fn for_grid_stage(grid_stage: u32) -> Self {
        let n = (grid_stage.max(1) * 3) as i32;
        let gaps = (n - 1) * BLOCK_GAP;
        Self {
            size: n as u32,
            block_w: (BLOCK_AREA_WIDTH - gaps) / n,
            block_h: (BLOCK_AREA_HEIGHT - gaps) / n,
        }
    }

    /// Yellow blocks allowed per row
    pub fn max_yellow_per_row(&self) -> u32 {
        self.size / 2
    }

    /// Rectangle of the block at (`row`, `col`)
    pub fn block_rect(&self, row: u32, col: u32) -> Rect {
        let (row, col) = (row as i32, col as i32);
        let x = BLOCK_ORIGIN + (col * (self.block_w + BLOCK_GAP)) as f32;
        let y = BLOCK_ORIGIN + (row * (self.block_h + BLOCK_GAP)) as f32;
        Rect::new(x, y, self.block_w as f32, self.block_h as f32)
    }
}

/// Fill `state.blocks` with the grid for `state.stage`
pub fn generate_stage(state: &mut GameState) {
    let grid_stage = state.tuning.grid_stage(state.stage);
    let layout = GridLayout::for_grid_stage(grid_stage);
    let max_yellow = layout.max_yellow_per_row();

    log::debug!(
        "Stage {}: {}x{} grid, block {}x{}",
        state.stage,
        layout.size,
        layout.size,
        layout.block_w,
        layout.block_h
    );

    state.blocks.reserve((layout.size * layout.size) as usize);
    for row in 0..layout.size {
        let mut yellow_in_row = 0u32;
        for col in 0..layout.size {
            // Roll every block so the RNG stream doesn't depend on the cap
            let roll = state.rng.random_bool(0.5);
            let yellow = roll && yellow_in_row < max_yellow;
            if yellow {
                yellow_in_row += 1;
            }

            let block = Block {
                id: state.next_entity_id(),
                rect: layout.block_rect(row, col),
                yellow,
            };
            state.blocks.push(block);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_layout_sizes() {
        let l1 = GridLayout::for_grid_stage(1);
        assert_eq!(l1.size, 3);
        assert_eq!(l1.block_w, (753 - 10) / 3);
        assert_eq!(l1.block_h, (390 - 10) / 3);

        let l2 = GridLayout::for_grid_stage(2);
        assert_eq!(l2.size, 6);
        assert_eq!(l2.block_w, (753 - 25) / 6);
        assert_eq!(l2.block_h, (390 - 25) / 6);
    }

    #[test]
    fn test_block_positions() {
        let l = GridLayout::for_grid_stage(1);
        assert_eq!(l.block_rect(0, 0), Rect::new(25.0, 25.0, 247.0, 126.0));
        assert_eq!(l.block_rect(1, 2), Rect::new(25.0 + 2.0 * 252.0, 25.0 + 131.0, 247.0, 126.0));
    }

    #[test]
    fn test_grid_stays_inside_walls() {
        for stage in 1..=10 {
            let l = GridLayout::for_grid_stage(stage);
            assert!(l.block_w > 0 && l.block_h > 0, "stage {stage} degenerate");
            let last = l.block_rect(l.size - 1, l.size - 1);
            assert!(last.right() <= FIELD_WIDTH - WALL_THICKNESS);
            assert!(last.bottom() < PADDLE_Y);
        }
    }

    #[test]
    fn test_yellow_cap_per_row() {
        for seed in 0..20 {
            let mut state = GameState::new(seed, Tuning::default());
            state.stage = 3;
            state.blocks.clear();
            generate_stage(&mut state);

            let layout = GridLayout::for_grid_stage(3);
            assert_eq!(state.blocks.len(), 81);
            for row in state.blocks.chunks(layout.size as usize) {
                let yellow = row.iter().filter(|b| b.yellow).count() as u32;
                assert!(yellow <= layout.max_yellow_per_row());
            }
        }
    }

    #[test]
    fn test_grid_density_capped() {
        let tuning = Tuning {
            max_grid_stage: 2,
            ..Default::default()
        };
        let mut state = GameState::new(3, tuning);
        state.stage = 9;
        state.blocks.clear();
        generate_stage(&mut state);
        assert_eq!(state.blocks.len(), 36);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = GameState::new(42, Tuning::default());
        let b = GameState::new(42, Tuning::default());
        let ya: Vec<bool> = a.blocks.iter().map(|b| b.yellow).collect();
        let yb: Vec<bool> = b.blocks.iter().map(|b| b.yellow).collect();
        assert_eq!(ya, yb);
    }
}
