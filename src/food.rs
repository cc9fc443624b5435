use rand::Rng;

use crate::snake::{Cell, Snake};

/// Picks a uniformly random cell that the snake does not occupy.
///
/// Samples the whole board and retries on occupied cells. Returns `None`
/// only when the snake fills every cell, since no sample could succeed.
#[must_use]
pub fn spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    tile_count: u16,
    snake: &Snake,
) -> Option<Cell> {
    let total_cells = usize::from(tile_count) * usize::from(tile_count);
    if tile_count == 0 || snake.len() >= total_cells {
        return None;
    }

    let limit = i32::from(tile_count);
    loop {
        let candidate = Cell::new(rng.gen_range(0..limit), rng.gen_range(0..limit));
        if !snake.occupies(candidate) {
            return Some(candidate);
        }
    }
}
