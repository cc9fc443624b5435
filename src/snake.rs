use std::collections::VecDeque;

use crate::input::Direction;

/// Grid cell in board coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns true when the cell lies inside a `tile_count` × `tile_count` board.
    #[must_use]
    pub fn is_within_bounds(self, tile_count: u16) -> bool {
        let limit = i32::from(tile_count);
        self.x >= 0 && self.y >= 0 && self.x < limit && self.y < limit
    }

    /// Returns the neighbouring cell one step in `direction`.
    #[must_use]
    pub fn stepped(self, direction: Direction) -> Self {
        let (dx, dy) = direction.velocity();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Ordered snake body, head first.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snake {
    body: VecDeque<Cell>,
}

impl Snake {
    /// Creates a one-cell snake at `start`.
    #[must_use]
    pub fn new(start: Cell) -> Self {
        Self {
            body: VecDeque::from([start]),
        }
    }

    /// Creates a snake from explicit body segments (front is head).
    ///
    /// # Panics
    ///
    /// Panics when `segments` is empty.
    #[must_use]
    pub fn from_segments(segments: Vec<Cell>) -> Self {
        assert!(!segments.is_empty(), "snake needs at least one segment");
        Self {
            body: VecDeque::from(segments),
        }
    }

    /// Pushes `new_head` and drops the tail unless `grow` is set.
    pub fn advance_to(&mut self, new_head: Cell, grow: bool) {
        self.body.push_front(new_head);
        if !grow {
            let _ = self.body.pop_back();
        }
    }

    /// Returns true when moving the head onto `cell` would hit the body.
    ///
    /// When the snake is not growing this tick its tail moves out of the way,
    /// so the tail cell is not counted.
    #[must_use]
    pub fn blocks(&self, cell: Cell, growing: bool) -> bool {
        let considered = if growing {
            self.body.len()
        } else {
            self.body.len() - 1
        };
        self.body.iter().take(considered).any(|segment| *segment == cell)
    }

    /// Returns the current head cell.
    #[must_use]
    pub fn head(&self) -> Cell {
        self.body[0]
    }

    /// Returns true if any segment occupies `cell`.
    #[must_use]
    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false; a snake keeps at least its head.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Iterates over body segments from head to tail.
    pub fn segments(&self) -> impl Iterator<Item = &Cell> {
        self.body.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::input::Direction;

    use super::{Cell, Snake};

    #[test]
    fn bounds_check_covers_every_wall() {
        assert!(Cell::new(0, 0).is_within_bounds(20));
        assert!(Cell::new(19, 19).is_within_bounds(20));
        assert!(!Cell::new(-1, 5).is_within_bounds(20));
        assert!(!Cell::new(20, 5).is_within_bounds(20));
        assert!(!Cell::new(5, -1).is_within_bounds(20));
        assert!(!Cell::new(5, 20).is_within_bounds(20));
    }

    #[test]
    fn stepping_follows_velocity() {
        let origin = Cell::new(5, 5);
        assert_eq!(origin.stepped(Direction::Up), Cell::new(5, 4));
        assert_eq!(origin.stepped(Direction::Down), Cell::new(5, 6));
        assert_eq!(origin.stepped(Direction::Left), Cell::new(4, 5));
        assert_eq!(origin.stepped(Direction::Right), Cell::new(6, 5));
        assert_eq!(origin.stepped(Direction::None), origin);
    }

    #[test]
    fn advancing_without_growth_keeps_length() {
        let mut snake = Snake::new(Cell::new(5, 5));

        snake.advance_to(Cell::new(6, 5), false);

        assert_eq!(snake.head(), Cell::new(6, 5));
        assert_eq!(snake.len(), 1);
    }

    #[test]
    fn growth_keeps_previous_tail() {
        let mut snake = Snake::new(Cell::new(5, 5));

        snake.advance_to(Cell::new(6, 5), true);

        assert_eq!(snake.len(), 2);
        assert_eq!(
            snake.segments().copied().collect::<Vec<_>>(),
            vec![Cell::new(6, 5), Cell::new(5, 5)]
        );
    }

    #[test]
    fn vacating_tail_does_not_block() {
        // 2x2 loop with the tail directly above the head.
        let snake = Snake::from_segments(vec![
            Cell::new(1, 1),
            Cell::new(0, 1),
            Cell::new(0, 0),
            Cell::new(1, 0),
        ]);

        assert!(!snake.blocks(Cell::new(1, 0), false));
        assert!(snake.blocks(Cell::new(1, 0), true));
        assert!(snake.blocks(Cell::new(0, 1), false));
    }
}
