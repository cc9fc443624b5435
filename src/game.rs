use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::MIN_PLAYABLE_TILE_COUNT;
use crate::food::spawn_position;
use crate::input::{Direction, turn_is_allowed};
use crate::snake::{Cell, Snake};

/// Lifecycle phase of one game. Exactly one holds at a time.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Phase {
    NotStarted,
    Running,
    Paused,
    Over,
}

/// What the snake ran into.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Collision {
    Wall,
    SelfHit,
}

/// Why the last game ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EndReason {
    Collided(Collision),
    BoardFilled,
}

/// Result of one [`GameState::advance`] step.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickOutcome {
    Continue,
    Ate,
    Collided(Collision),
    /// Food was eaten and the snake now covers the whole board.
    BoardFilled,
}

impl TickOutcome {
    /// Returns true when this outcome ends the game.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Collided(_) | Self::BoardFilled)
    }
}

/// Complete mutable game state for one session.
#[derive(Debug, Clone)]
pub struct GameState {
    pub snake: Snake,
    /// Direction consumed by the next tick.
    pub direction: Direction,
    /// Direction applied on the previous tick; reversal checks use this.
    pub last_direction: Direction,
    pub food: Cell,
    pub score: u32,
    pub high_score: u32,
    pub phase: Phase,
    pub end_reason: Option<EndReason>,
    /// High score as it stood when this game began.
    best_before: u32,
    tile_count: u16,
    rng: StdRng,
}

impl GameState {
    /// Creates a fresh game on a `tile_count` × `tile_count` board.
    ///
    /// # Panics
    ///
    /// Panics when `tile_count` is below [`MIN_PLAYABLE_TILE_COUNT`].
    #[must_use]
    pub fn new(tile_count: u16) -> Self {
        Self::with_rng(tile_count, StdRng::from_entropy())
    }

    /// Creates a deterministic state for tests and reproducible simulations.
    #[must_use]
    pub fn new_with_seed(tile_count: u16, seed: u64) -> Self {
        Self::with_rng(tile_count, StdRng::seed_from_u64(seed))
    }

    fn with_rng(tile_count: u16, rng: StdRng) -> Self {
        assert!(
            tile_count >= MIN_PLAYABLE_TILE_COUNT,
            "board needs at least {MIN_PLAYABLE_TILE_COUNT} tiles per side, got {tile_count}"
        );
        let start = start_cell(tile_count);
        let mut state = Self {
            snake: Snake::new(start),
            direction: Direction::None,
            last_direction: Direction::None,
            food: start,
            score: 0,
            high_score: 0,
            phase: Phase::NotStarted,
            end_reason: None,
            best_before: 0,
            tile_count,
            rng,
        };
        state.reset();
        state
    }

    /// Puts the board back to its opening position. The high score survives.
    pub fn reset(&mut self) {
        self.snake = Snake::new(start_cell(self.tile_count));
        self.direction = Direction::None;
        self.last_direction = Direction::None;
        self.score = 0;
        self.phase = Phase::NotStarted;
        self.end_reason = None;
        self.best_before = self.high_score;
        let placed = self.respawn_food();
        debug_assert!(placed, "an empty board always has room for food");
    }

    /// Installs a stored high score as the record this game has to beat.
    pub fn load_high_score(&mut self, value: u32) {
        self.high_score = value;
        self.best_before = value;
    }

    /// Returns true once this game has scored above the record it started with.
    #[must_use]
    pub fn is_new_high_score(&self) -> bool {
        self.score > self.best_before
    }

    #[must_use]
    pub fn tile_count(&self) -> u16 {
        self.tile_count
    }

    /// Requests a new direction for the next tick.
    ///
    /// Returns false when the request reverses the last applied direction or
    /// the game is over; the pending direction is then left unchanged.
    pub fn steer(&mut self, requested: Direction) -> bool {
        if self.phase == Phase::Over || !turn_is_allowed(self.last_direction, requested) {
            return false;
        }

        self.direction = requested;
        true
    }

    /// Moves the snake one cell in the pending direction.
    ///
    /// Does not touch `phase`; the caller decides what a terminal outcome
    /// means for the session.
    pub fn advance(&mut self) -> TickOutcome {
        if self.direction == Direction::None {
            return TickOutcome::Continue;
        }

        let new_head = self.snake.head().stepped(self.direction);
        if !new_head.is_within_bounds(self.tile_count) {
            return self.collide(Collision::Wall);
        }

        let eating = new_head == self.food;
        if self.snake.blocks(new_head, eating) {
            return self.collide(Collision::SelfHit);
        }

        self.snake.advance_to(new_head, eating);
        if !eating {
            return TickOutcome::Continue;
        }

        self.score += 1;
        if self.respawn_food() {
            TickOutcome::Ate
        } else {
            self.end_reason = Some(EndReason::BoardFilled);
            TickOutcome::BoardFilled
        }
    }

    /// Records the direction just applied as the reference for reversal checks.
    pub fn commit_direction(&mut self) {
        self.last_direction = self.direction;
    }

    /// Raises the high score to the current score when it was beaten.
    ///
    /// Returns true when the high score changed and should be persisted.
    pub fn sync_high_score(&mut self) -> bool {
        if self.score > self.high_score {
            self.high_score = self.score;
            return true;
        }
        false
    }

    fn collide(&mut self, collision: Collision) -> TickOutcome {
        self.end_reason = Some(EndReason::Collided(collision));
        TickOutcome::Collided(collision)
    }

    fn respawn_food(&mut self) -> bool {
        match spawn_position(&mut self.rng, self.tile_count, &self.snake) {
            Some(cell) => {
                self.food = cell;
                true
            }
            None => false,
        }
    }
}

fn start_cell(tile_count: u16) -> Cell {
    let middle = i32::from(tile_count / 2);
    Cell::new(middle, middle)
}
