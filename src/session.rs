use std::time::{Duration, Instant};

use log::{debug, error, info};

use crate::config::SpeedLevel;
use crate::game::{GameState, Phase, TickOutcome};
use crate::input::{Control, Direction};
use crate::scheduler::TickScheduler;
use crate::score::ScoreStorage;

/// Whether the main loop should keep going after a control.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Drives one [`GameState`] with a tick scheduler and a high-score store.
///
/// Every state change goes through the control methods or [`Session::on_tick`],
/// and the tick timer is only ever started or stopped here.
#[derive(Debug)]
pub struct Session<S> {
    state: GameState,
    scheduler: TickScheduler,
    speed: SpeedLevel,
    store: S,
    needs_redraw: bool,
}

impl<S: ScoreStorage> Session<S> {
    /// Wraps `state`, seeding its high score from `store`.
    pub fn new(mut state: GameState, speed: SpeedLevel, store: S) -> Self {
        state.load_high_score(store.load());
        info!("loaded high score {}", state.high_score);

        Self {
            state,
            scheduler: TickScheduler::new(),
            speed,
            store,
            needs_redraw: true,
        }
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn speed(&self) -> SpeedLevel {
        self.speed
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Interval of the running tick timer, `None` while not ticking.
    #[must_use]
    pub fn tick_interval(&self) -> Option<Duration> {
        self.scheduler.interval()
    }

    /// Time until the next tick is due, `None` while not ticking.
    #[must_use]
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.scheduler.time_until_due(now)
    }

    /// Returns whether a frame should be drawn, clearing the flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    /// Forces the next [`Session::take_redraw`] to return true.
    pub fn request_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Applies one control.
    pub fn apply(&mut self, control: Control, now: Instant) -> Flow {
        match control {
            Control::Steer(direction) => self.steer(direction, now),
            Control::Swipe(direction) => self.swipe(direction, now),
            Control::Start => self.start(now),
            Control::TogglePause => self.toggle_pause(now),
            Control::Restart => self.restart(),
            Control::SetSpeed(level) => self.set_speed(level, now),
            Control::SpeedUp => self.set_speed(self.speed.faster(), now),
            Control::SpeedDown => self.set_speed(self.speed.slower(), now),
            Control::Quit => return Flow::Quit,
        }

        Flow::Continue
    }

    /// Starts ticking. A finished game is reset first; a running or paused
    /// game is left alone.
    pub fn start(&mut self, now: Instant) {
        if self.state.phase == Phase::Over {
            self.state.reset();
        }

        if self.state.phase == Phase::NotStarted {
            self.state.phase = Phase::Running;
            self.scheduler.schedule(self.speed.interval(), now);
            debug!("started at {}", self.speed);
        }

        self.needs_redraw = true;
    }

    /// Toggles between running and paused without touching the board.
    pub fn toggle_pause(&mut self, now: Instant) {
        match self.state.phase {
            Phase::Running => {
                self.state.phase = Phase::Paused;
                self.scheduler.cancel();
            }
            Phase::Paused => {
                self.state.phase = Phase::Running;
                self.scheduler.schedule(self.speed.interval(), now);
            }
            Phase::NotStarted | Phase::Over => return,
        }

        self.needs_redraw = true;
    }

    /// Stops ticking and resets to a fresh, not yet started board.
    pub fn restart(&mut self) {
        self.scheduler.cancel();
        self.state.reset();
        self.needs_redraw = true;
    }

    /// Changes the speed level; an actively ticking game picks it up at once.
    pub fn set_speed(&mut self, level: SpeedLevel, now: Instant) {
        self.speed = level;
        if self.state.phase == Phase::Running {
            self.scheduler.schedule(level.interval(), now);
        }

        debug!("speed set to {level}");
        self.needs_redraw = true;
    }

    /// Requests a direction, starting the game first if it has not begun.
    pub fn steer(&mut self, direction: Direction, now: Instant) {
        if self.state.phase == Phase::NotStarted {
            self.start(now);
        }

        self.state.steer(direction);
    }

    /// Handles a touch-move. Any move starts an idle game, even one too
    /// small to pick a direction.
    pub fn swipe(&mut self, direction: Option<Direction>, now: Instant) {
        if self.state.phase == Phase::NotStarted {
            self.start(now);
        }

        if let Some(direction) = direction {
            self.state.steer(direction);
        }
    }

    /// Runs the tick callback when the timer is due.
    pub fn poll_tick(&mut self, now: Instant) -> Option<TickOutcome> {
        if self.scheduler.poll(now) {
            self.on_tick()
        } else {
            None
        }
    }

    /// Advances the game by one tick. No-op unless running.
    pub fn on_tick(&mut self) -> Option<TickOutcome> {
        if self.state.phase != Phase::Running {
            return None;
        }

        let outcome = self.state.advance();
        if outcome.is_terminal() {
            self.state.phase = Phase::Over;
            self.scheduler.cancel();
            info!(
                "game over ({outcome:?}) with score {} and length {}",
                self.state.score,
                self.state.snake.len()
            );
        } else {
            self.state.commit_direction();
        }

        if matches!(outcome, TickOutcome::Ate | TickOutcome::BoardFilled) {
            self.record_high_score();
        }

        self.needs_redraw = true;
        Some(outcome)
    }

    fn record_high_score(&mut self) {
        if !self.state.sync_high_score() {
            return;
        }

        if let Err(error) = self.store.save(self.state.high_score) {
            error!("failed to save high score: {error}");
        }
    }
}
