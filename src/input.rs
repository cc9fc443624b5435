use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::config::SpeedLevel;

/// Movement directions, including the idle direction used before the first turn.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    #[default]
    None,
}

impl Direction {
    /// Returns the opposite direction. `None` is its own opposite.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::None => Self::None,
        }
    }

    /// Returns the unit velocity `(dx, dy)` applied to the head each tick.
    #[must_use]
    pub fn velocity(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::None => (0, 0),
        }
    }
}

/// Returns whether `requested` may replace the direction applied last tick.
///
/// Only the exact reversal of `last_applied` is refused. An idle snake
/// accepts every direction.
#[must_use]
pub fn turn_is_allowed(last_applied: Direction, requested: Direction) -> bool {
    requested != last_applied.opposite()
}

/// High-level controls produced from raw terminal events.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Control {
    Steer(Direction),
    /// A touch-move; carries the swipe direction when the delta is non-zero.
    Swipe(Option<Direction>),
    Start,
    TogglePause,
    Restart,
    SetSpeed(SpeedLevel),
    SpeedUp,
    SpeedDown,
    Quit,
}

/// A point on the touch surface, in terminal cell coordinates.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct TouchPoint {
    pub x: i32,
    pub y: i32,
}

/// Translates keys and touch gestures into [`Control`]s.
///
/// Touch is modelled with the mouse: a left-button press is the touch-down
/// and every drag event is a touch-move.
#[derive(Debug, Default)]
pub struct InputController {
    touch_reference: Option<TouchPoint>,
}

impl InputController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps one key event. Releases and unknown keys produce nothing.
    #[must_use]
    pub fn on_key(&self, key: KeyEvent) -> Option<Control> {
        if key.kind == KeyEventKind::Release {
            return None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Control::Quit);
        }

        let control = match key.code {
            KeyCode::Up => Control::Steer(Direction::Up),
            KeyCode::Down => Control::Steer(Direction::Down),
            KeyCode::Left => Control::Steer(Direction::Left),
            KeyCode::Right => Control::Steer(Direction::Right),
            KeyCode::Enter => Control::Start,
            KeyCode::Esc => Control::Quit,
            KeyCode::Char(c) => return char_control(c),
            _ => return None,
        };

        Some(control)
    }

    /// Maps one mouse event as a touch gesture.
    pub fn on_mouse(&mut self, event: MouseEvent) -> Option<Control> {
        let point = TouchPoint {
            x: i32::from(event.column),
            y: i32::from(event.row),
        };

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.touch_start(point);
                None
            }
            MouseEventKind::Drag(MouseButton::Left) => self.touch_move(point),
            MouseEventKind::Up(MouseButton::Left) => {
                self.touch_reference = None;
                None
            }
            _ => None,
        }
    }

    /// Records the touch-down point.
    pub fn touch_start(&mut self, point: TouchPoint) {
        self.touch_reference = Some(point);
    }

    /// Derives a swipe from the delta since the previous touch point.
    ///
    /// The reference point moves to `point` on every call, so deltas are
    /// incremental. A move without a prior touch-down only sets the reference.
    pub fn touch_move(&mut self, point: TouchPoint) -> Option<Control> {
        let direction = self
            .touch_reference
            .replace(point)
            .and_then(|reference| swipe_direction(point.x - reference.x, point.y - reference.y));

        Some(Control::Swipe(direction))
    }
}

fn char_control(c: char) -> Option<Control> {
    let control = match c.to_ascii_lowercase() {
        'w' => Control::Steer(Direction::Up),
        's' => Control::Steer(Direction::Down),
        'a' => Control::Steer(Direction::Left),
        'd' => Control::Steer(Direction::Right),
        ' ' | 'p' => Control::TogglePause,
        'r' => Control::Restart,
        'q' => Control::Quit,
        '+' | '=' => Control::SpeedUp,
        '-' | '_' => Control::SpeedDown,
        digit @ '1'..='5' => {
            let level = digit.to_digit(10).and_then(|d| u8::try_from(d).ok())?;
            Control::SetSpeed(SpeedLevel::new(level).ok()?)
        }
        _ => return None,
    };

    Some(control)
}

/// Picks the dominant axis of a drag delta; the sign picks the side.
#[must_use]
pub fn swipe_direction(dx: i32, dy: i32) -> Option<Direction> {
    if dx.abs() > dy.abs() {
        Some(if dx > 0 { Direction::Right } else { Direction::Left })
    } else if dy > 0 {
        Some(Direction::Down)
    } else if dy < 0 {
        Some(Direction::Up)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{
        KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    };

    use super::{
        Control, Direction, InputController, TouchPoint, swipe_direction, turn_is_allowed,
    };
    use crate::config::SpeedLevel;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn opposite_direction_is_correct() {
        assert_eq!(Direction::Up.opposite(), Direction::Down);
        assert_eq!(Direction::Down.opposite(), Direction::Up);
        assert_eq!(Direction::Left.opposite(), Direction::Right);
        assert_eq!(Direction::Right.opposite(), Direction::Left);
    }

    #[test]
    fn only_exact_reversal_is_rejected() {
        assert!(!turn_is_allowed(Direction::Right, Direction::Left));
        assert!(!turn_is_allowed(Direction::Up, Direction::Down));

        assert!(turn_is_allowed(Direction::Right, Direction::Right));
        assert!(turn_is_allowed(Direction::Right, Direction::Up));
        assert!(turn_is_allowed(Direction::Right, Direction::Down));
        for requested in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            assert!(turn_is_allowed(Direction::None, requested));
        }
    }

    #[test]
    fn arrows_and_wasd_map_to_the_same_directions() {
        let input = InputController::new();
        let pairs = [
            (KeyCode::Up, 'w', Direction::Up),
            (KeyCode::Down, 's', Direction::Down),
            (KeyCode::Left, 'a', Direction::Left),
            (KeyCode::Right, 'd', Direction::Right),
        ];

        for (arrow, letter, direction) in pairs {
            assert_eq!(input.on_key(press(arrow)), Some(Control::Steer(direction)));
            assert_eq!(
                input.on_key(press(KeyCode::Char(letter))),
                Some(Control::Steer(direction))
            );
            assert_eq!(
                input.on_key(press(KeyCode::Char(letter.to_ascii_uppercase()))),
                Some(Control::Steer(direction))
            );
        }
    }

    #[test]
    fn control_keys_are_mapped() {
        let input = InputController::new();

        assert_eq!(input.on_key(press(KeyCode::Char(' '))), Some(Control::TogglePause));
        assert_eq!(input.on_key(press(KeyCode::Enter)), Some(Control::Start));
        assert_eq!(input.on_key(press(KeyCode::Char('r'))), Some(Control::Restart));
        assert_eq!(input.on_key(press(KeyCode::Esc)), Some(Control::Quit));
        assert_eq!(
            input.on_key(press(KeyCode::Char('5'))),
            Some(Control::SetSpeed(SpeedLevel::new(5).expect("level in range")))
        );
        assert_eq!(input.on_key(press(KeyCode::Char('6'))), None);
        assert_eq!(input.on_key(press(KeyCode::Char('0'))), None);
        assert_eq!(
            input.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Control::Quit)
        );
    }

    #[test]
    fn key_release_is_ignored() {
        let input = InputController::new();
        let release = KeyEvent {
            code: KeyCode::Up,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };

        assert_eq!(input.on_key(release), None);
    }

    #[test]
    fn swipe_uses_dominant_axis() {
        assert_eq!(swipe_direction(5, 2), Some(Direction::Right));
        assert_eq!(swipe_direction(-5, 2), Some(Direction::Left));
        assert_eq!(swipe_direction(1, -4), Some(Direction::Up));
        assert_eq!(swipe_direction(0, 3), Some(Direction::Down));
        // Ties go to the vertical axis.
        assert_eq!(swipe_direction(2, 2), Some(Direction::Down));
        assert_eq!(swipe_direction(0, 0), None);
    }

    #[test]
    fn touch_deltas_are_relative_to_the_last_move() {
        let mut input = InputController::new();
        input.touch_start(TouchPoint { x: 0, y: 0 });

        // Far to the right of the touch-down point.
        assert_eq!(
            input.touch_move(TouchPoint { x: 10, y: 0 }),
            Some(Control::Swipe(Some(Direction::Right)))
        );

        // Relative to the origin this is still mostly rightwards, relative to
        // the previous move it is a downward swipe.
        assert_eq!(
            input.touch_move(TouchPoint { x: 10, y: 3 }),
            Some(Control::Swipe(Some(Direction::Down)))
        );
        assert_eq!(
            input.touch_move(TouchPoint { x: 10, y: 3 }),
            Some(Control::Swipe(None))
        );
    }

    #[test]
    fn touch_move_without_touch_start_only_sets_reference() {
        let mut input = InputController::new();

        assert_eq!(
            input.touch_move(TouchPoint { x: 4, y: 4 }),
            Some(Control::Swipe(None))
        );
        assert_eq!(
            input.touch_move(TouchPoint { x: 1, y: 4 }),
            Some(Control::Swipe(Some(Direction::Left)))
        );
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn left_button_press_drag_and_release_drive_swipes() {
        let mut input = InputController::new();
        let left = MouseButton::Left;

        assert_eq!(input.on_mouse(mouse(MouseEventKind::Down(left), 10, 10)), None);
        assert_eq!(
            input.on_mouse(mouse(MouseEventKind::Drag(left), 14, 11)),
            Some(Control::Swipe(Some(Direction::Right)))
        );
        assert_eq!(
            input.on_mouse(mouse(MouseEventKind::Drag(left), 13, 8)),
            Some(Control::Swipe(Some(Direction::Up)))
        );
        assert_eq!(input.on_mouse(mouse(MouseEventKind::Up(left), 13, 8)), None);

        // Release forgets the reference, so the next drag only re-anchors.
        assert_eq!(
            input.on_mouse(mouse(MouseEventKind::Drag(left), 1, 8)),
            Some(Control::Swipe(None))
        );
        assert_eq!(input.on_mouse(mouse(MouseEventKind::Moved, 20, 20)), None);
    }
}
