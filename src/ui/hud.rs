use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::config::{GridSize, SpeedLevel};
use crate::game::{GameState, Phase};

/// Rows reserved below the board: scores, then key hints.
pub const HUD_HEIGHT: u16 = 2;

const HINTS_FULL: &str =
    "←↑↓→/WASD move · Space pause · Enter start · R restart · 1-5 +/- speed · Q quit";
const HINTS_COMPACT: &str = "WASD · Spc · Ent · R · 1-5 · Q";

/// Values shown by the HUD that are not part of [`GameState`].
#[derive(Debug, Clone, Copy)]
pub struct HudInfo {
    pub grid: GridSize,
    pub speed: SpeedLevel,
}

/// Renders the score row and the hint row into `area`.
pub fn render_hud(frame: &mut Frame<'_>, area: Rect, state: &GameState, info: &HudInfo) {
    let [score_area, hint_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

    frame.render_widget(
        Paragraph::new(score_line(state, info.speed)).alignment(Alignment::Center),
        score_area,
    );

    frame.render_widget(
        Paragraph::new(hint_text(usize::from(hint_area.width)))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray)),
        hint_area,
    );
}

fn score_line(state: &GameState, speed: SpeedLevel) -> Line<'static> {
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    let high_style = if state.is_new_high_score() {
        value.fg(Color::Green)
    } else {
        value
    };

    Line::from(vec![
        Span::raw("Score: "),
        Span::styled(state.score.to_string(), value),
        Span::raw("   High: "),
        Span::styled(state.high_score.to_string(), high_style),
        Span::raw("   Speed: "),
        Span::styled(speed.to_string(), value),
        Span::raw("   "),
        Span::styled(phase_label(state.phase), Style::default().fg(Color::DarkGray)),
    ])
}

fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::NotStarted => "ready",
        Phase::Running => "running",
        Phase::Paused => "paused",
        Phase::Over => "game over",
    }
}

/// Picks the longest hint line that fits `width` terminal columns.
fn hint_text(width: usize) -> &'static str {
    if HINTS_FULL.width() <= width {
        HINTS_FULL
    } else if HINTS_COMPACT.width() <= width {
        HINTS_COMPACT
    } else {
        ""
    }
}
