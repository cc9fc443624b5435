use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};

use crate::game::{Collision, EndReason, GameState};

/// Draws the ready prompt as a centered popup over the board.
pub fn render_start_menu(frame: &mut Frame<'_>, area: Rect, high_score: u32) {
    let popup = centered_popup(area, 70, 45);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("SNAKE").style(
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from(format!("High score: {high_score}")),
        Line::from(""),
        Line::from("Arrows/WASD or drag to start moving"),
        Line::from("[Enter] Start  [Q] Quit"),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" start ")),
        popup,
    );
}

/// Draws the pause notice as a centered popup.
pub fn render_pause_menu(frame: &mut Frame<'_>, area: Rect) {
    let popup = centered_popup(area, 60, 30);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from("PAUSED"),
        Line::from(""),
        Line::from("[Space] Resume"),
        Line::from("[R] Restart  [Q] Quit"),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" pause ")),
        popup,
    );
}

/// Draws the game-over text on top of the dimmed board.
pub fn render_game_over_menu(frame: &mut Frame<'_>, area: Rect, state: &GameState) {
    let popup = centered_popup(area, 70, 40);
    frame.render_widget(Clear, popup);

    let title = match state.end_reason {
        Some(EndReason::BoardFilled) => "BOARD CLEARED!",
        _ => "GAME OVER!",
    };

    let lines = vec![
        Line::from(title).style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::from(format!("Score: {}", state.score)),
        Line::from(format!("High score: {}", state.high_score)),
        Line::from(end_reason_text(state.end_reason)),
        Line::from(if state.is_new_high_score() { "New high score!" } else { "" }),
        Line::from(""),
        Line::from("[Enter] Play again  [Q] Quit"),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().title(" game over ")),
        popup,
    );
}

fn end_reason_text(reason: Option<EndReason>) -> &'static str {
    match reason {
        Some(EndReason::Collided(Collision::Wall)) => "Cause: hit wall",
        Some(EndReason::Collided(Collision::SelfHit)) => "Cause: hit yourself",
        Some(EndReason::BoardFilled) => "No room left to grow",
        None => "",
    }
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}
