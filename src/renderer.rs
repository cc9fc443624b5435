use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;

use crate::config::{CellGeometry, GLYPH_HALF_UPPER, GridSize, PALETTE};
use crate::game::{GameState, Phase};
use crate::raster::{Canvas, PixelRect, Rgb};
use crate::snake::Cell;
use crate::ui::hud::{HUD_HEIGHT, HudInfo, render_hud};
use crate::ui::menu::{render_game_over_menu, render_pause_menu, render_start_menu};

/// Paints `state` onto `canvas`, replacing everything drawn before.
///
/// The canvas must be `grid.canvas_px()` pixels on each side. Painting the
/// same state twice yields the same pixels.
pub fn paint(canvas: &mut Canvas, state: &GameState, grid: GridSize) {
    let geometry = CellGeometry::for_cell_size(grid.cell_size);
    let cell = i64::from(grid.cell_size);

    canvas.clear(PALETTE.background);
    paint_grid(canvas, grid);
    paint_food(canvas, state.food, cell, geometry);
    paint_snake(canvas, state, cell, geometry);

    if state.phase == Phase::Over {
        let whole = PixelRect {
            x: 0,
            y: 0,
            width: i64::from(canvas.width()),
            height: i64::from(canvas.height()),
        };
        canvas.blend_rect(whole, PALETTE.overlay, PALETTE.overlay_alpha);
    }
}

fn paint_grid(canvas: &mut Canvas, grid: GridSize) {
    let cell = i64::from(grid.cell_size);
    for line in 0..=i64::from(grid.tile_count) {
        canvas.blend_vertical_line(line * cell, PALETTE.grid_line, PALETTE.grid_alpha);
        canvas.blend_horizontal_line(line * cell, PALETTE.grid_line, PALETTE.grid_alpha);
    }
}

fn paint_food(canvas: &mut Canvas, food: Cell, cell: i64, geometry: CellGeometry) {
    let half = cell as f32 / 2.0;
    let cx = (i64::from(food.x) * cell) as f32 + half;
    let cy = (i64::from(food.y) * cell) as f32 + half;
    canvas.fill_circle(cx, cy, geometry.food_radius as f32, PALETTE.food);
}

fn paint_snake(canvas: &mut Canvas, state: &GameState, cell: i64, geometry: CellGeometry) {
    let inset = i64::from(geometry.inset);
    let side = cell - inset * 2;
    let segment_rect = |segment: Cell| PixelRect {
        x: i64::from(segment.x) * cell + inset,
        y: i64::from(segment.y) * cell + inset,
        width: side,
        height: side,
    };

    for segment in state.snake.segments().skip(1) {
        let rect = segment_rect(*segment);
        canvas.fill_rounded_rect(rect, geometry.corner_radius, PALETTE.snake_body);
    }

    // Head last so it stays on top.
    canvas.fill_rounded_rect(
        segment_rect(state.snake.head()),
        geometry.corner_radius,
        PALETTE.snake_head,
    );
}

/// Terminal-side size of a canvas: one column per pixel, two pixel rows per line.
#[must_use]
pub fn terminal_footprint(canvas: &Canvas) -> (u16, u16) {
    let columns = u16::try_from(canvas.width()).unwrap_or(u16::MAX);
    let rows = u16::try_from(canvas.height().div_ceil(2)).unwrap_or(u16::MAX);
    (columns, rows)
}

/// Copies the canvas into `area` of `buffer` using upper half-blocks.
///
/// The glyph foreground carries the even pixel row and the background the
/// odd one. Cells outside `area` are skipped.
pub fn blit(canvas: &Canvas, buffer: &mut Buffer, area: Rect) {
    let (columns, rows) = terminal_footprint(canvas);
    let columns = columns.min(area.width);
    let rows = rows.min(area.height);

    for row in 0..rows {
        let top_y = u32::from(row) * 2;
        for column in 0..columns {
            let x = u32::from(column);
            let Some(top) = canvas.pixel(x, top_y) else {
                continue;
            };
            let bottom = canvas.pixel(x, top_y + 1).unwrap_or(PALETTE.background);

            buffer.set_string(
                area.x + column,
                area.y + row,
                GLYPH_HALF_UPPER,
                Style::new().fg(to_color(top)).bg(to_color(bottom)),
            );
        }
    }
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

/// Renders the full terminal frame: board, HUD and any phase popup.
pub fn render(frame: &mut Frame<'_>, canvas: &mut Canvas, state: &GameState, hud: &HudInfo) {
    let [play_area, hud_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(HUD_HEIGHT)]).areas(frame.area());

    paint(canvas, state, hud.grid);
    let (columns, rows) = terminal_footprint(canvas);
    if play_area.width < columns || play_area.height < rows {
        render_too_small(frame, play_area, columns, rows + HUD_HEIGHT);
        return;
    }

    let board = centered(play_area, columns, rows);
    blit(canvas, frame.buffer_mut(), board);
    render_hud(frame, hud_area, state, hud);

    match state.phase {
        Phase::NotStarted => render_start_menu(frame, board, state.high_score),
        Phase::Paused => render_pause_menu(frame, board),
        Phase::Over => render_game_over_menu(frame, board, state),
        Phase::Running => {}
    }
}

fn render_too_small(frame: &mut Frame<'_>, area: Rect, columns: u16, rows: u16) {
    let available = frame.area();
    let message = format!(
        "Terminal too small: need {columns}x{rows}, have {}x{}",
        available.width, available.height
    );
    frame.render_widget(
        Paragraph::new(message)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow)),
        area,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}
