use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::Span;

use crate::error::StoreError;

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Column for the text cursor after `prefix` and `value`, measured in display
/// cells and kept on the last column of `area` when the text overflows.
pub(crate) fn cursor_column(area: Rect, prefix: &str, value: &str) -> u16 {
    let width = Span::raw(prefix).width() + Span::raw(value).width();
    let offset = u16::try_from(width).unwrap_or(u16::MAX);
    let last_column = area.right().saturating_sub(1).max(area.x);
    area.x.saturating_add(offset).min(last_column)
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

/// Whether an error came from storage rather than from user input. Form and
/// validation problems are shown as warnings; everything else is an error.
pub(crate) fn is_storage_failure(err: &Error) -> bool {
    err.downcast_ref::<StoreError>()
        .map(|store_err| !store_err.is_validation())
        .unwrap_or(false)
}

/// Render a progress percentage as a fixed-width text gauge for table cells.
pub(crate) fn progress_gauge(progress: i64, width: usize) -> String {
    let clamped = progress.clamp(0, 100) as usize;
    let filled = (clamped * width + 50) / 100;
    format!(
        "{}{} {:>3}%",
        "█".repeat(filled),
        "░".repeat(width.saturating_sub(filled)),
        clamped
    )
}
