use std::mem;

use anyhow::{Context, Result};
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Bar, BarChart, BarGroup, Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap,
};
use ratatui::Frame;

use crate::db::BookStore;
use crate::models::Book;

use super::forms::{BookField, BookForm, ConfirmBookDelete};
use super::helpers::{
    centered_rect, cursor_column, is_storage_failure, progress_gauge, surface_error,
};
use super::screens::LibraryScreen;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Header rows for the title and tagline.
const HEADER_HEIGHT: u16 = 4;
/// Width of the text gauge drawn in the progress column.
const GAUGE_WIDTH: usize = 10;
/// Rows skipped by PageUp/PageDown.
const PAGE_STEP: isize = 5;

/// Fine-grained modes layered on top of the library screen.
enum Mode {
    Normal,
    AddingBook(BookForm),
    Searching(SearchState),
    ConfirmDelete(ConfirmBookDelete),
}

/// State for the search prompt while the user is typing.
struct SearchState {
    query: String,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Warning,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Warning => Style::default().fg(Color::Yellow),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI. Owns the store, so the
/// database connection closes when the app is dropped.
pub struct App {
    store: BookStore,
    screen: LibraryScreen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(store: BookStore, books: Vec<Book>) -> Self {
        Self {
            store,
            screen: LibraryScreen::new(books),
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Dispatch one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingBook(form) => self.handle_add_book(code, form)?,
            Mode::Searching(state) => self.handle_search(code, state)?,
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm)?,
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') => {
                *exit = true;
            }
            KeyCode::Esc => {
                if self.screen.results.is_some() {
                    self.screen.clear_results();
                    self.clear_status();
                } else {
                    *exit = true;
                }
            }
            KeyCode::Up => self.screen.move_selection(-1),
            KeyCode::Down => self.screen.move_selection(1),
            KeyCode::PageUp => self.screen.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.screen.move_selection(PAGE_STEP),
            KeyCode::Home => self.screen.select_first(),
            KeyCode::End => self.screen.select_last(),
            KeyCode::Char('+') | KeyCode::Char('a') | KeyCode::Char('A') => {
                self.clear_status();
                return Ok(Mode::AddingBook(BookForm::default()));
            }
            KeyCode::Char('/') | KeyCode::Char('f') | KeyCode::Char('F') => {
                let query = self
                    .screen
                    .results
                    .as_ref()
                    .map(|results| results.query.clone())
                    .unwrap_or_default();
                return Ok(Mode::Searching(SearchState { query }));
            }
            KeyCode::Char('-') | KeyCode::Char('d') | KeyCode::Char('D') => {
                if let Some(book) = self.screen.current_book() {
                    let confirm = ConfirmBookDelete::from(book);
                    self.clear_status();
                    return Ok(Mode::ConfirmDelete(confirm));
                } else {
                    self.set_status("No book selected to delete.", StatusKind::Warning);
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.reload_books(None)?;
                self.set_status("Library refreshed.", StatusKind::Info);
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_add_book(&mut self, code: KeyCode, mut form: BookForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Add book cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab => form.next_field(),
            KeyCode::BackTab => form.previous_field(),
            KeyCode::Up => {
                form.step(1);
            }
            KeyCode::Down => {
                form.step(-1);
            }
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_book(&form) {
                Ok(_) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    let kind = if is_storage_failure(&err) {
                        StatusKind::Error
                    } else {
                        StatusKind::Warning
                    };
                    form.error = Some(message.clone());
                    self.set_status(message, kind);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::AddingBook(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_search(&mut self, code: KeyCode, mut state: SearchState) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.screen.clear_results();
                self.clear_status();
                return Ok(Mode::Normal);
            }
            KeyCode::Enter => {
                if let Err(err) = self.run_search(&state.query) {
                    self.set_status(surface_error(&err), StatusKind::Error);
                    return Ok(Mode::Searching(state));
                }
                return Ok(Mode::Normal);
            }
            KeyCode::Backspace => {
                state.query.pop();
            }
            KeyCode::Char(ch) if !ch.is_control() => {
                state.query.push(ch);
            }
            _ => {}
        }
        Ok(Mode::Searching(state))
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmBookDelete) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                match self.perform_delete(&confirm) {
                    Ok(_) => Ok(Mode::Normal),
                    Err(err) => {
                        let message = surface_error(&err);
                        self.set_status(message, StatusKind::Error);
                        Ok(Mode::ConfirmDelete(confirm))
                    }
                }
            }
            _ => Ok(Mode::ConfirmDelete(confirm)),
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height + HEADER_HEIGHT {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(HEADER_HEIGHT),
                    Constraint::Min(0),
                    Constraint::Length(footer_height),
                ])
                .split(area);
            self.draw_header(frame, chunks[0]);
            (chunks[1], chunks[2])
        } else {
            (area, area)
        };

        self.draw_library(frame, content_area);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::AddingBook(form) => self.draw_book_form(frame, area, form),
            Mode::Searching(state) => self.draw_search_bar(frame, area, state),
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Normal => {}
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                "Personal Library Manager",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Manage and track your books easily!",
                Style::default().fg(Color::Yellow),
            )),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(header, area);
    }

    fn draw_library(&self, frame: &mut Frame, area: Rect) {
        if self.screen.books.is_empty() {
            let message = Paragraph::new("No books found. Add some books to start tracking!")
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Library Collection"),
                );
            frame.render_widget(message, area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(area);

        self.draw_book_table(frame, chunks[0]);
        self.draw_progress_chart(frame, chunks[1]);
    }

    fn draw_book_table(&self, frame: &mut Frame, area: Rect) {
        let title = match &self.screen.results {
            Some(results) => format!(
                "Search results for '{}' ({} of {})",
                results.query,
                results.books.len(),
                self.screen.books.len()
            ),
            None => format!("Library Collection ({})", self.screen.books.len()),
        };
        let block = Block::default().borders(Borders::ALL).title(title);

        let books = self.screen.visible();
        if books.is_empty() {
            let message = Paragraph::new("No matching books found.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let header_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let header = Row::new(["Title", "Author", "Year", "Genre", "Progress"])
            .style(header_style)
            .bottom_margin(1);

        let rows = books.iter().map(|book| {
            Row::new(vec![
                Cell::from(book.title.clone()),
                Cell::from(book.author.clone()),
                Cell::from(book.publication_year.to_string()),
                Cell::from(book.genre.clone()),
                Cell::from(progress_gauge(book.progress, GAUGE_WIDTH)),
            ])
        });

        let widths = [
            Constraint::Percentage(28),
            Constraint::Percentage(22),
            Constraint::Length(6),
            Constraint::Percentage(16),
            Constraint::Length(GAUGE_WIDTH as u16 + 5),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().fg(Color::Yellow))
            .highlight_symbol("▶ ");

        let mut state = TableState::default();
        state.select(Some(self.screen.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_progress_chart(&self, frame: &mut Frame, area: Rect) {
        let histogram = &self.screen.histogram;
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Reading Progress");

        let bars: Vec<Bar> = histogram
            .buckets()
            .into_iter()
            .map(|(label, count)| {
                Bar::default()
                    .label(Line::from(format!("{label:>6}")))
                    .value(count)
                    .style(Style::default().fg(Color::Yellow))
            })
            .collect();

        let chart = BarChart::default()
            .block(block)
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(0)
            .max(histogram.max_count().max(1))
            .data(BarGroup::default().bars(&bars));
        frame.render_widget(chart, area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, state: &SearchState) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title("Search by title, author, or genre");
        let paragraph = Paragraph::new(Span::raw(format!("Search: {}", state.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = cursor_column(inner, "Search: ", &state.query);
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match &self.mode {
            Mode::AddingBook(_) => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Next Field   "),
                Span::styled("[↑↓]", key_style),
                Span::raw(" Adjust Number   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Add Book   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            Mode::Searching(_) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Search   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Clear Search"),
            ]),
            Mode::ConfirmDelete(_) => Line::from(vec![
                Span::styled("[y]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[n]", key_style),
                Span::raw(" Keep"),
            ]),
            Mode::Normal => {
                let mut spans = vec![
                    Span::styled("[↑↓]", key_style),
                    Span::raw(" Navigate   "),
                    Span::styled("[+]", key_style),
                    Span::raw(" Add   "),
                    Span::styled("[/]", key_style),
                    Span::raw(" Search   "),
                    Span::styled("[-]", key_style),
                    Span::raw(" Delete   "),
                ];
                if self.screen.results.is_some() {
                    spans.push(Span::styled("[Esc]", key_style));
                    spans.push(Span::raw(" Show All   "));
                }
                spans.push(Span::styled("[q]", key_style));
                spans.push(Span::raw(" Quit"));
                Line::from(spans)
            }
        }
    }

    fn draw_book_form(&self, frame: &mut Frame, area: Rect, form: &BookForm) {
        let popup_area = centered_rect(60, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Add a New Book")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = BookField::ALL
            .iter()
            .map(|field| form.build_line(*field))
            .collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Yellow),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        let prefix = format!("{}: ", form.active.label());
        let cursor_x = cursor_column(inner, &prefix, form.value(form.active));
        let cursor_y = inner
            .y
            .saturating_add(form.active_row())
            .min(inner.bottom().saturating_sub(1).max(inner.y));
        frame.set_cursor_position((cursor_x, cursor_y));
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmBookDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Delete a Book")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!("Delete '{}' by {}?", confirm.title, confirm.author)),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    fn save_new_book(&mut self, form: &BookForm) -> Result<()> {
        let new_book = form.parse_inputs()?;
        let book = self
            .store
            .add(&new_book)
            .context("failed to add book")?;
        self.reload_books(Some(book.id))?;
        self.set_status(
            format!("Added {} by {}", book.title, book.author),
            StatusKind::Info,
        );
        Ok(())
    }

    fn run_search(&mut self, query: &str) -> Result<()> {
        let books = self
            .store
            .search(query)
            .context("failed to search books")?;
        if books.is_empty() {
            self.set_status("No matching books found.", StatusKind::Warning);
        } else {
            self.set_status(
                format!("Found {} matching book(s).", books.len()),
                StatusKind::Info,
            );
        }
        self.screen.set_results(query.to_string(), books);
        Ok(())
    }

    fn perform_delete(&mut self, confirm: &ConfirmBookDelete) -> Result<()> {
        self.store
            .delete(confirm.id)
            .context("failed to delete book")?;
        self.reload_books(None)?;
        self.set_status(format!("Deleted {}", confirm.title), StatusKind::Info);
        Ok(())
    }

    /// Reload the collection and, when a search is showing, re-run it so the
    /// results and their counts match what was just written.
    fn reload_books(&mut self, focus_id: Option<i64>) -> Result<()> {
        let books = self.store.list_all().context("failed to load books")?;
        self.screen.set_books(books);
        if let Some(query) = self.screen.active_query().map(str::to_string) {
            let matches = self
                .store
                .search(&query)
                .context("failed to refresh search results")?;
            self.screen.refresh_results(matches);
        }
        if let Some(id) = focus_id {
            self.screen.select_id(id);
        }
        Ok(())
    }

    #[cfg(test)]
    fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }
}
