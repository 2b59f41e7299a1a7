use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Book, NewBook, DEFAULT_YEAR, PROGRESS_RANGE, YEAR_RANGE};

/// Warning shown when a required text field is blank.
pub(crate) const MISSING_DETAILS: &str = "Please enter all details!";

/// Internal representation of the "add book" form fields. Numbers are kept as
/// text while editing so partially typed years do not get clamped mid-entry.
#[derive(Clone)]
pub(crate) struct BookForm {
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) year: String,
    pub(crate) genre: String,
    pub(crate) progress: String,
    pub(crate) active: BookField,
    pub(crate) error: Option<String>,
}

/// Fields available within the book form, in tab order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub(crate) enum BookField {
    #[default]
    Title,
    Author,
    Year,
    Genre,
    Progress,
}

impl BookField {
    pub(crate) const ALL: [BookField; 5] = [
        BookField::Title,
        BookField::Author,
        BookField::Year,
        BookField::Genre,
        BookField::Progress,
    ];

    pub(crate) fn label(self) -> &'static str {
        match self {
            BookField::Title => "Title",
            BookField::Author => "Author",
            BookField::Year => "Publication Year",
            BookField::Genre => "Genre",
            BookField::Progress => "Read Progress (%)",
        }
    }

    fn is_numeric(self) -> bool {
        matches!(self, BookField::Year | BookField::Progress)
    }

    fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|field| *field == self)
            .unwrap_or(0)
    }
}

impl Default for BookForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            year: DEFAULT_YEAR.to_string(),
            genre: String::new(),
            progress: PROGRESS_RANGE.start().to_string(),
            active: BookField::Title,
            error: None,
        }
    }
}

impl BookForm {
    /// Move focus forward through the five fields, wrapping around.
    pub(crate) fn next_field(&mut self) {
        let idx = (self.active.index() + 1) % BookField::ALL.len();
        self.active = BookField::ALL[idx];
    }

    pub(crate) fn previous_field(&mut self) {
        let len = BookField::ALL.len();
        let idx = (self.active.index() + len - 1) % len;
        self.active = BookField::ALL[idx];
    }

    fn value_mut(&mut self, field: BookField) -> &mut String {
        match field {
            BookField::Title => &mut self.title,
            BookField::Author => &mut self.author,
            BookField::Year => &mut self.year,
            BookField::Genre => &mut self.genre,
            BookField::Progress => &mut self.progress,
        }
    }

    pub(crate) fn value(&self, field: BookField) -> &str {
        match field {
            BookField::Title => &self.title,
            BookField::Author => &self.author,
            BookField::Year => &self.year,
            BookField::Genre => &self.genre,
            BookField::Progress => &self.progress,
        }
    }

    /// Append a character to the active field. Numeric fields only take
    /// digits and stop at four characters.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        let field = self.active;
        if field.is_numeric() {
            let value = self.value_mut(field);
            if ch.is_ascii_digit() && value.len() < 4 {
                value.push(ch);
                true
            } else {
                false
            }
        } else if !ch.is_control() {
            self.value_mut(field).push(ch);
            true
        } else {
            false
        }
    }

    /// Remove the last character from the active field.
    pub(crate) fn backspace(&mut self) {
        let field = self.active;
        self.value_mut(field).pop();
    }

    /// Nudge a numeric field up or down, clamped to its range. Year steps by
    /// one, progress by five like a slider.
    pub(crate) fn step(&mut self, direction: i64) -> bool {
        let (range, step) = match self.active {
            BookField::Year => (YEAR_RANGE, 1),
            BookField::Progress => (PROGRESS_RANGE, 5),
            _ => return false,
        };
        let field = self.active;
        let current = self
            .value(field)
            .parse::<i64>()
            .unwrap_or(*range.start());
        let next = (current + direction * step).clamp(*range.start(), *range.end());
        *self.value_mut(field) = next.to_string();
        true
    }

    /// Validate the inputs and return a record ready for persistence.
    pub(crate) fn parse_inputs(&self) -> Result<NewBook> {
        if self.title.trim().is_empty()
            || self.author.trim().is_empty()
            || self.genre.trim().is_empty()
        {
            return Err(anyhow!(MISSING_DETAILS));
        }

        let year = parse_in_range(
            &self.year,
            "Publication year",
            YEAR_RANGE.start(),
            YEAR_RANGE.end(),
        )?;
        let progress = parse_in_range(
            &self.progress,
            "Progress",
            PROGRESS_RANGE.start(),
            PROGRESS_RANGE.end(),
        )?;

        Ok(NewBook::new(
            &self.title,
            &self.author,
            year,
            &self.genre,
            progress,
        ))
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field: BookField) -> Line<'static> {
        let value = self.value(field);
        let is_active = self.active == field;

        let display = if value.is_empty() {
            "<required>".to_string()
        } else if field == BookField::Progress {
            format!("{value}%")
        } else {
            value.to_string()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    /// Row of the active field inside the form, for cursor placement.
    pub(crate) fn active_row(&self) -> u16 {
        self.active.index() as u16
    }
}

fn parse_in_range(raw: &str, name: &str, min: &i64, max: &i64) -> Result<i64> {
    let value = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| anyhow!("{name} must be a number."))?;
    if value < *min || value > *max {
        return Err(anyhow!("{name} must be between {min} and {max}."));
    }
    Ok(value)
}

/// State for confirming the deletion of the selected book.
#[derive(Clone)]
pub(crate) struct ConfirmBookDelete {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) author: String,
}

impl ConfirmBookDelete {
    pub(crate) fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
        }
    }
}
