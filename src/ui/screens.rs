use crate::models::Book;
use crate::stats::ProgressHistogram;

/// Results of the last submitted search, kept until the user clears it.
pub(crate) struct SearchResults {
    pub(crate) query: String,
    pub(crate) books: Vec<Book>,
}

/// Wrapper around the full collection plus the optional search view that
/// replaces it in the table.
pub(crate) struct LibraryScreen {
    pub(crate) books: Vec<Book>,
    pub(crate) results: Option<SearchResults>,
    pub(crate) histogram: ProgressHistogram,
    pub(crate) selected: usize,
}

impl LibraryScreen {
    pub(crate) fn new(books: Vec<Book>) -> Self {
        let mut screen = Self {
            histogram: ProgressHistogram::default(),
            books: Vec::new(),
            results: None,
            selected: 0,
        };
        screen.set_books(books);
        screen
    }

    /// Replace the collection and recompute the histogram. The histogram
    /// always reflects the whole library, never the search view.
    pub(crate) fn set_books(&mut self, books: Vec<Book>) {
        self.histogram = ProgressHistogram::from_books(&books);
        self.books = books;
        self.ensure_in_bounds();
    }

    pub(crate) fn set_results(&mut self, query: String, books: Vec<Book>) {
        self.results = Some(SearchResults { query, books });
        self.selected = 0;
    }

    pub(crate) fn clear_results(&mut self) {
        if self.results.take().is_some() {
            self.selected = 0;
        }
    }

    /// Books currently shown in the table.
    pub(crate) fn visible(&self) -> &[Book] {
        match &self.results {
            Some(results) => &results.books,
            None => &self.books,
        }
    }

    pub(crate) fn current_book(&self) -> Option<&Book> {
        self.visible().get(self.selected)
    }

    /// Query of the search currently shown, if any.
    pub(crate) fn active_query(&self) -> Option<&str> {
        self.results.as_ref().map(|results| results.query.as_str())
    }

    /// Swap in fresh matches for the current search after a write, keeping
    /// the selection where it was when possible.
    pub(crate) fn refresh_results(&mut self, books: Vec<Book>) {
        if let Some(results) = &mut self.results {
            results.books = books;
        }
        self.ensure_in_bounds();
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        let len = self.visible().len();
        if len == 0 {
            return;
        }
        let len = len as isize;
        let mut new = self.selected as isize + offset;
        if new < 0 {
            new = 0;
        }
        if new >= len {
            new = len - 1;
        }
        self.selected = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        if !self.visible().is_empty() {
            self.selected = 0;
        }
    }

    pub(crate) fn select_last(&mut self) {
        let len = self.visible().len();
        if len > 0 {
            self.selected = len - 1;
        }
    }

    /// Focus the row with `id` if it is visible.
    pub(crate) fn select_id(&mut self, id: i64) {
        if let Some(idx) = self.visible().iter().position(|book| book.id == id) {
            self.selected = idx;
        }
    }

    pub(crate) fn ensure_in_bounds(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}
