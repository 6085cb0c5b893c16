//! "What am I on right now": current book, current exercise phase.

use chrono::NaiveDate;

use crate::model::{Book, ExercisePhase};

/// Anything scheduled over an inclusive date window.
pub trait DateWindow {
    /// Inclusive `(start, end)`, when both ends are set.
    fn window(&self) -> Option<(NaiveDate, NaiveDate)>;

    /// Still to be done as of `today`.
    fn is_pending(&self, today: NaiveDate) -> bool;

    fn contains(&self, today: NaiveDate) -> bool {
        self.window()
            .map_or(false, |(start, end)| start <= today && today <= end)
    }
}

impl DateWindow for Book {
    fn window(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.start_date.zip(self.end_date)
    }

    fn is_pending(&self, _today: NaiveDate) -> bool {
        !self.completed
    }
}

impl DateWindow for ExercisePhase {
    fn window(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.start_date.zip(self.end_date)
    }

    fn is_pending(&self, today: NaiveDate) -> bool {
        self.end_date.map_or(true, |end| end >= today)
    }
}

/// First item whose window contains `today`, else the first pending item.
pub fn current_by_date_range<T: DateWindow>(items: &[T], today: NaiveDate) -> Option<&T> {
    items
        .iter()
        .find(|item| item.contains(today))
        .or_else(|| items.iter().find(|item| item.is_pending(today)))
}
