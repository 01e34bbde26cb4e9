//! The fixed 48-column week-of-year layout.
//!
//! Each month owns a window of ISO week numbers. Neighbouring windows overlap
//! (January is weeks 1-5, February 5-9, ...) and only the first four weeks of
//! every window become columns:
//!
//! ```text
//! Jan 1-5   -> 1  2  3  4     Jul 26-30 -> 26 27 28 29
//! Feb 5-9   -> 5  6  7  8     Aug 30-34 -> 30 31 32 33
//! Mar 9-13  -> 9  10 11 12    Sep 34-39 -> 34 35 36 37
//! Apr 13-17 -> 13 14 15 16    Oct 39-43 -> 39 40 41 42
//! May 17-21 -> 17 18 19 20    Nov 43-47 -> 43 44 45 46
//! Jun 21-26 -> 21 22 23 24    Dec 47-52 -> 47 48 49 50
//! ```
//!
//! ISO weeks 25, 38, 51, 52 and 53 never reach a column. Downstream consumers
//! compare grids built with exactly this table, so it is reproduced as-is.

use std::fmt;
use std::str::FromStr;

/// Number of columns in every grid row.
pub const COLUMN_COUNT: usize = 48;

/// Columns per month.
pub const WEEKS_PER_MONTH: usize = 4;

/// Month abbreviations in calendar order.
pub const MONTH_ABBREVS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Inclusive ISO week window per month.
pub const WEEK_WINDOWS: [(u32, u32); 12] = [
    (1, 5),
    (5, 9),
    (9, 13),
    (13, 17),
    (17, 21),
    (21, 26),
    (26, 30),
    (30, 34),
    (34, 39),
    (39, 43),
    (43, 47),
    (47, 52),
];

const LABELS: [&str; COLUMN_COUNT] = [
    "Jan_W1", "Jan_W2", "Jan_W3", "Jan_W4", "Feb_W1", "Feb_W2", "Feb_W3", "Feb_W4", "Mar_W1",
    "Mar_W2", "Mar_W3", "Mar_W4", "Apr_W1", "Apr_W2", "Apr_W3", "Apr_W4", "May_W1", "May_W2",
    "May_W3", "May_W4", "Jun_W1", "Jun_W2", "Jun_W3", "Jun_W4", "Jul_W1", "Jul_W2", "Jul_W3",
    "Jul_W4", "Aug_W1", "Aug_W2", "Aug_W3", "Aug_W4", "Sep_W1", "Sep_W2", "Sep_W3", "Sep_W4",
    "Oct_W1", "Oct_W2", "Oct_W3", "Oct_W4", "Nov_W1", "Nov_W2", "Nov_W3", "Nov_W4", "Dec_W1",
    "Dec_W2", "Dec_W3", "Dec_W4",
];

/// One of the 48 week columns, ordered by calendar progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Column(u8);

impl Column {
    /// All columns in canonical order.
    pub const ALL: [Column; COLUMN_COUNT] = {
        let mut out = [Column(0); COLUMN_COUNT];
        let mut i = 0;
        while i < COLUMN_COUNT {
            out[i] = Column(i as u8);
            i += 1;
        }
        out
    };

    /// Column at a 0-based position, if in range.
    pub fn from_index(index: usize) -> Option<Column> {
        (index < COLUMN_COUNT).then(|| Column(index as u8))
    }

    /// Map an ISO week number to its column.
    ///
    /// Returns `None` for weeks that fall in the unused tail of a month window
    /// or outside every window.
    pub fn from_iso_week(week: u32) -> Option<Column> {
        Column::ALL.into_iter().find(|c| c.iso_week() == week)
    }

    /// 0-based position in the row.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Month number, 1-12.
    pub fn month(self) -> u32 {
        (self.index() / WEEKS_PER_MONTH) as u32 + 1
    }

    /// Week slot within the month, 1-4.
    pub fn slot(self) -> u32 {
        (self.index() % WEEKS_PER_MONTH) as u32 + 1
    }

    /// The ISO week number this column collects.
    pub fn iso_week(self) -> u32 {
        let (start, _) = WEEK_WINDOWS[(self.month() - 1) as usize];
        start + self.slot() - 1
    }

    /// Header label, e.g. `Mar_W2`.
    pub fn label(self) -> &'static str {
        LABELS[self.index()]
    }

    pub fn month_abbrev(self) -> &'static str {
        MONTH_ABBREVS[(self.month() - 1) as usize]
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Column {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        LABELS
            .iter()
            .position(|label| *label == s)
            .and_then(Column::from_index)
            .ok_or_else(|| format!("Unknown week column '{s}'."))
    }
}
