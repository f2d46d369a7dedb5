//! Game calendar dates ("March 12 of YR4") and date-prefix stripping.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// The in-game year has seven months of 24 days.
pub const MONTHS: [&str; 7] = [
    "January", "February", "March", "April", "May", "June", "July",
];
pub const DAYS_PER_MONTH: u32 = 24;

static DATE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(January|February|March|April|May|June|July) (\d{1,2}),? of YR ?(\d{1,3})\b[\s:,-]*")
        .unwrap()
});

/// A date on the game calendar. Ordered chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GameDate {
    pub year: u32,
    /// Zero-based month index into [`MONTHS`].
    pub month: u32,
    /// One-based day of month.
    pub day: u32,
}

impl GameDate {
    /// Absolute day count since January 1 of YR0.
    pub fn day_index(&self) -> u32 {
        (self.year * MONTHS.len() as u32 + self.month) * DAYS_PER_MONTH + (self.day - 1)
    }
}

impl fmt::Display for GameDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} of YR{}", MONTHS[self.month as usize], self.day, self.year)
    }
}

/// Remove a leading game date from `line`.
///
/// Returns the date (if one was present and valid) and the remaining text.
/// The remainder is empty for a bare timestamp line, which callers drop.
pub fn strip_date_prefix(line: &str) -> (Option<GameDate>, &str) {
    let Some(caps) = DATE_PREFIX.captures(line) else {
        return (None, line);
    };
    let month = MONTHS
        .iter()
        .position(|m| *m == &caps[1])
        .map(|idx| idx as u32);
    let day = caps[2].parse::<u32>().ok();
    let year = caps[3].parse::<u32>().ok();

    match (month, day, year) {
        (Some(month), Some(day), Some(year)) if (1..=DAYS_PER_MONTH).contains(&day) => {
            let rest = line[caps.get(0).map_or(0, |m| m.end())..].trim();
            (Some(GameDate { year, month, day }), rest)
        }
        _ => (None, line),
    }
}
