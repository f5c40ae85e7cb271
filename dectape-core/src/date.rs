//! Packed RT-11 label dates
//!
//! A label date is six ASCII characters `YYYddd`: `YYY` is the number of
//! years since 1900 (the first character is a space for the 1900s) and
//! `ddd` is the 1-based day of the year.

use core::fmt;

/// Day of year on which each month starts, standard years. Index 0 is
/// unused so months can index directly.
const MONTH_START: [u16; 13] = [0, 1, 32, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335];

/// Same as [`MONTH_START`] for leap years
const MONTH_START_LEAP: [u16; 13] = [0, 1, 32, 61, 92, 122, 153, 183, 214, 245, 275, 306, 336];

const MONTH_NAMES: [&str; 13] = [
    "???", "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Gregorian leap-year rule
pub fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 4 == 0 && year % 100 != 0)
}

fn month_table(year: i32) -> &'static [u16; 13] {
    if is_leap_year(year) {
        &MONTH_START_LEAP
    } else {
        &MONTH_START
    }
}

fn digit(b: u8) -> i32 {
    if b.is_ascii_digit() {
        i32::from(b - b'0')
    } else {
        0
    }
}

/// Decode a packed date into `(year, day_of_year)`
pub fn decode(packed: &[u8; 6]) -> (i32, u32) {
    let century = if packed[0].is_ascii_digit() {
        1900 + 100 * digit(packed[0])
    } else {
        1900
    };
    let year = century + 10 * digit(packed[1]) + digit(packed[2]);
    let day = 100 * digit(packed[3]) + 10 * digit(packed[4]) + digit(packed[5]);
    (year, day as u32)
}

/// Encode `(year, day_of_year)` as a packed date.
///
/// Years before 1900 encode as 1900; years past 2899 keep their last three
/// digits of offset.
pub fn encode(year: i32, day_of_year: u32) -> [u8; 6] {
    let offset = (year - 1900).clamp(0, 999) as u32;
    let day = day_of_year.min(999);
    let mut packed = [b' '; 6];
    if offset >= 100 {
        packed[0] = b'0' + (offset / 100) as u8;
    }
    packed[1] = b'0' + (offset / 10 % 10) as u8;
    packed[2] = b'0' + (offset % 10) as u8;
    packed[3] = b'0' + (day / 100) as u8;
    packed[4] = b'0' + (day / 10 % 10) as u8;
    packed[5] = b'0' + (day % 10) as u8;
    packed
}

/// Convert a day of year into `(month, day)`.
///
/// Days before the first of January yield month 0.
pub fn to_calendar_date(year: i32, day_of_year: u32) -> (u32, u32) {
    let table = month_table(year);
    let month = (1..=12)
        .rev()
        .find(|&m| u32::from(table[m]) <= day_of_year)
        .unwrap_or(0);
    if month == 0 {
        return (0, 0);
    }
    (month as u32, day_of_year - u32::from(table[month]) + 1)
}

/// Convert `(year, month, day)` into a day of year; 0 for an invalid month.
///
/// Out-of-range days are not rejected; the result saturates at `u32::MAX`.
pub fn to_day_of_year(year: i32, month: u32, day: u32) -> u32 {
    match month {
        1..=12 => (u32::from(month_table(year)[month as usize]) - 1).saturating_add(day),
        _ => 0,
    }
}

/// Render a packed date as `DD-Mon-YY`.
///
/// Day and year are shown modulo 100, so 2024 displays as `24`.
pub fn format(packed: &[u8; 6]) -> String {
    let (year, day_of_year) = decode(packed);
    let (month, day) = to_calendar_date(year, day_of_year);
    format!(
        "{:02}-{}-{:02}",
        day % 100,
        MONTH_NAMES[month as usize],
        year.rem_euclid(100)
    )
}

/// A packed label date
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RtDate(pub [u8; 6]);

impl RtDate {
    /// Build from a year and day of year
    pub fn new(year: i32, day_of_year: u32) -> Self {
        Self(encode(year, day_of_year))
    }

    /// Build from a calendar date
    pub fn from_calendar(year: i32, month: u32, day: u32) -> Self {
        Self::new(year, to_day_of_year(year, month, day))
    }

    /// The "expired" date written into new labels
    pub const fn expired() -> Self {
        Self(*b"000000")
    }

    /// `(year, day_of_year)`
    pub fn year_and_day(&self) -> (i32, u32) {
        decode(&self.0)
    }

    /// `(year, month, day)`; month 0 when the day of year is 0
    pub fn calendar(&self) -> (i32, u32, u32) {
        let (year, day_of_year) = self.year_and_day();
        let (month, day) = to_calendar_date(year, day_of_year);
        (year, month, day)
    }

    /// Raw packed bytes
    pub fn as_bytes(&self) -> &[u8; 6] {
        &self.0
    }
}

impl fmt::Display for RtDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format(&self.0))
    }
}

impl fmt::Debug for RtDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RtDate({:?})", String::from_utf8_lossy(&self.0))
    }
}
