//! Easter date computation.
//!
//! Several public holidays (Easter Monday, Ascension, Whit Monday) move with
//! Easter, so region calendars express them as offsets from Easter Sunday.

use chrono::NaiveDate;

/// First year of the Gregorian calendar the computus is valid for.
pub const FIRST_GREGORIAN_YEAR: i32 = 1583;

/// Returns the date of Easter Sunday for a Gregorian year.
///
/// Uses the anonymous Gregorian algorithm (Meeus/Jones/Butcher). Returns
/// `None` for years before 1583.
///
/// # Example
///
/// ```
/// use vacation_engine::calendar::easter_sunday;
/// use chrono::NaiveDate;
///
/// assert_eq!(easter_sunday(2021), NaiveDate::from_ymd_opt(2021, 4, 4));
/// ```
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    if year < FIRST_GREGORIAN_YEAR {
        return None;
    }

    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let n = h + l - 7 * m + 114;

    let month = (n / 31) as u32;
    let day = (n % 31 + 1) as u32;
    NaiveDate::from_ymd_opt(year, month, day)
}
