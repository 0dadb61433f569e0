// SPDX-FileCopyrightText: 2026 Chatscribe Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-line classification.

use chatscribe_core::DateOrder;
use chrono::{NaiveDate, NaiveDateTime};
use regex::Captures;

use crate::patterns::{HeaderMatcher, PatternTable};

/// Fields extracted from a header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header<'a> {
    pub timestamp: NaiveDateTime,
    /// `None` when the line matched a system layout.
    pub sender: Option<&'a str>,
    /// Text after the header prefix, possibly empty.
    pub text: &'a str,
    /// Name of the matching header layout.
    pub format: &'a str,
}

/// How a single physical line relates to the record being built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    /// Starts a new record.
    Header(Header<'a>),
    /// Extends the open record.
    Continuation(&'a str),
    /// Neither a header nor attached to an open record.
    Unmatched(&'a str),
}

/// Classifies one line. `record_open` tells whether a record is currently
/// being accumulated; without one, a non-header line is `Unmatched`.
pub fn classify<'a>(table: &'a PatternTable, line: &'a str, record_open: bool) -> Line<'a> {
    for matcher in &table.headers {
        if let Some(header) = match_header(matcher, line) {
            return Line::Header(header);
        }
    }
    if record_open {
        Line::Continuation(line)
    } else {
        Line::Unmatched(line)
    }
}

fn match_header<'a>(matcher: &'a HeaderMatcher, line: &'a str) -> Option<Header<'a>> {
    let caps = matcher.regex.captures(line)?;

    let sender = if matcher.system {
        None
    } else {
        let sender = caps.name("sender")?.as_str().trim();
        if sender.is_empty() {
            return None;
        }
        Some(sender)
    };

    let timestamp = header_timestamp(&caps, matcher.date_order)?;
    let text = caps.name("text").map_or("", |m| m.as_str());

    Some(Header {
        timestamp,
        sender,
        text,
        format: &matcher.name,
    })
}

fn number(caps: &Captures<'_>, group: &str) -> Option<u32> {
    caps.name(group)?.as_str().parse().ok()
}

fn header_timestamp(caps: &Captures<'_>, order: DateOrder) -> Option<NaiveDateTime> {
    let a = number(caps, "date_a")?;
    let b = number(caps, "date_b")?;
    let year = expand_year(caps.name("year")?.as_str())?;
    let hour = to_24_hour(number(caps, "hour")?, caps.name("meridiem").map(|m| m.as_str()))?;
    let minute = number(caps, "minute")?;

    let (day, month) = match order {
        DateOrder::DayFirst => (a, b),
        DateOrder::MonthFirst => (b, a),
    };
    // Exports occasionally disagree with the locale's order; try the swap
    // before giving up on the line.
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .or_else(|| NaiveDate::from_ymd_opt(year, day, month))?;

    date.and_hms_opt(hour, minute, 0)
}

fn expand_year(raw: &str) -> Option<i32> {
    let year: i32 = raw.parse().ok()?;
    match raw.len() {
        2 => Some(2000 + year),
        4 => Some(year),
        _ => None,
    }
}

fn to_24_hour(hour: u32, meridiem: Option<&str>) -> Option<u32> {
    let Some(meridiem) = meridiem else {
        return (hour < 24).then_some(hour);
    };
    if !(1..=12).contains(&hour) {
        return None;
    }
    let pm = meridiem
        .chars()
        .next()
        .is_some_and(|c| c.eq_ignore_ascii_case(&'p'));
    Some(match (pm, hour) {
        (false, 12) => 0,
        (false, h) => h,
        (true, 12) => 12,
        (true, h) => h + 12,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn years() {
        assert_eq!(expand_year("24"), Some(2024));
        assert_eq!(expand_year("2019"), Some(2019));
        assert_eq!(expand_year("124"), None);
    }

    #[test]
    fn meridiem() {
        assert_eq!(to_24_hour(12, Some("AM")), Some(0));
        assert_eq!(to_24_hour(12, Some("p.m.")), Some(12));
        assert_eq!(to_24_hour(3, Some("pm")), Some(15));
        assert_eq!(to_24_hour(9, Some("a. m.")), Some(9));
        assert_eq!(to_24_hour(13, Some("PM")), None);
        assert_eq!(to_24_hour(23, None), Some(23));
        assert_eq!(to_24_hour(24, None), None);
    }
}
