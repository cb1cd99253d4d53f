//! Time and date text
//!
//! The time text is rewritten on every tick. The date only changes once a
//! day, so it is formatted again only when the month or day of month differs
//! from the last one that was formatted.

use core::{fmt, str};

use chrono::{Datelike, NaiveDateTime, Timelike};

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Fixed capacity text buffer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextBuffer<const N: usize> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> TextBuffer<N> {
    pub const fn new() -> Self {
        Self { buf: [0; N], len: 0 }
    }

    pub fn as_str(&self) -> &str {
        str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }

    /// Replace the contents with formatted text.
    ///
    /// The previous contents are kept if the text does not fit.
    pub fn write(&mut self, args: fmt::Arguments) -> Result<(), fmt::Error> {
        let mut buf = [0; N];
        let len = format_no_std::show(&mut buf, args)?.len();
        self.buf = buf;
        self.len = len;
        Ok(())
    }
}

impl<const N: usize> Default for TextBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// "HH:MM" or "H:MM"
pub type TimeText = TextBuffer<6>;
/// "Www DD Mmm"
pub type DateText = TextBuffer<12>;

/// Format the time of day.
///
/// The 24 hour clock pads the hour to two digits. The 12 hour clock shows
/// 1..=12 without padding and without an AM/PM suffix.
pub fn format_time(sample: &NaiveDateTime, use_24h: bool) -> TimeText {
    let mut text = TimeText::new();
    let written = if use_24h {
        text.write(format_args!("{:02}:{:02}", sample.hour(), sample.minute()))
    } else {
        let (_, hour) = sample.hour12();
        text.write(format_args!("{}:{:02}", hour, sample.minute()))
    };
    if written.is_err() {
        warn!("time text does not fit");
    }
    text
}

/// Format the date as abbreviated weekday, two digit day and abbreviated month.
pub fn format_date(sample: &NaiveDateTime) -> DateText {
    let mut text = DateText::new();
    let weekday = WEEKDAYS[sample.weekday().num_days_from_sunday() as usize];
    let month = MONTHS[sample.month0() as usize];
    if text
        .write(format_args!("{} {:02} {}", weekday, sample.day(), month))
        .is_err()
    {
        warn!("date text does not fit");
    }
    text
}

/// Outcome of a clock update
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockUpdate {
    /// The date text was formatted again
    pub date_changed: bool,
}

/// Time and date text shown on the watchface
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClockText {
    time: TimeText,
    date: DateText,
    /// (month0, day) the date text was formatted for, `None` until the first update
    last_day: Option<(u8, u8)>,
}

impl ClockText {
    pub const fn new() -> Self {
        Self {
            time: TimeText::new(),
            date: DateText::new(),
            last_day: None,
        }
    }

    /// Update the texts for a new clock sample.
    pub fn update(&mut self, sample: &NaiveDateTime, use_24h: bool) -> ClockUpdate {
        self.time = format_time(sample, use_24h);

        let day = (sample.month0() as u8, sample.day() as u8);
        if self.last_day == Some(day) {
            return ClockUpdate {
                date_changed: false,
            };
        }

        self.date = format_date(sample);
        self.last_day = Some(day);
        ClockUpdate { date_changed: true }
    }

    pub fn time_text(&self) -> &str {
        self.time.as_str()
    }

    pub fn date_text(&self) -> &str {
        self.date.as_str()
    }

    /// (month0, day) of the current date text
    pub fn last_day(&self) -> Option<(u8, u8)> {
        self.last_day
    }
}
