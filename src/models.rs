use crate::calendar::{month_name, Cell, ColorTier};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-day quantities for the displayed month, keyed by [`date_key`].
pub type ConsumptionMap = BTreeMap<String, u8>;

/// `"{year}-{month+1}-{day}"`, with a zero-based `month` and no padding.
pub fn date_key(year: i32, month: u32, day: u32) -> String {
    format!("{year}-{}-{day}", month + 1)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date_key: String,
    pub quantity: u8,
}

impl DayRecord {
    pub fn from_row(row: &DrinkRow) -> Self {
        Self {
            date_key: date_key(row.date.year(), row.date.month0(), row.date.day()),
            quantity: row.quantity,
        }
    }
}

/// A record as the drinks table stores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrinkRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub quantity: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MonthView {
    pub year: i32,
    /// Zero-based, 0 = January.
    pub month: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

impl MonthView {
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year: year.saturating_add((month / 12) as i32),
            month: month % 12,
        }
    }

    pub fn containing(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month0())
    }

    /// Stays put at the earliest representable year.
    pub fn previous(self) -> Self {
        if self.month == 0 {
            match self.year.checked_sub(1) {
                Some(year) => Self { year, month: 11 },
                None => self,
            }
        } else {
            Self { month: self.month - 1, ..self }
        }
    }

    pub fn next(self) -> Self {
        if self.month == 11 {
            match self.year.checked_add(1) {
                Some(year) => Self { year, month: 0 },
                None => self,
            }
        } else {
            Self { month: self.month + 1, ..self }
        }
    }

    pub fn step(self, direction: Direction) -> Self {
        match direction {
            Direction::Previous => self.previous(),
            Direction::Next => self.next(),
        }
    }

    pub fn date(self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month + 1, day)
    }

    pub fn date_key(self, day: u32) -> String {
        date_key(self.year, self.month, day)
    }

    pub fn label(self) -> String {
        format!("{} {}", month_name(self.month), self.year)
    }
}

#[derive(Debug, Deserialize)]
pub struct ClickRequest {
    pub day: u32,
}

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub direction: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClickResponse {
    pub date_key: String,
    pub quantity: u8,
    pub tier: ColorTier,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthResponse {
    pub year: i32,
    pub month: u32,
    pub label: String,
    pub loading: bool,
    pub weekdays: Vec<&'static str>,
    pub cells: Vec<Cell>,
}
