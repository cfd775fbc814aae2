//! Month geometry and color classification. Everything here is pure.

use crate::models::{date_key, ConsumptionMap};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub const MAX_QUANTITY: u8 = 6;

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorTier {
    None,
    Low,
    Medium,
    High,
    Severe,
}

impl ColorTier {
    pub fn for_quantity(quantity: u8) -> Self {
        match quantity {
            0 => Self::None,
            1..=2 => Self::Low,
            3 => Self::Medium,
            4..=5 => Self::High,
            _ => Self::Severe,
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::None => "green",
            Self::Low => "yellow",
            Self::Medium => "orange",
            Self::High => "red",
            Self::Severe => "black",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Self::None => "tier-none",
            Self::Low => "tier-low",
            Self::Medium => "tier-medium",
            Self::High => "tier-high",
            Self::Severe => "tier-severe",
        }
    }
}

pub fn color_tier(quantity: u8) -> ColorTier {
    ColorTier::for_quantity(quantity)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cell {
    Blank,
    Day {
        day: u32,
        date_key: String,
        quantity: u8,
        tier: ColorTier,
    },
}

pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES[(month % 12) as usize]
}

fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month + 1, 1)
}

/// First and last date of the month, both inclusive.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = first_of_month(year, month)?;
    let last = first.with_day(days_in_month(year, month))?;
    Some((first, last))
}

/// Day-of-month of the day before the first of the following month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month >= 11 {
        match year.checked_add(1) {
            Some(next_year) => (next_year, 0),
            None => return 0,
        }
    } else {
        (year, month + 1)
    };

    first_of_month(next_year, next_month)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(0)
}

/// Weekday of the 1st, 0 = Sunday.
pub fn first_weekday_offset(year: i32, month: u32) -> u32 {
    first_of_month(year, month)
        .map(|first| first.weekday().num_days_from_sunday())
        .unwrap_or(0)
}

pub fn render_grid(year: i32, month: u32, consumption: &ConsumptionMap) -> Vec<Cell> {
    let offset = first_weekday_offset(year, month);
    let days = days_in_month(year, month);

    let mut cells = Vec::with_capacity((offset + days) as usize);
    cells.extend((0..offset).map(|_| Cell::Blank));
    for day in 1..=days {
        let key = date_key(year, month, day);
        let quantity = consumption.get(&key).copied().unwrap_or(0);
        cells.push(Cell::Day {
            day,
            date_key: key,
            quantity,
            tier: color_tier(quantity),
        });
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_in_month_follows_gregorian_leap_rule() {
        assert_eq!(days_in_month(2024, 1), 29);
        assert_eq!(days_in_month(2023, 1), 28);
        assert_eq!(days_in_month(1900, 1), 28);
        assert_eq!(days_in_month(2000, 1), 29);
        assert_eq!(days_in_month(2025, 0), 31);
        assert_eq!(days_in_month(2025, 3), 30);
        assert_eq!(days_in_month(2025, 11), 31);
    }

    #[test]
    fn offset_walk_reaches_last_weekday() {
        for year in [1900, 1999, 2000, 2023, 2024, 2026] {
            for month in 0..12 {
                let offset = first_weekday_offset(year, month);
                let days = days_in_month(year, month);
                let last = NaiveDate::from_ymd_opt(year, month + 1, days).unwrap();
                assert_eq!(
                    (offset + days - 1) % 7,
                    last.weekday().num_days_from_sunday(),
                    "{year}-{month}"
                );
            }
        }
    }

    #[test]
    fn first_weekday_offset_known_months() {
        // 1 September 2024 was a Sunday, 1 February 2026 a Sunday, 1 October 2026 a Thursday.
        assert_eq!(first_weekday_offset(2024, 8), 0);
        assert_eq!(first_weekday_offset(2026, 1), 0);
        assert_eq!(first_weekday_offset(2026, 9), 4);
    }

    #[test]
    fn color_tier_partition() {
        let tiers: Vec<ColorTier> = (0..=6).map(color_tier).collect();
        assert_eq!(
            tiers,
            vec![
                ColorTier::None,
                ColorTier::Low,
                ColorTier::Low,
                ColorTier::Medium,
                ColorTier::High,
                ColorTier::High,
                ColorTier::Severe,
            ]
        );
        assert_eq!(color_tier(9), ColorTier::Severe);
        assert_eq!(ColorTier::Severe.color(), "black");
    }

    #[test]
    fn grid_has_leading_blanks_and_no_padding() {
        let mut consumption = ConsumptionMap::new();
        consumption.insert("2026-10-3".to_string(), 4);

        let cells = render_grid(2026, 9, &consumption);
        assert_eq!(cells.len(), 4 + 31);
        assert!(cells[..4].iter().all(|cell| *cell == Cell::Blank));
        assert_eq!(
            cells[4 + 2],
            Cell::Day {
                day: 3,
                date_key: "2026-10-3".to_string(),
                quantity: 4,
                tier: ColorTier::High,
            }
        );
        match &cells[4] {
            Cell::Day { day, quantity, tier, .. } => {
                assert_eq!((*day, *quantity, *tier), (1, 0, ColorTier::None));
            }
            Cell::Blank => panic!("expected the first day"),
        }
    }

    #[test]
    fn month_bounds_cover_whole_month() {
        let (first, last) = month_bounds(2024, 1).unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn unrepresentable_year_has_no_days() {
        assert_eq!(days_in_month(i32::MAX, 11), 0);
        assert_eq!(days_in_month(i32::MIN, 0), 0);
        assert!(month_bounds(i32::MAX, 11).is_none());
        assert!(render_grid(i32::MAX, 11, &ConsumptionMap::new()).is_empty());
    }
}
