use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::utils::slugify::slugify;

#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// A single opening interval within one day
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
pub struct TimeRange {
    pub opens: NaiveTime,
    pub closes: NaiveTime,
}

impl TimeRange {
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.opens <= time && time < self.closes
    }
}

/// Weekly opening hours of a location.
///
/// Days without an entry are closed. BTreeMap keeps serialized output in a
/// stable day order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
pub struct OpeningHours {
    #[serde(default)]
    pub weekly: BTreeMap<Weekday, Vec<TimeRange>>,
}

impl OpeningHours {
    pub fn is_open_at(&self, weekday: Weekday, time: NaiveTime) -> bool {
        self.weekly
            .get(&weekday)
            .is_some_and(|ranges| ranges.iter().any(|range| range.contains(time)))
    }
}

/// A lending location (branch). The id is the slug of its name and is the
/// scope token location-scoped permission checks are evaluated against.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, utoipa::ToSchema, utoipa::ToResponse)]
pub struct Location {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub opening_hours: OpeningHours,
    pub created_at: DateTime<Utc>,
}

impl Location {
    pub fn new(name: &str, address: Option<String>) -> Self {
        Location {
            id: slugify(name),
            name: name.to_string(),
            address,
            opening_hours: OpeningHours::default(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_is_open_at() {
        let mut hours = OpeningHours::default();
        hours.weekly.insert(
            Weekday::Monday,
            vec![
                TimeRange {
                    opens: time(9, 0),
                    closes: time(12, 0),
                },
                TimeRange {
                    opens: time(14, 0),
                    closes: time(18, 0),
                },
            ],
        );

        assert!(hours.is_open_at(Weekday::Monday, time(10, 30)));
        assert!(!hours.is_open_at(Weekday::Monday, time(12, 0)));
        assert!(!hours.is_open_at(Weekday::Monday, time(13, 0)));
        assert!(hours.is_open_at(Weekday::Monday, time(17, 59)));
        assert!(!hours.is_open_at(Weekday::Tuesday, time(10, 30)));
    }

    #[test]
    fn test_location_id_is_slug() {
        let location = Location::new("Nordstadt Werkstatt", None);
        assert_eq!(location.id, "nordstadt-werkstatt");
    }
}
