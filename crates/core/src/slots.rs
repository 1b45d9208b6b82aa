//! Visit slots and the grouped listing shown when choosing a date and time.

use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::identifiers::OffenderNo;
use crate::session::VisitRestriction;
use crate::types::{Date, Timestamp};

/// Slots starting before this time are listed under "morning".
pub fn afternoon_starts_at() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// A bookable visit slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitSlot {
    pub id: String,
    pub start_timestamp: Timestamp,
    pub end_timestamp: Timestamp,
    /// Zero means fully booked.
    pub available_tables: u32,
    pub room: String,
}

impl VisitSlot {
    pub fn is_available(&self) -> bool {
        self.available_tables > 0
    }

    pub fn time_of_day(&self) -> TimeOfDay {
        if self.start_timestamp.time() < afternoon_starts_at() {
            TimeOfDay::Morning
        } else {
            TimeOfDay::Afternoon
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// Optional narrowing applied to a slot listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotFilter {
    /// Only include slots on these weekdays. Empty means every day.
    #[serde(default)]
    pub days: Vec<Weekday>,
    pub time_of_day: Option<TimeOfDay>,
}

impl SlotFilter {
    pub fn matches(&self, slot: &VisitSlot) -> bool {
        use chrono::Datelike;

        let day_ok = self.days.is_empty() || self.days.contains(&slot.start_timestamp.weekday());
        let time_ok = self.time_of_day.map_or(true, |t| t == slot.time_of_day());
        day_ok && time_ok
    }
}

/// Everything the visit scheduler needs to list slots for one booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotQuery {
    pub username: String,
    pub prison_id: String,
    pub offender_no: OffenderNo,
    pub visit_restriction: VisitRestriction,
    pub min_days_ahead: i64,
    pub max_days_ahead: i64,
    pub filter: SlotFilter,
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDay {
    pub date: Date,
    pub morning: Vec<VisitSlot>,
    pub afternoon: Vec<VisitSlot>,
}

/// Slots grouped by day, then by morning/afternoon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotListing {
    pub days: Vec<SlotDay>,
}

impl SlotListing {
    /// Every slot in the listing, in display order.
    pub fn flatten(&self) -> Vec<VisitSlot> {
        self.days
            .iter()
            .flat_map(|day| day.morning.iter().chain(day.afternoon.iter()))
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Group slots by date and time of day, dropping those the filter excludes.
pub fn group_slots(mut slots: Vec<VisitSlot>, filter: &SlotFilter) -> SlotListing {
    slots.retain(|slot| filter.matches(slot));
    slots.sort_by(|a, b| a.start_timestamp.cmp(&b.start_timestamp).then_with(|| a.id.cmp(&b.id)));

    let mut days: Vec<SlotDay> = Vec::new();
    for slot in slots {
        let date = slot.start_timestamp.date();
        if days.last().map_or(true, |d| d.date != date) {
            days.push(SlotDay {
                date,
                ..Default::default()
            });
        }
        if let Some(day) = days.last_mut() {
            match slot.time_of_day() {
                TimeOfDay::Morning => day.morning.push(slot),
                TimeOfDay::Afternoon => day.afternoon.push(slot),
            }
        }
    }

    SlotListing { days }
}

/// Look up a slot by id in the last shown listing, accepting it only if it
/// still has a free table.
pub fn find_available_slot<'a>(listing: &'a [VisitSlot], slot_id: &str) -> Option<&'a VisitSlot> {
    listing
        .iter()
        .find(|slot| slot.id == slot_id)
        .filter(|slot| slot.is_available())
}
