//! Availability resolution.
//!
//! The server describes slots with 12-hour wall-clock labels
//! (`"1:00 PM"`). Resolution combines each label with the queried date
//! into absolute times and derives the fee the requesting user would
//! actually pay.

use casaverde_api::types::SlotRecord;
use casaverde_core::money::Centavos;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;

/// One bookable window, resolved against a date and a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilitySlot {
    /// Start-of-window label as the server sent it, e.g. `"1:00 PM"`.
    pub start_label: String,
    /// End-of-window label.
    pub end_label: String,
    /// Whether the window can still be booked.
    pub available: bool,
    /// Base facility fee.
    pub base_fee: Centavos,
    /// Fee for verified residents.
    pub discounted_fee: Centavos,
    /// Absolute start (label × queried date).
    pub start: NaiveDateTime,
    /// Absolute end.
    pub end: NaiveDateTime,
    /// The fee this user would be charged.
    pub display_fee: Centavos,
    /// Whether `display_fee` is an actual reduction below the base fee.
    pub is_discounted: bool,
}

/// A slot label the client could not interpret.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid time label: {0:?}")]
pub struct SlotTimeError(pub String);

impl AvailabilitySlot {
    /// Resolve one wire record against the queried date and the user's
    /// discount eligibility.
    ///
    /// # Errors
    ///
    /// [`SlotTimeError`] when either time label is not `H:MM AM|PM`.
    pub fn resolve(
        record: &SlotRecord,
        date: NaiveDate,
        discount_eligible: bool,
    ) -> Result<Self, SlotTimeError> {
        let start = date.and_time(parse_label(&record.start_time)?);
        let end = date.and_time(parse_label(&record.end_time)?);

        let display_fee = if discount_eligible {
            record.discounted_fee
        } else {
            record.fee
        };

        Ok(Self {
            start_label: record.start_time.clone(),
            end_label: record.end_time.clone(),
            available: record.available,
            base_fee: record.fee,
            discounted_fee: record.discounted_fee,
            start,
            end,
            display_fee,
            is_discounted: discount_eligible && record.discounted_fee < record.fee,
        })
    }

    /// `"1:00 PM - 2:00 PM"`, the label the slot list shows.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} - {}", self.start_label, self.end_label)
    }
}

/// Resolve a whole availability response, dropping records whose labels
/// the client cannot parse (logged, never fatal).
#[must_use]
pub fn resolve_slots(
    records: &[SlotRecord],
    date: NaiveDate,
    discount_eligible: bool,
) -> Vec<AvailabilitySlot> {
    records
        .iter()
        .filter_map(|record| match AvailabilitySlot::resolve(record, date, discount_eligible) {
            Ok(slot) => Some(slot),
            Err(error) => {
                tracing::warn!(%error, "Dropping unparseable availability slot");
                None
            },
        })
        .collect()
}

/// Parse a 12-hour `H:MM AM|PM` label into a time of day.
fn parse_label(label: &str) -> Result<NaiveTime, SlotTimeError> {
    let bad = || SlotTimeError(label.to_string());

    let (clock, period) = label.trim().split_once(' ').ok_or_else(bad)?;
    let (hours, minutes) = clock.split_once(':').ok_or_else(bad)?;

    let hours: u32 = hours.parse().map_err(|_| bad())?;
    let minutes: u32 = minutes.parse().map_err(|_| bad())?;
    if !(1..=12).contains(&hours) || minutes > 59 {
        return Err(bad());
    }

    let hours24 = match period {
        "AM" => {
            if hours == 12 {
                0
            } else {
                hours
            }
        },
        "PM" => {
            if hours == 12 {
                12
            } else {
                hours + 12
            }
        },
        _ => return Err(bad()),
    };

    NaiveTime::from_hms_opt(hours24, minutes, 0).ok_or_else(bad)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn record(start: &str, end: &str, fee: u64, discounted: u64) -> SlotRecord {
        SlotRecord {
            start_time: start.to_string(),
            end_time: end.to_string(),
            available: true,
            fee: Centavos::from_pesos(fee),
            discounted_fee: Centavos::from_pesos(discounted),
        }
    }

    fn june_second() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
    }

    #[test]
    fn labels_combine_with_the_queried_date() {
        let slot =
            AvailabilitySlot::resolve(&record("1:00 PM", "2:00 PM", 200, 150), june_second(), false)
                .unwrap();

        assert_eq!(slot.start, june_second().and_hms_opt(13, 0, 0).unwrap());
        assert_eq!(slot.end, june_second().and_hms_opt(14, 0, 0).unwrap());
        assert_eq!(slot.start.date(), slot.end.date());
        assert!(slot.start < slot.end);
        assert_eq!(slot.label(), "1:00 PM - 2:00 PM");
    }

    #[test]
    fn twelve_oclock_edges_parse_correctly() {
        assert_eq!(
            parse_label("12:00 AM").unwrap(),
            NaiveTime::from_hms_opt(0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_label("12:30 PM").unwrap(),
            NaiveTime::from_hms_opt(12, 30, 0).unwrap()
        );
        assert_eq!(
            parse_label("9:05 AM").unwrap(),
            NaiveTime::from_hms_opt(9, 5, 0).unwrap()
        );
    }

    #[test]
    fn bad_labels_are_rejected() {
        for label in ["", "13:00 PM", "1:00", "1:60 AM", "0:30 AM", "noonish"] {
            assert!(parse_label(label).is_err(), "{label:?} should not parse");
        }
    }

    #[test]
    fn eligible_users_see_the_discounted_fee() {
        let slot =
            AvailabilitySlot::resolve(&record("1:00 PM", "2:00 PM", 200, 150), june_second(), true)
                .unwrap();
        assert_eq!(slot.display_fee, Centavos::from_pesos(150));
        assert!(slot.is_discounted);

        let base =
            AvailabilitySlot::resolve(&record("1:00 PM", "2:00 PM", 200, 150), june_second(), false)
                .unwrap();
        assert_eq!(base.display_fee, Centavos::from_pesos(200));
        assert!(!base.is_discounted);
    }

    #[test]
    fn equal_fees_are_not_a_discount() {
        let slot =
            AvailabilitySlot::resolve(&record("1:00 PM", "2:00 PM", 200, 200), june_second(), true)
                .unwrap();
        assert_eq!(slot.display_fee, Centavos::from_pesos(200));
        assert!(!slot.is_discounted);
    }

    #[test]
    fn unparseable_records_are_dropped_not_fatal() {
        let records = vec![
            record("1:00 PM", "2:00 PM", 200, 150),
            record("whenever", "2:00 PM", 200, 150),
        ];

        let slots = resolve_slots(&records, june_second(), false);
        assert_eq!(slots.len(), 1);
    }
}
