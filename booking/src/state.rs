//! Wizard state: the reservation draft and everything around it.

use casaverde_api::types::{AmenityLine, AmenityOption, NewReservation, ReservationRecord};
use casaverde_core::money::Centavos;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::slots::AvailabilitySlot;

// ═══════════════════════════════════════════════════════════════════════
// Facilities
// ═══════════════════════════════════════════════════════════════════════

/// The association's bookable facilities.
///
/// This set is fixed; the amenity catalog, by contrast, is server data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facility {
    /// Tennis court.
    TennisCourt,
    /// Basketball court.
    BasketballCourt,
    /// The event hall; the only facility with amenities, guest count,
    /// and event type.
    EventPlace,
}

impl Facility {
    /// Every facility, in display order.
    pub const ALL: [Self; 3] = [Self::TennisCourt, Self::BasketballCourt, Self::EventPlace];

    /// Server-side facility id.
    #[must_use]
    pub const fn id(self) -> u32 {
        match self {
            Self::TennisCourt => 1,
            Self::BasketballCourt => 2,
            Self::EventPlace => 3,
        }
    }

    /// Facility for a server-side id.
    #[must_use]
    pub const fn from_id(id: u32) -> Option<Self> {
        match id {
            1 => Some(Self::TennisCourt),
            2 => Some(Self::BasketballCourt),
            3 => Some(Self::EventPlace),
            _ => None,
        }
    }

    /// Whether this facility supports event metadata and amenities.
    #[must_use]
    pub const fn is_event_venue(self) -> bool {
        matches!(self, Self::EventPlace)
    }

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TennisCourt => "Tennis Court",
            Self::BasketballCourt => "Basketball Court",
            Self::EventPlace => "Event Place",
        }
    }
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Event metadata and amenities
// ═══════════════════════════════════════════════════════════════════════

/// Kind of event booked at the event hall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventType {
    /// Wedding reception.
    Wedding,
    /// Birthday party.
    Birthday,
    /// Baptismal celebration.
    Baptismal,
    /// Anything else, with the user's own label.
    Other(String),
}

impl EventType {
    /// The label submitted to the server and shown on the summary.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Wedding => "Wedding",
            Self::Birthday => "Birthday",
            Self::Baptismal => "Baptismal",
            Self::Other(label) => label,
        }
    }

    /// A custom event type needs a non-empty label.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        match self {
            Self::Other(label) => !label.trim().is_empty(),
            _ => true,
        }
    }
}

/// Catalog id of an amenity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AmenityId(pub u32);

impl fmt::Display for AmenityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One amenity choice on the draft: the requested quantity and the unit
/// price snapshotted when the user selected it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmenitySelection {
    /// Requested quantity, already clamped to the catalog bound.
    pub quantity: u32,
    /// Unit price at selection time, for the advisory estimate only.
    pub unit_price: Centavos,
}

// ═══════════════════════════════════════════════════════════════════════
// The draft
// ═══════════════════════════════════════════════════════════════════════

/// The in-progress reservation, accumulated across wizard steps.
///
/// Every field starts unset and is filled by exactly one step. The draft
/// resets to this initial state exactly once per confirmed submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationDraft {
    /// Chosen facility.
    pub facility: Option<Facility>,
    /// Booking date (no time component).
    pub date: Option<NaiveDate>,
    /// Start of the chosen slot; always set together with `end_time`.
    pub start_time: Option<NaiveDateTime>,
    /// End of the chosen slot.
    pub end_time: Option<NaiveDateTime>,
    /// The fee actually charged for the slot (discounted when the user
    /// qualifies).
    pub charged_fee: Option<Centavos>,
    /// Whether `charged_fee` is a discount below the slot's base fee.
    pub was_discounted: bool,
    /// Kind of event; event venue only.
    pub event_type: Option<EventType>,
    /// Expected headcount; event venue only.
    pub guest_count: Option<u32>,
    /// Amenity selections keyed by catalog id; event venue only.
    pub amenities: BTreeMap<AmenityId, AmenitySelection>,
}

/// Why a draft cannot be submitted yet.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DraftError {
    /// One of facility, date, start, or end is unset.
    #[error("Missing reservation details")]
    MissingDetails,
}

impl ReservationDraft {
    /// Whether nothing has been chosen yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Whether the chosen facility is the event venue.
    #[must_use]
    pub fn is_event_booking(&self) -> bool {
        self.facility.is_some_and(Facility::is_event_venue)
    }

    /// Drop the slot-derived fields (start, end, fee). Used when the
    /// facility or date changes and the old slot no longer applies.
    pub fn clear_slot(&mut self) {
        self.start_time = None;
        self.end_time = None;
        self.charged_fee = None;
        self.was_discounted = false;
    }

    /// Drop the event-only fields. Used when the facility moves away
    /// from the event venue so stale amenities can never ride along.
    pub fn clear_event(&mut self) {
        self.event_type = None;
        self.guest_count = None;
        self.amenities.clear();
    }

    /// The amenity lines a submission carries: quantity > 0 entries,
    /// ids and quantities only.
    #[must_use]
    pub fn amenity_lines(&self) -> Vec<AmenityLine> {
        self.amenities
            .iter()
            .filter(|(_, selection)| selection.quantity > 0)
            .map(|(id, selection)| AmenityLine {
                amenity_id: id.0,
                quantity: selection.quantity,
            })
            .collect()
    }

    /// Build the wire request for this draft.
    ///
    /// Prices and totals are never included; the server prices the
    /// booking from ids and quantities.
    ///
    /// # Errors
    ///
    /// [`DraftError::MissingDetails`] when facility, date, start, or end
    /// is unset. This is the client-side check that runs before any
    /// network call.
    pub fn submission_request(&self) -> Result<NewReservation, DraftError> {
        let (Some(facility), Some(date), Some(start), Some(end)) =
            (self.facility, self.date, self.start_time, self.end_time)
        else {
            return Err(DraftError::MissingDetails);
        };

        let event = facility.is_event_venue();
        Ok(NewReservation {
            facility_id: facility.id(),
            date,
            start_time: start.time(),
            end_time: end.time(),
            guest_count: if event { self.guest_count } else { None },
            event_type: if event {
                self.event_type.as_ref().map(|e| e.label().to_string())
            } else {
                None
            },
            amenities: if event { self.amenity_lines() } else { Vec::new() },
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Wizard state
// ═══════════════════════════════════════════════════════════════════════

/// Named wizard steps, in strict forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStep {
    /// Nothing chosen yet.
    #[default]
    Empty,
    /// Facility picked.
    FacilityChosen,
    /// Date picked; availability is being (or has been) fetched.
    DateChosen,
    /// Slot picked; fees are locked in.
    TimeChosen,
    /// Event details validated (event venue only).
    AmenitiesConfigured,
    /// Everything required is present; the summary can submit.
    SummaryReady,
    /// Terminal: the server confirmed and the draft was reset.
    Submitted,
}

/// Submission lifecycle. At most one call is outstanding at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    /// No submission attempted since the last reset.
    #[default]
    Idle,
    /// A call to the server is outstanding; further submits are ignored.
    InFlight,
    /// The server confirmed this reservation.
    Succeeded {
        /// The confirmed record, including the check-in token.
        record: ReservationRecord,
    },
    /// The last attempt failed; the draft is intact for a retry.
    Failed {
        /// Normalized message for display.
        message: String,
    },
}

impl SubmissionState {
    /// Whether a submission call is outstanding.
    #[must_use]
    pub const fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight)
    }
}

/// Field-level errors for the amenities step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AmenityFormErrors {
    /// Problem with the event type, if any.
    pub event_type: Option<String>,
    /// Problem with the guest count, if any.
    pub guest_count: Option<String>,
}

impl AmenityFormErrors {
    /// Whether both fields pass.
    #[must_use]
    pub const fn is_clear(&self) -> bool {
        self.event_type.is_none() && self.guest_count.is_none()
    }
}

/// Everything the wizard knows: the draft plus the per-session context
/// around it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingState {
    /// Logged-in user, snapshotted at `Begin`.
    pub user_id: Option<u64>,
    /// Discount eligibility, snapshotted at `Begin`; fixed for the
    /// session.
    pub discount_eligible: bool,

    /// The draft being assembled.
    pub draft: ReservationDraft,
    /// Current wizard step.
    pub step: WizardStep,

    /// Resolved slots for the chosen facility and date.
    pub slots: Vec<AvailabilitySlot>,
    /// True while availability is being fetched.
    pub slots_loading: bool,

    /// Amenity catalog for this visit of the amenities step.
    pub catalog: Vec<AmenityOption>,
    /// True while the catalog is being fetched.
    pub catalog_loading: bool,
    /// Field errors from the last `CompleteAmenities` attempt.
    pub form_errors: AmenityFormErrors,

    /// Submission lifecycle.
    pub submission: SubmissionState,

    /// The user's confirmed reservations (list view).
    pub reservations: Vec<ReservationRecord>,
    /// True while the reservation list is being fetched.
    pub reservations_loading: bool,

    /// Last flow-level failure message, until dismissed.
    pub notice: Option<String>,
}

impl BookingState {
    /// Advisory amenity total for display; zero off the event venue.
    #[must_use]
    pub fn amenities_total(&self) -> Centavos {
        crate::fees::amenities_total(&self.draft)
    }

    /// Advisory grand total for display; the server reprices on submit.
    #[must_use]
    pub fn estimated_total(&self) -> Centavos {
        crate::fees::estimated_total(&self.draft)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn facility_ids_round_trip() {
        for facility in Facility::ALL {
            assert_eq!(Facility::from_id(facility.id()), Some(facility));
        }
        assert_eq!(Facility::from_id(9), None);
    }

    #[test]
    fn only_the_event_place_is_an_event_venue() {
        assert!(Facility::EventPlace.is_event_venue());
        assert!(!Facility::TennisCourt.is_event_venue());
        assert!(!Facility::BasketballCourt.is_event_venue());
    }

    #[test]
    fn custom_event_type_requires_a_label() {
        assert!(EventType::Wedding.is_complete());
        assert!(EventType::Other("Reunion".to_string()).is_complete());
        assert!(!EventType::Other("   ".to_string()).is_complete());
    }

    #[test]
    fn submission_request_requires_the_core_fields() {
        let draft = ReservationDraft::default();
        assert_eq!(draft.submission_request(), Err(DraftError::MissingDetails));

        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let draft = ReservationDraft {
            facility: Some(Facility::TennisCourt),
            date: Some(date),
            start_time: Some(date.and_hms_opt(13, 0, 0).unwrap()),
            end_time: Some(date.and_hms_opt(14, 0, 0).unwrap()),
            ..ReservationDraft::default()
        };

        let request = draft.submission_request().unwrap();
        assert_eq!(request.facility_id, 1);
        assert_eq!(request.event_type, None);
        assert!(request.amenities.is_empty());
    }

    #[test]
    fn event_fields_are_dropped_for_non_event_facilities() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let mut draft = ReservationDraft {
            facility: Some(Facility::TennisCourt),
            date: Some(date),
            start_time: Some(date.and_hms_opt(13, 0, 0).unwrap()),
            end_time: Some(date.and_hms_opt(14, 0, 0).unwrap()),
            event_type: Some(EventType::Wedding),
            guest_count: Some(50),
            ..ReservationDraft::default()
        };
        draft.amenities.insert(
            AmenityId(1),
            AmenitySelection {
                quantity: 10,
                unit_price: Centavos::from_pesos(20),
            },
        );

        // Leftover event state never reaches the wire off the event venue.
        let request = draft.submission_request().unwrap();
        assert_eq!(request.guest_count, None);
        assert_eq!(request.event_type, None);
        assert!(request.amenities.is_empty());
    }

    #[test]
    fn amenity_lines_skip_zero_quantities() {
        let mut draft = ReservationDraft {
            facility: Some(Facility::EventPlace),
            ..ReservationDraft::default()
        };
        draft.amenities.insert(
            AmenityId(1),
            AmenitySelection {
                quantity: 100,
                unit_price: Centavos::from_pesos(20),
            },
        );
        draft.amenities.insert(
            AmenityId(2),
            AmenitySelection {
                quantity: 0,
                unit_price: Centavos::from_pesos(500),
            },
        );

        let lines = draft.amenity_lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].amenity_id, 1);
        assert_eq!(lines[0].quantity, 100);
    }
}
