//! Wizard actions.

use crate::state::{AmenityId, EventType, Facility};
use casaverde_api::types::{AmenityOption, ReservationRecord, SlotRecord};
use chrono::NaiveDate;

/// All inputs to the booking reducer: user intents and the feedback
/// actions produced by its effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingAction {
    /// Enter the wizard: snapshot the identity and overwrite any stale
    /// draft from an abandoned session.
    Begin {
        /// Logged-in user id, if any.
        user_id: Option<u64>,
        /// Whether the account qualifies for discounted fees; fixed for
        /// this wizard session.
        discount_eligible: bool,
    },

    /// Step 1: pick a facility.
    ChooseFacility {
        /// The chosen facility.
        facility: Facility,
    },

    /// Step 2: pick a date (not before today).
    ChooseDate {
        /// The chosen calendar date.
        date: NaiveDate,
    },

    /// Availability arrived for the given date.
    SlotsLoaded {
        /// The date the fetch was for; stale responses are dropped.
        date: NaiveDate,
        /// Wire slots to resolve.
        records: Vec<SlotRecord>,
    },

    /// Availability fetch failed.
    SlotsFailed {
        /// Normalized message for display.
        message: String,
    },

    /// Step 3: pick one of the loaded slots by list position.
    ChooseSlot {
        /// Index into the loaded slot list.
        index: usize,
    },

    /// The amenity catalog arrived.
    CatalogLoaded {
        /// Catalog options for this visit.
        options: Vec<AmenityOption>,
    },

    /// The amenity catalog fetch failed.
    CatalogFailed {
        /// Normalized message for display.
        message: String,
    },

    /// Amenities step: choose the kind of event.
    SetEventType {
        /// The chosen event type.
        event_type: EventType,
    },

    /// Amenities step: set the expected headcount.
    SetGuestCount {
        /// Number of guests; validated on `CompleteAmenities`.
        count: u32,
    },

    /// Amenities step: set a quantity (clamped to the catalog bound).
    SetAmenityQuantity {
        /// Which amenity.
        id: AmenityId,
        /// Requested quantity; out-of-range input clamps, never rejects.
        quantity: u32,
    },

    /// Amenities step: flip a single-unit amenity on or off.
    ToggleAmenity {
        /// Which amenity; must have `max_quantity == 1`.
        id: AmenityId,
    },

    /// Amenities step: validate and move on.
    CompleteAmenities,

    /// Enter the summary once everything required is present.
    ReviewSummary,

    /// Summary: submit the draft to the server.
    Submit,

    /// The server confirmed the reservation.
    SubmissionSucceeded {
        /// The confirmed record.
        record: ReservationRecord,
    },

    /// The submission failed; the draft is kept for a retry.
    SubmissionFailed {
        /// Normalized message for display.
        message: String,
    },

    /// Fetch the confirmed-reservation list.
    LoadReservations,

    /// The reservation list arrived.
    ReservationsLoaded {
        /// Confirmed reservations, newest first as the server returns
        /// them.
        records: Vec<ReservationRecord>,
    },

    /// The reservation list fetch failed.
    ReservationsFailed {
        /// Normalized message for display.
        message: String,
    },

    /// Dismiss the current failure notice.
    DismissNotice,
}
