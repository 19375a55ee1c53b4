//! # Casa Verde Booking
//!
//! The facility reservation wizard.
//!
//! One [`state::BookingState`] lives inside a store for the duration of a
//! wizard session. [`reducer::BookingReducer`] walks it through the step
//! machine
//!
//! ```text
//! Empty → FacilityChosen → DateChosen → TimeChosen
//!       → [AmenitiesConfigured]      (event venue only)
//!       → SummaryReady → Submitted   (terminal, resets the draft)
//! ```
//!
//! with each transition gated on the previous step's required fields.
//! Availability is fetched once facility and date are both known; the
//! amenity catalog is fetched per visit to the amenities step; the fee
//! estimate ([`fees`]) is advisory and recomputed from the draft alone.
//! Submission serializes ids and quantities only (the server prices the
//! booking), and exactly one network call can be outstanding at a time.
//!
//! Confirmed reservations render a check-in code through [`checkin`],
//! whose payload shape is a wire contract with the server's verifier.

pub mod actions;
pub mod checkin;
pub mod environment;
pub mod fees;
pub mod gateway;
pub mod reducer;
pub mod slots;
pub mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

// Re-export main types for convenience
pub use actions::BookingAction;
pub use checkin::CheckInCode;
pub use environment::BookingEnvironment;
pub use gateway::BookingGateway;
pub use reducer::BookingReducer;
pub use slots::AvailabilitySlot;
pub use state::{
    AmenityId, AmenitySelection, BookingState, EventType, Facility, ReservationDraft,
    SubmissionState, WizardStep,
};
