//! The wizard reducer: guarded step transitions over the draft.
//!
//! Guard policy: a transition whose prerequisites are missing leaves the
//! state unchanged and, where a user could plausibly get there, records a
//! notice or field error; impossible inputs (stale indices, amenity ids
//! not in the catalog) are dropped with a log line. While a submission is
//! outstanding every draft mutation is ignored, which is what makes a
//! double-tapped confirm produce exactly one network call.

use crate::actions::BookingAction;
use crate::environment::BookingEnvironment;
use crate::gateway::BookingGateway;
use crate::slots::resolve_slots;
use crate::state::{
    AmenityFormErrors, AmenitySelection, BookingState, ReservationDraft, SubmissionState,
    WizardStep,
};
use casaverde_core::effect::{Effect, Effects};
use casaverde_core::environment::Clock;
use casaverde_core::reducer::Reducer;
use casaverde_core::smallvec;

/// Reducer for the reservation wizard.
#[derive(Debug, Clone)]
pub struct BookingReducer<G, C> {
    _phantom: std::marker::PhantomData<(G, C)>,
}

impl<G, C> BookingReducer<G, C> {
    /// Create the reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<G, C> Default for BookingReducer<G, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G, C> Reducer for BookingReducer<G, C>
where
    G: BookingGateway + Clone + 'static,
    C: Clock + Clone + 'static,
{
    type State = BookingState;
    type Action = BookingAction;
    type Environment = BookingEnvironment<G, C>;

    #[allow(clippy::too_many_lines)]
    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects<Self::Action> {
        // List maintenance and submission settlement are always allowed;
        // everything that mutates the draft waits for the in-flight
        // submission to settle.
        if state.submission.is_in_flight() && mutates_draft(&action) {
            tracing::debug!("Ignoring wizard input while a submission is outstanding");
            return smallvec![];
        }

        match action {
            // ═══════════════════════════════════════════════════════════
            // Entry
            // ═══════════════════════════════════════════════════════════
            BookingAction::Begin {
                user_id,
                discount_eligible,
            } => {
                // Re-entry overwrites whatever a previous abandoned
                // session left behind.
                state.user_id = user_id;
                state.discount_eligible = discount_eligible;
                state.draft = ReservationDraft::default();
                state.step = WizardStep::Empty;
                state.slots.clear();
                state.slots_loading = false;
                state.catalog.clear();
                state.catalog_loading = false;
                state.form_errors = AmenityFormErrors::default();
                state.submission = SubmissionState::Idle;
                state.notice = None;
                smallvec![]
            },

            // ═══════════════════════════════════════════════════════════
            // Facility and date
            // ═══════════════════════════════════════════════════════════
            BookingAction::ChooseFacility { facility } => {
                state.draft.facility = Some(facility);
                // The old slot belonged to another facility's schedule.
                state.draft.clear_slot();
                state.slots.clear();
                if !facility.is_event_venue() {
                    // Leaving the event venue may not carry amenities
                    // along.
                    state.draft.clear_event();
                    state.form_errors = AmenityFormErrors::default();
                }
                state.step = WizardStep::FacilityChosen;
                state.notice = None;
                smallvec![]
            },

            BookingAction::ChooseDate { date } => {
                let Some(facility) = state.draft.facility else {
                    state.notice = Some("Select a facility first".to_string());
                    return smallvec![];
                };
                let today = env.clock.now().date_naive();
                if date < today {
                    state.notice = Some("Reservations cannot be made for past dates".to_string());
                    return smallvec![];
                }

                state.draft.date = Some(date);
                state.draft.clear_slot();
                state.slots.clear();
                state.slots_loading = true;
                state.step = WizardStep::DateChosen;
                state.notice = None;

                let gateway = env.gateway.clone();
                let facility_id = facility.id();
                smallvec![Effect::future(async move {
                    match gateway.availability(facility_id, date).await {
                        Ok(records) => Some(BookingAction::SlotsLoaded { date, records }),
                        Err(error) => Some(BookingAction::SlotsFailed {
                            message: error.message(),
                        }),
                    }
                })]
            },

            BookingAction::SlotsLoaded { date, records } => {
                state.slots_loading = false;
                if state.draft.date != Some(date) {
                    tracing::debug!("Dropping availability for a superseded date");
                    return smallvec![];
                }
                state.slots = resolve_slots(&records, date, state.discount_eligible);
                smallvec![]
            },

            BookingAction::SlotsFailed { message } => {
                state.slots_loading = false;
                state.notice = Some(message);
                smallvec![]
            },

            // ═══════════════════════════════════════════════════════════
            // Time slot
            // ═══════════════════════════════════════════════════════════
            BookingAction::ChooseSlot { index } => {
                if state.draft.facility.is_none() || state.draft.date.is_none() {
                    state.notice = Some("Select a facility and date first".to_string());
                    return smallvec![];
                }
                let Some(slot) = state.slots.get(index) else {
                    tracing::warn!(index, "Slot index out of range");
                    return smallvec![];
                };
                if !slot.available {
                    state.notice = Some("That time block is already reserved".to_string());
                    return smallvec![];
                }

                state.draft.start_time = Some(slot.start);
                state.draft.end_time = Some(slot.end);
                state.draft.charged_fee = Some(slot.display_fee);
                state.draft.was_discounted = slot.is_discounted;
                state.step = WizardStep::TimeChosen;
                state.notice = None;

                if state.draft.is_event_booking() {
                    // Per-visit catalog fetch for the amenities step.
                    state.catalog_loading = true;
                    let gateway = env.gateway.clone();
                    smallvec![Effect::future(async move {
                        match gateway.amenities().await {
                            Ok(options) => Some(BookingAction::CatalogLoaded { options }),
                            Err(error) => Some(BookingAction::CatalogFailed {
                                message: error.message(),
                            }),
                        }
                    })]
                } else {
                    smallvec![]
                }
            },

            BookingAction::CatalogLoaded { options } => {
                state.catalog_loading = false;
                state.catalog = options;
                smallvec![]
            },

            BookingAction::CatalogFailed { message } => {
                state.catalog_loading = false;
                state.notice = Some(message);
                smallvec![]
            },

            // ═══════════════════════════════════════════════════════════
            // Amenities (event venue only)
            // ═══════════════════════════════════════════════════════════
            BookingAction::SetEventType { event_type } => {
                if !state.draft.is_event_booking() {
                    tracing::warn!("Event type set outside an event booking");
                    return smallvec![];
                }
                state.draft.event_type = Some(event_type);
                state.form_errors.event_type = None;
                smallvec![]
            },

            BookingAction::SetGuestCount { count } => {
                if !state.draft.is_event_booking() {
                    tracing::warn!("Guest count set outside an event booking");
                    return smallvec![];
                }
                state.draft.guest_count = Some(count);
                if count > 0 {
                    state.form_errors.guest_count = None;
                }
                smallvec![]
            },

            BookingAction::SetAmenityQuantity { id, quantity } => {
                if !state.draft.is_event_booking() {
                    tracing::warn!(%id, "Amenity quantity set outside an event booking");
                    return smallvec![];
                }
                let Some(option) = state.catalog.iter().find(|option| option.id == id.0) else {
                    tracing::warn!(%id, "Amenity not in the catalog");
                    return smallvec![];
                };

                // Out-of-range input clamps to the bound, never rejects.
                let clamped = quantity.min(option.max_quantity);
                state.draft.amenities.insert(
                    id,
                    AmenitySelection {
                        quantity: clamped,
                        unit_price: option.price,
                    },
                );
                smallvec![]
            },

            BookingAction::ToggleAmenity { id } => {
                if !state.draft.is_event_booking() {
                    tracing::warn!(%id, "Amenity toggled outside an event booking");
                    return smallvec![];
                }
                let Some(option) = state.catalog.iter().find(|option| option.id == id.0) else {
                    tracing::warn!(%id, "Amenity not in the catalog");
                    return smallvec![];
                };
                if option.max_quantity != 1 {
                    tracing::warn!(%id, "Toggle is only for single-unit amenities");
                    return smallvec![];
                }

                let current = state
                    .draft
                    .amenities
                    .get(&id)
                    .map_or(0, |selection| selection.quantity);
                state.draft.amenities.insert(
                    id,
                    AmenitySelection {
                        quantity: u32::from(current == 0),
                        unit_price: option.price,
                    },
                );
                smallvec![]
            },

            BookingAction::CompleteAmenities => {
                if !state.draft.is_event_booking() {
                    tracing::warn!("Amenities completed outside an event booking");
                    return smallvec![];
                }
                if state.draft.start_time.is_none() {
                    state.notice = Some("Select a time slot first".to_string());
                    return smallvec![];
                }
                if validate_event_fields(state) {
                    state.step = WizardStep::AmenitiesConfigured;
                }
                smallvec![]
            },

            // ═══════════════════════════════════════════════════════════
            // Summary and submission
            // ═══════════════════════════════════════════════════════════
            BookingAction::ReviewSummary => {
                if state.draft.submission_request().is_err() {
                    state.notice = Some("Complete the previous steps first".to_string());
                    return smallvec![];
                }
                // The event venue also needs its details validated; other
                // facilities skip straight from TimeChosen.
                if state.draft.is_event_booking() && !validate_event_fields(state) {
                    return smallvec![];
                }
                state.step = WizardStep::SummaryReady;
                smallvec![]
            },

            BookingAction::Submit => {
                if state.user_id.is_none() {
                    state.submission = SubmissionState::Failed {
                        message: "You must be logged in to make a reservation".to_string(),
                    };
                    return smallvec![];
                }
                let request = match state.draft.submission_request() {
                    Ok(request) => request,
                    // Client-side check: no network call is attempted.
                    Err(error) => {
                        state.submission = SubmissionState::Failed {
                            message: error.to_string(),
                        };
                        return smallvec![];
                    },
                };

                state.submission = SubmissionState::InFlight;

                let gateway = env.gateway.clone();
                smallvec![Effect::future(async move {
                    match gateway.store_reservation(&request).await {
                        Ok(record) => Some(BookingAction::SubmissionSucceeded { record }),
                        Err(error) => Some(BookingAction::SubmissionFailed {
                            message: error.message(),
                        }),
                    }
                })]
            },

            BookingAction::SubmissionSucceeded { record } => {
                tracing::info!(reservation_id = record.id, "Reservation confirmed");
                state.submission = SubmissionState::Succeeded { record };

                // The one and only draft reset.
                state.draft = ReservationDraft::default();
                state.step = WizardStep::Submitted;
                state.slots.clear();
                state.catalog.clear();
                state.form_errors = AmenityFormErrors::default();

                // The list view re-fetches confirmed reservations.
                state.reservations_loading = true;
                let gateway = env.gateway.clone();
                smallvec![Effect::future(async move {
                    match gateway.reservations().await {
                        Ok(records) => Some(BookingAction::ReservationsLoaded { records }),
                        Err(error) => Some(BookingAction::ReservationsFailed {
                            message: error.message(),
                        }),
                    }
                })]
            },

            BookingAction::SubmissionFailed { message } => {
                tracing::warn!(%message, "Reservation submission failed");
                // The draft stays as-is so the user can retry.
                state.submission = SubmissionState::Failed { message };
                smallvec![]
            },

            // ═══════════════════════════════════════════════════════════
            // Reservation list
            // ═══════════════════════════════════════════════════════════
            BookingAction::LoadReservations => {
                if state.reservations_loading {
                    return smallvec![];
                }
                state.reservations_loading = true;

                let gateway = env.gateway.clone();
                smallvec![Effect::future(async move {
                    match gateway.reservations().await {
                        Ok(records) => Some(BookingAction::ReservationsLoaded { records }),
                        Err(error) => Some(BookingAction::ReservationsFailed {
                            message: error.message(),
                        }),
                    }
                })]
            },

            BookingAction::ReservationsLoaded { records } => {
                state.reservations_loading = false;
                state.reservations = records;
                smallvec![]
            },

            BookingAction::ReservationsFailed { message } => {
                state.reservations_loading = false;
                state.notice = Some(message);
                smallvec![]
            },

            BookingAction::DismissNotice => {
                state.notice = None;
                smallvec![]
            },
        }
    }
}

/// Whether an action writes to the draft (and so must wait out an
/// in-flight submission).
const fn mutates_draft(action: &BookingAction) -> bool {
    matches!(
        action,
        BookingAction::Begin { .. }
            | BookingAction::ChooseFacility { .. }
            | BookingAction::ChooseDate { .. }
            | BookingAction::ChooseSlot { .. }
            | BookingAction::SetEventType { .. }
            | BookingAction::SetGuestCount { .. }
            | BookingAction::SetAmenityQuantity { .. }
            | BookingAction::ToggleAmenity { .. }
            | BookingAction::CompleteAmenities
            | BookingAction::ReviewSummary
            | BookingAction::Submit
    )
}

/// Validate the event-only required fields, recording field errors.
/// Returns whether both pass.
fn validate_event_fields(state: &mut BookingState) -> bool {
    match &state.draft.event_type {
        None => {
            state.form_errors.event_type = Some("Please select an event type".to_string());
        },
        Some(event_type) if !event_type.is_complete() => {
            state.form_errors.event_type = Some("Please enter your event type".to_string());
        },
        Some(_) => state.form_errors.event_type = None,
    }

    match state.draft.guest_count {
        None => {
            state.form_errors.guest_count = Some("Please enter number of guests".to_string());
        },
        Some(0) => {
            state.form_errors.guest_count =
                Some("Guest count must be greater than 0".to_string());
        },
        Some(_) => state.form_errors.guest_count = None,
    }

    state.form_errors.is_clear()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::mocks::MockBookingGateway;
    use crate::state::{AmenityId, EventType, Facility};
    use casaverde_api::types::AmenityOption;
    use casaverde_core::money::Centavos;
    use casaverde_testing::ReducerTest;
    use casaverde_testing::assertions::{assert_has_future_effect, assert_no_effects};
    use casaverde_testing::mocks::{FixedClock, test_clock};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    type Env = BookingEnvironment<MockBookingGateway, FixedClock>;
    type TestReducer = BookingReducer<MockBookingGateway, FixedClock>;

    fn env() -> Env {
        BookingEnvironment::new(MockBookingGateway::new(), test_clock())
    }

    fn reduce(state: &mut BookingState, action: BookingAction, env: &Env) -> Effects<BookingAction> {
        TestReducer::new().reduce(state, action, env)
    }

    fn chairs() -> AmenityOption {
        AmenityOption {
            id: 1,
            name: "Chairs".to_string(),
            price: Centavos::from_pesos(20),
            max_quantity: 200,
        }
    }

    fn videoke() -> AmenityOption {
        AmenityOption {
            id: 3,
            name: "Videoke".to_string(),
            price: Centavos::from_pesos(1500),
            max_quantity: 1,
        }
    }

    fn event_state_with_catalog() -> BookingState {
        BookingState {
            user_id: Some(7),
            draft: ReservationDraft {
                facility: Some(Facility::EventPlace),
                ..ReservationDraft::default()
            },
            catalog: vec![chairs(), videoke()],
            ..BookingState::default()
        }
    }

    #[test]
    fn begin_overwrites_a_stale_draft() {
        let env = env();
        let mut state = event_state_with_catalog();
        state.draft.guest_count = Some(50);
        state.step = WizardStep::TimeChosen;
        state.notice = Some("old".to_string());

        let effects = reduce(
            &mut state,
            BookingAction::Begin {
                user_id: Some(9),
                discount_eligible: true,
            },
            &env,
        );

        assert_no_effects(&effects);
        assert!(state.draft.is_empty());
        assert_eq!(state.step, WizardStep::Empty);
        assert_eq!(state.user_id, Some(9));
        assert!(state.discount_eligible);
        assert_eq!(state.notice, None);
    }

    #[test]
    fn choosing_a_facility_advances_and_clears_the_old_slot() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let mut state = BookingState::default();
        state.draft.start_time = Some(date.and_hms_opt(13, 0, 0).unwrap());
        state.draft.end_time = Some(date.and_hms_opt(14, 0, 0).unwrap());
        state.draft.charged_fee = Some(Centavos::from_pesos(200));

        ReducerTest::new(TestReducer::new())
            .with_env(env())
            .given_state(state)
            .when_action(BookingAction::ChooseFacility {
                facility: Facility::BasketballCourt,
            })
            .then_state(|state| {
                assert_eq!(state.step, WizardStep::FacilityChosen);
                assert_eq!(state.draft.facility, Some(Facility::BasketballCourt));
                assert_eq!(state.draft.start_time, None);
                assert_eq!(state.draft.charged_fee, None);
            })
            .then_no_effects()
            .run();
    }

    #[test]
    fn date_requires_a_facility_and_rejects_the_past() {
        let env = env();
        let mut state = BookingState::default();

        let effects = reduce(
            &mut state,
            BookingAction::ChooseDate {
                date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            },
            &env,
        );
        assert_no_effects(&effects);
        assert_eq!(state.notice.as_deref(), Some("Select a facility first"));
        assert_eq!(state.step, WizardStep::Empty);

        let _ = reduce(
            &mut state,
            BookingAction::ChooseFacility {
                facility: Facility::TennisCourt,
            },
            &env,
        );

        // test_clock is 2025-06-01; the day before must be rejected.
        let effects = reduce(
            &mut state,
            BookingAction::ChooseDate {
                date: NaiveDate::from_ymd_opt(2025, 5, 31).unwrap(),
            },
            &env,
        );
        assert_no_effects(&effects);
        assert_eq!(
            state.notice.as_deref(),
            Some("Reservations cannot be made for past dates")
        );
        assert_eq!(state.draft.date, None);

        // Today is fine, and kicks off the availability fetch.
        let effects = reduce(
            &mut state,
            BookingAction::ChooseDate {
                date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            },
            &env,
        );
        assert_has_future_effect(&effects);
        assert!(state.slots_loading);
        assert_eq!(state.step, WizardStep::DateChosen);
    }

    #[test]
    fn stale_availability_responses_are_dropped() {
        let env = env();
        let mut state = BookingState {
            draft: ReservationDraft {
                facility: Some(Facility::TennisCourt),
                date: Some(NaiveDate::from_ymd_opt(2025, 6, 3).unwrap()),
                ..ReservationDraft::default()
            },
            slots_loading: true,
            ..BookingState::default()
        };

        let effects = reduce(
            &mut state,
            BookingAction::SlotsLoaded {
                date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
                records: vec![],
            },
            &env,
        );

        assert_no_effects(&effects);
        assert!(!state.slots_loading);
        assert!(state.slots.is_empty());
    }

    #[test]
    fn quantities_clamp_to_the_catalog_bound() {
        let env = env();
        let mut state = event_state_with_catalog();

        let _ = reduce(
            &mut state,
            BookingAction::SetAmenityQuantity {
                id: AmenityId(1),
                quantity: 450,
            },
            &env,
        );

        assert_eq!(state.draft.amenities[&AmenityId(1)].quantity, 200);
        assert_eq!(
            state.draft.amenities[&AmenityId(1)].unit_price,
            Centavos::from_pesos(20)
        );
    }

    #[test]
    fn single_unit_amenities_toggle_idempotently() {
        let env = env();
        let mut state = event_state_with_catalog();
        let toggle = BookingAction::ToggleAmenity { id: AmenityId(3) };

        let _ = reduce(&mut state, toggle.clone(), &env);
        assert_eq!(state.draft.amenities[&AmenityId(3)].quantity, 1);

        let _ = reduce(&mut state, toggle.clone(), &env);
        assert_eq!(state.draft.amenities[&AmenityId(3)].quantity, 0);

        let _ = reduce(&mut state, toggle, &env);
        assert_eq!(state.draft.amenities[&AmenityId(3)].quantity, 1);

        // A multi-unit amenity is not a toggle.
        let _ = reduce(&mut state, BookingAction::ToggleAmenity { id: AmenityId(1) }, &env);
        assert!(!state.draft.amenities.contains_key(&AmenityId(1)));
    }

    #[test]
    fn amenity_writes_are_rejected_off_the_event_venue() {
        let env = env();
        let mut state = event_state_with_catalog();
        state.draft.facility = Some(Facility::BasketballCourt);

        let _ = reduce(
            &mut state,
            BookingAction::SetAmenityQuantity {
                id: AmenityId(1),
                quantity: 10,
            },
            &env,
        );
        let _ = reduce(
            &mut state,
            BookingAction::SetGuestCount { count: 10 },
            &env,
        );

        assert!(state.draft.amenities.is_empty());
        assert_eq!(state.draft.guest_count, None);
    }

    #[test]
    fn leaving_the_event_venue_clears_event_state() {
        let env = env();
        let mut state = event_state_with_catalog();
        let _ = reduce(
            &mut state,
            BookingAction::SetEventType {
                event_type: EventType::Wedding,
            },
            &env,
        );
        let _ = reduce(&mut state, BookingAction::SetGuestCount { count: 50 }, &env);
        let _ = reduce(
            &mut state,
            BookingAction::SetAmenityQuantity {
                id: AmenityId(1),
                quantity: 100,
            },
            &env,
        );

        let _ = reduce(
            &mut state,
            BookingAction::ChooseFacility {
                facility: Facility::TennisCourt,
            },
            &env,
        );

        assert_eq!(state.draft.event_type, None);
        assert_eq!(state.draft.guest_count, None);
        assert!(state.draft.amenities.is_empty());
    }

    #[test]
    fn complete_amenities_blocks_on_field_errors() {
        let env = env();
        let mut state = event_state_with_catalog();
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        state.draft.date = Some(date);
        state.draft.start_time = Some(date.and_hms_opt(10, 0, 0).unwrap());
        state.draft.end_time = Some(date.and_hms_opt(15, 0, 0).unwrap());
        state.step = WizardStep::TimeChosen;

        let _ = reduce(&mut state, BookingAction::CompleteAmenities, &env);
        assert_eq!(state.step, WizardStep::TimeChosen);
        assert_eq!(
            state.form_errors.event_type.as_deref(),
            Some("Please select an event type")
        );
        assert_eq!(
            state.form_errors.guest_count.as_deref(),
            Some("Please enter number of guests")
        );

        // "Others" with an empty label is still incomplete.
        let _ = reduce(
            &mut state,
            BookingAction::SetEventType {
                event_type: EventType::Other(String::new()),
            },
            &env,
        );
        let _ = reduce(&mut state, BookingAction::SetGuestCount { count: 0 }, &env);
        let _ = reduce(&mut state, BookingAction::CompleteAmenities, &env);
        assert_eq!(
            state.form_errors.event_type.as_deref(),
            Some("Please enter your event type")
        );
        assert_eq!(
            state.form_errors.guest_count.as_deref(),
            Some("Guest count must be greater than 0")
        );

        let _ = reduce(
            &mut state,
            BookingAction::SetEventType {
                event_type: EventType::Wedding,
            },
            &env,
        );
        let _ = reduce(&mut state, BookingAction::SetGuestCount { count: 50 }, &env);
        let _ = reduce(&mut state, BookingAction::CompleteAmenities, &env);
        assert_eq!(state.step, WizardStep::AmenitiesConfigured);
        assert!(state.form_errors.is_clear());
    }

    #[test]
    fn submit_without_details_fails_locally() {
        let env = env();
        let mut state = BookingState {
            user_id: Some(7),
            ..BookingState::default()
        };

        let effects = reduce(&mut state, BookingAction::Submit, &env);

        assert_no_effects(&effects);
        let SubmissionState::Failed { message } = &state.submission else {
            panic!("expected a failed submission");
        };
        assert_eq!(message, "Missing reservation details");
    }

    #[test]
    fn submit_requires_a_session() {
        let env = env();
        let mut state = BookingState::default();

        let effects = reduce(&mut state, BookingAction::Submit, &env);

        assert_no_effects(&effects);
        let SubmissionState::Failed { message } = &state.submission else {
            panic!("expected a failed submission");
        };
        assert_eq!(message, "You must be logged in to make a reservation");
    }

    proptest! {
        #[test]
        fn any_quantity_input_lands_within_bounds(quantity in 0u32..10_000) {
            let env = env();
            let mut state = event_state_with_catalog();

            let _ = reduce(
                &mut state,
                BookingAction::SetAmenityQuantity { id: AmenityId(1), quantity },
                &env,
            );

            let stored = state.draft.amenities[&AmenityId(1)].quantity;
            prop_assert!(stored <= 200);
            prop_assert_eq!(stored, quantity.min(200));
        }
    }
}
