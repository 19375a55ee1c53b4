//! Mock booking gateway for tests.

#![allow(clippy::expect_used)] // test support code

use crate::gateway::BookingGateway;
use casaverde_api::types::{AmenityOption, NewReservation, ReservationRecord, SlotRecord};
use casaverde_api::{ApiError, Result};
use chrono::NaiveDate;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn unstubbed() -> ApiError {
    ApiError::Network("mock gateway: endpoint not stubbed".to_string())
}

#[derive(Default)]
struct Inner {
    availability: Mutex<Option<Result<Vec<SlotRecord>>>>,
    amenities: Mutex<Option<Result<Vec<AmenityOption>>>>,
    reservations: Mutex<Option<Result<Vec<ReservationRecord>>>>,
    store: Mutex<Option<Result<ReservationRecord>>>,
    store_delay: Mutex<Option<Duration>>,
    last_store_request: Mutex<Option<NewReservation>>,

    availability_calls: AtomicUsize,
    amenities_calls: AtomicUsize,
    reservations_calls: AtomicUsize,
    store_calls: AtomicUsize,
}

/// Programmable [`BookingGateway`] double.
///
/// Clones share stubs and counters, so the copy inside an effect reports
/// back to the test.
#[derive(Clone, Default)]
pub struct MockBookingGateway {
    inner: Arc<Inner>,
}

impl MockBookingGateway {
    /// Create a gateway with nothing stubbed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stub the availability response.
    #[must_use]
    pub fn with_availability(self, records: Vec<SlotRecord>) -> Self {
        *self.inner.availability.lock().expect("mock lock") = Some(Ok(records));
        self
    }

    /// Stub the amenity catalog.
    #[must_use]
    pub fn with_amenities(self, options: Vec<AmenityOption>) -> Self {
        *self.inner.amenities.lock().expect("mock lock") = Some(Ok(options));
        self
    }

    /// Stub the reservation list.
    #[must_use]
    pub fn with_reservations(self, records: Vec<ReservationRecord>) -> Self {
        *self.inner.reservations.lock().expect("mock lock") = Some(Ok(records));
        self
    }

    /// Stub the store endpoint with a confirmed record.
    #[must_use]
    pub fn with_store_result(self, record: ReservationRecord) -> Self {
        *self.inner.store.lock().expect("mock lock") = Some(Ok(record));
        self
    }

    /// Stub the store endpoint with a failure.
    #[must_use]
    pub fn with_store_error(self, error: ApiError) -> Self {
        *self.inner.store.lock().expect("mock lock") = Some(Err(error));
        self
    }

    /// Hold the store response for a while, keeping the submission
    /// observably in flight.
    #[must_use]
    pub fn with_store_delay(self, delay: Duration) -> Self {
        *self.inner.store_delay.lock().expect("mock lock") = Some(delay);
        self
    }

    /// How many availability fetches happened.
    #[must_use]
    pub fn availability_calls(&self) -> usize {
        self.inner.availability_calls.load(Ordering::SeqCst)
    }

    /// How many catalog fetches happened.
    #[must_use]
    pub fn amenities_calls(&self) -> usize {
        self.inner.amenities_calls.load(Ordering::SeqCst)
    }

    /// How many reservation-list fetches happened.
    #[must_use]
    pub fn reservations_calls(&self) -> usize {
        self.inner.reservations_calls.load(Ordering::SeqCst)
    }

    /// How many store calls happened. The double-submit guard promises
    /// this is 1 per confirm cycle.
    #[must_use]
    pub fn store_calls(&self) -> usize {
        self.inner.store_calls.load(Ordering::SeqCst)
    }

    /// The request body of the most recent store call.
    #[must_use]
    pub fn last_store_request(&self) -> Option<NewReservation> {
        self.inner.last_store_request.lock().expect("mock lock").clone()
    }

    fn take<T: Clone>(slot: &Mutex<Option<Result<T>>>) -> Result<T> {
        slot.lock()
            .expect("mock lock")
            .clone()
            .unwrap_or_else(|| Err(unstubbed()))
    }
}

impl BookingGateway for MockBookingGateway {
    async fn availability(&self, _facility_id: u32, _date: NaiveDate) -> Result<Vec<SlotRecord>> {
        self.inner.availability_calls.fetch_add(1, Ordering::SeqCst);
        Self::take(&self.inner.availability)
    }

    async fn amenities(&self) -> Result<Vec<AmenityOption>> {
        self.inner.amenities_calls.fetch_add(1, Ordering::SeqCst);
        Self::take(&self.inner.amenities)
    }

    async fn reservations(&self) -> Result<Vec<ReservationRecord>> {
        self.inner.reservations_calls.fetch_add(1, Ordering::SeqCst);
        Self::take(&self.inner.reservations)
    }

    async fn store_reservation(&self, request: &NewReservation) -> Result<ReservationRecord> {
        self.inner.store_calls.fetch_add(1, Ordering::SeqCst);
        *self.inner.last_store_request.lock().expect("mock lock") = Some(request.clone());
        let delay = *self.inner.store_delay.lock().expect("mock lock");
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Self::take(&self.inner.store)
    }
}
