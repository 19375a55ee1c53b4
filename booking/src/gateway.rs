//! Booking gateway trait.
//!
//! The wizard reducer reaches the server only through this interface;
//! the production implementation is [`casaverde_api::ApiClient`].

use casaverde_api::Result;
use casaverde_api::types::{AmenityOption, NewReservation, ReservationRecord, SlotRecord};
use chrono::NaiveDate;
use std::future::Future;

/// Server operations the wizard needs.
pub trait BookingGateway: Send + Sync {
    /// `GET /availability/{facility}/{date}`.
    fn availability(
        &self,
        facility_id: u32,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<SlotRecord>>> + Send;

    /// `GET /amenities`.
    fn amenities(&self) -> impl Future<Output = Result<Vec<AmenityOption>>> + Send;

    /// `GET /reservations`.
    fn reservations(&self) -> impl Future<Output = Result<Vec<ReservationRecord>>> + Send;

    /// `POST /reservations/store`.
    fn store_reservation(
        &self,
        request: &NewReservation,
    ) -> impl Future<Output = Result<ReservationRecord>> + Send;
}

impl<T> BookingGateway for casaverde_api::ApiClient<T>
where
    T: casaverde_api::TokenStore + Clone + Send + Sync,
{
    async fn availability(&self, facility_id: u32, date: NaiveDate) -> Result<Vec<SlotRecord>> {
        Self::availability(self, facility_id, date).await
    }

    async fn amenities(&self) -> Result<Vec<AmenityOption>> {
        Self::amenities(self).await
    }

    async fn reservations(&self) -> Result<Vec<ReservationRecord>> {
        Self::reservations(self).await
    }

    async fn store_reservation(&self, request: &NewReservation) -> Result<ReservationRecord> {
        Self::store_reservation(self, request).await
    }
}
