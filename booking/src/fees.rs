//! Fee estimation.
//!
//! Pure functions over the draft. The totals are advisory, the server
//! reprices every submission from ids and quantities, so nothing here is
//! ever sent over the wire.

use crate::state::ReservationDraft;
use casaverde_core::money::Centavos;

/// Total of the selected amenities (`Σ quantity × unit_price`).
///
/// Zero unless the draft books the event venue, regardless of any
/// leftover amenity state from an abandoned event booking.
#[must_use]
pub fn amenities_total(draft: &ReservationDraft) -> Centavos {
    if !draft.is_event_booking() {
        return Centavos::ZERO;
    }

    draft
        .amenities
        .values()
        .filter(|selection| selection.quantity > 0)
        .map(|selection| selection.unit_price.times(selection.quantity))
        .sum()
}

/// The advisory grand total: charged slot fee plus amenities.
#[must_use]
pub fn estimated_total(draft: &ReservationDraft) -> Centavos {
    draft.charged_fee.unwrap_or(Centavos::ZERO) + amenities_total(draft)
}
