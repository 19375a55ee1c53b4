//! Booking environment.

use crate::gateway::BookingGateway;
use casaverde_core::environment::Clock;

/// Dependencies for the booking reducer.
///
/// # Type Parameters
///
/// - `G`: booking gateway (the HTTP client in production)
/// - `C`: clock, for the no-retroactive-bookings rule
#[derive(Clone)]
pub struct BookingEnvironment<G, C>
where
    G: BookingGateway + Clone,
    C: Clock + Clone,
{
    /// Server operations.
    pub gateway: G,

    /// Time source.
    pub clock: C,
}

impl<G, C> BookingEnvironment<G, C>
where
    G: BookingGateway + Clone,
    C: Clock + Clone,
{
    /// Create a new booking environment.
    pub const fn new(gateway: G, clock: C) -> Self {
        Self { gateway, clock }
    }
}
