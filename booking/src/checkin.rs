//! Check-in code encoding.
//!
//! A confirmed reservation is proven at the gate by scanning a QR code.
//! The encoded blob is a wire contract with the server's verifier: it
//! must contain exactly the fields the signature was computed over
//! (`user_id, facility_id, date, start_time, end_time,
//! reservation_token`, in that order) plus the sibling
//! `digital_signature`. The date and
//! time strings are echoed exactly as the server returned them; any
//! reformatting breaks verification. This replaces the earlier two-field
//! (`reservation_token` + signature) payload, which the current verifier
//! rejects because it cannot bind the token to the claimed booking.
//!
//! No signature computation or validation happens here; this is a pure
//! encode step. Rendering the bytes as an actual QR symbol is the UI
//! layer's job.

use casaverde_api::types::ReservationRecord;
use serde::Serialize;

/// The signed-payload-plus-signature object. Field order is part of the
/// contract.
#[derive(Debug, Serialize)]
struct CheckInPayload<'a> {
    user_id: u64,
    facility_id: u32,
    date: &'a str,
    start_time: &'a str,
    end_time: &'a str,
    reservation_token: &'a str,
    digital_signature: &'a str,
}

/// An encoded check-in code, ready for the QR layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckInCode {
    encoded: String,
}

impl CheckInCode {
    /// Encode a confirmed reservation's check-in payload.
    ///
    /// # Errors
    ///
    /// Returns a serialization error only if JSON encoding itself fails,
    /// which for this payload shape it does not in practice.
    pub fn from_record(record: &ReservationRecord) -> serde_json::Result<Self> {
        let payload = CheckInPayload {
            user_id: record.user_id,
            facility_id: record.facility_id,
            date: &record.date,
            start_time: &record.start_time,
            end_time: &record.end_time,
            reservation_token: &record.reservation_token,
            digital_signature: &record.digital_signature,
        };

        Ok(Self {
            encoded: serde_json::to_string(&payload)?,
        })
    }

    /// The JSON text to hand to the QR renderer.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.encoded
    }

    /// The payload bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.encoded.as_bytes()
    }
}
