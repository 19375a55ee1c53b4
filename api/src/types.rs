//! Wire types for the association API.
//!
//! These mirror the server's JSON shapes. Amounts deserialize through
//! [`Centavos`] so Laravel decimal strings and plain numbers both work;
//! the date/time strings on [`ReservationRecord`] stay opaque because the
//! check-in payload must echo them byte-for-byte.

use casaverde_core::money::Centavos;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Account status code the association assigns to verified residents.
///
/// Verified residents are charged the discounted facility fee.
pub const VERIFIED_STATUS: i64 = 1;

/// A resident account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned user id.
    pub id: u64,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Home address within the subdivision.
    pub address: String,
    /// Login email.
    pub email: String,
    /// Account status code; see [`VERIFIED_STATUS`].
    pub status: i64,
}

impl User {
    /// Whether this account is verified, and therefore discount-eligible.
    #[must_use]
    pub const fn is_verified(&self) -> bool {
        self.status == VERIFIED_STATUS
    }

    /// Full display name.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// `POST /login` / `POST /register` response: the identity plus a fresh
/// bearer token.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthPayload {
    /// The authenticated identity.
    pub user: User,
    /// Bearer token for subsequent requests.
    pub token: String,
}

/// `GET /me` response wrapper.
#[derive(Debug, Clone, Deserialize)]
pub struct MePayload {
    /// The identity behind the presented token.
    pub user: User,
}

/// `POST /register` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Home address within the subdivision.
    pub address: String,
    /// Login email.
    pub email: String,
    /// Chosen password.
    pub password: String,
    /// Must match `password`; the server enforces it.
    pub password_confirmation: String,
}

/// One bookable window from `GET /availability/{facility}/{date}`.
///
/// Times are 12-hour wall-clock labels (`"1:00 PM"`); the booking layer
/// combines them with the queried date.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SlotRecord {
    /// Start-of-window label, e.g. `"1:00 PM"`.
    pub start_time: String,
    /// End-of-window label.
    pub end_time: String,
    /// Whether the window can still be booked.
    pub available: bool,
    /// Base facility fee for this window.
    pub fee: Centavos,
    /// Fee charged to verified residents.
    pub discounted_fee: Centavos,
}

/// One priced add-on from `GET /amenities`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AmenityOption {
    /// Catalog id; quantities are submitted against it.
    pub id: u32,
    /// Display name, e.g. `"Chairs"`.
    pub name: String,
    /// Price per unit.
    pub price: Centavos,
    /// Upper bound for the quantity; `1` means the amenity is a toggle.
    pub max_quantity: u32,
}

/// Reservation lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// Awaiting association approval.
    Pending,
    /// Approved; check-in token is live.
    Confirmed,
    /// Resident has checked in at the facility.
    CheckedIn,
    /// Canceled by the resident or the association.
    Canceled,
}

/// A confirmed reservation as returned by `GET /reservations` and
/// `POST /reservations/store`.
///
/// Date and time fields are kept as the server formatted them: the
/// digital signature covers those exact strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationRecord {
    /// Server-assigned reservation id.
    pub id: u64,
    /// Owning user.
    pub user_id: u64,
    /// Reserved facility.
    pub facility_id: u32,
    /// Booking date as formatted by the server.
    pub date: String,
    /// Start time as formatted by the server.
    pub start_time: String,
    /// End time as formatted by the server.
    pub end_time: String,
    /// Lifecycle status.
    pub status: ReservationStatus,
    /// Opaque check-in token.
    pub reservation_token: String,
    /// Server-produced signature over the booking attributes.
    pub digital_signature: String,
}

/// `POST /reservations/store` request body.
///
/// Prices and totals are deliberately absent: the server prices the
/// booking from the submitted ids and quantities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewReservation {
    /// Facility to book.
    pub facility_id: u32,
    /// Booking date, serialized `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Start of the chosen slot, serialized `HH:MM` local clock time.
    #[serde(with = "hm_time")]
    pub start_time: NaiveTime,
    /// End of the chosen slot, serialized `HH:MM`.
    #[serde(with = "hm_time")]
    pub end_time: NaiveTime,
    /// Expected headcount; event venue only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_count: Option<u32>,
    /// Kind of event; event venue only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    /// Selected add-ons (quantity > 0 entries only).
    pub amenities: Vec<AmenityLine>,
}

/// One amenity line in a reservation submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AmenityLine {
    /// Catalog id of the amenity.
    pub amenity_id: u32,
    /// Requested quantity.
    pub quantity: u32,
}

/// Outcome of a password-recovery step.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecoveryResponse {
    /// `"success"` or `"error"`.
    pub status: RecoveryStatus,
    /// Human-readable outcome.
    pub message: String,
}

/// Status discriminator for [`RecoveryResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryStatus {
    /// The step succeeded; proceed to the next one.
    Success,
    /// The step failed; `message` says why.
    Error,
}

/// `POST /password/reset-password` request body.
#[derive(Debug, Clone, Serialize)]
pub struct ResetPasswordRequest {
    /// Reset token from the verified OTP step.
    pub token: String,
    /// Account email.
    pub email: String,
    /// New password.
    pub password: String,
    /// Must match `password`.
    pub password_confirmation: String,
}

/// Serialize/deserialize `NaiveTime` as `HH:MM`, the clock-time format
/// the server expects for reservation bounds.
mod hm_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map_err(Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn verified_status_gates_discount() {
        let mut user = sample_user();
        assert!(user.is_verified());

        user.status = 0;
        assert!(!user.is_verified());
    }

    #[test]
    fn slot_record_accepts_string_and_numeric_fees() {
        let body = r#"{
            "start_time": "1:00 PM",
            "end_time": "2:00 PM",
            "available": true,
            "fee": 200,
            "discounted_fee": "150.00"
        }"#;

        let slot: SlotRecord = serde_json::from_str(body).unwrap();
        assert_eq!(slot.fee, Centavos::from_pesos(200));
        assert_eq!(slot.discounted_fee, Centavos::from_pesos(150));
    }

    #[test]
    fn new_reservation_serializes_wire_formats() {
        let request = NewReservation {
            facility_id: 1,
            date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            start_time: NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
            guest_count: None,
            event_type: None,
            amenities: vec![],
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["date"], "2025-06-02");
        assert_eq!(json["start_time"], "13:00");
        assert_eq!(json["end_time"], "14:00");
        assert!(json.get("guest_count").is_none());
        assert!(json.get("event_type").is_none());
    }

    #[test]
    fn reservation_status_uses_snake_case() {
        let status: ReservationStatus = serde_json::from_str("\"checked_in\"").unwrap();
        assert_eq!(status, ReservationStatus::CheckedIn);
    }

    fn sample_user() -> User {
        User {
            id: 7,
            first_name: "Maria".to_string(),
            last_name: "Santos".to_string(),
            address: "Blk 4 Lot 9".to_string(),
            email: "maria@example.com".to_string(),
            status: VERIFIED_STATUS,
        }
    }
}
