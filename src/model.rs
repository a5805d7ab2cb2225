// Typed views over the booking API's JSON payloads.
// Every remote response is decoded into one of these at the boundary so the
// selection and orchestration code never walks untyped JSON.

use serde::{Deserialize, Serialize};

// Remote lifecycle states of a booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    CancelledWithCharges,
    #[serde(other)]
    Unknown,
}

impl Default for BookingStatus {
    fn default() -> Self {
        BookingStatus::Unknown
    }
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::CancelledWithCharges => "CANCELLED_WITH_CHARGES",
            BookingStatus::Unknown => "UNKNOWN",
        }
    }

    // Both terminal cancellation states count as cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            BookingStatus::Cancelled | BookingStatus::CancelledWithCharges
        )
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Response of GET /data/hotels
#[derive(Debug, Deserialize)]
pub struct HotelsResponse {
    pub data: Vec<HotelSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelSummary {
    pub id: String,
}

// Response of POST /hotels/rates: hotels, each with room types, each with rates
#[derive(Debug, Deserialize)]
pub struct RatesResponse {
    #[serde(default)]
    pub data: Vec<HotelRates>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelRates {
    pub hotel_id: String,
    #[serde(default)]
    pub room_types: Vec<RoomTypeOffer>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoomTypeOffer {
    pub offer_id: String,
    pub rates: Vec<RateEntry>,
    pub payment_types: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RateEntry {
    pub cancellation_policies: CancellationPolicies,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CancellationPolicies {
    pub refundable_tag: Option<String>,
}

// Response of POST /rates/prebook
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PrebookResponse {
    pub data: PrebookData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrebookData {
    pub prebook_id: Option<String>,
}

// Response of POST /rates/book
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BookResponse {
    pub data: BookData,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookData {
    pub booking_id: Option<String>,
    pub status: BookingStatus,
    pub currency: Option<String>,
}

// Response of GET /bookings/{id} and PUT /bookings/{id}
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatusResponse {
    pub data: BookingStatusView,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookingStatusView {
    pub booking_id: String,
    pub status: BookingStatus,
}

// One bookable room-rate combination picked out of a rates response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedOffer {
    pub hotel_id: String,
    pub offer_id: String,
}

// Per-test-case progress through the booking lifecycle. Created at the start
// of a booking attempt, mutated as each remote step succeeds, dropped with
// the test case.
#[derive(Debug, Clone)]
pub struct BookingSession {
    pub hotel_ids: Vec<String>,
    pub selected_offer: Option<SelectedOffer>,
    pub prebook_id: Option<String>,
    pub booking_id: Option<String>,
    pub status: BookingStatus,
}

impl BookingSession {
    pub fn new(hotel_ids: Vec<String>) -> Self {
        Self {
            hotel_ids,
            selected_offer: None,
            prebook_id: None,
            booking_id: None,
            status: BookingStatus::Pending,
        }
    }
}

// A remote resource that must eventually be released
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedResource {
    pub kind: ResourceKind,
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Booking,
}

impl TrackedResource {
    pub fn booking(id: impl Into<String>) -> Self {
        Self {
            kind: ResourceKind::Booking,
            id: id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_decodes_wire_values() {
        let s: BookingStatus = serde_json::from_str("\"CONFIRMED\"").unwrap();
        assert_eq!(s, BookingStatus::Confirmed);
        let s: BookingStatus = serde_json::from_str("\"CANCELLED_WITH_CHARGES\"").unwrap();
        assert_eq!(s, BookingStatus::CancelledWithCharges);
        assert!(s.is_cancelled());
    }

    #[test]
    fn unexpected_status_maps_to_unknown() {
        let s: BookingStatus = serde_json::from_str("\"ON_HOLD\"").unwrap();
        assert_eq!(s, BookingStatus::Unknown);
        assert!(!s.is_cancelled());
    }

    #[test]
    fn rates_response_tolerates_sparse_room_types() {
        let body = serde_json::json!({
            "data": [
                { "hotelId": "lp1" },
                { "hotelId": "lp2", "roomTypes": [ { "offerId": "of-1" } ] }
            ]
        });
        let rates: RatesResponse = serde_json::from_value(body).unwrap();
        assert!(rates.data[0].room_types.is_empty());
        assert_eq!(rates.data[1].room_types[0].offer_id, "of-1");
        assert!(rates.data[1].room_types[0].rates.is_empty());
    }

    #[test]
    fn book_response_defaults_missing_fields() {
        let body = serde_json::json!({ "data": {} });
        let booked: BookResponse = serde_json::from_value(body).unwrap();
        assert_eq!(booked.data.booking_id, None);
        assert_eq!(booked.data.status, BookingStatus::Unknown);
    }
}
