// Booking lifecycle orchestration: search -> rates -> prebook -> book, plus
// status queries and cancellation. Every remote response is contract-validated
// before the orchestrator acts on it, and a booking id enters the cleanup
// registry exactly when the remote side reports CONFIRMED.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

use crate::client::{ApiClient, TransportError};
use crate::contract::{ContractValidator, ContractViolationError};
use crate::factory::RequestFactory;
use crate::model::{
    BookingSession, BookingStatus, BookingStatusView, BookResponse, HotelsResponse,
    PrebookResponse, RatesResponse, StatusResponse,
};
use crate::openapi::Method;
use crate::registry::{CleanupOutcome, CleanupRegistry};
use crate::selectors::{pick_first_offer, NoOfferFoundError};

pub const DEFAULT_CREATE_TIMEOUT: Duration = Duration::from_millis(15_000);
pub const DEFAULT_STATUS_TIMEOUT: Duration = Duration::from_millis(1_500);
pub const DEFAULT_CANCEL_TIMEOUT: Duration = Duration::from_secs(7);

// The prebook hold is allowed more server-side time than the other steps
const PREBOOK_QUERY_TIMEOUT: &str = "30";

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("Invalid booking options: {0}")]
    InvalidOptions(String),

    #[error("Hotel search failed: {0}")]
    Search(String),

    #[error("Rates request failed: {0}")]
    Rates(String),

    #[error(transparent)]
    NoOffer(#[from] NoOfferFoundError),

    #[error("Prebook failed: {0}")]
    Prebook(String),

    #[error("Booking failed: {0}")]
    Booking(String),

    #[error("Status query failed: {0}")]
    StatusQuery(String),

    #[error("Cancellation failed: {0}")]
    Cancellation(String),

    #[error("Booking {booking_id} not cancelled. Status: {status}")]
    CancellationNotConfirmed {
        booking_id: String,
        status: BookingStatus,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Contract(#[from] ContractViolationError),
}

#[derive(Debug, Clone)]
pub struct BookingOptions {
    pub country_code: String,
    pub city_name: String,
    pub hotel_count: usize,
    pub timeout: Duration,
}

impl Default for BookingOptions {
    fn default() -> Self {
        Self {
            country_code: "IT".to_string(),
            city_name: "Rome".to_string(),
            hotel_count: 1,
            timeout: DEFAULT_CREATE_TIMEOUT,
        }
    }
}

// Result of a cancellation attempt. `via_workaround` marks cancellations that
// the endpoint reported as failed but a status query proved successful; the
// backing API is known to return 500 on cancels that actually complete, so
// the transport status code alone is not ground truth here.
#[derive(Debug, Clone)]
pub struct CancelOutcome {
    pub success: bool,
    pub status: BookingStatus,
    pub via_workaround: bool,
}

pub struct BookingOrchestrator<C: ApiClient> {
    client: C,
    validator: ContractValidator,
    factory: RequestFactory,
    registry: Arc<CleanupRegistry>,
}

impl<C: ApiClient> BookingOrchestrator<C> {
    pub fn new(
        client: C,
        validator: ContractValidator,
        factory: RequestFactory,
        registry: Arc<CleanupRegistry>,
    ) -> Self {
        Self {
            client,
            validator,
            factory,
            registry,
        }
    }

    pub fn registry(&self) -> &Arc<CleanupRegistry> {
        &self.registry
    }

    // Drive one full booking to confirmation and return its id. If this
    // returns Ok, the booking exists remotely in CONFIRMED state and is
    // tracked for cleanup.
    pub async fn create(&self, options: BookingOptions) -> Result<String, BookingError> {
        let session = self.create_session(options).await?;
        session
            .booking_id
            .ok_or_else(|| BookingError::Booking("no booking id returned".to_string()))
    }

    // Same lifecycle, returning the full per-step session state.
    pub async fn create_session(
        &self,
        options: BookingOptions,
    ) -> Result<BookingSession, BookingError> {
        if options.hotel_count < 1 {
            return Err(BookingError::InvalidOptions(
                "hotelCount must be at least 1".to_string(),
            ));
        }
        let timeout = options.timeout;

        // 1) search hotels
        let body = self
            .client
            .get(
                "/data/hotels",
                &[
                    ("countryCode", options.country_code.clone()),
                    ("cityName", options.city_name.clone()),
                ],
                200,
                timeout,
            )
            .await?;
        self.validator
            .validate("/data/hotels", Method::Get, 200, &body)?;
        let hotels: HotelsResponse = serde_json::from_value(body)
            .map_err(|e| BookingError::Search(format!("hotel list is not a sequence: {e}")))?;

        let hotel_ids: Vec<String> = hotels
            .data
            .into_iter()
            .take(options.hotel_count)
            .map(|h| h.id)
            .collect();
        if hotel_ids.is_empty() {
            return Err(BookingError::Search(format!(
                "no hotels found for {}/{}",
                options.country_code, options.city_name
            )));
        }
        info!(count = hotel_ids.len(), city = %options.city_name, "hotels selected");
        let mut session = BookingSession::new(hotel_ids);

        // 2) rates for the selected hotels
        let rates_body = self
            .factory
            .rates_body(&session.hotel_ids, json!({}));
        let body = self
            .client
            .post("/hotels/rates", &[], &rates_body, 200, timeout)
            .await?;
        self.validator
            .validate("/hotels/rates", Method::Post, 200, &body)?;
        let rates: RatesResponse = serde_json::from_value(body)
            .map_err(|e| BookingError::Rates(format!("malformed rates response: {e}")))?;

        // 3) pick one bookable offer
        let offer = pick_first_offer(&rates)?;
        info!(hotel_id = %offer.hotel_id, offer_id = %offer.offer_id, "offer selected");
        session.selected_offer = Some(offer.clone());

        // 4) prebook the offer
        let prebook_body = self
            .factory
            .prebook_body(&offer.offer_id, json!({}));
        let body = self
            .client
            .post(
                "/rates/prebook",
                &[("timeout", PREBOOK_QUERY_TIMEOUT.to_string())],
                &prebook_body,
                200,
                timeout,
            )
            .await?;
        self.validator
            .validate("/rates/prebook", Method::Post, 200, &body)?;
        let prebook: PrebookResponse = serde_json::from_value(body)
            .map_err(|e| BookingError::Prebook(format!("malformed prebook response: {e}")))?;
        let prebook_id = prebook
            .data
            .prebook_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| BookingError::Prebook("no prebook id returned".to_string()))?;
        session.prebook_id = Some(prebook_id.clone());

        // 5) book against the prebook hold
        let book_body = self
            .factory
            .book_body(&prebook_id, json!({}));
        let body = self
            .client
            .post("/rates/book", &[], &book_body, 200, timeout)
            .await?;
        self.validator
            .validate("/rates/book", Method::Post, 200, &body)?;
        let booked: BookResponse = serde_json::from_value(body)
            .map_err(|e| BookingError::Booking(format!("malformed booking response: {e}")))?;

        if booked.data.status != BookingStatus::Confirmed {
            return Err(BookingError::Booking(format!(
                "expected CONFIRMED, got {}",
                booked.data.status
            )));
        }
        if booked.data.currency.as_deref() != Some("USD") {
            return Err(BookingError::Booking(format!(
                "expected currency USD, got {:?}",
                booked.data.currency
            )));
        }
        let booking_id = booked
            .data
            .booking_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| BookingError::Booking("no booking id returned".to_string()))?;

        // The remote side effect now exists; track it before returning
        self.registry.track(&booking_id);
        info!(booking_id = %booking_id, "booking confirmed");
        session.booking_id = Some(booking_id);
        session.status = BookingStatus::Confirmed;
        Ok(session)
    }

    // Pure query of a booking's remote state.
    pub async fn get_status(
        &self,
        booking_id: &str,
        timeout: Duration,
    ) -> Result<BookingStatusView, BookingError> {
        let path = format!("/bookings/{booking_id}");
        let body = self
            .client
            .get(&path, &[("timeout", query_seconds(timeout))], 200, timeout)
            .await?;
        self.validator
            .validate("/bookings/{bookingId}", Method::Get, 200, &body)?;
        let status: StatusResponse = serde_json::from_value(body)
            .map_err(|e| BookingError::StatusQuery(format!("malformed status response: {e}")))?;
        Ok(status.data)
    }

    // Cancel a booking. A failed direct call is reconciled through a status
    // query: the cancel endpoint is known to report 500 on cancellations
    // that nonetheless went through.
    pub async fn cancel(
        &self,
        booking_id: &str,
        timeout: Duration,
    ) -> Result<CancelOutcome, BookingError> {
        let path = format!("/bookings/{booking_id}");
        let direct = self
            .client
            .put(&path, &[("timeout", query_seconds(timeout))], 200, timeout)
            .await;

        match direct {
            Ok(body) => {
                self.validator
                    .validate("/bookings/{bookingId}", Method::Put, 200, &body)?;
                let cancelled: StatusResponse = serde_json::from_value(body).map_err(|e| {
                    BookingError::Cancellation(format!("malformed cancel response: {e}"))
                })?;
                Ok(CancelOutcome {
                    success: true,
                    status: cancelled.data.status,
                    via_workaround: false,
                })
            }
            Err(e) => {
                warn!(booking_id, error = %e, "cancel endpoint failed, reconciling via status query");
                let status = self.get_status(booking_id, DEFAULT_STATUS_TIMEOUT).await?;
                if status.status.is_cancelled() {
                    info!(booking_id, status = %status.status, "booking cancelled despite endpoint failure");
                    Ok(CancelOutcome {
                        success: true,
                        status: status.status,
                        via_workaround: true,
                    })
                } else {
                    Err(BookingError::CancellationNotConfirmed {
                        booking_id: booking_id.to_string(),
                        status: status.status,
                    })
                }
            }
        }
    }

    // Teardown pass: release every tracked booking through cancel(), most
    // recent first. Failures are collected, never raised.
    pub async fn cleanup_all(&self) -> Vec<CleanupOutcome> {
        self.registry
            .drain_all(|id| async move {
                self.cancel(&id, DEFAULT_CANCEL_TIMEOUT).await?;
                Ok(())
            })
            .await
    }
}

// Server-side timeout budget in seconds, as the API's query parameter expects
fn query_seconds(timeout: Duration) -> String {
    format!("{}", timeout.as_secs_f64())
}
