// Offer selection policies over a rates response. All three are pure
// functions of their input; traversal is document order, so repeated calls
// on the same payload pick the same offer.

use thiserror::Error;

use crate::model::{RatesResponse, SelectedOffer};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NoOfferFoundError {
    #[error("No offer found")]
    NoAvailability,

    #[error("No offer with refundableTag={0}")]
    RefundableTag(String),

    #[error("No offer with payment type {0}")]
    PaymentType(String),
}

// First hotel with at least one room type; its first room type.
pub fn pick_first_offer(rates: &RatesResponse) -> Result<SelectedOffer, NoOfferFoundError> {
    let hotel = rates
        .data
        .iter()
        .find(|h| !h.room_types.is_empty())
        .ok_or(NoOfferFoundError::NoAvailability)?;
    let room_type = &hotel.room_types[0];
    if hotel.hotel_id.is_empty() || room_type.offer_id.is_empty() {
        return Err(NoOfferFoundError::NoAvailability);
    }
    Ok(SelectedOffer {
        hotel_id: hotel.hotel_id.clone(),
        offer_id: room_type.offer_id.clone(),
    })
}

// Depth-first over hotels -> room types -> rates; first room type carrying a
// rate whose cancellation policy matches the tag.
pub fn pick_by_refundable_tag(
    rates: &RatesResponse,
    tag: &str,
) -> Result<SelectedOffer, NoOfferFoundError> {
    for hotel in &rates.data {
        for room_type in &hotel.room_types {
            for rate in &room_type.rates {
                if rate.cancellation_policies.refundable_tag.as_deref() == Some(tag) {
                    return Ok(SelectedOffer {
                        hotel_id: hotel.hotel_id.clone(),
                        offer_id: room_type.offer_id.clone(),
                    });
                }
            }
        }
    }
    Err(NoOfferFoundError::RefundableTag(tag.to_string()))
}

// First room type whose accepted payment types contain the requested one.
pub fn pick_by_payment_type(
    rates: &RatesResponse,
    payment_type: &str,
) -> Result<SelectedOffer, NoOfferFoundError> {
    for hotel in &rates.data {
        for room_type in &hotel.room_types {
            if room_type.payment_types.iter().any(|p| p == payment_type) {
                return Ok(SelectedOffer {
                    hotel_id: hotel.hotel_id.clone(),
                    offer_id: room_type.offer_id.clone(),
                });
            }
        }
    }
    Err(NoOfferFoundError::PaymentType(payment_type.to_string()))
}
