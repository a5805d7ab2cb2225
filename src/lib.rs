// Main library file for the hotel booking lifecycle test suite

// Export modules for each collaborator of the booking orchestration core
pub mod booking;
pub mod client;
pub mod contract;
pub mod env;
pub mod factory;
pub mod model;
pub mod openapi;
pub mod registry;
pub mod selectors;

// Re-export key types for convenience
pub use booking::{
    BookingError, BookingOptions, BookingOrchestrator, CancelOutcome, DEFAULT_CANCEL_TIMEOUT,
    DEFAULT_CREATE_TIMEOUT, DEFAULT_STATUS_TIMEOUT,
};
pub use client::{ApiClient, ClientError, HttpApiClient, TransportError};
pub use contract::{ContractValidator, ContractViolationError};
pub use env::{Env, EnvError};
pub use factory::RequestFactory;
pub use model::{
    BookingSession, BookingStatus, BookingStatusView, SelectedOffer, TrackedResource,
};
pub use openapi::{Method, SchemaSource, SchemaSourceError};
pub use registry::{CleanupOutcome, CleanupRegistry};
pub use selectors::{
    pick_by_payment_type, pick_by_refundable_tag, pick_first_offer, NoOfferFoundError,
};
