//! Core domain types and feature encoding for fare-predict.
//!
//! This crate owns the positional contract between an itinerary and the
//! trained model:
//!
//! - [`ItineraryRequest`] — The itinerary as received from a caller
//! - [`TimeOfDay`], [`Weekday`], [`Stops`], [`CabinClass`] — Ordinal codings
//! - [`AIRLINES`] and [`CITIES`] — One-hot vocabularies
//! - [`encode`] — Maps a request to a [`FeatureVector`] of [`FEATURE_COUNT`] values
//! - [`FareError`] — Error type for encoding failures
//!
//! # Example
//!
//! ```rust
//! use fare_core::{encode, ItineraryRequest, Numeric, FEATURE_COUNT};
//!
//! let request = ItineraryRequest {
//!     airline: "Vistara".into(),
//!     source_city: "Delhi".into(),
//!     destination_city: "Mumbai".into(),
//!     departure_time: "Morning".into(),
//!     arrival_time: "Evening".into(),
//!     stops: "zero".into(),
//!     class: "Business".into(),
//!     day: "Monday".into(),
//!     duration: Numeric::Number(2.25),
//!     days_left: Numeric::Number(14.0),
//! };
//!
//! let features = encode(&request).unwrap();
//! assert_eq!(features.as_slice().len(), FEATURE_COUNT);
//! ```

mod encoder;
mod itinerary;

pub use encoder::{encode, FeatureVector, FEATURE_COUNT, DAYS_LEFT_INDEX, DURATION_INDEX};
pub use itinerary::{
    CabinClass, ItineraryRequest, Numeric, Stops, TimeOfDay, Weekday, AIRLINES, CITIES,
};

use thiserror::Error;

/// Errors that can occur while turning an itinerary into model features.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FareError {
    /// An ordinal field held a value outside its enumeration.
    #[error("unknown {field}: '{value}'")]
    UnknownCategory { field: &'static str, value: String },

    /// A numeric field could not be coerced.
    #[error("invalid {field}: {reason}")]
    InvalidNumber { field: &'static str, reason: String },
}
