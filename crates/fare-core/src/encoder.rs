//! Itinerary to feature-vector encoding.
//!
//! Layout (0-based):
//!
//! | Index  | Feature                         |
//! |--------|---------------------------------|
//! | 0      | departure_time code             |
//! | 1      | stops code                      |
//! | 2      | arrival_time code               |
//! | 3      | class code                      |
//! | 4      | duration                        |
//! | 5      | days_left                       |
//! | 6      | day code                        |
//! | 7–12   | airline one-hot                 |
//! | 13–24  | source_city one-hot             |
//! | 25–36  | destination_city one-hot        |
//!
//! The trained model depends on this order. Do not reorder.

use tracing::debug;

use crate::itinerary::{CabinClass, ItineraryRequest, Stops, TimeOfDay, Weekday, AIRLINES, CITIES};
use crate::FareError;

const ORDINAL_COUNT: usize = 7;

/// Total number of model features.
pub const FEATURE_COUNT: usize = ORDINAL_COUNT + AIRLINES.len() + 2 * CITIES.len();

pub const DURATION_INDEX: usize = 4;
pub const DAYS_LEFT_INDEX: usize = 5;

const AIRLINE_OFFSET: usize = ORDINAL_COUNT;
const SOURCE_OFFSET: usize = AIRLINE_OFFSET + AIRLINES.len();
const DESTINATION_OFFSET: usize = SOURCE_OFFSET + CITIES.len();

/// Fixed-length feature row in model order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn from_array(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn into_array(self) -> [f64; FEATURE_COUNT] {
        self.0
    }

    /// Returns the value at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    /// Overwrites the value at `index`. Returns false if out of range.
    pub fn set(&mut self, index: usize, value: f64) -> bool {
        match self.0.get_mut(index) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}

/// Encodes an itinerary into the model's feature layout.
///
/// Ordinal fields and numbers must be valid. Airline and city values outside
/// the known vocabularies encode as an all-zero block.
pub fn encode(request: &ItineraryRequest) -> Result<FeatureVector, FareError> {
    let departure = lookup("departure_time", &request.departure_time, TimeOfDay::parse)?.code();
    let stops = lookup("stops", &request.stops, Stops::parse)?.code();
    let arrival = lookup("arrival_time", &request.arrival_time, TimeOfDay::parse)?.code();
    let class = lookup("class", &request.class, CabinClass::parse)?.code();
    let duration = request.duration.to_f64("duration")?;
    let days_left = request.days_left.to_integer("days_left")?;
    let day = lookup("day", &request.day, Weekday::parse)?.code();

    let mut values = [0.0; FEATURE_COUNT];
    values[0] = f64::from(departure);
    values[1] = f64::from(stops);
    values[2] = f64::from(arrival);
    values[3] = f64::from(class);
    values[DURATION_INDEX] = duration;
    values[DAYS_LEFT_INDEX] = days_left as f64;
    values[6] = f64::from(day);

    one_hot(&mut values[AIRLINE_OFFSET..SOURCE_OFFSET], &AIRLINES, "airline", &request.airline);
    one_hot(&mut values[SOURCE_OFFSET..DESTINATION_OFFSET], &CITIES, "source_city", &request.source_city);
    one_hot(&mut values[DESTINATION_OFFSET..], &CITIES, "destination_city", &request.destination_city);

    Ok(FeatureVector(values))
}

fn lookup<T>(field: &'static str, value: &str, parse: fn(&str) -> Option<T>) -> Result<T, FareError> {
    parse(value).ok_or_else(|| FareError::UnknownCategory { field, value: value.to_string() })
}

fn one_hot(block: &mut [f64], vocabulary: &[&str], field: &str, value: &str) {
    match vocabulary.iter().position(|known| *known == value) {
        Some(idx) => block[idx] = 1.0,
        None => debug!("{} '{}' not in vocabulary, encoding as zeros", field, value),
    }
}
