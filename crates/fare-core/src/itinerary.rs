//! Itinerary request and the categorical vocabularies it is encoded against.

use serde::Deserialize;

use crate::FareError;

/// Airlines with a one-hot slot, in feature order.
pub const AIRLINES: [&str; 6] = ["AirAsia", "Air_India", "GO_FIRST", "Indigo", "SpiceJet", "Vistara"];

/// Cities with a one-hot slot, in feature order. Shared by the source and
/// destination blocks.
pub const CITIES: [&str; 12] = [
    "Ahmedabad",
    "Bangalore",
    "Chandigarh",
    "Chennai",
    "Coimbatore",
    "Delhi",
    "Hyderabad",
    "Jaipur",
    "Kolkata",
    "Lucknow",
    "Mumbai",
    "Pune",
];

/// A flight itinerary as submitted by a caller.
///
/// Categorical fields stay as raw strings here; they are only checked against
/// their vocabularies during encoding.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItineraryRequest {
    pub airline: String,
    pub source_city: String,
    pub destination_city: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub stops: String,
    pub class: String,
    pub day: String,
    pub duration: Numeric,
    pub days_left: Numeric,
}

/// A numeric field that callers may send either as a JSON number or as a
/// numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    /// Coerces to a finite float.
    pub fn to_f64(&self, field: &'static str) -> Result<f64, FareError> {
        let value = match self {
            Numeric::Number(n) => *n,
            Numeric::Text(s) => s.trim().parse::<f64>().map_err(|_| FareError::InvalidNumber {
                field,
                reason: format!("could not convert '{s}' to float"),
            })?,
        };

        if !value.is_finite() {
            return Err(FareError::InvalidNumber { field, reason: "value must be finite".into() });
        }
        Ok(value)
    }

    /// Coerces to an integer. Fractional numbers are truncated toward zero;
    /// strings must be integer literals.
    pub fn to_integer(&self, field: &'static str) -> Result<i64, FareError> {
        match self {
            Numeric::Number(n) if !n.is_finite() => {
                Err(FareError::InvalidNumber { field, reason: "value must be finite".into() })
            }
            Numeric::Number(n) => {
                let truncated = n.trunc();
                if truncated < i64::MIN as f64 || truncated > i64::MAX as f64 {
                    return Err(FareError::InvalidNumber { field, reason: format!("{n} is out of range") });
                }
                Ok(truncated as i64)
            }
            Numeric::Text(s) => s.trim().parse::<i64>().map_err(|_| FareError::InvalidNumber {
                field,
                reason: format!("invalid literal for integer: '{s}'"),
            }),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Ordinal codings
// ─────────────────────────────────────────────────────────────────────────────

/// Time-of-day bucket used for departure and arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeOfDay {
    EarlyMorning,
    Morning,
    Afternoon,
    Evening,
    Night,
    LateNight,
}

impl TimeOfDay {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Early_Morning" => Some(TimeOfDay::EarlyMorning),
            "Morning" => Some(TimeOfDay::Morning),
            "Afternoon" => Some(TimeOfDay::Afternoon),
            "Evening" => Some(TimeOfDay::Evening),
            "Night" => Some(TimeOfDay::Night),
            "Late_Night" => Some(TimeOfDay::LateNight),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            TimeOfDay::EarlyMorning => 0,
            TimeOfDay::Morning => 1,
            TimeOfDay::Afternoon => 2,
            TimeOfDay::Evening => 3,
            TimeOfDay::Night => 4,
            TimeOfDay::LateNight => 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Monday" => Some(Weekday::Monday),
            "Tuesday" => Some(Weekday::Tuesday),
            "Wednesday" => Some(Weekday::Wednesday),
            "Thursday" => Some(Weekday::Thursday),
            "Friday" => Some(Weekday::Friday),
            "Saturday" => Some(Weekday::Saturday),
            "Sunday" => Some(Weekday::Sunday),
            _ => None,
        }
    }

    /// Zero-based, starting at Monday.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

/// Number of stops on the itinerary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stops {
    Zero,
    One,
    TwoOrMore,
}

impl Stops {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "zero" => Some(Stops::Zero),
            "one" => Some(Stops::One),
            "two_or_more" => Some(Stops::TwoOrMore),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CabinClass {
    Economy,
    Business,
}

impl CabinClass {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Economy" => Some(CabinClass::Economy),
            "Business" => Some(CabinClass::Business),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }
}
