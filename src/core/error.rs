//! Error types for hospital-route
//!
//! Provides error handling for dataset loading, route lookups and exports,
//! plus fuzzy name suggestions for mistyped hospitals and states.

use std::fmt;
use std::path::PathBuf;

use strsim::{jaro_winkler, normalized_levenshtein};

/// Minimum combined similarity for a candidate to be suggested
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Suggest the closest candidate for a potentially misspelled name.
///
/// Returns `None` when the input already matches a candidate exactly or when
/// nothing is close enough to be a plausible typo. A case-only mismatch
/// suggests the correctly cased candidate.
pub fn suggest_correction<'a, I>(input: &str, candidates: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let input_lower = input.trim().to_lowercase();
    if input_lower.is_empty() {
        return None;
    }

    let mut best_match = None;
    let mut best_score = 0.0;

    for candidate in candidates {
        if candidate == input {
            return None;
        }

        let candidate_lower = candidate.to_lowercase();

        // Weighted towards Jaro-Winkler
        let score = jaro_winkler(&input_lower, &candidate_lower) * 0.7
            + normalized_levenshtein(&input_lower, &candidate_lower) * 0.3;

        if score >= SUGGESTION_THRESHOLD && score > best_score {
            best_score = score;
            best_match = Some(candidate.to_string());
        }
    }

    best_match
}

/// Failure of a single route lookup.
///
/// The kinds exist for the human-readable message only: every kind is
/// handled the same way (no retry, no partial result).
#[derive(Debug, Clone, PartialEq)]
pub enum RouteError {
    /// Connection, DNS or timeout failure
    Network(String),

    /// Credential rejected by the routing service
    Auth(String),

    /// The service could not find a route between the points
    NoRoute(String),

    /// Response body did not have the expected shape
    Malformed(String),

    /// Any other non-success response
    Api { status: u16, message: String },
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::Network(msg) => write!(f, "network error: {msg}"),
            RouteError::Auth(msg) => write!(f, "API key rejected: {msg}"),
            RouteError::NoRoute(msg) => write!(f, "no route found: {msg}"),
            RouteError::Malformed(msg) => write!(f, "unexpected response: {msg}"),
            RouteError::Api { status, message } => {
                write!(f, "routing service returned {status}: {message}")
            }
        }
    }
}

impl std::error::Error for RouteError {}

impl From<reqwest::Error> for RouteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            RouteError::Malformed(err.to_string())
        } else {
            RouteError::Network(err.to_string())
        }
    }
}

/// Main error type for hospital-route operations
#[derive(Debug)]
pub enum Error {
    /// Dataset file does not exist
    DatasetNotFound(PathBuf),

    /// Dataset could not be parsed or is missing required columns
    DatasetFormat(String),

    /// Hospital name not present in the dataset
    HospitalNotFound {
        name: String,
        suggestion: Option<String>,
    },

    /// State name not present in the dataset
    StateNotFound {
        name: String,
        suggestion: Option<String>,
    },

    /// Route lookup failed
    Route(RouteError),

    /// Summary could not be serialized
    ExportFailed(String),

    /// File I/O error
    IoError(std::io::Error),

    /// Invalid configuration or parameters
    InvalidInput(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DatasetNotFound(path) => {
                write!(f, "Dataset '{}' not found", path.display())
            }
            Error::DatasetFormat(msg) => {
                write!(f, "Dataset error: {msg}")
            }
            Error::HospitalNotFound { name, suggestion } => match suggestion {
                Some(suggestion) => {
                    write!(f, "Hospital '{name}' not found. Did you mean '{suggestion}'?")
                }
                None => write!(f, "Hospital '{name}' not found"),
            },
            Error::StateNotFound { name, suggestion } => match suggestion {
                Some(suggestion) => {
                    write!(f, "State '{name}' not found. Did you mean '{suggestion}'?")
                }
                None => write!(f, "State '{name}' not found"),
            },
            Error::Route(err) => {
                write!(f, "Error calculating route: {err}")
            }
            Error::ExportFailed(msg) => {
                write!(f, "Export failed: {msg}")
            }
            Error::IoError(err) => {
                write!(f, "I/O error: {err}")
            }
            Error::InvalidInput(msg) => {
                write!(f, "Invalid input: {msg}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(err) => Some(err),
            Error::Route(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<RouteError> for Error {
    fn from(err: RouteError) -> Self {
        Error::Route(err)
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::DatasetFormat(err.to_string())
    }
}

impl From<calamine::Error> for Error {
    fn from(err: calamine::Error) -> Self {
        Error::DatasetFormat(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for Error {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Error::ExportFailed(err.to_string())
    }
}

/// Convenience result type for hospital-route operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    const HOSPITALS: [&str; 4] = [
        "Hospital Kuala Lumpur",
        "Hospital Selayang",
        "Hospital Ampang",
        "Hospital Sultanah Aminah",
    ];

    #[test]
    fn test_suggest_correction_typos() {
        assert_eq!(
            suggest_correction("Hospital Selayng", HOSPITALS),
            Some("Hospital Selayang".to_string())
        );
        assert_eq!(
            suggest_correction("hospital ampnag", HOSPITALS),
            Some("Hospital Ampang".to_string())
        );
    }

    #[test]
    fn test_suggest_correction_case_only() {
        assert_eq!(
            suggest_correction("HOSPITAL AMPANG", HOSPITALS),
            Some("Hospital Ampang".to_string())
        );
    }

    #[test]
    fn test_suggest_correction_no_match() {
        assert_eq!(suggest_correction("Hospital Ampang", HOSPITALS), None);
        assert_eq!(suggest_correction("zzz", HOSPITALS), None);
        assert_eq!(suggest_correction("   ", HOSPITALS), None);
    }

    #[test]
    fn test_route_error_display_embeds_cause() {
        let err = Error::from(RouteError::Network("connection refused".to_string()));
        assert_eq!(
            err.to_string(),
            "Error calculating route: network error: connection refused"
        );

        let err = RouteError::Api {
            status: 500,
            message: "internal".to_string(),
        };
        assert_eq!(err.to_string(), "routing service returned 500: internal");
    }

    #[test]
    fn test_not_found_display_with_suggestion() {
        let err = Error::HospitalNotFound {
            name: "Hospital Selayng".to_string(),
            suggestion: Some("Hospital Selayang".to_string()),
        };
        assert!(err.to_string().contains("Did you mean 'Hospital Selayang'?"));

        let err = Error::StateNotFound {
            name: "Atlantis".to_string(),
            suggestion: None,
        };
        assert_eq!(err.to_string(), "State 'Atlantis' not found");
    }
}
