//! User selection state
//!
//! Holds the two chosen hospitals (with their states), the routing credential
//! and the assumed driving speed.

use std::fmt;

use crate::core::error::{Error, Result};

/// Lowest accepted driving speed in km/h
pub const MIN_SPEED_KMH: u32 = 10;

/// Highest accepted driving speed in km/h
pub const MAX_SPEED_KMH: u32 = 200;

/// Driving speed assumed until the user picks one
pub const DEFAULT_SPEED_KMH: u32 = 80;

/// Which end of the route a choice applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    A,
    B,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::A => write!(f, "A"),
            Endpoint::B => write!(f, "B"),
        }
    }
}

/// Current choices. Only presence of required fields and the speed bound
/// are validated here; names are checked against the dataset by the session.
#[derive(Clone, PartialEq)]
pub struct SelectionState {
    pub state_a: Option<String>,
    pub hospital_a: Option<String>,
    pub state_b: Option<String>,
    pub hospital_b: Option<String>,
    api_key: Option<String>,
    speed_kmh: u32,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            state_a: None,
            hospital_a: None,
            state_b: None,
            hospital_b: None,
            api_key: None,
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

// Keeps the credential out of logs
impl fmt::Debug for SelectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionState")
            .field("state_a", &self.state_a)
            .field("hospital_a", &self.hospital_a)
            .field("state_b", &self.state_b)
            .field("hospital_b", &self.hospital_b)
            .field("api_key", &self.api_key.as_ref().map(|_| "********"))
            .field("speed_kmh", &self.speed_kmh)
            .finish()
    }
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the credential; blank input clears it
    pub fn set_api_key(&mut self, key: impl Into<String>) {
        let key = key.into();
        let key = key.trim();
        self.api_key = if key.is_empty() {
            None
        } else {
            Some(key.to_string())
        };
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn speed_kmh(&self) -> u32 {
        self.speed_kmh
    }

    /// Set the assumed speed, rejecting values outside [10, 200] km/h
    pub fn set_speed_kmh(&mut self, speed_kmh: u32) -> Result<()> {
        if !(MIN_SPEED_KMH..=MAX_SPEED_KMH).contains(&speed_kmh) {
            return Err(Error::InvalidInput(format!(
                "speed must be between {MIN_SPEED_KMH} and {MAX_SPEED_KMH} km/h, got {speed_kmh}"
            )));
        }
        self.speed_kmh = speed_kmh;
        Ok(())
    }

    pub fn state(&self, endpoint: Endpoint) -> Option<&str> {
        match endpoint {
            Endpoint::A => self.state_a.as_deref(),
            Endpoint::B => self.state_b.as_deref(),
        }
    }

    pub fn hospital(&self, endpoint: Endpoint) -> Option<&str> {
        match endpoint {
            Endpoint::A => self.hospital_a.as_deref(),
            Endpoint::B => self.hospital_b.as_deref(),
        }
    }

    /// Set the state for an endpoint. The hospital choice is cleared since
    /// it belonged to the previous state.
    pub fn set_state(&mut self, endpoint: Endpoint, state: impl Into<String>) {
        let (state_slot, hospital_slot) = self.slots_mut(endpoint);
        *state_slot = Some(state.into());
        *hospital_slot = None;
    }

    pub fn set_hospital(&mut self, endpoint: Endpoint, state: impl Into<String>, hospital: impl Into<String>) {
        let (state_slot, hospital_slot) = self.slots_mut(endpoint);
        *state_slot = Some(state.into());
        *hospital_slot = Some(hospital.into());
    }

    /// Both hospital names, once chosen
    pub fn endpoints(&self) -> Option<(&str, &str)> {
        Some((self.hospital_a.as_deref()?, self.hospital_b.as_deref()?))
    }

    /// Forget both hospital choices; credential and speed are kept
    pub fn clear_hospitals(&mut self) {
        self.state_a = None;
        self.hospital_a = None;
        self.state_b = None;
        self.hospital_b = None;
    }

    fn slots_mut(&mut self, endpoint: Endpoint) -> (&mut Option<String>, &mut Option<String>) {
        match endpoint {
            Endpoint::A => (&mut self.state_a, &mut self.hospital_a),
            Endpoint::B => (&mut self.state_b, &mut self.hospital_b),
        }
    }
}
