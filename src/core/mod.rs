//! Core library modules for hospital-route
//!
//! This module contains the internal implementation details of the hospital-route library.

pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod map;
pub mod route;
pub mod selection;
pub mod session;
pub mod summary;

// Re-export main types for internal use
pub use config::RouteConfig;
pub use dataset::{Coordinate, Dataset, HospitalRecord};
pub use route::{RouteClient, RouteLeg, RouteResult, TravelTime};
pub use session::{Outcome, Session, View};
