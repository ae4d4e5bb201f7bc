//! Appointment booking: conflict-free creation, availability, status
//! transitions and per-salon analytics.

pub mod analytics;
pub mod locks;
pub mod schedule;
pub mod service;
pub mod transitions;

pub use service::{BookingRequest, BookingService};

#[cfg(test)]
mod tests;
