//! Village letter portal: citizen registration, the letter request wizard,
//! and the staff review surface that turns status changes into notifications.

pub mod config;
pub mod error;
pub mod portal;
pub mod telemetry;
