//! Eligibility, availability and approval rules behind the duty roster.
//!
//! `scheduling` answers whether a staff member may work a workplace on a
//! date and whether they are around at all. `approvals` moves long-lived
//! wish and absence records through review.

pub mod approvals;
pub mod config;
pub mod error;
pub mod scheduling;
pub mod telemetry;
pub mod validation;
