//! Site Attendance & Payroll Engine
//!
//! This crate tracks geofenced worker attendance at construction sites and
//! converts completed, unsettled shifts into payroll disbursements recorded
//! as site expenses.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod geolocation;
pub mod models;
pub mod storage;
