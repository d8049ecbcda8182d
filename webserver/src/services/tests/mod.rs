//! Service tests for the webserver
//!
//! Every test runs against its own in-memory database built by the
//! fixtures module.


mod access_control;
mod assignment_service;
mod enrollment_service;
mod user_service;
