//! Core evcharge library (session, auth, enrollment, stations, API client).

pub mod api;
pub mod auth;
pub mod config;
pub mod enroll;
pub mod geo;
pub mod guard;
pub mod session;
pub mod stations;
