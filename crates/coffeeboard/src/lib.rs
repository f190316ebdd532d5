//! Decision core for a regional coffee job board.
//!
//! A posting travels from a user-entered draft through intake validation,
//! payment checkout, and moderation, until it is published as a ranked
//! listing on the public board. This crate owns that lifecycle and the
//! ordering of the public list; rendering and the hosted row store stay
//! behind the traits in [`listings`].

pub mod config;
pub mod error;
pub mod listings;
pub mod metro;
pub mod telemetry;
