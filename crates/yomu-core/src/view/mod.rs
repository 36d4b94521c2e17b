//! View models for the three pages of the client.
//!
//! Each view is a plain state machine: navigation returns the fetch to
//! perform, and completion messages are applied through `update`. Every fetch
//! carries a [`Ticket`](crate::request::Ticket), so results from superseded
//! navigations are dropped on arrival.

pub mod catalog;
pub mod detail;
pub mod reader;
