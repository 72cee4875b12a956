//! Client-side recommendation session.
//!
//! A session chains recommendation calls as the user marks titles watched:
//! each watched title becomes the next seed, and every watched title is
//! excluded from later results. [`state`] holds the pure transitions,
//! [`driver`] executes the fetches they request.

pub mod driver;
pub mod snapshot;
pub mod state;

pub use driver::SessionDriver;
pub use snapshot::{format_chain, RecommendationView, SessionSnapshot, StatusTag};
pub use state::{transition, Event, FetchCommand, FetchKind, SessionState, SessionStatus};
