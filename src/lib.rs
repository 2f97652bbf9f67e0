//! tacscope - ground-controlled-intercept radar core
//!
//! Maintains a live picture of simulated-aircraft tracks from a telemetry
//! stream and answers tactical queries about it: which contacts fly
//! together as a group, and the attributes a controller reports over the
//! radio (altitude stacks, track, aspect, speed band, bullseye and BRAA
//! positions). Telemetry ingestion, radio transport, and report wording
//! all live with the collaborating crates; this one starts at
//! [`TrackUpdate`] and ends at [`Group`].

pub mod brevity;
pub mod callsign;
pub mod coalition;
pub mod config;
pub mod geometry;
pub mod platforms;
pub mod radar;
pub mod trackfile;

pub use brevity::{Aspect, Braa, BullseyePosition, CardinalTrack, Declaration, Stack};
pub use coalition::Coalition;
pub use config::ScopeConfig;
pub use geometry::Point;
pub use radar::{Group, Scope};
pub use trackfile::{Contact, Frame, TelemetryEvent, TrackUpdate, Trackfile};
