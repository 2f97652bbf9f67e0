use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::coalition::Coalition;
use crate::geometry::Point;

/// One kinematic sample from telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Simulation timestamp of the sample.
    pub time: DateTime<Utc>,
    pub point: Point,
    pub altitude_feet: f64,
    pub heading_degrees: f64,
    pub ground_speed_knots: f64,
    pub mach: Option<f64>,
}

/// Identity labels of a tracked object. These come from the mission, not
/// from kinematics, and normally never change over a unit's lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub unit_id: u32,
    /// Raw display name as transmitted ("Enfield 1-1 | F-16C").
    pub name: String,
    pub coalition: Coalition,
    /// Platform name the simulation uses in telemetry, the key into the
    /// platform table.
    pub platform: String,
}

/// Time-series record of one tracked object. Owned exclusively by the
/// contact store and mutated in place on every telemetry update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trackfile {
    pub contact: Contact,
    /// Recent frames, most recent first, capped at the configured depth.
    history: VecDeque<Frame>,
    max_depth: usize,
}

impl Trackfile {
    /// A trackfile always carries at least the frame it was created from.
    pub fn new(contact: Contact, frame: Frame, max_depth: usize) -> Self {
        let mut history = VecDeque::with_capacity(max_depth.max(1));
        history.push_front(frame);
        Self {
            contact,
            history,
            max_depth: max_depth.max(1),
        }
    }

    /// Record a new frame, dropping the oldest once the history is full.
    pub fn update(&mut self, frame: Frame) {
        self.history.push_front(frame);
        self.history.truncate(self.max_depth);
    }

    /// The most recent frame.
    pub fn last_known(&self) -> &Frame {
        self.history
            .front()
            .expect("a trackfile always has at least one frame")
    }

    /// Recent frames, most recent first.
    pub fn history(&self) -> impl Iterator<Item = &Frame> {
        self.history.iter()
    }
}

/// One telemetry tick for one unit, as delivered by the ingestion client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackUpdate {
    pub unit_id: u32,
    pub name: String,
    pub coalition: Coalition,
    pub platform: String,
    pub time: DateTime<Utc>,
    pub point: Point,
    pub altitude_feet: f64,
    pub heading_degrees: f64,
    pub ground_speed_knots: f64,
    #[serde(default)]
    pub mach: Option<f64>,
}

impl TrackUpdate {
    pub fn contact(&self) -> Contact {
        Contact {
            unit_id: self.unit_id,
            name: self.name.clone(),
            coalition: self.coalition,
            platform: self.platform.clone(),
        }
    }

    pub fn frame(&self) -> Frame {
        Frame {
            time: self.time,
            point: self.point,
            altitude_feet: self.altitude_feet,
            heading_degrees: self.heading_degrees,
            ground_speed_knots: self.ground_speed_knots,
            mach: self.mach,
        }
    }
}

/// Events arriving from the telemetry collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TelemetryEvent {
    /// A unit reported a new state.
    Update(TrackUpdate),
    /// A unit left the simulation.
    Leave(u32),
}
