//! Report-facing vocabulary. These are the values the report-generation
//! collaborator turns into radio speech; the radar core only derives them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::{angle_off_degrees, normalize_degrees};

/// Friend-or-foe classification of a group, assigned by the identification
/// policy after formation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Declaration {
    Friend,
    Hostile,
    Neutral,
    /// The controller cannot classify the group.
    #[default]
    Unable,
    /// No factor groups on the scope at all.
    Clean,
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Declaration::Friend => write!(f, "friend"),
            Declaration::Hostile => write!(f, "hostile"),
            Declaration::Neutral => write!(f, "neutral"),
            Declaration::Unable => write!(f, "unable"),
            Declaration::Clean => write!(f, "clean"),
        }
    }
}

/// Angular relationship between a group's track and the line to an
/// observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aspect {
    /// Pointing at the observer, angle off up to 30 degrees.
    Hot,
    /// Angle off up to 70 degrees.
    Flank,
    /// Angle off up to 110 degrees.
    Beam,
    /// Pointing away, anything wider.
    Drag,
    Unknown,
}

impl Aspect {
    /// Classify from a group's heading and the bearing from the group to
    /// the observer. A group flying directly at the observer is hot.
    pub fn classify(heading_degrees: f64, bearing_to_observer_degrees: f64) -> Self {
        let off = angle_off_degrees(heading_degrees, bearing_to_observer_degrees);
        if off <= 30.0 {
            Aspect::Hot
        } else if off <= 70.0 {
            Aspect::Flank
        } else if off <= 110.0 {
            Aspect::Beam
        } else {
            Aspect::Drag
        }
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aspect::Hot => write!(f, "hot"),
            Aspect::Flank => write!(f, "flank"),
            Aspect::Beam => write!(f, "beam"),
            Aspect::Drag => write!(f, "drag"),
            Aspect::Unknown => write!(f, "unknown"),
        }
    }
}

/// Eight-point compass classification of a group's track direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardinalTrack {
    North,
    Northeast,
    East,
    Southeast,
    South,
    Southwest,
    West,
    Northwest,
}

impl CardinalTrack {
    pub fn from_heading(heading_degrees: f64) -> Self {
        // Each point owns a 45 degree arc centered on its heading
        let sector = (normalize_degrees(heading_degrees) + 22.5).rem_euclid(360.0) / 45.0;
        match sector as u32 {
            0 => CardinalTrack::North,
            1 => CardinalTrack::Northeast,
            2 => CardinalTrack::East,
            3 => CardinalTrack::Southeast,
            4 => CardinalTrack::South,
            5 => CardinalTrack::Southwest,
            6 => CardinalTrack::West,
            _ => CardinalTrack::Northwest,
        }
    }
}

impl fmt::Display for CardinalTrack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardinalTrack::North => write!(f, "north"),
            CardinalTrack::Northeast => write!(f, "northeast"),
            CardinalTrack::East => write!(f, "east"),
            CardinalTrack::Southeast => write!(f, "southeast"),
            CardinalTrack::South => write!(f, "south"),
            CardinalTrack::Southwest => write!(f, "southwest"),
            CardinalTrack::West => write!(f, "west"),
            CardinalTrack::Northwest => write!(f, "northwest"),
        }
    }
}

/// One reported altitude band when a group spans several altitudes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stack {
    /// Representative altitude of the band, its highest member.
    pub altitude_feet: f64,
    /// Contacts flying in this band.
    pub contacts: usize,
}

/// A group's position relative to the shared mission reference point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BullseyePosition {
    pub bearing_degrees: f64,
    pub range_nautical_miles: f64,
    pub altitude_feet: f64,
}

/// Bearing/Range/Altitude/Aspect relative to a specific observer aircraft.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Braa {
    pub bearing_degrees: f64,
    pub range_nautical_miles: f64,
    pub altitude_feet: f64,
    pub aspect: Aspect,
}
