use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Display name reported for platforms missing from the table (or present
/// with no usable name). Surfaced explicitly so a group of unidentifiable
/// airframes still reads as "unknown" instead of disappearing.
pub const UNKNOWN_PLATFORM: &str = "unknown";

/// Broad airframe class used for group compatibility. Fighters don't fly
/// formation with helicopters even when co-located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlatformClass {
    FixedWing,
    RotaryWing,
    #[default]
    Unknown,
}

impl PlatformClass {
    /// Whether contacts of these classes can belong to one group. An
    /// unestablished class is compatible with anything.
    pub fn is_compatible(self, other: PlatformClass) -> bool {
        self == PlatformClass::Unknown || other == PlatformClass::Unknown || self == other
    }
}

/// One platform entry, keyed by the name the simulation uses in telemetry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformData {
    pub name: String,
    #[serde(default)]
    pub reporting_name: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub official_name: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub class: PlatformClass,
}

impl PlatformData {
    /// The name a controller speaks for this platform: NATO reporting name
    /// where one exists, then nickname, official name, and designation.
    pub fn display_name(&self) -> Option<&str> {
        [
            &self.reporting_name,
            &self.nickname,
            &self.official_name,
            &self.designation,
        ]
        .into_iter()
        .find(|name| !name.is_empty())
        .map(String::as_str)
    }
}

/// Read-only platform lookup table, populated once at startup.
#[derive(Debug)]
pub struct PlatformDb {
    by_name: HashMap<String, PlatformData>,
}

impl PlatformDb {
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<PlatformData> =
            serde_json::from_str(json).context("failed to decode platform table")?;
        let by_name = entries
            .into_iter()
            .map(|data| (data.name.clone(), data))
            .collect();
        Ok(Self { by_name })
    }

    pub fn get(&self, platform: &str) -> Option<&PlatformData> {
        self.by_name.get(platform)
    }

    /// Spoken display name for a platform, falling back to the unknown
    /// sentinel for platforms the table doesn't cover.
    pub fn display_name(&self, platform: &str) -> String {
        self.get(platform)
            .and_then(PlatformData::display_name)
            .unwrap_or(UNKNOWN_PLATFORM)
            .to_string()
    }

    pub fn class_of(&self, platform: &str) -> PlatformClass {
        self.get(platform).map_or(PlatformClass::Unknown, |data| data.class)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Process-wide platform table. The embedded asset is validated by tests,
/// so a decode failure here is a packaging defect.
pub static PLATFORMS: Lazy<PlatformDb> = Lazy::new(|| {
    PlatformDb::from_json(include_str!("../data/platforms.json"))
        .expect("embedded platform table decodes")
});
