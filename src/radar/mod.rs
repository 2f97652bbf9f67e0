mod contacts;
mod group;
mod grouping;

pub use group::Group;

use chrono::{DateTime, Utc};
use metrics::counter;
use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};
use tracing::{debug, info, trace, warn};

use crate::coalition::Coalition;
use crate::config::ScopeConfig;
use crate::geometry::{Point, haversine_distance_meters};
use crate::trackfile::{TelemetryEvent, TrackUpdate, Trackfile};
use contacts::ContactStore;

/// The radar scope: the live contact picture plus the mission reference
/// point and the platform table, shared between one telemetry writer and
/// any number of concurrent radio queries.
///
/// Every query forms its group fresh from the current picture; nothing
/// derived is cached between calls, so two overlapping queries may observe
/// different, independently consistent snapshots.
pub struct Scope {
    contacts: ContactStore,
    bullseye: RwLock<Option<Point>>,
    config: ScopeConfig,
}

impl Scope {
    pub fn new(config: ScopeConfig) -> Self {
        Self {
            contacts: ContactStore::new(),
            bullseye: RwLock::new(None),
            config,
        }
    }

    /// Apply one telemetry tick: refresh the unit's trackfile in place, or
    /// open a new one for a unit seen for the first time.
    pub fn update(&self, update: TrackUpdate) {
        let frame = update.frame();
        let trackfile = match self.contacts.get_by_unit_id(update.unit_id) {
            Some(mut existing) => {
                // Labels follow the latest telemetry; a rename rewrites the
                // callsign index inside `set`
                existing.contact = update.contact();
                existing.update(frame);
                existing
            }
            None => {
                debug!(unit_id = update.unit_id, name = %update.name, "new contact");
                Trackfile::new(update.contact(), frame, self.config.history_depth)
            }
        };
        self.contacts.set(update.unit_id, trackfile);
        counter!("scope.updates").increment(1);
    }

    /// Drop a unit that left the simulation. Returns whether it was on the
    /// scope.
    pub fn remove(&self, unit_id: u32) -> bool {
        let removed = self.contacts.delete(unit_id);
        if removed {
            counter!("scope.removals").increment(1);
        }
        removed
    }

    /// Consume telemetry events until the channel closes. Callers host
    /// this on their runtime alongside the pruner.
    pub async fn consume(&self, events: flume::Receiver<TelemetryEvent>) {
        while let Ok(event) = events.recv_async().await {
            match event {
                TelemetryEvent::Update(update) => self.update(update),
                TelemetryEvent::Leave(unit_id) => {
                    self.remove(unit_id);
                }
            }
        }
        info!("telemetry channel closed, scope intake stopped");
    }

    /// Replace the mission reference point as a whole value.
    pub fn set_bullseye(&self, bullseye: Point) {
        *self
            .bullseye
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(bullseye);
    }

    /// The current mission reference point, if one has been set.
    pub fn bullseye(&self) -> Option<Point> {
        *self.bullseye.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Wall-clock time of a unit's last telemetry update.
    pub fn last_updated(&self, unit_id: u32) -> Option<DateTime<Utc>> {
        self.contacts.last_updated(unit_id)
    }

    /// Number of contacts currently on the scope.
    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    /// Form the group around the unit answering to a spoken callsign.
    /// Unknown callsigns are a not-found, not an error.
    pub fn find_group_by_callsign(&self, callsign: &str) -> Option<Group> {
        let seed = self.contacts.get_by_callsign(callsign)?;
        Some(self.form_group(seed))
    }

    /// Form the group around a specific unit.
    pub fn find_group_by_unit_id(&self, unit_id: u32) -> Option<Group> {
        let seed = self.contacts.get_by_unit_id(unit_id)?;
        Some(self.form_group(seed))
    }

    /// Form the group around the given coalition's contact nearest to an
    /// origin point. This backs threat and bogey-dope queries, where the
    /// origin is the asking friendly and the coalition is the opposing one.
    pub fn find_nearest_group(&self, origin: Point, coalition: Coalition) -> Option<Group> {
        let mut nearest: Option<(f64, Trackfile)> = None;
        let mut iterator = self.contacts.iterate();
        while iterator.next() {
            let Some(candidate) = iterator.value() else {
                continue;
            };
            if candidate.contact.coalition != coalition {
                continue;
            }
            let distance = haversine_distance_meters(origin, candidate.last_known().point);
            if nearest.as_ref().is_none_or(|(best, _)| distance < *best) {
                nearest = Some((distance, candidate));
            }
        }
        let (_, seed) = nearest?;
        Some(self.form_group(seed))
    }

    /// Partition one coalition's contacts into disjoint groups, nearest to
    /// the bullseye first when one is set. This is the whole-scope picture.
    pub fn picture(&self, coalition: Coalition) -> Vec<Group> {
        let mut grouped: HashSet<u32> = HashSet::new();
        let mut groups = Vec::new();

        let mut iterator = self.contacts.iterate();
        while iterator.next() {
            let Some(seed) = iterator.value() else {
                continue;
            };
            if seed.contact.coalition != coalition || grouped.contains(&seed.contact.unit_id) {
                continue;
            }
            let group = self.form_group(seed);
            grouped.extend(group.unit_ids());
            groups.push(group);
        }

        if let Some(bullseye) = self.bullseye() {
            groups.sort_by(|a, b| {
                let ra = a.bullseye().map_or(f64::MAX, |p| p.range_nautical_miles);
                let rb = b.bullseye().map_or(f64::MAX, |p| p.range_nautical_miles);
                ra.total_cmp(&rb)
            });
            trace!(groups = groups.len(), ?bullseye, "composed picture");
        }
        groups
    }

    /// Drop contacts whose last update is older than the configured
    /// horizon. Covers telemetry loss and units that despawn without a
    /// leave event. Returns how many were dropped.
    pub fn prune_stale(&self) -> usize {
        let cutoff = Utc::now() - self.config.stale_after;
        let mut stale = Vec::new();

        let mut iterator = self.contacts.iterate();
        while iterator.next() {
            let Some(trackfile) = iterator.value() else {
                continue;
            };
            let unit_id = trackfile.contact.unit_id;
            if self
                .contacts
                .last_updated(unit_id)
                .is_some_and(|updated| updated < cutoff)
            {
                stale.push(unit_id);
            }
        }

        let mut pruned = 0;
        for unit_id in stale {
            if self.contacts.delete(unit_id) {
                pruned += 1;
            }
        }
        if pruned > 0 {
            warn!(pruned, "dropped stale contacts");
            counter!("scope.stale_pruned").increment(pruned as u64);
        }
        pruned
    }

    /// Host the stale-contact sweep on an interval, forever. Spawn on the
    /// caller's runtime next to `consume`.
    pub async fn run_pruner(&self, every: std::time::Duration) {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.prune_stale();
        }
    }

    fn form_group(&self, seed: Trackfile) -> Group {
        grouping::form_group(&self.contacts, seed, self.bullseye(), &self.config)
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new(ScopeConfig::default())
    }
}
