use chrono::Duration;

/// Tunables for the radar scope.
#[derive(Debug, Clone)]
pub struct ScopeConfig {
    /// Maximum 2D separation for two contacts to fly in the same group.
    /// ATP single-ship tolerance is 1 NM; simulated AI holds formation
    /// loosely, so the default is tripled.
    pub spread_nautical_miles: f64,
    /// Maximum altitude separation for two contacts to fly in the same
    /// group. Tripled from the 1000 ft ATP tolerance for the same reason.
    pub stack_feet: f64,
    /// Kinematic frames retained per trackfile, most recent first.
    pub history_depth: usize,
    /// Contacts whose last telemetry update is older than this are dropped
    /// by `Scope::prune_stale`.
    pub stale_after: Duration,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            spread_nautical_miles: 3.0,
            stack_feet: 3000.0,
            history_depth: 10,
            stale_after: Duration::minutes(2),
        }
    }
}
