use chrono::Utc;
use tacscope::{Coalition, Point, TrackUpdate};

/// Degrees of latitude per nautical mile.
pub const DEGREES_PER_NAUTICAL_MILE: f64 = 1.0 / 60.0;

/// Anchor point for test scenarios.
pub fn anchor() -> Point {
    Point::new(42.0, 41.0)
}

/// A telemetry tick at a north offset (in nautical miles) from the anchor.
pub fn tick(
    unit_id: u32,
    name: &str,
    coalition: Coalition,
    platform: &str,
    north_offset_nm: f64,
    altitude_feet: f64,
) -> TrackUpdate {
    TrackUpdate {
        unit_id,
        name: name.to_string(),
        coalition,
        platform: platform.to_string(),
        time: Utc::now(),
        point: Point::new(
            anchor().latitude + north_offset_nm * DEGREES_PER_NAUTICAL_MILE,
            anchor().longitude,
        ),
        altitude_feet,
        heading_degrees: 360.0,
        ground_speed_knots: 420.0,
        mach: None,
    }
}

/// Install a test-capture tracing subscriber once per test binary. Set
/// RUST_LOG to see formation decisions while debugging a test.
pub fn init_tracing() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
