use crate::brevity::{Aspect, Braa, BullseyePosition, CardinalTrack, Declaration, Stack};
use crate::geometry::{Point, distance_nautical_miles, initial_bearing_degrees};
use crate::trackfile::Trackfile;

/// Contacts this many feet apart or more report as separate stacks.
const STACK_BAND_FEET: f64 = 10_000.0;

/// Three or more contacts make a heavy group.
const HEAVY_CONTACTS: usize = 3;

/// Ground speed band for a fast group, knots.
const FAST_KNOTS: std::ops::RangeInclusive<f64> = 600.0..=900.0;
/// Mach band for a fast group.
const FAST_MACH: std::ops::RangeInclusive<f64> = 1.0..=1.5;
/// Any contact above this altitude makes the group high, feet.
const HIGH_FEET: f64 = 40_000.0;

/// A cluster of co-located, co-altitude, same-coalition contacts formed for
/// one query and discarded afterwards, never cached or persisted.
///
/// Members are the formation-time view of the picture; every derived
/// attribute below is recomputed from them on access. The lead member is
/// the seed the caller asked about. All accessors require at least one
/// member, which formation guarantees; an empty group is a caller bug, not
/// a runtime condition.
#[derive(Debug, Clone)]
pub struct Group {
    /// Formation-time member snapshots, lead first.
    members: Vec<Trackfile>,
    /// Mission reference point in effect when the group was formed.
    bullseye: Option<Point>,
    /// Distinct spoken platform names, resolved at formation.
    platforms: Vec<String>,
    threat: bool,
    declaration: Declaration,
    merged_with: usize,
}

impl Group {
    pub(crate) fn new(members: Vec<Trackfile>, bullseye: Option<Point>, platforms: Vec<String>) -> Self {
        Self {
            members,
            bullseye,
            platforms,
            threat: false,
            declaration: Declaration::default(),
            merged_with: 0,
        }
    }

    fn lead(&self) -> &Trackfile {
        self.members
            .first()
            .expect("a group always has at least one member")
    }

    /// Number of contacts in the group.
    pub fn contacts(&self) -> usize {
        self.members.len()
    }

    /// True for groups of three or more.
    pub fn heavy(&self) -> bool {
        self.contacts() >= HEAVY_CONTACTS
    }

    /// The group's highest altitude, feet.
    pub fn altitude(&self) -> f64 {
        self.members
            .iter()
            .map(|member| member.last_known().altitude_feet)
            .fold(f64::MIN, f64::max)
    }

    /// Member altitudes clustered into the fewest bands at least
    /// 10,000 ft apart, highest band first.
    pub fn stacks(&self) -> Vec<Stack> {
        let mut altitudes: Vec<f64> = self
            .members
            .iter()
            .map(|member| member.last_known().altitude_feet)
            .collect();
        altitudes.sort_by(|a, b| b.total_cmp(a));

        let mut stacks: Vec<Stack> = Vec::new();
        for altitude in altitudes {
            match stacks.last_mut() {
                Some(stack) if stack.altitude_feet - altitude < STACK_BAND_FEET => {
                    stack.contacts += 1;
                }
                _ => stacks.push(Stack {
                    altitude_feet: altitude,
                    contacts: 1,
                }),
            }
        }
        stacks
    }

    /// Coarse compass direction of the group's track, from the lead.
    pub fn track(&self) -> CardinalTrack {
        CardinalTrack::from_heading(self.lead().last_known().heading_degrees)
    }

    /// 600-900 kt ground speed or Mach 1.0-1.5, whichever telemetry the
    /// fastest member carries.
    pub fn fast(&self) -> bool {
        let (knots, mach) = self.max_speed();
        FAST_KNOTS.contains(&knots) || mach.is_some_and(|mach| FAST_MACH.contains(&mach))
    }

    /// Faster than the fast band on either measure.
    pub fn very_fast(&self) -> bool {
        let (knots, mach) = self.max_speed();
        knots > *FAST_KNOTS.end() || mach.is_some_and(|mach| mach > *FAST_MACH.end())
    }

    /// Fastest reported ground speed across members, with the highest Mach
    /// any member reports alongside it.
    fn max_speed(&self) -> (f64, Option<f64>) {
        let knots = self
            .members
            .iter()
            .map(|member| member.last_known().ground_speed_knots)
            .fold(0.0, f64::max);
        let mach = self
            .members
            .iter()
            .filter_map(|member| member.last_known().mach)
            .fold(None, |best: Option<f64>, mach| {
                Some(best.map_or(mach, |best| best.max(mach)))
            });
        (knots, mach)
    }

    /// Any member above 40,000 ft.
    pub fn high(&self) -> bool {
        self.members
            .iter()
            .any(|member| member.last_known().altitude_feet > HIGH_FEET)
    }

    /// Bearing, range, and altitude from the mission bullseye to the lead.
    /// `None` when no bullseye was set at formation time.
    pub fn bullseye(&self) -> Option<BullseyePosition> {
        let bullseye = self.bullseye?;
        let position = self.lead().last_known().point;
        Some(BullseyePosition {
            bearing_degrees: initial_bearing_degrees(bullseye, position),
            range_nautical_miles: distance_nautical_miles(bullseye, position),
            altitude_feet: self.altitude(),
        })
    }

    /// Bearing, range, altitude, and aspect from a specific observer.
    pub fn braa(&self, observer: Point) -> Braa {
        let position = self.lead().last_known().point;
        Braa {
            bearing_degrees: initial_bearing_degrees(observer, position),
            range_nautical_miles: distance_nautical_miles(observer, position),
            altitude_feet: self.altitude(),
            aspect: self.aspect(observer),
        }
    }

    /// Angular relationship between the group's track and the line to the
    /// observer: hot, flank, beam, or drag.
    pub fn aspect(&self, observer: Point) -> Aspect {
        let frame = self.lead().last_known();
        let bearing_to_observer = initial_bearing_degrees(frame.point, observer);
        Aspect::classify(frame.heading_degrees, bearing_to_observer)
    }

    /// Distinct spoken platform names of the members.
    pub fn platforms(&self) -> &[String] {
        &self.platforms
    }

    /// Unit identifiers of the members, lead first.
    pub fn unit_ids(&self) -> Vec<u32> {
        self.members
            .iter()
            .map(|member| member.contact.unit_id)
            .collect()
    }

    /// Formation-time member snapshots, lead first.
    pub fn members(&self) -> &[Trackfile] {
        &self.members
    }

    /// Whether the THREAT criteria are met. Assigned by the proximity
    /// policy after formation.
    pub fn threat(&self) -> bool {
        self.threat
    }

    pub fn set_threat(&mut self, threat: bool) {
        self.threat = threat;
    }

    /// Friend-or-foe declaration. Assigned by the identification policy
    /// after formation.
    pub fn declaration(&self) -> Declaration {
        self.declaration
    }

    pub fn set_declaration(&mut self, declaration: Declaration) {
        self.declaration = declaration;
    }

    /// Number of friendlies this group is merged with.
    pub fn merged_with(&self) -> usize {
        self.merged_with
    }

    pub fn set_merged_with(&mut self, merged_with: usize) {
        self.merged_with = merged_with;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coalition::Coalition;
    use crate::trackfile::{Contact, Frame};
    use chrono::Utc;

    fn member(unit_id: u32, altitude_feet: f64, ground_speed_knots: f64, mach: Option<f64>) -> Trackfile {
        Trackfile::new(
            Contact {
                unit_id,
                name: format!("ENFIELD{unit_id}"),
                coalition: Coalition::Red,
                platform: "MiG-29A".to_string(),
            },
            Frame {
                time: Utc::now(),
                point: Point::new(42.0, 41.0),
                altitude_feet,
                heading_degrees: 90.0,
                ground_speed_knots,
                mach,
            },
            10,
        )
    }

    fn group_of(members: Vec<Trackfile>) -> Group {
        Group::new(members, None, vec!["Fulcrum".to_string()])
    }

    #[test]
    fn test_contacts_and_heavy() {
        let pair = group_of(vec![member(1, 20000.0, 400.0, None), member(2, 20000.0, 400.0, None)]);
        assert_eq!(pair.contacts(), 2);
        assert!(!pair.heavy());

        let three = group_of(vec![
            member(1, 20000.0, 400.0, None),
            member(2, 20000.0, 400.0, None),
            member(3, 20000.0, 400.0, None),
        ]);
        assert!(three.heavy());
    }

    #[test]
    fn test_altitude_is_group_maximum() {
        let group = group_of(vec![member(1, 20000.0, 400.0, None), member(2, 31000.0, 400.0, None)]);
        assert_eq!(group.altitude(), 31000.0);
    }

    #[test]
    fn test_stack_bucketing() {
        let group = group_of(vec![
            member(1, 20000.0, 400.0, None),
            member(2, 20500.0, 400.0, None),
            member(3, 35000.0, 400.0, None),
        ]);
        let stacks = group.stacks();
        assert_eq!(stacks.len(), 2);
        assert_eq!(stacks[0].altitude_feet, 35000.0);
        assert_eq!(stacks[0].contacts, 1);
        assert_eq!(stacks[1].altitude_feet, 20500.0);
        assert_eq!(stacks[1].contacts, 2);
    }

    #[test]
    fn test_single_altitude_is_one_stack() {
        let group = group_of(vec![member(1, 25000.0, 400.0, None), member(2, 24000.0, 400.0, None)]);
        let stacks = group.stacks();
        assert_eq!(stacks.len(), 1);
        assert_eq!(stacks[0].contacts, 2);
    }

    #[test]
    fn test_speed_band_boundaries() {
        assert!(!group_of(vec![member(1, 20000.0, 599.0, None)]).fast());
        assert!(group_of(vec![member(1, 20000.0, 600.0, None)]).fast());
        assert!(group_of(vec![member(1, 20000.0, 900.0, None)]).fast());
        assert!(!group_of(vec![member(1, 20000.0, 900.0, None)]).very_fast());
        assert!(!group_of(vec![member(1, 20000.0, 901.0, None)]).fast());
        assert!(group_of(vec![member(1, 20000.0, 901.0, None)]).very_fast());
    }

    #[test]
    fn test_mach_band() {
        assert!(group_of(vec![member(1, 30000.0, 580.0, Some(1.05))]).fast());
        assert!(group_of(vec![member(1, 30000.0, 580.0, Some(1.5))]).fast());
        assert!(group_of(vec![member(1, 30000.0, 580.0, Some(1.6))]).very_fast());
        assert!(!group_of(vec![member(1, 30000.0, 580.0, Some(0.9))]).fast());
    }

    #[test]
    fn test_fastest_member_sets_the_band() {
        let group = group_of(vec![member(1, 20000.0, 400.0, None), member(2, 20000.0, 650.0, None)]);
        assert!(group.fast());
    }

    #[test]
    fn test_high_flag() {
        assert!(!group_of(vec![member(1, 40000.0, 400.0, None)]).high());
        assert!(group_of(vec![member(1, 40001.0, 400.0, None), member(2, 20000.0, 400.0, None)]).high());
    }

    #[test]
    fn test_track_follows_lead_heading() {
        let group = group_of(vec![member(1, 20000.0, 400.0, None)]);
        assert_eq!(group.track(), CardinalTrack::East);
    }

    #[test]
    fn test_bullseye_position() {
        // Bullseye one degree of latitude south of the lead
        let group = Group::new(
            vec![member(1, 25000.0, 400.0, None)],
            Some(Point::new(41.0, 41.0)),
            Vec::new(),
        );
        let position = group.bullseye().unwrap();
        assert!(position.bearing_degrees.abs() < 0.1);
        assert!((position.range_nautical_miles - 60.0).abs() < 0.25);
        assert_eq!(position.altitude_feet, 25000.0);

        let without = group_of(vec![member(1, 25000.0, 400.0, None)]);
        assert!(without.bullseye().is_none());
    }

    #[test]
    fn test_braa_and_aspect() {
        // Lead heading east; observer due east of the group
        let group = group_of(vec![member(1, 25000.0, 400.0, None)]);
        let observer = Point::new(42.0, 42.0);
        let braa = group.braa(observer);

        // Bearing from the observer back to the group is west
        assert!((braa.bearing_degrees - 270.0).abs() < 1.0);
        assert_eq!(braa.aspect, Aspect::Hot);

        // Observer due west of the group sees it dragging
        assert_eq!(group.aspect(Point::new(42.0, 40.0)), Aspect::Drag);
        // Observer due north sees it beaming
        assert_eq!(group.aspect(Point::new(43.0, 41.0)), Aspect::Beam);
    }

    #[test]
    fn test_overrides_read_back_unchanged() {
        let mut group = group_of(vec![member(1, 20000.0, 400.0, None)]);
        assert_eq!(group.declaration(), Declaration::Unable);
        assert!(!group.threat());
        assert_eq!(group.merged_with(), 0);

        group.set_declaration(Declaration::Hostile);
        group.set_threat(true);
        group.set_merged_with(2);
        assert_eq!(group.declaration(), Declaration::Hostile);
        assert!(group.threat());
        assert_eq!(group.merged_with(), 2);
    }
}
