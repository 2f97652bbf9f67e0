use metrics::counter;
use std::collections::{BTreeSet, HashSet, VecDeque};
use tracing::{debug, trace};

use crate::config::ScopeConfig;
use crate::geometry::{METERS_PER_NAUTICAL_MILE, Point, haversine_distance_meters};
use crate::platforms::{PLATFORMS, PlatformClass};
use crate::radar::contacts::ContactStore;
use crate::radar::group::Group;
use crate::trackfile::Trackfile;

/// Form the group containing the seed: the transitive closure of the
/// companion relation over the store's current picture.
///
/// Flood fill with an explicit frontier. Each contact pulled off the
/// frontier re-scans a store snapshot; matching contacts join the member
/// set and the frontier, so two aircraft three miles apart still group when
/// a third flies between them. Membership is keyed by unit id, never by
/// value, so a contact is admitted at most once. Worst case O(n²) over the
/// live population, which stays in the low hundreds.
pub(crate) fn form_group(
    store: &ContactStore,
    seed: Trackfile,
    bullseye: Option<Point>,
    config: &ScopeConfig,
) -> Group {
    let spread_meters = config.spread_nautical_miles * METERS_PER_NAUTICAL_MILE;
    let mut category = PLATFORMS.class_of(&seed.contact.platform);

    let mut member_ids: HashSet<u32> = HashSet::from([seed.contact.unit_id]);
    let mut members: Vec<Trackfile> = vec![seed];
    let mut frontier: VecDeque<usize> = VecDeque::from([0]);

    while let Some(index) = frontier.pop_front() {
        let reference = members[index].clone();
        let mut iterator = store.iterate();
        while iterator.next() {
            let Some(candidate) = iterator.value() else {
                // Deleted mid-scan; the snapshot entry is simply gone
                continue;
            };
            if member_ids.contains(&candidate.contact.unit_id) {
                continue;
            }
            if !is_companion(&reference, &candidate, category, spread_meters, config.stack_feet) {
                continue;
            }

            debug!(
                seed = reference.contact.unit_id,
                joined = candidate.contact.unit_id,
                callsign = %candidate.contact.name,
                "contact joined group"
            );
            // A group seeded by an unrecognized platform takes its class
            // from the first member that has one
            if category == PlatformClass::Unknown {
                category = PLATFORMS.class_of(&candidate.contact.platform);
            }
            member_ids.insert(candidate.contact.unit_id);
            members.push(candidate);
            frontier.push_back(members.len() - 1);
        }
    }

    let platforms = resolve_platforms(&members);
    counter!("scope.groups_formed").increment(1);
    trace!(contacts = members.len(), ?platforms, "formed group");
    Group::new(members, bullseye, platforms)
}

/// The symmetric companion relation: same coalition, compatible airframe
/// class, and within both the spread and stack intervals of the reference.
/// Both bounds are strict.
fn is_companion(
    reference: &Trackfile,
    candidate: &Trackfile,
    category: PlatformClass,
    spread_meters: f64,
    stack_feet: f64,
) -> bool {
    if candidate.contact.coalition != reference.contact.coalition {
        return false;
    }
    if !category.is_compatible(PLATFORMS.class_of(&candidate.contact.platform)) {
        return false;
    }

    let reference_frame = reference.last_known();
    let candidate_frame = candidate.last_known();
    let within_spread =
        haversine_distance_meters(candidate_frame.point, reference_frame.point) < spread_meters;
    let within_stack =
        (candidate_frame.altitude_feet - reference_frame.altitude_feet).abs() < stack_feet;
    within_spread && within_stack
}

/// Distinct spoken platform names across the members, unknown sentinel
/// included. Sorted for stable output; storage order carries no meaning.
fn resolve_platforms(members: &[Trackfile]) -> Vec<String> {
    let names: BTreeSet<String> = members
        .iter()
        .map(|member| PLATFORMS.display_name(&member.contact.platform))
        .collect();
    names.into_iter().collect()
}
