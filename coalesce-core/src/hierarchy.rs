//! Parent/child links between the clusters left after coalescing.
//!
//! A cluster of weight `w >= 1` is the parent of every other cluster that owns
//! a site within distance `w` of any of its members. Clusters are linked in
//! ascending key order and a parent's height is one more than the tallest child
//! processed before it; children that come later in the order contribute the
//! height they carry at that moment, which is zero.

use std::{collections::BTreeSet, ops::ControlFlow};

use tracing::{debug, instrument};

use crate::{
    cluster::{ClusterArena, ClusterKey},
    frontier::{Frontier, Origin},
    ordering::ClusterOrdering,
    site::SiteArena,
};

/// Links every cluster in `ordering` and returns the absolute height.
#[instrument(
    name = "core.cmp.hierarchy",
    level = "debug",
    skip_all,
    fields(clusters = ordering.len())
)]
pub(crate) fn link<S>(
    sites: &mut SiteArena<S>,
    clusters: &mut ClusterArena,
    frontier: &mut Frontier,
    ordering: &ClusterOrdering,
) -> usize {
    let mut absolute_height = 0;
    let mut links = 0;
    for id in ordering.ids() {
        let record = clusters.live(id);
        if record.weight < 1.0 {
            continue;
        }
        let (first, weight) = (record.first, record.weight);

        let mut children = BTreeSet::<ClusterKey>::new();
        let view = &*clusters;
        let _: Option<()> =
            frontier.explore(sites, Origin::Chain(first), Some(weight), |arena, site, _| {
                let owner = arena.record(site).cluster;
                if owner != id {
                    children.insert(view.live(owner).key());
                }
                ControlFlow::Continue(())
            });

        let height = children
            .iter()
            .map(|child| clusters.live(child.id).height + 1)
            .max()
            .unwrap_or(0);
        for child in &children {
            clusters.live_mut(child.id).parents.push(id);
        }
        links += children.len();

        let record = clusters.live_mut(id);
        record.children = children.into_iter().map(|child| child.id).collect();
        record.height = height;
        absolute_height = absolute_height.max(height);
    }
    debug!(links, absolute_height, "hierarchy linked");
    absolute_height
}
