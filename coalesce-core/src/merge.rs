//! The coalescing pass: repeatedly let the lightest active cluster look for a
//! partner inside its activation ball.

use std::ops::ControlFlow;

use tracing::{debug, instrument, trace};

use crate::{
    cluster::{ClusterArena, ClusterId},
    frontier::{Frontier, Origin},
    ordering::ClusterOrdering,
    site::{SiteArena, SiteRecord},
};

/// Weight a site presents to an exploring cluster.
///
/// Sites below unit radius present their own radius, so they can never be
/// picked up at distance one or more. Every other site presents the weight of
/// the cluster that currently owns it.
pub(crate) fn admission_weight<S>(record: &SiteRecord<S>, clusters: &ClusterArena) -> f64 {
    if record.radius < 1.0 {
        record.radius
    } else {
        clusters.live(record.cluster).weight
    }
}

/// Totals of one coalescing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct MergeReport {
    pub(crate) merges: usize,
    pub(crate) deactivations: usize,
}

enum Step {
    Merged,
    Deactivated,
}

pub(crate) struct Merger<'a, S> {
    sites: &'a mut SiteArena<S>,
    clusters: &'a mut ClusterArena,
    frontier: &'a mut Frontier,
    active: ClusterOrdering,
}

impl<'a, S> Merger<'a, S> {
    /// Starts a pass with every live cluster active.
    pub(crate) fn new(
        sites: &'a mut SiteArena<S>,
        clusters: &'a mut ClusterArena,
        frontier: &'a mut Frontier,
    ) -> Self {
        let active = clusters.iter().map(|record| record.key()).collect();
        Self {
            sites,
            clusters,
            frontier,
            active,
        }
    }

    /// Runs until at most one cluster is still active.
    #[instrument(
        name = "core.cmp.merge",
        level = "debug",
        skip_all,
        fields(active = self.active.len())
    )]
    pub(crate) fn run(mut self) -> MergeReport {
        let mut report = MergeReport::default();
        while self.active.len() > 1 {
            match self.step() {
                Step::Merged => report.merges += 1,
                Step::Deactivated => report.deactivations += 1,
            }
        }

        #[cfg(feature = "metrics")]
        {
            metrics::counter!("cmp_merges").increment(report.merges as u64);
            metrics::counter!("cmp_deactivations").increment(report.deactivations as u64);
        }
        debug!(
            merges = report.merges,
            deactivations = report.deactivations,
            "coalescing finished"
        );
        report
    }

    fn step(&mut self) -> Step {
        let Some(smallest) = self.active.first() else {
            unreachable!("the pass only steps while clusters are active");
        };
        if smallest.weight < 1.0 {
            self.active.remove(&smallest);
            return Step::Deactivated;
        }

        let first = self.clusters.live(smallest.id).first;
        let clusters = &*self.clusters;
        let partner = self.frontier.explore(
            &mut *self.sites,
            Origin::Boundary(first),
            Some(smallest.weight),
            |sites, site, distance| {
                let record = sites.record(site);
                #[expect(
                    clippy::cast_precision_loss,
                    reason = "distances are bounded by the component size"
                )]
                let reach = distance as f64;
                if admission_weight(record, clusters) >= reach {
                    ControlFlow::Break((record.cluster, distance))
                } else {
                    ControlFlow::Continue(())
                }
            },
        );

        match partner {
            Some((other, distance)) => {
                #[cfg(feature = "metrics")]
                {
                    #[expect(
                        clippy::cast_precision_loss,
                        reason = "distances are bounded by the component size"
                    )]
                    let depth = distance as f64;
                    metrics::histogram!("cmp_merge_search_depth").record(depth);
                }
                trace!(cluster = %smallest.id, partner = %other, distance, "partner found");
                self.merge(smallest.id, other);
                Step::Merged
            }
            None => {
                trace!(cluster = %smallest.id, "no partner within reach");
                self.active.remove(&smallest);
                Step::Deactivated
            }
        }
    }

    /// Fuses `explorer` and `found`; returns the survivor.
    ///
    /// The strictly larger cluster survives, so on equal sizes `found` keeps its
    /// identity. The absorbed chain is spliced after the survivor's tail and
    /// the survivor re-enters the active set even if `found` had been
    /// deactivated earlier.
    fn merge(&mut self, explorer: ClusterId, found: ClusterId) -> ClusterId {
        assert_ne!(explorer, found, "a cluster never finds itself");
        let explorer_key = self.clusters.live(explorer).key();
        let found_key = self.clusters.live(found).key();
        self.active.remove(&explorer_key);
        self.active.remove(&found_key);

        let (survivor, absorbed) = if explorer_key.size > found_key.size {
            (explorer, found)
        } else {
            (found, explorer)
        };
        let absorbed = self.clusters.retire(absorbed);
        let tail = self.clusters.live(survivor).last;

        self.sites.record_mut(tail).next = Some(absorbed.first);
        self.sites.record_mut(absorbed.first).prev = Some(tail);
        let mut cursor = Some(absorbed.first);
        while let Some(site) = cursor {
            let record = self.sites.record_mut(site);
            record.cluster = survivor;
            cursor = record.next;
        }

        let record = self.clusters.live_mut(survivor);
        record.weight += absorbed.weight;
        record.size += absorbed.size;
        record.last = absorbed.last;
        self.active.insert(record.key());
        survivor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{AdjacencyGraph, test_utils::path};

    fn arenas(graph: &AdjacencyGraph) -> (SiteArena<usize>, ClusterArena) {
        let sites = SiteArena::discover(graph, 0, None).expect("discovery succeeds");
        let clusters = ClusterArena::singletons(&sites);
        (sites, clusters)
    }

    fn members(sites: &SiteArena<usize>, clusters: &ClusterArena, id: usize) -> Vec<usize> {
        let record = clusters.live(ClusterId::new(id));
        sites
            .chain(record.first)
            .map(|site| sites.record(site).handle)
            .collect()
    }

    #[test]
    fn equal_sizes_keep_the_found_cluster() {
        let graph = path(&[1.0, 1.0]);
        let (mut sites, mut clusters) = arenas(&graph);
        let mut frontier = Frontier::default();
        let report = Merger::new(&mut sites, &mut clusters, &mut frontier).run();

        assert_eq!(report, MergeReport { merges: 1, deactivations: 0 });
        assert!(clusters.get(ClusterId::new(0)).is_none());
        let survivor = clusters.live(ClusterId::new(1));
        assert_eq!((survivor.weight, survivor.size), (2.0, 2));
        assert_eq!(members(&sites, &clusters, 1), vec![1, 0]);
    }

    #[test]
    fn larger_explorer_survives_and_relinks_members() {
        let graph = path(&[1.0, 1.0, 1.0, 5.0]);
        let (mut sites, mut clusters) = arenas(&graph);
        let mut frontier = Frontier::default();
        Merger::new(&mut sites, &mut clusters, &mut frontier).run();

        let live: Vec<_> = clusters.iter().map(|record| record.id).collect();
        assert_eq!(live.len(), 1);
        let record = clusters.live(live[0]);
        assert_eq!(record.size, 4);
        assert!((record.weight - 8.0).abs() < f64::EPSILON);
        for site in sites.indices() {
            assert_eq!(sites.record(site).cluster, live[0]);
        }
    }

    #[test]
    fn light_sites_are_deactivated_without_merging() {
        let graph = path(&[0.0, 0.5, 0.0]);
        let (mut sites, mut clusters) = arenas(&graph);
        let mut frontier = Frontier::default();
        let report = Merger::new(&mut sites, &mut clusters, &mut frontier).run();

        assert_eq!(report, MergeReport { merges: 0, deactivations: 2 });
        assert_eq!(clusters.iter().count(), 3);
    }

    #[test]
    fn light_neighbours_are_never_admitted() {
        let graph = path(&[3.0, 0.0, 3.0]);
        let (sites, clusters) = arenas(&graph);
        let light = sites.find(1).expect("site 1 is discovered");
        assert!(admission_weight(sites.record(light), &clusters) < 1.0);
    }
}
