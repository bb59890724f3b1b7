//! Per-site decoration and the discovery pass that builds it.
//!
//! Sites belong to the embedding graph. The engine keeps one [`SiteRecord`]
//! per discovered site in a dense arena indexed by [`SiteIndex`] (discovery
//! order), together with a compressed copy of the adjacency so traversals
//! never call back into the graph.

use std::{collections::HashMap, ops::Range, sync::Arc};

use tracing::{debug, instrument, warn};

use crate::{
    cluster::ClusterId,
    error::{CmpError, Result},
    graph::{WeightedGraph, is_valid_radius},
};

/// Dense index of a discovered site. The root is always index `0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct SiteIndex(usize);

impl SiteIndex {
    pub(crate) const ROOT: Self = Self(0);

    pub(crate) fn get(self) -> usize {
        self.0
    }
}

/// Decoration attached to one site.
#[derive(Clone, Debug)]
pub(crate) struct SiteRecord<S> {
    pub(crate) handle: S,
    pub(crate) radius: f64,
    neighbours: Range<usize>,
    /// Episode stamp; equal to the frontier's tag iff seen this episode.
    pub(crate) tag: u64,
    pub(crate) cluster: ClusterId,
    pub(crate) next: Option<SiteIndex>,
    pub(crate) prev: Option<SiteIndex>,
}

#[derive(Clone, Debug)]
pub(crate) struct SiteArena<S> {
    records: Vec<SiteRecord<S>>,
    adjacency: Vec<SiteIndex>,
    lookup: HashMap<S, SiteIndex>,
}

impl<S> SiteArena<S>
where
    S: Copy + Eq + std::hash::Hash + std::fmt::Debug,
{
    /// Breadth-first discovery of the component containing `root`.
    ///
    /// Every discovered site receives the singleton cluster whose id equals
    /// its own index.
    #[instrument(name = "core.cmp.discover", level = "debug", skip(graph, root))]
    pub(crate) fn discover<G>(graph: &G, root: S, limit: Option<usize>) -> Result<Self>
    where
        G: WeightedGraph<Site = S> + ?Sized,
    {
        let mut arena = Self {
            records: Vec::new(),
            adjacency: Vec::new(),
            lookup: HashMap::new(),
        };
        arena.admit(graph, root, limit)?;

        // The records vector doubles as the BFS queue: discovery order is
        // level order, so scanning it front to back visits distance 0, 1, ...
        let mut cursor = 0;
        while cursor < arena.records.len() {
            let handle = arena.records[cursor].handle;
            let start = arena.adjacency.len();
            for k in 0..graph.neighbour_count(handle) {
                let neighbour = graph.neighbour(handle, k);
                let index = match arena.lookup.get(&neighbour) {
                    Some(&index) => index,
                    None => arena.admit(graph, neighbour, limit)?,
                };
                arena.adjacency.push(index);
            }
            arena.records[cursor].neighbours = start..arena.adjacency.len();
            cursor += 1;
        }

        #[cfg(feature = "metrics")]
        metrics::counter!("cmp_sites_discovered").increment(arena.records.len() as u64);
        debug!(
            sites = arena.records.len(),
            edges = arena.adjacency.len(),
            "component discovered"
        );
        Ok(arena)
    }

    fn admit<G>(&mut self, graph: &G, handle: S, limit: Option<usize>) -> Result<SiteIndex>
    where
        G: WeightedGraph<Site = S> + ?Sized,
    {
        if let Some(limit) = limit
            && self.records.len() >= limit
        {
            warn!(limit, "site limit reached during discovery");
            return Err(CmpError::SiteLimitExceeded { limit });
        }
        let radius = graph.radius(handle);
        if !is_valid_radius(radius) {
            return Err(CmpError::InvalidRadius {
                site: Arc::from(format!("{handle:?}")),
                radius,
            });
        }
        let index = SiteIndex(self.records.len());
        self.records.push(SiteRecord {
            handle,
            radius,
            neighbours: 0..0,
            tag: 0,
            cluster: ClusterId::new(index.get()),
            next: None,
            prev: None,
        });
        self.lookup.insert(handle, index);
        Ok(index)
    }

    pub(crate) fn find(&self, handle: S) -> Option<SiteIndex> {
        self.lookup.get(&handle).copied()
    }
}

impl<S> SiteArena<S> {
    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn indices(&self) -> impl Iterator<Item = SiteIndex> + '_ {
        (0..self.records.len()).map(SiteIndex)
    }

    pub(crate) fn record(&self, site: SiteIndex) -> &SiteRecord<S> {
        &self.records[site.get()]
    }

    pub(crate) fn record_mut(&mut self, site: SiteIndex) -> &mut SiteRecord<S> {
        &mut self.records[site.get()]
    }

    pub(crate) fn neighbour_range(&self, site: SiteIndex) -> Range<usize> {
        self.records[site.get()].neighbours.clone()
    }

    pub(crate) fn neighbour_at(&self, slot: usize) -> SiteIndex {
        self.adjacency[slot]
    }

    /// Stamps `site` with `tag`; returns `false` when it already carried it.
    pub(crate) fn mark(&mut self, site: SiteIndex, tag: u64) -> bool {
        let record = &mut self.records[site.get()];
        if record.tag == tag {
            return false;
        }
        record.tag = tag;
        true
    }

    /// Walks a membership chain starting at `first`.
    pub(crate) fn chain(&self, first: SiteIndex) -> Chain<'_, S> {
        Chain {
            arena: self,
            cursor: Some(first),
        }
    }
}

/// Iterator over a cluster's membership chain.
pub(crate) struct Chain<'a, S> {
    arena: &'a SiteArena<S>,
    cursor: Option<SiteIndex>,
}

impl<S> Iterator for Chain<'_, S> {
    type Item = SiteIndex;

    fn next(&mut self) -> Option<SiteIndex> {
        let current = self.cursor?;
        self.cursor = self.arena.record(current).next;
        Some(current)
    }
}
