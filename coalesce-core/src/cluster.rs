//! Cluster records, their identities and the read-only cluster view.

use std::{cmp::Ordering, fmt};

use crate::site::{Chain, SiteArena, SiteIndex};

/// Stable identifier of a cluster.
///
/// Ids are handed out once per discovered site (the singleton cluster of the
/// `n`-th discovered site has id `n`). When two clusters merge, the survivor
/// keeps its id and the absorbed id is retired for good.
///
/// # Examples
/// ```
/// use coalesce_core::ClusterId;
///
/// let id = ClusterId::new(4);
/// assert_eq!(id.get(), 4);
/// assert_eq!(id.to_string(), "#4");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(usize);

impl ClusterId {
    /// Creates a cluster identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(id: usize) -> Self { Self(id) }

    /// Returns the underlying numeric identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> usize { self.0 }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Classification of a cluster by weight and size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClusterKind {
    /// A single site whose weight is below `1.0`; it can never merge.
    Trivial,
    /// A single site of weight at least `1.0` that found no partner.
    Isolated,
    /// Two or more sites.
    Compound,
}

impl ClusterKind {
    pub(crate) fn classify(weight: f64, size: usize) -> Self {
        if size > 1 {
            Self::Compound
        } else if weight < 1.0 {
            Self::Trivial
        } else {
            Self::Isolated
        }
    }
}

/// Ordering key of a cluster: weight, then size, then id.
///
/// The key is a snapshot. A cluster must be taken out of any ordered set
/// before its weight or size changes and put back afterwards.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ClusterKey {
    pub(crate) weight: f64,
    pub(crate) size: usize,
    pub(crate) id: ClusterId,
}

impl PartialEq for ClusterKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ClusterKey {}

impl Ord for ClusterKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .total_cmp(&other.weight)
            .then_with(|| self.size.cmp(&other.size))
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for ClusterKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ClusterRecord {
    pub(crate) id: ClusterId,
    pub(crate) weight: f64,
    pub(crate) size: usize,
    pub(crate) first: SiteIndex,
    pub(crate) last: SiteIndex,
    pub(crate) children: Vec<ClusterId>,
    pub(crate) parents: Vec<ClusterId>,
    pub(crate) height: usize,
}

impl ClusterRecord {
    fn singleton(id: ClusterId, site: SiteIndex, radius: f64) -> Self {
        Self {
            id,
            weight: radius,
            size: 1,
            first: site,
            last: site,
            children: Vec::new(),
            parents: Vec::new(),
            height: 0,
        }
    }

    pub(crate) fn key(&self) -> ClusterKey {
        ClusterKey {
            weight: self.weight,
            size: self.size,
            id: self.id,
        }
    }

    pub(crate) fn kind(&self) -> ClusterKind {
        ClusterKind::classify(self.weight, self.size)
    }
}

/// Slot arena of clusters indexed by [`ClusterId`]. Absorbed clusters leave an
/// empty slot behind.
#[derive(Debug, Clone, Default)]
pub(crate) struct ClusterArena {
    slots: Vec<Option<ClusterRecord>>,
}

impl ClusterArena {
    /// One singleton cluster per site, with ids matching site indices.
    pub(crate) fn singletons<S>(sites: &SiteArena<S>) -> Self {
        let slots = sites
            .indices()
            .map(|site| {
                let record = sites.record(site);
                Some(ClusterRecord::singleton(record.cluster, site, record.radius))
            })
            .collect();
        Self { slots }
    }

    pub(crate) fn get(&self, id: ClusterId) -> Option<&ClusterRecord> {
        self.slots.get(id.get()).and_then(Option::as_ref)
    }

    /// # Panics
    /// Panics when `id` names an absorbed cluster; the engine only holds live
    /// ids.
    pub(crate) fn live(&self, id: ClusterId) -> &ClusterRecord {
        self.get(id)
            .unwrap_or_else(|| panic!("cluster {id} must still be live"))
    }

    /// # Panics
    /// Panics when `id` names an absorbed cluster.
    pub(crate) fn live_mut(&mut self, id: ClusterId) -> &mut ClusterRecord {
        self.slots
            .get_mut(id.get())
            .and_then(Option::as_mut)
            .unwrap_or_else(|| panic!("cluster {id} must still be live"))
    }

    /// Destroys the record of an absorbed cluster and returns it.
    ///
    /// # Panics
    /// Panics when `id` was already absorbed.
    pub(crate) fn retire(&mut self, id: ClusterId) -> ClusterRecord {
        self.slots
            .get_mut(id.get())
            .and_then(Option::take)
            .unwrap_or_else(|| panic!("cluster {id} cannot be retired twice"))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &ClusterRecord> {
        self.slots.iter().flatten()
    }
}

/// Read-only view of one cluster of a computed [`crate::Cmp`].
pub struct Cluster<'a, S> {
    record: &'a ClusterRecord,
    sites: &'a SiteArena<S>,
}

impl<S> Clone for Cluster<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for Cluster<'_, S> {}

impl<'a, S: Copy> Cluster<'a, S> {
    pub(crate) fn new(record: &'a ClusterRecord, sites: &'a SiteArena<S>) -> Self {
        Self { record, sites }
    }

    /// Identifier of the cluster.
    #[must_use]
    pub fn id(&self) -> ClusterId {
        self.record.id
    }

    /// Sum of the radii of the member sites.
    #[must_use]
    pub fn weight(&self) -> f64 {
        self.record.weight
    }

    /// Number of member sites.
    #[must_use]
    pub fn size(&self) -> usize {
        self.record.size
    }

    /// Length of the longest descending chain below this cluster.
    #[must_use]
    pub fn height(&self) -> usize {
        self.record.height
    }

    /// Whether the cluster is trivial, isolated or compound.
    #[must_use]
    pub fn kind(&self) -> ClusterKind {
        self.record.kind()
    }

    /// Head of the membership chain.
    #[must_use]
    pub fn first_site(&self) -> S {
        self.sites.record(self.record.first).handle
    }

    /// Tail of the membership chain.
    #[must_use]
    pub fn last_site(&self) -> S {
        self.sites.record(self.record.last).handle
    }

    /// Member sites in chain order (splice order, not spatial order).
    pub fn sites(&self) -> ClusterSites<'a, S> {
        ClusterSites {
            chain: self.sites.chain(self.record.first),
            sites: self.sites,
        }
    }

    /// Clusters found inside this cluster's activation ball, in ascending
    /// (weight, size, id) order.
    #[must_use]
    pub fn children(&self) -> &'a [ClusterId] {
        &self.record.children
    }

    /// Clusters whose activation ball contains this cluster.
    #[must_use]
    pub fn parents(&self) -> &'a [ClusterId] {
        &self.record.parents
    }
}

impl<S: Copy + fmt::Debug> fmt::Debug for Cluster<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cluster")
            .field("id", &self.id())
            .field("weight", &self.weight())
            .field("size", &self.size())
            .field("height", &self.height())
            .field("first", &self.first_site())
            .finish_non_exhaustive()
    }
}

/// Iterator over the member sites of a [`Cluster`].
pub struct ClusterSites<'a, S> {
    chain: Chain<'a, S>,
    sites: &'a SiteArena<S>,
}

impl<S: Copy> Iterator for ClusterSites<'_, S> {
    type Item = S;

    fn next(&mut self) -> Option<S> {
        self.chain.next().map(|site| self.sites.record(site).handle)
    }
}
