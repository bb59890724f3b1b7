//! Ordered set of clusters keyed by (weight, size, id).

use std::collections::BTreeSet;

use crate::cluster::{ClusterId, ClusterKey};

#[derive(Debug, Clone, Default)]
pub(crate) struct ClusterOrdering {
    keys: BTreeSet<ClusterKey>,
}

impl ClusterOrdering {
    pub(crate) fn insert(&mut self, key: ClusterKey) {
        let inserted = self.keys.insert(key);
        debug_assert!(inserted, "cluster {} is already ordered", key.id);
    }

    /// Removes `key`; returns `false` when it was not ordered.
    pub(crate) fn remove(&mut self, key: &ClusterKey) -> bool {
        self.keys.remove(key)
    }

    /// The smallest cluster, if any.
    pub(crate) fn first(&self) -> Option<ClusterKey> {
        self.keys.first().copied()
    }

    /// The largest cluster, if any.
    pub(crate) fn last(&self) -> Option<ClusterKey> {
        self.keys.last().copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn ids(&self) -> impl DoubleEndedIterator<Item = ClusterId> + '_ {
        self.keys.iter().map(|key| key.id)
    }
}

impl FromIterator<ClusterKey> for ClusterOrdering {
    fn from_iter<I: IntoIterator<Item = ClusterKey>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}
