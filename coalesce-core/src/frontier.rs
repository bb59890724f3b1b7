//! Double-buffered breadth-first frontier with episode tags.
//!
//! A site counts as seen in the current episode iff its tag equals the
//! frontier's counter, so starting an episode is a single increment instead
//! of a sweep over every site.

use std::ops::ControlFlow;

use crate::site::{SiteArena, SiteIndex};

/// Where an exploration starts.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Origin {
    /// A single site, at distance 0.
    Site(SiteIndex),
    /// Every member of the chain starting at the given site, at distance 0.
    Chain(SiteIndex),
    /// The sites adjacent to the chain but outside it, at distance 1. The
    /// chain itself is tagged and never visited.
    Boundary(SiteIndex),
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Frontier {
    current: Vec<SiteIndex>,
    next: Vec<SiteIndex>,
    tag: u64,
}

impl Frontier {
    /// Opens a new episode and returns its tag.
    pub(crate) fn begin(&mut self) -> u64 {
        self.tag += 1;
        self.current.clear();
        self.next.clear();
        self.tag
    }

    /// Visits sites at increasing distance from `origin`.
    ///
    /// Sites at distance `d` are visited in frontier order and only expanded
    /// when `d + 1` still lies within `radius`; `None` means unbounded. The
    /// visitor may stop the exploration early by breaking.
    pub(crate) fn explore<S, B>(
        &mut self,
        sites: &mut SiteArena<S>,
        origin: Origin,
        radius: Option<f64>,
        mut visit: impl FnMut(&SiteArena<S>, SiteIndex, u64) -> ControlFlow<B>,
    ) -> Option<B> {
        let tag = self.begin();
        let mut distance = match origin {
            Origin::Site(site) => {
                sites.mark(site, tag);
                self.current.push(site);
                0
            }
            Origin::Chain(first) => {
                self.seed_chain(sites, first, tag);
                0
            }
            Origin::Boundary(first) => {
                self.seed_chain(sites, first, tag);
                for idx in 0..self.current.len() {
                    let site = self.current[idx];
                    self.expand(sites, site, tag);
                }
                self.swap();
                1
            }
        };

        while !self.current.is_empty() && within(distance, radius) {
            let expand = within(distance + 1, radius);
            for idx in 0..self.current.len() {
                let site = self.current[idx];
                if let ControlFlow::Break(found) = visit(sites, site, distance) {
                    return Some(found);
                }
                if expand {
                    self.expand(sites, site, tag);
                }
            }
            self.swap();
            distance += 1;
        }
        None
    }

    fn seed_chain<S>(&mut self, sites: &mut SiteArena<S>, first: SiteIndex, tag: u64) {
        let mut cursor = Some(first);
        while let Some(site) = cursor {
            sites.mark(site, tag);
            self.current.push(site);
            cursor = sites.record(site).next;
        }
    }

    fn expand<S>(&mut self, sites: &mut SiteArena<S>, site: SiteIndex, tag: u64) {
        for slot in sites.neighbour_range(site) {
            let neighbour = sites.neighbour_at(slot);
            if sites.mark(neighbour, tag) {
                self.next.push(neighbour);
            }
        }
    }

    fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
        self.next.clear();
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "distances are bounded by the component size"
)]
fn within(distance: u64, radius: Option<f64>) -> bool {
    radius.is_none_or(|radius| distance as f64 <= radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    use crate::test_utils::path;

    /// Path 0 - 1 - 2 - 3 - 4 discovered from site 0, so index == handle.
    fn path_arena() -> SiteArena<usize> {
        SiteArena::discover(&path(&[1.0; 5]), 0, None).expect("discovery succeeds")
    }

    fn collect(
        frontier: &mut Frontier,
        sites: &mut SiteArena<usize>,
        origin: Origin,
        radius: Option<f64>,
    ) -> Vec<(usize, u64)> {
        let mut seen = Vec::new();
        let stopped: Option<()> = frontier.explore(sites, origin, radius, |arena, site, d| {
            seen.push((arena.record(site).handle, d));
            ControlFlow::Continue(())
        });
        assert!(stopped.is_none());
        seen
    }

    #[rstest]
    #[case(Some(0.0), vec![(0, 0)])]
    #[case(Some(2.0), vec![(0, 0), (1, 1), (2, 2)])]
    #[case(Some(2.9), vec![(0, 0), (1, 1), (2, 2)])]
    #[case(None, vec![(0, 0), (1, 1), (2, 2), (3, 3), (4, 4)])]
    fn single_site_origin_respects_radius(
        #[case] radius: Option<f64>,
        #[case] expected: Vec<(usize, u64)>,
    ) {
        let mut sites = path_arena();
        let mut frontier = Frontier::default();
        let seen = collect(&mut frontier, &mut sites, Origin::Site(SiteIndex::ROOT), radius);
        assert_eq!(seen, expected);
    }

    #[test]
    fn boundary_origin_starts_at_distance_one() {
        let mut sites = path_arena();
        let mut frontier = Frontier::default();
        let seen = collect(
            &mut frontier,
            &mut sites,
            Origin::Boundary(SiteIndex::ROOT),
            Some(2.0),
        );
        assert_eq!(seen, vec![(1, 1), (2, 2)]);
    }

    #[test]
    fn boundary_origin_below_unit_radius_visits_nothing() {
        let mut sites = path_arena();
        let mut frontier = Frontier::default();
        let seen = collect(
            &mut frontier,
            &mut sites,
            Origin::Boundary(SiteIndex::ROOT),
            Some(0.5),
        );
        assert!(seen.is_empty());
    }

    #[test]
    fn episodes_do_not_leak_tags() {
        let mut sites = path_arena();
        let mut frontier = Frontier::default();
        let first = collect(&mut frontier, &mut sites, Origin::Site(SiteIndex::ROOT), None);
        let second = collect(&mut frontier, &mut sites, Origin::Site(SiteIndex::ROOT), None);
        assert_eq!(first, second);
    }

    #[test]
    fn visitor_can_stop_early() {
        let mut sites = path_arena();
        let mut frontier = Frontier::default();
        let found = frontier.explore(
            &mut sites,
            Origin::Site(SiteIndex::ROOT),
            None,
            |arena, site, d| {
                if d == 3 {
                    ControlFlow::Break(arena.record(site).handle)
                } else {
                    ControlFlow::Continue(())
                }
            },
        );
        assert_eq!(found, Some(3));
    }
}
