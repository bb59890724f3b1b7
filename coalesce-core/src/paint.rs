//! Paint channels decorating each site, the jet palette and the painting
//! operations of a computed [`Cmp`].
//!
//! Colours use premultiplied alpha and are composited with the "over"
//! operator. Painting never touches the clustering state.

use std::ops::ControlFlow;

use crate::{
    cluster::{ClusterId, ClusterRecord},
    cmp::Cmp,
    error::{CmpError, Result},
    frontier::Origin,
    site::SiteIndex,
};

/// A colour with premultiplied alpha.
///
/// # Examples
/// ```
/// use coalesce_core::Rgba;
///
/// let red = Rgba::opaque(255, 0, 0);
/// assert_eq!(red.over(Rgba::opaque(0, 0, 255)), red);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba {
    /// Red component.
    pub r: u8,
    /// Green component.
    pub g: u8,
    /// Blue component.
    pub b: u8,
    /// Alpha component; `255` is opaque.
    pub a: u8,
}

impl Rgba {
    /// The colour every paint channel starts with.
    pub const TRANSPARENT_WHITE: Self = Self::new(255, 255, 255, 0);

    /// Creates a colour from its components.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a fully opaque colour.
    #[rustfmt::skip]
    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self { Self::new(r, g, b, 255) }

    /// Composites `self` on top of `bottom`.
    ///
    /// Each component becomes `top + bottom * (1 - top.a / 255)`, computed in
    /// fixed point with a 256 scale and saturated at `255`.
    #[must_use]
    pub fn over(self, bottom: Self) -> Self {
        let alpha = u32::from(self.a);
        let keep = 0x100 - (alpha + ((alpha & 0x80) >> 7));
        let channel = |top: u8, under: u8| {
            let value = u32::from(top) + ((u32::from(under) * keep) >> 8);
            u8::try_from(value).unwrap_or(u8::MAX)
        };
        Self {
            r: channel(self.r, bottom.r),
            g: channel(self.g, bottom.g),
            b: channel(self.b, bottom.b),
            a: channel(self.a, bottom.a),
        }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::TRANSPARENT_WHITE
    }
}

const JET: [Rgba; 72] = [
    Rgba::opaque(0, 0, 127),
    Rgba::opaque(0, 0, 141),
    Rgba::opaque(0, 0, 155),
    Rgba::opaque(0, 0, 169),
    Rgba::opaque(0, 0, 183),
    Rgba::opaque(0, 0, 198),
    Rgba::opaque(0, 0, 212),
    Rgba::opaque(0, 0, 226),
    Rgba::opaque(0, 0, 240),
    Rgba::opaque(0, 0, 255),
    Rgba::opaque(0, 14, 255),
    Rgba::opaque(0, 28, 255),
    Rgba::opaque(0, 42, 255),
    Rgba::opaque(0, 56, 255),
    Rgba::opaque(0, 70, 255),
    Rgba::opaque(0, 84, 255),
    Rgba::opaque(0, 98, 255),
    Rgba::opaque(0, 112, 255),
    Rgba::opaque(0, 127, 255),
    Rgba::opaque(0, 141, 255),
    Rgba::opaque(0, 155, 255),
    Rgba::opaque(0, 169, 255),
    Rgba::opaque(0, 183, 255),
    Rgba::opaque(0, 198, 255),
    Rgba::opaque(0, 212, 255),
    Rgba::opaque(0, 226, 255),
    Rgba::opaque(0, 240, 255),
    Rgba::opaque(0, 255, 255),
    Rgba::opaque(14, 255, 240),
    Rgba::opaque(28, 255, 226),
    Rgba::opaque(42, 255, 212),
    Rgba::opaque(56, 255, 198),
    Rgba::opaque(70, 255, 183),
    Rgba::opaque(84, 255, 169),
    Rgba::opaque(98, 255, 155),
    Rgba::opaque(112, 255, 141),
    Rgba::opaque(127, 255, 127),
    Rgba::opaque(141, 255, 112),
    Rgba::opaque(155, 255, 98),
    Rgba::opaque(169, 255, 84),
    Rgba::opaque(183, 255, 70),
    Rgba::opaque(198, 255, 56),
    Rgba::opaque(212, 255, 42),
    Rgba::opaque(226, 255, 28),
    Rgba::opaque(240, 255, 14),
    Rgba::opaque(255, 255, 0),
    Rgba::opaque(255, 240, 0),
    Rgba::opaque(255, 226, 0),
    Rgba::opaque(255, 212, 0),
    Rgba::opaque(255, 198, 0),
    Rgba::opaque(255, 183, 0),
    Rgba::opaque(255, 169, 0),
    Rgba::opaque(255, 155, 0),
    Rgba::opaque(255, 141, 0),
    Rgba::opaque(255, 127, 0),
    Rgba::opaque(255, 112, 0),
    Rgba::opaque(255, 98, 0),
    Rgba::opaque(255, 84, 0),
    Rgba::opaque(255, 70, 0),
    Rgba::opaque(255, 56, 0),
    Rgba::opaque(255, 42, 0),
    Rgba::opaque(255, 28, 0),
    Rgba::opaque(255, 14, 0),
    Rgba::opaque(255, 0, 0),
    Rgba::opaque(240, 0, 0),
    Rgba::opaque(226, 0, 0),
    Rgba::opaque(212, 0, 0),
    Rgba::opaque(198, 0, 0),
    Rgba::opaque(183, 0, 0),
    Rgba::opaque(169, 0, 0),
    Rgba::opaque(155, 0, 0),
    Rgba::opaque(141, 0, 0),
];

/// Maps `value` in `[0, 1]` onto the 72-step jet palette, from dark blue to
/// dark red. Out-of-range values clamp to the ends.
///
/// # Examples
/// ```
/// use coalesce_core::{Rgba, jet};
///
/// assert_eq!(jet(0.0), Rgba::opaque(0, 0, 127));
/// assert_eq!(jet(1.0), Rgba::opaque(141, 0, 0));
/// assert_eq!(jet(-3.0), jet(0.0));
/// ```
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the index is clamped to the palette before the cast"
)]
pub fn jet(value: f64) -> Rgba {
    let index = (72.0 * value).floor().clamp(0.0, 71.0);
    // NaN falls through the clamp and saturates to 0.
    JET[index as usize]
}

/// Maps `value` onto the jet palette relative to the range `[low, high]`.
///
/// Bounds are swapped when given in the wrong order. A degenerate range maps
/// values below it to the first colour, values above it to the last and the
/// value itself to the middle.
#[must_use]
#[expect(
    clippy::cast_precision_loss,
    reason = "palette positions only need 72 distinct steps"
)]
pub fn jet_between(value: u64, low: u64, high: u64) -> Rgba {
    let (low, high) = if high < low { (high, low) } else { (low, high) };
    if high == low {
        return match value.cmp(&low) {
            std::cmp::Ordering::Less => jet(0.0),
            std::cmp::Ordering::Greater => jet(1.0),
            std::cmp::Ordering::Equal => jet(0.5),
        };
    }
    jet((value as f64 - low as f64) / (high - low) as f64)
}

/// Quantity used by [`Cmp::colour_for`] to pick a palette entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColourScale {
    /// Size, from `1` to the size of the largest cluster.
    Size,
    /// Size, from `1` to the size of the second largest cluster.
    SecondSize,
    /// Weight relative to the weight of the largest cluster.
    Weight,
    /// Weight relative to the weight of the second largest cluster.
    SecondWeight,
    /// Height, from `0` to the height of the largest cluster.
    Height,
}

/// Per-site colour slots, `channels` of them per site.
#[derive(Clone, Debug)]
pub(crate) struct PaintLayer {
    channels: usize,
    colours: Vec<Rgba>,
}

impl PaintLayer {
    pub(crate) fn new(sites: usize, channels: usize) -> Self {
        Self {
            channels,
            colours: vec![Rgba::TRANSPARENT_WHITE; sites * channels],
        }
    }

    pub(crate) fn channels(&self) -> usize {
        self.channels
    }

    pub(crate) fn check(&self, channel: usize) -> Result<()> {
        if channel < self.channels {
            Ok(())
        } else {
            Err(CmpError::ChannelOutOfRange {
                channel,
                channels: self.channels,
            })
        }
    }

    pub(crate) fn get(&self, site: SiteIndex, channel: usize) -> Rgba {
        self.colours[site.get() * self.channels + channel]
    }

    pub(crate) fn blend(&mut self, site: SiteIndex, channel: usize, colour: Rgba) {
        let slot = &mut self.colours[site.get() * self.channels + channel];
        *slot = colour.over(*slot);
    }
}

impl<S> Cmp<S>
where
    S: Copy + Eq + std::hash::Hash + std::fmt::Debug,
{
    /// Colour stored in `channel` of `site`.
    ///
    /// # Errors
    /// Returns [`CmpError::UnknownSite`] when `site` is outside the computed
    /// component and [`CmpError::ChannelOutOfRange`] for a bad channel.
    pub fn paint(&self, site: S, channel: usize) -> Result<Rgba> {
        let index = self.index_of(site)?;
        self.paint.check(channel)?;
        Ok(self.paint.get(index, channel))
    }

    /// Composites `colour` over every site of `cluster`.
    ///
    /// # Errors
    /// Returns [`CmpError::UnknownCluster`] or [`CmpError::ChannelOutOfRange`].
    pub fn paint_cluster(&mut self, cluster: ClusterId, colour: Rgba, channel: usize) -> Result<()> {
        let first = self.record_of(cluster)?.first;
        self.paint.check(channel)?;
        let Self { sites, paint, .. } = self;
        for site in sites.chain(first) {
            paint.blend(site, channel, colour);
        }
        Ok(())
    }

    /// Composites `colour` over the activation ball of `cluster`: every site
    /// at distance `1..=floor(weight)` from it, plus the cluster itself when
    /// `include_cluster` is set.
    ///
    /// # Errors
    /// Returns [`CmpError::UnknownCluster`] or [`CmpError::ChannelOutOfRange`].
    pub fn paint_radius(
        &mut self,
        cluster: ClusterId,
        colour: Rgba,
        include_cluster: bool,
        channel: usize,
    ) -> Result<()> {
        let (first, weight) = {
            let record = self.record_of(cluster)?;
            (record.first, record.weight)
        };
        self.paint.check(channel)?;
        if include_cluster {
            self.paint_cluster(cluster, colour, channel)?;
        }
        let Self {
            sites,
            frontier,
            paint,
            ..
        } = self;
        let _: Option<()> =
            frontier.explore(sites, Origin::Boundary(first), Some(weight), |_, site, _| {
                paint.blend(site, channel, colour);
                ControlFlow::Continue(())
            });
        Ok(())
    }

    /// Composites `colour` over every cluster returned by
    /// [`Cmp::descendants`], leaving `cluster` itself untouched unless
    /// `include_cluster` is set.
    ///
    /// # Errors
    /// Returns [`CmpError::UnknownCluster`] or [`CmpError::ChannelOutOfRange`].
    pub fn paint_stabiliser(
        &mut self,
        cluster: ClusterId,
        colour: Rgba,
        include_cluster: bool,
        channel: usize,
    ) -> Result<()> {
        let members = self.descendants(cluster)?;
        self.paint.check(channel)?;
        for member in members {
            if member == cluster && !include_cluster {
                continue;
            }
            self.paint_cluster(member, colour, channel)?;
        }
        Ok(())
    }

    /// Composites `colour` over every site of the component.
    ///
    /// # Errors
    /// Returns [`CmpError::ChannelOutOfRange`] for a bad channel.
    pub fn paint_graph(&mut self, colour: Rgba, channel: usize) -> Result<()> {
        self.paint.check(channel)?;
        let Self {
            sites,
            frontier,
            paint,
            ..
        } = self;
        let root = Origin::Site(SiteIndex::ROOT);
        let _: Option<()> = frontier.explore(sites, root, None, |_, site, _| {
            paint.blend(site, channel, colour);
            ControlFlow::Continue(())
        });
        Ok(())
    }

    /// Palette colour of `cluster` on the given scale.
    ///
    /// # Errors
    /// Returns [`CmpError::UnknownCluster`] when `cluster` does not exist.
    pub fn colour_for(&self, cluster: ClusterId, scale: ColourScale) -> Result<Rgba> {
        let record = self.record_of(cluster)?;
        let summary = self.summary();
        let second = summary.second.unwrap_or_default();
        let colour = match scale {
            ColourScale::Size => jet_between(count(record.size), 1, count(summary.largest.size)),
            ColourScale::SecondSize => jet_between(count(record.size), 1, count(second.size)),
            ColourScale::Weight => relative_weight(record, summary.largest.weight),
            ColourScale::SecondWeight => relative_weight(record, second.weight),
            ColourScale::Height => {
                jet_between(count(record.height), 0, count(summary.largest.height))
            }
        };
        Ok(colour)
    }
}

fn relative_weight(record: &ClusterRecord, reference: f64) -> Rgba {
    let reference = if reference <= 0.0 { 1.0 } else { reference };
    jet(record.weight / reference)
}

fn count(value: usize) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::opaque_top(Rgba::opaque(10, 20, 30), Rgba::opaque(200, 200, 200), Rgba::opaque(10, 20, 30))]
    #[case::clear_top(Rgba::new(0, 0, 0, 0), Rgba::opaque(1, 2, 3), Rgba::opaque(1, 2, 3))]
    #[case::half_top(Rgba::new(64, 0, 0, 128), Rgba::opaque(0, 0, 200), Rgba::new(64, 0, 99, 254))]
    fn over_composites_premultiplied(#[case] top: Rgba, #[case] bottom: Rgba, #[case] expected: Rgba) {
        assert_eq!(top.over(bottom), expected);
    }

    #[test]
    fn over_saturates_non_premultiplied_input() {
        let colour = Rgba::TRANSPARENT_WHITE.over(Rgba::opaque(200, 0, 0));
        assert_eq!(colour, Rgba::opaque(255, 255, 255));
    }

    #[rstest]
    #[case(0.0, 0)]
    #[case(0.5, 36)]
    #[case(0.999, 71)]
    #[case(1.0, 71)]
    #[case(7.0, 71)]
    #[case(-0.2, 0)]
    #[case(f64::NAN, 0)]
    fn jet_clamps_to_the_palette(#[case] value: f64, #[case] index: usize) {
        assert_eq!(jet(value), JET[index]);
    }

    #[rstest]
    #[case::interior(5, 1, 9, jet(0.5))]
    #[case::swapped_bounds(5, 9, 1, jet(0.5))]
    #[case::degenerate_below(0, 3, 3, jet(0.0))]
    #[case::degenerate_equal(3, 3, 3, jet(0.5))]
    #[case::degenerate_above(4, 3, 3, jet(1.0))]
    fn jet_between_normalises_the_range(
        #[case] value: u64,
        #[case] low: u64,
        #[case] high: u64,
        #[case] expected: Rgba,
    ) {
        assert_eq!(jet_between(value, low, high), expected);
    }

    #[test]
    fn layers_reject_out_of_range_channels() {
        let layer = PaintLayer::new(3, 2);
        assert!(layer.check(1).is_ok());
        assert_eq!(
            layer.check(2),
            Err(CmpError::ChannelOutOfRange {
                channel: 2,
                channels: 2
            })
        );
        assert_eq!(layer.get(SiteIndex::ROOT, 1), Rgba::TRANSPARENT_WHITE);
    }
}
