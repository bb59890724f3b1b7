//! Finite pieces of the square lattice Z² with per-site radii.
//!
//! Sites are addressed by `(x, y)` with `x < width` and `y < height`.
//! Neighbours are reported left, right, up, down.

use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::{
    error::GraphError,
    graph::{WeightedGraph, validate_radii},
};

#[derive(Clone, Debug, PartialEq)]
struct Grid {
    width: usize,
    height: usize,
    radii: Vec<f64>,
}

impl Grid {
    fn new(width: usize, height: usize, radii: Vec<f64>) -> Result<Self, GraphError> {
        let expected = checked_area(width, height)?;
        if radii.len() != expected {
            return Err(GraphError::RadiusCountMismatch {
                expected,
                got: radii.len(),
            });
        }
        validate_radii(&radii)?;
        Ok(Self {
            width,
            height,
            radii,
        })
    }

    fn bernoulli(
        width: usize,
        height: usize,
        probability: f64,
        seed: u64,
    ) -> Result<Self, GraphError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(GraphError::InvalidProbability { probability });
        }
        let area = checked_area(width, height)?;
        let mut rng = SmallRng::seed_from_u64(seed);
        let radii = (0..area)
            .map(|_| if rng.r#gen::<f64>() < probability { 1.0 } else { 0.0 })
            .collect();
        Self::new(width, height, radii)
    }

    fn radius(&self, (x, y): (usize, usize)) -> f64 {
        self.radii[y * self.width + x]
    }
}

fn checked_area(width: usize, height: usize) -> Result<usize, GraphError> {
    match width.checked_mul(height) {
        Some(area) if area > 0 => Ok(area),
        _ => Err(GraphError::InvalidDimensions { width, height }),
    }
}

/// A `width × height` rectangle of Z² with free boundaries: border sites
/// have two or three neighbours.
///
/// # Examples
/// ```
/// use coalesce_core::{BoxLattice, WeightedGraph};
///
/// let lattice = BoxLattice::new(3, 2, vec![1.0; 6])?;
/// assert_eq!(lattice.neighbour_count((0, 0)), 2);
/// assert_eq!(lattice.neighbour_count((1, 0)), 3);
/// # Ok::<(), coalesce_core::GraphError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct BoxLattice {
    grid: Grid,
}

impl BoxLattice {
    /// Creates a box with explicit radii given row by row.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidDimensions`] for an empty box,
    /// [`GraphError::RadiusCountMismatch`] when `radii` does not hold
    /// `width * height` values and [`GraphError::InvalidRadius`] for a
    /// negative or non-finite radius.
    pub fn new(width: usize, height: usize, radii: Vec<f64>) -> Result<Self, GraphError> {
        Grid::new(width, height, radii).map(|grid| Self { grid })
    }

    /// Creates a box whose radii are `1.0` with the given probability and
    /// `0.0` otherwise, drawn from a generator seeded with `seed`.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidProbability`] when `probability` is not in
    /// `[0, 1]` and [`GraphError::InvalidDimensions`] for an empty box.
    pub fn bernoulli(
        width: usize,
        height: usize,
        probability: f64,
        seed: u64,
    ) -> Result<Self, GraphError> {
        Grid::bernoulli(width, height, probability, seed).map(|grid| Self { grid })
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.grid.width
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.grid.height
    }

    fn neighbours(&self, (x, y): (usize, usize)) -> impl Iterator<Item = (usize, usize)> {
        let (width, height) = (self.grid.width, self.grid.height);
        [
            x.checked_sub(1).map(|left| (left, y)),
            (x + 1 < width).then_some((x + 1, y)),
            y.checked_sub(1).map(|up| (x, up)),
            (y + 1 < height).then_some((x, y + 1)),
        ]
        .into_iter()
        .flatten()
    }
}

impl WeightedGraph for BoxLattice {
    type Site = (usize, usize);

    fn neighbour_count(&self, site: Self::Site) -> usize {
        self.neighbours(site).count()
    }

    fn neighbour(&self, site: Self::Site, index: usize) -> Self::Site {
        self.neighbours(site)
            .nth(index)
            .unwrap_or_else(|| panic!("site {site:?} has no neighbour {index}"))
    }

    fn radius(&self, site: Self::Site) -> f64 {
        self.grid.radius(site)
    }
}

/// A `width × height` torus of Z²: every site has four neighbours, wrapping
/// around both edges.
///
/// On a torus narrower than three sites the wrapped neighbours repeat (or are
/// the site itself); traversals visit each site once regardless.
///
/// # Examples
/// ```
/// use coalesce_core::{TorusLattice, WeightedGraph};
///
/// let torus = TorusLattice::new(3, 3, vec![1.0; 9])?;
/// assert_eq!(torus.neighbour((0, 0), 0), (2, 0));
/// assert_eq!(torus.neighbour((0, 0), 2), (0, 2));
/// # Ok::<(), coalesce_core::GraphError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct TorusLattice {
    grid: Grid,
}

impl TorusLattice {
    /// Creates a torus with explicit radii given row by row.
    ///
    /// # Errors
    /// Same as [`BoxLattice::new`].
    pub fn new(width: usize, height: usize, radii: Vec<f64>) -> Result<Self, GraphError> {
        Grid::new(width, height, radii).map(|grid| Self { grid })
    }

    /// Creates a torus with Bernoulli radii, as [`BoxLattice::bernoulli`].
    ///
    /// # Errors
    /// Same as [`BoxLattice::bernoulli`].
    pub fn bernoulli(
        width: usize,
        height: usize,
        probability: f64,
        seed: u64,
    ) -> Result<Self, GraphError> {
        Grid::bernoulli(width, height, probability, seed).map(|grid| Self { grid })
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.grid.width
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> usize {
        self.grid.height
    }
}

impl WeightedGraph for TorusLattice {
    type Site = (usize, usize);

    fn neighbour_count(&self, _site: Self::Site) -> usize {
        4
    }

    fn neighbour(&self, (x, y): Self::Site, index: usize) -> Self::Site {
        let (width, height) = (self.grid.width, self.grid.height);
        match index {
            0 => ((x + width - 1) % width, y),
            1 => ((x + 1) % width, y),
            2 => (x, (y + height - 1) % height),
            3 => (x, (y + 1) % height),
            _ => panic!("torus sites have four neighbours, not {index}"),
        }
    }

    fn radius(&self, site: Self::Site) -> f64 {
        self.grid.radius(site)
    }
}
