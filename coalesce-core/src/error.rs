//! Error types for the coalescing mass process engine.
//!
//! Defines the error enums exposed by the public API, their stable codes and a
//! convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

use crate::cluster::ClusterId;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced while building one of the reference graphs.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum GraphError {
    /// An edge endpoint referenced a site that does not exist.
    #[error("site {site} is out of bounds for a graph of {site_count} sites")]
    SiteOutOfBounds {
        /// The offending site index.
        site: usize,
        /// Number of sites in the graph.
        site_count: usize,
    },
    /// A lattice needs at least one row and one column.
    #[error("lattice dimensions must be positive (got {width}x{height})")]
    InvalidDimensions {
        /// Requested number of columns.
        width: usize,
        /// Requested number of rows.
        height: usize,
    },
    /// The number of radii did not match the number of sites.
    #[error("expected {expected} radii but {got} were given")]
    RadiusCountMismatch {
        /// Number of sites in the graph.
        expected: usize,
        /// Number of radii supplied.
        got: usize,
    },
    /// Bernoulli radii need a probability in `[0, 1]`.
    #[error("probability {probability} is outside [0, 1]")]
    InvalidProbability {
        /// The rejected probability.
        probability: f64,
    },
    /// Radii must be finite and non-negative.
    #[error("site {site} has invalid radius {radius}")]
    InvalidRadius {
        /// Index of the offending site.
        site: usize,
        /// The rejected radius.
        radius: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// An edge endpoint referenced a site that does not exist.
        SiteOutOfBounds => SiteOutOfBounds { .. } => "GRAPH_SITE_OUT_OF_BOUNDS",
        /// A lattice needs at least one row and one column.
        InvalidDimensions => InvalidDimensions { .. } => "GRAPH_INVALID_DIMENSIONS",
        /// The number of radii did not match the number of sites.
        RadiusCountMismatch => RadiusCountMismatch { .. } => "GRAPH_RADIUS_COUNT_MISMATCH",
        /// Bernoulli radii need a probability in `[0, 1]`.
        InvalidProbability => InvalidProbability { .. } => "GRAPH_INVALID_PROBABILITY",
        /// Radii must be finite and non-negative.
        InvalidRadius => InvalidRadius { .. } => "GRAPH_INVALID_RADIUS",
    }
}

/// Error type produced when configuring, computing or querying a [`crate::Cmp`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CmpError {
    /// A site limit of zero can never admit the root.
    #[error("site_limit must be at least 1 (got {got})")]
    InvalidSiteLimit {
        /// The rejected limit.
        got: usize,
    },
    /// Discovery reached more sites than the configured limit.
    #[error("the root component has more than {limit} sites")]
    SiteLimitExceeded {
        /// The configured limit.
        limit: usize,
    },
    /// A site reported a negative or non-finite radius.
    #[error("site {site} has invalid radius {radius}")]
    InvalidRadius {
        /// Debug rendering of the offending site handle.
        site: Arc<str>,
        /// The rejected radius.
        radius: f64,
    },
    /// The site does not belong to the root component.
    #[error("site {site} is not part of the computed component")]
    UnknownSite {
        /// Debug rendering of the site handle.
        site: Arc<str>,
    },
    /// The cluster id does not name a surviving cluster.
    #[error("cluster {cluster} does not exist")]
    UnknownCluster {
        /// The stale or foreign cluster id.
        cluster: ClusterId,
    },
    /// A paint channel index was outside the configured range.
    #[error("paint channel {channel} is out of range ({channels} channels configured)")]
    ChannelOutOfRange {
        /// Requested channel.
        channel: usize,
        /// Number of channels decorating each site.
        channels: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`CmpError`] variants.
    enum CmpErrorCode for CmpError {
        /// A site limit of zero can never admit the root.
        InvalidSiteLimit => InvalidSiteLimit { .. } => "CMP_INVALID_SITE_LIMIT",
        /// Discovery reached more sites than the configured limit.
        SiteLimitExceeded => SiteLimitExceeded { .. } => "CMP_SITE_LIMIT_EXCEEDED",
        /// A site reported a negative or non-finite radius.
        InvalidRadius => InvalidRadius { .. } => "CMP_INVALID_RADIUS",
        /// The site does not belong to the root component.
        UnknownSite => UnknownSite { .. } => "CMP_UNKNOWN_SITE",
        /// The cluster id does not name a surviving cluster.
        UnknownCluster => UnknownCluster { .. } => "CMP_UNKNOWN_CLUSTER",
        /// A paint channel index was outside the configured range.
        ChannelOutOfRange => ChannelOutOfRange { .. } => "CMP_CHANNEL_OUT_OF_RANGE",
    }
}

impl CmpError {
    pub(crate) fn unknown_site<S: fmt::Debug>(site: S) -> Self {
        Self::UnknownSite {
            site: Arc::from(format!("{site:?}")),
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, CmpError>;
