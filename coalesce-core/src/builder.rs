//! Builder utilities for configuring CMP computations.
//!
//! Validates the configuration once so [`CmpEngine::run`] only has to deal
//! with the graph itself.

use std::num::NonZeroUsize;

use crate::{Result, engine::CmpEngine, error::CmpError};

/// Configures and constructs [`CmpEngine`] instances.
///
/// # Examples
/// ```
/// use coalesce_core::CmpBuilder;
///
/// let engine = CmpBuilder::new()
///     .with_paint_channels(3)
///     .with_site_limit(1_000)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(engine.paint_channels(), 3);
/// assert_eq!(engine.site_limit().map(|limit| limit.get()), Some(1_000));
/// ```
#[derive(Debug, Clone)]
pub struct CmpBuilder {
    paint_channels: usize,
    site_limit: Option<usize>,
}

impl Default for CmpBuilder {
    fn default() -> Self {
        Self {
            paint_channels: 1,
            site_limit: None,
        }
    }
}

impl CmpBuilder {
    /// Creates a builder populated with default parameters: one paint channel
    /// and no site limit.
    ///
    /// # Examples
    /// ```
    /// use coalesce_core::CmpBuilder;
    ///
    /// let builder = CmpBuilder::new();
    /// assert_eq!(builder.paint_channels(), 1);
    /// assert_eq!(builder.site_limit(), None);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many paint channels decorate each site. Zero disables
    /// painting.
    #[must_use]
    pub fn with_paint_channels(mut self, channels: usize) -> Self {
        self.paint_channels = channels;
        self
    }

    /// Returns the configured number of paint channels.
    #[must_use]
    pub fn paint_channels(&self) -> usize {
        self.paint_channels
    }

    /// Caps the number of sites discovery may admit from the root.
    ///
    /// # Examples
    /// ```
    /// use coalesce_core::CmpBuilder;
    ///
    /// let builder = CmpBuilder::new().with_site_limit(64);
    /// assert_eq!(builder.site_limit(), Some(64));
    /// ```
    #[must_use]
    pub fn with_site_limit(mut self, limit: usize) -> Self {
        self.site_limit = Some(limit);
        self
    }

    /// Returns the configured site limit, if any.
    #[must_use]
    pub fn site_limit(&self) -> Option<usize> {
        self.site_limit
    }

    /// Validates the configuration and constructs a [`CmpEngine`].
    ///
    /// # Errors
    /// Returns [`CmpError::InvalidSiteLimit`] when the site limit is zero.
    ///
    /// # Examples
    /// ```
    /// use coalesce_core::{CmpBuilder, CmpError};
    ///
    /// let err = CmpBuilder::new().with_site_limit(0).build().unwrap_err();
    /// assert!(matches!(err, CmpError::InvalidSiteLimit { got: 0 }));
    /// ```
    pub fn build(self) -> Result<CmpEngine> {
        let site_limit = self
            .site_limit
            .map(|limit| NonZeroUsize::new(limit).ok_or(CmpError::InvalidSiteLimit { got: limit }))
            .transpose()?;
        Ok(CmpEngine::new(self.paint_channels, site_limit))
    }
}
