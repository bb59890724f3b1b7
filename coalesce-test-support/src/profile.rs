//! Property-test run profile read from the environment.
//!
//! Every property suite in the workspace goes through this profile so case
//! counts, forking and graph sizes can be tuned in one place.

use std::env;

/// Environment variable controlling proptest case counts.
pub const PROGTEST_CASES_ENV_KEY: &str = "PROGTEST_CASES";
/// Environment variable controlling proptest process forking.
pub const COALESCE_PBT_FORK_ENV_KEY: &str = "COALESCE_PBT_FORK";
/// Environment variable bounding the number of sites in generated graphs.
pub const COALESCE_PBT_MAX_SITES_ENV_KEY: &str = "COALESCE_PBT_MAX_SITES";

/// Runtime profile for property-test execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
    max_sites: usize,
}

impl ProptestRunProfile {
    /// Loads a profile, falling back to the given defaults for unset or
    /// malformed variables.
    ///
    /// # Examples
    /// ```
    /// use coalesce_test_support::profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(64, false, 40);
    /// assert!(profile.cases() > 0);
    /// assert!(profile.max_sites() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool, default_max_sites: usize) -> Self {
        Self {
            cases: read_env_or_default(PROGTEST_CASES_ENV_KEY, default_cases, parse_cases),
            fork: read_env_or_default(COALESCE_PBT_FORK_ENV_KEY, default_fork, parse_bool),
            max_sites: read_env_or_default(
                COALESCE_PBT_MAX_SITES_ENV_KEY,
                default_max_sites,
                parse_max_sites,
            ),
        }
    }

    /// Number of cases to run per property.
    #[must_use]
    pub fn cases(&self) -> u32 {
        self.cases
    }

    /// Whether to run cases in forked subprocesses.
    #[must_use]
    pub fn fork(&self) -> bool {
        self.fork
    }

    /// Upper bound on the number of sites of a generated graph.
    #[must_use]
    pub fn max_sites(&self) -> usize {
        self.max_sites
    }
}

fn read_env_or_default<T, F>(key: &'static str, default: T, parser: F) -> T
where
    T: Copy,
    F: Fn(&str) -> Result<T, String>,
{
    let Ok(raw) = env::var(key) else {
        return default;
    };
    parser(&raw).unwrap_or_else(|reason| {
        ::tracing::warn!(
            env = key,
            raw = %raw,
            reason = %reason,
            "invalid property-test profile override; using default",
        );
        default
    })
}

fn parse_positive<T>(raw: &str) -> Result<T, String>
where
    T: std::str::FromStr<Err = std::num::ParseIntError> + PartialEq + Default,
{
    let parsed = raw
        .trim()
        .parse::<T>()
        .map_err(|error| format!("parse error: {error}"))?;
    if parsed == T::default() {
        return Err("value must be > 0".to_owned());
    }
    Ok(parsed)
}

fn parse_cases(raw: &str) -> Result<u32, String> {
    parse_positive(raw)
}

fn parse_max_sites(raw: &str) -> Result<usize, String> {
    parse_positive(raw)
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err("expected one of: true/false/1/0/yes/no/on/off".to_owned()),
    }
}
