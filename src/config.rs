//! [`Config`] (spec.md §6's recognised options) plus an `environment`
//! submodule that overrides fields from `STATECHECK_*` variables, grounded
//! line-for-line on the teacher's `check::environment` module (which reads
//! `CHECKITO_*`).

use std::time::Duration;

/// Options shared by all three strategies. Not every field is meaningful to
/// every strategy (`depth` only matters to `smallcheck`, `fixed_random_source`
/// only to `fuzzcheck`), mirroring spec.md §6's per-option strategy notes.
#[derive(Clone, Debug)]
pub struct Config {
    /// `quickcheck`: iteration cap before giving up. Default `100`.
    pub number_of_runs: usize,
    /// Deadline for [`crate::shrink_search::ShrinkSearch`]. Default `30s`.
    pub max_shrink_duration: Duration,
    /// Surface every run's log even on success. Default `false`.
    pub print_all_logs: bool,
    /// `smallcheck`: emit logs during rather than after each run. Default
    /// `false`.
    pub print_live_logs: bool,
    /// `fuzzcheck`/tests: byte buffer replacing the seeded RNG.
    pub fixed_random_source: Option<Vec<u8>>,
    /// Forces uniform sampling distributions (fuzz mode). Default `false`.
    pub disable_heuristics: bool,
    /// `smallcheck`: exhaustive enumeration depth bound. Default `5`.
    pub depth: usize,
    /// Seed for the run's random source, when not driven by a fixed buffer.
    /// Defaults to a fresh random seed.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            number_of_runs: 100,
            max_shrink_duration: Duration::from_secs(30),
            print_all_logs: false,
            print_live_logs: false,
            fixed_random_source: None,
            disable_heuristics: false,
            depth: 5,
            seed: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        let mut config = Self::default();
        environment::update(&mut config);
        config
    }
}

pub mod environment {
    use super::Config;
    use core::str::FromStr;
    use std::env;

    pub fn number_of_runs() -> Option<usize> {
        parse("STATECHECK_NUMBER_OF_RUNS")
    }

    pub fn max_shrink_duration_seconds() -> Option<u64> {
        parse("STATECHECK_MAX_SHRINK_DURATION_SECONDS")
    }

    pub fn print_all_logs() -> Option<bool> {
        parse("STATECHECK_PRINT_ALL_LOGS")
    }

    pub fn print_live_logs() -> Option<bool> {
        parse("STATECHECK_PRINT_LIVE_LOGS")
    }

    pub fn disable_heuristics() -> Option<bool> {
        parse("STATECHECK_DISABLE_HEURISTICS")
    }

    pub fn depth() -> Option<usize> {
        parse("STATECHECK_DEPTH")
    }

    pub fn seed() -> Option<u64> {
        parse("STATECHECK_SEED")
    }

    pub fn update(config: &mut Config) {
        if let Some(value) = number_of_runs() {
            config.number_of_runs = value;
        }
        if let Some(value) = max_shrink_duration_seconds() {
            config.max_shrink_duration = std::time::Duration::from_secs(value);
        }
        if let Some(value) = print_all_logs() {
            config.print_all_logs = value;
        }
        if let Some(value) = print_live_logs() {
            config.print_live_logs = value;
        }
        if let Some(value) = disable_heuristics() {
            config.disable_heuristics = value;
        }
        if let Some(value) = depth() {
            config.depth = value;
        }
        if let Some(value) = seed() {
            config.seed = Some(value);
        }
    }

    fn parse<T: FromStr>(key: &str) -> Option<T> {
        match env::var(key) {
            Ok(value) => value.parse().ok(),
            Err(_) => None,
        }
    }
}
