//! `quickcheck.Run` (spec.md §4.7): random sampling up to `NumberOfRuns`,
//! stopping at the first failing run, then handing that run's tree to
//! [`crate::shrink_search`]. Grounded on the teacher's `check::Checker`
//! generate/shrink loop, though restructured into a flat loop rather than
//! the teacher's `Iterator`-as-state-machine (`Checks`), since this crate's
//! failure handling needs to unwind through [`crate::driver::FailNowSignal`]
//! rather than flow through `Result`.

use crate::{
    choice_tree::Tree,
    config::Config,
    driver::Test,
    error::{Cause, Prove},
    random::Random,
};
use std::{
    fmt,
    panic::{AssertUnwindSafe, catch_unwind},
    time::Instant,
};

/// The result of a full `quickcheck.Run`.
pub struct Outcome {
    pub passed: bool,
    /// Number of runs performed before either exhausting `NumberOfRuns` or
    /// hitting the first failure.
    pub runs: usize,
    /// Number of candidate re-runs `ShrinkSearch` performed. Zero if the
    /// property never failed.
    pub shrinks: usize,
    /// The final run's log: the failing run's log if shrinking never
    /// improved on it, otherwise the shrunk run's.
    pub log: String,
}

/// Runs `body` up to `config.number_of_runs` times, shrinking the first
/// failure found (spec.md §4.7 points 1-4).
pub fn run<P>(config: &Config, mut body: impl FnMut(&mut Test) -> P) -> Outcome
where
    P: Prove,
    P::Error: fmt::Debug,
{
    let seed = config.seed.unwrap_or_else(crate::random::seed);
    let mut runs = 0;
    let mut failing: Option<Tree> = None;
    let mut failing_log = String::new();

    for index in 0..config.number_of_runs {
        runs = index + 1;
        let max_size = size_for(index, config.number_of_runs);
        let source = random_source_for(config, seed.wrapping_add(index as u64));
        let test = Test::random(source, max_size);
        let (test, failed) = execute_once(test, &mut body);
        if failed {
            failing_log = test.log().to_string();
            failing = Some(test.into_tree());
            break;
        }
        if config.print_all_logs {
            println!("{}", crate::report::pass_line(true, runs));
        }
    }

    let Some(failing_tree) = failing else {
        return Outcome {
            passed: true,
            runs,
            shrinks: 0,
            log: String::new(),
        };
    };

    let max_size = size_for(config.number_of_runs.saturating_sub(1), config.number_of_runs);
    let deadline = Instant::now() + config.max_shrink_duration;
    let mut shrinks = 0usize;
    let shrunk_tree = crate::shrink_search::run(failing_tree, deadline, |preset: Tree| {
        shrinks += 1;
        let fallback = random_source_for(config, seed.wrapping_add(0x5eed_0000 + shrinks as u64));
        let test = Test::replay(preset, fallback, max_size);
        let (test, failed) = execute_once(test, &mut body);
        (test.into_tree(), failed)
    });

    let fallback = random_source_for(config, seed.wrapping_add(0x5eed_ffff));
    let final_test = Test::replay(shrunk_tree, fallback, max_size);
    let (final_test, _) = execute_once(final_test, &mut body);
    let log = if final_test.log().is_empty() {
        failing_log
    } else {
        final_test.log().to_string()
    };

    eprintln!("{}", crate::report::fail_line(true, runs, shrinks));
    eprintln!("{}", crate::report::shrunk_test_run(&log, true));

    Outcome {
        passed: false,
        runs,
        shrinks,
        log,
    }
}

/// The teacher's own size ramp (`state::Sizes::from_ratio`): "25% of samples
/// are fully sized", i.e. `start + (index/count * 1.25) * (end-start)`,
/// clamped to `end`. spec.md leaves the magnitude of `maxSize` unspecified
/// ("not specified to the bit"); `1.0..100.0` is chosen here so `hasMore`'s
/// `1 - 1/maxSize` termination probability and string/slice lengths both
/// stay in a useful range.
fn size_for(index: usize, count: usize) -> f64 {
    const START: f64 = 1.0;
    const END: f64 = 100.0;
    if count <= 1 {
        return END;
    }
    let ratio = index as f64 / count as f64 * 1.25;
    (START + ratio * (END - START)).clamp(START, END)
}

/// `DisableHeuristics` (spec.md §6) forces the uniform byte-stream sampling
/// path, which this crate's generators only take for [`Random::Fixed`]
/// (spec.md §4.2's integer heuristic, `matches!(random, Random::Fixed(_))`
/// in [`crate::primitive::Int::random`]); a seeded-but-heuristics-disabled
/// run is realized by feeding a freshly seeded byte buffer through
/// `Random::Fixed` rather than `Random::Seeded`.
pub(crate) fn random_source_for(config: &Config, seed: u64) -> Random {
    if let Some(bytes) = &config.fixed_random_source {
        return Random::fixed(bytes.clone());
    }
    if config.disable_heuristics {
        let mut rng = fastrand::Rng::with_seed(seed);
        let bytes = (0..4096).map(|_| rng.u8(..)).collect();
        return Random::fixed(bytes);
    }
    Random::seeded(seed)
}

/// Runs `body` once, catching a panic and routing it to the right outcome:
/// [`crate::driver::FailNowSignal`] and [`crate::driver::EmptyIteratorSignal`]
/// are dedicated sentinels (§5/§7), everything else is an ordinary panic.
pub(crate) fn execute_once<'a, P>(
    mut test: Test<'a>,
    body: &mut impl FnMut(&mut Test) -> P,
) -> (Test<'a>, bool)
where
    P: Prove,
    P::Error: fmt::Debug,
{
    match catch_unwind(AssertUnwindSafe(|| body(&mut test))) {
        Ok(proof) => {
            if let Err(error) = proof.prove() {
                test.errorf(format!("{}", Cause::<P::Error>::Disprove(error)));
            }
        }
        Err(payload) => {
            if payload.downcast_ref::<crate::driver::FailNowSignal>().is_some() {
                // `fail_now` already set the failed flag before unwinding.
            } else if payload
                .downcast_ref::<crate::driver::EmptyIteratorSignal>()
                .is_some()
            {
                test.errorf("generator enumeration was unexpectedly empty outside smallcheck");
            } else {
                let message = crate::error::cast(payload);
                test.errorf(match message {
                    Some(message) => format!("panicked: {message}"),
                    None => "panicked".to_string(),
                });
            }
        }
    }
    let failed = test.failed();
    (test, failed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_when_the_property_always_holds() {
        let config = Config {
            number_of_runs: 20,
            ..Config::default()
        };
        let outcome = run(&config, |test: &mut Test| {
            let value = test.pick(&crate::primitive::Int::new(0, 9));
            value < 100
        });
        assert!(outcome.passed);
        assert_eq!(outcome.runs, 20);
    }

    #[test]
    fn shrinks_a_failing_sum_towards_ten() {
        let config = Config {
            number_of_runs: 50,
            seed: Some(1),
            ..Config::default()
        };
        let outcome = run(&config, |test: &mut Test| {
            let x = test.pick(&crate::primitive::Int::new(0, 20));
            let y = test.pick(&crate::primitive::Int::new(0, 20));
            x + y < 10
        });
        assert!(!outcome.passed);
        assert!(outcome.runs <= 50);
    }

    #[test]
    fn fail_now_is_recorded_as_a_failure_not_a_crash() {
        let config = Config {
            number_of_runs: 5,
            ..Config::default()
        };
        let outcome = run(&config, |test: &mut Test| -> () {
            test.fail_now();
        });
        assert!(!outcome.passed);
    }
}
