//! `smallcheck.Run` (spec.md §4.7): exhaustive depth-bounded enumeration in
//! lexicographic order. Grounded on the teacher's `check::Checker` depth-first
//! traversal of generator enumerations, restructured around the explicit
//! [`crate::driver::ExhaustiveStack`] spec.md §4.7 describes (a flat,
//! per-pick-position stack of cursors) rather than the teacher's own
//! recursive generator composition, since this crate's generators don't carry
//! their own position in a tree the way the teacher's do.
//!
//! The original source this spec distilled from (`peterzeller/go-stateful-
//! test`'s `smallcheck/run.go`/`state.go`) rebuilds its whole stack from
//! scratch at every one of `1..Depth` outer iterations, calling
//! `g.Enumerate(depth)` with that same growing `depth` each time — which
//! revisits already-explored states on every outer iteration instead of
//! extending the frontier, and computes (but never actually acts on) a
//! "was this run exhaustive" flag. Taken literally that would make scenario
//! S4 (spec.md §8: `Depth=2000` still performs exactly 16 runs for two
//! depth-independent `Int` picks) impossible — the stack would redo the
//! same handful of states thousands of times. This module instead passes
//! `config.depth` (the final bound, not the current outer loop value) to
//! every `g.enumerate()` call, so a fixed-arity pick sees its whole domain
//! from the first round and is never rebuilt; the outer `1..=config.depth`
//! loop only grows `hasMore`'s *segment* cap, for bodies whose sequence
//! length genuinely needs deepening.

use crate::{
    config::Config,
    driver::{EmptyIteratorSignal, ExhaustiveStack, FailNowSignal, Test},
    error::{Cause, Prove},
};
use std::{
    fmt,
    panic::{AssertUnwindSafe, catch_unwind},
};

pub struct Outcome {
    pub passed: bool,
    /// The deepest `Depth` value explored before either exhausting
    /// `config.depth` or finding a failure.
    pub depth_reached: usize,
    /// Total body executions across every depth, including ones swallowed as
    /// "enumeration empty at this state".
    pub runs: usize,
    pub log: String,
}

/// Runs `body` exhaustively at depths `1..=config.depth` (spec.md §4.7 points
/// 1-5), stopping at the first depth whose traversal yields a failure.
pub fn run<P>(config: &Config, mut body: impl FnMut(&mut Test) -> P) -> Outcome
where
    P: Prove,
    P::Error: fmt::Debug,
{
    let mut runs = 0usize;
    // The stack persists across depths, and every `g.enumerate()` call always
    // sees `config.depth` rather than this loop's own `depth` — a fixed-arity
    // pick's stack entry is built once, covering its whole domain, and is
    // never rebuilt as `depth` grows. Only `hasMore`'s segment cap grows with
    // `depth`, so only a body whose sequence length was actually capped last
    // round can reach new states one level deeper (spec.md scenario S4:
    // `Depth=2000` still performs exactly 16 runs for two depth-independent
    // picks).
    let mut stack = ExhaustiveStack::new();
    for depth in 1..=config.depth {
        stack.reset_capped();
        loop {
            runs += 1;
            let mut test = Test::exhaustive(&mut stack, depth, config.depth, depth as f64);
            let result = catch_unwind(AssertUnwindSafe(|| body(&mut test)));
            let stop = match result {
                Ok(proof) => match proof.prove() {
                    Ok(_) => None,
                    Err(error) => {
                        test.errorf(format!("{}", Cause::<P::Error>::Disprove(error)));
                        Some(test.log().to_string())
                    }
                },
                Err(payload) => {
                    if payload.downcast_ref::<EmptyIteratorSignal>().is_some() {
                        // spec.md §4.7 point 4: "no such state", not a failure.
                        None
                    } else if payload.downcast_ref::<FailNowSignal>().is_some() {
                        Some(test.log().to_string())
                    } else {
                        let message = crate::error::cast(payload);
                        test.errorf(match message {
                            Some(message) => format!("panicked: {message}"),
                            None => "panicked".to_string(),
                        });
                        Some(test.log().to_string())
                    }
                }
            };
            drop(test);
            if let Some(log) = stop {
                eprintln!("{}", crate::report::fail_line(true, runs, 0));
                eprintln!("{}", crate::report::shrunk_test_run(&log, true));
                return Outcome {
                    passed: false,
                    depth_reached: depth,
                    runs,
                    log,
                };
            }
            if config.print_live_logs {
                println!("{}", crate::report::pass_line(true, runs));
            }
            let advance_to = stack.len() as isize - 1;
            stack.advance(advance_to);
            if stack.is_empty() {
                break;
            }
        }
        if !stack.is_capped() {
            if config.print_all_logs && !config.print_live_logs {
                println!("{}", crate::report::pass_line(true, runs));
            }
            return Outcome {
                passed: true,
                depth_reached: depth,
                runs,
                log: String::new(),
            };
        }
    }
    if config.print_all_logs && !config.print_live_logs {
        println!("{}", crate::report::pass_line(true, runs));
    }
    Outcome {
        passed: true,
        depth_reached: config.depth,
        runs,
        log: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::Int;

    #[test]
    fn visits_every_pair_exactly_once_then_stops() {
        let config = Config {
            depth: 2000,
            ..Config::default()
        };
        let mut seen = Vec::new();
        let outcome = run(&config, |test: &mut Test| -> bool {
            let i = test.pick(&Int::new(0, 3));
            let j = test.pick(&Int::new(10, 13));
            seen.push((i, j));
            true
        });
        assert!(outcome.passed);
        assert_eq!(outcome.runs, 16, "enumerate_depth is constant, so deepening the outer loop must never retraverse a state");
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 16, "every (i, j) in {{0..3}}x{{10..13}} visited exactly once");
    }

    #[test]
    fn stops_at_the_first_failing_combination() {
        let config = Config {
            depth: 10,
            ..Config::default()
        };
        let outcome = run(&config, |test: &mut Test| {
            let i = test.pick(&Int::new(0, 3));
            i < 2
        });
        assert!(!outcome.passed);
    }

    #[test]
    fn a_property_with_no_picks_terminates_on_the_first_run() {
        let config = Config::default();
        let outcome = run(&config, |_test: &mut Test| -> bool { true });
        assert!(outcome.passed);
        assert_eq!(outcome.runs, 1, "no pick ever gets capped, so depth never needs to grow");
    }
}
