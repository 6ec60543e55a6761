mod common;
use common::*;
use statecheck::{config::Config, driver::Test, smallcheck};

/// S4 of spec.md §8, exercised through the public crate API rather than
/// `smallcheck`'s own internal unit test.
#[test]
fn visits_every_combination_exactly_once_regardless_of_depth() {
    let config = Config {
        depth: 2000,
        ..Config::default()
    };
    let mut seen = Vec::new();
    let outcome = smallcheck::run(&config, |test: &mut Test| {
        let i = test.pick(&Int::new(0, 3));
        let j = test.pick(&Int::new(10, 13));
        seen.push((i, j));
        true
    });
    assert!(outcome.passed);
    assert_eq!(outcome.runs, 16);
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 16);
}

/// A body driven entirely by `hasMore` (a sequence whose length is the
/// thing under test, not any one element's value) needs `round_cap` itself
/// to grow before it can produce a long-enough sequence: `hasMore` yields
/// one fewer `true` than `round_cap` (the segment the run starts in already
/// counts), so a 3-pick sequence first becomes reachable at `depth == 4`.
#[test]
fn a_sequence_length_needs_round_cap_to_grow_to_reach_it() {
    let config = Config {
        depth: 10,
        ..Config::default()
    };
    let outcome = smallcheck::run(&config, |test: &mut Test| {
        let mut count = 0;
        while test.has_more() {
            let _ = test.pick(&Int::new(0, 0));
            count += 1;
        }
        count < 3
    });
    assert!(!outcome.passed);
    assert_eq!(outcome.depth_reached, 4, "round_cap must reach 4 before hasMore yields 3 trues");
}

/// A body whose number of picks varies by run (only picking the second
/// value on some branches) still terminates normally: the exhaustive stack
/// only grows entries for positions a run actually reaches.
#[test]
fn a_variable_number_of_picks_per_run_terminates_normally() {
    let config = Config {
        depth: 5,
        ..Config::default()
    };
    let outcome = smallcheck::run(&config, |test: &mut Test| {
        let flag = test.pick(&bool_generator());
        if flag {
            let _ = test.pick(&Int::new(0, 1));
        }
        true
    });
    assert!(outcome.passed);
}
