//! Printing the outcome of a run. Grounded on the teacher's `check::help`
//! module: the same hand-rolled ANSI `Colors` table (no external color
//! crate, matching the teacher's own choice not to add one), the same
//! "color or empty strings" toggle.

use core::fmt;

pub struct Colors {
    pub red: &'static str,
    pub green: &'static str,
    pub yellow: &'static str,
    pub dim: &'static str,
    pub bold: &'static str,
    pub reset: &'static str,
}

impl Colors {
    pub const fn new(color: bool) -> Self {
        if color {
            Self {
                red: "\x1b[31m",
                green: "\x1b[32m",
                yellow: "\x1b[33m",
                bold: "\x1b[1m",
                dim: "\x1b[2m",
                reset: "\x1b[0m",
            }
        } else {
            Self {
                red: "",
                green: "",
                yellow: "",
                bold: "",
                dim: "",
                reset: "",
            }
        }
    }
}

/// Emits the engine's own failure message (spec.md §6): the final run's log
/// buffer prefixed by `"Shrunk Test Run:"`.
pub fn shrunk_test_run(log: &str, color: bool) -> String {
    let Colors { bold, red, reset, .. } = Colors::new(color);
    format!("{bold}{red}Shrunk Test Run:{reset}\n{log}")
}

pub fn pass_line(color: bool, runs: usize) -> String {
    let Colors { green, reset, .. } = Colors::new(color);
    format!("{green}PASS({runs}){reset}")
}

pub fn fail_line(color: bool, runs: usize, shrinks: usize) -> impl fmt::Display {
    let Colors { bold, red, reset, .. } = Colors::new(color);
    format!("{bold}{red}FAIL({runs}, {shrinks}){reset}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_color_yields_plain_text() {
        let message = shrunk_test_run("log line", false);
        assert_eq!(message, "Shrunk Test Run:\nlog line");
    }

    #[test]
    fn color_wraps_ansi_codes() {
        let message = shrunk_test_run("log line", true);
        assert!(message.contains("\x1b[31m"));
        assert!(message.contains("log line"));
    }
}
