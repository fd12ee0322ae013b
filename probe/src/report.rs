//! Timing report for the two read paths.

use std::fmt::Write;
use std::time::Duration;

pub const CACHE_LABEL: &str = "Redis";
pub const RELATIONAL_LABEL: &str = "SQLite";

/// Wall-clock time of one pass over the probe set on each read path.
/// A single sample, not a statistical benchmark.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeTimings {
    pub cache: Duration,
    pub relational: Duration,
}

impl ProbeTimings {
    pub fn cache_ms(&self) -> u128 {
        self.cache.as_millis()
    }

    pub fn relational_ms(&self) -> u128 {
        self.relational.as_millis()
    }

    /// How many times faster the cache pass was, if it took any time at all.
    pub fn speedup(&self) -> Option<f64> {
        let cache = self.cache.as_secs_f64();
        if cache <= 0.0 {
            return None;
        }
        Some(self.relational.as_secs_f64() / cache)
    }
}

/// The two labelled lines printed at the end of a run.
pub fn format_report(timings: &ProbeTimings) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}: \t{} ms", CACHE_LABEL, timings.cache_ms());
    let _ = writeln!(out, "{}: \t{} ms", RELATIONAL_LABEL, timings.relational_ms());
    out
}

pub fn print_report(timings: &ProbeTimings) {
    print!("{}", format_report(timings));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_has_one_labelled_line_per_path() {
        let timings = ProbeTimings {
            cache: Duration::from_millis(4),
            relational: Duration::from_micros(37_900),
        };
        assert_eq!(format_report(&timings), "Redis: \t4 ms\nSQLite: \t37 ms\n");
    }

    #[test]
    fn speedup_needs_nonzero_cache_time() {
        let timings = ProbeTimings {
            cache: Duration::ZERO,
            relational: Duration::from_millis(10),
        };
        assert_eq!(timings.speedup(), None);

        let timings = ProbeTimings {
            cache: Duration::from_millis(2),
            relational: Duration::from_millis(10),
        };
        let speedup = timings.speedup().unwrap();
        assert!((speedup - 5.0).abs() < 1e-9);
    }
}
