use std::fmt::Write;
use std::time::Duration;

/// Wall-clock time spent in one pipeline stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageTiming {
    pub stage: &'static str,
    pub duration: Duration,
}

impl StageTiming {
    pub fn new(stage: &'static str, duration: Duration) -> Self {
        Self { stage, duration }
    }

    pub fn millis(&self) -> f64 {
        self.duration.as_secs_f64() * 1000.0
    }
}

/// Stage names and milliseconds, one per line, followed by the total.
pub fn report(timings: &[StageTiming]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== TIMING REPORT ===");
    for timing in timings {
        let _ = writeln!(out, "{:<30}: {:>10.3} ms", timing.stage, timing.millis());
    }
    let total: f64 = timings.iter().map(StageTiming::millis).sum();
    let _ = writeln!(out, "{}", "-".repeat(44));
    let _ = writeln!(out, "{:<30}: {:>10.3} ms", "Total", total);
    out
}
