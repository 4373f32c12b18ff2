use std::fmt;
use std::time::Duration;

/// Outcome of one login request
#[derive(Debug, Clone, Copy)]
pub(crate) struct Sample {
    pub(crate) success: bool,
    pub(crate) latency: Duration,
}

/// Summary of a load run; latency figures cover successful requests only
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LoadReport {
    pub(crate) total_requests: usize,
    pub(crate) successful: usize,
    pub(crate) failed: usize,
    pub(crate) duration: Duration,
    pub(crate) requests_per_second: f64,
    pub(crate) mean_ms: f64,
    pub(crate) min_ms: f64,
    pub(crate) max_ms: f64,
    pub(crate) p50_ms: f64,
    pub(crate) p95_ms: f64,
    pub(crate) p99_ms: f64,
}

impl LoadReport {
    /// Requests that never produced a sample (a panicked task) count as failed
    pub(crate) fn from_samples(total_requests: usize, duration: Duration, samples: &[Sample]) -> Self {
        let mut latencies: Vec<f64> = samples
            .iter()
            .filter(|s| s.success)
            .map(|s| s.latency.as_secs_f64() * 1000.0)
            .collect();
        latencies.sort_by(f64::total_cmp);

        let successful = latencies.len();
        let mean_ms = if latencies.is_empty() {
            0.0
        } else {
            latencies.iter().sum::<f64>() / successful as f64
        };
        let requests_per_second = if duration.is_zero() {
            0.0
        } else {
            total_requests as f64 / duration.as_secs_f64()
        };

        Self {
            total_requests,
            successful,
            failed: total_requests.saturating_sub(successful),
            duration,
            requests_per_second,
            mean_ms,
            min_ms: latencies.first().copied().unwrap_or(0.0),
            max_ms: latencies.last().copied().unwrap_or(0.0),
            p50_ms: percentile(&latencies, 50.0),
            p95_ms: percentile(&latencies, 95.0),
            p99_ms: percentile(&latencies, 99.0),
        }
    }

    fn share(&self, count: usize) -> f64 {
        if self.total_requests == 0 {
            0.0
        } else {
            count as f64 * 100.0 / self.total_requests as f64
        }
    }
}

/// Linear interpolation between the closest ranks of an ascending slice
fn percentile(sorted: &[f64], pct: f64) -> f64 {
    let Some(last) = sorted.len().checked_sub(1) else {
        return 0.0;
    };

    let rank = pct / 100.0 * last as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }

    let weight = rank - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Load test results")?;
        writeln!(f, "  Duration:        {:.2} s", self.duration.as_secs_f64())?;
        writeln!(f, "  Requests:        {}", self.total_requests)?;
        writeln!(
            f,
            "  Successful:      {} ({:.1}%)",
            self.successful,
            self.share(self.successful)
        )?;
        writeln!(
            f,
            "  Failed:          {} ({:.1}%)",
            self.failed,
            self.share(self.failed)
        )?;
        writeln!(f, "  Requests/second: {:.1}", self.requests_per_second)?;
        writeln!(f, "  Mean latency:    {:.1} ms", self.mean_ms)?;
        writeln!(f, "  Min / max:       {:.1} / {:.1} ms", self.min_ms, self.max_ms)?;
        write!(
            f,
            "  p50 / p95 / p99: {:.1} / {:.1} / {:.1} ms",
            self.p50_ms, self.p95_ms, self.p99_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(success: bool, millis: u64) -> Sample {
        Sample {
            success,
            latency: Duration::from_millis(millis),
        }
    }

    #[test]
    fn test_percentile_interpolates() {
        let sorted = [1.0, 2.0, 3.0, 4.0];

        assert_eq!(percentile(&sorted, 0.0), 1.0);
        assert_eq!(percentile(&sorted, 50.0), 2.5);
        assert_eq!(percentile(&sorted, 100.0), 4.0);
        assert_eq!(percentile(&[], 95.0), 0.0);
        assert_eq!(percentile(&[7.0], 99.0), 7.0);
    }

    #[test]
    fn test_report_ignores_failed_latencies() {
        let samples = [sample(true, 10), sample(false, 1000), sample(true, 30)];

        let report = LoadReport::from_samples(4, Duration::from_secs(2), &samples);

        assert_eq!(report.successful, 2);
        assert_eq!(report.failed, 2, "missing sample counts as failed");
        assert_eq!(report.requests_per_second, 2.0);
        assert_eq!(report.min_ms, 10.0);
        assert_eq!(report.max_ms, 30.0);
        assert_eq!(report.mean_ms, 20.0);
        assert_eq!(report.p50_ms, 20.0);
    }

    #[test]
    fn test_empty_report_has_no_nan() {
        let report = LoadReport::from_samples(0, Duration::ZERO, &[]);

        assert_eq!(report.requests_per_second, 0.0);
        assert_eq!(report.mean_ms, 0.0);
        assert!(report.to_string().contains("Successful:      0 (0.0%)"));
    }
}
