use std::fmt::Write;

use crate::metrics::{FinalMetrics, TRANSPORT_FAILURE_STATUS};

/// Label used in place of the transport failure sentinel.
pub const FAILED_REQUESTS_LABEL: &str = "Failed requests (network errors)";

/// Renders the final summary of a run.
///
/// Status codes are listed in ascending order, with transport failures shown
/// under their own label instead of status `0`.
pub fn render_report(metrics: &FinalMetrics) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "Load Test Results:");
    let _ = writeln!(out, "==================");
    let _ = writeln!(out, "Total elapsed time: {:?}", metrics.elapsed());
    let _ = writeln!(out, "Total requests sent: {}", metrics.total_requests);
    let _ = writeln!(
        out,
        "Successful responses (200): {}",
        metrics.successful_requests()
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "Status Code Distribution:");
    for (&status, &count) in &metrics.status_counts {
        if status == TRANSPORT_FAILURE_STATUS {
            let _ = writeln!(out, "  {}: {}", FAILED_REQUESTS_LABEL, count);
        } else {
            let _ = writeln!(out, "  {}: {}", status, count);
        }
    }

    out
}

/// Prints the final summary to stdout.
pub fn print_report(metrics: &FinalMetrics) {
    print!("{}", render_report(metrics));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::time::{Duration, Instant};

    fn final_metrics(counts: &[(u16, u64)], elapsed: Duration) -> FinalMetrics {
        let start_time = Instant::now();
        let status_counts: BTreeMap<u16, u64> = counts.iter().copied().collect();
        FinalMetrics {
            total_requests: status_counts.values().sum(),
            status_counts,
            start_time,
            end_time: start_time + elapsed,
        }
    }

    #[test]
    fn report_contains_totals_and_breakdown() {
        let report = render_report(&final_metrics(
            &[(200, 7), (404, 2), (500, 1)],
            Duration::from_millis(1500),
        ));

        assert!(report.starts_with("Load Test Results:\n"));
        assert!(report.contains("Total elapsed time: 1.5s\n"));
        assert!(report.contains("Total requests sent: 10\n"));
        assert!(report.contains("Successful responses (200): 7\n"));
        assert!(report.contains("\n  200: 7\n"));
        assert!(report.contains("\n  404: 2\n"));
        assert!(report.contains("\n  500: 1\n"));
        assert!(!report.contains(FAILED_REQUESTS_LABEL));
    }

    #[test]
    fn missing_200_is_printed_as_zero() {
        let report = render_report(&final_metrics(&[(503, 4)], Duration::from_secs(1)));
        assert!(report.contains("Successful responses (200): 0\n"));
        assert!(!report.contains("\n  200:"));
    }

    #[test]
    fn failures_are_relabelled() {
        let report = render_report(&final_metrics(&[(0, 5)], Duration::from_secs(2)));
        assert!(report.contains("  Failed requests (network errors): 5\n"));
        assert!(!report.contains("  0: 5"));
    }

    #[test]
    fn breakdown_is_ascending() {
        let report = render_report(&final_metrics(
            &[(503, 1), (0, 1), (200, 1)],
            Duration::ZERO,
        ));
        let failed = report.find(FAILED_REQUESTS_LABEL).unwrap();
        let ok = report.find("  200: 1").unwrap();
        let unavailable = report.find("  503: 1").unwrap();
        assert!(failed < ok && ok < unavailable);
    }

    #[test]
    fn rendering_is_deterministic() {
        let metrics = final_metrics(&[(200, 3), (404, 1)], Duration::from_millis(20));
        assert_eq!(render_report(&metrics), render_report(&metrics));
    }
}
