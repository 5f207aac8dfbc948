//! A pure-function performance summary over a completed history, rendered
//! as plain text and written to a file. This is explicitly out of scope
//! for correctness (see the purpose and scope of the system this crate
//! belongs to) -- it never influences the checker's verdict, it just gives
//! the `verify` subcommand something to report.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use promise_types::{ApiKind, Operation};

#[derive(Debug, Default)]
pub struct Report {
    pub total_operations: usize,
    pub per_api_counts: BTreeMap<ApiKind, usize>,
    pub status_code_histogram: BTreeMap<i32, usize>,
    pub latency_p50_ms: f64,
    pub latency_p90_ms: f64,
    pub latency_p99_ms: f64,
}

/// Computes request counts, a status-code histogram, and call-to-return
/// latency percentiles over `history`. A pure function: no side effects,
/// no dependency on the checker's verdict.
pub fn summarize(history: &[Operation]) -> Report {
    let mut per_api_counts: BTreeMap<ApiKind, usize> = BTreeMap::new();
    let mut status_code_histogram: BTreeMap<i32, usize> = BTreeMap::new();
    let mut latencies_ms: Vec<f64> = Vec::with_capacity(history.len());

    for op in history {
        *per_api_counts.entry(op.api).or_default() += 1;
        *status_code_histogram.entry(op.code).or_default() += 1;
        let latency = (op.return_event - op.call_event).num_microseconds().unwrap_or(0) as f64 / 1000.0;
        latencies_ms.push(latency);
    }

    latencies_ms.sort_by(|a, b| a.partial_cmp(b).unwrap());

    Report {
        total_operations: history.len(),
        per_api_counts,
        status_code_histogram,
        latency_p50_ms: percentile(&latencies_ms, 0.50),
        latency_p90_ms: percentile(&latencies_ms, 0.90),
        latency_p99_ms: percentile(&latencies_ms, 0.99),
    }
}

fn percentile(sorted_ms: &[f64], p: f64) -> f64 {
    if sorted_ms.is_empty() {
        return 0.0;
    }
    let rank = ((sorted_ms.len() - 1) as f64 * p).round() as usize;
    sorted_ms[rank.min(sorted_ms.len() - 1)]
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "total operations: {}", self.total_operations)?;
        writeln!(f, "per-api counts:")?;
        for (api, count) in &self.per_api_counts {
            writeln!(f, "  {api}: {count}")?;
        }
        writeln!(f, "status code histogram:")?;
        for (code, count) in &self.status_code_histogram {
            writeln!(f, "  {code}: {count}")?;
        }
        writeln!(f, "latency (call to return, ms):")?;
        writeln!(f, "  p50: {:.3}", self.latency_p50_ms)?;
        writeln!(f, "  p90: {:.3}", self.latency_p90_ms)?;
        writeln!(f, "  p99: {:.3}", self.latency_p99_ms)?;
        Ok(())
    }
}

/// Writes `report` as plain text to `path`, overwriting it if present.
pub fn write_report(report: &Report, path: &Path) -> io::Result<()> {
    std::fs::write(path, report.to_string())
}
