use std::path::Path;

use terravox_core::TerravoxError;

use crate::runner::BenchmarkResult;

/// Results of one bench run over every scene, stored as JSON.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Baseline {
    pub timestamp: String,
    pub results: Vec<BenchmarkResult>,
}

/// Read a baseline file. A missing or unparsable file yields `None` and a
/// warning, so a first run without a baseline still succeeds.
pub fn load_baseline(path: &Path) -> Option<Baseline> {
    let contents = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(baseline) => Some(baseline),
        Err(e) => {
            log::warn!("Ignoring malformed baseline {}: {}", path.display(), e);
            None
        }
    }
}

/// Write a baseline as pretty JSON, creating parent directories.
pub fn save_baseline(path: &Path, baseline: &Baseline) -> Result<(), TerravoxError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(baseline)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(path, json)?;
    Ok(())
}

/// A scene whose mean frame time grew past the regression threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Regression {
    pub scene_name: String,
    pub baseline_ms: f64,
    pub current_ms: f64,
    pub pct_change: f64,
}

/// Compare current results against a baseline and return the scenes whose
/// mean frame time grew by more than `threshold_pct`. Only scenes with the
/// same name and resolution as a baseline entry are compared.
pub fn compare(
    current: &[BenchmarkResult],
    baseline: &Baseline,
    threshold_pct: f64,
) -> Vec<Regression> {
    current
        .iter()
        .filter_map(|result| {
            let base = baseline.results.iter().find(|b| {
                b.scene_name == result.scene_name
                    && b.width == result.width
                    && b.height == result.height
            })?;
            let baseline_ms = base.timings.mean_ms;
            if baseline_ms <= 0.0 {
                return None;
            }
            let current_ms = result.timings.mean_ms;
            let pct_change = (current_ms - baseline_ms) / baseline_ms * 100.0;
            (pct_change > threshold_pct).then(|| Regression {
                scene_name: result.scene_name.clone(),
                baseline_ms,
                current_ms,
                pct_change,
            })
        })
        .collect()
}

/// Format results as a markdown summary table.
pub fn format_markdown(results: &[BenchmarkResult]) -> String {
    let mut out = String::new();
    out.push_str("| Scene | Resolution | Frames | Luma | Mean (ms) | Median (ms) | P95 (ms) | P99 (ms) | Min (ms) | Max (ms) |\n");
    out.push_str("|-------|------------|--------|------|-----------|-------------|----------|----------|----------|----------|\n");

    for r in results {
        out.push_str(&format!(
            "| {} | {}x{} | {} | {:.3} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} |\n",
            r.scene_name,
            r.width,
            r.height,
            r.frame_count,
            r.mean_luma,
            r.timings.mean_ms,
            r.timings.median_ms,
            r.timings.p95_ms,
            r.timings.p99_ms,
            r.timings.min_ms,
            r.timings.max_ms,
        ));
    }

    out
}

/// Format a comparison report showing regressions.
pub fn format_comparison(regressions: &[Regression], threshold_pct: f64) -> String {
    if regressions.is_empty() {
        return format!(
            "All scenes within {:.0}% threshold. No regressions detected.\n",
            threshold_pct
        );
    }

    let mut out = String::new();
    out.push_str(&format!(
        "REGRESSIONS DETECTED (>{:.0}% threshold):\n",
        threshold_pct
    ));
    for r in regressions {
        out.push_str(&format!(
            "  - {}: {:.2}ms -> {:.2}ms (+{:.1}%)\n",
            r.scene_name, r.baseline_ms, r.current_ms, r.pct_change
        ));
    }
    out
}
