//! Terminal rendering of match results and analytics.

use std::path::Path;

use colored::Colorize;
use logoguard_core::{DistanceHistogram, LegitimacyBreakdown, MatchResult, PerformanceCurve};

const BAR_WIDTH: usize = 40;

/// Horizontal bar proportional to `value / max`.
pub fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let filled = ((value / max) * width as f64).round() as usize;
    "█".repeat(filled.min(width))
}

/// Result banner for one upload. `reference_dir` resolves the matched identifier to a path.
pub fn match_lines(upload: &Path, reference_dir: &Path, result: &MatchResult) -> Vec<String> {
    let mut lines = vec![format!("{} {}", "Upload:".dimmed(), upload.display())];

    let Some(best) = &result.best_identifier else {
        lines.push("No match found.".yellow().to_string());
        return lines;
    };

    lines.push(format!("{} {}", "Closest match:".dimmed(), best.bold()));
    lines.push(format!(
        "{} {}",
        "Reference image:".dimmed(),
        reference_dir.join(best).display()
    ));
    lines.push(format!(
        "{} {} (threshold {})",
        "Hash difference:".dimmed(),
        result.distance,
        result.threshold
    ));
    if result.is_legitimate {
        lines.push("This logo is LEGITIMATE.".green().bold().to_string());
    } else {
        lines.push("This logo is NOT LEGITIMATE.".red().bold().to_string());
    }
    lines
}

pub fn print_match(upload: &Path, reference_dir: &Path, result: &MatchResult) {
    println!();
    for line in match_lines(upload, reference_dir, result) {
        println!("   {}", line);
    }
}

pub fn print_upload_error(upload: &Path, reason: &str) {
    println!();
    println!("   {} {}", "Upload:".dimmed(), upload.display());
    println!("   {} {}", "Error:".red().bold(), reason);
}

pub fn performance_lines(curve: &PerformanceCurve) -> Vec<String> {
    let mut lines = vec![format!(
        "{:>5}  {:>8}  {:<w$}  {:>6}",
        "epoch",
        "accuracy",
        "",
        "loss",
        w = BAR_WIDTH / 2
    )];
    for e in &curve.epochs {
        lines.push(format!(
            "{:>5}  {:>8.3}  {:<w$}  {:>6.3}  {}",
            e.epoch,
            e.accuracy,
            bar(e.accuracy, 1.0, BAR_WIDTH / 2),
            e.loss,
            bar(e.loss, 1.0, BAR_WIDTH / 2),
            w = BAR_WIDTH / 2
        ));
    }
    lines
}

pub fn histogram_lines(hist: &DistanceHistogram) -> Vec<String> {
    let max = hist.max_count() as f64;
    hist.bins
        .iter()
        .map(|b| {
            format!(
                "[{:>6.1}, {:>6.1}]  {:>3}  {}",
                b.lower,
                b.upper,
                b.count,
                bar(b.count as f64, max, BAR_WIDTH)
            )
        })
        .collect()
}

pub fn breakdown_lines(breakdown: &LegitimacyBreakdown) -> Vec<String> {
    let total = breakdown.total() as f64;
    let row = |label: &str, count: u64, pct: Option<f64>| {
        let pct = pct
            .map(|p| format!("{:.1}%", p))
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{:<15} {:>6} {:>4}  {}",
            label,
            pct,
            count,
            bar(count as f64, total, BAR_WIDTH)
        )
    };
    vec![
        row("Legitimate", breakdown.legitimate, breakdown.legitimate_pct),
        row(
            "Not Legitimate",
            breakdown.non_legitimate,
            breakdown.non_legitimate_pct,
        ),
    ]
}

pub fn print_section(title: &str, lines: &[String]) {
    println!();
    println!("{}", title.bold().underline());
    for line in lines {
        println!("   {}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logoguard_core::{
        find_best_match, EpochMetrics, PerceptualHash, ReferenceIndex, SessionTally,
    };

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(5.0, 10.0, 10).chars().count(), 5);
        assert_eq!(bar(10.0, 10.0, 10).chars().count(), 10);
        assert_eq!(bar(20.0, 10.0, 10).chars().count(), 10);
        assert_eq!(bar(0.0, 10.0, 10), "");
        assert_eq!(bar(3.0, 0.0, 10), "");
    }

    #[test]
    fn test_match_lines_show_reference_path() {
        let index: ReferenceIndex = [("acme.png", PerceptualHash::from_u64(0))]
            .into_iter()
            .collect();
        let result = find_best_match(&PerceptualHash::from_u64(1), &index, 5);
        let refs = Path::new("logos");

        let lines = match_lines(Path::new("upload.png"), refs, &result);
        let expected = refs.join("acme.png").display().to_string();
        assert!(lines
            .iter()
            .any(|l| l.contains("Reference image:") && l.contains(&expected)));
        assert!(lines.iter().any(|l| l.contains("LEGITIMATE")));
    }

    #[test]
    fn test_match_lines_without_match() {
        let result = find_best_match(&PerceptualHash::from_u64(1), &ReferenceIndex::new(), 5);
        let lines = match_lines(Path::new("upload.png"), Path::new("logos"), &result);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("No match found."));
        assert!(!lines.iter().any(|l| l.contains("Reference image:")));
    }

    #[test]
    fn test_histogram_lines() {
        let hist = DistanceHistogram::from_distances(&[0, 10, 10], 2).unwrap();
        let lines = histogram_lines(&hist);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("[   0.0,    5.0]    1"));
        assert!(lines[1].contains(&"█".repeat(BAR_WIDTH)));
    }

    #[test]
    fn test_breakdown_lines_empty_session() {
        let lines = breakdown_lines(&LegitimacyBreakdown::from_tally(&SessionTally::new()));
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Legitimate"));
        assert!(lines[0].contains(" - "));
    }

    #[test]
    fn test_performance_lines() {
        let curve = PerformanceCurve {
            epochs: vec![EpochMetrics {
                epoch: 1,
                accuracy: 0.9,
                loss: 0.25,
            }],
        };
        let lines = performance_lines(&curve);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("0.900"));
        assert!(lines[1].contains("0.250"));
    }
}
