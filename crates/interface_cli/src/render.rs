//! Plain-text views of the desk
//!
//! Every function returns a `String` so views can be asserted on directly.

use std::fmt::Write;

use domain_claims::{
    Claim, ClusterReport, DeskChange, ReviewPanel, ScoringResult, ScoringStage, SummaryCounters,
};

/// Marker printed next to features that push the score towards fraud
pub const RISK_MARKER: &str = "▲";

/// Counter strip: `Total 120 | Pending 3 | Approved 90 | Rejected 27`
pub fn summary_line(counters: &SummaryCounters) -> String {
    format!(
        "Total {} | Pending {} | Approved {} | Rejected {}",
        counters.total, counters.pending, counters.approved, counters.rejected
    )
}

/// Queue table for the claims currently visible
pub fn queue_table(claims: &[Claim], loading: bool) -> String {
    if claims.is_empty() {
        return if loading { "Loading…".to_string() } else { "No pending claims.".to_string() };
    }

    let mut out = format!(
        "{:<12} {:<10} {:<10} {:>12} {:<5} {}\n",
        "Claim", "Provider", "Start", "Reimbursed", "DRG", "Status"
    );
    for claim in claims {
        let _ = writeln!(
            out,
            "{:<12} {:<10} {:<10} {:>12} {:<5} {}",
            claim.id.as_str(),
            claim.provider_id.as_ref().map(|p| p.to_string()).unwrap_or_default(),
            claim.start_date.map(|d| d.to_string()).unwrap_or_default(),
            claim.amount_reimbursed.map(|a| a.to_string()).unwrap_or_default(),
            claim.diagnosis_group_code.as_deref().unwrap_or(""),
            claim.status.as_str(),
        );
    }
    if loading {
        out.push_str("(refreshing…)\n");
    }
    out.trim_end().to_string()
}

/// Review panel for the open claim
pub fn panel_view(panel: &ReviewPanel) -> String {
    let claim = panel.claim();
    let mut out = format!("Review {}", claim.id);
    if let Some(provider) = &claim.provider_id {
        let _ = write!(out, "  provider {provider}");
    }
    if let Some(amount) = &claim.amount_reimbursed {
        let _ = write!(out, "  reimbursed {amount}");
    }
    out.push('\n');

    match panel.scoring() {
        ScoringStage::InFlight => out.push_str("Scoring…\n"),
        ScoringStage::Failed { message } => {
            let _ = writeln!(out, "Scoring failed: {message}");
        }
        ScoringStage::Scored(result) => scoring_view(&mut out, result, panel.shows_raw()),
    }

    if panel.is_busy() {
        out.push_str("Submitting decision…\n");
    } else if panel.scoring_result().is_some() || matches!(panel.scoring(), ScoringStage::Failed { .. }) {
        out.push_str("[approve] [reject] [close]\n");
    }
    out.trim_end().to_string()
}

fn scoring_view(out: &mut String, result: &ScoringResult, show_raw: bool) {
    let label = if result.label.is_known() { result.label.as_wire() } else { "n/a" };
    let _ = write!(out, "Label: {label}");
    if let Some(percent) = result.probability_percent() {
        let _ = write!(out, "  Probability: {percent}");
    }
    out.push('\n');

    if let Some(explanation) = &result.explanation {
        let _ = writeln!(out, "{explanation}");
    }

    if !result.top_features.is_empty() {
        out.push_str("Top features:\n");
        for feature in &result.top_features {
            let marker = if feature.raises_risk() { RISK_MARKER } else { " " };
            let _ = writeln!(
                out,
                "  {marker} {:<28} {:>12} {:+.4}",
                feature.name, feature.value.to_string(), feature.impact
            );
        }
    }

    if let Some(raw) = &result.raw {
        if show_raw {
            out.push_str("Raw response:\n");
            let pretty = serde_json::to_string_pretty(raw).unwrap_or_else(|_| raw.to_string());
            let _ = writeln!(out, "{pretty}");
            out.push_str("[raw] Hide Raw\n");
        } else {
            out.push_str("[raw] Show Raw\n");
        }
    }
}

/// Error banner, if any
pub fn banner(message: Option<&str>) -> Option<String> {
    message.map(|m| format!("Error: {m}"))
}

/// Result of a fraud ring lookup
pub fn cluster_view(report: &ClusterReport) -> String {
    let mut out = format!("Provider {}: ", report.provider_id);
    if report.in_ring {
        let _ = writeln!(out, "Suspicious Ring Found ({} providers)", report.cluster_size);
        if !report.providers_in_cluster.is_empty() {
            let members: Vec<String> = report.providers_in_cluster.iter().map(|p| p.to_string()).collect();
            let _ = writeln!(out, "Members: {}", members.join(", "));
        }
        for link in &report.suspicious_links {
            let _ = writeln!(
                out,
                "  {} <-> {}  shared beneficiaries: {}",
                link.provider1, link.provider2, link.shared_count
            );
        }
    } else {
        let _ = writeln!(out, "No Ring (cluster size {})", report.cluster_size);
        if let Some(reason) = &report.reason {
            let _ = writeln!(out, "{reason}");
        }
    }
    out.trim_end().to_string()
}

/// One-line notice for a desk change; `None` when the change only
/// warrants a redraw
pub fn change_notice(change: &DeskChange) -> Option<String> {
    match change {
        DeskChange::DecisionPersisted { claim_id, decision } => {
            Some(format!("{claim_id} marked {decision}. Reloading queue…"))
        }
        DeskChange::DecisionFailed(message) | DeskChange::LoadFailed(message) => banner(Some(message)),
        _ => None,
    }
}
