//! Output formatting for CLI display.

use jiff::Timestamp;

use crate::clock::{Clock, elapsed_seconds};
use crate::metrics::format_duration;
use crate::model::{Candidate, MinistryResult, MinistryStatus, Stage};
use crate::notify::Notifier;
use crate::report::{Report, tally};
use crate::session::Committee;
use crate::store::KeyValueStore;

pub(super) fn stage_name(stage: Stage) -> &'static str {
    match stage {
        Stage::Explanation => "explanation",
        Stage::Nomination => "nomination",
        Stage::Voting => "voting",
    }
}

/// `Stage 2/3: nomination`
pub(super) fn format_stage(stage: Stage) -> String {
    format!("Stage {}/3: {}", stage.number(), stage_name(stage))
}

pub(super) fn format_ministry_status(status: MinistryStatus) -> String {
    match status {
        MinistryStatus::Pending => "pending".to_string(),
        MinistryStatus::Active(stage) => format!("active ({})", stage_name(stage)),
        MinistryStatus::Finalized => "done".to_string(),
    }
}

/// One line per candidate, in nomination order, with a short id.
pub(super) fn format_candidates(candidates: &[Candidate]) -> String {
    if candidates.is_empty() {
        return "No candidates\n".to_string();
    }
    candidates
        .iter()
        .map(|c| {
            let short_id = &c.id.to_string()[..8];
            format!("{short_id}  {:>3}  {}\n", c.votes, c.name)
        })
        .collect()
}

pub(super) fn format_result(result: &MinistryResult) -> String {
    let header = format!(
        "{} ({}) in {}\n",
        result.ministry_name,
        result.seat_name,
        format_duration(result.elapsed_seconds)
    );
    if result.closed_without_candidates {
        return format!("{header}  closed without candidates\n");
    }
    let lines: String = tally(&result.candidates)
        .into_iter()
        .map(|line| {
            let mark = if result.winner.as_deref() == Some(line.name.as_str()) {
                "*"
            } else {
                " "
            };
            format!("  {mark} {:>3} {:>3}%  {}\n", line.votes, line.percent, line.name)
        })
        .collect();
    header + &lines
}

pub(super) fn format_duration_line(started_at: Option<Timestamp>, now: Timestamp) -> String {
    match started_at {
        Some(start) => format!("Duration: {}", format_duration(elapsed_seconds(start, now))),
        None => "The committee clock was never started.".to_string(),
    }
}

pub(super) fn format_status<S, N, C>(committee: &Committee<S, N, C>) -> String
where
    S: KeyValueStore,
    N: Notifier,
    C: Clock,
{
    let church = match committee.church_name() {
        "" => "(no church name)",
        name => name,
    };
    let mut lines = vec![
        church.to_string(),
        format!(
            "{}/{} ministries done ({}%), about {} left",
            committee.finalized_count(),
            committee.visible_ministries().len(),
            committee.completion_percentage(),
            format_duration(committee.estimated_remaining_seconds())
        ),
    ];
    if let Some(start) = committee.started_at() {
        lines.push(format_duration_line(Some(start), committee.clock().now()));
    }
    if committee.is_closed() {
        lines.push("Committee closed".to_string());
    }

    let Some(ministry) = committee.active_ministry() else {
        lines.push(String::new());
        lines.push("No ministry selected".to_string());
        return lines.join("\n") + "\n";
    };
    lines.push(String::new());
    lines.push(format!("{} - {}", ministry.name, format_stage(committee.stage())));
    lines.push(format!("Seats: {}", committee.seat_count(&ministry.id)));

    let mut out = lines.join("\n") + "\n";
    if committee.stage() != Stage::Explanation {
        out.push_str(&format_candidates(committee.candidates()));
    }
    if committee.stage() == Stage::Voting {
        out.push_str(&format!("Total votes: {}\n", committee.total_votes()));
    }
    if committee.stage() == Stage::Nomination {
        let suggestions = committee.suggestions();
        if !suggestions.is_empty() {
            out.push_str(&format!("Suggestions: {}\n", suggestions.join(", ")));
        }
    }
    out
}

pub(super) fn format_report(report: &Report) -> String {
    let mut lines = vec![format!("Nominating committee report: {}", report.church_name)];
    if let Some(start) = report.started_at {
        lines.push(format!("Started {start}"));
    }
    for entry in &report.entries {
        lines.push(String::new());
        lines.push(format!("{} ({} seats)", entry.ministry_name, entry.seat_count));
        if entry.closed_without_candidates {
            lines.push("  closed without candidates".to_string());
            continue;
        }
        lines.extend(
            entry
                .elected
                .iter()
                .enumerate()
                .map(|(i, name)| format!("  {}. {name}", i + 1)),
        );
    }
    lines.push(String::new());
    lines.push(format!("Total elected: {}", report.total_elected));
    lines.push(format!(
        "Total time: {}",
        format_duration(report.total_elapsed_seconds)
    ));
    lines.join("\n") + "\n"
}
