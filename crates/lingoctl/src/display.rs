//! Rendering of screen state for the terminal.

use lingo_common::flags;
use lingo_common::screens::path::{NodeStatus, PathState};
use lingo_common::screens::profile::ProfileState;
use lingo_common::translate::Translation;
use owo_colors::OwoColorize;
use std::fmt::Write;

pub const THIN_SEP: &str = "----------------------------------------";

pub fn render_profile(state: &ProfileState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  {}", state.username.bold());
    let _ = writeln!(out, "{}", THIN_SEP);
    let _ = writeln!(
        out,
        "  Learning:       {} {}",
        state.current_flag, state.current_language
    );
    let _ = writeln!(out, "  This week:      {} points", state.weekly_points.cyan());
    let _ = writeln!(out, "  Exercises:      {}", state.total_exercises_done);
    let _ = writeln!(out, "  Total points:   {}", state.total_points);

    if !state.languages.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "[LANGUAGES]".cyan());
        for row in &state.languages {
            let _ = writeln!(
                out,
                "  {} {:<24} {:>4} exercises {:>6} points",
                row.flag, row.name, row.exercises_done, row.points_earned
            );
        }
    }
    out
}

fn node_marker(status: NodeStatus) -> String {
    match status {
        NodeStatus::Completed => "[x]".green().to_string(),
        NodeStatus::Unlocked => "[>]".yellow().to_string(),
        NodeStatus::Locked => "[ ]".dimmed().to_string(),
    }
}

pub fn render_path(state: &PathState) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {} {}  ({} points this week)",
        state.flag,
        state.language.bold(),
        state.weekly_points
    );
    let _ = writeln!(out, "{}", THIN_SEP);
    for node in &state.nodes {
        let label = match node.status {
            NodeStatus::Completed => "done",
            NodeStatus::Unlocked => "next",
            NodeStatus::Locked => "locked",
        };
        let _ = writeln!(out, "  {} node {:<2} {}", node_marker(node.status), node.index, label);
    }
    out
}

/// Country code and emoji; unknown languages get a placeholder line
pub fn render_flag(language: &str) -> String {
    let code = flags::country_code(language);
    if code.is_empty() {
        return format!("{}: no flag known", language.trim());
    }
    format!("{} {} ({})", flags::flag_emoji(code), language.trim(), code)
}

pub fn render_translation(translation: &Translation) -> String {
    match &translation.detected_source_language {
        Some(source) => format!("{}  {}", translation.text.bold(), format!("(from {})", source).dimmed()),
        None => translation.text.bold().to_string(),
    }
}
