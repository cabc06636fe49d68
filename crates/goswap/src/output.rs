//! Console wording for notices, outcomes and list lines.

use goswap_core::{ListEntry, Notice, RemoveOutcome, UseOutcome};

pub fn notice_line(notice: &Notice) -> String {
    match notice {
        Notice::NotInstalled { version } => {
            format!("{version} is not installed. Looking for it on go.dev ...")
        }
        Notice::MissingSdk { version } => format!("{version} SDK is missing. Starting download ..."),
        Notice::SwitchedToMain { version } => format!("Switched to {version} (main)"),
    }
}

pub fn use_line(outcome: &UseOutcome) -> String {
    match outcome {
        UseOutcome::AlreadyActive { version } => format!("{version} is already in use"),
        UseOutcome::SwitchedToMain { version } => format!("Switched to {version} (main)"),
        UseOutcome::Switched { version } => format!("Switched to {version}"),
    }
}

pub fn remove_line(outcome: &RemoveOutcome) -> String {
    format!("Removed {}", outcome.version)
}

/// `*` marks the current version; the version column is padded to ten.
pub fn list_line(entry: &ListEntry) -> String {
    let marker = if entry.current { "*" } else { " " };
    let extra = entry
        .annotation
        .map(|annotation| format!(" ({})", annotation.as_str()))
        .unwrap_or_default();
    format!("{marker} {:<10}{extra}", entry.version)
}
