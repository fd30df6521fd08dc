//! Plan formatting for user review

use std::fmt::Write;

use similar::{ChangeTag, TextDiff};

use crate::storage::StoreEntity;

use super::ReconcilePlan;

/// Format a reconcile plan for terminal display
///
/// Updates are rendered as a line diff of the entities' pretty-printed JSON.
#[must_use]
pub fn format_plan<T: StoreEntity>(label: &str, plan: &ReconcilePlan<T>) -> String {
    let mut output = String::new();

    writeln!(output, "=== {label} ===").unwrap();
    if plan.is_empty() {
        writeln!(output, "No changes").unwrap();
        return output;
    }

    for entity in &plan.removed {
        writeln!(output, "REMOVE: {} ({})", entity.name(), entity.id()).unwrap();
    }
    for entity in &plan.added {
        writeln!(output, "ADD: {} ({})", entity.name(), entity.id()).unwrap();
    }
    for (stored, working) in &plan.updated {
        writeln!(output, "MODIFY: {} ({})", working.name(), working.id()).unwrap();
        for line in entity_diff(stored, working).lines() {
            writeln!(output, "  {line}").unwrap();
        }
    }

    output
}

/// Generate a unified line diff between the JSON forms of two entities
#[must_use]
pub fn entity_diff<T: StoreEntity>(old: &T, new: &T) -> String {
    let old_json = serde_json::to_string_pretty(old).unwrap_or_default();
    let new_json = serde_json::to_string_pretty(new).unwrap_or_default();

    let diff = TextDiff::from_lines(&old_json, &new_json);
    let mut output = String::new();

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => "-",
            ChangeTag::Insert => "+",
            ChangeTag::Equal => " ",
        };
        output.push_str(sign);
        output.push_str(change.value());
        if !change.value().ends_with('\n') {
            output.push('\n');
        }
    }

    output
}
