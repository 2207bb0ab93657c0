#![forbid(unsafe_code)]

/// What happened to the optional tracker push after a local write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum SyncOutcome {
    NotRequested,
    Synced,
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct UpdateOutcome {
    pub(crate) record_id: String,
    pub(crate) issue_number: i64,
    pub(crate) fields: Vec<String>,
    pub(crate) sync: SyncOutcome,
}

pub(crate) fn render_update(outcome: &UpdateOutcome) -> String {
    let mut lines = vec![
        format!("✅ Successfully updated {}", outcome.record_id),
        format!("   Updated fields: {}", outcome.fields.join(", ")),
    ];
    match &outcome.sync {
        SyncOutcome::NotRequested => {}
        SyncOutcome::Synced => {
            lines.push(format!("   ✓ Synced to GitHub issue #{}", outcome.issue_number));
        }
        SyncOutcome::Failed(reason) => {
            lines.push(format!("   ⚠️  GitHub sync failed: {reason}"));
        }
    }
    lines.join("\n")
}
