#![forbid(unsafe_code)]

use crate::tracker::TrackerConfig;
use std::path::{Path, PathBuf};
use tracing::warn;

const DEFAULT_WORK_ITEMS: &str = "8-REALIZATION/backlog/work-items.yaml";
const DEFAULT_GITHUB_ORG: &str = "techseed-codex";
const DEFAULT_PROJECT_NUMBER: i64 = 2;

/// Settings resolved once at startup. Flags win over environment variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RuntimeConfig {
    pub(crate) work_items: PathBuf,
    pub(crate) create_backup: bool,
    pub(crate) tracker: TrackerConfig,
}

impl RuntimeConfig {
    pub(crate) fn from_process() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::resolve(std::env::args().skip(1), |key| std::env::var(key).ok(), &cwd)
    }

    pub(crate) fn resolve(
        args: impl IntoIterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
        cwd: &Path,
    ) -> Self {
        let mut work_items: Option<PathBuf> = None;
        let mut no_backup = false;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            if arg == "--work-items"
                && let Some(value) = args.next()
            {
                work_items = Some(PathBuf::from(value));
            } else if let Some(value) = arg.strip_prefix("--work-items=") {
                work_items = Some(PathBuf::from(value));
            } else if arg == "--no-backup" {
                no_backup = true;
            }
        }

        let work_items = work_items
            .or_else(|| non_empty(env("WBS_WORK_ITEMS_PATH")).map(PathBuf::from))
            .unwrap_or_else(|| repo_root(cwd).join(DEFAULT_WORK_ITEMS));
        let no_backup = no_backup || env("WBS_MCP_NO_BACKUP").as_deref().is_some_and(truthy);

        let project_number = match non_empty(env("GITHUB_PROJECT_NUMBER")) {
            None => DEFAULT_PROJECT_NUMBER,
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(value = %raw, "ignoring non-numeric GITHUB_PROJECT_NUMBER");
                DEFAULT_PROJECT_NUMBER
            }),
        };

        Self {
            work_items,
            create_backup: !no_backup,
            tracker: TrackerConfig {
                org: non_empty(env("GITHUB_ORG")).unwrap_or_else(|| DEFAULT_GITHUB_ORG.to_string()),
                project_number,
                gh_bin: non_empty(env("WBS_MCP_GH_BIN")).unwrap_or_else(|| "gh".to_string()),
            },
        }
    }
}

/// Nearest ancestor of `cwd` holding `.git`; `cwd` itself when there is none.
fn repo_root(cwd: &Path) -> PathBuf {
    cwd.ancestors()
        .find(|dir| dir.join(".git").exists())
        .unwrap_or(cwd)
        .to_path_buf()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
