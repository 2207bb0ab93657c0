#![forbid(unsafe_code)]

use crate::tracker::review::UnresolvedThreads;

const MAX_COMMENT_CHARS: usize = 500;
const SHORT_ID_CHARS: usize = 12;

fn truncate(body: &str) -> String {
    match body.char_indices().nth(MAX_COMMENT_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

fn short_id(thread_id: &str) -> &str {
    match thread_id.char_indices().nth(SHORT_ID_CHARS) {
        Some((cut, _)) => &thread_id[..cut],
        None => thread_id,
    }
}

pub(crate) fn render_threads(found: &UnresolvedThreads) -> String {
    if found.threads.is_empty() {
        return format!("✅ PR #{}: No unresolved review threads", found.pr_number);
    }
    let mut lines = vec![
        format!(
            "📋 PR #{}: {} unresolved review thread(s)",
            found.pr_number,
            found.threads.len()
        ),
        String::new(),
    ];
    for (n, thread) in found.threads.iter().enumerate() {
        let line = thread
            .line
            .map_or_else(|| "N/A".to_string(), |line| line.to_string());
        lines.push(format!(
            "{}. {}:{line}",
            n + 1,
            thread.path.as_deref().unwrap_or("unknown")
        ));
        lines.push(format!("   Author: @{}", thread.author));
        lines.push(format!("   Thread ID: {}", thread.thread_id));
        lines.push(format!("   Comment: {}", truncate(&thread.body)));
        lines.push(format!(
            "   Opened: {} | Comments: {}",
            thread.created_at, thread.comment_count
        ));
        lines.push(String::new());
    }
    lines.join("\n")
}

pub(crate) fn render_reply(thread_id: &str) -> String {
    format!("✅ Replied to thread {}...", short_id(thread_id))
}

pub(crate) fn render_resolve(thread_id: &str) -> String {
    format!("✅ Resolved thread {}...", short_id(thread_id))
}
