#![forbid(unsafe_code)]

//! Pull request review threads: list the unresolved ones, reply, resolve.

use super::gh::{GhCli, GraphqlVar, LOOKUP_TIMEOUT, pointer};
use super::TrackerError;
use serde_json::Value;
use tracing::info;

const THREADS_QUERY: &str = r#"
query($owner: String!, $repo: String!, $pr: Int!) {
  repository(owner: $owner, name: $repo) {
    pullRequest(number: $pr) {
      reviewThreads(first: 50) {
        nodes {
          id
          isResolved
          comments(first: 10) {
            nodes { author { login } body path line createdAt }
          }
        }
      }
    }
  }
}"#;

const REPLY_MUTATION: &str = r#"
mutation($thread: ID!, $body: String!) {
  addPullRequestReviewThreadReply(input: {pullRequestReviewThreadId: $thread, body: $body}) {
    comment { id }
  }
}"#;

const RESOLVE_MUTATION: &str = r#"
mutation($id: ID!) {
  resolveReviewThread(input: {threadId: $id}) { thread { isResolved } }
}"#;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ReviewThread {
    pub(crate) thread_id: String,
    pub(crate) path: Option<String>,
    pub(crate) line: Option<i64>,
    pub(crate) author: String,
    pub(crate) body: String,
    pub(crate) created_at: String,
    pub(crate) comment_count: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct UnresolvedThreads {
    pub(crate) pr_number: i64,
    pub(crate) threads: Vec<ReviewThread>,
}

/// Unresolved threads of `pr_number`, or of the current branch's pull request.
pub(crate) fn list_unresolved(
    gh: &GhCli,
    pr_number: Option<i64>,
) -> Result<UnresolvedThreads, TrackerError> {
    let pr_number = match pr_number {
        Some(number) => number,
        None => current_pr_number(gh)?,
    };
    let (owner, repo) = repo_slug(gh)?;
    let response = gh.graphql(
        THREADS_QUERY,
        &[
            ("owner", GraphqlVar::Raw(owner)),
            ("repo", GraphqlVar::Raw(repo)),
            ("pr", GraphqlVar::Int(pr_number)),
        ],
    )?;
    Ok(UnresolvedThreads {
        pr_number,
        threads: parse_unresolved(&response)?,
    })
}

/// Adds a reply and returns the new comment id.
pub(crate) fn reply(gh: &GhCli, thread_id: &str, body: &str) -> Result<String, TrackerError> {
    let response = gh.graphql(
        REPLY_MUTATION,
        &[
            ("thread", GraphqlVar::Raw(thread_id.to_string())),
            ("body", GraphqlVar::Raw(body.to_string())),
        ],
    )?;
    let comment_id = pointer(&response, "/data/addPullRequestReviewThreadReply/comment/id")?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| TrackerError::Parse("comment id is not a string".to_string()))?;
    info!(thread_id, comment_id = %comment_id, "replied to review thread");
    Ok(comment_id)
}

pub(crate) fn resolve(gh: &GhCli, thread_id: &str) -> Result<bool, TrackerError> {
    let response = gh.graphql(
        RESOLVE_MUTATION,
        &[("id", GraphqlVar::Raw(thread_id.to_string()))],
    )?;
    let resolved = pointer(&response, "/data/resolveReviewThread/thread/isResolved")?
        .as_bool()
        .ok_or_else(|| TrackerError::Parse("isResolved is not a boolean".to_string()))?;
    info!(thread_id, resolved, "resolved review thread");
    Ok(resolved)
}

fn current_pr_number(gh: &GhCli) -> Result<i64, TrackerError> {
    let args = ["pr", "view", "--json", "number"].map(str::to_string);
    gh.run(&args, LOOKUP_TIMEOUT)
        .ok()
        .and_then(|out| serde_json::from_str::<Value>(&out).ok())
        .and_then(|value| value.get("number").and_then(Value::as_i64))
        .ok_or_else(|| {
            TrackerError::Config("Could not determine PR number from current branch".to_string())
        })
}

fn repo_slug(gh: &GhCli) -> Result<(String, String), TrackerError> {
    let args = ["repo", "view", "--json", "owner,name"].map(str::to_string);
    gh.run(&args, LOOKUP_TIMEOUT)
        .ok()
        .and_then(|out| serde_json::from_str::<Value>(&out).ok())
        .and_then(|value| parse_repo_slug(&value))
        .ok_or_else(|| TrackerError::Config("Could not determine repository info".to_string()))
}

fn parse_repo_slug(value: &Value) -> Option<(String, String)> {
    let owner = value.pointer("/owner/login")?.as_str()?;
    let name = value.get("name")?.as_str()?;
    Some((owner.to_string(), name.to_string()))
}

/// Threads that are unresolved and have at least one comment, described by
/// their first comment.
pub(crate) fn parse_unresolved(response: &Value) -> Result<Vec<ReviewThread>, TrackerError> {
    let nodes = pointer(response, "/data/repository/pullRequest/reviewThreads/nodes")?
        .as_array()
        .ok_or_else(|| TrackerError::Parse("reviewThreads.nodes is not a list".to_string()))?;

    let mut threads = Vec::new();
    for node in nodes {
        if node.get("isResolved").and_then(Value::as_bool).unwrap_or(false) {
            continue;
        }
        let comments = node
            .pointer("/comments/nodes")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let Some(first) = comments.first() else {
            continue;
        };
        let text = |key: &str| first.get(key).and_then(Value::as_str).map(str::to_string);
        threads.push(ReviewThread {
            thread_id: node
                .get("id")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            path: text("path"),
            line: first.get("line").and_then(Value::as_i64),
            author: first
                .pointer("/author/login")
                .and_then(Value::as_str)
                .unwrap_or("ghost")
                .to_string(),
            body: text("body").unwrap_or_default(),
            created_at: text("createdAt").unwrap_or_default(),
            comment_count: comments.len(),
        });
    }
    Ok(threads)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(nodes: Value) -> Value {
        json!({"data": {"repository": {"pullRequest": {"reviewThreads": {"nodes": nodes}}}}})
    }

    #[test]
    fn resolved_and_empty_threads_are_dropped() {
        let threads = parse_unresolved(&response(json!([
            {"id": "PRRT_resolved", "isResolved": true, "comments": {"nodes": [
                {"author": {"login": "a"}, "body": "old", "path": "x.rs", "line": 1, "createdAt": "t"}
            ]}},
            {"id": "PRRT_empty", "isResolved": false, "comments": {"nodes": []}},
            {"id": "PRRT_open", "isResolved": false, "comments": {"nodes": [
                {"author": {"login": "reviewer"}, "body": "rename this", "path": "src/lib.rs", "line": 12, "createdAt": "2024-05-01T10:00:00Z"},
                {"author": {"login": "dev"}, "body": "done", "path": "src/lib.rs", "line": 12, "createdAt": "2024-05-01T11:00:00Z"}
            ]}}
        ])))
        .expect("threads");

        assert_eq!(
            threads,
            vec![ReviewThread {
                thread_id: "PRRT_open".to_string(),
                path: Some("src/lib.rs".to_string()),
                line: Some(12),
                author: "reviewer".to_string(),
                body: "rename this".to_string(),
                created_at: "2024-05-01T10:00:00Z".to_string(),
                comment_count: 2,
            }]
        );
    }

    #[test]
    fn outdated_comments_have_no_line_and_deleted_authors_show_as_ghost() {
        let threads = parse_unresolved(&response(json!([
            {"id": "PRRT_1", "isResolved": false, "comments": {"nodes": [
                {"author": null, "body": "b", "path": null, "line": null, "createdAt": "t"}
            ]}}
        ])))
        .expect("threads");
        assert_eq!(threads[0].line, None);
        assert_eq!(threads[0].path, None);
        assert_eq!(threads[0].author, "ghost");
    }

    #[test]
    fn missing_pull_request_is_a_parse_error() {
        let err = parse_unresolved(&json!({"data": {"repository": {"pullRequest": null}}}))
            .expect_err("no pull request");
        assert!(matches!(err, TrackerError::Parse(_)));
    }

    #[test]
    fn repo_slug_reads_owner_login() {
        let value = json!({"owner": {"login": "acme"}, "name": "backlog"});
        assert_eq!(
            parse_repo_slug(&value),
            Some(("acme".to_string(), "backlog".to_string()))
        );
        assert_eq!(parse_repo_slug(&json!({"name": "x"})), None);
    }
}
