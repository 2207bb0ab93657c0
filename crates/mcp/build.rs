#![forbid(unsafe_code)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn main() {
    let manifest_dir = env::var_os("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    if let Some(sha) = head_sha(&manifest_dir) {
        let short: String = sha.chars().take(12).collect();
        println!("cargo:rustc-env=WBS_GIT_SHA={short}");
    }
}

fn head_sha(start: &Path) -> Option<String> {
    let git_dir = locate_git_dir(start)?;
    let head = git_dir.join("HEAD");
    println!("cargo:rerun-if-changed={}", head.display());

    let text = fs::read_to_string(&head).ok()?;
    let text = text.trim();
    match text.strip_prefix("ref:") {
        Some(reference) => loose_ref(&git_dir, reference.trim())
            .or_else(|| packed_ref(&git_dir, reference.trim())),
        None => non_empty(text),
    }
}

/// Nearest `.git` directory, following the `gitdir:` pointer of worktrees.
fn locate_git_dir(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| {
        let candidate = dir.join(".git");
        if candidate.is_dir() {
            return Some(candidate);
        }
        let pointer = fs::read_to_string(&candidate).ok()?;
        let target = pointer.lines().next()?.trim().strip_prefix("gitdir:")?;
        Some(dir.join(target.trim()))
    })
}

fn loose_ref(git_dir: &Path, reference: &str) -> Option<String> {
    let path = git_dir.join(reference);
    if !path.is_file() {
        return None;
    }
    println!("cargo:rerun-if-changed={}", path.display());
    non_empty(fs::read_to_string(&path).ok()?.trim())
}

fn packed_ref(git_dir: &Path, reference: &str) -> Option<String> {
    let path = git_dir.join("packed-refs");
    let text = fs::read_to_string(&path).ok()?;
    println!("cargo:rerun-if-changed={}", path.display());
    text.lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#') && !line.starts_with('^'))
        .filter_map(|line| line.split_once(' '))
        .find(|(_, name)| *name == reference)
        .and_then(|(sha, _)| non_empty(sha.trim()))
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
