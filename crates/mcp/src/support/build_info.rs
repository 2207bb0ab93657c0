#![forbid(unsafe_code)]

pub(crate) fn build_git_sha() -> Option<&'static str> {
    option_env!("WBS_GIT_SHA")
        .map(str::trim)
        .filter(|sha| !sha.is_empty())
}

/// `<git sha>` of the build, or `unknown` outside a checkout.
pub(crate) fn build_fingerprint() -> &'static str {
    build_git_sha().unwrap_or("unknown")
}
