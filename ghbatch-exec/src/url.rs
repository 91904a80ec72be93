//! Remote URL → `owner/name`.
//!
//! Accepted forms:
//!
//! ```text
//! https://github.com/owner/name(.git)
//! ssh://git@github.com[:22]/owner/name(.git)
//! git@github.com:owner/name(.git)
//! ```
//!
//! Anything else (local paths, nested groups) yields `None`.

use ghbatch_core::RepoSlug;

pub fn parse_remote_url(url: &str) -> Option<RepoSlug> {
    let url = url.trim();
    let path = if let Some((_, rest)) = url.split_once("://") {
        let (_authority, path) = rest.split_once('/')?;
        path
    } else {
        let (authority, path) = url.split_once(':')?;
        if authority.is_empty() || authority.contains('/') {
            return None;
        }
        path
    };

    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let (owner, name) = path.split_once('/')?;
    if owner.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }
    Some(RepoSlug::new(owner, name))
}
