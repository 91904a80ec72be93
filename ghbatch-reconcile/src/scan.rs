//! Scan/export: the reconciliation flow run backwards.
//!
//! Walks the immediate child directories of the scan root. For each one with
//! git metadata the remote listing is dumped to `remotes.log`; listings with
//! more than two entries go to `remotes-debug.log` and are never exported.
//! For a standard fetch+push pair the `owner/name` is parsed from the fetch
//! URL and classified. Public, non-fork repositories not yet marked done are
//! written to the exported projects file, ready to be fed back in as a
//! projects list.

use std::path::{Path, PathBuf};

use chrono::Local;

use ghbatch_core::{Config, Description, LinkShape, LocalRepoLink, Marker, RemoteRepositoryState};
use ghbatch_exec::parse_remote_url;

use crate::classify::{classify, Disposition};
use crate::context::Context;
use crate::error::{io_err, ReconcileError};
use crate::run_log::{RunLog, Tag, TextLog};

/// Side logs written during a scan.
#[derive(Debug)]
pub struct ScanLogs {
    pub remotes: TextLog,
    pub ambiguous: TextLog,
}

impl ScanLogs {
    pub fn open(config: &Config) -> Result<Self, ReconcileError> {
        Ok(Self {
            remotes: TextLog::open(&config.remotes_log_path())?,
            ambiguous: TextLog::open(&config.remotes_debug_log_path())?,
        })
    }
}

/// Outcome of a scan run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Directories with git metadata that were looked at.
    pub scanned: usize,
    /// Exported repository names, in scan order.
    pub exported: Vec<String>,
    /// Directories with more than two remote entries.
    pub ambiguous: Vec<PathBuf>,
    pub skipped: usize,
}

enum ScanItem {
    Exported { name: String, line: String },
    Ambiguous,
    Skipped,
}

/// Child directories of `root` that contain `.git`, sorted by name.
pub fn candidates(root: &Path) -> Result<Vec<PathBuf>, ReconcileError> {
    let mut dirs: Vec<PathBuf> = std::fs::read_dir(root)
        .map_err(|e| io_err(root, e))?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|e| e.path())
        .filter(|p| p.join(".git").exists())
        .collect();
    dirs.sort();
    Ok(dirs)
}

/// Export decision: exactly two remote entries, and the remote repository is
/// public, not a fork, and not marked done.
pub fn export_filter(link: &LocalRepoLink, state: Option<&RemoteRepositoryState>) -> bool {
    link.shape() == LinkShape::Standard
        && matches!(state, Some(s) if !s.is_private && !s.is_fork && s.marker() != Marker::Done)
}

/// A projects-list line for an exported repository.
pub fn export_line(name: &str, description: Option<&Description>) -> String {
    match description.filter(|d| !d.text.is_empty()) {
        Some(d) => format!("{name} --public --description \"{}\"", escape(&d.text)),
        None => format!("{name} --public"),
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

/// Scan `config.scan_root` and rewrite the exported projects file.
pub fn run(
    ctx: &Context<'_>,
    log: &mut RunLog,
    logs: &mut ScanLogs,
) -> Result<ScanReport, ReconcileError> {
    let root = &ctx.config.scan_root;
    let mut report = ScanReport::default();
    let mut lines = Vec::new();

    for dir in candidates(root)? {
        report.scanned += 1;
        match scan_one(ctx, log, logs, &dir) {
            Ok(ScanItem::Exported { name, line }) => {
                report.exported.push(name);
                lines.push(line);
            }
            Ok(ScanItem::Ambiguous) => report.ambiguous.push(dir),
            Ok(ScanItem::Skipped) => report.skipped += 1,
            Err(err) => {
                log.record(Tag::Error, format!("{}: {err}", dir.display()));
                report.skipped += 1;
            }
        }
    }

    write_exported(&ctx.config.exported_projects_file, root, &lines)?;
    log.record(
        Tag::Info,
        format!(
            "scan of {} exported {} of {} repositories to {}",
            root.display(),
            report.exported.len(),
            report.scanned,
            ctx.config.exported_projects_file.display()
        ),
    );
    Ok(report)
}

fn scan_one(
    ctx: &Context<'_>,
    log: &mut RunLog,
    logs: &mut ScanLogs,
    dir: &Path,
) -> Result<ScanItem, ReconcileError> {
    let link = LocalRepoLink {
        directory: dir.to_path_buf(),
        has_git_metadata: true,
        remotes: ctx.git.remote_list(dir)?,
    };
    dump_remotes(&mut logs.remotes, &link);

    if link.is_ambiguous() {
        dump_remotes(&mut logs.ambiguous, &link);
        log.record(
            Tag::Warn,
            format!(
                "{}: {} remote entries; ambiguous, not exported",
                dir.display(),
                link.remotes.len()
            ),
        );
        return Ok(ScanItem::Ambiguous);
    }
    if link.shape() != LinkShape::Standard {
        tracing::debug!(dir = %dir.display(), remotes = link.remotes.len(), "not a standard link");
        return Ok(ScanItem::Skipped);
    }
    let Some(slug) = link.fetch_url().and_then(parse_remote_url) else {
        tracing::debug!(dir = %dir.display(), "fetch URL has no owner/name");
        return Ok(ScanItem::Skipped);
    };

    let classification = classify(ctx, &slug, None)?;
    let state = classification.state.as_ref();
    if export_filter(&link, state) {
        let line = export_line(&slug.name, state.and_then(|s| s.description.as_ref()));
        log.record(Tag::Info, format!("export {slug}"));
        return Ok(ScanItem::Exported {
            name: slug.name,
            line,
        });
    }

    let reason = match classification.disposition {
        Disposition::ExistsPublicNonFork => "done".to_string(),
        other => other.to_string(),
    };
    log.record(Tag::Skip, format!("{slug} not exported ({reason})"));
    Ok(ScanItem::Skipped)
}

fn dump_remotes(text: &mut TextLog, link: &LocalRepoLink) {
    let mut result = text.append_stamped(&format!("{}:", link.directory.display()));
    for entry in &link.remotes {
        result = result.and_then(|()| text.append_line(&format!("  {entry}")));
    }
    if let Err(err) = result {
        tracing::warn!(path = %text.path().display(), error = %err, "remote log write failed");
    }
}

/// Truncate and rewrite the exported projects file.
///
/// Write flow: `.tmp` sibling → `rename`, as for every other regenerated file.
fn write_exported(path: &Path, root: &Path, lines: &[String]) -> Result<(), ReconcileError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    let mut contents = format!(
        "# exported by ghbatch scan of {} at {}\n",
        root.display(),
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    for line in lines {
        contents.push_str(line);
        contents.push('\n');
    }

    let tmp = PathBuf::from(format!("{}.tmp", path.display()));
    std::fs::write(&tmp, contents).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::Harness;
    use ghbatch_core::grammar::parse_project_line;
    use ghbatch_core::lists::load_projects;
    use ghbatch_core::{Direction, RemoteEntry, RepoSlug};
    use rstest::rstest;

    fn link_with(count: usize) -> LocalRepoLink {
        LocalRepoLink {
            directory: PathBuf::from("/scan/r"),
            has_git_metadata: true,
            remotes: (0..count)
                .map(|i| RemoteEntry {
                    name: "origin".to_string(),
                    url: "git@github.com:alice/r.git".to_string(),
                    direction: if i % 2 == 0 { Direction::Fetch } else { Direction::Push },
                })
                .collect(),
        }
    }

    fn remote(is_private: bool, is_fork: bool, marker: Marker) -> RemoteRepositoryState {
        RemoteRepositoryState {
            full_name: RepoSlug::new("alice", "r"),
            description: Some(Description::new(marker, "text")),
            is_private,
            is_fork,
        }
    }

    #[rstest]
    #[case(2, false, false, Marker::Unmarked, true)]
    #[case(2, false, false, Marker::NeedsAttention, true)]
    #[case(2, false, false, Marker::Done, false)]
    #[case(2, true, false, Marker::Unmarked, false)]
    #[case(2, false, true, Marker::Unmarked, false)]
    #[case(1, false, false, Marker::Unmarked, false)]
    #[case(4, false, false, Marker::Unmarked, false)]
    #[case(0, false, false, Marker::Unmarked, false)]
    fn export_filter_table(
        #[case] count: usize,
        #[case] is_private: bool,
        #[case] is_fork: bool,
        #[case] marker: Marker,
        #[case] expected: bool,
    ) {
        let state = remote(is_private, is_fork, marker);
        assert_eq!(export_filter(&link_with(count), Some(&state)), expected);
    }

    #[test]
    fn missing_remote_is_never_exported() {
        assert!(!export_filter(&link_with(2), None));
    }

    #[test]
    fn export_line_round_trips_through_the_grammar() {
        let d = Description::unmarked(r#"say "hi" \ bye"#);
        let line = export_line("repoE", Some(&d));
        let spec = parse_project_line(&line).unwrap();
        assert_eq!(spec.name, "repoE");
        assert_eq!(spec.visibility(), Some("public"));
        assert_eq!(spec.description.unwrap().text, d.text);

        let dashed = Description::unmarked("--private mirror - of a tool");
        let spec = parse_project_line(&export_line("repoM", Some(&dashed))).unwrap();
        assert_eq!(spec.description.as_ref().unwrap().text, dashed.text);
        assert_eq!(spec.visibility(), Some("public"));
        assert_eq!(spec.flags.len(), 1);

        assert_eq!(export_line("bare", None), "bare --public");
        assert_eq!(export_line("bare", Some(&Description::unmarked(""))), "bare --public");
    }

    #[test]
    fn scan_exports_qualifying_and_flags_ambiguous() {
        let h = Harness::new();
        let public = h.scan_git_dir("public-one");
        h.git.set_remotes(&public, &[("origin", "https://github.com/alice/public-one.git")]);
        h.host.insert(
            "alice/public-one",
            Some(Description::unmarked("A public tool")),
            false,
            false,
        );

        let private = h.scan_git_dir("private-one");
        h.git.set_remotes(&private, &[("origin", "git@github.com:alice/private-one.git")]);
        h.host.insert("alice/private-one", None, true, false);

        let done = h.scan_git_dir("done-one");
        h.git.set_remotes(&done, &[("origin", "git@github.com:alice/done-one.git")]);
        h.host.insert(
            "alice/done-one",
            Some(Description::new(Marker::Done, "finished")),
            false,
            false,
        );

        let ambiguous = h.scan_git_dir("two-remotes");
        h.git.set_remotes(
            &ambiguous,
            &[
                ("origin", "git@github.com:alice/two-remotes.git"),
                ("upstream", "git@github.com:bob/two-remotes.git"),
            ],
        );

        let local_only = h.scan_git_dir("local-only");
        h.git.set_remotes(&local_only, &[("origin", "/srv/git/local-only.git")]);

        std::fs::create_dir_all(h.config.scan_root.join("not-a-repo")).unwrap();

        let ctx = h.ctx();
        let mut log = RunLog::detached();
        let mut logs = ScanLogs::open(&h.config).unwrap();
        let report = run(&ctx, &mut log, &mut logs).unwrap();

        assert_eq!(report.scanned, 5);
        assert_eq!(report.exported, vec!["public-one".to_string()]);
        assert_eq!(report.ambiguous, vec![ambiguous.clone()]);
        assert_eq!(report.skipped, 3);

        let exported = load_projects(&h.config.exported_projects_file).unwrap();
        assert_eq!(exported.projects.len(), 1);
        assert_eq!(
            exported.projects[0].description.as_ref().unwrap().text,
            "A public tool"
        );

        let debug = std::fs::read_to_string(h.config.remotes_debug_log_path()).unwrap();
        assert!(debug.contains("two-remotes"));
        assert!(!debug.contains("public-one"));
        let remotes = std::fs::read_to_string(h.config.remotes_log_path()).unwrap();
        assert!(remotes.contains("public-one"));
        assert!(remotes.contains("origin\thttps://github.com/alice/public-one.git (fetch)"));

        assert!(log.contains(Tag::Skip, "alice/private-one not exported (private)"));
        assert!(log.contains(Tag::Skip, "alice/done-one not exported (done)"));
        assert!(log.contains(Tag::Warn, "ambiguous"));
    }

    #[test]
    fn rescan_replaces_previous_export() {
        let h = Harness::new();
        let dir = h.scan_git_dir("first");
        h.git.set_remotes(&dir, &[("origin", "git@github.com:alice/first.git")]);
        h.host.insert("alice/first", None, false, false);
        let ctx = h.ctx();
        let mut logs = ScanLogs::open(&h.config).unwrap();

        run(&ctx, &mut RunLog::detached(), &mut logs).unwrap();
        h.host.insert("alice/first", None, true, false);
        let report = run(&ctx, &mut RunLog::detached(), &mut logs).unwrap();

        assert!(report.exported.is_empty());
        let exported = load_projects(&h.config.exported_projects_file).unwrap();
        assert!(exported.projects.is_empty());
    }
}
