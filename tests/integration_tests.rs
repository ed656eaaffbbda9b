//! Integration tests for git-project-index
//!
//! These tests create temporary repository layouts to exercise discovery,
//! configuration layering and routing against a real filesystem.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use git_project_index::config::{ConfigLayer, FileConfig, LayerKind, ScanOptions};
use git_project_index::observer::{RecordingObserver, ScanEvent};
use git_project_index::project::ProjectCollection;
use git_project_index::router::{self, FeedFormat, HandlerKind, ParamValue};
use git_project_index::scanner::Scanner;
use git_project_index::source::{ListedProjects, ProjectSettings, ProjectSource};

/// Helper function to create a temporary directory structure for testing
fn create_test_directory() -> TempDir {
    TempDir::new().expect("Failed to create temporary directory")
}

/// Helper function to create a file with specified content
fn create_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directories");
    }
    fs::write(path, content).expect("Failed to write file");
}

/// Create a mock bare repository with HEAD, config and optional export marker
fn create_repository(base_path: &Path, relative: &str, exported: bool) {
    let repo = base_path.join(relative);

    create_file(&repo.join("HEAD"), "ref: refs/heads/main\n");
    create_file(
        &repo.join("config"),
        "[core]\n\trepositoryformatversion = 0\n\tbare = true\n",
    );
    fs::create_dir_all(repo.join("objects").join("pack")).expect("Failed to create objects");
    fs::create_dir_all(repo.join("refs").join("heads")).expect("Failed to create refs");

    if exported {
        create_file(&repo.join("git-daemon-export-ok"), "");
    }
}

fn scan(base_path: &Path, options: ScanOptions) -> (ProjectCollection, RecordingObserver) {
    let observer = RecordingObserver::new();
    let projects = Scanner::new(base_path, options)
        .populate(&observer)
        .expect("scan failed");
    (projects, observer)
}

fn sorted_paths(projects: &ProjectCollection) -> Vec<String> {
    let mut paths: Vec<String> = projects.paths().map(str::to_owned).collect();
    paths.sort();
    paths
}

#[test]
fn test_scanner_finds_root_and_grouped_projects() {
    let temp_dir = create_test_directory();
    let base_path = temp_dir.path();

    create_repository(base_path, "a", true);
    create_repository(base_path, "group/proj2", true);
    create_repository(base_path, "group/sub/proj3.git", false);

    let (projects, _) = scan(base_path, ScanOptions::default());

    assert_eq!(
        sorted_paths(&projects),
        ["a", "group/proj2", "group/sub/proj3.git"]
    );
    assert_eq!(projects.get("a").unwrap().category(), "");
    assert_eq!(projects.get("group/proj2").unwrap().category(), "group");
    assert_eq!(
        projects.get("group/sub/proj3.git").unwrap().category(),
        "group/sub"
    );
    assert!(projects.get("a").unwrap().exported());
    assert!(!projects.get("group/sub/proj3.git").unwrap().exported());
}

#[test]
fn test_scanning_twice_is_deterministic() {
    let temp_dir = create_test_directory();
    let base_path = temp_dir.path();

    create_repository(base_path, "one", true);
    create_repository(base_path, "two", false);
    create_repository(base_path, "nested/three", true);
    create_repository(base_path, "nested/deeper/four", false);

    let (first, _) = scan(base_path, ScanOptions::default());
    let (second, _) = scan(base_path, ScanOptions::default());

    assert_eq!(sorted_paths(&first), sorted_paths(&second));
    for record in &first {
        let other = second.get(record.path()).unwrap();
        assert_eq!(record.category(), other.category());
        assert_eq!(record.exported(), other.exported());
    }
}

#[test]
fn test_hidden_directories_and_descendants_are_excluded() {
    let temp_dir = create_test_directory();
    let base_path = temp_dir.path();

    create_repository(base_path, ".git", true);
    create_repository(base_path, ".archive/old", true);
    create_repository(base_path, "visible/.private", true);
    create_repository(base_path, "visible/public", true);

    let (projects, observer) = scan(base_path, ScanOptions::default());

    assert_eq!(sorted_paths(&projects), ["visible/public"]);
    assert!(
        observer
            .events()
            .iter()
            .all(|e| !matches!(e, ScanEvent::FoundProject { path } if path.contains('.')))
    );
}

#[test]
fn test_nothing_below_a_repository_is_scanned() {
    let temp_dir = create_test_directory();
    let base_path = temp_dir.path();

    create_repository(base_path, "outer", true);
    create_repository(base_path, "outer/submodule", true);
    create_repository(base_path, "outer/refs/heads/fake", true);

    let (projects, observer) = scan(base_path, ScanOptions::default());

    assert_eq!(sorted_paths(&projects), ["outer"]);
    assert!(!observer.events().iter().any(|e| matches!(
        e,
        ScanEvent::SearchingDirectory { path } if path.starts_with(base_path.join("outer"))
    )));
}

#[test]
fn test_exported_only_drops_and_logs_unexported() {
    let temp_dir = create_test_directory();
    let base_path = temp_dir.path();

    create_repository(base_path, "public", true);
    create_repository(base_path, "team/private", false);

    let options = ScanOptions {
        exported_only: true,
        ..ScanOptions::default()
    };
    let (projects, observer) = scan(base_path, options);

    assert_eq!(sorted_paths(&projects), ["public"]);
    assert_eq!(
        observer.count(|e| *e
            == ScanEvent::NotExported {
                path: "team/private".to_string()
            }),
        1
    );
}

#[test]
fn test_malformed_repository_is_skipped() {
    let temp_dir = create_test_directory();
    let base_path = temp_dir.path();

    create_repository(base_path, "good", true);
    create_repository(base_path, "bad", true);
    create_file(&base_path.join("bad").join("config"), "[core\n\tbare = true\n");

    let (projects, observer) = scan(base_path, ScanOptions::default());

    assert_eq!(sorted_paths(&projects), ["good"]);
    let failures: Vec<_> = observer
        .events()
        .into_iter()
        .filter_map(|e| match e {
            ScanEvent::InstantiationFailed { path, reason } => Some((path, reason)),
            _ => None,
        })
        .collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "bad");
    assert!(failures[0].1.starts_with("malformed config"));
}

#[test]
fn test_unexported_malformed_repository_counts_as_not_exported() {
    let temp_dir = create_test_directory();
    let base_path = temp_dir.path();

    create_repository(base_path, "bad", false);
    create_file(&base_path.join("bad").join("config"), "[core\n");

    let options = ScanOptions {
        exported_only: true,
        ..ScanOptions::default()
    };
    let (projects, observer) = scan(base_path, options);

    assert!(projects.is_empty());
    assert_eq!(
        observer.count(|e| matches!(e, ScanEvent::NotExported { .. })),
        1
    );
    assert_eq!(
        observer.count(|e| matches!(e, ScanEvent::InstantiationFailed { .. })),
        0
    );
}

#[test]
fn test_config_layers_from_settings_file() {
    let temp_dir = create_test_directory();
    let base_path = temp_dir.path();

    create_repository(base_path, "group/proj2", true);
    create_repository(base_path, "plain", true);
    create_file(
        &base_path.join("group").join("proj2").join("config"),
        "[core]\n\tbare = true\n[gitphp]\n\towner = Native Owner\n\tcloneurl = git://native\n",
    );

    let file_config: FileConfig = toml::from_str(
        r#"
[global]
"gitphp.owner" = "Global Owner"
"gitphp.cloneurl" = "git://global"
compat = false

[projects."group/proj2"]
"gitphp.cloneurl" = "git://override"
"#,
    )
    .unwrap();

    let settings = ProjectSettings {
        global: file_config.global.clone(),
        overrides: file_config.project_overrides(),
    };
    let projects = Scanner::new(base_path, ScanOptions::default())
        .with_settings(settings)
        .populate(&RecordingObserver::new())
        .unwrap();

    let proj2 = projects.get("group/proj2").unwrap().config();
    assert_eq!(proj2.get_str("gitphp.owner"), Some("Native Owner"));
    assert_eq!(proj2.get("gitphp.owner").source(), Some(LayerKind::Repository));
    assert_eq!(proj2.get_str("gitphp.cloneurl"), Some("git://override"));
    assert_eq!(proj2.get("gitphp.cloneurl").source(), Some(LayerKind::Override));
    assert_eq!(proj2.get_bool("compat"), Some(false));

    let plain = projects.get("plain").unwrap().config();
    assert_eq!(plain.get_str("gitphp.owner"), Some("Global Owner"));
    assert_eq!(plain.get_str("gitphp.cloneurl"), Some("git://global"));
    assert!(!plain.get("gitphp.website").is_set());
}

#[test]
fn test_listed_projects_match_scanned_records() {
    let temp_dir = create_test_directory();
    let base_path = temp_dir.path();

    create_repository(base_path, "a", true);
    create_repository(base_path, "group/proj2", false);

    let mut overrides = BTreeMap::new();
    overrides.insert(
        "a".to_string(),
        ConfigLayer::new().with("description", "First"),
    );
    let settings = ProjectSettings {
        global: ConfigLayer::new(),
        overrides,
    };

    let listed = ListedProjects::new(
        base_path,
        vec!["group/proj2".to_string(), "a".to_string()],
        &ScanOptions::default(),
    )
    .with_settings(settings.clone())
    .populate(&RecordingObserver::new())
    .unwrap();
    let scanned = Scanner::new(base_path, ScanOptions::default())
        .with_settings(settings)
        .populate(&RecordingObserver::new())
        .unwrap();

    assert_eq!(listed.paths().collect::<Vec<_>>(), ["group/proj2", "a"]);
    for record in &listed {
        assert_eq!(Some(record), scanned.get(record.path()));
    }
    assert_eq!(listed.get("a").unwrap().description(), Some("First"));
}

#[test]
fn test_scan_of_missing_root_fails() {
    let temp_dir = create_test_directory();
    let missing = temp_dir.path().join("missing");

    let result = Scanner::new(&missing, ScanOptions::default()).populate(&RecordingObserver::new());

    let err = result.unwrap_err();
    assert!(err.to_string().contains("missing"));
}

#[test]
fn test_scan_with_spaces_and_unicode_in_paths() {
    let temp_dir = create_test_directory();
    let base_path = temp_dir.path();

    create_repository(base_path, "my projects/ünïcödé repo", true);

    let (projects, _) = scan(base_path, ScanOptions::default());

    let record = projects.get("my projects/ünïcödé repo").unwrap();
    assert_eq!(record.category(), "my projects");
}

#[cfg(unix)]
#[test]
fn test_unreadable_subtree_does_not_abort_scan() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = create_test_directory();
    let base_path = temp_dir.path();

    create_repository(base_path, "ok", true);
    let locked = base_path.join("locked");
    create_repository(&locked, "inner", true);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores permission bits; nothing to assert in that case.
    let running_as_root = fs::read_dir(&locked).is_ok();

    let (projects, observer) = scan(base_path, ScanOptions::default());
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert!(projects.contains("ok"));
    if !running_as_root {
        assert!(!projects.contains("locked/inner"));
        assert!(observer.count(|e| matches!(e, ScanEvent::SubtreeUnreadable { .. })) >= 1);
    }
}

#[test]
fn test_routing_examples() {
    let shortlog = router::resolve("shortlog", false);
    assert_eq!(shortlog.kind, HandlerKind::Log);
    assert_eq!(shortlog.param("short"), Some(ParamValue::Flag(true)));

    let log = router::resolve("log", false);
    assert_eq!(log.kind, HandlerKind::Log);
    assert!(log.params.is_empty());

    let rss = router::resolve("rss", false);
    assert_eq!(rss.kind, HandlerKind::Feed);
    assert_eq!(rss.param("format"), Some(ParamValue::Format(FeedFormat::Rss)));

    assert_eq!(router::resolve("unknown", true).kind, HandlerKind::Project);
    assert!(router::resolve("unknown", true).params.is_empty());
    assert_eq!(router::resolve("unknown", false).kind, HandlerKind::ProjectList);
}

#[test]
fn test_project_list_routes_consume_scanned_collection() {
    let temp_dir = create_test_directory();
    let base_path = temp_dir.path();

    create_repository(base_path, "a", true);
    create_repository(base_path, "b", true);

    let dispatch = router::resolve("opml", false);
    assert!(dispatch.kind.needs_project_list());
    assert!(dispatch.flag("opml"));

    let (projects, _) = scan(base_path, ScanOptions::default());
    assert_eq!(projects.len(), 2);

    let dispatch = router::resolve("tree", true);
    assert!(dispatch.kind.needs_project());
    assert!(projects.get("a").is_some());
}
