use super::*;
use std::path::PathBuf;

#[test]
fn apply_summary_counts_applied_and_failed() {
    let summary = BatchSummary {
        applied: 2,
        failed: 1,
        ..Default::default()
    };
    assert_eq!(
        format_summary(&summary, BatchKind::Apply),
        "Completed: 2 applied, 1 failed"
    );
}

#[test]
fn rollback_summary_counts_skipped() {
    let summary = BatchSummary {
        rolled_back: 1,
        skipped: 2,
        ..Default::default()
    };
    assert_eq!(
        format_summary(&summary, BatchKind::Rollback),
        "Completed: 1 rolled back, 2 skipped, 0 failed"
    );
}

#[test]
fn display_path_strips_project_root() {
    let root = PathBuf::from("/srv/project");
    assert_eq!(
        display_path(&root.join("migrations/001_a.sql"), &root),
        "migrations/001_a.sql"
    );
    assert_eq!(display_path(Path::new("/elsewhere/x.sql"), &root), "/elsewhere/x.sql");
}
