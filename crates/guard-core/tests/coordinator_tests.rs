mod common;

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use common::{
    FakeAppControl, RecordingNotifier, Script, TRACKED, actions, count, coordinator, new_log,
};
use guard_content::{DEFAULT_IGNORE_TOKENS, RuleSet, needs_enforcement};
use guard_core::lifecycle::{ExitOutcome, StartOutcome, StopMethod};
use guard_core::notifier::{REPAIR_MESSAGE, REPAIR_TITLE};
use guard_core::{
    CYCLE_LOCK_FILE, ComplianceStatus, CyclePhase, EnforcementCoordinator, FileOutcome, Settings,
    TriggerOutcome,
};
use guard_fs::{LockFile, WriteMethod};
use guard_test_utils::ConfDir;
use guard_test_utils::samples::{NO_DIRECTORY_FILTER, RESET_BLACKLIST, directory_with};
use pretty_assertions::assert_eq;

fn compliant_text() -> String {
    directory_with(DEFAULT_IGNORE_TOKENS)
}

fn enforced(outcome: TriggerOutcome) -> guard_core::CycleReport {
    match outcome {
        TriggerOutcome::Enforced(report) => *report,
        other => panic!("expected a cycle, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_cycle_writes_between_stop_and_start() {
    let conf = ConfDir::new();
    let blacklist = conf.write("blacklist.filter", RESET_BLACKLIST);
    conf.write("filter-v4150", NO_DIRECTORY_FILTER);
    let log = new_log();
    let control =
        Arc::new(FakeAppControl::new(Script::default(), log.clone()).observing(&blacklist));
    let notifier = Arc::new(RecordingNotifier::new(log.clone()));
    let coordinator = coordinator(&conf, control.clone()).with_notifier(notifier.clone());

    let report = enforced(coordinator.check_and_enforce().await);

    assert_eq!(actions(&log), vec!["quit", "launch", "notify"]);
    let snapshots = control.snapshots();
    assert_eq!(snapshots[0], ("quit".to_string(), RESET_BLACKLIST.to_string()));
    assert_eq!(snapshots[1].0, "launch");
    assert!(!needs_enforcement(&snapshots[1].1, &RuleSet::defaults()));

    assert_eq!(report.stop, StopMethod::Graceful);
    assert!(report.is_clean());
    assert!(report.notified);
    let outcomes: Vec<_> = report.files.iter().map(|f| f.outcome.clone()).collect();
    assert_eq!(
        outcomes,
        vec![
            FileOutcome::Updated(WriteMethod::Direct),
            FileOutcome::Updated(WriteMethod::Direct),
        ]
    );

    assert_eq!(conf.backups().len(), 2);
    assert_eq!(
        *notifier.sent.lock().unwrap(),
        vec![(REPAIR_TITLE.to_string(), REPAIR_MESSAGE.to_string())]
    );
    assert!(!coordinator.needs_enforcement());
    assert_eq!(coordinator.phase(), CyclePhase::Idle);
    assert!(!coordinator.is_busy());
}

#[tokio::test(start_paused = true)]
async fn test_repaired_file_keeps_unrelated_content() {
    let conf = ConfDir::new();
    conf.write("filter-v4150", NO_DIRECTORY_FILTER);
    let control = Arc::new(FakeAppControl::new(Script::default(), new_log()));
    let coordinator = coordinator(&conf, control);

    coordinator.check_and_enforce().await;

    let repaired = conf.read("filter-v4150");
    assert!(repaired.starts_with(NO_DIRECTORY_FILTER));
    assert!(repaired.contains("[Directory]\nblack_name=\".git\", \".gitignore\""));
}

#[tokio::test(start_paused = true)]
async fn test_compliant_files_trigger_nothing() {
    let conf = ConfDir::new();
    conf.write("blacklist.filter", &compliant_text());
    conf.write("filter-v4150", &compliant_text());
    let log = new_log();
    let control = Arc::new(FakeAppControl::new(Script::default(), log.clone()));
    let coordinator = coordinator(&conf, control);

    assert_eq!(coordinator.check_and_enforce().await, TriggerOutcome::Compliant);
    assert!(log.lock().unwrap().is_empty());
    assert!(conf.backups().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_no_target_files_is_compliant() {
    let conf = ConfDir::new();
    let log = new_log();
    let control = Arc::new(FakeAppControl::new(Script::default(), log.clone()));
    let coordinator = coordinator(&conf, control);

    assert_eq!(coordinator.check_and_enforce().await, TriggerOutcome::Compliant);
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_missing_file_is_skipped_during_cycle() {
    let conf = ConfDir::new();
    conf.write("blacklist.filter", RESET_BLACKLIST);
    let control = Arc::new(FakeAppControl::new(Script::default(), new_log()));
    let coordinator = coordinator(&conf, control);

    let report = enforced(coordinator.check_and_enforce().await);

    assert_eq!(report.files[0].outcome, FileOutcome::Updated(WriteMethod::Direct));
    assert_eq!(report.files[1].file, "filter-v4150");
    assert_eq!(report.files[1].outcome, FileOutcome::Missing);
    assert!(!conf.file("filter-v4150").exists());
    assert!(report.is_clean());
}

#[tokio::test(start_paused = true)]
async fn test_already_compliant_file_is_not_rewritten() {
    let conf = ConfDir::new();
    conf.write("blacklist.filter", RESET_BLACKLIST);
    conf.write("filter-v4150", &compliant_text());
    let control = Arc::new(FakeAppControl::new(Script::default(), new_log()));
    let coordinator = coordinator(&conf, control);

    let report = enforced(coordinator.check_and_enforce().await);

    assert_eq!(report.files[1].outcome, FileOutcome::Unchanged);
    assert_eq!(conf.read("filter-v4150"), compliant_text());
    assert_eq!(conf.backups().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_unreadable_file_is_reported_and_others_repaired() {
    let conf = ConfDir::new();
    fs::create_dir(conf.file("blacklist.filter")).unwrap();
    conf.write("filter-v4150", NO_DIRECTORY_FILTER);
    let control = Arc::new(FakeAppControl::new(Script::default(), new_log()));
    let coordinator = coordinator(&conf, control);

    let compliance = coordinator.compliance();
    assert!(matches!(compliance[0].status, ComplianceStatus::Unreadable { .. }));

    let report = enforced(coordinator.check_and_enforce().await);

    assert!(matches!(report.files[0].outcome, FileOutcome::ReadFailed { .. }));
    assert_eq!(report.files[1].outcome, FileOutcome::Updated(WriteMethod::Direct));
    assert!(!report.is_clean());
}

#[tokio::test(start_paused = true)]
async fn test_forced_exit_still_writes_and_restarts() {
    let conf = ConfDir::new();
    conf.write("blacklist.filter", RESET_BLACKLIST);
    let log = new_log();
    let script = Script {
        exit_after_polls: None,
        ..Script::default()
    };
    let control = Arc::new(FakeAppControl::new(script, log.clone()));
    let notifier = Arc::new(RecordingNotifier::new(log.clone()));
    let coordinator = coordinator(&conf, control).with_notifier(notifier);

    let report = enforced(coordinator.check_and_enforce().await);

    assert_eq!(report.exit, ExitOutcome::Forced);
    assert_eq!(report.files[0].outcome, FileOutcome::Updated(WriteMethod::Direct));
    assert_eq!(
        actions(&log),
        vec![
            "quit".to_string(),
            format!("terminate kill {TRACKED}"),
            "terminate kill cloud-drive-ui".to_string(),
            "launch".to_string(),
            "notify".to_string(),
        ]
    );
    assert!(!report.is_clean());
}

#[tokio::test(start_paused = true)]
async fn test_start_timeout_still_notifies() {
    let conf = ConfDir::new();
    conf.write("blacklist.filter", RESET_BLACKLIST);
    let log = new_log();
    let script = Script {
        start_after_polls: None,
        ..Script::default()
    };
    let control = Arc::new(FakeAppControl::new(script, log.clone()));
    let notifier = Arc::new(RecordingNotifier::new(log.clone()));
    let coordinator = coordinator(&conf, control).with_notifier(notifier);

    let report = enforced(coordinator.check_and_enforce().await);

    assert_eq!(report.start, StartOutcome::TimedOut);
    assert!(report.notified);
    assert_eq!(count(&log, "notify"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_launch_failure_is_recorded() {
    let conf = ConfDir::new();
    conf.write("blacklist.filter", RESET_BLACKLIST);
    let script = Script {
        launch_fails: true,
        ..Script::default()
    };
    let control = Arc::new(FakeAppControl::new(script, new_log()));
    let coordinator = coordinator(&conf, control);

    let report = enforced(coordinator.check_and_enforce().await);

    assert!(report.launch_error.is_some());
    assert_eq!(report.start, StartOutcome::TimedOut);
    assert!(!report.notified);
}

#[tokio::test(start_paused = true)]
async fn test_trigger_during_cycle_is_queued_and_rechecked() {
    let conf = ConfDir::new();
    conf.write("blacklist.filter", RESET_BLACKLIST);
    let log = new_log();
    let control = Arc::new(FakeAppControl::new(Script::default(), log.clone()));
    let coordinator = Arc::new(coordinator(&conf, control));

    let first = tokio::spawn({
        let coordinator = Arc::clone(&coordinator);
        async move { coordinator.check_and_enforce().await }
    });
    while coordinator.phase() != CyclePhase::AwaitingStart {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert!(coordinator.is_busy());

    // The client resets the file again while it is starting up.
    conf.write("blacklist.filter", RESET_BLACKLIST);
    assert_eq!(coordinator.check_and_enforce().await, TriggerOutcome::Queued);
    assert_eq!(coordinator.check_and_enforce().await, TriggerOutcome::Queued);

    let outcome = first.await.unwrap();

    assert!(matches!(outcome, TriggerOutcome::Enforced(_)));
    assert_eq!(count(&log, "quit"), 2);
    assert!(!coordinator.needs_enforcement());
    assert!(!coordinator.is_busy());
}

#[tokio::test(start_paused = true)]
async fn test_queued_recheck_of_compliant_files_runs_no_cycle() {
    let conf = ConfDir::new();
    conf.write("blacklist.filter", RESET_BLACKLIST);
    let log = new_log();
    let control = Arc::new(FakeAppControl::new(Script::default(), log.clone()));
    let coordinator = Arc::new(coordinator(&conf, control));

    let first = tokio::spawn({
        let coordinator = Arc::clone(&coordinator);
        async move { coordinator.check_and_enforce().await }
    });
    while coordinator.phase() != CyclePhase::AwaitingExit {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(coordinator.check_and_enforce().await, TriggerOutcome::Queued);

    first.await.unwrap();

    assert_eq!(count(&log, "quit"), 1);
    assert!(!coordinator.is_busy());
}

#[tokio::test(start_paused = true)]
async fn test_cycle_lock_keeps_a_second_coordinator_out() {
    let conf = ConfDir::new();
    conf.write("blacklist.filter", RESET_BLACKLIST);
    let lock = LockFile::new(conf.backup_dir().join(CYCLE_LOCK_FILE));

    let watch_log = new_log();
    let watch_control = Arc::new(FakeAppControl::new(Script::default(), watch_log.clone()));
    let watch = Arc::new(coordinator(&conf, watch_control).with_cycle_lock(lock.clone()));
    let fix_log = new_log();
    let fix_control = Arc::new(FakeAppControl::new(Script::default(), fix_log.clone()));
    let fix = coordinator(&conf, fix_control).with_cycle_lock(lock);

    let running = tokio::spawn({
        let watch = Arc::clone(&watch);
        async move { watch.check_and_enforce().await }
    });
    while watch.phase() != CyclePhase::AwaitingExit {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    assert_eq!(fix.check_and_enforce().await, TriggerOutcome::Queued);
    assert!(actions(&fix_log).is_empty());
    assert!(!fix.is_busy());

    let report = enforced(running.await.unwrap());
    assert!(report.is_clean());
    assert_eq!(count(&watch_log, "quit"), 1);

    assert_eq!(fix.check_and_enforce().await, TriggerOutcome::Compliant);
    assert!(actions(&fix_log).is_empty());
    assert_eq!(conf.backups().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_preview_leaves_everything_untouched() {
    let conf = ConfDir::new();
    conf.write("blacklist.filter", RESET_BLACKLIST);
    let log = new_log();
    let control = Arc::new(FakeAppControl::new(Script::default(), log.clone()));
    let coordinator = coordinator(&conf, control);

    let previews = coordinator.preview();

    assert_eq!(previews.len(), 1);
    assert_eq!(previews[0].original, RESET_BLACKLIST);
    assert!(previews[0].merge.changed);
    assert_eq!(previews[0].merge.updated, vec!["Directory", "Common"]);
    assert_eq!(conf.read("blacklist.filter"), RESET_BLACKLIST);
    assert!(conf.backups().is_empty());
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_compliance_lists_missing_tokens() {
    let conf = ConfDir::new();
    let without: Vec<&str> = DEFAULT_IGNORE_TOKENS
        .iter()
        .copied()
        .filter(|t| *t != "node_modules")
        .collect();
    conf.write("blacklist.filter", &directory_with(&without));
    let control = Arc::new(FakeAppControl::new(Script::default(), new_log()));
    let coordinator = coordinator(&conf, control);

    let compliance = coordinator.compliance();

    assert_eq!(
        compliance[0].status,
        ComplianceStatus::NonCompliant {
            missing: vec!["node_modules".to_string()]
        }
    );
    assert_eq!(compliance[1].status, ComplianceStatus::Missing);
    assert!(coordinator.needs_enforcement());
}

#[tokio::test(start_paused = true)]
async fn test_from_settings_respects_disabled_notifications() {
    let conf = ConfDir::new();
    conf.write("blacklist.filter", RESET_BLACKLIST);
    let settings = Settings {
        backup_dir: Some(conf.backup_dir()),
        notifications: false,
        ..Settings::default()
    };
    let log = new_log();
    let control = Arc::new(FakeAppControl::new(Script::default(), log.clone()));
    let notifier = Arc::new(RecordingNotifier::new(log.clone()));

    let coordinator =
        EnforcementCoordinator::from_settings(&settings, conf.path(), control, Some(notifier))
            .unwrap();
    let report = enforced(coordinator.check_and_enforce().await);

    assert!(!report.notified);
    assert_eq!(count(&log, "notify"), 0);
    assert_eq!(conf.backups().len(), 1);
}
