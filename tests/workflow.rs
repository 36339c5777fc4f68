// tests/workflow.rs

//! Multi-run workflows: dry-run, apply, resume and reset.

mod common;

use common::*;
use shortcode_migrate::db;
use shortcode_migrate::db::models::{MigrationCursor, Post, PostStatus, RecordType, Snapshot};
use shortcode_migrate::migrate::to_csv;
use shortcode_migrate::{MigrationConfig, SilentProgress};
use std::sync::atomic::AtomicBool;

fn corpus() -> Vec<Post> {
    vec![
        post(
            1,
            r#"[et_pb_section][et_pb_text]One[/et_pb_text][et_pb_button button_url="/a" button_text="A"][/et_pb_button][/et_pb_section]"#,
        ),
        post(2, r#"[et_pb_image src="https://example.com/x.png"][/et_pb_image]"#),
        post(3, r#"[gallery ids="4,5"] plain text"#),
        post(4, "[et_pb_video src=\"https://vimeo.com/123\"][/et_pb_video]"),
    ]
}

#[test]
fn test_dry_run_is_idempotent() {
    let (_dir, db_path) = setup_test_db(&corpus(), &[(9, "https://example.com/x.png")]);

    let first = migrate(&db_path, &dry_run());
    let second = migrate(&db_path, &dry_run());

    assert_eq!(to_csv(&first.records), to_csv(&second.records));
    assert_eq!(first.total, 4);
    assert_eq!(first.failed, 0);

    for original in corpus() {
        assert_eq!(content(&db_path, original.id), original.content);
    }
}

#[test]
fn test_parallel_workers_match_sequential_audit() {
    let (_dir, db_path) = setup_test_db(&corpus(), &[]);

    let sequential = migrate(&db_path, &dry_run());
    let parallel = migrate(
        &db_path,
        &MigrationConfig {
            jobs: 4,
            ..dry_run()
        },
    );
    assert_eq!(to_csv(&sequential.records), to_csv(&parallel.records));
}

#[test]
fn test_snapshot_invariance_across_runs() {
    let originals = corpus();
    let (_dir, db_path) = setup_test_db(&originals, &[]);

    migrate(&db_path, &dry_run());
    migrate(&db_path, &apply());
    migrate(&db_path, &apply());
    migrate(&db_path, &dry_run());

    {
        let conn = db::open(&db_path).unwrap();
        assert_eq!(Snapshot::count(&conn).unwrap(), 4);
        assert_eq!(Snapshot::find(&conn, 1).unwrap().unwrap().content, originals[0].content);
    }
    assert_ne!(content(&db_path, 1), originals[0].content);

    let report = reset(&db_path, &apply());
    assert_eq!(report.succeeded, 4);
    for original in &originals {
        assert_eq!(content(&db_path, original.id), original.content);
    }
}

#[test]
fn test_second_apply_reads_snapshot() {
    let (_dir, db_path) = setup_test_db(&corpus(), &[]);

    let first = migrate(&db_path, &apply());
    let after_first = content(&db_path, 1);
    let second = migrate(&db_path, &apply());

    assert_eq!(content(&db_path, 1), after_first);
    assert_eq!(to_csv(&first.records), to_csv(&second.records));
}

#[test]
fn test_modification_times_preserved() {
    let (_dir, db_path) = setup_test_db(&corpus(), &[]);

    migrate(&db_path, &apply());
    reset(&db_path, &apply());

    let conn = db::open(&db_path).unwrap();
    for original in corpus() {
        let saved = Post::find_by_id(&conn, original.id).unwrap().unwrap();
        assert_eq!(saved.modified, MODIFIED);
        assert_eq!(saved.modified_gmt, MODIFIED_GMT);
    }
}

#[test]
fn test_reset_dry_run_and_missing_snapshots() {
    let (_dir, db_path) = setup_test_db(&corpus(), &[]);

    let report = reset(&db_path, &dry_run());
    assert_eq!(report.no_snapshot, 4);
    assert_eq!(report.succeeded, 0);

    migrate(&db_path, &apply());
    let migrated = content(&db_path, 1);

    let report = reset(&db_path, &dry_run());
    assert_eq!(report.succeeded, 4);
    assert_eq!(content(&db_path, 1), migrated);
}

#[test]
fn test_limit_and_filters() {
    let mut posts = corpus();
    posts.push(Post {
        post_status: "draft".to_string(),
        ..post(10, "[et_pb_text]draft[/et_pb_text]")
    });
    posts.push(Post {
        post_type: RecordType::Page,
        ..post(11, "[et_pb_text]page[/et_pb_text]")
    });
    let (_dir, db_path) = setup_test_db(&posts, &[]);

    let report = migrate(
        &db_path,
        &MigrationConfig {
            limit: Some(2),
            ..dry_run()
        },
    );
    assert_eq!(report.total, 2);
    assert!(report.records.iter().all(|r| r.record_id <= 2));

    let report = migrate(
        &db_path,
        &MigrationConfig {
            status: PostStatus::Draft,
            ..apply()
        },
    );
    assert_eq!(report.total, 1);
    assert_eq!(content(&db_path, 10), "draft");
    assert_eq!(content(&db_path, 11), "[et_pb_text]page[/et_pb_text]");

    let report = migrate(
        &db_path,
        &MigrationConfig {
            record_type: RecordType::Page,
            ..apply()
        },
    );
    assert_eq!(report.total, 1);
    assert_eq!(content(&db_path, 11), "page");
}

#[test]
fn test_cursor_resume() {
    let (_dir, db_path) = setup_test_db(&corpus(), &[]);
    let run_key = MigrationCursor::run_key(RecordType::Post, PostStatus::Publish);

    // Dry-run never moves the cursor
    migrate(&db_path, &dry_run());
    {
        let conn = db::open(&db_path).unwrap();
        assert!(MigrationCursor::get(&conn, &run_key).unwrap().is_none());
    }

    let report = migrate(
        &db_path,
        &MigrationConfig {
            limit: Some(2),
            ..apply()
        },
    );
    assert_eq!(report.cursor, Some(2));

    let resumed = migrate(
        &db_path,
        &MigrationConfig {
            resume: true,
            ..apply()
        },
    );
    assert_eq!(resumed.total, 2);
    assert!(resumed.records.iter().all(|r| r.record_id > 2));
    assert_eq!(resumed.cursor, Some(4));

    let nothing_left = migrate(
        &db_path,
        &MigrationConfig {
            resume: true,
            ..apply()
        },
    );
    assert_eq!(nothing_left.total, 0);

    reset(&db_path, &apply());
    let conn = db::open(&db_path).unwrap();
    assert!(MigrationCursor::get(&conn, &run_key).unwrap().is_none());
}

#[test]
fn test_cancelled_batch_touches_nothing() {
    let (_dir, db_path) = setup_test_db(&corpus(), &[]);
    let cancel = AtomicBool::new(true);

    let report =
        shortcode_migrate::run_migrate(&db_path, &apply(), &SilentProgress::new(), Some(&cancel))
            .unwrap();

    assert!(report.cancelled);
    assert_eq!(report.processed(), 0);
    assert!(report.records.is_empty());
    assert_eq!(report.cursor, None);
    assert_eq!(content(&db_path, 1), corpus()[0].content);
}

#[test]
fn test_reimport_then_reset_restores_original() {
    let (_dir, db_path) = setup_test_db(&corpus(), &[]);
    migrate(&db_path, &apply());

    {
        let conn = db::open(&db_path).unwrap();
        post(1, "edited live content").upsert(&conn).unwrap();
        assert_eq!(
            Snapshot::find(&conn, 1).unwrap().unwrap().content,
            corpus()[0].content
        );
    }

    reset(&db_path, &apply());
    assert_eq!(content(&db_path, 1), corpus()[0].content);
}

#[test]
fn test_empty_first_pass_does_not_wipe_later_content() {
    let (_dir, db_path) = setup_test_db(&[post(1, "")], &[]);
    migrate(&db_path, &dry_run());

    {
        let conn = db::open(&db_path).unwrap();
        post(1, "[et_pb_text]Written later[/et_pb_text]")
            .upsert(&conn)
            .unwrap();
    }

    migrate(&db_path, &apply());
    assert_eq!(content(&db_path, 1), "Written later");

    reset(&db_path, &apply());
    assert_eq!(content(&db_path, 1), "[et_pb_text]Written later[/et_pb_text]");
}
