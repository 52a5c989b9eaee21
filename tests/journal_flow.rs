// End-to-end journal workflow on a temporary directory.
use chrono::NaiveDate;
use daylog::config::Config;
use daylog::context::TestContext;
use daylog::error::JournalError;
use daylog::journal::Journal;
use daylog::storage::{DocumentStore, LocalStorage};
use daylog::tasks::{ShapeCheck, Transition};
use std::fs;

// Monday
fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

fn journal(ctx: &TestContext) -> Journal<LocalStorage> {
    let config = Config {
        base: ctx.journal_dir().to_string_lossy().to_string(),
        locale: "en-US".to_string(),
        ..Config::default()
    };
    Journal::with_today(config, LocalStorage::for_context(ctx).unwrap(), today())
}

#[test]
fn test_day_page_created_from_template() {
    let ctx = TestContext::new();
    let j = journal(&ctx);

    let doc = j.page_for_day(0).unwrap();
    assert_eq!(doc.path, ctx.journal_dir().join("2026/10/19.md"));
    assert_eq!(doc.text, "# Monday, October 19, 2026\n\n");

    let doc = j.page_for_day(-19).unwrap();
    assert_eq!(doc.path, ctx.journal_dir().join("2026/09/30.md"));
    assert_eq!(doc.text, "# Wednesday, September 30, 2026\n\n");
}

#[test]
fn test_existing_page_is_not_overwritten() {
    let ctx = TestContext::new();
    let j = journal(&ctx);
    let doc = j.page_for_day(0).unwrap();
    fs::write(&doc.path, "# Mine\nkeep me\n").unwrap();
    assert_eq!(j.page_for_day(0).unwrap().text, "# Mine\nkeep me\n");
}

#[test]
fn test_quick_input_adds_task_to_target_day() {
    let ctx = TestContext::new();
    let j = journal(&ctx);

    let doc = j.load_page_for_input("tomorrow #task call the plumber #home").unwrap();
    assert_eq!(doc.path, ctx.journal_dir().join("2026/10/20.md"));
    assert_eq!(
        doc.text,
        "# Tuesday, October 20, 2026\n\n* [ ] call the plumber #home\n"
    );
    assert_eq!(fs::read_to_string(&doc.path).unwrap(), doc.text);
}

#[test]
fn test_memo_without_date_goes_to_today() {
    let ctx = TestContext::new();
    let j = journal(&ctx);

    let doc = j.load_page_for_input("task let's do this today").unwrap();
    assert_eq!(doc.path, ctx.journal_dir().join("2026/10/19.md"));
    assert!(doc.text.ends_with("\n- task let's do this today\n"));

    let doc = j.load_page_for_input("-1").unwrap();
    assert_eq!(doc.text, "# Sunday, October 18, 2026\n\n");
}

#[test]
fn test_unusable_input_creates_nothing() {
    let ctx = TestContext::new();
    let j = journal(&ctx);

    for raw in ["", "22-12", "#task"] {
        let err = j.load_page_for_input(raw).unwrap_err();
        assert!(JournalError::find_in(&err).is_some(), "{}", raw);
    }
    assert!(!ctx.journal_dir().exists());

    let err = j.page_for_day(i64::MAX).unwrap_err();
    assert!(matches!(
        JournalError::find_in(&err),
        Some(JournalError::UnresolvedInput(_))
    ));
}

#[test]
fn test_notes_and_weekly_pages() {
    let ctx = TestContext::new();
    let j = journal(&ctx);

    let note = j.create_note("Project Kickoff!").unwrap();
    assert_eq!(note.path, ctx.journal_dir().join("2026/10/19/project_kickoff.md"));
    assert_eq!(note.text, "# Project Kickoff!\n\n");

    let err = j.create_note(" ?! ").unwrap_err();
    assert_eq!(JournalError::find_in(&err), Some(&JournalError::EmptyInput));

    let week = j.page_for_week(0).unwrap();
    assert_eq!(week.path, ctx.journal_dir().join("2026/week-43.md"));
    assert_eq!(week.text, "# Week 43, 2026\n\n");
    let next = j.page_for_week(1).unwrap();
    assert_eq!(next.path, ctx.journal_dir().join("2026/week-44.md"));
}

#[test]
fn test_task_lifecycle_on_disk() {
    let ctx = TestContext::new();
    let j = journal(&ctx);
    let doc = j.load_page_for_input("today #task water plants").unwrap();

    let diags = j.scan_document(&doc);
    assert_eq!(diags.len(), 2);
    assert_eq!(diags[0].range.start.line, 2);

    assert!(j.apply_transition(&doc, 2, Transition::Complete).unwrap());
    let on_disk = fs::read_to_string(&doc.path).unwrap();
    assert!(on_disk.contains("* [x] water plants"));

    // `doc` still holds the open task; the file no longer does.
    let err = j.apply_transition(&doc, 2, Transition::Complete).unwrap_err();
    assert_eq!(
        JournalError::find_in(&err),
        Some(&JournalError::StaleMarker { line: 2 })
    );
    assert_eq!(
        JournalError::find_in(&err).unwrap().user_message(),
        "Task marker changed, please retry"
    );
}

#[test]
fn test_code_actions_execute_against_file() {
    let ctx = TestContext::new();
    let j = journal(&ctx);
    let doc = j.load_page_for_input("#task renew passport").unwrap();

    let cmds = j.code_actions(&doc);
    assert_eq!(cmds.len(), 2);
    assert!(cmds[0].arguments.0.starts_with("file://"));
    let shift = cmds.iter().find(|c| c.title == "Shift task to today").unwrap();
    assert!(j.execute(&doc, shift).unwrap());
    assert!(fs::read_to_string(&doc.path).unwrap().contains("* [>] renew passport"));
}

#[test]
fn test_journal_folder_holds_only_pages() {
    let ctx = TestContext::new();
    let j = journal(&ctx);
    let doc = j.load_page_for_input("#task renew passport").unwrap();
    assert!(j.apply_transition(&doc, 2, Transition::Complete).unwrap());
    j.page_for_day(0).unwrap();

    let names: Vec<String> = fs::read_dir(ctx.journal_dir().join("2026/10"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["19.md".to_string()]);
}

#[test]
fn test_base_path_is_the_journal_folder() {
    let ctx = TestContext::new();
    let j = journal(&ctx);
    assert_eq!(j.base_path(), ctx.journal_dir());
    // Reporting the folder does not create it.
    assert!(!ctx.journal_dir().exists());

    let doc = j.page_for_day(0).unwrap();
    assert!(doc.path.starts_with(j.base_path()));
}

#[test]
fn test_lenient_store_tolerates_repeats() {
    let ctx = TestContext::new();
    let config = Config {
        base: ctx.journal_dir().to_string_lossy().to_string(),
        locale: "en-US".to_string(),
        ..Config::default()
    };
    let store = LocalStorage::for_context(&ctx).unwrap().with_check(ShapeCheck::Lenient);
    let j = Journal::with_today(config, store, today());
    let doc = j.load_page_for_input("#task stretch").unwrap();
    assert!(j.apply_transition(&doc, 2, Transition::Complete).unwrap());
    assert!(!j.apply_transition(&doc, 2, Transition::Complete).unwrap());
}

#[test]
fn test_saved_config_drives_the_journal() {
    let ctx = TestContext::new();
    let config = Config {
        base: ctx.journal_dir().to_string_lossy().to_string(),
        ext: "txt".to_string(),
        locale: "de-DE".to_string(),
        header_template: "%A".to_string(),
        page_template: "== {header} ==\n".to_string(),
        memo_template: "* {content}".to_string(),
        ..Config::default()
    };
    config.save(&ctx).unwrap();

    let loaded = Config::load(&ctx).unwrap();
    let j = Journal::with_today(loaded, LocalStorage::for_context(&ctx).unwrap(), today());
    let doc = j.load_page_for_input("yesterday anruf #arbeit").unwrap();
    assert_eq!(doc.path, ctx.journal_dir().join("2026/10/18.txt"));
    assert_eq!(doc.text, "== Sonntag ==\n* anruf #arbeit\n");
}

#[test]
fn test_store_trait_object_usable() {
    let ctx = TestContext::new();
    let storage = LocalStorage::for_context(&ctx).unwrap();
    let store: &dyn DocumentStore = &storage;
    let path = ctx.journal_dir().join("loose.md");
    let doc = store.load_or_create(&path, "x\n").unwrap();
    let doc = store.append_line(&doc, "y").unwrap();
    assert_eq!(doc.text, "x\ny\n");
}
