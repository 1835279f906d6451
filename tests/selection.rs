mod common;

use common::{make_app, seed_store};
use project_launcher::config::Config;
use project_launcher::ui::Key;
use tempfile::tempdir;

#[test]
fn selection_stays_in_bounds_through_navigation_and_filtering() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("state.vscdb");
    seed_store(
        &db,
        &[
            "file:///x/proj1",
            "file:///x/proj2",
            "file:///x/other",
        ],
    );
    let mut app = make_app(
        vec![db],
        Config::default(),
        dir.path().join("config.json"),
    );

    // sorted display order: other, proj1, proj2
    assert_eq!(app.visible().len(), 3);
    assert_eq!(app.selection(), Some(0));

    app.handle_key(Key::Up); // no-op at the top
    assert_eq!(app.selection(), Some(0));

    for _ in 0..5 {
        app.handle_key(Key::Down); // sticks at the bottom, no wraparound
    }
    assert_eq!(app.selection(), Some(2));

    // a filter that matches nothing leaves no selection
    app.handle_key(Key::Char('/'));
    app.handle_key(Key::Char('z'));
    app.handle_key(Key::Char('z'));
    assert!(app.visible().is_empty());
    assert_eq!(app.selection(), None);

    // and deleting the query brings a clamped selection back
    app.handle_key(Key::Backspace);
    app.handle_key(Key::Backspace);
    assert_eq!(app.selection(), Some(0));
}

#[test]
fn search_filters_on_the_displayed_name() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("state.vscdb");
    seed_store(
        &db,
        &[
            "file:///x/proj1",
            "file:///x/proj2",
            "file:///x/other",
        ],
    );
    let mut app = make_app(
        vec![db],
        Config::default(),
        dir.path().join("config.json"),
    );

    app.handle_key(Key::Char('/'));
    app.handle_key(Key::Char('p'));
    app.handle_key(Key::Char('2'));
    assert_eq!(app.visible(), vec!["/x/proj2".to_string()]);

    // Escape clears the query and leaves search mode
    app.handle_key(Key::Escape);
    assert!(!app.is_searching());
    assert!(app.search_query().is_empty());
    assert_eq!(app.visible().len(), 3);
}

#[test]
fn typing_in_search_resets_the_selection() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("state.vscdb");
    seed_store(&db, &["file:///x/apple", "file:///x/banana"]);
    let mut app = make_app(
        vec![db],
        Config::default(),
        dir.path().join("config.json"),
    );

    app.handle_key(Key::Down);
    assert_eq!(app.selection(), Some(1));
    app.handle_key(Key::Char('/'));
    app.handle_key(Key::Char('a'));
    assert_eq!(app.selection(), Some(0));
}
