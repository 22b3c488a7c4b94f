use tabdeck::managers::tab_registry::TabRegistry;
use tabdeck::session::{Session, MAX_CLOSED_TABS};
use tabdeck::types::tab::InternalPage;

#[test]
fn create_tab_returns_unique_ids() {
    let mut session = Session::in_memory();
    let id1 = session.create_tab(None);
    let id2 = session.create_tab(None);
    assert_ne!(id1, id2);
    assert_eq!(session.tab_count(), 2);
}

#[test]
fn create_tab_becomes_active() {
    let mut session = Session::in_memory();
    let id = session.create_tab(Some("https://example.com/"));
    assert_eq!(session.active_tab_id(), Some(id.as_str()));
}

#[test]
fn create_tab_with_url_seeds_history() {
    let mut session = Session::in_memory();
    let id = session.create_tab(Some("https://example.com/"));
    let tab = session.tab(&id).unwrap();
    assert_eq!(tab.history.entries, vec!["https://example.com/"]);
    assert_eq!(tab.history.index, 0);
    assert!(!tab.pinned);
    assert!(tab.folder_id.is_none());
}

#[test]
fn create_tab_without_url_has_empty_history() {
    let mut session = Session::in_memory();
    let id = session.create_tab(None);
    assert!(session.tab(&id).unwrap().history.entries.is_empty());
}

#[test]
fn close_active_tab_activates_most_recently_created() {
    let mut session = Session::in_memory();
    let id1 = session.create_tab(None);
    let id2 = session.create_tab(None);
    let id3 = session.create_tab(None);
    session.switch_active(&id3);

    session.close_tab(&id3);
    // id2 was created after id1, so it takes over.
    assert_eq!(session.active_tab_id(), Some(id2.as_str()));
    let _ = id1;
}

#[test]
fn close_last_tab_leaves_empty_session() {
    let mut session = Session::in_memory();
    let id = session.create_tab(None);
    session.close_tab(&id);
    assert_eq!(session.tab_count(), 0);
    assert_eq!(session.active_tab_id(), None);
}

#[test]
fn close_unknown_tab_is_noop() {
    let mut session = Session::in_memory();
    session.create_tab(None);
    session.close_tab("nonexistent");
    assert_eq!(session.tab_count(), 1);
}

#[test]
fn close_blank_tab_is_not_recoverable() {
    let mut session = Session::in_memory();
    let id = session.create_tab(None);
    session.close_tab(&id);
    assert!(session.closed_tabs().is_empty());
    assert!(session.recover_closed_tab().is_none());
}

#[test]
fn closed_tab_stack_is_bounded() {
    let mut session = Session::in_memory();
    for i in 0..15 {
        let url = format!("https://site{}.example/", i);
        let id = session.create_tab(Some(url.as_str()));
        session.close_tab(&id);
    }
    assert_eq!(session.closed_tabs().len(), MAX_CLOSED_TABS);
    // Most recent closure sits at the recovery end of the stack.
    assert_eq!(
        session.closed_tabs().back().unwrap().url,
        "https://site14.example/"
    );
    // The five oldest were evicted.
    assert_eq!(
        session.closed_tabs().front().unwrap().url,
        "https://site5.example/"
    );
}

#[test]
fn recover_reopens_most_recent_closure() {
    let mut session = Session::in_memory();
    let id = session.create_tab(Some("https://example.com/"));
    session.close_tab(&id);

    let recovered = session.recover_closed_tab().unwrap();
    let tab = session.tab(&recovered).unwrap();
    assert_eq!(tab.url.as_deref(), Some("https://example.com/"));
    assert_eq!(tab.history.entries, vec!["https://example.com/"]);
    assert_eq!(session.active_tab_id(), Some(recovered.as_str()));
}

#[test]
fn recover_on_empty_stack_is_benign() {
    let mut session = Session::in_memory();
    assert!(session.recover_closed_tab().is_none());
}

#[test]
fn navigate_truncates_forward_history() {
    let mut session = Session::in_memory();
    let id = session.create_tab(None);
    session.navigate(&id, "https://a.example/");
    session.navigate(&id, "https://b.example/");
    session.navigate(&id, "https://c.example/");

    assert!(session.go_back(&id));
    session.navigate(&id, "https://d.example/");

    let tab = session.tab(&id).unwrap();
    assert_eq!(
        tab.history.entries,
        vec!["https://a.example/", "https://b.example/", "https://d.example/"]
    );
    assert_eq!(tab.history.index, 2);
}

#[test]
fn back_and_forward_stop_at_boundaries() {
    let mut session = Session::in_memory();
    let id = session.create_tab(Some("https://a.example/"));
    assert!(!session.go_back(&id));
    assert!(!session.go_forward(&id));

    session.navigate(&id, "https://b.example/");
    assert!(session.go_back(&id));
    assert_eq!(
        session.tab(&id).unwrap().url.as_deref(),
        Some("https://a.example/")
    );
    assert!(session.go_forward(&id));
    assert!(!session.go_forward(&id));
}

#[test]
fn back_on_unknown_tab_is_benign() {
    let mut session = Session::in_memory();
    assert!(!session.go_back("nonexistent"));
}

#[test]
fn duplicate_copies_page_state_but_not_organization() {
    let mut session = Session::in_memory();
    let id = session.create_tab(Some("https://example.com/"));
    session.navigate(&id, "https://example.com/two");

    let dup = session.duplicate_tab(&id).unwrap();
    let source = session.tab(&id).unwrap();
    let copy = session.tab(&dup).unwrap();
    assert_eq!(copy.url, source.url);
    assert_eq!(copy.history, source.history);
    assert!(!copy.pinned);
    assert!(copy.folder_id.is_none());

    // The duplicate sits right after its source.
    let idx_source = session
        .top_level()
        .iter()
        .position(|i| i.id() == id)
        .unwrap();
    assert_eq!(session.top_level()[idx_source + 1].id(), dup);
}

#[test]
fn duplicate_unknown_tab_returns_none() {
    let mut session = Session::in_memory();
    assert!(session.duplicate_tab("nonexistent").is_none());
}

#[test]
fn internal_tabs_use_shell_urls() {
    let mut session = Session::in_memory();
    let id = session.create_internal_tab(InternalPage::Settings);
    let tab = session.tab(&id).unwrap();
    assert_eq!(tab.url.as_deref(), Some("tabdeck://settings"));
    assert_eq!(tab.title, "Settings");
    // Internal pages are restorable.
    session.close_tab(&id);
    assert_eq!(session.closed_tabs().len(), 1);
}

#[test]
fn switch_to_unknown_tab_is_noop() {
    let mut session = Session::in_memory();
    let id = session.create_tab(None);
    session.switch_active("nonexistent");
    assert_eq!(session.active_tab_id(), Some(id.as_str()));
}
