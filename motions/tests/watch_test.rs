//! Integration tests for the document watcher feeding the controller.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use list_motions::config::Config;
use list_motions::controller::{Controller, StatusBar};
use list_motions::utils::{Debouncer, Sequencer};
use list_motions::watcher::{DocumentEvent, DocumentWatcher};
use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(5);

#[derive(Debug, Default)]
struct Renders(Vec<String>);

impl StatusBar for Renders {
    fn set_text(&mut self, text: &str) {
        self.0.push(text.to_string());
    }
}

/// Receives events until one matches `pred`, failing after [`WAIT`].
async fn wait_for<F>(rx: &mut mpsc::Receiver<DocumentEvent>, mut pred: F) -> DocumentEvent
where
    F: FnMut(&DocumentEvent) -> bool,
{
    timeout(WAIT, async {
        loop {
            let event = rx.recv().await.expect("watcher channel open");
            if pred(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for document event")
}

#[tokio::test]
async fn existing_file_is_activated_then_changed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("list.md");
    fs::write(&path, "- [ ] a\n").unwrap();

    let (tx, mut rx) = mpsc::channel(64);
    let watcher = DocumentWatcher::new(path.clone(), &Config::default(), tx).unwrap();
    let canonical = watcher.target().to_path_buf();

    let mut controller = Controller::new(Renders::default());

    match wait_for(&mut rx, |e| matches!(e, DocumentEvent::Activated { .. })).await {
        DocumentEvent::Activated { path, content } => {
            assert_eq!(path, canonical);
            assert_eq!(controller.on_active_document_changed(&content), 1);
        }
        other => panic!("unexpected event {other:?}"),
    }

    fs::write(&path, "- [ ] a\n- [x] b\n* [/] c\n").unwrap();

    let event = wait_for(&mut rx, |e| {
        matches!(e, DocumentEvent::Changed { content, .. } if content.contains("* [/] c"))
    })
    .await;
    if let DocumentEvent::Changed { content, .. } = event {
        assert_eq!(controller.on_editor_content_changed(&content), 3);
    }

    assert_eq!(controller.status_text(), "List Count: 3");
    assert_eq!(controller.status_bar().0.first().map(String::as_str), Some("List Count: 0"));
    assert_eq!(watcher.known_count().await, 1);
}

#[tokio::test]
async fn directory_watch_ignores_other_extensions() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.md"), "- [ ] a\n").unwrap();
    fs::write(dir.path().join("notes.txt"), "- [ ] ignored\n").unwrap();

    let (tx, mut rx) = mpsc::channel(64);
    let _watcher = DocumentWatcher::new(dir.path().to_path_buf(), &Config::default(), tx).unwrap();

    let first = wait_for(&mut rx, |_| true).await;
    assert!(first.path().ends_with("a.md"));

    fs::write(dir.path().join("b.md"), "- [ ] b\n").unwrap();
    let created = wait_for(&mut rx, |e| e.path().ends_with("b.md")).await;
    assert!(matches!(created, DocumentEvent::Activated { .. } | DocumentEvent::Changed { .. }));

    fs::remove_file(dir.path().join("b.md")).unwrap();
    let removed = wait_for(&mut rx, |e| matches!(e, DocumentEvent::Removed(_))).await;
    assert!(removed.path().ends_with("b.md"));
}

#[tokio::test]
async fn debounced_changes_render_last_content() {
    let (out_tx, mut out_rx) = mpsc::channel(8);
    let debouncer = Debouncer::new(Duration::from_millis(30), out_tx);
    let path = PathBuf::from("list.md");

    for content in ["- [ ] a", "- [ ] a\n- [ ] b", "- [ ] a\n- [ ] b\n- [ ] c"] {
        debouncer.send(path.clone(), content.to_string()).await.unwrap();
    }

    let mut controller = Controller::new(Renders::default());
    let (_, content) = timeout(WAIT, out_rx.recv()).await.unwrap().unwrap();
    controller.on_editor_content_changed(&content);

    assert_eq!(controller.status_text(), "List Count: 3");
    assert_eq!(controller.status_bar().0, vec!["List Count: 0", "List Count: 3"]);
}

#[tokio::test]
async fn delayed_change_does_not_overwrite_newer_activation() {
    let (out_tx, mut out_rx) = mpsc::channel(8);
    let debouncer = Debouncer::new(Duration::from_millis(30), out_tx);
    let mut sequence = Sequencer::new();
    let mut controller = Controller::new(Renders::default());

    // edit to a.md enters the debouncer first
    let changed = sequence.stamp();
    debouncer
        .send(PathBuf::from("a.md"), (changed, "- [ ] a\n- [ ] b\n- [ ] c".to_string()))
        .await
        .unwrap();

    // switching to b.md renders at once
    let activated = sequence.stamp();
    assert!(sequence.accept(activated));
    controller.on_active_document_changed("- [ ] only");

    let (path, (stamp, content)) = timeout(WAIT, out_rx.recv()).await.unwrap().unwrap();
    assert_eq!(path, PathBuf::from("a.md"));
    if sequence.accept(stamp) {
        controller.on_editor_content_changed(&content);
    }

    assert_eq!(controller.status_text(), "List Count: 1");
    assert_eq!(controller.status_bar().0, vec!["List Count: 0", "List Count: 1"]);

    // a later edit still renders
    let next = sequence.stamp();
    debouncer
        .send(PathBuf::from("b.md"), (next, "- [ ] only\n- [x] two".to_string()))
        .await
        .unwrap();
    let (_, (stamp, content)) = timeout(WAIT, out_rx.recv()).await.unwrap().unwrap();
    assert!(sequence.accept(stamp));
    assert_eq!(controller.on_editor_content_changed(&content), 2);
}
