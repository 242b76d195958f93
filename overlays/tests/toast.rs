use std::time::Duration;

use overlays::config::seconds;
use overlays::geometry::SizeF;
use overlays::host::{HeadlessHost, Part};
use overlays::layers::ToastDuration;
use overlays::{DialogConfig, DialogCoordinator};

const FRAME: Duration = Duration::from_millis(16);

fn coordinator() -> DialogCoordinator<HeadlessHost> {
    DialogCoordinator::new(DialogConfig::default(), HeadlessHost::new())
}

fn run(dialogs: &mut DialogCoordinator<HeadlessHost>, frames: usize) {
    for _ in 0..frames {
        dialogs.host_mut().complete_layout_pass();
        dialogs.advance(FRAME);
    }
}

fn toast_root(dialogs: &DialogCoordinator<HeadlessHost>) -> overlays::NodeId {
    dialogs.toast().root().expect("toast created")
}

#[test]
fn test_toast_created_lazily_and_reused() {
    let mut dialogs = coordinator();
    assert!(dialogs.toast().root().is_none());

    dialogs.open_toast("Saved", ToastDuration::Fast);
    let root = toast_root(&dialogs);
    run(&mut dialogs, 100);
    dialogs.open_toast("Saved again", ToastDuration::Fast);

    assert_eq!(toast_root(&dialogs), root);
    assert_eq!(dialogs.host().instantiated("toast"), 1);
}

#[test]
fn test_superseding_toast_shows_only_latest() {
    let mut dialogs = coordinator();
    dialogs.open_toast("A", ToastDuration::Fast);
    dialogs.open_toast("B", ToastDuration::Slow);

    let root = toast_root(&dialogs);
    assert_eq!(dialogs.host().live_nodes("toast"), vec![root]);
    assert_eq!(dialogs.host().text(root, Part::Message), Some("B"));
    assert_eq!(dialogs.toast().hold(), Some(seconds(1.5)));

    // 0.2 + 0.6 + 0.2 = 1.0s would end "A"; "B" is still up well past that.
    run(&mut dialogs, 80);
    assert!(dialogs.toast_visible());
    assert!(dialogs.host().is_active(root));

    // 0.2 + 1.5 + 0.2 = 1.9s in total
    run(&mut dialogs, 45);
    assert!(!dialogs.toast_visible());
    assert!(!dialogs.host().is_active(root));
    assert!(dialogs.host().is_live(root));
}

#[test]
fn test_reopen_restarts_sequence() {
    let mut dialogs = coordinator();
    dialogs.open_toast("first", ToastDuration::Fast);
    // 0.8s into a 1.0s sequence
    run(&mut dialogs, 50);
    assert!(dialogs.toast_visible());

    dialogs.open_toast("second", ToastDuration::Fast);
    run(&mut dialogs, 30);
    assert!(dialogs.toast_visible());
    let root = toast_root(&dialogs);
    assert_eq!(dialogs.host().text(root, Part::Message), Some("second"));
}

#[test]
fn test_sequence_rebuilt_only_when_duration_changes() {
    let mut dialogs = coordinator();
    dialogs.open_toast("one", ToastDuration::Normal);
    dialogs.open_toast("two", ToastDuration::Normal);
    dialogs.open_toast("three", 1.0_f32);
    assert_eq!(dialogs.toast().sequence_builds(), 1);

    dialogs.open_toast("four", ToastDuration::Slow);
    assert_eq!(dialogs.toast().sequence_builds(), 2);
    dialogs.open_toast("five", Duration::from_millis(1500));
    assert_eq!(dialogs.toast().sequence_builds(), 2);
}

#[test]
fn test_zero_duration_uses_default() {
    let mut dialogs = coordinator();
    dialogs.open_toast("zero", Duration::ZERO);
    assert_eq!(dialogs.toast().hold(), Some(seconds(1.0)));
    dialogs.open_toast("negative", -3.0_f32);
    assert_eq!(dialogs.toast().hold(), Some(seconds(1.0)));
}

#[test]
fn test_fade_drives_opacity() {
    let mut dialogs = coordinator();
    dialogs.open_toast("fade", ToastDuration::Normal);
    let root = toast_root(&dialogs);
    assert_eq!(dialogs.host().opacity(root, Part::Message), Some(0.0));
    assert_eq!(dialogs.host().opacity(root, Part::Background), Some(0.0));

    // Into the hold
    run(&mut dialogs, 20);
    assert_eq!(dialogs.host().opacity(root, Part::Message), Some(1.0));
    let background = dialogs.host().opacity(root, Part::Background).unwrap_or_default();
    assert!((background - 0.6).abs() < 0.001);

    // 0.2 + 1.0 + 0.2 = 1.4s in total
    run(&mut dialogs, 70);
    assert_eq!(dialogs.host().opacity(root, Part::Message), Some(0.0));
}

#[test]
fn test_toast_sized_to_message() {
    let mut dialogs = coordinator();
    dialogs.open_toast("Hello", ToastDuration::Normal);
    let root = toast_root(&dialogs);
    run(&mut dialogs, 1);

    // 5 glyphs of 16x32 plus 24/16 padding
    let expected = SizeF::new(80.0 + 48.0, 32.0 + 32.0);
    assert_eq!(dialogs.toast().size(), Some(expected));
    assert_eq!(dialogs.host().size(root, Part::Root), Some(expected));
}

#[test]
fn test_long_toast_capped_to_viewport() {
    let mut dialogs = coordinator();
    dialogs.open_toast(&"w".repeat(200), ToastDuration::Normal);
    run(&mut dialogs, 1);
    assert_eq!(dialogs.toast().size().map(|s| s.width), Some(1000.0));
}

#[test]
fn test_unbounded_hold_stays_up() {
    let mut dialogs = coordinator();
    dialogs.open_toast("sticky", ToastDuration::Custom(Duration::MAX));
    let root = toast_root(&dialogs);

    run(&mut dialogs, 200);
    assert!(dialogs.toast_visible());
    assert_eq!(dialogs.host().opacity(root, Part::Message), Some(1.0));

    // A bounded toast still replaces it.
    dialogs.open_toast("done", ToastDuration::Fast);
    run(&mut dialogs, 70);
    assert!(!dialogs.toast_visible());
}
