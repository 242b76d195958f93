use std::time::Duration;

use overlays::geometry::{SizeF, Vec2};
use overlays::host::{HeadlessHost, Surface, Templates};
use overlays::runtime::{
    AnimationState, AnimatorEvent, Curves, Easing, FlyIn, IntervalTicker, LayoutSettle, Motion,
    OverlayAnimator, SettleStrategy, Tween,
};

const FRAME: Duration = Duration::from_millis(16);

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 0.001
}

// =============================================================================
// Easing Tests
// =============================================================================

#[test]
fn test_easing_boundaries() {
    for easing in [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::OutCubic,
        Easing::OutBounce,
        Easing::InOutBounce,
    ] {
        assert!(approx(easing.apply(0.0), 0.0), "{:?} at 0", easing);
        assert!(approx(easing.apply(1.0), 1.0), "{:?} at 1", easing);
    }
}

#[test]
fn test_easing_clamps_input() {
    assert_eq!(Easing::Linear.apply(-1.0), 0.0);
    assert_eq!(Easing::Linear.apply(2.0), 1.0);
}

#[test]
fn test_out_cubic_is_fast_start() {
    // 1 - (1 - 0.5)^3
    assert!(approx(Easing::OutCubic.apply(0.5), 0.875));
}

#[test]
fn test_in_out_bounce_is_symmetric_at_midpoint() {
    assert!(approx(Easing::InOutBounce.apply(0.5), 0.5));
}

// =============================================================================
// Tween Tests
// =============================================================================

#[test]
fn test_tween_reaches_target() {
    let mut tween = Tween::new(
        Vec2::new(0.0, -100.0),
        Vec2::ZERO,
        Duration::from_millis(100),
        Easing::Linear,
    );
    assert!(!tween.advance(Duration::from_millis(50)));
    assert!(approx(tween.value().y, -50.0));
    assert!(tween.advance(Duration::from_millis(60)));
    assert_eq!(tween.value(), Vec2::ZERO);
    assert!(tween.is_complete());
}

#[test]
fn test_tween_completion_reported_once() {
    let mut tween = Tween::new(0.0_f32, 1.0, Duration::from_millis(32), Easing::EaseOut);
    let completions = (0..10).filter(|_| tween.advance(FRAME)).count();
    assert_eq!(completions, 1);
}

// =============================================================================
// Interval Ticker Tests
// =============================================================================

#[test]
fn test_ticker_fires_exactly_times() {
    let mut ticker = IntervalTicker::new();
    assert!(ticker.start(3, Duration::ZERO, "resize"));

    let fired: Vec<_> = (0..3).filter_map(|_| ticker.advance(FRAME)).collect();
    assert_eq!(fired, vec!["resize", "resize", "resize"]);
    assert!(!ticker.is_running());
    assert_eq!(ticker.advance(FRAME), None);
}

#[test]
fn test_ticker_restartable_after_completion() {
    let mut ticker = IntervalTicker::new();
    assert!(ticker.start(3, Duration::ZERO, 1));
    for _ in 0..3 {
        ticker.advance(FRAME);
    }
    // No stop() needed after natural completion.
    assert!(ticker.start(3, Duration::ZERO, 2));
    assert_eq!(ticker.advance(FRAME), Some(2));
}

#[test]
fn test_ticker_start_while_running_is_noop() {
    let mut ticker = IntervalTicker::new();
    assert!(ticker.start(2, Duration::ZERO, 'a'));
    assert!(!ticker.start(5, Duration::ZERO, 'b'));
    assert_eq!(ticker.remaining(), 2);
    assert_eq!(ticker.advance(FRAME), Some('a'));
}

#[test]
fn test_ticker_zero_times_is_noop() {
    let mut ticker = IntervalTicker::new();
    assert!(!ticker.start(0, Duration::ZERO, ()));
    assert!(!ticker.is_running());
    assert_eq!(ticker.advance(FRAME), None);
}

#[test]
fn test_ticker_waits_for_delay() {
    let mut ticker = IntervalTicker::new();
    ticker.start(1, Duration::from_millis(40), ());
    assert_eq!(ticker.advance(FRAME), None);
    assert_eq!(ticker.advance(FRAME), None);
    // 48ms elapsed, the delay ends inside this frame
    assert_eq!(ticker.advance(FRAME), Some(()));
    assert!(!ticker.is_running());
}

#[test]
fn test_ticker_stop_is_idempotent() {
    let mut ticker = IntervalTicker::new();
    ticker.start(3, Duration::ZERO, ());
    ticker.stop();
    ticker.stop();
    assert!(!ticker.is_running());
    assert_eq!(ticker.advance(FRAME), None);
}

#[test]
fn test_ticker_pause_holds_frames() {
    let mut ticker = IntervalTicker::new();
    ticker.start(2, Duration::ZERO, ());
    ticker.pause();
    assert_eq!(ticker.advance(FRAME), None);
    assert_eq!(ticker.remaining(), 2);
    ticker.resume();
    assert_eq!(ticker.advance(FRAME), Some(()));
}

// =============================================================================
// Layout Settle Tests
// =============================================================================

#[test]
fn test_settle_waits_for_layout_pass() {
    let mut host = HeadlessHost::new();
    let node = host.instantiate("alert", None);
    let mut settle = LayoutSettle::new(SettleStrategy::LayoutPass);

    settle.begin(node, &mut host);
    assert!(settle.is_pending());
    assert!(!settle.advance(FRAME));
    assert!(!settle.advance(FRAME));

    assert_eq!(host.complete_layout_pass(), 1);
    assert!(settle.advance(FRAME));
    assert!(!settle.is_pending());
    assert!(!settle.advance(FRAME));
}

#[test]
fn test_settle_falls_back_to_frames_without_signal() {
    let mut host = HeadlessHost::without_layout_signal();
    let node = host.instantiate("alert", None);
    let mut settle = LayoutSettle::new(SettleStrategy::LayoutPass);

    settle.begin(node, &mut host);
    assert!(settle.advance(FRAME));
    assert!(settle.advance(FRAME));
    assert!(!settle.is_pending());
}

#[test]
fn test_settle_abandoned_when_node_destroyed() {
    let mut host = HeadlessHost::new();
    let node = host.instantiate("toast", None);
    let mut settle = LayoutSettle::new(SettleStrategy::LayoutPass);

    settle.begin(node, &mut host);
    host.destroy(node);
    assert!(!settle.advance(FRAME));
    assert!(!settle.is_pending());
}

#[test]
fn test_settle_frames_strategy_counts() {
    let mut host = HeadlessHost::new();
    let node = host.instantiate("toast", None);
    let mut settle = LayoutSettle::new(SettleStrategy::Frames { count: 3 });

    settle.begin(node, &mut host);
    assert_eq!(host.pending_layout_passes(), 0);
    let measured = (0..5).filter(|_| settle.advance(FRAME)).count();
    assert_eq!(measured, 3);
}

// =============================================================================
// Overlay Animator Tests
// =============================================================================

fn fly_in_animator(host: &mut HeadlessHost) -> OverlayAnimator {
    let node = host.instantiate("alert", None);
    OverlayAnimator::new(
        node,
        Motion::FlyIn {
            viewport: SizeF::new(1080.0, 1920.0),
        },
        Curves::default(),
    )
}

fn run_until_event(
    animator: &mut OverlayAnimator,
    host: &mut HeadlessHost,
) -> Option<AnimatorEvent> {
    (0..200).find_map(|_| animator.advance(FRAME, host))
}

#[test]
fn test_fly_in_origins() {
    let viewport = SizeF::new(1080.0, 1920.0);
    let current = Vec2::new(5.0, 7.0);
    assert_eq!(FlyIn::FromLeft.origin(viewport, current), Vec2::new(-1080.0, 0.0));
    assert_eq!(FlyIn::FromRight.origin(viewport, current), Vec2::new(1080.0, 0.0));
    assert_eq!(FlyIn::FromTop.origin(viewport, current), Vec2::new(0.0, 1920.0));
    assert_eq!(FlyIn::FromBottom.origin(viewport, current), Vec2::new(0.0, -1920.0));
    assert_eq!(FlyIn::None.origin(viewport, current), current);
}

#[test]
fn test_animator_play_then_reverse() {
    let mut host = HeadlessHost::new();
    let mut animator = fly_in_animator(&mut host);
    let node = animator.target();

    assert!(animator.play(FlyIn::FromLeft, Duration::from_millis(100), &mut host));
    assert_eq!(animator.state(), AnimationState::Displaying);
    assert_eq!(host.offset(node), Vec2::new(-1080.0, 0.0));

    assert_eq!(run_until_event(&mut animator, &mut host), Some(AnimatorEvent::Shown));
    assert_eq!(animator.state(), AnimationState::Displayed);
    assert_eq!(host.offset(node), Vec2::ZERO);

    assert!(animator.reverse(&mut host));
    assert_eq!(animator.state(), AnimationState::Hiding);
    assert_eq!(run_until_event(&mut animator, &mut host), Some(AnimatorEvent::Hidden));
    assert_eq!(animator.state(), AnimationState::Hidden);
    assert_eq!(host.offset(node), Vec2::new(-1080.0, 0.0));
}

#[test]
fn test_animator_drops_reentrant_requests() {
    let mut host = HeadlessHost::new();
    let mut animator = fly_in_animator(&mut host);

    assert!(!animator.reverse(&mut host));
    assert!(animator.play(FlyIn::FromBottom, Duration::from_millis(100), &mut host));
    assert!(!animator.play(FlyIn::FromTop, Duration::from_millis(100), &mut host));
    assert!(!animator.reverse(&mut host));
    assert!(!animator.snap_hidden(&mut host));
    assert_eq!(animator.state(), AnimationState::Displaying);

    // The original entry still completes from the bottom.
    assert_eq!(run_until_event(&mut animator, &mut host), Some(AnimatorEvent::Shown));
    assert!(!animator.play(FlyIn::FromTop, Duration::from_millis(100), &mut host));
}

#[test]
fn test_animator_pause_freezes_position() {
    let mut host = HeadlessHost::new();
    let mut animator = fly_in_animator(&mut host);
    let node = animator.target();

    animator.play(FlyIn::FromBottom, Duration::from_millis(160), &mut host);
    animator.advance(FRAME, &mut host);
    animator.pause();
    let frozen = host.offset(node);
    for _ in 0..50 {
        assert_eq!(animator.advance(FRAME, &mut host), None);
    }
    assert_eq!(host.offset(node), frozen);
    assert!(animator.is_transitioning());

    animator.resume();
    assert_eq!(run_until_event(&mut animator, &mut host), Some(AnimatorEvent::Shown));
}

#[test]
fn test_mask_animator_reveals_and_covers() {
    let mut host = HeadlessHost::new();
    let node = host.instantiate("menu", None);
    let mut animator = OverlayAnimator::new(node, Motion::Mask { extent: 0.0 }, Curves::default());
    animator.set_extent(300.0);

    animator.play(FlyIn::None, Duration::from_millis(100), &mut host);
    assert_eq!(host.mask(node), Some(300.0));
    assert_eq!(run_until_event(&mut animator, &mut host), Some(AnimatorEvent::Shown));
    assert_eq!(host.mask(node), Some(0.0));

    animator.reverse(&mut host);
    assert_eq!(run_until_event(&mut animator, &mut host), Some(AnimatorEvent::Hidden));
    assert_eq!(host.mask(node), Some(300.0));
}
