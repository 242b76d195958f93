//! Toast notifications.
//!
//! One toast surface is created on first use and reused afterwards. Each open
//! restarts the fade-in, hold, fade-out sequence from the start, so a new
//! toast always replaces the one on screen. When the sequence ends the surface
//! is deactivated, not destroyed.

use std::time::Duration;

use crate::config::{ToastConfig, ToastPresets, duration_or, seconds};
use crate::geometry::{SizeF, near};
use crate::host::{Host, NodeId, Part, Templates};
use crate::registry::{InstanceState, OverlayKind, OverlayRegistry, Singleton, TemplateRefs};
use crate::runtime::{Easing, LayoutSettle, SettleStrategy};

/// How long a toast stays fully visible.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ToastDuration {
    Fast,
    #[default]
    Normal,
    Slow,
    Custom(Duration),
}

impl ToastDuration {
    /// Resolve to a concrete duration. Presets use the configured values.
    pub fn resolve(self, presets: &ToastPresets) -> Duration {
        match self {
            ToastDuration::Fast => seconds(presets.fast),
            ToastDuration::Normal => seconds(presets.normal),
            ToastDuration::Slow => seconds(presets.slow),
            ToastDuration::Custom(d) => d,
        }
    }
}

impl From<Duration> for ToastDuration {
    fn from(d: Duration) -> Self {
        ToastDuration::Custom(d)
    }
}

// Seconds.
impl From<f32> for ToastDuration {
    fn from(secs: f32) -> Self {
        ToastDuration::Custom(seconds(secs))
    }
}

/// Toast size for a message of `preferred` size.
///
/// Padded on all sides, no wider than the viewport minus the margins.
pub fn compute_toast_size(config: &ToastConfig, viewport: SizeF, preferred: SizeF) -> SizeF {
    let max_width = viewport.width - 2.0 * config.horizontal_margin;
    SizeF::new(
        max_width.min(preferred.width + 2.0 * config.padding.width),
        preferred.height + 2.0 * config.padding.height,
    )
    .ceil()
}

/// Fade-in, hold, fade-out, driven by elapsed frame time.
#[derive(Debug, Clone)]
pub struct FadeSequence {
    fade: Duration,
    hold: Duration,
    elapsed: Duration,
    running: bool,
    paused: bool,
}

impl FadeSequence {
    pub fn new(fade: Duration, hold: Duration) -> Self {
        Self {
            fade,
            hold,
            elapsed: Duration::ZERO,
            running: false,
            paused: false,
        }
    }

    pub fn hold(&self) -> Duration {
        self.hold
    }

    pub fn total(&self) -> Duration {
        self.fade.saturating_mul(2).saturating_add(self.hold)
    }

    pub fn restart(&mut self) {
        self.elapsed = Duration::ZERO;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Visibility in `[0, 1]` at the current point of the sequence.
    pub fn alpha(&self) -> f32 {
        if !self.running {
            return 0.0;
        }
        let fade = self.fade.as_secs_f32();
        let ramp = |t: Duration| {
            if fade <= 0.0 {
                1.0
            } else {
                Easing::EaseOut.apply(t.as_secs_f32() / fade)
            }
        };
        if self.elapsed < self.fade {
            ramp(self.elapsed)
        } else if self.elapsed < self.fade.saturating_add(self.hold) {
            1.0
        } else {
            1.0 - ramp(self.elapsed - self.fade.saturating_add(self.hold))
        }
    }

    /// Advance one frame. Returns true when the sequence finishes on this frame.
    pub fn advance(&mut self, dt: Duration) -> bool {
        if !self.running || self.paused {
            return false;
        }
        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed >= self.total() {
            self.elapsed = self.total();
            self.running = false;
            return true;
        }
        false
    }
}

/// State of the toast surface.
#[derive(Debug)]
pub struct ToastSurface {
    sequence: Option<FadeSequence>,
    settle: LayoutSettle,
    message: String,
    size: Option<SizeF>,
}

impl InstanceState for ToastSurface {
    fn is_transitioning(&self) -> bool {
        self.sequence.as_ref().is_some_and(FadeSequence::is_running)
    }

    fn release<T: Templates + ?Sized>(&mut self, _templates: &mut T) {
        self.settle.cancel();
        if let Some(sequence) = &mut self.sequence {
            sequence.stop();
        }
    }
}

fn apply_alpha<H: Host + ?Sized>(config: &ToastConfig, root: NodeId, alpha: f32, host: &mut H) {
    host.set_opacity(root, Part::Background, alpha * config.background_opacity);
    host.set_opacity(root, Part::Message, alpha);
}

/// Manages the singleton toast surface.
#[derive(Debug)]
pub struct ToastManager {
    config: ToastConfig,
    viewport: SizeF,
    settle: SettleStrategy,
    registry: OverlayRegistry<Singleton, ToastSurface>,
    builds: usize,
}

impl ToastManager {
    pub fn new(config: ToastConfig, viewport: SizeF, settle: SettleStrategy) -> Self {
        Self {
            config,
            viewport,
            settle,
            registry: OverlayRegistry::new(OverlayKind::Toast),
            builds: 0,
        }
    }

    /// Show `message`, replacing whatever toast is on screen.
    ///
    /// A zero duration means the configured default.
    pub fn open<H: Host + ?Sized>(
        &mut self,
        message: &str,
        duration: impl Into<ToastDuration>,
        host: &mut H,
    ) {
        let hold = duration_or(
            Some(duration.into().resolve(&self.config.presets)),
            self.config.default_duration(),
        );
        let strategy = self.settle;
        let templates = TemplateRefs {
            backdrop: None,
            content: &self.config.template,
        };
        let instance = self.registry.create(templates, &mut *host, |_, _| ToastSurface {
            sequence: None,
            settle: LayoutSettle::new(strategy),
            message: String::new(),
            size: None,
        });
        let root = instance.roots.content;
        let surface = &mut instance.state;

        let stale = surface
            .sequence
            .as_ref()
            .is_none_or(|s| !near(s.hold().as_secs_f32(), hold.as_secs_f32()));
        if stale {
            surface.sequence = Some(FadeSequence::new(self.config.fade(), hold));
            self.builds += 1;
            log::debug!("toast: fade sequence rebuilt for {:?}", hold);
        }

        host.set_text(root, Part::Message, message);
        surface.message = message.to_string();
        if let Some(sequence) = &mut surface.sequence {
            sequence.restart();
        }
        apply_alpha(&self.config, root, 0.0, &mut *host);
        instance.roots.set_active(&mut *host, true);
        surface.settle.begin(root, &mut *host);
        log::debug!("toast: '{}' for {:?}", message, hold);
    }

    /// Advance the fade sequence and pending measurement by one frame.
    pub fn advance<H: Host + ?Sized>(&mut self, dt: Duration, host: &mut H) {
        let Some(instance) = self.registry.lookup_mut(&Singleton) else {
            return;
        };
        let root = instance.roots.content;
        let surface = &mut instance.state;

        if surface.settle.advance(dt) {
            let preferred = host.preferred_size(root, Part::Message);
            let size = compute_toast_size(&self.config, self.viewport, preferred);
            host.set_size(root, Part::Root, size);
            surface.size = Some(size);
            log::debug!("toast: resized to {}", size);
        }

        let Some(sequence) = &mut surface.sequence else {
            return;
        };
        if !sequence.is_running() {
            return;
        }
        let finished = sequence.advance(dt);
        apply_alpha(&self.config, root, sequence.alpha(), &mut *host);
        if finished {
            surface.settle.cancel();
            instance.roots.set_active(host, false);
            log::debug!("toast: finished");
        }
    }

    /// True while a toast is fading in, holding or fading out.
    pub fn visible(&self) -> bool {
        self.registry
            .lookup(&Singleton)
            .is_some_and(|i| i.state.is_transitioning())
    }

    /// Message of the last toast opened.
    pub fn message(&self) -> Option<&str> {
        self.registry
            .lookup(&Singleton)
            .map(|i| i.state.message.as_str())
    }

    /// Visible duration of the current fade sequence.
    pub fn hold(&self) -> Option<Duration> {
        self.registry
            .lookup(&Singleton)
            .and_then(|i| i.state.sequence.as_ref())
            .map(FadeSequence::hold)
    }

    /// Size applied after the last measurement.
    pub fn size(&self) -> Option<SizeF> {
        self.registry.lookup(&Singleton).and_then(|i| i.state.size)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.registry.lookup(&Singleton).map(|i| i.roots.content)
    }

    /// Number of times the fade sequence was (re)built.
    pub fn sequence_builds(&self) -> usize {
        self.builds
    }

    pub fn pause(&mut self) {
        if let Some(instance) = self.registry.lookup_mut(&Singleton) {
            instance.state.settle.pause();
            if let Some(sequence) = &mut instance.state.sequence {
                sequence.pause();
            }
        }
    }

    pub fn resume(&mut self) {
        if let Some(instance) = self.registry.lookup_mut(&Singleton) {
            instance.state.settle.resume();
            if let Some(sequence) = &mut instance.state.sequence {
                sequence.resume();
            }
        }
    }

    /// Release the toast surface.
    pub fn shutdown<T: Templates + ?Sized>(&mut self, host: &mut T) -> usize {
        self.registry.dispose_all(host)
    }
}
