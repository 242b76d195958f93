//! Alert dialogs.
//!
//! Any number of alerts can be open at once; each is addressed by its
//! [`AlertId`]. An alert flies in from off-screen, waits for the user or the
//! caller to close it, flies back out and is then disposed.
//!
//! Per-instance lifecycle: created, `Displaying`, `Displayed`, `Hiding`,
//! disposed. Only a `Displayed` alert accepts button clicks, so each callback
//! fires at most once and is always followed by the hide.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{AlertConfig, duration_or, text_or};
use crate::error::OverlayError;
use crate::geometry::{SizeF, clamp_soft};
use crate::host::{ClickTarget, Host, Part, Templates};
use crate::registry::{
    InstanceKey, InstanceState, OverlayKind, OverlayRegistry, OverlayRoots, TemplateRefs,
};
use crate::runtime::{
    AnimationState, AnimatorEvent, Curves, FlyIn, LayoutSettle, Motion, OverlayAnimator,
    SettleStrategy,
};

/// Unique identifier of an alert instance.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlertId(Uuid);

impl AlertId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for AlertId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AlertId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AlertId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl InstanceKey for AlertId {
    fn allocate() -> Self {
        Self::new()
    }
}

/// Callback invoked with the id of the alert whose button was pressed.
pub type AlertCallback = Box<dyn FnMut(&AlertId)>;

/// What to show in an alert.
///
/// Unset or empty fields fall back to the configured defaults.
#[derive(Default)]
pub struct AlertParameter {
    pub title: String,
    pub content: String,
    pub ok_text: Option<String>,
    pub cancel_text: Option<String>,
    pub fly_in: FlyIn,
    pub duration: Option<Duration>,
    /// Close the alert when the backdrop is clicked.
    pub close_on_backdrop: bool,
    pub on_ok: Option<AlertCallback>,
    pub on_cancel: Option<AlertCallback>,
}

impl AlertParameter {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn ok_text(mut self, text: impl Into<String>) -> Self {
        self.ok_text = Some(text.into());
        self
    }

    pub fn cancel_text(mut self, text: impl Into<String>) -> Self {
        self.cancel_text = Some(text.into());
        self
    }

    pub fn fly_in(mut self, direction: FlyIn) -> Self {
        self.fly_in = direction;
        self
    }

    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn close_on_backdrop(mut self, close: bool) -> Self {
        self.close_on_backdrop = close;
        self
    }

    pub fn on_ok<F: FnMut(&AlertId) + 'static>(mut self, f: F) -> Self {
        self.on_ok = Some(Box::new(f));
        self
    }

    pub fn on_cancel<F: FnMut(&AlertId) + 'static>(mut self, f: F) -> Self {
        self.on_cancel = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for AlertParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertParameter")
            .field("title", &self.title)
            .field("content", &self.content)
            .field("ok_text", &self.ok_text)
            .field("cancel_text", &self.cancel_text)
            .field("fly_in", &self.fly_in)
            .field("duration", &self.duration)
            .field("close_on_backdrop", &self.close_on_backdrop)
            .field("on_ok", &self.on_ok.is_some())
            .field("on_cancel", &self.on_cancel.is_some())
            .finish()
    }
}

/// Sizes applied to an alert once its content has been measured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertSizes {
    pub dialog: SizeF,
    pub content: SizeF,
    /// Size of each of the two buttons.
    pub button: SizeF,
}

/// Fit the dialog to the preferred size of its content text.
///
/// The dialog grows by however much the content outgrows its initial area,
/// bounded by the viewport (minus the horizontal margins) in width and half
/// the viewport in height. The content area keeps the fixed chrome difference
/// to the dialog. The buttons split the dialog width.
pub fn compute_alert_size(config: &AlertConfig, viewport: SizeF, preferred: SizeF) -> AlertSizes {
    let init = config.content_size;
    let chrome = config.min_size.minus(init);
    let max_dialog = SizeF::new(
        viewport.width - 2.0 * config.min_horizontal_margin,
        viewport.height / 2.0,
    );
    let max_content = max_dialog.minus(chrome);
    let growth = preferred.minus(init);

    let content = SizeF::new(
        clamp_soft(init.width + growth.width, init.width, max_content.width),
        clamp_soft(init.height + growth.height, init.height, max_content.height),
    )
    .ceil();
    let dialog = SizeF::new(
        clamp_soft(
            config.min_size.width + growth.width,
            config.min_size.width,
            max_dialog.width,
        ),
        clamp_soft(
            config.min_size.height + growth.height,
            config.min_size.height,
            max_dialog.height,
        ),
    )
    .ceil();
    let button = SizeF::new(dialog.width / 2.0, config.button_height);

    AlertSizes {
        dialog,
        content,
        button,
    }
}

/// Per-alert state stored in the registry.
pub struct AlertState {
    animator: OverlayAnimator,
    settle: LayoutSettle,
    on_ok: Option<AlertCallback>,
    on_cancel: Option<AlertCallback>,
    sizes: Option<AlertSizes>,
}

impl AlertState {
    pub fn phase(&self) -> AnimationState {
        self.animator.state()
    }

    /// Sizes from the last measurement, if the alert has settled.
    pub fn sizes(&self) -> Option<AlertSizes> {
        self.sizes
    }
}

impl fmt::Debug for AlertState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertState")
            .field("animator", &self.animator)
            .field("settle", &self.settle)
            .field("sizes", &self.sizes)
            .finish_non_exhaustive()
    }
}

impl InstanceState for AlertState {
    fn is_transitioning(&self) -> bool {
        self.animator.is_transitioning()
    }

    fn release<T: Templates + ?Sized>(&mut self, _templates: &mut T) {
        self.settle.cancel();
        self.on_ok = None;
        self.on_cancel = None;
    }
}

/// Manages every live alert.
#[derive(Debug)]
pub struct AlertManager {
    config: AlertConfig,
    viewport: SizeF,
    settle: SettleStrategy,
    registry: OverlayRegistry<AlertId, AlertState>,
}

impl AlertManager {
    pub fn new(config: AlertConfig, viewport: SizeF, settle: SettleStrategy) -> Self {
        Self {
            config,
            viewport,
            settle,
            registry: OverlayRegistry::new(OverlayKind::Alert),
        }
    }

    /// Create an alert and start its entry animation.
    ///
    /// The returned id is live immediately; the alert becomes visible over the
    /// following frames.
    pub fn open<H: Host + ?Sized>(&mut self, param: AlertParameter, host: &mut H) -> AlertId {
        let AlertParameter {
            title,
            content,
            ok_text,
            cancel_text,
            fly_in,
            duration,
            close_on_backdrop,
            on_ok,
            on_cancel,
        } = param;

        let direction = fly_in.or(self.config.default_fly_in());
        let duration = duration_or(duration, self.config.default_duration());
        let ok_text = text_or(ok_text.as_deref(), &self.config.ok_text).to_string();
        let cancel_text = text_or(cancel_text.as_deref(), &self.config.cancel_text).to_string();

        let templates = TemplateRefs {
            backdrop: Some(&self.config.backdrop_template),
            content: &self.config.template,
        };
        let viewport = self.viewport;
        let strategy = self.settle;
        let instance = self.registry.create(templates, &mut *host, |_, roots| AlertState {
            animator: OverlayAnimator::new(
                roots.content,
                Motion::FlyIn { viewport },
                Curves::default(),
            ),
            settle: LayoutSettle::new(strategy),
            on_ok,
            on_cancel,
            sizes: None,
        });

        let id = instance.id;
        let OverlayRoots { backdrop, content: root } = instance.roots;

        host.set_text(root, Part::Title, &title);
        host.set_text(root, Part::Body, &content);
        host.set_text(root, Part::OkLabel, &ok_text);
        host.set_text(root, Part::CancelLabel, &cancel_text);
        host.listen(root, Part::OkButton, ClickTarget::AlertOk(id));
        host.listen(root, Part::CancelButton, ClickTarget::AlertCancel(id));
        if let Some(backdrop) = backdrop.filter(|_| close_on_backdrop) {
            host.listen(backdrop, Part::Root, ClickTarget::AlertBackdrop(id));
        }

        instance.state.animator.play(direction, duration, &mut *host);
        instance.roots.set_active(&mut *host, true);
        instance.state.settle.begin(root, &mut *host);

        log::debug!(
            "alert {}: opened ({:?}, {:?}, '{}')",
            id,
            direction,
            duration,
            title
        );
        id
    }

    /// Start hiding an alert.
    ///
    /// Fails with [`OverlayError::NotFound`] for ids that are not live and
    /// [`OverlayError::InTransition`] while the alert is still flying in or
    /// already hiding.
    pub fn try_close<H: Host + ?Sized>(
        &mut self,
        id: &AlertId,
        host: &mut H,
    ) -> Result<(), OverlayError> {
        let instance = self
            .registry
            .lookup_mut(id)
            .ok_or_else(|| OverlayError::NotFound {
                kind: OverlayKind::Alert,
                id: id.to_string(),
            })?;
        if !instance.state.animator.reverse(host) {
            return Err(OverlayError::InTransition {
                kind: OverlayKind::Alert,
            });
        }
        log::debug!("alert {}: hiding", id);
        Ok(())
    }

    /// Start hiding an alert, logging instead of failing.
    pub fn close<H: Host + ?Sized>(&mut self, id: &AlertId, host: &mut H) {
        if let Err(e) = self.try_close(id, host) {
            e.report();
        }
    }

    /// Handle a click routed to an alert.
    ///
    /// Returns true if the click was consumed.
    pub fn on_click<H: Host + ?Sized>(&mut self, target: &ClickTarget, host: &mut H) -> bool {
        let (id, callback_slot) = match target {
            ClickTarget::AlertOk(id) => (id, Some(true)),
            ClickTarget::AlertCancel(id) => (id, Some(false)),
            ClickTarget::AlertBackdrop(id) => (id, None),
            _ => return false,
        };
        let Some(instance) = self.registry.lookup_mut(id) else {
            log::debug!("alert {}: click after disposal ignored", id);
            return true;
        };
        if instance.state.phase() != AnimationState::Displayed {
            log::debug!(
                "alert {}: click ignored in state {:?}",
                id,
                instance.state.phase()
            );
            return true;
        }

        let callback = match callback_slot {
            Some(true) => instance.state.on_ok.as_mut(),
            Some(false) => instance.state.on_cancel.as_mut(),
            None => None,
        };
        if let Some(callback) = callback {
            callback(id);
        }
        if instance.state.animator.reverse(host) {
            log::debug!("alert {}: hiding after click", id);
        }
        true
    }

    /// Advance every alert by one frame.
    ///
    /// Alerts that finished hiding are disposed.
    pub fn advance<H: Host + ?Sized>(&mut self, dt: Duration, host: &mut H) {
        let mut hidden = Vec::new();
        for instance in self.registry.iter_mut() {
            if instance.state.settle.advance(dt) {
                let root = instance.roots.content;
                let preferred = host.preferred_size(root, Part::Body);
                let sizes = compute_alert_size(&self.config, self.viewport, preferred);
                host.set_size(root, Part::Root, sizes.dialog);
                host.set_size(root, Part::Body, sizes.content);
                host.set_size(root, Part::OkButton, sizes.button);
                host.set_size(root, Part::CancelButton, sizes.button);
                instance.state.sizes = Some(sizes);
                log::debug!(
                    "alert {}: resized dialog {}, content {}, button {}",
                    instance.id,
                    sizes.dialog,
                    sizes.content,
                    sizes.button
                );
            }
            match instance.state.animator.advance(dt, &mut *host) {
                Some(AnimatorEvent::Shown) => log::debug!("alert {}: shown", instance.id),
                Some(AnimatorEvent::Hidden) => hidden.push(instance.id),
                None => {}
            }
        }
        for id in hidden {
            if let Err(e) = self.registry.dispose(&id, host) {
                e.report();
            }
        }
    }

    pub fn pause(&mut self) {
        for instance in self.registry.iter_mut() {
            instance.state.animator.pause();
            instance.state.settle.pause();
        }
    }

    pub fn resume(&mut self) {
        for instance in self.registry.iter_mut() {
            instance.state.animator.resume();
            instance.state.settle.resume();
        }
    }

    /// Dispose every alert, mid-animation or not.
    pub fn shutdown<T: Templates + ?Sized>(&mut self, host: &mut T) -> usize {
        for instance in self.registry.iter_mut() {
            instance.state.animator.stop();
        }
        self.registry.dispose_all(host)
    }

    pub fn contains(&self, id: &AlertId) -> bool {
        self.registry.contains(id)
    }

    /// Animation state of a live alert. `None` once disposed.
    pub fn phase(&self, id: &AlertId) -> Option<AnimationState> {
        self.registry.lookup(id).map(|i| i.state.phase())
    }

    /// Sizes applied to a live alert after it settled.
    pub fn sizes(&self, id: &AlertId) -> Option<AlertSizes> {
        self.registry.lookup(id).and_then(|i| i.state.sizes())
    }

    /// Visual roots of a live alert.
    pub fn roots(&self, id: &AlertId) -> Option<OverlayRoots> {
        self.registry.lookup(id).map(|i| i.roots)
    }

    pub fn ids(&self) -> Vec<AlertId> {
        self.registry.ids()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: SizeF = SizeF::new(1080.0, 1920.0);

    #[test]
    fn test_compute_size_keeps_minimum_for_short_text() {
        let config = AlertConfig::default();
        let sizes = compute_alert_size(&config, VIEWPORT, SizeF::new(100.0, 40.0));
        assert_eq!(sizes.dialog, SizeF::new(600.0, 480.0));
        assert_eq!(sizes.content, SizeF::new(520.0, 300.0));
        assert_eq!(sizes.button, SizeF::new(300.0, 96.0));
    }

    #[test]
    fn test_compute_size_grows_with_content() {
        let config = AlertConfig::default();
        let sizes = compute_alert_size(&config, VIEWPORT, SizeF::new(700.5, 400.0));
        assert_eq!(sizes.content, SizeF::new(701.0, 400.0));
        assert_eq!(sizes.dialog, SizeF::new(781.0, 580.0));
        assert_eq!(sizes.button.width, 390.5);
    }

    #[test]
    fn test_compute_size_clamps_to_viewport() {
        let config = AlertConfig::default();
        let sizes = compute_alert_size(&config, VIEWPORT, SizeF::new(5000.0, 5000.0));
        // 1080 - 2 * 40 wide, half the viewport high
        assert_eq!(sizes.dialog, SizeF::new(1000.0, 960.0));
        assert_eq!(sizes.content, SizeF::new(920.0, 780.0));
    }

    #[test]
    fn test_alert_id_round_trips_through_string() {
        let id = AlertId::new();
        let parsed: AlertId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert!("not-a-uuid".parse::<AlertId>().is_err());
    }
}
