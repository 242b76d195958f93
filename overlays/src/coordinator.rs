//! Dialog coordinator: the single entry point for opening and closing overlays.
//!
//! The coordinator owns the host and one manager per overlay kind. It is
//! constructed once by the application and driven by calling
//! [`DialogCoordinator::advance`] every frame and
//! [`DialogCoordinator::dispatch_click`] for every pointer event whose
//! listener payload is a [`ClickTarget`].
//!
//! None of the operations fail. Requests that cannot be carried out (unknown
//! ids, unknown menu types, requests during a transition) are logged and
//! dropped.

use std::time::Duration;

use crate::config::DialogConfig;
use crate::host::{ClickTarget, Host};
use crate::layers::{
    AlertId, AlertManager, AlertParameter, MenuManager, MenuParameter, ToastDuration, ToastManager,
};
use crate::runtime::AnimationState;

/// Routes overlay requests to the alert, menu and toast managers.
#[derive(Debug)]
pub struct DialogCoordinator<H: Host> {
    host: H,
    alerts: AlertManager,
    menu: MenuManager,
    toast: ToastManager,
    blocked_surfaces: Vec<String>,
    input_blocked: bool,
    paused: bool,
}

impl<H: Host> DialogCoordinator<H> {
    pub fn new(config: DialogConfig, host: H) -> Self {
        let DialogConfig {
            viewport,
            settle,
            blocked_surfaces,
            alert,
            menu,
            toast,
        } = config;
        log::debug!(
            "dialog coordinator: viewport {}, settle {:?}, {} menu types",
            viewport,
            settle,
            menu.catalog.len()
        );
        Self {
            host,
            alerts: AlertManager::new(alert, viewport, settle),
            menu: MenuManager::new(menu),
            toast: ToastManager::new(toast, viewport, settle),
            blocked_surfaces,
            input_blocked: false,
            paused: false,
        }
    }

    /// Open an alert and return its id. The alert animates in over the next frames.
    pub fn open_alert(&mut self, param: AlertParameter) -> AlertId {
        self.alerts.open(param, &mut self.host)
    }

    /// Start hiding an alert. Unknown ids are logged and ignored.
    pub fn close_alert(&mut self, id: &AlertId) {
        self.alerts.close(id, &mut self.host);
    }

    pub fn open_menu(&mut self, param: MenuParameter) {
        self.menu.open(param, &mut self.host);
        self.sync_input_blocking();
    }

    pub fn close_menu(&mut self) {
        self.menu.close(&mut self.host);
        self.sync_input_blocking();
    }

    pub fn toggle_menu(&mut self) {
        self.menu.toggle(&mut self.host);
        self.sync_input_blocking();
    }

    /// Show a toast, replacing any toast currently on screen.
    pub fn open_toast(&mut self, message: &str, duration: impl Into<ToastDuration>) {
        self.toast.open(message, duration, &mut self.host);
    }

    /// Deliver a click whose listener carried `target`.
    pub fn dispatch_click(&mut self, target: ClickTarget) {
        let consumed = self.alerts.on_click(&target, &mut self.host)
            || self.menu.on_click(&target, &mut self.host);
        if !consumed {
            log::debug!("unrouted click {:?}", target);
        }
        self.sync_input_blocking();
    }

    /// Advance every overlay by one frame.
    pub fn advance(&mut self, dt: Duration) {
        if self.paused {
            return;
        }
        self.alerts.advance(dt, &mut self.host);
        self.menu.advance(dt, &mut self.host);
        self.toast.advance(dt, &mut self.host);
        self.sync_input_blocking();
    }

    /// Pause every running animation, sequence and settle wait.
    pub fn on_blur(&mut self) {
        if self.paused {
            return;
        }
        self.paused = true;
        self.alerts.pause();
        self.menu.pause();
        self.toast.pause();
        log::debug!("dialog coordinator: paused");
    }

    /// Resume everything paused by [`DialogCoordinator::on_blur`].
    pub fn on_foreground(&mut self) {
        if !self.paused {
            return;
        }
        self.paused = false;
        self.alerts.resume();
        self.menu.resume();
        self.toast.resume();
        log::debug!("dialog coordinator: resumed");
    }

    /// Release every overlay and restore background input.
    ///
    /// Alerts are released even mid-animation.
    pub fn shutdown(&mut self) {
        let alerts = self.alerts.shutdown(&mut self.host);
        let menus = self.menu.shutdown(&mut self.host);
        let toasts = self.toast.shutdown(&mut self.host);
        self.set_input_blocked(false);
        self.paused = false;
        log::debug!(
            "dialog coordinator: shut down ({} alerts, {} menus, {} toasts)",
            alerts,
            menus,
            toasts
        );
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn alerts(&self) -> &AlertManager {
        &self.alerts
    }

    pub fn menu(&self) -> &MenuManager {
        &self.menu
    }

    pub fn toast(&self) -> &ToastManager {
        &self.toast
    }

    /// Ids of every alert not yet disposed.
    pub fn live_alerts(&self) -> Vec<AlertId> {
        self.alerts.ids()
    }

    pub fn alert_phase(&self, id: &AlertId) -> Option<AnimationState> {
        self.alerts.phase(id)
    }

    pub fn menu_state(&self) -> AnimationState {
        self.menu.state()
    }

    pub fn toast_visible(&self) -> bool {
        self.toast.visible()
    }

    pub fn is_input_blocked(&self) -> bool {
        self.input_blocked
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Block background input exactly while the menu is not hidden.
    fn sync_input_blocking(&mut self) {
        let wanted = self.menu.state() != AnimationState::Hidden;
        if wanted != self.input_blocked {
            self.set_input_blocked(wanted);
        }
    }

    fn set_input_blocked(&mut self, blocked: bool) {
        for surface in &self.blocked_surfaces {
            self.host.set_input_blocked(surface, blocked);
        }
        if blocked != self.input_blocked {
            log::debug!("background input {}", if blocked { "blocked" } else { "restored" });
        }
        self.input_blocked = blocked;
    }
}
