//! Scripted overlay session against the headless host.
//!
//! Runs a fixed sequence of alerts, menus and toasts at 60 frames per second
//! and logs what happens to the terminal and `overlays-demo.log`. An optional first argument
//! names a JSON config file; otherwise a built-in catalog is used.

use std::cell::RefCell;
use std::fs::File;
use std::rc::Rc;
use std::time::{Duration, Instant};

use log::{error, info};
use overlays::prelude::*;
use simplelog::{
    ColorChoice, CombinedLogger, Config, LevelFilter, TermLogger, TerminalMode, WriteLogger,
};

const FRAME: Duration = Duration::from_micros(16_667);

// ============================================================================
// Script
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Step {
    OpenAlerts,
    ConfirmFirst,
    OpenProfileMenu,
    SwapToSettings,
    PickItem,
    Toasts,
    Blur,
    Foreground,
    Shutdown,
}

/// Frame at which each step runs.
const SCRIPT: &[(u32, Step)] = &[
    (1, Step::OpenAlerts),
    (60, Step::ConfirmFirst),
    (100, Step::OpenProfileMenu),
    (130, Step::SwapToSettings),
    (150, Step::SwapToSettings),
    (180, Step::PickItem),
    (220, Step::Toasts),
    (230, Step::Blur),
    (260, Step::Foreground),
    (400, Step::Shutdown),
];

fn default_config() -> DialogConfig {
    let mut config = DialogConfig {
        blocked_surfaces: vec!["main".to_string(), "tab_bar".to_string()],
        ..Default::default()
    };
    config.menu = config
        .menu
        .with_menu(
            "profile",
            MenuContent::new(
                "menu_item",
                vec![
                    MenuItem::new("Account").with_icon("user.png"),
                    MenuItem::new("Sign out"),
                ],
            ),
        )
        .with_menu(
            "settings",
            MenuContent::new(
                "menu_item",
                vec![
                    MenuItem::new("General"),
                    MenuItem::new("Notifications"),
                    MenuItem::new("Privacy"),
                    MenuItem::new("About"),
                ],
            ),
        );
    config
}

struct Session {
    dialogs: DialogCoordinator<HeadlessHost>,
    alerts: Vec<AlertId>,
    events: Rc<RefCell<Vec<String>>>,
}

impl Session {
    fn new(config: DialogConfig) -> Self {
        Self {
            dialogs: DialogCoordinator::new(config, HeadlessHost::new()),
            alerts: Vec::new(),
            events: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn record(&self) -> impl Fn(String) + 'static {
        let events = self.events.clone();
        move |event| events.borrow_mut().push(event)
    }

    fn run(&mut self, step: Step) {
        info!("step: {:?}", step);
        match step {
            Step::OpenAlerts => {
                let on_ok = self.record();
                let on_cancel = self.record();
                let first = self.dialogs.open_alert(
                    AlertParameter::new("Delete file?", "This cannot be undone.")
                        .ok_text("Delete")
                        .on_ok(move |id| on_ok(format!("alert {} confirmed", id)))
                        .on_cancel(move |id| on_cancel(format!("alert {} cancelled", id))),
                );
                let second = self.dialogs.open_alert(
                    AlertParameter::new("Update available", &"A newer version is ready. ".repeat(8))
                        .fly_in(FlyIn::FromTop)
                        .close_on_backdrop(true),
                );
                self.alerts = vec![first, second];
            }
            Step::ConfirmFirst => {
                if let Some(id) = self.alerts.first().copied() {
                    self.dialogs.dispatch_click(ClickTarget::AlertOk(id));
                }
                if let Some(id) = self.alerts.get(1).copied() {
                    self.dialogs.dispatch_click(ClickTarget::AlertBackdrop(id));
                }
            }
            Step::OpenProfileMenu => {
                let picked = self.record();
                self.dialogs.open_menu(
                    MenuParameter::new("profile")
                        .on_item_click(move |i| picked(format!("profile item {}", i))),
                );
            }
            Step::SwapToSettings => {
                let picked = self.record();
                self.dialogs.open_menu(
                    MenuParameter::new("settings")
                        .on_item_click(move |i| picked(format!("settings item {}", i))),
                );
            }
            Step::PickItem => {
                if let Some(target) = self.dialogs.menu().item_target(2) {
                    self.dialogs.dispatch_click(target);
                }
            }
            Step::Toasts => {
                self.dialogs.open_toast("Saved", ToastDuration::Fast);
                self.dialogs.open_toast("Synced with server", ToastDuration::Slow);
            }
            Step::Blur => self.dialogs.on_blur(),
            Step::Foreground => self.dialogs.on_foreground(),
            Step::Shutdown => self.dialogs.shutdown(),
        }
        self.report();
    }

    fn report(&self) {
        for event in self.events.borrow_mut().drain(..) {
            info!("callback: {}", event);
        }
        info!(
            "alerts: {}, menu: {:?}, toast visible: {}, input blocked: {}, live nodes: {}",
            self.dialogs.live_alerts().len(),
            self.dialogs.menu_state(),
            self.dialogs.toast_visible(),
            self.dialogs.is_input_blocked(),
            self.dialogs.host().live_count(),
        );
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() {
    let log_file = File::create("overlays-demo.log").expect("Failed to create log file");
    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Debug, Config::default(), log_file),
    ])
    .expect("Failed to initialize logger");

    let config = match std::env::args().nth(1) {
        Some(path) => match DialogConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                error!("{}", e);
                return;
            }
        },
        None => default_config(),
    };

    let mut session = Session::new(config);
    let mut interval = tokio::time::interval(FRAME);
    let mut last = Instant::now();
    let mut script = SCRIPT.iter().peekable();
    let mut frame = 0u32;

    while script.peek().is_some() {
        interval.tick().await;
        frame += 1;

        let now = Instant::now();
        let dt = now - last;
        last = now;

        while let Some((_, step)) = script.next_if(|(at, _)| *at <= frame) {
            session.run(*step);
        }
        session.dialogs.host_mut().complete_layout_pass();
        session.dialogs.advance(dt);
    }

    session.report();
    info!("session finished after {} frames", frame);
}
