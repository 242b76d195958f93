//! Overlay managers, one per overlay kind.

pub mod alert;
pub mod menu;
pub mod toast;

pub use alert::{
    AlertCallback, AlertId, AlertManager, AlertParameter, AlertSizes, compute_alert_size,
};
pub use menu::{MenuManager, MenuParameter, compute_menu_size};
pub use toast::{ToastDuration, ToastManager, compute_toast_size};
