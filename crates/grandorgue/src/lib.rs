//! GrandOrgue integration.
//!
//! Maps MIDI notes to GrandOrgue menu commands (export/import combinations)
//! and runs them through the platform's UI automation without bringing the
//! organ window to the front.

pub mod action;
pub mod automation;
mod invoker;
pub mod menu;

pub use action::{action_mapping, default_action_mapping, OrganAction};
pub use automation::{platform_automation, AppHandle, AutomationError, UiAutomation};
pub use invoker::GrandOrgueInvoker;
pub use menu::MenuPath;

/// Window title GrandOrgue is located by.
pub const DEFAULT_WINDOW_TITLE: &str = "GrandOrgue";
