//! UI module - HUD and menus.

mod hud;
mod plugin;

pub use plugin::UiPlugin;
