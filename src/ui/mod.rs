//! 2D overlay: HUD and menu system

mod actor;
mod hud;
mod menu;
mod rect;

pub use actor::{Transform2D, UiActor, UiController};
pub use hud::UiManager;
pub use menu::{MenuManager, SCENE_AUDIO, SCENE_CONTROLS, SCENE_EXIT, SCENE_MAIN};
pub use rect::Rect;
