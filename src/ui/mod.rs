pub mod manager;
pub mod panel;

pub use manager::UiManager;
pub use panel::diorama_panel;
