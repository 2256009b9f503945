pub mod border;
pub mod hotkey;
pub mod logging;
pub mod settings;
