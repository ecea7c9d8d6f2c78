pub mod history;
pub mod media;
pub mod settings;
pub mod state;
