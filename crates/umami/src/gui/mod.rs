pub mod app;
pub mod stage;
pub mod theme;
pub mod timer;
pub mod window;
