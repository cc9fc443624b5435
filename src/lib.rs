pub mod config;
pub mod food;
pub mod game;
pub mod input;
pub mod raster;
pub mod renderer;
pub mod scheduler;
pub mod score;
pub mod session;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;
