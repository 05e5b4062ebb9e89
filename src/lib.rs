pub mod board;
pub mod collision;
pub mod config;
pub mod game;
pub mod generator;
pub mod shapes;
