pub mod board;
pub mod board_api;
pub mod clock;
pub mod config;
pub mod drag;
pub mod error;
pub mod generate;
pub mod ids;
pub mod model;
pub mod storage;
