pub mod board;
pub mod story;
