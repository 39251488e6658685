//! Reference environments for training and evaluation.

pub mod corridor;
pub mod maze;

pub use corridor::Corridor;
pub use maze::GridMaze;
