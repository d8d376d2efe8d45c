//! Domain services fixing table and column conventions on top of the engine.

pub mod task;
pub mod user;

pub use task::{Task, TaskInput};
pub use user::{User, UserInput};
