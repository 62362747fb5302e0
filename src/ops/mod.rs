pub mod drag;
pub mod projection;
pub mod task_store;
