pub mod about;
pub mod archive;
pub mod bucket;
pub mod clean;
pub mod task_ops;
