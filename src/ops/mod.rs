pub mod import;
pub mod store;
pub mod task_ops;
pub mod validate;
