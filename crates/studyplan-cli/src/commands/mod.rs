pub mod config;
pub mod extract;
pub mod render;
pub mod run;
pub mod sort;
pub mod task_arg;
