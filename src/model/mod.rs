pub mod member;
pub mod task;
