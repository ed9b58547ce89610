/// Item endpoints
pub mod create;
pub mod get;
pub mod list_notes;
pub mod list_todos;
pub mod remove;
pub mod replace_tags;
pub mod update;
