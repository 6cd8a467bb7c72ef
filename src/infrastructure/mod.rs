pub mod cache;
pub mod github;
pub mod queue;
pub mod sqlite;
