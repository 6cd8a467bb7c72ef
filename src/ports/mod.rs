pub mod cache;
pub mod commit;
pub mod github;
pub mod queue;
pub mod repository;
