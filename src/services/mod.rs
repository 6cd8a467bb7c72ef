pub mod commit_sync;
pub mod feed;
pub mod repository_sync;
pub mod scheduler;
pub mod worker;

#[cfg(test)]
pub mod test_support;
