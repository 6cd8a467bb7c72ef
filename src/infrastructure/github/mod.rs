pub mod endpoints;
pub mod fetcher;
pub mod link;
pub mod types;

pub use endpoints::GitHubEndpoints;
pub use fetcher::PaginatedFetcher;
