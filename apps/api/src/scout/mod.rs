pub mod careers;
pub mod decision;
pub mod export;
pub mod fetcher;
pub mod handlers;
pub mod judgment;
pub mod outreach;
pub mod pipeline;
pub mod prompts;
pub mod queries;
pub mod search;
pub mod signals;
pub mod summary;

#[cfg(test)]
pub mod testing;
