pub mod page_fetcher;

pub use page_fetcher::{HttpFetcher, PageFetcher};
