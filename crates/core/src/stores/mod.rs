pub mod http;

pub use http::HttpSearchApi;
