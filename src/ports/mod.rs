pub mod feed_cache;
pub mod feed_transport;
pub mod stores;
