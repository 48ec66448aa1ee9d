//! Transit data providers.

pub mod catalog;
pub mod connections;
pub mod handle;
pub mod static_provider;

pub use handle::ProviderHandle;
pub use static_provider::StaticTransitProvider;
