pub mod error;
pub mod fetch;
pub mod pagination;
pub mod provider;
pub mod providers;
pub mod registry;
pub mod token;

pub use error::ProviderError;
pub use fetch::HttpSettings;
pub use pagination::fetch_paginated;
pub use provider::Provider;
pub use providers::{Autoblog, GasBuddy, Nsw, Spritpreisrechner, Tankerkoenig};
pub use registry::{build_provider, PROVIDER_NAMES};
pub use token::TokenStore;
