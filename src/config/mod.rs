pub mod resolve_config;

pub use resolve_config::ResolveConfig;
