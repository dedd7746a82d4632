pub mod loader;

pub use loader::{CONFIG_ENV_VAR, DEFAULT_CONFIG_PATH, ParameterLoader, ParameterLoaderError};
