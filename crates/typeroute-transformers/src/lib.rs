//! Typeroute base transformers
//!
//! The stock conversions most pipelines need before any domain-specific
//! transformer is written: paths, `file://` URLs, JSON text and parameter
//! bags. [`BaseTransformerLoader`] batch-registers all of them and is meant
//! to be handed to `TypeTransformerRegistry::discover` at bootstrap, next to
//! whatever domain loaders the application brings.
//!
//! # Example
//!
//! ```
//! use typeroute_core::{TransformerLoader, TypeTransformerRegistry};
//! use typeroute_transformers::BaseTransformerLoader;
//!
//! let registry = TypeTransformerRegistry::new();
//! registry.discover(&[Box::new(BaseTransformerLoader)]);
//! assert!(!registry.is_empty());
//! ```

pub mod files;
pub mod json;

pub use files::{ParametersToUrl, PathToUrl, UrlToParameters, UrlToPath, PATH_URL_COST};
pub use json::{json_to_string, string_to_json, JSON_TEXT_COST};

use std::sync::Arc;
use typeroute_core::{TransformerLoader, TypeTransformerRegistry};

/// Loader registering every base transformer of this crate.
pub struct BaseTransformerLoader;

impl TransformerLoader for BaseTransformerLoader {
    fn register_transformers(&self, registry: &TypeTransformerRegistry) {
        registry.add_transformer(json_to_string());
        registry.add_transformer(string_to_json());
        registry.add_transformer(Arc::new(PathToUrl));
        registry.add_transformer(Arc::new(UrlToPath));
        registry.add_transformer(Arc::new(UrlToParameters));
        registry.add_transformer(Arc::new(ParametersToUrl));
        log::debug!("registered base transformers");
    }
}
