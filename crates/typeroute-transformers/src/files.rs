//! File and URL transformers
//!
//! The interchange every pipeline ends up needing: paths become `file://`
//! URLs and back, and a parameter bag round-trips through a JSON file so it
//! can be handed to components that only accept a URL.
//!
//! Copyright (c) 2025 Typeroute Team
//! Licensed under the Apache-2.0 license

use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use typeroute_core::{AnyValue, Error, Parameters, Result, TypeTag, TypeTransformer};
use url::Url;

/// Cost of a path/URL rewrite (no I/O involved).
pub const PATH_URL_COST: u32 = 5;

fn expect<'a, T: 'static>(value: &'a AnyValue) -> Result<&'a T> {
    value.downcast_ref::<T>().ok_or(Error::TypeMismatch {
        expected: TypeTag::of::<T>(),
        actual: value.tag(),
    })
}

/// `PathBuf` -> `file://` `Url`. Relative paths are absolutized first.
pub struct PathToUrl;

impl TypeTransformer for PathToUrl {
    fn source_type(&self) -> TypeTag {
        TypeTag::of::<PathBuf>()
    }

    fn target_type(&self) -> TypeTag {
        TypeTag::of::<Url>()
    }

    fn transformation_cost(&self, _parameters: &Parameters) -> u32 {
        PATH_URL_COST
    }

    fn transform(&self, value: &AnyValue, _parameters: &Parameters) -> Result<AnyValue> {
        let path = expect::<PathBuf>(value)?;
        let absolute = std::path::absolute(path)?;
        let url = Url::from_file_path(&absolute).map_err(|_| {
            Error::transformation(
                format!("path {} cannot be expressed as a file URL", absolute.display()),
                self.target_type(),
            )
        })?;
        Ok(AnyValue::new(url))
    }
}

/// `file://` `Url` -> `PathBuf`.
pub struct UrlToPath;

impl TypeTransformer for UrlToPath {
    fn source_type(&self) -> TypeTag {
        TypeTag::of::<Url>()
    }

    fn target_type(&self) -> TypeTag {
        TypeTag::of::<PathBuf>()
    }

    fn transformation_cost(&self, _parameters: &Parameters) -> u32 {
        PATH_URL_COST
    }

    fn transform(&self, value: &AnyValue, _parameters: &Parameters) -> Result<AnyValue> {
        let url = expect::<Url>(value)?;
        let path = url.to_file_path().map_err(|_| {
            Error::transformation(
                format!("URL {} does not denote a local file", url),
                self.target_type(),
            )
        })?;
        Ok(AnyValue::new(path))
    }
}

/// `file://` `Url` -> `Parameters`, by reading a JSON object from the file.
pub struct UrlToParameters;

impl TypeTransformer for UrlToParameters {
    fn source_type(&self) -> TypeTag {
        TypeTag::of::<Url>()
    }

    fn target_type(&self) -> TypeTag {
        TypeTag::of::<Parameters>()
    }

    fn transform(&self, value: &AnyValue, _parameters: &Parameters) -> Result<AnyValue> {
        let url = expect::<Url>(value)?;
        let path = url.to_file_path().map_err(|_| {
            Error::transformation(
                format!("URL {} does not denote a local file", url),
                self.target_type(),
            )
        })?;
        let text = std::fs::read_to_string(&path)?;
        let entries: HashMap<String, Value> = serde_json::from_str(&text)?;
        Ok(AnyValue::new(Parameters::from(entries)))
    }
}

/// `Parameters` -> `file://` `Url`, by writing a JSON file into the
/// system temp directory. Each call produces a fresh file.
pub struct ParametersToUrl;

static FILE_SEQUENCE: AtomicU64 = AtomicU64::new(0);

impl TypeTransformer for ParametersToUrl {
    fn source_type(&self) -> TypeTag {
        TypeTag::of::<Parameters>()
    }

    fn target_type(&self) -> TypeTag {
        TypeTag::of::<Url>()
    }

    fn transform(&self, value: &AnyValue, _parameters: &Parameters) -> Result<AnyValue> {
        let parameters = expect::<Parameters>(value)?;
        let file_name = format!(
            "typeroute-params-{}-{}.json",
            std::process::id(),
            FILE_SEQUENCE.fetch_add(1, Ordering::Relaxed)
        );
        let path = std::env::temp_dir().join(file_name);
        let text = serde_json::to_string_pretty(parameters)?;
        std::fs::write(&path, text)?;
        let url = Url::from_file_path(&path).map_err(|_| {
            Error::transformation(
                format!("temp path {} cannot be expressed as a file URL", path.display()),
                self.target_type(),
            )
        })?;
        log::debug!("wrote parameter bag to {}", url);
        Ok(AnyValue::new(url))
    }
}
