//! CLI command implementations and shared file loading.

pub mod catalog;
pub mod checkout;

use std::path::{Path, PathBuf};

use florist_core::{
    Catalog, CatalogError, CheckoutError, CheckoutForm, Field, InvalidOption, Product, ProductId,
};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// File could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// File extension is not one we know how to parse.
    #[error("Unsupported file type: {0} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),

    /// JSON payload could not be parsed.
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// YAML payload could not be parsed.
    #[error("Invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// Catalog records are inconsistent.
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),

    /// A choice field got a value outside its options.
    #[error(transparent)]
    InvalidOption(#[from] InvalidOption),

    /// Product ID is not in the catalog.
    #[error("Unknown product: {0}")]
    UnknownProduct(ProductId),

    /// Form has validation errors.
    #[error("{0} validation errors found")]
    InvalidForm(usize),

    /// Checkout flow refused the order.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
}

/// Checkout form sources: an optional file, then field edits.
#[derive(Debug, Default)]
pub struct FormArgs {
    pub form: Option<PathBuf>,
    pub fields: Vec<(Field, String)>,
}

impl FormArgs {
    /// Build the form: read the file if given, then apply each edit in order.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded or an edit names an
    /// invalid option.
    pub fn build(&self) -> Result<CheckoutForm, CliError> {
        let mut form = match &self.form {
            Some(path) => load_file::<CheckoutForm>(path)?,
            None => CheckoutForm::default(),
        };

        for (field, value) in &self.fields {
            form.set_field(*field, value.as_str())?;
        }

        Ok(form)
    }
}

/// Load a catalog file, or the built-in catalog when no path is given.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or the records are
/// not a valid catalog.
pub fn load_catalog(path: Option<&Path>) -> Result<Catalog, CliError> {
    let Some(path) = path else {
        return Ok(Catalog::builtin());
    };

    let products = load_file::<Vec<Product>>(path)?;
    Ok(Catalog::new(products)?)
}

/// Read and deserialize a JSON or YAML file, chosen by extension.
fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let format = Format::of(path)?;

    let content = std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_owned(),
        source,
    })?;

    format.parse(path, &content)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Yaml,
}

impl Format {
    fn of(path: &Path) -> Result<Self, CliError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(CliError::UnsupportedFormat(path.to_owned())),
        }
    }

    fn parse<T: DeserializeOwned>(self, path: &Path, content: &str) -> Result<T, CliError> {
        match self {
            Self::Json => serde_json::from_str(content).map_err(|source| CliError::Json {
                path: path.to_owned(),
                source,
            }),
            Self::Yaml => serde_yaml::from_str(content).map_err(|source| CliError::Yaml {
                path: path.to_owned(),
                source,
            }),
        }
    }
}
