//! Project configuration management for `pages.toml`.
//!
//! # Sections
//!
//! | Section        | Purpose                                        |
//! |----------------|------------------------------------------------|
//! | `[pagination]` | Page size, item directory, template document   |
//! | `[build]`      | Content and output directories                 |
//!
//! # Example
//!
//! ```toml
//! [pagination]
//! pages_per_page = 6
//! item_directory = "blog/"
//! template = "blog.md"
//!
//! [build]
//! content = "content"
//! output = "public"
//! ```
//!
//! The file is optional; every field has a default.

mod build;
pub mod defaults;
mod error;
mod pagination;

pub use build::BuildConfig;
pub use error::ConfigError;
pub use pagination::PaginationConfig;

use crate::cli::{Cli, Commands, PaginationArgs};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing pages.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct PagesConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Pagination settings
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,
}

impl PagesConfig {
    /// Parse configuration from TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: PagesConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let mut config = Self::from_str(&content)?;
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = cli
            .root
            .as_ref()
            .cloned()
            .unwrap_or_else(|| self.get_root().to_owned());

        Self::update_option(&mut self.build.content, cli.content.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());
        self.update_path_with_root(&root, &cli.config);

        match &cli.command {
            Commands::Build { pagination, .. } | Commands::Check { pagination } => {
                self.update_pagination(pagination);
            }
        }
    }

    fn update_pagination(&mut self, args: &PaginationArgs) {
        let pagination = &mut self.pagination;
        Self::update_option(&mut pagination.pages_per_page, args.per_page.as_ref());
        Self::update_option(&mut pagination.item_directory, args.dir.as_ref());
        Self::update_option(&mut pagination.template, args.template.as_ref());
        Self::update_option(&mut pagination.descriptor, args.descriptor.as_ref());
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Update all paths relative to root directory and normalize to absolute paths
    fn update_path_with_root(&mut self, root: &Path, config: &Path) {
        let root = Self::normalize_path(&Self::expand_tilde(root));
        self.set_root(&root);

        self.config_path = Self::normalize_path(&root.join(config));
        self.build.content = Self::normalize_path(&root.join(Self::expand_tilde(&self.build.content)));
        self.build.output = Self::normalize_path(&root.join(Self::expand_tilde(&self.build.output)));
    }

    /// Expand a leading `~` to the home directory
    fn expand_tilde(path: &Path) -> PathBuf {
        match path.to_str() {
            Some(s) => PathBuf::from(shellexpand::tilde(s).into_owned()),
            None => path.to_path_buf(),
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration before a run
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pagination.page_size()?;

        if !self.build.content.is_dir() {
            return Err(ConfigError::Validation(format!(
                "[build.content] `{}` is not a directory",
                self.build.content.display()
            )));
        }

        if self.build.content == self.build.output {
            return Err(ConfigError::Validation(
                "[build.output] must differ from [build.content]".into(),
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
