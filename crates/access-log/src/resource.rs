//! Configuration resource lookup.
//!
//! Locations accept two scheme prefixes:
//!
//! - `classpath:name`: a resource embedded in the process, registered on the
//!   loader. The built-in fallback configuration is always registered.
//! - `file:path` or a bare path: a file on disk, relative paths resolved
//!   against the loader's base directory.

use crate::constants::{FALLBACK_CONFIG, FALLBACK_CONFIG_CONTENT};
use crate::error::ConfigError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const CLASSPATH_PREFIX: &str = "classpath:";
const FILE_PREFIX: &str = "file:";

/// Parsed form of a resource location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceLocation<'a> {
    /// Embedded resource name, without the scheme or a leading `/`
    Classpath(&'a str),
    /// Filesystem path
    File(&'a Path),
}

impl<'a> ResourceLocation<'a> {
    /// Parses a location string.
    pub fn parse(location: &'a str) -> Self {
        if let Some(name) = location.strip_prefix(CLASSPATH_PREFIX) {
            Self::Classpath(name.trim_start_matches('/'))
        } else {
            Self::File(Path::new(
                location.strip_prefix(FILE_PREFIX).unwrap_or(location),
            ))
        }
    }
}

/// Resolves configuration locations to their content.
pub trait ResourceLoader: Send + Sync {
    /// Returns true if a resource exists at the location.
    fn exists(&self, location: &str) -> bool;

    /// Reads the resource at the location.
    fn load(&self, location: &str) -> Result<String, ConfigError>;
}

/// Loader for embedded (`classpath:`) and filesystem resources.
#[derive(Debug, Clone)]
pub struct DefaultResourceLoader {
    embedded: HashMap<String, String>,
    base_dir: Option<PathBuf>,
}

impl Default for DefaultResourceLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DefaultResourceLoader {
    /// Creates a loader with only the built-in fallback registered.
    pub fn new() -> Self {
        let mut embedded = HashMap::new();
        if let ResourceLocation::Classpath(name) = ResourceLocation::parse(FALLBACK_CONFIG) {
            embedded.insert(name.to_string(), FALLBACK_CONFIG_CONTENT.to_string());
        }
        Self {
            embedded,
            base_dir: None,
        }
    }

    /// Registers an embedded resource under `name` (without `classpath:`).
    pub fn with_resource(mut self, name: impl Into<String>, content: impl Into<String>) -> Self {
        let name = name.into();
        let name = name.trim_start_matches('/').to_string();
        self.embedded.insert(name, content.into());
        self
    }

    /// Removes an embedded resource, including the built-in fallback.
    pub fn without_resource(mut self, name: &str) -> Self {
        self.embedded.remove(name.trim_start_matches('/'));
        self
    }

    /// Resolves relative file paths against `dir` instead of the working
    /// directory.
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    fn file_path(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl ResourceLoader for DefaultResourceLoader {
    fn exists(&self, location: &str) -> bool {
        match ResourceLocation::parse(location) {
            ResourceLocation::Classpath(name) => self.embedded.contains_key(name),
            ResourceLocation::File(path) => self.file_path(path).is_file(),
        }
    }

    fn load(&self, location: &str) -> Result<String, ConfigError> {
        match ResourceLocation::parse(location) {
            ResourceLocation::Classpath(name) => {
                self.embedded
                    .get(name)
                    .cloned()
                    .ok_or_else(|| ConfigError::ResourceNotFound {
                        location: location.to_string(),
                    })
            }
            ResourceLocation::File(path) => {
                let path = self.file_path(path);
                std::fs::read_to_string(&path).map_err(|source| {
                    if source.kind() == std::io::ErrorKind::NotFound {
                        ConfigError::ResourceNotFound {
                            location: location.to_string(),
                        }
                    } else {
                        ConfigError::Io {
                            location: location.to_string(),
                            source,
                        }
                    }
                })
            }
        }
    }
}
