//! Layered configuration loading
//!
//! A profile `name` is described by up to three files in one directory,
//! applied in this order:
//!
//! 1. `<name>.conf` - base layer
//! 2. `<name>.<hostname>.conf` - host-specific layer
//! 3. `<name>.local.conf` - local override (never sufficient on its own)
//!
//! Each present layer is deep-merged over the caller's defaults, later
//! layers winning. See [`merge_value`] for the per-key rules.

use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::defaults::{CONFIG_EXTENSION, LOCAL_LAYER};
use crate::core::layer_format;
use crate::error::ConfigError;

/// Read access to layer files
pub trait LayerSource {
    /// Whether a layer file is present
    fn exists(&self, path: &Path) -> bool;

    /// Read the raw bytes of a layer file
    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// Resolves the machine name used for the host-specific layer
pub trait HostnameProvider {
    /// Local network name of this machine
    fn hostname(&self) -> String;
}

/// Layers read straight from the filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLayerSource;

impl LayerSource for FsLayerSource {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_all(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}

/// Hostname as reported by the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemHostname;

impl HostnameProvider for SystemHostname {
    fn hostname(&self) -> String {
        gethostname::gethostname().to_string_lossy().into_owned()
    }
}

/// A fixed hostname, useful for tests and for previewing another machine
impl HostnameProvider for String {
    fn hostname(&self) -> String {
        self.clone()
    }
}

/// Candidate files for one profile, in merge order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerPaths {
    /// `<name>.conf`
    pub base: PathBuf,
    /// `<name>.<hostname>.conf`
    pub host: PathBuf,
    /// `<name>.local.conf`
    pub local: PathBuf,
}

impl LayerPaths {
    /// Layers in the order they are merged
    pub fn in_order(&self) -> [&Path; 3] {
        [&self.base, &self.host, &self.local]
    }
}

/// Loads and merges the layers of a named profile
#[derive(Debug, Clone)]
pub struct ConfigMerger<S = FsLayerSource, H = SystemHostname> {
    dir: PathBuf,
    source: S,
    hostname: H,
}

impl ConfigMerger {
    /// Merger reading layers from `dir` on disk, using the system hostname
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_parts(dir, FsLayerSource, SystemHostname)
    }
}

impl<S: LayerSource, H: HostnameProvider> ConfigMerger<S, H> {
    /// Merger with explicit collaborators
    pub fn with_parts(dir: impl Into<PathBuf>, source: S, hostname: H) -> Self {
        Self {
            dir: dir.into(),
            source,
            hostname,
        }
    }

    /// Directory the layers are resolved against
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Resolve the three candidate layer files for `name`
    pub fn layer_paths(&self, name: &str) -> LayerPaths {
        let host = self.hostname.hostname();
        LayerPaths {
            base: self.dir.join(format!("{name}.{CONFIG_EXTENSION}")),
            host: self.dir.join(format!("{name}.{host}.{CONFIG_EXTENSION}")),
            local: self
                .dir
                .join(format!("{name}.{LOCAL_LAYER}.{CONFIG_EXTENSION}")),
        }
    }

    /// Load the effective configuration for `name`
    ///
    /// When neither the base nor the host layer exists this is a soft
    /// failure: a diagnostic is logged and `defaults` is returned untouched
    /// (`None` stays `None`). Otherwise the present layers are merged over
    /// `defaults`, or over an empty mapping when none were given.
    ///
    /// # Errors
    ///
    /// Fails when a present layer cannot be read, does not parse, or is not
    /// a mapping. Nothing is merged in that case.
    pub fn load(&self, name: &str, defaults: Option<Value>) -> Result<Option<Value>, ConfigError> {
        let Some(layers) = self.read_layers(name)? else {
            return Ok(defaults);
        };

        let mut effective = defaults.unwrap_or_else(|| Value::Object(Map::new()));
        for layer in &layers {
            merge_value(&mut effective, layer);
        }

        Ok(Some(effective))
    }

    /// Load the effective configuration into a typed struct
    ///
    /// `defaults` plays the same role as in [`ConfigMerger::load`] and is
    /// returned as-is on soft failure.
    pub fn load_as<T>(&self, name: &str, defaults: T) -> Result<T, ConfigError>
    where
        T: Serialize + DeserializeOwned,
    {
        let Some(layers) = self.read_layers(name)? else {
            return Ok(defaults);
        };

        let convert = |e: serde_json::Error| ConfigError::Convert {
            name: name.to_string(),
            error: e.to_string(),
        };

        let mut effective = serde_json::to_value(&defaults).map_err(convert)?;
        for layer in &layers {
            merge_value(&mut effective, layer);
        }

        serde_json::from_value(effective).map_err(convert)
    }

    /// Read and parse every present, non-empty layer
    ///
    /// Returns `None` for the soft-failure case.
    fn read_layers(&self, name: &str) -> Result<Option<Vec<Value>>, ConfigError> {
        let paths = self.layer_paths(name);

        if !self.source.exists(&paths.base) && !self.source.exists(&paths.host) {
            tracing::error!("Unable to read config file: {}", paths.base.display());
            return Ok(None);
        }

        let mut layers = Vec::with_capacity(3);
        for path in paths.in_order() {
            if !self.source.exists(path) {
                continue;
            }

            let raw = self.source.read_all(path).map_err(|e| ConfigError::Read {
                path: path.to_path_buf(),
                error: e.to_string(),
            })?;

            if raw.is_empty() {
                tracing::debug!("Skipping empty config layer {}", path.display());
                continue;
            }

            tracing::debug!("Applying config layer {}", path.display());
            layers.push(parse_layer(path, &raw)?);
        }

        Ok(Some(layers))
    }
}

fn parse_layer(path: &Path, raw: &[u8]) -> Result<Value, ConfigError> {
    let text = std::str::from_utf8(raw).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    let value = layer_format::parse(text).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    if !value.is_object() {
        return Err(ConfigError::NotAMapping {
            path: path.to_path_buf(),
        });
    }

    Ok(value)
}

/// Deep-merge `src` into `dst`
///
/// Rules, applied per key:
/// - a sequence replaces the destination outright; it is rebuilt from the
///   source elements and never combined with earlier sequence content
/// - a mapping merges key by key; a destination that is absent or not a
///   mapping is reset to an empty mapping first
/// - a scalar (including `null`) overwrites the destination
pub fn merge_value(dst: &mut Value, src: &Value) {
    match src {
        Value::Object(entries) => {
            if !dst.is_object() {
                *dst = Value::Object(Map::new());
            }
            if let Value::Object(target) = dst {
                for (key, value) in entries {
                    let slot = target.entry(key.clone()).or_insert(Value::Null);
                    merge_value(slot, value);
                }
            }
        }
        Value::Array(items) => {
            let mut rebuilt = Vec::with_capacity(items.len());
            for item in items {
                let mut element = Value::Null;
                merge_value(&mut element, item);
                rebuilt.push(element);
            }
            *dst = Value::Array(rebuilt);
        }
        scalar => *dst = scalar.clone(),
    }
}
