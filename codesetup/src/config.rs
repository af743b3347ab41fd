//! This module implements the setup file: a TOML file saying where the code
//! lives, which version-specific sources to generate, which makefile variables
//! to set and which binaries to link.
//!
//! ```toml
//! basedir = "code"
//! bindir = "bin"
//!
//! [[variants]]
//! parent = "solver_marc.f90"
//! placeholder = "%%MARCVERSION%%"
//! versions = ["2007r1", "2008r1", "2010"]
//!
//! [paths]
//! FFTWPATH = "/opt/fftw"
//!
//! [[links]]
//! dir = ""
//! files = ["solver_spectral.exe"]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::SetupError;

/// A template file that is copied once per version.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub(crate) struct Variant {
  /// The template, relative to the base directory.
  pub(crate) parent: String,
  /// The text replaced by the version in every copy.
  pub(crate) placeholder: String,
  /// The versions to write.
  pub(crate) versions: Vec<String>,
}

/// Binaries to link into the binary directory.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub(crate) struct Link {
  /// Directory under the base directory.
  #[serde(default)]
  pub(crate) dir: String,
  /// Files in that directory. An empty name links the directory itself.
  pub(crate) files: Vec<String>,
}

/// A setup file.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub(crate) struct SetupConfig {
  /// Where the sources and the makefile are.
  pub(crate) basedir: PathBuf,
  /// Where links to the binaries go.
  pub(crate) bindir: PathBuf,
  /// Version-specific sources to generate.
  #[serde(default, alias = "variant")]
  pub(crate) variants: Vec<Variant>,
  /// Makefile variables to set.
  #[serde(default)]
  pub(crate) paths: BTreeMap<String, String>,
  /// Binaries to link.
  #[serde(default, alias = "link")]
  pub(crate) links: Vec<Link>,
}

impl SetupConfig {
  /// Parses a setup file's contents.
  pub(crate) fn parse(contents: &str) -> Result<Self, SetupError> {
    return Ok(toml::from_str(contents)?);
  }

  /// Reads a setup file. Relative directories in it are taken relative to
  /// the file.
  pub(crate) fn from_file(path: &Path) -> Result<Self, SetupError> {
    let contents = std::fs::read_to_string(path).map_err(SetupError::io(path))?;
    let mut config = Self::parse(&contents)?;
    if let Some(parent) = path.parent() {
      config.basedir = parent.join(&config.basedir);
      config.bindir = parent.join(&config.bindir);
    }
    return Ok(config);
  }

  /// The makefile in the base directory.
  pub(crate) fn makefile(&self) -> PathBuf {
    return self.basedir.join("makefile");
  }
}
