//! Contains the error type for setup runs.

use std::error::Error;
use std::fmt::Display;
use std::io;
use std::path::PathBuf;

/// Errors when setting up the code.
#[derive(Debug)]
pub(crate) enum SetupError {
  /// A file couldn't be read or written.
  Io {
    /// The file in question.
    path: PathBuf,
    /// What went wrong.
    source: io::Error,
  },
  /// The setup file is malformed.
  Config(toml::de::Error),
  /// `make` couldn't be started.
  Spawn(subprocess::PopenError),
  /// `make` ran but failed.
  Make {
    /// The arguments it was given.
    args: Vec<String>,
    /// How it exited.
    status: subprocess::ExitStatus,
  },
}

impl SetupError {
  /// Wraps an I/O error with the path it happened on.
  pub(crate) fn io<P: Into<PathBuf>>(path: P) -> impl FnOnce(io::Error) -> Self {
    let path = path.into();
    return move |source| Self::Io { path, source };
  }
}

impl Display for SetupError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    return match self {
      Self::Io { path, source } => write!(f, "{}: {}", path.display(), source),
      Self::Config(e) => write!(f, "bad setup file: {}", e),
      Self::Spawn(e) => write!(f, "could not run make: {}", e),
      Self::Make { args, status } => {
        write!(f, "make {} failed ({:?})", args.join(" "), status)
      },
    };
  }
}

impl Error for SetupError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    return match self {
      Self::Io { source, .. } => Some(source),
      Self::Config(e) => Some(e),
      Self::Spawn(e) => Some(e),
      Self::Make { .. } => None,
    };
  }
}

impl From<toml::de::Error> for SetupError {
  fn from(e: toml::de::Error) -> Self {
    return Self::Config(e);
  }
}

impl From<subprocess::PopenError> for SetupError {
  fn from(e: subprocess::PopenError) -> Self {
    return Self::Spawn(e);
  }
}
