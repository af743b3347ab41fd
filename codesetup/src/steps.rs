//! The steps of a setup run, in the order they're done.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use subprocess::Exec;

use crate::config::SetupConfig;
use crate::errors::SetupError;

/// Name of a version-specific copy of a file: the version goes between the
/// stem and the extension.
pub(crate) fn variant_path(parent: &Path, version: &str) -> PathBuf {
  let stem = parent.file_stem().unwrap_or_default().to_string_lossy();
  let name = match parent.extension() {
    Some(ext) => format!("{}{}.{}", stem, version, ext.to_string_lossy()),
    None => format!("{}{}", stem, version),
  };
  return parent.with_file_name(name);
}

/// Writes every version of every variant. Templates that can't be read are
/// reported and skipped. Returns the files written.
pub(crate) fn write_variants(config: &SetupConfig) -> Result<Vec<PathBuf>, SetupError> {
  let mut written = Vec::new();
  for variant in config.variants.iter() {
    let parent = config.basedir.join(&variant.parent);
    let contents = match fs::read_to_string(&parent) {
      Ok(c) => c,
      Err(e) => {
        warn!("unable to open {}: {}", parent.display(), e);
        continue;
      },
    };
    for version in variant.versions.iter() {
      let child = variant_path(&parent, version);
      let text = contents.replace(&variant.placeholder, version);
      fs::write(&child, text).map_err(SetupError::io(&child))?;
      debug!("Wrote {}.", child.display());
      written.push(child);
    }
  }
  return Ok(written);
}

/// Sets makefile variables: every line starting with one of the keys is
/// replaced by `KEY =value`. Returns the new text and how many lines changed.
pub(crate) fn set_make_variables(
  makefile: &str,
  paths: &BTreeMap<String, String>,
) -> (String, usize) {
  let mut out = String::with_capacity(makefile.len());
  let mut changed = 0;
  for line in makefile.split_inclusive('\n') {
    match paths.iter().find(|(k, _)| line.starts_with(k.as_str())) {
      Some((key, value)) => {
        let new_line = format!("{} ={}", key, value);
        info!("{}", new_line);
        out.push_str(&new_line);
        out.push('\n');
        changed += 1;
      },
      None => out.push_str(line),
    }
  }
  return (out, changed);
}

/// Rewrites the makefile in the base directory with the configured paths.
pub(crate) fn rewrite_makefile(config: &SetupConfig) -> Result<usize, SetupError> {
  let path = config.makefile();
  let contents = fs::read_to_string(&path).map_err(SetupError::io(&path))?;
  let (text, changed) = set_make_variables(&contents, &config.paths);
  fs::write(&path, text).map_err(SetupError::io(&path))?;
  return Ok(changed);
}

/// Runs make in a directory.
pub(crate) fn make<S: AsRef<str>>(dir: &Path, args: &[S]) -> Result<(), SetupError> {
  let args = args.iter().map(|s| s.as_ref().to_owned()).collect::<Vec<_>>();
  info!("make --directory {} {}", dir.display(), args.join(" "));
  let status = Exec::cmd("make")
    .arg("--directory")
    .arg(dir)
    .args(&args)
    .join()?;
  if !status.success() {
    return Err(SetupError::Make { args, status });
  }
  return Ok(());
}

/// Cleans, then compiles with the given switches.
pub(crate) fn compile(config: &SetupConfig, switches: &str) -> Result<(), SetupError> {
  make(&config.basedir, &["clean"])?;
  let switches = switches.split_whitespace().collect::<Vec<_>>();
  return make(&config.basedir, &switches);
}

/// Creates a symbolic link.
#[cfg(unix)]
fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
  return std::os::unix::fs::symlink(src, dst);
}

/// Creates a symbolic link.
#[cfg(windows)]
fn symlink(src: &Path, dst: &Path) -> io::Result<()> {
  if src.is_dir() {
    return std::os::windows::fs::symlink_dir(src, dst);
  }
  return std::os::windows::fs::symlink_file(src, dst);
}

/// Where the link to a binary goes: named after the file without its
/// extension, or after the directory if no file is given.
pub(crate) fn link_path(bindir: &Path, dir: &str, file: &str) -> PathBuf {
  if file.is_empty() {
    return bindir.join(dir);
  }
  let stem = Path::new(file).file_stem().unwrap_or_default();
  return bindir.join(stem);
}

/// Links the binaries into the binary directory, replacing existing links.
/// Returns the links made and their targets.
pub(crate) fn link_binaries(
  config: &SetupConfig,
) -> Result<Vec<(PathBuf, PathBuf)>, SetupError> {
  let cwd = std::env::current_dir().map_err(SetupError::io("."))?;
  fs::create_dir_all(&config.bindir).map_err(SetupError::io(&config.bindir))?;
  let bindir = cwd.join(&config.bindir);
  let mut made = Vec::new();
  for link in config.links.iter() {
    for file in link.files.iter() {
      let src = cwd.join(&config.basedir).join(&link.dir).join(file);
      let dst = link_path(&bindir, &link.dir, file);
      info!("{} --> {}", dst.display(), src.display());
      if fs::symlink_metadata(&dst).is_ok() {
        fs::remove_file(&dst).map_err(SetupError::io(&dst))?;
      }
      symlink(&src, &dst).map_err(SetupError::io(&dst))?;
      made.push((dst, src));
    }
  }
  return Ok(made);
}
