use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{Link, SetupConfig, Variant};
use crate::steps::*;

const SETUP: &str = r#"
basedir = "code"
bindir = "bin"

[[variants]]
parent = "solver_marc.f90"
placeholder = "%%MARCVERSION%%"
versions = ["2007r1", "2010"]

[paths]
FFTWPATH = "/opt/fftw"
ACMLROOT = "/opt/acml"

[[links]]
files = ["solver_spectral.exe"]
"#;

fn config_in(dir: &Path) -> SetupConfig {
  let mut config = SetupConfig::parse(SETUP).unwrap();
  config.basedir = dir.join("code");
  config.bindir = dir.join("bin");
  return config;
}

#[test]
fn test_parse_setup() {
  let config = SetupConfig::parse(SETUP).unwrap();
  assert_eq!(config.basedir, PathBuf::from("code"));
  assert_eq!(config.variants, vec![Variant {
    parent: "solver_marc.f90".to_owned(),
    placeholder: "%%MARCVERSION%%".to_owned(),
    versions: vec!["2007r1".to_owned(), "2010".to_owned()],
  }]);
  assert_eq!(config.paths.len(), 2);
  assert_eq!(config.links, vec![Link {
    dir: String::new(),
    files: vec!["solver_spectral.exe".to_owned()],
  }]);
  assert!(SetupConfig::parse("basedir = 3").is_err());
  let bare = SetupConfig::parse("basedir = \"a\"\nbindir = \"b\"").unwrap();
  assert!(bare.variants.is_empty() && bare.paths.is_empty() && bare.links.is_empty());
}

#[test]
fn test_from_file_is_relative_to_it() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("setup.toml");
  fs::write(&path, SETUP).unwrap();
  let config = SetupConfig::from_file(&path).unwrap();
  assert_eq!(config.basedir, dir.path().join("code"));
  assert_eq!(config.makefile(), dir.path().join("code").join("makefile"));
  assert!(SetupConfig::from_file(&dir.path().join("nope.toml")).is_err());
}

#[test]
fn test_variant_path() {
  assert_eq!(
    variant_path(Path::new("code/solver_marc.f90"), "2010"),
    PathBuf::from("code/solver_marc2010.f90")
  );
  assert_eq!(variant_path(Path::new("Makefile"), "2"), PathBuf::from("Makefile2"));
}

#[test]
fn test_write_variants() {
  let dir = tempfile::tempdir().unwrap();
  let mut config = config_in(dir.path());
  fs::create_dir_all(&config.basedir).unwrap();
  fs::write(
    config.basedir.join("solver_marc.f90"),
    "! for Marc %%MARCVERSION%%\ninclude 'marc%%MARCVERSION%%.f90'\n",
  ).unwrap();
  // a variant whose template is missing is skipped
  config.variants.push(Variant {
    parent: "gone.f90".to_owned(),
    placeholder: "X".to_owned(),
    versions: vec!["1".to_owned()],
  });
  let written = write_variants(&config).unwrap();
  assert_eq!(written.len(), 2);
  assert_eq!(
    fs::read_to_string(config.basedir.join("solver_marc2007r1.f90")).unwrap(),
    "! for Marc 2007r1\ninclude 'marc2007r1.f90'\n"
  );
  assert!(config.basedir.join("solver_marc2010.f90").is_file());
  assert!(!config.basedir.join("gone1.f90").exists());
}

#[test]
fn test_set_make_variables() {
  let paths = [("FFTWPATH", "/opt/fftw"), ("ACMLROOT", "/opt/acml")]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect::<BTreeMap<_, _>>();
  let makefile = "FFTWPATH = /usr\nCOMPILER = ifort\nACMLROOT=\nall: spectral\n";
  let (text, changed) = set_make_variables(makefile, &paths);
  assert_eq!(changed, 2);
  assert_eq!(
    text,
    "FFTWPATH =/opt/fftw\nCOMPILER = ifort\nACMLROOT =/opt/acml\nall: spectral\n"
  );
  // a last line without a newline is kept as is
  let (text, changed) = set_make_variables("all:", &paths);
  assert_eq!((text.as_str(), changed), ("all:", 0));
}

#[test]
fn test_rewrite_makefile() {
  let dir = tempfile::tempdir().unwrap();
  let config = config_in(dir.path());
  assert!(rewrite_makefile(&config).is_err());
  fs::create_dir_all(&config.basedir).unwrap();
  fs::write(config.makefile(), "FFTWPATH = \n").unwrap();
  assert_eq!(rewrite_makefile(&config).unwrap(), 1);
  assert_eq!(fs::read_to_string(config.makefile()).unwrap(), "FFTWPATH =/opt/fftw\n");
}

#[test]
fn test_link_path() {
  let bin = Path::new("/bin");
  assert_eq!(link_path(bin, "", "solver.exe"), PathBuf::from("/bin/solver"));
  assert_eq!(link_path(bin, "tools", ""), PathBuf::from("/bin/tools"));
}

#[cfg(unix)]
#[test]
fn test_link_binaries() {
  let dir = tempfile::tempdir().unwrap();
  let config = config_in(dir.path());
  fs::create_dir_all(&config.basedir).unwrap();
  let exe = config.basedir.join("solver_spectral.exe");
  fs::write(&exe, "binary").unwrap();
  // links are replaced, so doing it twice is fine
  for _ in 0..2 {
    let made = link_binaries(&config).unwrap();
    assert_eq!(made.len(), 1);
  }
  let link = config.bindir.join("solver_spectral");
  assert_eq!(fs::read_link(&link).unwrap(), exe);
  assert_eq!(fs::read_to_string(&link).unwrap(), "binary");
}
