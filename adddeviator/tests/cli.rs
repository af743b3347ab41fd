//! Runs the adddeviator binary on tables in a temporary directory.

use std::fs;
use std::process::Command;

const TABLE: &str = "1\theader\n\
  1_sigma\t2_sigma\t3_sigma\t4_sigma\t5_sigma\t6_sigma\t7_sigma\t8_sigma\t9_sigma\n\
  3\t0\t0\t0\t3\t0\t0\t0\t3\n";

fn adddeviator() -> Command {
  return Command::new(env!("CARGO_BIN_EXE_adddeviator"));
}

#[test]
fn adds_deviator_and_spherical_part() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("table.txt");
  fs::write(&path, TABLE).unwrap();
  let status = adddeviator()
    .args(["-t", "sigma,missing", "-s"])
    .arg(&path)
    .status()
    .unwrap();
  assert!(status.success());
  let text = fs::read_to_string(&path).unwrap();
  let lines = text.lines().collect::<Vec<_>>();
  let labels = lines[2].split('\t').collect::<Vec<_>>();
  assert_eq!(labels.len(), 19);
  assert_eq!(labels[9], "1_dev(sigma)");
  assert_eq!(labels[18], "sph(sigma)");
  let row = lines[3].split('\t').collect::<Vec<_>>();
  assert!(row[9..18].iter().all(|x| *x == "0.0"));
  assert_eq!(row[18], "3.0");
}

#[test]
fn no_tensors_is_a_usage_error() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("table.txt");
  fs::write(&path, TABLE).unwrap();
  let status = adddeviator().arg(&path).status().unwrap();
  assert_eq!(status.code(), Some(2));
  assert_eq!(fs::read_to_string(&path).unwrap(), TABLE);
}
