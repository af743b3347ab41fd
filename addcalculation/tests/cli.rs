//! Runs the addcalculation binary on tables in a temporary directory.

use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

const TABLE: &str = "1\theader\n1_ip\t2_ip\n3\t4\n6\t8\n";

fn addcalculation() -> Command {
  return Command::new(env!("CARGO_BIN_EXE_addcalculation"));
}

#[test]
fn adds_column_in_place() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("table.txt");
  fs::write(&path, TABLE).unwrap();
  let status = addcalculation()
    .args(["-l", "dist", "-f", "math.sqrt(#1_ip#**2+#2_ip#**2)"])
    .arg(&path)
    .status()
    .unwrap();
  assert!(status.success());
  let text = fs::read_to_string(&path).unwrap();
  let lines = text.lines().collect::<Vec<_>>();
  assert_eq!(lines[0], "2\theader");
  assert!(lines[1].starts_with("addcalculation "));
  assert_eq!(&lines[2..], ["1_ip\t2_ip\tdist", "3\t4\t5.0", "6\t8\t10.0"]);
  // only the table itself is left in the directory
  assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn mismatched_labels_touch_nothing() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("table.txt");
  fs::write(&path, TABLE).unwrap();
  let status = addcalculation()
    .args(["-l", "a,b", "-f", "#0#"])
    .arg(&path)
    .status()
    .unwrap();
  assert_eq!(status.code(), Some(2));
  assert_eq!(fs::read_to_string(&path).unwrap(), TABLE);
}

#[test]
fn failed_file_is_left_alone() {
  let dir = tempfile::tempdir().unwrap();
  let good = dir.path().join("good.txt");
  let bad = dir.path().join("bad.txt");
  let bad_table = "1\theader\n1_ip\t2_ip\n3\t4\noops\t8\n";
  fs::write(&good, TABLE).unwrap();
  fs::write(&bad, bad_table).unwrap();
  let status = addcalculation()
    .args(["-l", "twice", "-f", "2*#1_ip#"])
    .arg(&bad)
    .arg(&good)
    .arg(dir.path().join("missing.txt"))
    .status()
    .unwrap();
  assert_eq!(status.code(), Some(1));
  assert_eq!(fs::read_to_string(&bad).unwrap(), bad_table);
  assert!(fs::read_to_string(&good).unwrap().ends_with("3\t4\t6.0\n6\t8\t12.0\n"));
  assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn filters_standard_input() {
  let mut child = addcalculation()
    .args(["-l", "n", "-f", "#_row_#"])
    .stdin(Stdio::piped())
    .stdout(Stdio::piped())
    .stderr(Stdio::null())
    .spawn()
    .unwrap();
  child.stdin.take().unwrap().write_all(TABLE.as_bytes()).unwrap();
  let output = child.wait_with_output().unwrap();
  assert!(output.status.success());
  let text = String::from_utf8(output.stdout).unwrap();
  assert!(text.starts_with("2\theader\naddcalculation "));
  assert!(text.ends_with("1_ip\t2_ip\tn\n3\t4\t1.0\n6\t8\t2.0\n"));
}

#[test]
fn formula_may_start_with_minus() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("table.txt");
  fs::write(&path, TABLE).unwrap();
  let status = addcalculation()
    .args(["-l", "neg", "-f", "-#1_ip#"])
    .arg(&path)
    .status()
    .unwrap();
  assert!(status.success());
  let text = fs::read_to_string(&path).unwrap();
  assert!(text.ends_with("1_ip\t2_ip\tneg\n3\t4\t-3.0\n6\t8\t-6.0\n"));
}
