//! Runs the addcurl binary on gridded tables in a temporary directory.

use std::fs;
use std::process::Command;

fn addcurl() -> Command {
  return Command::new(env!("CARGO_BIN_EXE_addcurl"));
}

/// A 4x4x1 grid of unit size holding a constant vector field.
fn constant_field() -> String {
  let mut s = String::from("1\theader\nip.x\tip.y\tip.z\t1_v\t2_v\t3_v\n");
  for y in 0..4 {
    for x in 0..4 {
      let c = |i: usize| (i as f64 + 0.5) / 4.0;
      s.push_str(&format!("{}\t{}\t0.5\t1\t2\t3\n", c(x), c(y)));
    }
  }
  return s;
}

#[test]
fn curl_of_constant_field_vanishes() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("grid.txt");
  fs::write(&path, constant_field()).unwrap();
  let status = addcurl()
    .args(["-v", "v"])
    .arg(&path)
    .status()
    .unwrap();
  assert!(status.success());
  let text = fs::read_to_string(&path).unwrap();
  let mut lines = text.lines().skip(2);
  assert_eq!(
    lines.next().unwrap(),
    "ip.x\tip.y\tip.z\t1_v\t2_v\t3_v\t1_curlFFT(v)\t2_curlFFT(v)\t3_curlFFT(v)"
  );
  let mut rows = 0;
  for line in lines {
    let fields = line.split('\t').collect::<Vec<_>>();
    assert_eq!(fields.len(), 9);
    for f in fields[6..].iter() {
      assert!(f.parse::<f64>().unwrap().abs() < 1e-12);
    }
    rows += 1;
  }
  assert_eq!(rows, 16);
}

#[test]
fn table_without_coordinates_is_skipped() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("grid.txt");
  let table = constant_field().replace("ip.", "pos.");
  fs::write(&path, &table).unwrap();
  let status = addcurl()
    .args(["-v", "v"])
    .arg(&path)
    .status()
    .unwrap();
  assert!(status.success());
  assert_eq!(fs::read_to_string(&path).unwrap(), table);
  // other coordinates can be asked for
  let status = addcurl()
    .args(["-c", "pos", "-v", "v"])
    .arg(&path)
    .status()
    .unwrap();
  assert!(status.success());
  assert!(fs::read_to_string(&path).unwrap().contains("3_curlFFT(v)"));
}
