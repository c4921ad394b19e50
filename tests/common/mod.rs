#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;

use losses_dashboard::losses::{Dataset, load_dataset};
use tempfile::TempDir;

/// Three rows, each with the three leading loss columns (losses_total, destroyed, captured).
pub const THREE_ROWS: &str = "\
,equipment,model,manufacturer,losses_total,destroyed,captured,lost_by
0,tank,ModelX,Manuf-A,2,2,0,russia
1,tank,ModelY,Manuf-B,1,0,1,ukraine
2,helicopter,ModelZ,Manuf-A,1,1,,russia
";

pub struct Fixture {
    pub dir: TempDir,
    pub path: PathBuf,
}

pub fn write_csv(name: &str, contents: &str) -> Fixture {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("create fixture");
    file.write_all(contents.as_bytes()).expect("write fixture");
    Fixture { dir, path }
}

pub fn load(contents: &str) -> Dataset {
    let fixture = write_csv("all_losses.csv", contents);
    load_dataset(&fixture.path).expect("fixture loads")
}

pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}
