//! Helpers shared by the integration tests.

use camino::{Utf8Path, Utf8PathBuf};
use sqlmetrics_lib::Host;
use std::fs;

/// Test host that captures output to in-memory buffers.
pub struct TestHost {
    pub output_buf: Vec<u8>,
    pub error_buf: Vec<u8>,
    pub exit_code: Option<i32>,
}

impl TestHost {
    pub const fn new() -> Self {
        Self {
            output_buf: Vec::new(),
            error_buf: Vec::new(),
            exit_code: None,
        }
    }

    pub fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output_buf).into_owned()
    }

    pub fn error_str(&self) -> String {
        String::from_utf8_lossy(&self.error_buf).into_owned()
    }
}

impl Host for TestHost {
    fn output(&mut self) -> impl std::io::Write {
        &mut self.output_buf
    }

    fn error(&mut self) -> impl std::io::Write {
        &mut self.error_buf
    }

    fn exit(&mut self, code: i32) {
        self.exit_code = Some(code);
    }
}

/// Copies the `shop` fixture project into a fresh temporary directory.
pub fn shop_project() -> (tempfile::TempDir, Utf8PathBuf) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let root = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).expect("temp dir should be UTF-8");
    let fixture = Utf8Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/shop");

    for sub_dir in ["data", "metrics"] {
        fs::create_dir(root.join(sub_dir)).expect("create project directory");
        for entry in fs::read_dir(fixture.join(sub_dir)).expect("read fixture directory") {
            let entry = entry.expect("read fixture entry");
            let _ = fs::copy(entry.path(), root.join(sub_dir).as_std_path().join(entry.file_name())).expect("copy fixture file");
        }
    }

    (temp_dir, root)
}

/// Writes a metric definition document into the project's metrics directory.
pub fn write_metric(root: &Utf8Path, file_name: &str, metric_name: &str, sql: &str) {
    let text = format!("metric_name: {metric_name}\ndescription: test metric\nowner: tests\nschedule: daily\nsql: {sql}\n");
    fs::write(root.join("metrics").join(file_name), text).expect("write metric definition");
}
