// Copyright 2024 FastLabs Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs;

use logtree::Router;
use tempfile::TempDir;

#[test]
fn test_rotation_from_xml_file() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let log_dir = temp_dir.path().join("logs");
    let config = temp_dir.path().join("logs.xml");
    fs::write(
        &config,
        format!(
            r#"<?xml version="1.0" encoding="utf-8"?>
            <logs>
                <info flag="">
                    <rotate dir="{}" prefix="info" size="1K" />
                </info>
            </logs>"#,
            log_dir.display()
        ),
    )
    .unwrap();

    let router = Router::default();
    router.init_from_xml_file(&config).unwrap();

    let mut expected = 0;
    for i in 0..200 {
        let record = format!("record {i:04} {}", "x".repeat(i % 37));
        expected += record.len() + 1;
        router.info(format_args!("{record}"));
    }
    router.flush().unwrap();

    let files = fs::read_dir(&log_dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect::<Vec<_>>();
    assert!(files.len() > 1, "{files:?}");

    let mut total = 0;
    for file in &files {
        let name = file.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("info."), "{name}");
        assert!(name.ends_with(".log"), "{name}");

        let len = fs::metadata(file).unwrap().len();
        assert!(len <= 1000, "{name} holds {len} bytes");
        total += len as usize;
    }
    assert_eq!(total, expected);
}

#[test]
fn test_missing_config_file() {
    let temp_dir = TempDir::new().expect("failed to create a temporary directory");
    let router = Router::default();
    let err = router
        .init_from_xml_file(temp_dir.path().join("absent.xml"))
        .unwrap_err();
    assert_eq!(err.kind(), logtree::ErrorKind::Io);
}
