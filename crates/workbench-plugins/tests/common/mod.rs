//! Common test infrastructure for workbench-plugins tests
//!
//! Plugin packages are built in memory so nested archives of any shape can be
//! produced without fixture files.

#![allow(dead_code)]

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

pub const TOOLS_YAML: &str = r#"tools:
- name: fastqc
  owner: devteam
  tool_shed_url: toolshed.g2.bx.psu.edu
  revisions:
  - e7b2202befea
  tool_panel_section_label: Quality Control
"#;

/// ZIP archive bytes holding the given `(name, contents)` entries
pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, contents) in entries {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(contents).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Write a ZIP archive to `path`, creating parent directories
pub fn write_jar(path: &Path, entries: &[(&str, &[u8])]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, zip_bytes(entries)).unwrap();
}

/// Plugin package with a tool manifest under each workflow version
pub fn plugin_package(versions: &[&str]) -> Vec<u8> {
    let names: Vec<String> = versions
        .iter()
        .map(|v| format!("workflows/{}/tools.yaml", v))
        .collect();
    let entries: Vec<(&str, &[u8])> = names
        .iter()
        .map(|n| (n.as_str(), TOOLS_YAML.as_bytes()))
        .collect();
    zip_bytes(&entries)
}
