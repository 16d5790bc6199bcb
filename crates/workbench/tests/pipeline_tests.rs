//! End-to-end tests of the local pipeline stages
//!
//! A plugin package is built on disk, expanded, its manifest discovered, and
//! the resulting installer invocations captured by a recording runner.

use async_trait::async_trait;
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Mutex;
use tempfile::TempDir;
use workbench_core::config::InstallerConfig;
use workbench_core::types::GalaxyTarget;
use workbench_core::Result;
use workbench_plugins::{discover_manifests, ArchiveExpander, ManifestLocator};
use workbench_toolshed::{CommandRunner, InstallCommand, InstallPlanner};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const OLD_TOOLS: &str = r#"tools:
- name: fastqc
  owner: devteam
  tool_shed_url: toolshed.g2.bx.psu.edu
  revisions: [e7b2202befea]
  tool_panel_section_label: Quality Control
"#;

const NEW_TOOLS: &str = r#"tools:
- name: fastqc
  owner: devteam
  tool_shed_url: toolshed.g2.bx.psu.edu
  revisions: [3fe632431b68]
  tool_panel_section_label: Quality Control
- name: read_it_and_keep
  owner: iuc
  tool_shed_url: toolshed.g2.bx.psu.edu
  revisions: [1563b58905f4]
  tool_panel_section_label: SARS-CoV-2
"#;

#[derive(Default)]
struct RecordingRunner {
    commands: Mutex<Vec<InstallCommand>>,
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &InstallCommand) -> Result<i32> {
        self.commands.lock().unwrap().push(command.clone());
        Ok(0)
    }
}

fn write_plugin(path: &Path) {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let entries: [(&str, &str); 4] = [
        ("workflows/0.1/tools.yaml", OLD_TOOLS),
        ("workflows/0.2/tools.yaml", NEW_TOOLS),
        ("workflows/0.2/sars-cov-2-illumina.ga", "{}"),
        ("plugin.properties", "plugin.id=sars-cov-2"),
    ];
    for (name, contents) in entries {
        writer.start_file(name, SimpleFileOptions::default()).unwrap();
        writer.write_all(contents.as_bytes()).unwrap();
    }
    let bytes = writer.finish().unwrap().into_inner();
    fs::write(path, bytes).unwrap();
}

#[tokio::test]
async fn test_expand_discover_and_install() {
    let temp = TempDir::new().unwrap();
    write_plugin(&temp.path().join("irida-plugin-sars-cov-2-illumina-0.2.0.jar"));

    let expander = ArchiveExpander::default();
    let expansion = expander.expand_all(temp.path()).unwrap();
    assert!(expansion.is_success());

    let discovery = discover_manifests(&expander, temp.path()).unwrap();
    assert!(discovery.failures.is_empty());
    let plugin = &discovery.manifests[0];
    assert!(plugin.workflow_dir.ends_with("workflows/0.2"));

    let planner = InstallPlanner::new(
        GalaxyTarget::default(),
        InstallerConfig::default(),
        RecordingRunner::default(),
    );
    let report = planner.install_all(&plugin.manifest.tools).await;
    assert_eq!(report.installed, vec!["devteam/fastqc", "iuc/read_it_and_keep"]);

    let workflows = ManifestLocator::workflow_files(&plugin.workflow_dir).unwrap();
    let report = planner.install_workflows(&workflows).await;
    assert!(report.is_success());
    assert_eq!(report.installed.len(), 1);
    assert!(report.installed[0].ends_with("sars-cov-2-illumina.ga"));
}

#[test]
fn test_second_extraction_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let jar = temp.path().join("plugin.jar");
    write_plugin(&jar);

    let expander = ArchiveExpander::default();
    expander.expand_all(temp.path()).unwrap();
    let again = expander.expand_all(temp.path()).unwrap();

    assert!(again.is_success());
    let roots = expander.expanded_roots(temp.path()).unwrap();
    assert_eq!(roots, vec![temp.path().join("plugin.jar.contents")]);
}
