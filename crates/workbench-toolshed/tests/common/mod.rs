//! Common test infrastructure for workbench-toolshed tests
//!
//! - Manifest entry fixtures
//! - `RecordingRunner`: a `CommandRunner` that records invocations and replays
//!   canned exit codes
//! - wiremock helpers emulating the Tool Shed install-info endpoint

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use workbench_core::types::ToolEntry;
use workbench_core::{Error, Result};
use workbench_toolshed::{CommandRunner, InstallCommand};

pub const INSTALL_INFO: &str = "/api/repositories/get_repository_revision_install_info";

pub fn tool(name: &str, owner: &str, tool_shed_url: &str, revisions: &[&str]) -> ToolEntry {
    ToolEntry {
        name: name.to_string(),
        owner: owner.to_string(),
        tool_shed_url: tool_shed_url.to_string(),
        revisions: revisions.iter().map(|r| r.to_string()).collect(),
        tool_panel_section_label: "Quality Control".to_string(),
    }
}

/// Canned outcome of one runner invocation
pub enum Outcome {
    Exit(i32),
    SpawnError,
}

pub struct RecordingRunner {
    outcomes: Mutex<VecDeque<Outcome>>,
    pub commands: Mutex<Vec<InstallCommand>>,
}

impl RecordingRunner {
    pub fn new(outcomes: Vec<Outcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            commands: Mutex::new(Vec::new()),
        }
    }

    pub fn commands(&self) -> Vec<InstallCommand> {
        self.commands.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, command: &InstallCommand) -> Result<i32> {
        self.commands.lock().unwrap().push(command.clone());
        match self.outcomes.lock().unwrap().pop_front() {
            Some(Outcome::Exit(code)) => Ok(code),
            Some(Outcome::SpawnError) => Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No such file or directory",
            ))),
            None => Ok(0),
        }
    }
}

/// Respond to one install-info query with `body`
pub async fn mock_install_info(server: &MockServer, name: &str, owner: &str, revision: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(INSTALL_INFO))
        .and(query_param("name", name))
        .and(query_param("owner", owner))
        .and(query_param("changeset_revision", revision))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}
