//! Galaxy tool and workflow installation
//!
//! Installer invocations are built as argument vectors and executed without a
//! shell, so names and labels containing spaces or quotes pass through intact.

use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{error, info};
use workbench_core::config::InstallerConfig;
use workbench_core::types::{GalaxyTarget, ToolEntry};
use workbench_core::{Error, Result, UnitFailure, WorkbenchConfig};

/// Flags whose following argument is a credential
const SECRET_FLAGS: &[&str] = &["-a", "-p"];

/// A planned installer invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl InstallCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

/// Renders the command line with credentials masked
impl fmt::Display for InstallCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        let mut mask_next = false;
        for arg in &self.args {
            if mask_next {
                write!(f, " ****")?;
            } else {
                write!(f, " {}", arg)?;
            }
            mask_next = SECRET_FLAGS.contains(&arg.as_str());
        }
        Ok(())
    }
}

/// Executes installer commands
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run to completion and return the exit code
    async fn run(&self, command: &InstallCommand) -> Result<i32>;
}

/// Runs commands as child processes with inherited stdio
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, command: &InstallCommand) -> Result<i32> {
        let status = Command::new(&command.program)
            .args(&command.args)
            .status()
            .await?;

        // Killed by a signal
        Ok(status.code().unwrap_or(-1))
    }
}

/// Installs that completed and those that failed
#[derive(Debug, Default)]
pub struct InstallReport {
    pub installed: Vec<String>,
    pub failures: Vec<UnitFailure>,
}

impl InstallReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Turns manifest entries into installer invocations and runs them
pub struct InstallPlanner<R: CommandRunner> {
    galaxy: GalaxyTarget,
    installer: InstallerConfig,
    runner: R,
}

impl InstallPlanner<ProcessRunner> {
    pub fn from_config(config: &WorkbenchConfig) -> Self {
        Self::new(config.galaxy.clone(), config.installer.clone(), ProcessRunner)
    }
}

impl<R: CommandRunner> InstallPlanner<R> {
    pub fn new(galaxy: GalaxyTarget, installer: InstallerConfig, runner: R) -> Self {
        Self {
            galaxy,
            installer,
            runner,
        }
    }

    /// `shed-tools install` invocation for one manifest entry
    pub fn plan(&self, tool: &ToolEntry) -> InstallCommand {
        InstallCommand::new(&self.installer.shed_tools)
            .arg("install")
            .args(["-g", self.galaxy.url.as_str()])
            .args(["-a", self.galaxy.api_key.as_str()])
            .args(["-u", self.galaxy.user.as_str()])
            .args(["-p", self.galaxy.password.as_str()])
            .args(["--toolshed", tool.tool_shed_url.as_str()])
            .arg("--skip_install_resolver_dependencies")
            .arg("--skip_install_repository_dependencies")
            .args(["--name", tool.name.as_str()])
            .args(["--owner", tool.owner.as_str()])
            .arg("--revisions")
            .args(tool.revisions.iter().map(String::as_str))
            .args(["--section_label", tool.tool_panel_section_label.as_str()])
    }

    /// `workflow-install` invocation for one workflow file
    pub fn plan_workflow(&self, workflow: &Path) -> InstallCommand {
        InstallCommand::new(&self.installer.workflow_install)
            .args(["-g", self.galaxy.url.as_str()])
            .args(["-a", self.galaxy.api_key.as_str()])
            .arg("-w")
            .arg(workflow.to_string_lossy())
    }

    /// Install every tool in order; a failed install does not stop the rest
    pub async fn install_all(&self, tools: &[ToolEntry]) -> InstallReport {
        let mut report = InstallReport::default();

        for tool in tools {
            let unit = format!("{}/{}", tool.owner, tool.name);
            let command = self.plan(tool);
            self.execute(unit, &command, &mut report).await;
        }

        report
    }

    /// Install every workflow file in order
    pub async fn install_workflows(&self, workflows: &[PathBuf]) -> InstallReport {
        let mut report = InstallReport::default();

        for workflow in workflows {
            let command = self.plan_workflow(workflow);
            self.execute(workflow.display().to_string(), &command, &mut report)
                .await;
        }

        report
    }

    async fn execute(&self, unit: String, command: &InstallCommand, report: &mut InstallReport) {
        info!("Installing {}: {}", unit, command);

        let outcome = match self.runner.run(command).await {
            Ok(0) => Ok(()),
            Ok(code) => Err(Error::install(
                &unit,
                format!("installer exited with code {}", code),
            )),
            Err(e) => Err(Error::install(
                &unit,
                format!("could not run {}: {}", command.program, e),
            )),
        };

        match outcome {
            Ok(()) => report.installed.push(unit),
            Err(e) => {
                error!("Installation of {} failed: {}", unit, e);
                report.failures.push(UnitFailure::new(unit, e));
            }
        }
    }
}
