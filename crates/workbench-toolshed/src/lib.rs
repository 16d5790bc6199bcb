//! Galaxy Tool Shed integration for the workbench CLI
//!
//! - `registry`: resolves manifest entries to pinned dependency specs
//! - `planner`: builds and runs `shed-tools` and `workflow-install` invocations
//! - `conda`: renders conda environment files from pinned requirements

pub mod conda;
pub mod planner;
pub mod registry;

pub use conda::{parse_requirements, CondaEnvironment, PackagePin};
pub use planner::{CommandRunner, InstallCommand, InstallPlanner, InstallReport, ProcessRunner};
pub use registry::{
    DependencySpec, RegistryResolver, ResolutionReport, RevisionMetadata, ToolDescriptor,
    ToolShed, ToolShedClient,
};
