//! Recursive plugin archive expansion
//!
//! Every archive `<dir>/<name>` expands into the sibling directory
//! `<dir>/<name>.contents`. The expanded tree is scanned for further archives,
//! which are queued and expanded the same way. Expansion is breadth-first over
//! an explicit work queue; a visited set keyed by canonical path and a depth
//! limit bound the work for self-referential or self-replicating archives.

use std::collections::{HashSet, VecDeque};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;
use workbench_core::config::ArchiveConfig;
use workbench_core::{Error, Result, UnitFailure};
use zip::ZipArchive;

/// Suffix appended to an archive's file name to form its expansion directory
pub const CONTENTS_SUFFIX: &str = ".contents";

/// An archive that was expanded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedArchive {
    /// The archive file
    pub archive: PathBuf,

    /// Directory it was expanded into
    pub target: PathBuf,

    /// Nesting depth; top-level archives are depth 0
    pub depth: usize,
}

/// Outcome of expanding one or more archive trees
#[derive(Debug, Default)]
pub struct ExpansionReport {
    pub expanded: Vec<ExpandedArchive>,
    pub failures: Vec<UnitFailure>,
}

impl ExpansionReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn fail(&mut self, archive: &Path, error: Error) {
        error!("Extraction failed for {}: {}", archive.display(), error);
        self.failures
            .push(UnitFailure::new(archive.display().to_string(), error));
    }
}

/// Expansion directory for an archive: `<parent>/<file name>.contents`
pub fn expanded_dir_name(archive: &Path) -> PathBuf {
    let mut file_name = archive
        .file_name()
        .map(OsStr::to_os_string)
        .unwrap_or_default();
    file_name.push(CONTENTS_SUFFIX);
    let parent = archive.parent().unwrap_or_else(|| Path::new(""));
    parent.join(file_name)
}

struct QueuedArchive {
    path: PathBuf,
    depth: usize,
}

/// Expands plugin packages and every archive nested inside them
#[derive(Debug, Clone)]
pub struct ArchiveExpander {
    extensions: Vec<String>,
    max_depth: usize,
}

impl ArchiveExpander {
    pub fn new(config: &ArchiveConfig) -> Self {
        Self {
            extensions: config.extensions.clone(),
            max_depth: config.max_depth,
        }
    }

    /// Whether a file name ends with one of the recognized archive extensions
    pub fn is_archive(&self, file_name: &str) -> bool {
        self.extensions.iter().any(|ext| file_name.ends_with(ext.as_str()))
    }

    /// Expand one archive and everything nested inside it
    pub fn expand(&self, archive: &Path) -> ExpansionReport {
        let mut report = ExpansionReport::default();
        let mut visited = HashSet::new();
        self.expand_tree(archive, &mut visited, &mut report);
        report
    }

    /// Expand every top-level archive in the plugins directory
    pub fn expand_all(&self, plugins_dir: &Path) -> Result<ExpansionReport> {
        let mut report = ExpansionReport::default();
        let mut visited = HashSet::new();

        for archive in self.top_level_archives(plugins_dir)? {
            self.expand_tree(&archive, &mut visited, &mut report);
        }

        info!(
            "Expanded {} archives under {} ({} failures)",
            report.expanded.len(),
            plugins_dir.display(),
            report.failures.len()
        );
        Ok(report)
    }

    /// Expansion directories of top-level archives that have been expanded
    pub fn expanded_roots(&self, plugins_dir: &Path) -> Result<Vec<PathBuf>> {
        Ok(self
            .top_level_archives(plugins_dir)?
            .iter()
            .map(|archive| expanded_dir_name(archive))
            .filter(|dir| dir.is_dir())
            .collect())
    }

    fn is_archive_name(&self, name: &OsStr) -> bool {
        name.to_str().is_some_and(|name| self.is_archive(name))
    }

    /// Files directly under `dir` with an archive extension, sorted by name
    ///
    /// Symlinks are followed so an aliased archive reaches the visited check.
    fn top_level_archives(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(Error::not_found(dir));
        }

        let mut archives = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let is_file = fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false);
            if is_file && path.file_name().is_some_and(|name| self.is_archive_name(name)) {
                archives.push(path);
            }
        }
        archives.sort();
        Ok(archives)
    }

    fn expand_tree(
        &self,
        root: &Path,
        visited: &mut HashSet<PathBuf>,
        report: &mut ExpansionReport,
    ) {
        let mut queue = VecDeque::from([QueuedArchive {
            path: root.to_path_buf(),
            depth: 0,
        }]);

        while let Some(node) = queue.pop_front() {
            if node.depth > self.max_depth {
                report.fail(
                    &node.path,
                    Error::extraction(
                        &node.path,
                        format!("nesting depth {} exceeds limit {}", node.depth, self.max_depth),
                    ),
                );
                continue;
            }

            let key = match fs::canonicalize(&node.path) {
                Ok(key) => key,
                Err(e) => {
                    report.fail(&node.path, Error::extraction(&node.path, e.to_string()));
                    continue;
                }
            };
            if !visited.insert(key) {
                warn!("Archive cycle detected at {}", node.path.display());
                report.fail(
                    &node.path,
                    Error::extraction(&node.path, "cycle: archive was already expanded"),
                );
                continue;
            }

            let target = match self.expand_one(&node.path) {
                Ok(target) => target,
                Err(e) => {
                    report.fail(&node.path, e);
                    continue;
                }
            };

            report.expanded.push(ExpandedArchive {
                archive: node.path.clone(),
                target: target.clone(),
                depth: node.depth,
            });

            let nested = self.nested_archives(&target, report);
            queue.extend(nested.into_iter().map(|path| QueuedArchive {
                path,
                depth: node.depth + 1,
            }));
        }
    }

    /// Decompress one archive into its expansion directory, replacing earlier output
    fn expand_one(&self, archive: &Path) -> Result<PathBuf> {
        let target = expanded_dir_name(archive);
        info!("Processing: {} into: {}", archive.display(), target.display());

        let file = File::open(archive).map_err(|e| Error::extraction(archive, e.to_string()))?;
        let mut zip = ZipArchive::new(file).map_err(|e| Error::extraction(archive, e.to_string()))?;

        if target.exists() {
            debug!("Removing previous expansion {}", target.display());
            fs::remove_dir_all(&target).map_err(|e| Error::extraction(archive, e.to_string()))?;
        }
        fs::create_dir_all(&target).map_err(|e| Error::extraction(archive, e.to_string()))?;

        zip.extract(&target)
            .map_err(|e| Error::extraction(archive, e.to_string()))?;

        Ok(target)
    }

    /// Archives anywhere inside an expanded tree, in walk order
    ///
    /// Links are followed. Entries that cannot be walked are recorded and
    /// skipped; a directory link back to an ancestor is reported as a cycle.
    fn nested_archives(&self, dir: &Path, report: &mut ExpansionReport) -> Vec<PathBuf> {
        debug!("Walking the files of {}", dir.display());

        let mut nested = Vec::new();
        for entry in WalkDir::new(dir).follow_links(true).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(dir).to_path_buf();
                    let message = match e.loop_ancestor() {
                        Some(ancestor) => format!("cycle: link back to {}", ancestor.display()),
                        None => e.to_string(),
                    };
                    report.fail(&path, Error::extraction(&path, message));
                    continue;
                }
            };
            if entry.file_type().is_file() && self.is_archive_name(entry.file_name()) {
                nested.push(entry.into_path());
            }
        }
        nested
    }
}

impl Default for ArchiveExpander {
    fn default() -> Self {
        Self::new(&ArchiveConfig::default())
    }
}
