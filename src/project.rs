// Copyright 2025 the Glyphweaver Authors
// SPDX-License-Identifier: Apache-2.0

//! Project list storage.
//!
//! A project is a named, saved font plus per-project configuration (remote
//! sync settings). The controller only talks to the `ProjectStore` trait.
//! `FolderProjectStore` keeps one UFO per project under a root folder with a
//! `projects.json` index; `MemoryProjectStore` is used when no folder is
//! configured.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::dialogs::SyncConfig;
use crate::model::workspace::Workspace;

/// Name of the index file inside a project folder
const INDEX_FILE: &str = "projects.json";

/// Stable identifier of a stored project
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectId(pub String);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        ProjectId(s.to_string())
    }
}

/// Entry in the project list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub name: String,
}

/// Per-project configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub sync: Option<SyncConfig>,
}

impl ProjectConfig {
    /// Whether the project pushes to its remote after each save
    pub fn auto_sync(&self) -> bool {
        self.sync.as_ref().is_some_and(|s| s.auto_sync)
    }
}

/// Project store failure
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("no project with id {0}")]
    NotFound(ProjectId),

    #[error("failed to load project {id}: {source}")]
    Load {
        id: ProjectId,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to write project {id}: {source}")]
    Save {
        id: ProjectId,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("project index error: {0}")]
    Index(#[from] serde_json::Error),

    #[error("project storage error: {0}")]
    Io(#[from] std::io::Error),
}

/// Storage backing the project list
pub trait ProjectStore {
    /// All projects, in insertion order
    fn items(&self) -> Vec<ProjectSummary>;

    /// Load a project's font
    fn get(&self, id: &ProjectId) -> Result<Workspace, ProjectError>;

    /// Store a new project and return its id
    fn add(&mut self, name: &str, font: &Workspace) -> Result<ProjectId, ProjectError>;

    /// Overwrite an existing project's font
    fn update(&mut self, id: &ProjectId, font: &Workspace) -> Result<(), ProjectError>;

    /// Remove a project. With `force`, the list entry is dropped even if
    /// the stored data cannot be deleted.
    fn remove(&mut self, id: &ProjectId, force: bool) -> Result<(), ProjectError>;

    fn config(&self, id: &ProjectId) -> Option<ProjectConfig>;

    fn update_config(&mut self, id: &ProjectId, config: ProjectConfig)
    -> Result<(), ProjectError>;

    /// Project that was open last time
    fn current(&self) -> Option<ProjectId>;

    fn set_current(&mut self, id: Option<ProjectId>) -> Result<(), ProjectError>;
}

// ============================================================================
// FOLDER STORE
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ProjectIndex {
    #[serde(default)]
    projects: Vec<ProjectRecord>,
    #[serde(default)]
    current: Option<ProjectId>,
    #[serde(default)]
    next_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProjectRecord {
    id: ProjectId,
    name: String,
    /// UFO directory, relative to the store root
    file: String,
    #[serde(default)]
    config: ProjectConfig,
}

/// Projects saved as UFO packages in one folder
#[derive(Debug)]
pub struct FolderProjectStore {
    root: PathBuf,
    index: ProjectIndex,
}

impl FolderProjectStore {
    /// Open (or create) a store rooted at `root`
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, ProjectError> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;

        let index_path = root.join(INDEX_FILE);
        let index = if index_path.exists() {
            let text = std::fs::read_to_string(&index_path)?;
            serde_json::from_str(&text)?
        } else {
            ProjectIndex::default()
        };

        tracing::info!(
            "Opened project store at {} ({} projects)",
            root.display(),
            index.projects.len()
        );
        Ok(Self { root, index })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn write_index(&self) -> Result<(), ProjectError> {
        let text = serde_json::to_string_pretty(&self.index)?;
        std::fs::write(self.root.join(INDEX_FILE), text)?;
        Ok(())
    }

    fn record(&self, id: &ProjectId) -> Result<&ProjectRecord, ProjectError> {
        self.index
            .projects
            .iter()
            .find(|r| &r.id == id)
            .ok_or_else(|| ProjectError::NotFound(id.clone()))
    }

    fn record_mut(&mut self, id: &ProjectId) -> Result<&mut ProjectRecord, ProjectError> {
        self.index
            .projects
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| ProjectError::NotFound(id.clone()))
    }

    fn ufo_path(&self, record: &ProjectRecord) -> PathBuf {
        self.root.join(&record.file)
    }
}

impl ProjectStore for FolderProjectStore {
    fn items(&self) -> Vec<ProjectSummary> {
        self.index
            .projects
            .iter()
            .map(|r| ProjectSummary {
                id: r.id.clone(),
                name: r.name.clone(),
            })
            .collect()
    }

    fn get(&self, id: &ProjectId) -> Result<Workspace, ProjectError> {
        let record = self.record(id)?;
        Workspace::load(self.ufo_path(record)).map_err(|e| ProjectError::Load {
            id: id.clone(),
            source: e.into(),
        })
    }

    fn add(&mut self, name: &str, font: &Workspace) -> Result<ProjectId, ProjectError> {
        self.index.next_id += 1;
        let id = ProjectId(format!("p{}", self.index.next_id));
        let record = ProjectRecord {
            id: id.clone(),
            name: name.to_string(),
            file: format!("{}.ufo", id),
            config: ProjectConfig::default(),
        };

        font.save_to(self.ufo_path(&record))
            .map_err(|e| ProjectError::Save {
                id: id.clone(),
                source: e.into(),
            })?;
        self.index.projects.push(record);
        self.write_index()?;

        tracing::info!("Added project '{}' as {}", name, id);
        Ok(id)
    }

    fn update(&mut self, id: &ProjectId, font: &Workspace) -> Result<(), ProjectError> {
        let path = self.ufo_path(self.record(id)?);
        font.save_to(&path).map_err(|e| ProjectError::Save {
            id: id.clone(),
            source: e.into(),
        })?;
        tracing::debug!("Updated project {}", id);
        Ok(())
    }

    fn remove(&mut self, id: &ProjectId, force: bool) -> Result<(), ProjectError> {
        let path = self.ufo_path(self.record(id)?);
        if path.exists() {
            if let Err(e) = std::fs::remove_dir_all(&path) {
                if !force {
                    return Err(e.into());
                }
                tracing::warn!("Could not delete {}: {}", path.display(), e);
            }
        }

        self.index.projects.retain(|r| &r.id != id);
        if self.index.current.as_ref() == Some(id) {
            self.index.current = None;
        }
        self.write_index()?;
        tracing::info!("Removed project {}", id);
        Ok(())
    }

    fn config(&self, id: &ProjectId) -> Option<ProjectConfig> {
        self.record(id).ok().map(|r| r.config.clone())
    }

    fn update_config(
        &mut self,
        id: &ProjectId,
        config: ProjectConfig,
    ) -> Result<(), ProjectError> {
        self.record_mut(id)?.config = config;
        self.write_index()
    }

    fn current(&self) -> Option<ProjectId> {
        self.index.current.clone()
    }

    fn set_current(&mut self, id: Option<ProjectId>) -> Result<(), ProjectError> {
        self.index.current = id;
        self.write_index()
    }
}

// ============================================================================
// MEMORY STORE
// ============================================================================

#[derive(Debug, Clone)]
struct MemoryProject {
    name: String,
    font: Workspace,
    config: ProjectConfig,
}

/// Projects kept in memory for the lifetime of the process
#[derive(Debug, Default)]
pub struct MemoryProjectStore {
    order: Vec<ProjectId>,
    projects: HashMap<ProjectId, MemoryProject>,
    current: Option<ProjectId>,
    next_id: u64,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn project(&self, id: &ProjectId) -> Result<&MemoryProject, ProjectError> {
        self.projects
            .get(id)
            .ok_or_else(|| ProjectError::NotFound(id.clone()))
    }
}

impl ProjectStore for MemoryProjectStore {
    fn items(&self) -> Vec<ProjectSummary> {
        self.order
            .iter()
            .filter_map(|id| {
                self.projects.get(id).map(|p| ProjectSummary {
                    id: id.clone(),
                    name: p.name.clone(),
                })
            })
            .collect()
    }

    fn get(&self, id: &ProjectId) -> Result<Workspace, ProjectError> {
        Ok(self.project(id)?.font.clone())
    }

    fn add(&mut self, name: &str, font: &Workspace) -> Result<ProjectId, ProjectError> {
        self.next_id += 1;
        let id = ProjectId(format!("p{}", self.next_id));
        self.projects.insert(
            id.clone(),
            MemoryProject {
                name: name.to_string(),
                font: font.clone(),
                config: ProjectConfig::default(),
            },
        );
        self.order.push(id.clone());
        Ok(id)
    }

    fn update(&mut self, id: &ProjectId, font: &Workspace) -> Result<(), ProjectError> {
        let project = self
            .projects
            .get_mut(id)
            .ok_or_else(|| ProjectError::NotFound(id.clone()))?;
        project.font = font.clone();
        Ok(())
    }

    fn remove(&mut self, id: &ProjectId, _force: bool) -> Result<(), ProjectError> {
        self.projects
            .remove(id)
            .ok_or_else(|| ProjectError::NotFound(id.clone()))?;
        self.order.retain(|o| o != id);
        if self.current.as_ref() == Some(id) {
            self.current = None;
        }
        Ok(())
    }

    fn config(&self, id: &ProjectId) -> Option<ProjectConfig> {
        self.projects.get(id).map(|p| p.config.clone())
    }

    fn update_config(
        &mut self,
        id: &ProjectId,
        config: ProjectConfig,
    ) -> Result<(), ProjectError> {
        let project = self
            .projects
            .get_mut(id)
            .ok_or_else(|| ProjectError::NotFound(id.clone()))?;
        project.config = config;
        Ok(())
    }

    fn current(&self) -> Option<ProjectId> {
        self.current.clone()
    }

    fn set_current(&mut self, id: Option<ProjectId>) -> Result<(), ProjectError> {
        self.current = id;
        Ok(())
    }
}
