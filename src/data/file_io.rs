// Copyright 2025 the Glyphweaver Authors
// SPDX-License-Identifier: Apache-2.0

//! File and project I/O for AppState (load, save, project list, sync)

use chrono::Local;
use std::path::{Path, PathBuf};

use super::{AppState, Focus};
use crate::dialogs::{Prompt, SyncChoice, SyncConfig, Warning};
use crate::host::Host;
use crate::model::workspace::Workspace;
use crate::project::ProjectId;

impl AppState {
    /// Load a UFO from a path. The font is not part of any project until
    /// it is saved.
    pub fn load_font(&mut self, path: &Path) {
        match Workspace::load(path) {
            Ok(workspace) => {
                tracing::info!(
                    "Loaded font: {} ({} glyphs)",
                    workspace.display_name(),
                    workspace.glyph_count()
                );
                self.font.set(workspace);
                self.project_id = None;
                self.error_message = None;
            }
            Err(e) => {
                let error = format!("Failed to load UFO: {:#}", e);
                tracing::error!("{}", error);
                self.error_message = Some(error);
            }
        }
        self.process_font_events();
    }

    /// Start a new font containing only `.notdef`
    pub fn create_new_font(&mut self, family_name: &str) {
        self.font.set(Workspace::new(family_name));
        self.project_id = None;
        self.process_font_events();
    }

    /// Reopen the project that was current in the last session
    pub fn open_current_project(&mut self, host: &mut dyn Host) {
        if let Some(id) = self.projects.current() {
            self.open_project(host, id);
            self.process_font_events();
        }
    }

    /// Write the font back to its UFO, or to `path` when given
    pub fn save_workspace_file(&mut self, path: Option<PathBuf>) {
        let Some(workspace) = self.font.get() else {
            self.error_message = Some("No font to save".to_string());
            return;
        };
        let result = match &path {
            Some(path) => workspace.save_to(path),
            None => workspace.save(),
        };
        match result {
            Ok(()) => {
                tracing::info!("Saved UFO: {}", workspace.display_name());
                self.error_message = None;
                self.last_saved = Some(Local::now().format("%I:%M %p").to_string());
            }
            Err(e) => {
                let error = format!("Failed to save: {:#}", e);
                tracing::error!("{}", error);
                self.error_message = Some(error);
            }
        }
    }

    /// Get the last saved time string
    pub fn last_saved_display(&self) -> Option<&str> {
        self.last_saved.as_deref()
    }

    pub(super) fn refresh_project_list(&mut self) {
        self.project_list = self.projects.items();
    }

    /// Save the font into its project, creating one (after asking for a
    /// name) when the font is not a project yet.
    pub(super) fn save_project(&mut self, host: &mut dyn Host) {
        let Some(font) = self.font.get() else {
            return;
        };
        let result = match &self.project_id {
            Some(id) => self.projects.update(id, font).map(|()| id.clone()),
            None => {
                let Some(name) = host.project_name_dialog(&font.display_name()) else {
                    return;
                };
                self.projects.add(&name, font)
            }
        };

        match result {
            Ok(id) => {
                tracing::info!("Saved project {}", id);
                if let Err(e) = self.projects.set_current(Some(id.clone())) {
                    tracing::warn!("Failed to remember current project: {}", e);
                }
                self.project_id = Some(id.clone());
                self.font.mark_saved();
                self.error_message = None;
                self.last_saved = Some(Local::now().format("%I:%M %p").to_string());
                self.refresh_project_list();

                if self.projects.config(&id).is_some_and(|c| c.auto_sync()) {
                    self.sync_project(host, &id);
                }
            }
            Err(e) => {
                tracing::error!("Failed to save project: {}", e);
                self.error_message = Some(e.to_string());
                host.warn(Warning::SaveFailed(e.to_string()));
            }
        }
    }

    /// Open a project from the list. A project that fails to load can be
    /// removed from the list.
    pub(super) fn open_project(&mut self, host: &mut dyn Host, id: ProjectId) {
        match self.projects.get(&id) {
            Ok(workspace) => {
                if self.font.is_changed() && !host.confirm(Prompt::DiscardProjectChanges) {
                    return;
                }
                tracing::info!("Opened project {}", id);
                self.font.set(workspace);
                if let Err(e) = self.projects.set_current(Some(id.clone())) {
                    tracing::warn!("Failed to remember current project: {}", e);
                }
                self.project_id = Some(id);
                self.focus = Focus::Viewer;
            }
            Err(e) => {
                tracing::error!("{}", e);
                if host.confirm(Prompt::RemoveBrokenProject) {
                    if let Err(e) = self.projects.remove(&id, true) {
                        tracing::warn!("Failed to remove project {}: {}", id, e);
                    }
                    self.refresh_project_list();
                }
            }
        }
    }

    pub(super) fn delete_project(&mut self, host: &mut dyn Host, id: &ProjectId) {
        match self.projects.remove(id, false) {
            Ok(()) => {
                tracing::info!("Deleted project {}", id);
                if self.project_id.as_ref() == Some(id) {
                    self.project_id = None;
                }
                self.refresh_project_list();
            }
            Err(e) => {
                tracing::error!("Failed to delete project {}: {}", id, e);
                host.warn(Warning::DeleteProjectFailed);
            }
        }
        self.focus = Focus::Viewer;
    }

    /// Push a project to its remote using its stored sync settings
    pub(super) fn sync_project(&mut self, host: &mut dyn Host, id: &ProjectId) {
        let Some(sync) = self.projects.config(id).and_then(|c| c.sync) else {
            host.warn(Warning::SyncFailed("sync is not configured".to_string()));
            return;
        };
        let font = if self.project_id.as_ref() == Some(id) {
            self.font.get().cloned()
        } else {
            match self.projects.get(id) {
                Ok(font) => Some(font),
                Err(e) => {
                    host.warn(Warning::SyncFailed(e.to_string()));
                    return;
                }
            }
        };
        let Some(font) = font else {
            return;
        };
        match host.sync_project(id, &font, &sync) {
            Ok(()) => tracing::info!("Synced project {}", id),
            Err(e) => {
                tracing::warn!("Sync of {} failed: {:#}", id, e);
                host.warn(Warning::SyncFailed(format!("{e:#}")));
            }
        }
    }

    /// Edit the open project's sync settings
    pub(super) fn setting_sync(&mut self, host: &mut dyn Host) {
        let Some(id) = self.project_id.clone() else {
            return;
        };
        let mut config = self.projects.config(&id).unwrap_or_default();
        let mut sync = config.sync.clone().unwrap_or_else(|| SyncConfig {
            name: self
                .font
                .get()
                .map(|f| f.family_name.clone())
                .unwrap_or_default(),
            ..SyncConfig::default()
        });

        let Some(choice) = host.sync_dialog(&sync) else {
            return;
        };
        config.sync = match choice {
            SyncChoice::Enable(update) => {
                sync.merge(update);
                Some(sync)
            }
            SyncChoice::Disable => None,
        };
        if let Err(e) = self.projects.update_config(&id, config) {
            tracing::error!("Failed to store sync settings: {}", e);
            self.error_message = Some(e.to_string());
        }
        self.refresh_project_list();
    }
}
