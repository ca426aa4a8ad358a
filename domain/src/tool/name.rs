//! The closed set of assistant capabilities.

use super::entities::ToolCategory;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Every action the tool-execution endpoint understands.
///
/// The catalog offered to the model must contain exactly these twelve
/// names; [`ToolRegistry::ensure_complete`](super::ToolRegistry::ensure_complete)
/// checks that at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    AddTask,
    ListTasks,
    CompleteTask,
    UpdateTask,
    DeleteTask,
    ReadFrontendFile,
    ReadBackendFile,
    UpdateFrontendFile,
    UpdateBackendFile,
    ListFrontendDirectory,
    ListBackendDirectory,
    RestartServices,
}

impl ToolName {
    pub const ALL: [ToolName; 12] = [
        ToolName::AddTask,
        ToolName::ListTasks,
        ToolName::CompleteTask,
        ToolName::UpdateTask,
        ToolName::DeleteTask,
        ToolName::ReadFrontendFile,
        ToolName::ReadBackendFile,
        ToolName::UpdateFrontendFile,
        ToolName::UpdateBackendFile,
        ToolName::ListFrontendDirectory,
        ToolName::ListBackendDirectory,
        ToolName::RestartServices,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolName::AddTask => "add_task",
            ToolName::ListTasks => "list_tasks",
            ToolName::CompleteTask => "complete_task",
            ToolName::UpdateTask => "update_task",
            ToolName::DeleteTask => "delete_task",
            ToolName::ReadFrontendFile => "read_frontend_file",
            ToolName::ReadBackendFile => "read_backend_file",
            ToolName::UpdateFrontendFile => "update_frontend_file",
            ToolName::UpdateBackendFile => "update_backend_file",
            ToolName::ListFrontendDirectory => "list_frontend_directory",
            ToolName::ListBackendDirectory => "list_backend_directory",
            ToolName::RestartServices => "restart_services",
        }
    }

    pub fn category(&self) -> ToolCategory {
        match self {
            ToolName::AddTask
            | ToolName::ListTasks
            | ToolName::CompleteTask
            | ToolName::UpdateTask
            | ToolName::DeleteTask => ToolCategory::Task,
            ToolName::ReadFrontendFile
            | ToolName::ReadBackendFile
            | ToolName::UpdateFrontendFile
            | ToolName::UpdateBackendFile
            | ToolName::ListFrontendDirectory
            | ToolName::ListBackendDirectory => ToolCategory::ProjectFiles,
            ToolName::RestartServices => ToolCategory::Services,
        }
    }

    /// Whether invoking this tool changes external state.
    pub fn is_mutating(&self) -> bool {
        !matches!(
            self,
            ToolName::ListTasks
                | ToolName::ReadFrontendFile
                | ToolName::ReadBackendFile
                | ToolName::ListFrontendDirectory
                | ToolName::ListBackendDirectory
        )
    }
}

impl std::fmt::Display for ToolName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolName::ALL
            .iter()
            .copied()
            .find(|n| n.as_str() == s)
            .ok_or_else(|| DomainError::UnknownTool(s.to_string()))
    }
}
