use crate::config::toml_config::substitute_env_vars;
use crate::domain::model::{NewOrder, Position};
use crate::utils::error::{AdminError, Result};
use crate::utils::validation::{validate_non_empty_string, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 操作腳本：依序重播一連串的營運操作
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionScript {
    pub session: SessionInfo,
    #[serde(default)]
    pub steps: Vec<SessionStep>,
    #[serde(default)]
    pub error_handling: ErrorHandlingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnStepError {
    #[default]
    Abort,
    Continue,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorHandlingConfig {
    #[serde(default)]
    pub on_step_error: OnStepError,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SessionStep {
    Locate {
        lng: f64,
        lat: f64,
    },
    CreateOrder {
        #[serde(flatten)]
        order: NewOrder,
    },
    CancelOrder {
        order_id: String,
    },
    ReassignOrder {
        order_id: String,
        rider_id: String,
    },
    RenameZone {
        zone_id: String,
        name: String,
    },
    BeginEdit {
        zone_id: String,
    },
    MoveVertex {
        index: usize,
        to: Position,
    },
    InsertVertex {
        after: usize,
        at: Position,
    },
    RemoveVertex {
        index: usize,
    },
    CommitEdit,
    CancelEdit,
    AddWarehouse {
        zone_ids: Vec<String>,
        warehouse_id: String,
    },
    RemoveWarehouse {
        zone_ids: Vec<String>,
        warehouse_id: String,
    },
    AssignRider {
        rider_id: String,
        zone_id: String,
    },
    UnassignRider {
        rider_id: String,
        zone_id: String,
    },
}

impl SessionStep {
    pub fn action(&self) -> &'static str {
        match self {
            Self::Locate { .. } => "locate",
            Self::CreateOrder { .. } => "create_order",
            Self::CancelOrder { .. } => "cancel_order",
            Self::ReassignOrder { .. } => "reassign_order",
            Self::RenameZone { .. } => "rename_zone",
            Self::BeginEdit { .. } => "begin_edit",
            Self::MoveVertex { .. } => "move_vertex",
            Self::InsertVertex { .. } => "insert_vertex",
            Self::RemoveVertex { .. } => "remove_vertex",
            Self::CommitEdit => "commit_edit",
            Self::CancelEdit => "cancel_edit",
            Self::AddWarehouse { .. } => "add_warehouse",
            Self::RemoveWarehouse { .. } => "remove_warehouse",
            Self::AssignRider { .. } => "assign_rider",
            Self::UnassignRider { .. } => "unassign_rider",
        }
    }
}

impl SessionScript {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AdminError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| AdminError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }
}

impl Validate for SessionScript {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("session.name", &self.session.name)?;
        if self.steps.is_empty() {
            return Err(AdminError::ConfigValidationError {
                field: "steps".to_string(),
                message: "Session script has no steps".to_string(),
            });
        }
        Ok(())
    }
}
