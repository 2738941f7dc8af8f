use crate::utils::error::{AdminError, Result};
use crate::utils::validation::{
    validate_coordinate, validate_non_empty_string, validate_path, validate_positive_number,
    validate_range, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const RIYADH_CENTER: (f64, f64) = (24.7136, 46.6753);
pub const DEFAULT_ZOOM: u8 = 11;
pub const ITEMS_PER_PAGE: usize = 15;
pub const DEFAULT_ACTOR: &str = "admin-001";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub fixtures: FixturesConfig,
    #[serde(default)]
    pub map: MapConfig,
    #[serde(default)]
    pub listing: ListingConfig,
    #[serde(default)]
    pub operator: OperatorConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSection {
    pub name: String,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: "lastmile-admin".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixturesConfig {
    /// JSON fixture file; the built-in Riyadh data set is used when absent.
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub center_lat: f64,
    pub center_lng: f64,
    pub default_zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_lat: RIYADH_CENTER.0,
            center_lng: RIYADH_CENTER.1,
            default_zoom: DEFAULT_ZOOM,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    pub items_per_page: usize,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            items_per_page: ITEMS_PER_PAGE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorConfig {
    pub actor_id: String,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            actor_id: DEFAULT_ACTOR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AdminError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| AdminError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn fixtures_path(&self) -> Option<&str> {
        self.fixtures.path.as_deref()
    }

    pub fn items_per_page(&self) -> usize {
        self.listing.items_per_page
    }

    pub fn actor_id(&self) -> &str {
        &self.operator.actor_id
    }
}

/// 替換環境變數 (例如 ${FIXTURES_DIR})；未設定的變數保持原樣
pub(crate) fn substitute_env_vars(content: &str) -> String {
    use regex::Regex;
    let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });

    result.to_string()
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("app.name", &self.app.name)?;
        if let Some(path) = &self.fixtures.path {
            validate_path("fixtures.path", path)?;
        }
        validate_coordinate(self.map.center_lng, self.map.center_lat)?;
        validate_range("map.default_zoom", self.map.default_zoom, 1, 20)?;
        validate_positive_number("listing.items_per_page", self.listing.items_per_page, 1)?;
        validate_non_empty_string("operator.actor_id", &self.operator.actor_id)?;

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(AdminError::InvalidConfigValueError {
                field: "logging.level".to_string(),
                value: self.logging.level.clone(),
                reason: format!("Valid levels: {}", valid_levels.join(", ")),
            });
        }
        Ok(())
    }
}
