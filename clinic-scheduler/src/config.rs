//! 配置管理
//!
//! 配置来源依次为：内置默认值、可选的 TOML 文件、`CLINIC_` 前缀的环境变量。

use clinic_core::{ClinicError, Result};
use clinic_scheduling::SchedulingDefaults;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// 排程工具完整配置
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SchedulerConfig {
    /// 日志配置
    pub logging: LoggingConfig,
    /// 排程默认值
    pub scheduling: SchedulingDefaults,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别或 EnvFilter 表达式
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl SchedulerConfig {
    /// 从文件（可选）与环境变量加载配置
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path));
        }

        Self::build(builder)
    }

    /// 从 TOML 文本加载配置
    pub fn from_toml(text: &str) -> Result<Self> {
        Self::build(Config::builder().add_source(File::from_str(text, FileFormat::Toml)))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let settings = builder
            .add_source(
                Environment::with_prefix("CLINIC")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| ClinicError::Config(e.to_string()))?;

        let config: SchedulerConfig = settings
            .try_deserialize()
            .map_err(|e| ClinicError::Config(format!("Failed to deserialize configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// 验证配置
    pub fn validate(&self) -> Result<()> {
        if self.scheduling.session_minutes == 0 {
            return Err(ClinicError::Config(
                "scheduling.session_minutes cannot be 0".to_string(),
            ));
        }
        if self.scheduling.interval_days == 0 {
            return Err(ClinicError::Config(
                "scheduling.interval_days cannot be 0".to_string(),
            ));
        }
        Ok(())
    }

    /// 序列化为 TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| ClinicError::Config(format!("Failed to serialize configuration: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SchedulerConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.scheduling.interval_text, "7 dias");
        assert_eq!(config.scheduling.interval_days, 7);
        assert_eq!(config.scheduling.session_minutes, 60);
        assert_eq!(config.scheduling.session_label, "Session");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_without_file() {
        let config = SchedulerConfig::load(None).unwrap();
        assert_eq!(config.scheduling, SchedulingDefaults::default());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SchedulerConfig::from_toml(
            r#"
            [scheduling]
            session_minutes = 45
            session_label = "Sessão"
            "#,
        )
        .unwrap();

        assert_eq!(config.scheduling.session_minutes, 45);
        assert_eq!(config.scheduling.session_label, "Sessão");
        assert_eq!(config.scheduling.interval_text, "7 dias");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = SchedulerConfig::from_toml("[scheduling]\nsession_minutes = 0\n").unwrap_err();
        assert!(matches!(err, ClinicError::Config(_)));

        let err = SchedulerConfig::from_toml("[scheduling]\ninterval_days = 0\n").unwrap_err();
        assert!(matches!(err, ClinicError::Config(_)));
    }

    #[test]
    fn test_toml_dump_round_trip() {
        let config = SchedulerConfig::default();
        let text = config.to_toml().unwrap();
        assert!(text.contains("[scheduling]"));
        assert_eq!(SchedulerConfig::from_toml(&text).unwrap(), config);
    }
}
