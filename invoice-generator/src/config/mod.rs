use crate::models::PageSize;
use invoice_core::config as core_config;
use invoice_core::error::AppError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_HEADER: &str = "Photography Invoice";
pub const DEFAULT_FILE_NAME: &str = "photography-invoice.pdf";

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    #[serde(default)]
    pub template: TemplateConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Presentation switches for the single invoice template.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TemplateConfig {
    /// Title used when the draft has no client name.
    #[serde(default = "default_header")]
    pub header: String,
    #[serde(default)]
    pub logo_path: Option<PathBuf>,
    #[serde(default)]
    pub watermark: Option<String>,
    #[serde(default)]
    pub currency: CurrencyConfig,
    #[serde(default = "default_true")]
    pub show_discount_rows: bool,
    #[serde(default)]
    pub page_size: PageSize,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CurrencyConfig {
    #[serde(default = "default_currency_label")]
    pub label: String,
    #[serde(default)]
    pub position: CurrencyPosition,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyPosition {
    #[default]
    Prefix,
    Suffix,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct OutputConfig {
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

fn default_header() -> String {
    DEFAULT_HEADER.to_string()
}

fn default_true() -> bool {
    true
}

fn default_currency_label() -> String {
    "$".to_string()
}

fn default_output_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_file_name() -> String {
    DEFAULT_FILE_NAME.to_string()
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            header: default_header(),
            logo_path: None,
            watermark: None,
            currency: CurrencyConfig::default(),
            show_discount_rows: true,
            page_size: PageSize::default(),
        }
    }
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            label: default_currency_label(),
            position: CurrencyPosition::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            file_name: default_file_name(),
        }
    }
}

impl GeneratorConfig {
    pub fn load(explicit: Option<&Path>) -> Result<Self, AppError> {
        let config: GeneratorConfig = core_config::load_layered(explicit)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.output.file_name.trim().is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "output.file_name must not be empty"
            )));
        }
        if Path::new(&self.output.file_name).components().count() != 1 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "output.file_name must be a bare file name, got {}",
                self.output.file_name
            )));
        }
        if let Some(logo) = &self.template.logo_path {
            if !logo.exists() {
                tracing::warn!(logo = %logo.display(), "Configured logo does not exist; rendering will fail");
            }
        }
        Ok(())
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            common: core_config::Config::default(),
            template: TemplateConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        file.write_all(contents.as_bytes()).expect("write");
        file
    }

    #[test]
    #[serial]
    fn defaults_match_the_photography_template() {
        let config = GeneratorConfig::load(None).expect("config should load");
        assert_eq!(config.template, TemplateConfig::default());
        assert_eq!(config.template.header, "Photography Invoice");
        assert_eq!(config.template.currency.label, "$");
        assert_eq!(config.template.currency.position, CurrencyPosition::Prefix);
        assert_eq!(config.output.file_name, "photography-invoice.pdf");
    }

    #[test]
    #[serial]
    fn template_section_is_read_from_file() {
        let file = write_config(
            r#"
log_level = "debug"

[template]
header = "Studio Invoice"
watermark = "DRAFT"
show_discount_rows = false
page_size = "letter"

[template.currency]
label = "EUR"
position = "suffix"

[output]
file_name = "studio.pdf"
"#,
        );

        let config = GeneratorConfig::load(Some(file.path())).expect("config should load");
        assert_eq!(config.common.log_level, "debug");
        assert_eq!(config.template.header, "Studio Invoice");
        assert_eq!(config.template.watermark.as_deref(), Some("DRAFT"));
        assert!(!config.template.show_discount_rows);
        assert_eq!(config.template.page_size, PageSize::Letter);
        assert_eq!(config.template.currency.label, "EUR");
        assert_eq!(config.template.currency.position, CurrencyPosition::Suffix);
        assert_eq!(config.output.file_name, "studio.pdf");
    }

    #[test]
    #[serial]
    fn file_name_with_directories_is_rejected() {
        let file = write_config("[output]\nfile_name = \"../escape.pdf\"\n");
        let result = GeneratorConfig::load(Some(file.path()));
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }
}
