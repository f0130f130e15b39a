use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use brokerlink_core::rules::DEFAULT_DISPLAY_KEYWORDS;
use brokerlink_core::time::{default_date_formats, parse_cutoff_date};
use brokerlink_core::{DeviceMode, TemplateCatalog, TemplateName};
use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "brokerlink";
const CONFIG_FILENAME: &str = "config.toml";
const BUILTIN_TEMPLATES: &str = include_str!("../templates.toml");

pub const DEFAULT_TEMPLATE: &str = "cine";
pub const DEFAULT_SHEET_NAME: &str = "BROKERS";
pub const DEFAULT_LINK_LABEL: &str = "Send WhatsApp";
pub const DEFAULT_LINK_COLUMN_WIDTH: f64 = 20.0;
pub const DEFAULT_DELIMITER: u8 = b',';

const MAX_SHEET_NAME_LEN: usize = 31;
const MAX_COLUMN_WIDTH: f64 = 255.0;
const FORBIDDEN_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub default_template: TemplateName,
    pub device_mode: DeviceMode,
    pub cutoff_date: Option<NaiveDate>,
    pub delimiter: u8,
    pub date_formats: Vec<String>,
    pub display_keywords: Vec<String>,
    pub output: OutputConfig,
    pub templates: TemplateCatalog,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputConfig {
    pub sheet_name: String,
    pub link_label: String,
    pub link_column_width: f64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            link_label: DEFAULT_LINK_LABEL.to_string(),
            link_column_width: DEFAULT_LINK_COLUMN_WIDTH,
        }
    }
}

impl AppConfig {
    /// Configuration with no user file applied.
    pub fn builtin() -> Result<Self> {
        let parsed: TemplatesFile =
            toml::from_str(BUILTIN_TEMPLATES).map_err(ConfigError::BuiltinTemplates)?;
        let mut templates = TemplateCatalog::new();
        insert_templates(&mut templates, parsed.templates)?;
        let default_template = TemplateName::new(DEFAULT_TEMPLATE)
            .map_err(|_| ConfigError::InvalidTemplateName(DEFAULT_TEMPLATE.to_string()))?;

        Ok(Self {
            default_template,
            device_mode: DeviceMode::default(),
            cutoff_date: None,
            delimiter: DEFAULT_DELIMITER,
            date_formats: default_date_formats(),
            display_keywords: DEFAULT_DISPLAY_KEYWORDS
                .iter()
                .map(|keyword| keyword.to_string())
                .collect(),
            output: OutputConfig::default(),
            templates,
        })
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("invalid template name: {0:?}")]
    InvalidTemplateName(String),
    #[error("default_template {0:?} is not a known template")]
    UnknownDefaultTemplate(String),
    #[error("invalid cutoff_date value {0:?}: expected YYYY-MM-DD")]
    InvalidCutoffDate(String),
    #[error("invalid delimiter {0:?}: expected a single ASCII character")]
    InvalidDelimiter(String),
    #[error("invalid date format: {0:?}")]
    InvalidDateFormat(String),
    #[error("display_keywords cannot be empty")]
    EmptyDisplayKeywords,
    #[error("invalid sheet name: {0:?}")]
    InvalidSheetName(String),
    #[error("invalid link label: {0:?}")]
    InvalidLinkLabel(String),
    #[error("invalid link_column_width value: {0}")]
    InvalidLinkColumnWidth(f64),
    #[error("failed to parse built-in templates: {0}")]
    BuiltinTemplates(#[source] toml::de::Error),
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    default_template: Option<String>,
    device_mode: Option<DeviceMode>,
    cutoff_date: Option<String>,
    delimiter: Option<String>,
    date_formats: Option<Vec<String>>,
    display_keywords: Option<Vec<String>>,
    output: Option<OutputFile>,
    #[serde(default)]
    templates: BTreeMap<String, TemplateFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct OutputFile {
    sheet_name: Option<String>,
    link_label: Option<String>,
    link_column_width: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TemplatesFile {
    templates: BTreeMap<String, TemplateFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TemplateFile {
    text: String,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return AppConfig::builtin(),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return AppConfig::builtin(),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => AppConfig::builtin(),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::builtin()?;

    insert_templates(&mut config.templates, parsed.templates)?;

    if let Some(raw) = parsed.default_template {
        let name =
            TemplateName::new(&raw).map_err(|_| ConfigError::InvalidTemplateName(raw.clone()))?;
        config.default_template = name;
    }
    if !config
        .templates
        .contains(config.default_template.as_str())
    {
        return Err(ConfigError::UnknownDefaultTemplate(
            config.default_template.to_string(),
        ));
    }

    if let Some(mode) = parsed.device_mode {
        config.device_mode = mode;
    }

    if let Some(raw) = parsed.cutoff_date {
        let date = parse_cutoff_date(&raw).ok_or(ConfigError::InvalidCutoffDate(raw))?;
        config.cutoff_date = Some(date);
    }

    if let Some(raw) = parsed.delimiter {
        config.delimiter = parse_delimiter(&raw)?;
    }

    if let Some(formats) = parsed.date_formats {
        for format in &formats {
            validate_date_format(format)?;
        }
        if !formats.is_empty() {
            config.date_formats = formats;
        }
    }

    if let Some(keywords) = parsed.display_keywords {
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|keyword| keyword.trim().to_string())
            .filter(|keyword| !keyword.is_empty())
            .collect();
        if keywords.is_empty() {
            return Err(ConfigError::EmptyDisplayKeywords);
        }
        config.display_keywords = keywords;
    }

    if let Some(output) = parsed.output {
        if let Some(sheet_name) = output.sheet_name {
            validate_sheet_name(&sheet_name)?;
            config.output.sheet_name = sheet_name;
        }
        if let Some(label) = output.link_label {
            if label.trim().is_empty() {
                return Err(ConfigError::InvalidLinkLabel(label));
            }
            config.output.link_label = label;
        }
        if let Some(width) = output.link_column_width {
            if !(width > 0.0 && width <= MAX_COLUMN_WIDTH) {
                return Err(ConfigError::InvalidLinkColumnWidth(width));
            }
            config.output.link_column_width = width;
        }
    }

    Ok(config)
}

fn insert_templates(
    catalog: &mut TemplateCatalog,
    templates: BTreeMap<String, TemplateFile>,
) -> Result<()> {
    for (raw_name, template) in templates {
        let name = TemplateName::new(&raw_name)
            .map_err(|_| ConfigError::InvalidTemplateName(raw_name.clone()))?;
        catalog.insert(name, template.text);
    }
    Ok(())
}

pub fn parse_delimiter(raw: &str) -> Result<u8> {
    let value = match raw {
        "\\t" | "tab" => "\t",
        other => other,
    };
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if ch.is_ascii() && ch != '"' && ch != '\n' && ch != '\r' => {
            Ok(ch as u8)
        }
        _ => Err(ConfigError::InvalidDelimiter(raw.to_string())),
    }
}

fn validate_date_format(format: &str) -> Result<()> {
    if format.trim().is_empty()
        || StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
    {
        return Err(ConfigError::InvalidDateFormat(format.to_string()));
    }
    Ok(())
}

fn validate_sheet_name(name: &str) -> Result<()> {
    let len = name.chars().count();
    if name.trim().is_empty()
        || len > MAX_SHEET_NAME_LEN
        || name.chars().any(|ch| FORBIDDEN_SHEET_CHARS.contains(&ch))
        || name.starts_with('\'')
        || name.ends_with('\'')
    {
        return Err(ConfigError::InvalidSheetName(name.to_string()));
    }
    Ok(())
}
