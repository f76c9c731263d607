use crate::constants::*;
use crate::errors::{AppError, AppResult};
use crate::models::OverrideRule;
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use url::Url;

/// Cached regex for a single `{CODE:Display Name}` override group.
static OVERRIDE_GROUP_REGEX: OnceLock<Regex> = OnceLock::new();

/// Cached regex for drive-qualified paths such as `C:\Export` or `c://Export`.
static QUALIFIED_PATH_REGEX: OnceLock<Regex> = OnceLock::new();

/// Resolved configuration with every optional key filled in.
///
/// This struct can be deserialized from TOML. Missing keys take their defaults,
/// unknown keys are rejected to catch typos.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolvedConfig {
    /// Location of the remote ISO 3166-1 XML document. Required at run time.
    pub source_url: Option<String>,
    /// Character encoding label used to decode the response body
    pub source_encoding: String,
    /// Expected tag of the document root
    pub root_element: String,
    /// Tag of each country entry under the root
    pub entry_element: String,
    /// Entry child holding the country name
    pub country_name_element: String,
    /// Entry child holding the alpha-2 code
    pub country_code_element: String,
    /// Priority overrides in the compact `{CODE:Display Name},...` format
    pub countries_in_order: Option<String>,
    /// Destination folder, relative to the application root unless absolute
    pub export_dir: PathBuf,
    /// Destination file name
    pub export_filename: String,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            source_url: None,
            source_encoding: DEFAULT_SOURCE_ENCODING.to_string(),
            root_element: DEFAULT_ROOT_ELEMENT.to_string(),
            entry_element: DEFAULT_ENTRY_ELEMENT.to_string(),
            country_name_element: DEFAULT_COUNTRY_NAME_ELEMENT.to_string(),
            country_code_element: DEFAULT_COUNTRY_CODE_ELEMENT.to_string(),
            countries_in_order: None,
            export_dir: PathBuf::from(DEFAULT_EXPORT_DIR),
            export_filename: DEFAULT_EXPORT_FILENAME.to_string(),
        }
    }
}

impl ResolvedConfig {
    /// Loads configuration from a TOML file.
    ///
    /// Keys left out of the file keep their defaults, and whitespace-only values
    /// are treated as if they were absent.
    ///
    /// # Errors
    ///
    /// Returns `IoError` if the file cannot be read and `InvalidInput` if the TOML
    /// is malformed or contains unknown keys.
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            AppError::IoError(format!(
                "Failed to read config {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> AppResult<Self> {
        let config: ResolvedConfig = toml::from_str(contents)
            .map_err(|e| AppError::InvalidInput(format!("Failed to parse config: {e}")))?;
        Ok(config.with_blank_values_defaulted())
    }

    fn with_blank_values_defaulted(mut self) -> Self {
        fn or_default(value: &mut String, default: &str) {
            if value.trim().is_empty() {
                *value = default.to_string();
            }
        }

        or_default(&mut self.source_encoding, DEFAULT_SOURCE_ENCODING);
        or_default(&mut self.root_element, DEFAULT_ROOT_ELEMENT);
        or_default(&mut self.entry_element, DEFAULT_ENTRY_ELEMENT);
        or_default(&mut self.country_name_element, DEFAULT_COUNTRY_NAME_ELEMENT);
        or_default(&mut self.country_code_element, DEFAULT_COUNTRY_CODE_ELEMENT);
        or_default(&mut self.export_filename, DEFAULT_EXPORT_FILENAME);
        if self.export_dir.as_os_str().to_string_lossy().trim().is_empty() {
            self.export_dir = PathBuf::from(DEFAULT_EXPORT_DIR);
        }
        if self
            .source_url
            .as_deref()
            .is_some_and(|url| url.trim().is_empty())
        {
            self.source_url = None;
        }
        if self
            .countries_in_order
            .as_deref()
            .is_some_and(|value| value.trim().is_empty())
        {
            self.countries_in_order = None;
        }
        self
    }

    /// Returns the validated source URL.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when no URL is configured and `UrlError` when it
    /// is not an absolute URL.
    pub fn source_url(&self) -> AppResult<Url> {
        let raw = self
            .source_url
            .as_deref()
            .map(str::trim)
            .ok_or_else(|| AppError::InvalidInput("source_url is required".into()))?;
        Ok(Url::parse(raw)?)
    }

    /// Parses `countries_in_order` into override rules, in configured order.
    pub fn override_rules(&self) -> AppResult<Vec<OverrideRule>> {
        match self.countries_in_order.as_deref() {
            Some(value) => parse_override_rules(value),
            None => Ok(Vec::new()),
        }
    }
}

/// Parses the compact override format: comma-separated `{CODE:Display Name}` groups.
///
/// Empty groups are skipped. Codes and names are trimmed; names keep their case.
///
/// # Errors
///
/// Returns `InvalidInput` for a group that does not contain both a code and a name.
pub fn parse_override_rules(value: &str) -> AppResult<Vec<OverrideRule>> {
    let group_regex = OVERRIDE_GROUP_REGEX.get_or_init(|| {
        Regex::new(OVERRIDE_GROUP_PATTERN).expect("OVERRIDE_GROUP_PATTERN is a valid regex pattern")
    });

    let mut rules = Vec::new();
    for group in value.split(',').map(str::trim).filter(|g| !g.is_empty()) {
        let caps = group_regex.captures(group).ok_or_else(|| {
            AppError::InvalidInput(format!("Invalid override group '{group}'"))
        })?;
        let code = caps.get(1).map_or("", |m| m.as_str()).trim();
        let display_name = caps.get(2).map_or("", |m| m.as_str()).trim();
        if code.is_empty() || display_name.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "Override group '{group}' needs both a code and a display name"
            )));
        }
        rules.push(OverrideRule::new(code, display_name));
    }
    Ok(rules)
}

/// Where the process is running, detected once at startup.
///
/// Relative paths in the configuration are anchored to the application root
/// this yields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEnvironment {
    /// A hosting process supplied its content root through `ISO3166_CONTENT_ROOT`
    Hosted { content_root: PathBuf },
    /// Running as a plain executable; the root is the executable's directory
    Standalone { exe_dir: PathBuf },
}

impl HostEnvironment {
    /// Detects the hosting environment from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `IoError` if the executable's location cannot be determined.
    pub fn detect() -> AppResult<Self> {
        if let Some(root) = env::var_os(CONTENT_ROOT_ENV) {
            if !root.to_string_lossy().trim().is_empty() {
                return Ok(Self::Hosted {
                    content_root: PathBuf::from(root),
                });
            }
        }

        let exe = env::current_exe()
            .map_err(|e| AppError::IoError(format!("Failed to locate executable: {e}")))?;
        let exe_dir = exe
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| {
                AppError::IoError(format!(
                    "Executable has no parent directory: {}",
                    exe.display()
                ))
            })?;
        Ok(Self::Standalone { exe_dir })
    }

    pub fn app_root(&self) -> &Path {
        match self {
            Self::Hosted { content_root } => content_root,
            Self::Standalone { exe_dir } => exe_dir,
        }
    }

    /// Resolves a configured path against the application root.
    ///
    /// Absolute and drive-qualified paths are returned unchanged. A leading `~/`
    /// marks an app-root relative path and is stripped.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        let qualified = QUALIFIED_PATH_REGEX.get_or_init(|| {
            Regex::new(QUALIFIED_PATH_PATTERN)
                .expect("QUALIFIED_PATH_PATTERN is a valid regex pattern")
        });

        let raw = path.to_string_lossy();
        if path.is_absolute() || qualified.is_match(&raw) {
            return path.to_path_buf();
        }

        let relative = raw
            .strip_prefix("~/")
            .or_else(|| raw.strip_prefix("~\\"))
            .unwrap_or(&raw);
        self.app_root().join(relative)
    }
}
