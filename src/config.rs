//! qrgen runtime configuration handling

use crate::batch::{BatchSettings, VerifyScope};
use crate::error::{Error, Result};
use crate::qr::{DEFAULT_BORDER, DEFAULT_BOX_SIZE, DEFAULT_BOX_STEP, EncoderSettings, MAX_BOX_SIZE};
use qrcode::EcLevel;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Directory images are written to unless configured otherwise
pub const DEFAULT_OUTPUT_DIR: &str = "qrcodes";

/// Top-level configuration structure read from disk or environment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QrgenConfig {
    /// Output directory and verification settings
    pub output: OutputOptions,
    /// Symbol construction settings
    pub encoder: EncoderOptions,
    /// Logging configuration
    pub logging: LoggingOptions,
}

impl QrgenConfig {
    /// Load configuration from an explicit path or fall back to discovered defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = explicit_path {
            Self::from_file(path)?
        } else if let Some(path) = Self::discover_file()? {
            tracing::info!("Using configuration file: {}", path.display());
            Self::from_file(&path)?
        } else {
            tracing::debug!("No qrgen.toml / qrgen.yaml found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Attempt to locate a configuration file in common locations.
    fn discover_file() -> Result<Option<PathBuf>> {
        let cwd =
            env::current_dir().map_err(|e| Error::Config(format!("Failed to read cwd: {e}")))?;
        for candidate in ["qrgen.toml", "qrgen.yaml", "qrgen.yml"] {
            let path = cwd.join(candidate);
            if path.exists() {
                return Ok(Some(path));
            }
        }

        if let Some(xdg_config) = env::var_os("XDG_CONFIG_HOME") {
            let base = PathBuf::from(xdg_config).join("qrgen");
            for candidate in ["config.toml", "config.yaml"] {
                let path = base.join(candidate);
                if path.exists() {
                    return Ok(Some(path));
                }
            }
        }

        Ok(None)
    }

    /// Read configuration from a concrete file path.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;

        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
            .as_str()
        {
            "toml" => toml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse TOML {}: {e}", path.display()))
            }),
            "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| {
                Error::Config(format!("Failed to parse YAML {}: {e}", path.display()))
            }),
            other => Err(Error::Config(format!(
                "Unsupported config format '{}', expected toml/yaml",
                other
            ))),
        }
    }

    /// Apply environment variable overrides after file/default loading.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Apply `QRGEN_*` overrides from an arbitrary lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        self.output.apply_overrides(&lookup);
        self.encoder.apply_overrides(&lookup);
        self.logging.apply_overrides(&lookup);
    }

    /// Batch settings resolved from the output section
    pub fn batch_settings(&self) -> BatchSettings {
        BatchSettings {
            output_dir: self.output.directory.clone(),
            create_dir: self.output.create_dir,
            verify_scope: self.output.verify_scope,
        }
    }

    /// Encoder settings resolved from the encoder section
    pub fn encoder_settings(&self) -> EncoderSettings {
        self.encoder.to_settings()
    }
}

/// Where images go and which of them are read back
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// Output directory (default `qrcodes`)
    pub directory: PathBuf,
    /// Create the directory when missing; `false` makes a missing directory an error
    pub create_dir: bool,
    /// `batch` verifies this run's files, `directory` every PNG in the directory
    pub verify_scope: VerifyScope,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_OUTPUT_DIR),
            create_dir: true,
            verify_scope: VerifyScope::Batch,
        }
    }
}

impl OutputOptions {
    fn apply_overrides<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("QRGEN_OUTPUT_DIR") {
            if !dir.trim().is_empty() {
                self.directory = PathBuf::from(dir);
            }
        }
        if let Some(create) = lookup("QRGEN_CREATE_DIR").as_deref().and_then(parse_flag) {
            self.create_dir = create;
        }
        if let Some(scope) = lookup("QRGEN_VERIFY_SCOPE") {
            if let Ok(parsed) = scope.parse::<VerifyScope>() {
                self.verify_scope = parsed;
            }
        }
    }
}

/// Box-size search and symbol settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderOptions {
    /// Box size of the first attempt, in pixels per module
    pub box_size: u32,
    /// Growth of the box size after each capacity failure
    pub box_step: u32,
    /// Largest box size attempted; the encoder caps it at 100
    pub max_box_size: u32,
    /// Quiet zone width in modules; the encoder caps it at 10
    pub border: u32,
    /// Error correction level
    pub ecc: EccLevel,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            box_size: DEFAULT_BOX_SIZE,
            box_step: DEFAULT_BOX_STEP,
            max_box_size: MAX_BOX_SIZE,
            border: DEFAULT_BORDER,
            ecc: EccLevel::M,
        }
    }
}

impl EncoderOptions {
    fn apply_overrides<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(size) = lookup("QRGEN_BOX_SIZE").and_then(|v| v.parse::<u32>().ok()) {
            self.box_size = size.max(1);
        }
        if let Some(step) = lookup("QRGEN_BOX_STEP").and_then(|v| v.parse::<u32>().ok()) {
            self.box_step = step.max(1);
        }
        if let Some(max) = lookup("QRGEN_MAX_BOX_SIZE").and_then(|v| v.parse::<u32>().ok()) {
            self.max_box_size = max;
        }
        if let Some(border) = lookup("QRGEN_BORDER").and_then(|v| v.parse::<u32>().ok()) {
            self.border = border;
        }
        if let Some(ecc) = lookup("QRGEN_ECC").and_then(|v| v.parse::<EccLevel>().ok()) {
            self.ecc = ecc;
        }
    }

    /// Merge onto the encoder defaults.
    pub fn to_settings(&self) -> EncoderSettings {
        EncoderSettings {
            initial_box_size: self.box_size,
            box_step: self.box_step,
            max_box_size: self.max_box_size,
            border: self.border,
            ecc_level: self.ecc.into(),
        }
    }
}

/// Error correction level as written in configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum EccLevel {
    /// About 7% recovery
    L,
    /// About 15% recovery
    M,
    /// About 25% recovery
    Q,
    /// About 30% recovery
    H,
}

impl From<EccLevel> for EcLevel {
    fn from(level: EccLevel) -> Self {
        match level {
            EccLevel::L => EcLevel::L,
            EccLevel::M => EcLevel::M,
            EccLevel::Q => EcLevel::Q,
            EccLevel::H => EcLevel::H,
        }
    }
}

impl FromStr for EccLevel {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "L" => Ok(Self::L),
            "M" => Ok(Self::M),
            "Q" => Ok(Self::Q),
            "H" => Ok(Self::H),
            _ => Err(format!(
                "Unsupported error correction level '{value}', expected L, M, Q or H"
            )),
        }
    }
}

/// Structured logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingOptions {
    /// Default log level (overridable via `QRGEN_LOG_LEVEL`)
    pub level: String,
    /// Optional log file path for teeing structured logs
    pub file: Option<PathBuf>,
    /// Force ANSI colors in console logging
    pub color: bool,
    /// Optional log rotation strategy applied to `file`
    pub rotation: Option<LogRotation>,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
            color: true,
            rotation: None,
        }
    }
}

impl LoggingOptions {
    fn apply_overrides<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("QRGEN_LOG_LEVEL") {
            self.level = level;
        }
        if let Some(file) = lookup("QRGEN_LOG_FILE") {
            self.file = Some(PathBuf::from(file));
        }
        if let Some(color) = lookup("QRGEN_LOG_COLOR").as_deref().and_then(parse_flag) {
            self.color = color;
        }
        if let Some(rotation) = lookup("QRGEN_LOG_ROTATION") {
            if let Some(parsed) = LogRotation::from_str(&rotation) {
                self.rotation = Some(parsed);
            }
        }
    }
}

/// Supported log rotation policies for file sinks
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    /// Rotate log files once per hour
    Hourly,
    /// Rotate log files once per day
    Daily,
}

impl LogRotation {
    fn from_str(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            _ => None,
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = QrgenConfig::default();
        assert_eq!(config.output.directory, PathBuf::from("qrcodes"));
        assert!(config.output.create_dir);
        assert_eq!(config.output.verify_scope, VerifyScope::Batch);

        let settings = config.encoder_settings();
        assert_eq!(settings.initial_box_size, 20);
        assert_eq!(settings.box_step, 5);
        assert_eq!(settings.max_box_size, 100);
        assert_eq!(settings.border, 1);
        assert_eq!(settings.ecc_level, EcLevel::M);
    }

    #[test]
    fn parses_partial_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qrgen.toml");
        fs::write(
            &path,
            r#"
[output]
directory = "out"
verify_scope = "directory"

[encoder]
ecc = "H"
"#,
        )
        .unwrap();

        let config = QrgenConfig::from_file(&path).unwrap();
        assert_eq!(config.output.directory, PathBuf::from("out"));
        assert!(config.output.create_dir);
        assert_eq!(config.output.verify_scope, VerifyScope::Directory);
        assert_eq!(config.encoder.ecc, EccLevel::H);
        assert_eq!(config.encoder.box_size, 20);
    }

    #[test]
    fn parses_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qrgen.yaml");
        fs::write(&path, "output:\n  create_dir: false\nlogging:\n  level: debug\n").unwrap();

        let config = QrgenConfig::from_file(&path).unwrap();
        assert!(!config.output.create_dir);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qrgen.ini");
        fs::write(&path, "").unwrap();
        assert!(matches!(
            QrgenConfig::from_file(&path),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = QrgenConfig::default();
        config.apply_overrides(lookup_from(&[
            ("QRGEN_OUTPUT_DIR", "elsewhere"),
            ("QRGEN_CREATE_DIR", "off"),
            ("QRGEN_VERIFY_SCOPE", "directory"),
            ("QRGEN_BOX_STEP", "0"),
            ("QRGEN_ECC", "q"),
            ("QRGEN_LOG_ROTATION", "daily"),
        ]));

        assert_eq!(config.output.directory, PathBuf::from("elsewhere"));
        assert!(!config.output.create_dir);
        assert_eq!(config.output.verify_scope, VerifyScope::Directory);
        assert_eq!(config.encoder.box_step, 1);
        assert_eq!(config.encoder.ecc, EccLevel::Q);
        assert_eq!(config.logging.rotation, Some(LogRotation::Daily));
    }

    #[test]
    fn invalid_overrides_are_ignored() {
        let mut config = QrgenConfig::default();
        config.apply_overrides(lookup_from(&[
            ("QRGEN_VERIFY_SCOPE", "everything"),
            ("QRGEN_BOX_SIZE", "big"),
            ("QRGEN_CREATE_DIR", "maybe"),
        ]));

        assert_eq!(config.output.verify_scope, VerifyScope::Batch);
        assert_eq!(config.encoder.box_size, 20);
        assert!(config.output.create_dir);
    }
}
