use anyhow::{Context, Result};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main lock configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LockConfig {
    /// Unlock code settings
    pub unlock: UnlockConfig,

    /// Weekly class schedule
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Desktop notification settings
    #[serde(default)]
    pub notifications: NotificationConfig,
}

/// Unlock code settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UnlockConfig {
    /// Shared secret the companion app uses to derive the real code.
    /// Not a password hash; codes rotate every minute.
    pub secret: String,
}

/// Weekly class schedule
///
/// The `friday` timetable applies on Fridays, `standard` on every other
/// day (weekends included, matching the deployed boards). An empty
/// timetable is valid and simply yields out-of-hours all day.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScheduleConfig {
    #[serde(default)]
    pub standard: Vec<PeriodEntry>,

    #[serde(default)]
    pub friday: Vec<PeriodEntry>,
}

/// A single named interval of the school day
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PeriodEntry {
    /// Start of the period (inclusive)
    #[serde(with = "hhmm")]
    pub start: NaiveTime,

    /// End of the period (inclusive; may equal the next period's start)
    #[serde(with = "hhmm")]
    pub end: NaiveTime,

    /// Display name, e.g. "1. Ders"
    pub label: String,

    /// Icon shown next to the label on the schedule card
    #[serde(default)]
    pub icon: String,

    /// Period classification; breaks and lunch force the board locked
    pub kind: PeriodKind,
}

/// Period classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Lesson,
    Break,
    Lunch,
}

impl PeriodKind {
    /// Whether a period of this kind forces the board locked
    pub fn is_break(self) -> bool {
        matches!(self, PeriodKind::Break | PeriodKind::Lunch)
    }
}

/// Desktop notification settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotificationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

fn default_true() -> bool {
    true
}

/// Serde adapter for "HH:MM" times in the config file
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}

/// Get the platform-specific config file path
pub fn get_config_path() -> Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        Ok(PathBuf::from("/etc/smartboard-lock/config.yaml"))
    }

    #[cfg(target_os = "macos")]
    {
        Ok(PathBuf::from(
            "/Library/Application Support/smartboard-lock/config.yaml",
        ))
    }

    #[cfg(target_os = "windows")]
    {
        let mut path = PathBuf::from(
            std::env::var("ProgramData").unwrap_or_else(|_| "C:\\ProgramData".to_string()),
        );
        path.push("smartboard-lock");
        path.push("config.yaml");
        Ok(path)
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        anyhow::bail!("Unsupported operating system");
    }
}

/// Load configuration from YAML file
pub fn load_config(path: &Path) -> Result<LockConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: LockConfig = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))?;

    validate_config(&config)?;

    Ok(config)
}

/// Save configuration to YAML file
pub fn save_config(path: &Path, config: &LockConfig) -> Result<()> {
    // Validate before saving
    validate_config(config)?;

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
    }

    let content = serde_yaml::to_string(config).context("Failed to serialize config to YAML")?;

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;

    Ok(())
}

/// Validate configuration
pub fn validate_config(config: &LockConfig) -> Result<()> {
    if config.unlock.secret.is_empty() {
        anyhow::bail!("Unlock secret cannot be empty");
    }

    validate_timetable("standard", &config.schedule.standard)?;
    validate_timetable("friday", &config.schedule.friday)?;

    Ok(())
}

/// Validate one ordered timetable
fn validate_timetable(name: &str, periods: &[PeriodEntry]) -> Result<()> {
    for entry in periods {
        if entry.label.is_empty() {
            anyhow::bail!("Timetable '{}' has a period with an empty label", name);
        }

        if entry.start >= entry.end {
            anyhow::bail!(
                "Timetable '{}': period '{}' must start before it ends ({} >= {})",
                name,
                entry.label,
                entry.start.format("%H:%M"),
                entry.end.format("%H:%M"),
            );
        }
    }

    // Periods must be in order and not overlap; touching boundaries are
    // fine since ranges are inclusive on both ends.
    for pair in periods.windows(2) {
        if pair[1].start < pair[0].end {
            anyhow::bail!(
                "Timetable '{}': period '{}' overlaps '{}'",
                name,
                pair[1].label,
                pair[0].label,
            );
        }
    }

    Ok(())
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = include_str!("../example-config.yaml");

#[cfg(test)]
pub(crate) fn example_config() -> LockConfig {
    serde_yaml::from_str(EXAMPLE_CONFIG).expect("example config must parse")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn make_test_config() -> LockConfig {
        LockConfig {
            unlock: UnlockConfig {
                secret: "test_secret".to_string(),
            },
            schedule: ScheduleConfig {
                standard: vec![
                    PeriodEntry {
                        start: hm(8, 0),
                        end: hm(8, 40),
                        label: "1. Ders".to_string(),
                        icon: "📖".to_string(),
                        kind: PeriodKind::Lesson,
                    },
                    PeriodEntry {
                        start: hm(8, 40),
                        end: hm(8, 50),
                        label: "Teneffüs".to_string(),
                        icon: "☕".to_string(),
                        kind: PeriodKind::Break,
                    },
                ],
                friday: vec![],
            },
            notifications: NotificationConfig::default(),
        }
    }

    #[test]
    fn test_example_config_parses_and_validates() {
        let config = example_config();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.schedule.standard.len(), 15);
        assert_eq!(config.schedule.friday.len(), 15);
        assert_eq!(config.unlock.secret, "vertus_okul_2024");
    }

    #[test]
    fn test_example_lunch_differs_between_timetables() {
        let config = example_config();
        let standard_lunch = config
            .schedule
            .standard
            .iter()
            .find(|p| p.kind == PeriodKind::Lunch)
            .unwrap();
        let friday_lunch = config
            .schedule
            .friday
            .iter()
            .find(|p| p.kind == PeriodKind::Lunch)
            .unwrap();

        assert_eq!(standard_lunch.start, hm(12, 0));
        assert_eq!(friday_lunch.start, hm(12, 45));
    }

    #[test]
    fn test_validate_config_rejects_empty_secret() {
        let mut config = make_test_config();
        config.unlock.secret.clear();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_config_accepts_empty_timetables() {
        let mut config = make_test_config();
        config.schedule.standard.clear();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_rejects_inverted_period() {
        let mut config = make_test_config();
        config.schedule.standard[0].start = hm(9, 0);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_rejects_overlapping_periods() {
        let mut config = make_test_config();
        config.schedule.standard[1].start = hm(8, 30);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_touching_boundaries_are_ok() {
        let config = make_test_config();
        assert_eq!(
            config.schedule.standard[0].end,
            config.schedule.standard[1].start
        );
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_hhmm_roundtrip() {
        let config = make_test_config();
        let yaml = serde_yaml::to_string(&config).unwrap();

        let parsed: LockConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.schedule.standard, config.schedule.standard);
    }

    #[test]
    fn test_hhmm_accepts_seconds_suffix() {
        let yaml = r#"{ start: "08:00:00", end: "08:40", label: "1. Ders", kind: lesson }"#;
        let entry: PeriodEntry = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(entry.start, hm(8, 0));
        assert_eq!(entry.icon, "");
    }

    #[test]
    fn test_missing_schedule_defaults_to_empty() {
        let yaml = "unlock:\n  secret: abc\n";
        let config: LockConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.schedule.standard.is_empty());
        assert!(config.schedule.friday.is_empty());
        assert!(config.notifications.enabled);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let config = make_test_config();
        save_config(&path, &config).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.unlock.secret, config.unlock.secret);
        assert_eq!(loaded.schedule.standard, config.schedule.standard);
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(&dir.path().join("nope.yaml")).is_err());
    }
}
