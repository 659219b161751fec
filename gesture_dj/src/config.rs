//! TOML configuration — calibration constants, debounce, MIDI table.
//!
//! Every field has a default, so an empty file (or no file) is valid.
//!
//! ```toml
//! [classifier]
//! extension_ratio = 1.0
//! thumb_margin    = 0.0
//! mirrored        = true
//!
//! [control]
//! debounce_ms     = 600
//! resend_on_entry = false
//!
//! [midi]
//! client_name   = "gesture_dj"
//! port          = "loopMIDI"
//! play_velocity = 127
//!
//! [midi.left]
//! channel = 0
//! volume_cc = 1
//! low_eq_cc = 2
//! mid_eq_cc = 3
//! high_eq_cc = 4
//! play_note = 60
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use hand_pose::ExtensionRule;
use dj_midi::{MidiMap, SideMapping};

use crate::error::{GestureDjError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub classifier: ExtensionRule,
    #[serde(default)]
    pub control: ControlConfig,
    #[serde(default)]
    pub midi: MidiConfig,
}

// ════════════════════════════════════════════════════════════════════════════
// [control]
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControlConfig {
    /// Minimum time between two accepted play presses on one hand.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Resend a control's value when its gesture is (re)entered, even if
    /// unchanged.
    #[serde(default)]
    pub resend_on_entry: bool,
}

fn default_debounce_ms() -> u64 { 600 }

impl Default for ControlConfig {
    fn default() -> Self {
        ControlConfig {
            debounce_ms:     default_debounce_ms(),
            resend_on_entry: false,
        }
    }
}

impl ControlConfig {
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// [midi]
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MidiConfig {
    /// Client name shown to other MIDI applications.
    #[serde(default = "default_client_name")]
    pub client_name: String,
    /// Substring of the output port to open; first port when unset.
    #[serde(default)]
    pub port: Option<String>,
    #[serde(default = "default_play_velocity")]
    pub play_velocity: u8,
    #[serde(default = "default_left")]
    pub left: SideMapping,
    #[serde(default = "default_right")]
    pub right: SideMapping,
}

fn default_client_name() -> String { "gesture_dj".to_string() }
fn default_play_velocity() -> u8 { MidiMap::default().play_velocity }
fn default_left() -> SideMapping { MidiMap::default().left }
fn default_right() -> SideMapping { MidiMap::default().right }

impl Default for MidiConfig {
    fn default() -> Self {
        MidiConfig {
            client_name:   default_client_name(),
            port:          None,
            play_velocity: default_play_velocity(),
            left:          default_left(),
            right:         default_right(),
        }
    }
}

impl MidiConfig {
    pub fn map(&self) -> MidiMap {
        MidiMap {
            left:          self.left,
            right:         self.right,
            play_velocity: self.play_velocity,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Loading + validation
// ════════════════════════════════════════════════════════════════════════════

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            GestureDjError::Config(format!("cannot read '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| GestureDjError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let rule = &self.classifier;
        if !(rule.extension_ratio.is_finite() && rule.extension_ratio > 0.0) {
            return Err(GestureDjError::Config(format!(
                "classifier.extension_ratio must be a positive number, got {}",
                rule.extension_ratio
            )));
        }
        if !(rule.thumb_margin.is_finite() && rule.thumb_margin >= 0.0) {
            return Err(GestureDjError::Config(format!(
                "classifier.thumb_margin must be zero or positive, got {}",
                rule.thumb_margin
            )));
        }
        self.midi.map().validate()?;
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use hand_pose::HandSide;
    use dj_midi::ControlId;
    use std::io::Write;

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg = Config::from_toml_str("").unwrap();
        assert_eq!(cfg.classifier, ExtensionRule::default());
        assert_eq!(cfg.control, ControlConfig::default());
        assert_eq!(cfg.control.debounce_window(), Duration::from_millis(600));
        assert_eq!(cfg.midi.map(), MidiMap::default());
        assert_eq!(cfg.midi.client_name, "gesture_dj");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg = Config::from_toml_str(
            "[control]\ndebounce_ms = 500\n\n[classifier]\nthumb_margin = 0.02\n",
        ).unwrap();
        assert_eq!(cfg.control.debounce_ms, 500);
        assert!(!cfg.control.resend_on_entry);
        assert_eq!(cfg.classifier.thumb_margin, 0.02);
        assert_eq!(cfg.classifier.extension_ratio, 1.0);
    }

    #[test]
    fn deck_tables_override_addresses() {
        let cfg = Config::from_toml_str(r#"
            [midi]
            port = "loopMIDI"

            [midi.right]
            channel = 1
            volume_cc = 21
            low_eq_cc = 22
            mid_eq_cc = 23
            high_eq_cc = 24
            play_note = 61
        "#).unwrap();
        assert_eq!(cfg.midi.port.as_deref(), Some("loopMIDI"));
        let map = cfg.midi.map();
        assert_eq!(map.address(HandSide::Right, ControlId::MidEq), (1, 23));
        assert_eq!(map.address(HandSide::Left, ControlId::MidEq), (0, 3));
    }

    #[test]
    fn incomplete_deck_table_is_rejected() {
        let err = Config::from_toml_str("[midi.left]\nchannel = 2\n").unwrap_err();
        assert!(matches!(err, GestureDjError::Config(_)));
    }

    #[test]
    fn colliding_decks_are_rejected() {
        let err = Config::from_toml_str(r#"
            [midi.right]
            channel = 0
            volume_cc = 1
            low_eq_cc = 12
            mid_eq_cc = 13
            high_eq_cc = 14
            play_note = 70
        "#).unwrap_err();
        assert!(matches!(err, GestureDjError::Midi(_)));
    }

    #[test]
    fn nonsense_ratio_is_rejected() {
        assert!(Config::from_toml_str("[classifier]\nextension_ratio = 0.0\n").is_err());
        assert!(Config::from_toml_str("[classifier]\nthumb_margin = -0.1\n").is_err());
    }

    #[test]
    fn unknown_section_is_rejected() {
        assert!(Config::from_toml_str("[camera]\nindex = 0\n").is_err());
    }

    #[test]
    fn misspelled_keys_are_rejected() {
        assert!(Config::from_toml_str("[control]\ndebounce = 500\n").is_err());
        assert!(Config::from_toml_str("[midi]\nport_name = \"loop\"\n").is_err());
        assert!(Config::from_toml_str("[classifier]\nratio = 1.2\n").is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[control]\nresend_on_entry = true").unwrap();
        let cfg = Config::load(file.path()).unwrap();
        assert!(cfg.control.resend_on_entry);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, GestureDjError::Config(_)));
    }
}
