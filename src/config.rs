//! # Trainer Configuration
//!
//! Settings chosen by the host at construction or restart: which staff and notes to
//! drill, the tempo and rhythm of song mode, and the tuning constants of both judgement
//! loops. Configuration can be written as YAML:
//!
//! ```yaml
//! clef: grand
//! allowed-letters: C D E F G
//! index-range: [2, 14]
//! bpm: 96
//! rhythm: eighth
//! practice:
//!   base-time: 2.5
//! tuning:
//!   hit-window: 0.35
//! ```
//!
//! Values are never rejected for being out of range. [`TrainerConfig::sanitized`]
//! clamps them, and both engines sanitize whatever they are given.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::TrainerError;
use crate::note::{ClefMode, NoteLetter, StaffNote};
use crate::note_space::{self, TOP_SLOT};
use crate::practice::PRACTICE_TICK;
use crate::song::Rhythm;

pub const MIN_BPM: f64 = 30.0;
pub const MAX_BPM: f64 = 200.0;
pub const DEFAULT_BPM: f64 = 80.0;

/// Widest useful step distance: the span of the grand staff
pub const MAX_STEPWISE_DISTANCE: i64 = 2 * TOP_SLOT as i64;

/// Timing of the practice-mode question loop, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PracticeTiming {
    pub base_time: f64,
    pub bonus_per_combo: f64,
    pub max_time: f64,
    pub tick: f64,
    pub correct_delay: f64,
    pub miss_delay: f64,
}

impl Default for PracticeTiming {
    fn default() -> Self {
        Self {
            base_time: 2.0,
            bonus_per_combo: 0.2,
            max_time: 3.0,
            tick: PRACTICE_TICK,
            correct_delay: 0.2,
            miss_delay: 0.3,
        }
    }
}

impl PracticeTiming {
    /// Answer time allowed at a given combo: grows with the combo up to `max_time`
    pub fn time_limit(&self, combo: u32) -> f64 {
        (self.base_time + combo as f64 * self.bonus_per_combo).min(self.max_time)
    }

    fn sanitized(self) -> Self {
        let defaults = Self::default();
        let base_time = non_negative(self.base_time, defaults.base_time);
        Self {
            base_time,
            bonus_per_combo: non_negative(self.bonus_per_combo, defaults.bonus_per_combo),
            max_time: non_negative(self.max_time, defaults.max_time).max(base_time),
            tick: if self.tick.is_finite() && self.tick > 0.0 { self.tick } else { defaults.tick },
            correct_delay: non_negative(self.correct_delay, defaults.correct_delay),
            miss_delay: non_negative(self.miss_delay, defaults.miss_delay),
        }
    }
}

/// Product-tunable constants of judgement, generation and scrolling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Tuning {
    /// Seconds either side of a scheduled note in which a tap is judged
    pub hit_window: f64,
    /// Seconds after a scheduled note before it is missed automatically
    pub miss_window: f64,
    /// Probability that the generator restricts itself to nearby notes
    pub stepwise_bias: f64,
    /// Staff steps counted as "nearby"
    pub stepwise_distance: i64,
    pub scroll_reference_bpm: f64,
    pub scroll_min: f64,
    pub scroll_max: f64,
    pub scroll_exponent: f64,
    /// How long a host shows the judgement feedback
    pub judgement_pulse: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            hit_window: 0.42,
            miss_window: 0.42,
            stepwise_bias: 0.7,
            stepwise_distance: 2,
            scroll_reference_bpm: 80.0,
            scroll_min: 0.5,
            scroll_max: 3.0,
            scroll_exponent: 0.7,
            judgement_pulse: 0.45,
        }
    }
}

impl Tuning {
    /// Scroll speed relative to the reference tempo.
    ///
    /// Sub-linear in bpm, so faster tempos both move notes faster and pack them closer.
    ///
    /// # Example
    /// ```
    /// use sightread::Tuning;
    ///
    /// let tuning = Tuning::default();
    /// assert_eq!(tuning.scroll_speed_multiplier(80.0), 1.0);
    /// assert!((tuning.scroll_speed_multiplier(160.0) - 2f64.powf(0.7)).abs() < 1e-12);
    /// ```
    pub fn scroll_speed_multiplier(&self, bpm: f64) -> f64 {
        (bpm / self.scroll_reference_bpm)
            .clamp(self.scroll_min, self.scroll_max)
            .powf(self.scroll_exponent)
    }

    fn sanitized(self) -> Self {
        let defaults = Self::default();
        let scroll_min = positive(self.scroll_min, defaults.scroll_min);
        Self {
            hit_window: non_negative(self.hit_window, defaults.hit_window),
            miss_window: non_negative(self.miss_window, defaults.miss_window),
            stepwise_bias: if self.stepwise_bias.is_finite() {
                self.stepwise_bias.clamp(0.0, 1.0)
            } else {
                defaults.stepwise_bias
            },
            stepwise_distance: self.stepwise_distance.clamp(1, MAX_STEPWISE_DISTANCE),
            scroll_reference_bpm: positive(self.scroll_reference_bpm, defaults.scroll_reference_bpm),
            scroll_min,
            scroll_max: positive(self.scroll_max, defaults.scroll_max).max(scroll_min),
            scroll_exponent: non_negative(self.scroll_exponent, defaults.scroll_exponent),
            judgement_pulse: non_negative(self.judgement_pulse, defaults.judgement_pulse),
        }
    }
}

fn non_negative(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        fallback
    }
}

fn positive(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

/// Clamp a tempo to the playable range (non-finite values become the default)
pub fn clamp_bpm(bpm: f64) -> f64 {
    if !bpm.is_finite() {
        tracing::warn!(bpm, "non-finite bpm, using default");
        return DEFAULT_BPM;
    }
    let clamped = bpm.clamp(MIN_BPM, MAX_BPM);
    if clamped != bpm {
        tracing::warn!(bpm, clamped, "bpm out of range, clamped");
    }
    clamped
}

/// Validated trainer configuration
#[derive(Debug, Clone, PartialEq)]
pub struct TrainerConfig {
    pub clef: ClefMode,
    pub allowed_letters: Vec<NoteLetter>,
    /// Inclusive slot range, low to high
    pub index_range: (u8, u8),
    pub bpm: f64,
    pub rhythm: Rhythm,
    /// Seed for a reproducible note sequence
    pub seed: Option<u64>,
    pub practice: PracticeTiming,
    pub tuning: Tuning,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            clef: ClefMode::Treble,
            allowed_letters: NoteLetter::ALL.to_vec(),
            index_range: (0, TOP_SLOT),
            bpm: DEFAULT_BPM,
            rhythm: Rhythm::Quarter,
            seed: None,
            practice: PracticeTiming::default(),
            tuning: Tuning::default(),
        }
    }
}

/// Raw configuration for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case")]
pub struct RawConfig {
    pub clef: Option<ClefMode>,
    pub allowed_letters: Option<RawLetters>,
    pub index_range: Option<(i64, i64)>,
    pub bpm: Option<f64>,
    pub rhythm: Option<RawRhythm>,
    pub seed: Option<u64>,
    pub practice: Option<PracticeTiming>,
    pub tuning: Option<Tuning>,
}

/// `allowed-letters` as one string ("C E G") or a list ([C, E, G])
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum RawLetters {
    Text(String),
    List(Vec<String>),
}

/// `rhythm` as a name ("quarter") or a number of beats (1.5)
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum RawRhythm {
    Beats(f64),
    Name(String),
}

impl TrainerConfig {
    /// Parse YAML configuration; missing keys keep their defaults.
    ///
    /// # Example
    /// ```
    /// use sightread::{ClefMode, Rhythm, TrainerConfig};
    ///
    /// let config = TrainerConfig::from_yaml("clef: bass\nbpm: 250\nrhythm: half\n")?;
    /// assert_eq!(config.clef, ClefMode::Bass);
    /// assert_eq!(config.bpm, 200.0);
    /// assert_eq!(config.rhythm, Rhythm::Half);
    /// # Ok::<(), sightread::TrainerError>(())
    /// ```
    pub fn from_yaml(source: &str) -> Result<Self, TrainerError> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: RawConfig = serde_yaml::from_str(source)?;
        Self::from_raw(raw)
    }

    pub fn from_raw(raw: RawConfig) -> Result<Self, TrainerError> {
        let defaults = Self::default();

        let allowed_letters = match raw.allowed_letters {
            Some(RawLetters::Text(text)) => parse_letters(&text)?,
            Some(RawLetters::List(items)) => parse_letters(&items.concat())?,
            None => defaults.allowed_letters,
        };

        let rhythm = match raw.rhythm {
            Some(RawRhythm::Beats(beats)) => Rhythm::Custom(beats),
            Some(RawRhythm::Name(text)) => Rhythm::from_str(&text).ok_or_else(|| {
                TrainerError::ConfigError(format!(
                    "rhythm must be whole, half, quarter, eighth or a number of beats, got '{}'",
                    text
                ))
            })?,
            None => defaults.rhythm,
        };

        let config = Self {
            clef: raw.clef.unwrap_or(defaults.clef),
            allowed_letters,
            index_range: raw
                .index_range
                .map_or(defaults.index_range, |(low, high)| (clamp_slot(low), clamp_slot(high))),
            bpm: raw.bpm.unwrap_or(defaults.bpm),
            rhythm,
            seed: raw.seed,
            practice: raw.practice.unwrap_or_default(),
            tuning: raw.tuning.unwrap_or_default(),
        };
        Ok(config.sanitized())
    }

    /// Copy with every value clamped into its usable range
    pub fn sanitized(&self) -> Self {
        let (mut low, mut high) = self.index_range;
        if low > high {
            std::mem::swap(&mut low, &mut high);
        }
        let index_range = (low.min(TOP_SLOT), high.min(TOP_SLOT));

        let mut allowed_letters = self.allowed_letters.clone();
        allowed_letters.sort();
        allowed_letters.dedup();
        if allowed_letters.is_empty() {
            tracing::warn!("no allowed letters configured, allowing all");
            allowed_letters = NoteLetter::ALL.to_vec();
        }

        Self {
            clef: self.clef,
            allowed_letters,
            index_range,
            bpm: clamp_bpm(self.bpm),
            rhythm: self.rhythm.sanitized(),
            seed: self.seed,
            practice: self.practice.sanitized(),
            tuning: self.tuning.sanitized(),
        }
    }

    pub fn index_range(&self) -> RangeInclusive<u8> {
        self.index_range.0..=self.index_range.1
    }

    /// The note pool these settings select
    pub fn pool(&self) -> Vec<StaffNote> {
        note_space::pool(self.clef, &self.allowed_letters, self.index_range())
    }
}

/// Clamp a configured slot index onto the staff
fn clamp_slot(index: i64) -> u8 {
    let clamped = index.clamp(0, TOP_SLOT as i64);
    if clamped != index {
        tracing::warn!(index, clamped, "index-range end outside the staff, clamped");
    }
    clamped as u8
}

/// Parse a letter list such as "C D E", "c,e,g" or "CEG"
fn parse_letters(text: &str) -> Result<Vec<NoteLetter>, TrainerError> {
    text.chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .map(|c| {
            NoteLetter::from_char(c).ok_or_else(|| {
                TrainerError::ConfigError(format!("allowed-letters contains unknown letter '{}'", c))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrainerConfig::default();
        assert_eq!(config.bpm, 80.0);
        assert_eq!(config.index_range(), 0..=16);
        assert_eq!(config.allowed_letters.len(), 7);
        assert_eq!(config.tuning.hit_window, 0.42);
        assert_eq!(config.practice.base_time, 2.0);
    }

    #[test]
    fn test_time_limit_caps_at_max() {
        let timing = PracticeTiming::default();
        assert_eq!(timing.time_limit(0), 2.0);
        assert!((timing.time_limit(1) - 2.2).abs() < 1e-12);
        assert!((timing.time_limit(5) - 3.0).abs() < 1e-12);
        assert_eq!(timing.time_limit(10), 3.0);
    }

    #[test]
    fn test_scroll_speed_multiplier() {
        let tuning = Tuning::default();
        assert_eq!(tuning.scroll_speed_multiplier(80.0), 1.0);
        assert!((tuning.scroll_speed_multiplier(160.0) - 1.6245).abs() < 1e-4);
        // clamped at 0.5x and 3x of the reference tempo
        assert_eq!(tuning.scroll_speed_multiplier(10.0), 0.5f64.powf(0.7));
        assert_eq!(tuning.scroll_speed_multiplier(1000.0), 3.0f64.powf(0.7));
    }

    #[test]
    fn test_bpm_is_clamped() {
        assert_eq!(clamp_bpm(10.0), 30.0);
        assert_eq!(clamp_bpm(500.0), 200.0);
        assert_eq!(clamp_bpm(120.0), 120.0);
        assert_eq!(clamp_bpm(f64::NAN), DEFAULT_BPM);
    }

    #[test]
    fn test_sanitize_swaps_and_clamps_range() {
        let config = TrainerConfig {
            index_range: (20, 3),
            allowed_letters: vec![],
            ..TrainerConfig::default()
        }
        .sanitized();
        assert_eq!(config.index_range, (3, 16));
        assert_eq!(config.allowed_letters.len(), 7);
    }

    #[test]
    fn test_sanitize_tuning() {
        let config = TrainerConfig {
            tuning: Tuning {
                stepwise_bias: 1.5,
                hit_window: -1.0,
                scroll_max: 0.1,
                ..Tuning::default()
            },
            practice: PracticeTiming {
                tick: 0.0,
                max_time: 1.0,
                ..PracticeTiming::default()
            },
            ..TrainerConfig::default()
        }
        .sanitized();
        assert_eq!(config.tuning.stepwise_bias, 1.0);
        assert_eq!(config.tuning.hit_window, 0.0);
        assert_eq!(config.tuning.scroll_max, 0.5);
        assert_eq!(config.practice.tick, 0.05);
        assert_eq!(config.practice.max_time, 2.0);
    }

    #[test]
    fn test_from_yaml_full() {
        let yaml = r#"
clef: grand
allowed-letters: C, E, G
index-range: [2, 14]
bpm: 96
rhythm: eighth
seed: 7
practice:
  base-time: 2.5
tuning:
  hit-window: 0.35
  scroll-exponent: 1.0
"#;
        let config = TrainerConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.clef, ClefMode::Grand);
        assert_eq!(
            config.allowed_letters,
            vec![NoteLetter::C, NoteLetter::E, NoteLetter::G]
        );
        assert_eq!(config.index_range, (2, 14));
        assert_eq!(config.bpm, 96.0);
        assert_eq!(config.rhythm, Rhythm::Eighth);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.practice.base_time, 2.5);
        assert_eq!(config.practice.max_time, 3.0);
        assert_eq!(config.tuning.hit_window, 0.35);
        assert_eq!(config.tuning.miss_window, 0.42);
        assert_eq!(config.tuning.scroll_exponent, 1.0);
    }

    #[test]
    fn test_from_yaml_list_forms() {
        let config = TrainerConfig::from_yaml("allowed-letters: [g, D]\nrhythm: 1.5\n").unwrap();
        assert_eq!(config.allowed_letters, vec![NoteLetter::D, NoteLetter::G]);
        assert_eq!(config.rhythm, Rhythm::Custom(1.5));

        // a non-positive length falls back to quarter notes
        let config = TrainerConfig::from_yaml("rhythm: 0\n").unwrap();
        assert_eq!(config.rhythm, Rhythm::Quarter);
    }

    #[test]
    fn test_from_yaml_clamps_wide_integers() {
        let config = TrainerConfig::from_yaml("index-range: [-2, 20]\n").unwrap();
        assert_eq!(config.index_range, (0, 16));

        let config = TrainerConfig::from_yaml("index-range: [300, 5]\n").unwrap();
        assert_eq!(config.index_range, (5, 16));

        let config = TrainerConfig::from_yaml("tuning:\n  stepwise-distance: 5000000000\n").unwrap();
        assert_eq!(config.tuning.stepwise_distance, MAX_STEPWISE_DISTANCE);

        let config = TrainerConfig::from_yaml("tuning:\n  stepwise-distance: -3\n").unwrap();
        assert_eq!(config.tuning.stepwise_distance, 1);
    }

    #[test]
    fn test_from_yaml_empty_is_default() {
        assert_eq!(TrainerConfig::from_yaml("").unwrap(), TrainerConfig::default());
    }

    #[test]
    fn test_from_yaml_errors() {
        let err = TrainerConfig::from_yaml("allowed-letters: C H").unwrap_err();
        assert!(matches!(err, TrainerError::ConfigError(_)));
        assert!(err.to_string().contains("'H'"));

        let err = TrainerConfig::from_yaml("rhythm: dotted").unwrap_err();
        assert!(matches!(err, TrainerError::ConfigError(_)));

        let err = TrainerConfig::from_yaml("bpm: [1, 2]").unwrap_err();
        assert!(matches!(err, TrainerError::Yaml(_)));
    }

    #[test]
    fn test_pool_from_config() {
        let config = TrainerConfig {
            allowed_letters: vec![NoteLetter::F],
            ..TrainerConfig::default()
        };
        let names: Vec<String> = config.pool().iter().map(|n| n.name()).collect();
        assert_eq!(names, vec!["F4", "F5"]);
    }
}
