//! # Practice Mode
//!
//! Endless drill: the engine asks for one note at a time and times the answer.
//!
//! ## Sub-modules
//! - `types` - QuestionState, PracticePhase, PracticeSnapshot
//! - `engine` - the countdown judgement loop
//!
//! ## Timing
//!
//! | Constant        | Default | Meaning                                   |
//! |-----------------|---------|-------------------------------------------|
//! | base-time       | 2.0 s   | answer time at combo 0                    |
//! | bonus-per-combo | 0.2 s   | extra time per consecutive correct answer |
//! | max-time        | 3.0 s   | cap on the answer time                    |
//! | tick            | 0.05 s  | clock step                                |
//! | correct-delay   | 0.2 s   | pause after a correct answer              |
//! | miss-delay      | 0.3 s   | pause after a wrong answer or timeout     |
//!
//! A timeout counts as a wrong answer and resets the combo.
//!
//! ## Example
//! ```rust
//! use sightread::practice::{PracticePhase, TimedQuestionEngine};
//! use sightread::{Judgement, NoteLetter, TrainerConfig};
//!
//! let config = TrainerConfig::from_yaml("allowed-letters: C\nseed: 1\n")?;
//! let mut engine = TimedQuestionEngine::new(config);
//! engine.start();
//!
//! assert_eq!(engine.select(NoteLetter::C), Some(Judgement::Perfect));
//! assert_eq!(engine.snapshot().phase, PracticePhase::Locked);
//!
//! // 0.2 s later the next question is up, with 0.2 s more to answer it
//! for _ in 0..4 {
//!     engine.tick();
//! }
//! assert_eq!(engine.snapshot().phase, PracticePhase::Armed);
//! assert!((engine.time_limit() - 2.2).abs() < 1e-9);
//! # Ok::<(), sightread::TrainerError>(())
//! ```

mod engine;
mod types;


pub use engine::{TimedQuestionEngine, PRACTICE_TICK};
pub use types::{PracticePhase, PracticeSnapshot, QuestionState};
