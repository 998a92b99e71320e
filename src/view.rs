use std::path::PathBuf;

use reibun::config::Config;
use reibun::session::{Outcome, Presentation, Renderer};

use crate::audio::AudioPlayer;

/// Terminal-side state the session machine renders into.
pub struct QuizView {
    pub loading: bool,
    pub no_results: bool,
    pub can_clear_filter: bool,
    pub presentation: Option<Presentation>,
    /// Set once the answer has been revealed.
    pub answer: Option<String>,
    pub advance_enabled: bool,
    pub outcome: Option<Outcome>,
    pub failure: Option<String>,
    pub audio: AudioPlayer,
    audio_dir: PathBuf,
    autoplay: bool,
    skip_next_play: bool,
    cue_correct: Option<PathBuf>,
    cue_incorrect: Option<PathBuf>,
}

impl QuizView {
    pub fn new(config: &Config, audio: AudioPlayer) -> Self {
        Self {
            loading: true,
            no_results: false,
            can_clear_filter: false,
            presentation: None,
            answer: None,
            advance_enabled: false,
            outcome: None,
            failure: None,
            audio,
            audio_dir: PathBuf::from(&config.audio_dir),
            autoplay: config.autoplay,
            skip_next_play: false,
            cue_correct: config.cue_correct.as_ref().map(PathBuf::from),
            cue_incorrect: config.cue_incorrect.as_ref().map(PathBuf::from),
        }
    }

    pub fn replay_locked(&self) -> bool {
        self.audio.is_locked()
    }
}

impl Renderer for QuizView {
    fn loading_changed(&mut self, loading: bool) {
        self.loading = loading;
        if loading {
            self.failure = None;
        }
    }

    fn no_results(&mut self, visible: bool, can_clear_filter: bool) {
        self.no_results = visible;
        self.can_clear_filter = can_clear_filter;
        if visible {
            self.presentation = None;
            self.answer = None;
            self.outcome = None;
            self.audio.stop();
        }
    }

    fn present(&mut self, presentation: &Presentation) {
        self.presentation = Some(presentation.clone());
        self.answer = None;
        self.outcome = None;
        self.no_results = false;
        // A new question cuts off whatever is still playing.
        self.audio.stop();
        self.skip_next_play = !self.autoplay;
    }

    fn reveal(&mut self, answer: &str) {
        self.answer = Some(answer.to_string());
    }

    fn play_audio(&mut self, audio_ref: &str, lock_until_complete: bool) {
        if std::mem::take(&mut self.skip_next_play) {
            return;
        }
        let path = self.audio_dir.join(audio_ref);
        self.audio.play(&path, lock_until_complete);
    }

    fn advance_enabled(&mut self, enabled: bool) {
        self.advance_enabled = enabled;
    }

    fn graded(&mut self, outcome: &Outcome) {
        self.outcome = Some(*outcome);
        let cue = if outcome.correct {
            self.cue_correct.clone()
        } else {
            self.cue_incorrect.clone()
        };
        if let Some(path) = cue {
            self.audio.stop();
            self.audio.play(&path, false);
        }
    }

    fn failed(&mut self, message: &str) {
        self.failure = Some(message.to_string());
    }
}
