use log::{debug, error, info};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::corpus::{CorpusIndex, SentenceRecord};
use crate::engine::distractor::select_distractors;
use crate::engine::{Draw, FilterState, HighlightedSentence, QuestionPool, highlight};
use crate::error::CorpusError;
use crate::session::render::{AnswerOption, Outcome, Presentation, Renderer};
use crate::session::{AnswerMode, SessionOptions};
use crate::store::schema::SrsData;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Loading,
    /// Corpus loaded, no question shown yet.
    Ready,
    Presenting,
    Revealed,
    NoResults,
    Failed,
}

/// Per-question state. Never persisted.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    pub current_sentence: Option<usize>,
    /// Index into the current sentence's contexts chosen for highlighting.
    pub context_index: Option<usize>,
    pub revealed: bool,
    pub answer_locked: bool,
    pub sentence_shown: bool,
    pub answer: String,
    pub highlight: HighlightedSentence,
    pub options: Vec<AnswerOption>,
    pub last_outcome: Option<Outcome>,
    pub num_learned: u32,
    pub new_per_day: u32,
}

impl SessionState {
    fn new() -> Self {
        Self {
            new_per_day: 10,
            ..Self::default()
        }
    }

    /// Drop everything tied to the current question, keeping progress counters.
    fn clear_question(&mut self) {
        self.current_sentence = None;
        self.context_index = None;
        self.revealed = false;
        self.answer_locked = false;
        self.sentence_shown = false;
        self.answer.clear();
        self.highlight = HighlightedSentence::default();
        self.options.clear();
        self.last_outcome = None;
    }

}

/// Orchestrates the select -> present -> reveal -> advance cycle.
///
/// Every trigger takes the [`Renderer`] explicitly and runs to completion.
pub struct SessionMachine {
    options: SessionOptions,
    phase: Phase,
    sentences: Vec<SentenceRecord>,
    index: CorpusIndex,
    filter: FilterState,
    pool: QuestionPool,
    state: SessionState,
    srs: SrsData,
    rng: SmallRng,
}

impl SessionMachine {
    pub fn new(options: SessionOptions) -> Self {
        Self::with_rng(options, SmallRng::from_entropy())
    }

    pub fn with_seed(options: SessionOptions, seed: u64) -> Self {
        Self::with_rng(options, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(options: SessionOptions, rng: SmallRng) -> Self {
        Self {
            options,
            phase: Phase::Loading,
            sentences: Vec::new(),
            index: CorpusIndex::default(),
            filter: FilterState::default(),
            pool: QuestionPool::new(),
            state: SessionState::new(),
            srs: SrsData::default(),
            rng,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn index(&self) -> &CorpusIndex {
        &self.index
    }

    pub fn sentences(&self) -> &[SentenceRecord] {
        &self.sentences
    }

    pub fn sentence(&self, id: usize) -> Option<&SentenceRecord> {
        self.sentences.get(id)
    }

    pub fn current_sentence(&self) -> Option<&SentenceRecord> {
        self.state.current_sentence.and_then(|id| self.sentences.get(id))
    }

    pub fn pool(&self) -> &QuestionPool {
        &self.pool
    }

    pub fn srs(&self) -> &SrsData {
        &self.srs
    }

    pub fn set_srs_data(&mut self, srs: SrsData) {
        self.srs = srs;
    }

    /// Seed the filter before the corpus arrives (e.g. from the command line).
    pub fn preset_filter(&mut self, filter: FilterState) {
        self.filter = filter;
    }

    fn is_loaded(&self) -> bool {
        !matches!(self.phase, Phase::Loading | Phase::Failed)
    }

    /// Re-enter `Loading`, e.g. before retrying a failed load.
    pub fn begin_loading(&mut self, renderer: &mut impl Renderer) {
        self.phase = Phase::Loading;
        self.state.clear_question();
        renderer.loading_changed(true);
    }

    pub fn load_complete(&mut self, sentences: Vec<SentenceRecord>, renderer: &mut impl Renderer) {
        if self.phase != Phase::Loading {
            debug!("ignoring corpus load outside Loading ({:?})", self.phase);
            return;
        }
        self.index = CorpusIndex::build(&sentences);
        self.sentences = sentences;
        info!(
            "corpus ready: {} sentences, {} contexts",
            self.sentences.len(),
            self.index.context_count()
        );
        let filter = self.effective_filter();
        self.pool.rebuild(&self.sentences, &filter, &mut self.rng);
        self.phase = Phase::Ready;
        renderer.loading_changed(false);
    }

    pub fn load_failed(&mut self, err: &CorpusError, renderer: &mut impl Renderer) {
        error!("corpus load failed: {err}");
        self.phase = Phase::Failed;
        renderer.loading_changed(false);
        renderer.failed(&err.to_string());
    }

    /// Leave the no-question state. A question in progress is never skipped.
    pub fn start(&mut self, renderer: &mut impl Renderer) {
        match self.phase {
            Phase::Ready | Phase::NoResults => self.present_next(renderer),
            other => debug!("start ignored while {other:?}"),
        }
    }

    /// Move on to the next question. Only allowed once the current one is revealed.
    pub fn advance(&mut self, renderer: &mut impl Renderer) {
        match self.phase {
            Phase::Ready | Phase::Revealed | Phase::NoResults => self.present_next(renderer),
            other => debug!("advance ignored while {other:?}"),
        }
    }

    /// Lift the blinder in free-recall mode.
    pub fn reveal(&mut self, renderer: &mut impl Renderer) {
        if self.phase != Phase::Presenting || self.options.answer_mode != AnswerMode::FreeRecall {
            return;
        }
        self.state.revealed = true;
        self.phase = Phase::Revealed;
        renderer.reveal(&self.state.answer);
        renderer.advance_enabled(true);
    }

    /// Commit a multiple-choice answer. Returns the recorded outcome.
    pub fn select_option(
        &mut self,
        selected_id: usize,
        renderer: &mut impl Renderer,
    ) -> Option<Outcome> {
        if self.phase != Phase::Presenting
            || self.options.answer_mode != AnswerMode::MultipleChoice
            || self.state.answer_locked
        {
            return None;
        }
        let target = self.state.current_sentence?;
        if !self
            .state
            .options
            .iter()
            .any(|o| o.sentence_id == selected_id)
        {
            debug!("option {selected_id} is not offered for sentence {target}");
            return None;
        }

        let outcome = Outcome {
            sentence_id: target,
            selected_id,
            correct: selected_id == target,
        };
        debug!("sentence {target}: selected {selected_id} (correct: {})", outcome.correct);
        self.state.answer_locked = true;
        self.state.revealed = true;
        self.state.last_outcome = Some(outcome);
        self.phase = Phase::Revealed;

        renderer.graded(&outcome);
        renderer.reveal(&self.state.answer);
        renderer.advance_enabled(true);
        Some(outcome)
    }

    pub fn replay_audio_requested(&mut self, renderer: &mut impl Renderer) {
        if let Some(sentence) = self.current_sentence() {
            renderer.play_audio(&sentence.audio_ref, true);
        }
    }

    /// Unhide the example sentence. Returns whether anything changed.
    pub fn show_sentence(&mut self) -> bool {
        if self.state.current_sentence.is_none() || self.state.sentence_shown {
            return false;
        }
        self.state.sentence_shown = true;
        true
    }

    pub fn set_filter(&mut self, text: Option<String>, renderer: &mut impl Renderer) {
        self.update_filter(|f| f.text = text, renderer);
    }

    pub fn set_source(&mut self, source: String, renderer: &mut impl Renderer) {
        self.update_filter(|f| f.source = source, renderer);
    }

    pub fn set_level(&mut self, level: i32, renderer: &mut impl Renderer) {
        self.update_filter(|f| f.min_level = level, renderer);
    }

    /// Reset all filters to their defaults.
    pub fn clear_filters(&mut self, renderer: &mut impl Renderer) {
        self.update_filter(|f| *f = FilterState::default(), renderer);
    }

    fn update_filter(&mut self, change: impl FnOnce(&mut FilterState), renderer: &mut impl Renderer) {
        if !self.options.filter_enabled {
            debug!("filter change ignored: filtering disabled");
            return;
        }
        if !self.is_loaded() {
            debug!("filter change ignored while {:?}", self.phase);
            return;
        }
        change(&mut self.filter);
        debug!("filter changed: {:?}", self.filter);
        let filter = self.effective_filter();
        self.pool.rebuild(&self.sentences, &filter, &mut self.rng);
        self.present_next(renderer);
    }

    /// The filter the pool is built from; everything passes when filtering is off.
    fn effective_filter(&self) -> FilterState {
        if self.options.filter_enabled {
            self.filter.clone()
        } else {
            FilterState {
                min_level: i32::MIN,
                ..FilterState::default()
            }
        }
    }

    fn present_next(&mut self, renderer: &mut impl Renderer) {
        let was_empty = self.phase == Phase::NoResults;
        let filter = self.effective_filter();
        match self.pool.draw(&self.sentences, &filter, &mut self.rng) {
            Draw::Question(id) => {
                if was_empty {
                    renderer.no_results(false, false);
                }
                self.present(id, renderer);
            }
            Draw::Empty => {
                info!("no sentences match {:?}", self.filter);
                self.state.clear_question();
                self.phase = Phase::NoResults;
                renderer.advance_enabled(false);
                renderer.no_results(true, self.filter.is_filtered());
            }
        }
    }

    fn present(&mut self, id: usize, renderer: &mut impl Renderer) {
        let Some(sentence) = self.sentences.get(id) else {
            return;
        };

        let context_index = if sentence.contexts.is_empty() {
            None
        } else {
            Some(self.rng.gen_range(0..sentence.contexts.len()))
        };
        let highlighted = highlight(
            &sentence.text,
            &sentence.contexts,
            context_index.unwrap_or(0),
        );
        let context = context_index.map(|i| sentence.contexts[i].clone());

        let options = match self.options.answer_mode {
            AnswerMode::FreeRecall => Vec::new(),
            AnswerMode::MultipleChoice => {
                let distractors = match context.as_deref() {
                    Some(label) => select_distractors(
                        &self.index,
                        label,
                        id,
                        self.options.distractor_count,
                        &mut self.rng,
                    ),
                    None => Vec::new(),
                };
                let mut options: Vec<AnswerOption> = std::iter::once(id)
                    .chain(distractors)
                    .filter_map(|option_id| self.sentences.get(option_id))
                    .map(|s| AnswerOption {
                        sentence_id: s.id,
                        text: s.translation.clone(),
                        correct: s.id == id,
                    })
                    .collect();
                options.shuffle(&mut self.rng);
                options
            }
        };

        let presentation = Presentation {
            sentence_id: id,
            sentence: highlighted.clone(),
            context,
            options: match self.options.answer_mode {
                AnswerMode::FreeRecall => None,
                AnswerMode::MultipleChoice => Some(options.clone()),
            },
            attribution: sentence.attribution.clone(),
            attribution_url: sentence.attribution_url.clone(),
        };
        let audio_ref = sentence.audio_ref.clone();

        self.state.clear_question();
        self.state.current_sentence = Some(id);
        self.state.context_index = context_index;
        self.state.answer = sentence.translation.clone();
        self.state.highlight = highlighted;
        self.state.options = options;
        self.state.sentence_shown = self.options.answer_mode == AnswerMode::MultipleChoice;
        self.phase = Phase::Presenting;
        debug!("presenting sentence {id} (context {context_index:?})");

        renderer.present(&presentation);
        renderer.advance_enabled(false);
        renderer.play_audio(&audio_ref, true);
    }
}
