use std::time::{Duration, Instant};

use crossterm::event::KeyEvent;
use log::{info, warn};

use reibun::config::Config;
use reibun::corpus::SentenceRecord;
use reibun::engine::FilterState;
use reibun::error::CorpusError;
use reibun::session::{Debouncer, Phase, SessionMachine};
use reibun::store::json_store::JsonStore;

use crate::audio::AudioPlayer;
use crate::ui::line_input::{InputResult, LineInput};
use crate::ui::theme::Theme;
use crate::view::QuizView;

pub struct App {
    pub session: SessionMachine,
    pub view: QuizView,
    pub config: Config,
    pub theme: &'static Theme,
    /// Live editor for the context filter, open while the user types.
    pub filter_input: Option<LineInput>,
    debouncer: Debouncer<String>,
    store: Option<JsonStore>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config, theme: &'static Theme, audio: AudioPlayer, filter: FilterState) -> Self {
        let mut session = SessionMachine::new(config.session_options());
        session.preset_filter(filter);

        let store = match JsonStore::new() {
            Ok(store) => Some(store),
            Err(e) => {
                warn!("data directory unavailable, progress will not load: {e}");
                None
            }
        };
        if let Some(ref s) = store {
            let srs = s.load_srs_data();
            info!("loaded progress for {} sentences", srs.len());
            session.set_srs_data(srs);
        }

        let view = QuizView::new(&config, audio);
        let debouncer = Debouncer::new(Duration::from_millis(config.filter_debounce_ms));

        Self {
            session,
            view,
            config,
            theme,
            filter_input: None,
            debouncer,
            store,
            should_quit: false,
        }
    }

    pub fn data_source(&self) -> &str {
        &self.config.data_source
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    /// Enter `Loading`; the caller kicks off the background fetch.
    pub fn begin_loading(&mut self) {
        self.session.begin_loading(&mut self.view);
    }

    pub fn on_corpus_loaded(&mut self, result: Result<Vec<SentenceRecord>, CorpusError>) {
        match result {
            Ok(sentences) => self.session.load_complete(sentences, &mut self.view),
            Err(e) => self.session.load_failed(&e, &mut self.view),
        }
    }

    pub fn start(&mut self) {
        self.session.start(&mut self.view);
    }

    /// Enter: move on when allowed, otherwise lift the blinder.
    pub fn confirm(&mut self) {
        if self.view.advance_enabled {
            self.session.advance(&mut self.view);
        } else {
            self.session.reveal(&mut self.view);
        }
    }

    pub fn replay_audio(&mut self) {
        self.session.replay_audio_requested(&mut self.view);
    }

    pub fn show_sentence(&mut self) {
        self.session.show_sentence();
    }

    /// Pick the option shown at `slot` (0-based).
    pub fn choose_option(&mut self, slot: usize) {
        let selected = self
            .session
            .state()
            .options
            .get(slot)
            .map(|o| o.sentence_id);
        if let Some(id) = selected {
            self.session.select_option(id, &mut self.view);
        }
    }

    pub fn cycle_source(&mut self) {
        let sources = self.session.index().source_list();
        if sources.is_empty() {
            return;
        }
        let current = &self.session.filter().source;
        let next = sources
            .iter()
            .position(|s| s == current)
            .map_or(0, |i| (i + 1) % sources.len());
        let source = sources[next].clone();
        self.session.set_source(source, &mut self.view);
    }

    pub fn adjust_level(&mut self, delta: i32) {
        let level = self.session.filter().min_level.saturating_add(delta).max(0);
        self.session.set_level(level, &mut self.view);
    }

    pub fn clear_filters(&mut self) {
        self.debouncer.cancel();
        self.filter_input = None;
        self.session.clear_filters(&mut self.view);
    }

    pub fn open_filter_input(&mut self) {
        if !self.session.options().filter_enabled {
            return;
        }
        let current = self.session.filter().text.clone().unwrap_or_default();
        let candidates = self
            .session
            .index()
            .contexts()
            .map(str::to_string)
            .collect();
        self.filter_input = Some(LineInput::new(&current, candidates));
    }

    pub fn filter_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Route a key to the open filter editor. Edits are debounced; Enter applies at once.
    pub fn handle_filter_key(&mut self, key: KeyEvent) {
        let Some(ref mut input) = self.filter_input else {
            return;
        };
        match input.handle(key) {
            InputResult::Continue => {}
            InputResult::Edited => {
                let text = input.value().to_string();
                self.debouncer.push(text, Instant::now());
            }
            InputResult::Submit => {
                let text = input.value().to_string();
                self.filter_input = None;
                self.debouncer.cancel();
                self.apply_filter_text(text);
            }
            InputResult::Cancel => {
                self.filter_input = None;
                self.debouncer.cancel();
            }
        }
    }

    fn apply_filter_text(&mut self, text: String) {
        let text = if text.trim().is_empty() { None } else { Some(text) };
        self.session.set_filter(text, &mut self.view);
    }

    pub fn on_tick(&mut self) {
        if let Some(text) = self.debouncer.poll(Instant::now()) {
            self.apply_filter_text(text);
        }
        self.view.audio.poll();
    }

    pub fn quit(&mut self) {
        if let Some(ref s) = self.store {
            if let Err(e) = s.save_srs_data(self.session.srs()) {
                warn!("failed to save progress: {e}");
            }
        }
        self.view.audio.stop();
        self.should_quit = true;
    }
}
