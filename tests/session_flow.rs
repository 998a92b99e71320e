use std::collections::{BTreeSet, HashSet};

use reibun::corpus::{ALL_SOURCES, CorpusIndex, SentenceRecord, load_corpus};
use reibun::engine::FilterState;
use reibun::session::{
    AnswerMode, Outcome, Phase, Presentation, Renderer, SessionMachine, SessionOptions,
};

const DEMO_CORPUS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/data.json");

#[derive(Default)]
struct Recorder {
    loading: Vec<bool>,
    no_results: Vec<(bool, bool)>,
    presented: Vec<Presentation>,
    revealed: Vec<String>,
    audio: Vec<(String, bool)>,
    advance: Vec<bool>,
    graded: Vec<Outcome>,
    failures: Vec<String>,
}

impl Renderer for Recorder {
    fn loading_changed(&mut self, loading: bool) {
        self.loading.push(loading);
    }
    fn no_results(&mut self, visible: bool, can_clear_filter: bool) {
        self.no_results.push((visible, can_clear_filter));
    }
    fn present(&mut self, presentation: &Presentation) {
        self.presented.push(presentation.clone());
    }
    fn reveal(&mut self, answer: &str) {
        self.revealed.push(answer.to_string());
    }
    fn play_audio(&mut self, audio_ref: &str, lock: bool) {
        self.audio.push((audio_ref.to_string(), lock));
    }
    fn advance_enabled(&mut self, enabled: bool) {
        self.advance.push(enabled);
    }
    fn graded(&mut self, outcome: &Outcome) {
        self.graded.push(*outcome);
    }
    fn failed(&mut self, message: &str) {
        self.failures.push(message.to_string());
    }
}

fn demo_sentences() -> Vec<SentenceRecord> {
    load_corpus(DEMO_CORPUS).unwrap()
}

fn session(mode: AnswerMode, filter: FilterState, seed: u64) -> (SessionMachine, Recorder) {
    let options = SessionOptions {
        answer_mode: mode,
        ..SessionOptions::default()
    };
    let mut machine = SessionMachine::with_seed(options, seed);
    let mut recorder = Recorder::default();
    machine.preset_filter(filter);
    machine.load_complete(demo_sentences(), &mut recorder);
    (machine, recorder)
}

fn text_filter(text: &str, min_level: i32) -> FilterState {
    FilterState {
        text: Some(text.to_string()),
        source: ALL_SOURCES.to_string(),
        min_level,
    }
}

#[test]
fn demo_corpus_builds_index() {
    let sentences = demo_sentences();
    assert_eq!(sentences.len(), 12);
    assert!(sentences.iter().enumerate().all(|(i, s)| s.id == i));

    let index = CorpusIndex::build(&sentences);
    assert_eq!(
        index.source_list(),
        vec![ALL_SOURCES, "Tatoeba", "NHK News Web Easy"]
    );
    assert_eq!(index.ids_for("ている"), &[1, 4, 5, 8, 11]);
    assert_eq!(index.ids_for("ば〜ほど"), &[3, 7]);
    assert!(index.ids_for("存在しない").is_empty());

    // Sentence 6 carries no level and counts as the default.
    assert_eq!(sentences[6].level, None);
    assert_eq!(sentences[6].level(), 5);
}

#[test]
fn default_filter_pool_holds_exactly_eligible_ids() {
    let (machine, _) = session(AnswerMode::FreeRecall, FilterState::default(), 3);
    let pending: BTreeSet<usize> = machine.pool().pending().iter().copied().collect();
    let expected: BTreeSet<usize> = [0, 1, 2, 3, 4, 5, 6, 7, 10, 11].into_iter().collect();
    assert_eq!(pending, expected);
    assert_eq!(machine.pool().remaining(), expected.len());
}

#[test]
fn free_recall_cycles_whole_epoch_before_repeating() {
    let (mut machine, mut recorder) = session(AnswerMode::FreeRecall, FilterState::default(), 7);
    machine.start(&mut recorder);
    for _ in 0..9 {
        assert_eq!(machine.phase(), Phase::Presenting);
        machine.reveal(&mut recorder);
        assert_eq!(machine.phase(), Phase::Revealed);
        machine.advance(&mut recorder);
    }

    let seen: HashSet<usize> = recorder.presented.iter().map(|p| p.sentence_id).collect();
    assert_eq!(recorder.presented.len(), 10);
    assert_eq!(seen.len(), 10);
    assert_eq!(machine.pool().epoch(), 1);
    assert_eq!(recorder.revealed.len(), 9);

    // Exhausted pool reshuffles on the next draw.
    machine.reveal(&mut recorder);
    machine.advance(&mut recorder);
    assert_eq!(machine.pool().epoch(), 2);
    assert_eq!(machine.pool().remaining(), 9);
    assert_eq!(machine.phase(), Phase::Presenting);

    // Every question asked for audio with replay locked.
    assert!(recorder.audio.iter().all(|(_, lock)| *lock));
}

#[test]
fn revealed_answer_is_the_translation() {
    let (mut machine, mut recorder) = session(AnswerMode::FreeRecall, text_filter("ながら", 0), 5);
    machine.start(&mut recorder);
    machine.reveal(&mut recorder);

    let id = recorder.presented[0].sentence_id;
    let expected = &machine.sentence(id).unwrap().translation;
    assert_eq!(recorder.revealed, vec![expected.clone()]);
    assert_eq!(recorder.advance, vec![false, true]);
}

#[test]
fn composite_context_emphasizes_every_part() {
    let (mut machine, mut recorder) = session(AnswerMode::FreeRecall, text_filter("ば〜ほど", 0), 1);
    machine.start(&mut recorder);

    let shown = &recorder.presented[0];
    assert!([3, 7].contains(&shown.sentence_id));
    assert_eq!(shown.context.as_deref(), Some("ば〜ほど"));
    assert_eq!(shown.sentence.emphasis_keys(), vec!["1a", "1b"]);
    assert!(!shown.sentence.plain_text().contains('{'));
    let emphasized: Vec<&str> = shown
        .sentence
        .segments
        .iter()
        .filter(|s| s.is_emphasized())
        .map(|s| s.text.as_str())
        .collect();
    assert_eq!(emphasized, vec!["ば", "ほど"]);
}

#[test]
fn multiple_choice_offers_distractors_from_shared_context() {
    let (mut machine, mut recorder) =
        session(AnswerMode::MultipleChoice, text_filter("ている", 0), 21);
    machine.start(&mut recorder);

    let shown = recorder.presented[0].clone();
    let context = shown.context.clone().unwrap();
    let options = shown.options.clone().unwrap();
    let bucket = machine.index().ids_for(&context).to_vec();

    assert_eq!(options.len(), bucket.len().min(4));
    assert_eq!(options.iter().filter(|o| o.correct).count(), 1);
    assert!(options.iter().all(|o| bucket.contains(&o.sentence_id)));
    let distinct: HashSet<usize> = options.iter().map(|o| o.sentence_id).collect();
    assert_eq!(distinct.len(), options.len());
    assert!(machine.state().sentence_shown);

    let wrong = options.iter().find(|o| !o.correct).map(|o| o.sentence_id);
    let pick = wrong.unwrap_or(shown.sentence_id);
    let outcome = machine.select_option(pick, &mut recorder).unwrap();
    assert_eq!(outcome.correct, pick == shown.sentence_id);
    assert_eq!(recorder.graded, vec![outcome]);
    assert_eq!(machine.phase(), Phase::Revealed);

    // Options lock after the first pick.
    assert!(machine.select_option(shown.sentence_id, &mut recorder).is_none());
    assert_eq!(recorder.graded.len(), 1);
}

#[test]
fn unsatisfiable_filter_reaches_no_results_and_recovers() {
    let (mut machine, mut recorder) = session(AnswerMode::FreeRecall, FilterState::default(), 9);
    machine.start(&mut recorder);

    machine.set_filter(Some("かもしれない".to_string()), &mut recorder);
    assert_eq!(machine.phase(), Phase::Presenting);
    assert_eq!(recorder.presented.last().unwrap().sentence_id, 10);

    machine.set_level(7, &mut recorder);
    assert_eq!(machine.phase(), Phase::NoResults);
    assert_eq!(recorder.no_results.last(), Some(&(true, true)));
    assert!(machine.state().current_sentence.is_none());

    // Advancing out of an empty pool stays empty.
    machine.advance(&mut recorder);
    assert_eq!(machine.phase(), Phase::NoResults);

    machine.clear_filters(&mut recorder);
    assert_eq!(machine.phase(), Phase::Presenting);
    assert_eq!(recorder.no_results.last(), Some(&(false, false)));
    assert!(machine.filter().is_default());
}

#[test]
fn filter_change_mid_question_discards_reveal() {
    let (mut machine, mut recorder) = session(AnswerMode::FreeRecall, FilterState::default(), 13);
    machine.start(&mut recorder);
    machine.reveal(&mut recorder);
    assert!(machine.state().revealed);

    machine.set_filter(Some("ながら".to_string()), &mut recorder);
    assert_eq!(machine.phase(), Phase::Presenting);
    assert!(!machine.state().revealed);
    let current = machine.state().current_sentence.unwrap();
    assert!([2, 5].contains(&current));
    assert_eq!(recorder.advance.last(), Some(&false));
}

#[test]
fn source_filter_keeps_only_that_attribution() {
    let filter = FilterState {
        source: "NHK News Web Easy".to_string(),
        ..FilterState::default()
    };
    let (mut machine, mut recorder) = session(AnswerMode::FreeRecall, filter, 17);
    machine.start(&mut recorder);
    machine.reveal(&mut recorder);
    machine.advance(&mut recorder);

    let ids: BTreeSet<usize> = recorder.presented.iter().map(|p| p.sentence_id).collect();
    assert_eq!(ids, [4, 7].into_iter().collect());
    assert!(
        recorder
            .presented
            .iter()
            .all(|p| p.attribution.as_deref() == Some("NHK News Web Easy"))
    );
}

#[test]
fn missing_corpus_fails_and_blocks_start() {
    let err = load_corpus(concat!(env!("CARGO_MANIFEST_DIR"), "/demos/missing.json")).unwrap_err();

    let mut machine = SessionMachine::with_seed(SessionOptions::default(), 1);
    let mut recorder = Recorder::default();
    machine.load_failed(&err, &mut recorder);
    assert_eq!(machine.phase(), Phase::Failed);
    assert_eq!(recorder.failures.len(), 1);
    assert!(recorder.failures[0].contains("missing.json"));

    machine.start(&mut recorder);
    assert!(recorder.presented.is_empty());

    // Retrying goes back through Loading.
    machine.begin_loading(&mut recorder);
    machine.load_complete(demo_sentences(), &mut recorder);
    assert_eq!(machine.phase(), Phase::Ready);
    assert_eq!(recorder.loading, vec![false, true, false]);
}
