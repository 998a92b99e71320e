use crate::engine::HighlightedSentence;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerOption {
    pub sentence_id: usize,
    pub text: String,
    pub correct: bool,
}

/// Everything the view needs to show a question.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presentation {
    pub sentence_id: usize,
    pub sentence: HighlightedSentence,
    /// The chosen context label, when the sentence has any.
    pub context: Option<String>,
    /// Shuffled choices in multiple-choice mode, `None` in free recall.
    pub options: Option<Vec<AnswerOption>>,
    pub attribution: Option<String>,
    pub attribution_url: Option<String>,
}

/// The learner's committed multiple-choice answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub sentence_id: usize,
    pub selected_id: usize,
    pub correct: bool,
}

/// View-side collaborator driven by [`SessionMachine`](super::SessionMachine).
pub trait Renderer {
    fn loading_changed(&mut self, loading: bool);

    /// `can_clear_filter` is set when the empty result comes from a user filter.
    fn no_results(&mut self, visible: bool, can_clear_filter: bool);

    fn present(&mut self, presentation: &Presentation);

    fn reveal(&mut self, answer: &str);

    /// Fire-and-forget; the view decides how to lock replay while playing.
    fn play_audio(&mut self, audio_ref: &str, lock_until_complete: bool);

    fn advance_enabled(&mut self, enabled: bool);

    /// Called once per question in multiple-choice mode, before `reveal`.
    fn graded(&mut self, _outcome: &Outcome) {}

    fn failed(&mut self, _message: &str) {}
}
