use log::info;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::corpus::SentenceRecord;
use crate::engine::filter::FilterState;

/// Result of drawing from the pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Draw {
    Question(usize),
    /// Nothing in the corpus passes the current filter.
    Empty,
}

/// Shuffled queue of filter-eligible sentence ids, drawn from the back.
#[derive(Clone, Debug, Default)]
pub struct QuestionPool {
    pending: Vec<usize>,
    epoch: u64,
    epoch_size: usize,
}

/// Ids of every sentence passing `filter`, in corpus order.
pub fn eligible_ids(sentences: &[SentenceRecord], filter: &FilterState) -> Vec<usize> {
    sentences
        .iter()
        .filter(|s| filter.matches(s))
        .map(|s| s.id)
        .collect()
}

impl QuestionPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pool with a fresh shuffle of the eligible ids.
    pub fn rebuild<R: Rng + ?Sized>(
        &mut self,
        sentences: &[SentenceRecord],
        filter: &FilterState,
        rng: &mut R,
    ) {
        let mut ids = eligible_ids(sentences, filter);
        ids.shuffle(rng);
        self.epoch_size = ids.len();
        self.pending = ids;
        self.epoch += 1;
        info!(
            "question pool rebuilt (epoch {}): {} sentences",
            self.epoch,
            self.pending.len()
        );
    }

    /// Pop the next question, reshuffling from `filter` when the pool ran dry.
    pub fn draw<R: Rng + ?Sized>(
        &mut self,
        sentences: &[SentenceRecord],
        filter: &FilterState,
        rng: &mut R,
    ) -> Draw {
        if self.pending.is_empty() {
            self.rebuild(sentences, filter, rng);
        }
        match self.pending.pop() {
            Some(id) => Draw::Question(id),
            None => Draw::Empty,
        }
    }

    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of rebuilds so far.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Size of the current shuffle before any draws.
    pub fn epoch_size(&self) -> usize {
        self.epoch_size
    }

    /// Fraction of the current shuffle already drawn.
    pub fn progress(&self) -> f64 {
        if self.epoch_size == 0 {
            return 0.0;
        }
        (self.epoch_size - self.pending.len()) as f64 / self.epoch_size as f64
    }

    pub fn pending(&self) -> &[usize] {
        &self.pending
    }
}
