use rand::Rng;

use crate::corpus::CorpusIndex;

/// Draw up to `count` ids sharing `context` with `target`, excluding `target`.
/// Returned in draw order; fewer than `count` when the bucket runs out.
pub fn select_distractors<R: Rng + ?Sized>(
    index: &CorpusIndex,
    context: &str,
    target: usize,
    count: usize,
    rng: &mut R,
) -> Vec<usize> {
    let mut candidates: Vec<usize> = index
        .ids_for(context)
        .iter()
        .copied()
        .filter(|&id| id != target)
        .collect();

    let mut picked = Vec::with_capacity(count.min(candidates.len()));
    while picked.len() < count && !candidates.is_empty() {
        let idx = rng.gen_range(0..candidates.len());
        picked.push(candidates.swap_remove(idx));
    }
    picked
}
