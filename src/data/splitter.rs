// ============================================================
// Layer 4 — Train/Validation Splitter
// ============================================================
// Shuffles sentence pairs with the run's RNG and cuts them
// into a training slice and a held-out slice.
//
// Only the debug phrases are split here; parallel-text corpora
// ship their own validation files.
//
// Generated corpora are ordered (the debug phrases cycle in a
// fixed order), so the shuffle comes first. Seeded runs pass a
// seeded RNG and get the same split every time.

use rand::{seq::SliceRandom, Rng};

/// Shuffle `samples` and return `(train, val)`, with
/// `round(len * train_fraction)` items in `train`.
pub fn split_train_val<T, R: Rng + ?Sized>(
    mut samples:    Vec<T>,
    train_fraction: f64,
    rng:            &mut R,
) -> (Vec<T>, Vec<T>) {
    samples.shuffle(rng);

    let total    = samples.len();
    let split_at = (((total as f64) * train_fraction).round() as usize).min(total);
    let val      = samples.split_off(split_at);

    tracing::debug!("Split {} pairs into {} train / {} val", total, samples.len(), val.len());

    (samples, val)
}
