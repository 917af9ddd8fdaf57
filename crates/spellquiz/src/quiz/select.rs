//! Random quiz generation.

use rand::seq::IndexedRandom;
use rand::Rng;

use super::{QuizWord, WordBank};

/// Draw one word from every group of `bank`, in group order.
///
/// Groups without words are skipped; a validated bank has none.
pub fn select_words<R: Rng + ?Sized>(bank: &WordBank, rng: &mut R) -> Vec<QuizWord> {
    bank.groups
        .iter()
        .filter_map(|group| {
            group.words.choose(rng).map(|word| QuizWord {
                spellings: word.spellings.clone(),
                note: word.note.clone().unwrap_or_default(),
                level: group.level,
            })
        })
        .collect()
}
