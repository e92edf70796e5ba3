//! Card board for one level.
//!
//! A board holds two cards per term/definition pair in shuffled order, the
//! flipped / matched state of each card, and the pending selection (at most
//! two face-up cards waiting for resolution). Everything here is synchronous:
//! the delays between "two cards face up" and "resolved" are owned by the
//! game controller, which calls back into [`Board::resolve_match`] /
//! [`Board::resolve_mismatch`] when its timers fire.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::levels::Pair;

/// Index of the pair inside the level definition; shared by exactly two cards.
pub type PairKey = usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Face {
    Term,
    Definition,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: u32,
    pub text: String,
    pub pair_key: PairKey,
    pub face: Face,
    pub flipped: bool,
    pub matched: bool,
}

impl Card {
    fn selectable(&self) -> bool {
        !self.flipped && !self.matched
    }
}

/// Result of a selection attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    /// Two cards already pending, index out of range, or card already face up / matched.
    Ignored,
    /// First card of a pair is now face up.
    Flipped,
    /// Second card is face up; the pair must be resolved after a delay.
    Complete {
        first: usize,
        second: usize,
        matched: bool,
    },
}

#[derive(Clone, Debug, Default)]
pub struct Board {
    cards: Vec<Card>,
    pending: Vec<usize>,
}

impl Board {
    /// Two cards per pair (term + definition), unique ids, shuffled with Fisher-Yates.
    pub fn build<R: Rng + ?Sized>(pairs: &[Pair], rng: &mut R) -> Self {
        let mut cards = Vec::with_capacity(pairs.len() * 2);
        for (key, pair) in pairs.iter().enumerate() {
            cards.push(Card {
                id: (key * 2) as u32,
                text: pair.term.clone(),
                pair_key: key,
                face: Face::Term,
                flipped: false,
                matched: false,
            });
            cards.push(Card {
                id: (key * 2 + 1) as u32,
                text: pair.definition.clone(),
                pair_key: key,
                face: Face::Definition,
                flipped: false,
                matched: false,
            });
        }
        cards.shuffle(rng);
        Self {
            cards,
            pending: Vec::with_capacity(2),
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    /// Indices currently face up and awaiting resolution.
    pub fn pending(&self) -> &[usize] {
        &self.pending
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn is_resolving(&self) -> bool {
        self.pending.len() >= 2
    }

    pub fn select(&mut self, index: usize) -> Selection {
        if self.is_resolving() {
            return Selection::Ignored;
        }
        let Some(card) = self.cards.get_mut(index) else {
            return Selection::Ignored;
        };
        if !card.selectable() {
            return Selection::Ignored;
        }
        card.flipped = true;
        self.pending.push(index);

        if let &[first, second] = self.pending.as_slice() {
            let matched = self.cards[first].pair_key == self.cards[second].pair_key;
            Selection::Complete {
                first,
                second,
                matched,
            }
        } else {
            Selection::Flipped
        }
    }

    /// Mark both cards matched and clear the selection. Returns false if the
    /// pair is no longer the pending one (stale resolution).
    pub fn resolve_match(&mut self, first: usize, second: usize) -> bool {
        if self.pending[..] != [first, second] {
            return false;
        }
        for idx in [first, second] {
            let card = &mut self.cards[idx];
            card.matched = true;
            card.flipped = true;
        }
        self.pending.clear();
        true
    }

    /// Turn both cards face down again and clear the selection.
    pub fn resolve_mismatch(&mut self, first: usize, second: usize) -> bool {
        if self.pending[..] != [first, second] {
            return false;
        }
        for idx in [first, second] {
            let card = &mut self.cards[idx];
            if !card.matched {
                card.flipped = false;
            }
        }
        self.pending.clear();
        true
    }

    pub fn all_matched(&self) -> bool {
        !self.cards.is_empty() && self.cards.iter().all(|c| c.matched)
    }

    pub fn matched_pairs(&self) -> usize {
        self.cards.iter().filter(|c| c.matched).count() / 2
    }

    /// Pair of the first card that is neither matched nor face up.
    pub fn hint_target(&self) -> Option<PairKey> {
        self.cards.iter().find(|c| c.selectable()).map(|c| c.pair_key)
    }

    /// Flip every unmatched card of `key` face up.
    pub fn reveal_pair(&mut self, key: PairKey) {
        for card in self.cards.iter_mut().filter(|c| c.pair_key == key && !c.matched) {
            card.flipped = true;
        }
    }

    /// Turn the hinted pair back over, leaving matched and pending cards alone.
    pub fn hide_pair(&mut self, key: PairKey) {
        for (idx, card) in self.cards.iter_mut().enumerate() {
            if card.pair_key == key && !card.matched && !self.pending.contains(&idx) {
                card.flipped = false;
            }
        }
    }
}
