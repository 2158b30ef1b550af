use rand::seq::SliceRandom;
use rand::Rng;

/// Face values dealt on every board; each appears exactly twice
pub const SYMBOLS: [&str; 8] = ["🐶", "🐱", "🐭", "🐹", "🐰", "🦊", "🐻", "🐼"];

/// Face shown for a card that is face-down
pub const HIDDEN_FACE: &str = "❓";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub symbol: &'static str,
    pub revealed: bool,
    pub matched: bool,
}

impl Card {
    fn new(symbol: &'static str) -> Self {
        Card {
            symbol,
            revealed: false,
            matched: false,
        }
    }

    /// Whether a flip on this card can do anything
    pub fn is_flippable(&self) -> bool {
        !self.revealed && !self.matched
    }

    /// What the player currently sees for this card
    pub fn face(&self) -> &'static str {
        if self.revealed || self.matched {
            self.symbol
        } else {
            HIDDEN_FACE
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    /// Deals two copies of every symbol in shuffled order
    pub fn deal<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut cards: Vec<Card> = SYMBOLS
            .iter()
            .chain(SYMBOLS.iter())
            .map(|&symbol| Card::new(symbol))
            .collect();
        cards.shuffle(rng);
        Board { cards }
    }

    /// Builds a board from a fixed layout
    pub fn from_symbols(symbols: &[&'static str]) -> Self {
        Board {
            cards: symbols.iter().map(|&symbol| Card::new(symbol)).collect(),
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn card(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of pairs that have to be found to clear the board
    pub fn pair_count(&self) -> usize {
        self.cards.len() / 2
    }

    pub(crate) fn reveal(&mut self, index: usize) {
        if let Some(card) = self.cards.get_mut(index) {
            card.revealed = true;
        }
    }

    pub(crate) fn hide(&mut self, index: usize) {
        if let Some(card) = self.cards.get_mut(index) {
            card.revealed = false;
        }
    }

    pub(crate) fn mark_matched(&mut self, index: usize) {
        if let Some(card) = self.cards.get_mut(index) {
            card.revealed = false;
            card.matched = true;
        }
    }

    pub fn symbols_match(&self, first: usize, second: usize) -> bool {
        match (self.cards.get(first), self.cards.get(second)) {
            (Some(a), Some(b)) => a.symbol == b.symbol,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[test]
    fn test_deal_has_every_symbol_twice() {
        for seed in 0..20 {
            let board = Board::deal(&mut StdRng::seed_from_u64(seed));
            assert_eq!(board.len(), 16);
            assert_eq!(board.pair_count(), 8);

            let mut counts: HashMap<&str, usize> = HashMap::new();
            for card in board.cards() {
                *counts.entry(card.symbol).or_default() += 1;
                assert!(card.is_flippable());
            }
            assert_eq!(counts.len(), SYMBOLS.len());
            assert!(counts.values().all(|&count| count == 2));
        }
    }

    #[test]
    fn test_deal_shuffles() {
        let a = Board::deal(&mut StdRng::seed_from_u64(1));
        let b = Board::deal(&mut StdRng::seed_from_u64(2));
        assert_ne!(a, b);
    }

    #[test]
    fn test_card_faces() {
        let mut board = Board::from_symbols(&["🐶", "🐶"]);
        assert_eq!(board.card(0).unwrap().face(), HIDDEN_FACE);
        board.reveal(0);
        assert_eq!(board.card(0).unwrap().face(), "🐶");
        board.hide(0);
        assert_eq!(board.card(0).unwrap().face(), HIDDEN_FACE);
        board.mark_matched(1);
        assert_eq!(board.card(1).unwrap().face(), "🐶");
        assert!(!board.card(1).unwrap().is_flippable());
    }
}
