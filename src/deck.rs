//! In-memory slide registry. Vec order is DOM order, so a record's dom
//! index is its position and is never stored.

use crate::config::Direction;

/// One working slide. Clones duplicate a real slide's content but carry no
/// identity of their own beyond the `real_index` of their source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlideRecord {
    pub real_index: usize,
    pub is_clone: bool,
}

/// The working-slide collection: every real slide (reordered for rtl) plus
/// whatever clones the current mode calls for.
#[derive(Clone, Debug)]
pub struct Deck {
    slides: Vec<SlideRecord>,
    real_count: usize,
    direction: Direction,
    infinite: bool,
    has_transient: bool,
}

impl Deck {
    /// Build the deck from the discovered slide count. Under rtl the records
    /// are reversed so that real index 0 lands visually rightmost while index
    /// arithmetic still runs left-to-right. Infinite mode brackets the list
    /// with a clone of the visual-last slide at the head and a clone of the
    /// visual-first slide at the tail.
    pub fn new(real_count: usize, direction: Direction, infinite: bool) -> Self {
        let mut slides: Vec<SlideRecord> = (0..real_count)
            .map(|real_index| SlideRecord {
                real_index,
                is_clone: false,
            })
            .collect();
        if direction.is_rtl() {
            slides.reverse();
        }
        if infinite && real_count > 0 {
            let head = SlideRecord {
                real_index: slides[real_count - 1].real_index,
                is_clone: true,
            };
            let tail = SlideRecord {
                real_index: slides[0].real_index,
                is_clone: true,
            };
            slides.insert(0, head);
            slides.push(tail);
        }
        Self {
            slides,
            real_count,
            direction,
            infinite,
            has_transient: false,
        }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn real_count(&self) -> usize {
        self.real_count
    }

    pub fn record(&self, dom_index: usize) -> Option<&SlideRecord> {
        self.slides.get(dom_index)
    }

    /// Dom index the controller starts on: the first real slide.
    pub fn initial_index(&self) -> usize {
        self.clone_offset()
    }

    /// How far the real slides are shifted by a prepended boundary clone.
    pub fn clone_offset(&self) -> usize {
        usize::from(self.infinite)
    }

    pub fn dom_of_visual(&self, visual: usize) -> usize {
        visual + self.clone_offset()
    }

    /// Visual (left-to-right) position of a dom index; `None` for clones.
    pub fn visual_of_dom(&self, dom_index: usize) -> Option<usize> {
        let record = self.record(dom_index)?;
        if record.is_clone {
            return None;
        }
        Some(dom_index - self.clone_offset())
    }

    /// The real identity shown at a visual position.
    pub fn real_of_visual(&self, visual: usize) -> usize {
        match self.direction {
            Direction::Ltr => visual,
            Direction::Rtl => self.real_count - 1 - visual,
        }
    }

    /// Source real indices for the (head, tail) boundary clones, when the
    /// deck carries them.
    pub fn boundary_clones(&self) -> Option<(usize, usize)> {
        if !self.infinite || self.real_count == 0 {
            return None;
        }
        Some((
            self.slides[0].real_index,
            self.slides[self.slides.len() - 1].real_index,
        ))
    }

    /// Append the transient wrap clone (a copy of the visual-first slide) and
    /// return its source real index. Only one transient may be alive.
    pub fn push_transient(&mut self) -> usize {
        debug_assert!(!self.has_transient);
        let source = self.slides[self.clone_offset()].real_index;
        self.slides.push(SlideRecord {
            real_index: source,
            is_clone: true,
        });
        self.has_transient = true;
        source
    }

    /// Drop the transient wrap clone once its animation has settled.
    pub fn pop_transient(&mut self) {
        debug_assert!(self.has_transient);
        self.slides.pop();
        self.has_transient = false;
    }

    pub fn has_transient(&self) -> bool {
        self.has_transient
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ltr_deck_keeps_document_order() {
        let deck = Deck::new(3, Direction::Ltr, false);
        assert_eq!(deck.len(), 3);
        let reals: Vec<usize> = (0..3).map(|i| deck.record(i).unwrap().real_index).collect();
        assert_eq!(reals, vec![0, 1, 2]);
        assert_eq!(deck.initial_index(), 0);
    }

    #[test]
    fn rtl_deck_reverses_real_order() {
        let deck = Deck::new(3, Direction::Rtl, false);
        let reals: Vec<usize> = (0..3).map(|i| deck.record(i).unwrap().real_index).collect();
        assert_eq!(reals, vec![2, 1, 0]);
        // visual 0 (leftmost) shows the last real slide
        assert_eq!(deck.real_of_visual(0), 2);
        assert_eq!(deck.real_of_visual(2), 0);
    }

    #[test]
    fn infinite_deck_brackets_with_boundary_clones() {
        let deck = Deck::new(3, Direction::Ltr, true);
        assert_eq!(deck.len(), 5);
        assert_eq!(deck.initial_index(), 1);
        let head = deck.record(0).unwrap();
        let tail = deck.record(4).unwrap();
        assert!(head.is_clone && tail.is_clone);
        assert_eq!(head.real_index, 2);
        assert_eq!(tail.real_index, 0);
        assert_eq!(deck.boundary_clones(), Some((2, 0)));
        assert_eq!(deck.visual_of_dom(0), None);
        assert_eq!(deck.visual_of_dom(1), Some(0));
    }

    #[test]
    fn transient_clone_lifecycle() {
        let mut deck = Deck::new(3, Direction::Ltr, false);
        let source = deck.push_transient();
        assert_eq!(source, 0);
        assert_eq!(deck.len(), 4);
        assert!(deck.record(3).unwrap().is_clone);
        deck.pop_transient();
        assert_eq!(deck.len(), 3);
        assert!(!deck.has_transient());
    }

    #[test]
    fn rtl_transient_clones_the_visual_first_slide() {
        let mut deck = Deck::new(4, Direction::Rtl, false);
        // visual-first under rtl is real index 3
        assert_eq!(deck.push_transient(), 3);
    }
}
