//! Pagination-dot mapping. Under rtl both activation and click resolution
//! invert the slot so dot N always tracks real slide N.

use crate::config::Direction;
use crate::deck::Deck;

fn invert(direction: Direction, real_count: usize, index: usize) -> usize {
    match direction {
        Direction::Ltr => index,
        Direction::Rtl => real_count - 1 - index,
    }
}

/// Dom index a click on `slot` navigates to.
pub fn slot_target(slot: usize, deck: &Deck, direction: Direction) -> usize {
    deck.dom_of_visual(invert(direction, deck.real_count(), slot))
}

/// Slot to highlight for the slide currently at `dom_index`; `None` while a
/// boundary clone is showing (the engine only asks after settle, when the
/// index has already been corrected to a real slide).
pub fn active_slot(dom_index: usize, deck: &Deck, direction: Direction) -> Option<usize> {
    let visual = deck.visual_of_dom(dom_index)?;
    Some(invert(direction, deck.real_count(), visual))
}
