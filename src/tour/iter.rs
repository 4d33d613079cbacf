//! Lazy walks over a tour.
//!
//! All iterators here are `Clone`, so a walk can be restarted from a saved
//! copy, and all of them terminate: a walk never takes more steps than the
//! successor array has slots.

use super::{slot_of, Anchor, END};

/// Visits of a tour in order, from its first visit to its terminal.
#[derive(Debug, Clone)]
pub struct Visits<'a> {
    next: &'a [usize],
    current: Option<usize>,
    steps: usize,
}

impl<'a> Visits<'a> {
    pub(crate) fn new(next: &'a [usize], anchor: Anchor) -> Self {
        let current = (slot_of(next, anchor.first) != super::NOT_SET).then_some(anchor.first);
        Self {
            next,
            current,
            steps: 0,
        }
    }
}

impl Iterator for Visits<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let v = self.current?;
        self.steps += 1;
        debug_assert!(
            self.steps <= self.next.len() + 1,
            "tour walk exceeded its successor array"
        );
        self.current = match slot_of(self.next, v) {
            END | super::NOT_SET => None,
            s => Some(s),
        };
        Some(v)
    }
}

/// Visits from `from` up to and including `to`.
///
/// Closed tours wrap from their terminal back to the first visit; open and
/// fixed tours stop at the terminal even if `to` was never reached.
#[derive(Debug, Clone)]
pub struct Between<'a> {
    next: &'a [usize],
    anchor: Anchor,
    current: Option<usize>,
    to: usize,
    budget: usize,
}

impl<'a> Between<'a> {
    pub(crate) fn new(next: &'a [usize], anchor: Anchor, from: usize, to: usize) -> Self {
        let current = (slot_of(next, from) != super::NOT_SET).then_some(from);
        Self {
            next,
            anchor,
            current,
            to,
            budget: next.len() + 1,
        }
    }
}

impl Iterator for Between<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let v = self.current?;
        if self.budget == 0 {
            self.current = None;
            return None;
        }
        self.budget -= 1;
        self.current = if v == self.to {
            None
        } else {
            self.anchor.decode(slot_of(self.next, v))
        };
        Some(v)
    }
}

/// Consecutive windows of `K` visits.
///
/// A closed tour of `n` visits yields `n` windows (the last ones wrap to
/// the first visit) as long as `n >= K - 1`; an open or fixed tour yields
/// `n - K + 1` windows as long as `n >= K`.
#[derive(Debug, Clone)]
pub struct Windows<'a, const K: usize> {
    next: &'a [usize],
    anchor: Anchor,
    window: Option<[usize; K]>,
}

impl<'a, const K: usize> Windows<'a, K> {
    pub(crate) fn new(next: &'a [usize], anchor: Anchor) -> Self {
        Self {
            next,
            anchor,
            window: Self::initial(next, anchor),
        }
    }

    fn initial(next: &[usize], anchor: Anchor) -> Option<[usize; K]> {
        if K == 0 || slot_of(next, anchor.first) == super::NOT_SET {
            return None;
        }
        let mut window = [anchor.first; K];
        for i in 1..K {
            let v = anchor.decode(slot_of(next, window[i - 1]))?;
            // A cycle shorter than K - 1 visits would repeat a whole lap.
            if v == anchor.first && i < K - 1 {
                return None;
            }
            window[i] = v;
        }
        Some(window)
    }

    fn advance(&self, window: &[usize; K]) -> Option<[usize; K]> {
        if K < 2 {
            let v = self.anchor.decode(slot_of(self.next, window[0]))?;
            return (v != self.anchor.first).then_some([v; K]);
        }
        if self.anchor.is_closed() && window[1] == self.anchor.first {
            return None;
        }
        let tail = self.anchor.decode(slot_of(self.next, window[K - 1]))?;
        let mut shifted = [tail; K];
        shifted[..K - 1].copy_from_slice(&window[1..]);
        Some(shifted)
    }
}

impl<const K: usize> Iterator for Windows<'_, K> {
    type Item = [usize; K];

    fn next(&mut self) -> Option<[usize; K]> {
        let current = self.window?;
        self.window = self.advance(&current);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tour::link;

    fn array(visits: &[usize]) -> Vec<usize> {
        let mut next = Vec::new();
        link(&mut next, visits);
        next
    }

    #[test]
    fn test_visits_in_order() {
        let next = array(&[3, 1, 2]);
        let walked: Vec<_> = Visits::new(&next, Anchor::new(3, Some(3))).collect();
        assert_eq!(walked, vec![3, 1, 2]);
    }

    #[test]
    fn test_pairs_closed_wraps() {
        let next = array(&[0, 1, 2]);
        let pairs: Vec<_> = Windows::<2>::new(&next, Anchor::new(0, Some(0))).collect();
        assert_eq!(pairs, vec![[0, 1], [1, 2], [2, 0]]);
    }

    #[test]
    fn test_pairs_open_stops() {
        let next = array(&[0, 1, 2]);
        let pairs: Vec<_> = Windows::<2>::new(&next, Anchor::new(0, None)).collect();
        assert_eq!(pairs, vec![[0, 1], [1, 2]]);
    }

    #[test]
    fn test_triples_closed_two_visits() {
        let next = array(&[5, 6]);
        let triples: Vec<_> = Windows::<3>::new(&next, Anchor::new(5, Some(5))).collect();
        assert_eq!(triples, vec![[5, 6, 5], [6, 5, 6]]);
    }

    #[test]
    fn test_quadruplets_too_short() {
        let next = array(&[5, 6]);
        assert_eq!(Windows::<4>::new(&next, Anchor::new(5, Some(5))).count(), 0);
        assert_eq!(Windows::<3>::new(&next, Anchor::new(5, None)).count(), 0);
    }

    #[test]
    fn test_single_visit_closed_pair() {
        let next = array(&[7]);
        let pairs: Vec<_> = Windows::<2>::new(&next, Anchor::new(7, Some(7))).collect();
        assert_eq!(pairs, vec![[7, 7]]);
    }

    #[test]
    fn test_windows_restartable() {
        let next = array(&[0, 1, 2, 3]);
        let it = Windows::<3>::new(&next, Anchor::new(0, Some(0)));
        let saved = it.clone();
        assert_eq!(it.count(), 4);
        assert_eq!(saved.count(), 4);
    }

    #[test]
    fn test_between_wraps_closed() {
        let next = array(&[0, 1, 2, 3]);
        let seg: Vec<_> = Between::new(&next, Anchor::new(0, Some(0)), 2, 1).collect();
        assert_eq!(seg, vec![2, 3, 0, 1]);
    }

    #[test]
    fn test_between_open_stops_at_terminal() {
        let next = array(&[0, 1, 2, 3]);
        let seg: Vec<_> = Between::new(&next, Anchor::new(0, None), 2, 1).collect();
        assert_eq!(seg, vec![2, 3]);
    }
}
