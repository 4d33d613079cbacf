//! The per-route view over a successor array.

use std::ops::Deref;

use super::iter::{Between, Visits, Windows};
use super::{slot_of, Anchor, Tour, TourKind, END, NOT_SET};
use crate::error::TourError;

/// One route seen through its anchor.
///
/// `N` is the borrowed successor array and `A` the borrowed anchor. Reads
/// work for any borrow; edits need the mutable instantiation [`TourMut`].
/// A view only ever reads or writes slots reachable from its own first
/// visit, so several views over one shared array never cross-write.
#[derive(Debug, Clone, Copy)]
pub struct TourView<N, A> {
    pub(crate) next: N,
    pub(crate) anchor: A,
}

/// Read-only view.
pub type TourRef<'a> = TourView<&'a [usize], &'a Anchor>;

/// Mutable view.
pub type TourMut<'a> = TourView<&'a mut Vec<usize>, &'a mut Anchor>;

impl<N, A> TourView<N, A>
where
    N: AsRef<[usize]>,
    A: Deref<Target = Anchor>,
{
    fn slots(&self) -> &[usize] {
        self.next.as_ref()
    }

    /// Copy of the anchor.
    pub fn anchor(&self) -> Anchor {
        *self.anchor
    }

    /// First visit.
    pub fn first(&self) -> usize {
        self.anchor.first
    }

    /// Tour shape.
    pub fn kind(&self) -> TourKind {
        self.anchor.kind
    }

    /// Returns `true` if `v` occupies a slot of the underlying array.
    ///
    /// For a view into a [`MultiTour`](super::MultiTour) this means "in some
    /// route"; use [`contains`](Self::contains) for membership in this one.
    pub fn is_placed(&self, v: usize) -> bool {
        slot_of(self.slots(), v) != NOT_SET
    }

    /// Successor of `v`, wrapping to the first visit on closed tours.
    pub fn next_of(&self, v: usize) -> Option<usize> {
        self.anchor.decode(slot_of(self.slots(), v))
    }

    /// Visits in order.
    pub fn visits(&self) -> Visits<'_> {
        Visits::new(self.slots(), *self.anchor)
    }

    /// Number of visits.
    pub fn len(&self) -> usize {
        self.visits().count()
    }

    /// Always `false`: a tour keeps at least its first visit.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Visits collected into a vector.
    pub fn to_vec(&self) -> Vec<usize> {
        self.visits().collect()
    }

    /// Last visit: the pinned one for fixed tours, the terminal otherwise.
    pub fn last(&self) -> usize {
        match self.anchor.kind {
            TourKind::Fixed(l) => l,
            _ => self.visits().last().unwrap_or(self.anchor.first),
        }
    }

    /// Returns `true` if `v` is on this tour.
    pub fn contains(&self, v: usize) -> bool {
        self.is_placed(v) && self.visits().any(|x| x == v)
    }

    /// Returns `true` if `to` directly follows `from` on this tour.
    pub fn contains_edge(&self, from: usize, to: usize) -> bool {
        self.next_of(from) == Some(to) && self.contains(from)
    }

    /// Visit preceding `v` (the terminal for a closed tour's first visit).
    pub fn predecessor(&self, v: usize) -> Option<usize> {
        self.pairs().find(|&[_, b]| b == v).map(|[a, _]| a)
    }

    /// Visits from `from` up to and including `to`.
    pub fn between(&self, from: usize, to: usize) -> Between<'_> {
        Between::new(self.slots(), *self.anchor, from, to)
    }

    /// Consecutive pairs; closed tours include `(last, first)`.
    pub fn pairs(&self) -> Windows<'_, 2> {
        Windows::new(self.slots(), *self.anchor)
    }

    /// Consecutive triples.
    pub fn triples(&self) -> Windows<'_, 3> {
        Windows::new(self.slots(), *self.anchor)
    }

    /// Consecutive quadruplets.
    pub fn quadruplets(&self) -> Windows<'_, 4> {
        Windows::new(self.slots(), *self.anchor)
    }

    /// Copies this route into a standalone [`Tour`].
    pub fn to_tour(&self) -> Tour {
        let mut next = Vec::new();
        super::link(&mut next, &self.to_vec());
        Tour::from_parts(next, *self.anchor)
    }
}

impl<'a> TourView<&'a mut Vec<usize>, &'a mut Anchor> {
    /// Read-only reborrow.
    pub fn view(&self) -> TourRef<'_> {
        TourView {
            next: self.next.as_slice(),
            anchor: &*self.anchor,
        }
    }

    /// Fails with [`TourError::NotPresent`] unless `v` is on this route.
    /// Slots owned by other routes of a shared array do not count.
    fn owns(&self, v: usize) -> Result<(), TourError> {
        if self.view().contains(v) {
            Ok(())
        } else {
            Err(TourError::NotPresent(v))
        }
    }

    /// Inserts `v` directly after `from`. O(len) to confirm `from` is on
    /// this route, then O(1) amortized; the array grows with [`NOT_SET`]
    /// slots if `v` is beyond its end.
    pub fn insert_after(&mut self, from: usize, v: usize) -> Result<(), TourError> {
        if v >= END {
            return Err(TourError::Reserved(v));
        }
        if from == v {
            return Err(TourError::SelfInsertion(v));
        }
        self.owns(from)?;
        if self.anchor.is_fixed_last(from) {
            return Err(TourError::InsertAfterFixedLast(from));
        }
        if self.is_placed(v) {
            return Err(TourError::AlreadyPresent(v));
        }
        if v >= self.next.len() {
            self.next.resize(v + 1, NOT_SET);
        }
        self.next[v] = self.next[from];
        self.next[from] = v;
        Ok(())
    }

    /// Removes `v`. O(len) scan for the predecessor.
    pub fn remove(&mut self, v: usize) -> Result<(), TourError> {
        self.remove_between(v).map(|_| ())
    }

    /// Removes `v` and returns its former neighbours `(before, after)`;
    /// `after` is `None` when `v` was an open tour's terminal.
    pub fn remove_between(&mut self, v: usize) -> Result<(usize, Option<usize>), TourError> {
        if v == self.anchor.first {
            return Err(TourError::RemoveFirst(v));
        }
        if self.anchor.is_fixed_last(v) {
            return Err(TourError::RemoveFixedLast(v));
        }
        let before = self
            .view()
            .visits()
            .find(|&p| self.next_of(p) == Some(v))
            .ok_or(TourError::NotPresent(v))?;
        let after = self.next_of(v);
        self.next[before] = self.next[v];
        self.next[v] = NOT_SET;
        Ok((before, after))
    }

    /// Points `from` at `to`. `to == first` is stored as [`END`]; `from`
    /// must be on this route.
    pub fn replace_edge_from(&mut self, from: usize, to: usize) -> Result<(), TourError> {
        self.owns(from)?;
        self.next[from] = self.anchor.encode(to);
        Ok(())
    }

    /// Detaches `v` and reinserts it directly after `before`.
    pub fn shift_after(&mut self, v: usize, before: usize) -> Result<(), TourError> {
        if v == before {
            return Err(TourError::ShiftOntoSelf(v));
        }
        self.owns(before)?;
        if self.anchor.is_fixed_last(before) {
            return Err(TourError::InsertAfterFixedLast(before));
        }
        if self.next_of(before) == Some(v) {
            return Ok(());
        }
        self.remove(v)?;
        self.insert_after(before, v)
    }

    /// Re-anchors a closed tour at `new_first`, keeping the cyclic order.
    pub fn rotate_to(&mut self, new_first: usize) -> Result<(), TourError> {
        if !self.anchor.is_closed() {
            return Err(TourError::NotClosed);
        }
        let old_first = self.anchor.first;
        if new_first == old_first {
            return Ok(());
        }
        let before = self
            .view()
            .predecessor(new_first)
            .ok_or(TourError::NotPresent(new_first))?;
        let terminal = self.view().last();
        self.next[terminal] = old_first;
        self.next[before] = END;
        self.anchor.first = new_first;
        Ok(())
    }
}
