//! Moves on contiguous runs of visits.
//!
//! # Algorithm
//!
//! [`seq_and_smaller`](crate::objective::Objective::seq_and_smaller) slides a window
//! of each size in `[min, max]` along a route and carries the run's
//! aggregate cost from one position to the next. Runs then move between
//! routes intact, so relocating or exchanging one only prices its boundary
//! edges: three for a relocation, four for an exchange. A run holding a
//! closed route's first visit re-anchors the route at the visit after the
//! run before it is cut out.
//!
//! # Complexity
//!
//! Enumeration: O(len) per window size. Relocation: O(m) for m edges of
//! the target route. Exchange: O(1) pricing. Commits are O(len).
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use log::trace;

use super::probe::Change;
use super::{insert_after_in, insertion_cost, insertion_slots, is_window, Objective};
use crate::capacity::Seq;
use crate::error::ObjectiveError;
use crate::solution::Solution;
use crate::tour::{RouteId, TourKind, TourRef};

impl Objective {
    /// Every run of `min..=max` visits on `route` that can be cut out,
    /// with its true aggregate cost.
    ///
    /// A run needs a visit before and after it. On open and fixed routes it
    /// therefore never holds the first or last visit; on a closed route it
    /// may wrap past the first as long as at least one visit stays behind.
    /// The aggregate is carried from one window to the next in O(1).
    ///
    /// With `prune`, runs whose removal gain on the working matrix is below
    /// `-max(aggregate, 0)` are skipped. Such a gain is negative, so no
    /// relocation of the run could be accepted; exchanges must not prune.
    pub fn seq_and_smaller(
        &self,
        solution: &Solution,
        route: RouteId,
        min: usize,
        max: usize,
        prune: bool,
    ) -> Result<Vec<Seq>, ObjectiveError> {
        solution.tours().check(route)?;
        let tour = solution.tour(route);
        let visits = tour.to_vec();
        let n = visits.len();
        let closed = tour.anchor().is_closed();
        let at = |i: usize| visits[i % n];
        let c = &self.base;
        let w = &self.working;

        let mut runs = Vec::new();
        for k in min.max(1)..=max {
            let starts = if closed {
                if k >= n {
                    break;
                }
                0..n
            } else {
                if k + 2 > n {
                    break;
                }
                1..n - k
            };
            let start = starts.start;
            let mut aggregate: f64 = (0..k).map(|j| self.fixed_cost(at(start + j))).sum::<f64>()
                + (1..k).map(|j| c.get(at(start + j - 1), at(start + j))).sum::<f64>();
            for i in starts {
                if i > start {
                    let out = at(i - 1);
                    let incoming = at(i + k - 1);
                    aggregate += c.get(at(i + k - 2), incoming) + self.fixed_cost(incoming)
                        - c.get(out, at(i))
                        - self.fixed_cost(out);
                }
                let before = at(i + n - 1);
                let after = at(i + k);
                let (first, last) = (at(i), at(i + k - 1));
                if prune {
                    let gain = w.get(before, first) + w.get(last, after) - w.get(before, after);
                    if gain < -aggregate.max(0.0) {
                        continue;
                    }
                }
                runs.extend(Seq::new((i..i + k).map(at).collect(), before, after, aggregate));
            }
        }
        Ok(runs)
    }

    /// Relocates `seq` from `from_route` into the cheapest slot of
    /// `to_route`.
    ///
    /// A run holding a closed route's first visit is cut out after the
    /// route is re-anchored at the visit following the run. Runs holding
    /// the first of an open or fixed route, or a fixed last, stay put.
    ///
    /// # Errors
    ///
    /// [`ObjectiveError::StaleWindow`] if `seq` no longer sits between its
    /// `before` and `after` on `from_route`.
    pub fn try_move_seq(
        &self,
        solution: &mut Solution,
        from_route: RouteId,
        seq: &Seq,
        to_route: RouteId,
    ) -> Result<bool, ObjectiveError> {
        self.check_routes(solution, &[from_route, to_route])?;
        if from_route == to_route {
            return Ok(false);
        }
        let from = solution.tour(from_route);
        check_current(from, seq, from_route)?;
        let Some(rotate) = cut_point(from, seq) else {
            return Ok(false);
        };

        let (s1, sk) = (seq.first(), seq.last());
        let (before, after) = (seq.before(), seq.after());
        let w = &self.working;
        let gain = w.get(before, s1) + w.get(sk, after) - w.get(before, after);
        if gain <= self.config.seq_epsilon {
            return Ok(false);
        }
        let best = insertion_slots(solution.tour(to_route))
            .into_iter()
            .map(|(a, b)| (a, b, insertion_cost(w, a, b, s1, sk)))
            .min_by(|x, y| x.2.total_cmp(&y.2));
        let Some((a, b, insertion)) = best else {
            return Ok(false);
        };
        if insertion >= gain {
            return Ok(false);
        }

        let c = &self.base;
        let out_travel = c.get(before, after) - c.get(before, s1) - c.get(sk, after) - seq.cost();
        let in_travel = insertion_cost(c, a, b, s1, sk) + seq.cost();
        let in_broken: Vec<(usize, usize)> = b.map(|b| (a, b)).into_iter().collect();
        let in_created: Vec<(usize, usize)> = std::iter::once((a, s1)).chain(b.map(|b| (sk, b))).collect();
        let out = Change {
            route: from_route,
            travel: out_travel,
            leaving: seq.visits(),
            broken: &[(before, s1), (sk, after)],
            created: &[(before, after)],
        };
        let into = Change {
            route: to_route,
            travel: in_travel,
            leaving: &[],
            broken: &in_broken,
            created: &in_created,
        };
        let cap = &self.capacity;
        let fits = self.admissible(
            solution,
            &out,
            |content, d| cap.can_remove_seq(content, seq, d),
            |visits| visits.retain(|x| !seq.contains(*x)),
        )? && self.admissible(
            solution,
            &into,
            |content, d| cap.can_add_seq(content, seq, d),
            |visits| insert_after_in(visits, a, seq.visits()),
        )?;
        if !fits {
            return Ok(false);
        }

        let tours = solution.tours_mut();
        if rotate {
            tours.tour_mut(from_route).rotate_to(after)?;
        }
        tours.move_run(from_route, seq.ends(), to_route, a)?;
        let out_detour = self.settle_depot(solution, from_route);
        let in_detour = self.settle_depot(solution, to_route);
        cap.remove_seq(solution.content_mut(from_route), seq, out_travel + out_detour)?;
        cap.add_seq(solution.content_mut(to_route), seq, in_travel + in_detour)?;
        trace!(
            "move run {:?}: route {} -> route {} after {a}, gain {:.4}",
            seq.visits(),
            from_route.index(),
            to_route.index(),
            gain - insertion
        );
        Ok(true)
    }

    /// Exchanges run `a` of route `r1` with run `b` of route `r2`, each
    /// taking the other's place.
    ///
    /// Runs keep their internal order, so only the four boundary edges are
    /// priced. Re-anchoring and rejection follow
    /// [`try_move_seq`](Self::try_move_seq).
    pub fn try_swap_seq(
        &self,
        solution: &mut Solution,
        r1: RouteId,
        a: &Seq,
        r2: RouteId,
        b: &Seq,
    ) -> Result<bool, ObjectiveError> {
        self.check_routes(solution, &[r1, r2])?;
        if r1 == r2 {
            return Ok(false);
        }
        let t1 = solution.tour(r1);
        let t2 = solution.tour(r2);
        check_current(t1, a, r1)?;
        check_current(t2, b, r2)?;
        let (Some(rotate1), Some(rotate2)) = (cut_point(t1, a), cut_point(t2, b)) else {
            return Ok(false);
        };

        let w = &self.working;
        let old = w.get(a.before(), a.first())
            + w.get(a.last(), a.after())
            + w.get(b.before(), b.first())
            + w.get(b.last(), b.after());
        let new = w.get(a.before(), b.first())
            + w.get(b.last(), a.after())
            + w.get(b.before(), a.first())
            + w.get(a.last(), b.after());
        let gain = old - new;
        if gain <= self.config.seq_epsilon {
            return Ok(false);
        }

        let c = &self.base;
        let travel1 = c.get(a.before(), b.first()) + c.get(b.last(), a.after())
            - c.get(a.before(), a.first())
            - c.get(a.last(), a.after())
            + b.cost()
            - a.cost();
        let travel2 = c.get(b.before(), a.first()) + c.get(a.last(), b.after())
            - c.get(b.before(), b.first())
            - c.get(b.last(), b.after())
            + a.cost()
            - b.cost();
        let side1 = Change {
            route: r1,
            travel: travel1,
            leaving: a.visits(),
            broken: &[(a.before(), a.first()), (a.last(), a.after())],
            created: &[(a.before(), b.first()), (b.last(), a.after())],
        };
        let side2 = Change {
            route: r2,
            travel: travel2,
            leaving: b.visits(),
            broken: &[(b.before(), b.first()), (b.last(), b.after())],
            created: &[(b.before(), a.first()), (a.last(), b.after())],
        };
        let cap = &self.capacity;
        let fits = self.admissible(
            solution,
            &side1,
            |content, d| cap.exchange_is_possible_seq(content, a, b, d),
            |visits| replace_run(visits, a, b),
        )? && self.admissible(
            solution,
            &side2,
            |content, d| cap.exchange_is_possible_seq(content, b, a, d),
            |visits| replace_run(visits, b, a),
        )?;
        if !fits {
            return Ok(false);
        }

        let tours = solution.tours_mut();
        if rotate1 {
            tours.tour_mut(r1).rotate_to(a.after())?;
        }
        if rotate2 {
            tours.tour_mut(r2).rotate_to(b.after())?;
        }
        tours.exchange_runs(r1, a.ends(), r2, b.ends())?;
        let detour1 = self.settle_depot(solution, r1);
        let detour2 = self.settle_depot(solution, r2);
        cap.update_exchange_seq(solution.content_mut(r1), a, b, travel1 + detour1)?;
        cap.update_exchange_seq(solution.content_mut(r2), b, a, travel2 + detour2)?;
        trace!(
            "swap runs {:?} (route {}) <-> {:?} (route {}), gain {gain:.4}",
            a.visits(),
            r1.index(),
            b.visits(),
            r2.index()
        );
        Ok(true)
    }
}

/// Fails unless `seq` still sits between its neighbours on `tour`.
fn check_current(tour: TourRef<'_>, seq: &Seq, route: RouteId) -> Result<(), ObjectiveError> {
    let mut chain = Vec::with_capacity(seq.len() + 2);
    chain.push(seq.before());
    chain.extend_from_slice(seq.visits());
    chain.push(seq.after());
    if seq.contains(seq.before()) || seq.contains(seq.after()) || !is_window(tour, &chain) {
        return Err(ObjectiveError::StaleWindow(seq.visits().to_vec(), route.index()));
    }
    Ok(())
}

/// Whether `seq` can be cut out of `tour`: `Some(true)` if the route has
/// to be re-anchored first, `None` if the run cannot move.
fn cut_point(tour: TourRef<'_>, seq: &Seq) -> Option<bool> {
    if let TourKind::Fixed(last) = tour.kind() {
        if seq.contains(last) {
            return None;
        }
    }
    if !seq.contains(tour.first()) {
        return Some(false);
    }
    tour.anchor().is_closed().then_some(true)
}

/// Replaces run `out` with run `incoming` in a visit list.
fn replace_run(visits: &mut Vec<usize>, out: &Seq, incoming: &Seq) {
    visits.retain(|x| !out.contains(*x));
    insert_after_in(visits, out.before(), incoming.visits());
}
