//! Single-visit relocate and exchange.
//!
//! # Algorithm
//!
//! **Relocate** cuts the middle visit `v` of a window `[p, v, n]` and links
//! `p -> n`, then inserts `v` into the cheapest edge of the target route
//! (the same route is allowed). **Exchange** swaps the middle visits of two
//! windows on different routes. Both price the edit on the working matrix
//! first and reject unless the gain clears the operator's tolerance. The
//! survivors are probed on true costs for capacity, with the depot detour
//! estimated before it is simulated, and only then committed.
//!
//! A route's first visit never moves, and a pinned last is never the middle
//! of a window.
//!
//! # Complexity
//!
//! Relocate: O(m) for m edges of the target route, plus O(len) to locate
//! predecessors on commit. Exchange: O(1) pricing, O(len) commit. Capacity
//! checks are O(constraints).
//!
//! # Reference
//!
//! Savelsbergh, M. W. P. (1992). "The vehicle routing problem with time
//! windows: Minimizing route duration", *ORSA Journal on Computing* 4(2),
//! 146-154.

use log::trace;

use super::probe::Change;
use super::{insert_after_in, insertion_cost, insertion_slots, is_window, Objective};
use crate::error::ObjectiveError;
use crate::solution::Solution;
use crate::tour::RouteId;

impl Objective {
    /// Relocates the middle visit of `[from, along, to]` on `from_route`
    /// into the cheapest edge of `to_route`.
    ///
    /// Both routes may be the same. The move is rejected when the removal
    /// gain does not exceed the move tolerance, when the cheapest insertion
    /// costs at least the gain, or when either route would break its
    /// capacity. Returns `Ok(true)` if the move was applied.
    ///
    /// # Errors
    ///
    /// [`ObjectiveError::StaleWindow`] if the triple is no longer
    /// consecutive on `from_route`; structural and capacity errors if the
    /// solution is inconsistent.
    pub fn try_move(
        &self,
        solution: &mut Solution,
        from_route: RouteId,
        [p, v, n]: [usize; 3],
        to_route: RouteId,
    ) -> Result<bool, ObjectiveError> {
        self.check_routes(solution, &[from_route, to_route])?;
        let from = solution.tour(from_route);
        if !is_window(from, &[p, v, n]) {
            return Err(ObjectiveError::StaleWindow(vec![p, v, n], from_route.index()));
        }
        if v == from.first() || from.anchor().is_fixed_last(v) {
            return Ok(false);
        }

        let w = &self.working;
        let gain = w.get(p, v) + w.get(v, n) - w.get(p, n);
        if gain <= self.config.move_epsilon {
            return Ok(false);
        }
        let intra = from_route == to_route;
        let best = insertion_slots(solution.tour(to_route))
            .into_iter()
            .filter(|&(a, b)| !intra || (a != v && b != Some(v)))
            .map(|(a, b)| (a, b, insertion_cost(w, a, b, v, v)))
            .min_by(|x, y| x.2.total_cmp(&y.2));
        let Some((a, b, insertion)) = best else {
            return Ok(false);
        };
        if insertion >= gain {
            return Ok(false);
        }

        let c = &self.base;
        let fixed = self.fixed_cost(v);
        let out_travel = c.get(p, n) - c.get(p, v) - c.get(v, n) - fixed;
        let in_travel = insertion_cost(c, a, b, v, v) + fixed;
        let mut out_broken = vec![(p, v), (v, n)];
        let mut out_created = vec![(p, n)];
        let in_broken: Vec<(usize, usize)> = b.map(|b| (a, b)).into_iter().collect();
        let in_created: Vec<(usize, usize)> = std::iter::once((a, v)).chain(b.map(|b| (v, b))).collect();
        let cap = &self.capacity;

        if intra {
            out_broken.extend_from_slice(&in_broken);
            out_created.extend_from_slice(&in_created);
            let change = Change {
                route: from_route,
                travel: out_travel + in_travel,
                leaving: &[],
                broken: &out_broken,
                created: &out_created,
            };
            let fits = self.admissible(
                solution,
                &change,
                |content, d| cap.can_reweigh(content, d),
                |visits| {
                    visits.retain(|&x| x != v);
                    insert_after_in(visits, a, &[v]);
                },
            )?;
            if !fits {
                return Ok(false);
            }
        } else {
            let leaving = [v];
            let out = Change {
                route: from_route,
                travel: out_travel,
                leaving: &leaving,
                broken: &out_broken,
                created: &out_created,
            };
            let into = Change {
                route: to_route,
                travel: in_travel,
                leaving: &[],
                broken: &in_broken,
                created: &in_created,
            };
            let fits = self.admissible(
                solution,
                &out,
                |content, d| cap.can_remove(content, v, d),
                |visits| visits.retain(|&x| x != v),
            )? && self.admissible(
                solution,
                &into,
                |content, d| cap.can_add(content, v, d),
                |visits| insert_after_in(visits, a, &[v]),
            )?;
            if !fits {
                return Ok(false);
            }
        }

        let tours = solution.tours_mut();
        tours.tour_mut(from_route).replace_edge_from(p, n)?;
        tours.release(v);
        tours.tour_mut(to_route).insert_after(a, v)?;

        if intra {
            let detour = self.settle_depot(solution, from_route);
            cap.reweigh(solution.content_mut(from_route), out_travel + in_travel + detour)?;
        } else {
            let out_detour = self.settle_depot(solution, from_route);
            let in_detour = self.settle_depot(solution, to_route);
            cap.remove(solution.content_mut(from_route), v, out_travel + out_detour)?;
            cap.add(solution.content_mut(to_route), v, in_travel + in_detour)?;
        }
        trace!(
            "move {v}: route {} -> route {} after {a}, gain {:.4}",
            from_route.index(),
            to_route.index(),
            gain - insertion
        );
        Ok(true)
    }

    /// Exchanges the middle visits of `[p1, v1, n1]` on `r1` and
    /// `[p2, v2, n2]` on `r2`.
    ///
    /// Only inter-route exchanges are tried, and neither visit may be its
    /// route's first or fixed last. Rejected when the working-cost gain does
    /// not exceed the swap tolerance or either route would break its
    /// capacity; a rejected swap leaves the solution untouched.
    ///
    /// # Errors
    ///
    /// [`ObjectiveError::StaleWindow`] if either triple is no longer
    /// consecutive on its route.
    pub fn try_swap(
        &self,
        solution: &mut Solution,
        r1: RouteId,
        [p1, v1, n1]: [usize; 3],
        r2: RouteId,
        [p2, v2, n2]: [usize; 3],
    ) -> Result<bool, ObjectiveError> {
        self.check_routes(solution, &[r1, r2])?;
        if r1 == r2 {
            return Ok(false);
        }
        for (route, window) in [(r1, [p1, v1, n1]), (r2, [p2, v2, n2])] {
            let tour = solution.tour(route);
            if !is_window(tour, &window) {
                return Err(ObjectiveError::StaleWindow(window.to_vec(), route.index()));
            }
            if window[1] == tour.first() || tour.anchor().is_fixed_last(window[1]) {
                return Ok(false);
            }
        }

        let w = &self.working;
        let old = w.get(p1, v1) + w.get(v1, n1) + w.get(p2, v2) + w.get(v2, n2);
        let new = w.get(p1, v2) + w.get(v2, n1) + w.get(p2, v1) + w.get(v1, n2);
        let gain = old - new;
        if gain <= self.config.swap_epsilon {
            return Ok(false);
        }

        let c = &self.base;
        let (f1, f2) = (self.fixed_cost(v1), self.fixed_cost(v2));
        let travel1 = c.get(p1, v2) + c.get(v2, n1) - c.get(p1, v1) - c.get(v1, n1) + f2 - f1;
        let travel2 = c.get(p2, v1) + c.get(v1, n2) - c.get(p2, v2) - c.get(v2, n2) + f1 - f2;
        let cap = &self.capacity;
        let side1 = Change {
            route: r1,
            travel: travel1,
            leaving: &[v1],
            broken: &[(p1, v1), (v1, n1)],
            created: &[(p1, v2), (v2, n1)],
        };
        let side2 = Change {
            route: r2,
            travel: travel2,
            leaving: &[v2],
            broken: &[(p2, v2), (v2, n2)],
            created: &[(p2, v1), (v1, n2)],
        };
        let fits = self.admissible(
            solution,
            &side1,
            |content, d| cap.exchange_is_possible(content, v1, v2, d),
            |visits| replace_visit(visits, v1, v2),
        )? && self.admissible(
            solution,
            &side2,
            |content, d| cap.exchange_is_possible(content, v2, v1, d),
            |visits| replace_visit(visits, v2, v1),
        )?;
        if !fits {
            return Ok(false);
        }

        solution.tours_mut().exchange(r1, [p1, v1], r2, [p2, v2])?;
        let detour1 = self.settle_depot(solution, r1);
        let detour2 = self.settle_depot(solution, r2);
        cap.update_exchange(solution.content_mut(r1), v1, v2, travel1 + detour1)?;
        cap.update_exchange(solution.content_mut(r2), v2, v1, travel2 + detour2)?;
        trace!(
            "swap {v1} (route {}) <-> {v2} (route {}), gain {gain:.4}",
            r1.index(),
            r2.index()
        );
        Ok(true)
    }
}

fn replace_visit(visits: &mut [usize], out: usize, incoming: usize) {
    if let Some(slot) = visits.iter_mut().find(|x| **x == out) {
        *slot = incoming;
    }
}
