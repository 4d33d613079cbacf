//! Property-based tests for tours, capacity bookkeeping and penalties.
//!
//! # Invariants tested
//!
//! - **Enumeration:** a walk visits every id once and stops within the array.
//! - **Pair counts:** closed tours wrap, open and fixed ones do not.
//! - **Clone equality:** an untouched clone compares equal.
//! - **Incremental contents:** after any move sequence, each route's cached
//!   content matches a recompute from scratch.
//! - **Depot pricing:** the exact detour never exceeds any single edge's detour.
//! - **Penalty reset:** lifting penalties restores the working matrix exactly.

use std::collections::HashSet;

use proptest::prelude::*;
use u_cvrp::capacity::{Capacity, Constraint};
use u_cvrp::distance::DistanceMatrix;
use u_cvrp::objective::Objective;
use u_cvrp::solution::{CheapestDetour, DepotPlacement, Solution};
use u_cvrp::tour::{MultiTour, RouteId, Tour, TourKind};

fn permutation(max: usize) -> impl Strategy<Value = Vec<usize>> {
    (2..=max).prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle())
}

fn build(visits: &[usize], kind: u8) -> Tour {
    match kind % 3 {
        0 => Tour::open(visits),
        1 => Tour::closed(visits),
        _ => Tour::fixed(visits),
    }
    .expect("valid")
}

fn matrix(n: usize, costs: &[f64]) -> DistanceMatrix {
    let mut dm = DistanceMatrix::new(n);
    for a in 0..n {
        for b in 0..n {
            if a != b {
                dm.set(a, b, costs[a * n + b]);
            }
        }
    }
    dm
}

/// A closed, an open and a fixed route over 12 visits; visit 12 is the
/// depot.
fn split(objective: &Objective, order: &[usize]) -> Solution {
    let mut solution = Solution::new();
    for (kind, chunk) in order.chunks(4).enumerate() {
        let tour = build(chunk, [1, 0, 2][kind]);
        solution
            .add_tour(&tour, objective.capacity().empty_content())
            .expect("disjoint");
    }
    objective.refresh(&mut solution).expect("aligned");
    solution
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Property: `len()` counts each visit once and the walk stays bounded.
    #[test]
    fn enumeration_is_bounded(visits in permutation(16), kind in 0u8..3) {
        let tour = build(&visits, kind);
        let walked: Vec<usize> = tour.visits().take(tour.slots().len() + 2).collect();
        prop_assert!(walked.len() <= tour.slots().len() + 1);
        let distinct: HashSet<usize> = walked.iter().copied().collect();
        prop_assert_eq!(distinct.len(), walked.len());
        prop_assert_eq!(tour.len(), walked.len());
        prop_assert_eq!(walked, visits);
    }

    /// Property: closed tours yield `len()` pairs including `(last, first)`.
    #[test]
    fn pair_counts_follow_kind(visits in permutation(16), kind in 0u8..3) {
        let tour = build(&visits, kind);
        let pairs: Vec<[usize; 2]> = tour.pairs().collect();
        match tour.kind() {
            TourKind::Closed => {
                prop_assert_eq!(pairs.len(), tour.len());
                prop_assert!(pairs.contains(&[tour.last(), tour.first()]));
            }
            _ => prop_assert_eq!(pairs.len(), tour.len() - 1),
        }
    }

    /// Property: a clone without moves is structurally equal.
    #[test]
    fn clone_is_equal(visits in permutation(16), cut in 1usize..15) {
        let cut = cut.min(visits.len() - 1);
        let mut tours = MultiTour::new();
        tours.add_visits(&visits[..cut], Some(visits[0])).expect("valid");
        tours.add_visits(&visits[cut..], None).expect("valid");
        let copy = tours.clone();
        prop_assert_eq!(&copy, &tours);
        prop_assert_eq!(copy.num_visits(), visits.len());
    }

    /// Property: cached contents match a recompute after any move sequence
    /// over closed, open and fixed routes, with or without penalties on the
    /// working matrix. First visits and a pinned last never move.
    #[test]
    fn contents_track_moves(
        order in Just((0..12).collect::<Vec<usize>>()).prop_shuffle(),
        costs in prop::collection::vec(1.0f64..20.0, 13 * 13),
        ops in prop::collection::vec((0u8..5, 0usize..3, 0usize..3, any::<usize>(), any::<usize>()), 1..25),
    ) {
        let capacity = Capacity::new(f64::INFINITY)
            .with_constraint(Constraint::new("load", 5.0, vec![1.0; 12]));
        let mut objective = Objective::new(matrix(13, &costs), capacity).with_depot(CheapestDetour::new(12));
        let mut solution = split(&objective, &order);
        let ids: Vec<RouteId> = solution.tours().route_ids().collect();

        for (op, a, b, i, j) in ops {
            let (r1, r2) = (ids[a], ids[b]);
            let t1: Vec<[usize; 3]> = solution.tour(r1).triples().collect();
            let t2: Vec<[usize; 3]> = solution.tour(r2).triples().collect();
            match op {
                0 if !t1.is_empty() => {
                    objective.try_move(&mut solution, r1, t1[i % t1.len()], r2).expect("valid");
                }
                1 if !t1.is_empty() && !t2.is_empty() => {
                    objective
                        .try_swap(&mut solution, r1, t1[i % t1.len()], r2, t2[j % t2.len()])
                        .expect("valid");
                }
                2 => {
                    let runs = objective.seq_and_smaller(&solution, r1, 2, 3, false).expect("valid");
                    if !runs.is_empty() {
                        objective.try_move_seq(&mut solution, r1, &runs[i % runs.len()], r2).expect("valid");
                    }
                }
                3 => {
                    let a = objective.seq_and_smaller(&solution, r1, 2, 3, false).expect("valid");
                    let b = objective.seq_and_smaller(&solution, r2, 2, 3, false).expect("valid");
                    if !a.is_empty() && !b.is_empty() {
                        objective
                            .try_swap_seq(&mut solution, r1, &a[i % a.len()], r2, &b[j % b.len()])
                            .expect("valid");
                    }
                }
                0 | 1 => {}
                _ => {
                    if !objective.apply_penalty(&solution, r1, r2).expect("valid") {
                        objective.reset_penalty();
                    }
                }
            }
        }

        prop_assert_eq!(solution.tours().num_visits(), 12);
        let fixed = solution.tour(ids[2]);
        prop_assert_eq!(fixed.kind(), TourKind::Fixed(order[11]));
        prop_assert_eq!(fixed.last(), order[11]);
        prop_assert_eq!(fixed.first(), order[8]);
        prop_assert_eq!(solution.tour(ids[1]).kind(), TourKind::Open);
        prop_assert_eq!(solution.tour(ids[1]).first(), order[4]);
        for id in ids {
            let fresh = objective.recompute_content(&solution, id).expect("valid");
            prop_assert!(
                fresh.approx_eq(solution.content(id), 1e-6),
                "route {}: cached {:?}, recomputed {:?}",
                id.index(),
                solution.content(id),
                fresh
            );
        }
    }

    /// Property: the exact detour is no dearer than detouring on any one
    /// edge, before and after removing a visit.
    #[test]
    fn exact_depot_within_estimate(
        visits in permutation(10),
        kind in 0u8..3,
        costs in prop::collection::vec(0.5f64..30.0, 11 * 11),
        drop in any::<usize>(),
    ) {
        let dm = matrix(11, &costs);
        let depot = CheapestDetour::new(10);
        let tour = build(&visits, kind);
        let mut solution = Solution::new();
        let id = solution
            .add_tour(&tour, Capacity::new(f64::INFINITY).empty_content())
            .expect("valid");

        let exact = solution.simulate_depot_cost(id, &depot, &dm, |_| {}).expect("valid");
        for [a, b] in tour.pairs() {
            prop_assert!(exact <= depot.detour(a, b, &dm) + 1e-9);
        }

        let removable: Vec<usize> = visits
            .iter()
            .copied()
            .filter(|&v| v != tour.first() && !tour.anchor().is_fixed_last(v))
            .collect();
        if !removable.is_empty() {
            let v = removable[drop % removable.len()];
            let pos = visits.iter().position(|&x| x == v).expect("present");
            let prev = visits[pos - 1];
            if let Some(next) = visits.get(pos + 1).copied().or((tour.kind() == TourKind::Closed).then_some(tour.first())) {
                let after = solution
                    .simulate_depot_cost(id, &depot, &dm, |vs| vs.retain(|&x| x != v))
                    .expect("valid");
                prop_assert!(after <= depot.detour(prev, next, &dm) + 1e-9);
            }
        }
    }

    /// Property: any sequence of penalties is undone exactly by a reset.
    #[test]
    fn penalty_reset_is_exact(
        costs in prop::collection::vec(0.1f64..50.0, 8 * 8),
        edges in prop::collection::vec((0usize..8, 0usize..8), 1..40),
    ) {
        let dm = matrix(8, &costs);
        let mut objective = Objective::new(dm.clone(), Capacity::new(f64::INFINITY));
        for (a, b) in edges {
            objective.penalize_edge(a, b);
        }
        prop_assert!(!objective.penalties().is_empty());
        objective.reset_penalty();
        prop_assert!(objective.penalties().is_empty());
        prop_assert_eq!(objective.working_matrix(), &dm);
        prop_assert_eq!(objective.matrix(), &dm);
    }
}
