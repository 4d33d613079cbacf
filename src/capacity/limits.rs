//! Capacity limits and the feasibility checks built on them.

use serde::{Deserialize, Serialize};

use super::{Content, Seq};
use crate::error::CapacityError;
use crate::tolerance::FEASIBILITY_TOLERANCE;

/// A named secondary resource with a per-visit value and a maximum.
///
/// # Examples
///
/// ```
/// use u_cvrp::capacity::Constraint;
///
/// let load = Constraint::new("load", 5.0, vec![1.0, 2.0, 3.0]);
/// assert_eq!(load.value(1), 2.0);
/// assert_eq!(load.value(9), 0.0);
/// assert_eq!(load.total(&[0, 2]), 4.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    name: String,
    max: f64,
    values: Vec<f64>,
}

impl Constraint {
    /// Creates a constraint.
    pub fn new(name: impl Into<String>, max: f64, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            max,
            values,
        }
    }

    /// Constraint name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Maximum allowed quantity per tour.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Per-visit values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value of visit `v`; visits without an entry count as zero.
    pub fn value(&self, v: usize) -> f64 {
        self.values.get(v).copied().unwrap_or(0.0)
    }

    /// Sum of values over `visits`.
    pub fn total(&self, visits: &[usize]) -> f64 {
        visits.iter().map(|&v| self.value(v)).sum()
    }
}

/// The budget of one vehicle.
///
/// A change is admissible on a dimension if the result stays within its
/// maximum, or if it does not increase that dimension. Limits are inclusive.
///
/// # Examples
///
/// ```
/// use u_cvrp::capacity::{Capacity, Constraint, Content};
///
/// let capacity = Capacity::new(10.0)
///     .with_constraint(Constraint::new("load", 5.0, vec![1.0; 5]));
/// let mut content = Content::new(0.0, vec![3.0]);
///
/// assert!(capacity.can_add(&content, 0, 0.0));
/// capacity.add(&mut content, 0, 0.0).unwrap();
/// assert!(capacity.can_add(&content, 1, 0.0)); // reaches exactly 5
/// capacity.add(&mut content, 1, 0.0).unwrap();
/// assert!(!capacity.can_add(&content, 2, 0.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capacity {
    max: f64,
    constraints: Vec<Constraint>,
}

impl Capacity {
    /// Creates a capacity with a primary limit and no constraints.
    pub fn new(max: f64) -> Self {
        Self {
            max,
            constraints: Vec::new(),
        }
    }

    /// Adds a named constraint.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Primary limit.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Secondary constraints.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Content of an empty tour.
    pub fn empty_content(&self) -> Content {
        Content::new(0.0, vec![0.0; self.constraints.len()])
    }

    /// Returns `true` if `weight` is within the primary limit.
    pub fn fits_weight(&self, weight: f64) -> bool {
        weight <= self.max + FEASIBILITY_TOLERANCE
    }

    /// Recomputes every constraint over `visits` and checks it.
    /// O(constraints × visits).
    pub fn constraints_are_honored(&self, visits: &[usize]) -> bool {
        self.constraints
            .iter()
            .all(|c| within(c.total(visits), c.max))
    }

    /// Overwrites `content` from scratch for a tour over `visits` with
    /// primary cost `weight`.
    ///
    /// Fails, leaving `content` untouched, if a constraint is already
    /// violated; callers check [`constraints_are_honored`](Self::constraints_are_honored)
    /// first.
    pub fn update_costs(
        &self,
        content: &mut Content,
        visits: &[usize],
        weight: f64,
    ) -> Result<(), CapacityError> {
        let mut quantities = Vec::with_capacity(self.constraints.len());
        for c in &self.constraints {
            let quantity = c.total(visits);
            if !within(quantity, c.max) {
                return Err(CapacityError::ConstraintViolated {
                    name: c.name.clone(),
                    quantity,
                    max: c.max,
                });
            }
            quantities.push(quantity);
        }
        content.weight = weight;
        content.quantities = quantities;
        Ok(())
    }

    /// Can `v` join the tour, changing its weight by `weight_delta`?
    pub fn can_add(&self, content: &Content, v: usize, weight_delta: f64) -> bool {
        self.admits(content, weight_delta, |c| c.value(v))
    }

    /// Can `v` leave the tour, changing its weight by `weight_delta`?
    pub fn can_remove(&self, content: &Content, v: usize, weight_delta: f64) -> bool {
        self.admits(content, weight_delta, |c| -c.value(v))
    }

    /// Can `out` be replaced by `incoming`?
    pub fn exchange_is_possible(
        &self,
        content: &Content,
        out: usize,
        incoming: usize,
        weight_delta: f64,
    ) -> bool {
        self.admits(content, weight_delta, |c| c.value(incoming) - c.value(out))
    }

    /// Can the run `seq` join the tour?
    pub fn can_add_seq(&self, content: &Content, seq: &Seq, weight_delta: f64) -> bool {
        self.admits(content, weight_delta, |c| c.total(seq.visits()))
    }

    /// Can the run `seq` leave the tour?
    pub fn can_remove_seq(&self, content: &Content, seq: &Seq, weight_delta: f64) -> bool {
        self.admits(content, weight_delta, |c| -c.total(seq.visits()))
    }

    /// Can run `out` be replaced by run `incoming`?
    pub fn exchange_is_possible_seq(
        &self,
        content: &Content,
        out: &Seq,
        incoming: &Seq,
        weight_delta: f64,
    ) -> bool {
        self.admits(content, weight_delta, |c| {
            c.total(incoming.visits()) - c.total(out.visits())
        })
    }

    /// Can the tour's weight change by `weight_delta` with its visits
    /// unchanged (a reordering)?
    pub fn can_reweigh(&self, content: &Content, weight_delta: f64) -> bool {
        self.admits(content, weight_delta, |_| 0.0)
    }

    /// Records a reordering that changes the weight by `weight_delta`.
    pub fn reweigh(&self, content: &mut Content, weight_delta: f64) -> Result<(), CapacityError> {
        self.commit(content, weight_delta, |_| 0.0)
    }

    /// Records `v` joining the tour.
    pub fn add(&self, content: &mut Content, v: usize, weight_delta: f64) -> Result<(), CapacityError> {
        self.commit(content, weight_delta, |c| c.value(v))
    }

    /// Records `v` leaving the tour.
    pub fn remove(&self, content: &mut Content, v: usize, weight_delta: f64) -> Result<(), CapacityError> {
        self.commit(content, weight_delta, |c| -c.value(v))
    }

    /// Records `out` being replaced by `incoming`.
    pub fn update_exchange(
        &self,
        content: &mut Content,
        out: usize,
        incoming: usize,
        weight_delta: f64,
    ) -> Result<(), CapacityError> {
        self.commit(content, weight_delta, |c| c.value(incoming) - c.value(out))
    }

    /// Records the run `seq` joining the tour.
    pub fn add_seq(&self, content: &mut Content, seq: &Seq, weight_delta: f64) -> Result<(), CapacityError> {
        self.commit(content, weight_delta, |c| c.total(seq.visits()))
    }

    /// Records the run `seq` leaving the tour.
    pub fn remove_seq(&self, content: &mut Content, seq: &Seq, weight_delta: f64) -> Result<(), CapacityError> {
        self.commit(content, weight_delta, |c| -c.total(seq.visits()))
    }

    /// Records run `out` being replaced by run `incoming`.
    pub fn update_exchange_seq(
        &self,
        content: &mut Content,
        out: &Seq,
        incoming: &Seq,
        weight_delta: f64,
    ) -> Result<(), CapacityError> {
        self.commit(content, weight_delta, |c| {
            c.total(incoming.visits()) - c.total(out.visits())
        })
    }

    fn admits(&self, content: &Content, weight_delta: f64, delta: impl Fn(&Constraint) -> f64) -> bool {
        if content.quantities.len() != self.constraints.len() {
            return false;
        }
        if weight_delta > 0.0 && !self.fits_weight(content.weight + weight_delta) {
            return false;
        }
        self.constraints
            .iter()
            .zip(&content.quantities)
            .all(|(c, &q)| {
                let d = delta(c);
                d <= 0.0 || within(q + d, c.max)
            })
    }

    fn commit(
        &self,
        content: &mut Content,
        weight_delta: f64,
        delta: impl Fn(&Constraint) -> f64,
    ) -> Result<(), CapacityError> {
        if content.quantities.len() != self.constraints.len() {
            return Err(CapacityError::DimensionMismatch {
                content: content.quantities.len(),
                capacity: self.constraints.len(),
            });
        }
        if !self.admits(content, weight_delta, &delta) {
            return Err(CapacityError::Infeasible);
        }
        content.weight += weight_delta;
        for (c, q) in self.constraints.iter().zip(content.quantities.iter_mut()) {
            *q += delta(c);
        }
        Ok(())
    }
}

fn within(quantity: f64, max: f64) -> bool {
    quantity <= max + FEASIBILITY_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_capacity() -> Capacity {
        Capacity::new(10.0).with_constraint(Constraint::new("load", 5.0, vec![1.0; 5]))
    }

    #[test]
    fn test_can_add_boundary() {
        let capacity = unit_capacity();
        let mut content = Content::new(0.0, vec![3.0]);
        assert!(capacity.can_add(&content, 0, 0.0));
        capacity.add(&mut content, 0, 0.0).expect("4 <= 5");
        assert!(capacity.can_add(&content, 1, 0.0));
        capacity.add(&mut content, 1, 0.0).expect("5 <= 5");
        assert_eq!(content.quantities(), &[5.0]);
        assert!(!capacity.can_add(&content, 2, 0.0));
        assert_eq!(capacity.add(&mut content, 2, 0.0), Err(CapacityError::Infeasible));
        assert_eq!(content.quantities(), &[5.0]);
    }

    #[test]
    fn test_weight_limit() {
        let capacity = unit_capacity();
        let content = Content::new(8.0, vec![0.0]);
        assert!(capacity.can_add(&content, 0, 2.0));
        assert!(!capacity.can_add(&content, 0, 2.5));
    }

    #[test]
    fn test_overloaded_tour_may_shrink() {
        let capacity = unit_capacity();
        let mut content = Content::new(15.0, vec![7.0]);
        assert!(capacity.can_remove(&content, 0, -3.0));
        capacity.remove(&mut content, 0, -3.0).expect("shrinking");
        assert_eq!(content.quantities(), &[6.0]);
        assert!((content.weight() - 12.0).abs() < 1e-10);
    }

    #[test]
    fn test_exchange() {
        let capacity = Capacity::new(100.0).with_constraint(Constraint::new(
            "load",
            5.0,
            vec![1.0, 3.0, 2.0],
        ));
        let mut content = Content::new(0.0, vec![4.0]);
        assert!(capacity.exchange_is_possible(&content, 1, 2, 0.0));
        assert!(!capacity.exchange_is_possible(&content, 0, 1, 0.0));
        capacity.update_exchange(&mut content, 1, 2, 1.5).expect("feasible");
        assert_eq!(content.quantities(), &[3.0]);
        assert!((content.weight() - 1.5).abs() < 1e-10);
    }

    #[test]
    fn test_seq_overloads() {
        let capacity = unit_capacity();
        let mut content = Content::new(0.0, vec![2.0]);
        let seq = Seq::new(vec![0, 1, 2], 3, 4, 1.0).expect("non-empty");
        let big = Seq::new(vec![0, 1, 2, 3], 4, 4, 1.0).expect("non-empty");
        assert!(capacity.can_add_seq(&content, &seq, 1.0));
        assert!(!capacity.can_add_seq(&content, &big, 1.0));
        capacity.add_seq(&mut content, &seq, 1.0).expect("feasible");
        assert_eq!(content.quantities(), &[5.0]);
        assert!(capacity.exchange_is_possible_seq(&content, &seq, &seq, 0.0));
        capacity.remove_seq(&mut content, &seq, -1.0).expect("feasible");
        assert_eq!(content.quantities(), &[2.0]);
        assert!(content.weight().abs() < 1e-10);
    }

    #[test]
    fn test_reweigh() {
        let capacity = unit_capacity();
        let mut content = Content::new(9.0, vec![2.0]);
        assert!(capacity.can_reweigh(&content, 1.0));
        assert!(!capacity.can_reweigh(&content, 1.5));
        capacity.reweigh(&mut content, -4.0).expect("shorter");
        assert!((content.weight() - 5.0).abs() < 1e-10);
        assert_eq!(content.quantities(), &[2.0]);
    }

    #[test]
    fn test_update_costs() {
        let capacity = unit_capacity();
        let mut content = capacity.empty_content();
        capacity
            .update_costs(&mut content, &[0, 1, 2], 7.0)
            .expect("3 <= 5");
        assert_eq!(content, Content::new(7.0, vec![3.0]));
        assert!(capacity.constraints_are_honored(&[0, 1, 2, 3, 4]));
    }

    #[test]
    fn test_update_costs_rejects_violation() {
        let capacity = Capacity::new(10.0).with_constraint(Constraint::new("load", 2.0, vec![1.0; 5]));
        let mut content = capacity.empty_content();
        assert!(!capacity.constraints_are_honored(&[0, 1, 2]));
        let err = capacity
            .update_costs(&mut content, &[0, 1, 2], 1.0)
            .expect_err("violated");
        assert!(matches!(err, CapacityError::ConstraintViolated { ref name, .. } if name == "load"));
        assert_eq!(content, capacity.empty_content());
    }

    #[test]
    fn test_dimension_mismatch() {
        let capacity = unit_capacity();
        let mut content = Content::new(0.0, vec![]);
        assert!(!capacity.can_add(&content, 0, 0.0));
        assert_eq!(
            capacity.add(&mut content, 0, 0.0),
            Err(CapacityError::DimensionMismatch {
                content: 0,
                capacity: 1
            })
        );
    }
}
