//! Lowering onto the LP engine.
//!
//! The abstract program from `model` is handed to `microlp` column by
//! column, row by row. Nothing here knows about items or qualities; the
//! engine sees plain indices and the caller maps activities back through
//! the column table.

use crate::error::SolverFailure;
use crate::model::{LinearProgram, Sense};
use microlp::{ComparisonOp, LinearExpr, OptimizationDirection, Problem, Variable};

/// Raw engine output: the optimal objective and one activity per column,
/// in column order.
#[derive(Debug, Clone)]
pub struct RawSolution {
    pub objective_value: f64,
    pub values: Vec<f64>,
}

/// Minimize the program. Infeasibility and unboundedness are mapped to
/// their own variants; anything else the engine reports is passed through
/// as a numerical failure.
pub fn solve(lp: &LinearProgram) -> Result<RawSolution, SolverFailure> {
    let mut problem = Problem::new(OptimizationDirection::Minimize);

    let vars: Vec<Variable> = lp
        .columns
        .iter()
        .map(|col| problem.add_var(col.objective, (0.0, f64::INFINITY)))
        .collect();

    for (row, terms) in lp.rows.iter().zip(&lp.coefficients) {
        let mut expr = LinearExpr::empty();
        for &(col, value) in terms {
            expr.add(vars[col], value);
        }
        let op = match row.sense {
            Sense::Eq => ComparisonOp::Eq,
            Sense::Ge => ComparisonOp::Ge,
        };
        problem.add_constraint(expr, op, row.rhs);
    }

    let solution = problem.solve().map_err(|err| match err {
        microlp::Error::Infeasible => SolverFailure::Infeasible,
        microlp::Error::Unbounded => SolverFailure::Unbounded,
        other => SolverFailure::Numerical(other.to_string()),
    })?;

    let values = vars.iter().map(|&v| solution[v]).collect();
    Ok(RawSolution {
        objective_value: solution.objective(),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::{ItemAtQuality, ItemId, QualityTier};
    use crate::model::{Column, ColumnKind, Row};

    fn node(item: u32) -> ItemAtQuality {
        ItemAtQuality::new(ItemId(item), QualityTier(0))
    }

    // min 2x + 3y  s.t.  x + y >= 4  ->  x = 4, objective 8.
    #[test]
    fn minimizes_a_two_variable_program() {
        let lp = LinearProgram {
            columns: vec![
                Column {
                    kind: ColumnKind::Supply(node(0)),
                    objective: 2.0,
                },
                Column {
                    kind: ColumnKind::Supply(node(1)),
                    objective: 3.0,
                },
            ],
            rows: vec![Row {
                node: node(0),
                sense: Sense::Ge,
                rhs: 4.0,
            }],
            coefficients: vec![vec![(0, 1.0), (1, 1.0)]],
        };
        let raw = solve(&lp).unwrap();
        assert!((raw.objective_value - 8.0).abs() < 1e-9);
        assert!((raw.values[0] - 4.0).abs() < 1e-9);
        assert!(raw.values[1].abs() < 1e-9);
    }

    // x >= 0 with x = -1 required is infeasible.
    #[test]
    fn reports_infeasibility() {
        let lp = LinearProgram {
            columns: vec![Column {
                kind: ColumnKind::Supply(node(0)),
                objective: 1.0,
            }],
            rows: vec![Row {
                node: node(0),
                sense: Sense::Eq,
                rhs: -1.0,
            }],
            coefficients: vec![vec![(0, 1.0)]],
        };
        assert_eq!(solve(&lp).unwrap_err(), SolverFailure::Infeasible);
    }
}
