//! Flow-conservation model construction.
//!
//! Translates a variant set plus a run configuration into an abstract
//! linear program: one row per (item, tier) node, one column per variant
//! activity, per external supply, and per byproduct sink. The abstract
//! form is engine-neutral; `solve` lowers it onto the LP backend.

use crate::catalog::Catalog;
use crate::config::{ByproductPolicy, PlanConfig};
use crate::error::PlanError;
use crate::id::ItemAtQuality;
use crate::variant::RecipeVariant;
use std::collections::{BTreeMap, BTreeSet};

/// Row comparison sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Eq,
    Ge,
}

/// What a column's activity level means in the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Activity of the variant at this index into the variant slice.
    Variant(usize),
    /// Rate of drawing an external input into the given node.
    Supply(ItemAtQuality),
    /// Rate of discarding surplus at the given node.
    Sink(ItemAtQuality),
}

/// One decision variable: its meaning and its objective coefficient.
/// All columns are bounded below by zero and unbounded above.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub kind: ColumnKind,
    pub objective: f64,
}

/// One balance constraint over an (item, tier) node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Row {
    pub node: ItemAtQuality,
    pub sense: Sense,
    pub rhs: f64,
}

/// The assembled program. `coefficients[r]` holds the nonzero
/// (column index, value) pairs of row `r`, column indices strictly
/// increasing within each row.
#[derive(Debug, Clone)]
pub struct LinearProgram {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    pub coefficients: Vec<Vec<(usize, f64)>>,
}

/// Build the flow-conservation program for this variant set.
///
/// Every node touched by a variant, an input, or the demand gets a row.
/// Production enters with positive sign, consumption with negative; the
/// demand row requires at least (or exactly) the requested amount, every
/// other row balances to zero. Fails fast with `ModelInfeasible` when no
/// chain of variants can reach the demand node from the external inputs.
pub fn build_model(
    catalog: &Catalog,
    config: &PlanConfig,
    variants: &[RecipeVariant],
) -> Result<LinearProgram, PlanError> {
    check_reachability(catalog, config, variants)?;

    let mut nodes: BTreeSet<ItemAtQuality> = BTreeSet::new();
    for v in variants {
        nodes.extend(v.consumption.iter().map(|&(n, _)| n));
        nodes.extend(v.production.iter().map(|&(n, _)| n));
    }
    for input in &config.inputs {
        nodes.insert(input.node);
    }
    nodes.insert(config.demand.node);

    let row_of: BTreeMap<ItemAtQuality, usize> =
        nodes.iter().enumerate().map(|(i, &n)| (n, i)).collect();

    let mut rows: Vec<Row> = nodes
        .iter()
        .map(|&node| Row {
            node,
            sense: Sense::Eq,
            rhs: 0.0,
        })
        .collect();
    let demand_row = row_of[&config.demand.node];
    rows[demand_row].sense = if config.demand.exact {
        Sense::Eq
    } else {
        Sense::Ge
    };
    rows[demand_row].rhs = config.demand.amount;

    let mut columns: Vec<Column> = Vec::new();
    let mut entries: Vec<Vec<(usize, f64)>> = vec![Vec::new(); rows.len()];

    for (index, v) in variants.iter().enumerate() {
        let col = columns.len();
        columns.push(Column {
            kind: ColumnKind::Variant(index),
            objective: config.costs.module * f64::from(v.module_count())
                + config.costs.building,
        });
        let mut net: BTreeMap<ItemAtQuality, f64> = BTreeMap::new();
        for &(node, amount) in &v.consumption {
            *net.entry(node).or_insert(0.0) -= amount;
        }
        for &(node, amount) in &v.production {
            *net.entry(node).or_insert(0.0) += amount;
        }
        for (node, value) in net {
            if value != 0.0 {
                entries[row_of[&node]].push((col, value));
            }
        }
    }

    for input in &config.inputs {
        let col = columns.len();
        columns.push(Column {
            kind: ColumnKind::Supply(input.node),
            objective: config.costs.resource * input.cost,
        });
        entries[row_of[&input.node]].push((col, 1.0));
    }

    if config.byproducts == ByproductPolicy::Void {
        let input_nodes: BTreeSet<ItemAtQuality> =
            config.inputs.iter().map(|i| i.node).collect();
        for &node in &nodes {
            if node == config.demand.node || input_nodes.contains(&node) {
                continue;
            }
            let col = columns.len();
            columns.push(Column {
                kind: ColumnKind::Sink(node),
                objective: 0.0,
            });
            entries[row_of[&node]].push((col, -1.0));
        }
    }

    tracing::debug!(
        rows = rows.len(),
        columns = columns.len(),
        "assembled flow-conservation program"
    );
    Ok(LinearProgram {
        columns,
        rows,
        coefficients: entries,
    })
}

/// Fixpoint closure over producible nodes: a variant fires once all of
/// its consumed nodes are producible; the external inputs seed the set.
/// Catches disconnected demands before the engine reports a bare
/// "infeasible" with no context.
fn check_reachability(
    catalog: &Catalog,
    config: &PlanConfig,
    variants: &[RecipeVariant],
) -> Result<(), PlanError> {
    let mut producible: BTreeSet<ItemAtQuality> =
        config.inputs.iter().map(|i| i.node).collect();
    let mut changed = true;
    while changed {
        changed = false;
        for v in variants {
            if v.consumption.iter().all(|(n, _)| producible.contains(n)) {
                for &(n, _) in &v.production {
                    if producible.insert(n) {
                        changed = true;
                    }
                }
            }
        }
    }
    if producible.contains(&config.demand.node) {
        Ok(())
    } else {
        Err(PlanError::ModelInfeasible {
            node: catalog.node_label(config.demand.node),
        })
    }
}
