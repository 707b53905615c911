//! Build-time checks over a set of conversion rules.

use std::collections::{BTreeMap, BTreeSet};

use uf_core::{UfError, UfResult};

use crate::conversion::Conversions;

/// Every rule must start at a distinct derived unit and lead to base units or
/// to other rules, and the rules must not form a cycle.
pub(crate) fn validate_conversions(conversions: &Conversions) -> UfResult<()> {
    let mut seen = BTreeSet::new();
    for unit in conversions.iter().filter_map(|c| c.from_unit()) {
        if !seen.insert(unit) {
            return Err(UfError::definition(format!(
                "unit '{unit}' has more than one conversion rule"
            )));
        }
    }

    let mut edges: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();

    for rule in conversions.active() {
        let [source] = rule.from().axes() else {
            continue;
        };
        if source.unit.is_base() {
            return Err(UfError::definition(format!(
                "base unit '{}' cannot have a conversion rule",
                source.unit.symbol
            )));
        }
        let targets = edges.entry(source.unit.symbol.as_str()).or_default();
        for axis in rule.to().axes() {
            if axis.unit.is_base() {
                continue;
            }
            if conversions.find(&axis.unit).is_none() {
                return Err(UfError::definition(format!(
                    "'{}' converts to '{}', which is neither a base unit nor convertible",
                    source.unit.symbol, axis.unit.symbol
                )));
            }
            targets.insert(axis.unit.symbol.as_str());
        }
    }

    // Kahn's algorithm over "depends on" edges
    let mut in_degree: BTreeMap<&str, usize> = edges.keys().map(|&k| (k, 0)).collect();
    for targets in edges.values() {
        for target in targets {
            if let Some(deg) = in_degree.get_mut(target) {
                *deg += 1;
            }
        }
    }

    let mut queue: Vec<&str> = in_degree
        .iter()
        .filter(|(_, deg)| **deg == 0)
        .map(|(&unit, _)| unit)
        .collect();
    let mut visited = 0;

    while let Some(unit) = queue.pop() {
        visited += 1;
        for target in edges.get(unit).into_iter().flatten() {
            if let Some(deg) = in_degree.get_mut(target) {
                *deg -= 1;
                if *deg == 0 {
                    queue.push(*target);
                }
            }
        }
    }

    if visited != in_degree.len() {
        let cyclic: Vec<&str> = in_degree
            .into_iter()
            .filter(|(_, deg)| *deg > 0)
            .map(|(unit, _)| unit)
            .collect();
        return Err(UfError::definition(format!(
            "conversion rules form a cycle through {}",
            cyclic.join(", ")
        )));
    }
    Ok(())
}
