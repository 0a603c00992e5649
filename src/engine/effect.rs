//! Type relations for a creature or a single type, and their summary buckets.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::creature::StatBlock;
use crate::data::types::{TypeChart, TypeEntry};

const DOUBLE_SUPER: f64 = 1.9;
const SUPER: f64 = 1.4;
const DOUBLE_RESISTED: f64 = 0.6;
const RESISTED: f64 = 0.8;

/// Damage scalars dealt (`attack`) and taken (`defense`), keyed by type name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TypeRelations {
    pub attack: BTreeMap<String, f64>,
    pub defense: BTreeMap<String, f64>,
}

impl TypeRelations {
    /// Relations of one type on its own.
    pub fn for_type(chart: &TypeChart, entry: &TypeEntry) -> Self {
        Self {
            attack: chart.attack_scalars(&entry.id),
            defense: chart.defense_scalars(&entry.id),
        }
    }

    /// Relations of a creature: scalars multiplied across all of its types.
    pub fn for_creature(chart: &TypeChart, creature: &StatBlock) -> Self {
        let mut relations = Self::default();
        for type_ref in &creature.types {
            combine(&mut relations.attack, chart.attack_scalars(&type_ref.id));
            combine(&mut relations.defense, chart.defense_scalars(&type_ref.id));
        }
        relations
    }
}

fn combine(into: &mut BTreeMap<String, f64>, scalars: BTreeMap<String, f64>) {
    for (name, scalar) in scalars {
        *into.entry(name).or_insert(1.0) *= scalar;
    }
}

/// Type names grouped by effect. Double effects carry an `(x2)` suffix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EffectSummary {
    pub subject: String,
    pub types: Vec<String>,
    pub super_effective: Vec<String>,
    pub not_very_effective: Vec<String>,
    pub weak_to: Vec<String>,
    pub resistant_to: Vec<String>,
}

enum Bucket {
    Strong,
    Weak,
}

fn classify(scalar: f64) -> Option<(Bucket, bool)> {
    if scalar > DOUBLE_SUPER {
        Some((Bucket::Strong, true))
    } else if scalar >= SUPER {
        Some((Bucket::Strong, false))
    } else if scalar <= DOUBLE_RESISTED {
        Some((Bucket::Weak, true))
    } else if scalar <= RESISTED {
        Some((Bucket::Weak, false))
    } else {
        None
    }
}

fn label(name: &str, double: bool) -> String {
    if double {
        format!("{name}(x2)")
    } else {
        name.to_string()
    }
}

impl EffectSummary {
    pub fn new(subject: impl Into<String>, types: Vec<String>, relations: &TypeRelations) -> Self {
        let mut summary = Self {
            subject: subject.into(),
            types,
            ..Self::default()
        };
        for (name, scalar) in &relations.attack {
            match classify(*scalar) {
                Some((Bucket::Strong, double)) => summary.super_effective.push(label(name, double)),
                Some((Bucket::Weak, double)) => summary.not_very_effective.push(label(name, double)),
                None => {}
            }
        }
        for (name, scalar) in &relations.defense {
            match classify(*scalar) {
                Some((Bucket::Strong, double)) => summary.weak_to.push(label(name, double)),
                Some((Bucket::Weak, double)) => summary.resistant_to.push(label(name, double)),
                None => {}
            }
        }
        summary
    }
}
