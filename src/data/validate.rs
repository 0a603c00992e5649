use std::fmt;

use serde::Serialize;

use crate::data::catalog::Catalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

/// Check a loaded catalog for data the engine cannot use or will treat specially.
pub fn validate_catalog(catalog: &Catalog) -> ValidationReport {
    let mut report = ValidationReport::default();

    for (index, creature) in catalog.creatures().iter().enumerate() {
        let context = if creature.name.trim().is_empty() {
            format!("entry[{index}]")
        } else {
            creature.name.clone()
        };

        if creature.name.trim().is_empty() {
            report.push(ValidationSeverity::Error, &context, "missing name");
        }

        let stats = creature.stats;
        if stats.is_placeholder() {
            report.push(
                ValidationSeverity::Info,
                &context,
                "placeholder stats 1/1/1, CP queries will report no stats",
            );
        } else if stats.base_attack == 0 || stats.base_defense == 0 || stats.base_stamina == 0 {
            report.push(
                ValidationSeverity::Error,
                &context,
                format!(
                    "zero base stat ({}/{}/{})",
                    stats.base_attack, stats.base_defense, stats.base_stamina
                ),
            );
        }

        if creature.types.is_empty() {
            report.push(ValidationSeverity::Warning, &context, "no types listed");
        }
        if !catalog.types().is_empty() {
            for type_ref in &creature.types {
                if !catalog.types().contains(&type_ref.id) {
                    report.push(
                        ValidationSeverity::Warning,
                        &context,
                        format!("unknown type id '{}'", type_ref.id),
                    );
                }
            }
        }
    }

    report
}
