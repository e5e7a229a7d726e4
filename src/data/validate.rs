use std::collections::HashSet;
use std::fmt;

use crate::data::country::{CountryRecord, YearValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ValidationSeverity {
    Error,
    Warning,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default)]
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

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == ValidationSeverity::Error)
            .count()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationDiagnostic> {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == ValidationSeverity::Warning)
    }
}

/// Checks the invariants every consumer of the table relies on.
///
/// Errors: empty or duplicate names, non-positive population, negative or non-finite budget and
/// GDP share, non-finite tech index, and series whose years are not strictly increasing.
/// Warnings: more international bases than bases, tech index outside 0-10.
pub fn validate_records(records: &[CountryRecord]) -> ValidationReport {
    let mut report = ValidationReport::default();
    let mut seen_names = HashSet::new();

    for (index, record) in records.iter().enumerate() {
        let context = if record.name.trim().is_empty() {
            report.push(
                ValidationSeverity::Error,
                format!("countries[{index}].name"),
                "missing non-empty 'name'",
            );
            format!("countries[{index}]")
        } else {
            if !seen_names.insert(record.name.as_str()) {
                report.push(
                    ValidationSeverity::Error,
                    format!("countries[{index}].name"),
                    format!("duplicate country '{}'", record.name),
                );
            }
            format!("countries[{index}] name='{}'", record.name)
        };

        if !(record.population.is_finite() && record.population > 0.0) {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.population"),
                format!("must be a positive number, got {}", record.population),
            );
        }

        for (field, value) in [("budget", record.budget), ("gdpPercent", record.gdp_percent)] {
            if !value.is_finite() || value < 0.0 {
                report.push(
                    ValidationSeverity::Error,
                    format!("{context}.{field}"),
                    format!("must be a finite non-negative number, got {value}"),
                );
            }
        }

        if !record.tech_index.is_finite() {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.techIndex"),
                format!("must be a finite number, got {}", record.tech_index),
            );
        } else if !(0.0..=10.0).contains(&record.tech_index) {
            report.push(
                ValidationSeverity::Warning,
                format!("{context}.techIndex"),
                format!("{} is outside the usual 0-10 range", record.tech_index),
            );
        }

        if record.international_bases_or_zero() > record.bases {
            report.push(
                ValidationSeverity::Warning,
                format!("{context}.internationalBases"),
                format!(
                    "{} international bases exceed {} total bases",
                    record.international_bases_or_zero(),
                    record.bases
                ),
            );
        }

        validate_series(
            &mut report,
            &format!("{context}.historicalBudget"),
            &record.historical_budget,
        );
        validate_series(
            &mut report,
            &format!("{context}.historicalNukes"),
            &record.historical_nukes,
        );
        if let Some(projections) = &record.projections {
            for (field, series) in [
                ("budget", &projections.budget),
                ("personnel", &projections.personnel),
                ("nukes", &projections.nukes),
            ] {
                validate_series(
                    &mut report,
                    &format!("{context}.projections.{field}"),
                    series,
                );
            }
        }
    }

    report
}

fn validate_series(report: &mut ValidationReport, context: &str, series: &[YearValue]) {
    for (index, point) in series.iter().enumerate() {
        if !point.value.is_finite() {
            report.push(
                ValidationSeverity::Error,
                format!("{context}[{index}]"),
                format!("value for {} is not finite", point.year),
            );
        }
    }
    for (index, pair) in series.windows(2).enumerate() {
        if pair[1].year <= pair[0].year {
            report.push(
                ValidationSeverity::Error,
                format!("{context}[{}]", index + 1),
                format!(
                    "years must be strictly increasing ({} follows {})",
                    pair[1].year, pair[0].year
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> CountryRecord {
        CountryRecord {
            name: name.to_string(),
            flag: "F".to_string(),
            color: "#111111".to_string(),
            active_personnel: 100,
            reserve_personnel: 10,
            population: 2.0,
            budget: 3.0,
            gdp_percent: 1.0,
            aircraft: 1,
            tanks: 1,
            naval: 1,
            submarines: None,
            nukes: 0,
            bases: 2,
            international_bases: None,
            tech_index: 5.0,
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            historical_budget: vec![
                YearValue { year: 2020, value: 1.0 },
                YearValue { year: 2021, value: 2.0 },
            ],
            historical_nukes: Vec::new(),
            projections: None,
        }
    }

    #[test]
    fn clean_records_produce_no_diagnostics() {
        let report = validate_records(&[record("A"), record("B")]);
        assert!(report.diagnostics.is_empty(), "{:?}", report.diagnostics);
    }

    #[test]
    fn duplicate_names_and_zero_population_are_errors() {
        let mut second = record("A");
        second.population = 0.0;
        let report = validate_records(&[record("A"), second]);
        assert!(report.has_errors());
        assert_eq!(report.error_count(), 2);
        assert!(report
            .diagnostics
            .iter()
            .any(|diag| diag.message.contains("duplicate country 'A'")));
    }

    #[test]
    fn repeated_year_is_an_error() {
        let mut bad = record("A");
        bad.historical_budget.push(YearValue { year: 2021, value: 3.0 });
        let report = validate_records(&[bad]);
        assert_eq!(report.error_count(), 1);
        assert!(report.diagnostics[0].context.ends_with("historicalBudget[2]"));
    }

    #[test]
    fn tech_index_outside_usual_range_is_only_a_warning() {
        let mut negative = record("A");
        negative.tech_index = -0.5;
        let mut high = record("B");
        high.tech_index = 11.0;
        let report = validate_records(&[negative, high]);
        assert!(!report.has_errors(), "{:?}", report.diagnostics);
        let contexts: Vec<&str> = report.warnings().map(|diag| diag.context.as_str()).collect();
        assert_eq!(contexts.len(), 2);
        assert!(contexts.iter().all(|context| context.ends_with(".techIndex")));
    }

    #[test]
    fn non_finite_tech_index_is_an_error() {
        let mut bad = record("A");
        bad.tech_index = f64::NAN;
        let report = validate_records(&[bad]);
        assert_eq!(report.error_count(), 1);
        assert!(report.diagnostics[0].context.ends_with(".techIndex"));
    }

    #[test]
    fn excess_international_bases_is_only_a_warning() {
        let mut odd = record("A");
        odd.international_bases = Some(5);
        let report = validate_records(&[odd]);
        assert!(!report.has_errors());
        assert_eq!(report.warnings().count(), 1);
    }
}
