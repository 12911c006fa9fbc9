use std::collections::HashMap;

use crate::models::CanonicalVariable;

/// Case-insensitive lookup from token to the original column spelling.
///
/// Resolution is global: one choice per token list for the whole dataset,
/// decided once up front and shared by every downstream consumer.
pub struct ColumnResolver {
    lower_to_original: HashMap<String, String>,
}

impl ColumnResolver {
    pub fn new(columns: &[String]) -> Self {
        let lower_to_original = columns
            .iter()
            .map(|c| (c.to_lowercase(), c.clone()))
            .collect();
        Self { lower_to_original }
    }

    /// First token in the priority list present among the dataset's columns,
    /// or None when nothing matches. Zero matches is not an error; consumers
    /// treat an unresolved column as permanently null.
    pub fn resolve(&self, tokens: &[&str]) -> Option<&str> {
        tokens
            .iter()
            .find_map(|t| self.lower_to_original.get(*t))
            .map(String::as_str)
    }
}

/// The resolved source column, if any, for each canonical variable
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    resolved: HashMap<CanonicalVariable, String>,
}

impl ColumnMap {
    pub fn resolve(columns: &[String]) -> Self {
        let resolver = ColumnResolver::new(columns);
        let resolved = CanonicalVariable::ALL
            .iter()
            .filter_map(|&var| {
                resolver
                    .resolve(var.tokens())
                    .map(|col| (var, col.to_string()))
            })
            .collect();
        Self { resolved }
    }

    pub fn column(&self, variable: CanonicalVariable) -> Option<&str> {
        self.resolved.get(&variable).map(String::as_str)
    }

    /// Distinct resolved source columns, in canonical variable order
    pub fn resolved_columns(&self) -> Vec<&str> {
        let mut columns = Vec::new();
        for var in CanonicalVariable::ALL {
            if let Some(col) = self.column(var) {
                if !columns.contains(&col) {
                    columns.push(col);
                }
            }
        }
        columns
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}
