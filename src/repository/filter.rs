//! Search filter shared by every resource listing
//!
//! A filter is built from the optional `?search=` term and the resource's
//! searchable fields. It can be evaluated against records in memory or
//! rendered as a parameterised SQL condition; both give the same answer.

use crate::models::Resource;

/// Case-insensitive substring match of one term, OR-ed across fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    term: Option<String>,
    fields: Vec<&'static str>,
}

/// SQL rendering of a [`SearchFilter`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlCondition {
    /// Boolean SQL expression suitable for a WHERE clause
    pub clause: String,
    /// LIKE pattern to bind to the placeholder used in `clause`, if any
    pub pattern: Option<String>,
}

impl SearchFilter {
    /// Build a filter. A missing or whitespace-only term matches everything.
    pub fn build(search: Option<&str>, fields: &[&'static str]) -> Self {
        let term = search
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_string);

        Self {
            term,
            fields: fields.to_vec(),
        }
    }

    /// Filter over the searchable fields of `E`
    pub fn for_resource<E: Resource>(search: Option<&str>) -> Self {
        Self::build(search, E::SEARCH_FIELDS)
    }

    /// Filter matching every record
    pub fn all() -> Self {
        Self {
            term: None,
            fields: Vec::new(),
        }
    }

    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    pub fn fields(&self) -> &[&'static str] {
        &self.fields
    }

    /// Evaluate the filter against a single record
    pub fn matches<E: Resource>(&self, record: &E) -> bool {
        let Some(term) = &self.term else {
            return true;
        };
        let needle = term.to_lowercase();

        self.fields.iter().any(|field| {
            record
                .field(field)
                .is_some_and(|value| value.to_lowercase().contains(&needle))
        })
    }

    /// Render as SQL using placeholder `$param` for the pattern.
    ///
    /// Field names come from the resource definitions, never from requests.
    pub fn sql_condition(&self, param: usize) -> SqlCondition {
        let Some(term) = &self.term else {
            return SqlCondition {
                clause: "TRUE".to_string(),
                pattern: None,
            };
        };

        if self.fields.is_empty() {
            return SqlCondition {
                clause: "FALSE".to_string(),
                pattern: None,
            };
        }

        let clause = self
            .fields
            .iter()
            .map(|field| format!("{} ILIKE ${} ESCAPE '\\'", field, param))
            .collect::<Vec<_>>()
            .join(" OR ");

        SqlCondition {
            clause: format!("({})", clause),
            pattern: Some(format!("%{}%", escape_like(term))),
        }
    }
}

/// Escape LIKE wildcards so the term matches literally
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
