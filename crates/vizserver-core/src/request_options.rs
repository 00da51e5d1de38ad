use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_PAGE_SIZE: u32 = 100;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum FilterOperator {
    Equals,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    In,
    Has,
}

impl FilterOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Equals => "eq",
            FilterOperator::GreaterThan => "gt",
            FilterOperator::GreaterThanOrEqual => "gte",
            FilterOperator::LessThan => "lt",
            FilterOperator::LessThanOrEqual => "lte",
            FilterOperator::In => "in",
            FilterOperator::Has => "has",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub operator: FilterOperator,
    pub values: Vec<String>,
}

impl Filter {
    pub fn new(
        field: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            values: vec![value.into()],
        }
    }

    pub fn any_of<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: field.into(),
            operator: FilterOperator::In,
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.operator == FilterOperator::In {
            write!(
                f,
                "{}:{}:[{}]",
                self.field,
                self.operator.as_str(),
                self.values.join(",")
            )
        } else {
            write!(
                f,
                "{}:{}:{}",
                self.field,
                self.operator.as_str(),
                self.values.first().map(String::as_str).unwrap_or("")
            )
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl fmt::Display for Sort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        write!(f, "{}:{direction}", self.field)
    }
}

/// Paging, filtering and sorting for list endpoints.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RequestOptions {
    pub page_number: u32,
    pub page_size: u32,
    pub filters: Vec<Filter>,
    pub sorts: Vec<Sort>,
    pub fields: Vec<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
            filters: Vec::new(),
            sorts: Vec::new(),
            fields: Vec::new(),
        }
    }
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn page_number(mut self, page_number: u32) -> Self {
        self.page_number = page_number;
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sorts.push(Sort {
            field: field.into(),
            direction,
        });
        self
    }

    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Same options pointed at the following page.
    pub fn next_page(&self) -> Self {
        let mut next = self.clone();
        next.page_number = self.page_number.saturating_add(1);
        next
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("pageSize".to_string(), self.page_size.to_string()),
            ("pageNumber".to_string(), self.page_number.to_string()),
        ];
        if !self.filters.is_empty() {
            pairs.push(("filter".to_string(), join_display(&self.filters)));
        }
        if !self.sorts.is_empty() {
            pairs.push(("sort".to_string(), join_display(&self.sorts)));
        }
        if !self.fields.is_empty() {
            pairs.push(("fields".to_string(), self.fields.join(",")));
        }
        pairs
    }
}

fn join_display<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_only_page() {
        let pairs = RequestOptions::new().query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("pageSize".to_string(), "100".to_string()),
                ("pageNumber".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn filters_and_sorts_are_comma_joined() {
        let options = RequestOptions::new()
            .page_size(25)
            .filter(Filter::new("name", FilterOperator::Equals, "Sales"))
            .filter(Filter::any_of("tags", ["finance", "q3"]))
            .sort("updatedAt", SortDirection::Desc)
            .sort("name", SortDirection::Asc);
        let pairs = options.query_pairs();
        assert!(pairs.contains(&("pageSize".to_string(), "25".to_string())));
        assert!(pairs.contains(&(
            "filter".to_string(),
            "name:eq:Sales,tags:in:[finance,q3]".to_string()
        )));
        assert!(pairs.contains(&("sort".to_string(), "updatedAt:desc,name:asc".to_string())));
    }

    #[test]
    fn next_page_keeps_filters() {
        let options = RequestOptions::new()
            .page_number(3)
            .filter(Filter::new("ownerName", FilterOperator::Equals, "ana"));
        let next = options.next_page();
        assert_eq!(next.page_number, 4);
        assert_eq!(next.filters, options.filters);
    }

    #[test]
    fn fields_are_listed() {
        let pairs = RequestOptions::new().field("_default_").field("owner.name").query_pairs();
        assert!(pairs.contains(&("fields".to_string(), "_default_,owner.name".to_string())));
    }
}
