use serde::Deserialize;

use crate::types::ItemKind;

/// A named saved search.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Filter {
    pub name: String,
    pub query: String,
}

impl Filter {
    pub fn new(name: &str, query: &str) -> Self {
        Self {
            name: name.to_string(),
            query: query.to_string(),
        }
    }
}

pub fn default_filters() -> Vec<Filter> {
    vec![
        Filter::new("Open", "is:open archived:false involves:@me"),
        Filter::new("Review requested", "review-requested:@me"),
        Filter::new("Assigned", "assignee:@me"),
        Filter::new("Mentions", "mentions:@me"),
        Filter::new("Authored", "author:@me"),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tab {
    pub name: &'static str,
    pub kind: ItemKind,
}

pub const TABS: [Tab; 2] = [
    Tab {
        name: "PRs",
        kind: ItemKind::Pr,
    },
    Tab {
        name: "Issues",
        kind: ItemKind::Issue,
    },
];

const TYPE_QUALIFIERS: [&str; 4] = ["is:pr", "is:issue", "is:pull-request", "is:pullrequest"];

/// Whether the query already restricts results to issues or pull requests.
pub fn has_type_qualifier(query: &str) -> bool {
    let normalized = query.to_lowercase();
    ["is:issue", "is:pr", "is:pull-request"]
        .iter()
        .any(|q| normalized.contains(q))
}

/// Replace any type qualifier in `query` with the one for `kind`.
pub fn apply_tab_query(query: &str, kind: ItemKind) -> String {
    let mut tokens: Vec<&str> = query
        .split_whitespace()
        .filter(|tok| !TYPE_QUALIFIERS.contains(&tok.to_lowercase().as_str()))
        .collect();
    tokens.push(kind.qualifier());
    tokens.join(" ")
}
