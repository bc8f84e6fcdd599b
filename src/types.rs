use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Pr,
    Issue,
}

impl ItemKind {
    /// The search qualifier selecting this kind.
    pub fn qualifier(&self) -> &'static str {
        match self {
            ItemKind::Pr => "is:pr",
            ItemKind::Issue => "is:issue",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Pr => write!(f, "PR"),
            ItemKind::Issue => write!(f, "Issue"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    Open,
    Closed,
}

impl ItemState {
    pub fn as_api_str(&self) -> &'static str {
        match self {
            ItemState::Open => "open",
            ItemState::Closed => "closed",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ItemState::Open => ItemState::Closed,
            ItemState::Closed => ItemState::Open,
        }
    }
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_str())
    }
}

/// An issue or pull request as returned by search.
///
/// Two summaries refer to the same item when `repo` and `number` match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSummary {
    pub title: String,
    /// `owner/name`
    pub repo: String,
    pub number: u64,
    pub url: String,
    pub kind: ItemKind,
}

impl ItemSummary {
    pub fn same_item(&self, other: &ItemSummary) -> bool {
        self.repo == other.repo && self.number == other.number
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mergeable {
    Yes,
    No,
    Unknown,
}

impl From<Option<bool>> for Mergeable {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Mergeable::Yes,
            Some(false) => Mergeable::No,
            None => Mergeable::Unknown,
        }
    }
}

impl fmt::Display for Mergeable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mergeable::Yes => write!(f, "yes"),
            Mergeable::No => write!(f, "no"),
            Mergeable::Unknown => write!(f, "unknown"),
        }
    }
}

/// Pull-request-only metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrMeta {
    pub draft: bool,
    pub mergeable: Mergeable,
    pub additions: u64,
    pub deletions: u64,
    pub changed_files: u64,
    pub commits: u64,
    pub reviews: ReviewTally,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub author: String,
    pub body: String,
    pub updated_at: DateTime<Utc>,
}

/// One page of issue comments. `page` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentPage {
    pub comments: Vec<Comment>,
    pub page: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Default for CommentPage {
    fn default() -> Self {
        Self {
            comments: Vec::new(),
            page: 1,
            has_next: false,
            has_prev: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDetail {
    pub item: ItemSummary,
    pub body: String,
    pub state: ItemState,
    pub author: String,
    pub updated_at: DateTime<Utc>,
    pub comment_count: u64,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
    /// Present iff `item.kind` is `ItemKind::Pr`.
    pub pr: Option<PrMeta>,
    pub comments: CommentPage,
}

/// A single submitted review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub user: String,
    pub state: String,
    pub submitted_at: Option<DateTime<Utc>>,
}

/// Per-reviewer summary of the latest review each reviewer submitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewTally {
    pub approvals: u32,
    pub changes_requested: u32,
    pub commented: u32,
}

impl ReviewTally {
    /// Collapse reviews so each reviewer counts once, by their most recent
    /// submission. Later entries win ties.
    pub fn from_reviews(reviews: &[Review]) -> Self {
        let mut latest: HashMap<&str, &Review> = HashMap::new();
        for review in reviews {
            if review.user.is_empty() {
                continue;
            }
            match latest.get(review.user.as_str()) {
                Some(prev) if prev.submitted_at > review.submitted_at => {}
                _ => {
                    latest.insert(review.user.as_str(), review);
                }
            }
        }

        let mut tally = ReviewTally::default();
        for review in latest.values() {
            match review.state.to_ascii_uppercase().as_str() {
                "APPROVED" => tally.approvals += 1,
                "CHANGES_REQUESTED" => tally.changes_requested += 1,
                "COMMENTED" => tally.commented += 1,
                _ => {}
            }
        }
        tally
    }
}
