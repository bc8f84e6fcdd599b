//! Pure formatting helpers for everything the inbox puts on screen.

use chrono::{DateTime, Utc};

use crate::app::{App, Mode};
use crate::types::{Comment, CommentPage, ItemDetail, ItemKind, ItemState, ItemSummary, PrMeta};

const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

pub fn header_title(filter_name: &str) -> String {
    format!("GitHub Inbox  ·  {}", filter_name)
}

pub fn spinner_frame(frame: usize) -> char {
    SPINNER[frame % SPINNER.len()]
}

/// Relative age of `t` as seen from `now`. Future timestamps count as "just now".
pub fn humanize_since(t: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(t);
    if elapsed.num_minutes() < 1 {
        "just now".to_string()
    } else if elapsed.num_hours() < 1 {
        format!("{}m ago", elapsed.num_minutes())
    } else if elapsed.num_hours() < 24 {
        format!("{}h ago", elapsed.num_hours())
    } else {
        format!("{}d ago", elapsed.num_days())
    }
}

pub fn item_description(item: &ItemSummary) -> String {
    format!("{} • #{} • {}", item.repo, item.number, item.kind)
}

pub fn item_target(item: &ItemSummary) -> String {
    format!("{} • #{}", item.repo, item.number)
}

pub fn detail_info(detail: &ItemDetail, now: DateTime<Utc>) -> String {
    format!(
        "{} • {} • #{} • {} • {} comments • updated {}",
        detail.item.repo,
        detail.item.kind,
        detail.item.number,
        detail.state,
        detail.comment_count,
        humanize_since(detail.updated_at, now)
    )
}

/// The kind-specific line under the detail info: PR metadata for pull
/// requests, labels and assignees for issues.
pub fn detail_extra(detail: &ItemDetail) -> Option<String> {
    match (detail.item.kind, &detail.pr) {
        (ItemKind::Pr, Some(pr)) => Some(pr_block(pr)),
        (ItemKind::Pr, None) => None,
        (ItemKind::Issue, _) => Some(issue_block(&detail.labels, &detail.assignees)),
    }
}

pub fn pr_block(pr: &PrMeta) -> String {
    format!(
        "state: {} • mergeable: {} • reviews: +{} / -{} / {} • +{}/-{} • files {} • commits {}",
        if pr.draft { "draft" } else { "ready" },
        pr.mergeable,
        pr.reviews.approvals,
        pr.reviews.changes_requested,
        pr.reviews.commented,
        pr.additions,
        pr.deletions,
        pr.changed_files,
        pr.commits
    )
}

pub fn issue_block(labels: &[String], assignees: &[String]) -> String {
    format!(
        "labels: {} • assignees: {}",
        format_list(labels),
        format_list(assignees)
    )
}

pub fn format_list(values: &[String]) -> String {
    if values.is_empty() {
        "none".to_string()
    } else {
        values.join(", ")
    }
}

pub fn comments_header(page: &CommentPage) -> String {
    if page.comments.is_empty() {
        "(no comments)".to_string()
    } else {
        format!("Comments (page {})", page.page)
    }
}

pub fn comment_byline(comment: &Comment, now: DateTime<Utc>) -> String {
    format!(
        "{} • {}",
        comment.author,
        humanize_since(comment.updated_at, now)
    )
}

pub fn comment_body(body: &str) -> &str {
    match body.trim() {
        "" => "(empty)",
        trimmed => trimmed,
    }
}

pub fn page_footer(page: &CommentPage) -> Option<String> {
    match (page.has_prev, page.has_next) {
        (false, false) => None,
        (true, false) => Some("prev: p".to_string()),
        (false, true) => Some("next: n".to_string()),
        (true, true) => Some("prev: p  next: n".to_string()),
    }
}

pub fn confirm_prompt(state: ItemState, kind: ItemKind) -> String {
    let verb = match state {
        ItemState::Closed => "Close",
        ItemState::Open => "Reopen",
    };
    format!("{} this {}?", verb, kind.to_string().to_lowercase())
}

pub fn state_progress(state: ItemState) -> &'static str {
    match state {
        ItemState::Closed => "Closing...",
        ItemState::Open => "Reopening...",
    }
}

pub fn state_changed(state: ItemState) -> &'static str {
    match state {
        ItemState::Closed => "Closed",
        ItemState::Open => "Reopened",
    }
}

pub fn comment_progress(item: &ItemSummary) -> String {
    format!("Sending comment to {}#{}...", item.repo, item.number)
}

pub fn comment_posted(item: &ItemSummary) -> String {
    format!("Comment posted to {}#{}", item.repo, item.number)
}

/// Key hints for the active mode, as (key, description) pairs.
pub fn help_entries(mode: &Mode) -> &'static [(&'static str, &'static str)] {
    match mode {
        Mode::List => &[
            ("↑/↓ j/k", "navigate"),
            ("enter", "details"),
            ("o", "open"),
            ("y", "copy url"),
            ("r", "refresh"),
            ("f", "filter"),
            ("tab", "switch"),
            ("c", "comment"),
            ("x", "close/reopen"),
            ("q", "quit"),
        ],
        Mode::Detail => &[
            ("esc", "back"),
            ("j/k", "scroll"),
            ("o", "open"),
            ("r", "refresh"),
            ("c", "comment"),
            ("x", "close/reopen"),
            ("n/p", "comments"),
            ("q", "quit"),
        ],
        Mode::Compose(_) => &[("ctrl+g", "send"), ("esc", "cancel")],
        Mode::Confirm(_) => &[("y", "confirm"), ("n/esc", "cancel")],
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    pub is_error: bool,
    pub spinner: Option<char>,
}

/// Error beats an explicit status, which beats the computed "Loaded" summary,
/// which beats the default.
pub fn status_line(app: &App, now: DateTime<Utc>) -> StatusLine {
    let spinner = app.is_busy().then(|| spinner_frame(app.spinner_frame));

    if let Some(err) = &app.error {
        return StatusLine {
            text: format!("Error: {}", err),
            is_error: true,
            spinner,
        };
    }

    let text = if let Some(status) = &app.status {
        status.clone()
    } else if let (false, Some(updated)) = (app.loading, app.last_updated) {
        format!(
            "Loaded {} items • updated {}",
            app.items.len(),
            humanize_since(updated, now)
        )
    } else if app.loading {
        "Loading…".to_string()
    } else {
        "Ready".to_string()
    };

    StatusLine {
        text,
        is_error: false,
        spinner,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::types::{Mergeable, ReviewTally};

    fn summary(kind: ItemKind) -> ItemSummary {
        ItemSummary {
            title: "Fix it".into(),
            repo: "octo/app".into(),
            number: 42,
            url: "https://github.com/octo/app/issues/42".into(),
            kind,
        }
    }

    fn detail(kind: ItemKind) -> ItemDetail {
        ItemDetail {
            item: summary(kind),
            body: String::new(),
            state: ItemState::Open,
            author: "alice".into(),
            updated_at: Utc::now(),
            comment_count: 3,
            labels: vec![],
            assignees: vec![],
            pr: None,
            comments: CommentPage::default(),
        }
    }

    #[test]
    fn humanize_buckets() {
        let now = Utc::now();
        assert_eq!(humanize_since(now - Duration::seconds(59), now), "just now");
        assert_eq!(humanize_since(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(humanize_since(now - Duration::minutes(59), now), "59m ago");
        assert_eq!(humanize_since(now - Duration::hours(3), now), "3h ago");
        assert_eq!(humanize_since(now - Duration::hours(49), now), "2d ago");
        assert_eq!(humanize_since(now + Duration::hours(1), now), "just now");
    }

    #[test]
    fn header_and_description() {
        assert_eq!(header_title("Open"), "GitHub Inbox  ·  Open");
        assert_eq!(
            item_description(&summary(ItemKind::Pr)),
            "octo/app • #42 • PR"
        );
        assert_eq!(item_target(&summary(ItemKind::Issue)), "octo/app • #42");
    }

    #[test]
    fn issue_block_marks_empty_lists() {
        let labels = vec!["bug".to_string(), "P1".to_string()];
        assert_eq!(
            issue_block(&labels, &[]),
            "labels: bug, P1 • assignees: none"
        );
    }

    #[test]
    fn pr_block_lists_metadata() {
        let pr = PrMeta {
            draft: true,
            mergeable: Mergeable::Unknown,
            additions: 10,
            deletions: 2,
            changed_files: 3,
            commits: 4,
            reviews: ReviewTally {
                approvals: 2,
                changes_requested: 1,
                commented: 0,
            },
        };
        assert_eq!(
            pr_block(&pr),
            "state: draft • mergeable: unknown • reviews: +2 / -1 / 0 • +10/-2 • files 3 • commits 4"
        );
    }

    #[test]
    fn detail_extra_depends_on_kind() {
        let issue = detail(ItemKind::Issue);
        assert_eq!(
            detail_extra(&issue).as_deref(),
            Some("labels: none • assignees: none")
        );
        // A PR whose metadata could not be decoded shows no extra line.
        assert_eq!(detail_extra(&detail(ItemKind::Pr)), None);
    }

    #[test]
    fn detail_info_line() {
        let now = Utc::now();
        let mut d = detail(ItemKind::Issue);
        d.updated_at = now - Duration::hours(2);
        d.state = ItemState::Closed;
        assert_eq!(
            detail_info(&d, now),
            "octo/app • Issue • #42 • closed • 3 comments • updated 2h ago"
        );
    }

    #[test]
    fn comment_page_text() {
        let mut page = CommentPage::default();
        assert_eq!(comments_header(&page), "(no comments)");
        assert_eq!(page_footer(&page), None);

        page.comments.push(Comment {
            author: "bob".into(),
            body: "  ".into(),
            updated_at: Utc::now(),
        });
        page.page = 2;
        page.has_prev = true;
        page.has_next = true;
        assert_eq!(comments_header(&page), "Comments (page 2)");
        assert_eq!(comment_body(&page.comments[0].body), "(empty)");
        assert_eq!(page_footer(&page).as_deref(), Some("prev: p  next: n"));
    }

    #[test]
    fn confirm_and_result_text() {
        assert_eq!(
            confirm_prompt(ItemState::Closed, ItemKind::Pr),
            "Close this pr?"
        );
        assert_eq!(
            confirm_prompt(ItemState::Open, ItemKind::Issue),
            "Reopen this issue?"
        );
        assert_eq!(state_progress(ItemState::Open), "Reopening...");
        assert_eq!(state_changed(ItemState::Closed), "Closed");
        assert_eq!(
            comment_progress(&summary(ItemKind::Issue)),
            "Sending comment to octo/app#42..."
        );
    }

    #[test]
    fn help_differs_per_mode() {
        assert_eq!(help_entries(&Mode::List)[0].1, "navigate");
        assert_eq!(help_entries(&Mode::Detail)[0], ("esc", "back"));
    }

    #[test]
    fn spinner_wraps() {
        assert_eq!(spinner_frame(0), spinner_frame(SPINNER.len()));
    }
}
