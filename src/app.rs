use std::sync::Arc;

use chrono::{DateTime, Utc};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use crate::action::Action;
use crate::event::Event;
use crate::filter::{default_filters, Filter, Tab, TABS};
use crate::forge::Forge;
use crate::types::{ItemDetail, ItemState, ItemSummary};
use crate::ui::{self, text};

/// Comments longer than this are truncated at input time.
pub const COMMENT_CHAR_LIMIT: usize = 4000;

/// The view underneath an overlay mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    Detail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compose {
    pub target: ItemSummary,
    pub origin: View,
    pub buffer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirm {
    pub target: ItemSummary,
    pub target_state: ItemState,
    pub origin: View,
}

/// Exactly one of these is active at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    List,
    Detail,
    Compose(Compose),
    Confirm(Confirm),
}

impl Mode {
    pub fn view(&self) -> View {
        match self {
            Mode::List => View::List,
            Mode::Detail => View::Detail,
            Mode::Compose(c) => c.origin,
            Mode::Confirm(c) => c.origin,
        }
    }

    fn from_view(view: View) -> Self {
        match view {
            View::List => Mode::List,
            View::Detail => Mode::Detail,
        }
    }
}

pub struct App {
    pub mode: Mode,

    // Search
    pub filters: Vec<Filter>,
    pub filter_index: usize,
    pub tab_index: usize,
    pub items: Vec<ItemSummary>,
    pub selected: usize,
    pub last_updated: Option<DateTime<Utc>>,

    // Detail
    pub detail: Option<ItemDetail>,
    detail_target: Option<ItemSummary>,
    pub comment_page: u32,
    pub scroll_offset: usize,

    // In-flight flags
    pub loading: bool,
    pub detail_loading: bool,
    pub action_loading: bool,

    // Status
    pub error: Option<String>,
    pub detail_error: Option<String>,
    pub status: Option<String>,
    pub spinner_frame: usize,

    pub should_quit: bool,
    list_generation: u64,
    detail_generation: u64,
    forge: Arc<dyn Forge>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl App {
    pub fn new(
        forge: Arc<dyn Forge>,
        filters: Vec<Filter>,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> Self {
        let filters = if filters.is_empty() {
            default_filters()
        } else {
            filters
        };

        Self {
            mode: Mode::List,

            filters,
            filter_index: 0,
            tab_index: 0,
            items: Vec::new(),
            selected: 0,
            last_updated: None,

            detail: None,
            detail_target: None,
            comment_page: 1,
            scroll_offset: 0,

            loading: true,
            detail_loading: false,
            action_loading: false,

            error: None,
            detail_error: None,
            status: None,
            spinner_frame: 0,

            should_quit: false,
            list_generation: 0,
            detail_generation: 0,
            forge,
            action_tx,
        }
    }

    pub fn current_filter(&self) -> &Filter {
        &self.filters[self.filter_index]
    }

    pub fn current_tab(&self) -> &Tab {
        &TABS[self.tab_index]
    }

    pub fn selected_item(&self) -> Option<&ItemSummary> {
        self.items.get(self.selected)
    }

    pub fn is_busy(&self) -> bool {
        self.loading || self.detail_loading || self.action_loading
    }

    /// The item a comment or close/reopen applies to: the loaded detail when
    /// the detail view is showing, else the selected list row.
    pub fn resolve_target(&self) -> Option<ItemSummary> {
        if self.mode.view() == View::Detail {
            if let Some(detail) = &self.detail {
                return Some(detail.item.clone());
            }
        }
        self.selected_item().cloned()
    }

    fn showing_detail_of(&self, item: &ItemSummary) -> bool {
        self.mode.view() == View::Detail
            && self
                .detail_target
                .as_ref()
                .is_some_and(|t| t.same_item(item))
    }

    pub fn handle_event(&self, event: Event) -> Action {
        match event {
            Event::Init => Action::LoadItems,
            Event::Tick => Action::Tick,
            Event::Key(key) => self.handle_key(key),
            Event::Render => Action::None,
        }
    }

    /// Map an event against the current mode and apply it before the next
    /// event is looked at.
    pub fn dispatch(&mut self, event: Event) {
        let action = self.handle_event(event);
        self.update(action);
    }

    fn handle_key(&self, key: KeyEvent) -> Action {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match &self.mode {
            Mode::Compose(_) => match key.code {
                KeyCode::Esc => Action::CancelCompose,
                KeyCode::Char('g') | KeyCode::Char('s') if ctrl => Action::SubmitComment,
                KeyCode::Enter => Action::ComposeNewline,
                KeyCode::Backspace => Action::ComposeBackspace,
                KeyCode::Char(c) if !ctrl => Action::ComposeInput(c),
                _ => Action::None,
            },
            Mode::Confirm(_) => match key.code {
                KeyCode::Char('y') => Action::ConfirmYes,
                KeyCode::Char('n') | KeyCode::Esc => Action::ConfirmNo,
                _ => Action::None,
            },
            Mode::List | Mode::Detail => match key.code {
                KeyCode::Char('q') => Action::Quit,
                KeyCode::Esc => Action::Back,
                KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
                KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
                KeyCode::Enter => Action::Select,
                KeyCode::Char('r') => Action::Refresh,
                KeyCode::Char('f') => Action::CycleFilter,
                KeyCode::Tab => Action::CycleTab,
                KeyCode::Char('c') => Action::BeginComment,
                KeyCode::Char('x') => Action::BeginToggleState,
                KeyCode::Char('n') => Action::NextCommentPage,
                KeyCode::Char('p') => Action::PrevCommentPage,
                KeyCode::Char('o') => Action::OpenInBrowser,
                KeyCode::Char('y') => Action::YankUrl,
                _ => Action::None,
            },
        }
    }

    pub fn update(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.should_quit = true;
            }
            Action::Tick => {
                if self.is_busy() {
                    self.spinner_frame = self.spinner_frame.wrapping_add(1);
                }
            }
            Action::Back => {
                if self.mode == Mode::Detail {
                    self.mode = Mode::List;
                    self.detail_error = None;
                    self.scroll_offset = 0;
                }
            }
            Action::ScrollUp => match self.mode {
                Mode::List => self.selected = self.selected.saturating_sub(1),
                Mode::Detail => self.scroll_offset = self.scroll_offset.saturating_sub(1),
                _ => {}
            },
            Action::ScrollDown => match self.mode {
                Mode::List => {
                    if self.selected + 1 < self.items.len() {
                        self.selected += 1;
                    }
                }
                Mode::Detail => {
                    let max = self.detail.as_ref().map_or(0, ui::detail_max_scroll);
                    self.scroll_offset = (self.scroll_offset + 1).min(max);
                }
                _ => {}
            },
            Action::Select => {
                if self.mode == Mode::List {
                    if let Some(item) = self.selected_item().cloned() {
                        self.open_detail(item);
                    }
                }
            }

            // List
            Action::LoadItems => {
                self.load_items();
            }
            Action::Refresh => match self.mode {
                Mode::List => {
                    self.status = Some("Refreshing...".to_string());
                    self.load_items();
                }
                Mode::Detail => {
                    if let Some(target) = self.detail_target.clone() {
                        self.fetch_detail(target, self.comment_page);
                    }
                }
                _ => {}
            },
            Action::CycleFilter => {
                if self.mode == Mode::List {
                    self.filter_index = (self.filter_index + 1) % self.filters.len();
                    self.reset_list();
                }
            }
            Action::CycleTab => {
                if self.mode == Mode::List {
                    self.tab_index = (self.tab_index + 1) % TABS.len();
                    self.reset_list();
                }
            }
            Action::ItemsLoaded(items, generation) => {
                if generation != self.list_generation {
                    tracing::debug!(generation, "discarding stale search result");
                    return;
                }
                self.loading = false;
                self.items = items;
                if self.selected >= self.items.len() {
                    self.selected = self.items.len().saturating_sub(1);
                }
                self.last_updated = Some(Utc::now());
                self.error = None;
                self.status = None;
            }
            Action::ItemsFailed(msg, generation) => {
                if generation != self.list_generation {
                    tracing::debug!(generation, "discarding stale search failure");
                    return;
                }
                self.loading = false;
                self.error = Some(msg);
            }
            Action::DetailLoaded(detail, generation) => {
                if generation != self.detail_generation {
                    tracing::debug!(generation, "discarding stale detail");
                    return;
                }
                self.detail_loading = false;
                self.detail_error = None;
                self.error = None;
                self.comment_page = detail.comments.page;
                self.detail = Some(*detail);
            }
            Action::DetailFailed(msg, generation) => {
                if generation != self.detail_generation {
                    tracing::debug!(generation, "discarding stale detail failure");
                    return;
                }
                self.detail_loading = false;
                self.detail_error = Some(msg.clone());
                self.error = Some(msg);
            }

            // Comment pages
            Action::NextCommentPage => {
                if let Some((target, page)) = self.comment_page_target(|p| {
                    p.has_next.then_some(p.page + 1)
                }) {
                    self.comment_page = page;
                    self.fetch_detail(target, page);
                }
            }
            Action::PrevCommentPage => {
                if let Some((target, page)) = self.comment_page_target(|p| {
                    p.has_prev.then_some(p.page.saturating_sub(1).max(1))
                }) {
                    self.comment_page = page;
                    self.fetch_detail(target, page);
                }
            }

            // Compose
            Action::BeginComment => {
                if !matches!(self.mode, Mode::List | Mode::Detail) || self.action_loading {
                    return;
                }
                if let Some(target) = self.resolve_target() {
                    self.mode = Mode::Compose(Compose {
                        target,
                        origin: self.mode.view(),
                        buffer: String::new(),
                    });
                }
            }
            Action::ComposeInput(c) => {
                if let Mode::Compose(compose) = &mut self.mode {
                    if compose.buffer.chars().count() < COMMENT_CHAR_LIMIT {
                        compose.buffer.push(c);
                    }
                }
            }
            Action::ComposeNewline => {
                if let Mode::Compose(compose) = &mut self.mode {
                    if compose.buffer.chars().count() < COMMENT_CHAR_LIMIT {
                        compose.buffer.push('\n');
                    }
                }
            }
            Action::ComposeBackspace => {
                if let Mode::Compose(compose) = &mut self.mode {
                    compose.buffer.pop();
                }
            }
            Action::CancelCompose => {
                if let Mode::Compose(compose) = &self.mode {
                    self.mode = Mode::from_view(compose.origin);
                }
            }
            Action::SubmitComment => self.submit_comment(),
            Action::CommentPosted(target) => {
                self.action_loading = false;
                self.error = None;
                self.status = Some(text::comment_posted(&target));
                if self.showing_detail_of(&target) {
                    self.fetch_detail(target, self.comment_page);
                }
            }
            Action::CommentFailed(msg) => {
                self.action_loading = false;
                self.error = Some(msg);
            }

            // Close / reopen
            Action::BeginToggleState => {
                if !matches!(self.mode, Mode::List | Mode::Detail) || self.action_loading {
                    return;
                }
                if let Some(target) = self.resolve_target() {
                    let origin = self.mode.view();
                    let target_state = match (&self.detail, origin) {
                        (Some(detail), View::Detail) => detail.state.toggled(),
                        _ => ItemState::Closed,
                    };
                    self.mode = Mode::Confirm(Confirm {
                        target,
                        target_state,
                        origin,
                    });
                }
            }
            Action::ConfirmYes => self.confirm_state_change(),
            Action::ConfirmNo => {
                if let Mode::Confirm(confirm) = &self.mode {
                    self.mode = Mode::from_view(confirm.origin);
                }
            }
            Action::StateChanged(target, state) => {
                self.action_loading = false;
                self.error = None;
                self.status = Some(text::state_changed(state).to_string());
                self.load_items();
                if self.showing_detail_of(&target) {
                    self.fetch_detail(target, self.comment_page);
                }
            }
            Action::StateChangeFailed(msg) => {
                self.action_loading = false;
                self.error = Some(msg);
            }

            Action::OpenInBrowser => {
                if let Some(target) = self.resolve_target() {
                    open_external(&target.url);
                }
            }
            Action::YankUrl => {
                if let Some(target) = self.resolve_target() {
                    match copy_to_clipboard(&target.url) {
                        Ok(()) => self.status = Some(format!("Copied {}", target.url)),
                        Err(e) => self.error = Some(format!("Clipboard: {}", e)),
                    }
                }
            }

            Action::None => {}
        }
    }

    /// Clear the list and search again with the current filter and tab.
    fn reset_list(&mut self) {
        self.items.clear();
        self.selected = 0;
        self.status = Some("Loading...".to_string());
        self.load_items();
    }

    fn open_detail(&mut self, item: ItemSummary) {
        self.mode = Mode::Detail;
        self.detail = None;
        self.detail_error = None;
        self.comment_page = 1;
        self.scroll_offset = 0;
        self.detail_target = Some(item.clone());
        self.fetch_detail(item, 1);
    }

    /// The detail target and the page to move to, if paging is currently
    /// allowed in the direction `step` picks.
    fn comment_page_target(
        &self,
        step: impl Fn(&crate::types::CommentPage) -> Option<u32>,
    ) -> Option<(ItemSummary, u32)> {
        if self.mode != Mode::Detail || self.detail_loading {
            return None;
        }
        let detail = self.detail.as_ref()?;
        let page = step(&detail.comments)?;
        let target = self
            .detail_target
            .clone()
            .unwrap_or_else(|| detail.item.clone());
        Some((target, page))
    }

    fn submit_comment(&mut self) {
        let Mode::Compose(compose) = &self.mode else {
            return;
        };
        let body = compose.buffer.trim().to_string();
        if body.is_empty() {
            self.status = Some("Comment is empty".to_string());
            return;
        }
        let target = compose.target.clone();
        self.mode = Mode::from_view(compose.origin);
        self.action_loading = true;
        self.error = None;
        self.status = Some(text::comment_progress(&target));
        self.spawn_post_comment(target, body);
    }

    fn confirm_state_change(&mut self) {
        let Mode::Confirm(confirm) = &self.mode else {
            return;
        };
        let target = confirm.target.clone();
        let state = confirm.target_state;
        self.mode = Mode::from_view(confirm.origin);
        self.action_loading = true;
        self.error = None;
        self.status = Some(text::state_progress(state).to_string());
        self.spawn_set_state(target, state);
    }

    fn load_items(&mut self) {
        self.list_generation += 1;
        self.loading = true;
        let generation = self.list_generation;
        let query = self.current_filter().query.clone();
        let kind = self.current_tab().kind;

        let tx = self.action_tx.clone();
        let forge = Arc::clone(&self.forge);
        tokio::spawn(async move {
            match forge.search_items(&query, Some(kind)).await {
                Ok(items) => {
                    tx.send(Action::ItemsLoaded(items, generation)).ok();
                }
                Err(e) => {
                    tracing::warn!(error = %e, "search failed");
                    tx.send(Action::ItemsFailed(e.to_string(), generation)).ok();
                }
            }
        });
    }

    fn fetch_detail(&mut self, item: ItemSummary, page: u32) {
        self.detail_generation += 1;
        self.detail_loading = true;
        self.detail_error = None;
        let generation = self.detail_generation;

        let tx = self.action_tx.clone();
        let forge = Arc::clone(&self.forge);
        tokio::spawn(async move {
            match forge.fetch_detail(&item, page).await {
                Ok(detail) => {
                    tx.send(Action::DetailLoaded(Box::new(detail), generation))
                        .ok();
                }
                Err(e) => {
                    tracing::warn!(error = %e, repo = %item.repo, number = item.number, "detail fetch failed");
                    tx.send(Action::DetailFailed(e.to_string(), generation)).ok();
                }
            }
        });
    }

    fn spawn_post_comment(&self, item: ItemSummary, body: String) {
        let tx = self.action_tx.clone();
        let forge = Arc::clone(&self.forge);
        tokio::spawn(async move {
            match forge.post_comment(&item, &body).await {
                Ok(()) => {
                    tx.send(Action::CommentPosted(item)).ok();
                }
                Err(e) => {
                    tracing::warn!(error = %e, "posting comment failed");
                    tx.send(Action::CommentFailed(e.to_string())).ok();
                }
            }
        });
    }

    fn spawn_set_state(&self, item: ItemSummary, state: ItemState) {
        let tx = self.action_tx.clone();
        let forge = Arc::clone(&self.forge);
        tokio::spawn(async move {
            match forge.set_state(&item, state).await {
                Ok(()) => {
                    tx.send(Action::StateChanged(item, state)).ok();
                }
                Err(e) => {
                    tracing::warn!(error = %e, "state change failed");
                    tx.send(Action::StateChangeFailed(e.to_string())).ok();
                }
            }
        });
    }
}

/// Detached; the result is ignored apart from logging.
fn open_external(url: &str) {
    if url.is_empty() {
        return;
    }
    if let Err(e) = open::that_detached(url) {
        tracing::warn!(error = %e, url, "could not open browser");
    }
}

fn copy_to_clipboard(text: &str) -> Result<(), arboard::Error> {
    let mut clipboard = arboard::Clipboard::new()?;
    clipboard.set_text(text.to_string())
}
