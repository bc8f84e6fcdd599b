use crate::types::{ItemDetail, ItemState, ItemSummary};

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    Back,
    Tick,
    ScrollUp,
    ScrollDown,
    Select,

    // List
    LoadItems,
    Refresh,
    CycleFilter,
    CycleTab,

    // Completions carry the generation of the request that produced them.
    ItemsLoaded(Vec<ItemSummary>, u64),
    ItemsFailed(String, u64),
    DetailLoaded(Box<ItemDetail>, u64),
    DetailFailed(String, u64),

    // Comment pages
    NextCommentPage,
    PrevCommentPage,

    // Compose
    BeginComment,
    ComposeInput(char),
    ComposeNewline,
    ComposeBackspace,
    SubmitComment,
    CancelCompose,
    CommentPosted(ItemSummary),
    CommentFailed(String),

    // Close / reopen
    BeginToggleState,
    ConfirmYes,
    ConfirmNo,
    StateChanged(ItemSummary, ItemState),
    StateChangeFailed(String),

    OpenInBrowser,
    YankUrl,

    None,
}
