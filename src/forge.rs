use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ItemDetail, ItemKind, ItemState, ItemSummary};

/// The remote issue tracker the inbox talks to.
#[async_trait]
pub trait Forge: Send + Sync + std::fmt::Debug {
    /// Search for items. With `Some(kind)` the query is rewritten to select
    /// only that kind; with `None` it is sent as-is.
    async fn search_items(&self, query: &str, kind: Option<ItemKind>) -> Result<Vec<ItemSummary>>;

    /// Fetch the full detail for `item` along with one page of its comments.
    async fn fetch_detail(&self, item: &ItemSummary, comment_page: u32) -> Result<ItemDetail>;

    async fn post_comment(&self, item: &ItemSummary, body: &str) -> Result<()>;

    async fn set_state(&self, item: &ItemSummary, state: ItemState) -> Result<()>;
}
