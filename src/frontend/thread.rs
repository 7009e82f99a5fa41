use crate::{
    common::{
        article::ArticleActivity,
        comment::{DbCommentView, DeleteCommentResult},
        newtypes::CommentId,
    },
    frontend::error::FrontendResult,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};

/// Paginated server operations the thread needs. Implemented by [`ApiClient`]
/// for real use and by fakes in tests.
///
/// [`ApiClient`]: crate::frontend::api::ApiClient
#[async_trait]
pub trait ThreadStore {
    async fn replies(
        &self,
        parent_id: CommentId,
        skip: usize,
        limit: usize,
    ) -> FrontendResult<Vec<DbCommentView>>;

    async fn delete(&self, id: CommentId) -> FrontendResult<DeleteCommentResult>;
}

/// One row of the rendered sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThreadEntry {
    pub id: CommentId,
    pub depth: i32,
}

/// Tag for an in-flight reply fetch. Results are applied only if the target
/// is still present and expecting this page when they arrive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RepliesFetch {
    pub target: CommentId,
    pub skip: usize,
    pub limit: usize,
}

struct ThreadNode {
    view: DbCommentView,
    /// Children currently loaded, in display order (newest first, pages
    /// appended at the tail).
    loaded_children: Vec<CommentId>,
    is_reply_loaded: bool,
}

impl ThreadNode {
    fn new(view: DbCommentView) -> Self {
        Self {
            view,
            loaded_children: Vec::new(),
            is_reply_loaded: false,
        }
    }

    fn has_unfetched_children(&self) -> bool {
        self.loaded_children.len() < self.view.comment.children.len()
    }
}

/// Client-side projection of a partially loaded comment tree.
///
/// The loaded nodes form an arena keyed by comment id; the rendered sequence
/// is recomputed from it after every mutation, so it is a valid depth-first
/// pre-order walk of the loaded subset at all times: each entry is followed by
/// exactly its loaded descendants, before any sibling.
///
/// Fetches are split-phase. An operation hands back a [`RepliesFetch`], the
/// caller resolves it against a [`ThreadStore`] without blocking interaction,
/// then feeds the result to [`apply_replies`] which discards it if the target
/// was collapsed or removed in the meantime.
///
/// [`apply_replies`]: CommentThread::apply_replies
pub struct CommentThread {
    page_size: usize,
    nodes: HashMap<CommentId, ThreadNode>,
    /// Loaded roots in display order.
    roots: Vec<CommentId>,
    entries: Vec<ThreadEntry>,
    /// Targets with a fetch in flight; at most one per entry.
    pending: HashSet<CommentId>,
    /// Server-side root total, kept in sync locally so pagination cursors
    /// stay correct across deletions.
    total_roots: i64,
}

impl CommentThread {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size,
            nodes: HashMap::new(),
            roots: Vec::new(),
            entries: Vec::new(),
            pending: HashSet::new(),
            total_roots: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ThreadEntry] {
        &self.entries
    }

    pub fn get(&self, i: usize) -> Option<(&DbCommentView, i32)> {
        let entry = self.entries.get(i)?;
        let node = self.nodes.get(&entry.id)?;
        Some((&node.view, entry.depth))
    }

    pub fn is_reply_loaded(&self, i: usize) -> bool {
        self.entries
            .get(i)
            .and_then(|e| self.nodes.get(&e.id))
            .map(|n| n.is_reply_loaded)
            .unwrap_or(false)
    }

    /// Track the server-side totals, usually from a freshly fetched article.
    pub fn set_activity(&mut self, activity: &ArticleActivity) {
        self.total_roots = activity.total_parent_comments;
    }

    pub fn total_roots(&self) -> i64 {
        self.total_roots
    }

    pub fn has_more_roots(&self) -> bool {
        (self.roots.len() as i64) < self.total_roots
    }

    /// Skip cursor for the next page of root comments.
    pub fn next_roots_page(&self) -> usize {
        self.roots.len()
    }

    /// Appends a page of root comments, skipping any already loaded.
    pub fn apply_roots(&mut self, page: Vec<DbCommentView>) {
        for view in page {
            let id = view.comment.id;
            if self.nodes.contains_key(&id) {
                continue;
            }
            self.nodes.insert(id, ThreadNode::new(view));
            self.roots.push(id);
        }
        self.reproject();
    }

    /// Requests the first page of replies below entry `i`. Returns `None` if
    /// the replies are already shown, nothing is unfetched, or a fetch for
    /// this entry is still in flight (a second expand is ignored).
    pub fn expand(&mut self, i: usize) -> Option<RepliesFetch> {
        let id = self.entries.get(i)?.id;
        if self.nodes.get(&id)?.is_reply_loaded {
            return None;
        }
        self.request_children(id)
    }

    /// Requests the page after the already loaded replies of entry `i`.
    pub fn load_more_replies(&mut self, i: usize) -> Option<RepliesFetch> {
        let id = self.entries.get(i)?.id;
        if !self.nodes.get(&id)?.is_reply_loaded {
            return None;
        }
        self.request_children(id)
    }

    fn request_children(&mut self, id: CommentId) -> Option<RepliesFetch> {
        let node = self.nodes.get(&id)?;
        if self.pending.contains(&id) || !node.has_unfetched_children() {
            return None;
        }
        self.pending.insert(id);
        Some(RepliesFetch {
            target: id,
            skip: node.loaded_children.len(),
            limit: self.page_size,
        })
    }

    /// Inserts a fetched page as a contiguous block at the tail of the
    /// target's loaded children, one level deeper. Returns false and changes
    /// nothing when the result is stale: target collapsed or removed while
    /// the fetch was in flight, or its cursor moved.
    pub fn apply_replies(&mut self, fetch: &RepliesFetch, replies: Vec<DbCommentView>) -> bool {
        if !self.pending.remove(&fetch.target) {
            return false;
        }
        let Some(node) = self.nodes.get(&fetch.target) else {
            return false;
        };
        if node.loaded_children.len() != fetch.skip {
            return false;
        }
        // a comment added meanwhile can shift pages; never show an id twice
        let fresh: Vec<DbCommentView> = replies
            .into_iter()
            .filter(|view| !self.nodes.contains_key(&view.comment.id))
            .collect();
        let ids: Vec<CommentId> = fresh.iter().map(|view| view.comment.id).collect();
        for view in fresh {
            self.nodes.insert(view.comment.id, ThreadNode::new(view));
        }
        if let Some(node) = self.nodes.get_mut(&fetch.target) {
            node.loaded_children.extend(ids);
            node.is_reply_loaded = true;
        }
        self.reproject();
        true
    }

    /// A failed fetch only clears the in-flight mark; the sequence and the
    /// loaded flags stay as they were, and the same fetch can be retried.
    pub fn fetch_failed(&mut self, fetch: &RepliesFetch) {
        self.pending.remove(&fetch.target);
    }

    /// Hides the loaded replies below entry `i`. Local only; the store is
    /// not touched and an in-flight fetch for this entry becomes stale.
    pub fn collapse(&mut self, i: usize) {
        let Some(entry) = self.entries.get(i) else {
            return;
        };
        let id = entry.id;
        self.pending.remove(&id);
        let children = match self.nodes.get_mut(&id) {
            Some(node) => {
                node.is_reply_loaded = false;
                std::mem::take(&mut node.loaded_children)
            }
            None => return,
        };
        for child in children {
            self.remove_loaded(child);
        }
        self.reproject();
    }

    /// Position of the parent entry: nearest preceding entry with strictly
    /// smaller depth. `None` only for depth-0 entries.
    pub fn parent_of(&self, i: usize) -> Option<usize> {
        let depth = self.entries.get(i)?.depth;
        let mut j = i;
        while j > 0 {
            j -= 1;
            if self.entries[j].depth < depth {
                return Some(j);
            }
        }
        None
    }

    /// Length of the visible subtree at `i`: the entry itself plus every
    /// following entry that is deeper.
    pub fn subtree_len(&self, i: usize) -> usize {
        let Some(entry) = self.entries.get(i) else {
            return 0;
        };
        1 + self.entries[i + 1..]
            .iter()
            .take_while(|e| e.depth > entry.depth)
            .count()
    }

    /// Drops entry `i` and its visible subtree from the projection, detaches
    /// it from its parent, and keeps the root pagination cursor in step when
    /// a root is removed. Returns the number of removed entries.
    pub fn remove_subtree(&mut self, i: usize) -> usize {
        let Some(entry) = self.entries.get(i) else {
            return 0;
        };
        let id = entry.id;
        let depth = entry.depth;
        let len = self.subtree_len(i);

        let parent_id = self.nodes.get(&id).and_then(|n| n.view.comment.parent_id);
        if let Some(parent_id) = parent_id {
            if let Some(parent) = self.nodes.get_mut(&parent_id) {
                parent.loaded_children.retain(|child| *child != id);
                parent.view.comment.children.retain(|child| *child != id);
                if parent.loaded_children.is_empty() {
                    parent.is_reply_loaded = false;
                }
            }
        }
        if depth == 0 {
            self.roots.retain(|root| *root != id);
            self.total_roots -= 1;
        }
        self.remove_loaded(id);
        self.reproject();
        len
    }

    /// Server-side cascading delete followed by the local removal. Nothing is
    /// removed locally if the delete fails.
    pub async fn remove_subtree_cascading<S: ThreadStore>(
        &mut self,
        i: usize,
        store: &S,
    ) -> FrontendResult<usize> {
        let Some(entry) = self.entries.get(i) else {
            return Ok(0);
        };
        store.delete(entry.id).await?;
        Ok(self.remove_subtree(i))
    }

    pub async fn expand_via<S: ThreadStore>(
        &mut self,
        i: usize,
        store: &S,
    ) -> FrontendResult<bool> {
        let Some(fetch) = self.expand(i) else {
            return Ok(false);
        };
        self.run_fetch(fetch, store).await
    }

    pub async fn load_more_replies_via<S: ThreadStore>(
        &mut self,
        i: usize,
        store: &S,
    ) -> FrontendResult<bool> {
        let Some(fetch) = self.load_more_replies(i) else {
            return Ok(false);
        };
        self.run_fetch(fetch, store).await
    }

    async fn run_fetch<S: ThreadStore>(
        &mut self,
        fetch: RepliesFetch,
        store: &S,
    ) -> FrontendResult<bool> {
        match store.replies(fetch.target, fetch.skip, fetch.limit).await {
            Ok(replies) => Ok(self.apply_replies(&fetch, replies)),
            Err(e) => {
                self.fetch_failed(&fetch);
                Err(e)
            }
        }
    }

    fn remove_loaded(&mut self, id: CommentId) {
        self.pending.remove(&id);
        if let Some(node) = self.nodes.remove(&id) {
            for child in node.loaded_children {
                self.remove_loaded(child);
            }
        }
    }

    fn reproject(&mut self) {
        self.entries.clear();
        let mut stack: Vec<(CommentId, i32)> = self.roots.iter().rev().map(|id| (*id, 0)).collect();
        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            self.entries.push(ThreadEntry { id, depth });
            for child in node.loaded_children.iter().rev() {
                stack.push((*child, depth + 1));
            }
        }
    }
}
