use super::{
    newtypes::{ArticleId, CommentId, PersonId},
    user::DbPerson,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DbComment {
    pub id: CommentId,
    pub creator_id: PersonId,
    pub article_id: ArticleId,
    /// None marks a root comment.
    pub parent_id: Option<CommentId>,
    pub content: String,
    /// Ids of direct replies, insertion order (chronological ascending).
    /// Never re-sorted; reads order replies newest-first at read time.
    pub children: Vec<CommentId>,
    pub published: DateTime<Utc>,
}

impl DbComment {
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct DbCommentView {
    pub comment: DbComment,
    pub creator: DbPerson,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct CreateCommentParams {
    pub content: String,
    pub article_id: ArticleId,
    pub parent_id: Option<CommentId>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy)]
pub struct GetRootCommentsParams {
    pub article_id: ArticleId,
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy)]
pub struct GetRepliesParams {
    pub parent_id: CommentId,
    pub skip: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy)]
pub struct DeleteCommentParams {
    pub id: CommentId,
}

/// Outcome of a cascading delete. `failed_ids` is empty on full success;
/// ids already deleted stay deleted either way.
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq)]
pub struct DeleteCommentResult {
    pub deleted_ids: Vec<CommentId>,
    pub failed_ids: Vec<CommentId>,
}
