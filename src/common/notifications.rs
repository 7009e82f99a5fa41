use super::newtypes::{ArticleId, CommentId, NotificationId, PersonId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum NotificationKind {
    /// Root comment on an article, addressed to the article author.
    Comment,
    /// Reply to a comment, addressed to the parent comment's creator.
    Reply,
    /// Article like; carries no comment id.
    Like,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DbNotification {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub article_id: ArticleId,
    /// Set for comment and reply notifications, None for likes. Each live
    /// comment owns exactly one notification keyed by this field.
    pub comment_id: Option<CommentId>,
    pub recipient_id: PersonId,
    pub actor_id: PersonId,
    pub replied_on_comment_id: Option<CommentId>,
    pub published: DateTime<Utc>,
}
