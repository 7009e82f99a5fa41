use super::newtypes::{ArticleId, PersonId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DbArticle {
    pub id: ArticleId,
    pub title: String,
    pub text: String,
    pub author_id: PersonId,
    pub published: DateTime<Utc>,
}

/// Snapshot of an article's live comment counters.
///
/// `total_comments` counts every live comment (roots and replies),
/// `total_parent_comments` only the roots. The server keeps these as atomics
/// and mutates them exclusively on comment add/delete.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArticleActivity {
    pub total_comments: i64,
    pub total_parent_comments: i64,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct ArticleView {
    pub article: DbArticle,
    pub activity: ArticleActivity,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct CreateArticleParams {
    pub title: String,
    pub text: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy)]
pub struct GetArticleParams {
    pub id: ArticleId,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy)]
pub struct LikeArticleParams {
    pub article_id: ArticleId,
    pub like: bool,
}
