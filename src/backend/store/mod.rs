use crate::{
    backend::config::MagpieConfig,
    common::{
        article::DbArticle,
        comment::DbComment,
        newtypes::{ArticleId, CommentId, NotificationId, PersonId},
        notifications::DbNotification,
        user::DbPerson,
    },
};
use dashmap::DashMap;
use std::sync::{
    atomic::{AtomicI32, Ordering},
    Arc,
};

pub mod article;
pub mod cascade;
pub mod comment;
pub mod notifications;
pub mod user;

use article::ActivityCounters;

/// Live state of the engine: one arena per entity type, keyed by id, plus
/// per-article activity counters. Maps are sharded concurrent maps and the
/// counters are atomics, so concurrent adds/deletes never lose an update.
///
/// The comment arena holds the true tree: each node stores its parent id and
/// the ordered list of child ids. Clients only ever see paginated slices of
/// it; the flat rendering sequence is a projection kept on the client side.
#[derive(Default)]
pub struct Store {
    pub(crate) persons: DashMap<PersonId, DbPerson>,
    pub(crate) articles: DashMap<ArticleId, DbArticle>,
    pub(crate) activity: DashMap<ArticleId, ActivityCounters>,
    pub(crate) comments: DashMap<CommentId, DbComment>,
    pub(crate) notifications: DashMap<NotificationId, DbNotification>,
    next_person_id: AtomicI32,
    next_article_id: AtomicI32,
    next_comment_id: AtomicI32,
    next_notification_id: AtomicI32,
}

impl Store {
    pub(crate) fn next_person_id(&self) -> PersonId {
        PersonId(self.next_person_id.fetch_add(1, Ordering::Relaxed) + 1)
    }

    pub(crate) fn next_article_id(&self) -> ArticleId {
        ArticleId(self.next_article_id.fetch_add(1, Ordering::Relaxed) + 1)
    }

    pub(crate) fn next_comment_id(&self) -> CommentId {
        CommentId(self.next_comment_id.fetch_add(1, Ordering::Relaxed) + 1)
    }

    pub(crate) fn next_notification_id(&self) -> NotificationId {
        NotificationId(self.next_notification_id.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

#[derive(Clone)]
pub struct MagpieContext {
    pub store: Arc<Store>,
    pub config: MagpieConfig,
}

impl MagpieContext {
    pub fn new(config: MagpieConfig) -> Self {
        Self {
            store: Arc::new(Store::default()),
            config,
        }
    }
}
