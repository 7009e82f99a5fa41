use super::MagpieContext;
use crate::{
    backend::utils::{
        error::{BackendError, BackendResult},
        validate::validate_article_title,
    },
    common::{
        article::{ArticleActivity, ArticleView, DbArticle},
        newtypes::{ArticleId, PersonId},
    },
};
use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Live counters for one article. Mutated only through `record_added` /
/// `record_removed` so every update is a single atomic increment, never a
/// fetch-then-save.
#[derive(Debug, Default)]
pub struct ActivityCounters {
    total_comments: AtomicI64,
    total_parent_comments: AtomicI64,
}

impl ActivityCounters {
    pub(crate) fn record_added(&self, is_root: bool) {
        self.total_comments.fetch_add(1, Ordering::Relaxed);
        if is_root {
            self.total_parent_comments.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_removed(&self, is_root: bool) {
        self.total_comments.fetch_sub(1, Ordering::Relaxed);
        if is_root {
            self.total_parent_comments.fetch_sub(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn snapshot(&self) -> ArticleActivity {
        ArticleActivity {
            total_comments: self.total_comments.load(Ordering::Relaxed),
            total_parent_comments: self.total_parent_comments.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug)]
pub struct DbArticleForm {
    pub title: String,
    pub text: String,
    pub author_id: PersonId,
}

impl DbArticle {
    pub fn create(form: DbArticleForm, context: &MagpieContext) -> BackendResult<Self> {
        let title = validate_article_title(&form.title)?;
        let article = DbArticle {
            id: context.store.next_article_id(),
            title,
            text: form.text,
            author_id: form.author_id,
            published: Utc::now(),
        };
        context.store.articles.insert(article.id, article.clone());
        context
            .store
            .activity
            .insert(article.id, ActivityCounters::default());
        Ok(article)
    }

    pub fn read(id: ArticleId, context: &MagpieContext) -> BackendResult<Self> {
        context
            .store
            .articles
            .get(&id)
            .map(|a| a.clone())
            .ok_or(BackendError::NotFound)
    }

    pub fn read_view(id: ArticleId, context: &MagpieContext) -> BackendResult<ArticleView> {
        let article = Self::read(id, context)?;
        let activity = context
            .store
            .activity
            .get(&id)
            .map(|c| c.snapshot())
            .unwrap_or_default();
        Ok(ArticleView { article, activity })
    }
}
