use super::MagpieContext;
use crate::{
    backend::utils::error::BackendResult,
    common::{
        article::DbArticle,
        comment::DbComment,
        newtypes::{ArticleId, CommentId, PersonId},
        notifications::{DbNotification, NotificationKind},
    },
};
use chrono::Utc;

impl DbNotification {
    /// Exactly one notification per created comment: a reply notifies the
    /// parent comment's creator, a root comment notifies the article author.
    pub(crate) fn create_for_comment(
        comment: &DbComment,
        parent: Option<&DbComment>,
        article: &DbArticle,
        context: &MagpieContext,
    ) -> Self {
        let (kind, recipient_id) = match parent {
            Some(parent) => (NotificationKind::Reply, parent.creator_id),
            None => (NotificationKind::Comment, article.author_id),
        };
        let notification = DbNotification {
            id: context.store.next_notification_id(),
            kind,
            article_id: comment.article_id,
            comment_id: Some(comment.id),
            recipient_id,
            actor_id: comment.creator_id,
            replied_on_comment_id: comment.parent_id,
            published: comment.published,
        };
        context
            .store
            .notifications
            .insert(notification.id, notification.clone());
        notification
    }

    /// Removes the one notification bound to this comment id and nothing
    /// else; notifications of sibling comments on the same article stay.
    pub(crate) fn delete_for_comment(comment_id: CommentId, context: &MagpieContext) {
        context
            .store
            .notifications
            .retain(|_, n| n.comment_id != Some(comment_id));
    }

    /// At most one live like notification per (actor, article); liking again
    /// is a no-op. Likes carry no comment id.
    pub fn set_like(
        article_id: ArticleId,
        actor_id: PersonId,
        context: &MagpieContext,
    ) -> BackendResult<()> {
        let article = DbArticle::read(article_id, context)?;
        let exists = context.store.notifications.iter().any(|n| {
            n.kind == NotificationKind::Like
                && n.article_id == article_id
                && n.actor_id == actor_id
        });
        if !exists {
            let notification = DbNotification {
                id: context.store.next_notification_id(),
                kind: NotificationKind::Like,
                article_id,
                comment_id: None,
                recipient_id: article.author_id,
                actor_id,
                replied_on_comment_id: None,
                published: Utc::now(),
            };
            context
                .store
                .notifications
                .insert(notification.id, notification);
        }
        Ok(())
    }

    pub fn remove_like(
        article_id: ArticleId,
        actor_id: PersonId,
        context: &MagpieContext,
    ) -> BackendResult<()> {
        DbArticle::read(article_id, context)?;
        context.store.notifications.retain(|_, n| {
            !(n.kind == NotificationKind::Like
                && n.article_id == article_id
                && n.actor_id == actor_id)
        });
        Ok(())
    }

    /// All notifications addressed to a user, newest first.
    pub fn list(recipient_id: PersonId, context: &MagpieContext) -> Vec<Self> {
        let mut notifications: Vec<Self> = context
            .store
            .notifications
            .iter()
            .filter(|n| n.recipient_id == recipient_id)
            .map(|n| n.clone())
            .collect();
        notifications.sort_by(|a, b| b.published.cmp(&a.published).then(b.id.0.cmp(&a.id.0)));
        notifications
    }

    pub fn count(recipient_id: PersonId, context: &MagpieContext) -> i64 {
        context
            .store
            .notifications
            .iter()
            .filter(|n| n.recipient_id == recipient_id)
            .count() as i64
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::store::{article::DbArticleForm, testing};

    #[test]
    fn at_most_one_like_per_user_and_article() {
        let context = testing::context();
        let author = testing::person(&context, "author");
        let reader = testing::person(&context, "reader");
        let article = DbArticle::create(
            DbArticleForm {
                title: "Likeable".to_string(),
                text: String::new(),
                author_id: author.id,
            },
            &context,
        )
        .unwrap();

        DbNotification::set_like(article.id, reader.id, &context).unwrap();
        DbNotification::set_like(article.id, reader.id, &context).unwrap();
        let likes = DbNotification::list(author.id, &context);
        assert_eq!(likes.len(), 1);
        assert_eq!(likes[0].kind, NotificationKind::Like);
        assert_eq!(likes[0].comment_id, None);
        assert_eq!(likes[0].actor_id, reader.id);

        // a second user may like the same article
        let other = testing::person(&context, "other");
        DbNotification::set_like(article.id, other.id, &context).unwrap();
        assert_eq!(DbNotification::count(author.id, &context), 2);

        DbNotification::remove_like(article.id, reader.id, &context).unwrap();
        let likes = DbNotification::list(author.id, &context);
        assert_eq!(likes.len(), 1);
        assert_eq!(likes[0].actor_id, other.id);

        assert!(matches!(
            DbNotification::set_like(crate::common::newtypes::ArticleId(99), reader.id, &context),
            Err(crate::backend::utils::error::BackendError::NotFound)
        ));
    }
}
