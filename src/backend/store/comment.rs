use super::{cascade, MagpieContext};
use crate::{
    backend::utils::{
        error::{BackendError, BackendResult},
        validate::validate_comment_content,
    },
    common::{
        article::DbArticle,
        comment::{DbComment, DbCommentView, DeleteCommentResult},
        newtypes::{ArticleId, CommentId, PersonId},
        notifications::DbNotification,
        user::DbPerson,
    },
};
use chrono::Utc;

#[derive(Debug)]
pub struct DbCommentInsertForm {
    pub creator_id: PersonId,
    pub article_id: ArticleId,
    pub parent_id: Option<CommentId>,
    pub content: String,
}

impl DbComment {
    /// Inserts a comment into the article's tree. A reply is appended to its
    /// parent's child list (chronological order, never re-sorted); a root is
    /// counted into `total_parent_comments` as well. Creates the matching
    /// notification.
    pub fn create(form: DbCommentInsertForm, context: &MagpieContext) -> BackendResult<DbCommentView> {
        let content = validate_comment_content(&form.content)?;
        let creator = DbPerson::read(form.creator_id, context)?;
        let article = DbArticle::read(form.article_id, context)?;
        let parent = form
            .parent_id
            .map(|id| Self::read(id, context))
            .transpose()?;
        if let Some(parent) = &parent {
            if parent.article_id != form.article_id {
                return Err(BackendError::Validation(
                    "Parent comment belongs to a different article".to_string(),
                ));
            }
        }

        let comment = DbComment {
            id: context.store.next_comment_id(),
            creator_id: form.creator_id,
            article_id: form.article_id,
            parent_id: form.parent_id,
            content,
            children: Vec::new(),
            published: Utc::now(),
        };
        context.store.comments.insert(comment.id, comment.clone());
        if let Some(parent) = &parent {
            if let Some(mut parent) = context.store.comments.get_mut(&parent.id) {
                parent.children.push(comment.id);
            }
        }
        if let Some(counters) = context.store.activity.get(&form.article_id) {
            counters.record_added(!comment.is_reply());
        }
        DbNotification::create_for_comment(&comment, parent.as_ref(), &article, context);

        Ok(DbCommentView { comment, creator })
    }

    pub fn read(id: CommentId, context: &MagpieContext) -> BackendResult<Self> {
        context
            .store
            .comments
            .get(&id)
            .map(|c| c.clone())
            .ok_or(BackendError::NotFound)
    }

    pub fn read_view(id: CommentId, context: &MagpieContext) -> BackendResult<DbCommentView> {
        let comment = Self::read(id, context)?;
        let creator = DbPerson::read(comment.creator_id, context)?;
        Ok(DbCommentView { comment, creator })
    }

    /// Root comments of an article, newest first.
    pub fn read_roots(
        article_id: ArticleId,
        skip: Option<usize>,
        limit: Option<usize>,
        context: &MagpieContext,
    ) -> BackendResult<Vec<DbCommentView>> {
        DbArticle::read(article_id, context)?;
        let roots = context
            .store
            .comments
            .iter()
            .filter(|c| c.article_id == article_id && c.parent_id.is_none())
            .map(|c| c.clone())
            .collect();
        Self::page(roots, skip, limit, context)
    }

    /// Direct replies of a comment, newest first. The stored child list stays
    /// in chronological order; the ordering here is applied at read time.
    /// Childless comments yield an empty page, not an error.
    pub fn read_replies(
        parent_id: CommentId,
        skip: Option<usize>,
        limit: Option<usize>,
        context: &MagpieContext,
    ) -> BackendResult<Vec<DbCommentView>> {
        let parent = Self::read(parent_id, context)?;
        let children = parent
            .children
            .iter()
            .filter_map(|id| context.store.comments.get(id).map(|c| c.clone()))
            .collect();
        Self::page(children, skip, limit, context)
    }

    fn page(
        mut comments: Vec<DbComment>,
        skip: Option<usize>,
        limit: Option<usize>,
        context: &MagpieContext,
    ) -> BackendResult<Vec<DbCommentView>> {
        // id breaks ties between identical timestamps
        comments.sort_by(|a, b| b.published.cmp(&a.published).then(b.id.cmp(&a.id)));
        comments
            .into_iter()
            .skip(skip.unwrap_or(0))
            .take(limit.unwrap_or(context.config.comments.page_size))
            .map(|comment| {
                let creator = DbPerson::read(comment.creator_id, context)?;
                Ok(DbCommentView { comment, creator })
            })
            .collect()
    }

    /// Removes a comment and its whole subtree. Allowed for the comment's
    /// creator and for the article's author, nobody else.
    pub fn delete(
        id: CommentId,
        requester_id: PersonId,
        context: &MagpieContext,
    ) -> BackendResult<DeleteCommentResult> {
        let comment = Self::read(id, context)?;
        let article = DbArticle::read(comment.article_id, context)?;
        if requester_id != comment.creator_id && requester_id != article.author_id {
            return Err(BackendError::PermissionDenied);
        }
        let outcome = cascade::delete_subtree(id, context);
        if outcome.failed_ids.is_empty() {
            Ok(DeleteCommentResult {
                deleted_ids: outcome.deleted_ids,
                failed_ids: Vec::new(),
            })
        } else {
            Err(BackendError::PartialCascade {
                deleted_ids: outcome.deleted_ids,
                failed_ids: outcome.failed_ids,
            })
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{
        backend::store::{article::DbArticleForm, testing},
        common::article::ArticleView,
    };

    fn setup() -> (MagpieContext, DbPerson, DbArticle) {
        let context = testing::context();
        let author = testing::person(&context, "author");
        let article = DbArticle::create(
            DbArticleForm {
                title: "Fast inverse square root".to_string(),
                text: "article text".to_string(),
                author_id: author.id,
            },
            &context,
        )
        .unwrap();
        (context, author, article)
    }

    fn add(
        context: &MagpieContext,
        creator: PersonId,
        article_id: ArticleId,
        parent_id: Option<CommentId>,
        content: &str,
    ) -> DbCommentView {
        DbComment::create(
            DbCommentInsertForm {
                creator_id: creator,
                article_id,
                parent_id,
                content: content.to_string(),
            },
            context,
        )
        .unwrap()
    }

    fn activity(context: &MagpieContext, article_id: ArticleId) -> (i64, i64) {
        let ArticleView { activity, .. } = DbArticle::read_view(article_id, context).unwrap();
        (activity.total_comments, activity.total_parent_comments)
    }

    #[test]
    fn empty_body_rejected() {
        let (context, author, article) = setup();
        let result = DbComment::create(
            DbCommentInsertForm {
                creator_id: author.id,
                article_id: article.id,
                parent_id: None,
                content: "   \n".to_string(),
            },
            &context,
        );
        assert!(matches!(result, Err(BackendError::Validation(_))));
        assert_eq!(activity(&context, article.id), (0, 0));
    }

    #[test]
    fn parent_must_belong_to_same_article() {
        let (context, author, article) = setup();
        let other = DbArticle::create(
            DbArticleForm {
                title: "Second article".to_string(),
                text: String::new(),
                author_id: author.id,
            },
            &context,
        )
        .unwrap();
        let root = add(&context, author.id, article.id, None, "first");

        let result = DbComment::create(
            DbCommentInsertForm {
                creator_id: author.id,
                article_id: other.id,
                parent_id: Some(root.comment.id),
                content: "mismatched".to_string(),
            },
            &context,
        );
        assert!(matches!(result, Err(BackendError::Validation(_))));

        let result = DbComment::create(
            DbCommentInsertForm {
                creator_id: author.id,
                article_id: article.id,
                parent_id: Some(CommentId(999)),
                content: "orphan".to_string(),
            },
            &context,
        );
        assert!(matches!(result, Err(BackendError::NotFound)));
    }

    #[test]
    fn replies_append_in_chronological_order() {
        let (context, author, article) = setup();
        let commenter = testing::person(&context, "commenter");
        let root = add(&context, author.id, article.id, None, "root");
        let first = add(&context, commenter.id, article.id, Some(root.comment.id), "one");
        let second = add(&context, commenter.id, article.id, Some(root.comment.id), "two");

        let stored = DbComment::read(root.comment.id, &context).unwrap();
        assert_eq!(stored.children, vec![first.comment.id, second.comment.id]);
        assert!(first.comment.is_reply());
        assert!(!stored.is_reply());
    }

    #[test]
    fn roots_page_newest_first() {
        let (context, author, article) = setup();
        let mut ids = Vec::new();
        for i in 0..7 {
            ids.push(add(&context, author.id, article.id, None, &format!("c{i}")).comment.id);
        }

        // default page size from config is 5
        let page = DbComment::read_roots(article.id, None, None, &context).unwrap();
        let got: Vec<CommentId> = page.iter().map(|v| v.comment.id).collect();
        let mut expected = ids.clone();
        expected.reverse();
        assert_eq!(got, expected[..5]);

        let rest = DbComment::read_roots(article.id, Some(5), None, &context).unwrap();
        let got: Vec<CommentId> = rest.iter().map(|v| v.comment.id).collect();
        assert_eq!(got, expected[5..]);

        assert!(matches!(
            DbComment::read_roots(ArticleId(999), None, None, &context),
            Err(BackendError::NotFound)
        ));
    }

    #[test]
    fn replies_sorted_newest_first_at_read_time() {
        let (context, author, article) = setup();
        let root = add(&context, author.id, article.id, None, "root");
        let mut ids = Vec::new();
        for i in 0..3 {
            ids.push(
                add(&context, author.id, article.id, Some(root.comment.id), &format!("r{i}"))
                    .comment
                    .id,
            );
        }

        let page = DbComment::read_replies(root.comment.id, None, None, &context).unwrap();
        let got: Vec<CommentId> = page.iter().map(|v| v.comment.id).collect();
        let mut expected = ids.clone();
        expected.reverse();
        assert_eq!(got, expected);

        // storage order is untouched by reads
        let stored = DbComment::read(root.comment.id, &context).unwrap();
        assert_eq!(stored.children, ids);

        // childless comment pages are empty, not an error
        let leaf = page.last().unwrap().comment.id;
        assert_eq!(
            DbComment::read_replies(leaf, None, None, &context).unwrap(),
            Vec::new()
        );
    }

    #[test]
    fn delete_requires_creator_or_article_author() {
        let (context, author, article) = setup();
        let commenter = testing::person(&context, "commenter");
        let stranger = testing::person(&context, "stranger");
        let comment = add(&context, commenter.id, article.id, None, "mine");

        assert!(matches!(
            DbComment::delete(comment.comment.id, stranger.id, &context),
            Err(BackendError::PermissionDenied)
        ));
        assert!(DbComment::delete(comment.comment.id, commenter.id, &context).is_ok());

        // the article author can remove comments from other users
        let comment = add(&context, commenter.id, article.id, None, "again");
        assert!(DbComment::delete(comment.comment.id, author.id, &context).is_ok());

        assert!(matches!(
            DbComment::delete(CommentId(999), author.id, &context),
            Err(BackendError::NotFound)
        ));
    }
}
