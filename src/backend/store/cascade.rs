use super::MagpieContext;
use crate::common::{comment::DbComment, newtypes::CommentId, notifications::DbNotification};
use log::warn;

/// Aggregated result of one cascading delete. Ids land in `deleted_ids` in
/// post-order, children before their parent.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CascadeOutcome {
    pub deleted_ids: Vec<CommentId>,
    pub failed_ids: Vec<CommentId>,
}

enum Visit {
    Enter(CommentId),
    Exit(CommentId),
}

/// Removes `root` and every transitive child. Each node is handled only after
/// its whole subtree is gone, so a reader never observes a dangling child id.
/// Per node: detach from parent, drop its notification, drop the node, adjust
/// counters.
///
/// Best-effort: a subtree that cannot be read is recorded in `failed_ids` and
/// the remaining siblings are still processed. Steps already committed are
/// never rolled back.
pub(crate) fn delete_subtree(root: CommentId, context: &MagpieContext) -> CascadeOutcome {
    let mut outcome = CascadeOutcome::default();
    let mut worklist = vec![Visit::Enter(root)];
    while let Some(visit) = worklist.pop() {
        match visit {
            Visit::Enter(id) => {
                // snapshot the child list before any mutation
                let children = context.store.comments.get(&id).map(|c| c.children.clone());
                let Some(children) = children else {
                    warn!("comment {id:?} vanished during cascade");
                    outcome.failed_ids.push(id);
                    continue;
                };
                worklist.push(Visit::Exit(id));
                // reversed so the oldest child is processed first
                for child in children.into_iter().rev() {
                    worklist.push(Visit::Enter(child));
                }
            }
            Visit::Exit(id) => delete_node(id, context, &mut outcome),
        }
    }
    outcome
}

fn delete_node(id: CommentId, context: &MagpieContext, outcome: &mut CascadeOutcome) {
    let comment: Option<DbComment> = context.store.comments.get(&id).map(|c| c.clone());
    let Some(comment) = comment else {
        warn!("comment {id:?} vanished during cascade");
        outcome.failed_ids.push(id);
        return;
    };
    // children are gone by now; unlink from the parent before anything else
    if let Some(parent_id) = comment.parent_id {
        if let Some(mut parent) = context.store.comments.get_mut(&parent_id) {
            parent.children.retain(|child| *child != id);
        }
    }
    DbNotification::delete_for_comment(id, context);
    context.store.comments.remove(&id);
    if let Some(counters) = context.store.activity.get(&comment.article_id) {
        // only the top-level node of a cascade can be a root; descendants are
        // replies by construction
        counters.record_removed(!comment.is_reply());
    }
    outcome.deleted_ids.push(id);
}

#[cfg(test)]
#[expect(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{
        backend::{
            store::{article::DbArticleForm, comment::DbCommentInsertForm, testing, MagpieContext},
            utils::error::BackendError,
        },
        common::{
            article::DbArticle,
            newtypes::{ArticleId, PersonId},
            notifications::NotificationKind,
            user::DbPerson,
        },
    };

    fn setup() -> (MagpieContext, DbPerson, DbArticle) {
        let context = testing::context();
        let author = testing::person(&context, "author");
        let article = DbArticle::create(
            DbArticleForm {
                title: "On comment trees".to_string(),
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
    ) -> DbComment {
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
        .comment
    }

    fn activity(context: &MagpieContext, article_id: ArticleId) -> (i64, i64) {
        let view = DbArticle::read_view(article_id, context).unwrap();
        (view.activity.total_comments, view.activity.total_parent_comments)
    }

    #[test]
    fn deletes_subtree_in_post_order() {
        let (context, author, article) = setup();
        let root = add(&context, author.id, article.id, None, "root");
        let a = add(&context, author.id, article.id, Some(root.id), "a");
        let b = add(&context, author.id, article.id, Some(root.id), "b");
        let c = add(&context, author.id, article.id, Some(a.id), "c");

        let outcome = delete_subtree(root.id, &context);
        // children always land before their parent
        assert_eq!(outcome.deleted_ids, vec![c.id, a.id, b.id, root.id]);
        assert!(outcome.failed_ids.is_empty());
        assert!(context.store.comments.is_empty());
        assert_eq!(activity(&context, article.id), (0, 0));
        assert!(context.store.notifications.is_empty());
    }

    #[test]
    fn add_and_delete_keep_counters_and_notifications_consistent() {
        let (context, author, article) = setup();
        let commenter = testing::person(&context, "commenter");

        let root = add(&context, author.id, article.id, None, "hi");
        assert_eq!(activity(&context, article.id), (1, 1));
        let root_notif = DbNotification::list(author.id, &context);
        assert_eq!(root_notif.len(), 1);
        assert_eq!(root_notif[0].kind, NotificationKind::Comment);
        assert_eq!(root_notif[0].comment_id, Some(root.id));

        let reply = add(&context, commenter.id, article.id, Some(root.id), "yo");
        assert_eq!(activity(&context, article.id), (2, 1));
        // the reply notifies the root's creator, not the article author again
        let reply_notif = DbNotification::list(author.id, &context);
        assert_eq!(reply_notif.len(), 2);
        assert_eq!(reply_notif[0].kind, NotificationKind::Reply);
        assert_eq!(reply_notif[0].comment_id, Some(reply.id));
        assert_eq!(reply_notif[0].actor_id, commenter.id);
        assert_eq!(reply_notif[0].replied_on_comment_id, Some(root.id));

        let result = DbComment::delete(root.id, author.id, &context).unwrap();
        assert_eq!(result.deleted_ids, vec![reply.id, root.id]);
        assert_eq!(activity(&context, article.id), (0, 0));
        assert!(DbNotification::list(author.id, &context).is_empty());
        assert_eq!(DbNotification::count(author.id, &context), 0);
    }

    #[test]
    fn deleting_a_reply_leaves_the_rest_of_the_tree() {
        let (context, author, article) = setup();
        let root = add(&context, author.id, article.id, None, "root");
        let keep = add(&context, author.id, article.id, Some(root.id), "keep");
        let gone = add(&context, author.id, article.id, Some(root.id), "gone");

        let result = DbComment::delete(gone.id, author.id, &context).unwrap();
        assert_eq!(result.deleted_ids, vec![gone.id]);
        // detached from the parent, sibling untouched, root still counted
        let stored = DbComment::read(root.id, &context).unwrap();
        assert_eq!(stored.children, vec![keep.id]);
        assert_eq!(activity(&context, article.id), (2, 1));
        // only the deleted comment's notification is gone
        let remaining = DbNotification::list(author.id, &context);
        assert!(remaining.iter().all(|n| n.comment_id != Some(gone.id)));
        assert!(remaining.iter().any(|n| n.comment_id == Some(keep.id)));
    }

    #[test]
    fn vanished_subtree_is_reported_and_siblings_still_deleted() {
        let (context, author, article) = setup();
        let root = add(&context, author.id, article.id, None, "root");
        let missing = add(&context, author.id, article.id, Some(root.id), "missing");
        let sibling = add(&context, author.id, article.id, Some(root.id), "sibling");

        // dangling child reference: the node is gone but the parent still
        // lists it
        context.store.comments.remove(&missing.id);

        let err = DbComment::delete(root.id, author.id, &context).unwrap_err();
        match err {
            BackendError::PartialCascade {
                deleted_ids,
                failed_ids,
            } => {
                assert_eq!(deleted_ids, vec![sibling.id, root.id]);
                assert_eq!(failed_ids, vec![missing.id]);
            }
            other => panic!("expected partial cascade, got {other:?}"),
        }
        // no rollback: the successfully deleted nodes stay gone
        assert!(DbComment::read(sibling.id, &context).is_err());
        assert!(DbComment::read(root.id, &context).is_err());
    }
}
