use tracing::{info, warn};

use crate::auth::{authorize, Decision};
use crate::collection::{
    add_like, insert_front, remove_by_id_authorized, remove_like, CollectionError,
};
use crate::database::models::{Comment, Like, Post, User};
use crate::database::Store;

use super::{ServiceError, ServiceResult};

/// Posts and the likes/comments embedded in them.
///
/// Every mutation is load → mutate → save with no lock in between, so two
/// concurrent writers to the same post race and the later save wins.
#[derive(Clone)]
pub struct PostService {
    store: Store,
}

impl PostService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    async fn load(&self, post_id: &str) -> ServiceResult<Post> {
        self.store
            .posts
            .get_by_id(post_id)
            .await?
            .found_or(ServiceError::NotFound("Post"))
    }

    async fn author(&self, user_id: &str) -> ServiceResult<User> {
        self.store
            .users
            .get_by_id(user_id)
            .await?
            .found_or(ServiceError::NotFound("User"))
    }

    pub async fn create(&self, caller_id: &str, text: String) -> ServiceResult<Post> {
        let author = self.author(caller_id).await?;
        let post = Post::new(&author, text);
        self.store.posts.save(&post).await?;
        info!(post_id = %post.id, user_id = %caller_id, "created post");
        Ok(post)
    }

    /// All posts, newest first
    pub async fn list(&self) -> ServiceResult<Vec<Post>> {
        let mut posts = self.store.posts.list().await?;
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(posts)
    }

    pub async fn get(&self, post_id: &str) -> ServiceResult<Post> {
        self.load(post_id).await
    }

    pub async fn delete(&self, caller_id: &str, post_id: &str) -> ServiceResult<()> {
        let post = self.load(post_id).await?;
        if authorize(caller_id, &post.user) == Decision::Deny {
            warn!(post_id, user_id = %caller_id, "post deletion denied");
            return Err(ServiceError::Forbidden("User not authorized"));
        }

        self.store.posts.delete_by_id(post_id).await?;
        info!(post_id, user_id = %caller_id, "deleted post");
        Ok(())
    }

    pub async fn like(&self, caller_id: &str, post_id: &str) -> ServiceResult<Vec<Like>> {
        let mut post = self.load(post_id).await?;
        add_like(&mut post.likes, caller_id)?;
        self.store.posts.save(&post).await?;
        Ok(post.likes)
    }

    pub async fn unlike(&self, caller_id: &str, post_id: &str) -> ServiceResult<Vec<Like>> {
        let mut post = self.load(post_id).await?;
        remove_like(&mut post.likes, caller_id)?;
        self.store.posts.save(&post).await?;
        Ok(post.likes)
    }

    pub async fn comment(
        &self,
        caller_id: &str,
        post_id: &str,
        text: String,
    ) -> ServiceResult<Vec<Comment>> {
        let author = self.author(caller_id).await?;
        let mut post = self.load(post_id).await?;
        insert_front(&mut post.comments, Comment::new(&author, text));
        self.store.posts.save(&post).await?;
        Ok(post.comments)
    }

    /// Only the comment's author may remove it, not the post's owner
    pub async fn remove_comment(
        &self,
        caller_id: &str,
        post_id: &str,
        comment_id: &str,
    ) -> ServiceResult<Vec<Comment>> {
        let mut post = self.load(post_id).await?;
        match remove_by_id_authorized(&mut post.comments, comment_id, caller_id, |c| &c.user) {
            Ok(_) => {}
            Err(CollectionError::Forbidden) => {
                warn!(post_id, comment_id, user_id = %caller_id, "comment deletion denied");
                return Err(ServiceError::Forbidden("User not authorized"));
            }
            Err(other) => return Err(other.into()),
        }
        self.store.posts.save(&post).await?;
        Ok(post.comments)
    }
}
