use futures::future::join_all;
use tracing::{error, info};

use crate::models::Post;
use crate::source::ContentHost;

/// Drops soft-deleted posts and orders the rest newest first. The sort is
/// stable, so posts sharing a date keep their index order.
pub fn visible_posts(mut posts: Vec<Post>) -> Vec<Post> {
    posts.retain(Post::is_visible);
    posts.sort_by(|a, b| b.published_at().cmp(&a.published_at()));
    posts
}

/// The `index`-th slice of `page_size` posts. Pages past the end are empty.
pub fn page(posts: &[Post], page_size: usize, index: usize) -> &[Post] {
    let start = index.saturating_mul(page_size).min(posts.len());
    let end = start.saturating_add(page_size).min(posts.len());
    &posts[start..end]
}

pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Fetches the index and returns the visible posts. Any failure is logged
/// and yields an empty list.
pub async fn load_index(host: &ContentHost) -> Vec<Post> {
    match host.fetch_index().await {
        Ok(posts) => visible_posts(posts),
        Err(e) => {
            error!("{}", e);
            Vec::new()
        }
    }
}

/// Attaches the body to `post`. On failure the post keeps empty content.
pub async fn load_content(host: &ContentHost, mut post: Post) -> Post {
    match host.fetch_content(&post.filename).await {
        Ok(content) => post.content = Some(content),
        Err(e) => {
            error!("{}", e);
            post.content = Some(String::new());
        }
    }
    post
}

/// Loads every post's body concurrently, keeping the input order.
pub async fn hydrate_all(host: &ContentHost, posts: Vec<Post>) -> Vec<Post> {
    join_all(posts.into_iter().map(|post| load_content(host, post))).await
}

/// Detail-view lookup: `None` when the index is unavailable or the post is
/// missing or deleted.
pub async fn find_post(host: &ContentHost, filename: &str) -> Option<Post> {
    let post = load_index(host)
        .await
        .into_iter()
        .find(|p| p.filename == filename)?;
    Some(load_content(host, post).await)
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Ready(Vec<Post>),
}

/// Paginated view over the hydrated post list of a single page load.
#[derive(Debug)]
pub struct PostListController {
    host: ContentHost,
    page_size: usize,
    page_index: usize,
    state: LoadState,
}

impl PostListController {
    pub fn new(host: ContentHost, page_size: usize) -> Self {
        Self {
            host,
            page_size,
            page_index: 0,
            state: LoadState::Loading,
        }
    }

    /// Index fetch, then one body fetch per visible post, joined. Runs once;
    /// later calls are no-ops.
    pub async fn load(&mut self) {
        if let LoadState::Ready(_) = self.state {
            return;
        }
        let index = load_index(&self.host).await;
        let posts = hydrate_all(&self.host, index).await;
        info!(count = posts.len(), "posts loaded");
        self.state = LoadState::Ready(posts);
    }

    pub fn set_page(&mut self, index: usize) {
        self.page_index = index;
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn posts(&self) -> &[Post] {
        match &self.state {
            LoadState::Loading => &[],
            LoadState::Ready(posts) => posts.as_slice(),
        }
    }

    pub fn current_page(&self) -> &[Post] {
        page(self.posts(), self.page_size, self.page_index)
    }

    pub fn total_posts(&self) -> usize {
        self.posts().len()
    }

    pub fn page_count(&self) -> usize {
        page_count(self.total_posts(), self.page_size)
    }

    pub fn has_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn has_next(&self) -> bool {
        self.page_index < self.page_count().saturating_sub(1)
    }
}
