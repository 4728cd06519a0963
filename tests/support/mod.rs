#![allow(dead_code)]

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, header},
    response::Response,
};
use http_body_util::BodyExt;
use sqlx::Error as SqlxError;

use postdesk::application::admin::posts::AdminPostService;
use postdesk::application::auth::{CallerContext, EmailAdminGate, SessionTokens};
use postdesk::application::posts::PostService;
use postdesk::application::render::render_service;
use postdesk::application::repos::{PostsRepo, PostsWriteRepo, RepoError};
use postdesk::domain::posts::{Post, PostListing};
use postdesk::infra::http::{AdminState, HealthProbe, HttpState, RouterState, SESSION_COOKIE};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const READER_EMAIL: &str = "reader@example.com";
pub const SESSION_SECRET: &str = "integration-test-secret";

/// Store double that enforces slug uniqueness and counts calls.
#[derive(Default)]
pub struct InMemoryPosts {
    posts: Mutex<Vec<Post>>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl InMemoryPosts {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn seeded(posts: &[(&str, &str, &str)]) -> Arc<Self> {
        let store = Self::default();
        {
            let mut guard = store.posts.lock().expect("lock");
            for (slug, title, markdown) in posts {
                guard.push(post(slug, title, markdown));
            }
        }
        Arc::new(store)
    }

    pub fn snapshot(&self) -> Vec<Post> {
        self.posts.lock().expect("lock").clone()
    }

    pub fn get(&self, slug: &str) -> Option<Post> {
        self.snapshot().into_iter().find(|post| post.slug == slug)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.reads() + self.writes()
    }
}

#[async_trait]
impl PostsRepo for InMemoryPosts {
    async fn list_posts(&self) -> Result<Vec<PostListing>, RepoError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let guard = self.posts.lock().expect("lock");
        Ok(guard.iter().map(PostListing::from).collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let guard = self.posts.lock().expect("lock");
        Ok(guard.iter().find(|post| post.slug == slug).cloned())
    }
}

#[async_trait]
impl PostsWriteRepo for InMemoryPosts {
    async fn insert_post(&self, post: Post) -> Result<Post, RepoError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut guard = self.posts.lock().expect("lock");
        if guard.iter().any(|existing| existing.slug == post.slug) {
            return Err(duplicate());
        }
        guard.push(post.clone());
        Ok(post)
    }

    async fn update_post(&self, slug: &str, post: Post) -> Result<Post, RepoError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut guard = self.posts.lock().expect("lock");
        let index = guard
            .iter()
            .position(|existing| existing.slug == slug)
            .ok_or(RepoError::NotFound)?;
        if post.slug != slug && guard.iter().any(|existing| existing.slug == post.slug) {
            return Err(duplicate());
        }
        guard[index] = post.clone();
        Ok(post)
    }

    async fn delete_post(&self, slug: &str) -> Result<(), RepoError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut guard = self.posts.lock().expect("lock");
        let before = guard.len();
        guard.retain(|existing| existing.slug != slug);
        if guard.len() == before {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

/// Store double whose every call fails like an unreachable database.
pub struct BrokenPosts;

#[async_trait]
impl PostsRepo for BrokenPosts {
    async fn list_posts(&self) -> Result<Vec<PostListing>, RepoError> {
        Err(RepoError::Persistence("connection refused".to_string()))
    }

    async fn find_by_slug(&self, _slug: &str) -> Result<Option<Post>, RepoError> {
        Err(RepoError::Persistence("connection refused".to_string()))
    }
}

#[async_trait]
impl PostsWriteRepo for BrokenPosts {
    async fn insert_post(&self, _post: Post) -> Result<Post, RepoError> {
        Err(RepoError::Persistence("connection refused".to_string()))
    }

    async fn update_post(&self, _slug: &str, _post: Post) -> Result<Post, RepoError> {
        Err(RepoError::Persistence("connection refused".to_string()))
    }

    async fn delete_post(&self, _slug: &str) -> Result<(), RepoError> {
        Err(RepoError::Persistence("connection refused".to_string()))
    }
}

pub struct StubHealth {
    pub healthy: bool,
}

#[async_trait]
impl HealthProbe for StubHealth {
    async fn health_check(&self) -> Result<(), SqlxError> {
        if self.healthy {
            Ok(())
        } else {
            Err(SqlxError::PoolTimedOut)
        }
    }
}

fn duplicate() -> RepoError {
    RepoError::Duplicate {
        constraint: "posts_slug_key".to_string(),
    }
}

pub fn post(slug: &str, title: &str, markdown: &str) -> Post {
    Post {
        slug: slug.to_string(),
        title: title.to_string(),
        markdown: markdown.to_string(),
    }
}

pub fn admin() -> CallerContext {
    CallerContext::signed_in(ADMIN_EMAIL)
}

pub fn reader() -> CallerContext {
    CallerContext::signed_in(READER_EMAIL)
}

pub fn admin_service<R>(store: Arc<R>) -> AdminPostService
where
    R: PostsRepo + PostsWriteRepo + 'static,
{
    AdminPostService::new(
        store.clone(),
        store,
        Arc::new(EmailAdminGate::new(ADMIN_EMAIL)),
    )
}

pub fn post_service<R>(store: Arc<R>) -> PostService
where
    R: PostsRepo + 'static,
{
    PostService::new(store, render_service())
}

pub fn router_state<R>(store: Arc<R>, healthy: bool) -> RouterState
where
    R: PostsRepo + PostsWriteRepo + 'static,
{
    RouterState {
        http: HttpState {
            posts: Arc::new(post_service(store.clone())),
            health: Arc::new(StubHealth { healthy }),
        },
        admin: AdminState {
            posts: Arc::new(admin_service(store)),
        },
        sessions: Arc::new(SessionTokens::new(SESSION_SECRET).expect("secret")),
    }
}

pub fn session_cookie(email: &str) -> String {
    let token = SessionTokens::new(SESSION_SECRET)
        .expect("secret")
        .issue(email);
    format!("{SESSION_COOKIE}={token}")
}

pub fn get(uri: &str, email: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(email) = email {
        builder = builder.header(header::COOKIE, session_cookie(email));
    }
    builder.body(Body::empty()).expect("request")
}

pub fn post_form(uri: &str, email: Option<&str>, fields: &[(&str, &str)]) -> Request<Body> {
    let body = fields
        .iter()
        .map(|(name, value)| format!("{name}={}", form_encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    let mut builder = Request::post(uri).header(
        header::CONTENT_TYPE,
        "application/x-www-form-urlencoded",
    );
    if let Some(email) = email {
        builder = builder.header(header::COOKIE, session_cookie(email));
    }
    builder.body(Body::from(body)).expect("request")
}

fn form_encode(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            b' ' => encoded.push('+'),
            other => encoded.push_str(&format!("%{other:02X}")),
        }
    }
    encoded
}

pub async fn body_text(response: Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}
