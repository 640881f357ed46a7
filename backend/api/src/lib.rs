//! # Blog API
//!
//! Client for the external blog backend the pages talk to.
//!
//! The backend owns accounts, sessions and posts. This crate only calls it.
//!
//!
//!
//! ## Endpoints
//!
//! Auth
//! - `POST /api/v1/auth/signup`: JSON `{ name, email, password }`, sets the `token` cookie
//! - `POST /api/v1/auth/login`: JSON `{ email, password }`, sets the `token` cookie
//! - `GET /api/v1/auth/logout`: clears the `token` cookie
//! - `GET /api/v1/auth/isAuth`: `success` tells whether the cookie is still good
//! - `GET /api/v1/auth/user`: current user
//!
//! Blog
//! - `GET /api/v1/blog/getAllBlogs`: public listing
//! - `GET /api/v1/blog/getAuthorBlogs?author=<id>`: dashboard listing
//! - `GET /api/v1/blog/getBlog/<id>`: detail page
//! - `GET /api/v1/blog/<id>`: edit page
//! - `POST /api/v1/blog/create`: multipart `title`, `content`, `thumbnail`
//! - `DELETE /api/v1/blog/delete/<id>`
//!
//!
//!
//! ## Payloads
//! Every answer is `{ success, message?, user?, blogs?, blog? }`. Failures carry a
//! `message` which we surface, otherwise a fallback per call.
//!
//! ## Cookies
//! The client keeps a cookie store, so the `token` the backend sets on login is sent
//! back on every following call from the same [`BlogClient`].
use reqwest::{
    Client, Response, StatusCode,
    multipart::{Form, Part},
};
use thiserror::Error;
use tracing::{debug, warn};

pub mod forms;
pub mod models;

use forms::{FormError, LoginForm, PostForm, SignupForm, post_id};
use models::{
    ALL_BLOGS, AUTHOR_BLOGS, BLOG, BLOG_BY_ID, CREATE_BLOG, Credentials, DELETE_BLOG, Envelope,
    IS_AUTH, LOGIN, LOGOUT, Post, Registration, SIGNUP, USER, User,
};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Response is missing {0}")]
    MissingField(&'static str),

    #[error(transparent)]
    Validation(#[from] FormError),

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct BlogClient {
    base_url: String,
    http: Client,
}

impl BlogClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let http = Client::builder().cookie_store(true).build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn signup(&self, form: &SignupForm) -> Result<String, ApiError> {
        form.validate()?;

        let payload = Registration {
            name: form.name.trim(),
            email: form.email.trim(),
            password: &form.password,
        };
        let response = self.http.post(self.url(SIGNUP)).json(&payload).send().await?;

        let envelope = read(response, "An error occurred during Registration.").await?;

        Ok(envelope
            .message
            .unwrap_or_else(|| "Your account has been created!".to_string()))
    }

    pub async fn login(&self, form: &LoginForm) -> Result<String, ApiError> {
        form.validate()?;

        let payload = Credentials {
            email: form.email.trim(),
            password: &form.password,
        };
        let response = self.http.post(self.url(LOGIN)).json(&payload).send().await?;

        let envelope = read(response, "Please check your credentials and try again.").await?;

        Ok(envelope.message.unwrap_or_else(|| "Welcome back!".to_string()))
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        let response = self.http.get(self.url(LOGOUT)).send().await?;
        read(response, "An error occurred during logout.").await?;

        Ok(())
    }

    /// Any failure, including the backend being down, reads as logged out.
    pub async fn is_authenticated(&self) -> bool {
        let result: Result<Envelope, ApiError> = async {
            let response = self.http.get(self.url(IS_AUTH)).send().await?;
            read(response, "Not authenticated").await
        }
        .await;

        match result {
            Ok(envelope) => envelope.success,
            Err(e) => {
                debug!("Auth check failed: {e}");
                false
            }
        }
    }

    pub async fn current_user(&self) -> Result<User, ApiError> {
        let response = self.http.get(self.url(USER)).send().await?;
        let fallback = "Error fetching user data";

        succeeded(read(response, fallback).await?, fallback)?
            .user
            .ok_or(ApiError::MissingField("user"))
    }

    pub async fn all_posts(&self) -> Result<Vec<Post>, ApiError> {
        let response = self.http.get(self.url(ALL_BLOGS)).send().await?;
        let fallback = "Could not fetch blogs.";

        succeeded(read(response, fallback).await?, fallback)?
            .blogs
            .ok_or(ApiError::MissingField("blogs"))
    }

    pub async fn author_posts(&self, author_id: &str) -> Result<Vec<Post>, ApiError> {
        let response = self
            .http
            .get(self.url(AUTHOR_BLOGS))
            .query(&[("author", author_id)])
            .send()
            .await?;
        let fallback = "No Blogs Found";

        succeeded(read(response, fallback).await?, fallback)?
            .blogs
            .ok_or(ApiError::MissingField("blogs"))
    }

    /// Detail view. Unlike the edit view, any id is sent as is and the backend's
    /// own message never reaches the reader.
    pub async fn post(&self, id: &str) -> Result<Post, ApiError> {
        if id.trim().is_empty() {
            return Err(FormError::InvalidId.into());
        }

        let response = self
            .http
            .get(self.url(&format!("{BLOG}/{id}")))
            .send()
            .await?;

        let envelope = read(response, "").await.map_err(|e| match e {
            ApiError::Rejected { status, .. } => ApiError::Rejected {
                status,
                message: "An error occurred while fetching the blog post".to_string(),
            },
            other => other,
        })?;

        if !envelope.success {
            return Err(ApiError::Rejected {
                status: StatusCode::OK,
                message: "Failed to fetch blog post".to_string(),
            });
        }

        envelope.blog.ok_or(ApiError::MissingField("blog"))
    }

    pub async fn post_for_edit(&self, id: &str) -> Result<Post, ApiError> {
        let id = post_id(id)?;
        let response = self
            .http
            .get(self.url(&format!("{BLOG_BY_ID}/{id}")))
            .send()
            .await?;
        let fallback = "Failed to fetch blog post";

        succeeded(read(response, fallback).await?, fallback)?
            .blog
            .ok_or(ApiError::MissingField("blog"))
    }

    pub async fn create_post(&self, form: &PostForm) -> Result<String, ApiError> {
        let thumbnail = form.validate()?;

        let part = Part::bytes(thumbnail.bytes.clone())
            .file_name(thumbnail.file_name.clone())
            .mime_str(thumbnail.mime)?;

        let multipart = Form::new()
            .text("title", form.title.clone())
            .text("content", form.content.clone())
            .part("thumbnail", part);

        let response = self
            .http
            .post(self.url(CREATE_BLOG))
            .multipart(multipart)
            .send()
            .await?;

        let envelope = read(response, "An error occurred while creating the post.").await?;

        Ok(envelope
            .message
            .unwrap_or_else(|| "Your blog post has been created!".to_string()))
    }

    pub async fn delete_post(&self, id: &str) -> Result<String, ApiError> {
        let id = post_id(id)?;
        let response = self
            .http
            .delete(self.url(&format!("{DELETE_BLOG}/{id}")))
            .send()
            .await?;
        let fallback = "An error occurred while deleting the blog.";

        let envelope = succeeded(read(response, fallback).await?, fallback)?;

        Ok(envelope
            .message
            .unwrap_or_else(|| "Blog Deleted Successfully".to_string()))
    }
}

/// Non-2xx answers become [`ApiError::Rejected`], using the backend's message if it sent one.
async fn read(response: Response, fallback: &str) -> Result<Envelope, ApiError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        let message = serde_json::from_str::<Envelope>(&text)
            .ok()
            .and_then(|envelope| envelope.message)
            .unwrap_or_else(|| fallback.to_string());

        warn!("Backend rejected request ({status}): {message}");

        return Err(ApiError::Rejected { status, message });
    }

    if text.trim().is_empty() {
        return Ok(Envelope::default());
    }

    Ok(serde_json::from_str(&text)?)
}

/// A 200 with `success: false` is still a failure for the listing/detail calls.
fn succeeded(envelope: Envelope, fallback: &str) -> Result<Envelope, ApiError> {
    if envelope.success {
        return Ok(envelope);
    }

    Err(ApiError::Rejected {
        status: StatusCode::OK,
        message: envelope.message.unwrap_or_else(|| fallback.to_string()),
    })
}
