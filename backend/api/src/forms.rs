//! # Forms
//!
//! Checks the pages run before anything is sent to the backend. The backend
//! validates again, these only save a round trip.
//!
//! - Login: email + password
//! - Signup: name, email, password, confirmation that has to match
//! - New post: title, content and a thumbnail, all required
use std::{fs, path::Path, sync::LazyLock};

use regex::Regex;
use thiserror::Error;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormError {
    #[error("Please fill in all the fields before submitting.")]
    MissingFields,

    #[error("Please enter a valid email address.")]
    InvalidEmail,

    #[error("Please ensure the passwords match before submitting.")]
    PasswordMismatch,

    #[error("Invalid blog post ID")]
    InvalidId,

    #[error("Unsupported thumbnail type: {0}")]
    UnsupportedThumbnail(String),
}

fn filled(fields: &[&str]) -> Result<(), FormError> {
    if fields.iter().any(|field| field.trim().is_empty()) {
        return Err(FormError::MissingFields);
    }

    Ok(())
}

fn email(address: &str) -> Result<(), FormError> {
    if !EMAIL.is_match(address.trim()) {
        return Err(FormError::InvalidEmail);
    }

    Ok(())
}

/// Route params that never got filled in show up as the literal `undefined`.
pub fn post_id(id: &str) -> Result<&str, FormError> {
    let id = id.trim();

    if id.is_empty() || id == "undefined" {
        return Err(FormError::InvalidId);
    }

    Ok(id)
}

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FormError> {
        filled(&[self.email.as_str(), self.password.as_str()])?;
        email(&self.email)
    }
}

#[derive(Debug, Clone)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    pub fn validate(&self) -> Result<(), FormError> {
        filled(&[self.name.as_str(), self.email.as_str(), self.password.as_str()])?;
        email(&self.email)?;

        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl Thumbnail {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, FormError> {
        let file_name = file_name.into();
        let mime = mime_for(&file_name)
            .ok_or_else(|| FormError::UnsupportedThumbnail(file_name.clone()))?;

        Ok(Self {
            file_name,
            mime,
            bytes,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, crate::ApiError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let bytes = fs::read(path)?;

        Ok(Self::new(file_name, bytes)?)
    }
}

fn mime_for(file_name: &str) -> Option<&'static str> {
    let (_, extension) = file_name.rsplit_once('.')?;

    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct PostForm {
    pub title: String,
    pub content: String,
    pub thumbnail: Option<Thumbnail>,
}

impl PostForm {
    pub fn validate(&self) -> Result<&Thumbnail, FormError> {
        filled(&[self.title.as_str(), self.content.as_str()])?;

        match &self.thumbnail {
            Some(thumbnail) if !thumbnail.bytes.is_empty() => Ok(thumbnail),
            _ => Err(FormError::MissingFields),
        }
    }
}
