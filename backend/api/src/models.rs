use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SIGNUP: &str = "/api/v1/auth/signup";
pub const LOGIN: &str = "/api/v1/auth/login";
pub const LOGOUT: &str = "/api/v1/auth/logout";
pub const IS_AUTH: &str = "/api/v1/auth/isAuth";
pub const USER: &str = "/api/v1/auth/user";

pub const ALL_BLOGS: &str = "/api/v1/blog/getAllBlogs";
pub const AUTHOR_BLOGS: &str = "/api/v1/blog/getAuthorBlogs";
pub const BLOG: &str = "/api/v1/blog/getBlog";
pub const BLOG_BY_ID: &str = "/api/v1/blog";
pub const CREATE_BLOG: &str = "/api/v1/blog/create";
pub const DELETE_BLOG: &str = "/api/v1/blog/delete";

/// Every backend answer is wrapped like this, only some fields are set per endpoint.
#[derive(Deserialize, Debug, Default)]
pub struct Envelope {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub user: Option<User>,
    pub blogs: Option<Vec<Post>>,
    pub blog: Option<Post>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Author {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    /// Rich text from the editor, kept as the HTML string the backend stores.
    pub content: String,
    pub author: Author,
    pub created_at: DateTime<Utc>,
    pub thumbnail: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
}

#[derive(Serialize)]
pub struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub struct Registration<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

/// The listing page shows the newest post on top as the featured one.
pub fn featured(posts: &[Post]) -> Option<&Post> {
    posts.first()
}

/// The featured post and the rest of the listing below it, each shown once.
pub fn split_featured(posts: &[Post]) -> (Option<&Post>, &[Post]) {
    match posts.split_first() {
        Some((first, rest)) => (Some(first), rest),
        None => (None, &[]),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::{Envelope, Post, featured, split_featured};

    fn post_json(id: &str) -> serde_json::Value {
        json!({
            "_id": id,
            "title": "Hello",
            "content": "<p>first post</p>",
            "author": { "_id": "u1", "name": "Ada" },
            "createdAt": "2024-11-02T10:15:00.000Z",
            "thumbnail": "https://res.cloudinary.com/demo/thumb.png",
            "__v": 0
        })
    }

    #[test]
    fn test_post_from_backend() {
        let post: Post = serde_json::from_value(post_json("p1")).unwrap();

        assert_eq!(post.id, "p1");
        assert_eq!(post.author.name, "Ada");
        assert_eq!(
            post.created_at,
            Utc.with_ymd_and_hms(2024, 11, 2, 10, 15, 0).unwrap()
        );
        assert_eq!(post.image, None);
    }

    #[test]
    fn test_envelope_defaults() {
        let envelope: Envelope = serde_json::from_value(json!({ "message": "nope" })).unwrap();

        assert!(!envelope.success);
        assert_eq!(envelope.message.as_deref(), Some("nope"));
        assert!(envelope.blogs.is_none());
    }

    #[test]
    fn test_featured_is_first() {
        let posts: Vec<Post> = vec![
            serde_json::from_value(post_json("p1")).unwrap(),
            serde_json::from_value(post_json("p2")).unwrap(),
        ];

        assert_eq!(featured(&posts).map(|post| post.id.as_str()), Some("p1"));
        assert!(featured(&[]).is_none());
    }

    #[test]
    fn test_split_featured_lists_each_post_once() {
        let posts: Vec<Post> = vec![
            serde_json::from_value(post_json("p1")).unwrap(),
            serde_json::from_value(post_json("p2")).unwrap(),
            serde_json::from_value(post_json("p3")).unwrap(),
        ];

        let (first, rest) = split_featured(&posts);
        let rest: Vec<&str> = rest.iter().map(|post| post.id.as_str()).collect();

        assert_eq!(first.map(|post| post.id.as_str()), Some("p1"));
        assert_eq!(rest, ["p2", "p3"]);

        let (first, rest) = split_featured(&[]);
        assert!(first.is_none());
        assert!(rest.is_empty());
    }
}
