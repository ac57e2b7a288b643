//! Post records as returned by `/posts/*`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server-assigned post identifier.
pub type PostId = String;

const EXCERPT_CHARS: usize = 100;
const UNKNOWN_AUTHOR: &str = "Unknown";

/// Author summary embedded in a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AuthorRecord")]
pub struct Author {
    pub id: String,
    pub username: String,
}

/// Blog post as delivered by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PostRecord")]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub author: Option<Author>,
}

/// Wire form of `Author`; the server may send `id`, `_id` or both.
#[derive(Deserialize)]
struct AuthorRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    mongo_id: Option<String>,
    #[serde(default)]
    username: String,
}

impl TryFrom<AuthorRecord> for Author {
    type Error = String;

    fn try_from(record: AuthorRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: pick_id(record.id, record.mongo_id).ok_or("author without id")?,
            username: record.username,
        })
    }
}

/// Wire form of `Post`.
///
/// `author` stays raw: only an embedded object becomes an `Author`, a bare
/// id or any other value is treated as unknown.
#[derive(Deserialize)]
struct PostRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    mongo_id: Option<String>,
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    author: Option<Value>,
}

impl TryFrom<PostRecord> for Post {
    type Error = String;

    fn try_from(record: PostRecord) -> Result<Self, Self::Error> {
        let author = record
            .author
            .filter(Value::is_object)
            .and_then(|value| serde_json::from_value::<Author>(value).ok());
        Ok(Self {
            id: pick_id(record.id, record.mongo_id).ok_or("post without id")?,
            title: record.title,
            content: record.content,
            author,
        })
    }
}

/// `id` wins over `_id`; empty strings count as missing.
fn pick_id(id: Option<String>, mongo_id: Option<String>) -> Option<String> {
    id.filter(|id| !id.is_empty())
        .or(mongo_id.filter(|id| !id.is_empty()))
}

impl Post {
    /// Author display name, `Unknown` when the API omitted it.
    pub fn author_name(&self) -> &str {
        self.author
            .as_ref()
            .map(|author| author.username.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or(UNKNOWN_AUTHOR)
    }

    /// First 100 characters of content followed by `...`, as shown on list cards.
    pub fn excerpt(&self) -> String {
        let mut excerpt = self.content.chars().take(EXCERPT_CHARS).collect::<String>();
        excerpt.push_str("...");
        excerpt
    }

    /// Whether `user_id` matches the embedded author id.
    ///
    /// `None` on either side never matches.
    pub fn is_authored_by(&self, user_id: Option<&str>) -> bool {
        match (user_id, self.author.as_ref()) {
            (Some(user_id), Some(author)) => !user_id.is_empty() && author.id == user_id,
            _ => false,
        }
    }
}

/// Body of create/update calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostPayload {
    pub title: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::{Author, Post};
    use serde_json::json;

    fn post(author: Option<Author>, content: &str) -> Post {
        Post {
            id: "p1".to_string(),
            title: "Title".to_string(),
            content: content.to_string(),
            author,
        }
    }

    #[test]
    fn deserializes_mongo_style_ids() {
        let post: Post = serde_json::from_str(
            r#"{"_id":"p9","title":"t","content":"c","author":{"_id":"u1","username":"ann"}}"#,
        )
        .unwrap();
        assert_eq!(post.id, "p9");
        assert_eq!(post.author.unwrap().id, "u1");
    }

    #[test]
    fn accepts_both_id_keys_at_once() {
        let post: Post = serde_json::from_value(json!({
            "_id": "p1",
            "id": "p1",
            "title": "t",
            "content": "c",
            "author": {"_id": "u1", "id": "u1", "username": "ann"}
        }))
        .unwrap();
        assert_eq!(post.id, "p1");
        assert_eq!(post.author.unwrap().id, "u1");

        let plain: Post = serde_json::from_value(json!({"id": "p2", "title": "t"})).unwrap();
        assert_eq!(plain.id, "p2");
        assert!(serde_json::from_value::<Post>(json!({"title": "t"})).is_err());
    }

    #[test]
    fn unexpanded_author_is_unknown() {
        for author in [json!("u1"), json!(42), json!(null), json!({"username": "ann"})] {
            let post: Post = serde_json::from_value(json!({
                "_id": "p1",
                "title": "t",
                "author": author
            }))
            .unwrap();
            assert!(post.author.is_none());
            assert_eq!(post.author_name(), "Unknown");
            assert!(!post.is_authored_by(Some("u1")));
        }
    }

    #[test]
    fn author_name_falls_back_to_unknown() {
        assert_eq!(post(None, "").author_name(), "Unknown");
        let named = post(
            Some(Author {
                id: "u1".to_string(),
                username: "ann".to_string(),
            }),
            "",
        );
        assert_eq!(named.author_name(), "ann");
    }

    #[test]
    fn excerpt_keeps_first_hundred_chars() {
        let long = "x".repeat(150);
        let excerpt = post(None, &long).excerpt();
        assert_eq!(excerpt.len(), 103);
        assert!(excerpt.ends_with("..."));
        assert_eq!(post(None, "short").excerpt(), "short...");
    }

    #[test]
    fn ownership_requires_matching_author() {
        let owned = post(
            Some(Author {
                id: "u1".to_string(),
                username: "ann".to_string(),
            }),
            "",
        );
        assert!(owned.is_authored_by(Some("u1")));
        assert!(!owned.is_authored_by(Some("u2")));
        assert!(!owned.is_authored_by(None));
        assert!(!post(None, "").is_authored_by(Some("u1")));
    }
}
