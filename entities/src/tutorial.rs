use juniper::GraphQLObject;
use serde::Serialize;

use crate::author::Author;
use crate::comment::Comment;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, GraphQLObject)]
pub struct Tutorial {
    /// Zero for records created without an explicit id.
    pub id: i32,
    pub title: String,
    pub author: Author,
    pub comments: Vec<Comment>,
}

impl Tutorial {
    /// A tutorial carrying only a title: id zero, default author, no comments.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}
