use juniper::GraphQLObject;
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, GraphQLObject)]
pub struct Comment {
    pub body: String,
}

impl Comment {
    pub fn new(body: impl Into<String>) -> Self {
        Self { body: body.into() }
    }
}
