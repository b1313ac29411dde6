use juniper::GraphQLObject;
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, GraphQLObject)]
pub struct Author {
    pub name: String,
    /// Ids of the tutorials this author wrote. Nothing keeps this in sync
    /// with the store.
    pub tutorials: Vec<i32>,
}

impl Author {
    pub fn new(name: impl Into<String>, tutorials: Vec<i32>) -> Self {
        Self {
            name: name.into(),
            tutorials,
        }
    }
}
