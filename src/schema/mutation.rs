use entities::prelude::Tutorial;
use juniper::{FieldResult, IntoFieldError};

use crate::state::AppData;

#[derive(Clone, Copy, Debug)]
pub struct Mutation;

#[juniper::graphql_object(context = crate::state::AppData)]
impl Mutation {
    /// Create a new tutorial
    fn create(ctx: &AppData, title: String) -> FieldResult<Tutorial> {
        ctx.store.create(title).map_err(IntoFieldError::into_field_error)
    }
}
