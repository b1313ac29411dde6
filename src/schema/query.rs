use entities::prelude::Tutorial;
use tracing::debug;

use crate::state::AppData;

#[derive(Clone, Copy, Debug)]
pub struct Query;

#[juniper::graphql_object(context = crate::state::AppData)]
impl Query {
    fn hello() -> &'static str {
        "world"
    }

    /// Get a tutorial by ID
    fn tutorial(ctx: &AppData, id: Option<i32>) -> Option<Tutorial> {
        let found = id.and_then(|id| ctx.store.get_by_id(id));
        debug!(?id, hit = found.is_some(), "tutorial lookup");
        found
    }

    /// Get Tutorial List
    fn list(ctx: &AppData) -> Vec<Tutorial> {
        ctx.store.list_all()
    }
}
