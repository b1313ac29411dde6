//! In-memory tutorial store.
//!
//! The store is an ordered sequence of [`Tutorial`]s with no uniqueness
//! constraint on `id`. Clones share the same sequence, so a store handed to
//! the request context and one kept by the caller observe the same writes.

use std::sync::Arc;

use entities::prelude::{Author, Comment, Tutorial};
use parking_lot::RwLock;
use tracing::debug;

use crate::error::AppError;

/// How `create` fills in the id of a new record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IdPolicy {
    /// Leave the id at zero.
    #[default]
    Unassigned,
    /// Use one past the largest id currently stored.
    Sequential,
}

#[derive(Clone, Debug, Default)]
pub struct TutorialStore {
    tutorials: Arc<RwLock<Vec<Tutorial>>>,
    id_policy: IdPolicy,
}

impl TutorialStore {
    pub fn new(tutorials: Vec<Tutorial>, id_policy: IdPolicy) -> Self {
        Self {
            tutorials: Arc::new(RwLock::new(tutorials)),
            id_policy,
        }
    }

    /// A store populated with [`seed_tutorials`].
    pub fn seeded(id_policy: IdPolicy) -> Self {
        Self::new(seed_tutorials(), id_policy)
    }

    pub fn id_policy(&self) -> IdPolicy {
        self.id_policy
    }

    /// First tutorial in store order whose id matches.
    pub fn get_by_id(&self, id: i32) -> Option<Tutorial> {
        self.tutorials.read().iter().find(|t| t.id == id).cloned()
    }

    pub fn list_all(&self) -> Vec<Tutorial> {
        self.tutorials.read().clone()
    }

    /// Appends a tutorial carrying only `title` and returns it.
    pub fn create(&self, title: String) -> Result<Tutorial, AppError> {
        let mut tutorials = self.tutorials.write();
        let mut tutorial = Tutorial::titled(title);
        if self.id_policy == IdPolicy::Sequential {
            let last = tutorials.iter().map(|t| t.id).max().unwrap_or(0);
            tutorial.id = last
                .checked_add(1)
                .ok_or(AppError::IdSpaceExhausted { last })?;
        }
        tutorials.push(tutorial.clone());
        debug!(id = tutorial.id, title = %tutorial.title, len = tutorials.len(), "tutorial created");
        Ok(tutorial)
    }

    pub fn len(&self) -> usize {
        self.tutorials.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tutorials.read().is_empty()
    }
}

/// The records present at start-up. Both tutorials carry a copy of the same
/// author value.
pub fn seed_tutorials() -> Vec<Tutorial> {
    let author = Author::new("Kevin Terah", vec![1, 2]);
    vec![
        Tutorial {
            id: 1,
            title: "Environmental Hygiene".to_string(),
            author: author.clone(),
            comments: vec![Comment::new("Climate change is ...")],
        },
        Tutorial {
            id: 2,
            title: "Environmental Cost".to_string(),
            author,
            comments: vec![Comment::new("Weather is good ...")],
        },
    ]
}
