pub use super::author::Author;
pub use super::comment::Comment;
pub use super::tutorial::Tutorial;
