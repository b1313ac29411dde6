//! Plain data records backing the tutorials schema.
//!
//! Every record is owned by value: a [`Tutorial`] embeds its [`Author`] and
//! its [`Comment`]s rather than referencing them.

pub mod author;
pub mod comment;
pub mod prelude;
pub mod tutorial;
