//! Domain entities - the core business objects.

mod category;
mod comment;
mod fields;
mod location;
mod post;
mod user;

pub use category::Category;
pub use comment::{Comment, CommentView};
pub use fields::{Creation, Publication};
pub use location::Location;
pub use post::{Post, PostSummary};
pub use user::{AuthorRef, User};
