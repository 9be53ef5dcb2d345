pub mod directory;
pub mod movie;
pub mod view;

pub use directory::{DirectoryMovie, DirectorySearchResponse};
pub use movie::{Movie, MovieId, NewMovie};
pub use view::{FilterMode, ViewDriver};
