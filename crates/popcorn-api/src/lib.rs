pub mod error;
pub mod omdb;
pub mod traits;

pub use error::ApiError;
pub use traits::{MovieDetail, MovieService, MovieSummary};
