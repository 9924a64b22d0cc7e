pub mod catalog;
pub mod movies;
pub mod providers;
pub mod recommendations;
pub mod users;

pub use catalog::FallbackCatalog;
pub use movies::MovieLookup;
pub use providers::{MetadataProvider, TmdbProvider};
pub use recommendations::{BecauseYouWatched, RecommendationKind, Recommendations, Recommender};
pub use users::AccountService;
