pub mod movie;
pub mod tmdb;
pub mod user;

pub use movie::{CastMember, MovieDetail, MovieRecord};
pub use tmdb::{
    MovieExtras, MovieList, TmdbCastMember, TmdbCredits, TmdbCrewMember, TmdbGenre, TmdbMovie,
    TmdbMovieDetails, Video, VideoList,
};
pub use user::{Rating, UserProfile, UserRecord};
