use crate::models::TmdbMovie;

/// Fixed sample catalog used whenever the upstream provider is unconfigured
/// or failing
///
/// Built once at startup and injected read-only into the services that need
/// it; handlers never carry their own copies of this data.
pub struct FallbackCatalog {
    movies: Vec<TmdbMovie>,
}

impl FallbackCatalog {
    /// The built-in five-title catalog
    pub fn builtin() -> Self {
        let movies = vec![
            sample(
                1,
                "The Shawshank Redemption",
                "Two imprisoned men bond over a number of years, finding solace and eventual redemption through acts of common decency.",
                "/q6y0Go1tsGEsmtFryDOJo3dEmqu.jpg",
                "/kXfqcdQKsToO0OUXHcrrNCHDBzO.jpg",
                "1994-09-22",
                9.3,
                24000,
                &["Drama", "Crime"],
            ),
            sample(
                2,
                "The Godfather",
                "The aging patriarch of an organized crime dynasty transfers control of his clandestine empire to his reluctant son.",
                "/3bhkrj58Vtu7enYsRolD1fZdja1.jpg",
                "/tmU7GeKVybMWFButWEGl2M4GeiP.jpg",
                "1972-03-14",
                9.2,
                18000,
                &["Drama", "Crime"],
            ),
            sample(
                3,
                "The Dark Knight",
                "When the menace known as the Joker wreaks havoc and chaos on the people of Gotham, Batman must accept one of the greatest psychological and physical tests of his ability to fight injustice.",
                "/qJ2tW6WMUDux911r6m7haRef0WH.jpg",
                "/hkBaDkMWbLaf8B1lsWsKX7Ew3Xq.jpg",
                "2008-07-18",
                9.0,
                27000,
                &["Action", "Crime", "Drama"],
            ),
            sample(
                4,
                "Pulp Fiction",
                "The lives of two mob hitmen, a boxer, a gangster and his wife, and a pair of diner bandits intertwine in four tales of violence and redemption.",
                "/d5iIlFn5s0ImszYzBPb8JPIfbXD.jpg",
                "/suaEOtk1N1sgg2QM528GluxMcOt.jpg",
                "1994-10-14",
                8.9,
                20000,
                &["Crime", "Drama"],
            ),
            sample(
                5,
                "Fight Club",
                "An insomniac office worker and a devil-may-care soapmaker form an underground fight club that evolves into something much, much more.",
                "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg",
                "/52AfXWuXCHn3UjD17rBruA9f5qb.jpg",
                "1999-10-15",
                8.8,
                22000,
                &["Drama"],
            ),
        ];

        Self { movies }
    }

    pub fn movies(&self) -> &[TmdbMovie] {
        &self.movies
    }

    /// Catalog entry with the given external id
    pub fn movie(&self, tmdb_id: i64) -> Option<&TmdbMovie> {
        self.movies.iter().find(|m| m.id == tmdb_id)
    }

    /// Entry served when a requested id has no catalog match
    pub fn first(&self) -> &TmdbMovie {
        &self.movies[0]
    }

    /// Every catalog entry except the given id, used as a stand-in
    /// similar-titles list
    pub fn similar_to(&self, tmdb_id: i64) -> Vec<TmdbMovie> {
        self.movies
            .iter()
            .filter(|m| m.id != tmdb_id)
            .cloned()
            .collect()
    }
}

fn sample(
    id: i64,
    title: &str,
    overview: &str,
    poster: &str,
    backdrop: &str,
    release_date: &str,
    vote_average: f64,
    vote_count: i64,
    genres: &[&str],
) -> TmdbMovie {
    TmdbMovie {
        id,
        title: title.to_string(),
        overview: overview.to_string(),
        poster_path: Some(poster.to_string()),
        backdrop_path: Some(backdrop.to_string()),
        release_date: Some(release_date.to_string()),
        vote_average: Some(vote_average),
        vote_count: Some(vote_count),
        popularity: None,
        genre_ids: vec![],
        genres: genres.iter().map(|g| g.to_string()).collect(),
    }
}
