use serde::{Deserialize, Serialize};

use super::NewMovie;

/// A search hit from the remote movie directory (TMDb), in its snake_case shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryMovie {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// Envelope returned by `search/movie`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectorySearchResponse {
    #[serde(default)]
    pub results: Vec<DirectoryMovie>,
}

impl From<DirectoryMovie> for NewMovie {
    fn from(movie: DirectoryMovie) -> Self {
        NewMovie {
            title: movie.title,
            release_date: movie.release_date,
            overview: movie.overview,
            poster_path: movie.poster_path,
            watched: Some(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_deserialization() {
        let json = r#"{
            "page": 1,
            "results": [{
                "id": 438631,
                "title": "Dune",
                "release_date": "2021-09-15",
                "overview": "Paul Atreides...",
                "poster_path": "/d5NXSklXo0qyIYkgV94XAgMIckC.jpg",
                "vote_average": 7.8
            }],
            "total_results": 1
        }"#;

        let response: DirectorySearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].title, "Dune");
        assert_eq!(response.results[0].release_date.as_deref(), Some("2021-09-15"));
    }

    #[test]
    fn test_directory_movie_to_new_movie() {
        let movie = DirectoryMovie {
            title: "Nope".to_string(),
            release_date: Some("2022-07-20".to_string()),
            overview: None,
            poster_path: Some("/nope.jpg".to_string()),
        };

        let new_movie = NewMovie::from(movie);
        assert_eq!(new_movie.title, "Nope");
        assert_eq!(new_movie.release_date.as_deref(), Some("2022-07-20"));
        assert_eq!(new_movie.overview, None);
        assert_eq!(new_movie.poster_path.as_deref(), Some("/nope.jpg"));
        assert_eq!(new_movie.watched, Some(false));

        let body = serde_json::to_value(&new_movie).unwrap();
        assert_eq!(body["posterPath"], "/nope.jpg");
        assert_eq!(body["releaseDate"], "2022-07-20");
    }
}
