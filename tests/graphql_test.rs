//! Integration tests for the GraphQL API.
//!
//! These tests drive the real schema (resolvers, services, event bus)
//! over in-memory repository implementations, without requiring a
//! database connection.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use movie_platform::api::graphql::{build_schema, AppSchema, CurrentUser};
use movie_platform::domain::{
    mean_rating, Favorite, Genre, Movie, MovieChanges, NewMovie, NewReview, Review, User, UserRole,
};
use movie_platform::errors::{AppError, AppResult};
use movie_platform::events::EventBus;
use movie_platform::infra::{
    FavoriteRepository, GenreRepository, MovieRepository, ReviewRepository, UserRepository,
};
use movie_platform::services::{
    Authenticator, FavoriteManager, GenreManager, MovieManager, ReviewManager, Services,
};
use movie_platform::Config;

// =============================================================================
// In-memory repositories
// =============================================================================

#[derive(Default)]
struct Store {
    users: Vec<User>,
    genres: Vec<Genre>,
    movies: Vec<Movie>,
    reviews: Vec<Review>,
    favorites: Vec<Favorite>,
}

type Shared = Arc<Mutex<Store>>;

struct InMemoryUsers(Shared);

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.0.lock().unwrap().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn create(
        &self,
        email: String,
        password_hash: String,
        name: String,
        role: UserRole,
    ) -> AppResult<User> {
        let mut store = self.0.lock().unwrap();
        if store.users.iter().any(|u| u.email == email) {
            return Err(AppError::conflict("User"));
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email,
            password_hash,
            name,
            avatar: None,
            role,
            created_at: now,
            updated_at: now,
        };
        store.users.push(user.clone());
        Ok(user)
    }
}

struct InMemoryGenres(Shared);

#[async_trait]
impl GenreRepository for InMemoryGenres {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Genre>> {
        Ok(self.0.lock().unwrap().genres.iter().find(|g| g.id == id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Genre>> {
        let mut genres = self.0.lock().unwrap().genres.clone();
        genres.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(genres)
    }

    async fn create(&self, name: String, description: String) -> AppResult<Genre> {
        let mut store = self.0.lock().unwrap();
        if store.genres.iter().any(|g| g.name == name) {
            return Err(AppError::conflict("Genre"));
        }
        let now = Utc::now();
        let genre = Genre {
            id: Uuid::new_v4(),
            name,
            description,
            created_at: now,
            updated_at: now,
        };
        store.genres.push(genre.clone());
        Ok(genre)
    }
}

struct InMemoryMovies(Shared);

#[async_trait]
impl MovieRepository for InMemoryMovies {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Movie>> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .movies
            .iter()
            .find(|m| m.id == id && m.is_active())
            .cloned())
    }

    async fn find_by_id_with_deleted(&self, id: Uuid) -> AppResult<Option<Movie>> {
        Ok(self.0.lock().unwrap().movies.iter().find(|m| m.id == id).cloned())
    }

    async fn list(
        &self,
        genre_id: Option<Uuid>,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<Movie>> {
        let mut movies: Vec<Movie> = self
            .0
            .lock()
            .unwrap()
            .movies
            .iter()
            .filter(|m| m.is_active())
            .filter(|m| genre_id.map_or(true, |g| m.genre_id == g))
            .cloned()
            .collect();
        movies.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(movies
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn find_by_genre(&self, genre_id: Uuid) -> AppResult<Vec<Movie>> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .movies
            .iter()
            .filter(|m| m.is_active() && m.genre_id == genre_id)
            .cloned()
            .collect())
    }

    async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Movie>> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .movies
            .iter()
            .filter(|m| m.is_active() && ids.contains(&m.id))
            .cloned()
            .collect())
    }

    async fn search(&self, query: &str) -> AppResult<Vec<Movie>> {
        let needle = query.to_lowercase();
        Ok(self
            .0
            .lock()
            .unwrap()
            .movies
            .iter()
            .filter(|m| m.is_active())
            .filter(|m| {
                m.title.to_lowercase().contains(&needle)
                    || m.description.to_lowercase().contains(&needle)
                    || m.director.to_lowercase().contains(&needle)
            })
            .take(20)
            .cloned()
            .collect())
    }

    async fn create(&self, new: NewMovie) -> AppResult<Movie> {
        let now = Utc::now();
        let movie = Movie {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            genre_id: new.genre_id,
            year: new.year,
            director: new.director,
            duration: new.duration,
            poster: new.poster,
            trailer_url: new.trailer_url,
            rating: 0.0,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.0.lock().unwrap().movies.push(movie.clone());
        Ok(movie)
    }

    async fn update(&self, id: Uuid, changes: MovieChanges) -> AppResult<Movie> {
        let mut store = self.0.lock().unwrap();
        let movie = store
            .movies
            .iter_mut()
            .find(|m| m.id == id && m.is_active())
            .ok_or(AppError::NotFound("Movie"))?;

        if let Some(title) = changes.title {
            movie.title = title;
        }
        if let Some(description) = changes.description {
            movie.description = description;
        }
        if let Some(genre_id) = changes.genre_id {
            movie.genre_id = genre_id;
        }
        if let Some(year) = changes.year {
            movie.year = year;
        }
        if let Some(director) = changes.director {
            movie.director = director;
        }
        if let Some(duration) = changes.duration {
            movie.duration = duration;
        }
        if let Some(poster) = changes.poster {
            movie.poster = poster;
        }
        if let Some(trailer_url) = changes.trailer_url {
            movie.trailer_url = trailer_url;
        }
        movie.updated_at = Utc::now();
        Ok(movie.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut store = self.0.lock().unwrap();
        let movie = store
            .movies
            .iter_mut()
            .find(|m| m.id == id && m.is_active())
            .ok_or(AppError::NotFound("Movie"))?;
        movie.deleted_at = Some(Utc::now());
        Ok(())
    }
}

struct InMemoryReviews(Shared);

impl InMemoryReviews {
    /// Mirror of the production store's invariant: every review write
    /// recomputes the parent movie's mean rating.
    fn recompute_rating(store: &mut Store, movie_id: Uuid) {
        let reviews: Vec<Review> = store
            .reviews
            .iter()
            .filter(|r| r.movie_id == movie_id)
            .cloned()
            .collect();
        let rating = mean_rating(&reviews);
        if let Some(movie) = store.movies.iter_mut().find(|m| m.id == movie_id) {
            movie.rating = rating;
        }
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviews {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Review>> {
        Ok(self.0.lock().unwrap().reviews.iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_movie(&self, movie_id: Uuid) -> AppResult<Vec<Review>> {
        let mut reviews: Vec<Review> = self
            .0
            .lock()
            .unwrap()
            .reviews
            .iter()
            .filter(|r| r.movie_id == movie_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }

    async fn find_by_movie_and_user(
        &self,
        movie_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<Review>> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .reviews
            .iter()
            .find(|r| r.movie_id == movie_id && r.user_id == user_id)
            .cloned())
    }

    async fn create(&self, user_id: Uuid, new: NewReview) -> AppResult<Review> {
        let mut store = self.0.lock().unwrap();
        if store
            .reviews
            .iter()
            .any(|r| r.movie_id == new.movie_id && r.user_id == user_id)
        {
            return Err(AppError::conflict("Review"));
        }
        let now = Utc::now();
        let review = Review {
            id: Uuid::new_v4(),
            movie_id: new.movie_id,
            user_id,
            rating: new.rating,
            comment: new.comment,
            created_at: now,
            updated_at: now,
        };
        store.reviews.push(review.clone());
        Self::recompute_rating(&mut store, review.movie_id);
        Ok(review)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let mut store = self.0.lock().unwrap();
        let index = store
            .reviews
            .iter()
            .position(|r| r.id == id)
            .ok_or(AppError::NotFound("Review"))?;
        let review = store.reviews.remove(index);
        Self::recompute_rating(&mut store, review.movie_id);
        Ok(())
    }
}

struct InMemoryFavorites(Shared);

#[async_trait]
impl FavoriteRepository for InMemoryFavorites {
    async fn find(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<Option<Favorite>> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .favorites
            .iter()
            .find(|f| f.user_id == user_id && f.movie_id == movie_id)
            .cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Favorite>> {
        let mut favorites: Vec<Favorite> = self
            .0
            .lock()
            .unwrap()
            .favorites
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect();
        favorites.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(favorites)
    }

    async fn create(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<Favorite> {
        let mut store = self.0.lock().unwrap();
        let now = Utc::now();
        let favorite = Favorite {
            id: Uuid::new_v4(),
            user_id,
            movie_id,
            created_at: now,
            updated_at: now,
        };
        store.favorites.push(favorite.clone());
        Ok(favorite)
    }

    async fn delete(&self, user_id: Uuid, movie_id: Uuid) -> AppResult<()> {
        self.0
            .lock()
            .unwrap()
            .favorites
            .retain(|f| !(f.user_id == user_id && f.movie_id == movie_id));
        Ok(())
    }
}

// =============================================================================
// Test harness
// =============================================================================

struct TestApp {
    schema: AppSchema,
    store: Shared,
}

impl TestApp {
    fn new() -> Self {
        let store: Shared = Arc::new(Mutex::new(Store::default()));
        let events = Arc::new(EventBus::default());
        let config = Config::for_tests("test-secret-key-for-testing-only-32chars");

        let users = Arc::new(InMemoryUsers(store.clone()));
        let genres = Arc::new(InMemoryGenres(store.clone()));
        let movies = Arc::new(InMemoryMovies(store.clone()));
        let reviews = Arc::new(InMemoryReviews(store.clone()));
        let favorites = Arc::new(InMemoryFavorites(store.clone()));

        let services = Arc::new(Services::new(
            Arc::new(Authenticator::new(users, config)),
            Arc::new(MovieManager::new(
                movies.clone(),
                genres.clone(),
                events.clone(),
            )),
            Arc::new(GenreManager::new(genres)),
            Arc::new(ReviewManager::new(reviews, movies.clone(), events.clone())),
            Arc::new(FavoriteManager::new(favorites, movies)),
        ));

        let schema = build_schema(services, events);
        Self { schema, store }
    }

    /// Insert a user directly and return their request identity
    fn seed_user(&self, email: &str, role: UserRole) -> CurrentUser {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: "unused".to_string(),
            name: "Seeded".to_string(),
            avatar: None,
            role,
            created_at: now,
            updated_at: now,
        };
        self.store.lock().unwrap().users.push(user.clone());
        CurrentUser {
            id: user.id,
            email: user.email,
            role,
        }
    }

    fn seed_genre(&self, name: &str) -> Uuid {
        let now = Utc::now();
        let genre = Genre {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: "Seeded genre description".to_string(),
            created_at: now,
            updated_at: now,
        };
        self.store.lock().unwrap().genres.push(genre.clone());
        genre.id
    }

    async fn execute(&self, query: &str) -> async_graphql::Response {
        self.schema.execute(query).await
    }

    async fn execute_as(&self, user: &CurrentUser, query: &str) -> async_graphql::Response {
        let request = async_graphql::Request::new(query).data(user.clone());
        self.schema.execute(request).await
    }
}

fn data(response: &async_graphql::Response) -> serde_json::Value {
    assert!(
        response.errors.is_empty(),
        "unexpected errors: {:?}",
        response.errors
    );
    response.data.clone().into_json().unwrap()
}

fn error_code(response: &async_graphql::Response) -> String {
    let error = serde_json::to_value(&response.errors[0]).unwrap();
    error["extensions"]["code"].as_str().unwrap().to_string()
}

fn create_movie_mutation(genre_id: Uuid, title: &str) -> String {
    format!(
        r#"mutation {{
            createMovie(input: {{
                title: "{title}"
                description: "A test movie with a long enough description"
                genreId: "{genre_id}"
                year: 2020
                director: "Test Director"
                duration: 120
                poster: "https://example.com/poster.jpg"
            }}) {{ id title rating genre {{ name }} }}
        }}"#
    )
}

fn create_review_mutation(movie_id: &str, rating: i32) -> String {
    format!(
        r#"mutation {{
            createReview(input: {{
                movieId: "{movie_id}"
                rating: {rating}
                comment: "A perfectly valid comment"
            }}) {{ id rating }}
        }}"#
    )
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn rating_follows_review_lifecycle() {
    let app = TestApp::new();
    let admin = app.seed_user("admin@test.com", UserRole::Admin);
    let alice = app.seed_user("alice@test.com", UserRole::User);
    let bob = app.seed_user("bob@test.com", UserRole::User);
    let genre_id = app.seed_genre("Action");

    // Admin creates the movie; rating starts at zero
    let response = app
        .execute_as(&admin, &create_movie_mutation(genre_id, "Mad Max"))
        .await;
    let created = data(&response);
    assert_eq!(created["createMovie"]["rating"], 0.0);
    assert_eq!(created["createMovie"]["genre"]["name"], "Action");
    let movie_id = created["createMovie"]["id"].as_str().unwrap().to_string();

    // First review sets the mean outright
    let response = app
        .execute_as(&alice, &create_review_mutation(&movie_id, 8))
        .await;
    let review_id = data(&response)["createReview"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let movie_query = format!(r#"{{ movie(id: "{movie_id}") {{ rating }} }}"#);
    let response = app.execute(&movie_query).await;
    assert_eq!(data(&response)["movie"]["rating"], 8.0);

    // Second reviewer pulls the mean to 6
    let response = app
        .execute_as(&bob, &create_review_mutation(&movie_id, 4))
        .await;
    data(&response);

    let response = app.execute(&movie_query).await;
    assert_eq!(data(&response)["movie"]["rating"], 6.0);

    // Deleting the first review leaves only the 4
    let delete = format!(r#"mutation {{ deleteReview(id: "{review_id}") }}"#);
    let response = app.execute_as(&alice, &delete).await;
    assert_eq!(data(&response)["deleteReview"], true);

    let response = app.execute(&movie_query).await;
    assert_eq!(data(&response)["movie"]["rating"], 4.0);
}

#[tokio::test]
async fn one_review_per_user_per_movie() {
    let app = TestApp::new();
    let admin = app.seed_user("admin@test.com", UserRole::Admin);
    let alice = app.seed_user("alice@test.com", UserRole::User);
    let genre_id = app.seed_genre("Drama");

    let response = app
        .execute_as(&admin, &create_movie_mutation(genre_id, "Heat"))
        .await;
    let movie_id = data(&response)["createMovie"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .execute_as(&alice, &create_review_mutation(&movie_id, 7))
        .await;
    data(&response);

    let response = app
        .execute_as(&alice, &create_review_mutation(&movie_id, 9))
        .await;
    assert_eq!(error_code(&response), "BAD_USER_INPUT");
    assert_eq!(
        response.errors[0].message,
        "You have already reviewed this movie"
    );
}

#[tokio::test]
async fn catalog_mutations_are_admin_only() {
    let app = TestApp::new();
    let user = app.seed_user("user@test.com", UserRole::User);
    let genre_id = app.seed_genre("Horror");

    // Authenticated non-admin is forbidden
    let response = app
        .execute_as(&user, &create_movie_mutation(genre_id, "It"))
        .await;
    assert_eq!(error_code(&response), "FORBIDDEN");

    // Anonymous caller is unauthenticated
    let response = app.execute(&create_movie_mutation(genre_id, "It")).await;
    assert_eq!(error_code(&response), "UNAUTHENTICATED");
}

#[tokio::test]
async fn reviews_require_authentication() {
    let app = TestApp::new();
    let admin = app.seed_user("admin@test.com", UserRole::Admin);
    let genre_id = app.seed_genre("Action");

    let response = app
        .execute_as(&admin, &create_movie_mutation(genre_id, "Speed"))
        .await;
    let movie_id = data(&response)["createMovie"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app.execute(&create_review_mutation(&movie_id, 8)).await;
    assert_eq!(error_code(&response), "UNAUTHENTICATED");
}

#[tokio::test]
async fn review_deletion_is_author_or_admin() {
    let app = TestApp::new();
    let admin = app.seed_user("admin@test.com", UserRole::Admin);
    let alice = app.seed_user("alice@test.com", UserRole::User);
    let mallory = app.seed_user("mallory@test.com", UserRole::User);
    let genre_id = app.seed_genre("Action");

    let response = app
        .execute_as(&admin, &create_movie_mutation(genre_id, "Alien"))
        .await;
    let movie_id = data(&response)["createMovie"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .execute_as(&alice, &create_review_mutation(&movie_id, 9))
        .await;
    let review_id = data(&response)["createReview"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let delete = format!(r#"mutation {{ deleteReview(id: "{review_id}") }}"#);

    // A different non-admin user cannot delete it
    let response = app.execute_as(&mallory, &delete).await;
    assert_eq!(error_code(&response), "FORBIDDEN");

    // An admin can
    let response = app.execute_as(&admin, &delete).await;
    assert_eq!(data(&response)["deleteReview"], true);
}

#[tokio::test]
async fn soft_deleted_movie_leaves_listings_but_keeps_reviews() {
    let app = TestApp::new();
    let admin = app.seed_user("admin@test.com", UserRole::Admin);
    let alice = app.seed_user("alice@test.com", UserRole::User);
    let genre_id = app.seed_genre("Sci-Fi");

    let response = app
        .execute_as(&admin, &create_movie_mutation(genre_id, "Solaris"))
        .await;
    let movie_id = data(&response)["createMovie"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .execute_as(&alice, &create_review_mutation(&movie_id, 10))
        .await;
    data(&response);

    let delete = format!(r#"mutation {{ deleteMovie(id: "{movie_id}") }}"#);
    let response = app.execute_as(&admin, &delete).await;
    assert_eq!(data(&response)["deleteMovie"], true);

    // Gone from browse, search and genre listings
    let response = app.execute("{ movies { id } }").await;
    assert_eq!(data(&response)["movies"].as_array().unwrap().len(), 0);

    let response = app.execute(r#"{ searchMovies(query: "solaris") { id } }"#).await;
    assert_eq!(data(&response)["searchMovies"].as_array().unwrap().len(), 0);

    let response = app.execute("{ genres { movies { id } } }").await;
    assert_eq!(
        data(&response)["genres"][0]["movies"].as_array().unwrap().len(),
        0
    );

    // Direct lookup is a NOT_FOUND
    let response = app
        .execute(&format!(r#"{{ movie(id: "{movie_id}") {{ id }} }}"#))
        .await;
    assert_eq!(error_code(&response), "NOT_FOUND");

    // But its reviews remain queryable, movie snapshot included
    let response = app
        .execute(&format!(
            r#"{{ reviews(movieId: "{movie_id}") {{ rating movie {{ title }} }} }}"#
        ))
        .await;
    let reviews = data(&response);
    assert_eq!(reviews["reviews"].as_array().unwrap().len(), 1);
    assert_eq!(reviews["reviews"][0]["movie"]["title"], "Solaris");
}

#[tokio::test]
async fn favorites_are_idempotent_and_hide_deleted_movies() {
    let app = TestApp::new();
    let admin = app.seed_user("admin@test.com", UserRole::Admin);
    let alice = app.seed_user("alice@test.com", UserRole::User);
    let genre_id = app.seed_genre("Action");

    let response = app
        .execute_as(&admin, &create_movie_mutation(genre_id, "Ronin"))
        .await;
    let movie_id = data(&response)["createMovie"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let add = format!(r#"mutation {{ addToFavorites(movieId: "{movie_id}") }}"#);

    // Adding twice succeeds and stores a single entry
    let response = app.execute_as(&alice, &add).await;
    assert_eq!(data(&response)["addToFavorites"], true);
    let response = app.execute_as(&alice, &add).await;
    assert_eq!(data(&response)["addToFavorites"], true);

    let response = app.execute_as(&alice, "{ favorites { id } }").await;
    assert_eq!(data(&response)["favorites"].as_array().unwrap().len(), 1);

    let is_favorite = format!(r#"{{ isFavorite(movieId: "{movie_id}") }}"#);
    let response = app.execute_as(&alice, &is_favorite).await;
    assert_eq!(data(&response)["isFavorite"], true);

    // Anonymous callers just get false
    let response = app.execute(&is_favorite).await;
    assert_eq!(data(&response)["isFavorite"], false);

    // Soft-deleting the movie hides it from the favorites listing
    let delete = format!(r#"mutation {{ deleteMovie(id: "{movie_id}") }}"#);
    data(&app.execute_as(&admin, &delete).await);

    let response = app.execute_as(&alice, "{ favorites { id } }").await;
    assert_eq!(data(&response)["favorites"].as_array().unwrap().len(), 0);

    // Removing a favorite is idempotent too
    let remove = format!(r#"mutation {{ removeFromFavorites(movieId: "{movie_id}") }}"#);
    let response = app.execute_as(&alice, &remove).await;
    assert_eq!(data(&response)["removeFromFavorites"], true);
    let response = app.execute_as(&alice, &remove).await;
    assert_eq!(data(&response)["removeFromFavorites"], true);
}

#[tokio::test]
async fn search_is_case_insensitive_substring() {
    let app = TestApp::new();
    let admin = app.seed_user("admin@test.com", UserRole::Admin);
    let genre_id = app.seed_genre("Sci-Fi");

    for title in ["The Matrix", "Matrix Reloaded", "Blade Runner"] {
        data(&app
            .execute_as(&admin, &create_movie_mutation(genre_id, title))
            .await);
    }

    let response = app.execute(r#"{ searchMovies(query: "mAtRiX") { title } }"#).await;
    assert_eq!(data(&response)["searchMovies"].as_array().unwrap().len(), 2);

    // Director substring matches as well
    let response = app
        .execute(r#"{ searchMovies(query: "test director") { title } }"#)
        .await;
    assert_eq!(data(&response)["searchMovies"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn register_login_me_roundtrip() {
    let app = TestApp::new();

    let register = r#"mutation {
        register(input: {
            email: "new@example.com"
            password: "secret123"
            name: "Newcomer"
        }) { token user { email role } }
    }"#;
    let response = app.execute(register).await;
    let payload = data(&response);
    assert_eq!(payload["register"]["user"]["email"], "new@example.com");
    assert_eq!(payload["register"]["user"]["role"], "User");
    assert!(!payload["register"]["token"].as_str().unwrap().is_empty());

    // Registering the same email again is a conflict
    let response = app.execute(register).await;
    assert_eq!(error_code(&response), "BAD_USER_INPUT");

    // Wrong password is rejected without leaking which part failed
    let bad_login = r#"mutation {
        login(input: { email: "new@example.com", password: "wrong-password" }) { token }
    }"#;
    let response = app.execute(bad_login).await;
    assert_eq!(error_code(&response), "UNAUTHENTICATED");
    assert_eq!(response.errors[0].message, "Invalid credentials");

    let login = r#"mutation {
        login(input: { email: "new@example.com", password: "secret123" }) {
            token user { id }
        }
    }"#;
    let response = app.execute(login).await;
    let payload = data(&response);
    let user_id = payload["login"]["user"]["id"].as_str().unwrap();

    // `me` resolves for an authenticated context
    let me_user = CurrentUser {
        id: Uuid::parse_str(user_id).unwrap(),
        email: "new@example.com".to_string(),
        role: UserRole::User,
    };
    let response = app.execute_as(&me_user, "{ me { email } }").await;
    assert_eq!(data(&response)["me"]["email"], "new@example.com");

    // Anonymous `me` is unauthenticated
    let response = app.execute("{ me { email } }").await;
    assert_eq!(error_code(&response), "UNAUTHENTICATED");
}

#[tokio::test]
async fn invalid_input_is_rejected_before_any_write() {
    let app = TestApp::new();
    let admin = app.seed_user("admin@test.com", UserRole::Admin);
    let genre_id = app.seed_genre("Action");

    // Year before 1900 fails validation
    let mutation = format!(
        r#"mutation {{
            createMovie(input: {{
                title: "Too Old"
                description: "A test movie with a long enough description"
                genreId: "{genre_id}"
                year: 1850
                director: "Test Director"
                duration: 120
                poster: "https://example.com/poster.jpg"
            }}) {{ id }}
        }}"#
    );
    let response = app.execute_as(&admin, &mutation).await;
    assert_eq!(error_code(&response), "BAD_USER_INPUT");

    // Nothing was persisted
    let response = app.execute("{ movies { id } }").await;
    assert_eq!(data(&response)["movies"].as_array().unwrap().len(), 0);

    // Unknown genre reference is NOT_FOUND
    let response = app
        .execute_as(&admin, &create_movie_mutation(Uuid::new_v4(), "No Genre"))
        .await;
    assert_eq!(error_code(&response), "NOT_FOUND");

    // Malformed IDs are rejected as bad input
    let response = app.execute(r#"{ movie(id: "not-a-uuid") { id } }"#).await;
    assert_eq!(error_code(&response), "BAD_USER_INPUT");
}

#[tokio::test]
async fn movie_list_filters_by_genre_and_paginates() {
    let app = TestApp::new();
    let admin = app.seed_user("admin@test.com", UserRole::Admin);
    let action = app.seed_genre("Action");
    let drama = app.seed_genre("Drama");

    data(&app.execute_as(&admin, &create_movie_mutation(action, "Action One")).await);
    data(&app.execute_as(&admin, &create_movie_mutation(action, "Action Two")).await);
    data(&app.execute_as(&admin, &create_movie_mutation(drama, "Drama One")).await);

    let response = app
        .execute(&format!(r#"{{ movies(genreId: "{action}") {{ title }} }}"#))
        .await;
    assert_eq!(data(&response)["movies"].as_array().unwrap().len(), 2);

    let response = app.execute("{ movies(limit: 2) { title } }").await;
    assert_eq!(data(&response)["movies"].as_array().unwrap().len(), 2);

    let response = app.execute("{ movies(limit: 2, offset: 2) { title } }").await;
    assert_eq!(data(&response)["movies"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn subscriptions_deliver_snapshots_to_live_subscribers() {
    use futures::StreamExt;
    use std::time::Duration;

    let app = TestApp::new();
    let admin = app.seed_user("admin@test.com", UserRole::Admin);
    let genre_id = app.seed_genre("Action");

    let mut stream = app
        .schema
        .execute_stream("subscription { movieAdded { title rating } }");

    // Let the subscription attach before publishing
    let first = tokio::spawn(async move { stream.next().await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    data(&app
        .execute_as(&admin, &create_movie_mutation(genre_id, "Broadcast Me"))
        .await);

    let response = tokio::time::timeout(Duration::from_secs(5), first)
        .await
        .expect("subscription delivery timed out")
        .unwrap()
        .expect("subscription stream ended");

    let payload = data(&response);
    assert_eq!(payload["movieAdded"]["title"], "Broadcast Me");
    assert_eq!(payload["movieAdded"]["rating"], 0.0);
}

#[tokio::test]
async fn review_subscription_is_filtered_by_movie() {
    use futures::StreamExt;
    use std::time::Duration;

    let app = TestApp::new();
    let admin = app.seed_user("admin@test.com", UserRole::Admin);
    let alice = app.seed_user("alice@test.com", UserRole::User);
    let bob = app.seed_user("bob@test.com", UserRole::User);
    let genre_id = app.seed_genre("Action");

    let watched = data(&app
        .execute_as(&admin, &create_movie_mutation(genre_id, "Watched"))
        .await)["createMovie"]["id"]
        .as_str()
        .unwrap()
        .to_string();
    let other = data(&app
        .execute_as(&admin, &create_movie_mutation(genre_id, "Other"))
        .await)["createMovie"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let subscription = format!(
        r#"subscription {{ reviewAdded(movieId: "{watched}") {{ rating movieId }} }}"#
    );
    let mut stream = app.schema.execute_stream(&*subscription);
    let first = tokio::spawn(async move { stream.next().await });
    tokio::time::sleep(Duration::from_millis(50)).await;

    // A review for a different movie must not be delivered
    data(&app.execute_as(&bob, &create_review_mutation(&other, 3)).await);
    data(&app
        .execute_as(&alice, &create_review_mutation(&watched, 9))
        .await);

    let response = tokio::time::timeout(Duration::from_secs(5), first)
        .await
        .expect("subscription delivery timed out")
        .unwrap()
        .expect("subscription stream ended");

    let payload = data(&response);
    assert_eq!(payload["reviewAdded"]["rating"], 9);
    assert_eq!(payload["reviewAdded"]["movieId"], watched);
}
