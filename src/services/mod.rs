//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on repository traits for
//! dependency inversion; mutation services publish catalog events.

mod auth_service;
mod container;
mod favorite_service;
mod genre_service;
mod movie_service;
mod review_service;

// Service Container
pub use container::Services;

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use favorite_service::{FavoriteManager, FavoriteService};
pub use genre_service::{GenreManager, GenreService};
pub use movie_service::{MovieManager, MovieService};
pub use review_service::{ReviewManager, ReviewService};
