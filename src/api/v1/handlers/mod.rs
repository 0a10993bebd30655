pub mod courses;
pub mod health;
pub mod users;
