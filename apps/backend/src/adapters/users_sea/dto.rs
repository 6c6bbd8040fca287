//! DTOs for users_sea adapter.

/// DTO for inserting a user row. `password_hash` is already hashed.
#[derive(Clone)]
pub struct UserCreate {
    pub sub: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl UserCreate {
    pub fn new(
        sub: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            sub: sub.into(),
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
        }
    }
}
