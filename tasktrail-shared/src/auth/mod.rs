/// Authentication and authorization primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Session token signing and validation
/// - [`policy`]: Role gates evaluated against an explicit [`policy::Actor`]
///
/// # Example
///
/// ```no_run
/// use tasktrail_shared::auth::password::{hash_password, verify_password};
/// use tasktrail_shared::auth::jwt::{create_token, Claims};
/// use tasktrail_shared::models::user::Role;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4(), "user@example.com", Role::Viewer, Uuid::new_v4());
/// let token = create_token(&claims, "secret-key-with-at-least-32-bytes!")?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod password;
pub mod policy;
