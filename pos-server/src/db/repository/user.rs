//! User Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{User, UserCreate, UserUpdate};
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all users
    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user ORDER BY username")
            .await?
            .take(0)?;
        Ok(users)
    }

    /// Find all admin users (notification fan-out targets)
    pub async fn find_admins(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user WHERE role = 'admin'")
            .await?
            .take(0)?;
        Ok(users)
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let thing = self.base.parse_id(id)?;
        let user: Option<User> = self.base.db().select(thing).await?;
        Ok(user)
    }

    /// Find user by login identifier — case-insensitive username or phone
    pub async fn find_by_login(&self, identifier: &str) -> RepoResult<Option<User>> {
        let ident = identifier.trim().to_lowercase();
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM user \
                 WHERE string::lowercase(username) = $ident OR phone = $ident \
                 LIMIT 1",
            )
            .bind(("ident", ident))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Find user by phone (duplicate-registration check)
    pub async fn find_by_phone(&self, phone: &str) -> RepoResult<Option<User>> {
        let phone_owned = phone.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE phone = $phone LIMIT 1")
            .bind(("phone", phone_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new user
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        // Check duplicate username (case-insensitive, same rule as login)
        if self.find_by_login(&data.username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Username '{}' already exists",
                data.username
            )));
        }

        // Check duplicate phone
        if let Some(ref phone) = data.phone
            && self.find_by_phone(phone).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Phone '{}' is already registered",
                phone
            )));
        }

        let hash_pass = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE user SET
                    name = $name,
                    username = $username,
                    hash_pass = $hash_pass,
                    role = $role,
                    status = $status,
                    is_online = false,
                    phone = $phone,
                    created_at = $created_at
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("username", data.username))
            .bind(("hash_pass", hash_pass))
            .bind(("role", data.role))
            .bind(("status", data.status))
            .bind(("phone", data.phone))
            .bind(("created_at", now_millis()))
            .await?;

        let created: Option<User> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Update a user (field-level merge)
    pub async fn update(&self, id: &str, data: UserUpdate) -> RepoResult<User> {
        let thing = self.base.parse_id(id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))?;

        let hash_pass = match data.password {
            Some(ref password) => Some(
                User::hash_password(password)
                    .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?,
            ),
            None => None,
        };

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $thing SET
                    name = $name OR name,
                    hash_pass = $hash_pass OR hash_pass,
                    role = IF $has_role THEN $role ELSE role END,
                    status = IF $has_status THEN $status ELSE status END,
                    phone = $phone OR phone,
                    avatar = $avatar OR avatar
                RETURN AFTER"#,
            )
            .bind(("thing", thing))
            .bind(("name", data.name))
            .bind(("hash_pass", hash_pass))
            .bind(("has_role", data.role.is_some()))
            .bind(("role", data.role))
            .bind(("has_status", data.status.is_some()))
            .bind(("status", data.status))
            .bind(("phone", data.phone))
            .bind(("avatar", data.avatar))
            .await?;

        result
            .take::<Option<User>>(0)?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    /// Flip the online flag (login/logout side effect)
    ///
    /// Callers treat failures as best-effort and only log them.
    pub async fn set_online(&self, id: &str, is_online: bool) -> RepoResult<()> {
        let thing = self.base.parse_id(id)?;
        self.base
            .db()
            .query("UPDATE $thing SET is_online = $is_online")
            .bind(("thing", thing))
            .bind(("is_online", is_online))
            .await?;
        Ok(())
    }

    /// Hard delete a user
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing = self.base.parse_id(id)?;
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))?;

        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }
}
