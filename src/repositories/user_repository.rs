use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    models::user::{NewUser, User},
    repositories::UserRepository,
};

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, last_name, dni, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING
                id,
                name,
                last_name,
                dni,
                email,
                password_hash,
                role
            "#,
        )
        .bind(&user.name)
        .bind(&user.last_name)
        .bind(&user.dni)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.role)
        .fetch_one(&self.pool)
        .await?;

        log::debug!("User created: {}", user.id);
        Ok(user)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, last_name, dni, email, password_hash, role
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, last_name, dni, email, password_hash, role
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    async fn find_all(&self) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, last_name, dni, email, password_hash, role
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }
}
