//! PostgreSQL token store tests

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use sqlx::PgPool;

    use tokenpair_server::models::NewRefreshRecord;
    use tokenpair_server::store::{MarkUsedOutcome, PgTokenStore, StoreError, TokenStore};

    /// Helper to create a migrated test database pool
    async fn setup_test_db() -> PgPool {
        let database_url = std::env::var("TEST_DATABASE_URL")
            .unwrap_or_else(|_| "postgresql://localhost/tokenpair_test".to_string());

        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(4)
            .connect(&database_url)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        pool
    }

    fn new_record(jti: &str) -> NewRefreshRecord {
        NewRefreshRecord {
            user_id: "u1".to_string(),
            access_token_id: jti.to_string(),
            refresh_token_hash: "hash".to_string(),
            client_ip: "1.1.1.1".to_string(),
            expires_at: Utc::now() + Duration::days(7),
        }
    }

    fn unique_jti() -> String {
        tokenpair_server::auth::secret::token_id().unwrap()
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_ping() {
        let store = PgTokenStore::new(setup_test_db().await);
        store.ping().await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_save_and_find() {
        let store = PgTokenStore::new(setup_test_db().await);
        let jti = unique_jti();

        let saved = store.save(new_record(&jti)).await.unwrap();
        assert!(!saved.used);

        let found = store.find_by_access_token_id(&jti).await.unwrap().unwrap();
        assert_eq!(found.id, saved.id);
        assert_eq!(found.access_token_id, jti);
    }

    #[tokio::test]
    #[ignore] // Requires database setup
    async fn test_duplicate_jti_rejected() {
        let store = PgTokenStore::new(setup_test_db().await);
        let jti = unique_jti();

        store.save(new_record(&jti)).await.unwrap();
        let err = store.save(new_record(&jti)).await.unwrap_err();
        assert_eq!(err, StoreError::Duplicate);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    #[ignore] // Requires database setup
    async fn test_concurrent_mark_used_single_winner() {
        let store = PgTokenStore::new(setup_test_db().await);
        let id = store.save(new_record(&unique_jti())).await.unwrap().id;

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.mark_used(id).await.unwrap() })
            })
            .collect();

        let mut marked = 0;
        for handle in handles {
            if handle.await.unwrap() == MarkUsedOutcome::Marked {
                marked += 1;
            }
        }
        assert_eq!(marked, 1);
    }
}
