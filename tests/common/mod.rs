//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use krishi_api::auth::{sign_token, JwtAuth};
use krishi_commons::{AuthProvider, FarmerType, User};
use krishi_core::notices::ScrapeConfig;
use krishi_core::users::NewUser;
use krishi_core::AppContext;
use krishi_store::test_utils::TestDb;
use krishi_store::RocksDBBackend;

pub const TEST_SECRET: &str = "integration-test-secret";

/// A fully wired application context over a throwaway database.
///
/// The scrape target points at a closed local port so notice aggregation
/// exercises its fallback path without touching the network.
pub struct TestHarness {
    _db: TestDb,
    pub ctx: Arc<AppContext>,
    pub jwt: Arc<JwtAuth>,
}

impl TestHarness {
    pub fn new() -> Self {
        let db = TestDb::with_all_partitions().expect("test db");
        let backend = Arc::new(RocksDBBackend::new(db.db.clone()));

        let scrape = ScrapeConfig {
            homepage_url: "http://127.0.0.1:9/".into(),
            fallback_notice_url: "http://127.0.0.1:9/notices".into(),
            homepage_timeout_secs: 1,
            notice_timeout_secs: 1,
            ..ScrapeConfig::default()
        };

        let ctx = Arc::new(AppContext::init(backend, scrape).expect("app context"));
        let jwt = Arc::new(JwtAuth::new(TEST_SECRET));
        Self { _db: db, ctx, jwt }
    }

    /// Inserts a local farmer directly through the user store.
    pub fn create_farmer(&self, name: &str, email: &str, location: &str) -> User {
        self.ctx
            .users()
            .create_sync(NewUser {
                name: name.into(),
                email: email.into(),
                password_hash: Some("$2b$12$integrationtesthash".into()),
                auth_provider: AuthProvider::Local,
                google_id: None,
                phone: "9800000000".into(),
                location: location.into(),
                farmer_type: FarmerType::Subsistence,
                primary_crops: "rice".into(),
                avatar: None,
            })
            .expect("create farmer")
    }

    /// Bearer token for an existing user.
    pub fn token_for(&self, user: &User) -> String {
        sign_token(&user.user_id, TEST_SECRET, 1).expect("sign token")
    }
}
