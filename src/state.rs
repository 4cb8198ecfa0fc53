use std::sync::Arc;

use crate::{
    config::AppConfig,
    db::{DbPool, OrmConn, orm_from_pool},
    payment::StripeClient,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub config: Arc<AppConfig>,
    pub payments: StripeClient,
}

impl AppState {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        let orm = orm_from_pool(&pool);
        let payments = StripeClient::new(
            config.stripe_api_base.clone(),
            config.stripe_secret_key.clone(),
        );
        Self {
            pool,
            orm,
            config: Arc::new(config),
            payments,
        }
    }
}
