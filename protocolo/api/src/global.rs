use std::sync::Arc;

use common::context::Context;
use sqlx::SqlitePool;

use crate::config::AppConfig;

pub trait GlobalCtx {
    fn ctx(&self) -> &Context;
}

pub trait GlobalConfig {
    fn config(&self) -> &AppConfig;
}

pub trait GlobalDb {
    fn db(&self) -> &Arc<SqlitePool>;
}

pub trait ApiGlobal: GlobalCtx + GlobalConfig + GlobalDb + Send + Sync + 'static {}

impl<T> ApiGlobal for T where T: GlobalCtx + GlobalConfig + GlobalDb + Send + Sync + 'static {}

pub struct GlobalState {
    ctx: Context,
    config: AppConfig,
    db: Arc<SqlitePool>,
}

impl GlobalState {
    pub fn new(config: AppConfig, db: Arc<SqlitePool>, ctx: Context) -> Self {
        Self { ctx, config, db }
    }
}

impl GlobalCtx for GlobalState {
    fn ctx(&self) -> &Context {
        &self.ctx
    }
}

impl GlobalConfig for GlobalState {
    fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl GlobalDb for GlobalState {
    fn db(&self) -> &Arc<SqlitePool> {
        &self.db
    }
}
