use std::sync::Arc;

use lettre::{
    AsyncSmtpTransport, Tokio1Executor, transport::smtp::authentication::Credentials,
};
use redis::aio::ConnectionManager;
use sqlx::PgPool;

use super::{cache::init_redis, config::Config, database::init_postgres, summarize::http_client};

pub struct State {
    pub config: Config,
    pub db: PgPool,
    pub redis_connection: ConnectionManager,
    pub mailer: AsyncSmtpTransport<Tokio1Executor>,
    pub http: reqwest::Client,
}

impl State {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let db = init_postgres(&config.database_url).await;
        let redis_connection = init_redis(&config.redis_url).await;
        let mailer = init_mailer(&config);
        let http = http_client();

        Arc::new(Self {
            config,
            db,
            redis_connection,
            mailer,
            http,
        })
    }
}

fn init_mailer(config: &Config) -> AsyncSmtpTransport<Tokio1Executor> {
    AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
        .unwrap()
        .credentials(Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.clone(),
        ))
        .build()
}
