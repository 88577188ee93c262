use crate::error::ApiError;
use crate::config::DatabaseConfig;
use crate::models::user::User;
use deadpool_postgres::{Config, Pool, PoolConfig, Runtime, Object, Timeouts};
use postgres_native_tls::MakeTlsConnector;
use native_tls::TlsConnector;
use tracing::{debug, error, info};

const SELECT_USERS: &str = "SELECT firstname, lastname FROM users";

const SELECT_USERS_BY_NAME: &str =
    "SELECT firstname, lastname FROM users WHERE firstname = $1 AND lastname = $2";

/// `users` テーブルへの接続プールを握るリポジトリ層。
/// Deadpool の `Pool` を内部に保持し、読み取り専用のクエリをメソッドとして提供する。
#[derive(Clone)]
pub struct Database {
    pool: Pool,
}

impl Database {
    /// 接続プールを構築し、起動時に疎通確認まで実施する。
    /// 失敗した場合はトラフィックを受ける前に `Err` を返す。
    ///
    /// # Arguments
    /// * `config` - The database configuration
    ///
    /// # Returns
    /// * `Result<Self, ApiError>` - Database instance or error
    pub async fn new(config: DatabaseConfig) -> Result<Self, ApiError> {
        let db = Self::connect_lazy(config)?;
        db.test_connection().await?;

        Ok(db)
    }

    /// プールだけを作り、接続は最初の `get` まで遅延させる。
    /// サーバーに触れないので、DB が落ちていても成功する。
    pub fn connect_lazy(config: DatabaseConfig) -> Result<Self, ApiError> {
        info!(
            "Creating PostgreSQL connection pool for {}@{}:{}/{}",
            config.username, config.host, config.port, config.database
        );

        let pool = Self::create_pool(config)?;

        Ok(Database { pool })
    }

    /// Deadpool 用の `Config` を組み立ててプールを生成する内部関数。
    /// `charset` は `client_encoding` としてサーバーに渡す。
    fn create_pool(config: DatabaseConfig) -> Result<Pool, ApiError> {
        let mut pg_config = Config::new();

        // Set connection parameters
        pg_config.host = Some(config.host);
        pg_config.port = Some(config.port);
        pg_config.dbname = Some(config.database);
        pg_config.user = Some(config.username);
        pg_config.password = Some(config.password);
        pg_config.options = Some(format!("-c client_encoding={}", config.charset));
        pg_config.connect_timeout = Some(config.connection_timeout);

        pg_config.ssl_mode = Some(match config.ssl_mode.as_str() {
            "disable" => deadpool_postgres::SslMode::Disable,
            "require" => deadpool_postgres::SslMode::Require,
            _ => deadpool_postgres::SslMode::Prefer,
        });

        // Configure connection pool
        pg_config.manager = Some(deadpool_postgres::ManagerConfig {
            recycling_method: deadpool_postgres::RecyclingMethod::Fast,
        });

        let mut pool_config = PoolConfig::new(config.max_connections as usize);
        pool_config.timeouts = Timeouts {
            wait: Some(config.connection_timeout),
            create: Some(config.connection_timeout),
            recycle: Some(config.connection_timeout),
        };
        pg_config.pool = Some(pool_config);

        let tls_connector = TlsConnector::builder()
            .build()
            .map_err(|e| {
                error!("Failed to create TLS connector: {}", e);
                ApiError::Database(format!("TLS connector creation failed: {}", e))
            })?;
        let tls = MakeTlsConnector::new(tls_connector);

        pg_config.create_pool(Some(Runtime::Tokio1), tls)
            .map_err(|e| {
                error!("Failed to create connection pool: {}", e);
                ApiError::Database(format!("Connection pool creation failed: {}", e))
            })
    }

    /// プールから接続を借りる小さなラッパー。
    /// 返る `Object` はドロップ時にプールへ戻るので、`?` で抜けても接続は漏れない。
    async fn get_connection(&self) -> Result<Object, ApiError> {
        self.pool.get().await.map_err(ApiError::from)
    }

    /// `SELECT 1` を投げて DB が生きているか確認する。
    pub async fn health_check(&self) -> Result<(), ApiError> {
        let client = self.get_connection().await?;

        client.execute("SELECT 1", &[])
            .await
            .map_err(|e| {
                error!("Database health check failed: {}", e);
                ApiError::from(e)
            })?;

        debug!("Database health check successful");
        Ok(())
    }

    /// `Database::new` 直後にプール全体が機能するかの確認に使う。
    pub async fn test_connection(&self) -> Result<(), ApiError> {
        let client = self.get_connection().await?;

        client.execute("SELECT 1", &[])
            .await
            .map_err(|e| {
                error!("Database connection test failed: {}", e);
                ApiError::from(e)
            })?;

        info!("Database connection test successful");
        Ok(())
    }

    /// 全ユーザーをテーブルの返す順序のまま取得する。
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let client = self.get_connection().await?;

        let rows = client.query(SELECT_USERS, &[])
            .await
            .map_err(ApiError::from)?;

        let users = rows.iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }

    /// 姓名の完全一致で絞り込む。
    /// 値は `$1` / `$2` のプレースホルダで渡し、SQL 文字列には埋め込まない。
    pub async fn find_users_by_name(&self, firstname: &str, lastname: &str) -> Result<Vec<User>, ApiError> {
        let client = self.get_connection().await?;

        let rows = client.query(SELECT_USERS_BY_NAME, &[&firstname, &lastname])
            .await
            .map_err(ApiError::from)?;

        let users = rows.iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(users)
    }
}
