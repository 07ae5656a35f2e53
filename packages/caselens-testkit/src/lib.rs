//! Scratch Postgres databases for integration tests that need a real case store.

mod error;

pub use error::{Error, Result};

use std::{env, str::FromStr, thread};

use sqlx::{
	ConnectOptions, Connection, Executor,
	postgres::{PgConnectOptions, PgConnection},
};
use tokio::runtime::Builder;
use uuid::Uuid;

pub const PG_DSN_ENV: &str = "CASELENS_PG_DSN";

/// Base DSN for Postgres-backed tests, when one is configured.
pub fn env_dsn() -> Option<String> {
	env::var(PG_DSN_ENV).ok().filter(|dsn| !dsn.trim().is_empty())
}

/// A uniquely named database on the server behind the base DSN.
///
/// Call [`TestDatabase::cleanup`] at the end of a test. A database that is still present when
/// the value drops (for example after a failed assertion) is removed from a helper thread.
pub struct TestDatabase {
	name: String,
	dsn: String,
	admin: PgConnectOptions,
	dropped: bool,
}
impl TestDatabase {
	pub async fn new(base_dsn: &str) -> Result<Self> {
		let base = PgConnectOptions::from_str(base_dsn)
			.map_err(|source| Error::InvalidDsn { env: PG_DSN_ENV, source })?;
		let (admin, mut conn) = admin_connection(&base).await?;
		let name = format!("caselens_test_{}", Uuid::new_v4().simple());

		conn.execute(format!(r#"CREATE DATABASE "{name}""#).as_str()).await?;

		let dsn = base.database(&name).to_url_lossy().to_string();

		Ok(Self { name, dsn, admin, dropped: false })
	}

	pub fn dsn(&self) -> &str {
		&self.dsn
	}

	pub async fn cleanup(mut self) -> Result<()> {
		drop_database(&self.admin, &self.name).await?;

		self.dropped = true;

		Ok(())
	}
}
impl Drop for TestDatabase {
	fn drop(&mut self) {
		if self.dropped {
			return;
		}

		let admin = self.admin.clone();
		let name = std::mem::take(&mut self.name);
		let handle = thread::spawn(move || {
			let outcome = match Builder::new_current_thread().enable_all().build() {
				Ok(runtime) => runtime.block_on(drop_database(&admin, &name)),
				Err(err) => Err(Error::Runtime(err)),
			};

			if let Err(err) = outcome {
				eprintln!("Could not drop test database {name}: {err}.");
			}
		});
		let _ = handle.join();
	}
}

async fn admin_connection(base: &PgConnectOptions) -> Result<(PgConnectOptions, PgConnection)> {
	let primary = base.clone().database("postgres");

	match PgConnection::connect_with(&primary).await {
		Ok(conn) => Ok((primary, conn)),
		Err(_) => {
			let fallback = base.clone().database("template1");
			let conn = PgConnection::connect_with(&fallback)
				.await
				.map_err(|source| Error::AdminUnavailable { source })?;

			Ok((fallback, conn))
		},
	}
}

async fn drop_database(admin: &PgConnectOptions, name: &str) -> Result<()> {
	let mut conn = PgConnection::connect_with(admin).await?;

	// Open pool connections from the test would otherwise block the drop.
	sqlx::query(
		"\
SELECT pg_terminate_backend(pid)
FROM pg_stat_activity
WHERE datname = $1 AND pid <> pg_backend_pid()",
	)
	.bind(name)
	.execute(&mut conn)
	.await?;
	conn.execute(format!(r#"DROP DATABASE IF EXISTS "{name}""#).as_str()).await?;

	Ok(())
}
