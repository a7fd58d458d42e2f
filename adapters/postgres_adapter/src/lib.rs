use postgres::{Client, Config, NoTls, SimpleQueryMessage};
use sentiment_core::config::ConnectionParams;
use sentiment_core::domain::{RawDataset, RawRecord};
use sentiment_core::error::{EtlError, Result};
use sentiment_core::ports::{SourceRepository, EXTRACT_QUERY};
use tracing::{debug, info, warn};

/// PostgreSQL implementation of the SourceRepository trait
pub struct PostgresSourceRepository {
    params: ConnectionParams,
}

impl PostgresSourceRepository {
    pub fn new(params: ConnectionParams) -> Self {
        Self { params }
    }

    fn client_config(&self) -> Config {
        let mut config = Config::new();
        config
            .host(&self.params.host)
            .port(self.params.port)
            .dbname(&self.params.database)
            .user(&self.params.user)
            .password(&self.params.password)
            .application_name("sentiment-etl");
        config
    }

    fn connect(&self) -> Result<Client> {
        self.client_config().connect(NoTls).map_err(|e| {
            EtlError::connection(format!(
                "cannot connect to {}: {}",
                self.params.display_string(),
                e
            ))
        })
    }
}

/// Collects simple-query messages into a dataset.
/// The simple protocol returns every value as text, whatever its SQL type.
fn collect_dataset(messages: Vec<SimpleQueryMessage>) -> RawDataset {
    let mut columns: Vec<String> = Vec::new();
    let mut rows = Vec::new();

    for message in messages {
        match message {
            SimpleQueryMessage::RowDescription(description) => {
                columns = description.iter().map(|c| c.name().to_string()).collect();
            }
            SimpleQueryMessage::Row(row) => {
                if columns.is_empty() {
                    columns = row.columns().iter().map(|c| c.name().to_string()).collect();
                }
                let values = (0..row.len())
                    .map(|i| row.get(i).map(str::to_string))
                    .collect();
                rows.push(RawRecord::new(values));
            }
            SimpleQueryMessage::CommandComplete(count) => {
                debug!(count, "query complete");
            }
            _ => {}
        }
    }

    RawDataset::new(columns, rows)
}

impl SourceRepository for PostgresSourceRepository {
    fn fetch_all(&self) -> Result<RawDataset> {
        let mut client = self.connect()?;
        info!(source = %self.params.display_string(), "connected to source database");

        // The client is dropped on every path out of this function,
        // which closes the connection if close() below is not reached.
        let messages = client
            .simple_query(EXTRACT_QUERY)
            .map_err(|e| EtlError::query(e.to_string()))?;
        let dataset = collect_dataset(messages);

        if let Err(e) = client.close() {
            warn!(error = %e, "error while closing database connection");
        }
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ConnectionParams {
        ConnectionParams {
            host: "db.local".to_string(),
            port: 6543,
            database: "reviews".to_string(),
            user: "etl".to_string(),
            password: "s3cret".to_string(),
        }
    }

    #[test]
    fn test_client_config_uses_params() {
        let repo = PostgresSourceRepository::new(params());
        let config = repo.client_config();
        assert_eq!(config.get_ports(), &[6543]);
        assert_eq!(config.get_dbname(), Some("reviews"));
        assert_eq!(config.get_user(), Some("etl"));
        assert_eq!(config.get_password(), Some(&b"s3cret"[..]));
        assert_eq!(config.get_application_name(), Some("sentiment-etl"));
    }

    #[test]
    fn test_collect_dataset_empty() {
        let dataset = collect_dataset(Vec::new());
        assert!(dataset.is_empty());
        assert!(dataset.columns.is_empty());
    }
}
