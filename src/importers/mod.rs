pub mod asana_csv;
pub mod asana_mapper;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::import::ImportResult;

#[async_trait]
pub trait Importer: Send + Sync {
    /// Human readable source name, e.g. "Asana (CSV)".
    fn name(&self) -> &str;
    /// Team the imported issues land in when the caller doesn't pick one.
    fn default_team_name(&self) -> &str;
    async fn import(&self) -> Result<ImportResult>;
}

#[cfg(test)]
pub mod tests;
