use crate::domain::model::{Snapshot, Workbook};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

/// Persistence collaborator. Called once at startup and after every mutation.
#[async_trait]
pub trait Repository: Send + Sync {
    async fn load(&self) -> Result<Snapshot>;
    async fn save(&self, snapshot: &Snapshot) -> Result<()>;
}

pub trait WorkbookReader: Send + Sync {
    fn read_workbook(&self, bytes: &[u8]) -> Result<Workbook>;
}
