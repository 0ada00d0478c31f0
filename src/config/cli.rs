use crate::domain::ports::PayloadSink;
use crate::utils::error::Result;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;

/// 寫入本機檔案，必要時建立上層目錄
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl PayloadSink for FileSink {
    async fn write_payload(&self, payload: &str) -> Result<String> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&self.path, payload).await?;
        Ok(self.path.display().to_string())
    }
}

#[derive(Debug, Clone, Default)]
pub struct StdoutSink;

#[async_trait::async_trait]
impl PayloadSink for StdoutSink {
    async fn write_payload(&self, payload: &str) -> Result<String> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(payload.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
        Ok("stdout".to_string())
    }
}
