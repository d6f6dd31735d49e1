use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::core::domain::error::ProxmoxResult;

/// Writes `report` to `path` as pretty-printed JSON, replacing any
/// existing file. Floats are written at full precision.
pub async fn write_json<T>(report: &T, path: &Path) -> ProxmoxResult<()>
where
    T: Serialize + ?Sized,
{
    let mut body = serde_json::to_vec_pretty(report)?;
    body.push(b'\n');
    tokio::fs::write(path, body).await?;
    info!(path = %path.display(), "Report exported");
    Ok(())
}
