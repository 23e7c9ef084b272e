use crate::error::{AppError, Result};
use crate::events::{CycleRequest, CycleResponse};
use std::io::ErrorKind;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;
use tracing::debug;

/// Отправить один запрос демону и дождаться ответа
pub async fn send(socket_path: &Path, request: &CycleRequest) -> Result<CycleResponse> {
    let stream = UnixStream::connect(socket_path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound | ErrorKind::ConnectionRefused => AppError::ServiceUnavailable(format!(
            "демон не запущен ({:?}), запустите `wincycle serve`",
            socket_path
        )),
        _ => AppError::Io(e),
    })?;
    debug!("Подключились к демону {:?}", socket_path);

    let (reader, mut writer) = stream.into_split();

    let mut line = serde_json::to_string(request)?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await?;

    let mut lines = BufReader::new(reader).lines();
    let reply = lines
        .next_line()
        .await?
        .ok_or_else(|| AppError::ServiceUnavailable("демон закрыл соединение без ответа".to_string()))?;

    Ok(serde_json::from_str(&reply)?)
}
