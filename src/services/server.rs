use crate::error::Result;
use crate::events::{CycleRequest, CycleResponse};
use crate::services::CycleController;
use crate::{app_error, trace_if_enabled};
use std::io::ErrorKind;
use std::os::unix::fs::{FileTypeExt, MetadataExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, error, info, warn};

/// Демон: владеет состоянием переключения на всё время жизни процесса
pub struct CycleServer {
    listener: UnixListener,
    socket_path: PathBuf,
    /// inode нашего сокета: при остановке удаляем файл, только если он всё ещё наш
    inode: u64,
    controller: Arc<CycleController>,
}

impl CycleServer {
    /// Привязаться к сокету. Файл от прошлого запуска удаляется, только если
    /// это сокет и на нём никто не слушает
    pub fn bind(socket_path: &Path, controller: Arc<CycleController>) -> Result<Self> {
        remove_stale_socket(socket_path)?;

        let listener = UnixListener::bind(socket_path).map_err(|e| {
            app_error!(service_unavailable, "Не удалось открыть сокет {:?}: {}", socket_path, e)
        })?;
        let inode = std::fs::symlink_metadata(socket_path)?.ino();
        info!("Демон слушает {:?}", socket_path);

        Ok(Self {
            listener,
            socket_path: socket_path.to_path_buf(),
            inode,
            controller,
        })
    }

    pub async fn run(&self) -> Result<()> {
        loop {
            let (stream, _) = self.listener.accept().await?;
            let controller = Arc::clone(&self.controller);
            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, controller).await {
                    warn!("Ошибка соединения: {}", e);
                }
            });
        }
    }
}

impl Drop for CycleServer {
    fn drop(&mut self) {
        match std::fs::symlink_metadata(&self.socket_path) {
            Ok(metadata) if metadata.ino() == self.inode => {
                if let Err(e) = std::fs::remove_file(&self.socket_path) {
                    debug!("Не удалось удалить сокет {:?}: {}", self.socket_path, e);
                }
            }
            Ok(_) => debug!("Сокет {:?} уже занят другим процессом, не трогаем", self.socket_path),
            Err(e) => debug!("Сокет {:?} недоступен: {}", self.socket_path, e),
        }
        info!("Демон остановлен");
    }
}

fn remove_stale_socket(socket_path: &Path) -> Result<()> {
    let metadata = match std::fs::symlink_metadata(socket_path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    if !metadata.file_type().is_socket() {
        return Err(app_error!(
            permission,
            "{:?} существует и не является сокетом, удалите файл вручную или смените server.socket_path",
            socket_path
        ));
    }

    // Живой демон принимает соединение, брошенный сокет отвечает ECONNREFUSED
    if std::os::unix::net::UnixStream::connect(socket_path).is_ok() {
        return Err(app_error!(service_unavailable, "Демон уже запущен на {:?}", socket_path));
    }

    warn!("Удаляем старый сокет {:?}", socket_path);
    std::fs::remove_file(socket_path)?;
    Ok(())
}

async fn handle_connection(stream: UnixStream, controller: Arc<CycleController>) -> Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        trace_if_enabled!("Получен запрос: {}", line);

        let response = match serde_json::from_str::<CycleRequest>(line) {
            Ok(request) => controller.handle(request).await,
            Err(e) => {
                warn!("Некорректный запрос '{}': {}", line, e);
                CycleResponse::error("bad_request", format!("Некорректный запрос: {}", e))
            }
        };

        if let Err(e) = write_response(&mut writer, &response).await {
            error!("Не удалось отправить ответ: {}", e);
            return Err(e);
        }
    }

    debug!("Клиент отключился");
    Ok(())
}

async fn write_response<W: AsyncWrite + Unpin>(writer: &mut W, response: &CycleResponse) -> Result<()> {
    let mut line = serde_json::to_string(response)?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}
