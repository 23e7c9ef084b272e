use crate::error::{AppError, Result};
use tokio::process::Command;
use tracing::debug;

/// Запустить внешнюю утилиту и вернуть её stdout
pub async fn run(program: &str, args: &[&str]) -> Result<String> {
    debug!("Запуск: {} {}", program, args.join(" "));

    let output = Command::new(program).args(args).kill_on_drop(true).output().await.map_err(|e| {
        debug!("{} не найден или не запускается: {}", program, e);
        AppError::ServiceUnavailable(format!("{} не найден: {}", program, e))
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        debug!("{} вернул ошибку: {}", program, stderr);
        return Err(AppError::Command {
            command: format!("{} {}", program, args.join(" ")),
            stderr,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_program_is_service_unavailable() {
        let result = run("/non/existent/wincycle-tool", &["--version"]).await;
        assert!(matches!(result, Err(AppError::ServiceUnavailable(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_program_reports_command() {
        let result = run("sh", &["-c", "echo boom >&2; exit 3"]).await;
        match result {
            Err(AppError::Command { command, stderr }) => {
                assert!(command.starts_with("sh -c"));
                assert_eq!(stderr, "boom");
            }
            other => panic!("ожидалась ошибка команды, получено {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stdout_is_returned() {
        assert_eq!(run("sh", &["-c", "printf ok"]).await.unwrap(), "ok");
    }
}
