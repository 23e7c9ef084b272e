use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
mod config;
mod error;
mod events;
mod services;
mod utils;

use config::Config;
use events::{CycleRequest, CycleResponse};
use services::{
    client,
    create_focus_sink,
    create_notifier,
    create_window_source,
    CycleController,
    CycleServer,
    DryRunDesktop,
    WindowCycler,
};

#[derive(Parser, Debug)]
#[command(name = "wincycle")]
#[command(about = "Циклическое переключение окон приложения через yabai")]
struct Args {
    /// Путь к файлу конфигурации
    #[arg(short, long, default_value = "wincycle.toml", global = true)]
    config: PathBuf,

    /// Режим сухого запуска: эмулированный рабочий стол вместо yabai
    #[arg(long, global = true)]
    dry_run: bool,

    /// Уровень логирования (по умолчанию из конфигурации)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Запустить демон, хранящий состояние переключения
    Serve,
    /// Переключиться на следующее окно приложения
    Cycle { app: String },
    /// Сбросить состояние приложения (или всех приложений)
    Reset { app: Option<String> },
    /// Показать состояние переключения приложения
    Inspect { app: String },
    /// Показать окна приложения в порядке переключения
    List { app: String },
}

impl Command {
    fn into_request(self) -> Option<CycleRequest> {
        match self {
            Command::Serve => None,
            Command::Cycle { app } => Some(CycleRequest::Cycle { app }),
            Command::Reset { app } => Some(CycleRequest::Reset { app }),
            Command::Inspect { app } => Some(CycleRequest::Inspect { app }),
            Command::List { app } => Some(CycleRequest::List { app }),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Загрузка конфигурации
    let config = Config::load(&args.config)?;

    // Инициализация системы логирования
    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    init_tracing(level, &config.logging.format)?;

    if args.dry_run {
        warn!("Режим сухого запуска - реальные действия отключены");
    }

    match args.command.into_request() {
        None => serve(config, args.dry_run).await,
        Some(request) if args.dry_run => {
            // Разовый запрос без демона, состояние живёт только в этом процессе
            let controller = build_controller(&config, true);
            print_response(&controller.handle(request).await)
        }
        Some(request) => {
            let response = client::send(&config.server.socket_path, &request).await?;
            print_response(&response)
        }
    }
}

fn build_controller(config: &Config, dry_run: bool) -> CycleController {
    let desktop = dry_run.then(|| Arc::new(DryRunDesktop::sample()));

    CycleController::new(
        Arc::new(WindowCycler::new(&config.cycle)),
        create_window_source(config, desktop.clone()),
        create_focus_sink(config, desktop),
        create_notifier(&config.notify, dry_run),
        config.focus.clone(),
    )
}

async fn serve(config: Config, dry_run: bool) -> Result<()> {
    info!("Запуск wincycle v{}", env!("CARGO_PKG_VERSION"));

    // Проверка прав доступа
    if !dry_run {
        if let Err(e) = utils::permissions::check_permissions(&config).await {
            error!("{}", e);
            for line in utils::permissions::get_setup_commands() {
                warn!("{}", line);
            }
            return Err(e.into());
        }
    }

    let controller = Arc::new(build_controller(&config, dry_run));
    let server = CycleServer::bind(&config.server.socket_path, controller)?;

    info!("Все компоненты инициализированы");

    // Ожидание сигнала завершения
    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                error!("Ошибка в CycleServer: {}", e);
                return Err(e.into());
            }
        }
        result = signal::ctrl_c() => {
            match result {
                Ok(()) => info!("Получен сигнал завершения (Ctrl+C)"),
                Err(err) => error!("Ошибка при ожидании сигнала завершения: {}", err),
            }
        }
    }

    info!("Завершение работы...");
    Ok(())
}

fn print_response(response: &CycleResponse) -> Result<()> {
    match response {
        CycleResponse::Ok { message, state, windows, .. } => {
            println!("{}", message);
            if let Some(state) = state {
                println!("{}", serde_json::to_string_pretty(state)?);
            }
            for (index, window) in windows.iter().enumerate() {
                println!("{:>3}. {}", index + 1, window);
            }
            Ok(())
        }
        CycleResponse::Error { kind, message } => {
            anyhow::bail!("{} ({})", message, kind)
        }
    }
}

fn init_tracing(level: &str, format: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))?;

    // stdout остаётся для ответов клиенту
    let registry = tracing_subscriber::registry().with(filter);
    if format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}
