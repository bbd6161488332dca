use caminhar_client::config::cli::Command;
use caminhar_client::core::ConfigProvider;
use caminhar_client::utils::error::{CaminharError, ErrorSeverity};
use caminhar_client::utils::{logger, validation::Validate};
use caminhar_client::{ApiClient, App, Cli, FileSessionStore, Settings};
use clap::Parser;
use std::io::{BufRead, Write};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let settings = match Settings::load(cli.config.as_deref(), cli.overrides()) {
        Ok(settings) => settings,
        Err(e) => exit_with(&e),
    };

    // 初始化日誌
    if settings.json_logs {
        logger::init_json_logger(cli.verbose, settings.log_level.as_deref());
    } else {
        logger::init_cli_logger(cli.verbose, settings.log_level.as_deref());
    }
    tracing::debug!("Settings: {:?}", settings);

    // 驗證配置
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    let password = match resolve_password(&cli.command) {
        Ok(password) => password,
        Err(e) => exit_with(&e),
    };

    let client = match ApiClient::from_config(&settings) {
        Ok(client) => client,
        Err(e) => exit_with(&e),
    };
    let store = FileSessionStore::new(settings.session_path());
    let app = App::new(client, store, cli.format);

    match app.dispatch(cli.command, password).await {
        Ok(output) => println!("{}", output),
        Err(e) => {
            tracing::error!(
                "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            exit_with(&e);
        }
    }
}

/// login/register 未提供密碼時從標準輸入讀取一行
fn resolve_password(command: &Command) -> caminhar_client::Result<Option<String>> {
    let given = match command {
        Command::Login(args) => args.password.clone(),
        Command::Register(args) => args.password.clone(),
        _ => return Ok(None),
    };
    if given.is_some() {
        return Ok(given);
    }

    eprint!("Senha: ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn exit_with(e: &CaminharError) -> ! {
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Sugestão: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 1,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 3,
        ErrorSeverity::Critical => 4,
    };
    std::process::exit(exit_code);
}
