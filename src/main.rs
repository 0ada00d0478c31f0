use clap::Parser;
use std::sync::Arc;
use techhouse_site::domain::ports::{PayloadSink, TracingIndicator};
use techhouse_site::utils::error::{ErrorSeverity, SiteError};
use techhouse_site::utils::{logger, validation::Validate};
use techhouse_site::{
    CliConfig, ContentService, FileSink, HydrationRole, PageShell, ReadinessTimings, RequestTracker,
    Route, SiteConfig, StdoutSink, TransferState,
};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting techhouse renderer");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let exit_code = match run(&cli).await {
        Ok(true) => 0,
        Ok(false) => 2,
        Err(e) => {
            tracing::error!(
                "❌ Render failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            }
        }
    };

    if exit_code > 0 {
        std::process::exit(exit_code);
    }
}

/// 渲染單一路由，回傳主要內容是否成功載入
async fn run(cli: &CliConfig) -> Result<bool, SiteError> {
    let config: SiteConfig = cli.resolve()?;
    config.validate()?;

    let route = Route::parse(&cli.route);
    let tracker = Arc::new(RequestTracker::new(Arc::new(TracingIndicator)));
    let shell = PageShell::new(Arc::clone(&tracker), ReadinessTimings::from_settings(&config));
    let state = Arc::new(TransferState::new());
    let service = ContentService::with_hydration(
        &config,
        Arc::clone(&tracker),
        Arc::clone(&state),
        HydrationRole::Server,
    )?;

    // 先送出請求，readiness 才會看到進行中的計數
    let (loaded, reason) = tokio::join!(
        service.load_route(&route, cli.page),
        shell.await_initial_ready()
    );
    tracing::info!(
        "📄 Route {} ready ({:?}), {} slot(s) recorded",
        route.href(),
        reason,
        state.len()
    );

    let payload = if cli.script_tag {
        state.to_script_tag()?
    } else {
        state.to_payload()?
    };

    let sink: Box<dyn PayloadSink> = match &cli.output {
        Some(path) => Box::new(FileSink::new(path)),
        None => Box::new(StdoutSink),
    };
    let location = sink.write_payload(&payload).await?;
    tracing::info!("📁 Payload written to {}", location);

    if !loaded {
        tracing::warn!("⚠️ Primary content for {} could not be loaded", route.href());
        eprintln!("⚠️ Page content unavailable, the payload only holds what loaded");
    }
    Ok(loaded)
}
