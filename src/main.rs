use eframe::egui;
use logboard::app::LogboardApp;
use logboard::backend::HttpBackend;
use logboard::config::AppConfig;
use logboard::worker::BackendWorker;
use std::sync::{mpsc, Arc};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("logboard=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = AppConfig::from_env();
    tracing::info!(backend = %config.backend_url, "starting logboard");

    let (tx, rx) = mpsc::channel();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("logboard-runtime")
        .build()?;

    let backend = Arc::new(HttpBackend::new(&config));
    let worker = BackendWorker::new(backend, tx, runtime.handle().clone());
    let app = LogboardApp::new(rx, worker, config.backend_url.clone());
    let _runtime = runtime;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Logboard")
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([960.0, 600.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "Logboard",
        native_options,
        Box::new(move |_creation_context| Ok(Box::new(app))),
    )?;

    Ok(())
}
