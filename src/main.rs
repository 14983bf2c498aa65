// SPDX-License-Identifier: MPL-2.0
use std::path::PathBuf;
use std::time::Duration;

use toast_queue::config::{self, Config};
use toast_queue::diagnostics::DiagnosticsHandle;
use toast_queue::notifications::{Action, Dispatcher, Notification, NotifyOptions};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

struct Flags {
    config_path: Option<PathBuf>,
    default_duration_ms: Option<u64>,
}

fn parse_flags() -> Result<Flags, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    let flags = Flags {
        config_path: args.opt_value_from_str("--config")?,
        default_duration_ms: args.opt_value_from_str("--default-duration-ms")?,
    };
    let rest = args.finish();
    if !rest.is_empty() {
        tracing::warn!(?rest, "ignoring unexpected arguments");
    }
    Ok(flags)
}

fn load_config(flags: &Flags) -> toast_queue::error::Result<Config> {
    let mut config = match &flags.config_path {
        Some(path) => config::load_from_path(path)?,
        None => config::load()?,
    };
    if let Some(ms) = flags.default_duration_ms {
        config.default_duration_ms = Some(ms);
    }
    Ok(config)
}

fn render(entries: &[Notification]) {
    println!("-- {} active --", entries.len());
    for entry in entries.iter().rev() {
        match entry.title() {
            Some(title) => println!("[{}] {}: {}", entry.kind(), title, entry.message()),
            None => println!("[{}] {}", entry.kind(), entry.message()),
        }
        if let Some(action) = entry.action() {
            println!("    ({})", action.label());
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("toast_queue=info")),
        )
        .init();

    let flags = parse_flags()?;
    let config = load_config(&flags)?;

    let toasts = Dispatcher::with_settings(config.dispatcher_settings())?;
    let diagnostics = DiagnosticsHandle::new(config.diagnostics_capacity());
    toasts.set_diagnostics(diagnostics.clone());
    let surface = toasts.subscribe(render);

    toasts.success("Platform connected", NotifyOptions::new().with_title("Instagram"));
    toasts.success("Draft saved automatically", NotifyOptions::new().with_duration_ms(2000));
    let retry = Action::new("Retry", || tracing::info!("upload retry requested"));
    let upload = toasts.error(
        "Upload failed. Please try again.",
        NotifyOptions::new().persistent().with_action(retry),
    );
    toasts.warning(
        "Rate limit near",
        NotifyOptions::new().with_duration_ms(3000),
    );

    tokio::time::sleep(Duration::from_millis(2500)).await;
    if let Some(entry) = toasts.snapshot().iter().find(|n| n.id() == upload) {
        if let Some(action) = entry.action() {
            action.invoke();
        }
    }
    toasts.dismiss(upload);

    tokio::time::sleep(config.dispatcher_settings().default_duration).await;

    surface.unsubscribe();
    toasts.shutdown();

    let counts = diagnostics.severity_counts();
    tracing::info!(
        events = diagnostics.len(),
        warnings = counts.warnings,
        errors = counts.errors,
        "notification session finished"
    );
    Ok(())
}
