mod cli;
mod host;
mod report;
mod updater;
mod version;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use ifl03_bridge::codec::push_script;
use ifl03_bridge::{BridgeClient, Command};
use ifl03_common::version::is_newer;
use ifl03_common::{BridgeError, Ifl03Error};
use ifl03_config::ClientConfig;
use ifl03_ui::pages::home::{BTN_RELEASE_NOTES, RELEASE_NOTES_CONTENT};
use ifl03_ui::pages::overlays::CENTER_BUTTON;
use ifl03_ui::pages::preview::CHK_PREVIEW_MODE;
use ifl03_ui::pages::settings::{BTN_RESET_DEFAULTS, BTN_SAVE};
use ifl03_ui::{
    catalog, HomePage, OverlaysPage, Page, PageController, PageOptions, PreviewPage, Request,
    SettingsPage, UiEvent,
};
use tokio::process::Child;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use cli::{Action, Args, ValueKind};
use updater::UpdateChecker;

/// Everything a subcommand needs.
struct Session {
    config: ClientConfig,
    client: Arc<BridgeClient>,
    pushes: Option<mpsc::UnboundedReceiver<String>>,
    // Held so the host is killed when the session ends.
    _host: Option<Child>,
}

impl Session {
    fn controller<P: Page>(&self, page: P) -> PageController<P> {
        PageController::new(
            Arc::clone(&self.client),
            page,
            Duration::from_millis(u64::from(self.config.ui.status_ttl_ms)),
        )
    }

    fn page_options(&self) -> PageOptions {
        PageOptions {
            save_feedback: Duration::from_millis(u64::from(self.config.ui.save_feedback_ms)),
            nudge_step: i32::try_from(self.config.ui.nudge_step).unwrap_or(1),
        }
    }

    fn installed_version(&self) -> Option<String> {
        version::read_installed_version(Path::new(&self.config.ui.version_file))
    }

    /// Home controller with the initial state loaded.
    async fn home(&self) -> Result<PageController<HomePage>, Ifl03Error> {
        let mut page = HomePage::new();
        page.set_installed_version(self.installed_version());
        let mut controller = self.controller(page);
        controller.init().await?;
        if self.config.updates.check_on_startup {
            let latest = UpdateChecker::new(&self.config.updates).latest().await;
            controller
                .page_mut()
                .set_latest_release(latest.and_then(|r| r.to_latest()));
            controller.render();
        }
        Ok(controller)
    }
}

fn main() -> ExitCode {
    // Parse CLI arguments
    let args = cli::parse();

    // Load config; logging needs its level, so report failures after init
    let loaded = match &args.config {
        Some(path) => ifl03_config::load_config_from(path),
        None => ifl03_config::load_config(),
    };
    let level = args
        .log_level
        .clone()
        .or_else(|| loaded.as_ref().ok().map(|c| c.logging.level.as_str().to_string()))
        .unwrap_or_else(|| "info".to_string());

    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                level
                    .parse()
                    .unwrap_or_else(|_| LevelFilter::INFO.into()),
            ),
        )
        .init();

    let config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        ClientConfig::default()
    });
    tracing::debug!("ifl03 v{} starting", env!("CARGO_PKG_VERSION"));

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(args, config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args, config: ClientConfig) -> Result<(), Ifl03Error> {
    let action = args.command.clone().unwrap_or(Action::State { script: false });
    if action == Action::Config {
        println!("{}", ifl03_config::config_to_json(&config));
        return Ok(());
    }
    let session = connect(&args, config);

    match action {
        Action::State { script: false } => {
            let home = session.home().await?;
            print!("{}", report::summarize(home.surface(), home.client().snapshot().as_deref()));
        }
        Action::State { script: true } => {
            session.client.send(&Command::GetState).await?;
            if let Some(snapshot) = session.client.snapshot() {
                println!("{}", push_script(&session.config.bridge.push_callback, &snapshot));
            }
        }
        Action::Overlay { key, on } => {
            let command = match on {
                Some(on) => Command::set_overlay(key.as_str(), on),
                None => Command::ToggleOverlay { key: key.clone() },
            };
            session.client.send(&command).await?;
            let enabled = session.client.snapshot().and_then(|s| {
                s.overlay_enabled(&key)
                    .or_else(|| s.config_bool(&key, "enabled"))
            });
            match enabled {
                Some(on) => println!("{key}: {}", if on { "on" } else { "off" }),
                None => println!("{key}: sent"),
            }
        }
        Action::UiEdit { on } => {
            let mut home = session.home().await?;
            home.dispatch(UiEvent::toggled(ifl03_ui::pages::home::CHK_UI_EDIT, on))
                .await;
            print!("{}", report::summarize(home.surface(), home.client().snapshot().as_deref()));
        }
        Action::Preview { on } => {
            let mut preview = session.controller(PreviewPage::new());
            preview.init().await?;
            preview.dispatch(UiEvent::toggled(CHK_PREVIEW_MODE, on)).await;
            let state = preview.surface().is_checked(CHK_PREVIEW_MODE).unwrap_or(false);
            println!("Preview: {}", if state { "on" } else { "off" });
        }
        Action::Set {
            component,
            key,
            value,
            kind,
        } => {
            let command = set_command(component, key, &value, kind)?;
            session.client.send(&command).await?;
            println!("{} sent", command.name());
        }
        Action::Nudge { overlay, dx, dy } => {
            let mut page = overlays_controller(&session, &overlay).await?;
            page.dispatch(UiEvent::Nudge { dx, dy }).await;
            finish(page.surface(), "Nudge sent");
        }
        Action::Center { overlay } => {
            let mut page = overlays_controller(&session, &overlay).await?;
            page.dispatch(UiEvent::clicked(CENTER_BUTTON)).await;
            finish(page.surface(), "Center sent");
        }
        Action::Save => {
            let mut settings = session.controller(SettingsPage::new(session.page_options()));
            settings.init().await?;
            settings.dispatch(UiEvent::clicked(BTN_SAVE)).await;
            finish(settings.surface(), "Save sent");
        }
        Action::Reset { yes } => {
            if !yes {
                return Err(Ifl03Error::Other(
                    "reset reverts every setting to its default; pass --yes to confirm".into(),
                ));
            }
            let mut settings = session.controller(SettingsPage::new(session.page_options()));
            settings.init().await?;
            settings.dispatch(UiEvent::confirmed(BTN_RESET_DEFAULTS)).await;
            finish(settings.surface(), "Reset sent");
        }
        Action::CheckUpdate => {
            let installed = match session.installed_version() {
                Some(v) => Some(v),
                None => backend_version(&session).await,
            };
            let checker = UpdateChecker::new(&session.config.updates);
            tracing::debug!(api = checker.api_base(), "checking for updates");
            let latest = checker.latest().await.and_then(|r| r.to_latest());
            let newer = match (&installed, &latest) {
                (Some(current), Some(latest)) => is_newer(&latest.version, current),
                _ => false,
            };
            println!("{}", report::update_line(installed.as_deref(), latest.as_ref(), newer));
        }
        Action::ReleaseNotes => {
            let mut page = HomePage::new();
            page.set_installed_version(session.installed_version());
            let mut home = session.controller(page);
            if let Err(e) = home.init().await {
                tracing::debug!(error = %e, "showing release notes without backend state");
            }
            home.dispatch(UiEvent::clicked(BTN_RELEASE_NOTES)).await;

            let checker = UpdateChecker::new(&session.config.updates);
            let installed = home.page().installed_version().map(str::to_string);
            let notes = checker.release_notes(installed.as_deref()).await;
            home.page_mut().show_release_notes(notes);
            home.render();
            println!("{}", home.surface().text(RELEASE_NOTES_CONTENT).unwrap_or_default());
        }
        Action::Watch => watch(session).await?,
        Action::Config => {}
    }
    Ok(())
}

/// Start the host if one is configured and build the client around it.
fn connect(args: &Args, config: ClientConfig) -> Session {
    let program = args.host.clone().or_else(|| config.bridge.host_command.clone());
    let host_args = if args.host_args.is_empty() {
        config.bridge.host_args.clone()
    } else {
        args.host_args.clone()
    };

    let started = program.and_then(|program| match host::spawn_host(&program, &host_args) {
        Ok(started) => Some(started),
        Err(e) => {
            tracing::warn!(program = %program, error = %e, "Failed to start host");
            None
        }
    });

    match started {
        Some((gateway, pushes, child)) => Session {
            config,
            client: Arc::new(BridgeClient::new(Arc::new(gateway))),
            pushes: Some(pushes),
            _host: Some(child),
        },
        None => {
            tracing::info!("No host attached; bridge calls will be rejected");
            Session {
                config,
                client: Arc::new(BridgeClient::detached()),
                pushes: None,
                _host: None,
            }
        }
    }
}

async fn overlays_controller(
    session: &Session,
    slug: &str,
) -> Result<PageController<OverlaysPage>, Ifl03Error> {
    if catalog::find(slug).is_none() {
        return Err(Ifl03Error::Other(format!("unknown overlay: {slug}")));
    }
    let mut page = session.controller(OverlaysPage::new(session.page_options()));
    page.init().await?;
    page.dispatch(UiEvent::select_overlay(slug)).await;
    Ok(page)
}

async fn backend_version(session: &Session) -> Option<String> {
    match session.client.send(&Command::GetState).await {
        Ok(_) => session.client.snapshot().and_then(|s| s.app_version()),
        Err(e) => {
            tracing::debug!(error = %e, "no backend version available");
            None
        }
    }
}

fn finish(surface: &ifl03_ui::Surface, fallback: &str) {
    println!("{}", report::status_line(surface).unwrap_or(fallback));
}

fn set_command(
    component: String,
    key: String,
    value: &str,
    kind: ValueKind,
) -> Result<Command, Ifl03Error> {
    let invalid = |what: &str| Ifl03Error::Other(format!("'{value}' is not a valid {what}"));
    let command = match kind {
        ValueKind::Bool => {
            let value = value.trim().parse::<bool>().map_err(|_| invalid("bool"))?;
            Command::config_bool(component, key, value)
        }
        ValueKind::Int => {
            let value = value.trim().parse::<i64>().map_err(|_| invalid("integer"))?;
            Command::config_int(component, key, value)
        }
        ValueKind::Float => value
            .trim()
            .parse::<f64>()
            .ok()
            .and_then(|v| Command::config_float(component, key, v))
            .ok_or_else(|| invalid("finite number"))?,
        ValueKind::String => Command::config_string(component, key, value),
        ValueKind::List => {
            let values = value
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect();
            Command::config_string_vec(component, key, values)
        }
    };
    Ok(command)
}

/// Print the home summary on every pushed state until the host exits.
async fn watch(mut session: Session) -> Result<(), Ifl03Error> {
    let Some(mut pushes) = session.pushes.take() else {
        return Err(BridgeError::BridgeUnavailable.into());
    };

    let mut home = match session.home().await {
        Ok(home) => {
            print!("{}", report::summarize(home.surface(), home.client().snapshot().as_deref()));
            home
        }
        Err(e) => {
            tracing::warn!(error = %e, "Initial state unavailable; waiting for pushes");
            let mut page = HomePage::new();
            page.set_installed_version(session.installed_version());
            session.controller(page)
        }
    };

    let mut changes = home.client().store().subscribe();
    let mut ticker = tokio::time::interval(Duration::from_millis(250));
    loop {
        tokio::select! {
            push = pushes.recv() => match push {
                Some(text) => {
                    if home.handle_push(&text) {
                        spawn_follow_ups(home.client(), home.follow_ups());
                    }
                }
                None => {
                    tracing::info!("Host closed its output; stopping");
                    break;
                }
            },
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                home.render();
                println!();
                print!("{}", report::summarize(home.surface(), home.client().snapshot().as_deref()));
            }
            _ = ticker.tick() => home.tick(Instant::now()),
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }
    Ok(())
}

/// Send corrective requests off the watch loop. Their answers land in the
/// store and reach the loop as ordinary changes, so they never chain.
fn spawn_follow_ups(client: &Arc<BridgeClient>, requests: Vec<Request>) -> Vec<JoinHandle<()>> {
    requests
        .into_iter()
        .map(|request| {
            let client = Arc::clone(client);
            tokio::spawn(async move {
                if let Err(e) = client.send(&request.command).await {
                    tracing::warn!(cmd = request.command.name(), error = %e, "follow-up failed");
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use ifl03_bridge::ChannelGateway;

    use super::*;

    fn set(value: &str, kind: ValueKind) -> Result<Command, Ifl03Error> {
        set_command("OverlayTrack".into(), "track_width".into(), value, kind)
    }

    #[test]
    fn set_parses_by_kind() {
        assert_eq!(
            set("true", ValueKind::Bool).unwrap(),
            Command::config_bool("OverlayTrack", "track_width", true)
        );
        assert_eq!(
            set(" 42 ", ValueKind::Int).unwrap(),
            Command::config_int("OverlayTrack", "track_width", 42)
        );
        assert_eq!(
            set("7.5", ValueKind::Float).unwrap(),
            Command::config_float("OverlayTrack", "track_width", 7.5).unwrap()
        );
        assert_eq!(
            set("a, b,,c ", ValueKind::List).unwrap(),
            Command::config_string_vec(
                "OverlayTrack",
                "track_width",
                vec!["a".to_string(), "b".to_string(), "c".to_string()]
            )
        );
    }

    #[test]
    fn set_rejects_bad_values() {
        assert!(set("yes", ValueKind::Bool).is_err());
        assert!(set("4.2", ValueKind::Int).is_err());
        assert!(set("NaN", ValueKind::Float).is_err());
        assert!(set("inf", ValueKind::Float).is_err());
    }

    #[tokio::test]
    async fn detached_session_fails_state_with_unavailable() {
        let args = Args {
            config: None,
            log_level: None,
            host: None,
            host_args: Vec::new(),
            command: None,
        };
        let session = connect(&args, ClientConfig::default());
        assert!(!session.client.is_available());
        let err = session.home().await.err().unwrap();
        assert!(matches!(err, Ifl03Error::Bridge(BridgeError::BridgeUnavailable)));
    }

    #[tokio::test]
    async fn unknown_overlay_is_rejected_before_any_call() {
        let args = Args {
            config: None,
            log_level: None,
            host: None,
            host_args: Vec::new(),
            command: None,
        };
        let session = connect(&args, ClientConfig::default());
        let err = overlays_controller(&session, "nope").await.err().unwrap();
        assert!(err.to_string().contains("unknown overlay"));
    }

    #[tokio::test]
    async fn follow_ups_run_off_the_caller() {
        let (gateway, mut host) = ChannelGateway::new();
        let client = Arc::new(BridgeClient::new(Arc::new(gateway)));
        let request = Request::new(Command::config_string_vec(
            "General",
            "flagged",
            vec!["Ann".to_string()],
        ));

        // Returns while the host has not answered yet.
        let handles = spawn_follow_ups(&client, vec![request]);
        assert_eq!(handles.len(), 1);
        assert!(client.snapshot().is_none());

        let query = host.next_query().await.unwrap();
        assert!(query.request.contains("flagged"));
        query
            .responder
            .success(r#"{"config":{"General":{"flagged":["Ann"]}}}"#);
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(client.store().generation(), 1);
    }
}
