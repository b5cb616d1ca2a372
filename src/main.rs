use std::sync::Arc;
use std::time::Duration;

use chatstack::adapters::{MockChatBackend, RestChatBackend};
use chatstack::app::{App, AppMessage};
use chatstack::cli::{parse_args, run_cli_command, CliCommand};
use chatstack::domain::PresentationSettings;
use chatstack::startup::{init_logging, AppConfig, StartupConfig};
use chatstack::terminal::{setup_panic_hook, TerminalManager};
use chatstack::traits::ChatBackend;
use chatstack::ui;
use color_eyre::Result;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use ratatui::{backend::Backend, Terminal};
use tokio::sync::mpsc;
use tracing::{error, info};

/// Tick interval for the spinner and status expiry
const TICK_INTERVAL: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    // Handle --version/--help before any initialization
    let options = match parse_args(std::env::args()) {
        CliCommand::Run(options) => options,
        command => {
            let code = match run_cli_command(&command) {
                Some(Err(_)) => 2,
                _ => 0,
            };
            std::process::exit(code);
        }
    };

    color_eyre::install()?;

    let startup = StartupConfig::from_options(&options);
    let config = AppConfig::load(&options)?;
    let log_path = init_logging(&startup)?;
    info!(log = %log_path.display(), demo = startup.demo, "Logging initialized");

    let backend: Arc<dyn ChatBackend> = if startup.demo {
        info!("Using in-memory demo backend");
        Arc::new(MockChatBackend::demo())
    } else {
        Arc::new(RestChatBackend::new(config.backend_settings())?)
    };

    let identity = config.identity();
    let settings = PresentationSettings::new(&identity, config.color_scheme, config.theme_tokens());

    // Setup panic hook to ensure terminal cleanup on panic
    setup_panic_hook();

    let runtime = tokio::runtime::Runtime::new()?;
    let mut term_manager = TerminalManager::new()?;

    let mut app = App::new(Arc::clone(&backend), identity, config.credential(), settings);

    let result = runtime.block_on(async {
        app.start_session();
        let result = run_app(term_manager.terminal(), &mut app).await;
        backend.disconnect_user().await;
        result
    });

    term_manager.restore()?;
    if let Err(ref e) = result {
        error!("Application error: {:?}", e);
    }
    info!("chatstack exiting");
    result
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    // Create async event stream for keyboard input
    let mut event_stream = EventStream::new();

    // Take the message receiver from the app (we need ownership for select!)
    let mut message_rx: Option<mpsc::UnboundedReceiver<AppMessage>> = app.message_rx.take();

    let mut tick = tokio::time::interval(TICK_INTERVAL);

    loop {
        // Draw the UI only when needed
        if app.needs_redraw {
            terminal.draw(|f| ui::render(f, app))?;
            app.needs_redraw = false;
        }

        tokio::select! {
            _ = tick.tick() => {
                app.tick();
            }

            event_result = event_stream.next() => {
                match event_result {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if !app.handle_key(key) {
                            return Ok(());
                        }
                    }
                    Some(Ok(Event::Paste(text))) => app.handle_paste(&text),
                    Some(Ok(Event::Resize(_, _))) => app.mark_dirty(),
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e.into()),
                    // Input closed
                    None => return Ok(()),
                }
            }

            Some(msg) = async {
                match message_rx.as_mut() {
                    Some(rx) => rx.recv().await,
                    None => std::future::pending().await,
                }
            } => {
                app.handle_message(msg);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
