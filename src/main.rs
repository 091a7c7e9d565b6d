use std::io::{self, IsTerminal};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use queuewatch::app::{App, CycleOutcome};
use queuewatch::config::{Overrides, Settings};
use queuewatch::events;
use queuewatch::source::{ManagementApi, ManagementApiSource};
use queuewatch::ui::{self, Theme};

/// How long the watch loop waits for a key before re-checking the clock.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Parser, Debug)]
#[command(name = "queuewatch", version)]
#[command(about = "Live terminal dashboard for RabbitMQ queues via the management HTTP API")]
struct Args {
    /// Management API base URL [env: QUEUEWATCH_URL] [default: http://localhost:15672]
    #[arg(long, visible_alias = "host")]
    url: Option<String>,

    /// Management API user [env: QUEUEWATCH_USERNAME] [default: guest]
    #[arg(short, long)]
    username: Option<String>,

    /// Management API password [env: QUEUEWATCH_PASSWORD] [default: guest]
    #[arg(short, long)]
    password: Option<String>,

    /// Only show queues, consumers and connections of this vhost
    #[arg(long)]
    vhost: Option<String>,

    /// Refresh every N seconds; 0 renders once [default: 3]
    #[arg(short = 'w', long = "watch", value_name = "SECONDS")]
    interval: Option<u64>,

    /// Render a single frame and exit; wins over --watch
    #[arg(long)]
    once: bool,

    /// HTTP request timeout in seconds [default: 10]
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Number of events kept in memory [default: 10]
    #[arg(long)]
    event_capacity: Option<u64>,

    /// Number of events shown under RECENT ACTIVITY [default: 10]
    #[arg(long = "recent")]
    recent_events: Option<u64>,

    /// Ignore net changes of at most this many messages [default: 0]
    #[arg(long)]
    event_threshold: Option<u64>,

    /// Queue backlog that turns a card yellow [default: 1]
    #[arg(long = "backlog-warn")]
    backlog_warning: Option<u64>,

    /// Queue backlog that turns a card red [default: 1000]
    #[arg(long = "backlog-crit")]
    backlog_critical: Option<u64>,

    /// Stop after this many refresh cycles
    #[arg(short = 'n', long)]
    iterations: Option<u64>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            url: self.url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            vhost: self.vhost.clone(),
            interval: self.interval,
            once: self.once,
            timeout: self.timeout,
            event_capacity: self.event_capacity,
            recent_events: self.recent_events,
            event_threshold: self.event_threshold,
            backlog_warning: self.backlog_warning,
            backlog_critical: self.backlog_critical,
            iterations: self.iterations,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings::load(&args.overrides()).context("invalid configuration")?;
    let interval = settings.refresh_interval();

    init_tracing(interval.is_some());

    let api = ManagementApi::builder()
        .endpoint(settings.url.clone())
        .credentials(settings.username.clone(), settings.password.clone())
        .vhost(settings.vhost.clone())
        .timeout(settings.request_timeout())
        .build()
        .context("failed to build HTTP client")?;
    info!(endpoint = api.endpoint(), vhost = ?settings.vhost, "Polling management API");

    let source = ManagementApiSource::new(api).context("failed to start async runtime")?;
    let app = App::new(Box::new(source), &settings);

    match interval {
        None => run_once(app),
        Some(interval) => run_watch(app, interval),
    }
}

/// Log to stderr. Watch mode is silent unless RUST_LOG asks otherwise, since
/// log lines would tear the frame.
fn init_tracing(watch: bool) {
    let default = if watch { "off" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Fetch once, print one frame, exit.
fn run_once(app: App) -> Result<()> {
    let stdout = io::stdout();
    let styled = stdout.is_terminal();
    let mut app = if styled {
        app.with_theme(Theme::auto_detect())
    } else {
        app
    };

    let description = app.source_description().to_string();
    match app.refresh().with_context(|| format!("cannot poll {}", description))? {
        CycleOutcome::Updated => {}
        CycleOutcome::Skipped(err) => bail!("cannot poll {}: {}", description, err),
    }

    let mut out = stdout.lock();
    ui::output::write_lines(&mut out, &ui::frame_lines(&app), styled)?;
    Ok(())
}

/// Run the live dashboard on the alternate screen until quit.
fn run_watch(app: App, interval: Duration) -> Result<()> {
    let mut app = app.with_theme(Theme::auto_detect());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    let result = run_app(&mut terminal, &mut app, interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    println!("✅ Monitor stopped after {} cycles", app.cycles);
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    interval: Duration,
) -> Result<()> {
    app.refresh()?;
    let mut next_refresh = Instant::now() + interval;

    while app.running {
        terminal.draw(|frame| ui::draw(frame, app))?;

        if app.budget_exhausted() {
            break;
        }

        let wait = next_refresh
            .saturating_duration_since(Instant::now())
            .min(POLL_INTERVAL);
        if let Some(Event::Key(key)) = events::poll_event(wait)? {
            events::handle_key_event(app, key);
        }

        if app.running && (app.refresh_requested || Instant::now() >= next_refresh) {
            app.refresh()?;
            next_refresh = Instant::now() + interval;
        }
    }
    Ok(())
}
