// ============================================================================
// CryptoCompare - Comparateur de prix avec paiement crypto
// ============================================================================
// Programme TUI : ticker de prix simulés, recherche de produits dans un
// catalogue fixe, modale de paiement avec compte à rebours
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle qui gère messages, rendering et clavier
// 3. Async dans sync : les timers tournent sur un runtime tokio
// 4. Channels : les timers parlent à l'event loop via mpsc
// ============================================================================

use std::io;
use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info};

use cryptocompare::app::App;
use cryptocompare::config::{validate_assets, Config};
use cryptocompare::input::handle_event;
use cryptocompare::models::default_assets;
use cryptocompare::scheduler::{AppMessage, Scheduler};
use cryptocompare::ui::{render, EventHandler};

// ============================================================================
// Initialisation du logging
// ============================================================================
// CONCEPT : Logging dans une app TUI
// - Les println! ne fonctionnent pas une fois le TUI lancé
// - On log vers un fichier à la place
// - Rotation quotidienne automatique des logs
// ============================================================================

/// Répertoire des logs
///
/// - Linux : ~/.local/share/cryptocompare/logs/
/// - macOS : ~/Library/Application Support/cryptocompare/logs/
/// - Sinon : ./logs
fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("cryptocompare").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Initialise le système de logging vers fichier
///
/// # Utilisation
/// ```bash
/// tail -f ~/.local/share/cryptocompare/logs/cryptocompare.log
/// RUST_LOG=cryptocompare=trace cargo run
/// ```
fn init_logging() -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir.clone(), "cryptocompare.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false) // Pas de codes couleur dans le fichier
                .with_target(true)
                .with_thread_ids(true) // Les timers tournent sur les threads tokio
                .with_line_number(true),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cryptocompare=debug,info".into()),
        )
        .init();

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    init_logging().unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {}", e);
        eprintln!("   Continuing without logging...");
    });

    info!("CryptoCompare starting up");

    // Configuration validée AVANT de passer le terminal en raw mode :
    // une erreur s'affiche normalement
    let config = Config::load()?;
    config.validate()?;
    validate_assets(&default_assets())?;
    info!(api_base = %config.api_base, "Configuration ready");

    // Runtime tokio pour les timers
    // CONCEPT RUST : Ordre de drop
    // - runtime est déclaré en premier, il est donc détruit en dernier
    // - les TimerHandle de App sont annulés avant l'arrêt du runtime
    let runtime = tokio::runtime::Runtime::new().context("Échec de la création du runtime tokio")?;
    let (message_tx, message_rx) = mpsc::channel::<AppMessage>();
    let scheduler = Scheduler::new(runtime.handle().clone(), message_tx);

    let mut app = App::new(config, scheduler);
    app.start();

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, &message_rx);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Event loop
// ============================================================================
// À chaque itération :
// 0. MESSAGES : applique les messages des timers (ticker, délais...)
// 1. RENDER : dessine l'interface
// 2. INPUT : attend un événement clavier (timeout = tick)
// ============================================================================

/// Exécute la boucle principale de l'application
///
/// Toutes les mutations de App se font ici, sur un seul thread : les timers
/// ne font qu'envoyer des messages.
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    messages: &mpsc::Receiver<AppMessage>,
) -> Result<()> {
    while app.is_running() {
        // CONCEPT : Non-blocking receive avec try_iter
        // - draine tous les messages en attente sans bloquer
        for message in messages.try_iter() {
            app.handle_message(message);
        }

        terminal.draw(|frame| render(frame, app))?;

        let event = events.next()?;
        handle_event(app, event);
    }

    Ok(())
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================
// IMPORTANT : Toujours restaurer le terminal avant de quitter !
// ============================================================================

/// Configure le terminal en mode TUI
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| e.into())
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;

    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;

    terminal.show_cursor()?;

    Ok(())
}
