// # liveform - Terminal Sign-Up Form
//
// Thin front-end binary for the liveform validation engine.
// - No validation logic lives here; everything is in liveform-core
// - Configuration is via environment variables only
//
// The binary is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing the runtime and tracing
// 3. Wiring the stdin input source to the engine
// 4. Rendering the two outputs (inline error, submit state)
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Rules
// - `LIVEFORM_MIN_USERNAME_CHARS`: Minimum username length (default 3)
// - `LIVEFORM_MIN_PASSWORD_CHARS`: Minimum password length (default 6)
// - `LIVEFORM_REQUIRED_SYMBOLS`: Symbol set for the strength rule
//
// ### Debounce (milliseconds)
// - `LIVEFORM_DEBOUNCE_USERNAME_MS` (default 800)
// - `LIVEFORM_DEBOUNCE_STRENGTH_MS` (default 200)
// - `LIVEFORM_DEBOUNCE_EMPTY_MS` (default 800)
// - `LIVEFORM_DEBOUNCE_EQUAL_MS` (default 300)
//
// ### Engine
// - `LIVEFORM_EVENT_CHANNEL_CAPACITY`: Monitoring channel size
// - `LIVEFORM_LOG_LEVEL`: trace, debug, info, warn or error
//
// ## Example
//
// ```bash
// export LIVEFORM_LOG_LEVEL=debug
// liveform <<'EOF'
// user joe
// pass ab$123
// again ab$123
// EOF
// ```

use anyhow::Result;
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use liveform_core::{FormConfig, FormEngine};
use liveform_input_stdin::StdinInput;

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum AppExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<AppExitCode> for ExitCode {
    fn from(code: AppExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    min_username_chars: Option<usize>,
    min_password_chars: Option<usize>,
    required_symbols: Option<String>,
    debounce_username_ms: Option<u64>,
    debounce_strength_ms: Option<u64>,
    debounce_empty_ms: Option<u64>,
    debounce_equal_ms: Option<u64>,
    event_channel_capacity: Option<usize>,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Ok(Self {
            min_username_chars: parse_env("LIVEFORM_MIN_USERNAME_CHARS")?,
            min_password_chars: parse_env("LIVEFORM_MIN_PASSWORD_CHARS")?,
            required_symbols: env::var("LIVEFORM_REQUIRED_SYMBOLS").ok(),
            debounce_username_ms: parse_env("LIVEFORM_DEBOUNCE_USERNAME_MS")?,
            debounce_strength_ms: parse_env("LIVEFORM_DEBOUNCE_STRENGTH_MS")?,
            debounce_empty_ms: parse_env("LIVEFORM_DEBOUNCE_EMPTY_MS")?,
            debounce_equal_ms: parse_env("LIVEFORM_DEBOUNCE_EQUAL_MS")?,
            event_channel_capacity: parse_env("LIVEFORM_EVENT_CHANNEL_CAPACITY")?,
            log_level: env::var("LIVEFORM_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if let Some(chars) = self.min_username_chars
            && !(1..=128).contains(&chars)
        {
            anyhow::bail!(
                "LIVEFORM_MIN_USERNAME_CHARS must be between 1 and 128. Got: {}",
                chars
            );
        }

        if let Some(chars) = self.min_password_chars
            && !(1..=128).contains(&chars)
        {
            anyhow::bail!(
                "LIVEFORM_MIN_PASSWORD_CHARS must be between 1 and 128. Got: {}",
                chars
            );
        }

        if let Some(ref symbols) = self.required_symbols {
            if symbols.is_empty() {
                anyhow::bail!("LIVEFORM_REQUIRED_SYMBOLS cannot be empty");
            }
            if !symbols.is_ascii() {
                anyhow::bail!(
                    "LIVEFORM_REQUIRED_SYMBOLS must be ASCII. Got: {}",
                    symbols
                );
            }
        }

        for (name, value) in [
            ("LIVEFORM_DEBOUNCE_USERNAME_MS", self.debounce_username_ms),
            ("LIVEFORM_DEBOUNCE_STRENGTH_MS", self.debounce_strength_ms),
            ("LIVEFORM_DEBOUNCE_EMPTY_MS", self.debounce_empty_ms),
            ("LIVEFORM_DEBOUNCE_EQUAL_MS", self.debounce_equal_ms),
        ] {
            if let Some(ms) = value
                && ms > 10_000
            {
                anyhow::bail!(
                    "{} must be at most 10000 ms to keep the form responsive. Got: {}",
                    name,
                    ms
                );
            }
        }

        if let Some(capacity) = self.event_channel_capacity
            && !(1..=65_536).contains(&capacity)
        {
            anyhow::bail!(
                "LIVEFORM_EVENT_CHANNEL_CAPACITY must be between 1 and 65536. Got: {}",
                capacity
            );
        }

        // Validate log level
        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "LIVEFORM_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }

    /// Build the engine configuration, applying overrides over defaults
    fn to_form_config(&self) -> FormConfig {
        let mut config = FormConfig::default();

        if let Some(chars) = self.min_username_chars {
            config.rules.min_username_chars = chars;
        }
        if let Some(chars) = self.min_password_chars {
            config.rules.min_password_chars = chars;
        }
        if let Some(ref symbols) = self.required_symbols {
            config.rules.required_symbols = symbols.clone();
        }
        if let Some(ms) = self.debounce_username_ms {
            config.debounce.username_ms = ms;
        }
        if let Some(ms) = self.debounce_strength_ms {
            config.debounce.strength_ms = ms;
        }
        if let Some(ms) = self.debounce_empty_ms {
            config.debounce.empty_ms = ms;
        }
        if let Some(ms) = self.debounce_equal_ms {
            config.debounce.equal_ms = ms;
        }
        if let Some(capacity) = self.event_channel_capacity {
            config.engine.event_channel_capacity = capacity;
        }

        config
    }
}

/// Read and parse an optional numeric environment variable
fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("{} is not a valid number: {}", name, raw)),
        Err(_) => Ok(None),
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return AppExitCode::ConfigError.into();
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return AppExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return AppExitCode::ConfigError.into();
    }

    info!("Starting liveform");

    // Enter tokio runtime
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return AppExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_app(config).await {
            error!("Application error: {}", e);
            AppExitCode::RuntimeError
        } else {
            AppExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the application
async fn run_app(config: Config) -> Result<()> {
    let form_config = config.to_form_config();
    let input = StdinInput::new();
    let (engine, outputs, mut events) = FormEngine::new(Box::new(input), form_config)?;

    // Render task: mirror the two observable outputs to the terminal
    let mut error_rx = outputs.inline_error.clone();
    let mut valid_rx = outputs.is_valid.clone();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                changed = error_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let message = error_rx.borrow_and_update().clone();
                    if message.is_empty() {
                        println!("[form] password ok");
                    } else {
                        println!("[form] {}", message);
                    }
                }
                changed = valid_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let is_valid = *valid_rx.borrow_and_update();
                    println!(
                        "[form] submit {}",
                        if is_valid { "enabled" } else { "disabled" }
                    );
                }
            }
        }
    });

    // Drain monitoring events at debug level
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            tracing::debug!(?event, "engine event");
        }
    });

    info!("Edit commands: user <text> | pass <text> | again <text> | clear <field>");
    engine.run().await?;

    info!("Shutting down");
    Ok(())
}
