// # yadocheckd - availability checker daemon
//
// Thin integration layer over yadocheck-core: reads configuration from
// environment variables, wires the registry, engine, dispatcher and
// notifier together, and runs the check loop. All availability and
// cooldown logic lives in the core crates.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Query
// - `YADO_CHECK_IN`: Check-in date, `YYYY-MM-DD` (required)
// - `YADO_NIGHTS`: Number of nights (default 1)
// - `YADO_GUESTS`: Number of guests (default 2)
// - `YADO_PROPERTIES`: `all` or comma-separated property names
//   (miyakowasure, miyamaso/takamiya; default all)
// - `YADO_ROOMS`: Comma-separated room aliases to restrict the check
//   (e.g. `sakura,vip,rian`; default all rooms)
//
// ### Scheduling
// - `YADO_INTERVAL_MINS`: Minutes between checks (default 30, min 15)
// - `YADO_COOLDOWN_HOURS`: Alert cooldown per room+stay (default 24)
// - `YADO_CHECK_TIMEOUT_SECS`: Per-property deadline (default 120)
// - `YADO_ONCE`: Set to `1`/`true` to run a single check and exit
//
// ### Infrastructure
// - `YADO_STATE_DIR`: Directory for notification state files (default .yadocheck)
// - `YADO_NTFY_TOPIC`: ntfy.sh topic for alerts (optional; alerts are
//   logged only when unset)
// - `YADO_HEADLESS`: Run Chrome headless (default true)
// - `YADO_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export YADO_CHECK_IN=2026-03-15
// export YADO_GUESTS=2
// export YADO_ROOMS=rian,hinakura
// export YADO_NTFY_TOPIC=my-ryokan-alerts
//
// yadocheckd
// ```

use std::collections::HashMap;
use std::env;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

use yadocheck_core::{
    AvailabilityEngine, CheckConfig, CheckResult, DispatchCoordinator, FileNotificationStore,
    PropertyConfig, PropertyId, PropertyRegistry,
};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// Codes 3 and 4 only occur in single-shot mode (`YADO_ONCE`), where the
/// scrape outcome matters to calling scripts:
/// - 0: Clean shutdown / all properties checked
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
/// - 3: Some properties failed to check
/// - 4: Every property failed to check
#[derive(Debug, Clone, Copy)]
enum YadoExitCode {
    CleanShutdown = 0,
    ConfigError = 1,
    RuntimeError = 2,
    PartialFailure = 3,
    TotalFailure = 4,
}

impl From<YadoExitCode> for ExitCode {
    fn from(code: YadoExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Raw environment configuration
struct EnvConfig {
    check_in: String,
    nights: Option<String>,
    guests: Option<String>,
    properties: Option<String>,
    rooms: Option<String>,
    interval_mins: Option<String>,
    cooldown_hours: Option<String>,
    check_timeout_secs: Option<String>,
    once: bool,
    state_dir: Option<String>,
    ntfy_topic: Option<String>,
    headless: bool,
    log_level: String,
}

impl EnvConfig {
    fn from_env() -> Result<Self> {
        Ok(Self {
            check_in: env::var("YADO_CHECK_IN").context(
                "YADO_CHECK_IN is required. Set it via: export YADO_CHECK_IN=2026-03-15",
            )?,
            nights: env::var("YADO_NIGHTS").ok(),
            guests: env::var("YADO_GUESTS").ok(),
            properties: env::var("YADO_PROPERTIES").ok(),
            rooms: env::var("YADO_ROOMS").ok(),
            interval_mins: env::var("YADO_INTERVAL_MINS").ok(),
            cooldown_hours: env::var("YADO_COOLDOWN_HOURS").ok(),
            check_timeout_secs: env::var("YADO_CHECK_TIMEOUT_SECS").ok(),
            once: env::var("YADO_ONCE")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            state_dir: env::var("YADO_STATE_DIR").ok(),
            ntfy_topic: env::var("YADO_NTFY_TOPIC").ok().filter(|t| !t.is_empty()),
            headless: env::var("YADO_HEADLESS")
                .map(|v| !matches!(v.to_lowercase().as_str(), "0" | "false" | "no"))
                .unwrap_or(true),
            log_level: env::var("YADO_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Resolve the environment into a validated check configuration
    fn resolve(&self) -> Result<CheckConfig> {
        let check_in: NaiveDate = self.check_in.parse().with_context(|| {
            format!(
                "YADO_CHECK_IN '{}' is not a valid date. Expected YYYY-MM-DD, e.g. 2026-03-15",
                self.check_in
            )
        })?;

        let mut config = CheckConfig::new(check_in);

        if let Some(ref nights) = self.nights {
            config.nights = nights
                .parse()
                .with_context(|| format!("YADO_NIGHTS '{nights}' is not a number"))?;
        }
        if let Some(ref guests) = self.guests {
            config.guests = guests
                .parse()
                .with_context(|| format!("YADO_GUESTS '{guests}' is not a number"))?;
        }
        if let Some(ref mins) = self.interval_mins {
            config.interval_mins = mins
                .parse()
                .with_context(|| format!("YADO_INTERVAL_MINS '{mins}' is not a number"))?;
        }
        if let Some(ref hours) = self.cooldown_hours {
            config.cooldown_hours = hours
                .parse()
                .with_context(|| format!("YADO_COOLDOWN_HOURS '{hours}' is not a number"))?;
        }
        if let Some(ref secs) = self.check_timeout_secs {
            config.check_timeout_secs = secs
                .parse()
                .with_context(|| format!("YADO_CHECK_TIMEOUT_SECS '{secs}' is not a number"))?;
        }
        if let Some(ref dir) = self.state_dir {
            config.state_dir = dir.clone();
        }
        config.headless = self.headless;
        config.properties = self.parse_properties()?;
        config.room_filter = self.parse_room_filter()?;

        // Validate log level early so a typo fails before anything runs
        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => anyhow::bail!(
                "YADO_LOG_LEVEL '{other}' is not valid. Valid levels: trace, debug, info, warn, error"
            ),
        }

        config.validate()?;
        Ok(config)
    }

    fn parse_properties(&self) -> Result<Vec<PropertyId>> {
        let Some(ref raw) = self.properties else {
            return Ok(Vec::new());
        };
        if raw.trim().eq_ignore_ascii_case("all") || raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut properties = Vec::new();
        for name in raw.split(',') {
            let property = PropertyId::parse(name).with_context(|| {
                format!(
                    "YADO_PROPERTIES entry '{}' is not a known property. \
                    Known: miyakowasure, miyamaso (alias: takamiya)",
                    name.trim()
                )
            })?;
            if !properties.contains(&property) {
                properties.push(property);
            }
        }
        Ok(properties)
    }

    /// Resolve room aliases against both properties' catalogs
    ///
    /// Each alias must resolve somewhere; an alias no property knows is a
    /// configuration error rather than a silently empty filter.
    fn parse_room_filter(&self) -> Result<HashMap<PropertyId, Vec<String>>> {
        let Some(ref raw) = self.rooms else {
            return Ok(HashMap::new());
        };

        let mut filter: HashMap<PropertyId, Vec<String>> = HashMap::new();
        for alias in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let yadosys = yadocheck_scraper_yadosys::rooms::resolve_alias(alias);
            let ban = yadocheck_scraper_ban::rooms::resolve_alias(alias);

            if yadosys.is_empty() && ban.is_empty() {
                anyhow::bail!(
                    "YADO_ROOMS entry '{alias}' is not a known room alias. \
                    Examples: sakura, vip, momiji-river, hinakura, rian"
                );
            }
            for id in yadosys {
                filter
                    .entry(PropertyId::Miyakowasure)
                    .or_default()
                    .push(id.to_string());
            }
            for id in ban {
                filter
                    .entry(PropertyId::Miyamaso)
                    .or_default()
                    .push(id.to_string());
            }
        }
        Ok(filter)
    }
}

fn main() -> ExitCode {
    let env_config = match EnvConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e:#}");
            return YadoExitCode::ConfigError.into();
        }
    };

    let config = match env_config.resolve() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration validation error: {e:#}");
            return YadoExitCode::ConfigError.into();
        }
    };

    let log_level = match env_config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
        return YadoExitCode::ConfigError.into();
    }

    info!("Starting yadocheckd");
    info!(
        check_in = %config.check_in,
        nights = config.nights,
        guests = config.guests,
        once = env_config.once,
        "configuration loaded"
    );

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {e}");
            return YadoExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run_daemon(config, env_config.once, env_config.ntfy_topic).await {
            Ok(code) => code,
            Err(e) => {
                error!("Daemon error: {e:#}");
                YadoExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Build the property registry over one shared page driver
async fn build_registry(headless: bool) -> Result<Arc<PropertyRegistry>> {
    let driver: Arc<dyn yadocheck_core::PageDriver> =
        Arc::new(yadocheck_browser_chrome::ChromeDriver::new(headless).await?);

    let mut registry = PropertyRegistry::new();
    registry.register(PropertyConfig {
        property: PropertyId::Miyakowasure,
        base_url: yadocheck_scraper_yadosys::PLAN_LIST_URL.to_string(),
        booking_url_template: yadocheck_scraper_yadosys::PLAN_LIST_URL.to_string(),
        rooms: yadocheck_scraper_yadosys::rooms::catalog(),
        scraper: Arc::new(yadocheck_scraper_yadosys::YadosysScraper::new(
            Arc::clone(&driver),
        )),
    });
    registry.register(PropertyConfig {
        property: PropertyId::Miyamaso,
        base_url: yadocheck_scraper_ban::BASE_URL.to_string(),
        booking_url_template: format!(
            "{}/plan/room/{{room_id}}/stay?date={{date}}&roomCount=1",
            yadocheck_scraper_ban::BASE_URL
        ),
        rooms: yadocheck_scraper_ban::rooms::catalog(),
        scraper: Arc::new(yadocheck_scraper_ban::BanScraper::new(driver)),
    });
    Ok(Arc::new(registry))
}

async fn run_daemon(
    config: CheckConfig,
    once: bool,
    ntfy_topic: Option<String>,
) -> Result<YadoExitCode> {
    let registry = build_registry(config.headless).await?;
    let store = Arc::new(FileNotificationStore::new(&config.state_dir).await?);

    let engine = AvailabilityEngine::with_timeout(Arc::clone(&registry), config.check_timeout());
    let coordinator =
        DispatchCoordinator::with_cooldown(Arc::clone(&registry), store, config.cooldown());

    let notifier: Option<yadocheck_notify_ntfy::NtfyNotifier> = match ntfy_topic {
        Some(topic) => {
            info!(topic = %topic, "alerts will be published via ntfy.sh");
            Some(yadocheck_notify_ntfy::NtfyNotifier::new(topic)?)
        }
        None => {
            warn!("YADO_NTFY_TOPIC not set; alerts will only be logged");
            None
        }
    };

    let properties = config.properties_or_all();
    let query = config.query();

    // Capacity problems are worth knowing about before the first cycle
    for &property in &properties {
        for warning in registry.guest_capacity_warnings(property, &query) {
            warn!(property = %property, "{warning}");
        }
    }

    if once {
        let results = engine.check(&properties, &query).await?;
        deliver(&coordinator, notifier.as_ref(), &results).await;
        return Ok(outcome_code(&results));
    }

    let mut shutdown = Shutdown::new()?;
    loop {
        match engine.check(&properties, &query).await {
            Ok(results) => deliver(&coordinator, notifier.as_ref(), &results).await,
            // Registry and query were validated at startup; a config error
            // mid-loop means the process arguments are stale
            Err(e) => return Err(e.into()),
        }

        info!(minutes = config.interval_mins, "sleeping until next check");
        tokio::select! {
            _ = tokio::time::sleep(config.interval()) => {}
            signal = shutdown.recv() => {
                info!("Received shutdown signal: {signal}");
                return Ok(YadoExitCode::CleanShutdown);
            }
        }
    }
}

/// Log results, dispatch them, and push alerts through the notifier
async fn deliver(
    coordinator: &DispatchCoordinator,
    notifier: Option<&yadocheck_notify_ntfy::NtfyNotifier>,
    results: &[CheckResult],
) {
    for result in results {
        match &result.error {
            Some(failure) => warn!(property = %result.property, error = %failure, "check failed"),
            None => {
                for room in &result.rooms {
                    info!(
                        property = %result.property,
                        room = %room.room.name,
                        available = room.available,
                        price = room.price_per_person,
                        "room status"
                    );
                }
            }
        }
    }

    for event in coordinator.dispatch(results).await {
        info!(
            property = %event.property,
            room = %event.room.name,
            url = %event.booking_url,
            "room available"
        );
        if let Some(notifier) = notifier {
            // The cooldown is already recorded; a delivery failure means
            // this alert is lost until the window expires
            if let Err(e) = yadocheck_core::Notifier::notify(notifier, &event).await {
                warn!(room = %event.room.id, error = %e, "alert delivery failed");
            }
        }
    }
}

/// Single-shot exit code from the batch outcome
fn outcome_code(results: &[CheckResult]) -> YadoExitCode {
    let failed = results.iter().filter(|r| !r.succeeded()).count();
    if failed == 0 {
        YadoExitCode::CleanShutdown
    } else if failed == results.len() {
        YadoExitCode::TotalFailure
    } else {
        YadoExitCode::PartialFailure
    }
}

/// Shutdown signal listener (SIGTERM, SIGINT)
#[cfg(unix)]
struct Shutdown {
    sigterm: tokio::signal::unix::Signal,
    sigint: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl Shutdown {
    fn new() -> Result<Self> {
        Ok(Self {
            sigterm: signal(SignalKind::terminate())
                .context("Failed to setup SIGTERM handler")?,
            sigint: signal(SignalKind::interrupt()).context("Failed to setup SIGINT handler")?,
        })
    }

    async fn recv(&mut self) -> &'static str {
        tokio::select! {
            _ = self.sigterm.recv() => "SIGTERM",
            _ = self.sigint.recv() => "SIGINT",
        }
    }
}

/// Fallback shutdown listener for non-Unix platforms (CTRL-C only)
#[cfg(not(unix))]
struct Shutdown;

#[cfg(not(unix))]
impl Shutdown {
    fn new() -> Result<Self> {
        Ok(Self)
    }

    async fn recv(&mut self) -> &'static str {
        let _ = tokio::signal::ctrl_c().await;
        "SIGINT"
    }
}
