use chrono::Local;
use log::LevelFilter;
use std::path::PathBuf;
use std::sync::Once;

static INIT: Once = Once::new();

const LEVEL_VAR: &str = "SALES_LOG_LEVEL";
const DIR_VAR: &str = "SALES_LOG_DIR";
const DEFAULT_LOG_DIR: &str = "logs";

/// Ceilings for dependency targets, applied on top of the run level. The HTTP
/// stack logs every connection and TLS handshake below `warn`.
const TARGET_LEVELS: &[(&str, LevelFilter)] = &[
    ("reqwest", LevelFilter::Warn),
    ("hyper_util", LevelFilter::Warn),
    ("rustls", LevelFilter::Warn),
];

/// Where and how verbosely a run logs, resolved from the environment.
#[derive(Debug, Clone, PartialEq)]
struct LogSettings {
    level: LevelFilter,
    /// `None` keeps logging on stdout only.
    dir: Option<PathBuf>,
}

impl LogSettings {
    fn from_env() -> Self {
        let level = std::env::var(LEVEL_VAR)
            .or_else(|_| std::env::var("RUST_LOG"))
            .ok();
        let dir = std::env::var(DIR_VAR).ok();
        Self::resolve(level.as_deref(), dir.as_deref())
    }

    fn resolve(level: Option<&str>, dir: Option<&str>) -> Self {
        let level = level
            .and_then(|value| value.trim().parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::Info);
        let dir = match dir.map(str::trim) {
            Some("off") | Some("none") | Some("") => None,
            Some(path) => Some(PathBuf::from(path)),
            None => Some(PathBuf::from(DEFAULT_LOG_DIR)),
        };
        Self { level, dir }
    }
}

/// Sets up stdout logging plus an optional dated log file.
///
/// `SALES_LOG_LEVEL` (or `RUST_LOG`) picks the level, `SALES_LOG_DIR` the file
/// directory; `off`, `none` or an empty value disables the file sink.
pub fn init_logging(app_name: &str) -> Result<(), String> {
    let mut init_result: Result<(), String> = Ok(());
    INIT.call_once(|| {
        if let Err(err) = init_logging_inner(app_name, &LogSettings::from_env()) {
            init_result = Err(err);
        }
    });
    init_result
}

fn init_logging_inner(app_name: &str, settings: &LogSettings) -> Result<(), String> {
    let mut dispatch = fern::Dispatch::new().level(settings.level);
    for (target, ceiling) in TARGET_LEVELS {
        dispatch = dispatch.level_for(*target, (*ceiling).min(settings.level));
    }

    let mut dispatch = dispatch
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} | {:<5} | {} | {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .chain(std::io::stdout());

    if let Some(dir) = &settings.dir {
        std::fs::create_dir_all(dir).map_err(|err| format!("{}: {err}", dir.display()))?;
        let date = Local::now().format("%Y_%m_%d");
        let file_path = dir.join(format!("{app_name}-{date}.log"));
        let file = fern::log_file(&file_path)
            .map_err(|err| format!("{}: {err}", file_path.display()))?;
        dispatch = dispatch.chain(file);
    }

    dispatch.apply().map_err(|err| err.to_string())
}

/// Progress line for the operator: logged when info logging is on, printed otherwise.
pub fn emit_info_line(message: &str) {
    if log::log_enabled!(log::Level::Info) {
        log::info!("{}", message);
    } else {
        println!("{message}");
    }
}
