use chrono::Local;
use std::path::PathBuf;
use std::sync::Once;

static INIT: Once = Once::new();

/// Installs the global logger once per process; later calls are no-ops.
///
/// `IBAN_BOOK_LOG_LEVEL` (or `RUST_LOG`) picks the level. `IBAN_BOOK_LOG_DIR`
/// picks the log directory, `off`/`none`/empty disables the file sink.
/// With `console` off nothing is logged to stdout, so commands whose stdout
/// is their result (`format`, `validate`, `info`) stay pipe-friendly.
pub fn init_logging(app_name: &str, console: bool) -> Result<(), String> {
    let mut init_result: Result<(), String> = Ok(());
    INIT.call_once(|| {
        if let Err(err) = init_logging_inner(app_name, console) {
            init_result = Err(err);
        }
    });
    init_result
}

fn init_logging_inner(app_name: &str, console: bool) -> Result<(), String> {
    let level = parse_level(
        std::env::var("IBAN_BOOK_LOG_LEVEL")
            .or_else(|_| std::env::var("RUST_LOG"))
            .ok()
            .as_deref(),
    );
    let log_dir = resolve_log_dir(std::env::var("IBAN_BOOK_LOG_DIR").ok().as_deref());

    let mut dispatch = fern::Dispatch::new()
        .level(level)
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} | {:<5} | {} | {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        });

    if console {
        dispatch = dispatch.chain(std::io::stdout());
    }

    if let Some(dir) = log_dir {
        std::fs::create_dir_all(&dir).map_err(|err| err.to_string())?;
        let date = Local::now().format("%Y_%m_%d");
        let file_path = dir.join(format!("{app_name}-{date}.log"));
        dispatch = dispatch.chain(fern::log_file(file_path).map_err(|err| err.to_string())?);
    }

    dispatch.apply().map_err(|err| err.to_string())
}

fn parse_level(value: Option<&str>) -> log::LevelFilter {
    value
        .and_then(|level| level.parse::<log::LevelFilter>().ok())
        .unwrap_or(log::LevelFilter::Info)
}

fn resolve_log_dir(value: Option<&str>) -> Option<PathBuf> {
    match value {
        Some("off") | Some("none") | Some("") => None,
        Some(path) => Some(PathBuf::from(path)),
        None => Some(PathBuf::from("logs")),
    }
}
