//! Writes statistics with a configured prefix, casing and closing line.
//!
//! Until [`configure_statistic_logging`] has been called, statistics are emitted through
//! [`log::info!`] instead.

use std::fmt::Display;
use std::io::stdout;
use std::io::Write;
use std::sync::OnceLock;
use std::sync::RwLock;

use convert_case::Case;
use convert_case::Casing;
use log::debug;
use log::info;

/// How statistics are written: `{prefix} {name}={value}` lines, optionally followed by a closing
/// line after every block.
struct StatisticOptions {
    statistic_prefix: &'static str,
    after_statistics: Option<&'static str>,
    statistics_casing: Option<Case>,
    statistics_writer: Box<dyn Write + Send + Sync>,
}

static STATISTIC_OPTIONS: OnceLock<RwLock<StatisticOptions>> = OnceLock::new();

/// Configures the output of statistics. Only the first call has an effect.
///
/// Without a writer, statistics go to standard output.
pub fn configure_statistic_logging(
    prefix: &'static str,
    after: Option<&'static str>,
    casing: Option<Case>,
    writer: Option<Box<dyn Write + Send + Sync>>,
) {
    let _ = STATISTIC_OPTIONS.get_or_init(|| {
        RwLock::from(StatisticOptions {
            statistic_prefix: prefix,
            after_statistics: after,
            statistics_casing: casing,
            statistics_writer: writer.unwrap_or(Box::new(stdout())),
        })
    });
}

/// Logs the statistic `name` with value `value`.
pub fn log_statistic(name: impl Display, value: impl Display) {
    let Some(statistic_options_lock) = STATISTIC_OPTIONS.get() else {
        info!("{name}={value}");
        return;
    };
    if let Ok(mut statistic_options) = statistic_options_lock.write() {
        let name = if let Some(casing) = &statistic_options.statistics_casing {
            name.to_string().to_case(*casing)
        } else {
            name.to_string()
        };
        let prefix = statistic_options.statistic_prefix;
        if let Err(e) = writeln!(
            statistic_options.statistics_writer,
            "{prefix} {name}={value}"
        ) {
            debug!("Could not write statistic: {e}");
        }
    }
}

/// Writes the closing line of a block of statistics, if one is configured.
pub fn log_statistic_postfix() {
    if let Some(statistic_options_lock) = STATISTIC_OPTIONS.get() {
        if let Ok(mut statistic_options) = statistic_options_lock.write() {
            if let Some(post_fix) = statistic_options.after_statistics {
                if let Err(e) = writeln!(statistic_options.statistics_writer, "{post_fix}") {
                    debug!("Could not write statistic: {e}");
                }
            }
        }
    }
}
