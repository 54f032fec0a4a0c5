//! Counters of a search and their output.

mod statistic_logger;
mod statistic_logging;

use std::time::Duration;

pub use statistic_logger::StatisticLogger;
pub use statistic_logging::configure_statistic_logging;
pub use statistic_logging::log_statistic;
pub use statistic_logging::log_statistic_postfix;

/// The counters of one search, as reported by a backend which keeps them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStatistics {
    pub solutions: u64,
    pub nodes: u64,
    pub fails: u64,
    pub backtracks: u64,
    pub restarts: u64,
    pub time: Duration,
}

impl SearchStatistics {
    /// Logs every counter under the prefix of `logger`; the short form only logs the solutions,
    /// the nodes and the time.
    pub fn log(&self, logger: &StatisticLogger, short: bool) {
        logger.attach_to_prefix("solutions").log_statistic(self.solutions);
        logger.attach_to_prefix("nodes").log_statistic(self.nodes);
        if !short {
            logger.attach_to_prefix("fails").log_statistic(self.fails);
            logger
                .attach_to_prefix("backtracks")
                .log_statistic(self.backtracks);
            logger.attach_to_prefix("restarts").log_statistic(self.restarts);
        }
        logger
            .attach_to_prefix("time")
            .log_statistic(format!("{:.3}s", self.time.as_secs_f64()));
        log_statistic_postfix();
    }
}

pub(crate) fn log_search_statistics(model_name: &str, statistics: &SearchStatistics, short: bool) {
    statistics.log(&StatisticLogger::new(["search", model_name]), short);
}
