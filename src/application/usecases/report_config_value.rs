//! 바인딩된 설정값을 Information 로그 한 줄로 보고하는 서비스.

use std::sync::Arc;

use tracing::info;

use crate::application::config::ReportingServiceConfiguration;
use crate::application::ports::ReportingService;
use crate::domain::report::config_value_message;
use crate::infrastructure::logging::LoggerHandle;

/// `ReportingService` 기본 구현.
pub struct ConfigValueReporter {
    configuration: Arc<ReportingServiceConfiguration>,
    logger: Arc<LoggerHandle>,
}

impl ConfigValueReporter {
    pub fn new(
        configuration: Arc<ReportingServiceConfiguration>,
        logger: Arc<LoggerHandle>,
    ) -> Self {
        Self {
            configuration,
            logger,
        }
    }
}

impl ReportingService for ConfigValueReporter {
    fn write_to_log(&self) {
        let message = config_value_message(&self.configuration.config_value);
        self.logger.in_scope(|| info!("{message}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::severity::Severity;
    use crate::infrastructure::logging::{self, LogSink, MemorySink};

    fn reporter(value: &str, minimum: Severity) -> (ConfigValueReporter, MemorySink) {
        let sink = MemorySink::new();
        let logger = logging::configure(minimum, LogSink::Memory(sink.clone())).unwrap();
        let configuration = ReportingServiceConfiguration {
            config_value: value.to_string(),
        };
        (
            ConfigValueReporter::new(Arc::new(configuration), Arc::new(logger)),
            sink,
        )
    }

    #[test]
    fn writes_one_information_line() {
        let (service, sink) = reporter("hello", Severity::Information);
        service.write_to_log();

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("INFO"));
        assert!(lines[0].contains("Value from config file: hello"));
    }

    #[test]
    fn empty_value_is_still_reported() {
        let (service, sink) = reporter("", Severity::Information);
        service.write_to_log();

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].trim_end().ends_with("Value from config file:"));
    }

    #[test]
    fn filtered_out_above_information() {
        let (service, sink) = reporter("hidden", Severity::Warning);
        service.write_to_log();

        assert!(sink.lines().is_empty());
    }
}
