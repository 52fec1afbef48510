//! 애플리케이션 조립(composition root) 모듈.
//!
//! 설정 로딩 → registry 초기화 → 로거 구성 순서로 의존성을 조립한다.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::application::config::{
    ConfigurationTree, REPORTING_SECTION, ReportingServiceConfiguration,
};
use crate::application::ports::{ConfigSource, ReportingService};
use crate::application::usecases::report_config_value::ConfigValueReporter;
use crate::domain::severity::Severity;
use crate::error::StartupError;
use crate::infrastructure::config::{DEFAULT_SETTINGS_FILE, JsonFileConfigSource};
use crate::infrastructure::logging::{self, LogSink, LoggerHandle};
use crate::infrastructure::registry::{Resolver, ServiceRegistry};

/// 실행 시점 의존성을 한 곳에서 조립하는 컨테이너.
pub struct AppComposition {
    config_source: Box<dyn ConfigSource>,
    sink: LogSink,
    minimum: Severity,
    install_global: bool,
}

impl AppComposition {
    /// 작업 디렉터리의 `appsettings.json`을 읽고 stdout에 로그를 남기는 조합.
    pub fn console(base_path: impl Into<PathBuf>) -> Self {
        Self {
            config_source: Box::new(JsonFileConfigSource::new(base_path, DEFAULT_SETTINGS_FILE)),
            sink: LogSink::Stdout,
            minimum: Severity::Information,
            install_global: true,
        }
    }

    /// 설정 소스와 로그 싱크를 외부에서 주입한다. 전역 dispatcher는 건드리지 않는다.
    pub fn with_sink(config_source: Box<dyn ConfigSource>, sink: LogSink) -> Self {
        Self {
            config_source,
            sink,
            minimum: Severity::Information,
            install_global: false,
        }
    }

    pub fn with_minimum_severity(mut self, minimum: Severity) -> Self {
        self.minimum = minimum;
        self
    }

    /// 설정 트리를 로딩한다.
    pub fn configure(&self) -> Result<ConfigurationTree, StartupError> {
        self.config_source.load()
    }

    /// 보고 서비스와 타입 설정을 등록한 registry를 만든다.
    pub fn initialize(configuration: ConfigurationTree) -> Result<ServiceRegistry, StartupError> {
        let mut registry = ServiceRegistry::new(configuration);

        registry.register_singleton::<dyn ReportingService, _>(|resolver| {
            let configuration = resolver.resolve::<ReportingServiceConfiguration>()?;
            let logger = resolver.resolve::<LoggerHandle>()?;
            Ok(Arc::new(ConfigValueReporter::new(configuration, logger)) as Arc<dyn ReportingService>)
        });
        registry.bind_options::<ReportingServiceConfiguration>(REPORTING_SECTION)?;

        Ok(registry)
    }

    /// 로거를 구성해 registry에 연결한다.
    pub fn configure_logger(
        &self,
        registry: &mut ServiceRegistry,
    ) -> Result<LoggerHandle, StartupError> {
        let handle = logging::configure(self.minimum, self.sink.clone())?;
        if self.install_global {
            handle.install_global()?;
        }
        logging::attach(registry, handle.clone());
        Ok(handle)
    }

    /// 전체 조립을 마친 resolver를 반환한다.
    pub fn build(&self) -> Result<Resolver, StartupError> {
        let configuration = self.configure()?;
        let mut registry = Self::initialize(configuration)?;
        let logger = self.configure_logger(&mut registry)?;

        logger.in_scope(|| {
            debug!(
                keys = registry.configuration().len(),
                minimum = %logger.minimum_severity(),
                "services registered"
            )
        });
        Ok(registry.build())
    }

    /// 보고 서비스를 해석해 설정값을 로그로 남긴다.
    /// 출력 대상에 기록하지 못했다면 `LoggingInit`으로 실패한다.
    pub fn run(&self) -> Result<(), StartupError> {
        let resolver = self.build()?;
        resolver.resolve::<dyn ReportingService>()?.write_to_log();
        resolver.resolve::<LoggerHandle>()?.check_sink()
    }
}
