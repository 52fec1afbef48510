//! 로그 설정 모듈.
//!
//! [`configure`]로 최소 심각도와 출력 대상을 정해 [`LoggerHandle`]을 만들고,
//! [`attach`]로 registry에 등록해 다른 컴포넌트가 의존성으로 받게 한다.

use std::fmt;
use std::io::{self, IsTerminal, Write};
use std::sync::{Arc, Mutex, OnceLock};

use tracing::Dispatch;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::domain::severity::Severity;
use crate::error::StartupError;
use crate::infrastructure::registry::ServiceRegistry;

/// 로그 출력 대상.
#[derive(Debug, Clone)]
pub enum LogSink {
    Stdout,
    Stderr,
    /// 프로세스 내부 버퍼(임베딩/테스트용)
    Memory(MemorySink),
}

/// 공유 메모리 버퍼 로그 싱크.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 지금까지 기록된 전체 텍스트.
    pub fn contents(&self) -> String {
        match self.buffer.lock() {
            Ok(buffer) => String::from_utf8_lossy(&buffer).into_owned(),
            Err(_) => String::new(),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl<'a> MakeWriter<'a> for MemorySink {
    type Writer = MemoryWriter;

    fn make_writer(&'a self) -> Self::Writer {
        MemoryWriter {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

pub struct MemoryWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut buffer = self
            .buffer
            .lock()
            .map_err(|_| io::Error::other("log buffer poisoned"))?;
        buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// 첫 번째 출력 실패 사유를 보관하는 공유 상태.
#[derive(Debug, Clone, Default)]
struct SinkFailure(Arc<OnceLock<String>>);

impl SinkFailure {
    fn record(&self, err: &io::Error) {
        let _ = self.0.set(err.to_string());
    }

    fn reason(&self) -> Option<&str> {
        self.0.get().map(String::as_str)
    }
}

/// 쓰기 실패를 [`SinkFailure`]에 남기는 writer 래퍼.
/// `tracing-subscriber`는 쓰기 오류를 삼키므로 여기서 따로 기록한다.
struct Checked<M> {
    inner: M,
    failure: SinkFailure,
}

impl<'a, M: MakeWriter<'a>> MakeWriter<'a> for Checked<M> {
    type Writer = CheckedWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        CheckedWriter {
            inner: self.inner.make_writer(),
            failure: self.failure.clone(),
        }
    }
}

struct CheckedWriter<W> {
    inner: W,
    failure: SinkFailure,
}

impl<W: Write> Write for CheckedWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // 한 기록을 통째로 내보내 실패가 다음 기록으로 미뤄지지 않게 한다.
        match self.inner.write_all(buf).and_then(|()| self.inner.flush()) {
            Ok(()) => Ok(buf.len()),
            Err(err) => {
                self.failure.record(&err);
                Err(err)
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush().inspect_err(|err| self.failure.record(err))
    }
}

/// 설정이 끝난 로거 핸들. 복제해도 같은 dispatcher를 가리킨다.
#[derive(Clone)]
pub struct LoggerHandle {
    dispatch: Dispatch,
    minimum: Severity,
    failure: SinkFailure,
}

impl LoggerHandle {
    pub fn minimum_severity(&self) -> Severity {
        self.minimum
    }

    /// 이 핸들의 dispatcher를 기본값으로 두고 `f`를 실행한다.
    pub fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// 프로세스 전역 기본 dispatcher로 설치한다.
    pub fn install_global(&self) -> Result<(), StartupError> {
        tracing::dispatcher::set_global_default(self.dispatch.clone())
            .map_err(|e| StartupError::LoggingInit(format!("failed to set subscriber: {e}")))
    }

    /// 지금까지 출력 대상에 쓰기 실패가 있었다면 오류로 보고한다.
    pub fn check_sink(&self) -> Result<(), StartupError> {
        match self.failure.reason() {
            Some(reason) => Err(StartupError::LoggingInit(format!(
                "log sink write failed: {reason}"
            ))),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for LoggerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerHandle")
            .field("minimum", &self.minimum)
            .field("failure", &self.failure.reason())
            .finish_non_exhaustive()
    }
}

/// 최소 심각도 미만 기록을 걸러내는 로거를 구성한다.
pub fn configure(minimum: Severity, sink: LogSink) -> Result<LoggerHandle, StartupError> {
    match sink {
        LogSink::Stdout => {
            ensure_open(io::stdout(), "stdout")?;
            build_handle(minimum, io::stdout, io::stdout().is_terminal())
        }
        LogSink::Stderr => {
            ensure_open(io::stderr(), "stderr")?;
            build_handle(minimum, io::stderr, io::stderr().is_terminal())
        }
        LogSink::Memory(memory) => build_handle(minimum, memory, false),
    }
}

fn build_handle<M>(minimum: Severity, writer: M, ansi: bool) -> Result<LoggerHandle, StartupError>
where
    M: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_new(minimum.directive())
        .map_err(|e| StartupError::LoggingInit(format!("invalid log level '{minimum}': {e}")))?;

    let failure = SinkFailure::default();
    let writer = BoxMakeWriter::new(Checked {
        inner: writer,
        failure: failure.clone(),
    });

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .finish();

    Ok(LoggerHandle {
        dispatch: Dispatch::new(subscriber),
        minimum,
        failure,
    })
}

/// 로거 핸들을 registry에 등록해 의존성으로 해석 가능하게 한다.
pub fn attach(registry: &mut ServiceRegistry, handle: LoggerHandle) {
    registry.register_instance(handle);
}

// 닫힌 fd에 대한 쓰기는 std가 성공으로 처리하므로 복제로 유효성을 확인한다.
#[cfg(unix)]
fn ensure_open(stream: impl std::os::fd::AsFd, name: &str) -> Result<(), StartupError> {
    stream
        .as_fd()
        .try_clone_to_owned()
        .map(drop)
        .map_err(|e| StartupError::LoggingInit(format!("{name} is not available: {e}")))
}

#[cfg(not(unix))]
fn ensure_open<S>(_stream: S, _name: &str) -> Result<(), StartupError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::config::ConfigurationTree;
    use tracing::{debug, info, warn};

    #[test]
    fn memory_sink_collects_records_at_or_above_minimum() {
        let sink = MemorySink::new();
        let handle = configure(Severity::Information, LogSink::Memory(sink.clone())).unwrap();

        handle.in_scope(|| {
            debug!("skipped");
            info!("kept info");
            warn!("kept warning");
        });

        let lines = sink.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("kept info"));
        assert!(lines[1].contains("WARN"));
        assert!(!sink.contents().contains("skipped"));
    }

    #[test]
    fn verbose_minimum_lets_debug_through() {
        let sink = MemorySink::new();
        let handle = configure(Severity::Verbose, LogSink::Memory(sink.clone())).unwrap();

        handle.in_scope(|| debug!("detail"));
        assert!(sink.contents().contains("detail"));
        assert_eq!(handle.minimum_severity(), Severity::Verbose);
    }

    #[test]
    fn memory_sink_output_has_no_ansi_escapes() {
        let sink = MemorySink::new();
        let handle = configure(Severity::Information, LogSink::Memory(sink.clone())).unwrap();

        handle.in_scope(|| info!("plain"));
        assert!(!sink.contents().contains('\u{1b}'));
    }

    #[test]
    fn stderr_sink_configures() {
        let handle = configure(Severity::Error, LogSink::Stderr).unwrap();
        assert_eq!(handle.minimum_severity(), Severity::Error);
    }

    #[test]
    fn attached_handle_resolves_from_registry() {
        let handle = configure(Severity::Information, LogSink::Memory(MemorySink::new())).unwrap();
        let mut registry = ServiceRegistry::new(ConfigurationTree::new());
        attach(&mut registry, handle);

        let resolved = registry.build().resolve::<LoggerHandle>().unwrap();
        assert_eq!(resolved.minimum_severity(), Severity::Information);
    }

    struct FullWriter;

    impl Write for FullWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("no space left"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_write_is_reported_by_check_sink() {
        let handle = build_handle(Severity::Information, || FullWriter, false).unwrap();
        assert!(handle.check_sink().is_ok());

        handle.in_scope(|| info!("lost"));

        let err = handle.check_sink().unwrap_err();
        assert!(matches!(err, StartupError::LoggingInit(ref msg) if msg.contains("no space left")));
    }

    #[test]
    fn successful_writes_leave_sink_clean() {
        let sink = MemorySink::new();
        let handle = configure(Severity::Information, LogSink::Memory(sink.clone())).unwrap();

        handle.in_scope(|| info!("fine"));
        assert!(handle.check_sink().is_ok());
        assert!(sink.contents().contains("fine"));
    }
}
