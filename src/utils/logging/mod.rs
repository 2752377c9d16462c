use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer};
use tracing_appender::non_blocking::{NonBlocking, NonBlockingBuilder, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::{format::FmtSpan, Layer as FmtLayer};
use tracing_subscriber::{prelude::*, registry::Registry, reload, EnvFilter};

mod combined;

use super::app_config::config;
use super::error::Result;

pub mod prelude {
    pub use tracing::{debug, error, info, trace, warn};
    pub use tracing::{debug_span, error_span, info_span, trace_span, warn_span};
    pub use tracing::{event, field::Empty, instrument, span};
}

/// Env var read for extra directives when `from_env = true`
const DEFAULT_ENV: &str = "RUST_LOG";

pub fn setup() -> Result<GlobalLoggingContext> {
    GlobalLoggingContext::new()
}

/// Owns the reload handle and the writer guards of the installed outputs.
///
/// Keep it alive in `main`, dropping it flushes whatever the non-blocking writers still hold.
pub struct GlobalLoggingContext {
    worker_guards: Vec<WorkerGuard>,
    reload_handle: reload::Handle<combined::Layer<Registry>, Registry>,
}

impl GlobalLoggingContext {
    /// Installs the subscriber with the built-in stderr output
    pub fn new() -> Result<Self> {
        let (layer, handle) = reload::Layer::new(combined::Layer::empty());
        Registry::default().with(layer).try_init()?;

        let mut ctx = GlobalLoggingContext {
            worker_guards: vec![],
            reload_handle: handle,
        };
        ctx.install(&LoggingConfig::default(), false)?;

        Ok(ctx)
    }

    /// Swap in the outputs of the `logging` config section.
    ///
    /// With `prints_report` set, terminal outputs that allow it move off stdout so logs don't
    /// interleave with the report.
    pub fn reconfigure(&mut self, prints_report: bool) -> Result<()> {
        let cfg: LoggingConfig = config().get("logging")?;
        self.install(&cfg, prints_report)
    }

    fn install(&mut self, cfg: &LoggingConfig, prints_report: bool) -> Result<()> {
        let (layers, guards): (Vec<_>, Vec<_>) = cfg
            .outputs
            .iter()
            .filter(|output| output.enabled)
            .map(|output| output.build(&cfg.filter, prints_report))
            .unzip();

        self.reload_handle.reload(combined::Layer::new(layers))?;
        // old guards drop here, after the new layers took over
        self.worker_guards = guards;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct LoggingConfig {
    #[serde(default)]
    filter: FilterConfig,
    #[serde(default)]
    outputs: Vec<LoggingOutput>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: Default::default(),
            outputs: vec![LoggingOutput {
                enabled: true,
                span_close: false,
                filter: FilterConfig::empty(),
                target: LoggingTarget::Term {
                    name: TermTarget::Stderr,
                    auto_switch: true,
                },
            }],
        }
    }
}

/// Directives in `EnvFilter` syntax, plus optionally the ones found in an env var
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct FilterConfig {
    #[serde(default)]
    directives: Option<String>,
    #[serde(default, deserialize_with = "env_var_name")]
    from_env: Option<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            directives: Some("warn".into()),
            from_env: Some(DEFAULT_ENV.into()),
        }
    }
}

impl FilterConfig {
    fn empty() -> Self {
        Self {
            directives: None,
            from_env: None,
        }
    }

    /// Fields left unset are taken from `global`
    fn or(&self, global: &FilterConfig) -> FilterConfig {
        Self {
            directives: self.directives.clone().or_else(|| global.directives.clone()),
            from_env: self.from_env.clone().or_else(|| global.from_env.clone()),
        }
    }

    fn to_env_filter(&self) -> EnvFilter {
        let base = self
            .from_env
            .as_ref()
            .map_or_else(EnvFilter::default, |var| EnvFilter::from_env(var));

        self.directives
            .iter()
            .flat_map(|dirs| dirs.split(','))
            .map(str::trim)
            .filter(|dir| !dir.is_empty())
            .fold(base, |filter, dir| match dir.parse() {
                Ok(d) => filter.add_directive(d),
                Err(err) => {
                    // the subscriber being configured is the one that would report this
                    eprintln!("ignoring log directive `{}`: {}", dir, err);
                    filter
                }
            })
    }
}

/// `true` means the default env var, `false` none, a string names the var
fn env_var_name<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum FromEnv {
        Flag(bool),
        Var(String),
    }

    Ok(match FromEnv::deserialize(deserializer)? {
        FromEnv::Flag(true) => Some(DEFAULT_ENV.into()),
        FromEnv::Flag(false) => None,
        FromEnv::Var(var) => Some(var),
    })
}

#[derive(Debug, Deserialize)]
struct LoggingOutput {
    enabled: bool,
    /// Log one line with the busy and idle time whenever a span closes
    #[serde(default)]
    span_close: bool,
    #[serde(default = "FilterConfig::empty")]
    filter: FilterConfig,
    target: LoggingTarget,
}

impl LoggingOutput {
    /// The output's own filter in front of its formatter
    fn build(&self, global: &FilterConfig, prints_report: bool) -> (combined::Layer<Registry>, WorkerGuard) {
        let (writer, guard) = self.target.writer(prints_report);
        let span_events = if self.span_close { FmtSpan::CLOSE } else { FmtSpan::NONE };

        let mut layer = combined::Layer::empty();
        layer.add(self.filter.or(global).to_env_filter());
        layer.add(
            FmtLayer::default()
                .with_ansi(self.target.is_term())
                .with_target(false)
                .with_span_events(span_events)
                .with_timer(LocalTime)
                .with_writer(writer),
        );

        (layer, guard)
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum LoggingTarget {
    Term {
        name: TermTarget,
        /// Use stderr instead of stdout while a report is printed
        #[serde(default)]
        auto_switch: bool,
    },
    File {
        directory: PathBuf,
        name: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TermTarget {
    Stdout,
    Stderr,
}

impl LoggingTarget {
    fn is_term(&self) -> bool {
        matches!(self, LoggingTarget::Term { .. })
    }

    fn writer(&self, prints_report: bool) -> (NonBlocking, WorkerGuard) {
        let builder = NonBlockingBuilder::default().lossy(false);
        match self {
            LoggingTarget::Term {
                name: TermTarget::Stdout,
                auto_switch,
            } if !(*auto_switch && prints_report) => builder.finish(std::io::stdout()),
            LoggingTarget::Term { .. } => builder.finish(std::io::stderr()),
            LoggingTarget::File { directory, name } => {
                builder.finish(RollingFileAppender::new(Rotation::NEVER, directory, name))
            }
        }
    }
}

/// Local wall clock with milliseconds
struct LocalTime;

impl FormatTime for LocalTime {
    fn format_time(&self, w: &mut dyn fmt::Write) -> fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}
