//! 日志模块
//!
//! 库代码只依赖 `log` 门面；本模块提供统一的日志宏，以及基于 `env_logger` 的初始化配置。
//! 日志仅用于观测，不影响任何导入结果。

use std::io::Write;

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// 是否启用日志
    pub enabled: bool,
    /// 日志级别
    pub level: LogLevel,
    /// 是否显示时间戳
    pub show_timestamp: bool,
    /// 是否显示模块路径
    pub show_module: bool,
    /// 输出目标
    pub target: LogTarget,
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// 错误
    Error,
    /// 警告
    Warn,
    /// 信息
    Info,
    /// 调试
    Debug,
    /// 跟踪
    Trace,
}

/// 日志输出目标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    /// 标准输出
    Stdout,
    /// 标准错误
    Stderr,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: LogLevel::Info,
            show_timestamp: true,
            show_module: true,
            target: LogTarget::Stderr,
        }
    }
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// 初始化全局日志器
///
/// 全局日志器只能安装一次；重复调用返回错误而不是panic。
pub fn init_logger(config: LoggerConfig) -> Result<(), log::SetLoggerError> {
    let mut builder = env_logger::Builder::new();

    if config.enabled {
        builder.filter_level(config.level.into());
    } else {
        builder.filter_level(log::LevelFilter::Off);
    }

    builder.target(match config.target {
        LogTarget::Stdout => env_logger::Target::Stdout,
        LogTarget::Stderr => env_logger::Target::Stderr,
    });

    let show_timestamp = config.show_timestamp;
    let show_module = config.show_module;
    builder.format(move |buf, record| {
        if show_timestamp {
            write!(buf, "{} ", buf.timestamp_millis())?;
        }
        write!(buf, "{:<5} ", record.level())?;
        if show_module {
            write!(buf, "{} ", record.module_path().unwrap_or("-"))?;
        }
        writeln!(buf, "| {}", record.args())
    });

    builder.try_init()
}

/// 构建器模式的日志配置
#[derive(Debug, Default)]
pub struct LoggerConfigBuilder {
    config: LoggerConfig,
}

impl LoggerConfigBuilder {
    /// 创建新的配置构建器
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
        }
    }

    /// 设置是否启用日志
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    /// 设置日志级别
    pub fn level(mut self, level: LogLevel) -> Self {
        self.config.level = level;
        self
    }

    /// 设置是否显示时间戳
    pub fn show_timestamp(mut self, show: bool) -> Self {
        self.config.show_timestamp = show;
        self
    }

    /// 设置是否显示模块路径
    pub fn show_module(mut self, show: bool) -> Self {
        self.config.show_module = show;
        self
    }

    /// 设置输出目标
    pub fn target(mut self, target: LogTarget) -> Self {
        self.config.target = target;
        self
    }

    /// 构建配置
    pub fn build(self) -> LoggerConfig {
        self.config
    }

    /// 构建并初始化日志器
    pub fn init(self) -> Result<(), log::SetLoggerError> {
        init_logger(self.config)
    }
}

/// 创建禁用日志的配置
pub fn disabled_config() -> LoggerConfig {
    LoggerConfig {
        enabled: false,
        ..Default::default()
    }
}

/// 创建开发环境的日志配置
pub fn dev_config() -> LoggerConfig {
    LoggerConfigBuilder::new()
        .level(LogLevel::Trace)
        .show_timestamp(true)
        .show_module(true)
        .target(LogTarget::Stderr)
        .build()
}

/// 创建生产环境的日志配置
pub fn prod_config() -> LoggerConfig {
    LoggerConfigBuilder::new()
        .level(LogLevel::Info)
        .show_timestamp(true)
        .show_module(false)
        .target(LogTarget::Stdout)
        .build()
}

/// 探测日志
#[macro_export]
macro_rules! vpn_detect {
    ($($arg:tt)*) => {
        $crate::__log::trace!("🔍 DETECT: {}", format!($($arg)*))
    };
}

/// 提取日志
#[macro_export]
macro_rules! vpn_extract {
    ($($arg:tt)*) => {
        $crate::__log::debug!("📦 EXTRACT: {}", format!($($arg)*))
    };
}

/// 信息日志
#[macro_export]
macro_rules! vpn_info {
    ($($arg:tt)*) => {
        $crate::__log::info!($($arg)*)
    };
}

/// 调试日志
#[macro_export]
macro_rules! vpn_debug {
    ($($arg:tt)*) => {
        $crate::__log::debug!($($arg)*)
    };
}

/// 警告日志
#[macro_export]
macro_rules! vpn_warn {
    ($($arg:tt)*) => {
        $crate::__log::warn!($($arg)*)
    };
}

/// 跟踪日志
#[macro_export]
macro_rules! vpn_trace {
    ($($arg:tt)*) => {
        $crate::__log::trace!($($arg)*)
    };
}
