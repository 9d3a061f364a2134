//! 错误处理模块
//!
//! 定义配置导入引擎使用的所有错误类型。

use crate::core::protocol::ProtocolKind;
use std::fmt;
use thiserror::Error;

/// 导入引擎的结果类型
pub type Result<T> = std::result::Result<T, ImportError>;

/// 导入错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    /// 输入内容为空
    #[error("Configuration content is empty")]
    EmptyContent,

    /// 输入内容超过大小限制
    #[error("Configuration content too large: {size} bytes exceeds limit of {limit} bytes")]
    ContentTooLarge {
        /// 实际大小
        size: usize,
        /// 限制
        limit: usize,
    },

    /// 协议识别失败（无匹配或多个匹配）
    #[error("Unable to identify VPN protocol from configuration")]
    ProtocolIdentificationFailed,

    /// 没有注册对应的提取器
    #[error("Unsupported protocol: {protocol}")]
    UnsupportedProtocol {
        /// 协议
        protocol: ProtocolKind,
    },

    /// 提取失败
    #[error("Failed to parse {protocol} configuration: {reason}")]
    ParsingFailed {
        /// 协议
        protocol: ProtocolKind,
        /// 失败原因
        reason: String,
    },

    /// 提取成功但配置数据缺失
    #[error("{protocol} extraction produced no usable profile data")]
    MissingProfileData {
        /// 协议
        protocol: ProtocolKind,
    },

    /// 配置错误
    #[error("Configuration error: {message}")]
    ConfigError {
        /// 错误消息
        message: String,
    },
}

/// 错误种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// EMPTY_CONTENT
    EmptyContent,
    /// CONTENT_TOO_LARGE
    ContentTooLarge,
    /// PROTOCOL_IDENTIFICATION_FAILED
    ProtocolIdentificationFailed,
    /// UNSUPPORTED_PROTOCOL
    UnsupportedProtocol,
    /// PARSING_FAILED
    ParsingFailed,
    /// MISSING_PROFILE_DATA
    MissingProfileData,
    /// CONFIGURATION_ERROR
    ConfigError,
}

impl ErrorKind {
    /// 获取错误种类名称
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyContent => "EMPTY_CONTENT",
            Self::ContentTooLarge => "CONTENT_TOO_LARGE",
            Self::ProtocolIdentificationFailed => "PROTOCOL_IDENTIFICATION_FAILED",
            Self::UnsupportedProtocol => "UNSUPPORTED_PROTOCOL",
            Self::ParsingFailed => "PARSING_FAILED",
            Self::MissingProfileData => "MISSING_PROFILE_DATA",
            Self::ConfigError => "CONFIGURATION_ERROR",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ImportError {
    /// 创建提取失败错误
    pub fn parsing_failed<S: Into<String>>(protocol: ProtocolKind, reason: S) -> Self {
        Self::ParsingFailed {
            protocol,
            reason: reason.into(),
        }
    }

    /// 创建不支持协议错误
    pub fn unsupported_protocol(protocol: ProtocolKind) -> Self {
        Self::UnsupportedProtocol { protocol }
    }

    /// 创建配置错误
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// 获取错误种类
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyContent => ErrorKind::EmptyContent,
            Self::ContentTooLarge { .. } => ErrorKind::ContentTooLarge,
            Self::ProtocolIdentificationFailed => ErrorKind::ProtocolIdentificationFailed,
            Self::UnsupportedProtocol { .. } => ErrorKind::UnsupportedProtocol,
            Self::ParsingFailed { .. } => ErrorKind::ParsingFailed,
            Self::MissingProfileData { .. } => ErrorKind::MissingProfileData,
            Self::ConfigError { .. } => ErrorKind::ConfigError,
        }
    }

    /// 获取出错时已识别的协议
    pub fn protocol(&self) -> Option<ProtocolKind> {
        match self {
            Self::UnsupportedProtocol { protocol }
            | Self::ParsingFailed { protocol, .. }
            | Self::MissingProfileData { protocol } => Some(*protocol),
            _ => None,
        }
    }

    /// 检查是否由输入内容本身导致
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyContent
                | Self::ContentTooLarge { .. }
                | Self::ProtocolIdentificationFailed
                | Self::ParsingFailed { .. }
        )
    }

    /// 检查是否为配置相关错误
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigError { .. } | Self::UnsupportedProtocol { .. }
        )
    }

    /// 获取错误代码
    pub fn error_code(&self) -> u32 {
        match self {
            Self::EmptyContent => 2001,
            Self::ContentTooLarge { .. } => 2002,
            Self::ProtocolIdentificationFailed => 2003,
            Self::UnsupportedProtocol { .. } => 2004,
            Self::ParsingFailed { .. } => 2005,
            Self::MissingProfileData { .. } => 2006,
            Self::ConfigError { .. } => 2008,
        }
    }
}

/// 从serde_json::Error转换
impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::config_error(format!("JSON error: {}", err))
    }
}

/// 提取器错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// 缺少必需字段
    #[error("missing required {field} in {section}")]
    MissingField {
        /// 字段名
        field: &'static str,
        /// 所在段落或指令
        section: &'static str,
    },

    /// 密钥为模板占位符
    #[error("{field} is a placeholder value ({value}); replace it with real key material")]
    PlaceholderKey {
        /// 字段名
        field: &'static str,
        /// 占位符
        value: String,
    },

    /// 端点无法解析
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// 原始端点
        endpoint: String,
        /// 原因
        reason: String,
    },

    /// 字段值无效
    #[error("invalid value '{value}' for {field}")]
    InvalidValue {
        /// 字段名
        field: &'static str,
        /// 原始值
        value: String,
    },
}

impl ExtractError {
    /// 创建缺少字段错误
    pub fn missing(field: &'static str, section: &'static str) -> Self {
        Self::MissingField { field, section }
    }

    /// 创建端点错误
    pub fn invalid_endpoint<S1, S2>(endpoint: S1, reason: S2) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Self::InvalidEndpoint {
            endpoint: endpoint.into(),
            reason: reason.into(),
        }
    }

    /// 创建字段值错误
    pub fn invalid_value<S: Into<String>>(field: &'static str, value: S) -> Self {
        Self::InvalidValue {
            field,
            value: value.into(),
        }
    }
}
