//! # VPN配置导入与协议分类引擎
//!
//! 接收用户提交的不可信VPN客户端配置文本，判定其所属方言（OpenVPN、IKEv2/IPsec、WireGuard），
//! 在无法判定或存在歧义时拒绝，并提取可用于建立隧道的规范化连接配置。
//!
//! ## 特性
//!
//! - **纯函数**: 无I/O、无共享可变状态，可任意并发调用
//! - **保守分类**: 同时像两种方言的配置直接拒绝，不做优先级裁决
//! - **结构化错误**: 每条失败路径都有明确的错误种类
//! - **可配置**: 按协议启用提取器、限制输入大小、注册自定义提取器
//!
//! ## 快速开始
//!
//! ```rust
//! let text = "client\ndev tun\nproto udp\nremote vpn.example.com 1194\npersist-key\n";
//! let profile = vpnconf_detector::import(text)?;
//! assert_eq!(profile.server, "vpn.example.com");
//! assert_eq!(profile.protocol, "OpenVPN (UDP)");
//! # Ok::<(), vpnconf_detector::ImportError>(())
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

// 核心模块
pub mod core;
pub mod error;

// 工具模块
pub mod utils;

// 功能模块
pub mod extract;
pub mod probe;

// 入口
pub mod builder;
pub mod importer;

#[doc(hidden)]
pub use log as __log;

// 重新导出核心类型
pub use crate::core::{
    classifier::{ClassificationReport, ClassificationStatus, Classifier},
    detector::{ConfigDetector, DetectionOutcome, DetectionVerdict},
    profile::{AuthMethod, ConnectionProfile},
    protocol::ProtocolKind,
};

pub use crate::builder::ImporterBuilder;
pub use crate::error::{ErrorKind, ExtractError, ImportError, Result};
pub use crate::extract::{ConfigExtractor, ExtractorRegistry};
pub use crate::importer::{ImportConfig, ImportManager};
pub use crate::probe::{Ikev2Detector, OpenVpnDetector, WireGuardDetector};

/// 使用默认管理器导入配置文本
pub fn import(text: &str) -> Result<ConnectionProfile> {
    ImportManager::new().import(text)
}

/// 分类配置文本
pub fn classify(text: &str) -> ProtocolKind {
    Classifier::new().classify(text)
}

/// 库版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 库名称
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// 库描述
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
