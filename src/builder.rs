//! 导入器构造器模块
//!
//! 提供流畅的链式API来构建和配置导入管理器。

use crate::core::protocol::ProtocolKind;
use crate::error::{ImportError, Result};
use crate::extract::{ConfigExtractor, ExtractorRegistry, Ikev2Extractor, OpenVpnExtractor, WireGuardExtractor};
use crate::importer::{ImportConfig, ImportManager};
use std::collections::HashSet;

/// 导入器构造器
///
/// 禁用某个协议只会移除其提取器；分类器仍然运行全部探测器，
/// 因此被禁用协议的配置会得到 `UNSUPPORTED_PROTOCOL`，而不会被误判为其他协议。
///
/// # 示例
///
/// ```rust
/// use vpnconf_detector::ImporterBuilder;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let importer = ImporterBuilder::new()
///     .enable_wireguard()
///     .enable_openvpn()
///     .with_max_content_size(64 * 1024)
///     .build()?;
/// # let _ = importer;
/// # Ok(())
/// # }
/// ```
pub struct ImporterBuilder {
    enabled_protocols: HashSet<ProtocolKind>,
    config: ImportConfig,
    custom_extractors: Vec<Box<dyn ConfigExtractor>>,
}

impl Default for ImporterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ImporterBuilder {
    /// 创建新的构造器（未启用任何协议）
    pub fn new() -> Self {
        Self {
            enabled_protocols: HashSet::new(),
            config: ImportConfig::default(),
            custom_extractors: Vec::new(),
        }
    }

    /// 启用OpenVPN提取
    pub fn enable_openvpn(mut self) -> Self {
        self.enabled_protocols.insert(ProtocolKind::OpenVPN);
        self
    }

    /// 启用IKEv2提取
    pub fn enable_ikev2(mut self) -> Self {
        self.enabled_protocols.insert(ProtocolKind::IKEv2);
        self
    }

    /// 启用WireGuard提取
    pub fn enable_wireguard(mut self) -> Self {
        self.enabled_protocols.insert(ProtocolKind::WireGuard);
        self
    }

    /// 启用所有支持的协议
    pub fn enable_all(mut self) -> Self {
        self.enabled_protocols.extend(ProtocolKind::all());
        self
    }

    /// 禁用OpenVPN提取
    pub fn disable_openvpn(mut self) -> Self {
        self.enabled_protocols.remove(&ProtocolKind::OpenVPN);
        self
    }

    /// 禁用IKEv2提取
    pub fn disable_ikev2(mut self) -> Self {
        self.enabled_protocols.remove(&ProtocolKind::IKEv2);
        self
    }

    /// 禁用WireGuard提取
    pub fn disable_wireguard(mut self) -> Self {
        self.enabled_protocols.remove(&ProtocolKind::WireGuard);
        self
    }

    /// 设置输入大小上限
    pub fn with_max_content_size(mut self, size: usize) -> Self {
        self.config.max_content_size = Some(size);
        self
    }

    /// 不限制输入大小
    pub fn unlimited_content(mut self) -> Self {
        self.config.max_content_size = None;
        self
    }

    /// 添加自定义提取器，替换同协议的内置提取器
    pub fn add_custom_extractor(mut self, extractor: Box<dyn ConfigExtractor>) -> Self {
        self.custom_extractors.push(extractor);
        self
    }

    /// 验证配置
    fn validate_config(&self) -> Result<()> {
        if self.enabled_protocols.is_empty() && self.custom_extractors.is_empty() {
            return Err(ImportError::config_error("at least one protocol must be enabled"));
        }

        if self.config.max_content_size == Some(0) {
            return Err(ImportError::config_error("max content size must be greater than 0"));
        }

        if self
            .custom_extractors
            .iter()
            .any(|extractor| !extractor.protocol().is_known())
        {
            return Err(ImportError::config_error(
                "custom extractors must target a known protocol",
            ));
        }

        Ok(())
    }

    /// 构建导入管理器
    pub fn build(self) -> Result<ImportManager> {
        self.validate_config()?;

        let mut registry = ExtractorRegistry::new();
        for protocol in &self.enabled_protocols {
            match protocol {
                ProtocolKind::OpenVPN => registry.register(Box::new(OpenVpnExtractor)),
                ProtocolKind::IKEv2 => registry.register(Box::new(Ikev2Extractor)),
                ProtocolKind::WireGuard => registry.register(Box::new(WireGuardExtractor)),
                ProtocolKind::Unknown => {}
            }
        }
        for extractor in self.custom_extractors {
            registry.register(extractor);
        }

        Ok(ImportManager::with_parts(self.config, registry))
    }
}
