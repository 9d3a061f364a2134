//! 导入管理模块
//!
//! 导入引擎唯一的公共入口：分类 → 对应提取器 → 结果校验 → 规范化配置或结构化错误。
//! 管理器不持有可变状态，可在多个线程中并发共享。

use crate::core::classifier::{ClassificationReport, ClassificationStatus, Classifier};
use crate::core::profile::ConnectionProfile;
use crate::core::protocol::ProtocolKind;
use crate::error::{ImportError, Result};
use crate::extract::ExtractorRegistry;
use crate::{vpn_debug, vpn_info, vpn_warn};

/// 默认输入大小上限（1 MiB）
pub const DEFAULT_MAX_CONTENT_SIZE: usize = 1024 * 1024;

/// 导入配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    /// 输入大小上限（字节），`None` 表示不限制
    pub max_content_size: Option<usize>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_content_size: Some(DEFAULT_MAX_CONTENT_SIZE),
        }
    }
}

/// 导入管理器
#[derive(Debug)]
pub struct ImportManager {
    classifier: Classifier,
    extractors: ExtractorRegistry,
    config: ImportConfig,
}

impl Default for ImportManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ImportManager {
    /// 创建使用默认配置和全部内置提取器的管理器
    pub fn new() -> Self {
        Self::with_parts(ImportConfig::default(), ExtractorRegistry::with_defaults())
    }

    /// 由配置和提取器注册表组装管理器
    pub fn with_parts(config: ImportConfig, extractors: ExtractorRegistry) -> Self {
        Self {
            classifier: Classifier::new(),
            extractors,
            config,
        }
    }

    /// 获取导入配置
    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// 可以提取的协议
    pub fn supported_protocols(&self) -> Vec<ProtocolKind> {
        self.extractors.protocols()
    }

    /// 仅分类，不提取
    pub fn classify(&self, text: &str) -> ClassificationReport {
        self.classifier.report(text)
    }

    /// 导入配置文本
    pub fn import(&self, text: &str) -> Result<ConnectionProfile> {
        if text.trim().is_empty() {
            vpn_debug!("import rejected: empty content");
            return Err(ImportError::EmptyContent);
        }

        if let Some(limit) = self.config.max_content_size {
            if text.len() > limit {
                vpn_warn!("import rejected: {} bytes exceeds limit of {} bytes", text.len(), limit);
                return Err(ImportError::ContentTooLarge {
                    size: text.len(),
                    limit,
                });
            }
        }

        let report = self.classifier.report(text);
        let protocol = match report.status {
            ClassificationStatus::Identified => report.kind,
            ClassificationStatus::Ambiguous => {
                vpn_info!(
                    "protocol identification failed: ambiguous match {:?}",
                    report.matched_protocols()
                );
                return Err(ImportError::ProtocolIdentificationFailed);
            }
            ClassificationStatus::NoMatch => {
                vpn_info!("protocol identification failed: no dialect matched");
                return Err(ImportError::ProtocolIdentificationFailed);
            }
        };

        let extractor = self.extractors.get(protocol).ok_or_else(|| {
            vpn_warn!("no extractor registered for {}", protocol);
            ImportError::unsupported_protocol(protocol)
        })?;

        let mut profile = extractor.extract(text).map_err(|err| {
            vpn_info!("{} rejected the configuration: {}", extractor.name(), err);
            ImportError::parsing_failed(protocol, err.to_string())
        })?;

        if !profile.has_payload() {
            vpn_warn!("{} returned an empty profile", extractor.name());
            return Err(ImportError::MissingProfileData { protocol });
        }

        profile.kind = protocol;
        vpn_info!(
            "imported {} profile '{}' ({}:{})",
            protocol,
            profile.name,
            profile.server,
            profile.port
        );

        Ok(profile)
    }
}
