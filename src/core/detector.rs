//! 协议探测器核心接口
//!
//! 定义配置方言探测的核心trait和相关类型。

use crate::core::protocol::ProtocolKind;
use serde::{Deserialize, Serialize};

/// 单个探测器的判定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DetectionVerdict {
    /// 匹配
    Matched,
    /// 缺少方言的最小结构
    GateMissing,
    /// 含有其他方言的强特征而被排除
    Excluded(ProtocolKind),
    /// 结构存在但关键字不足
    BelowThreshold,
    /// 显式声明了不受支持的方言版本（如 `keyexchange=ikev1`）
    Incompatible,
}

/// 探测结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionOutcome {
    /// 探测的协议
    pub kind: ProtocolKind,
    /// 是否匹配
    pub matched: bool,
    /// 关键字命中数（置信信号）
    pub score: usize,
    /// 判定详情
    pub verdict: DetectionVerdict,
}

impl DetectionOutcome {
    /// 创建匹配结果
    pub fn matched(kind: ProtocolKind, score: usize) -> Self {
        Self {
            kind,
            matched: true,
            score,
            verdict: DetectionVerdict::Matched,
        }
    }

    /// 创建未匹配结果
    pub fn rejected(kind: ProtocolKind, score: usize, verdict: DetectionVerdict) -> Self {
        Self {
            kind,
            matched: false,
            score,
            verdict,
        }
    }
}

/// 配置方言探测器接口
///
/// 实现必须是纯函数：同一输入总是得到同一结果，且从不失败。
pub trait ConfigDetector: Send + Sync {
    /// 探测器名称
    fn name(&self) -> &'static str;

    /// 探测的协议
    fn protocol(&self) -> ProtocolKind;

    /// 评估文本并给出完整判定
    fn evaluate(&self, text: &str) -> DetectionOutcome;

    /// 检查文本是否属于该方言
    fn detect(&self, text: &str) -> bool {
        self.evaluate(text).matched
    }
}
