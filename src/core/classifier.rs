//! 协议分类模块
//!
//! 无条件运行全部探测器，并执行歧义拒绝策略：
//! 恰好一个探测器匹配时才给出协议，零个或多个匹配均视为无法识别。

use crate::core::detector::{ConfigDetector, DetectionOutcome};
use crate::core::protocol::ProtocolKind;
use crate::probe::{Ikev2Detector, OpenVpnDetector, WireGuardDetector};
use crate::{vpn_debug, vpn_detect};
use serde::{Deserialize, Serialize};

/// 探测器执行顺序：WireGuard 的结构特征最独特，最先执行
static DETECTORS: [&dyn ConfigDetector; 3] = [&WireGuardDetector, &Ikev2Detector, &OpenVpnDetector];

/// 分类状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClassificationStatus {
    /// 恰好一个探测器匹配
    Identified,
    /// 没有探测器匹配
    NoMatch,
    /// 多个探测器匹配
    Ambiguous,
}

/// 分类报告
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationReport {
    /// 最终协议，未识别时为 `Unknown`
    pub kind: ProtocolKind,
    /// 分类状态
    pub status: ClassificationStatus,
    /// 各探测器结果，按执行顺序
    pub outcomes: Vec<DetectionOutcome>,
}

impl ClassificationReport {
    /// 匹配的协议列表
    pub fn matched_protocols(&self) -> Vec<ProtocolKind> {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.matched)
            .map(|outcome| outcome.kind)
            .collect()
    }

    /// 获取指定协议的探测结果
    pub fn outcome(&self, kind: ProtocolKind) -> Option<&DetectionOutcome> {
        self.outcomes.iter().find(|outcome| outcome.kind == kind)
    }

    /// 是否成功识别
    pub fn is_identified(&self) -> bool {
        self.status == ClassificationStatus::Identified
    }
}

/// 协议分类器
#[derive(Debug, Clone, Copy, Default)]
pub struct Classifier;

impl Classifier {
    /// 创建分类器
    pub fn new() -> Self {
        Self
    }

    /// 分类文本，返回识别出的协议
    pub fn classify(&self, text: &str) -> ProtocolKind {
        self.report(text).kind
    }

    /// 分类文本，返回完整报告
    pub fn report(&self, text: &str) -> ClassificationReport {
        evaluate_all(&DETECTORS, text)
    }
}

/// 依次运行探测器并应用歧义拒绝策略
fn evaluate_all(detectors: &[&dyn ConfigDetector], text: &str) -> ClassificationReport {
    let outcomes: Vec<DetectionOutcome> = detectors
        .iter()
        .map(|detector| {
            let outcome = detector.evaluate(text);
            vpn_detect!(
                "{}: matched={} score={} verdict={:?}",
                detector.name(),
                outcome.matched,
                outcome.score,
                outcome.verdict
            );
            outcome
        })
        .collect();

    let matched: Vec<ProtocolKind> = outcomes
        .iter()
        .filter(|outcome| outcome.matched)
        .map(|outcome| outcome.kind)
        .collect();

    let (kind, status) = match matched.as_slice() {
        [] => {
            vpn_debug!("no detector matched the configuration");
            (ProtocolKind::Unknown, ClassificationStatus::NoMatch)
        }
        [single] => (*single, ClassificationStatus::Identified),
        several => {
            vpn_debug!("ambiguous configuration rejected, matched: {:?}", several);
            (ProtocolKind::Unknown, ClassificationStatus::Ambiguous)
        }
    };

    ClassificationReport {
        kind,
        status,
        outcomes,
    }
}
