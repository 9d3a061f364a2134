//! WireGuard 探测器

use super::{foreign_dialect, has_wireguard_sections};
use crate::core::detector::{ConfigDetector, DetectionOutcome, DetectionVerdict};
use crate::core::keywords::WIREGUARD_KEYWORDS;
use crate::core::protocol::ProtocolKind;
use crate::extract::{line_value, section};
use crate::vpn_trace;

/// 总命中阈值（段落标题与参数合计）
const MIN_KEY_MATCHES: usize = 4;
/// 通过结构门槛时已命中的段落标题数
const SECTION_HEADERS: usize = 2;

/// WireGuard (wg-quick .conf) 探测器
///
/// 段落名和参数名区分大小写。需要 `[Interface]` 与 `[Peer]`，
/// 且 `PrivateKey` 形似密钥、存在 `Endpoint`、段落标题与参数合计至少4个命中。
#[derive(Debug, Clone, Copy, Default)]
pub struct WireGuardDetector;

/// 检查值是否形似密钥：非空且仅由base64字符及 `_`、`-` 组成
///
/// 模板占位符（如 `CLIENT_PRIVATE_KEY_HERE`）在此处视为形似密钥，由提取器拒绝。
pub(crate) fn is_key_shaped(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '/' | '=' | '_' | '-'))
}

impl ConfigDetector for WireGuardDetector {
    fn name(&self) -> &'static str {
        "WireGuardDetector"
    }

    fn protocol(&self) -> ProtocolKind {
        ProtocolKind::WireGuard
    }

    fn evaluate(&self, text: &str) -> DetectionOutcome {
        if !has_wireguard_sections(text) {
            return DetectionOutcome::rejected(ProtocolKind::WireGuard, 0, DetectionVerdict::GateMissing);
        }

        let matched = WIREGUARD_KEYWORDS.matched(text);
        let score = SECTION_HEADERS + matched.len();
        vpn_trace!("WireGuard keys: {:?}", matched);

        let lowered = text.to_lowercase();
        if let Some(other) = foreign_dialect(text, &lowered, ProtocolKind::WireGuard) {
            return DetectionOutcome::rejected(
                ProtocolKind::WireGuard,
                score,
                DetectionVerdict::Excluded(other),
            );
        }

        let private_key = section(text, "[Interface]")
            .map(|interface| line_value(interface, "PrivateKey"))
            .unwrap_or_default();
        let has_endpoint = WIREGUARD_KEYWORDS.contains(text, "Endpoint");

        if is_key_shaped(&private_key) && has_endpoint && score >= MIN_KEY_MATCHES {
            DetectionOutcome::matched(ProtocolKind::WireGuard, score)
        } else {
            DetectionOutcome::rejected(ProtocolKind::WireGuard, score, DetectionVerdict::BelowThreshold)
        }
    }
}
