//! OpenVPN 探测器

use super::{foreign_dialect, openvpn_gate};
use crate::core::detector::{ConfigDetector, DetectionOutcome, DetectionVerdict};
use crate::core::keywords::{has_inline_block, OPENVPN_KEYWORDS};
use crate::core::protocol::ProtocolKind;
use crate::vpn_trace;

/// 关键字命中阈值
const MIN_KEYWORD_HITS: usize = 3;

/// OpenVPN (.ovpn) 探测器
///
/// 在小写副本上判定：需要 `remote <host>` 与 `client`/`server` 模式，
/// 然后要求至少3个指令命中或存在内联证书/密钥块。
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenVpnDetector;

impl ConfigDetector for OpenVpnDetector {
    fn name(&self) -> &'static str {
        "OpenVpnDetector"
    }

    fn protocol(&self) -> ProtocolKind {
        ProtocolKind::OpenVPN
    }

    fn evaluate(&self, text: &str) -> DetectionOutcome {
        let lowered = text.to_lowercase();

        if !openvpn_gate(&lowered) {
            return DetectionOutcome::rejected(ProtocolKind::OpenVPN, 0, DetectionVerdict::GateMissing);
        }

        let matched = OPENVPN_KEYWORDS.matched(&lowered);
        let score = matched.len();
        vpn_trace!("OpenVPN keywords: {:?}", matched);

        if let Some(other) = foreign_dialect(text, &lowered, ProtocolKind::OpenVPN) {
            return DetectionOutcome::rejected(
                ProtocolKind::OpenVPN,
                score,
                DetectionVerdict::Excluded(other),
            );
        }

        if score >= MIN_KEYWORD_HITS || has_inline_block(&lowered) {
            DetectionOutcome::matched(ProtocolKind::OpenVPN, score)
        } else {
            DetectionOutcome::rejected(ProtocolKind::OpenVPN, score, DetectionVerdict::BelowThreshold)
        }
    }
}
