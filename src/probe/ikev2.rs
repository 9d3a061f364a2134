//! IKEv2/IPsec 探测器

use super::{foreign_dialect, has_explicit_ikev2, ikev2_gate};
use crate::core::detector::{ConfigDetector, DetectionOutcome, DetectionVerdict};
use crate::core::keywords::IKEV2_KEYWORDS;
use crate::core::protocol::ProtocolKind;
use crate::vpn_trace;
use once_cell::sync::Lazy;
use regex::Regex;

static CONFIG_SETUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*config[ \t]+setup\b").expect("valid regex"));

static KEYEXCHANGE_IKEV1: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*keyexchange[ \t]*=[ \t]*(?:ikev1|ike)[ \t\r]*$").expect("valid regex")
});

/// 无显式声明时的关键字阈值
const MIN_KEYWORD_HITS: usize = 4;
/// 存在 `config setup` 时的关键字阈值
const MIN_KEYWORD_HITS_WITH_SETUP: usize = 2;

/// IKEv2 (strongSwan ipsec.conf) 探测器
///
/// 需要 `conn <name>` 段落；随后满足以下任一条件即匹配：
/// 显式 `keyexchange=ikev2`、至少4个参数命中、或 `config setup` 加至少2个参数命中。
#[derive(Debug, Clone, Copy, Default)]
pub struct Ikev2Detector;

impl ConfigDetector for Ikev2Detector {
    fn name(&self) -> &'static str {
        "Ikev2Detector"
    }

    fn protocol(&self) -> ProtocolKind {
        ProtocolKind::IKEv2
    }

    fn evaluate(&self, text: &str) -> DetectionOutcome {
        let lowered = text.to_lowercase();

        if !ikev2_gate(&lowered) {
            return DetectionOutcome::rejected(ProtocolKind::IKEv2, 0, DetectionVerdict::GateMissing);
        }

        let matched = IKEV2_KEYWORDS.matched(&lowered);
        let score = matched.len();
        vpn_trace!("IKEv2 keywords: {:?}", matched);

        if let Some(other) = foreign_dialect(text, &lowered, ProtocolKind::IKEv2) {
            return DetectionOutcome::rejected(ProtocolKind::IKEv2, score, DetectionVerdict::Excluded(other));
        }

        let explicit = has_explicit_ikev2(&lowered);
        if !explicit && KEYEXCHANGE_IKEV1.is_match(&lowered) {
            return DetectionOutcome::rejected(ProtocolKind::IKEv2, score, DetectionVerdict::Incompatible);
        }

        let config_setup = CONFIG_SETUP.is_match(&lowered);
        if explicit
            || score >= MIN_KEYWORD_HITS
            || (config_setup && score >= MIN_KEYWORD_HITS_WITH_SETUP)
        {
            DetectionOutcome::matched(ProtocolKind::IKEv2, score)
        } else {
            DetectionOutcome::rejected(ProtocolKind::IKEv2, score, DetectionVerdict::BelowThreshold)
        }
    }
}
