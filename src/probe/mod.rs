//! 方言探测模块
//!
//! 三个相互独立的探测器，均采用“结构门槛 + 关键字计分 + 异方言排除”的判定流程。

pub mod ikev2;
pub mod openvpn;
pub mod wireguard;

pub use ikev2::Ikev2Detector;
pub use openvpn::OpenVpnDetector;
pub use wireguard::WireGuardDetector;

use crate::core::keywords::has_inline_block;
use crate::core::protocol::ProtocolKind;
use once_cell::sync::Lazy;
use regex::Regex;

/// `remote <host>` 指令（小写文本）
static OPENVPN_REMOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*remote[ \t]+\S+").expect("valid regex"));

/// 客户端/服务端模式指令（小写文本）
static OPENVPN_MODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:client|server|tls-client|tls-server)(?:\s|$)").expect("valid regex")
});

/// `cipher` 指令（小写文本）
static OPENVPN_CIPHER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*cipher[ \t]+\S+").expect("valid regex"));

/// `conn <name>` 段落（小写文本）
static IKEV2_CONN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*conn[ \t]+\S+").expect("valid regex"));

/// `keyexchange=ikev2`（小写文本）
static IKEV2_KEYEXCHANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*keyexchange[ \t]*=[ \t]*ikev2\b").expect("valid regex"));

/// 检查是否满足OpenVPN结构门槛：`remote` 指令且处于客户端或服务端模式
pub(crate) fn openvpn_gate(lowered: &str) -> bool {
    OPENVPN_REMOTE.is_match(lowered) && OPENVPN_MODE.is_match(lowered)
}

/// 检查OpenVPN强特征：`remote` 配合模式或 `cipher` 指令，或任一内联证书块
pub(crate) fn has_openvpn_markers(lowered: &str) -> bool {
    (OPENVPN_REMOTE.is_match(lowered)
        && (OPENVPN_MODE.is_match(lowered) || OPENVPN_CIPHER.is_match(lowered)))
        || has_inline_block(lowered)
}

/// OpenVPN 指令片段，三者同时出现即视为OpenVPN文本（不限于行首）
const OPENVPN_FRAGMENTS: &[&str] = &["remote ", "client", "cipher "];

/// 检查小写文本是否同时包含全部OpenVPN指令片段，注释行中的也算
pub(crate) fn has_openvpn_fragments(lowered: &str) -> bool {
    OPENVPN_FRAGMENTS.iter().all(|fragment| lowered.contains(fragment))
}

/// 检查WireGuard强特征：同时存在 `[Interface]` 与 `[Peer]`（区分大小写）
pub(crate) fn has_wireguard_sections(text: &str) -> bool {
    let mut interface = false;
    let mut peer = false;
    for line in text.lines() {
        match line.trim() {
            "[Interface]" => interface = true,
            "[Peer]" => peer = true,
            _ => {}
        }
    }
    interface && peer
}

/// 检查IKEv2结构门槛：存在 `conn <name>` 段落
pub(crate) fn ikev2_gate(lowered: &str) -> bool {
    IKEV2_CONN.is_match(lowered)
}

/// 检查显式的 `keyexchange=ikev2`
pub(crate) fn has_explicit_ikev2(lowered: &str) -> bool {
    IKEV2_KEYEXCHANGE.is_match(lowered)
}

/// 检查IKEv2强特征：`conn` 段落且显式声明 `keyexchange=ikev2`
pub(crate) fn has_ikev2_markers(lowered: &str) -> bool {
    ikev2_gate(lowered) && has_explicit_ikev2(lowered)
}

/// 查找文本中其他方言的强特征，返回第一个命中的方言
///
/// WireGuard 候选对OpenVPN更严格：只要包含全部指令片段即排除，不要求其位于行首。
pub(crate) fn foreign_dialect(text: &str, lowered: &str, own: ProtocolKind) -> Option<ProtocolKind> {
    let openvpn = has_openvpn_markers(lowered)
        || (own == ProtocolKind::WireGuard && has_openvpn_fragments(lowered));
    let candidates = [
        (ProtocolKind::WireGuard, has_wireguard_sections(text)),
        (ProtocolKind::IKEv2, has_ikev2_markers(lowered)),
        (ProtocolKind::OpenVPN, openvpn),
    ];

    candidates
        .into_iter()
        .find(|(kind, present)| *kind != own && *present)
        .map(|(kind, _)| kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openvpn_gate() {
        assert!(openvpn_gate("client\nremote vpn.example.com 1194\n"));
        assert!(openvpn_gate("tls-client\r\nremote vpn.example.com\r\n"));
        assert!(!openvpn_gate("remote vpn.example.com 1194\n"));
        assert!(!openvpn_gate("client\nremote\n"));
        assert!(!openvpn_gate("clientele\nremote vpn.example.com\n"));
    }

    #[test]
    fn test_wireguard_sections_case_sensitive() {
        assert!(has_wireguard_sections("[Interface]\n[Peer]\n"));
        assert!(!has_wireguard_sections("[interface]\n[peer]\n"));
        assert!(!has_wireguard_sections("[Interface]\n"));
    }

    #[test]
    fn test_ikev2_markers() {
        assert!(has_ikev2_markers("conn home\n  keyexchange = ikev2\n"));
        assert!(!has_ikev2_markers("conn home\n  keyexchange=ikev1\n"));
        assert!(!has_ikev2_markers("keyexchange=ikev2\n"));
    }

    #[test]
    fn test_openvpn_fragments_anywhere() {
        assert!(has_openvpn_fragments("# remote client cipher profile\n"));
        assert!(!has_openvpn_fragments("# client laptop\n"));

        let text = "# remote client cipher profile\n[Interface]\n[Peer]\n";
        let lowered = text.to_lowercase();
        assert_eq!(
            foreign_dialect(text, &lowered, ProtocolKind::WireGuard),
            Some(ProtocolKind::OpenVPN)
        );
        assert_eq!(
            foreign_dialect(text, &lowered, ProtocolKind::IKEv2),
            Some(ProtocolKind::WireGuard)
        );
    }

    #[test]
    fn test_foreign_dialect_skips_own() {
        let text = "[Interface]\n[Peer]\n";
        assert_eq!(foreign_dialect(text, &text.to_lowercase(), ProtocolKind::WireGuard), None);
        assert_eq!(
            foreign_dialect(text, &text.to_lowercase(), ProtocolKind::OpenVPN),
            Some(ProtocolKind::WireGuard)
        );
    }
}
