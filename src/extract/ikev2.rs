//! IKEv2/IPsec 配置提取器
//!
//! 针对 strongSwan `ipsec.conf` 风格：`conn <name>` 段落加 `key=value` 参数。

use super::{first_usable_comment, parse_port, token_value, ConfigExtractor};
use crate::core::profile::{AuthMethod, ConnectionProfile};
use crate::core::protocol::ProtocolKind;
use crate::error::ExtractError;
use crate::vpn_extract;
use once_cell::sync::Lazy;
use regex::Regex;

const DEFAULT_PORT: u16 = 500;

static CONN_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?mi)^[ \t]*conn[ \t]+(\S+)").expect("valid regex"));

static PORT_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r":(\d+)").expect("valid regex"));

/// 服务器地址的查找顺序
const SERVER_KEYS: &[&str] = &["right", "rightid", "server"];

/// 原样记录到 `protocol_specific` 的参数
const RECORDED_KEYS: &[(&str, &str)] = &[
    ("keyexchange", "keyexchange"),
    ("ike", "ike"),
    ("esp", "esp"),
    ("left", "left"),
    ("leftid", "leftid"),
    ("rightid", "rightid"),
    ("leftsubnet", "leftsubnet"),
    ("rightsubnet", "rightsubnet"),
    ("leftsourceip", "leftsourceip"),
    ("auto", "auto"),
    ("dpdaction", "dpdaction"),
    ("charondebug", "charon_debug"),
    ("fragmentation", "fragmentation"),
];

/// IKEv2 配置提取器
#[derive(Debug, Clone, Copy, Default)]
pub struct Ikev2Extractor;

/// 第一个非 `%default` 的连接名
fn connection_name(text: &str) -> Option<String> {
    CONN_NAME
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find(|name| !name.eq_ignore_ascii_case("%default"))
        .map(str::to_string)
}

fn resolve_port(text: &str) -> u16 {
    if let Some(port) = parse_port(&token_value(text, "port")) {
        return port;
    }

    PORT_SUFFIX
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find_map(|m| parse_port(m.as_str()))
        .unwrap_or(DEFAULT_PORT)
}

fn resolve_auth_method(text: &str) -> AuthMethod {
    let leftauth = token_value(text, "leftauth").to_lowercase();
    let rightauth = token_value(text, "rightauth").to_lowercase();
    let authby = token_value(text, "authby").to_lowercase();
    let sides = [leftauth.as_str(), rightauth.as_str()];

    if sides.contains(&"psk") || authby == "secret" || authby == "psk" {
        AuthMethod::PreSharedKey
    } else if sides.iter().any(|side| side.contains("cert")) {
        AuthMethod::Certificate
    } else if sides.iter().any(|side| *side == "eap" || side.starts_with("eap-")) {
        AuthMethod::Eap
    } else {
        AuthMethod::PreSharedKey
    }
}

fn encryption_label(ike: &str) -> &'static str {
    let ike = ike.to_lowercase();
    if ike.contains("aes128") {
        "AES-128"
    } else if ike.contains("aes256") {
        "AES-256"
    } else if ike.contains("3des") {
        "3DES"
    } else {
        "AES-256"
    }
}

impl ConfigExtractor for Ikev2Extractor {
    fn name(&self) -> &'static str {
        "Ikev2Extractor"
    }

    fn protocol(&self) -> ProtocolKind {
        ProtocolKind::IKEv2
    }

    fn extract(&self, text: &str) -> Result<ConnectionProfile, ExtractError> {
        let server = SERVER_KEYS
            .iter()
            .map(|key| token_value(text, key))
            .find(|value| !value.is_empty())
            .ok_or_else(|| ExtractError::missing("server address (right, rightid or server)", "conn section"))?;

        let conn_name = connection_name(text);
        let name = conn_name
            .clone()
            .or_else(|| first_usable_comment(text))
            .unwrap_or_else(|| format!("IKEv2 - {}", server));

        let ike = token_value(text, "ike");
        let mut profile = ConnectionProfile::new(ProtocolKind::IKEv2, server, resolve_auth_method(text))
            .with_name(name)
            .with_port(resolve_port(text))
            .with_encryption(encryption_label(&ike))
            .with_compression(token_value(text, "compress").eq_ignore_ascii_case("yes"));
        profile.username = token_value(text, "eap_identity");

        if let Some(conn_name) = conn_name {
            profile.add_specific("conn_name", conn_name);
        }
        for (key, field) in RECORDED_KEYS {
            let value = token_value(text, key);
            if !value.is_empty() {
                profile.add_specific(*field, value);
            }
        }

        vpn_extract!(
            "IKEv2 profile: server={} port={} auth={} encryption={}",
            profile.server,
            profile.port,
            profile.auth_method,
            profile.encryption
        );

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EAP_CONFIG: &str = r#"
config setup
    charondebug="ike 2, knl 1"

conn %default
    keyexchange=ikev2

conn corp-vpn
    left=%defaultroute
    leftsourceip=%config
    leftauth=eap-mschapv2
    eap_identity=alice
    right="vpn.example.com"
    rightid=@vpn.example.com
    rightauth=pubkey
    rightsubnet=0.0.0.0/0
    ike=aes128-sha256-modp2048!
    esp=aes128-sha256!
    auto=add
"#;

    #[test]
    fn test_eap_profile() {
        let profile = Ikev2Extractor.extract(EAP_CONFIG).unwrap();
        assert_eq!(profile.name, "corp-vpn");
        assert_eq!(profile.server, "vpn.example.com");
        assert_eq!(profile.protocol, "IKEv2/IPSec");
        assert_eq!(profile.port, 500);
        assert_eq!(profile.auth_method, AuthMethod::Eap);
        assert_eq!(profile.encryption, "AES-128");
        assert_eq!(profile.username, "alice");
        assert!(profile.password.is_empty());
        assert_eq!(profile.specific("charon_debug"), Some("ike 2, knl 1"));
        assert_eq!(profile.specific("conn_name"), Some("corp-vpn"));
        assert_eq!(profile.specific("rightsubnet"), Some("0.0.0.0/0"));
    }

    #[test]
    fn test_server_resolution_order() {
        let profile = Ikev2Extractor
            .extract("conn a\n    rightid=gw.example.com\n    server=other.example.com\n")
            .unwrap();
        assert_eq!(profile.server, "gw.example.com");

        let profile = Ikev2Extractor.extract("conn a\n    server='fallback.example.com'\n").unwrap();
        assert_eq!(profile.server, "fallback.example.com");
    }

    #[test]
    fn test_port_resolution() {
        let explicit = "conn a\n    right=vpn.example.com:4500\n    port=4501\n";
        assert_eq!(Ikev2Extractor.extract(explicit).unwrap().port, 4501);

        let suffix = "conn a\n    right=vpn.example.com:4500\n";
        assert_eq!(Ikev2Extractor.extract(suffix).unwrap().port, 4500);

        let bad_explicit = "conn a\n    right=vpn.example.com\n    port=abc\n";
        assert_eq!(Ikev2Extractor.extract(bad_explicit).unwrap().port, 500);
    }

    #[test]
    fn test_auth_methods() {
        assert_eq!(resolve_auth_method("authby=secret\n"), AuthMethod::PreSharedKey);
        assert_eq!(resolve_auth_method("leftauth=psk\nrightauth=pubkey\n"), AuthMethod::PreSharedKey);
        assert_eq!(resolve_auth_method("leftauth=pubkey\nrightauth=cert\n"), AuthMethod::Certificate);
        assert_eq!(resolve_auth_method("leftauth=eap\n"), AuthMethod::Eap);
        assert_eq!(resolve_auth_method("left=%any\n"), AuthMethod::PreSharedKey);
    }

    #[test]
    fn test_encryption_labels() {
        assert_eq!(encryption_label("aes256-sha256-modp2048"), "AES-256");
        assert_eq!(encryption_label("3des-sha1-modp1024"), "3DES");
        assert_eq!(encryption_label("chacha20poly1305"), "AES-256");
        assert_eq!(encryption_label(""), "AES-256");
    }

    #[test]
    fn test_name_falls_back_to_comment() {
        let text = "# Branch office\nconn %default\n    right=vpn.example.com\n";
        assert_eq!(Ikev2Extractor.extract(text).unwrap().name, "Branch office");

        let text = "conn %default\n    right=vpn.example.com\n";
        assert_eq!(Ikev2Extractor.extract(text).unwrap().name, "IKEv2 - vpn.example.com");
    }

    #[test]
    fn test_missing_server() {
        let err = Ikev2Extractor.extract("conn a\n    left=%any\n").unwrap_err();
        assert!(matches!(err, ExtractError::MissingField { .. }));
    }
}
