//! WireGuard 配置提取器
//!
//! 段落名与参数名区分大小写。私钥与预共享密钥只参与校验，不会写入配置结果。

use super::{first_usable_comment, line_value, parse_port, section, section_count, split_endpoint, ConfigExtractor};
use crate::core::keywords::is_placeholder_key;
use crate::core::profile::{AuthMethod, ConnectionProfile};
use crate::core::protocol::ProtocolKind;
use crate::error::ExtractError;
use crate::vpn_extract;

const DEFAULT_PORT: u16 = 51820;
const FALLBACK_NAME: &str = "Imported WireGuard";

/// 可选参数：(段落, 参数名, 记录字段, 默认值)
const OPTIONAL_FIELDS: &[(Section, &str, &str, &str)] = &[
    (Section::Interface, "Address", "address", "10.0.0.2/32"),
    (Section::Interface, "DNS", "dns", "1.1.1.1"),
    (Section::Interface, "ListenPort", "listen_port", "51820"),
    (Section::Interface, "MTU", "mtu", "1420"),
    (Section::Peer, "AllowedIPs", "allowed_ips", "0.0.0.0/0, ::/0"),
    (Section::Peer, "PersistentKeepalive", "persistent_keepalive", "25"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Interface,
    Peer,
}

/// WireGuard 配置提取器
#[derive(Debug, Clone, Copy, Default)]
pub struct WireGuardExtractor;

/// 读取必需的密钥，拒绝缺失或占位符
fn required_key(section: &str, field: &'static str, section_name: &'static str) -> Result<String, ExtractError> {
    let value = line_value(section, field);
    if value.is_empty() {
        return Err(ExtractError::missing(field, section_name));
    }
    if is_placeholder_key(&value) {
        return Err(ExtractError::PlaceholderKey { field, value });
    }
    Ok(value)
}

/// 校验数值参数
fn validate_numeric(field: &'static str, value: &str) -> Result<(), ExtractError> {
    let valid = match field {
        "ListenPort" => parse_port(value).is_some(),
        "MTU" | "PersistentKeepalive" => value.parse::<u16>().is_ok(),
        _ => true,
    };
    if valid {
        Ok(())
    } else {
        Err(ExtractError::invalid_value(field, value))
    }
}

impl ConfigExtractor for WireGuardExtractor {
    fn name(&self) -> &'static str {
        "WireGuardExtractor"
    }

    fn protocol(&self) -> ProtocolKind {
        ProtocolKind::WireGuard
    }

    fn extract(&self, text: &str) -> Result<ConnectionProfile, ExtractError> {
        let interface = section(text, "[Interface]")
            .ok_or_else(|| ExtractError::missing("[Interface] section", "configuration"))?;
        let peer = section(text, "[Peer]")
            .ok_or_else(|| ExtractError::missing("[Peer] section", "configuration"))?;

        let endpoint = line_value(peer, "Endpoint");
        if endpoint.is_empty() {
            return Err(ExtractError::missing("Endpoint", "[Peer]"));
        }
        let (server, port) = split_endpoint(&endpoint, DEFAULT_PORT)?;

        required_key(interface, "PrivateKey", "[Interface]")?;
        let public_key = required_key(peer, "PublicKey", "[Peer]")?;

        let preshared = line_value(peer, "PresharedKey");
        let auth_method = if preshared.is_empty() {
            AuthMethod::PublicPrivateKey
        } else {
            AuthMethod::PublicPrivateKeyWithPsk
        };

        let name = first_usable_comment(text).unwrap_or_else(|| {
            if server.is_empty() {
                FALLBACK_NAME.to_string()
            } else {
                format!("WireGuard - {}", server)
            }
        });

        let mut profile = ConnectionProfile::new(ProtocolKind::WireGuard, server, auth_method)
            .with_name(name)
            .with_port(port);

        for (which, key, field, default) in OPTIONAL_FIELDS {
            let source = match which {
                Section::Interface => interface,
                Section::Peer => peer,
            };
            let value = line_value(source, key);
            if value.is_empty() {
                profile.add_specific(*field, *default);
            } else {
                validate_numeric(*key, &value)?;
                profile.add_specific(*field, value);
            }
        }
        profile.add_specific("peer_public_key", public_key);
        profile.add_specific("has_preshared_key", (!preshared.is_empty()).to_string());
        profile.add_specific("peer_count", section_count(text, "[Peer]").to_string());

        vpn_extract!(
            "WireGuard profile: server={} port={} auth={}",
            profile.server,
            profile.port,
            profile.auth_method
        );

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
# Home router
[Interface]
PrivateKey = yAnz5TF+lXXJte14tji3zlMNq+hd2rYUIgJBgB3fBmk=
Address = 10.8.0.2/24
DNS = 9.9.9.9

[Peer]
PublicKey = xTIBA5rboUvnH4htodjb6e697QjLERt1NAB4mZqp8Dg=
PresharedKey = 8kjI6aJ3Lsk7JbfvqBsPuWN2aD5m2Tx5MZgXGiT1e2s=
Endpoint = [2001:db8::1]:51821
AllowedIPs = 0.0.0.0/0
"#;

    #[test]
    fn test_full_profile() {
        let profile = WireGuardExtractor.extract(CONFIG).unwrap();
        assert_eq!(profile.name, "Home router");
        assert_eq!(profile.server, "2001:db8::1");
        assert_eq!(profile.port, 51821);
        assert_eq!(profile.protocol, "WireGuard");
        assert_eq!(profile.auth_method, AuthMethod::PublicPrivateKeyWithPsk);
        assert_eq!(profile.encryption, "ChaCha20-Poly1305");
        assert_eq!(profile.specific("address"), Some("10.8.0.2/24"));
        assert_eq!(profile.specific("dns"), Some("9.9.9.9"));
        assert_eq!(profile.specific("mtu"), Some("1420"));
        assert_eq!(profile.specific("persistent_keepalive"), Some("25"));
        assert_eq!(profile.specific("has_preshared_key"), Some("true"));
        assert_eq!(profile.specific("peer_count"), Some("1"));
    }

    #[test]
    fn test_secrets_not_copied() {
        let profile = WireGuardExtractor.extract(CONFIG).unwrap();
        let json = profile.to_json().unwrap();
        assert!(!json.contains("yAnz5TF+lXXJte14tji3zlMNq+hd2rYUIgJBgB3fBmk="));
        assert!(!json.contains("8kjI6aJ3Lsk7JbfvqBsPuWN2aD5m2Tx5MZgXGiT1e2s="));
    }

    #[test]
    fn test_placeholder_public_key() {
        let text = CONFIG.replace(
            "xTIBA5rboUvnH4htodjb6e697QjLERt1NAB4mZqp8Dg=",
            "SERVER_PUBLIC_KEY_HERE",
        );
        let err = WireGuardExtractor.extract(&text).unwrap_err();
        assert_eq!(
            err,
            ExtractError::PlaceholderKey {
                field: "PublicKey",
                value: "SERVER_PUBLIC_KEY_HERE".to_string()
            }
        );
    }

    #[test]
    fn test_missing_endpoint() {
        let text = "[Interface]\nPrivateKey = abc=\n[Peer]\nPublicKey = def=\n";
        assert_eq!(
            WireGuardExtractor.extract(text).unwrap_err(),
            ExtractError::missing("Endpoint", "[Peer]")
        );
    }

    #[test]
    fn test_invalid_numeric_field() {
        let text = "[Interface]\nPrivateKey = abc=\nMTU = big\n[Peer]\nPublicKey = def=\nEndpoint = 1.2.3.4\n";
        assert!(matches!(
            WireGuardExtractor.extract(text).unwrap_err(),
            ExtractError::InvalidValue { field: "MTU", .. }
        ));
    }
}
