//! 协议与连接配置模块测试

use vpnconf_detector::core::profile::{AuthMethod, ConnectionProfile};
use vpnconf_detector::core::protocol::ProtocolKind;

#[test]
fn test_protocol_kind_display() {
    assert_eq!(ProtocolKind::OpenVPN.to_string(), "OpenVPN");
    assert_eq!(ProtocolKind::IKEv2.to_string(), "IKEv2");
    assert_eq!(ProtocolKind::WireGuard.to_string(), "WireGuard");
    assert_eq!(ProtocolKind::Unknown.to_string(), "Unknown");
}

#[test]
fn test_protocol_kind_label() {
    assert_eq!(ProtocolKind::OpenVPN.label(), "OpenVPN");
    assert_eq!(ProtocolKind::IKEv2.label(), "IKEv2/IPSec");
    assert_eq!(ProtocolKind::WireGuard.label(), "WireGuard");
    assert_eq!(ProtocolKind::Unknown.label(), "Unknown");
}

#[test]
fn test_protocol_defaults() {
    assert_eq!(ProtocolKind::OpenVPN.default_port(), Some(1194));
    assert_eq!(ProtocolKind::IKEv2.default_port(), Some(500));
    assert_eq!(ProtocolKind::WireGuard.default_port(), Some(51820));
    assert_eq!(ProtocolKind::Unknown.default_port(), None);

    assert_eq!(ProtocolKind::OpenVPN.default_encryption(), "AES-256-CBC");
    assert_eq!(ProtocolKind::WireGuard.default_encryption(), "ChaCha20-Poly1305");
    assert!(!ProtocolKind::Unknown.is_known());
    assert_eq!(
        ProtocolKind::all(),
        vec![ProtocolKind::WireGuard, ProtocolKind::IKEv2, ProtocolKind::OpenVPN]
    );
}

#[test]
fn test_profile_defaults() {
    let profile = ConnectionProfile::new(ProtocolKind::IKEv2, "vpn.example.com", AuthMethod::Eap);
    assert_eq!(profile.protocol, "IKEv2/IPSec");
    assert_eq!(profile.port, 500);
    assert_eq!(profile.encryption, "AES-256");
    assert!(profile.username.is_empty());
    assert!(profile.password.is_empty());
    assert!(!profile.compression);
    assert!(profile.has_payload());
}

#[test]
fn test_profile_payload() {
    let empty = ConnectionProfile::new(ProtocolKind::OpenVPN, "  ", AuthMethod::Certificate);
    assert!(!empty.has_payload());

    let unknown = ConnectionProfile::new(ProtocolKind::Unknown, "vpn.example.com", AuthMethod::Certificate);
    assert!(!unknown.has_payload());

    let no_port = ConnectionProfile::new(ProtocolKind::OpenVPN, "vpn.example.com", AuthMethod::Certificate)
        .with_port(0);
    assert!(!no_port.has_payload());
}

#[test]
fn test_protocol_specific_fields() {
    let mut profile = ConnectionProfile::new(ProtocolKind::WireGuard, "vpn.example.com", AuthMethod::PublicPrivateKey);
    profile.add_specific("mtu", "1420");
    profile.add_specific("address", "10.0.0.2/32");

    assert_eq!(profile.specific("mtu"), Some("1420"));
    assert_eq!(profile.specific("dns"), None);
    let keys: Vec<&String> = profile.protocol_specific.keys().collect();
    assert_eq!(keys, vec!["address", "mtu"]);
}

#[test]
fn test_profile_serialization() {
    let profile = ConnectionProfile::new(
        ProtocolKind::WireGuard,
        "vpn.example.com",
        AuthMethod::PublicPrivateKeyWithPsk,
    )
    .with_name("Home");

    let json = profile.to_json().unwrap();
    assert!(json.contains("\"auth_method\":\"Public/Private Key + Pre-shared Key\""));
    assert!(json.contains("\"kind\":\"WireGuard\""));

    let restored: ConnectionProfile = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, profile);
}

#[test]
fn test_auth_method_labels() {
    assert_eq!(AuthMethod::PreSharedKey.to_string(), "PSK");
    assert_eq!(AuthMethod::UsernamePassword.label(), "Username/Password");
    assert_eq!(AuthMethod::Eap.label(), "EAP");
}
