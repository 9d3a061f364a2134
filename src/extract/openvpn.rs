//! OpenVPN 配置提取器
//!
//! 按行解析为“指令 → 值”，首个 `remote` 为服务器。
//! 注释被忽略，但 `# Profile: <name>` 用于命名。内联证书/密钥块只记录是否存在。

use super::{parse_port, ConfigExtractor};
use crate::core::profile::{AuthMethod, ConnectionProfile};
use crate::core::protocol::ProtocolKind;
use crate::error::ExtractError;
use crate::vpn_extract;

const DEFAULT_PORT: u16 = 1194;
const DEFAULT_CIPHER: &str = "AES-256-CBC";
const DEFAULT_AUTH_DIGEST: &str = "SHA1";
const DEFAULT_DEVICE: &str = "tun";
const DEFAULT_TRANSPORT: &str = "udp";
const PROFILE_COMMENT: &str = "profile:";

/// 内联块标签
const INLINE_TAGS: &[&str] = &["ca", "cert", "key", "tls-auth", "tls-crypt", "extra-certs", "pkcs12"];

/// `remote` 指令
#[derive(Debug, Clone)]
struct Remote {
    host: String,
    port: Option<String>,
    transport: Option<String>,
}

/// 解析后的指令集合
#[derive(Debug, Default)]
struct Directives {
    profile_name: Option<String>,
    remotes: Vec<Remote>,
    proto: Option<String>,
    port: Option<String>,
    cipher: Option<String>,
    data_ciphers: Option<String>,
    auth: Option<String>,
    dev: Option<String>,
    auth_user_pass: bool,
    compression: bool,
    tls_mode: Option<&'static str>,
    tls_client: bool,
    persist_key: bool,
    persist_tun: bool,
    remote_cert_tls: Option<String>,
    key_direction: Option<String>,
    verb: Option<String>,
    inline_blocks: Vec<String>,
}

impl Directives {
    fn parse(text: &str) -> Self {
        let mut parsed = Self::default();
        let mut open_block: Option<String> = None;

        for raw in text.lines() {
            let line = raw.trim();

            if let Some(tag) = &open_block {
                if line.eq_ignore_ascii_case(&format!("</{}>", tag)) {
                    open_block = None;
                }
                continue;
            }

            if line.is_empty() {
                continue;
            }

            if line.starts_with('#') || line.starts_with(';') {
                let comment = line.trim_start_matches(['#', ';']).trim();
                if comment
                    .get(..PROFILE_COMMENT.len())
                    .is_some_and(|prefix| prefix.eq_ignore_ascii_case(PROFILE_COMMENT))
                {
                    let name = comment[PROFILE_COMMENT.len()..].trim();
                    if !name.is_empty() && parsed.profile_name.is_none() {
                        parsed.profile_name = Some(name.to_string());
                    }
                }
                continue;
            }

            if let Some(tag) = inline_open_tag(line) {
                if !parsed.inline_blocks.contains(&tag) {
                    parsed.inline_blocks.push(tag.clone());
                }
                match tag.as_str() {
                    "tls-auth" => parsed.tls_mode = Some("tls-auth"),
                    "tls-crypt" => parsed.tls_mode = Some("tls-crypt"),
                    _ => {}
                }
                open_block = Some(tag);
                continue;
            }

            let (directive, value) = match line.split_once(char::is_whitespace) {
                Some((directive, value)) => (directive.to_lowercase(), value.trim()),
                None => (line.to_lowercase(), ""),
            };
            let first = value.split_whitespace().next().map(str::to_string);

            match directive.as_str() {
                "remote" => {
                    let mut args = value.split_whitespace();
                    if let Some(host) = args.next() {
                        parsed.remotes.push(Remote {
                            host: host.to_string(),
                            port: args.next().map(str::to_string),
                            transport: args.next().map(str::to_lowercase),
                        });
                    }
                }
                "proto" => parsed.proto = first.map(|p| p.to_lowercase()),
                "port" => parsed.port = first,
                "cipher" => parsed.cipher = first,
                "data-ciphers" | "ncp-ciphers" => parsed.data_ciphers = first,
                "auth" => parsed.auth = first,
                "dev" => parsed.dev = first,
                "auth-user-pass" => parsed.auth_user_pass = true,
                "comp-lzo" => {
                    parsed.compression = !first.is_some_and(|v| v.eq_ignore_ascii_case("no"));
                }
                "compress" => {
                    parsed.compression = first.is_some_and(|alg| !alg.to_lowercase().starts_with("stub"));
                }
                "tls-auth" => parsed.tls_mode = Some("tls-auth"),
                "tls-crypt" => parsed.tls_mode = Some("tls-crypt"),
                "tls-client" => parsed.tls_client = true,
                "persist-key" => parsed.persist_key = true,
                "persist-tun" => parsed.persist_tun = true,
                "remote-cert-tls" => parsed.remote_cert_tls = first,
                "key-direction" => parsed.key_direction = first,
                "verb" => parsed.verb = first,
                _ => {}
            }
        }

        parsed
    }
}

/// 识别 `<tag>` 形式的内联块起始行
fn inline_open_tag(line: &str) -> Option<String> {
    let tag = line.strip_prefix('<')?.strip_suffix('>')?.to_lowercase();
    INLINE_TAGS.contains(&tag.as_str()).then_some(tag)
}

/// OpenVPN 配置提取器
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenVpnExtractor;

impl ConfigExtractor for OpenVpnExtractor {
    fn name(&self) -> &'static str {
        "OpenVpnExtractor"
    }

    fn protocol(&self) -> ProtocolKind {
        ProtocolKind::OpenVPN
    }

    fn extract(&self, text: &str) -> Result<ConnectionProfile, ExtractError> {
        let parsed = Directives::parse(text);

        let remote = parsed
            .remotes
            .first()
            .ok_or_else(|| ExtractError::missing("'remote' directive", "OpenVPN configuration"))?;

        let port = match remote.port.as_deref().or(parsed.port.as_deref()) {
            Some(port) => parse_port(port).ok_or_else(|| ExtractError::invalid_value("port", port))?,
            None => DEFAULT_PORT,
        };

        let transport = remote
            .transport
            .clone()
            .or_else(|| parsed.proto.clone())
            .unwrap_or_else(|| DEFAULT_TRANSPORT.to_string());
        let label = if transport.starts_with("tcp") {
            "OpenVPN (TCP)"
        } else {
            "OpenVPN (UDP)"
        };

        let auth_method = if parsed.auth_user_pass {
            AuthMethod::UsernamePassword
        } else {
            AuthMethod::Certificate
        };

        let encryption = parsed
            .cipher
            .clone()
            .or_else(|| {
                parsed
                    .data_ciphers
                    .as_deref()
                    .and_then(|list| list.split(':').next())
                    .filter(|cipher| !cipher.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| DEFAULT_CIPHER.to_string());

        let name = parsed
            .profile_name
            .clone()
            .unwrap_or_else(|| format!("OpenVPN - {}", remote.host));

        let mut profile = ConnectionProfile::new(ProtocolKind::OpenVPN, remote.host.clone(), auth_method)
            .with_name(name)
            .with_protocol_label(label)
            .with_port(port)
            .with_encryption(encryption)
            .with_compression(parsed.compression);

        profile.add_specific("transport", transport);
        profile.add_specific(
            "auth_digest",
            parsed.auth.clone().unwrap_or_else(|| DEFAULT_AUTH_DIGEST.to_string()),
        );
        profile.add_specific(
            "device",
            parsed.dev.clone().unwrap_or_else(|| DEFAULT_DEVICE.to_string()),
        );
        profile.add_specific("tls_mode", parsed.tls_mode.unwrap_or("none"));
        profile.add_specific("remote_count", parsed.remotes.len().to_string());

        if parsed.remotes.len() > 1 {
            let fallbacks: Vec<String> = parsed.remotes[1..]
                .iter()
                .map(|r| match &r.port {
                    Some(port) => format!("{}:{}", r.host, port),
                    None => r.host.clone(),
                })
                .collect();
            profile.add_specific("fallback_remotes", fallbacks.join(","));
        }
        if !parsed.inline_blocks.is_empty() {
            profile.add_specific("inline_blocks", parsed.inline_blocks.join(","));
        }
        let optional = [
            ("data_ciphers", &parsed.data_ciphers),
            ("remote_cert_tls", &parsed.remote_cert_tls),
            ("key_direction", &parsed.key_direction),
            ("verb", &parsed.verb),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                profile.add_specific(key, value.clone());
            }
        }
        let flags = [
            ("tls_client", parsed.tls_client),
            ("persist_key", parsed.persist_key),
            ("persist_tun", parsed.persist_tun),
        ];
        for (key, enabled) in flags {
            if enabled {
                profile.add_specific(key, "true");
            }
        }

        vpn_extract!(
            "OpenVPN profile: server={} port={} transport={} auth={}",
            profile.server,
            profile.port,
            profile.specific("transport").unwrap_or_default(),
            profile.auth_method
        );

        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
# Profile: Office VPN
client
dev tun
proto tcp
remote vpn.example.com 443
remote backup.example.com 1194
resolv-retry infinite
nobind
persist-key
persist-tun
remote-cert-tls server
cipher AES-256-GCM
auth SHA256
auth-user-pass
comp-lzo
key-direction 1
verb 3
<ca>
-----BEGIN CERTIFICATE-----
remote evil.example.com 1
-----END CERTIFICATE-----
</ca>
<tls-auth>
-----BEGIN OpenVPN Static key V1-----
-----END OpenVPN Static key V1-----
</tls-auth>
"#;

    #[test]
    fn test_full_profile() {
        let profile = OpenVpnExtractor.extract(FULL).unwrap();
        assert_eq!(profile.name, "Office VPN");
        assert_eq!(profile.server, "vpn.example.com");
        assert_eq!(profile.port, 443);
        assert_eq!(profile.protocol, "OpenVPN (TCP)");
        assert_eq!(profile.auth_method, AuthMethod::UsernamePassword);
        assert!(profile.username.is_empty());
        assert!(profile.password.is_empty());
        assert_eq!(profile.encryption, "AES-256-GCM");
        assert!(profile.compression);
        assert_eq!(profile.specific("auth_digest"), Some("SHA256"));
        assert_eq!(profile.specific("tls_mode"), Some("tls-auth"));
        assert_eq!(profile.specific("remote_count"), Some("2"));
        assert_eq!(profile.specific("fallback_remotes"), Some("backup.example.com:1194"));
        assert_eq!(profile.specific("inline_blocks"), Some("ca,tls-auth"));
        assert_eq!(profile.specific("key_direction"), Some("1"));
    }

    #[test]
    fn test_defaults() {
        let profile = OpenVpnExtractor.extract("client\nremote vpn.example.com\n").unwrap();
        assert_eq!(profile.name, "OpenVPN - vpn.example.com");
        assert_eq!(profile.port, 1194);
        assert_eq!(profile.protocol, "OpenVPN (UDP)");
        assert_eq!(profile.auth_method, AuthMethod::Certificate);
        assert_eq!(profile.encryption, "AES-256-CBC");
        assert!(!profile.compression);
        assert_eq!(profile.specific("auth_digest"), Some("SHA1"));
        assert_eq!(profile.specific("device"), Some("tun"));
        assert_eq!(profile.specific("tls_mode"), Some("none"));
    }

    #[test]
    fn test_remote_transport_and_port_directive() {
        let profile = OpenVpnExtractor
            .extract("client\nport 1195\nremote vpn.example.com\nremote-random\n")
            .unwrap();
        assert_eq!(profile.port, 1195);

        let profile = OpenVpnExtractor
            .extract("client\nproto udp\nremote vpn.example.com 443 tcp-client\n")
            .unwrap();
        assert_eq!(profile.protocol, "OpenVPN (TCP)");
    }

    #[test]
    fn test_data_ciphers_fallback() {
        let profile = OpenVpnExtractor
            .extract("client\nremote vpn.example.com\ndata-ciphers CHACHA20-POLY1305:AES-256-GCM\n")
            .unwrap();
        assert_eq!(profile.encryption, "CHACHA20-POLY1305");
    }

    #[test]
    fn test_compress_stub_is_not_compression() {
        let profile = OpenVpnExtractor
            .extract("client\nremote vpn.example.com\ncompress stub-v2\n")
            .unwrap();
        assert!(!profile.compression);

        let profile = OpenVpnExtractor
            .extract("client\nremote vpn.example.com\ncompress lz4-v2\n")
            .unwrap();
        assert!(profile.compression);
    }

    #[test]
    fn test_missing_remote() {
        let err = OpenVpnExtractor.extract("client\ndev tun\nproto udp\n").unwrap_err();
        assert!(err.to_string().contains("remote"));
    }

    #[test]
    fn test_invalid_port() {
        let err = OpenVpnExtractor
            .extract("client\nremote vpn.example.com 99999\n")
            .unwrap_err();
        assert!(matches!(err, ExtractError::InvalidValue { field: "port", .. }));
    }
}
