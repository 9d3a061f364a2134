//! 关键字特征模块
//!
//! 各方言的关键字特征表，以及基于行的关键字匹配。

use crate::core::protocol::ProtocolKind;
use std::borrow::Cow;

/// 关键字匹配方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordMode {
    /// 指令形式：行首关键字后跟空白或行尾，如 `persist-key`、`remote host 1194`
    Directive,
    /// 赋值形式：行首关键字后跟可选空白和 `=`，如 `AllowedIPs = 0.0.0.0/0`
    Assignment,
}

/// 关键字特征集
#[derive(Debug, Clone, Copy)]
pub struct KeywordSet {
    /// 协议类型
    pub protocol: ProtocolKind,
    /// 关键字列表（不区分大小写时以小写存储）
    pub keywords: &'static [&'static str],
    /// 匹配方式
    pub mode: KeywordMode,
    /// 是否区分大小写
    pub case_sensitive: bool,
}

impl KeywordSet {
    /// 按大小写规则准备待匹配文本
    pub fn prepare<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if self.case_sensitive {
            Cow::Borrowed(text)
        } else {
            Cow::Owned(text.to_lowercase())
        }
    }

    /// 返回在文本中出现的关键字（每个关键字最多计一次）
    ///
    /// `haystack` 需已经过 [`KeywordSet::prepare`] 处理。
    pub fn matched(&self, haystack: &str) -> Vec<&'static str> {
        self.keywords
            .iter()
            .copied()
            .filter(|keyword| {
                haystack
                    .lines()
                    .any(|line| line_matches(line.trim_start(), keyword, self.mode))
            })
            .collect()
    }

    /// 关键字命中数
    pub fn hits(&self, haystack: &str) -> usize {
        self.matched(haystack).len()
    }

    /// 检查单个关键字是否出现
    pub fn contains(&self, haystack: &str, keyword: &str) -> bool {
        haystack
            .lines()
            .any(|line| line_matches(line.trim_start(), keyword, self.mode))
    }
}

fn line_matches(line: &str, keyword: &str, mode: KeywordMode) -> bool {
    let Some(rest) = line.strip_prefix(keyword) else {
        return false;
    };
    match mode {
        KeywordMode::Directive => rest.is_empty() || rest.starts_with(char::is_whitespace),
        KeywordMode::Assignment => rest.trim_start().starts_with('='),
    }
}

/// OpenVPN 指令特征
pub const OPENVPN_KEYWORDS: KeywordSet = KeywordSet {
    protocol: ProtocolKind::OpenVPN,
    keywords: &[
        "client",
        "dev",
        "proto",
        "remote",
        "resolv-retry",
        "nobind",
        "persist-key",
        "persist-tun",
        "remote-cert-tls",
        "cipher",
        "auth",
        "tls-auth",
        "tls-crypt",
        "tls-client",
        "key-direction",
        "verb",
        "comp-lzo",
        "auth-user-pass",
        "ns-cert-type",
        "mute-replay-warnings",
    ],
    mode: KeywordMode::Directive,
    case_sensitive: false,
};

/// IKEv2 (ipsec.conf) 参数特征
pub const IKEV2_KEYWORDS: KeywordSet = KeywordSet {
    protocol: ProtocolKind::IKEv2,
    keywords: &[
        "keyexchange",
        "left",
        "right",
        "leftid",
        "rightid",
        "leftauth",
        "rightauth",
        "leftcert",
        "rightcert",
        "leftsubnet",
        "rightsubnet",
        "leftsourceip",
        "ike",
        "esp",
        "auto",
        "rekey",
        "dpdaction",
        "authby",
        "eap_identity",
        "fragmentation",
    ],
    mode: KeywordMode::Assignment,
    case_sensitive: false,
};

/// WireGuard 参数特征（区分大小写）
pub const WIREGUARD_KEYWORDS: KeywordSet = KeywordSet {
    protocol: ProtocolKind::WireGuard,
    keywords: &[
        "PrivateKey",
        "PublicKey",
        "PresharedKey",
        "Address",
        "DNS",
        "ListenPort",
        "MTU",
        "AllowedIPs",
        "Endpoint",
        "PersistentKeepalive",
        "Table",
        "PostUp",
        "PostDown",
        "SaveConfig",
    ],
    mode: KeywordMode::Assignment,
    case_sensitive: true,
};

/// OpenVPN 内联证书/密钥块起始标签
pub const OPENVPN_INLINE_TAGS: &[&str] = &["<ca>", "<cert>", "<key>", "<tls-crypt>", "<tls-auth>"];

/// 已知的模板占位密钥
pub const PLACEHOLDER_KEYS: &[&str] = &["CLIENT_PRIVATE_KEY_HERE", "SERVER_PUBLIC_KEY_HERE"];

/// 检查密钥是否为已知占位符
pub fn is_placeholder_key(value: &str) -> bool {
    PLACEHOLDER_KEYS.contains(&value.trim())
}

/// 检查小写文本是否包含OpenVPN内联块
pub fn has_inline_block(lowered: &str) -> bool {
    OPENVPN_INLINE_TAGS.iter().any(|tag| lowered.contains(tag))
}
