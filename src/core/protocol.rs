//! 协议定义模块
//!
//! 定义支持的VPN配置方言及其默认参数。

use serde::{Deserialize, Serialize};
use std::fmt;

/// VPN协议类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProtocolKind {
    /// OpenVPN (.ovpn)
    OpenVPN,
    /// IKEv2/IPsec (strongSwan ipsec.conf)
    IKEv2,
    /// WireGuard (wg-quick .conf)
    WireGuard,
    /// 未知协议
    Unknown,
}

impl fmt::Display for ProtocolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenVPN => write!(f, "OpenVPN"),
            Self::IKEv2 => write!(f, "IKEv2"),
            Self::WireGuard => write!(f, "WireGuard"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

impl ProtocolKind {
    /// 获取协议的默认端口
    pub fn default_port(&self) -> Option<u16> {
        match self {
            Self::OpenVPN => Some(1194),
            Self::IKEv2 => Some(500),
            Self::WireGuard => Some(51820),
            Self::Unknown => None,
        }
    }

    /// 获取协议的默认加密标签
    pub fn default_encryption(&self) -> &'static str {
        match self {
            Self::OpenVPN => "AES-256-CBC",
            Self::IKEv2 => "AES-256",
            Self::WireGuard => "ChaCha20-Poly1305",
            Self::Unknown => "",
        }
    }

    /// 获取配置结果中使用的协议标签
    pub fn label(&self) -> &'static str {
        match self {
            Self::OpenVPN => "OpenVPN",
            Self::IKEv2 => "IKEv2/IPSec",
            Self::WireGuard => "WireGuard",
            Self::Unknown => "Unknown",
        }
    }

    /// 检查是否为已知协议
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// 获取所有已知协议，按分类器的执行顺序排列
    pub fn all() -> Vec<ProtocolKind> {
        vec![Self::WireGuard, Self::IKEv2, Self::OpenVPN]
    }
}
