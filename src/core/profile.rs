//! 连接配置模块
//!
//! 定义三种方言共用的规范化连接配置。

use crate::core::protocol::ProtocolKind;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 认证方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthMethod {
    /// 证书
    #[serde(rename = "Certificate")]
    Certificate,
    /// 预共享密钥
    #[serde(rename = "PSK")]
    PreSharedKey,
    /// EAP
    #[serde(rename = "EAP")]
    Eap,
    /// 用户名/密码
    #[serde(rename = "Username/Password")]
    UsernamePassword,
    /// 公钥/私钥
    #[serde(rename = "Public/Private Key")]
    PublicPrivateKey,
    /// 公钥/私钥 + 预共享密钥
    #[serde(rename = "Public/Private Key + Pre-shared Key")]
    PublicPrivateKeyWithPsk,
}

impl AuthMethod {
    /// 获取显示标签
    pub fn label(&self) -> &'static str {
        match self {
            Self::Certificate => "Certificate",
            Self::PreSharedKey => "PSK",
            Self::Eap => "EAP",
            Self::UsernamePassword => "Username/Password",
            Self::PublicPrivateKey => "Public/Private Key",
            Self::PublicPrivateKeyWithPsk => "Public/Private Key + Pre-shared Key",
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 规范化连接配置
///
/// 仅在导入成功时产生，调用方拥有其全部所有权。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionProfile {
    /// 显示名称
    pub name: String,
    /// 服务器地址
    pub server: String,
    /// 协议/传输标签，如 "OpenVPN (UDP)"
    pub protocol: String,
    /// 识别出的协议
    pub kind: ProtocolKind,
    /// 端口
    pub port: u16,
    /// 用户名
    pub username: String,
    /// 密码，从不由配置文本填充
    pub password: String,
    /// 认证方式
    pub auth_method: AuthMethod,
    /// 加密算法标签
    pub encryption: String,
    /// 是否启用压缩
    pub compression: bool,
    /// 协议专有字段
    pub protocol_specific: BTreeMap<String, String>,
}

impl ConnectionProfile {
    /// 创建新的连接配置，标签、端口和加密使用协议默认值
    pub fn new<S: Into<String>>(kind: ProtocolKind, server: S, auth_method: AuthMethod) -> Self {
        Self {
            name: String::new(),
            server: server.into(),
            protocol: kind.label().to_string(),
            kind,
            port: kind.default_port().unwrap_or_default(),
            username: String::new(),
            password: String::new(),
            auth_method,
            encryption: kind.default_encryption().to_string(),
            compression: false,
            protocol_specific: BTreeMap::new(),
        }
    }

    /// 设置名称
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// 设置协议标签
    pub fn with_protocol_label<S: Into<String>>(mut self, label: S) -> Self {
        self.protocol = label.into();
        self
    }

    /// 设置端口
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// 设置加密标签
    pub fn with_encryption<S: Into<String>>(mut self, encryption: S) -> Self {
        self.encryption = encryption.into();
        self
    }

    /// 设置压缩
    pub fn with_compression(mut self, compression: bool) -> Self {
        self.compression = compression;
        self
    }

    /// 添加协议专有字段
    pub fn add_specific<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.protocol_specific.insert(key.into(), value.into());
    }

    /// 获取协议专有字段
    pub fn specific(&self, key: &str) -> Option<&str> {
        self.protocol_specific.get(key).map(String::as_str)
    }

    /// 检查配置是否包含可用数据
    pub fn has_payload(&self) -> bool {
        !self.server.trim().is_empty() && self.port != 0 && self.kind.is_known()
    }

    /// 序列化为JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
