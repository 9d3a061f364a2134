//! 配置提取模块
//!
//! 将已识别方言的文本转换为规范化的 [`ConnectionProfile`]。
//! 本模块同时提供各提取器共用的键值查找、段落切分和端点拆分算法。

pub mod ikev2;
pub mod openvpn;
pub mod wireguard;

pub use ikev2::Ikev2Extractor;
pub use openvpn::OpenVpnExtractor;
pub use wireguard::WireGuardExtractor;

use crate::core::profile::ConnectionProfile;
use crate::core::protocol::ProtocolKind;
use crate::error::ExtractError;
use std::collections::HashMap;

/// 名称注释的最大长度
const MAX_COMMENT_NAME_LEN: usize = 50;

/// 配置提取器接口
pub trait ConfigExtractor: Send + Sync {
    /// 提取器名称
    fn name(&self) -> &'static str;

    /// 负责的协议
    fn protocol(&self) -> ProtocolKind;

    /// 提取规范化配置
    ///
    /// 仅在分类器选定该协议后调用，不再重复校验协议身份。
    fn extract(&self, text: &str) -> Result<ConnectionProfile, ExtractError>;
}

/// 提取器注册表
#[derive(Default)]
pub struct ExtractorRegistry {
    extractors: HashMap<ProtocolKind, Box<dyn ConfigExtractor>>,
}

impl std::fmt::Debug for ExtractorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractorRegistry")
            .field("protocols", &self.protocols())
            .finish()
    }
}

impl ExtractorRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建包含全部内置提取器的注册表
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(OpenVpnExtractor));
        registry.register(Box::new(Ikev2Extractor));
        registry.register(Box::new(WireGuardExtractor));
        registry
    }

    /// 注册提取器，替换同协议的已有提取器
    pub fn register(&mut self, extractor: Box<dyn ConfigExtractor>) {
        self.extractors.insert(extractor.protocol(), extractor);
    }

    /// 移除某协议的提取器
    pub fn unregister(&mut self, protocol: ProtocolKind) -> Option<Box<dyn ConfigExtractor>> {
        self.extractors.remove(&protocol)
    }

    /// 获取某协议的提取器
    pub fn get(&self, protocol: ProtocolKind) -> Option<&dyn ConfigExtractor> {
        self.extractors.get(&protocol).map(|extractor| extractor.as_ref())
    }

    /// 已注册的协议，按固定顺序
    pub fn protocols(&self) -> Vec<ProtocolKind> {
        let mut protocols: Vec<ProtocolKind> = self.extractors.keys().copied().collect();
        protocols.sort();
        protocols
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

/// 值的截取方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueSpan {
    /// 取到空白为止，引号包围的值可以包含空白
    Token,
    /// 取整行剩余部分
    Line,
}

/// 查找 `key = value` 并取值直到空白（OpenVPN/IKEv2 风格），键不区分大小写
///
/// 引号包围的值可以包含空白。不存在时返回空字符串，由调用方应用默认值。
pub fn token_value(section: &str, key: &str) -> String {
    lookup(section, key, true, ValueSpan::Token)
}

/// 查找 `Key = value` 并取整行剩余部分（WireGuard 风格），键区分大小写
pub fn line_value(section: &str, key: &str) -> String {
    lookup(section, key, false, ValueSpan::Line)
}

/// 逐行查找首个以 `key` 开头、随后为 `=` 的行
fn lookup(section: &str, key: &str, case_insensitive: bool, span: ValueSpan) -> String {
    section
        .lines()
        .find_map(|line| {
            let line = line.trim_start_matches([' ', '\t']);
            let head = line.get(..key.len())?;
            let matches = if case_insensitive {
                head.eq_ignore_ascii_case(key)
            } else {
                head == key
            };
            if !matches {
                return None;
            }
            line[key.len()..].trim_start_matches([' ', '\t']).strip_prefix('=')
        })
        .map(|rest| {
            let rest = rest.trim();
            let value = match span {
                ValueSpan::Line => rest,
                ValueSpan::Token => quoted_token(rest),
            };
            trim_quotes(value).to_string()
        })
        .unwrap_or_default()
}

/// 截取首个值：闭合的引号串整体保留，否则取到空白为止
fn quoted_token(rest: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = rest.strip_prefix(quote) {
            if let Some(end) = inner.find(quote) {
                return &rest[..end + 2];
            }
        }
    }
    rest.split_whitespace().next().unwrap_or_default()
}

/// 去除成对的首尾引号
pub fn trim_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// 解析端口，仅接受 1..=65535
pub fn parse_port(value: &str) -> Option<u16> {
    value.trim().parse::<u16>().ok().filter(|port| *port != 0)
}

/// 拆分 `host:port` 或 `[ipv6]:port` 端点
///
/// 带方括号时主机为括号内内容；否则主机为最后一个 `:` 之前的部分。
/// 未给出端口时使用 `default_port`。
pub fn split_endpoint(endpoint: &str, default_port: u16) -> Result<(String, u16), ExtractError> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        return Err(ExtractError::invalid_endpoint(endpoint, "endpoint is empty"));
    }

    let (host, port) = if let Some(rest) = endpoint.strip_prefix('[') {
        let (host, after) = rest
            .split_once(']')
            .ok_or_else(|| ExtractError::invalid_endpoint(endpoint, "missing closing bracket"))?;
        let port = match after.strip_prefix(':') {
            Some(port) => Some(port),
            None if after.is_empty() => None,
            None => {
                return Err(ExtractError::invalid_endpoint(
                    endpoint,
                    "unexpected characters after bracketed host",
                ))
            }
        };
        (host, port)
    } else {
        match endpoint.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (endpoint, None),
        }
    };

    if host.trim().is_empty() {
        return Err(ExtractError::invalid_endpoint(endpoint, "host is empty"));
    }

    let port = match port.map(str::trim) {
        None | Some("") => default_port,
        Some(port) => parse_port(port)
            .ok_or_else(|| ExtractError::invalid_endpoint(endpoint, format!("invalid port '{}'", port)))?,
    };

    Ok((host.trim().to_string(), port))
}

/// 截取 `header` 段落：从标题下一行到下一个 `[...]` 标题之前
pub fn section<'a>(text: &'a str, header: &str) -> Option<&'a str> {
    let mut offset = 0;
    let mut start = None;

    for line in text.split_inclusive('\n') {
        let trimmed = line.trim();
        let current = start;
        match current {
            None if trimmed == header => start = Some(offset + line.len()),
            Some(begin) if trimmed.starts_with('[') => return Some(&text[begin..offset]),
            _ => {}
        }
        offset += line.len();
    }

    start.map(|begin| &text[begin..])
}

/// 统计 `header` 段落出现的次数
pub fn section_count(text: &str, header: &str) -> usize {
    text.lines().filter(|line| line.trim() == header).count()
}

/// 查找第一条可用作名称的注释
///
/// 去掉 `#`/`;` 前缀后非空且不超过50个字符。
pub fn first_usable_comment(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.starts_with('#') || line.starts_with(';'))
        .map(|line| line.trim_start_matches(['#', ';']).trim())
        .find(|comment| !comment.is_empty() && comment.chars().count() <= MAX_COMMENT_NAME_LEN)
        .map(str::to_string)
}
