//! 核心抽象模块
//!
//! 包含方言探测接口、分类策略、关键字特征和规范化配置定义。

pub mod classifier;
pub mod detector;
pub mod keywords;
pub mod profile;
pub mod protocol;

pub use classifier::{ClassificationReport, ClassificationStatus, Classifier};
pub use detector::{ConfigDetector, DetectionOutcome, DetectionVerdict};
pub use profile::{AuthMethod, ConnectionProfile};
pub use protocol::ProtocolKind;
