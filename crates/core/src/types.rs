//! 도메인 타입: 스캔 종류, 풀 정책, 검사 대상
//!
//! 스캔 종류와 풀 정책은 닫힌 집합(enumerated domain)입니다.
//! 설정에는 사용자가 입력한 문자열 그대로 저장되고, 검증은
//! [`SCAN_TYPE_OPTIONS`] / [`PULL_POLICY_OPTIONS`]에 대한 정확한 일치로 수행합니다.
//! 검증을 통과한 설정은 [`ScanType`] / [`PullPolicy`]로 변환해 사용합니다.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 허용되는 스캔 종류 식별자
pub const SCAN_TYPE_OPTIONS: &[&str] = &[ScanType::OPENSCAP, ScanType::CLAMAV];

/// 허용되는 풀 정책 식별자
pub const PULL_POLICY_OPTIONS: &[&str] = &[
    PullPolicy::ALWAYS,
    PullPolicy::IF_NOT_PRESENT,
    PullPolicy::NEVER,
];

/// 스캔 엔진 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanType {
    /// OpenSCAP 취약점 스캔
    #[serde(rename = "openscap")]
    OpenScap,
    /// ClamAV 바이러스 스캔
    #[serde(rename = "clamav")]
    ClamAv,
}

impl ScanType {
    pub const OPENSCAP: &'static str = "openscap";
    pub const CLAMAV: &'static str = "clamav";

    /// 모든 스캔 종류
    pub const ALL: [ScanType; 2] = [ScanType::OpenScap, ScanType::ClamAv];

    /// 식별자 문자열을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenScap => Self::OPENSCAP,
            Self::ClamAv => Self::CLAMAV,
        }
    }
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanType {
    type Err = ConfigError;

    /// 정확히 일치하는 식별자만 허용합니다 (대소문자 구분).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scan_type| scan_type.as_str() == s)
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "scan_types".to_owned(),
                reason: format!("'{s}' is not one of: {}", SCAN_TYPE_OPTIONS.join(", ")),
            })
    }
}

/// 이미지 풀 정책
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PullPolicy {
    /// 항상 레지스트리에서 가져옴
    #[serde(rename = "always")]
    Always,
    /// 로컬에 없을 때만 가져옴
    #[default]
    #[serde(rename = "if-not-present")]
    IfNotPresent,
    /// 가져오지 않음 (로컬 이미지만 사용)
    #[serde(rename = "never")]
    Never,
}

impl PullPolicy {
    pub const ALWAYS: &'static str = "always";
    pub const IF_NOT_PRESENT: &'static str = "if-not-present";
    pub const NEVER: &'static str = "never";

    /// 모든 풀 정책
    pub const ALL: [PullPolicy; 3] = [
        PullPolicy::Always,
        PullPolicy::IfNotPresent,
        PullPolicy::Never,
    ];

    /// 식별자 문자열을 반환합니다.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => Self::ALWAYS,
            Self::IfNotPresent => Self::IF_NOT_PRESENT,
            Self::Never => Self::NEVER,
        }
    }
}

impl fmt::Display for PullPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PullPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|policy| policy.as_str() == s)
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "pull_policy".to_owned(),
                reason: format!("'{s}' is not one of: {}", PULL_POLICY_OPTIONS.join(", ")),
            })
    }
}

/// 검사 대상: 이미지 또는 컨테이너 중 하나
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "reference", rename_all = "lowercase")]
pub enum InspectionTarget {
    /// 이미지 참조 (예: `docker.io/library/busybox:latest`)
    Image(String),
    /// 컨테이너 ID 또는 이름
    Container(String),
}

impl InspectionTarget {
    /// 대상 종류 (`image` / `container`)
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Image(_) => "image",
            Self::Container(_) => "container",
        }
    }

    /// 대상 참조 문자열을 반환합니다.
    pub fn reference(&self) -> &str {
        match self {
            Self::Image(r) | Self::Container(r) => r,
        }
    }
}

impl fmt::Display for InspectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.reference())
    }
}
