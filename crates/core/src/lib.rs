#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod types;
pub mod util;

// --- 주요 타입 re-export ---

// 에러
pub use error::{ConfigError, InspectorError, ValidationError};

// 설정
pub use config::{DEFAULT_CVE_FEED_URL, DEFAULT_DOCKER_SOCKET_LOCATION, InspectorConfig};

// 도메인 타입
pub use types::{InspectionTarget, PULL_POLICY_OPTIONS, PullPolicy, SCAN_TYPE_OPTIONS, ScanType};
