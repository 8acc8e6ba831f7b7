//! 설정 관리: 검사 옵션 구성 및 교차 필드 검증
//!
//! [`InspectorConfig`]는 이미지 검사 세션 하나에 필요한 모든 옵션을 담는 구조체입니다.
//! 이미지 풀, 스캔, webdav 서빙 등 비용이 큰 작업을 시작하기 전에
//! [`InspectorConfig::validate`]로 한 번 검증한 뒤 읽기 전용으로 사용합니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`IMAGE_INSPECTOR_IMAGE_REF=busybox` 형식)
//! 3. 설정 파일 (`image-inspector.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), image_inspector_core::error::InspectorError> {
//! use image_inspector_core::config::InspectorConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드 + 검증
//! let config = InspectorConfig::load("image-inspector.toml").await?;
//!
//! // 직접 구성 후 검증
//! let mut config = InspectorConfig::default();
//! config.image_ref = "busybox".to_owned();
//! config.validate()?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, InspectorError, ValidationError};
use crate::types::{
    InspectionTarget, PULL_POLICY_OPTIONS, PullPolicy, SCAN_TYPE_OPTIONS, ScanType,
};
use crate::util::{contains, string_or_default};

/// 기본 Docker 데몬 소켓 주소
pub const DEFAULT_DOCKER_SOCKET_LOCATION: &str = "unix:///var/run/docker.sock";

/// 기본 OpenSCAP CVE 피드 위치
pub const DEFAULT_CVE_FEED_URL: &str = "https://www.redhat.com/security/data/metrics/ds/";

/// 이미지 검사 옵션
///
/// 모든 필드는 평면 구조이며, 필드 간 제약은 [`validate`](Self::validate)가 검사합니다.
/// 반복 지정 가능한 플래그(`registry_config_files`, `scan_types`)는 구성 단계에서
/// 뒤에 추가만 하고, 검증 이후에는 변경하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    /// Docker 데몬 소켓 주소
    pub connection_uri: String,
    /// 검사할 이미지 (`container_ref`와 배타적)
    pub image_ref: String,
    /// 검사할 컨테이너 (`image_ref`와 배타적)
    pub container_ref: String,
    /// 컨테이너 변경분만 스캔 (`container_ref` 필요)
    pub scan_container_changes: bool,
    /// 이미지 파일을 풀어 놓을 경로
    pub destination_path: String,
    /// webdav 서빙 주소 (host:port)
    pub serve_address: String,
    /// webdav 서빙 시 chroot 수행 여부
    pub chroot_on_serve: bool,
    /// 레지스트리 인증용 dockercfg 파일 목록
    pub registry_config_files: Vec<String>,
    /// 레지스트리 사용자 이름
    pub username: String,
    /// 레지스트리 비밀번호 파일 경로
    pub password_file: String,
    /// 수행할 스캔 종류
    pub scan_types: Vec<String>,
    /// 스캔 결과 디렉토리
    pub scan_results_dir: String,
    /// OpenSCAP HTML 리포트 생성 여부
    pub generate_html_report: bool,
    /// CVE 피드 위치
    pub cve_feed_url: String,
    /// ClamAV 소켓 경로
    pub clamav_socket_path: String,
    /// 스캔 결과를 POST할 URL
    pub result_post_url: String,
    /// 결과 POST 시 토큰으로 붙일 파일 경로
    pub result_post_token_file: String,
    /// HTTP 요청 검증용 공유 비밀
    pub auth_token: String,
    /// 공유 비밀 파일 경로
    pub auth_token_file: String,
    /// 이미지 풀 정책 (always, if-not-present, never)
    pub pull_policy: String,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            connection_uri: DEFAULT_DOCKER_SOCKET_LOCATION.to_owned(),
            image_ref: String::new(),
            container_ref: String::new(),
            scan_container_changes: false,
            destination_path: String::new(),
            serve_address: String::new(),
            chroot_on_serve: false,
            registry_config_files: Vec::new(),
            username: String::new(),
            password_file: String::new(),
            scan_types: Vec::new(),
            scan_results_dir: String::new(),
            generate_html_report: false,
            cve_feed_url: DEFAULT_CVE_FEED_URL.to_owned(),
            clamav_socket_path: String::new(),
            result_post_url: String::new(),
            result_post_token_file: String::new(),
            auth_token: String::new(),
            auth_token_file: String::new(),
            pull_policy: PullPolicy::IfNotPresent.as_str().to_owned(),
        }
    }
}

impl InspectorConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용한 뒤 검증합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, InspectorError> {
        let path = path.as_ref();
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        info!(path = %path.display(), "options loaded and validated");
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드, 검증 없음).
    ///
    /// CLI 인자가 나중에 덮어쓸 수 있도록 검증은 호출자가 마지막에 수행합니다.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, InspectorError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                InspectorError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                InspectorError::Io(e)
            }
        })?;
        Self::parse(&content)
    }

    /// TOML 문자열에서 설정을 파싱합니다. 빠진 필드는 기본값을 사용합니다.
    pub fn parse(toml_str: &str) -> Result<Self, InspectorError> {
        toml::from_str(toml_str).map_err(|e| {
            InspectorError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `IMAGE_INSPECTOR_{FIELD}`
    /// 예: `IMAGE_INSPECTOR_SCAN_TYPES=openscap,clamav`
    pub fn apply_env_overrides(&mut self) {
        // 대상
        override_string(&mut self.connection_uri, "IMAGE_INSPECTOR_CONNECTION_URI");
        override_string(&mut self.image_ref, "IMAGE_INSPECTOR_IMAGE_REF");
        override_string(&mut self.container_ref, "IMAGE_INSPECTOR_CONTAINER_REF");
        override_bool(
            &mut self.scan_container_changes,
            "IMAGE_INSPECTOR_SCAN_CONTAINER_CHANGES",
        );
        override_string(&mut self.pull_policy, "IMAGE_INSPECTOR_PULL_POLICY");

        // 서빙
        override_string(&mut self.destination_path, "IMAGE_INSPECTOR_DESTINATION_PATH");
        override_string(&mut self.serve_address, "IMAGE_INSPECTOR_SERVE_ADDRESS");
        override_bool(&mut self.chroot_on_serve, "IMAGE_INSPECTOR_CHROOT_ON_SERVE");

        // 인증
        override_csv(
            &mut self.registry_config_files,
            "IMAGE_INSPECTOR_REGISTRY_CONFIG_FILES",
        );
        override_string(&mut self.username, "IMAGE_INSPECTOR_USERNAME");
        override_string(&mut self.password_file, "IMAGE_INSPECTOR_PASSWORD_FILE");
        override_string(&mut self.auth_token, "IMAGE_INSPECTOR_AUTH_TOKEN");
        override_string(&mut self.auth_token_file, "IMAGE_INSPECTOR_AUTH_TOKEN_FILE");

        // 스캔
        override_csv(&mut self.scan_types, "IMAGE_INSPECTOR_SCAN_TYPES");
        override_string(&mut self.scan_results_dir, "IMAGE_INSPECTOR_SCAN_RESULTS_DIR");
        override_bool(
            &mut self.generate_html_report,
            "IMAGE_INSPECTOR_GENERATE_HTML_REPORT",
        );
        override_string(&mut self.cve_feed_url, "IMAGE_INSPECTOR_CVE_FEED_URL");
        override_string(
            &mut self.clamav_socket_path,
            "IMAGE_INSPECTOR_CLAMAV_SOCKET_PATH",
        );

        // 결과 전송
        override_string(&mut self.result_post_url, "IMAGE_INSPECTOR_RESULT_POST_URL");
        override_string(
            &mut self.result_post_token_file,
            "IMAGE_INSPECTOR_RESULT_POST_TOKEN_FILE",
        );
    }

    /// 설정값의 유효성을 검증합니다.
    ///
    /// 규칙은 고정된 순서로 평가되며 처음 실패한 규칙의 에러 하나만 반환합니다.
    /// 파일시스템은 메타데이터 조회만 수행합니다 (읽기 전용, best-effort).
    pub fn validate(&self) -> Result<(), ValidationError> {
        let result = self.check_rules();
        match &result {
            Ok(()) => debug!(inspection_target = ?self.target(), "options validated"),
            Err(e) => debug!(error = %e, "options rejected"),
        }
        result
    }

    fn check_rules(&self) -> Result<(), ValidationError> {
        if self.connection_uri.is_empty() {
            return Err(ValidationError::MissingConnection);
        }
        if !self.image_ref.is_empty() && !self.container_ref.is_empty() {
            return Err(ValidationError::ConflictingTarget);
        }
        if self.image_ref.is_empty() && self.container_ref.is_empty() {
            return Err(ValidationError::MissingTarget);
        }
        if self.scan_container_changes && self.container_ref.is_empty() {
            return Err(ValidationError::MissingContainerForDiff);
        }
        if !self.registry_config_files.is_empty() && !self.username.is_empty() {
            return Err(ValidationError::ConflictingAuth);
        }
        if !self.username.is_empty() && self.password_file.is_empty() {
            return Err(ValidationError::MissingPasswordFile);
        }
        if self.serve_address.is_empty() && self.chroot_on_serve {
            return Err(ValidationError::ChrootRequiresServe);
        }
        if !self.scan_results_dir.is_empty() && self.scan_types.is_empty() {
            return Err(ValidationError::ResultsDirWithoutScanType);
        }
        // 경로가 없으면 통과 (디렉토리 생성은 이후 단계 담당)
        if !self.scan_results_dir.is_empty() {
            if let Ok(meta) = std::fs::metadata(&self.scan_results_dir) {
                if !meta.is_dir() {
                    return Err(ValidationError::ResultsDirNotADirectory {
                        path: self.scan_results_dir.clone(),
                    });
                }
            }
        }
        if !self.result_post_token_file.is_empty() && self.result_post_url.is_empty() {
            return Err(ValidationError::TokenFileWithoutPostUrl);
        }
        if self.generate_html_report && !contains(ScanType::OPENSCAP, &self.scan_types) {
            return Err(ValidationError::HtmlReportRequiresOpenscap);
        }

        let referenced_files = self
            .registry_config_files
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.password_file.as_str()))
            .filter(|path| !path.is_empty());
        for path in referenced_files {
            if is_missing(path) {
                return Err(ValidationError::FileNotFound {
                    path: path.to_owned(),
                });
            }
        }

        if contains(ScanType::CLAMAV, &self.scan_types) && self.clamav_socket_path.is_empty() {
            return Err(ValidationError::MissingClamSocket);
        }
        if let Some(invalid) = self
            .scan_types
            .iter()
            .find(|scan_type| !contains(scan_type, SCAN_TYPE_OPTIONS))
        {
            return Err(ValidationError::InvalidScanType {
                value: invalid.clone(),
                valid: owned_domain(SCAN_TYPE_OPTIONS),
            });
        }
        if !contains(&self.pull_policy, PULL_POLICY_OPTIONS) {
            return Err(ValidationError::InvalidPullPolicy {
                value: self.pull_policy.clone(),
                valid: owned_domain(PULL_POLICY_OPTIONS),
            });
        }

        Ok(())
    }

    /// 검사 대상을 반환합니다. 이미지가 우선하며, 둘 다 비어 있으면 `None`입니다.
    pub fn target(&self) -> Option<InspectionTarget> {
        if !self.image_ref.is_empty() {
            Some(InspectionTarget::Image(self.image_ref.clone()))
        } else if !self.container_ref.is_empty() {
            Some(InspectionTarget::Container(self.container_ref.clone()))
        } else {
            None
        }
    }

    /// 스캔 종류를 타입으로 변환합니다. 검증을 통과한 설정에서는 실패하지 않습니다.
    pub fn scan_types(&self) -> Result<Vec<ScanType>, ConfigError> {
        self.scan_types.iter().map(|s| s.parse()).collect()
    }

    /// 풀 정책을 타입으로 변환합니다.
    pub fn pull_policy(&self) -> Result<PullPolicy, ConfigError> {
        self.pull_policy.parse()
    }

    /// 공유 비밀을 결정합니다.
    ///
    /// `auth_token_file`이 지정되면 파일 내용을, 비어 있으면 `auth_token`
    /// (환경변수 `IMAGE_INSPECTOR_AUTH_TOKEN`으로 설정 가능)을 사용합니다.
    pub async fn resolve_auth_token(&self) -> Result<Option<String>, InspectorError> {
        let from_file = read_secret_file(&self.auth_token_file).await?;
        let token = string_or_default(&from_file, &self.auth_token);
        Ok(non_empty(token))
    }

    /// 결과 POST에 붙일 토큰을 `result_post_token_file`에서 읽습니다.
    pub async fn resolve_post_token(&self) -> Result<Option<String>, InspectorError> {
        let token = read_secret_file(&self.result_post_token_file).await?;
        Ok(non_empty(&token))
    }
}

/// 경로에 엔트리가 없는 경우에만 `true` (권한 에러 등은 통과)
fn is_missing(path: &str) -> bool {
    matches!(
        std::fs::metadata(path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound
    )
}

fn owned_domain(domain: &[&str]) -> Vec<String> {
    domain.iter().map(|s| (*s).to_owned()).collect()
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}

/// 비밀 파일을 읽어 앞뒤 공백을 제거합니다. 경로가 비어 있으면 빈 문자열입니다.
async fn read_secret_file(path: &str) -> Result<String, InspectorError> {
    if path.is_empty() {
        return Ok(String::new());
    }
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            InspectorError::Config(ConfigError::FileNotFound {
                path: path.to_owned(),
            })
        } else {
            InspectorError::Io(e)
        }
    })?;
    Ok(content.trim().to_owned())
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val
            .split(',')
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
    }
}
