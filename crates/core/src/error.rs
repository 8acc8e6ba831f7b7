//! 에러 타입: 설정 로딩 및 검증 에러 정의

/// image-inspector 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum InspectorError {
    /// 설정 로딩 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 설정 검증 실패
    #[error("invalid options: {0}")]
    Validation(#[from] ValidationError),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 로딩 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 설정 검증 에러
///
/// 검증 규칙마다 하나의 variant가 대응합니다.
/// [`InspectorConfig::validate`](crate::config::InspectorConfig::validate)는
/// 규칙 순서대로 검사하여 처음 실패한 규칙 하나만 반환합니다.
/// 메시지는 사용자에게 그대로 노출됩니다.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// 데몬 연결 주소 누락
    #[error("docker socket connection must be specified")]
    MissingConnection,

    /// 이미지와 컨테이너 동시 지정
    #[error("options container and image are mutually exclusive")]
    ConflictingTarget,

    /// 검사 대상 누락
    #[error("docker image or container must be specified to inspect")]
    MissingTarget,

    /// 컨테이너 변경분 스캔에 컨테이너 누락
    #[error("please specify docker container to scan container changes")]
    MissingContainerForDiff,

    /// dockercfg와 username 동시 지정
    #[error("only specify dockercfg file or username/password pair for authentication")]
    ConflictingAuth,

    /// username에 대한 password-file 누락
    #[error("please specify password-file for the given username")]
    MissingPasswordFile,

    /// serve 없이 chroot 지정
    #[error("change root can be used only when serving the image through webdav")]
    ChrootRequiresServe,

    /// scan-type 없이 scan-results-dir 지정
    #[error("scan-results-dir can be used only when specifying scan-type")]
    ResultsDirWithoutScanType,

    /// scan-results-dir 경로가 디렉토리가 아님
    #[error("scan-results-dir {path:?} is not a directory")]
    ResultsDirNotADirectory { path: String },

    /// post-results-url 없이 토큰 파일 지정
    #[error("post-results-url must be set to use post-results-token-file")]
    TokenFileWithoutPostUrl,

    /// openscap 없이 HTML 리포트 요청
    #[error("openscap-html-report can be used only when specifying scan-type as \"openscap\"")]
    HtmlReportRequiresOpenscap,

    /// 참조한 파일이 존재하지 않음
    #[error("{path} does not exist")]
    FileNotFound { path: String },

    /// clamav 스캔에 소켓 경로 누락
    #[error("clam-socket must be set to use clamav scan type")]
    MissingClamSocket,

    /// 허용되지 않는 스캔 종류
    #[error("{value} is not one of the available scan-types which are [{}]", .valid.join(" "))]
    InvalidScanType { value: String, valid: Vec<String> },

    /// 허용되지 않는 풀 정책
    #[error("{value} is not one of the available pull-policy options which are [{}]", .valid.join(" "))]
    InvalidPullPolicy { value: String, valid: Vec<String> },
}
