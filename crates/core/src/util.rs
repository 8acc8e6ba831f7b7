//! 공용 유틸리티: 문자열 목록/기본값 헬퍼
//!
//! 상태와 부수효과가 없는 순수 함수만 모아 둡니다.
//! 반복 플래그(`--scan-type`, `--dockercfg`)처럼 짧은 목록을 다루는 용도입니다.

/// `value`가 비어 있지 않으면 그대로, 비어 있으면 `fallback`을 반환합니다.
pub fn string_or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() { fallback } else { value }
}

/// 두 값 중 작은 값을 반환합니다.
pub fn min<T: PartialOrd>(a: T, b: T) -> T {
    if a < b { a } else { b }
}

/// `item`이 `domain`의 원소와 정확히 일치하는지 확인합니다.
///
/// 대소문자를 구분하며, 빈 `domain`에 대해서는 항상 `false`입니다.
pub fn contains<S: AsRef<str>>(item: &str, domain: &[S]) -> bool {
    domain.iter().any(|candidate| candidate.as_ref() == item)
}

/// 중복을 제거한 새 목록을 반환합니다 (최초 등장 순서 유지).
///
/// 누적 목록에 대해 [`contains`]로 검사하므로 O(n^2)입니다.
/// 입력은 CLI 반복 플래그 정도의 짧은 목록을 가정합니다.
pub fn deduplicate<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let item = item.as_ref();
        if !contains(item, &unique) {
            unique.push(item.to_owned());
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_or_default_keeps_non_empty_value() {
        assert_eq!(string_or_default("value", "fallback"), "value");
    }

    #[test]
    fn string_or_default_substitutes_empty_value() {
        assert_eq!(string_or_default("", "fallback"), "fallback");
        assert_eq!(string_or_default("", ""), "");
    }

    #[test]
    fn min_returns_smaller() {
        assert_eq!(min(3, 7), 3);
        assert_eq!(min(7, 3), 3);
        assert_eq!(min(-1, 0), -1);
        assert_eq!(min(5usize, 5usize), 5);
    }

    #[test]
    fn contains_is_exact_match() {
        let domain = ["openscap", "clamav"];
        assert!(contains("openscap", &domain));
        assert!(contains("clamav", &domain));
        assert!(!contains("OpenSCAP", &domain));
        assert!(!contains("clam", &domain));
        assert!(!contains("", &domain));
    }

    #[test]
    fn contains_empty_domain_is_false() {
        let domain: [&str; 0] = [];
        assert!(!contains("anything", &domain));
        assert!(!contains("", &domain));
    }

    #[test]
    fn contains_accepts_owned_strings() {
        let domain = vec!["always".to_owned(), "never".to_owned()];
        assert!(contains("never", &domain));
    }

    #[test]
    fn deduplicate_preserves_first_occurrence_order() {
        let items = ["clamav", "openscap", "clamav", "openscap", "extra"];
        assert_eq!(deduplicate(&items), vec!["clamav", "openscap", "extra"]);
    }

    #[test]
    fn deduplicate_is_idempotent() {
        let inputs: Vec<Vec<&str>> = vec![
            vec![],
            vec!["a"],
            vec!["a", "a", "a"],
            vec!["b", "a", "b", "c", "a"],
            vec!["", "x", ""],
        ];
        for input in inputs {
            let once = deduplicate(&input);
            let twice = deduplicate(&once);
            assert_eq!(once, twice, "deduplicate should be idempotent for {input:?}");
        }
    }

    #[test]
    fn deduplicate_is_case_sensitive() {
        let items = ["ClamAV", "clamav"];
        assert_eq!(deduplicate(&items).len(), 2);
    }
}
