//! Keyword table: record identifier → trigger phrases.
//!
//! The table is configuration data. [`builtin`] returns the table shipped with
//! the engine; a TOML config may replace it (see [`crate::config`]).

use serde::Deserialize;

/// Trigger phrases for one record identifier.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeywordEntry {
    pub id: String,
    #[serde(default)]
    pub phrases: Vec<String>,
}

impl KeywordEntry {
    pub fn new<I, S>(id: impl Into<String>, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            phrases: phrases.into_iter().map(Into::into).collect(),
        }
    }
}

/// An ordered keyword table. Order breaks score ties.
pub type KeywordTable = Vec<KeywordEntry>;

const BUILTIN: &[(&str, &[&str])] = &[
    (
        "api-design",
        &[
            "api",
            "rest",
            "restful",
            "endpoint",
            "openapi",
            "swagger",
            "api design",
            "api 설계",
            "엔드포인트",
            "rest api",
        ],
    ),
    (
        "database-schema-design",
        &[
            "database",
            "schema",
            "db",
            "table",
            "sql",
            "postgresql",
            "mysql",
            "데이터베이스",
            "스키마",
            "테이블",
            "db 설계",
        ],
    ),
    (
        "authentication-setup",
        &[
            "auth",
            "authentication",
            "login",
            "jwt",
            "oauth",
            "session",
            "인증",
            "로그인",
            "세션",
        ],
    ),
    (
        "backend-testing",
        &[
            "backend test",
            "unit test",
            "integration test",
            "pytest",
            "백엔드 테스트",
            "단위 테스트",
        ],
    ),
    ("ui-component-patterns", &["ui", "component pattern", "design pattern", "ui 패턴"]),
    ("state-management", &["state", "redux", "zustand", "context", "상태 관리", "상태"]),
    ("responsive-design", &["responsive", "mobile", "반응형", "모바일"]),
    ("web-accessibility", &["accessibility", "a11y", "wcag", "접근성"]),
    ("code-review", &["review", "code review", "리뷰", "코드 리뷰", "코드리뷰"]),
    ("code-refactoring", &["refactor", "리팩토링", "리팩터링", "개선"]),
    (
        "debugging",
        &[
            "debug",
            "error",
            "bug",
            "exception",
            "traceback",
            "디버그",
            "디버깅",
            "에러",
            "버그",
            "오류",
        ],
    ),
    ("testing-strategies", &["test strategy", "testing", "tdd", "테스트 전략", "테스팅"]),
    ("performance-optimization", &["performance", "optimize", "slow", "memory", "성능", "최적화", "느림"]),
    ("deployment-automation", &["deploy", "ci/cd", "pipeline", "배포", "파이프라인"]),
    ("monitoring-observability", &["monitor", "log", "metric", "alert", "모니터링", "로그"]),
    (
        "security-best-practices",
        &[
            "security",
            "vulnerability",
            "xss",
            "sql injection",
            "csrf",
            "보안",
            "취약점",
            "인젝션",
        ],
    ),
    ("technical-writing", &["document", "documentation", "technical doc", "문서", "기술 문서"]),
    ("api-documentation", &["api doc", "api documentation", "api 문서"]),
    ("changelog-maintenance", &["changelog", "release note", "변경 로그", "릴리즈 노트"]),
    ("task-estimation", &["estimate", "estimation", "story point", "추정", "스토리 포인트"]),
    ("task-planning", &["plan", "planning", "task", "계획", "태스크"]),
    (
        "plannotator",
        &[
            "plannotator",
            "plannotator",
            "plan review",
            "review plan",
            "diff review",
            "/plannotator-review",
            "annotate plan",
            "visual plan",
            "계획 검토",
            "플랜뷰",
        ],
    ),
    ("sprint-retrospective", &["retrospective", "retro", "sprint", "회고"]),
    ("log-analysis", &["log analysis", "log", "로그 분석"]),
    ("data-analysis", &["data analysis", "analyze data", "데이터 분석"]),
    ("pattern-detection", &["pattern", "detect", "패턴"]),
    ("git-workflow", &["git", "commit", "branch", "merge", "깃", "커밋", "브랜치"]),
    ("skill-standardization", &["skill", "standardize", "convert skill", "스킬 변환"]),
    (
        "bmad",
        &[
            "bmad",
            "bmad-method",
            "agile ai",
            "multi-agent orchestration",
            "vibe coding",
            "spec-driven development",
            "sdd",
            "phase based development",
        ],
    ),
    (
        "ohmg",
        &[
            "ohmg",
            "multi-agent",
            "orchestration",
            "antigravity",
            "spawn agent",
            "PM agent",
            "frontend agent",
            "backend agent",
            "serena",
        ],
    ),
    (
        "agent-browser",
        &[
            "browser",
            "headless browser",
            "automation",
            "playwright",
            "accessibility tree",
            "refs",
            "screenshot",
            "web automation",
        ],
    ),
];

/// The keyword table shipped with the engine.
pub fn builtin() -> KeywordTable {
    BUILTIN
        .iter()
        .map(|(id, phrases)| KeywordEntry::new(*id, phrases.iter().copied()))
        .collect()
}
