//! 봇 전반의 에러 타입.
//!
//! 이 모듈은 모든 크레이트가 최종적으로 변환되는 에러 분류를 정의합니다.
//! 명령어 라우터는 이 에러를 사용자에게 보여줄 문장으로 바꿔 응답합니다.

use thiserror::Error;

/// 핵심 봇 에러.
#[derive(Debug, Error)]
pub enum BotError {
    /// 직접 조회와 한글명 검색 모두 실패
    #[error("심볼을 찾을 수 없음: {0}")]
    SymbolNotFound(String),

    /// 지원하지 않는 마켓의 심볼 등록 시도
    #[error("지원하지 않는 심볼: {0}")]
    UnknownSymbol(String),

    /// 즐겨찾기에 없는 심볼 삭제 시도
    #[error("등록되지 않은 심볼: {0}")]
    NotFound(String),

    /// 모든 본문 추출 단계 실패
    #[error("본문 추출 실패: {0}")]
    ExtractionFailed(String),

    /// 언어 모델 호출 실패 또는 타임아웃
    #[error("요약 생성 실패: {0}")]
    SummarizationFailed(String),

    /// 네트워크 에러
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 응답 파싱 에러
    #[error("파싱 에러: {0}")]
    Parse(String),

    /// 키-값 저장소 에러
    #[error("저장소 에러: {0}")]
    Store(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 잘못된 입력 (사용법 안내 문구를 담음)
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),
}

/// 봇 작업을 위한 Result 타입.
pub type BotResult<T> = Result<T, BotError>;

impl BotError {
    /// 채팅방에 그대로 응답할 사용자용 문구를 반환합니다.
    pub fn user_message(&self) -> String {
        match self {
            BotError::SymbolNotFound(_) => "검색된 코인이 없습니다.".to_string(),
            BotError::UnknownSymbol(_) => {
                "업비트 원화마켓만 지원합니다.\n\"!즐찾등록 코인명(영문심볼)\"로 입력하세요."
                    .to_string()
            }
            BotError::NotFound(_) => {
                "코인이 없거나 잘못된 명령입니다.\n\"!즐찾삭제 코인명(영문심볼)\"으로 입력하세요."
                    .to_string()
            }
            BotError::ExtractionFailed(_) => {
                "✅ 요약\n- 기사 내용 추출 실패\n- 사이트 접근 불가능\n- 수동으로 확인 필요\n- \n- \n- "
                    .to_string()
            }
            BotError::SummarizationFailed(_) => {
                "✅ 요약\n- 요약 생성 중 오류 발생\n- 잠시 후 재시도 권장\n- \n- \n- \n- ".to_string()
            }
            BotError::Network(_) | BotError::Parse(_) => {
                "데이터를 가져오는 중 오류가 발생했습니다. 잠시 후 다시 시도하세요.".to_string()
            }
            BotError::Store(_) => "저장소 처리 중 오류가 발생했습니다.".to_string(),
            BotError::Config(_) => "봇 설정이 올바르지 않습니다.".to_string(),
            BotError::InvalidInput(usage) => usage.clone(),
        }
    }

    /// 재시도하면 성공할 수 있는 에러인지 확인합니다.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BotError::Network(_) | BotError::SummarizationFailed(_))
    }
}

impl From<serde_json::Error> for BotError {
    fn from(err: serde_json::Error) -> Self {
        BotError::Parse(err.to_string())
    }
}
