//! # Iris Core
//!
//! 채팅 봇의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 봇 전반에서 사용되는 기본 타입을 제공합니다:
//! - 즐겨찾기(워치리스트) 항목과 시세
//! - 보유 포지션 평가 (평가금액, 매수금액, 손익률)
//! - 기사 본문과 요약
//! - 에러 분류
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
