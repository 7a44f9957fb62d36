//! 채팅방에서 받은 메시지.

use serde::{Deserialize, Serialize};

/// 메시지 보낸 사람.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    /// 사용자 ID (즐겨찾기 키로 사용)
    pub id: String,
    /// 표시 이름
    pub name: String,
}

impl Sender {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// 수신 메시지.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingMessage {
    /// 채팅방 ID
    pub room_id: String,
    /// 보낸 사람
    pub sender: Sender,
    /// 메시지 원문
    pub text: String,
}

impl IncomingMessage {
    /// 새 메시지를 생성합니다.
    pub fn new(room_id: impl Into<String>, sender: Sender, text: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            sender,
            text: text.into(),
        }
    }

    /// 첫 단어 (명령어).
    pub fn command(&self) -> &str {
        self.text.split_whitespace().next().unwrap_or_default()
    }

    /// 명령어 뒤의 나머지 텍스트 (앞뒤 공백 제거).
    pub fn param(&self) -> &str {
        let text = self.text.trim_start();
        match text.find(char::is_whitespace) {
            Some(idx) => text[idx..].trim(),
            None => "",
        }
    }

    /// 명령어 뒤에 인자가 있는지 확인합니다.
    pub fn has_param(&self) -> bool {
        !self.param().is_empty()
    }

    /// 인자를 공백으로 나눈 목록.
    pub fn params(&self) -> Vec<&str> {
        self.param().split_whitespace().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(text: &str) -> IncomingMessage {
        IncomingMessage::new("room", Sender::new("u1", "홍길동"), text)
    }

    #[test]
    fn test_command_and_param() {
        let m = msg("  !코인   비트코인 캐시 ");
        assert_eq!(m.command(), "!코인");
        assert_eq!(m.param(), "비트코인 캐시");
        assert!(m.has_param());
        assert_eq!(m.params(), vec!["비트코인", "캐시"]);
    }

    #[test]
    fn test_no_param() {
        let m = msg("!즐");
        assert_eq!(m.command(), "!즐");
        assert_eq!(m.param(), "");
        assert!(!m.has_param());
        assert!(m.params().is_empty());
    }

    #[test]
    fn test_empty_text() {
        let m = msg("   ");
        assert_eq!(m.command(), "");
        assert!(!m.has_param());
    }
}
