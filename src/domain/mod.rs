//! Domain layer
//! 외부 의존성 없이 표현되는 값 객체와 메시지 규칙.

pub mod report;
pub mod severity;
