//! 설정값 보고 메시지 규칙.

/// 보고 메시지 접두어.
pub const CONFIG_VALUE_PREFIX: &str = "Value from config file: ";

/// 설정값을 보고 메시지로 만든다. 빈 값도 그대로 붙인다.
pub fn config_value_message(value: &str) -> String {
    format!("{CONFIG_VALUE_PREFIX}{value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_appends_value() {
        assert_eq!(config_value_message("hello"), "Value from config file: hello");
    }

    #[test]
    fn empty_value_keeps_prefix() {
        assert_eq!(config_value_message(""), "Value from config file: ");
    }
}
