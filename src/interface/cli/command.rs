//! CLI 명령 파싱 모듈.

use clap::Parser;

/// 인자는 받지 않는다. `--help`/`--version`만 제공한다.
#[derive(Debug, Parser)]
#[command(name = "optwire", version)]
#[command(about = "Log MyService.ConfigValue from ./appsettings.json")]
pub struct Cli {}

impl Cli {
    /// 알 수 없는 인자는 clap이 exit code 2로 거부한다.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn rejects_positional_arguments() {
        assert!(Cli::try_parse_from(["optwire", "extra"]).is_err());
        assert!(Cli::try_parse_from(["optwire"]).is_ok());
    }
}
