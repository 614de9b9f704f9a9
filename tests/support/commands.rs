//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create an envseal command with a clean environment.
    ///
    /// Returns a Command configured with:
    /// - Current directory set to the test project directory
    /// - The fake AWS CLI selected through `ENVSEAL_AWS_CLI`
    /// - No inherited key id or log filter
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("envseal").expect("failed to find envseal binary");
        cmd.current_dir(self.dir.path());
        cmd.env("ENVSEAL_AWS_CLI", self.aws());
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("ENVSEAL_KEY_ID");
        cmd.env_remove("ENVSEAL_LOG");
        cmd
    }

    /// Run `envseal --key-id <key>` with extra arguments.
    pub fn seal_with(&self, key: &str, args: &[&str]) -> Output {
        self.cmd()
            .args(["--key-id", key])
            .args(args)
            .output()
            .expect("failed to run envseal")
    }

    /// Shortcut for `envseal --key-id K1`.
    pub fn seal(&self) -> Output {
        self.seal_with("K1", &[])
    }

    /// Shortcut for `envseal --key-id K1 --dry-run`.
    pub fn dry_run(&self) -> Output {
        self.seal_with("K1", &["--dry-run"])
    }
}
