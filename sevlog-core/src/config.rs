use std::sync::LazyLock;

use derive_from_env::FromEnv;

use crate::error::Error;

#[derive(FromEnv)]
#[from_env(prefix = "SEVLOG")]
#[allow(non_snake_case)]
pub struct SevLogConfig {
    #[from_env(default = "./log")]
    pub LOG_DIR: String,
    #[from_env(default = "false")]
    pub TO_STDERR: bool,
    #[from_env(default = "true")]
    pub ONE_OUTPUT: bool,
    #[from_env(default = "true")]
    pub ALSO_STDERR: bool,
}

static SEVLOG_CONFIG: LazyLock<std::result::Result<SevLogConfig, String>> =
    LazyLock::new(|| SevLogConfig::from_env().map_err(|err| format!("{err:?}")));

/// Environment configuration, read once per process.
pub fn sevlog_config() -> crate::error::Result<&'static SevLogConfig> {
    SEVLOG_CONFIG
        .as_ref()
        .map_err(|reason| Error::Config(reason.clone()))
}
