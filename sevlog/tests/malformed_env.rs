use sevlog::{Error, logger_config};
use tempfile::tempdir;

#[test]
fn test_malformed_env_is_reported() {
    // Single test in this process; nothing else reads the environment yet.
    unsafe { std::env::set_var("SEVLOG_ONE_OUTPUT", "maybe") };
    let tmp = tempdir().unwrap();
    let result = logger_config()
        .with_log_dir(tmp.path().join("logs"))
        .also_to_stderr(false)
        .build();
    assert!(matches!(result, Err(Error::Config(_))));
    assert!(!tmp.path().join("logs").exists());
    // The variable is read once, so explicit options do not help either.
    let result = logger_config()
        .with_log_dir(tmp.path().join("logs"))
        .to_stderr(false)
        .one_output(true)
        .also_to_stderr(false)
        .init_global();
    assert!(matches!(result, Err(Error::Config(_))));
}
