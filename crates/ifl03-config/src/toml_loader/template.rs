//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# iFL03 client configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[bridge]
# push_callback = "onIFL03State"
# host_command = "C:/Program Files/iFL03/ifl03-host.exe"
# host_args = []

[updates]
# enabled = true
# check_on_startup = true
# repo_owner = "SemSodermans31"
# repo_name = "iFL03"
# timeout_secs = 10       # 1-120

[ui]
# version_file = "version.json"
# status_ttl_ms = 3000     # 500-30000
# save_feedback_ms = 2000  # 500-30000
# nudge_step = 1           # 1-100

[logging]
# level = "info"           # trace, debug, info, warn, error
"##
    .to_string()
}
