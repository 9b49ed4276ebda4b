#[cfg(test)]
mod tests {
    use crate::config::{
        resolve_api_key, BackendConfig, Settings, DEFAULT_API_BASE, DEFAULT_MODEL_CANDIDATES,
    };
    use crate::error::IdeaError;
    use std::time::Duration;

    const CFG_FULL: &str = r#"
[backend]
api_base = "https://proxy.example.com/v1beta/"
timeout_secs = 45

[models]
candidates = ["gemini-2.0-flash", "gemini-1.5-pro"]
"#;

    const CFG_SINGLE_CANDIDATE: &str = r#"
[models]
candidates = "gemini-1.5-pro"
"#;

    const CFG_BAD_BASE: &str = r#"
[backend]
api_base = "not a url"
"#;

    const CFG_FTP_BASE: &str = r#"
[backend]
api_base = "ftp://files.example.com/v1beta"
"#;

    const CFG_BLANK_CANDIDATE: &str = r#"
[models]
candidates = ["gemini-1.5-flash", "  "]
"#;

    #[test]
    fn empty_file_uses_defaults() {
        let settings = Settings::parse("").expect("empty config should parse");
        assert_eq!(settings.backend.api_base, DEFAULT_API_BASE);
        assert_eq!(settings.backend.timeout_secs, None);
        assert_eq!(settings.models.candidates, DEFAULT_MODEL_CANDIDATES);
    }

    #[test]
    fn default_config_text_matches_defaults() {
        let settings =
            Settings::parse(Settings::default_config_text()).expect("default config should parse");
        assert_eq!(settings.backend.api_base, DEFAULT_API_BASE);
        assert_eq!(settings.models.candidates, DEFAULT_MODEL_CANDIDATES);
    }

    #[test]
    fn reads_full_config() {
        let settings = Settings::parse(CFG_FULL).expect("full config should parse");
        assert_eq!(settings.backend.timeout_secs, Some(45));
        assert_eq!(
            settings.models.candidates,
            vec!["gemini-2.0-flash".to_string(), "gemini-1.5-pro".to_string()]
        );

        let backend = BackendConfig::from_settings(&settings.backend, "k".to_string())
            .expect("backend config");
        assert_eq!(backend.api_base.as_str(), "https://proxy.example.com/v1beta");
        assert_eq!(backend.timeout, Some(Duration::from_secs(45)));
    }

    #[test]
    fn accepts_single_candidate_string() {
        let settings = Settings::parse(CFG_SINGLE_CANDIDATE).expect("config should parse");
        assert_eq!(settings.models.candidates, vec!["gemini-1.5-pro".to_string()]);
        assert_eq!(settings.backend.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn rejects_invalid_api_base() {
        let err = Settings::parse(CFG_BAD_BASE).expect_err("bad base should fail");
        assert!(matches!(err, IdeaError::Config(_)), "unexpected error: {}", err);
        assert!(err.to_string().contains("not a url"));

        let err = Settings::parse(CFG_FTP_BASE).expect_err("ftp base should fail");
        assert!(err.to_string().contains("http or https"), "{}", err);
    }

    #[test]
    fn rejects_blank_candidate() {
        let err = Settings::parse(CFG_BLANK_CANDIDATE).expect_err("blank candidate should fail");
        assert!(matches!(err, IdeaError::Config(_)));
    }

    #[test]
    fn reports_malformed_toml() {
        let err = Settings::parse("[backend\napi_base = 1").expect_err("broken toml");
        assert_eq!(err.error_code(), "toml_parse_error");
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, CFG_FULL).expect("write config");

        let settings = Settings::load(&path).expect("load config");
        assert_eq!(settings.backend.timeout_secs, Some(45));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = Settings::load(&dir.path().join("absent.toml")).expect_err("missing file");
        assert_eq!(err.error_code(), "io_error");
    }

    #[test]
    fn explicit_key_wins_over_environment() {
        let key = resolve_api_key(Some("explicit".to_string()), Some("from-env".to_string()))
            .expect("key");
        assert_eq!(key, "explicit");
    }

    #[test]
    fn blank_explicit_key_falls_back_to_environment() {
        let key = resolve_api_key(Some("   ".to_string()), Some(" from-env\n".to_string()))
            .expect("key");
        assert_eq!(key, "from-env");
    }

    #[test]
    fn missing_key_is_configuration_error() {
        let err = resolve_api_key(None, Some(String::new())).expect_err("no key");
        assert!(matches!(err, IdeaError::Config(_)));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }
}
