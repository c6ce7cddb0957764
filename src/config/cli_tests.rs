//! Tests for CLI argument parsing.

use std::path::PathBuf;

use clap::Parser;

use super::cli::{Cli, Command};

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_send() {
        let cli = Cli::parse_from_iter([
            "samhook",
            "--url",
            "https://hooks.example.com/services/T0/B0/X",
            "send",
            "--text",
            "hello",
        ]);

        assert_eq!(
            cli.url.as_deref(),
            Some("https://hooks.example.com/services/T0/B0/X")
        );
        let args = cli.send_args().unwrap();
        assert_eq!(args.text, "hello");
        assert!(args.username.is_none());
        assert!(!cli.is_init());
    }

    #[test]
    fn global_options_accepted_after_subcommand() {
        let cli = Cli::parse_from_iter([
            "samhook",
            "send",
            "--text",
            "hi",
            "--url",
            "https://example.com/hook",
            "--retry-max",
            "5",
            "-v",
        ]);

        assert_eq!(cli.url.as_deref(), Some("https://example.com/hook"));
        assert_eq!(cli.retry_max, Some(5));
        assert!(cli.verbose);
    }

    #[test]
    fn parse_message_options() {
        let cli = Cli::parse_from_iter([
            "samhook",
            "send",
            "--text",
            "Deploy finished",
            "--username",
            "ci-bot",
            "--channel",
            "#deploys",
            "--icon-emoji",
            ":rocket:",
            "--icon-url",
            "https://example.com/a.png",
            "--color",
            "good",
            "--title",
            "Release 1.2",
        ]);

        let args = cli.send_args().unwrap();
        assert_eq!(args.username.as_deref(), Some("ci-bot"));
        assert_eq!(args.channel.as_deref(), Some("#deploys"));
        assert_eq!(args.icon_emoji.as_deref(), Some(":rocket:"));
        assert_eq!(args.icon_url.as_deref(), Some("https://example.com/a.png"));
        assert_eq!(args.color.as_deref(), Some("good"));
        assert_eq!(args.title.as_deref(), Some("Release 1.2"));
    }

    #[test]
    fn parse_retry_flags() {
        let cli = Cli::parse_from_iter([
            "samhook",
            "--timeout",
            "5",
            "--retry-interval",
            "2",
            "--no-retry",
            "--no-backoff",
            "--no-jitter",
            "send",
            "--text",
            "x",
        ]);

        assert_eq!(cli.timeout, Some(5));
        assert_eq!(cli.retry_interval, Some(2));
        assert!(cli.no_retry);
        assert!(cli.no_backoff);
        assert!(cli.no_jitter);
    }

    #[test]
    fn flags_default_to_false() {
        let cli = Cli::parse_from_iter(["samhook", "send", "--text", "x"]);

        assert!(!cli.no_retry);
        assert!(!cli.no_backoff);
        assert!(!cli.no_jitter);
        assert!(!cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn config_short_flag() {
        let cli = Cli::parse_from_iter(["samhook", "-c", "custom.toml", "send", "--text", "x"]);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
    }
}

mod subcommands {
    use super::*;

    #[test]
    fn init_uses_default_output() {
        let cli = Cli::parse_from_iter(["samhook", "init"]);

        assert!(cli.is_init());
        assert!(cli.send_args().is_none());
        match cli.command {
            Command::Init { output } => assert_eq!(output, PathBuf::from("samhook.toml")),
            Command::Send(_) => panic!("Expected init command"),
        }
    }

    #[test]
    fn init_with_custom_output() {
        let cli = Cli::parse_from_iter(["samhook", "init", "--output", "/tmp/hook.toml"]);

        match cli.command {
            Command::Init { output } => assert_eq!(output, PathBuf::from("/tmp/hook.toml")),
            Command::Send(_) => panic!("Expected init command"),
        }
    }

    #[test]
    fn send_requires_text() {
        assert!(Cli::try_parse_from(["samhook", "send"]).is_err());
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["samhook", "--url", "https://example.com"]).is_err());
    }

    #[test]
    fn rejects_non_numeric_timeout() {
        assert!(Cli::try_parse_from(["samhook", "--timeout", "soon", "init"]).is_err());
    }
}
