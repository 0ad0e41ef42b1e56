use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use lkv_cli::{Command, InfoKind, KeyArgs, LkctlArgs, LkverifyArgs, KEYS_DIR_ENV};
use lkv_license::DEFAULT_DURATION_DAYS;
use pretty_assertions::assert_eq;

fn keys_dir_from_env_is_unset() -> bool {
    std::env::var_os(KEYS_DIR_ENV).is_none()
}

#[test]
fn lkctl_definition_is_consistent() {
    LkctlArgs::command().debug_assert();
}

#[test]
fn lkverify_definition_is_consistent() {
    LkverifyArgs::command().debug_assert();
}

#[test]
fn get_accepts_each_info_kind() {
    for (arg, kind) in [
        ("mac", InfoKind::Mac),
        ("uuid", InfoKind::Uuid),
        ("cpuid", InfoKind::Cpuid),
        ("all", InfoKind::All),
    ] {
        let args = LkctlArgs::try_parse_from(["lkctl", "get", arg]).unwrap();
        match args.command {
            Command::Get { info } => assert_eq!(info, kind),
            other => panic!("unexpected command {other:?}"),
        }
    }
}

#[test]
fn get_rejects_unknown_info_kind() {
    assert!(LkctlArgs::try_parse_from(["lkctl", "get", "serial"]).is_err());
}

#[test]
fn keys_output_defaults_to_current_dir() {
    let args = LkctlArgs::try_parse_from(["lkctl", "keys"]).unwrap();
    match args.command {
        Command::Keys { output } => assert_eq!(output, PathBuf::from(".")),
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn gen_flags_become_options() {
    let args = LkctlArgs::try_parse_from([
        "lkctl",
        "gen",
        "--mac",
        "AA:BB:CC:DD:EE:FF",
        "--customer",
        "Acme",
        "--product",
        "Widget",
        "--version",
        "2.1.0",
        "--features",
        "export, sync,,",
        "--max-users",
        "25",
        "--duration",
        "30",
        "--notes",
        "trial",
        "out/license.lic",
    ])
    .unwrap();

    let Command::Gen(gen_args) = args.command else {
        panic!("expected gen");
    };
    assert_eq!(gen_args.output, PathBuf::from("out/license.lic"));

    let options = gen_args.options().unwrap();
    assert_eq!(options.mac, "AA:BB:CC:DD:EE:FF");
    assert_eq!(options.customer_name, "Acme");
    assert_eq!(options.product_name, "Widget");
    assert_eq!(options.version, "2.1.0");
    assert_eq!(options.features, vec!["export".to_string(), "sync".to_string()]);
    assert_eq!(options.max_users, 25);
    assert_eq!(options.duration, chrono::Duration::days(30));
    assert_eq!(options.notes, "trial");
    assert!(options.uuid.is_empty());
}

#[test]
fn gen_defaults() {
    let args = LkctlArgs::try_parse_from(["lkctl", "gen", "license.lic"]).unwrap();
    let Command::Gen(gen_args) = args.command else {
        panic!("expected gen");
    };

    let options = gen_args.options().unwrap();
    assert_eq!(options.duration, chrono::Duration::days(DEFAULT_DURATION_DAYS));
    assert!(options.product_name.is_empty());
    assert!(options.features.is_empty());
    assert!(gen_args.private_key.is_none());
    assert!(gen_args.aes_key.is_none());
    if keys_dir_from_env_is_unset() {
        assert_eq!(gen_args.keys_dir, PathBuf::from("keys"));
    }
}

#[test]
fn gen_accepts_negative_duration_for_the_library_to_reject() {
    let args = LkctlArgs::try_parse_from(["lkctl", "gen", "--duration", "-1", "x.lic"]).unwrap();
    let Command::Gen(gen_args) = args.command else {
        panic!("expected gen");
    };
    assert_eq!(gen_args.options().unwrap().duration, chrono::Duration::days(-1));
}

#[test]
fn gen_rejects_out_of_range_duration() {
    let args = LkctlArgs::try_parse_from([
        "lkctl",
        "gen",
        "--duration",
        "9223372036854775807",
        "x.lic",
    ])
    .unwrap();
    let Command::Gen(gen_args) = args.command else {
        panic!("expected gen");
    };
    assert!(gen_args.options().is_err());
}

#[test]
fn gen_requires_output_file() {
    assert!(LkctlArgs::try_parse_from(["lkctl", "gen"]).is_err());
}

#[test]
fn verbose_is_global() {
    let args = LkctlArgs::try_parse_from(["lkctl", "verify", "license.lic", "--verbose"]).unwrap();
    assert!(args.verbose);
}

#[test]
fn key_paths_resolve_from_dir() {
    let keys = KeyArgs {
        keys_dir: PathBuf::from("/srv/keys"),
        public_key: None,
        aes_key: None,
    };
    assert_eq!(keys.public_key_path(), PathBuf::from("/srv/keys/public.pem"));
    assert_eq!(keys.aes_key_path(), PathBuf::from("/srv/keys/aes.key"));
}

#[test]
fn explicit_key_files_override_dir() {
    let args = LkverifyArgs::try_parse_from([
        "lkverify",
        "license.lic",
        "--keys-dir",
        "/srv/keys",
        "--public-key",
        "/etc/pub.pem",
    ])
    .unwrap();
    assert_eq!(args.keys.public_key_path(), PathBuf::from("/etc/pub.pem"));
    assert_eq!(args.keys.aes_key_path(), PathBuf::from("/srv/keys/aes.key"));
}

#[test]
fn lkverify_flags() {
    let args = LkverifyArgs::try_parse_from(["lkverify", "license.lic", "--json", "--quiet"]).unwrap();
    assert_eq!(args.license, PathBuf::from("license.lic"));
    assert!(args.json);
    assert!(args.quiet);
    assert!(!args.verbose);
}

#[test]
fn lkverify_argument_errors_exit_with_two() {
    for argv in [
        vec!["lkverify"],
        vec!["lkverify", "license.lic", "--unknown"],
        vec!["lkverify", "a.lic", "b.lic"],
        vec!["lkverify", "license.lic", "--keys-dir"],
    ] {
        let err = LkverifyArgs::try_parse_from(argv.iter().copied()).unwrap_err();
        assert_eq!(err.exit_code(), 2, "{argv:?}");
    }
}

#[test]
fn lkverify_help_exits_with_zero() {
    let err = LkverifyArgs::try_parse_from(["lkverify", "--help"]).unwrap_err();
    assert_eq!(err.exit_code(), 0);
    assert!(err.to_string().contains("Exit codes"));
}
