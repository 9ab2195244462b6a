//! Argument parsing for the graphnav binary

use clap::Parser;
use graphnav::cli::args::{Cli, Commands, ScalarKind};
use graphnav::util::testing;
use rstest::rstest;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

#[test]
fn given_get_with_type_when_parsing_then_selects_kind() {
    let cli = Cli::try_parse_from([
        "graphnav", "-dd", "get", "dump.json", "me", "birthday", "--as", "date", "--all",
    ])
    .unwrap();

    assert_eq!(cli.debug, 2);
    match cli.command {
        Commands::Get {
            path, prop, all, kind, ..
        } => {
            assert_eq!(path, "me");
            assert_eq!(prop, "birthday");
            assert!(all);
            assert_eq!(kind, ScalarKind::Date);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn given_tree_with_props_when_parsing_then_collects_them() {
    let cli = Cli::try_parse_from(["graphnav", "tree", "dump.json", "me", "-p", "name", "-p", "age"])
        .unwrap();

    match cli.command {
        Commands::Tree { props, path, .. } => {
            assert_eq!(props, vec!["name", "age"]);
            assert_eq!(path.as_deref(), Some("me"));
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[rstest]
#[case(&["graphnav"])]
#[case(&["graphnav", "get", "dump.json", "me"])]
#[case(&["graphnav", "get", "dump.json", "me", "name", "--as", "text"])]
fn given_incomplete_args_when_parsing_then_rejects(#[case] args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}
