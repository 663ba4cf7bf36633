use super::*;

#[test]
fn parses_run_command() {
    let cli = Cli::try_parse_from(["foodtrend", "run"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Run { dry_run: false }));
}

#[test]
fn parses_run_dry_run_flag() {
    let cli =
        Cli::try_parse_from(["foodtrend", "run", "--dry-run"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Run { dry_run: true }));
}

#[test]
fn parses_collect_and_schedule() {
    let collect = Cli::try_parse_from(["foodtrend", "collect"]).expect("expected valid cli args");
    assert!(matches!(collect.command, Commands::Collect));

    let schedule =
        Cli::try_parse_from(["foodtrend", "schedule"]).expect("expected valid cli args");
    assert!(matches!(schedule.command, Commands::Schedule));
}

#[test]
fn missing_command_is_rejected() {
    assert!(Cli::try_parse_from(["foodtrend"]).is_err());
}

#[test]
fn unknown_flag_is_rejected() {
    assert!(Cli::try_parse_from(["foodtrend", "collect", "--dry-run"]).is_err());
}
