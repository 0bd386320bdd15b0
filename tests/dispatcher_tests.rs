//! Tests for Dispatcher
//!
//! These tests verify:
//! - Routing of every command to its repository operation
//! - Argument-count validation
//! - Tolerant numeric decoding
//! - Unknown commands never touch storage

use scpstats::dispatcher::parse_command;
use scpstats::protocol::{decode_line, Command, Frame, Outcome};
use scpstats::{Counter, Dispatcher, MemoryRepository, Result, StatRecord, StatsError, StatsRepository};

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_dispatcher() -> Dispatcher<MemoryRepository> {
    Dispatcher::new(MemoryRepository::new())
}

fn send(dispatcher: &Dispatcher<MemoryRepository>, line: &str) -> Result<Outcome> {
    dispatcher.dispatch(&decode_line(line).unwrap())
}

fn record(dispatcher: &Dispatcher<MemoryRepository>, player_id: &str) -> StatRecord {
    dispatcher.repository().get(player_id).unwrap()
}

// =============================================================================
// Routing Tests
// =============================================================================

#[test]
fn test_insert_decodes_payload() {
    let dispatcher = setup_dispatcher();

    let outcome = send(&dispatcher, "Insert alice,1.1.1.1;2.2.2.2,0,3,5,120,1000").unwrap();
    assert_eq!(outcome, Outcome::Inserted);

    let alice = record(&dispatcher, "alice");
    assert_eq!(alice.ip_addresses, vec!["1.1.1.1", "2.2.2.2"]);
    assert_eq!(alice.scp_kills, 3);
    assert_eq!(alice.human_kills, 5);
    assert_eq!(alice.play_time_seconds, 120);
    assert_eq!(alice.last_played, 1000);
}

#[test]
fn test_insert_twice_reports_duplicate() {
    let dispatcher = setup_dispatcher();
    send(&dispatcher, "Insert alice,,1,1,1,1,1").unwrap();

    let err = send(&dispatcher, "Insert alice,,9,9,9,9,9").unwrap_err();
    assert!(matches!(err, StatsError::DuplicateKey(_)));
    assert_eq!(record(&dispatcher, "alice").deaths, 1);
}

#[test]
fn test_check_creates_then_leaves_alone() {
    let dispatcher = setup_dispatcher();

    assert_eq!(send(&dispatcher, "Check bob").unwrap(), Outcome::Created);
    send(&dispatcher, "AddHumanKills bob 4").unwrap();
    assert_eq!(send(&dispatcher, "Check bob").unwrap(), Outcome::AlreadyPresent);

    assert_eq!(record(&dispatcher, "bob").human_kills, 4);
}

#[test]
fn test_update_replaces_addressed_record() {
    let dispatcher = setup_dispatcher();
    send(&dispatcher, "Insert alice,1.1.1.1,0,3,5,120,1000").unwrap();

    let outcome = send(&dispatcher, "Update alice alice,8.8.8.8,2,4,6,300,2000").unwrap();
    assert_eq!(outcome, Outcome::Replaced);

    let alice = record(&dispatcher, "alice");
    assert_eq!(alice.ip_addresses, vec!["8.8.8.8"]);
    assert_eq!(alice.deaths, 2);
    assert_eq!(alice.play_time_seconds, 300);
    assert_eq!(alice.last_played, 2000);
}

#[test]
fn test_update_missing_is_not_found() {
    let dispatcher = setup_dispatcher();

    let err = send(&dispatcher, "Update ghost ghost,,1,1,1,1,1").unwrap_err();
    assert!(matches!(err, StatsError::NotFound(_)));
    assert!(dispatcher.repository().is_empty());
}

#[test]
fn test_add_ip_address_reports_history_length() {
    let dispatcher = setup_dispatcher();
    send(&dispatcher, "Check bob").unwrap();

    assert_eq!(
        send(&dispatcher, "AddIpAddress bob 1.1.1.1").unwrap(),
        Outcome::IpAppended { history_len: 1 }
    );
    assert_eq!(
        send(&dispatcher, "AddIpAddress bob 2.2.2.2").unwrap(),
        Outcome::IpAppended { history_len: 2 }
    );
    assert_eq!(record(&dispatcher, "bob").ip_addresses, vec!["1.1.1.1", "2.2.2.2"]);
}

#[test]
fn test_counter_commands() {
    let dispatcher = setup_dispatcher();
    send(&dispatcher, "Check alice").unwrap();

    for line in [
        "AddDeaths alice 2",
        "AddDeaths alice 3",
        "AddScpKills alice 1",
        "AddHumanKills alice 7",
        "AddPlayTime alice 3600",
    ] {
        assert_eq!(send(&dispatcher, line).unwrap(), Outcome::Incremented);
    }

    let alice = record(&dispatcher, "alice");
    assert_eq!(alice.deaths, 5);
    assert_eq!(alice.scp_kills, 1);
    assert_eq!(alice.human_kills, 7);
    assert_eq!(alice.play_time_seconds, 3600);
}

#[test]
fn test_set_last_played() {
    let dispatcher = setup_dispatcher();
    send(&dispatcher, "Check alice").unwrap();

    assert_eq!(
        send(&dispatcher, "SetLastPlayed alice 1700000000").unwrap(),
        Outcome::LastPlayedSet
    );
    assert_eq!(record(&dispatcher, "alice").last_played, 1_700_000_000);
}

#[test]
fn test_counter_on_missing_player_is_not_found() {
    let dispatcher = setup_dispatcher();

    let err = send(&dispatcher, "AddDeaths ghost 1").unwrap_err();
    assert!(matches!(err, StatsError::NotFound(_)));
    assert!(dispatcher.repository().is_empty());
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_unknown_command_does_not_mutate() {
    let dispatcher = setup_dispatcher();

    let err = send(&dispatcher, "DeletePlayer alice").unwrap_err();
    assert!(matches!(err, StatsError::UnknownCommand(ref name) if name == "DeletePlayer"));
    assert!(dispatcher.repository().is_empty());
}

#[test]
fn test_missing_arguments_are_rejected() {
    let dispatcher = setup_dispatcher();
    send(&dispatcher, "Check alice").unwrap();

    for line in ["AddDeaths alice", "Insert", "Update alice", "AddIpAddress alice", "Check"] {
        let err = send(&dispatcher, line).unwrap_err();
        assert!(matches!(err, StatsError::BadArguments(_)), "line {:?}", line);
    }

    assert_eq!(record(&dispatcher, "alice"), StatRecord::new("alice"));
}

#[test]
fn test_extra_arguments_are_ignored() {
    let dispatcher = setup_dispatcher();

    assert_eq!(send(&dispatcher, "Check bob trailing junk").unwrap(), Outcome::Created);
    send(&dispatcher, "AddDeaths bob 2 3").unwrap();
    assert_eq!(record(&dispatcher, "bob").deaths, 2);
}

#[test]
fn test_malformed_payload_is_rejected() {
    let dispatcher = setup_dispatcher();

    let err = send(&dispatcher, "Insert alice,1.1.1.1,0").unwrap_err();
    assert!(matches!(err, StatsError::MalformedCommand(_)));
    assert!(dispatcher.repository().is_empty());
}

// =============================================================================
// Tolerant Decode Tests
// =============================================================================

#[test]
fn test_non_numeric_count_decodes_to_zero() {
    let dispatcher = setup_dispatcher();
    send(&dispatcher, "Insert pid,,0,3,0,0,0").unwrap();

    assert_eq!(send(&dispatcher, "AddScpKills pid notanumber").unwrap(), Outcome::Incremented);
    assert_eq!(record(&dispatcher, "pid").scp_kills, 3);
}

#[test]
fn test_negative_count_decodes_to_zero() {
    let dispatcher = setup_dispatcher();
    send(&dispatcher, "Insert pid,,5,0,0,0,0").unwrap();

    send(&dispatcher, "AddDeaths pid -3").unwrap();
    assert_eq!(record(&dispatcher, "pid").deaths, 5);
}

#[test]
fn test_non_numeric_timestamp_decodes_to_zero() {
    let dispatcher = setup_dispatcher();
    send(&dispatcher, "Insert pid,,0,0,0,0,1000").unwrap();

    send(&dispatcher, "SetLastPlayed pid yesterday").unwrap();
    assert_eq!(record(&dispatcher, "pid").last_played, 0);
}

// =============================================================================
// Command Parsing Tests
// =============================================================================

#[test]
fn test_parse_command_builds_typed_command() {
    let frame = Frame {
        command: "AddPlayTime".to_string(),
        args: vec!["alice".to_string(), "90".to_string()],
    };

    assert_eq!(
        parse_command(&frame).unwrap(),
        Command::Increment {
            player_id: "alice".to_string(),
            counter: Counter::PlayTime,
            delta: 90,
        }
    );
}

#[test]
fn test_parse_then_encode_is_canonical() {
    for line in [
        "Insert alice,1.1.1.1;2.2.2.2,0,3,5,120,1000",
        "Check bob",
        "Update alice alice,,1,2,3,4,5",
        "AddIpAddress bob 10.0.0.1",
        "AddHumanKills bob 3",
        "SetLastPlayed bob -1",
    ] {
        let command = parse_command(&decode_line(line).unwrap()).unwrap();
        assert_eq!(command.encode(), line);
    }
}

#[test]
fn test_outcome_mutated() {
    assert!(Outcome::Created.mutated());
    assert!(Outcome::Incremented.mutated());
    assert!(!Outcome::AlreadyPresent.mutated());
}
