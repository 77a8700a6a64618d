use doordice_game::{
    EventAction, GameSession, Phase, PlayerStatus, ScriptedDie, SessionConfig, TurnResult,
    constants::MAX_HP, result::Ending,
};

fn scripted_session(faces: &[u8], round_cap: u32) -> GameSession {
    let config = SessionConfig::default()
        .with_shuffle_seating(false)
        .with_round_cap(round_cap);
    let die = ScriptedDie::from_values(faces).unwrap();
    GameSession::with_die(config, Box::new(die)).unwrap()
}

fn ultimate_strike(session: &mut GameSession, target: usize) -> TurnResult {
    let roll = session.request_roll().unwrap();
    assert_eq!(roll.next_phase, Phase::AwaitingChoice);
    session.choose_option("dmg_6").unwrap();
    session.choose_target(target).unwrap()
}

fn roll_then_target(session: &mut GameSession, target: usize) -> TurnResult {
    session.request_roll().unwrap();
    session.choose_target(target).unwrap()
}

fn hp(session: &GameSession, seat: usize) -> u8 {
    session.current_state().players[seat].hp
}

fn vp(session: &GameSession, seat: usize) -> u32 {
    session.current_state().players[seat].vp
}

#[test]
fn critical_fail_hurts_the_roller_and_passes_the_turn() {
    let mut session = scripted_session(&[1], 10);
    let outcome = session.request_roll().unwrap();
    assert_eq!(outcome.face.value(), 1);
    assert_eq!(outcome.title, "CRITICAL FAIL");

    let state = session.current_state();
    assert_eq!(state.players[0].hp, 17);
    assert_eq!(state.phase, Phase::Idle);
    assert_eq!(state.active_seat, 1);
    assert_eq!(state.prompt.title, "BIJAY SHAI'S TURN");
}

#[test]
fn heavy_strike_on_a_weakened_target_pays_the_bounty() {
    let mut session = scripted_session(&[6, 6, 5, 5, 1, 2, 4], 10);

    // Round 1: wear seat 4 down to 5 HP.
    ultimate_strike(&mut session, 4);
    ultimate_strike(&mut session, 4);
    session.request_roll().unwrap();
    session.request_roll().unwrap();
    session.request_roll().unwrap();
    assert_eq!(session.current_state().round, 2);
    assert_eq!(hp(&session, 4), 5);

    // Round 2: a jab to 3 HP, then the lethal heavy strike.
    roll_then_target(&mut session, 4);
    assert_eq!(hp(&session, 4), 3);

    let outcome = session.request_roll().unwrap();
    assert_eq!(outcome.title, "HEAVY STRIKE");
    assert_eq!(
        session.current_state().prompt.detail,
        "Select Target for 4 DMG"
    );
    let before = vp(&session, 1);
    let result = session.choose_target(4).unwrap();

    let state = session.current_state();
    assert_eq!(state.players[4].hp, 0);
    assert_eq!(state.players[4].status, PlayerStatus::Fallen);
    assert_eq!(state.players[1].vp, before + 2);
    assert_eq!(state.players[4].last_targeted_by, Some(1));
    let actions: Vec<EventAction> = result.events.iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![EventAction::Damage, EventAction::Fallen, EventAction::Bounty]
    );
    assert_eq!(result.events[1].message, "SHERE ELIMINATED");
}

#[test]
fn fallen_void_mist_changes_nothing_but_the_turn() {
    // Seat 2 dies to its own critical fails, then takes ghost turns.
    let mut faces = Vec::new();
    for _ in 0..7 {
        faces.extend_from_slice(&[5, 5, 1, 5, 5]);
    }
    faces.extend_from_slice(&[5, 5, 2]);
    let mut session = scripted_session(&faces, 10);

    for _ in 0..faces.len() - 1 {
        session.request_roll().unwrap();
    }
    let state = session.current_state();
    assert_eq!(state.active_seat, 2);
    assert_eq!(state.players[2].status, PlayerStatus::Fallen);
    assert_eq!(state.prompt.detail, "Ghost Turn - Roll the die");
    session.events();

    let outcome = session.request_roll().unwrap();
    assert_eq!(outcome.title, "VOID MIST");
    let after = session.current_state();
    assert_eq!(after.active_seat, 3);
    assert_eq!(after.phase, Phase::Idle);
    assert_eq!(after.players, {
        let mut expected = state.players.clone();
        expected[2].is_active = false;
        expected[3].is_active = true;
        expected
    });
    let actions: Vec<EventAction> = session.events().iter().map(|e| e.action).collect();
    assert_eq!(actions, vec![EventAction::Rolled, EventAction::NoEffect]);
}

#[test]
fn third_round_wrap_pays_the_three_survivors() {
    let faces = [6, 6, 6, 2, 1, 6, 6, 6, 1, 2, 5, 5, 5, 1, 1];
    let mut session = scripted_session(&faces, 10);

    // Round 1: seat 4 falls to seat 3.
    ultimate_strike(&mut session, 4);
    ultimate_strike(&mut session, 4);
    ultimate_strike(&mut session, 4);
    roll_then_target(&mut session, 4);
    session.request_roll().unwrap();

    // Round 2: seat 3 is worn down and finishes itself off.
    ultimate_strike(&mut session, 3);
    ultimate_strike(&mut session, 3);
    ultimate_strike(&mut session, 3);
    session.request_roll().unwrap();
    session.request_roll().unwrap();
    assert_eq!(session.current_state().alive_count(), 3);

    // Round 3: quiet turns up to seat 4.
    for _ in 0..4 {
        session.request_roll().unwrap();
    }
    let before = session.current_state();
    assert_eq!(before.round, 3);
    assert_eq!(before.active_seat, 4);

    session.request_roll().unwrap();
    let after = session.current_state();
    assert_eq!(after.round, 4);
    assert_eq!(after.phase, Phase::Idle);
    assert_eq!(after.active_seat, 0);
    for seat in 0..3 {
        assert_eq!(after.players[seat].vp, before.players[seat].vp + 1);
        assert_eq!(
            after.players[seat].rounds_survived,
            before.players[seat].rounds_survived + 1
        );
    }
    for seat in 3..5 {
        assert_eq!(after.players[seat].vp, before.players[seat].vp);
        assert_eq!(
            after.players[seat].rounds_survived,
            before.players[seat].rounds_survived
        );
    }
}

#[test]
fn last_survivor_ends_the_game_mid_round() {
    let mut session = scripted_session(&[6], 10);
    let mut guard = 0;
    while session.current_state().phase != Phase::GameOver {
        guard += 1;
        assert!(guard < 500, "game did not finish");
        let state = session.current_state();
        match state.phase {
            Phase::Idle => {
                session.request_roll().unwrap();
            }
            Phase::AwaitingChoice => {
                session.choose_option("dmg_6").unwrap();
            }
            Phase::AwaitingTarget | Phase::AwaitingTargetFallen => {
                let target = *state.eligible_targets.iter().max().unwrap();
                session.choose_target(target).unwrap();
            }
            other => panic!("unexpected phase {other}"),
        }
    }

    let summary = session.summary().unwrap();
    assert_eq!(summary.ending, Ending::LastStanding);
    assert_eq!(summary.winner, 0);
    assert_eq!(summary.rounds_played, 5);
    assert_eq!(summary.standings[0].status, PlayerStatus::Alive);
    assert!(
        summary.standings[1..]
            .iter()
            .all(|s| s.status == PlayerStatus::Fallen)
    );

    let events = session.events();
    let final_round_rolls = events
        .iter()
        .filter(|e| e.action == EventAction::Rolled && e.id.round == 5)
        .count();
    assert_eq!(final_round_rolls, 1);
    let standing_lines: Vec<&str> = events
        .iter()
        .filter(|e| e.action == EventAction::Standing)
        .map(|e| e.message.as_str())
        .collect();
    assert_eq!(standing_lines.len(), 5);
    assert!(standing_lines[0].starts_with("#1 ASHIKA"));

    let state = session.current_state();
    assert_eq!(state.prompt.title, "GAME OVER");
    assert_eq!(state.standings.as_ref().map(Vec::len), Some(5));
    assert!(session.request_roll().is_err());
}

#[test]
fn round_cap_forces_the_end() {
    let mut session = scripted_session(&[5], 2);
    for _ in 0..10 {
        session.request_roll().unwrap();
    }
    let summary = session.summary().unwrap();
    assert_eq!(summary.ending, Ending::RoundCap);
    assert_eq!(summary.rounds_played, 2);
    let state = session.current_state();
    assert!(state.players.iter().all(|p| p.hp == MAX_HP && p.vp == 2));
    assert_eq!(state.round, 3);

    let final_wrap: Vec<usize> = session
        .events()
        .iter()
        .filter(|e| e.action == EventAction::RoundBonus && e.id.round == 2)
        .filter_map(|e| e.actor)
        .collect();
    assert_eq!(final_wrap, vec![0, 1, 2, 3, 4]);
}

#[test]
fn fallen_cast_mode_can_switch_to_vp() {
    // Seat 0 critically fails until it falls, then blesses and curses by VP.
    let mut faces = Vec::new();
    for _ in 0..7 {
        faces.extend_from_slice(&[1, 5, 5, 5, 5]);
    }
    faces.extend_from_slice(&[3]);
    let mut session = scripted_session(&faces, 10);
    for _ in 0..35 {
        session.request_roll().unwrap();
    }
    assert_eq!(session.current_state().players[0].status, PlayerStatus::Fallen);

    let outcome = session.request_roll().unwrap();
    assert_eq!(outcome.title, "SPIRIT BLESS");
    let state = session.current_state();
    assert_eq!(state.eligible_targets, vec![1, 2, 3, 4]);
    let choices = state.pending_choice.unwrap();
    assert_eq!(choices[0].label, "+2 HP");
    assert!(choices[0].selected);

    let switched = session.choose_option("vp").unwrap();
    assert!(switched.events.is_empty());
    assert_eq!(switched.phase, Phase::AwaitingTargetFallen);
    let choices = session.current_state().pending_choice.unwrap();
    assert!(choices[1].selected);

    let before = vp(&session, 2);
    assert!(session.choose_option("dmg_6").is_err());
    session.choose_target(2).unwrap();
    assert_eq!(vp(&session, 2), before + 1);
}
