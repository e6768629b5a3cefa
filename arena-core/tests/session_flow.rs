//! End-to-end match flow driven through the public input and tick API.

use std::time::Duration;

use arena_core::{
    FrameLayers, InputEvent, Phase, Point, SceneKey, Session, SessionConfig, Slot, TreeHost,
    COMPUTER, HUMAN,
};

fn session_with(config: SessionConfig) -> Session {
    Session::new(config).expect("session")
}

fn session(seed: u64) -> Session {
    session_with(SessionConfig {
        seed: Some(seed),
        ..SessionConfig::default()
    })
}

fn center(s: &Session, id: arena_core::NodeId) -> Point {
    s.node_center(id).expect("live node")
}

fn click(s: &mut Session, at: Point) {
    s.handle_input(InputEvent::primary(at.x, at.y));
}

fn drag(s: &mut Session, from: Point, to: Point) {
    click(s, from);
    s.handle_input(InputEvent::pointer_move(to.x, to.y));
    click(s, to);
}

fn human_token_center(s: &Session, name: &str) -> Point {
    let id = s.minion_named(name).expect("minion").id;
    s.token_center(id).expect("token")
}

/// Run the countdown out so combat resolves.
fn expire_countdown(s: &mut Session, now: &mut Duration) {
    *now += s.config().placement_duration();
    s.tick(*now);
}

fn started(seed: u64) -> (Session, Duration) {
    let mut s = session(seed);
    assert!(s.start_match());
    (s, Duration::ZERO)
}

#[test]
fn new_session_waits_on_intro() {
    let s = session(1);
    assert_eq!(s.phase(), Phase::Intro);
    assert_eq!(s.active_scene(), Some(SceneKey::Intro));
    assert_eq!(s.minions_of(HUMAN).count(), 3);
    assert_eq!(s.minions_of(COMPUTER).count(), 3);
    for &slot in s.reserve_slots(HUMAN) {
        assert!(s.tree().slot(slot).is_some_and(Slot::is_occupied));
    }
}

#[test]
fn start_button_enters_placement() {
    let mut s = session(2);
    let button = s.start_button().expect("start button");
    let at = center(&s, button);
    click(&mut s, at);

    assert_eq!(s.phase(), Phase::Placement);
    assert_eq!(s.active_scene(), Some(SceneKey::Main));
    assert!(s.timer().is_running());
    assert!(!s.start_match(), "second start is ignored");
}

#[test]
fn computer_places_its_reserve_on_the_board() {
    let (s, _) = started(3);
    for &cell in s.board_cells(COMPUTER) {
        assert!(s.tree().slot(cell).is_some_and(Slot::is_occupied));
    }
    for &slot in s.reserve_slots(COMPUTER) {
        assert!(!s.tree().slot(slot).is_some_and(Slot::is_occupied));
    }
}

#[test]
fn human_moves_a_minion_from_reserve_to_board() {
    let (mut s, _) = started(4);
    let fuzzy = s.minion_named("Fuzzy").expect("Fuzzy").id;
    let cell = s.board_cells(HUMAN)[0];

    let from = human_token_center(&s, "Fuzzy");
    let to = center(&s, cell);
    drag(&mut s, from, to);

    assert!(!s.is_dragging());
    assert_eq!(s.container_of(fuzzy), Some(cell));
    assert!(!s.tree().slot(s.reserve_slots(HUMAN)[0]).is_some_and(Slot::is_occupied));
}

#[test]
fn dropping_on_a_computer_cell_reverts() {
    let (mut s, _) = started(5);
    let boole = s.minion_named("Boole").expect("Boole");
    let (id, token) = (boole.id, boole.token);
    let home = s.container_of(id).expect("seated");
    let before = s.tree().node(token).expect("token").location;

    // Computer cells are occupied after auto placement; aim at its reserve.
    let target = s.reserve_slots(COMPUTER)[0];
    let from = human_token_center(&s, "Boole");
    let to = center(&s, target);
    drag(&mut s, from, to);

    assert!(!s.is_dragging());
    assert_eq!(s.container_of(id), Some(home));
    assert_eq!(s.tree().node(token).expect("token").location, before);
    assert!(s.tree().children(target).is_empty());
}

#[test]
fn click_on_empty_space_reverts_a_drag() {
    let (mut s, _) = started(6);
    let proof = s.minion_named("Proof").expect("Proof").id;
    let home = s.container_of(proof).expect("seated");
    let from = human_token_center(&s, "Proof");
    drag(&mut s, from, Point::new(5.0, 300.0));
    assert_eq!(s.container_of(proof), Some(home));
}

#[test]
fn computer_minions_cannot_be_picked_up() {
    let (mut s, _) = started(7);
    let truth = s.minion_named("Truth").expect("Truth").id;
    let at = s.token_center(truth).expect("token");
    click(&mut s, at);
    assert!(!s.is_dragging());
}

#[test]
fn drop_on_occupied_cell_swaps() {
    let (mut s, _) = started(8);
    let fuzzy = s.minion_named("Fuzzy").expect("Fuzzy").id;
    let boole = s.minion_named("Boole").expect("Boole").id;
    let cell = s.board_cells(HUMAN)[0];
    let boole_home = s.container_of(boole).expect("seated");

    let from = human_token_center(&s, "Fuzzy");
    let to = center(&s, cell);
    drag(&mut s, from, to);

    let from = human_token_center(&s, "Boole");
    drag(&mut s, from, to);

    assert_eq!(s.container_of(boole), Some(cell));
    assert_eq!(s.container_of(fuzzy), Some(boole_home));
    assert_eq!(s.tree().children(cell).len(), 1);
    assert_eq!(s.tree().children(boole_home).len(), 1);
}

#[test]
fn countdown_expiry_resolves_combat_then_drafts() {
    let (mut s, mut now) = started(9);
    s.tick(now);
    assert_eq!(s.phase(), Phase::Placement);

    expire_countdown(&mut s, &mut now);

    let outcome = s.last_combat().expect("combat ran");
    assert!(outcome.damage >= 60 && outcome.damage < 160);
    assert_eq!(s.player(outcome.target).health(), 1000 - outcome.damage);
    assert_eq!(s.phase(), Phase::Draft);
    assert_eq!(s.active_scene(), Some(SceneKey::Draft));

    let round = s.draft().expect("draft running");
    assert_eq!(round.offers().len(), 3);
    // The damaged player picks first.
    assert_eq!(round.picker(), Some(outcome.target));
}

#[test]
fn combat_reverts_a_drag_in_flight() {
    let (mut s, mut now) = started(10);
    let fuzzy = s.minion_named("Fuzzy").expect("Fuzzy");
    let (id, token) = (fuzzy.id, fuzzy.token);
    let home = s.container_of(id).expect("seated");
    let at = human_token_center(&s, "Fuzzy");
    click(&mut s, at);
    assert!(s.is_dragging());

    expire_countdown(&mut s, &mut now);

    assert!(!s.is_dragging());
    assert_eq!(s.draft().expect("draft").home_of(token), Some(home));
}

#[test]
fn offered_minions_are_not_already_owned() {
    let (mut s, mut now) = started(11);
    expire_countdown(&mut s, &mut now);
    let round = s.draft().expect("draft");
    let owned: Vec<String> = [HUMAN, COMPUTER]
        .iter()
        .flat_map(|&p| s.minions_of(p).map(|m| m.name().to_string()).collect::<Vec<_>>())
        .collect();
    for offer in round.offers() {
        let minion = s.minion(*offer).expect("offer");
        assert!(minion.owner.is_none());
        assert!(!owned.iter().any(|n| n == minion.name()));
    }
}

#[test]
fn full_draft_returns_everyone_home_and_seats_new_minions() {
    let (mut s, mut now) = started(12);
    let homes: Vec<_> = s
        .minions_of(HUMAN)
        .map(|m| (m.id, s.container_of(m.id)))
        .collect();
    expire_countdown(&mut s, &mut now);
    assert_eq!(s.phase(), Phase::Draft);

    for _ in 0..10 {
        match s.draft().and_then(|r| r.picker()) {
            Some(p) if p == HUMAN => {
                let round = s.draft().expect("draft");
                let offer = round.offers()[0];
                let slot = round
                    .reserve_slots(HUMAN)
                    .iter()
                    .copied()
                    .find(|&slot| !s.tree().slot(slot).is_some_and(Slot::is_occupied))
                    .expect("free draft slot");
                let from = s.token_center(offer).expect("offer token");
                let to = center(&s, slot);
                drag(&mut s, from, to);
                assert_eq!(s.minion(offer).and_then(|m| m.owner), Some(HUMAN));
            }
            Some(_) => {
                now += Duration::from_millis(16);
                s.tick(now);
            }
            None => break,
        }
        if s.phase() == Phase::Placement {
            break;
        }
    }

    assert_eq!(s.phase(), Phase::Placement);
    assert_eq!(s.active_scene(), Some(SceneKey::Main));
    assert!(s.scene(SceneKey::Draft).is_err());
    assert!(s.draft().is_none());
    assert_eq!(s.minions_of(HUMAN).count(), 4);
    assert_eq!(s.minions_of(COMPUTER).count(), 4);
    // One offer went unclaimed and was discarded.
    assert_eq!(s.minion_count(), 8);

    for (id, home) in homes {
        assert_eq!(s.container_of(id), home);
    }
    // Reserve is full, so the new minion lands on the first board cell.
    let newest = s.player(HUMAN).minions[3];
    assert_eq!(s.container_of(newest), Some(s.board_cells(HUMAN)[0]));
}

#[test]
fn skipping_both_turns_discards_every_offer() {
    let (mut s, mut now) = started(13);
    expire_countdown(&mut s, &mut now);

    let mut guard = 0;
    while s.phase() == Phase::Draft && guard < 10 {
        if s.draft().and_then(|r| r.picker()) == Some(HUMAN) {
            let button = s.draft().expect("draft").skip_button();
            let at = center(&s, button);
            click(&mut s, at);
        } else {
            now += Duration::from_millis(16);
            s.tick(now);
        }
        guard += 1;
    }

    assert_eq!(s.phase(), Phase::Placement);
    assert_eq!(s.minions_of(HUMAN).count(), 3);
    assert!(s.minion_count() <= 7);
    assert!(!s.skip_draft_turn(), "no draft to skip");
}

#[test]
fn unplaced_minions_join_the_draft_and_are_seated_after() {
    let mut config = SessionConfig {
        seed: Some(17),
        ..SessionConfig::default()
    };
    config.players[0].starting_minions.push("Greedy".into());
    let mut s = session_with(config);
    assert!(s.start_match());
    let greedy = s.minion_named("Greedy").expect("Greedy");
    let (greedy_id, greedy_token) = (greedy.id, greedy.token);
    assert!(s.container_of(greedy_id).is_none(), "reserve holds three");

    let mut now = Duration::ZERO;
    expire_countdown(&mut s, &mut now);
    assert_eq!(s.phase(), Phase::Draft);

    let draft_root = s.scene(SceneKey::Draft).expect("draft scene").root;
    let in_draft = s
        .minions_of(HUMAN)
        .filter(|m| s.tree().is_ancestor(draft_root, m.token))
        .count();
    assert_eq!(in_draft, 4);
    assert!(s.draft().expect("draft").home_of(greedy_token).is_none());

    let mut guard = 0;
    while s.phase() == Phase::Draft && guard < 10 {
        if !s.skip_draft_turn() {
            now += Duration::from_millis(16);
            s.tick(now);
        }
        guard += 1;
    }

    assert_eq!(s.phase(), Phase::Placement);
    // Reserve is full again, so the first board cell takes it.
    assert_eq!(s.container_of(greedy_id), Some(s.board_cells(HUMAN)[0]));
}

#[test]
fn defeat_ends_the_match_and_resets_to_intro() {
    let mut config = SessionConfig {
        seed: Some(14),
        damage_min_fraction: 0.6,
        damage_max_fraction: 0.7,
        ..SessionConfig::default()
    };
    config.reset_delay_ms = 1_000;
    let mut s = session_with(config);
    assert!(s.start_match());
    let mut now = Duration::ZERO;

    let mut guard = 0;
    while s.phase() != Phase::MatchOver && guard < 50 {
        match s.phase() {
            Phase::Placement => expire_countdown(&mut s, &mut now),
            Phase::Draft => {
                if !s.skip_draft_turn() {
                    now += Duration::from_millis(16);
                    s.tick(now);
                }
            }
            other => panic!("unexpected phase {other}"),
        }
        guard += 1;
    }

    assert_eq!(s.phase(), Phase::MatchOver);
    let outcome = s.last_combat().expect("combat");
    assert!(outcome.defeated);
    assert_eq!(s.player(outcome.target).health(), 0);
    let reset_at = s.reset_at().expect("reset scheduled");

    s.tick(reset_at - Duration::from_millis(1));
    assert_eq!(s.phase(), Phase::MatchOver);

    s.tick(reset_at);
    assert_eq!(s.phase(), Phase::Intro);
    assert_eq!(s.active_scene(), Some(SceneKey::Intro));
    assert_eq!(s.matches_completed(), 1);
    assert_eq!(s.player(HUMAN).health(), 1000);
    assert_eq!(s.player(COMPUTER).health(), 1000);
}

#[test]
fn secondary_click_toggles_the_info_popover() {
    let (mut s, _) = started(15);
    let fuzzy = s.minion_named("Fuzzy").expect("Fuzzy");
    let token = fuzzy.token;
    let at = s.token_center(fuzzy.id).expect("token");

    s.handle_input(InputEvent::secondary(at.x, at.y));
    let popover = s.popover_of(token).expect("popover open");

    let mut frame = FrameLayers::new();
    s.render(&mut frame);
    assert!(frame.overlay.texts().any(|t| t.contains("Fuzzy")));

    s.handle_input(InputEvent::secondary(at.x, at.y));
    assert!(s.popover_of(token).is_none());
    assert!(!s.tree().contains(popover));

    s.render(&mut frame);
    assert!(frame.overlay.is_empty());
}

/// Open Fuzzy's popover, which spreads over Boole in the next reserve slot.
fn popover_over_neighbour(seed: u64) -> (Session, arena_core::NodeId, arena_core::NodeId, Point) {
    let (mut s, _) = started(seed);
    let fuzzy = human_token_center(&s, "Fuzzy");
    s.handle_input(InputEvent::secondary(fuzzy.x, fuzzy.y));
    let fuzzy_token = s.minion_named("Fuzzy").expect("Fuzzy").token;
    let boole = s.minion_named("Boole").expect("Boole");
    assert_eq!(s.container_of(boole.id), Some(s.reserve_slots(HUMAN)[1]));
    let boole_token = boole.token;
    let at = human_token_center(&s, "Boole");
    assert!(s.popover_of(fuzzy_token).is_some());
    (s, fuzzy_token, boole_token, at)
}

#[test]
fn click_on_popover_does_not_reach_the_token_beneath() {
    let (mut s, fuzzy_token, boole_token, at) = popover_over_neighbour(18);

    click(&mut s, at);

    assert!(!s.is_dragging());
    assert_eq!(s.tree().parent(boole_token), Some(s.reserve_slots(HUMAN)[1]));
    assert!(s.popover_of(fuzzy_token).is_some());
}

#[test]
fn secondary_click_on_popover_closes_only_that_popover() {
    let (mut s, fuzzy_token, boole_token, at) = popover_over_neighbour(19);

    s.handle_input(InputEvent::secondary(at.x, at.y));

    assert!(s.popover_of(fuzzy_token).is_none());
    assert!(s.popover_of(boole_token).is_none());

    // With the popover gone the same spot reaches Boole again.
    s.handle_input(InputEvent::secondary(at.x, at.y));
    assert!(s.popover_of(boole_token).is_some());
}

#[test]
fn render_draws_the_active_scene_only() {
    let mut s = session(16);
    let mut frame = FrameLayers::new();
    s.render(&mut frame);
    assert!(frame.base.texts().any(|t| t == "START"));

    s.start_match();
    s.tick(Duration::from_millis(16));
    s.render(&mut frame);
    assert!(!frame.base.texts().any(|t| t == "START"));
    assert!(frame.base.texts().any(|t| t == "frame: 1"));
    assert!(frame.base.texts().any(|t| t == "Fuzzy"));
}

#[test]
fn invalid_config_is_rejected() {
    let config = SessionConfig {
        damage_min_fraction: 0.5,
        damage_max_fraction: 0.1,
        ..SessionConfig::default()
    };
    assert!(Session::new(config).is_err());
}
