//! Unit tests for store operations.

use super::*;
use crate::domain::{ErrorCategory, Lookup, MAX_NAME_CHARS};
use chrono::NaiveDate;

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 5, 10)
        .unwrap()
        .and_hms_opt(13, 0, 0)
        .unwrap()
}

fn time(h: u32, m: u32, s: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, s).unwrap()
}

/// Run a failing operation and check it left the portal untouched.
fn assert_unchanged<T: std::fmt::Debug>(
    portal: &mut Portal,
    op: impl FnOnce(&mut Portal) -> Result<T, PortalError>,
) -> PortalError {
    let before = portal.clone();
    let err = op(portal).unwrap_err();
    assert_eq!(*portal, before, "failed operation mutated the portal");
    err
}

/// A race with one 100 km flat stage, plus a team and a rider.
struct Fixture {
    portal: Portal,
    team: TeamId,
    rider: RiderId,
    race: RaceId,
    stage: StageId,
}

fn fixture() -> Fixture {
    let mut portal = Portal::new();
    let team = portal.create_team("Jumbo", "yellow").unwrap();
    let rider = portal.create_rider(team, "Wout", 1994).unwrap();
    let race = portal.create_race("Giro", "pink").unwrap();
    let stage = portal
        .add_stage_to_race(race, "Etna", "volcano", 100.0, start(), StageType::Flat)
        .unwrap();
    Fixture {
        portal,
        team,
        rider,
        race,
        stage,
    }
}

// ========== teams and riders ==========

#[test]
fn team_names_validated_and_unique() {
    let mut portal = Portal::new();
    portal.create_team("Alpecin", "").unwrap();

    let err = assert_unchanged(&mut portal, |p| p.create_team("", ""));
    assert_eq!(err, PortalError::InvalidArgument("name cannot be empty"));

    let long = "x".repeat(MAX_NAME_CHARS + 1);
    let err = assert_unchanged(&mut portal, |p| p.create_team(&long, ""));
    assert_eq!(err.category(), ErrorCategory::InvalidArgument);

    let err = assert_unchanged(&mut portal, |p| p.create_team("Alpecin", "again"));
    assert_eq!(
        err,
        PortalError::DuplicateName {
            kind: EntityKind::Team,
            name: "Alpecin".into()
        }
    );
    assert_eq!(err.category(), ErrorCategory::IllegalState);
}

#[test]
fn ids_follow_highest_existing() {
    let mut portal = Portal::new();
    let a = portal.create_team("A", "").unwrap();
    let b = portal.create_team("B", "").unwrap();
    assert_eq!((a, b), (TeamId(1), TeamId(2)));

    portal.remove_team(a).unwrap();
    assert_eq!(portal.create_team("C", "").unwrap(), TeamId(3));

    portal.remove_team(TeamId(3)).unwrap();
    // Highest id is gone, so it is handed out again
    assert_eq!(portal.create_team("D", "").unwrap(), TeamId(3));
    assert_eq!(portal.team_ids(), vec![TeamId(2), TeamId(3)]);
}

#[test]
fn rider_validation() {
    let mut f = fixture();

    let err = assert_unchanged(&mut f.portal, |p| p.create_rider(TeamId(42), "Remco", 2000));
    assert_eq!(
        err,
        PortalError::UnknownEntity {
            kind: EntityKind::Team,
            lookup: Lookup::Id(42)
        }
    );

    let err = assert_unchanged(&mut f.portal, |p| p.create_rider(f.team, "", 2000));
    assert_eq!(err.category(), ErrorCategory::InvalidArgument);

    let err = assert_unchanged(&mut f.portal, |p| p.create_rider(f.team, "Old", 1899));
    assert_eq!(err.category(), ErrorCategory::InvalidArgument);

    let ok = f.portal.create_rider(f.team, "Old enough", MIN_YEAR_OF_BIRTH).unwrap();
    assert_eq!(f.portal.team_riders(f.team).unwrap(), &[f.rider, ok]);
}

#[test]
fn remove_rider_updates_team() {
    let mut f = fixture();
    let other = f.portal.create_rider(f.team, "Primoz", 1989).unwrap();

    f.portal.remove_rider(f.rider).unwrap();
    assert_eq!(f.portal.team_riders(f.team).unwrap(), &[other]);
    assert!(f.portal.rider(f.rider).is_none());

    let err = assert_unchanged(&mut f.portal, |p| p.remove_rider(f.rider));
    assert_eq!(err.category(), ErrorCategory::UnknownEntity);
}

#[test]
fn remove_team_removes_riders_and_results() {
    let mut f = fixture();
    f.portal.conclude_stage_preparation(f.stage).unwrap();
    f.portal
        .register_rider_results(f.stage, f.rider, vec![time(13, 0, 0), time(15, 0, 0)])
        .unwrap();

    f.portal.remove_team(f.team).unwrap();
    assert!(f.portal.team_ids().is_empty());
    assert!(f.portal.rider_ids().is_empty());
    assert!(f.portal.classifier().rank_stage(f.stage).unwrap().is_empty());
}

// ========== races and stages ==========

#[test]
fn race_details_sum_stage_lengths() {
    let mut f = fixture();
    f.portal
        .add_stage_to_race(f.race, "Zoncolan", "", 42.5, start(), StageType::HighMountain)
        .unwrap();

    let details = f.portal.view_race_details(f.race).unwrap();
    assert_eq!(details.stage_count, 2);
    assert!((details.total_length_km - 142.5).abs() < 1e-9);
    assert_eq!(details.name, "Giro");
    assert_eq!(f.portal.number_of_stages(f.race).unwrap(), 2);
}

#[test]
fn stage_validation() {
    let mut f = fixture();

    let err = assert_unchanged(&mut f.portal, |p| {
        p.add_stage_to_race(RaceId(9), "Nowhere", "", 10.0, start(), StageType::Flat)
    });
    assert_eq!(err.category(), ErrorCategory::UnknownEntity);

    let err = assert_unchanged(&mut f.portal, |p| {
        p.add_stage_to_race(f.race, "Short", "", 4.99, start(), StageType::Flat)
    });
    assert_eq!(err.category(), ErrorCategory::InvalidArgument);

    let err = assert_unchanged(&mut f.portal, |p| {
        p.add_stage_to_race(f.race, "Broken", "", f64::NAN, start(), StageType::Flat)
    });
    assert_eq!(err.category(), ErrorCategory::InvalidArgument);

    // Stage names are unique across all races
    let other = f.portal.create_race("Tour", "").unwrap();
    let err = assert_unchanged(&mut f.portal, |p| {
        p.add_stage_to_race(other, "Etna", "", 10.0, start(), StageType::Flat)
    });
    assert_eq!(err.category(), ErrorCategory::IllegalState);

    f.portal
        .add_stage_to_race(other, "Minimum", "", MIN_STAGE_LENGTH_KM, start(), StageType::Flat)
        .unwrap();
}

#[test]
fn stages_keep_race_order() {
    let mut f = fixture();
    let second = f
        .portal
        .add_stage_to_race(f.race, "Blockhaus", "", 50.0, start(), StageType::HighMountain)
        .unwrap();
    let third = f
        .portal
        .add_stage_to_race(f.race, "Verona", "", 17.0, start(), StageType::TimeTrial)
        .unwrap();
    assert_eq!(f.portal.race_stages(f.race).unwrap(), &[f.stage, second, third]);

    f.portal.remove_stage_by_id(second).unwrap();
    assert_eq!(f.portal.race_stages(f.race).unwrap(), &[f.stage, third]);
}

#[test]
fn conclude_stage_only_once() {
    let mut f = fixture();
    f.portal.conclude_stage_preparation(f.stage).unwrap();
    assert_eq!(
        f.portal.stage(f.stage).unwrap().state(),
        StageState::WaitingForResults
    );

    let err = assert_unchanged(&mut f.portal, |p| p.conclude_stage_preparation(f.stage));
    assert_eq!(
        err,
        PortalError::WrongStageState {
            stage: f.stage,
            state: StageState::WaitingForResults
        }
    );
}

#[test]
fn remove_stage_cascades() {
    let mut f = fixture();
    let sprint = f.portal.add_intermediate_sprint(f.stage, 50.0).unwrap();
    f.portal.conclude_stage_preparation(f.stage).unwrap();
    f.portal
        .register_rider_results(
            f.stage,
            f.rider,
            vec![time(13, 0, 0), time(14, 0, 0), time(15, 0, 0)],
        )
        .unwrap();

    f.portal.remove_stage_by_id(f.stage).unwrap();
    assert!(f.portal.stage(f.stage).is_none());
    assert!(f.portal.segment(sprint).is_none());
    assert!(f.portal.rider(f.rider).unwrap().result(f.stage).is_none());
    assert_eq!(f.portal.number_of_stages(f.race).unwrap(), 0);
}

#[test]
fn remove_race_cascades() {
    let mut f = fixture();
    let climb = f
        .portal
        .add_categorized_climb(f.stage, 70.0, SegmentType::C2, 5.5, 3.0)
        .unwrap();
    f.portal.conclude_stage_preparation(f.stage).unwrap();
    f.portal
        .register_rider_results(
            f.stage,
            f.rider,
            vec![time(13, 0, 0), time(14, 0, 0), time(15, 0, 0)],
        )
        .unwrap();

    f.portal.remove_race_by_name("Giro").unwrap();
    assert!(f.portal.race_ids().is_empty());
    assert!(f.portal.stage(f.stage).is_none());
    assert!(f.portal.segment(climb).is_none());
    assert_eq!(f.portal.rider(f.rider).unwrap().stages_with_results().count(), 0);
    // The team and rider are untouched
    assert_eq!(f.portal.team_riders(f.team).unwrap(), &[f.rider]);

    let err = assert_unchanged(&mut f.portal, |p| p.remove_race_by_name("Giro"));
    assert_eq!(
        err,
        PortalError::UnknownEntity {
            kind: EntityKind::Race,
            lookup: Lookup::Name("Giro".into())
        }
    );
}

// ========== segments ==========

#[test]
fn segments_ordered_by_location() {
    let mut f = fixture();
    let late = f.portal.add_intermediate_sprint(f.stage, 80.0).unwrap();
    let early = f
        .portal
        .add_categorized_climb(f.stage, 20.0, SegmentType::C4, 3.0, 1.5)
        .unwrap();
    let middle = f.portal.add_intermediate_sprint(f.stage, 50.0).unwrap();
    let same_spot = f
        .portal
        .add_categorized_climb(f.stage, 50.0, SegmentType::Hc, 9.0, 12.0)
        .unwrap();

    assert_eq!(
        f.portal.stage_segments(f.stage).unwrap(),
        &[early, middle, same_spot, late]
    );
    assert_eq!(f.portal.stage(f.stage).unwrap().expected_checkpoints(), 6);

    f.portal.remove_segment(middle).unwrap();
    assert_eq!(
        f.portal.stage_segments(f.stage).unwrap(),
        &[early, same_spot, late]
    );
}

#[test]
fn segment_validation() {
    let mut f = fixture();

    let err = assert_unchanged(&mut f.portal, |p| p.add_intermediate_sprint(f.stage, 100.5));
    assert_eq!(err.category(), ErrorCategory::InvalidArgument);

    let err = assert_unchanged(&mut f.portal, |p| p.add_intermediate_sprint(f.stage, -1.0));
    assert_eq!(err.category(), ErrorCategory::InvalidArgument);

    let err = assert_unchanged(&mut f.portal, |p| {
        p.add_categorized_climb(f.stage, 10.0, SegmentType::Sprint, 2.0, 1.0)
    });
    assert_eq!(err.category(), ErrorCategory::InvalidArgument);

    let err = assert_unchanged(&mut f.portal, |p| p.add_intermediate_sprint(StageId(77), 1.0));
    assert_eq!(err.category(), ErrorCategory::UnknownEntity);

    // Both ends of the stage are allowed
    f.portal.add_intermediate_sprint(f.stage, 0.0).unwrap();
    f.portal.add_intermediate_sprint(f.stage, 100.0).unwrap();
}

#[test]
fn no_segments_on_time_trials() {
    let mut f = fixture();
    let tt = f
        .portal
        .add_stage_to_race(f.race, "Chrono", "", 30.0, start(), StageType::TimeTrial)
        .unwrap();

    let err = assert_unchanged(&mut f.portal, |p| p.add_intermediate_sprint(tt, 10.0));
    assert_eq!(err, PortalError::TimeTrialSegment(tt));
    assert_eq!(err.category(), ErrorCategory::IllegalState);
}

#[test]
fn segments_frozen_after_preparation() {
    let mut f = fixture();
    let sprint = f.portal.add_intermediate_sprint(f.stage, 50.0).unwrap();
    f.portal.conclude_stage_preparation(f.stage).unwrap();

    let err = assert_unchanged(&mut f.portal, |p| p.add_intermediate_sprint(f.stage, 60.0));
    assert_eq!(err.category(), ErrorCategory::IllegalState);

    let err = assert_unchanged(&mut f.portal, |p| p.remove_segment(sprint));
    assert_eq!(err.category(), ErrorCategory::IllegalState);
}

// ========== results ==========

#[test]
fn results_need_waiting_stage() {
    let mut f = fixture();
    let err = assert_unchanged(&mut f.portal, |p| {
        p.register_rider_results(f.stage, f.rider, vec![time(13, 0, 0), time(15, 0, 0)])
    });
    assert_eq!(
        err,
        PortalError::WrongStageState {
            stage: f.stage,
            state: StageState::Setup
        }
    );
}

#[test]
fn checkpoint_count_must_match_segments() {
    let mut f = fixture();
    f.portal.add_intermediate_sprint(f.stage, 50.0).unwrap();
    f.portal.conclude_stage_preparation(f.stage).unwrap();

    let err = assert_unchanged(&mut f.portal, |p| {
        p.register_rider_results(f.stage, f.rider, vec![time(13, 0, 0), time(15, 0, 0)])
    });
    assert_eq!(
        err,
        PortalError::CheckpointCount {
            stage: f.stage,
            expected: 3,
            actual: 2
        }
    );
    assert_eq!(err.category(), ErrorCategory::InvalidInput);
}

#[test]
fn duplicate_results_rejected() {
    let mut f = fixture();
    f.portal.conclude_stage_preparation(f.stage).unwrap();
    let checkpoints = vec![time(13, 0, 0), time(15, 0, 0)];
    f.portal
        .register_rider_results(f.stage, f.rider, checkpoints.clone())
        .unwrap();

    let err = assert_unchanged(&mut f.portal, |p| {
        p.register_rider_results(f.stage, f.rider, checkpoints)
    });
    assert_eq!(
        err,
        PortalError::DuplicateResult {
            stage: f.stage,
            rider: f.rider
        }
    );
}

#[test]
fn read_and_delete_results() {
    let mut f = fixture();
    f.portal.conclude_stage_preparation(f.stage).unwrap();
    let checkpoints = vec![time(13, 0, 0), time(15, 30, 0)];

    assert_eq!(f.portal.rider_results(f.stage, f.rider).unwrap(), None);
    f.portal
        .register_rider_results(f.stage, f.rider, checkpoints.clone())
        .unwrap();
    assert_eq!(
        f.portal.rider_results(f.stage, f.rider).unwrap(),
        Some(checkpoints.as_slice())
    );

    f.portal.delete_rider_results(f.stage, f.rider).unwrap();
    assert_eq!(f.portal.rider_results(f.stage, f.rider).unwrap(), None);
    // Deleting again is fine
    f.portal.delete_rider_results(f.stage, f.rider).unwrap();

    let err = f.portal.rider_results(StageId(50), f.rider).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::UnknownEntity);
    let err = assert_unchanged(&mut f.portal, |p| p.delete_rider_results(f.stage, RiderId(50)));
    assert_eq!(err.category(), ErrorCategory::UnknownEntity);
}

#[test]
fn erase_clears_everything() {
    let mut f = fixture();
    f.portal.erase();
    assert_eq!(f.portal, Portal::new());
    // Ids start over
    assert_eq!(f.portal.create_team("Fresh", "").unwrap(), TeamId(1));
}
