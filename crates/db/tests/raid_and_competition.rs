//! Raid teams and competition editions against a real database.

mod common;

use chrono::NaiveDate;
use hyperion_core::raid::DOCUMENT_ID_CARD;
use hyperion_core::schools::SCHOOL_CENTRALE_LYON;
use hyperion_db::models::competition::{
    CreateCompetitionParticipant, CreateEdition, CreateSport, SchoolExtension, SetSportQuota,
};
use hyperion_db::models::raid::{CreateDocument, CreateParticipant, Participant};
use hyperion_db::repositories::{
    CompetitionParticipantRepo, CompetitionTeamRepo, EditionRepo, InviteTokenRepo,
    RaidDocumentRepo, RaidParticipantRepo, RaidTeamRepo, SchoolExtensionRepo, SportQuotaRepo,
    SportRepo,
};
use sqlx::PgPool;

use common::insert_user;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn insert_participant(pool: &PgPool, email: &str) -> Participant {
    let user = insert_user(pool, email).await;
    RaidParticipantRepo::create(
        pool,
        user.id,
        &CreateParticipant {
            name: "Doe".to_string(),
            firstname: "Jane".to_string(),
            birthday: date(2003, 4, 12),
            phone: "+33600000000".to_string(),
            email: email.to_string(),
            address: None,
            bike_size: Some("M".to_string()),
            t_shirt_size: None,
            situation: Some("centrale".to_string()),
            other_school: None,
            company: None,
            diet: None,
        },
        false,
    )
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// Raid
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_team_membership_and_promotion(pool: PgPool) {
    let captain = insert_participant(&pool, "cap@etu.ec-lyon.fr").await;
    let second = insert_participant(&pool, "sec@etu.ec-lyon.fr").await;
    let team = RaidTeamRepo::create(&pool, "Les Gones", captain.id).await.unwrap();

    assert!(RaidTeamRepo::set_second(&pool, team.id, Some(second.id)).await.unwrap());
    let by_second = RaidTeamRepo::find_by_participant(&pool, second.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_second.id, team.id);

    // A participant can second at most one team.
    let other = insert_participant(&pool, "other@etu.ec-lyon.fr").await;
    let other_team = RaidTeamRepo::create(&pool, "Solo", other.id).await.unwrap();
    assert!(RaidTeamRepo::set_second(&pool, other_team.id, Some(second.id))
        .await
        .is_err());

    assert!(RaidTeamRepo::promote_second(&pool, team.id).await.unwrap());
    let promoted = RaidTeamRepo::find_by_id(&pool, team.id).await.unwrap().unwrap();
    assert_eq!(promoted.captain_id, second.id);
    assert_eq!(promoted.second_id, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_max_number_per_difficulty(pool: PgPool) {
    let a = insert_participant(&pool, "a@etu.ec-lyon.fr").await;
    let b = insert_participant(&pool, "b@etu.ec-lyon.fr").await;
    let team_a = RaidTeamRepo::create(&pool, "A", a.id).await.unwrap();
    let team_b = RaidTeamRepo::create(&pool, "B", b.id).await.unwrap();

    for (team, difficulty, number) in [(&team_a, "sports", 203), (&team_b, "expert", 301)] {
        RaidTeamRepo::update(
            &pool,
            team.id,
            &hyperion_db::models::raid::UpdateTeam {
                difficulty: Some(difficulty.to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        RaidTeamRepo::set_number(&pool, team.id, number).await.unwrap();
    }

    assert_eq!(RaidTeamRepo::max_number(&pool, "sports").await.unwrap(), Some(203));
    assert_eq!(RaidTeamRepo::max_number(&pool, "discovery").await.unwrap(), None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_document_attached_to_slot(pool: PgPool) {
    let participant = insert_participant(&pool, "doc@etu.ec-lyon.fr").await;
    let document = RaidDocumentRepo::create(
        &pool,
        &CreateDocument {
            name: "id.pdf".to_string(),
            document_type: DOCUMENT_ID_CARD.to_string(),
        },
    )
    .await
    .unwrap();
    assert_eq!(document.validation, "pending");

    assert!(RaidParticipantRepo::attach_document(
        &pool,
        participant.id,
        DOCUMENT_ID_CARD,
        document.id
    )
    .await
    .unwrap());

    let refreshed = RaidParticipantRepo::find_by_id(&pool, participant.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(refreshed.id_card_id, Some(document.id));

    let owner = RaidParticipantRepo::find_by_document(&pool, document.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(owner.id, participant.id);

    let documents = RaidDocumentRepo::list_for_participant(&pool, participant.id)
        .await
        .unwrap();
    assert_eq!(documents.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invite_deleted_with_team(pool: PgPool) {
    let captain = insert_participant(&pool, "inv@etu.ec-lyon.fr").await;
    let team = RaidTeamRepo::create(&pool, "Invite", captain.id).await.unwrap();
    InviteTokenRepo::create(&pool, "abcdefghij", team.id).await.unwrap();
    assert!(InviteTokenRepo::create(&pool, "klmnopqrst", team.id).await.is_err());

    assert!(RaidTeamRepo::delete(&pool, team.id).await.unwrap());
    assert!(InviteTokenRepo::find_by_token(&pool, "abcdefghij")
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Competition
// ---------------------------------------------------------------------------

fn new_edition(year: i32) -> CreateEdition {
    CreateEdition {
        year,
        name: format!("Challenge {year}"),
        start_date: date(year, 3, 1),
        end_date: date(year, 3, 3),
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_only_one_edition_active(pool: PgPool) {
    let first = EditionRepo::create(&pool, &new_edition(2025)).await.unwrap();
    let second = EditionRepo::create(&pool, &new_edition(2026)).await.unwrap();
    assert!(EditionRepo::find_active(&pool).await.unwrap().is_none());

    let mut conn = pool.acquire().await.unwrap();
    EditionRepo::activate(&mut conn, first.id).await.unwrap();
    EditionRepo::activate(&mut conn, second.id).await.unwrap();

    let active = EditionRepo::find_active(&pool).await.unwrap().unwrap();
    assert_eq!(active.id, second.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_participant_license_validity(pool: PgPool) {
    let user = insert_user(&pool, "athlete@etu.ec-lyon.fr").await;
    let edition = EditionRepo::create(&pool, &new_edition(2026)).await.unwrap();
    let sport = SportRepo::create(
        &pool,
        &CreateSport {
            name: "Football".to_string(),
            team_size: 11,
            substitute_max: Some(5),
            category: Some("masculine".to_string()),
        },
    )
    .await
    .unwrap();

    let input = CreateCompetitionParticipant {
        substitute: false,
        license: Some("A12345".to_string()),
        team_id: None,
    };
    CompetitionParticipantRepo::create(&pool, user.id, sport.id, edition.id, &input)
        .await
        .unwrap();
    assert!(
        CompetitionParticipantRepo::create(&pool, user.id, sport.id, edition.id, &input)
            .await
            .is_err()
    );

    let updated = CompetitionParticipantRepo::set_license_validity(
        &pool, user.id, sport.id, edition.id, true,
    )
    .await
    .unwrap()
    .unwrap();
    assert!(updated.is_license_valid);

    let listed = CompetitionParticipantRepo::list_for_sport(&pool, sport.id, edition.id)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_team_members_and_quotas(pool: PgPool) {
    let captain = insert_user(&pool, "cap@etu.ec-lyon.fr").await;
    let substitute = insert_user(&pool, "sub@etu.ec-lyon.fr").await;
    let edition = EditionRepo::create(&pool, &new_edition(2026)).await.unwrap();
    let sport = SportRepo::create(
        &pool,
        &CreateSport {
            name: "Water polo".to_string(),
            team_size: 7,
            substitute_max: Some(3),
            category: None,
        },
    )
    .await
    .unwrap();
    SchoolExtensionRepo::upsert(
        &pool,
        &SchoolExtension {
            school_id: SCHOOL_CENTRALE_LYON,
            from_lyon: true,
            activated: true,
            ffsu_id: None,
        },
    )
    .await
    .unwrap();

    let team = CompetitionTeamRepo::create(
        &pool,
        edition.id,
        SCHOOL_CENTRALE_LYON,
        sport.id,
        "Centrale",
        captain.id,
    )
    .await
    .unwrap();
    for (user_id, is_substitute) in [(captain.id, false), (substitute.id, true)] {
        let input = CreateCompetitionParticipant {
            substitute: is_substitute,
            license: None,
            team_id: Some(team.id),
        };
        CompetitionParticipantRepo::create(&pool, user_id, sport.id, edition.id, &input)
            .await
            .unwrap();
    }

    assert_eq!(
        CompetitionParticipantRepo::count_in_team(&pool, team.id).await.unwrap(),
        (1, 1)
    );
    assert_eq!(
        CompetitionParticipantRepo::count_for_school(&pool, SCHOOL_CENTRALE_LYON, sport.id, edition.id)
            .await
            .unwrap(),
        2
    );
    assert_eq!(
        CompetitionTeamRepo::count_for_school(&pool, SCHOOL_CENTRALE_LYON, sport.id, edition.id)
            .await
            .unwrap(),
        1
    );

    let quota = SportQuotaRepo::upsert(
        &pool,
        SCHOOL_CENTRALE_LYON,
        sport.id,
        edition.id,
        &SetSportQuota {
            participant_quota: Some(10),
            team_quota: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(quota.participant_quota, Some(10));
    assert!(SportQuotaRepo::delete(&pool, SCHOOL_CENTRALE_LYON, sport.id, edition.id)
        .await
        .unwrap());
    assert!(SportQuotaRepo::find(&pool, SCHOOL_CENTRALE_LYON, sport.id, edition.id)
        .await
        .unwrap()
        .is_none());

    // Deleting the team keeps its members registered.
    assert!(CompetitionTeamRepo::delete(&pool, team.id).await.unwrap());
    let member = CompetitionParticipantRepo::find(&pool, captain.id, sport.id, edition.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(member.team_id, None);
}
