use chrono::{NaiveDate, TimeZone, Utc};

use super::repositories::LocalRepository;
use super::repository::{DataPointFilter, PersonRepository, RepositoryError};
use super::services;
use crate::algorithms::timeseries::generate;
use crate::models::{NewCalculation, NewPerson, PersonUpdate};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap()
}

#[tokio::test]
async fn test_create_person_normalizes_fields() {
    let repo = LocalRepository::new();
    let person = services::create_person(
        &repo,
        &NewPerson::new("  Grace Hopper ", date(1906, 12, 9))
            .with_email("   ")
            .with_notes(" admiral "),
        now(),
    )
    .await
    .unwrap();

    assert_eq!(person.name, "Grace Hopper");
    assert_eq!(person.email, None);
    assert_eq!(person.notes.as_deref(), Some("admiral"));
}

#[tokio::test]
async fn test_blank_name_is_rejected() {
    let repo = LocalRepository::new();
    let err = services::create_person(&repo, &NewPerson::new("   ", date(1990, 1, 1)), now())
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ValidationError { .. }));
}

#[tokio::test]
async fn test_list_people_search_and_order() {
    let repo = LocalRepository::new();
    for name in ["Zed", "alice", "Bob"] {
        services::create_person(&repo, &NewPerson::new(name, date(1990, 1, 1)), now())
            .await
            .unwrap();
    }
    services::create_person(
        &repo,
        &NewPerson::new("Carol", date(1990, 1, 1)).with_email("carol@BOB.example"),
        now(),
    )
    .await
    .unwrap();

    let all = services::list_people(&repo, None).await.unwrap();
    let names: Vec<&str> = all.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Bob", "Carol", "Zed", "alice"]);

    let hits = services::list_people(&repo, Some("bob")).await.unwrap();
    let names: Vec<&str> = hits.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Bob", "Carol"]);

    let blank = services::list_people(&repo, Some("  ")).await.unwrap();
    assert_eq!(blank.len(), 4);
}

#[tokio::test]
async fn test_empty_update_is_noop() {
    let repo = LocalRepository::new();
    let person = services::create_person(&repo, &NewPerson::new("Ada", date(1990, 1, 1)), now())
        .await
        .unwrap();

    let later = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
    let same = services::update_person(&repo, person.id, &PersonUpdate::default(), later)
        .await
        .unwrap();
    assert_eq!(same, person);
}

#[tokio::test]
async fn test_birthdate_locked_once_points_exist() {
    let repo = LocalRepository::new();
    let person = services::create_person(&repo, &NewPerson::new("Ada", date(1990, 1, 1)), now())
        .await
        .unwrap();

    // No points yet: the birthdate may still be corrected.
    let fix = PersonUpdate {
        birthdate: Some(date(1990, 1, 2)),
        ..Default::default()
    };
    let person = services::update_person(&repo, person.id, &fix, now())
        .await
        .unwrap();
    assert_eq!(person.birthdate, date(1990, 1, 2));

    let series = generate(person.birthdate, date(2024, 1, 1), date(2024, 1, 7)).unwrap();
    services::store_calculation(
        &repo,
        &NewCalculation::new(person.id, date(2024, 1, 7), series, now()),
    )
    .await
    .unwrap();

    let change = PersonUpdate {
        birthdate: Some(date(1991, 1, 1)),
        ..Default::default()
    };
    let err = services::update_person(&repo, person.id, &change, now())
        .await
        .unwrap_err();
    assert!(err.is_validation());

    // Re-stating the same birthdate and renaming is still fine.
    let rename = PersonUpdate {
        name: Some("Ada L.".to_string()),
        birthdate: Some(date(1990, 1, 2)),
        ..Default::default()
    };
    let renamed = services::update_person(&repo, person.id, &rename, now())
        .await
        .unwrap();
    assert_eq!(renamed.name, "Ada L.");
}

#[tokio::test]
async fn test_delete_person_cascades() {
    let repo = LocalRepository::new();
    let person = services::create_person(&repo, &NewPerson::new("Ada", date(1990, 1, 1)), now())
        .await
        .unwrap();
    let series = generate(person.birthdate, date(2024, 1, 1), date(2024, 1, 30)).unwrap();
    let run = services::store_calculation(
        &repo,
        &NewCalculation::new(person.id, date(2024, 1, 30), series, now()),
    )
    .await
    .unwrap();

    services::delete_person(&repo, person.id).await.unwrap();

    assert_eq!(repo.count_people().await.unwrap(), 0);
    assert!(services::get_calculation(&repo, run.id)
        .await
        .unwrap_err()
        .is_not_found());
    let points = services::list_data_points(&repo, &DataPointFilter::default())
        .await
        .unwrap();
    assert!(points.is_empty());
}

#[tokio::test]
async fn test_inverted_point_filter_matches_nothing() {
    let repo = LocalRepository::new();
    repo.set_healthy(false);

    // Answered without touching the (unhealthy) store.
    let filter = DataPointFilter::default().between(Some(date(2024, 2, 1)), Some(date(2024, 1, 1)));
    let points = services::list_data_points(&repo, &filter).await.unwrap();
    assert!(points.is_empty());
}

#[tokio::test]
async fn test_health_check_passthrough() {
    let repo = LocalRepository::new();
    assert!(services::health_check(&repo).await.unwrap());
    repo.set_healthy(false);
    assert!(!services::health_check(&repo).await.unwrap());
}
