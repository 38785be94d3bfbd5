//! Tests for LocalRepository.
//!
//! These cover concurrent access, atomic run storage, cascades, point
//! filtering and analysis records for the in-memory repository.

mod support;

use std::sync::Arc;

use biorhythm_engine::algorithms::statistics::Statistics;
use biorhythm_engine::algorithms::timeseries::generate;
use biorhythm_engine::db::repositories::LocalRepository;
use biorhythm_engine::db::repository::{
    AnalysisFilter, AnalysisRepository, CalculationRepository, DataPointFilter, PersonRepository,
    RepositoryError,
};
use biorhythm_engine::models::{
    AnalysisParameters, AnalysisRecord, CalculationId, DataPointId, NewCalculation, Person,
    PersonId,
};
use chrono::NaiveDate;
use support::{date, seed_person, ts};

fn run_for(person: &Person, start: NaiveDate, end: NaiveDate) -> NewCalculation {
    let series = generate(person.birthdate, start, end).unwrap();
    NewCalculation::new(person.id, end, series, ts(2024, 2, 1))
}

fn analysis_for(person: &Person, analysis_type: &str, day: u32) -> AnalysisRecord {
    AnalysisRecord {
        id: None,
        person_id: person.id,
        analysis_type: analysis_type.to_string(),
        start_date: date(2024, 1, 1),
        end_date: date(2024, 1, 31),
        analysis_date: ts(2024, 3, day),
        results: Statistics::empty(),
        summary: "No biorhythm data in range".to_string(),
        data_points_analyzed: 0,
        analysis_parameters: AnalysisParameters::new(),
        input_checksum: None,
    }
}

// ==================== Concurrency ====================

#[tokio::test]
async fn test_concurrent_calculations_for_one_person() {
    let repo = Arc::new(LocalRepository::new());
    let person = seed_person(repo.as_ref(), "Ada", date(1990, 1, 1)).await;

    let mut handles = vec![];
    for i in 0..10u32 {
        let repo_clone = Arc::clone(&repo);
        let calculation = run_for(&person, date(2024, 1, 1), date(2024, 1, 1 + i));
        handles.push(tokio::spawn(async move {
            repo_clone.store_calculation(&calculation).await
        }));
    }

    let mut expected_points = 0;
    for handle in handles {
        let run = handle.await.unwrap().unwrap();
        assert_eq!(run.person_id, person.id);
        expected_points += run.days_calculated;
    }

    let runs = repo.list_calculations(Some(person.id)).await.unwrap();
    assert_eq!(runs.len(), 10);
    assert_eq!(repo.count_data_points().await.unwrap(), expected_points);
    assert_eq!(expected_points, (1..=10).sum::<usize>());

    // Every run owns exactly its own points.
    for run in runs {
        let points = repo
            .list_data_points(&DataPointFilter::for_calculation(run.id))
            .await
            .unwrap();
        assert_eq!(points.len(), run.days_calculated);
        assert!(points.iter().all(|p| p.calculation_id == run.id));
    }
}

#[tokio::test]
async fn test_readers_never_observe_partial_runs() {
    let repo = Arc::new(LocalRepository::new());
    let person = seed_person(repo.as_ref(), "Ada", date(1990, 1, 1)).await;

    let writer = {
        let repo = Arc::clone(&repo);
        let calculations: Vec<NewCalculation> = (0..20)
            .map(|_| run_for(&person, date(2024, 1, 1), date(2024, 3, 31)))
            .collect();
        tokio::spawn(async move {
            for calculation in calculations {
                repo.store_calculation(&calculation).await.unwrap();
            }
        })
    };

    let mut readers = vec![];
    for _ in 0..10 {
        let repo = Arc::clone(&repo);
        readers.push(tokio::spawn(async move {
            for _ in 0..20 {
                let runs = repo.list_calculations(None).await.unwrap();
                let points = repo.count_data_points().await.unwrap();
                // Points are only ever added together with their run.
                assert!(points >= runs.len() * 91);
                assert_eq!(points % 91, 0);
                tokio::task::yield_now().await;
            }
        }));
    }

    writer.await.unwrap();
    for reader in readers {
        reader.await.unwrap();
    }
    assert_eq!(repo.count_data_points().await.unwrap(), 20 * 91);
}

#[tokio::test]
async fn test_concurrent_person_creation_assigns_unique_ids() {
    let repo = Arc::new(LocalRepository::new());

    let handles: Vec<_> = (0..25)
        .map(|i| {
            let repo = Arc::clone(&repo);
            tokio::spawn(async move {
                seed_person(repo.as_ref(), &format!("person_{:02}", i), date(1980, 1, 1)).await
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(handle.await.unwrap().id);
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 25);
    assert_eq!(repo.count_people().await.unwrap(), 25);
}

// ==================== Atomic run storage ====================

#[tokio::test]
async fn test_unknown_person_is_not_found() {
    let repo = LocalRepository::new();
    let ghost = Person {
        id: PersonId::new(77),
        name: "ghost".to_string(),
        birthdate: date(1990, 1, 1),
        email: None,
        notes: None,
        created_at: ts(2024, 1, 1),
        updated_at: ts(2024, 1, 1),
    };

    let err = repo
        .store_calculation(&run_for(&ghost, date(2024, 1, 1), date(2024, 1, 5)))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.context().operation.as_deref(), Some("store_calculation"));
    assert_eq!(repo.calculation_count(), 0);
}

#[tokio::test]
async fn test_invariant_violations_are_rejected_without_side_effects() {
    let repo = LocalRepository::new();
    let person = seed_person(&repo, "Ada", date(1990, 1, 1)).await;
    let good = run_for(&person, date(2024, 1, 1), date(2024, 1, 10));

    let mut empty = good.clone();
    empty.series.data.clear();

    let mut miscounted = good.clone();
    miscounted.series.meta.days = 11;

    let mut unordered = good.clone();
    unordered.series.data.swap(2, 3);

    let mut past_target = good.clone();
    past_target.target_date = date(2024, 1, 9);

    let mut wrong_birthdate = good.clone();
    wrong_birthdate.series.meta.birthdate = date(1991, 1, 1);

    let mut out_of_bounds = good.clone();
    out_of_bounds.series.data[0].emotional = 1.5;

    let before_birth = {
        let series = generate(person.birthdate, date(1989, 12, 30), date(1990, 1, 2)).unwrap();
        NewCalculation::new(person.id, date(1990, 1, 2), series, ts(2024, 2, 1))
    };

    for bad in [
        empty,
        miscounted,
        unordered,
        past_target,
        wrong_birthdate,
        out_of_bounds,
        before_birth,
    ] {
        let err = repo.store_calculation(&bad).await.unwrap_err();
        assert!(
            matches!(err, RepositoryError::ValidationError { .. }),
            "unexpected error: {}",
            err
        );
    }

    assert_eq!(repo.calculation_count(), 0);
    assert_eq!(repo.count_data_points().await.unwrap(), 0);

    // Ids were not consumed by the rejected writes.
    let run = repo.store_calculation(&good).await.unwrap();
    assert_eq!(run.id, CalculationId::new(1));
    let first = repo.get_data_point(DataPointId::new(1)).await.unwrap();
    assert_eq!(first.date(), date(2024, 1, 1));
}

#[tokio::test]
async fn test_run_metadata_matches_points() {
    let repo = LocalRepository::new();
    let person = seed_person(&repo, "Ada", date(1990, 1, 1)).await;
    let run = repo
        .store_calculation(
            &run_for(&person, date(2024, 2, 1), date(2024, 2, 29)).with_notes("leap month"),
        )
        .await
        .unwrap();

    assert_eq!(run.days_calculated, 29);
    assert_eq!(run.notes, "leap month");
    assert_eq!(run.date_range_str(), "2024-02-01 to 2024-02-29");
    assert!(run.generator_version.starts_with("biorhythm-engine/"));

    let points = repo
        .list_data_points(&DataPointFilter::for_calculation(run.id))
        .await
        .unwrap();
    for point in &points {
        assert_eq!(point.record.days_alive, person.days_alive_on(point.date()));
        assert_eq!(point.created_at, run.created_at);
    }
}

// ==================== Queries ====================

#[tokio::test]
async fn test_overlapping_runs_keep_duplicate_dates() {
    let repo = LocalRepository::new();
    let person = seed_person(&repo, "Ada", date(1990, 1, 1)).await;
    repo.store_calculation(&run_for(&person, date(2024, 1, 1), date(2024, 1, 10)))
        .await
        .unwrap();
    repo.store_calculation(&run_for(&person, date(2024, 1, 5), date(2024, 1, 15)))
        .await
        .unwrap();

    let points = repo
        .list_data_points(&DataPointFilter::for_person(person.id))
        .await
        .unwrap();
    assert_eq!(points.len(), 21);
    assert!(points.windows(2).all(|w| w[0].date() <= w[1].date()));

    let jan_5: Vec<_> = points.iter().filter(|p| p.date() == date(2024, 1, 5)).collect();
    assert_eq!(jan_5.len(), 2);
    assert_eq!(jan_5[0].record, jan_5[1].record);
}

#[tokio::test]
async fn test_point_filters() {
    let repo = LocalRepository::new();
    let ada = seed_person(&repo, "Ada", date(1990, 1, 1)).await;
    let bob = seed_person(&repo, "Bob", date(1985, 6, 15)).await;
    repo.store_calculation(&run_for(&ada, date(2024, 1, 1), date(2024, 3, 31)))
        .await
        .unwrap();
    repo.store_calculation(&run_for(&bob, date(2024, 1, 1), date(2024, 1, 31)))
        .await
        .unwrap();

    let ranged = repo
        .list_data_points(
            &DataPointFilter::for_person(ada.id)
                .between(Some(date(2024, 2, 1)), Some(date(2024, 2, 10))),
        )
        .await
        .unwrap();
    assert_eq!(ranged.len(), 10);
    assert!(ranged.iter().all(|p| p.person_id == ada.id));

    let critical = repo
        .list_data_points(&DataPointFilter::for_person(ada.id).critical_only())
        .await
        .unwrap();
    assert!(!critical.is_empty());
    assert!(critical.iter().all(|p| p.is_any_critical()));
    assert!(critical.len() < 91);

    let everyone = repo
        .list_data_points(&DataPointFilter::default())
        .await
        .unwrap();
    assert_eq!(everyone.len(), 91 + 31);
}

#[tokio::test]
async fn test_runs_listed_newest_first() {
    let repo = LocalRepository::new();
    let person = seed_person(&repo, "Ada", date(1990, 1, 1)).await;

    for day in [3, 1, 2] {
        let mut calculation = run_for(&person, date(2024, 1, 1), date(2024, 1, 2));
        calculation.created_at = ts(2024, 5, day);
        repo.store_calculation(&calculation).await.unwrap();
    }

    let runs = repo.list_calculations(None).await.unwrap();
    let created: Vec<_> = runs.iter().map(|r| r.created_at).collect();
    assert_eq!(created, vec![ts(2024, 5, 3), ts(2024, 5, 2), ts(2024, 5, 1)]);
}

// ==================== Cascades ====================

#[tokio::test]
async fn test_delete_person_removes_everything_it_owns() {
    let repo = LocalRepository::new();
    let ada = seed_person(&repo, "Ada", date(1990, 1, 1)).await;
    let bob = seed_person(&repo, "Bob", date(1990, 1, 1)).await;

    repo.store_calculation(&run_for(&ada, date(2024, 1, 1), date(2024, 1, 10)))
        .await
        .unwrap();
    let bobs_run = repo
        .store_calculation(&run_for(&bob, date(2024, 1, 1), date(2024, 1, 5)))
        .await
        .unwrap();
    repo.store_analysis(&analysis_for(&ada, "statistics", 1))
        .await
        .unwrap();

    repo.delete_person(ada.id).await.unwrap();

    assert!(repo.get_person(ada.id).await.unwrap_err().is_not_found());
    assert_eq!(repo.calculation_count(), 1);
    assert_eq!(repo.analysis_count(), 0);
    assert_eq!(repo.count_data_points().await.unwrap(), 5);
    assert_eq!(
        repo.list_calculations(None).await.unwrap()[0].id,
        bobs_run.id
    );
    assert!(repo.delete_person(ada.id).await.unwrap_err().is_not_found());
}

// ==================== Analyses ====================

#[tokio::test]
async fn test_analysis_records_are_append_only() {
    let repo = LocalRepository::new();
    let person = seed_person(&repo, "Ada", date(1990, 1, 1)).await;

    let first = repo
        .store_analysis(&analysis_for(&person, "statistics", 1))
        .await
        .unwrap();
    let again = repo
        .store_analysis(&analysis_for(&person, "statistics", 2))
        .await
        .unwrap();
    assert_ne!(first.id, again.id);

    // A stored record cannot be written again.
    let err = repo.store_analysis(&first).await.unwrap_err();
    assert!(err.is_validation());

    let mut inverted = analysis_for(&person, "statistics", 3);
    inverted.start_date = date(2024, 2, 1);
    assert!(repo.store_analysis(&inverted).await.unwrap_err().is_validation());
}

#[tokio::test]
async fn test_list_analyses_filters_and_orders() {
    let repo = LocalRepository::new();
    let ada = seed_person(&repo, "Ada", date(1990, 1, 1)).await;
    let bob = seed_person(&repo, "Bob", date(1990, 1, 1)).await;

    repo.store_analysis(&analysis_for(&ada, "statistics", 1))
        .await
        .unwrap();
    repo.store_analysis(&analysis_for(&ada, "critical_days", 5))
        .await
        .unwrap();
    repo.store_analysis(&analysis_for(&ada, "statistics", 9))
        .await
        .unwrap();
    repo.store_analysis(&analysis_for(&bob, "statistics", 7))
        .await
        .unwrap();

    let adas = repo
        .list_analyses(&AnalysisFilter {
            person_id: Some(ada.id),
            analysis_type: Some("statistics".to_string()),
        })
        .await
        .unwrap();
    let dates: Vec<_> = adas.iter().map(|a| a.analysis_date).collect();
    assert_eq!(dates, vec![ts(2024, 3, 9), ts(2024, 3, 1)]);

    let all = repo.list_analyses(&AnalysisFilter::default()).await.unwrap();
    assert_eq!(all.len(), 4);
    assert_eq!(all[0].analysis_date, ts(2024, 3, 9));

    let id = all[0].id.unwrap();
    repo.delete_analysis(id).await.unwrap();
    assert!(repo.get_analysis(id).await.unwrap_err().is_not_found());
    assert_eq!(repo.analysis_count(), 3);
}

// ==================== Health ====================

#[tokio::test]
async fn test_unhealthy_store_rejects_operations() {
    let repo = LocalRepository::new();
    let person = seed_person(&repo, "Ada", date(1990, 1, 1)).await;
    repo.set_healthy(false);

    let err = repo
        .store_calculation(&run_for(&person, date(2024, 1, 1), date(2024, 1, 2)))
        .await
        .unwrap_err();
    assert!(err.is_retryable());
    assert!(repo.list_people(None).await.is_err());

    repo.set_healthy(true);
    assert_eq!(repo.list_people(None).await.unwrap().len(), 1);
}
