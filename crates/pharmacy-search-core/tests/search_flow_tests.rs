//! End-to-end search flow tests against in-memory collaborators.

use std::sync::{Arc, Mutex};
use std::thread;

use pharmacy_search_core::db::{Database, MemoryStore};
use pharmacy_search_core::export::COLUMNS;
use pharmacy_search_core::history::{SearchHistoryStore, HISTORY_CAPACITY};
use pharmacy_search_core::models::{
    Address, CriteriaField, CriteriaSet, PatientRecord, SearchResultSet,
};
use pharmacy_search_core::search::{
    ApiResponse, RecordApi, Rejection, SearchController, SearchError, SearchExecutor,
    SearchOutcome, SearchPresenter, SearchState, SynthesisReport, TransportError,
};

fn make_patient(store: &str, id: &str, first: &str, last: &str, province: &str) -> PatientRecord {
    PatientRecord {
        store_id: store.to_string(),
        patient_id: id.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        pref_name: None,
        date_of_birth: "1975-06-30".to_string(),
        phone_number: "416-555-0142".to_string(),
        provincial_health_number: "1234567890".to_string(),
        address: Address {
            unit_number: None,
            street_number: "250".to_string(),
            street_name: "Queen St W".to_string(),
            city: "Toronto".to_string(),
            province: province.to_string(),
            postal_code: "M5V 1Z3".to_string(),
            country: "Canada".to_string(),
        },
        language_preference: "en".to_string(),
        sms_opt_in: false,
    }
}

/// Record API that answers from a fixed patient list, filtering like the
/// central service does (exact store/province, case-insensitive names).
struct DirectoryApi {
    patients: Vec<PatientRecord>,
    bodies: Mutex<Vec<serde_json::Value>>,
}

impl DirectoryApi {
    fn new(patients: Vec<PatientRecord>) -> Self {
        Self {
            patients,
            bodies: Mutex::new(Vec::new()),
        }
    }

    fn bodies(&self) -> Vec<serde_json::Value> {
        self.bodies.lock().unwrap().clone()
    }
}

impl RecordApi for DirectoryApi {
    fn search_patients(&self, criteria: &CriteriaSet) -> Result<ApiResponse, TransportError> {
        self.bodies
            .lock()
            .unwrap()
            .push(serde_json::to_value(criteria).unwrap());

        let eq = |want: Option<&str>, have: &str| {
            want.map_or(true, |w| w.eq_ignore_ascii_case(have))
        };
        let matches: Vec<&PatientRecord> = self
            .patients
            .iter()
            .filter(|p| {
                eq(criteria.get(CriteriaField::StoreId), p.store_id.as_str())
                    && eq(criteria.get(CriteriaField::Province), p.province())
                    && eq(criteria.get(CriteriaField::FirstName), p.first_name.as_str())
                    && eq(criteria.get(CriteriaField::LastName), p.last_name.as_str())
                    && eq(
                        criteria.get(CriteriaField::HealthNumber),
                        p.provincial_health_number.as_str(),
                    )
            })
            .collect();
        Ok(ApiResponse::json(200, serde_json::to_string(&matches).unwrap()))
    }
}

#[derive(Default)]
struct CountingPresenter {
    results: usize,
    rejections: usize,
    errors: usize,
    clears: usize,
}

impl SearchPresenter for CountingPresenter {
    fn show_results(&mut self, _results: &SearchResultSet, _report: &SynthesisReport) {
        self.results += 1;
    }

    fn show_rejection(&mut self, _rejection: &Rejection) {
        self.rejections += 1;
    }

    fn show_error(&mut self, _error: &SearchError) {
        self.errors += 1;
    }

    fn clear_results(&mut self) {
        self.clears += 1;
    }
}

fn directory() -> Vec<PatientRecord> {
    vec![
        make_patient("101", "1", "John", "Smith", "BC"),
        make_patient("101", "2", "Jane", "Smith", "BC"),
        make_patient("102", "3", "Ravi", "Smith", "ON"),
        make_patient("103", "4", "Marie", "Tremblay", "QC"),
    ]
}

fn controller(api: &Arc<DirectoryApi>) -> SearchController<CountingPresenter> {
    SearchController::new(
        SearchExecutor::new(api.clone()),
        SearchHistoryStore::load(Box::new(MemoryStore::new())),
        CountingPresenter::default(),
    )
}

#[test]
fn test_all_absent_criteria_never_reach_api() {
    let api = Arc::new(DirectoryApi::new(directory()));
    let mut ctl = controller(&api);

    for _ in 0..3 {
        assert_eq!(ctl.submit(), SearchOutcome::Rejected(Rejection::EmptyCriteria));
    }
    assert!(api.bodies().is_empty());
    assert_eq!(ctl.presenter().rejections, 3);
    assert!(ctl.history().is_empty());
}

#[test]
fn test_one_call_with_only_present_fields() {
    let api = Arc::new(DirectoryApi::new(directory()));
    let mut ctl = controller(&api);
    ctl.model_mut().set(CriteriaField::LastName, "smith");
    ctl.model_mut().set(CriteriaField::HealthNumber, "  ");

    let outcome = ctl.submit();
    match outcome {
        SearchOutcome::Succeeded(stats) => {
            assert_eq!(stats.result_count, 3);
            assert_eq!(stats.distinct_store_count, 2);
            assert_eq!(stats.distinct_province_count, 2);
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    assert_eq!(api.bodies(), vec![serde_json::json!({"lastName": "smith"})]);
}

#[test]
fn test_eleven_searches_keep_ten_newest() {
    let api = Arc::new(DirectoryApi::new(directory()));
    let mut ctl = controller(&api);

    for i in 1..=11 {
        ctl.model_mut().set(CriteriaField::StoreId, i.to_string());
        assert!(matches!(ctl.submit(), SearchOutcome::Succeeded(_)));
    }

    let history = ctl.history().list();
    assert_eq!(history.len(), HISTORY_CAPACITY);
    assert_eq!(history[0].criteria.store_id.as_deref(), Some("11"));
    assert_eq!(history[0].label, "Store: 11");
}

#[test]
fn test_export_header_round_trip() {
    let api = Arc::new(DirectoryApi::new(directory()));
    let mut ctl = controller(&api);
    ctl.model_mut().set(CriteriaField::Province, "BC");
    ctl.submit();

    let date = chrono::NaiveDate::from_ymd_opt(2025, 2, 14).unwrap();
    let artifact = ctl.export(date).unwrap();
    let mut lines = artifact.contents.lines();

    let header: Vec<&str> = lines.next().unwrap().split(',').collect();
    assert_eq!(header, COLUMNS);
    assert_eq!(lines.count(), 2);
    assert!(artifact.contents.contains(r#""250 Queen St W""#));
}

#[test]
fn test_pending_search_runs_on_worker_thread() {
    let api = Arc::new(DirectoryApi::new(directory()));
    let mut ctl = controller(&api);

    ctl.model_mut().set(CriteriaField::Province, "QC");
    let stale = ctl.prepare().unwrap();
    ctl.model_mut().set(CriteriaField::Province, "ON");
    let fresh = ctl.prepare().unwrap();
    assert_eq!(ctl.state(), SearchState::Executing);

    let stale = thread::spawn(move || stale.run());
    let fresh = thread::spawn(move || fresh.run());
    let fresh = fresh.join().unwrap();
    let stale = stale.join().unwrap();

    assert!(matches!(ctl.complete(fresh), SearchOutcome::Succeeded(_)));
    assert_eq!(ctl.complete(stale), SearchOutcome::Superseded);
    assert_eq!(ctl.state(), SearchState::Idle);

    let shown = ctl.session().results().unwrap();
    assert_eq!(shown.criteria.province.as_deref(), Some("ON"));
    assert_eq!(shown.records.len(), 1);
    assert_eq!(ctl.presenter().results, 1);
    assert_eq!(api.bodies().len(), 2);
}

#[test]
fn test_transport_failure_surfaces_and_session_survives() {
    struct DownApi;
    impl RecordApi for DownApi {
        fn search_patients(&self, _: &CriteriaSet) -> Result<ApiResponse, TransportError> {
            Err(TransportError("Connection refused".into()))
        }
    }

    let mut ctl = SearchController::new(
        SearchExecutor::new(Arc::new(DownApi)),
        SearchHistoryStore::in_memory(),
        CountingPresenter::default(),
    );
    ctl.model_mut().set(CriteriaField::StoreId, "101");

    for _ in 0..2 {
        assert!(matches!(ctl.submit(), SearchOutcome::Failed(_)));
        assert_eq!(ctl.state(), SearchState::Idle);
    }
    assert_eq!(ctl.presenter().errors, 2);
    assert_eq!(ctl.presenter().clears, 2);
    assert!(ctl.history().is_empty());
}

#[test]
fn test_history_survives_restart_on_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("client.db");
    let api = Arc::new(DirectoryApi::new(directory()));

    let replay_id = {
        let mut ctl = SearchController::new(
            SearchExecutor::new(api.clone()),
            SearchHistoryStore::open_sqlite(&path),
            CountingPresenter::default(),
        );
        ctl.model_mut().set(CriteriaField::FirstName, "Marie");
        ctl.submit();
        ctl.history().list()[0].id
    };

    let mut ctl = SearchController::new(
        SearchExecutor::new(api.clone()),
        SearchHistoryStore::load(Box::new(Database::open(&path).unwrap())),
        CountingPresenter::default(),
    );
    assert_eq!(ctl.history().len(), 1);

    let outcome = ctl.replay(replay_id).unwrap();
    assert!(matches!(outcome, SearchOutcome::Succeeded(s) if s.result_count == 1));
    assert!(ctl.select("103-4").is_some());
}
