//! Tool dispatch integration tests: envelope in, handlers over in-memory
//! stores, envelope out.

use maitre_core::catalog::{Cuisine, District, Restaurant};
use maitre_core::envelope::{ToolRequest, ToolResponse};
use maitre_core::storage::{MemoryAuditLog, MemoryLedger, ReservationLedger};
use maitre_core::tools::{
    ACTION_GROUP_AVAILABILITY, ACTION_GROUP_FIND, ACTION_GROUP_RESERVATION,
    FN_CHECK_AVAILABILITY, FN_FIND_RESTAURANTS, FN_MAKE_RESERVATION, RESERVATION_CONFIRMATION,
};
use maitre_core::{Catalog, Error, ToolDispatcher};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;

struct Harness {
    dispatcher: Arc<ToolDispatcher>,
    ledger: Arc<MemoryLedger>,
    audit: Arc<MemoryAuditLog>,
}

fn restaurant(name: &str, district: District, capacity: i64) -> Restaurant {
    Restaurant {
        district,
        name: name.to_string(),
        cuisine: Cuisine::Japanese,
        signature_dish: "sushi".to_string(),
        dishes: vec!["ramen".to_string(), "tonkatsu".to_string()],
        average_price_per_person: 30,
        rating_food_stars: 4,
        rating_service_stars: 5,
        capacity_persons: capacity,
    }
}

fn harness(restaurants: Vec<Restaurant>) -> Harness {
    let ledger = Arc::new(MemoryLedger::new());
    let audit = Arc::new(MemoryAuditLog::new());
    let dispatcher = Arc::new(ToolDispatcher::new(
        Arc::new(Catalog::new(restaurants)),
        ledger.clone(),
        audit.clone(),
    ));
    Harness {
        dispatcher,
        ledger,
        audit,
    }
}

fn availability_request(name: &str) -> ToolRequest {
    ToolRequest::new(ACTION_GROUP_AVAILABILITY, FN_CHECK_AVAILABILITY)
        .with_parameter("restaurant_name", name)
}

fn reservation_request(name: &str, guest: &str, persons: &str) -> ToolRequest {
    ToolRequest::new(ACTION_GROUP_RESERVATION, FN_MAKE_RESERVATION)
        .with_parameter("restaurant_name", name)
        .with_parameter("main_guest_name", guest)
        .with_parameter("number_of_persons", persons)
}

fn query_request(sql: &str) -> ToolRequest {
    ToolRequest::new(ACTION_GROUP_FIND, FN_FIND_RESTAURANTS).with_parameter("sql_query", sql)
}

async fn body(h: &Harness, request: ToolRequest) -> String {
    h.dispatcher
        .dispatch(request)
        .await
        .map(|r: ToolResponse| r.body().to_string())
        .unwrap()
}

#[tokio::test]
async fn test_full_envelope_round_trip() {
    let h = harness(vec![restaurant("KyotoGarden", District::East, 10)]);

    let raw = json!({
        "messageVersion": "1.0",
        "actionGroup": "CheckRestaurantAvailability",
        "function": "check_restaurant_availability",
        "parameters": [{"name": "restaurant_name", "type": "string", "value": "KyotoGarden"}],
        "sessionAttributes": {"customer": "ana"},
        "promptSessionAttributes": {"locale": "en"}
    });
    let response = h.dispatcher.dispatch_value(raw).await.unwrap();

    assert_eq!(
        response,
        json!({
            "messageVersion": "1.0",
            "response": {
                "actionGroup": "CheckRestaurantAvailability",
                "function": "check_restaurant_availability",
                "functionResponse": {
                    "responseBody": {"TEXT": {"body": "There is availability for 10 persons."}}
                }
            },
            "sessionAttributes": {"customer": "ana"},
            "promptSessionAttributes": {"locale": "en"}
        })
    );
}

#[tokio::test]
async fn test_availability_arithmetic() {
    let h = harness(vec![restaurant("KyotoGarden", District::East, 10)]);

    body(&h, reservation_request("KyotoGarden", "Ana", "4")).await;
    body(&h, reservation_request("KyotoGarden", "Ben", "3")).await;
    assert_eq!(
        body(&h, availability_request("KyotoGarden")).await,
        "There is availability for 3 persons."
    );

    body(&h, reservation_request("KyotoGarden", "Cy", "4")).await;
    assert_eq!(
        body(&h, availability_request("KyotoGarden")).await,
        "The restaurant is fully booked. Remaining capacity is -1 persons."
    );
}

#[tokio::test]
async fn test_reservation_overwrites_same_guest() {
    let h = harness(vec![restaurant("KyotoGarden", District::East, 10)]);

    let ack = body(&h, reservation_request("KyotoGarden", "Ana", "2")).await;
    assert_eq!(ack, RESERVATION_CONFIRMATION);
    body(&h, reservation_request("KyotoGarden", "Ana", "6")).await;

    let rows = h.ledger.scan().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].number_of_persons, 6);
    assert_eq!(
        body(&h, availability_request("KyotoGarden")).await,
        "There is availability for 4 persons."
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_reservations_can_overbook() {
    // Check-then-act is not atomic: both callers see room for their party,
    // both writes succeed, and the restaurant ends up over capacity.
    let h = harness(vec![restaurant("KyotoGarden", District::East, 10)]);

    assert_eq!(
        body(&h, availability_request("KyotoGarden")).await,
        "There is availability for 10 persons."
    );

    let first = {
        let dispatcher = h.dispatcher.clone();
        tokio::spawn(async move {
            dispatcher
                .dispatch(reservation_request("KyotoGarden", "Ana", "6"))
                .await
        })
    };
    let second = {
        let dispatcher = h.dispatcher.clone();
        tokio::spawn(async move {
            dispatcher
                .dispatch(reservation_request("KyotoGarden", "Ben", "6"))
                .await
        })
    };

    let (first, second) = tokio::join!(first, second);
    assert_eq!(first.unwrap().unwrap().body(), RESERVATION_CONFIRMATION);
    assert_eq!(second.unwrap().unwrap().body(), RESERVATION_CONFIRMATION);

    assert_eq!(h.ledger.len().await, 2);
    assert_eq!(
        body(&h, availability_request("KyotoGarden")).await,
        "The restaurant is fully booked. Remaining capacity is -2 persons."
    );
}

#[tokio::test]
async fn test_extreme_party_sizes_stay_fully_booked() {
    let h = harness(vec![restaurant("KyotoGarden", District::East, 10)]);

    body(&h, reservation_request("KyotoGarden", "Ana", &i64::MAX.to_string())).await;
    body(&h, reservation_request("KyotoGarden", "Ben", "1")).await;

    assert_eq!(
        body(&h, availability_request("KyotoGarden")).await,
        format!(
            "The restaurant is fully booked. Remaining capacity is {} persons.",
            i64::MIN + 10
        )
    );
}

#[tokio::test]
async fn test_unknown_restaurant_is_hard_error() {
    let h = harness(vec![restaurant("KyotoGarden", District::East, 10)]);
    let err = h
        .dispatcher
        .dispatch(availability_request("Nonexistent"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert_eq!(err.code(), "NOT_FOUND");
}

#[tokio::test]
async fn test_missing_parameter_is_hard_error() {
    let h = harness(Vec::new());
    let request = ToolRequest::new(ACTION_GROUP_RESERVATION, FN_MAKE_RESERVATION)
        .with_parameter("restaurant_name", "KyotoGarden")
        .with_parameter("number_of_persons", "2");

    let err = h.dispatcher.dispatch(request).await.unwrap_err();
    assert!(matches!(err, Error::ParameterMissing(ref name) if name == "main_guest_name"));
    assert!(h.ledger.is_empty().await);
}

#[tokio::test]
async fn test_query_truncates_to_fifty_rows_in_natural_order() {
    let mut restaurants = Vec::new();
    for i in 0..130 {
        let district = if i % 13 == 0 { District::West } else { District::North };
        restaurants.push(restaurant(&format!("Place{:03}", i), district, 20));
    }
    let matching: Vec<String> = restaurants
        .iter()
        .filter(|r| r.district == District::North)
        .map(|r| r.name.clone())
        .collect();
    assert_eq!(matching.len(), 120);

    let h = harness(restaurants);
    let text = body(
        &h,
        query_request(
            "SELECT restaurant_name FROM restaurants WHERE district_name = 'North District'",
        ),
    )
    .await;

    let rows: Vec<Value> = serde_json::from_str(&text).unwrap();
    assert_eq!(rows.len(), 50);
    let names: Vec<&str> = rows
        .iter()
        .map(|r| r["restaurant_name"].as_str().unwrap())
        .collect();
    let expected: Vec<&str> = matching.iter().take(50).map(String::as_str).collect();
    assert_eq!(names, expected);
}

#[tokio::test]
async fn test_query_over_flattened_dishes() {
    let h = harness(vec![
        restaurant("KyotoGarden", District::East, 10),
        Restaurant {
            dishes: vec!["miso soup".to_string()],
            ..restaurant("OsakaHouse", District::North, 10)
        },
    ]);

    let text = body(
        &h,
        query_request("SELECT restaurant_name FROM restaurants WHERE dishes LIKE '%tonkatsu%'"),
    )
    .await;
    assert_eq!(text, r#"[{"restaurant_name":"KyotoGarden"}]"#);
}

#[tokio::test]
async fn test_only_one_statement_per_query() {
    let h = harness(vec![restaurant("KyotoGarden", District::East, 10)]);
    let text = body(&h, query_request("SELECT 1; SELECT 2")).await;
    assert!(text.starts_with("The query failed"));
    assert!(text.contains("You can only execute one statement at a time."));
}

#[tokio::test]
async fn test_every_query_is_audited_once() {
    let h = harness(vec![restaurant("KyotoGarden", District::East, 10)]);
    let started = chrono::Utc::now();

    let ok = body(&h, query_request("SELECT * FROM restaurants")).await;
    assert!(ok.starts_with('['));
    let failed = body(&h, query_request("SELECT * FROM bookings")).await;
    assert!(failed.contains("no such table: bookings"));

    let records = h.audit.records().await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].sql_query, "SELECT * FROM restaurants");
    assert_eq!(records[1].sql_query, "SELECT * FROM bookings");
    assert!(records.iter().all(|r| r.timestamp_utc >= started));
}

#[tokio::test]
async fn test_sqlite_backed_round_trip() {
    use maitre_core::storage::{SqliteAuditLog, SqliteLedger};

    let dir = tempfile::tempdir().unwrap();
    let catalog = Arc::new(Catalog::new(vec![restaurant("KyotoGarden", District::East, 10)]));
    let ledger_path = dir.path().join("reservations.db");
    let audit_path = dir.path().join("query-audit.db");

    {
        let dispatcher = ToolDispatcher::new(
            catalog.clone(),
            Arc::new(SqliteLedger::open(&ledger_path).unwrap()),
            Arc::new(SqliteAuditLog::open(&audit_path).unwrap()),
        );
        let ack = dispatcher
            .dispatch(reservation_request("KyotoGarden", "Ana", "7"))
            .await
            .unwrap();
        assert_eq!(ack.body(), RESERVATION_CONFIRMATION);
        dispatcher
            .dispatch(query_request("SELECT COUNT(*) FROM restaurants"))
            .await
            .unwrap();
    }

    // Reopened stores see the rows written above.
    let audit = SqliteAuditLog::open(&audit_path).unwrap();
    assert_eq!(audit.count().unwrap(), 1);
    let dispatcher = ToolDispatcher::new(
        catalog,
        Arc::new(SqliteLedger::open(&ledger_path).unwrap()),
        Arc::new(audit),
    );
    let response = dispatcher
        .dispatch(availability_request("KyotoGarden"))
        .await
        .unwrap();
    assert_eq!(response.body(), "There is availability for 3 persons.");
}
