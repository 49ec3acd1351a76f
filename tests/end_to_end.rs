//! Resolve → filter → stream → aggregate against a mock chess.com API.

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chesstime::aggregator::{aggregate, HOURS};
use chesstime::archive::MonthRange;
use chesstime::config::Config;
use chesstime::remote::{all_games, ChessComClient};
use chesstime::report::write_perf;
use chesstime::tz::Zone;

// 2022-07-10 14:20:00 UTC and 2022-08-03 14:45:00 UTC
const JULY_2PM: i64 = 1_657_462_800;
const AUG_2PM: i64 = 1_659_537_900;

fn blitz(end_time: i64, rating: i32) -> Value {
    json!({
        "url": "https://www.chess.com/game/live/1",
        "end_time": end_time,
        "time_class": "blitz",
        "time_control": "180",
        "rules": "chess",
        "white": {"username": "CaptainOrange", "rating": rating, "result": "win", "@id": "a"},
        "black": {"username": "opponent", "rating": 1400, "result": "resigned", "@id": "b"}
    })
}

async fn mock_history(server: &MockServer) {
    let base = server.uri();
    Mock::given(method("GET"))
        .and(path("/pub/player/captainorange/games/archives"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "archives": [
                format!("{base}/pub/player/captainorange/games/2022/07"),
                format!("{base}/pub/player/captainorange/games/2022/08"),
            ]
        })))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pub/player/captainorange/games/2022/07"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"games": [blitz(JULY_2PM, 1520)]})))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pub/player/captainorange/games/2022/08"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"games": [blitz(AUG_2PM, 1510)]})))
        .expect(1)
        .mount(server)
        .await;
}

fn config_for(base: &str) -> Config {
    Config {
        archives_url: format!("{base}/pub/player/{{user}}/games/archives"),
        games_url: format!("{base}/pub/player/{{user}}/games/{{year}}/{{month}}"),
        ..Config::default()
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn two_months_in_utc() {
    let server = MockServer::start().await;
    mock_history(&server).await;
    let base = server.uri();

    let table = tokio::task::spawn_blocking(move || {
        let cfg = config_for(&base);
        let client = ChessComClient::new(&cfg).unwrap();
        let stream = all_games(&client, "captainorange", &MonthRange::default()).unwrap();
        aggregate(stream, "captainorange", &cfg.time_classes, Zone::utc()).unwrap()
    })
    .await
    .unwrap();

    let blitz = table.get("blitz").unwrap();
    assert_eq!(blitz[14], -10.0);
    for h in (0..HOURS).filter(|h| *h != 14) {
        assert_eq!(blitz[h], 0.0, "hour {h}");
    }
    assert_eq!(table.get("bullet").unwrap(), &[0.0; HOURS]);
    assert_eq!(table.get("rapid").unwrap(), &[0.0; HOURS]);

    let mut out = Vec::new();
    write_perf(&table, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("1 0.000000\n"));
    assert!(text.contains("\n15 -10.000000\n"));
    assert_eq!(text.lines().filter(|l| !l.is_empty()).count(), 3 * HOURS);
}

#[tokio::test(flavor = "multi_thread")]
async fn excluded_month_is_never_fetched() {
    let server = MockServer::start().await;
    let base = server.uri();
    Mock::given(method("GET"))
        .and(path("/pub/player/captainorange/games/archives"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "archives": [
                format!("{base}/pub/player/captainorange/games/2022/07"),
                format!("{base}/pub/player/captainorange/games/2022/08"),
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pub/player/captainorange/games/2022/07"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"games": [blitz(JULY_2PM, 1520)]})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pub/player/captainorange/games/2022/08"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"games": []})))
        .expect(0)
        .mount(&server)
        .await;

    let table = tokio::task::spawn_blocking(move || {
        let cfg = config_for(&base);
        let client = ChessComClient::new(&cfg).unwrap();
        let range = MonthRange {
            start: None,
            end: Some("2022-12".parse().unwrap()),
            excludes: vec!["2022-08".parse().unwrap()],
        };
        let stream = all_games(&client, "captainorange", &range).unwrap();
        assert_eq!(stream.remaining(), 1);
        aggregate(stream, "captainorange", &cfg.time_classes, Zone::utc()).unwrap()
    })
    .await
    .unwrap();

    // the only blitz game just seeds the rating
    assert_eq!(table.get("blitz").unwrap(), &[0.0; HOURS]);
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_month_aborts_the_run() {
    let server = MockServer::start().await;
    let base = server.uri();
    Mock::given(method("GET"))
        .and(path("/pub/player/captainorange/games/archives"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "archives": [format!("{base}/pub/player/captainorange/games/2022/07")]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pub/player/captainorange/games/2022/07"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = tokio::task::spawn_blocking(move || {
        let cfg = config_for(&base);
        let client = ChessComClient::new(&cfg).unwrap();
        let stream = all_games(&client, "captainorange", &MonthRange::default())?;
        aggregate(stream, "captainorange", &cfg.time_classes, Zone::utc())
    })
    .await
    .unwrap();

    assert!(matches!(result, Err(chesstime::Error::RemoteRequest { .. })));
}
