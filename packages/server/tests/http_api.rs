//! HTTP API の結合テスト
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - GET /api/health, /api/games, /api/games/{game_id} の各エンドポイント
//! - WebSocket 経由で作った卓が HTTP の読み取り面に反映されること
//!
//! ### なぜこのテストが必要か
//! - HTTP 面はロビーの読み取り専用プロジェクションなので、WebSocket 側の
//!   書き込みと同じストアを見ていることを実サーバ越しに確認するため
//! - タイムスタンプが HTTP では RFC 3339 (JST) 文字列になる変換を含むため
//!
//! ### どのような状況を想定しているか
//! - 正常系: ヘルスチェック、空の一覧、作成済みの卓の一覧と詳細
//! - 異常系: 存在しないゲーム ID の詳細取得 (404)

mod common;

use std::time::Duration;

use serde_json::{Value, json};

use common::{WsClient, spawn_server};

#[tokio::test]
async fn test_health_and_empty_game_list() {
    // テスト項目: ヘルスチェックと、卓が無いときの一覧・詳細の応答
    // given (前提条件): 起動直後のサーバ
    let port = 19201;
    spawn_server(port, Duration::ZERO).await;
    let base = format!("http://127.0.0.1:{}", port);

    // when (操作) / then (期待する結果):
    let response = reqwest::get(format!("{}/api/health", base)).await.unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    let response = reqwest::get(format!("{}/api/games", base)).await.unwrap();
    assert_eq!(response.status(), 200);
    let games: Value = response.json().await.unwrap();
    assert_eq!(games, json!([]));

    let response = reqwest::get(format!("{}/api/games/nonexistent", base))
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_created_game_appears_on_the_http_surface() {
    // テスト項目: WebSocket で作った卓が一覧と詳細の両方に現れる
    // given (前提条件): 名前設定済みのクライアントが卓を 1 つ作る
    let port = 19202;
    spawn_server(port, Duration::ZERO).await;
    let base = format!("http://127.0.0.1:{}", port);

    let mut alice = WsClient::connect(port).await;
    assert!(!alice.connection_id.is_empty());
    alice.send("SET_USERNAME", json!({ "username": "alice" })).await;
    alice.recv_action("SET_USERNAME").await;
    alice
        .send(
            "CREATE_GAME",
            json!({
                "gameName": "friday night",
                "gameType": "mahjong",
                "gameVersion": "hongkong",
            }),
        )
        .await;
    let ack = alice.recv_action("CREATE_GAME").await;
    let game_id = ack["payload"]["gameId"].as_str().unwrap().to_string();

    // when (操作): HTTP 側から一覧と詳細を読む
    let games: Value = reqwest::get(format!("{}/api/games", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    // then (期待する結果): サマリは username の列、タイムスタンプは JST 文字列
    let list = games.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["gameId"], game_id.as_str());
    assert_eq!(list[0]["gameName"], "friday night");
    assert_eq!(list[0]["users"], json!(["alice"]));
    assert_eq!(list[0]["status"], "CREATED");
    assert!(list[0]["createdAt"].as_str().unwrap().ends_with("+09:00"));

    let detail: Value = reqwest::get(format!("{}/api/games/{}", base, game_id))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["gameId"], game_id.as_str());
    assert_eq!(detail["creator"], alice.connection_id);
    assert_eq!(detail["users"][0]["username"], "alice");
    assert_eq!(detail["loadedCount"], 0);
    assert_eq!(detail["status"], "CREATED");

    alice.close().await;
}
