mod common;

use actix_web::{middleware::Logger, rt, web, App, HttpServer};
use common::{cleanup_user, create_task, create_user, record_id, test_pool, unique_email, unique_title};
use pretty_assertions::assert_eq;
use serde_json::{json, Value as JsonValue};
use std::net::TcpListener;
use tasks_api::db::{Column, Condition, Value};
use tasks_api::models::Task;
use tasks_api::routes;

#[test_log::test(actix_rt::test)]
#[ignore = "requires DATABASE_URL"]
async fn test_task_update_changes_only_title() {
    let pool = test_pool().await;
    let owner = create_user(&pool, &unique_email("tasks")).await;
    let title = unique_title("Write report");

    let task = Task::new(&owner.to_string(), &title, Some(""), "2030-01-01").unwrap();
    assert_eq!(task.insert_task(&pool).await.unwrap(), 1);

    let by_title = Condition::new().and(Column::Title, title.as_str());
    let id = record_id(&Task::select_task(&pool, &by_title).await.unwrap()[0]);

    let updated = Task::update_task(
        &pool,
        "title",
        vec![Value::from("Write report v2")],
        &Condition::by_id(id),
    )
    .await
    .unwrap();
    assert_eq!(updated, 1);

    let row = &Task::select_task(&pool, &Condition::by_id(id)).await.unwrap()[0];
    assert_eq!(row["title"], json!("Write report v2"));
    assert_eq!(row["description"], json!(""));
    assert_eq!(row["status"], json!("pending"));
    assert_eq!(row["due_date"], json!("2030-01-01"));

    assert_eq!(Task::delete_task(&pool, &Condition::by_id(id)).await.unwrap(), 1);
    cleanup_user(&pool, owner).await;
}

#[test_log::test(actix_rt::test)]
#[ignore = "requires DATABASE_URL"]
async fn test_tasks_are_removed_with_their_owner() {
    let pool = test_pool().await;
    let owner = create_user(&pool, &unique_email("cascade")).await;
    let task = create_task(&pool, owner, &unique_title("Owned"), "").await;

    cleanup_user(&pool, owner).await;
    assert!(Task::select_task(&pool, &Condition::by_id(task))
        .await
        .unwrap()
        .is_empty());
}

#[test_log::test(actix_rt::test)]
#[ignore = "requires DATABASE_URL"]
async fn test_task_http_flow_against_running_server() {
    let pool = test_pool().await;
    let owner = create_user(&pool, &unique_email("server")).await;
    let title = unique_title("Served");

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let server_pool = pool.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(server_pool.clone()))
            .wrap(Logger::default())
            .service(routes::health::health)
            .service(web::scope("/tasks/api").configure(routes::config))
    })
    .listen(listener)
    .expect("Failed to listen")
    .run();
    let handle = server.handle();
    rt::spawn(server);

    let client = reqwest::Client::new();
    let base = format!("http://127.0.0.1:{}/tasks/api/task", port);

    let resp = client
        .post(format!("{}/insert", base))
        .json(&json!({
            "user_id": owner,
            "title": title,
            "description": "from the client",
            "due_date": "2030-01-01"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), reqwest::StatusCode::CREATED);

    let resp = client
        .get(format!("{}/all/id,title", base))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    let rows: Vec<JsonValue> = resp.json().await.unwrap();
    let id = rows
        .iter()
        .find(|row| row["title"] == json!(title))
        .and_then(|row| row["id"].as_str())
        .expect("inserted task should be listed")
        .to_string();

    let resp = client
        .put(format!("{}/update/{}", base, id))
        .json(&json!({ "status": "done", "due_date": "2031-02-03" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    let task: JsonValue = client
        .get(format!("{}/{}", base, id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .unwrap();
    assert_eq!(task["status"], "done");
    assert_eq!(task["due_date"], "2031-02-03");
    assert_eq!(task["description"], "from the client");

    // Unknown owner: the insert fails in the database and is rolled back.
    let resp = client
        .post(format!("{}/insert", base))
        .json(&json!({
            "user_id": uuid::Uuid::new_v4(),
            "title": "No owner",
            "due_date": "2030-01-01"
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);

    let resp = client
        .delete(format!("{}/delete/{}", base, id))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    handle.stop(true).await;
    cleanup_user(&pool, owner).await;
}
