use std::io::Read as _;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use serde_json::Value;

#[derive(Debug, Clone, Default)]
pub struct BackendStubConfig {
    /// Course served by `GET /api/course/{id}` and used as the base for
    /// update responses. Must carry `_id`.
    pub course: Value,
    /// Chapter ids whose deletion answers 404.
    pub missing_chapter_ids: Vec<String>,
    /// When set, every request must carry `Authorization: Bearer <this>`.
    pub expected_token: Option<String>,
}

pub struct BackendStub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<(String, String)>>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl BackendStub {
    pub fn spawn(config: BackendStubConfig) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("start backend stub server");
        let addr = server.server_addr();
        let base_url = format!("http://{addr}");

        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

        let handle = thread::spawn(move || {
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                let mut request = match server.recv_timeout(Duration::from_millis(50)) {
                    Ok(Some(req)) => req,
                    Ok(None) => continue,
                    Err(_) => break,
                };

                let method = request.method().to_string();
                let path = request.url().to_string();
                recorded
                    .lock()
                    .expect("request log poisoned")
                    .push((method.clone(), path.clone()));

                if let Some(expected) = config.expected_token.as_deref() {
                    let authorized = request.headers().iter().any(|h| {
                        h.field.equiv("Authorization")
                            && h.value.as_str() == format!("Bearer {expected}")
                    });
                    if !authorized {
                        let _ = request.respond(json_response(
                            401,
                            &serde_json::json!({"success": false, "message": "unauthorized"}),
                        ));
                        continue;
                    }
                }

                let response = route(&config, &mut request, &method, &path);
                let _ = request.respond(response);
            }
        });

        Self {
            base_url,
            requests,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    /// Every `(method, path)` seen so far, in arrival order.
    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().expect("request log poisoned").clone()
    }
}

impl Drop for BackendStub {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn route(
    config: &BackendStubConfig,
    request: &mut tiny_http::Request,
    method: &str,
    path: &str,
) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let course_id = config
        .course
        .get("_id")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_owned();

    if method == "GET" && path == format!("/api/course/{course_id}") {
        return json_response(
            200,
            &serde_json::json!({"success": true, "courseData": config.course}),
        );
    }

    if method == "PUT" && path == format!("/api/educator/edit-course/{course_id}") {
        return handle_update(config, request);
    }

    if method == "DELETE"
        && let Some(rest) = path.strip_prefix(&format!("/api/educator/course/{course_id}/chapter/"))
    {
        let chapter_id = rest.split('/').next().unwrap_or_default();
        if config.missing_chapter_ids.iter().any(|id| id == chapter_id) {
            return json_response(
                404,
                &serde_json::json!({"success": false, "message": "Chapter not found"}),
            );
        }
        return json_response(200, &serde_json::json!({"success": true, "message": "deleted"}));
    }

    json_response(404, &serde_json::json!({"success": false, "message": "not found"}))
}

fn handle_update(
    config: &BackendStubConfig,
    request: &mut tiny_http::Request,
) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let Some(boundary) = request
        .headers()
        .iter()
        .find(|h| h.field.equiv("Content-Type"))
        .and_then(|h| {
            h.value
                .as_str()
                .split("boundary=")
                .nth(1)
                .map(str::to_owned)
        })
    else {
        return json_response(
            400,
            &serde_json::json!({"success": false, "message": "missing multipart boundary"}),
        );
    };

    let mut body = String::new();
    if request.as_reader().read_to_string(&mut body).is_err() {
        return json_response(
            400,
            &serde_json::json!({"success": false, "message": "unreadable body"}),
        );
    }

    let parts = parse_multipart(&body, &boundary);
    let Some(update_data) = parts
        .iter()
        .find(|(name, _)| name == "updateData")
        .map(|(_, content)| content.clone())
    else {
        return json_response(
            400,
            &serde_json::json!({"success": false, "message": "missing updateData"}),
        );
    };
    let videos = parts.iter().filter(|(name, _)| name == "videos").count();

    let payload: Value = match serde_json::from_str(&update_data) {
        Ok(value) => value,
        Err(_) => {
            return json_response(
                400,
                &serde_json::json!({"success": false, "message": "invalid updateData json"}),
            );
        }
    };

    let empty = Vec::new();
    let new_chapters = payload["newChapters"].as_array().unwrap_or(&empty);
    let new_lectures = payload["newLectures"].as_array().unwrap_or(&empty);
    if videos != new_lectures.len() {
        return json_response(
            400,
            &serde_json::json!({
                "success": false,
                "message": format!(
                    "expected {} videos, got {videos}",
                    new_lectures.len()
                ),
            }),
        );
    }

    // Mirror the real endpoint: append new chapters, upload each video in
    // list order, then attach each lecture to its chapter by id.
    let mut course = config.course.clone();
    for field in ["courseTitle", "courseDescription", "coursePrice", "discount", "isPublished"] {
        if let Some(value) = payload.get(field) {
            course[field] = value.clone();
        }
    }
    let content = course["courseContent"]
        .as_array_mut()
        .expect("course fixture has courseContent");
    for chapter in new_chapters {
        let mut chapter = chapter.clone();
        chapter["chapterContent"] = serde_json::json!([]);
        content.push(chapter);
    }
    for lecture in new_lectures {
        let mut lecture = lecture.clone();
        let lecture_id = lecture["lectureId"].as_str().unwrap_or_default().to_owned();
        lecture["lectureUrl"] =
            serde_json::json!(format!("https://cdn.example.com/videos/{lecture_id}.mp4"));
        let chapter_id = lecture["chapterId"].as_str().unwrap_or_default().to_owned();
        let Some(chapter) = content
            .iter_mut()
            .find(|c| c["chapterId"].as_str() == Some(chapter_id.as_str()))
        else {
            return json_response(
                400,
                &serde_json::json!({
                    "success": false,
                    "message": format!("unknown chapterId {chapter_id}"),
                }),
            );
        };
        chapter["chapterContent"]
            .as_array_mut()
            .expect("chapter has chapterContent")
            .push(lecture);
    }

    json_response(
        200,
        &serde_json::json!({
            "success": true,
            "message": "Course updated successfully",
            "course": course,
        }),
    )
}

/// Minimal multipart parsing, enough for text parts and small test files.
fn parse_multipart(body: &str, boundary: &str) -> Vec<(String, String)> {
    let marker = format!("--{boundary}");
    let mut parts = Vec::new();

    for chunk in body.split(&marker) {
        let chunk = chunk.trim_start_matches("\r\n");
        if chunk.is_empty() || chunk.starts_with("--") {
            continue;
        }
        let Some((headers, content)) = chunk.split_once("\r\n\r\n") else {
            continue;
        };
        let Some(name) = headers
            .split("name=\"")
            .nth(1)
            .and_then(|rest| rest.split('"').next())
        else {
            continue;
        };
        let content = content.strip_suffix("\r\n").unwrap_or(content);
        parts.push((name.to_owned(), content.to_owned()));
    }

    parts
}

fn json_response(
    status: u16,
    body: &Value,
) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let header = tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .expect("build header");
    tiny_http::Response::from_string(body.to_string())
        .with_status_code(status)
        .with_header(header)
}

/// Course fixture with one persisted chapter holding one persisted lecture.
#[allow(dead_code)]
pub fn base_course() -> Value {
    serde_json::json!({
        "_id": "c1",
        "courseTitle": "Rust 101",
        "courseDescription": "An introduction.",
        "coursePrice": 49.0,
        "discount": 10.0,
        "isPublished": true,
        "courseContent": [
            {
                "chapterId": "ch-perm",
                "chapterOrder": 1,
                "chapterTitle": "Basics",
                "chapterContent": [
                    {
                        "lectureId": "lec-perm",
                        "lectureTitle": "Hello",
                        "lectureDuration": 90.0,
                        "lectureUrl": "https://cdn.example.com/lec-perm.mp4",
                        "isPreviewFree": true,
                        "lectureOrder": 1
                    }
                ]
            }
        ]
    })
}
