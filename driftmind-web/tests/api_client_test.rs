mod common;

use common::{test_settings, UNREACHABLE_UPSTREAM};
use driftmind_web::models::{SearchRequest, UploadOptions};
use driftmind_web::services::api_client::{ClientError, DriftMindClient};
use serde_json::json;
use wiremock::matchers::{body_json, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(upstream: &str) -> DriftMindClient {
    DriftMindClient::new(test_settings(upstream).driftmind_api)
}

#[tokio::test]
async fn request_download_token_posts_camel_case_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/download/token"))
        .and(body_json(json!({ "documentId": "doc-7", "expirationMinutes": 30 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "token": "tok-7",
            "documentId": "doc-7",
            "expiresAt": "2025-06-01T12:30:00"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server.uri())
        .request_download_token("doc-7", 30)
        .await
        .expect("token should be issued");

    assert_eq!(response.token, "tok-7");
    assert_eq!(response.document_id, "doc-7");
    assert_eq!(response.expires_at.to_rfc3339(), "2025-06-01T12:30:00+00:00");
}

#[tokio::test]
async fn token_error_status_is_not_a_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/download/token"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = client(&server.uri())
        .request_download_token("doc-7", 30)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Status(status) if status.as_u16() == 403));
    assert!(!err.is_transport());
}

#[tokio::test]
async fn connection_refused_is_a_transport_failure() {
    let err = client(UNREACHABLE_UPSTREAM)
        .fetch_file("abc")
        .await
        .unwrap_err();

    assert!(err.is_transport());
}

#[tokio::test]
async fn fetch_file_reads_bytes_type_and_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/download/file"))
        .and(body_json(json!({ "token": "abc" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"col1,col2\n".to_vec(), "text/csv")
                .insert_header("content-disposition", "attachment; filename=\"export.csv\""),
        )
        .mount(&server)
        .await;

    let file = client(&server.uri()).fetch_file("abc").await.unwrap();

    assert_eq!(&file.bytes[..], b"col1,col2\n");
    assert_eq!(file.content_type.as_deref(), Some("text/csv"));
    assert_eq!(file.file_name.as_deref(), Some("export.csv"));
}

#[tokio::test]
async fn search_posts_defaults_and_parses_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_json(json!({
            "query": "drift",
            "maxResults": 10,
            "useSemanticSearch": true,
            "includeAnswer": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": "drift",
            "success": true,
            "totalResults": 1,
            "generatedAnswer": "Drift is change over time.",
            "results": [{
                "id": "chunk-1",
                "content": "Concept drift ...",
                "documentId": "doc-1",
                "chunkIndex": 0,
                "score": 0.92,
                "createdAt": "2025-05-01T08:00:00Z"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server.uri())
        .search(&SearchRequest::new("drift"))
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].document_id, "doc-1");
    assert_eq!(
        response.generated_answer.as_deref(),
        Some("Drift is change over time.")
    );
}

#[tokio::test]
async fn get_documents_sends_paging_and_filter() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/documents"))
        .and(body_json(json!({
            "maxResults": 20,
            "skip": 40,
            "documentIdFilter": "doc-"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "totalDocuments": 41,
            "returnedDocuments": 1,
            "documents": [{
                "documentId": "doc-41",
                "chunkCount": 3,
                "fileName": "notes.txt",
                "createdAt": "2025-05-01T08:00:00",
                "lastUpdated": "2025-05-02T08:00:00"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(&server.uri())
        .get_documents(20, 40, Some("doc-".to_string()))
        .await
        .unwrap();

    assert_eq!(response.total_documents, 41);
    assert_eq!(response.documents[0].file_name.as_deref(), Some("notes.txt"));
}

#[tokio::test]
async fn delete_document_targets_encoded_path() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/documents/doc%201"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server.uri())
        .delete_document("doc 1")
        .await
        .expect("delete should succeed");
}

#[tokio::test]
async fn upload_text_as_file_sends_multipart_quick_note() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/uploads"))
        .and(header_exists("content-type"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "documentId": "doc-note",
            "chunksCreated": 1,
            "fileName": "QuickNotes-1234abcd.txt"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let options = UploadOptions {
        document_id: Some("doc-note".to_string()),
        ..UploadOptions::default()
    };
    let response = client(&server.uri())
        .upload_text_as_file("remember the milk", &options)
        .await
        .unwrap();
    assert_eq!(response.document_id, "doc-note");

    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body).to_string();
    assert!(body.contains("filename=\"QuickNotes-"));
    assert!(body.contains(".txt\""));
    assert!(body.contains("remember the milk"));
    assert!(body.contains("name=\"chunkSize\""));
    assert!(body.contains("1000"));
    assert!(body.contains("name=\"documentId\""));
}

#[tokio::test]
async fn upstream_error_status_on_upload_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/uploads"))
        .respond_with(ResponseTemplate::new(413))
        .mount(&server)
        .await;

    let err = client(&server.uri())
        .upload_file("big.bin", vec![0u8; 16], &UploadOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Status(_)));
}
